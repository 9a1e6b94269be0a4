use std::io::{BufWriter, Read, Write};

use log::*;

use crate::{layouts::RomLayout, ImageError};

/// Writes one byte per line as two lowercase hex digits.
pub fn write_hex(data: &[u8], output: impl Write) -> Result<(), ImageError> {
    let mut output = BufWriter::new(output);

    for byte in data {
        writeln!(output, "{:02x}", byte).map_err(ImageError::FailedToWrite)?;
    }

    output.flush().map_err(ImageError::FailedToWrite)
}

/// Converts a raw binary into a hex image shaped by `layout`.
pub fn tohex(
    mut input: impl Read,
    output: impl Write,
    layout: &dyn RomLayout,
) -> Result<(), ImageError> {
    let mut data = Vec::new();
    input
        .read_to_end(&mut data)
        .map_err(ImageError::FailedToRead)?;

    match layout.image_size() {
        Some(size) => debug!("Read {} bytes into a {} byte image", data.len(), size),
        None => debug!("Read {} bytes", data.len()),
    }

    let image = layout.apply(data)?;
    write_hex(&image, output)?;

    info!("Wrote {} bytes as {} image", image.len(), layout.name());

    Ok(())
}
