use crate::{
    layouts::{check_fits, RomLayout},
    ImageError,
};

pub const DISKROM_SIZE: usize = 0x800;

/// Option ROM image, zero padded to 2 KiB. The last byte is a checksum that
/// makes all bytes of the image sum to zero.
#[derive(Debug, Default, Clone)]
pub struct DiskRom;

impl RomLayout for DiskRom {
    fn name(&self) -> &'static str {
        "diskrom"
    }

    fn image_size(&self) -> Option<usize> {
        Some(DISKROM_SIZE)
    }

    fn apply(&self, mut data: Vec<u8>) -> Result<Vec<u8>, ImageError> {
        check_fits(&data, DISKROM_SIZE)?;

        // Only the input counts, the final byte is overwritten below
        let sum = checksum(&data);

        data.resize(DISKROM_SIZE, 0x00);
        data[DISKROM_SIZE - 1] = 0u8.wrapping_sub(sum);

        Ok(data)
    }
}

/// Sum of all bytes, modulo 256
pub fn checksum(data: &[u8]) -> u8 {
    data.iter().fold(0u8, |sum, &b| sum.wrapping_add(b))
}
