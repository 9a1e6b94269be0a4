use crate::{
    layouts::{check_fits, RomLayout},
    ImageError,
};

pub const BIOS_SIZE: usize = 8 * 1024;

/// BIOS image, zero padded to 8 KiB.
#[derive(Debug, Default, Clone)]
pub struct Bios;

impl RomLayout for Bios {
    fn name(&self) -> &'static str {
        "bios"
    }

    fn image_size(&self) -> Option<usize> {
        Some(BIOS_SIZE)
    }

    fn apply(&self, mut data: Vec<u8>) -> Result<Vec<u8>, ImageError> {
        check_fits(&data, BIOS_SIZE)?;
        data.resize(BIOS_SIZE, 0x00);
        Ok(data)
    }
}
