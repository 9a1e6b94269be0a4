use crate::{
    layouts::{check_fits, RomLayout},
    ImageError,
};

pub const BOOTROM_SIZE: usize = 0x2000;
/// Offset of the reset stub, 16 bytes below the top of the ROM
pub const RESET_VECTOR_OFFSET: usize = 0x1ff0;
/// `jmp fe00:0000`
pub const RESET_VECTOR: [u8; 5] = [0xea, 0x00, 0x00, 0x00, 0xfe];
/// x86 `nop`
pub const FILL_BYTE: u8 = 0x90;

/// x86 boot ROM. Program at offset zero, a far jump at the reset vector and
/// `nop` everywhere else.
#[derive(Debug, Default, Clone)]
pub struct BootRom;

impl RomLayout for BootRom {
    fn name(&self) -> &'static str {
        "bootrom"
    }

    fn image_size(&self) -> Option<usize> {
        Some(BOOTROM_SIZE)
    }

    fn apply(&self, mut data: Vec<u8>) -> Result<Vec<u8>, ImageError> {
        check_fits(&data, RESET_VECTOR_OFFSET)?;

        data.resize(RESET_VECTOR_OFFSET, FILL_BYTE);
        data.extend_from_slice(&RESET_VECTOR);
        data.resize(BOOTROM_SIZE, FILL_BYTE);

        Ok(data)
    }
}
