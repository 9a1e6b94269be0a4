use crate::{layouts::RomLayout, ImageError};

/// Bytes are dumped as they are.
#[derive(Debug, Default, Clone)]
pub struct Plain;

impl RomLayout for Plain {
    fn name(&self) -> &'static str {
        "plain"
    }

    fn apply(&self, data: Vec<u8>) -> Result<Vec<u8>, ImageError> {
        Ok(data)
    }
}
