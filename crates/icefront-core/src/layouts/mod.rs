pub use bios::Bios;
pub use bootrom::BootRom;
pub use diskrom::DiskRom;
pub use plain::Plain;

use crate::ImageError;

pub mod bios;
pub mod bootrom;
pub mod diskrom;
pub mod plain;

/// This is a helper struct, which allows you to iterate over every layout defined
pub struct LayoutIter {
    inner: std::vec::IntoIter<Box<dyn RomLayout>>,
}

impl LayoutIter {
    /// Creates a new LayoutIter
    pub fn new() -> Self {
        Self {
            inner: vec![
                Box::new(Plain) as Box<dyn RomLayout>,
                Box::new(Bios),
                Box::new(BootRom),
                Box::new(DiskRom),
            ]
            .into_iter(),
        }
    }

    pub fn find_by_name(name: &str) -> Option<Box<dyn RomLayout>> {
        Self::new().find(|layout| layout.name().eq_ignore_ascii_case(name))
    }
}

impl Default for LayoutIter {
    fn default() -> Self {
        Self::new()
    }
}

impl Iterator for LayoutIter {
    type Item = Box<dyn RomLayout>;
    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }
}

/// This trait describes how a raw binary is shaped into a ROM image.
pub trait RomLayout {
    /// Name used to select the layout on the command line
    fn name(&self) -> &'static str;

    /// Exact size of the produced image, `None` if it follows the input
    fn image_size(&self) -> Option<usize> {
        None
    }

    /// Turns the raw input into the bytes of the image
    fn apply(&self, data: Vec<u8>) -> Result<Vec<u8>, ImageError>;
}

/// Fails with [`ImageError::SizeExceeded`] if `data` is longer than `limit`.
pub(crate) fn check_fits(data: &[u8], limit: usize) -> Result<(), ImageError> {
    if data.len() > limit {
        return Err(ImageError::SizeExceeded {
            len: data.len(),
            limit,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_layout_can_be_found_by_name() {
        for layout in LayoutIter::new() {
            let found = LayoutIter::find_by_name(layout.name()).unwrap();
            assert_eq!(found.name(), layout.name());
        }
        assert_eq!(LayoutIter::find_by_name("DISKROM").unwrap().name(), "diskrom");
        assert!(LayoutIter::find_by_name("srec").is_none());
    }

    #[test]
    fn fixed_layouts_produce_their_image_size() {
        for layout in LayoutIter::new() {
            if let Some(size) = layout.image_size() {
                assert_eq!(layout.apply(vec![0x42; 16]).unwrap().len(), size);
                assert_eq!(layout.apply(Vec::new()).unwrap().len(), size);
            }
        }
    }
}
