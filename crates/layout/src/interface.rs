use penmark_types::Size;
use std::collections::HashMap;

/// Supplies the intrinsic pixel size of an inline image so the engine can reserve
/// lines for it. `None` means the image could not be loaded and is skipped.
pub trait ImageSizer {
    fn image_size(&self, src: &str) -> Option<Size>;
}

/// Treats every image as unavailable.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoImages;

impl ImageSizer for NoImages {
    fn image_size(&self, _src: &str) -> Option<Size> {
        None
    }
}

impl ImageSizer for HashMap<String, Size> {
    fn image_size(&self, src: &str) -> Option<Size> {
        self.get(src).copied()
    }
}

impl<T: ImageSizer + ?Sized> ImageSizer for &T {
    fn image_size(&self, src: &str) -> Option<Size> {
        (**self).image_size(src)
    }
}
