use std::sync::Arc;

use crate::foundation::core::Size;

pub mod decode;
pub mod upload;

pub use decode::decode_image;
pub use upload::{
    ALLOWED_MIME_TYPES, MAX_UPLOAD_BYTES, MAX_UPLOAD_MB, mime_for_path, sniff_mime,
    validate_upload,
};

/// Decoded raster ready for drawing.
#[derive(Clone, Debug, PartialEq)]
pub struct SourceImage {
    pub width: u32,
    pub height: u32,
    /// Premultiplied RGBA8, row-major, tightly packed.
    pub rgba8_premul: Arc<Vec<u8>>,
}

impl SourceImage {
    /// Natural size in pixels.
    pub fn size(&self) -> Size {
        Size::new(f64::from(self.width), f64::from(self.height))
    }

    /// Build from straight-alpha RGBA8 (premultiplies on the way in).
    pub fn from_rgba_image(rgba: image::RgbaImage) -> Self {
        let (width, height) = rgba.dimensions();
        let mut bytes = rgba.into_raw();
        decode::premultiply_rgba8_in_place(&mut bytes);
        Self {
            width,
            height,
            rgba8_premul: Arc::new(bytes),
        }
    }
}
