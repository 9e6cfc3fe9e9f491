use std::fmt;
use std::sync::Arc;

/// Pixels of a decoded raster image, ready to be embedded by a document sink.
///
/// `rgb` holds `width * height * 3` bytes, row-major from the top-left corner.
/// `alpha`, when present, holds one byte per pixel.
#[derive(Clone, PartialEq, Eq)]
pub struct DecodedImage {
    pub width: u32,
    pub height: u32,
    pub rgb: Vec<u8>,
    pub alpha: Option<Vec<u8>>,
}

impl fmt::Debug for DecodedImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DecodedImage")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("rgb_bytes", &self.rgb.len())
            .field("has_alpha", &self.alpha.is_some())
            .finish()
    }
}

/// A cheap-to-clone reference to a decoded image, tagged with the URI it was loaded from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageHandle {
    uri: Arc<str>,
    image: Arc<DecodedImage>,
}

impl ImageHandle {
    pub fn new(uri: impl Into<Arc<str>>, image: DecodedImage) -> Self {
        Self {
            uri: uri.into(),
            image: Arc::new(image),
        }
    }

    pub fn uri(&self) -> &str {
        &self.uri
    }

    pub fn image(&self) -> &DecodedImage {
        &self.image
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.image.width, self.image.height)
    }

    /// True when both handles point at the same decoded pixels.
    pub fn same_pixels(&self, other: &ImageHandle) -> bool {
        Arc::ptr_eq(&self.image, &other.image)
    }
}
