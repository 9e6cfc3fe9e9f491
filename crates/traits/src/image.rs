use crate::resource::ResourceError;
use figura_types::ImageHandle;

/// Resolves an image reference to decoded pixels.
///
/// A missing image is reported as [`ResourceError::NotFound`] so callers can
/// tell it apart from an image that exists but cannot be decoded.
pub trait ImageSource {
    fn load_image(&self, uri: &str) -> Result<ImageHandle, ResourceError>;
}
