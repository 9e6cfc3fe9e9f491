use crate::filesystem::FilesystemResourceProvider;
use figura_traits::{ImageSource, ResourceError, ResourceProvider};
use figura_types::{DecodedImage, ImageHandle};

/// An [`ImageSource`] that reads bytes from a provider and decodes them with `image`.
#[derive(Debug)]
pub struct DecodingImageSource<P: ResourceProvider> {
    provider: P,
}

impl Default for DecodingImageSource<FilesystemResourceProvider> {
    fn default() -> Self {
        Self::new(FilesystemResourceProvider::default())
    }
}

impl<P: ResourceProvider> DecodingImageSource<P> {
    pub fn new(provider: P) -> Self {
        Self { provider }
    }
}

impl<P: ResourceProvider> ImageSource for DecodingImageSource<P> {
    fn load_image(&self, uri: &str) -> Result<ImageHandle, ResourceError> {
        let bytes = self.provider.load(uri)?;
        let decoded = decode(uri, &bytes)?;
        log::debug!(
            "Decoded image '{}' ({}x{}, alpha: {}) via {}",
            uri,
            decoded.width,
            decoded.height,
            decoded.alpha.is_some(),
            self.provider.name()
        );
        Ok(ImageHandle::new(uri, decoded))
    }
}

fn decode(uri: &str, bytes: &[u8]) -> Result<DecodedImage, ResourceError> {
    let image = image::load_from_memory(bytes).map_err(|e| ResourceError::InvalidFormat {
        path: uri.to_string(),
        message: e.to_string(),
    })?;

    let (width, height) = (image.width(), image.height());
    let alpha = if image.color().has_alpha() {
        let rgba = image.to_rgba8();
        let alpha: Vec<u8> = rgba.pixels().map(|p| p.0[3]).collect();
        // Fully opaque images do not need a soft mask.
        alpha.iter().any(|&a| a != u8::MAX).then_some(alpha)
    } else {
        None
    };

    Ok(DecodedImage {
        width,
        height,
        rgb: image.to_rgb8().into_raw(),
        alpha,
    })
}
