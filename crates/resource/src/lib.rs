//! Resource providers and the image source used by the page composer.
//!
//! - [`FilesystemResourceProvider`]: reads resources relative to a base directory
//! - [`DecodingImageSource`]: turns provider bytes into decoded RGB pixels
//!
//! The in-memory provider from figura-traits is re-exported for convenience.

mod filesystem;
mod image_source;

pub use filesystem::FilesystemResourceProvider;
pub use image_source::DecodingImageSource;

pub use figura_traits::InMemoryResourceProvider;
