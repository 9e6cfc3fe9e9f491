pub mod image;
pub mod resource;

pub use image::ImageSource;
pub use resource::{InMemoryResourceProvider, ResourceError, ResourceProvider, SharedResourceData};
