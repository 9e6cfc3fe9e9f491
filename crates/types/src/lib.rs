pub mod color;
pub mod geometry;
pub mod image;

pub use color::Color;
pub use geometry::{PageSize, Point, Size};
pub use image::{DecodedImage, ImageHandle};
