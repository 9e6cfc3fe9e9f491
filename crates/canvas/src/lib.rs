//! The vector drawing model used to compose a page.
//!
//! - [`PathBuilder`] accumulates move/line/curve/close commands into a [`Path`]
//! - [`GraphicsStateManager`] holds the flat, forward-scoped rendering attributes
//! - [`DrawOperation`] pairs a path (or text, or image) with the state it was emitted under
//! - [`LayerCompositor`] groups operations into overwrite/append [`ContentPass`]es of a [`Page`]

mod error;
pub mod layer;
pub mod ops;
pub mod path;
pub mod state;

pub use error::CanvasError;
pub use layer::{ContentPass, LayerCompositor, Page, PassHandle, PassId, PassMode};
pub use ops::{validate_placement, DrawOperation};
pub use path::{Path, PathBuilder, PathCommand};
pub use state::{BlendMode, FillRule, GraphicsState, GraphicsStateManager, GraphicsStateUpdate, LineCap};
