//! Composes a single vector page (background, shapes, text, images and
//! lemniscate strokes) and writes it out through a document sink.

pub mod compose;
pub mod config;
pub mod error;

pub use compose::{submit_page, ComposeReport, ComposedPage, PageComposer, PageDraft, SkippedResource};
pub use config::{ComposerConfig, FigureStyle, Scene};
pub use error::ComposeError;

pub use figura_canvas as canvas;
pub use figura_curves as curves;
pub use figura_render_core as render;
pub use figura_types as types;
