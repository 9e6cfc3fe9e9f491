//! Core rendering abstractions for persisting composed pages.
//!
//! This crate provides:
//! - the `DocumentSink` trait that document backends implement
//! - opaque page and content-stream handles
//! - `ContentStreamGuard`, which closes a content stream on every exit path
//! - the `RenderError` type shared by all backends

mod error;
mod guard;
mod traits;

pub use error::RenderError;
pub use guard::ContentStreamGuard;
pub use traits::{DocumentSink, PageHandle, StreamHandle};
