//! PDF document sink using lopdf.
//!
//! Every content pass becomes one PDF content stream on its page. Each drawing
//! operation is wrapped in `q … Q` with its own graphics state, so operations
//! never leak colour, width or transparency into one another.

mod helpers;
mod sink;

pub use helpers::{to_win_ansi, PageResources, BASE_FONT, FONT_RESOURCE_NAME};
pub use sink::LopdfSink;
