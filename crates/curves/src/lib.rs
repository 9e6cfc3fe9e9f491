//! Parametric curve discretization.
//!
//! Turns a curve family into an ordered, finite sequence of page-space points
//! that a path builder can consume with straight segments. Nothing here knows
//! about drawing surfaces.

mod error;
mod lemniscate;

pub use error::CurveError;
pub use lemniscate::{discretize, point_at, samples, CurveKind, CurveSamples, DEFAULT_SEGMENTS};
