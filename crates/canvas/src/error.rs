use crate::layer::PassId;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CanvasError {
    #[error("Path command '{0}' issued before any move_to")]
    PathNotStarted(&'static str),

    #[error("Non-finite point ({x}, {y}) passed to {command}")]
    InvalidPoint { command: &'static str, x: f32, y: f32 },

    #[error("Invalid {what}: {value}")]
    InvalidDimension { what: &'static str, value: f32 },

    #[error("An overwrite pass cannot follow an append pass on the same page")]
    InvalidPassOrder,

    #[error("Content pass {0} is still open; end it before beginning another")]
    PassAlreadyOpen(PassId),

    #[error("Content pass {0} is not the open pass")]
    PassNotOpen(PassId),

    #[error("Invalid graphics state: {0}")]
    InvalidGraphicsState(String),
}
