use figura_canvas::CanvasError;
use figura_curves::CurveError;
use figura_render_core::RenderError;
use figura_traits::ResourceError;
use thiserror::Error;

/// Everything that can stop a page from being composed and saved.
#[derive(Error, Debug)]
pub enum ComposeError {
    #[error("Curve generation failed: {0}")]
    Curve(#[from] CurveError),

    #[error("Canvas operation failed: {0}")]
    Canvas(#[from] CanvasError),

    #[error("Resource could not be used: {0}")]
    Resource(#[from] ResourceError),

    #[error("Rendering failed: {0}")]
    Render(#[from] RenderError),

    #[error("Configuration is invalid: {0}")]
    Config(String),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ComposeError {
    /// True when the failure happened while writing the document out.
    pub fn is_sink_io(&self) -> bool {
        matches!(self, ComposeError::Render(RenderError::Io(_)) | ComposeError::Io(_))
    }
}
