use thiserror::Error;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("I/O error while writing document: {0}")]
    Io(#[from] std::io::Error),
    #[error("PDF generation error: {0}")]
    Pdf(String),
    #[error("Unknown {kind} handle {id}")]
    UnknownHandle { kind: &'static str, id: usize },
    #[error("Document is already closed")]
    Closed,
    #[error("Other rendering error: {0}")]
    Other(String),
}

impl From<lopdf::Error> for RenderError {
    fn from(err: lopdf::Error) -> Self {
        RenderError::Pdf(err.to_string())
    }
}

impl From<&str> for RenderError {
    fn from(s: &str) -> Self {
        RenderError::Other(s.to_string())
    }
}
