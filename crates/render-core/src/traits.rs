use crate::error::RenderError;
use figura_canvas::{DrawOperation, PassMode};
use figura_types::Size;
use std::path::Path;

/// Identifies a page created by a [`DocumentSink`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PageHandle(pub usize);

/// Identifies an open content stream of a [`DocumentSink`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StreamHandle(pub usize);

/// A trait for document backends that persist composed pages.
///
/// The composer drives it in a fixed rhythm: one `new_page`, then for every
/// content pass an `open_content_stream`, the pass's operations through
/// `submit`, and a `close_content_stream`; finally `save` and `close`.
pub trait DocumentSink {
    fn new_page(&mut self, size: Size) -> Result<PageHandle, RenderError>;

    /// Opens a content stream on `page`. `Overwrite` discards whatever the page
    /// already shows, `Append` paints over it.
    fn open_content_stream(
        &mut self,
        page: PageHandle,
        mode: PassMode,
    ) -> Result<StreamHandle, RenderError>;

    fn submit(&mut self, stream: StreamHandle, operation: &DrawOperation) -> Result<(), RenderError>;

    /// Flushes the stream's operations onto its page. Closing a stream twice is an error.
    fn close_content_stream(&mut self, stream: StreamHandle) -> Result<(), RenderError>;

    /// Encodes the document and writes it to `path`.
    fn save(&mut self, path: &Path) -> Result<(), RenderError>;

    /// Releases the document. Further calls fail with [`RenderError::Closed`].
    fn close(&mut self) -> Result<(), RenderError>;
}
