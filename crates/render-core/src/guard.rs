use crate::error::RenderError;
use crate::traits::{DocumentSink, StreamHandle};

/// Scopes a content stream so it is closed however the caller leaves.
///
/// Call [`finish`](Self::finish) to close it and see the result. If the guard
/// is dropped first (an early `?` return, for instance) the stream is closed
/// from `Drop` and any error is logged, so the next pass starts clean.
pub struct ContentStreamGuard<'a, S: DocumentSink + ?Sized> {
    sink: &'a mut S,
    stream: Option<StreamHandle>,
}

impl<'a, S: DocumentSink + ?Sized> ContentStreamGuard<'a, S> {
    pub fn new(sink: &'a mut S, stream: StreamHandle) -> Self {
        Self {
            sink,
            stream: Some(stream),
        }
    }

    pub fn submit(&mut self, operation: &figura_canvas::DrawOperation) -> Result<(), RenderError> {
        let stream = self.stream.ok_or(RenderError::Closed)?;
        self.sink.submit(stream, operation)
    }

    pub fn finish(mut self) -> Result<(), RenderError> {
        match self.stream.take() {
            Some(stream) => self.sink.close_content_stream(stream),
            None => Ok(()),
        }
    }
}

impl<S: DocumentSink + ?Sized> Drop for ContentStreamGuard<'_, S> {
    fn drop(&mut self) {
        if let Some(stream) = self.stream.take() {
            log::debug!("Closing content stream {:?} on early exit", stream);
            if let Err(e) = self.sink.close_content_stream(stream) {
                log::error!("Failed to close content stream {:?}: {}", stream, e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::PageHandle;
    use figura_canvas::{DrawOperation, PassMode};
    use figura_types::{Color, Point, Size};
    use std::path::Path;

    /// Records the calls it receives instead of producing a document.
    #[derive(Default)]
    struct RecordingSink {
        calls: Vec<String>,
        fail_submit: bool,
    }

    impl DocumentSink for RecordingSink {
        fn new_page(&mut self, _size: Size) -> Result<PageHandle, RenderError> {
            self.calls.push("new_page".into());
            Ok(PageHandle(0))
        }

        fn open_content_stream(
            &mut self,
            _page: PageHandle,
            mode: PassMode,
        ) -> Result<StreamHandle, RenderError> {
            self.calls.push(format!("open {:?}", mode));
            Ok(StreamHandle(self.calls.len()))
        }

        fn submit(&mut self, _stream: StreamHandle, op: &DrawOperation) -> Result<(), RenderError> {
            if self.fail_submit {
                return Err("submit refused".into());
            }
            self.calls.push(format!("submit {}", op.kind()));
            Ok(())
        }

        fn close_content_stream(&mut self, stream: StreamHandle) -> Result<(), RenderError> {
            self.calls.push(format!("close {}", stream.0));
            Ok(())
        }

        fn save(&mut self, _path: &Path) -> Result<(), RenderError> {
            Ok(())
        }

        fn close(&mut self) -> Result<(), RenderError> {
            Ok(())
        }
    }

    fn text_op() -> DrawOperation {
        DrawOperation::text("hi", Point::new(0.0, 0.0), 12.0, Color::BLACK)
    }

    #[test]
    fn test_finish_closes_stream_once() {
        let mut sink = RecordingSink::default();
        let page = sink.new_page(Size::new(10.0, 10.0)).unwrap();
        let stream = sink.open_content_stream(page, PassMode::Append).unwrap();

        let mut guard = ContentStreamGuard::new(&mut sink, stream);
        guard.submit(&text_op()).unwrap();
        guard.finish().unwrap();

        assert_eq!(sink.calls, vec!["new_page", "open Append", "submit text", "close 2"]);
    }

    #[test]
    fn test_drop_closes_stream_after_error() {
        let mut sink = RecordingSink {
            fail_submit: true,
            ..Default::default()
        };
        let page = sink.new_page(Size::new(10.0, 10.0)).unwrap();
        let stream = sink.open_content_stream(page, PassMode::Overwrite).unwrap();

        let result = (|| -> Result<(), RenderError> {
            let mut guard = ContentStreamGuard::new(&mut sink, stream);
            guard.submit(&text_op())?;
            guard.finish()
        })();

        assert!(result.is_err());
        assert_eq!(sink.calls.last().map(String::as_str), Some("close 2"));
    }
}
