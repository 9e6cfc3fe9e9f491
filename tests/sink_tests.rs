mod common;

use common::{init_logging, TestResult};
use figura::canvas::{DrawOperation, PassMode, Path};
use figura::render::{DocumentSink, PageHandle, RenderError, StreamHandle};
use figura::types::{Color, PageSize, Point, Size};
use figura::{submit_page, ComposeError, ComposerConfig, PageComposer, PageDraft};
use figura_resource::DecodingImageSource;
use figura_traits::InMemoryResourceProvider;
use std::path::Path as FsPath;

/// Records every call and refuses the operation with index `fail_at`.
#[derive(Default)]
struct ScriptedSink {
    fail_at: Option<usize>,
    submitted: usize,
    opened: Vec<(StreamHandle, PassMode)>,
    closed: Vec<StreamHandle>,
    saved: bool,
    fail_save: bool,
    document_closed: bool,
}

impl DocumentSink for ScriptedSink {
    fn new_page(&mut self, _size: Size) -> Result<PageHandle, RenderError> {
        Ok(PageHandle(0))
    }

    fn open_content_stream(&mut self, _page: PageHandle, mode: PassMode) -> Result<StreamHandle, RenderError> {
        let handle = StreamHandle(self.opened.len());
        self.opened.push((handle, mode));
        Ok(handle)
    }

    fn submit(&mut self, _stream: StreamHandle, _operation: &DrawOperation) -> Result<(), RenderError> {
        if self.fail_at == Some(self.submitted) {
            return Err(RenderError::Other("refused".to_string()));
        }
        self.submitted += 1;
        Ok(())
    }

    fn close_content_stream(&mut self, stream: StreamHandle) -> Result<(), RenderError> {
        self.closed.push(stream);
        Ok(())
    }

    fn save(&mut self, _path: &FsPath) -> Result<(), RenderError> {
        if self.fail_save {
            return Err(RenderError::Io(std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                "read-only target",
            )));
        }
        self.saved = true;
        Ok(())
    }

    fn close(&mut self) -> Result<(), RenderError> {
        self.document_closed = true;
        Ok(())
    }
}

#[test]
fn test_passes_map_to_streams_in_order() -> TestResult {
    init_logging();
    let mut sink = ScriptedSink::default();
    let composer = PageComposer::new(ComposerConfig::default())
        .with_image_source(DecodingImageSource::new(InMemoryResourceProvider::new()));

    let report = composer.compose_into(&mut sink)?;

    assert_eq!(
        sink.opened.iter().map(|(_, mode)| *mode).collect::<Vec<_>>(),
        vec![PassMode::Overwrite, PassMode::Append]
    );
    assert_eq!(sink.closed, vec![StreamHandle(0), StreamHandle(1)]);
    assert_eq!(sink.submitted, report.page.operation_count());
    assert!(sink.saved);
    Ok(())
}

#[test]
fn test_failed_submit_still_closes_stream() {
    init_logging();
    let images = DecodingImageSource::new(InMemoryResourceProvider::new());
    let mut draft = PageDraft::new(PageSize::A4.size(), &images);
    draft.begin_pass(PassMode::Append).unwrap();
    draft.stroke(Path::line(Point::new(0.0, 0.0), Point::new(10.0, 0.0))).unwrap();
    draft.text("after", Point::new(10.0, 10.0), 12.0, Color::BLACK).unwrap();
    let page = draft.finish().unwrap().page;

    let mut sink = ScriptedSink { fail_at: Some(1), ..Default::default() };
    let err = submit_page(&page, &mut sink).unwrap_err();

    assert!(matches!(err, ComposeError::Render(RenderError::Other(_))));
    assert_eq!(sink.closed, vec![StreamHandle(0)]);
    assert!(!sink.saved);
}

#[test]
fn test_failed_save_still_closes_document() {
    init_logging();
    let mut sink = ScriptedSink { fail_save: true, ..Default::default() };
    let composer = PageComposer::new(ComposerConfig::default())
        .with_image_source(DecodingImageSource::new(InMemoryResourceProvider::new()));

    let err = composer.compose_into(&mut sink).unwrap_err();

    assert!(err.is_sink_io());
    assert!(!sink.saved);
    assert!(sink.document_closed);
}

#[test]
fn test_failed_submit_during_compose_closes_document() {
    init_logging();
    let mut sink = ScriptedSink { fail_at: Some(0), ..Default::default() };
    let composer = PageComposer::new(ComposerConfig::default())
        .with_image_source(DecodingImageSource::new(InMemoryResourceProvider::new()));

    let err = composer.compose_into(&mut sink).unwrap_err();

    assert!(matches!(err, ComposeError::Render(RenderError::Other(_))));
    assert_eq!(sink.closed, vec![StreamHandle(0)]);
    assert!(!sink.saved);
    assert!(sink.document_closed);
}
