//! Page composition: turns a [`ComposerConfig`] into a layered [`Page`] and
//! hands it to a [`DocumentSink`].

use crate::config::{ComposerConfig, FigureStyle, Scene};
use crate::error::ComposeError;
use figura_canvas::{
    validate_placement, DrawOperation, FillRule, GraphicsState, GraphicsStateManager,
    GraphicsStateUpdate, LayerCompositor, LineCap, Page, PassHandle, PassMode, Path, PathBuilder,
};
use figura_curves::CurveKind;
use figura_render_core::{ContentStreamGuard, DocumentSink, PageHandle};
use figura_render_lopdf::LopdfSink;
use figura_resource::{DecodingImageSource, FilesystemResourceProvider};
use figura_traits::{ImageSource, ResourceError};
use figura_types::{Color, Point, Size};
use std::path::PathBuf;

/// A resource the page refers to but that could not be found. The page is
/// composed without it.
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedResource {
    pub uri: String,
    pub reason: ResourceError,
}

/// The composed page plus whatever had to be left out of it.
#[derive(Debug, Clone)]
pub struct ComposedPage {
    pub page: Page,
    pub skipped: Vec<SkippedResource>,
}

/// Outcome of a successful run.
#[derive(Debug, Clone)]
pub struct ComposeReport {
    pub page: Page,
    pub skipped: Vec<SkippedResource>,
    pub output: PathBuf,
}

/// A page under construction.
///
/// Drawing calls take a snapshot of the current graphics state and emit it
/// into the open pass. When no pass is open an `Append` pass is started.
pub struct PageDraft<'a> {
    size: Size,
    layers: LayerCompositor,
    state: GraphicsStateManager,
    images: &'a dyn ImageSource,
    open: Option<PassHandle>,
    skipped: Vec<SkippedResource>,
}

impl<'a> PageDraft<'a> {
    pub fn new(size: Size, images: &'a dyn ImageSource) -> Self {
        Self {
            size,
            layers: LayerCompositor::new(),
            state: GraphicsStateManager::new(),
            images,
            open: None,
            skipped: Vec::new(),
        }
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn state(&self) -> GraphicsState {
        self.state.current()
    }

    pub fn update_state(&mut self, update: GraphicsStateUpdate) -> Result<GraphicsState, ComposeError> {
        Ok(self.state.apply(update)?)
    }

    /// Ends the open pass, if any, and starts a new one.
    pub fn begin_pass(&mut self, mode: PassMode) -> Result<(), ComposeError> {
        self.end_pass()?;
        self.open = Some(self.layers.begin_pass(mode)?);
        Ok(())
    }

    pub fn end_pass(&mut self) -> Result<(), ComposeError> {
        if let Some(handle) = self.open.take() {
            self.layers.end_pass(handle)?;
        }
        Ok(())
    }

    fn emit(&mut self, operation: DrawOperation) -> Result<(), ComposeError> {
        if self.open.is_none() {
            self.begin_pass(PassMode::Append)?;
        }
        if let Some(handle) = &self.open {
            self.layers.emit(handle, operation)?;
        }
        Ok(())
    }

    pub fn stroke(&mut self, path: Path) -> Result<(), ComposeError> {
        let state = self.state.current();
        self.emit(DrawOperation::stroke(path, state))
    }

    pub fn fill(&mut self, path: Path) -> Result<(), ComposeError> {
        let state = self.state.current();
        self.emit(DrawOperation::fill(path, state))
    }

    pub fn text(&mut self, text: &str, position: Point, size: f32, color: Color) -> Result<(), ComposeError> {
        self.emit(DrawOperation::text(text, position, size, color))
    }

    /// Fills the whole page with `color` in an `Overwrite` pass of its own.
    pub fn background(&mut self, color: Color) -> Result<(), ComposeError> {
        self.begin_pass(PassMode::Overwrite)?;
        self.update_state(GraphicsStateUpdate::new().with_fill_color(color))?;
        self.fill(Path::rect(0.0, 0.0, self.size.width, self.size.height))?;
        self.end_pass()
    }

    /// Places the image at `uri` with its bottom-left corner at `position`.
    ///
    /// Returns `false` and records a [`SkippedResource`] when the image does
    /// not exist. Any other load failure is an error.
    pub fn image(&mut self, uri: &str, position: Point, size: Size) -> Result<bool, ComposeError> {
        validate_placement(position, size)?;
        match self.images.load_image(uri) {
            Ok(handle) => {
                self.emit(DrawOperation::image(handle, position, size))?;
                Ok(true)
            }
            Err(reason) if reason.is_not_found() => {
                log::warn!("Image '{}' not found, leaving it out of the page", uri);
                self.skipped.push(SkippedResource {
                    uri: uri.to_string(),
                    reason,
                });
                Ok(false)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Strokes a straight line with full opacity.
    pub fn opaque_line(&mut self, from: Point, to: Point, color: Color, width: f32) -> Result<(), ComposeError> {
        self.update_state(
            GraphicsStateUpdate::new()
                .with_stroke_color(color)
                .with_line_width(width)
                .with_stroke_alpha(1.0),
        )?;
        self.stroke(Path::line(from, to))
    }

    /// Strokes a straight line with round end caps.
    pub fn rounded_line(&mut self, from: Point, to: Point, color: Color, width: f32) -> Result<(), ComposeError> {
        self.update_state(
            GraphicsStateUpdate::new()
                .with_stroke_color(color)
                .with_line_width(width)
                .with_line_cap(LineCap::Round),
        )?;
        self.stroke(Path::line(from, to))
    }

    /// Fills a square hanging down and right from `anchor`, with a square hole
    /// inset by `inset` on every side.
    pub fn square_with_hole(&mut self, anchor: Point, side: f32, inset: f32, color: Color) -> Result<(), ComposeError> {
        let inner = side - inset;
        let mut builder = PathBuilder::new();
        builder
            .polygon(&[
                anchor,
                anchor.offset(side, 0.0),
                anchor.offset(side, -side),
                anchor.offset(0.0, -side),
            ])?
            .polygon(&[
                anchor.offset(inset, -inset),
                anchor.offset(inner, -inset),
                anchor.offset(inner, -inner),
                anchor.offset(inset, -inner),
            ])?;

        self.update_state(
            GraphicsStateUpdate::new()
                .with_fill_color(color)
                .with_fill_rule(FillRule::EvenOdd),
        )?;
        self.fill(builder.build())
    }

    /// Strokes a lemniscate centred on `center` as `segments` straight pieces.
    pub fn lemniscate(&mut self, center: Point, style: &FigureStyle, segments: usize) -> Result<(), ComposeError> {
        let points = figura_curves::samples(CurveKind::Lemniscate, style.width, style.height, center, segments)?;

        let mut update = GraphicsStateUpdate::new()
            .with_stroke_color(style.color)
            .with_line_width(style.line_width)
            .with_stroke_alpha(style.stroke_alpha);
        if let Some(alpha) = style.fill_alpha {
            update = update.with_fill_alpha(alpha);
        }
        if let Some(mode) = style.blend_mode {
            update = update.with_blend_mode(mode);
        }
        self.update_state(update)?;

        let mut builder = PathBuilder::new();
        builder.polyline(points)?;
        self.stroke(builder.build())
    }

    /// Closes the open pass and assembles the page.
    pub fn finish(mut self) -> Result<ComposedPage, ComposeError> {
        self.end_pass()?;
        let page = self.layers.finish(self.size);
        Ok(ComposedPage {
            page,
            skipped: self.skipped,
        })
    }
}

/// Builds pages from a [`ComposerConfig`] and writes them out.
pub struct PageComposer {
    config: ComposerConfig,
    images: Box<dyn ImageSource>,
}

impl PageComposer {
    /// Images are read from the filesystem, relative to `config.resource_base`.
    pub fn new(config: ComposerConfig) -> Self {
        let provider = FilesystemResourceProvider::new(&config.resource_base);
        Self {
            images: Box::new(DecodingImageSource::new(provider)),
            config,
        }
    }

    pub fn with_image_source<I: ImageSource + 'static>(mut self, images: I) -> Self {
        self.images = Box::new(images);
        self
    }

    pub fn config(&self) -> &ComposerConfig {
        &self.config
    }

    /// Builds the configured scene without touching any document.
    pub fn compose(&self) -> Result<ComposedPage, ComposeError> {
        self.config.validate()?;
        let mut draft = PageDraft::new(self.config.page_dimensions(), self.images.as_ref());

        if let Some(color) = self.config.background_color() {
            draft.background(color)?;
        }
        draft.begin_pass(PassMode::Append)?;
        match self.config.scene {
            Scene::Canvas => self.draw_canvas(&mut draft)?,
            Scene::Figure8 => self.draw_figures(&mut draft)?,
        }

        let composed = draft.finish()?;
        log::debug!(
            "Composed {:?} scene: {} pass(es), {} operation(s), {} skipped resource(s)",
            self.config.scene,
            composed.page.passes.len(),
            composed.page.operation_count(),
            composed.skipped.len()
        );
        Ok(composed)
    }

    fn draw_canvas(&self, draft: &mut PageDraft<'_>) -> Result<(), ComposeError> {
        draft.image(&self.config.image, Point::new(50.0, 700.0), Size::new(100.0, 100.0))?;
        draft.text("Hello PDFBox!", Point::new(50.0, 650.0), 24.0, Color::BLACK)?;
        draft.opaque_line(Point::new(50.0, 600.0), Point::new(200.0, 600.0), Color::RED, 10.0)?;
        draft.square_with_hole(Point::new(300.0, 500.0), 100.0, 30.0, Color::GREEN)?;
        draft.rounded_line(Point::new(50.0, 450.0), Point::new(250.0, 450.0), Color::BLUE, 15.0)?;
        self.draw_figures(draft)
    }

    fn draw_figures(&self, draft: &mut PageDraft<'_>) -> Result<(), ComposeError> {
        let style = self.config.figure_style();
        for center in self.config.figure_centers() {
            draft.lemniscate(center, &style, self.config.segments)?;
        }
        Ok(())
    }

    /// Composes the page, submits it to `sink`, then saves and closes the document.
    pub fn compose_into<S: DocumentSink + ?Sized>(&self, sink: &mut S) -> Result<ComposeReport, ComposeError> {
        let ComposedPage { page, skipped } = self.compose()?;
        let output = self.config.output_path();

        let written = submit_page(&page, sink).and_then(|_| Ok(sink.save(&output)?));
        if let Err(e) = written {
            // The partly written document is discarded.
            if let Err(close_err) = sink.close() {
                log::warn!("Failed to discard document after error: {}", close_err);
            }
            return Err(e);
        }
        sink.close()?;
        log::info!("Wrote {:?} scene to {}", self.config.scene, output.display());

        Ok(ComposeReport { page, skipped, output })
    }

    /// Composes into a fresh [`LopdfSink`].
    pub fn run(&self) -> Result<ComposeReport, ComposeError> {
        let mut sink = LopdfSink::new();
        self.compose_into(&mut sink)
    }
}

/// Replays a page onto a sink, one content stream per pass.
///
/// Each stream is held by a [`ContentStreamGuard`], so a failing operation
/// still closes it before the error is returned.
pub fn submit_page<S: DocumentSink + ?Sized>(page: &Page, sink: &mut S) -> Result<PageHandle, ComposeError> {
    let handle = sink.new_page(page.size)?;
    for (index, pass) in page.passes.iter().enumerate() {
        let stream = sink.open_content_stream(handle, pass.mode)?;
        let mut guard = ContentStreamGuard::new(&mut *sink, stream);
        for operation in &pass.operations {
            guard.submit(operation)?;
        }
        guard.finish()?;
        log::debug!("Submitted pass {} ({:?}, {} operation(s))", index, pass.mode, pass.len());
    }
    Ok(handle)
}
