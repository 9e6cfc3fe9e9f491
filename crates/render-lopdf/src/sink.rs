use crate::helpers::{ContentBuilder, PageResources, BASE_FONT};
use figura_canvas::{DrawOperation, PassMode};
use figura_render_core::{DocumentSink, PageHandle, RenderError, StreamHandle};
use figura_types::{ImageHandle, Size};
use lopdf::content::Content;
use lopdf::{dictionary, Document, Object, ObjectId, Stream};
use std::collections::HashMap;
use std::io;
use std::path::Path;

const PDF_VERSION: &str = "1.7";

struct PageEntry {
    id: ObjectId,
    size: Size,
    contents: Vec<ObjectId>,
    resources: PageResources,
}

struct OpenStream {
    page: usize,
    mode: PassMode,
    content: ContentBuilder,
}

/// A [`DocumentSink`] that builds an in-memory lopdf [`Document`].
///
/// Page dictionaries are written at `save` time, once every pass has
/// contributed its resources.
pub struct LopdfSink {
    doc: Option<Document>,
    pages_id: ObjectId,
    font_id: ObjectId,
    pages: Vec<PageEntry>,
    streams: HashMap<usize, OpenStream>,
    next_stream: usize,
    images: Vec<(ImageHandle, ObjectId)>,
}

impl Default for LopdfSink {
    fn default() -> Self {
        Self::new()
    }
}

impl LopdfSink {
    pub fn new() -> Self {
        let mut doc = Document::with_version(PDF_VERSION);
        let pages_id = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => BASE_FONT,
            "Encoding" => "WinAnsiEncoding",
        });

        Self {
            doc: Some(doc),
            pages_id,
            font_id,
            pages: Vec::new(),
            streams: HashMap::new(),
            next_stream: 0,
            images: Vec::new(),
        }
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn open_stream_count(&self) -> usize {
        self.streams.len()
    }

    /// Encodes the document without touching the filesystem.
    pub fn to_bytes(&mut self) -> Result<Vec<u8>, RenderError> {
        self.write_page_tree()?;
        let doc = self.doc.as_mut().ok_or(RenderError::Closed)?;
        let mut buffer = Vec::new();
        doc.save_to(&mut buffer)?;
        Ok(buffer)
    }

    fn doc_mut(&mut self) -> Result<&mut Document, RenderError> {
        self.doc.as_mut().ok_or(RenderError::Closed)
    }

    /// Returns the XObject for `image`, embedding it the first time it is seen.
    fn embed_image(&mut self, image: &ImageHandle) -> Result<ObjectId, RenderError> {
        if let Some((_, id)) = self.images.iter().find(|(known, _)| known.same_pixels(image)) {
            return Ok(*id);
        }

        let pixels = image.image();
        let doc = self.doc_mut()?;
        let mut dict = dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => pixels.width as i64,
            "Height" => pixels.height as i64,
            "ColorSpace" => "DeviceRGB",
            "BitsPerComponent" => 8i64,
        };
        if let Some(alpha) = &pixels.alpha {
            let mask = dictionary! {
                "Type" => "XObject",
                "Subtype" => "Image",
                "Width" => pixels.width as i64,
                "Height" => pixels.height as i64,
                "ColorSpace" => "DeviceGray",
                "BitsPerComponent" => 8i64,
            };
            let mask_id = doc.add_object(Stream::new(mask, alpha.clone()));
            dict.set("SMask", mask_id);
        }
        let id = doc.add_object(Stream::new(dict, pixels.rgb.clone()));

        log::debug!("Embedded image '{}' as object {:?}", image.uri(), id);
        self.images.push((image.clone(), id));
        Ok(id)
    }

    fn write_page_tree(&mut self) -> Result<(), RenderError> {
        let pages_id = self.pages_id;
        let font_id = self.font_id;
        let page_dicts: Vec<(ObjectId, lopdf::Dictionary)> = self
            .pages
            .iter()
            .map(|page| {
                let dict = dictionary! {
                    "Type" => "Page",
                    "Parent" => pages_id,
                    "MediaBox" => vec![Object::Integer(0), Object::Integer(0), page.size.width.into(), page.size.height.into()],
                    "Contents" => page.contents.iter().copied().map(Object::Reference).collect::<Vec<Object>>(),
                    "Resources" => page.resources.to_dictionary(font_id),
                };
                (page.id, dict)
            })
            .collect();
        let kids: Vec<Object> = self.pages.iter().map(|p| Object::Reference(p.id)).collect();
        let count = self.pages.len() as i64;

        let doc = self.doc_mut()?;
        for (id, dict) in page_dicts {
            doc.objects.insert(id, Object::Dictionary(dict));
        }
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count,
            }),
        );
        if doc.trailer.get(b"Root").is_err() {
            let catalog_id = doc.add_object(dictionary! {
                "Type" => "Catalog",
                "Pages" => pages_id,
            });
            doc.trailer.set("Root", catalog_id);
        }
        Ok(())
    }
}

impl DocumentSink for LopdfSink {
    fn new_page(&mut self, size: Size) -> Result<PageHandle, RenderError> {
        let id = self.doc_mut()?.new_object_id();
        self.pages.push(PageEntry {
            id,
            size,
            contents: Vec::new(),
            resources: PageResources::default(),
        });
        log::debug!("Created page {} ({}x{})", self.pages.len(), size.width, size.height);
        Ok(PageHandle(self.pages.len() - 1))
    }

    fn open_content_stream(
        &mut self,
        page: PageHandle,
        mode: PassMode,
    ) -> Result<StreamHandle, RenderError> {
        self.doc_mut()?;
        if page.0 >= self.pages.len() {
            return Err(RenderError::UnknownHandle { kind: "page", id: page.0 });
        }
        let handle = StreamHandle(self.next_stream);
        self.next_stream += 1;
        self.streams.insert(
            handle.0,
            OpenStream {
                page: page.0,
                mode,
                content: ContentBuilder::default(),
            },
        );
        Ok(handle)
    }

    fn submit(&mut self, stream: StreamHandle, operation: &DrawOperation) -> Result<(), RenderError> {
        let page_index = self
            .streams
            .get(&stream.0)
            .map(|open| open.page)
            .ok_or(RenderError::UnknownHandle { kind: "stream", id: stream.0 })?;

        // Embedding needs the document, so resolve the image before borrowing the stream.
        let image_id = match operation {
            DrawOperation::Image { source, .. } => Some(self.embed_image(source)?),
            _ => None,
        };

        let page = &mut self.pages[page_index];
        let open = self
            .streams
            .get_mut(&stream.0)
            .ok_or(RenderError::UnknownHandle { kind: "stream", id: stream.0 })?;
        match operation {
            DrawOperation::Stroke { path, state } => open.content.stroke(path, state, &mut page.resources),
            DrawOperation::Fill { path, state } => open.content.fill(path, state, &mut page.resources),
            DrawOperation::Text { text, position, size, color } => {
                open.content.text(text, *position, *size, *color)
            }
            DrawOperation::Image { position, size, .. } => {
                if let Some(id) = image_id {
                    let name = page.resources.xobject_name(id);
                    open.content.image(name, *position, *size);
                }
            }
        }
        Ok(())
    }

    fn close_content_stream(&mut self, stream: StreamHandle) -> Result<(), RenderError> {
        let open = self
            .streams
            .remove(&stream.0)
            .ok_or(RenderError::UnknownHandle { kind: "stream", id: stream.0 })?;

        let operation_count = open.content.operations.len();
        let bytes = Content { operations: open.content.operations }.encode()?;
        let content_id = self
            .doc_mut()?
            .add_object(Stream::new(dictionary! {}, bytes));

        let page = &mut self.pages[open.page];
        if open.mode == PassMode::Overwrite {
            page.contents.clear();
        }
        page.contents.push(content_id);
        log::debug!(
            "Closed {:?} content stream {} with {} operator(s) on page {}",
            open.mode,
            stream.0,
            operation_count,
            open.page + 1
        );
        Ok(())
    }

    fn save(&mut self, path: &Path) -> Result<(), RenderError> {
        if !self.streams.is_empty() {
            log::warn!("Saving with {} content stream(s) still open; they are not included", self.streams.len());
        }
        let bytes = self.to_bytes()?;
        std::fs::write(path, &bytes).map_err(|e| {
            RenderError::Io(io::Error::new(
                e.kind(),
                format!("Failed to write PDF to '{}': {}", path.display(), e),
            ))
        })?;
        log::info!("Saved {} page(s), {} bytes to {}", self.pages.len(), bytes.len(), path.display());
        Ok(())
    }

    fn close(&mut self) -> Result<(), RenderError> {
        self.doc.take().map(|_| ()).ok_or(RenderError::Closed)?;
        self.streams.clear();
        self.images.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figura_canvas::{FillRule, GraphicsState, Path as CanvasPath};
    use figura_types::{Color, DecodedImage, Point};
    use tempfile::tempdir;

    fn red_line() -> DrawOperation {
        let state = GraphicsState {
            stroke_color: Color::RED,
            line_width: 10.0,
            ..Default::default()
        };
        DrawOperation::stroke(
            CanvasPath::line(Point::new(50.0, 600.0), Point::new(200.0, 600.0)),
            state,
        )
    }

    fn page_operators(doc: &Document) -> Vec<String> {
        let page_id = *doc.get_pages().get(&1).unwrap();
        let bytes = doc.get_page_content(page_id).unwrap();
        Content::decode(&bytes)
            .unwrap()
            .operations
            .into_iter()
            .map(|op| op.operator)
            .collect()
    }

    #[test]
    fn test_save_writes_loadable_pdf() {
        let dir = tempdir().unwrap();
        let out = dir.path().join("out.pdf");

        let mut sink = LopdfSink::new();
        let page = sink.new_page(Size::new(595.0, 842.0)).unwrap();
        let stream = sink.open_content_stream(page, PassMode::Append).unwrap();
        assert_eq!(sink.open_stream_count(), 1);
        sink.submit(stream, &red_line()).unwrap();
        sink.close_content_stream(stream).unwrap();
        assert_eq!(sink.open_stream_count(), 0);
        assert_eq!(sink.page_count(), 1);
        sink.save(&out).unwrap();
        sink.close().unwrap();

        let doc = Document::load(&out).unwrap();
        assert_eq!(doc.get_pages().len(), 1);
        let ops = page_operators(&doc);
        assert!(ops.iter().any(|op| op == "S"));
        assert!(ops.iter().any(|op| op == "RG"));
    }

    #[test]
    fn test_overwrite_replaces_existing_contents() {
        let mut sink = LopdfSink::new();
        let page = sink.new_page(Size::new(100.0, 100.0)).unwrap();

        let first = sink.open_content_stream(page, PassMode::Append).unwrap();
        sink.submit(first, &red_line()).unwrap();
        sink.close_content_stream(first).unwrap();

        let second = sink.open_content_stream(page, PassMode::Overwrite).unwrap();
        let fill = DrawOperation::fill(
            CanvasPath::rect(0.0, 0.0, 100.0, 100.0),
            GraphicsState { fill_color: Color::gray(220), fill_rule: FillRule::NonZero, ..Default::default() },
        );
        sink.submit(second, &fill).unwrap();
        sink.close_content_stream(second).unwrap();

        let doc = Document::load_mem(&sink.to_bytes().unwrap()).unwrap();
        let ops = page_operators(&doc);
        assert!(ops.iter().any(|op| op == "f"));
        assert!(!ops.iter().any(|op| op == "S"));
    }

    #[test]
    fn test_images_are_embedded_once() {
        let mut sink = LopdfSink::new();
        let page = sink.new_page(Size::new(100.0, 100.0)).unwrap();
        let image = ImageHandle::new(
            "example.png",
            DecodedImage { width: 1, height: 1, rgb: vec![0, 0, 255], alpha: Some(vec![128]) },
        );
        let stream = sink.open_content_stream(page, PassMode::Append).unwrap();
        for x in [0.0, 50.0] {
            let op = DrawOperation::image(image.clone(), Point::new(x, 0.0), Size::new(10.0, 10.0));
            sink.submit(stream, &op).unwrap();
        }
        sink.close_content_stream(stream).unwrap();

        assert_eq!(sink.images.len(), 1);
        let doc = Document::load_mem(&sink.to_bytes().unwrap()).unwrap();
        let ops = page_operators(&doc);
        assert_eq!(ops.iter().filter(|op| *op == "Do").count(), 2);
    }

    #[test]
    fn test_unknown_and_closed_handles() {
        let mut sink = LopdfSink::new();
        assert!(matches!(
            sink.open_content_stream(PageHandle(3), PassMode::Append),
            Err(RenderError::UnknownHandle { kind: "page", .. })
        ));

        let page = sink.new_page(Size::new(10.0, 10.0)).unwrap();
        let stream = sink.open_content_stream(page, PassMode::Append).unwrap();
        sink.close_content_stream(stream).unwrap();
        assert!(sink.close_content_stream(stream).is_err());
        assert!(sink.submit(stream, &red_line()).is_err());

        sink.close().unwrap();
        assert!(matches!(sink.new_page(Size::new(1.0, 1.0)), Err(RenderError::Closed)));
        assert!(matches!(sink.close(), Err(RenderError::Closed)));
    }

    #[test]
    fn test_save_to_missing_directory_is_io_error() {
        let dir = tempdir().unwrap();
        let out = dir.path().join("no/such/dir/out.pdf");
        let mut sink = LopdfSink::new();
        sink.new_page(Size::new(10.0, 10.0)).unwrap();

        let err = sink.save(&out).unwrap_err();
        assert!(matches!(err, RenderError::Io(_)));
        assert!(err.to_string().contains("out.pdf"));
    }
}
