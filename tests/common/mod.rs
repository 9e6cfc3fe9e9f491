#![allow(dead_code)]

use figura::{ComposeReport, ComposerConfig, PageComposer};
use lopdf::Document as LopdfDocument;
use lopdf::content::{Content, Operation};
use std::path::{Path, PathBuf};

pub type TestResult = Result<(), Box<dyn std::error::Error>>;

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// A PDF read back from disk, with helpers for looking at its first page.
pub struct GeneratedPdf {
    pub bytes: Vec<u8>,
    pub doc: LopdfDocument,
}

impl GeneratedPdf {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, Box<dyn std::error::Error>> {
        let bytes = std::fs::read(path)?;
        let doc = LopdfDocument::load_mem(&bytes)?;
        Ok(Self { bytes, doc })
    }

    pub fn page_count(&self) -> usize {
        self.doc.get_pages().len()
    }

    fn first_page(&self) -> Result<lopdf::ObjectId, Box<dyn std::error::Error>> {
        self.doc
            .get_pages()
            .get(&1)
            .copied()
            .ok_or_else(|| "document has no pages".into())
    }

    /// Width and height from the first page's `/MediaBox`.
    pub fn page_size(&self) -> Result<(f32, f32), Box<dyn std::error::Error>> {
        let page = self.doc.get_dictionary(self.first_page()?)?;
        let media_box = page.get(b"MediaBox")?.as_array()?;
        Ok((media_box[2].as_float()?, media_box[3].as_float()?))
    }

    /// Number of content streams attached to the first page.
    pub fn content_stream_count(&self) -> Result<usize, Box<dyn std::error::Error>> {
        let page = self.doc.get_dictionary(self.first_page()?)?;
        Ok(page.get(b"Contents")?.as_array()?.len())
    }

    /// Every operator on the first page, content streams concatenated in order.
    pub fn operations(&self) -> Result<Vec<Operation>, Box<dyn std::error::Error>> {
        let bytes = self.doc.get_page_content(self.first_page()?)?;
        Ok(Content::decode(&bytes)?.operations)
    }

    pub fn count_operator(&self, operator: &str) -> usize {
        self.operations()
            .map(|ops| ops.iter().filter(|op| op.operator == operator).count())
            .unwrap_or(0)
    }

    /// Save PDF to a file for manual debugging
    pub fn save_for_debug(&self, name: &str) -> std::io::Result<()> {
        std::fs::write(format!("test_output_{}.pdf", name), &self.bytes)
    }
}

/// Writes a solid-colour PNG to `dir/name` and returns its path.
pub fn write_png(dir: &Path, name: &str, width: u32, height: u32, rgb: [u8; 3]) -> PathBuf {
    let path = dir.join(name);
    image::RgbImage::from_pixel(width, height, image::Rgb(rgb))
        .save(&path)
        .unwrap();
    path
}

/// Runs the composer with resources and output inside `dir`, then loads the result.
pub fn compose_in(
    dir: &Path,
    config: ComposerConfig,
) -> Result<(ComposeReport, GeneratedPdf), Box<dyn std::error::Error>> {
    let mut config = config.with_resource_base(dir);
    if config.output.is_none() {
        let output = dir.join(config.scene.default_output());
        config = config.with_output(output);
    }
    let report = PageComposer::new(config).run()?;
    let pdf = GeneratedPdf::load(&report.output)?;
    Ok((report, pdf))
}
