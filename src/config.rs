use crate::error::ComposeError;
use figura_canvas::BlendMode;
use figura_curves::DEFAULT_SEGMENTS;
use figura_types::{Color, PageSize, Point, Size};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// The page layouts the composer knows how to build.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Scene {
    /// Background, image, text and a handful of shapes, finished with two figure-eights.
    #[default]
    Canvas,
    /// A single translucent figure-eight centred on an otherwise empty page.
    Figure8,
}

impl Scene {
    pub fn default_output(self) -> &'static str {
        match self {
            Scene::Canvas => "canvas_output.pdf",
            Scene::Figure8 => "figure8.pdf",
        }
    }

    pub fn default_background(self) -> Option<Color> {
        match self {
            Scene::Canvas => Some(Color::gray(220)),
            Scene::Figure8 => None,
        }
    }

    pub fn default_figure(self) -> FigureStyle {
        match self {
            Scene::Canvas => FigureStyle {
                width: 100.0,
                height: 300.0,
                line_width: 5.0,
                stroke_alpha: 0.5,
                fill_alpha: None,
                blend_mode: None,
                color: Color::BLUE,
            },
            Scene::Figure8 => FigureStyle {
                width: 200.0,
                height: 400.0,
                line_width: 4.0,
                stroke_alpha: 0.7,
                fill_alpha: Some(0.7),
                blend_mode: Some(BlendMode::Normal),
                color: Color::BLUE,
            },
        }
    }
}

impl std::str::FromStr for Scene {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "canvas" => Ok(Scene::Canvas),
            "figure8" | "figure-8" => Ok(Scene::Figure8),
            other => Err(format!("unknown scene '{}' (expected canvas or figure8)", other)),
        }
    }
}

/// Size and paint of the lemniscate strokes.
///
/// `fill_alpha` and `blend_mode` are left untouched on the graphics state when `None`.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FigureStyle {
    pub width: f32,
    pub height: f32,
    pub line_width: f32,
    pub stroke_alpha: f32,
    #[serde(default)]
    pub fill_alpha: Option<f32>,
    #[serde(default)]
    pub blend_mode: Option<BlendMode>,
    pub color: Color,
}

/// Everything a composition run needs, gathered up front.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ComposerConfig {
    pub scene: Scene,
    /// Output path; the scene's default file name when unset.
    pub output: Option<PathBuf>,
    pub page_size: PageSize,
    /// Directory relative image paths are resolved against.
    pub resource_base: PathBuf,
    pub image: String,
    /// Background colour; the scene's default when unset.
    pub background: Option<Color>,
    pub no_background: bool,
    pub segments: usize,
    /// Figure-eight styling; the scene's default when unset.
    pub figure: Option<FigureStyle>,
}

impl Default for ComposerConfig {
    fn default() -> Self {
        Self {
            scene: Scene::default(),
            output: None,
            page_size: PageSize::A4,
            resource_base: PathBuf::from("."),
            image: "example.png".to_string(),
            background: None,
            no_background: false,
            segments: DEFAULT_SEGMENTS,
            figure: None,
        }
    }
}

impl ComposerConfig {
    pub fn new(scene: Scene) -> Self {
        Self { scene, ..Default::default() }
    }

    pub fn from_json(json: &str) -> Result<Self, ComposeError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, ComposeError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path)
            .map_err(|e| ComposeError::Config(format!("cannot read {}: {}", path.display(), e)))?;
        Self::from_json(&json)
    }

    pub fn with_scene(mut self, scene: Scene) -> Self { self.scene = scene; self }

    pub fn with_output<P: Into<PathBuf>>(mut self, path: P) -> Self { self.output = Some(path.into()); self }

    pub fn with_page_size(mut self, size: PageSize) -> Self { self.page_size = size; self }

    pub fn with_resource_base<P: Into<PathBuf>>(mut self, base: P) -> Self { self.resource_base = base.into(); self }

    pub fn with_image(mut self, uri: impl Into<String>) -> Self { self.image = uri.into(); self }

    pub fn with_background(mut self, color: Option<Color>) -> Self {
        self.no_background = color.is_none();
        self.background = color;
        self
    }

    pub fn with_segments(mut self, segments: usize) -> Self { self.segments = segments; self }

    pub fn with_figure(mut self, style: FigureStyle) -> Self { self.figure = Some(style); self }

    pub fn output_path(&self) -> PathBuf {
        self.output
            .clone()
            .unwrap_or_else(|| PathBuf::from(self.scene.default_output()))
    }

    pub fn background_color(&self) -> Option<Color> {
        if self.no_background {
            None
        } else {
            self.background.or_else(|| self.scene.default_background())
        }
    }

    pub fn figure_style(&self) -> FigureStyle {
        self.figure.unwrap_or_else(|| self.scene.default_figure())
    }

    pub fn page_dimensions(&self) -> Size {
        self.page_size.size()
    }

    /// Centres of the figure-eights the scene draws.
    pub fn figure_centers(&self) -> Vec<Point> {
        match self.scene {
            Scene::Canvas => vec![Point::new(500.0, 500.0), Point::new(490.0, 500.0)],
            Scene::Figure8 => vec![self.page_dimensions().center()],
        }
    }

    /// Checks the values that are not validated by the component that uses them.
    pub fn validate(&self) -> Result<(), ComposeError> {
        let size = self.page_dimensions();
        if !size.is_positive() {
            return Err(ComposeError::Config(format!(
                "page size must be positive, got {}x{}",
                size.width, size.height
            )));
        }
        if self.image.trim().is_empty() && self.scene == Scene::Canvas {
            return Err(ComposeError::Config("image path must not be empty".to_string()));
        }
        Ok(())
    }
}
