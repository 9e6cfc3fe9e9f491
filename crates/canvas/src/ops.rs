use crate::error::CanvasError;
use crate::path::Path;
use crate::state::GraphicsState;
use figura_types::{Color, ImageHandle, Point, Size};

/// One immutable drawing step, in the order it was issued.
///
/// Path operations carry a copy of the graphics state that was active when
/// they were emitted.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOperation {
    Stroke {
        path: Path,
        state: GraphicsState,
    },
    Fill {
        path: Path,
        state: GraphicsState,
    },
    Text {
        text: String,
        position: Point,
        size: f32,
        color: Color,
    },
    Image {
        source: ImageHandle,
        position: Point,
        size: Size,
    },
}

impl DrawOperation {
    pub fn stroke(path: Path, state: GraphicsState) -> Self {
        DrawOperation::Stroke { path, state }
    }

    pub fn fill(path: Path, state: GraphicsState) -> Self {
        DrawOperation::Fill { path, state }
    }

    pub fn text(text: impl Into<String>, position: Point, size: f32, color: Color) -> Self {
        DrawOperation::Text {
            text: text.into(),
            position,
            size,
            color,
        }
    }

    pub fn image(source: ImageHandle, position: Point, size: Size) -> Self {
        DrawOperation::Image { source, position, size }
    }

    /// The graphics state snapshot of a stroke or fill.
    pub fn state(&self) -> Option<&GraphicsState> {
        match self {
            DrawOperation::Stroke { state, .. } | DrawOperation::Fill { state, .. } => Some(state),
            DrawOperation::Text { .. } | DrawOperation::Image { .. } => None,
        }
    }

    /// Rejects non-finite geometry and non-positive text or image sizes.
    pub fn validate(&self) -> Result<(), CanvasError> {
        match self {
            DrawOperation::Stroke { path, .. } | DrawOperation::Fill { path, .. } => path.validate(),
            DrawOperation::Text { position, size, .. } => {
                check_position("text", *position)?;
                check_dimension("font size", *size)
            }
            DrawOperation::Image { position, size, .. } => validate_placement(*position, *size),
        }
    }

    /// Short name used in log output.
    pub fn kind(&self) -> &'static str {
        match self {
            DrawOperation::Stroke { .. } => "stroke",
            DrawOperation::Fill { .. } => "fill",
            DrawOperation::Text { .. } => "text",
            DrawOperation::Image { .. } => "image",
        }
    }
}

/// Checks where and how large an image will be drawn, before it is loaded.
pub fn validate_placement(position: Point, size: Size) -> Result<(), CanvasError> {
    check_position("image", position)?;
    check_dimension("image width", size.width)?;
    check_dimension("image height", size.height)
}

fn check_position(command: &'static str, position: Point) -> Result<(), CanvasError> {
    if position.is_finite() {
        Ok(())
    } else {
        Err(CanvasError::InvalidPoint {
            command,
            x: position.x,
            y: position.y,
        })
    }
}

fn check_dimension(what: &'static str, value: f32) -> Result<(), CanvasError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(CanvasError::InvalidDimension { what, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figura_types::{DecodedImage, ImageHandle};

    fn pixel() -> ImageHandle {
        ImageHandle::new(
            "pixel.png",
            DecodedImage {
                width: 1,
                height: 1,
                rgb: vec![0, 0, 0],
                alpha: None,
            },
        )
    }

    #[test]
    fn test_text_size_must_be_positive() {
        let origin = Point::new(50.0, 650.0);
        assert!(DrawOperation::text("ok", origin, 24.0, Color::BLACK).validate().is_ok());
        for size in [0.0, -5.0, f32::NAN, f32::INFINITY] {
            let err = DrawOperation::text("bad", origin, size, Color::BLACK).validate().unwrap_err();
            assert!(matches!(err, CanvasError::InvalidDimension { what: "font size", .. }));
        }
        let nowhere = DrawOperation::text("bad", Point::new(f32::NAN, 0.0), 12.0, Color::BLACK);
        assert!(matches!(nowhere.validate(), Err(CanvasError::InvalidPoint { command: "text", .. })));
    }

    #[test]
    fn test_image_placement_checks() {
        let at = Point::new(50.0, 700.0);
        assert!(DrawOperation::image(pixel(), at, Size::new(100.0, 100.0)).validate().is_ok());
        assert!(validate_placement(at, Size::new(100.0, -1.0)).is_err());
        assert!(validate_placement(at, Size::new(f32::INFINITY, 10.0)).is_err());
        assert!(validate_placement(Point::new(0.0, f32::NEG_INFINITY), Size::new(1.0, 1.0)).is_err());
    }

    #[test]
    fn test_path_operations_check_coordinates() {
        let bad = Path::line(Point::new(f32::NAN, 0.0), Point::new(10.0, f32::INFINITY));
        let state = crate::state::GraphicsState::default();
        assert!(DrawOperation::stroke(bad.clone(), state).validate().is_err());
        assert!(DrawOperation::fill(bad, state).validate().is_err());
    }
}
