use crate::error::CanvasError;
use figura_types::Color;
use serde::{Deserialize, Serialize};

/// Pixel compositing function used when an operation is painted over existing content.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum BlendMode {
    #[default]
    Normal,
    Multiply,
    Screen,
    Overlay,
    Darken,
    Lighten,
    ColorDodge,
    ColorBurn,
    HardLight,
    SoftLight,
    Difference,
    Exclusion,
    Hue,
    Saturation,
    Color,
    Luminosity,
}

impl BlendMode {
    /// The name used for this mode in a PDF `/BM` entry.
    pub fn pdf_name(self) -> &'static str {
        match self {
            BlendMode::Normal => "Normal",
            BlendMode::Multiply => "Multiply",
            BlendMode::Screen => "Screen",
            BlendMode::Overlay => "Overlay",
            BlendMode::Darken => "Darken",
            BlendMode::Lighten => "Lighten",
            BlendMode::ColorDodge => "ColorDodge",
            BlendMode::ColorBurn => "ColorBurn",
            BlendMode::HardLight => "HardLight",
            BlendMode::SoftLight => "SoftLight",
            BlendMode::Difference => "Difference",
            BlendMode::Exclusion => "Exclusion",
            BlendMode::Hue => "Hue",
            BlendMode::Saturation => "Saturation",
            BlendMode::Color => "Color",
            BlendMode::Luminosity => "Luminosity",
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum LineCap {
    #[default]
    Butt,
    Round,
    Square,
}

impl LineCap {
    /// Operand of the PDF `J` operator.
    pub fn pdf_code(self) -> i64 {
        match self {
            LineCap::Butt => 0,
            LineCap::Round => 1,
            LineCap::Square => 2,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum FillRule {
    #[default]
    NonZero,
    EvenOdd,
}

/// An immutable snapshot of every attribute that affects how a path is painted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GraphicsState {
    pub stroke_color: Color,
    pub fill_color: Color,
    pub line_width: f32,
    pub stroke_alpha: f32,
    pub fill_alpha: f32,
    pub blend_mode: BlendMode,
    pub line_cap: LineCap,
    pub fill_rule: FillRule,
}

impl Default for GraphicsState {
    fn default() -> Self {
        Self {
            stroke_color: Color::BLACK,
            fill_color: Color::BLACK,
            line_width: 1.0,
            stroke_alpha: 1.0,
            fill_alpha: 1.0,
            blend_mode: BlendMode::Normal,
            line_cap: LineCap::Butt,
            fill_rule: FillRule::NonZero,
        }
    }
}

/// A partial graphics state. Unset fields keep their current value when applied.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct GraphicsStateUpdate {
    pub stroke_color: Option<Color>,
    pub fill_color: Option<Color>,
    pub line_width: Option<f32>,
    pub stroke_alpha: Option<f32>,
    pub fill_alpha: Option<f32>,
    pub blend_mode: Option<BlendMode>,
    pub line_cap: Option<LineCap>,
    pub fill_rule: Option<FillRule>,
}

impl GraphicsStateUpdate {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn with_stroke_color(mut self, color: Color) -> Self {
        self.stroke_color = Some(color);
        self
    }

    pub fn with_fill_color(mut self, color: Color) -> Self {
        self.fill_color = Some(color);
        self
    }

    pub fn with_line_width(mut self, width: f32) -> Self {
        self.line_width = Some(width);
        self
    }

    pub fn with_stroke_alpha(mut self, alpha: f32) -> Self {
        self.stroke_alpha = Some(alpha);
        self
    }

    pub fn with_fill_alpha(mut self, alpha: f32) -> Self {
        self.fill_alpha = Some(alpha);
        self
    }

    /// Sets stroke and fill alpha together.
    pub fn with_alpha(self, alpha: f32) -> Self {
        self.with_stroke_alpha(alpha).with_fill_alpha(alpha)
    }

    pub fn with_blend_mode(mut self, mode: BlendMode) -> Self {
        self.blend_mode = Some(mode);
        self
    }

    pub fn with_line_cap(mut self, cap: LineCap) -> Self {
        self.line_cap = Some(cap);
        self
    }

    pub fn with_fill_rule(mut self, rule: FillRule) -> Self {
        self.fill_rule = Some(rule);
        self
    }

    fn validate(&self) -> Result<(), CanvasError> {
        if let Some(width) = self.line_width
            && !(width.is_finite() && width > 0.0)
        {
            return Err(CanvasError::InvalidGraphicsState(format!(
                "line width must be positive, got {}",
                width
            )));
        }
        for (name, alpha) in [("stroke alpha", self.stroke_alpha), ("fill alpha", self.fill_alpha)] {
            if let Some(alpha) = alpha
                && !(0.0..=1.0).contains(&alpha)
            {
                return Err(CanvasError::InvalidGraphicsState(format!(
                    "{} must be within [0, 1], got {}",
                    name, alpha
                )));
            }
        }
        Ok(())
    }
}

/// Holds the one active graphics state of a page.
///
/// State is flat and overwritten in place: there is no save/restore stack.
/// Operations copy the snapshot when they are emitted, so a later `apply`
/// never reaches back into work that has already been recorded.
#[derive(Debug, Default)]
pub struct GraphicsStateManager {
    current: GraphicsState,
}

impl GraphicsStateManager {
    pub fn new() -> Self {
        Default::default()
    }

    /// Merges `update` onto the current state and returns the new snapshot.
    ///
    /// An invalid update is rejected as a whole and leaves the state untouched.
    pub fn apply(&mut self, update: GraphicsStateUpdate) -> Result<GraphicsState, CanvasError> {
        update.validate()?;

        let state = &mut self.current;
        if let Some(color) = update.stroke_color {
            state.stroke_color = color;
        }
        if let Some(color) = update.fill_color {
            state.fill_color = color;
        }
        if let Some(width) = update.line_width {
            state.line_width = width;
        }
        if let Some(alpha) = update.stroke_alpha {
            state.stroke_alpha = alpha;
        }
        if let Some(alpha) = update.fill_alpha {
            state.fill_alpha = alpha;
        }
        if let Some(mode) = update.blend_mode {
            state.blend_mode = mode;
        }
        if let Some(cap) = update.line_cap {
            state.line_cap = cap;
        }
        if let Some(rule) = update.fill_rule {
            state.fill_rule = rule;
        }

        log::trace!("Graphics state now {:?}", self.current);
        Ok(self.current)
    }

    pub fn current(&self) -> GraphicsState {
        self.current
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_merges_partial_update() {
        let mut manager = GraphicsStateManager::new();
        manager
            .apply(GraphicsStateUpdate::new().with_stroke_color(Color::RED).with_line_width(10.0))
            .unwrap();
        let state = manager
            .apply(GraphicsStateUpdate::new().with_line_cap(LineCap::Round))
            .unwrap();

        assert_eq!(state.stroke_color, Color::RED);
        assert_eq!(state.line_width, 10.0);
        assert_eq!(state.line_cap, LineCap::Round);
        assert_eq!(state.fill_color, Color::BLACK);
        assert_eq!(state, manager.current());
    }

    #[test]
    fn test_snapshots_are_independent_of_later_changes() {
        let mut manager = GraphicsStateManager::new();
        let before = manager.apply(GraphicsStateUpdate::new().with_stroke_alpha(1.0)).unwrap();
        manager.apply(GraphicsStateUpdate::new().with_stroke_alpha(0.5)).unwrap();
        assert_eq!(before.stroke_alpha, 1.0);
        assert_eq!(manager.current().stroke_alpha, 0.5);
    }

    #[test]
    fn test_invalid_update_is_rejected_whole() {
        let mut manager = GraphicsStateManager::new();
        let result = manager.apply(
            GraphicsStateUpdate::new()
                .with_stroke_color(Color::BLUE)
                .with_fill_alpha(1.5),
        );
        assert!(matches!(result, Err(CanvasError::InvalidGraphicsState(_))));
        assert_eq!(manager.current(), GraphicsState::default());

        assert!(manager.apply(GraphicsStateUpdate::new().with_line_width(0.0)).is_err());
        assert!(manager.apply(GraphicsStateUpdate::new().with_line_width(f32::NAN)).is_err());
        assert!(manager.apply(GraphicsStateUpdate::new().with_stroke_alpha(-0.1)).is_err());
    }

    #[test]
    fn test_with_alpha_sets_both_channels() {
        let mut manager = GraphicsStateManager::new();
        let state = manager.apply(GraphicsStateUpdate::new().with_alpha(0.7)).unwrap();
        assert_eq!(state.stroke_alpha, 0.7);
        assert_eq!(state.fill_alpha, 0.7);
    }

    #[test]
    fn test_enum_names() {
        assert_eq!(BlendMode::ColorDodge.pdf_name(), "ColorDodge");
        assert_eq!(LineCap::Round.pdf_code(), 1);
        let mode: BlendMode = serde_json::from_str("\"softLight\"").unwrap();
        assert_eq!(mode, BlendMode::SoftLight);
    }
}
