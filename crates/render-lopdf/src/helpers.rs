//! Translation of draw operations into PDF content-stream operators.

use figura_canvas::{FillRule, GraphicsState, Path, PathCommand};
use figura_types::{Color, Point, Size};
use lopdf::content::Operation;
use lopdf::{dictionary, Dictionary, Object, ObjectId, StringFormat};

/// Standard Type1 font used for text placements.
pub const BASE_FONT: &str = "Helvetica-Bold";
/// Resource name the font is registered under on every page.
pub const FONT_RESOURCE_NAME: &str = "F1";

/// The named resources a page's content streams refer to.
///
/// Transparency and blend mode can only be set through `/ExtGState`
/// dictionaries, so each distinct (stroke alpha, fill alpha, blend mode)
/// combination gets one entry, shared by every operation that uses it.
#[derive(Debug, Default)]
pub struct PageResources {
    ext_gstates: Vec<((u32, u32, &'static str), String)>,
    xobjects: Vec<(ObjectId, String)>,
}

impl PageResources {
    pub fn ext_gstate_name(&mut self, state: &GraphicsState) -> String {
        let key = (
            state.stroke_alpha.to_bits(),
            state.fill_alpha.to_bits(),
            state.blend_mode.pdf_name(),
        );
        if let Some((_, name)) = self.ext_gstates.iter().find(|(k, _)| *k == key) {
            return name.clone();
        }
        let name = format!("GS{}", self.ext_gstates.len() + 1);
        self.ext_gstates.push((key, name.clone()));
        name
    }

    pub fn xobject_name(&mut self, id: ObjectId) -> String {
        if let Some((_, name)) = self.xobjects.iter().find(|(existing, _)| *existing == id) {
            return name.clone();
        }
        let name = format!("Im{}", self.xobjects.len() + 1);
        self.xobjects.push((id, name.clone()));
        name
    }

    pub fn ext_gstate_count(&self) -> usize {
        self.ext_gstates.len()
    }

    /// Builds the page's `/Resources` dictionary.
    pub fn to_dictionary(&self, font_id: ObjectId) -> Dictionary {
        let mut resources = dictionary! {
            "Font" => dictionary! { FONT_RESOURCE_NAME => font_id },
        };

        if !self.ext_gstates.is_empty() {
            let mut states = Dictionary::new();
            for ((stroke_bits, fill_bits, blend), name) in &self.ext_gstates {
                states.set(
                    name.as_bytes(),
                    dictionary! {
                        "Type" => "ExtGState",
                        "CA" => f32::from_bits(*stroke_bits),
                        "ca" => f32::from_bits(*fill_bits),
                        "BM" => *blend,
                    },
                );
            }
            resources.set("ExtGState", states);
        }

        if !self.xobjects.is_empty() {
            let mut xobjects = Dictionary::new();
            for (id, name) in &self.xobjects {
                xobjects.set(name.as_bytes(), Object::Reference(*id));
            }
            resources.set("XObject", xobjects);
        }

        resources
    }
}

/// Accumulates the operators of one content stream.
#[derive(Debug, Default)]
pub(crate) struct ContentBuilder {
    pub(crate) operations: Vec<Operation>,
}

impl ContentBuilder {
    fn push(&mut self, operator: &str, operands: Vec<Object>) {
        self.operations.push(Operation::new(operator, operands));
    }

    fn set_ext_gstate(&mut self, state: &GraphicsState, resources: &mut PageResources) {
        let name = resources.ext_gstate_name(state);
        self.push("gs", vec![Object::Name(name.into_bytes())]);
    }

    fn set_stroke_color(&mut self, color: Color) {
        let [r, g, b] = color.to_unit();
        self.push("RG", vec![r.into(), g.into(), b.into()]);
    }

    fn set_fill_color(&mut self, color: Color) {
        let [r, g, b] = color.to_unit();
        self.push("rg", vec![r.into(), g.into(), b.into()]);
    }

    fn append_path(&mut self, path: &Path) {
        for command in path.commands() {
            match *command {
                PathCommand::MoveTo(p) => self.push("m", vec![p.x.into(), p.y.into()]),
                PathCommand::LineTo(p) => self.push("l", vec![p.x.into(), p.y.into()]),
                PathCommand::CurveTo { ctrl1, ctrl2, end } => self.push(
                    "c",
                    vec![
                        ctrl1.x.into(),
                        ctrl1.y.into(),
                        ctrl2.x.into(),
                        ctrl2.y.into(),
                        end.x.into(),
                        end.y.into(),
                    ],
                ),
                PathCommand::ClosePath => self.push("h", vec![]),
            }
        }
    }

    pub(crate) fn stroke(&mut self, path: &Path, state: &GraphicsState, resources: &mut PageResources) {
        self.push("q", vec![]);
        self.set_ext_gstate(state, resources);
        self.set_stroke_color(state.stroke_color);
        self.push("w", vec![state.line_width.into()]);
        self.push("J", vec![state.line_cap.pdf_code().into()]);
        self.append_path(path);
        self.push("S", vec![]);
        self.push("Q", vec![]);
    }

    pub(crate) fn fill(&mut self, path: &Path, state: &GraphicsState, resources: &mut PageResources) {
        self.push("q", vec![]);
        self.set_ext_gstate(state, resources);
        self.set_fill_color(state.fill_color);
        self.append_path(path);
        match state.fill_rule {
            FillRule::NonZero => self.push("f", vec![]),
            FillRule::EvenOdd => self.push("f*", vec![]),
        }
        self.push("Q", vec![]);
    }

    pub(crate) fn text(&mut self, text: &str, position: Point, size: f32, color: Color) {
        if text.trim().is_empty() {
            return;
        }
        self.push("q", vec![]);
        self.push("BT", vec![]);
        self.push(
            "Tf",
            vec![Object::Name(FONT_RESOURCE_NAME.as_bytes().to_vec()), size.into()],
        );
        self.set_fill_color(color);
        self.push("Td", vec![position.x.into(), position.y.into()]);
        self.push(
            "Tj",
            vec![Object::String(to_win_ansi(text), StringFormat::Literal)],
        );
        self.push("ET", vec![]);
        self.push("Q", vec![]);
    }

    /// Paints an image XObject into the box whose bottom-left corner is `position`.
    pub(crate) fn image(&mut self, name: String, position: Point, size: Size) {
        self.push("q", vec![]);
        self.push(
            "cm",
            vec![
                size.width.into(),
                Object::Integer(0),
                Object::Integer(0),
                size.height.into(),
                position.x.into(),
                position.y.into(),
            ],
        );
        self.push("Do", vec![Object::Name(name.into_bytes())]);
        self.push("Q", vec![]);
    }
}

/// Encodes text for the WinAnsi-encoded base font, replacing anything it cannot show.
pub fn to_win_ansi(s: &str) -> Vec<u8> {
    s.chars().map(|c| if c as u32 <= 255 { c as u8 } else { b'?' }).collect()
}
