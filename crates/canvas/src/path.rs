use crate::error::CanvasError;
use crate::state::FillRule;
use figura_types::Point;
use std::sync::Arc;

/// Straight segments used per cubic when a path is flattened for hit testing.
const CURVE_FLATTEN_STEPS: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathCommand {
    MoveTo(Point),
    LineTo(Point),
    CurveTo { ctrl1: Point, ctrl2: Point, end: Point },
    ClosePath,
}

/// An immutable, ordered sequence of path commands.
///
/// A path may hold several subpaths, each started by a `MoveTo`. Whether it is
/// stroked or filled is decided by whoever wraps it in a draw operation.
#[derive(Debug, Clone, PartialEq)]
pub struct Path {
    commands: Arc<[PathCommand]>,
}

impl Path {
    pub fn commands(&self) -> &[PathCommand] {
        &self.commands
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn subpath_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, PathCommand::MoveTo(_)))
            .count()
    }

    /// A single straight segment.
    pub fn line(from: Point, to: Point) -> Path {
        Path {
            commands: Arc::from([PathCommand::MoveTo(from), PathCommand::LineTo(to)]),
        }
    }

    /// A closed axis-aligned rectangle anchored at its bottom-left corner.
    pub fn rect(x: f32, y: f32, width: f32, height: f32) -> Path {
        Path {
            commands: Arc::from([
                PathCommand::MoveTo(Point::new(x, y)),
                PathCommand::LineTo(Point::new(x + width, y)),
                PathCommand::LineTo(Point::new(x + width, y + height)),
                PathCommand::LineTo(Point::new(x, y + height)),
                PathCommand::ClosePath,
            ]),
        }
    }

    /// Fails on the first non-finite coordinate. Paths from [`PathBuilder`]
    /// always pass; `line` and `rect` take their input as given.
    pub fn validate(&self) -> Result<(), CanvasError> {
        for command in self.commands.iter() {
            match *command {
                PathCommand::MoveTo(p) => require_finite("move_to", p)?,
                PathCommand::LineTo(p) => require_finite("line_to", p)?,
                PathCommand::CurveTo { ctrl1, ctrl2, end } => {
                    for p in [ctrl1, ctrl2, end] {
                        require_finite("curve_to", p)?;
                    }
                }
                PathCommand::ClosePath => {}
            }
        }
        Ok(())
    }

    /// Whether `point` falls inside the filled area of this path under `rule`.
    ///
    /// Every subpath is treated as closed, the way a fill operator treats it.
    pub fn contains(&self, point: Point, rule: FillRule) -> bool {
        let mut crossings = 0usize;
        let mut winding = 0i32;

        for ring in self.flatten() {
            for (i, a) in ring.iter().enumerate() {
                let b = ring[(i + 1) % ring.len()];
                if (a.y > point.y) == (b.y > point.y) {
                    continue;
                }
                let x_at = a.x + (point.y - a.y) * (b.x - a.x) / (b.y - a.y);
                if point.x < x_at {
                    crossings += 1;
                    winding += if b.y > a.y { 1 } else { -1 };
                }
            }
        }

        match rule {
            FillRule::EvenOdd => crossings % 2 == 1,
            FillRule::NonZero => winding != 0,
        }
    }

    /// Splits the path into polygons, one per subpath, with curves replaced by
    /// short straight segments.
    fn flatten(&self) -> Vec<Vec<Point>> {
        let mut rings = Vec::new();
        let mut ring: Vec<Point> = Vec::new();
        let mut start = Point::default();

        for command in self.commands.iter() {
            match *command {
                PathCommand::MoveTo(p) => {
                    if ring.len() > 1 {
                        rings.push(std::mem::take(&mut ring));
                    }
                    ring.clear();
                    ring.push(p);
                    start = p;
                }
                PathCommand::LineTo(p) => ring.push(p),
                PathCommand::CurveTo { ctrl1, ctrl2, end } => {
                    let from = ring.last().copied().unwrap_or(start);
                    for step in 1..=CURVE_FLATTEN_STEPS {
                        let t = step as f32 / CURVE_FLATTEN_STEPS as f32;
                        ring.push(cubic_point(from, ctrl1, ctrl2, end, t));
                    }
                }
                PathCommand::ClosePath => {
                    if ring.len() > 1 {
                        rings.push(std::mem::take(&mut ring));
                    }
                    // Drawing may continue from the start of the closed subpath.
                    ring.clear();
                    ring.push(start);
                }
            }
        }
        if ring.len() > 1 {
            rings.push(ring);
        }
        rings
    }
}

fn cubic_point(p0: Point, p1: Point, p2: Point, p3: Point, t: f32) -> Point {
    let mt = 1.0 - t;
    let a = mt * mt * mt;
    let b = 3.0 * mt * mt * t;
    let c = 3.0 * mt * t * t;
    let d = t * t * t;
    Point::new(
        a * p0.x + b * p1.x + c * p2.x + d * p3.x,
        a * p0.y + b * p1.y + c * p2.y + d * p3.y,
    )
}

/// Accumulates path commands. Drawing commands require a current point, so
/// `line_to`, `curve_to` and `close_path` fail until `move_to` has been called.
/// Every point must be finite.
#[derive(Debug, Default)]
pub struct PathBuilder {
    commands: Vec<PathCommand>,
    started: bool,
}

impl PathBuilder {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn move_to(&mut self, to: Point) -> Result<&mut Self, CanvasError> {
        require_finite("move_to", to)?;
        self.commands.push(PathCommand::MoveTo(to));
        self.started = true;
        Ok(self)
    }

    pub fn line_to(&mut self, to: Point) -> Result<&mut Self, CanvasError> {
        self.require_started("line_to")?;
        require_finite("line_to", to)?;
        self.commands.push(PathCommand::LineTo(to));
        Ok(self)
    }

    pub fn curve_to(&mut self, ctrl1: Point, ctrl2: Point, end: Point) -> Result<&mut Self, CanvasError> {
        self.require_started("curve_to")?;
        for point in [ctrl1, ctrl2, end] {
            require_finite("curve_to", point)?;
        }
        self.commands.push(PathCommand::CurveTo { ctrl1, ctrl2, end });
        Ok(self)
    }

    pub fn close_path(&mut self) -> Result<&mut Self, CanvasError> {
        self.require_started("close_path")?;
        self.commands.push(PathCommand::ClosePath);
        Ok(self)
    }

    /// Appends a point sequence as straight segments: `move_to` the first point,
    /// `line_to` each following one. Smoothness therefore depends only on how
    /// densely the caller sampled the curve.
    pub fn polyline<I>(&mut self, points: I) -> Result<&mut Self, CanvasError>
    where
        I: IntoIterator<Item = Point>,
    {
        let mut points = points.into_iter();
        if let Some(first) = points.next() {
            self.move_to(first)?;
            for point in points {
                self.line_to(point)?;
            }
        }
        Ok(self)
    }

    /// Appends a closed polygon as its own subpath.
    pub fn polygon(&mut self, points: &[Point]) -> Result<&mut Self, CanvasError> {
        if !points.is_empty() {
            self.polyline(points.iter().copied())?;
            self.close_path()?;
        }
        Ok(self)
    }

    pub fn build(self) -> Path {
        Path {
            commands: self.commands.into(),
        }
    }

    fn require_started(&self, command: &'static str) -> Result<(), CanvasError> {
        if self.started {
            Ok(())
        } else {
            Err(CanvasError::PathNotStarted(command))
        }
    }
}

fn require_finite(command: &'static str, point: Point) -> Result<(), CanvasError> {
    if point.is_finite() {
        Ok(())
    } else {
        Err(CanvasError::InvalidPoint {
            command,
            x: point.x,
            y: point.y,
        })
    }
}
