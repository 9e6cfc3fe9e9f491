use crate::error::CurveError;
use figura_types::Point;
use std::f64::consts::{PI, SQRT_2};

/// Number of straight segments used when the caller has no opinion.
pub const DEFAULT_SEGMENTS: usize = 100;

/// The curve families the discretizer knows how to trace.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[non_exhaustive]
pub enum CurveKind {
    /// Lemniscate of Bernoulli, scaled independently on each axis.
    #[default]
    Lemniscate,
}

#[derive(Debug, Clone, Copy)]
struct CurveParams {
    kind: CurveKind,
    half_width: f64,
    half_height: f64,
    center: Point,
}

impl CurveParams {
    fn validate(
        kind: CurveKind,
        width: f32,
        height: f32,
        center: Point,
        segments: usize,
    ) -> Result<Self, CurveError> {
        let dimensions_ok = width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0;
        if !dimensions_ok || !center.is_finite() || segments == 0 {
            return Err(CurveError::InvalidCurveParameters {
                width,
                height,
                segments,
            });
        }
        Ok(Self {
            kind,
            half_width: f64::from(width) / 2.0,
            half_height: f64::from(height) / 2.0,
            center,
        })
    }

    fn evaluate(&self, t: f64) -> Point {
        match self.kind {
            CurveKind::Lemniscate => {
                let theta = 2.0 * PI * t;
                let (sin, cos) = theta.sin_cos();
                let denom = sin * sin + 1.0;
                let x = f64::from(self.center.x) + self.half_width * SQRT_2 * cos / denom;
                let y = f64::from(self.center.y) + self.half_height * SQRT_2 * cos * sin / denom;
                Point::new(x as f32, y as f32)
            }
        }
    }
}

/// Evaluates the curve at a single parameter `t` in `[0, 1]`.
pub fn point_at(
    kind: CurveKind,
    width: f32,
    height: f32,
    center: Point,
    t: f32,
) -> Result<Point, CurveError> {
    let params = CurveParams::validate(kind, width, height, center, 1)?;
    Ok(params.evaluate(f64::from(t)))
}

/// Samples the curve at `segments + 1` evenly spaced parameter values, from
/// `t = 0` to `t = 1` inclusive.
///
/// For a closed curve the first and last points coincide.
pub fn discretize(
    kind: CurveKind,
    width: f32,
    height: f32,
    center: Point,
    segments: usize,
) -> Result<Vec<Point>, CurveError> {
    let points: Vec<Point> = samples(kind, width, height, center, segments)?.collect();
    log::trace!(
        "Discretized {:?} {}x{} at ({}, {}) into {} points",
        kind,
        width,
        height,
        center.x,
        center.y,
        points.len()
    );
    Ok(points)
}

/// Lazy version of [`discretize`]. The iterator is `Clone`, so a copy taken
/// before iteration replays the same sequence.
pub fn samples(
    kind: CurveKind,
    width: f32,
    height: f32,
    center: Point,
    segments: usize,
) -> Result<CurveSamples, CurveError> {
    let params = CurveParams::validate(kind, width, height, center, segments)?;
    Ok(CurveSamples {
        params,
        segments,
        next: 0,
        done: false,
    })
}

/// Iterator over `segments + 1` curve points. Any `segments` value is
/// accepted, including `usize::MAX`.
#[derive(Debug, Clone)]
pub struct CurveSamples {
    params: CurveParams,
    segments: usize,
    next: usize,
    done: bool,
}

impl CurveSamples {
    /// Rewinds to `t = 0`.
    pub fn restart(&mut self) {
        self.next = 0;
        self.done = false;
    }
}

impl Iterator for CurveSamples {
    type Item = Point;

    fn next(&mut self) -> Option<Point> {
        if self.done {
            return None;
        }
        let t = self.next as f64 / self.segments as f64;
        if self.next == self.segments {
            self.done = true;
        } else {
            self.next += 1;
        }
        Some(self.params.evaluate(t))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.done {
            return (0, Some(0));
        }
        // One more than the segments left, which does not fit for usize::MAX.
        match (self.segments - self.next).checked_add(1) {
            Some(remaining) => (remaining, Some(remaining)),
            None => (usize::MAX, None),
        }
    }
}

impl ExactSizeIterator for CurveSamples {}
