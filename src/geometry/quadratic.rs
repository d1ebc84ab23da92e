//! Incremental quadratic path with exponential width smoothing.
//!
//! Each new sample `p[i]` yields one segment. The first is a straight line
//! `p[0] → p[1]`; every later one is a quadratic curve through the midpoints
//! of the two most recent sample pairs, using `p[i-1]` as the control point.
//! The chain is smooth through noisy input without resampling the path.

use super::Vec2;
use super::width::WidthSmoother;
use crate::render::raster::{CoverageMask, PixelRect};
use crate::types::StrokePoint;

/// Flattening tolerance for quadratic curves, in logical pixels
const FLATTEN_STEP: f32 = 2.0;

/// Upper bound on line pieces per curve
const MAX_FLATTEN_PIECES: usize = 64;

/// Thinnest width painted; canvas ignores zero widths and keeps a hairline
const MIN_WIDTH: f32 = 1.0;

/// One painted piece of a quadratic path.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PathSegment {
    Line { from: Vec2, to: Vec2, width: f32 },
    Quad { from: Vec2, ctrl: Vec2, to: Vec2, width: f32 },
}

impl PathSegment {
    pub fn width(&self) -> f32 {
        match *self {
            PathSegment::Line { width, .. } | PathSegment::Quad { width, .. } => width,
        }
    }

    /// Polyline approximation of the segment, endpoints included.
    pub fn flatten(&self) -> Vec<Vec2> {
        match *self {
            PathSegment::Line { from, to, .. } => vec![from, to],
            PathSegment::Quad { from, ctrl, to, .. } => {
                let approx_len = from.dist(ctrl) + ctrl.dist(to);
                let pieces = ((approx_len / FLATTEN_STEP).ceil() as usize).clamp(1, MAX_FLATTEN_PIECES);
                (0..=pieces)
                    .map(|i| {
                        let t = i as f32 / pieces as f32;
                        let a = from.lerp(ctrl, t);
                        let b = ctrl.lerp(to, t);
                        a.lerp(b, t)
                    })
                    .collect()
            }
        }
    }

    /// Stamp the segment with round caps and joins.
    pub fn rasterize(&self, mask: &mut CoverageMask) -> Option<PixelRect> {
        let radius = self.width().max(MIN_WIDTH) * 0.5;
        let polyline = self.flatten();
        polyline.windows(2).fold(None, |dirty, pair| {
            PixelRect::union_opt(dirty, mask.stamp_capsule(pair[0], pair[1], radius))
        })
    }
}

/// Streaming segment generator for one stroke.
#[derive(Clone, Debug)]
pub struct QuadraticPath {
    smoother: WidthSmoother,
    previous: Option<Vec2>,
    before_previous: Option<Vec2>,
}

impl QuadraticPath {
    pub fn new(size: f32) -> Self {
        Self {
            smoother: WidthSmoother::new(size),
            previous: None,
            before_previous: None,
        }
    }

    /// Feed the next sample; returns the segment it completes, if any.
    pub fn push(&mut self, point: &StrokePoint) -> Option<PathSegment> {
        let current = Vec2::from(point);
        let segment = match (self.before_previous, self.previous) {
            (_, None) => None,
            (None, Some(prev)) => Some(PathSegment::Line {
                from: prev,
                to: current,
                width: self.smoother.next(point.pressure),
            }),
            (Some(before), Some(prev)) => Some(PathSegment::Quad {
                from: before.midpoint(prev),
                ctrl: prev,
                to: prev.midpoint(current),
                width: self.smoother.next(point.pressure),
            }),
        };
        self.before_previous = self.previous;
        self.previous = Some(current);
        segment
    }

    /// Width of the most recent segment.
    pub fn current_width(&self) -> Option<f32> {
        self.smoother.current()
    }
}

/// All segments of a complete stroke, identical to feeding it sample by sample.
pub fn segments(points: &[StrokePoint], size: f32) -> Vec<PathSegment> {
    let mut path = QuadraticPath::new(size);
    points.iter().filter_map(|p| path.push(p)).collect()
}
