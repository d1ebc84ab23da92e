//! Stroke geometry: pressure-sensitive width, smoothing and shape generation.
//!
//! Two strategies turn an ordered point list into covered pixels:
//!
//! - [`GeometryStrategy::Outline`] builds a closed variable-width polygon
//!   around a streamlined centre line and fills it (see [`outline`]).
//! - [`GeometryStrategy::Quadratic`] paints a chain of round-capped line and
//!   quadratic segments whose width follows a low-pass filtered pressure
//!   (see [`quadratic`]).
//!
//! An engine uses one strategy for live preview, commit and replay alike so a
//! replayed page is pixel-identical to what was drawn live.

pub mod outline;
pub mod quadratic;
pub mod width;

use crate::constants::MIN_STROKE_POINTS;
use crate::render::raster::{CoverageMask, PixelRect};
use crate::types::StrokePoint;
use serde::{Deserialize, Serialize};
use std::ops::{Add, Mul, Sub};

pub use outline::{OutlineOptions, stroke_outline};
pub use quadratic::{PathSegment, QuadraticPath};
pub use width::{WidthSmoother, target_width};

// ============================================================================
// Vec2
// ============================================================================

/// A 2D point or direction in page-logical coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    #[inline]
    pub fn len(self) -> f32 {
        self.x.hypot(self.y)
    }

    #[inline]
    pub fn dist(self, other: Vec2) -> f32 {
        (self - other).len()
    }

    #[inline]
    pub fn dist_sq(self, other: Vec2) -> f32 {
        let d = self - other;
        d.x * d.x + d.y * d.y
    }

    #[inline]
    pub fn dot(self, other: Vec2) -> f32 {
        self.x * other.x + self.y * other.y
    }

    /// Unit vector in the same direction, or zero for a zero vector.
    #[inline]
    pub fn unit(self) -> Vec2 {
        let len = self.len();
        if len == 0.0 { Vec2::default() } else { self * (1.0 / len) }
    }

    /// Perpendicular (rotated a quarter turn clockwise in screen space).
    #[inline]
    pub fn perp(self) -> Vec2 {
        Vec2::new(self.y, -self.x)
    }

    /// Rotate counter-clockwise by `angle` radians.
    #[inline]
    pub fn rotate(self, angle: f32) -> Vec2 {
        let (sin, cos) = angle.sin_cos();
        Vec2::new(self.x * cos - self.y * sin, self.x * sin + self.y * cos)
    }

    #[inline]
    pub fn lerp(self, other: Vec2, t: f32) -> Vec2 {
        self + (other - self) * t
    }

    #[inline]
    pub fn midpoint(self, other: Vec2) -> Vec2 {
        Vec2::new((self.x + other.x) * 0.5, (self.y + other.y) * 0.5)
    }
}

impl From<StrokePoint> for Vec2 {
    fn from(p: StrokePoint) -> Self {
        Vec2::new(p.x, p.y)
    }
}

impl From<&StrokePoint> for Vec2 {
    fn from(p: &StrokePoint) -> Self {
        Vec2::new(p.x, p.y)
    }
}

impl Add for Vec2 {
    type Output = Vec2;
    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Vec2 {
    type Output = Vec2;
    fn sub(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f32> for Vec2 {
    type Output = Vec2;
    fn mul(self, rhs: f32) -> Vec2 {
        Vec2::new(self.x * rhs, self.y * rhs)
    }
}

// ============================================================================
// Engine
// ============================================================================

/// Which shape generator an engine uses.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GeometryStrategy {
    /// Filled variable-width outline polygon
    Outline,
    /// Incrementally painted quadratic path with smoothed width
    #[default]
    Quadratic,
}

/// Deterministic stroke rasterizer configured with one strategy.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct GeometryEngine {
    pub strategy: GeometryStrategy,
    pub outline: OutlineOptions,
}

impl GeometryEngine {
    pub fn new(strategy: GeometryStrategy, outline: OutlineOptions) -> Self {
        Self { strategy, outline }
    }

    pub fn quadratic() -> Self {
        Self::new(GeometryStrategy::Quadratic, OutlineOptions::default())
    }

    pub fn outline() -> Self {
        Self::new(GeometryStrategy::Outline, OutlineOptions::default())
    }

    /// Rasterize a complete stroke into `mask`. Fewer than two points cover
    /// nothing. Returns the rectangle that was touched.
    pub fn rasterize(
        &self,
        points: &[StrokePoint],
        size: f32,
        mask: &mut CoverageMask,
    ) -> Option<PixelRect> {
        if points.len() < MIN_STROKE_POINTS {
            return None;
        }
        match self.strategy {
            GeometryStrategy::Outline => {
                let polygon = stroke_outline(points, size, &self.outline);
                if polygon.len() < 2 {
                    return None;
                }
                mask.fill_polygon(&polygon)
            }
            GeometryStrategy::Quadratic => quadratic::segments(points, size)
                .iter()
                .fold(None, |dirty, segment| {
                    PixelRect::union_opt(dirty, segment.rasterize(mask))
                }),
        }
    }

    /// Start an in-progress stroke whose coverage lives in a `width`×`height` mask.
    pub fn begin(&self, size: f32, width: u32, height: u32) -> LiveStroke {
        LiveStroke {
            engine: *self,
            size,
            points: Vec::new(),
            path: QuadraticPath::new(size),
            mask: CoverageMask::new(width, height),
        }
    }
}

// ============================================================================
// Live Stroke
// ============================================================================

/// Geometry state of the stroke currently being drawn.
///
/// Owns the captured points (in arrival order) and the coverage accumulated
/// so far. Quadratic strokes only ever gain coverage; outline strokes are
/// regenerated from all points on every extension.
#[derive(Clone, Debug)]
pub struct LiveStroke {
    engine: GeometryEngine,
    size: f32,
    points: Vec<StrokePoint>,
    path: QuadraticPath,
    mask: CoverageMask,
}

impl LiveStroke {
    /// Append samples and update coverage. Returns the region whose coverage
    /// may have changed, including pixels that stopped being covered.
    pub fn extend(&mut self, points: &[StrokePoint]) -> Option<PixelRect> {
        if points.is_empty() {
            return None;
        }
        match self.engine.strategy {
            GeometryStrategy::Quadratic => {
                let mut dirty = None;
                for point in points {
                    self.points.push(*point);
                    if let Some(segment) = self.path.push(point) {
                        dirty = PixelRect::union_opt(dirty, segment.rasterize(&mut self.mask));
                    }
                }
                dirty
            }
            GeometryStrategy::Outline => {
                self.points.extend_from_slice(points);
                let previous = self.mask.bounds();
                self.mask.clear();
                let current = self.engine.rasterize(&self.points, self.size, &mut self.mask);
                PixelRect::union_opt(previous, current)
            }
        }
    }

    /// True when coverage can only grow, so painted pixels never need restoring.
    pub fn is_monotonic(&self) -> bool {
        self.engine.strategy == GeometryStrategy::Quadratic
    }

    pub fn points(&self) -> &[StrokePoint] {
        &self.points
    }

    pub fn mask(&self) -> &CoverageMask {
        &self.mask
    }

    pub fn size(&self) -> f32 {
        self.size
    }

    pub fn into_points(self) -> Vec<StrokePoint> {
        self.points
    }
}
