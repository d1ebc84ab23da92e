//! Binary coverage rasterization.
//!
//! Shapes are sampled once per pixel at the pixel centre. Coverage is a plain
//! set of pixels, so stamping a stroke piece by piece and stamping it in one
//! pass yield the same mask, and re-applying a destination-out mask is a no-op.

use crate::geometry::Vec2;

/// Pixel rectangle with exclusive max bounds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PixelRect {
    pub x0: u32,
    pub y0: u32,
    pub x1: u32,
    pub y1: u32,
}

impl PixelRect {
    pub fn new(x0: u32, y0: u32, x1: u32, y1: u32) -> Self {
        Self { x0, y0, x1, y1 }
    }

    pub fn full(width: u32, height: u32) -> Self {
        Self::new(0, 0, width, height)
    }

    /// Pixels touched by a float box `[min, max]`, clipped to `width`×`height`.
    /// `None` when the box misses the surface entirely.
    pub fn covering(min: Vec2, max: Vec2, width: u32, height: u32) -> Option<Self> {
        if !(min.x.is_finite() && min.y.is_finite() && max.x.is_finite() && max.y.is_finite()) {
            return None;
        }
        if max.x < 0.0 || max.y < 0.0 || min.x >= width as f32 || min.y >= height as f32 {
            return None;
        }
        let x0 = min.x.floor().max(0.0) as u32;
        let y0 = min.y.floor().max(0.0) as u32;
        let x1 = (max.x.ceil().max(0.0) as u32).saturating_add(1).min(width);
        let y1 = (max.y.ceil().max(0.0) as u32).saturating_add(1).min(height);
        let rect = Self::new(x0, y0, x1, y1);
        (!rect.is_empty()).then_some(rect)
    }

    pub fn is_empty(&self) -> bool {
        self.x0 >= self.x1 || self.y0 >= self.y1
    }

    pub fn width(&self) -> u32 {
        self.x1.saturating_sub(self.x0)
    }

    pub fn height(&self) -> u32 {
        self.y1.saturating_sub(self.y0)
    }

    pub fn contains(&self, x: u32, y: u32) -> bool {
        x >= self.x0 && x < self.x1 && y >= self.y0 && y < self.y1
    }

    pub fn union(&self, other: &PixelRect) -> PixelRect {
        PixelRect::new(
            self.x0.min(other.x0),
            self.y0.min(other.y0),
            self.x1.max(other.x1),
            self.y1.max(other.y1),
        )
    }

    pub fn union_opt(a: Option<PixelRect>, b: Option<PixelRect>) -> Option<PixelRect> {
        match (a, b) {
            (Some(a), Some(b)) => Some(a.union(&b)),
            (a, None) => a,
            (None, b) => b,
        }
    }

    /// Clip to a `width`×`height` surface.
    pub fn clip(&self, width: u32, height: u32) -> Option<PixelRect> {
        let rect = PixelRect::new(
            self.x0.min(width),
            self.y0.min(height),
            self.x1.min(width),
            self.y1.min(height),
        );
        (!rect.is_empty()).then_some(rect)
    }
}

/// Set of covered pixels for one shape or stroke.
#[derive(Clone, Debug)]
pub struct CoverageMask {
    width: u32,
    height: u32,
    bits: Vec<bool>,
    bounds: Option<PixelRect>,
}

impl PartialEq for CoverageMask {
    fn eq(&self, other: &Self) -> bool {
        self.width == other.width && self.height == other.height && self.bits == other.bits
    }
}

impl Eq for CoverageMask {}

impl CoverageMask {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            bits: vec![false; width as usize * height as usize],
            bounds: None,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Tight bounds of covered pixels.
    pub fn bounds(&self) -> Option<PixelRect> {
        self.bounds
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    #[inline]
    pub fn get(&self, x: u32, y: u32) -> bool {
        x < self.width && y < self.height && self.bits[self.index(x, y)]
    }

    #[inline]
    fn set(&mut self, x: u32, y: u32) {
        let idx = self.index(x, y);
        if self.bits[idx] {
            return;
        }
        self.bits[idx] = true;
        let pixel = PixelRect::new(x, y, x + 1, y + 1);
        self.bounds = Some(self.bounds.map_or(pixel, |b| b.union(&pixel)));
    }

    pub fn covered_count(&self) -> usize {
        match self.bounds {
            None => 0,
            Some(b) => (b.y0..b.y1)
                .map(|y| (b.x0..b.x1).filter(|&x| self.get(x, y)).count())
                .sum(),
        }
    }

    /// Remove all coverage.
    pub fn clear(&mut self) {
        if let Some(b) = self.bounds.take() {
            for y in b.y0..b.y1 {
                let start = self.index(b.x0, y);
                let end = self.index(b.x1 - 1, y) + 1;
                self.bits[start..end].fill(false);
            }
        }
    }

    /// Cover every pixel whose centre lies within `radius` of segment `a`–`b`
    /// (a line with round caps). Returns the scanned rectangle.
    pub fn stamp_capsule(&mut self, a: Vec2, b: Vec2, radius: f32) -> Option<PixelRect> {
        let min = Vec2::new(a.x.min(b.x) - radius, a.y.min(b.y) - radius);
        let max = Vec2::new(a.x.max(b.x) + radius, a.y.max(b.y) + radius);
        let rect = PixelRect::covering(min, max, self.width, self.height)?;

        let ab = b - a;
        let len_sq = ab.dot(ab);
        let radius_sq = radius * radius;

        for y in rect.y0..rect.y1 {
            for x in rect.x0..rect.x1 {
                let c = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
                let t = if len_sq == 0.0 {
                    0.0
                } else {
                    ((c - a).dot(ab) / len_sq).clamp(0.0, 1.0)
                };
                let nearest = a + ab * t;
                if c.dist_sq(nearest) <= radius_sq {
                    self.set(x, y);
                }
            }
        }
        Some(rect)
    }

    /// Fill a closed polygon with the non-zero winding rule. The last vertex
    /// connects back to the first. Returns the scanned rectangle.
    pub fn fill_polygon(&mut self, polygon: &[Vec2]) -> Option<PixelRect> {
        if polygon.len() < 2 {
            return None;
        }
        let (min, max) = polygon.iter().fold(
            (Vec2::new(f32::MAX, f32::MAX), Vec2::new(f32::MIN, f32::MIN)),
            |(lo, hi), p| {
                (
                    Vec2::new(lo.x.min(p.x), lo.y.min(p.y)),
                    Vec2::new(hi.x.max(p.x), hi.y.max(p.y)),
                )
            },
        );
        let rect = PixelRect::covering(min, max, self.width, self.height)?;

        let mut crossings: Vec<(f32, i32)> = Vec::new();
        for y in rect.y0..rect.y1 {
            let sample_y = y as f32 + 0.5;
            crossings.clear();

            for (i, &p0) in polygon.iter().enumerate() {
                let p1 = polygon[(i + 1) % polygon.len()];
                let upward = p0.y <= sample_y && p1.y > sample_y;
                let downward = p1.y <= sample_y && p0.y > sample_y;
                if upward || downward {
                    let x = p0.x + (sample_y - p0.y) * (p1.x - p0.x) / (p1.y - p0.y);
                    crossings.push((x, if upward { 1 } else { -1 }));
                }
            }
            crossings.sort_by(|a, b| a.0.total_cmp(&b.0));

            let mut winding = 0;
            for pair in crossings.windows(2) {
                winding += pair[0].1;
                if winding == 0 {
                    continue;
                }
                // Pixels whose centre lies in [start, end).
                let start = (pair[0].0 - 0.5).ceil().max(rect.x0 as f32) as u32;
                let end = ((pair[1].0 - 0.5).ceil().max(0.0) as u32).min(rect.x1);
                for x in start..end {
                    self.set(x, y);
                }
            }
        }
        Some(rect)
    }

    /// Iterate covered pixels inside `rect`.
    pub fn covered_in(&self, rect: PixelRect) -> impl Iterator<Item = (u32, u32)> + '_ {
        let clipped = rect.clip(self.width, self.height);
        clipped.into_iter().flat_map(move |r| {
            (r.y0..r.y1).flat_map(move |y| {
                (r.x0..r.x1).filter_map(move |x| self.get(x, y).then_some((x, y)))
            })
        })
    }
}
