//! Coordinate conversion between device pixels and page-logical space.
//!
//! Strokes are always recorded at the page's logical resolution regardless of
//! how large the page is displayed, so zooming never changes stored geometry.

use super::device::PointerEvent;
use crate::constants::{
    DEFAULT_PRESSURE, FIT_MARGIN_X, FIT_MARGIN_Y, MAX_FIT_SCALE, MIN_DISPLAY_SCALE, PAGE_HEIGHT,
    PAGE_WIDTH,
};
use crate::types::StrokePoint;
use serde::{Deserialize, Serialize};

/// Canonical page resolution that strokes are recorded in.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct LogicalSize {
    pub width: f32,
    pub height: f32,
}

impl LogicalSize {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Whole-pixel surface size for this resolution.
    pub fn pixels(&self) -> (u32, u32) {
        (self.width.round().max(0.0) as u32, self.height.round().max(0.0) as u32)
    }
}

impl Default for LogicalSize {
    fn default() -> Self {
        Self::new(PAGE_WIDTH as f32, PAGE_HEIGHT as f32)
    }
}

/// Where the page is currently shown, in device pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct DisplayRect {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl DisplayRect {
    pub fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    pub fn has_area(&self) -> bool {
        self.width > 0.0 && self.height > 0.0
    }
}

/// Pressure to record for a reported value: absent or non-finite readings
/// become the default, everything else is clamped to `[0, 1]`.
#[inline]
pub fn resolve_pressure(reported: Option<f32>) -> f32 {
    match reported {
        Some(p) if p.is_finite() => p.clamp(0.0, 1.0),
        _ => DEFAULT_PRESSURE,
    }
}

/// Maps device positions onto the logical page.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CoordinateMapper {
    logical: LogicalSize,
    display: DisplayRect,
}

impl CoordinateMapper {
    pub fn new(logical: LogicalSize, display: DisplayRect) -> Self {
        Self { logical, display }
    }

    pub fn logical(&self) -> LogicalSize {
        self.logical
    }

    pub fn display(&self) -> DisplayRect {
        self.display
    }

    /// Logical units per device pixel, or `None` when nothing is displayed.
    #[inline]
    pub fn scale(&self) -> Option<(f32, f32)> {
        self.display.has_area().then(|| {
            (
                self.logical.width / self.display.width,
                self.logical.height / self.display.height,
            )
        })
    }

    /// Convert a device position to logical coordinates. Non-finite input
    /// maps to `None`.
    #[inline]
    pub fn map(&self, client_x: f32, client_y: f32) -> Option<(f32, f32)> {
        let (sx, sy) = self.scale()?;
        let x = (client_x - self.display.left) * sx;
        let y = (client_y - self.display.top) * sy;
        (x.is_finite() && y.is_finite()).then_some((x, y))
    }

    /// Convert a logical position back to device pixels.
    #[inline]
    pub fn to_device(&self, x: f32, y: f32) -> Option<(f32, f32)> {
        let (sx, sy) = self.scale()?;
        Some((x / sx + self.display.left, y / sy + self.display.top))
    }

    pub fn map_event(&self, event: &PointerEvent) -> Option<StrokePoint> {
        let (x, y) = self.map(event.client_x, event.client_y)?;
        Some(StrokePoint::new(x, y, resolve_pressure(event.pressure)))
    }
}

/// Display scale of a page inside a window.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub scale: f32,
    pub logical: LogicalSize,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            scale: 1.0,
            logical: LogicalSize::default(),
        }
    }
}

impl Viewport {
    pub fn new(scale: f32, logical: LogicalSize) -> Self {
        Self { scale, logical }
    }

    /// Largest scale at which the page fits a `window_width`×`window_height`
    /// window with room for the toolbar, never above 1 or below 0.1.
    pub fn fit_scale(&self, window_width: f32, window_height: f32) -> f32 {
        let s = MAX_FIT_SCALE
            .min((window_width - FIT_MARGIN_X) / self.logical.width)
            .min((window_height - FIT_MARGIN_Y) / self.logical.height);
        s.max(MIN_DISPLAY_SCALE)
    }

    /// Viewport scaled to fit the window.
    pub fn fit(logical: LogicalSize, window_width: f32, window_height: f32) -> Self {
        let mut viewport = Self::new(1.0, logical);
        viewport.scale = viewport.fit_scale(window_width, window_height);
        viewport
    }

    pub fn display_rect(&self, left: f32, top: f32) -> DisplayRect {
        DisplayRect::new(
            left,
            top,
            self.logical.width * self.scale,
            self.logical.height * self.scale,
        )
    }

    pub fn mapper(&self, left: f32, top: f32) -> CoordinateMapper {
        CoordinateMapper::new(self.logical, self.display_rect(left, top))
    }
}
