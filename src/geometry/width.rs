//! Pressure to width mapping with an exponential low-pass filter.

use crate::constants::WIDTH_SMOOTHING;

/// Width a segment would have without smoothing: `ln(pressure + 1) * 2 * size`.
#[inline]
pub fn target_width(pressure: f32, size: f32) -> f32 {
    (pressure + 1.0).ln() * 2.0 * size
}

/// Running width filter for one stroke.
///
/// The first sample passes through unchanged; every later sample moves the
/// width `WIDTH_SMOOTHING` of the way toward its target, which damps the
/// jitter of noisy pressure readings.
#[derive(Clone, Debug)]
pub struct WidthSmoother {
    size: f32,
    current: Option<f32>,
}

impl WidthSmoother {
    pub fn new(size: f32) -> Self {
        Self {
            size,
            current: None,
        }
    }

    /// Feed the next pressure sample and return the smoothed width.
    pub fn next(&mut self, pressure: f32) -> f32 {
        let target = target_width(pressure, self.size);
        let width = match self.current {
            None => target,
            Some(previous) => WIDTH_SMOOTHING * target + (1.0 - WIDTH_SMOOTHING) * previous,
        };
        self.current = Some(width);
        width
    }

    pub fn current(&self) -> Option<f32> {
        self.current
    }

    pub fn size(&self) -> f32 {
        self.size
    }
}
