//! Performance monitoring utilities.
//!
//! Tracks how long each display frame spends flushing buffered samples, and
//! provides scoped timers for the hot paths (static-layer rebuild, commit).
//!
//! ## Usage
//!
//! Enable profiling with the `profiling` feature flag:
//! ```toml
//! [dependencies]
//! inkbook = { features = ["profiling"] }
//! ```
//!
//! ```ignore
//! fn rebuild(&mut self) {
//!     profile_scope!("rebuild_static_layer");
//!     // ... replay ...
//! }
//! ```

use crate::constants::TARGET_FRAME_MS;
use std::collections::VecDeque;
use std::time::Instant;
use tracing::warn;

// ============================================================================
// Constants
// ============================================================================

/// Number of frames kept for rolling averages
const SAMPLE_COUNT: usize = 60;

/// Frames slower than this multiple of the target are logged
const WARN_THRESHOLD: f64 = 2.0;

// ============================================================================
// Profiling Macros (zero-cost when disabled)
// ============================================================================

/// Profile a scope with the given name. Zero-cost when profiling is disabled.
#[macro_export]
macro_rules! profile_scope {
    ($name:expr) => {
        #[cfg(feature = "profiling")]
        let _timer = $crate::perf::ScopedTimer::new($name, $crate::perf::PROFILE_THRESHOLD_MS);
        #[cfg(not(feature = "profiling"))]
        let _ = $name;
    };
    ($name:expr, $threshold_ms:expr) => {
        #[cfg(feature = "profiling")]
        let _timer = $crate::perf::ScopedTimer::new($name, $threshold_ms);
        #[cfg(not(feature = "profiling"))]
        let _ = ($name, $threshold_ms);
    };
}

pub use crate::profile_scope;

// ============================================================================
// Frame Monitor
// ============================================================================

/// Rolling statistics for per-frame sample flushing.
#[derive(Debug, Clone)]
pub struct FrameMonitor {
    /// Recent flush times in milliseconds
    frame_times: VecDeque<f64>,
    /// Samples flushed in each recent frame
    frame_samples: VecDeque<usize>,
    frame_start: Option<Instant>,
    slow_frame_count: u64,
    total_frames: u64,
    total_samples: u64,
}

impl Default for FrameMonitor {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameMonitor {
    pub fn new() -> Self {
        Self {
            frame_times: VecDeque::with_capacity(SAMPLE_COUNT),
            frame_samples: VecDeque::with_capacity(SAMPLE_COUNT),
            frame_start: None,
            slow_frame_count: 0,
            total_frames: 0,
            total_samples: 0,
        }
    }

    /// Mark the start of a frame.
    pub fn begin_frame(&mut self) {
        self.frame_start = Some(Instant::now());
    }

    /// Mark the end of a frame that flushed `samples` points.
    /// Returns the frame time in milliseconds.
    pub fn end_frame(&mut self, samples: usize) -> Option<f64> {
        let start = self.frame_start.take()?;
        let ms = start.elapsed().as_secs_f64() * 1000.0;
        self.record_frame(ms, samples);
        Some(ms)
    }

    /// Record a frame that took `ms` and flushed `samples` points.
    pub fn record_frame(&mut self, ms: f64, samples: usize) {
        if self.frame_times.len() >= SAMPLE_COUNT {
            self.frame_times.pop_front();
            self.frame_samples.pop_front();
        }
        self.frame_times.push_back(ms);
        self.frame_samples.push_back(samples);
        self.total_frames += 1;
        self.total_samples += samples as u64;

        if ms > TARGET_FRAME_MS * WARN_THRESHOLD {
            self.slow_frame_count += 1;
            warn!(
                frame_time_ms = format!("{:.2}", ms),
                target_ms = format!("{:.2}", TARGET_FRAME_MS),
                samples,
                "Slow frame detected"
            );
        }
    }

    /// Average frame time over recent frames.
    pub fn average_frame_time(&self) -> f64 {
        if self.frame_times.is_empty() {
            return 0.0;
        }
        self.frame_times.iter().sum::<f64>() / self.frame_times.len() as f64
    }

    pub fn max_frame_time(&self) -> f64 {
        self.frame_times.iter().copied().fold(0.0, f64::max)
    }

    /// Average samples flushed per recent frame.
    pub fn average_samples_per_frame(&self) -> f64 {
        if self.frame_samples.is_empty() {
            return 0.0;
        }
        self.frame_samples.iter().sum::<usize>() as f64 / self.frame_samples.len() as f64
    }

    /// Percentage of all frames that were slow.
    pub fn slow_frame_percentage(&self) -> f64 {
        if self.total_frames == 0 {
            return 0.0;
        }
        (self.slow_frame_count as f64 / self.total_frames as f64) * 100.0
    }

    pub fn total_frames(&self) -> u64 {
        self.total_frames
    }

    pub fn total_samples(&self) -> u64 {
        self.total_samples
    }

    /// Warn when recent frames averaged over budget. Returns whether it did.
    pub fn log_summary_if_slow(&self) -> bool {
        let avg = self.average_frame_time();
        if avg <= TARGET_FRAME_MS {
            return false;
        }
        warn!(
            avg_frame_ms = format!("{:.2}", avg),
            max_frame_ms = format!("{:.2}", self.max_frame_time()),
            slow_percentage = format!("{:.1}%", self.slow_frame_percentage()),
            samples_per_frame = format!("{:.1}", self.average_samples_per_frame()),
            "Input flushing below target"
        );
        true
    }

    pub fn reset(&mut self) {
        self.frame_times.clear();
        self.frame_samples.clear();
        self.frame_start = None;
        self.slow_frame_count = 0;
        self.total_frames = 0;
        self.total_samples = 0;
    }
}

// ============================================================================
// Scoped Timer
// ============================================================================

/// Threshold used by `profile_scope!` without an explicit one
pub const PROFILE_THRESHOLD_MS: f64 = 1.0;

/// Times a scope and warns on drop when it ran longer than its budget.
pub struct ScopedTimer {
    name: &'static str,
    start: Instant,
    threshold_ms: f64,
    armed: bool,
}

impl ScopedTimer {
    pub fn new(name: &'static str, threshold_ms: f64) -> Self {
        Self {
            name,
            start: Instant::now(),
            threshold_ms,
            armed: true,
        }
    }

    pub fn elapsed_ms(&self) -> f64 {
        self.start.elapsed().as_secs_f64() * 1000.0
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Stop without logging and return the elapsed milliseconds.
    pub fn finish(mut self) -> f64 {
        self.armed = false;
        self.elapsed_ms()
    }

    fn over_budget(&self) -> Option<f64> {
        let elapsed_ms = self.elapsed_ms();
        (elapsed_ms > self.threshold_ms).then_some(elapsed_ms)
    }
}

impl Drop for ScopedTimer {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        if let Some(elapsed_ms) = self.over_budget() {
            warn!(
                operation = self.name,
                elapsed_ms = format!("{:.2}", elapsed_ms),
                threshold_ms = format!("{:.2}", self.threshold_ms),
                "Slow operation"
            );
        }
    }
}

// ============================================================================
// Timing Utilities
// ============================================================================

/// Run a closure and return its result with the elapsed milliseconds.
#[inline]
pub fn measure<T, F: FnOnce() -> T>(f: F) -> (T, f64) {
    let start = Instant::now();
    let result = f();
    (result, start.elapsed().as_secs_f64() * 1000.0)
}

/// Run a closure and warn if it exceeds `threshold_ms`.
#[inline]
pub fn measure_and_log<T, F: FnOnce() -> T>(name: &str, threshold_ms: f64, f: F) -> T {
    let (result, elapsed_ms) = measure(f);
    if elapsed_ms > threshold_ms {
        warn!(
            operation = name,
            elapsed_ms = format!("{:.2}", elapsed_ms),
            threshold_ms = format!("{:.2}", threshold_ms),
            "Slow operation"
        );
    }
    result
}
