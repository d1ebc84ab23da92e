//! Pointer lifecycle for stroke capture.
//!
//! The session owns the hot-path state of a stroke in progress: which pointer
//! holds the capture and the samples not yet painted. Samples are painted
//! either as they arrive or once per display frame, depending on the
//! [`SchedulePolicy`]. Either way they reach the compositor in arrival order,
//! and release or cancel flushes whatever is pending before committing.

use super::coords::CoordinateMapper;
use super::device::{DeviceReading, PointerEvent, classify};
use super::state::InputState;
use crate::perf::FrameMonitor;
use crate::render::LayeredCompositor;
use crate::types::{Stroke, StrokePoint, StrokeStyle};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

/// When buffered samples are painted.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SchedulePolicy {
    /// Buffer samples and paint them in [`InputSession::frame`]
    #[default]
    PerFrame,
    /// Paint every sample inside the move handler
    PerEvent,
}

/// Callback told what kind of device started each stroke.
pub type DeviceObserver = Box<dyn FnMut(&DeviceReading)>;

pub struct InputSession {
    policy: SchedulePolicy,
    state: InputState,
    pending: Vec<StrokePoint>,
    monitor: FrameMonitor,
    device_observer: Option<DeviceObserver>,
}

impl Default for InputSession {
    fn default() -> Self {
        Self::new(SchedulePolicy::default())
    }
}

impl InputSession {
    pub fn new(policy: SchedulePolicy) -> Self {
        Self {
            policy,
            state: InputState::Idle,
            pending: Vec::new(),
            monitor: FrameMonitor::new(),
            device_observer: None,
        }
    }

    pub fn policy(&self) -> SchedulePolicy {
        self.policy
    }

    /// Change the policy. Samples already buffered are still painted by the
    /// next `frame` or on release.
    pub fn set_policy(&mut self, policy: SchedulePolicy) {
        self.policy = policy;
    }

    pub fn state(&self) -> &InputState {
        &self.state
    }

    pub fn is_drawing(&self) -> bool {
        self.state.is_drawing()
    }

    /// Samples captured but not yet painted.
    pub fn pending(&self) -> &[StrokePoint] {
        &self.pending
    }

    pub fn monitor(&self) -> &FrameMonitor {
        &self.monitor
    }

    pub fn set_device_observer(&mut self, observer: impl FnMut(&DeviceReading) + 'static) {
        self.device_observer = Some(Box::new(observer));
    }

    pub fn clear_device_observer(&mut self) {
        self.device_observer = None;
    }

    /// Start a stroke and capture the pointer. Returns `false` when the event
    /// is ignored: a stroke is already in progress, the page is not displayed,
    /// or the compositor has no surface.
    pub fn pointer_down(
        &mut self,
        event: &PointerEvent,
        mapper: &CoordinateMapper,
        style: StrokeStyle,
        compositor: &mut LayeredCompositor,
    ) -> bool {
        if self.state.is_drawing() {
            return false;
        }
        let Some(point) = mapper.map_event(event) else {
            return false;
        };
        if !compositor.begin_stroke(style) {
            return false;
        }

        self.state.start_drawing(event.pointer_id, style);
        if let Some(observer) = self.device_observer.as_mut() {
            observer(&classify(event));
        }
        debug!(pointer_id = event.pointer_id, kind = ?event.kind, "Pointer captured");

        self.pending.clear();
        self.push(point, compositor);
        true
    }

    /// Record a sample from the captured pointer. Other pointers are ignored.
    pub fn pointer_move(
        &mut self,
        event: &PointerEvent,
        mapper: &CoordinateMapper,
        compositor: &mut LayeredCompositor,
    ) -> bool {
        if !self.state.owns(event.pointer_id) {
            return false;
        }
        let Some(point) = mapper.map_event(event) else {
            return false;
        };
        self.push(point, compositor);
        true
    }

    /// Display-refresh callback: paint everything buffered since the last
    /// frame. Returns the number of samples painted.
    pub fn frame(&mut self, compositor: &mut LayeredCompositor) -> usize {
        if self.pending.is_empty() {
            return 0;
        }
        self.monitor.begin_frame();
        let flushed = self.flush(compositor);
        self.monitor.end_frame(flushed);
        trace!(samples = flushed, "Flushed frame");
        flushed
    }

    /// Release the captured pointer and commit the stroke.
    pub fn pointer_up(
        &mut self,
        event: &PointerEvent,
        compositor: &mut LayeredCompositor,
    ) -> Option<Stroke> {
        self.finish(event.pointer_id, compositor)
    }

    /// Capture was lost. Treated exactly like a release.
    pub fn pointer_cancel(
        &mut self,
        pointer_id: i64,
        compositor: &mut LayeredCompositor,
    ) -> Option<Stroke> {
        self.finish(pointer_id, compositor)
    }

    /// Drop the stroke in progress without committing it.
    pub fn abort(&mut self, compositor: &mut LayeredCompositor) {
        self.pending.clear();
        self.state.reset();
        compositor.discard_stroke();
    }

    fn finish(&mut self, pointer_id: i64, compositor: &mut LayeredCompositor) -> Option<Stroke> {
        if !self.state.owns(pointer_id) {
            return None;
        }
        self.flush(compositor);
        self.state.reset();
        let stroke = compositor.commit_stroke();
        self.monitor.log_summary_if_slow();
        stroke
    }

    fn push(&mut self, point: StrokePoint, compositor: &mut LayeredCompositor) {
        self.pending.push(point);
        if self.policy == SchedulePolicy::PerEvent {
            self.flush(compositor);
        }
    }

    fn flush(&mut self, compositor: &mut LayeredCompositor) -> usize {
        let count = self.pending.len();
        if count > 0 {
            compositor.extend_stroke(&self.pending);
            self.pending.clear();
        }
        count
    }
}
