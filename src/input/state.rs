//! Input state machine for the stroke capture session.
//!
//! ## State Transitions
//!
//! ```text
//! Idle -> Drawing      (pointer down with pen or eraser, pointer captured)
//! Drawing -> Idle      (pointer up or cancel from the captured pointer)
//! ```
//!
//! Events from any pointer other than the captured one are ignored while
//! drawing.

use crate::types::StrokeStyle;

/// Unified input state for stroke capture.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum InputState {
    /// No stroke in progress
    #[default]
    Idle,

    /// A stroke is being captured
    Drawing {
        /// Pointer holding the capture
        pointer_id: i64,
        /// Style fixed at stroke start
        style: StrokeStyle,
    },
}

impl InputState {
    /// Returns true if the state is Idle
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    /// Returns true if currently drawing
    pub fn is_drawing(&self) -> bool {
        matches!(self, Self::Drawing { .. })
    }

    /// Pointer holding the capture, if drawing
    pub fn captured_pointer(&self) -> Option<i64> {
        match self {
            Self::Drawing { pointer_id, .. } => Some(*pointer_id),
            _ => None,
        }
    }

    /// True if `pointer_id` holds the capture
    pub fn owns(&self, pointer_id: i64) -> bool {
        self.captured_pointer() == Some(pointer_id)
    }

    pub fn style(&self) -> Option<StrokeStyle> {
        match self {
            Self::Drawing { style, .. } => Some(*style),
            _ => None,
        }
    }

    /// Capture `pointer_id` and start drawing
    pub fn start_drawing(&mut self, pointer_id: i64, style: StrokeStyle) {
        *self = Self::Drawing { pointer_id, style };
    }

    /// Reset to Idle state
    pub fn reset(&mut self) {
        *self = Self::Idle;
    }
}
