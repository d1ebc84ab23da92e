//! Pointer input handling for a page.
//!
//! ## Architecture
//!
//! The input system uses an explicit state machine (`InputState`) to track
//! whether a stroke is being captured and by which pointer. Device positions
//! are converted to page-logical samples by the `CoordinateMapper`, buffered
//! by the `InputSession` and handed to the compositor.
//!
//! ## Modules
//!
//! - `coords` - Device to page coordinate mapping and scale-to-fit
//! - `device` - Raw pointer events and device classification
//! - `state` - Input state machine enum and helper methods
//! - `session` - Pointer lifecycle, capture and per-frame flushing

pub mod coords;
pub mod device;
mod session;
mod state;

pub use coords::{CoordinateMapper, DisplayRect, LogicalSize, Viewport, resolve_pressure};
pub use device::{DeviceClass, DeviceReading, PointerEvent, PointerKind, TouchType, classify};
pub use session::{DeviceObserver, InputSession, SchedulePolicy};
pub use state::InputState;
