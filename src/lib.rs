//! Freehand stroke capture and rendering for a digital-ink notebook.
//!
//! Pointer samples are mapped onto a fixed logical page, shaped by a
//! pressure-sensitive geometry engine and painted onto a two-layer raster
//! (committed strokes below, the stroke in progress above). Committed strokes
//! replay deterministically, so the same stroke list always produces the
//! same pixels.

pub mod annotation;
pub mod constants;
pub mod editor;
pub mod error;
pub mod geometry;
pub mod input;
pub mod logging;
pub mod perf;
pub mod render;
pub mod settings;
pub mod settings_watcher;
pub mod spatial_index;
pub mod store;
pub mod types;
pub mod undo;

pub use editor::{NotebookEditor, PageChange, PageEditor, SyncState, ToolSettings};
pub use error::{InkError, InkResult, StoreError, StoreResult};
pub use geometry::{GeometryEngine, GeometryStrategy, OutlineOptions};
pub use input::{CoordinateMapper, InputSession, LogicalSize, PointerEvent, SchedulePolicy, Viewport};
pub use render::{LayeredCompositor, Surface};
pub use settings::InkSettings;
pub use store::{FsPageStore, MemoryPageStore, PageStore};
pub use types::{Color, Notebook, Page, PageTemplate, Stroke, StrokePoint, StrokeStyle, TextField, Tool, ToolType};
pub use undo::UndoController;
