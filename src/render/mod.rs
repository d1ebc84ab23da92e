//! Rendering: coverage rasterization, pixel surfaces and the layered page
//! compositor.

pub mod compositor;
pub mod raster;
pub mod surface;

pub use compositor::LayeredCompositor;
pub use raster::{CoverageMask, PixelRect};
pub use surface::{CompositeOp, CompositeScope, Surface};
