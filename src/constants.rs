//! Engine-wide constants.
//!
//! Centralizes magic numbers for the page resolution, pressure handling and
//! tool defaults so the geometry and input code stays free of literals.

// ============================================================================
// Page Geometry
// ============================================================================

/// Logical page width in pixels (A4 at 96 dpi)
pub const PAGE_WIDTH: u32 = 794;

/// Logical page height in pixels (A4 at 96 dpi)
pub const PAGE_HEIGHT: u32 = 1123;

/// Horizontal window margin reserved when fitting a page on screen
pub const FIT_MARGIN_X: f32 = 32.0;

/// Vertical window margin reserved when fitting a page on screen (toolbar + padding)
pub const FIT_MARGIN_Y: f32 = 120.0;

/// Smallest scale a page is ever displayed at
pub const MIN_DISPLAY_SCALE: f32 = 0.1;

/// Largest scale used by scale-to-fit
pub const MAX_FIT_SCALE: f32 = 1.0;

// ============================================================================
// Pressure & Width
// ============================================================================

/// Pressure recorded when the device reports none (mouse, pressure-less touch)
pub const DEFAULT_PRESSURE: f32 = 0.5;

/// Weight of the new target width in the exponential width filter
pub const WIDTH_SMOOTHING: f32 = 0.2;

/// Points a committed stroke must have
pub const MIN_STROKE_POINTS: usize = 2;

// ============================================================================
// Outline Defaults
// ============================================================================

/// How much pressure affects the outline radius
pub const DEFAULT_THINNING: f32 = 0.5;

/// Minimum spacing between outline vertices, as a fraction of the size
pub const DEFAULT_SMOOTHING: f32 = 0.5;

/// How strongly the centre line lags behind raw input
pub const DEFAULT_STREAMLINE: f32 = 0.5;

/// Rate at which simulated pressure follows drawing speed
pub const RATE_OF_PRESSURE_CHANGE: f32 = 0.275;

/// Vertices used for each round outline cap
pub const CAP_SEGMENTS: usize = 13;

// ============================================================================
// Tool Defaults
// ============================================================================

/// Default tool size, shared by pen and eraser
pub const DEFAULT_PEN_SIZE: f32 = 4.0;

/// Minimum tool size
pub const MIN_TOOL_SIZE: f32 = 1.0;

/// Maximum tool size
pub const MAX_TOOL_SIZE: f32 = 40.0;

/// Default ink color
pub const DEFAULT_PEN_COLOR: &str = "#000000";

/// Built-in palette: black, blue, green, yellow, red
pub const PALETTE: [&str; 5] = ["#000000", "#2196F3", "#4CAF50", "#FFC107", "#F44336"];

/// Paper background used when flattening a page for export
pub const PAPER_COLOR: &str = "#fafaf8";

// ============================================================================
// Text Fields
// ============================================================================

/// Default font size for text fields
pub const DEFAULT_FONT_SIZE: f32 = 16.0;

/// Minimum on-page width of a text field box
pub const MIN_TEXT_FIELD_WIDTH: f32 = 150.0;

/// Minimum on-page height of a text field box
pub const MIN_TEXT_FIELD_HEIGHT: f32 = 40.0;

/// Horizontal padding inside a text field box
pub const TEXT_FIELD_PADDING_X: f32 = 12.0;

/// Vertical padding inside a text field box
pub const TEXT_FIELD_PADDING_Y: f32 = 8.0;

/// Line height multiplier for text field content
pub const TEXT_LINE_HEIGHT: f32 = 1.2;

// ============================================================================
// History & Timing
// ============================================================================

/// Maximum page ids kept on the undo stack
pub const MAX_UNDO_ENTRIES: usize = 50;

/// Target frame time for 60 FPS
pub const TARGET_FRAME_MS: f64 = 16.67;
