//! Editing sessions over pages and notebooks.
//!
//! A [`PageEditor`] binds one page to its compositor, input session and text
//! overlay. A [`NotebookEditor`] owns the page editors of an open notebook,
//! the shared undo stack and the store handle, and persists every change.

mod notebook;
mod page;

pub use notebook::{NotebookEditor, PageObserver, SyncState};
pub use page::PageEditor;

use crate::constants::{DEFAULT_FONT_SIZE, DEFAULT_PEN_SIZE, MAX_TOOL_SIZE, MIN_TOOL_SIZE};
use crate::settings::InkSettings;
use crate::types::{Color, StrokeStyle, ToolType};
use uuid::Uuid;

/// Toolbar state: the selected tool, ink color and shared size.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ToolSettings {
    pub active: ToolType,
    pub color: Color,
    pub size: f32,
    pub font_size: f32,
}

impl Default for ToolSettings {
    fn default() -> Self {
        Self {
            active: ToolType::Pen,
            color: Color::BLACK,
            size: DEFAULT_PEN_SIZE,
            font_size: DEFAULT_FONT_SIZE,
        }
    }
}

impl ToolSettings {
    pub fn from_settings(settings: &InkSettings) -> Self {
        Self {
            active: ToolType::Pen,
            color: settings.pen_color,
            size: settings.tool_size.clamp(MIN_TOOL_SIZE, MAX_TOOL_SIZE),
            font_size: settings.font_size,
        }
    }

    /// Stroke style for the active tool, or `None` for the text tool.
    pub fn style(&self) -> Option<StrokeStyle> {
        match self.active {
            ToolType::Pen => Some(StrokeStyle::pen(self.color, self.size)),
            ToolType::Eraser => Some(StrokeStyle::eraser(self.size)),
            ToolType::Text => None,
        }
    }

    pub fn select_tool(&mut self, tool: ToolType) {
        self.active = tool;
    }

    /// Picking a color switches to the pen.
    pub fn select_color(&mut self, color: Color) {
        self.color = color;
        self.active = ToolType::Pen;
    }

    pub fn set_size(&mut self, size: f32) {
        if size.is_finite() {
            self.size = size.clamp(MIN_TOOL_SIZE, MAX_TOOL_SIZE);
        }
    }
}

/// What a page mutation did, as reported to observers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PageChange {
    StrokeAdded(Uuid),
    StrokeRemoved(Uuid),
    TextFieldAdded(Uuid),
    TextFieldUpdated(Uuid),
    TextFieldRemoved(Uuid),
}
