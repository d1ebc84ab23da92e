//! Core types for the ink notebook.
//!
//! This module defines the persisted data model (points, strokes, text fields,
//! pages and notebooks) plus the small value types shared by the geometry,
//! rendering and input layers.

use crate::constants::{DEFAULT_PRESSURE, MIN_STROKE_POINTS};
use crate::error::InkError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

/// Milliseconds since the Unix epoch, used for `created_at` stamps.
pub fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

// ============================================================================
// Color
// ============================================================================

/// Straight-alpha RGBA color, serialized as a `#rrggbb` or `#rrggbbaa` string.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const TRANSPARENT: Color = Color::rgba(0, 0, 0, 0);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub fn is_opaque(&self) -> bool {
        self.a == 255
    }

    pub fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::BLACK
    }
}

impl FromStr for Color {
    type Err = InkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || InkError::InvalidColor(s.to_string());
        let hex = s.trim().strip_prefix('#').ok_or_else(invalid)?;
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid());
        }

        let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| invalid());
        let nibble = |i: usize| {
            u8::from_str_radix(&hex[i..i + 1], 16)
                .map(|n| n * 17)
                .map_err(|_| invalid())
        };

        match hex.len() {
            3 => Ok(Color::rgb(nibble(0)?, nibble(1)?, nibble(2)?)),
            6 => Ok(Color::rgb(byte(0)?, byte(2)?, byte(4)?)),
            8 => Ok(Color::rgba(byte(0)?, byte(2)?, byte(4)?, byte(6)?)),
            _ => Err(invalid()),
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)?;
        if self.a != 255 {
            write!(f, "{:02x}", self.a)?;
        }
        Ok(())
    }
}

impl TryFrom<String> for Color {
    type Error = InkError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_string()
    }
}

// ============================================================================
// Strokes
// ============================================================================

/// A single pressure-tagged sample in page-logical coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct StrokePoint {
    pub x: f32,
    pub y: f32,
    pub pressure: f32,
}

impl StrokePoint {
    pub fn new(x: f32, y: f32, pressure: f32) -> Self {
        Self { x, y, pressure }
    }

    /// A point with the default pressure, as recorded for a mouse.
    pub fn at(x: f32, y: f32) -> Self {
        Self::new(x, y, DEFAULT_PRESSURE)
    }
}

/// Tool a stroke was drawn with.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tool {
    #[default]
    Pen,
    Eraser,
}

/// Tool selected in the toolbar. Text is not a stroke tool.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolType {
    #[default]
    Pen,
    Eraser,
    Text,
}

impl ToolType {
    /// The stroke tool for this selection, or `None` for the text tool.
    pub fn stroke_tool(self) -> Option<Tool> {
        match self {
            ToolType::Pen => Some(Tool::Pen),
            ToolType::Eraser => Some(Tool::Eraser),
            ToolType::Text => None,
        }
    }
}

/// Visual parameters shared by every segment of a stroke.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct StrokeStyle {
    pub color: Color,
    pub tool: Tool,
    pub size: f32,
}

impl StrokeStyle {
    pub fn pen(color: Color, size: f32) -> Self {
        Self {
            color,
            tool: Tool::Pen,
            size,
        }
    }

    pub fn eraser(size: f32) -> Self {
        Self {
            color: Color::BLACK,
            tool: Tool::Eraser,
            size,
        }
    }

    pub fn is_eraser(&self) -> bool {
        self.tool == Tool::Eraser
    }
}

/// A committed, immutable stroke.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Stroke {
    pub id: Uuid,
    pub points: Vec<StrokePoint>,
    pub color: Color,
    pub tool: Tool,
    pub size: f32,
}

impl Stroke {
    /// Build a stroke with a fresh id, or `None` when there are too few points
    /// to ever be persisted.
    pub fn new(points: Vec<StrokePoint>, style: StrokeStyle) -> Option<Self> {
        if points.len() < MIN_STROKE_POINTS {
            return None;
        }
        Some(Self {
            id: Uuid::new_v4(),
            points,
            color: style.color,
            tool: style.tool,
            size: style.size,
        })
    }

    pub fn style(&self) -> StrokeStyle {
        StrokeStyle {
            color: self.color,
            tool: self.tool,
            size: self.size,
        }
    }

    pub fn is_eraser(&self) -> bool {
        self.tool == Tool::Eraser
    }
}

// ============================================================================
// Text Fields
// ============================================================================

/// A text annotation anchored at a page-logical point.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextField {
    pub id: Uuid,
    pub x: f32,
    pub y: f32,
    pub text: String,
    pub color: Color,
    pub font_size: f32,
}

impl TextField {
    pub fn new(x: f32, y: f32, color: Color, font_size: f32) -> Self {
        Self {
            id: Uuid::new_v4(),
            x,
            y,
            text: String::new(),
            color,
            font_size,
        }
    }

    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

// ============================================================================
// Pages & Notebooks
// ============================================================================

/// Paper background of a page.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageTemplate {
    #[default]
    Blank,
    Squared,
    Lined,
}

/// The unit of persistence and of undo tracking.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    pub id: String,
    pub notebook_id: String,
    pub template: PageTemplate,
    pub strokes: Vec<Stroke>,
    #[serde(default)]
    pub text_fields: Vec<TextField>,
    pub created_at: u64,
}

impl Page {
    pub fn new(notebook_id: impl Into<String>, template: PageTemplate) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            notebook_id: notebook_id.into(),
            template,
            strokes: Vec::new(),
            text_fields: Vec::new(),
            created_at: now_millis(),
        }
    }

    pub fn stroke_count(&self) -> usize {
        self.strokes.len()
    }

    pub fn text_field(&self, id: Uuid) -> Option<&TextField> {
        self.text_fields.iter().find(|f| f.id == id)
    }
}

/// An ordered collection of pages, referenced by id.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notebook {
    pub id: String,
    pub title: String,
    pub created_at: u64,
    pub page_ids: Vec<String>,
}

impl Notebook {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            title: title.into(),
            created_at: now_millis(),
            page_ids: Vec::new(),
        }
    }
}
