//! User settings persisted as JSON.
//!
//! Every field has a default, so a partial or empty file is valid. A missing
//! or unreadable file never blocks startup: [`InkSettings::load`] logs and
//! falls back to the defaults.

use crate::constants::{
    DEFAULT_FONT_SIZE, DEFAULT_PEN_COLOR, DEFAULT_PEN_SIZE, MAX_TOOL_SIZE, MAX_UNDO_ENTRIES,
    MIN_TOOL_SIZE, PALETTE,
};
use crate::error::InkResult;
use crate::geometry::{GeometryEngine, GeometryStrategy, OutlineOptions};
use crate::input::{LogicalSize, SchedulePolicy};
use crate::types::Color;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InkSettings {
    pub geometry: GeometryStrategy,
    pub outline: OutlineOptions,
    pub schedule: SchedulePolicy,
    pub pen_color: Color,
    /// Pen and eraser share this size
    pub tool_size: f32,
    pub palette: Vec<Color>,
    pub font_size: f32,
    pub undo_limit: usize,
    pub page_size: LogicalSize,
}

impl Default for InkSettings {
    fn default() -> Self {
        Self {
            geometry: GeometryStrategy::default(),
            outline: OutlineOptions::default(),
            schedule: SchedulePolicy::default(),
            pen_color: DEFAULT_PEN_COLOR.parse().unwrap_or(Color::BLACK),
            tool_size: DEFAULT_PEN_SIZE,
            palette: PALETTE.iter().filter_map(|c| c.parse().ok()).collect(),
            font_size: DEFAULT_FONT_SIZE,
            undo_limit: MAX_UNDO_ENTRIES,
            page_size: LogicalSize::default(),
        }
    }
}

impl InkSettings {
    /// `<config>/inkbook/settings.json`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("inkbook").join("settings.json"))
    }

    /// Settings from the default location, or defaults.
    pub fn load() -> Self {
        match Self::default_path() {
            Some(path) if path.exists() => Self::load_or_default(&path),
            _ => Self::default(),
        }
    }

    fn load_or_default(path: &Path) -> Self {
        match Self::load_from(path) {
            Ok(settings) => settings,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Failed to load settings, using defaults");
                Self::default()
            }
        }
    }

    pub fn load_from(path: impl AsRef<Path>) -> InkResult<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let settings: Self = serde_json::from_str(&content)?;
        debug!(path = %path.as_ref().display(), "Loaded settings");
        Ok(settings.sanitized())
    }

    pub fn save_to(&self, path: impl AsRef<Path>) -> InkResult<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    pub fn geometry_engine(&self) -> GeometryEngine {
        GeometryEngine::new(self.geometry, self.outline)
    }

    /// Clamp values a hand-edited file may have pushed out of range.
    fn sanitized(mut self) -> Self {
        self.tool_size = self.tool_size.clamp(MIN_TOOL_SIZE, MAX_TOOL_SIZE);
        if !(self.font_size.is_finite() && self.font_size > 0.0) {
            self.font_size = DEFAULT_FONT_SIZE;
        }
        self.undo_limit = self.undo_limit.max(1);
        if !(self.page_size.width >= 1.0 && self.page_size.height >= 1.0) {
            self.page_size = LogicalSize::default();
        }
        self
    }
}
