//! Text field placement and lifecycle.
//!
//! Fields live on the page next to the strokes but outside the stroke replay
//! model, so the eraser never touches them. A field that loses focus with
//! only whitespace in it is removed.

use crate::constants::{
    MIN_TEXT_FIELD_HEIGHT, MIN_TEXT_FIELD_WIDTH, TEXT_FIELD_PADDING_X, TEXT_FIELD_PADDING_Y,
    TEXT_LINE_HEIGHT,
};
use crate::spatial_index::SpatialIndex;
use crate::types::{Color, TextField};
use tracing::debug;
use uuid::Uuid;

/// Average glyph advance as a fraction of the font size
const GLYPH_ADVANCE: f32 = 0.6;

/// Estimated on-page size of a field's box.
pub fn field_box(field: &TextField) -> (f32, f32) {
    let lines = field.text.split('\n').count().max(1);
    let longest = field
        .text
        .split('\n')
        .map(|line| line.chars().count())
        .max()
        .unwrap_or(0);

    let width = longest as f32 * field.font_size * GLYPH_ADVANCE + 2.0 * TEXT_FIELD_PADDING_X;
    let height = lines as f32 * field.font_size * TEXT_LINE_HEIGHT + 2.0 * TEXT_FIELD_PADDING_Y;
    (width.max(MIN_TEXT_FIELD_WIDTH), height.max(MIN_TEXT_FIELD_HEIGHT))
}

/// What a blur did to the field.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BlurOutcome {
    /// The field keeps its text
    Committed(Uuid),
    /// The field was blank and has been removed
    Deleted(Uuid),
    /// No such field
    Missing,
}

/// What a tap on the page did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TapOutcome {
    /// A new empty field was placed and focused
    Created(Uuid),
    /// An existing field under the tap was focused
    Focused(Uuid),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Tap {
    /// Result of blurring the previously focused field, if another one was
    pub blurred: Option<BlurOutcome>,
    pub outcome: TapOutcome,
}

/// Focus state and hit testing for one page's text fields.
#[derive(Default)]
pub struct AnnotationOverlay {
    index: SpatialIndex,
    focused: Option<Uuid>,
    auto_focus: Option<Uuid>,
}

impl AnnotationOverlay {
    pub fn new(fields: &[TextField]) -> Self {
        let mut overlay = Self::default();
        overlay.reindex(fields);
        overlay
    }

    /// Rebuild hit boxes after the field list changed out of band.
    pub fn reindex(&mut self, fields: &[TextField]) {
        self.index
            .rebuild(fields.iter().map(|f| (f.id, (f.x, f.y), field_box(f))));
        if self.focused.is_some_and(|id| !fields.iter().any(|f| f.id == id)) {
            self.focused = None;
        }
        if self.auto_focus.is_some_and(|id| !fields.iter().any(|f| f.id == id)) {
            self.auto_focus = None;
        }
    }

    pub fn focused(&self) -> Option<Uuid> {
        self.focused
    }

    /// Field that should receive keyboard focus once it is shown.
    pub fn auto_focus(&self) -> Option<Uuid> {
        self.auto_focus
    }

    pub fn take_auto_focus(&mut self) -> Option<Uuid> {
        self.auto_focus.take()
    }

    /// Topmost field under a page-logical point.
    pub fn hit_test(&self, x: f32, y: f32) -> Option<Uuid> {
        self.index.topmost_at(x, y)
    }

    /// Text tool pointer-down: focus the field under the point, or place a new
    /// one there. A different field that had focus is blurred first.
    pub fn tap(
        &mut self,
        fields: &mut Vec<TextField>,
        x: f32,
        y: f32,
        color: Color,
        font_size: f32,
    ) -> Tap {
        let hit = self.hit_test(x, y);
        let focused = self.focused;
        let blurred = match focused {
            Some(current) if Some(current) != hit => Some(self.blur(fields, current)),
            _ => None,
        };

        // The blur may have removed the field that was hit.
        let outcome = match hit.filter(|id| fields.iter().any(|f| f.id == *id)) {
            Some(id) => {
                self.focused = Some(id);
                TapOutcome::Focused(id)
            }
            None => TapOutcome::Created(self.place(fields, x, y, color, font_size)),
        };
        Tap { blurred, outcome }
    }

    /// Append an empty field at the point and give it focus.
    pub fn place(
        &mut self,
        fields: &mut Vec<TextField>,
        x: f32,
        y: f32,
        color: Color,
        font_size: f32,
    ) -> Uuid {
        let field = TextField::new(x, y, color, font_size);
        let id = field.id;
        self.index.insert(id, (x, y), field_box(&field));
        fields.push(field);
        self.focused = Some(id);
        self.auto_focus = Some(id);
        debug!(field_id = %id, x, y, "Placed text field");
        id
    }

    /// Replace a field's text. Returns `false` for an unknown id.
    pub fn edit(&mut self, fields: &mut [TextField], id: Uuid, text: impl Into<String>) -> bool {
        let Some(field) = fields.iter_mut().find(|f| f.id == id) else {
            return false;
        };
        field.text = text.into();
        self.index.insert(id, (field.x, field.y), field_box(field));
        true
    }

    /// Focus left the field: blank fields are deleted, others committed.
    pub fn blur(&mut self, fields: &mut Vec<TextField>, id: Uuid) -> BlurOutcome {
        if self.focused == Some(id) {
            self.focused = None;
        }
        if self.auto_focus == Some(id) {
            self.auto_focus = None;
        }
        match fields.iter().find(|f| f.id == id) {
            None => BlurOutcome::Missing,
            Some(field) if field.is_blank() => {
                self.delete(fields, id);
                BlurOutcome::Deleted(id)
            }
            Some(_) => BlurOutcome::Committed(id),
        }
    }

    /// Escape: blur the focused field, if any.
    pub fn dismiss(&mut self, fields: &mut Vec<TextField>) -> Option<BlurOutcome> {
        let id = self.focused?;
        Some(self.blur(fields, id))
    }

    /// Remove a field regardless of its text. Returns `false` for an unknown id.
    pub fn delete(&mut self, fields: &mut Vec<TextField>, id: Uuid) -> bool {
        let before = fields.len();
        fields.retain(|f| f.id != id);
        self.index.remove(id);
        if self.focused == Some(id) {
            self.focused = None;
        }
        if self.auto_focus == Some(id) {
            self.auto_focus = None;
        }
        let removed = fields.len() != before;
        if removed {
            debug!(field_id = %id, "Deleted text field");
        }
        removed
    }
}
