use super::{PageChange, ToolSettings};
use crate::annotation::{AnnotationOverlay, BlurOutcome, TapOutcome};
use crate::geometry::GeometryEngine;
use crate::input::{CoordinateMapper, InputSession, LogicalSize, PointerEvent, SchedulePolicy};
use crate::render::LayeredCompositor;
use crate::types::{Color, Page, ToolType};
use image::RgbaImage;
use tracing::debug;
use uuid::Uuid;

/// One page's live editing state.
///
/// The editor is the only writer of its page's stroke list. Changes are
/// reported as [`PageChange`] values; persisting them is the caller's job.
pub struct PageEditor {
    page: Page,
    compositor: LayeredCompositor,
    session: InputSession,
    overlay: AnnotationOverlay,
    logical: LogicalSize,
}

impl PageEditor {
    /// Attach surfaces at the logical resolution and paint the page's strokes.
    pub fn new(
        page: Page,
        geometry: GeometryEngine,
        policy: SchedulePolicy,
        logical: LogicalSize,
    ) -> Self {
        let mut compositor = LayeredCompositor::new(geometry);
        let (width, height) = logical.pixels();
        compositor.attach(width, height);
        compositor.rebuild(&page.strokes);

        let overlay = AnnotationOverlay::new(&page.text_fields);
        Self {
            page,
            compositor,
            session: InputSession::new(policy),
            overlay,
            logical,
        }
    }

    pub fn id(&self) -> &str {
        &self.page.id
    }

    pub fn page(&self) -> &Page {
        &self.page
    }

    pub fn compositor(&self) -> &LayeredCompositor {
        &self.compositor
    }

    pub fn session(&self) -> &InputSession {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut InputSession {
        &mut self.session
    }

    pub fn overlay(&self) -> &AnnotationOverlay {
        &self.overlay
    }

    pub fn logical(&self) -> LogicalSize {
        self.logical
    }

    pub fn is_drawing(&self) -> bool {
        self.session.is_drawing()
    }

    // ------------------------------------------------------------------------
    // Pointer routing
    // ------------------------------------------------------------------------

    /// Route a pointer-down by tool. A press on a text field focuses it and
    /// never starts a stroke. The text tool places or focuses a field; pen and
    /// eraser blur any focused field and start a stroke.
    pub fn pointer_down(
        &mut self,
        event: &PointerEvent,
        mapper: &CoordinateMapper,
        tools: &ToolSettings,
    ) -> Vec<PageChange> {
        let Some((x, y)) = mapper.map(event.client_x, event.client_y) else {
            return Vec::new();
        };

        let on_field = self.overlay.hit_test(x, y).is_some();
        if on_field || tools.active == ToolType::Text {
            let tap = self.overlay.tap(
                &mut self.page.text_fields,
                x,
                y,
                tools.color,
                tools.font_size,
            );
            let mut changes: Vec<PageChange> = tap.blurred.and_then(blur_change).into_iter().collect();
            if let TapOutcome::Created(id) = tap.outcome {
                changes.push(PageChange::TextFieldAdded(id));
            }
            return changes;
        }

        let changes: Vec<PageChange> = self
            .overlay
            .dismiss(&mut self.page.text_fields)
            .and_then(blur_change)
            .into_iter()
            .collect();
        if let Some(style) = tools.style() {
            self.session
                .pointer_down(event, mapper, style, &mut self.compositor);
        }
        changes
    }

    pub fn pointer_move(&mut self, event: &PointerEvent, mapper: &CoordinateMapper) -> bool {
        self.session.pointer_move(event, mapper, &mut self.compositor)
    }

    /// Display-refresh tick. Returns the samples painted.
    pub fn frame(&mut self) -> usize {
        self.session.frame(&mut self.compositor)
    }

    pub fn pointer_up(&mut self, event: &PointerEvent) -> Option<PageChange> {
        let stroke = self.session.pointer_up(event, &mut self.compositor)?;
        Some(self.append(stroke))
    }

    pub fn pointer_cancel(&mut self, pointer_id: i64) -> Option<PageChange> {
        let stroke = self.session.pointer_cancel(pointer_id, &mut self.compositor)?;
        Some(self.append(stroke))
    }

    fn append(&mut self, stroke: crate::types::Stroke) -> PageChange {
        let id = stroke.id;
        self.page.strokes.push(stroke);
        PageChange::StrokeAdded(id)
    }

    // ------------------------------------------------------------------------
    // Text fields
    // ------------------------------------------------------------------------

    pub fn edit_text(&mut self, id: Uuid, text: impl Into<String>) -> Option<PageChange> {
        self.overlay
            .edit(&mut self.page.text_fields, id, text)
            .then_some(PageChange::TextFieldUpdated(id))
    }

    pub fn blur_text(&mut self, id: Uuid) -> Option<PageChange> {
        blur_change(self.overlay.blur(&mut self.page.text_fields, id))
    }

    /// Escape key: blur whichever field has focus.
    pub fn dismiss_text(&mut self) -> Option<PageChange> {
        self.overlay
            .dismiss(&mut self.page.text_fields)
            .and_then(blur_change)
    }

    pub fn delete_text(&mut self, id: Uuid) -> Option<PageChange> {
        self.overlay
            .delete(&mut self.page.text_fields, id)
            .then_some(PageChange::TextFieldRemoved(id))
    }

    pub fn take_auto_focus(&mut self) -> Option<Uuid> {
        self.overlay.take_auto_focus()
    }

    // ------------------------------------------------------------------------
    // Whole-page updates
    // ------------------------------------------------------------------------

    /// Drop the newest stroke and repaint. A stroke in progress is abandoned.
    pub fn remove_last_stroke(&mut self) -> Option<PageChange> {
        let stroke = self.page.strokes.pop()?;
        self.session.abort(&mut self.compositor);
        self.compositor.rebuild(&self.page.strokes);
        debug!(page_id = %self.page.id, stroke_id = %stroke.id, "Removed last stroke");
        Some(PageChange::StrokeRemoved(stroke.id))
    }

    /// Adopt a page written elsewhere. The static layer is rebuilt only when
    /// the strokes differ. Returns whether anything changed.
    pub fn apply_external(&mut self, page: Page) -> bool {
        if page == self.page {
            return false;
        }
        let strokes_changed = page.strokes != self.page.strokes;
        let fields_changed = page.text_fields != self.page.text_fields;
        self.page = page;

        if strokes_changed {
            self.session.abort(&mut self.compositor);
            self.compositor.rebuild(&self.page.strokes);
        }
        if fields_changed {
            self.overlay.reindex(&self.page.text_fields);
        }
        debug!(page_id = %self.page.id, strokes_changed, fields_changed, "Applied external page");
        true
    }

    /// Static and active layers over `background`.
    pub fn flatten(&self, background: Color) -> Option<RgbaImage> {
        self.compositor.flatten(background)
    }
}

fn blur_change(outcome: BlurOutcome) -> Option<PageChange> {
    match outcome {
        BlurOutcome::Deleted(id) => Some(PageChange::TextFieldRemoved(id)),
        BlurOutcome::Committed(_) | BlurOutcome::Missing => None,
    }
}
