//! Scheduling Policy Integration Tests
//!
//! Per-frame buffering versus painting inside the move handler.

use crate::helpers::{TestPageBuilder, identity_mapper, page_editor};
use inkbook::editor::ToolSettings;
use inkbook::input::{PointerEvent, SchedulePolicy};
use inkbook::GeometryEngine;

#[test]
fn test_per_frame_buffers_until_frame() {
    let mut editor = page_editor(TestPageBuilder::new().build(), GeometryEngine::quadratic(), SchedulePolicy::PerFrame);
    let mapper = identity_mapper();
    let down = PointerEvent::mouse(10.0, 10.0);
    editor.pointer_down(&down, &mapper, &ToolSettings::default());
    editor.pointer_move(&down.moved_to(60.0, 10.0), &mapper);
    editor.pointer_move(&down.moved_to(110.0, 10.0), &mapper);

    assert_eq!(editor.session().pending().len(), 3);
    assert!(editor.compositor().active_layer().unwrap().is_blank());

    assert_eq!(editor.frame(), 3);
    assert!(editor.session().pending().is_empty());
    assert!(!editor.compositor().active_layer().unwrap().is_blank());
    assert_eq!(editor.frame(), 0);
    assert_eq!(editor.session().monitor().total_frames(), 1);
}

#[test]
fn test_per_event_paints_immediately() {
    let mut editor = page_editor(TestPageBuilder::new().build(), GeometryEngine::quadratic(), SchedulePolicy::PerEvent);
    let mapper = identity_mapper();
    let down = PointerEvent::mouse(10.0, 10.0);
    editor.pointer_down(&down, &mapper, &ToolSettings::default());
    editor.pointer_move(&down.moved_to(60.0, 10.0), &mapper);

    assert!(editor.session().pending().is_empty());
    assert!(!editor.compositor().active_layer().unwrap().is_blank());
}

#[test]
fn test_release_flushes_pending_samples() {
    let mut editor = page_editor(TestPageBuilder::new().build(), GeometryEngine::quadratic(), SchedulePolicy::PerFrame);
    let mapper = identity_mapper();
    let down = PointerEvent::mouse(10.0, 10.0);
    editor.pointer_down(&down, &mapper, &ToolSettings::default());
    for i in 1..=5 {
        editor.pointer_move(&down.moved_to(10.0 + i as f32 * 20.0, 10.0), &mapper);
    }
    editor.pointer_up(&down.moved_to(110.0, 10.0));

    assert_eq!(editor.page().strokes[0].points.len(), 6);
    assert!(editor.session().pending().is_empty());
    assert!(!editor.compositor().static_layer().unwrap().is_blank());
}

#[test]
fn test_switching_policy_mid_stroke() {
    let mut editor = page_editor(TestPageBuilder::new().build(), GeometryEngine::quadratic(), SchedulePolicy::PerFrame);
    let mapper = identity_mapper();
    let down = PointerEvent::mouse(10.0, 10.0);
    editor.pointer_down(&down, &mapper, &ToolSettings::default());
    editor.pointer_move(&down.moved_to(40.0, 10.0), &mapper);

    editor.session_mut().set_policy(SchedulePolicy::PerEvent);
    editor.pointer_move(&down.moved_to(70.0, 10.0), &mapper);
    assert!(editor.session().pending().is_empty());

    editor.pointer_up(&down.moved_to(70.0, 10.0));
    let xs: Vec<f32> = editor.page().strokes[0].points.iter().map(|p| p.x).collect();
    assert_eq!(xs, vec![10.0, 40.0, 70.0]);
}
