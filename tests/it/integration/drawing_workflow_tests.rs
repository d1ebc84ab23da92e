//! Drawing Workflow Integration Tests
//!
//! Pointer events through a page editor: capture, preview, commit.

use crate::helpers::{
    TestPageBuilder, assert_stroke_count, draw, identity_mapper, page_editor, static_alpha,
};
use inkbook::editor::{PageChange, ToolSettings};
use inkbook::input::{PointerEvent, SchedulePolicy};
use inkbook::types::{StrokePoint, Tool, ToolType};
use inkbook::GeometryEngine;

#[test]
fn test_release_appends_one_stroke_with_points_in_order() {
    let mut editor = page_editor(TestPageBuilder::new().build(), GeometryEngine::quadratic(), SchedulePolicy::PerFrame);
    let mapper = identity_mapper();
    let tools = ToolSettings::default();

    let down = PointerEvent::pen(4, 20.0, 30.0, 0.2);
    editor.pointer_down(&down, &mapper, &tools);
    editor.pointer_move(&PointerEvent::pen(4, 40.0, 35.0, 0.4), &mapper);
    editor.pointer_move(&PointerEvent::pen(4, 60.0, 40.0, 0.9), &mapper);
    let change = editor.pointer_up(&PointerEvent::pen(4, 60.0, 40.0, 0.9));

    let page = editor.page();
    assert_stroke_count(page, 1);
    assert_eq!(change, Some(PageChange::StrokeAdded(page.strokes[0].id)));
    assert_eq!(
        page.strokes[0].points,
        vec![
            StrokePoint::new(20.0, 30.0, 0.2),
            StrokePoint::new(40.0, 35.0, 0.4),
            StrokePoint::new(60.0, 40.0, 0.9),
        ]
    );
}

#[test]
fn test_single_sample_appends_nothing_for_any_tool() {
    for tool in [ToolType::Pen, ToolType::Eraser] {
        let mut editor = page_editor(TestPageBuilder::new().build(), GeometryEngine::quadratic(), SchedulePolicy::PerEvent);
        let mut tools = ToolSettings::default();
        tools.select_tool(tool);

        assert_eq!(draw(&mut editor, &tools, &[(50.0, 50.0)]), None);
        assert_stroke_count(editor.page(), 0);
        assert!(editor.compositor().static_layer().unwrap().is_blank());
        assert!(editor.compositor().active_layer().unwrap().is_blank());
    }
}

#[test]
fn test_mouse_samples_record_default_pressure() {
    let mut editor = page_editor(TestPageBuilder::new().build(), GeometryEngine::quadratic(), SchedulePolicy::PerEvent);
    draw(&mut editor, &ToolSettings::default(), &[(10.0, 10.0), (30.0, 30.0)]);
    assert!(editor.page().strokes[0].points.iter().all(|p| p.pressure == 0.5));
}

#[test]
fn test_pen_preview_lives_on_active_layer_until_release() {
    let mut editor = page_editor(TestPageBuilder::new().build(), GeometryEngine::quadratic(), SchedulePolicy::PerEvent);
    let mapper = identity_mapper();
    let down = PointerEvent::mouse(20.0, 80.0);
    editor.pointer_down(&down, &mapper, &ToolSettings::default());
    editor.pointer_move(&down.moved_to(120.0, 80.0), &mapper);

    let compositor = editor.compositor();
    assert!(!compositor.active_layer().unwrap().is_blank());
    assert!(compositor.static_layer().unwrap().is_blank());

    editor.pointer_up(&down.moved_to(120.0, 80.0));
    let compositor = editor.compositor();
    assert!(compositor.active_layer().unwrap().is_blank());
    assert_eq!(static_alpha(&editor, 70, 80), 255);
}

#[test]
fn test_other_pointers_are_ignored_while_captured() {
    let mut editor = page_editor(TestPageBuilder::new().build(), GeometryEngine::quadratic(), SchedulePolicy::PerEvent);
    let mapper = identity_mapper();
    let tools = ToolSettings::default();

    editor.pointer_down(&PointerEvent::pen(1, 10.0, 10.0, 0.5), &mapper, &tools);
    editor.pointer_down(&PointerEvent::touch(2, 90.0, 90.0), &mapper, &tools);
    assert!(!editor.pointer_move(&PointerEvent::touch(2, 100.0, 100.0), &mapper));
    assert!(editor.pointer_move(&PointerEvent::pen(1, 40.0, 10.0, 0.5), &mapper));
    assert_eq!(editor.pointer_up(&PointerEvent::touch(2, 100.0, 100.0)), None);

    editor.pointer_up(&PointerEvent::pen(1, 40.0, 10.0, 0.5));
    assert_stroke_count(editor.page(), 1);
    assert_eq!(editor.page().strokes[0].points.len(), 2);
}

#[test]
fn test_capture_loss_commits_like_release() {
    let mut editor = page_editor(TestPageBuilder::new().build(), GeometryEngine::outline(), SchedulePolicy::PerFrame);
    let mapper = identity_mapper();
    let mut tools = ToolSettings::default();
    tools.select_tool(ToolType::Eraser);

    let down = PointerEvent::pen(9, 10.0, 10.0, 0.5);
    editor.pointer_down(&down, &mapper, &tools);
    editor.pointer_move(&down.moved_to(50.0, 50.0), &mapper);
    let change = editor.pointer_cancel(9);

    assert!(matches!(change, Some(PageChange::StrokeAdded(_))));
    assert_eq!(editor.page().strokes[0].tool, Tool::Eraser);
    assert!(!editor.is_drawing());
}

#[test]
fn test_samples_outside_the_page_are_kept() {
    let mut editor = page_editor(TestPageBuilder::new().build(), GeometryEngine::quadratic(), SchedulePolicy::PerEvent);
    draw(&mut editor, &ToolSettings::default(), &[(100.0, 100.0), (400.0, -50.0)]);
    let points = &editor.page().strokes[0].points;
    assert_eq!((points[1].x, points[1].y), (400.0, -50.0));
}

#[test]
fn test_non_finite_samples_are_dropped_and_page_reloads() {
    use inkbook::store::{FsPageStore, PageStore};

    let mut editor = page_editor(TestPageBuilder::new().build(), GeometryEngine::quadratic(), SchedulePolicy::PerEvent);
    let mapper = identity_mapper();
    let down = PointerEvent::mouse(10.0, 10.0);
    editor.pointer_down(&down, &mapper, &ToolSettings::default());
    assert!(!editor.pointer_move(&down.moved_to(f32::NAN, 40.0), &mapper));
    assert!(!editor.pointer_move(&down.moved_to(60.0, f32::INFINITY), &mapper));
    editor.pointer_move(&down.moved_to(120.0, 90.0), &mapper);
    editor.pointer_up(&down.moved_to(120.0, 90.0));

    let page = editor.page();
    assert_stroke_count(page, 1);
    assert!(page.strokes[0].points.iter().all(|p| p.x.is_finite() && p.y.is_finite()));

    let dir = tempfile::TempDir::new().unwrap();
    let store = FsPageStore::new(dir.path());
    store.create_page(page).unwrap();
    assert_eq!(store.get_page(&page.id).unwrap().as_ref(), Some(page));
}
