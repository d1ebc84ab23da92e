//! Replay Idempotence Integration Tests
//!
//! Clearing the static layer and replaying the stroke list reproduces the
//! pixels that live drawing left behind.

use crate::helpers::{TEST_PAGE, TestPageBuilder, draw, line, page_editor};
use inkbook::editor::ToolSettings;
use inkbook::input::SchedulePolicy;
use inkbook::types::{Color, ToolType};
use inkbook::{GeometryEngine, LayeredCompositor};

fn scribble(editor: &mut inkbook::PageEditor) {
    let mut tools = ToolSettings::default();
    draw(editor, &tools, &[(10.0, 10.0), (60.0, 40.0), (120.0, 20.0), (150.0, 90.0)]);
    tools.select_color(Color::rgb(0x4c, 0xaf, 0x50));
    tools.set_size(9.0);
    draw(editor, &tools, &[(20.0, 140.0), (80.0, 60.0), (140.0, 140.0)]);
    tools.select_tool(ToolType::Eraser);
    draw(editor, &tools, &[(0.0, 80.0), (160.0, 80.0)]);
    tools.select_tool(ToolType::Pen);
    draw(editor, &tools, &[(40.0, 150.0), (40.0, 5.0)]);
}

#[test]
fn test_replay_reproduces_live_pixels() {
    for geometry in [GeometryEngine::quadratic(), GeometryEngine::outline()] {
        let mut editor = page_editor(TestPageBuilder::new().build(), geometry, SchedulePolicy::PerFrame);
        scribble(&mut editor);
        assert_eq!(editor.page().stroke_count(), 4);

        let live = editor.compositor().static_layer().unwrap().digest();
        let size = TEST_PAGE as u32;
        let replayed = LayeredCompositor::replay(&editor.page().strokes, size, size, &geometry);
        assert_eq!(live, replayed.digest(), "strategy {:?}", geometry.strategy);
    }
}

#[test]
fn test_reopening_a_page_renders_the_same() {
    let geometry = GeometryEngine::quadratic();
    let mut editor = page_editor(TestPageBuilder::new().build(), geometry, SchedulePolicy::PerEvent);
    scribble(&mut editor);

    let reopened = page_editor(editor.page().clone(), geometry, SchedulePolicy::PerEvent);
    assert_eq!(
        reopened.compositor().static_layer(),
        editor.compositor().static_layer()
    );
}

#[test]
fn test_external_update_rebuilds_only_on_stroke_change() {
    let geometry = GeometryEngine::quadratic();
    let page = TestPageBuilder::new()
        .with_pen(line((10.0, 10.0), (150.0, 150.0), 8))
        .build();
    let mut editor = page_editor(page.clone(), geometry, SchedulePolicy::PerEvent);
    let before = editor.compositor().static_layer().unwrap().digest();

    let mut text_only = page.clone();
    text_only.text_fields = TestPageBuilder::new().with_text(5.0, 5.0, "hello").build().text_fields;
    assert!(editor.apply_external(text_only));
    assert_eq!(editor.compositor().static_layer().unwrap().digest(), before);
    assert_eq!(editor.overlay().hit_test(20.0, 20.0), Some(editor.page().text_fields[0].id));

    let mut more_ink = editor.page().clone();
    more_ink
        .strokes
        .push(crate::helpers::pen_stroke(line((150.0, 10.0), (10.0, 150.0), 8)));
    assert!(editor.apply_external(more_ink.clone()));
    let size = TEST_PAGE as u32;
    let expected = LayeredCompositor::replay(&more_ink.strokes, size, size, &geometry);
    assert_eq!(editor.compositor().static_layer().unwrap(), &expected);
}

#[test]
fn test_flatten_shows_ink_over_paper() {
    let mut editor = page_editor(TestPageBuilder::new().build(), GeometryEngine::quadratic(), SchedulePolicy::PerEvent);
    draw(&mut editor, &ToolSettings::default(), &[(10.0, 80.0), (150.0, 80.0)]);

    let paper = Color::rgb(250, 250, 248);
    let image = editor.flatten(paper).unwrap();
    assert_eq!(image.get_pixel(80, 80).0, [0, 0, 0, 255]);
    assert_eq!(image.get_pixel(80, 10).0, [250, 250, 248, 255]);
}
