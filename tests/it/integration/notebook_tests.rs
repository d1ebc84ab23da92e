//! Notebook Lifecycle Integration Tests

use crate::helpers::{TEST_PAGE, draw_on, notebook_with_page, small_settings};
use inkbook::editor::{NotebookEditor, PageChange, PageEditor};
use inkbook::error::InkError;
use inkbook::geometry::GeometryStrategy;
use inkbook::settings::InkSettings;
use inkbook::store::{FsPageStore, MemoryPageStore, PageStore};
use inkbook::types::{Color, PageTemplate};
use inkbook::{GeometryEngine, LayeredCompositor};
use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;
use tempfile::TempDir;

#[test]
fn test_create_trims_title_and_stores_notebook() {
    let store = Arc::new(MemoryPageStore::new());
    let editor = NotebookEditor::create(store.clone(), "  Lecture notes  ", small_settings()).unwrap();

    let stored = store.get_notebook(&editor.notebook().id).unwrap().unwrap();
    assert_eq!(stored.title, "Lecture notes");
    assert!(stored.page_ids.is_empty());
    assert!(editor.pages().is_empty());
}

#[test]
fn test_blank_title_is_rejected() {
    let store = Arc::new(MemoryPageStore::new());
    let result = NotebookEditor::create(store.clone(), "\t\n", small_settings());
    assert!(matches!(result, Err(InkError::EmptyTitle)));
    assert!(store.get_notebooks().unwrap().is_empty());
}

#[test]
fn test_add_page_stores_page_and_order() {
    let (store, mut editor, first) = notebook_with_page();
    let second = editor.add_page(PageTemplate::Lined).unwrap();

    let notebook = store.get_notebook(&editor.notebook().id).unwrap().unwrap();
    assert_eq!(notebook.page_ids, vec![first.clone(), second.clone()]);
    assert_eq!(store.page_count(), 2);
    assert_eq!(
        store.get_page(&second).unwrap().unwrap().template,
        PageTemplate::Lined
    );
    assert_eq!(editor.pages().len(), 2);
}

#[test]
fn test_open_reorders_pages() {
    let (store, mut editor, first) = notebook_with_page();
    let second = editor.add_page(PageTemplate::Squared).unwrap();
    let third = editor.add_page(PageTemplate::Blank).unwrap();

    let mut notebook = editor.notebook().clone();
    notebook.page_ids = vec![third.clone(), first.clone(), second.clone()];
    store.update_notebook(&notebook).unwrap();

    let reopened = NotebookEditor::open(store, &notebook.id, small_settings()).unwrap();
    let ids: Vec<&str> = reopened.pages().iter().map(PageEditor::id).collect();
    assert_eq!(ids, vec![third.as_str(), first.as_str(), second.as_str()]);
}

#[test]
fn test_reopen_from_disk_restores_ink() {
    let dir = TempDir::new().unwrap();
    let store = Arc::new(FsPageStore::new(dir.path()));
    let mut editor = NotebookEditor::create(store.clone(), "Disk", small_settings()).unwrap();
    let page_id = editor.add_page(PageTemplate::Blank).unwrap();
    draw_on(&mut editor, &page_id, &[(10.0, 10.0), (80.0, 140.0), (150.0, 20.0)]).unwrap();
    let live = editor.page(&page_id).unwrap().compositor().static_layer().unwrap().digest();
    let notebook_id = editor.notebook().id.clone();
    drop(editor);

    let store = Arc::new(FsPageStore::new(dir.path()));
    let reopened = NotebookEditor::open(store, &notebook_id, small_settings()).unwrap();
    let page = reopened.page(&page_id).unwrap();
    assert_eq!(page.page().stroke_count(), 1);
    assert_eq!(page.compositor().static_layer().unwrap().digest(), live);
}

#[test]
fn test_apply_external_updates_known_pages_only() {
    let (_store, mut editor, page_id) = notebook_with_page();
    let mut page = editor.page(&page_id).unwrap().page().clone();
    page.strokes.push(crate::helpers::pen_stroke(crate::helpers::line(
        (10.0, 10.0),
        (150.0, 150.0),
        6,
    )));

    assert!(editor.apply_external(page.clone()));
    assert!(!editor.apply_external(page.clone()));
    assert_eq!(editor.page(&page_id).unwrap().page().stroke_count(), 1);

    let mut stranger = page;
    stranger.id = "somewhere-else".to_string();
    assert!(!editor.apply_external(stranger));
}

#[test]
fn test_geometry_change_rerenders_pages() {
    let (_store, mut editor, page_id) = notebook_with_page();
    draw_on(&mut editor, &page_id, &[(10.0, 20.0), (80.0, 150.0), (150.0, 40.0)]).unwrap();

    let settings = InkSettings {
        geometry: GeometryStrategy::Outline,
        ..small_settings()
    };
    editor.apply_settings(settings);

    let page = editor.page(&page_id).unwrap();
    let size = TEST_PAGE as u32;
    let expected = LayeredCompositor::replay(&page.page().strokes, size, size, &GeometryEngine::outline());
    assert_eq!(page.compositor().static_layer().unwrap(), &expected);
    assert_eq!(editor.undo_stack().len(), 1);
}

#[test]
fn test_settings_reload_updates_tools() {
    let (_store, mut editor, _page_id) = notebook_with_page();
    let red = Color::rgb(0xf4, 0x43, 0x36);
    editor.apply_settings(InkSettings {
        pen_color: red,
        tool_size: 500.0,
        undo_limit: 3,
        ..small_settings()
    });

    assert_eq!(editor.tools().color, red);
    assert_eq!(editor.tools().size, 40.0);
    assert_eq!(editor.undo_stack().limit(), 3);
}

#[test]
fn test_page_observer_sees_changes_in_order() {
    let (_store, mut editor, page_id) = notebook_with_page();
    let changes = Rc::new(RefCell::new(Vec::new()));
    let seen = Rc::clone(&changes);
    editor.set_page_observer(move |page, change| seen.borrow_mut().push((page.id.clone(), *change)));

    let stroke = draw_on(&mut editor, &page_id, &[(10.0, 10.0), (150.0, 150.0)])
        .unwrap()
        .unwrap();
    editor.undo().unwrap();
    editor.clear_page_observer();
    draw_on(&mut editor, &page_id, &[(10.0, 150.0), (150.0, 10.0)]).unwrap();

    let changes = changes.borrow();
    assert_eq!(
        *changes,
        vec![
            (page_id.clone(), PageChange::StrokeAdded(stroke)),
            (page_id.clone(), PageChange::StrokeRemoved(stroke)),
        ]
    );
}

#[test]
fn test_delete_page_drops_store_order_and_undo() {
    let (store, mut editor, first) = notebook_with_page();
    let second = editor.add_page(PageTemplate::Blank).unwrap();
    draw_on(&mut editor, &first, &[(10.0, 10.0), (150.0, 150.0)]).unwrap();
    draw_on(&mut editor, &second, &[(10.0, 150.0), (150.0, 10.0)]).unwrap();
    draw_on(&mut editor, &first, &[(10.0, 80.0), (150.0, 80.0)]).unwrap();

    editor.delete_page(&second).unwrap();

    assert!(editor.page(&second).is_none());
    assert!(editor.sync_state(&second).is_none());
    assert_eq!(editor.notebook().page_ids, vec![first.clone()]);
    assert!(store.get_page(&second).unwrap().is_none());
    let stored = store.get_notebook(&editor.notebook().id).unwrap().unwrap();
    assert_eq!(stored.page_ids, vec![first.clone()]);

    // Only the two strokes on the remaining page are undoable.
    assert_eq!(editor.undo_stack().len(), 2);
    assert!(editor.undo().unwrap());
    assert!(editor.undo().unwrap());
    assert!(!editor.undo().unwrap());
    assert_eq!(editor.page(&first).unwrap().page().stroke_count(), 0);

    assert!(matches!(editor.delete_page(&second), Err(InkError::UnknownPage(_))));
}
