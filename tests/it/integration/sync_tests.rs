//! Store Sync Integration Tests
//!
//! Every committed change is written through to the store. A failed write
//! keeps the change in memory and marks the page dirty until a retry lands.

use crate::helpers::{draw_on, identity_mapper, notebook_with_page};
use inkbook::editor::{PageChange, SyncState};
use inkbook::error::InkError;
use inkbook::input::PointerEvent;
use inkbook::store::PageStore;
use inkbook::types::ToolType;
use std::cell::RefCell;
use std::rc::Rc;

#[test]
fn test_commit_writes_through() {
    let (store, mut editor, page_id) = notebook_with_page();
    let stroke_id = draw_on(&mut editor, &page_id, &[(10.0, 10.0), (150.0, 150.0)])
        .unwrap()
        .expect("committed");

    let stored = store.get_page(&page_id).unwrap().unwrap();
    assert_eq!(stored.strokes.len(), 1);
    assert_eq!(stored.strokes[0].id, stroke_id);
    assert_eq!(editor.sync_state(&page_id), Some(&SyncState::Synced));
}

#[test]
fn test_failed_write_keeps_memory() {
    let (store, mut editor, page_id) = notebook_with_page();
    store.set_fail_writes(true);

    let result = draw_on(&mut editor, &page_id, &[(10.0, 10.0), (150.0, 150.0)]);
    assert!(matches!(result, Err(InkError::Store(_))));
    assert_eq!(editor.page(&page_id).unwrap().page().stroke_count(), 1);
    assert_eq!(store.get_page(&page_id).unwrap().unwrap().stroke_count(), 0);

    match editor.sync_state(&page_id) {
        Some(SyncState::Dirty { error }) => assert!(!error.is_empty()),
        other => panic!("expected dirty page, got {other:?}"),
    }
    // Still undoable
    assert_eq!(editor.undo_stack().len(), 1);
}

#[test]
fn test_observer_runs_even_when_write_fails() {
    let (store, mut editor, page_id) = notebook_with_page();
    let changes = Rc::new(RefCell::new(Vec::new()));
    let seen = Rc::clone(&changes);
    editor.set_page_observer(move |page, change| seen.borrow_mut().push((page.stroke_count(), *change)));

    store.set_fail_writes(true);
    let _ = draw_on(&mut editor, &page_id, &[(10.0, 10.0), (150.0, 150.0)]);

    let changes = changes.borrow();
    assert_eq!(changes.len(), 1);
    assert_eq!(changes[0].0, 1);
    assert!(matches!(changes[0].1, PageChange::StrokeAdded(_)));
}

#[test]
fn test_retry_sync_clears_dirty_state() {
    let (store, mut editor, page_id) = notebook_with_page();
    store.set_fail_writes(true);
    let _ = draw_on(&mut editor, &page_id, &[(10.0, 10.0), (150.0, 150.0)]);
    assert!(editor.retry_sync(&page_id).is_err());
    assert_eq!(editor.dirty_pages(), vec![page_id.as_str()]);

    store.set_fail_writes(false);
    editor.retry_sync(&page_id).unwrap();
    assert_eq!(editor.sync_state(&page_id), Some(&SyncState::Synced));
    assert!(editor.dirty_pages().is_empty());
    assert_eq!(store.get_page(&page_id).unwrap().unwrap().stroke_count(), 1);
}

#[test]
fn test_next_successful_commit_resyncs() {
    let (store, mut editor, page_id) = notebook_with_page();
    store.set_fail_writes(true);
    let _ = draw_on(&mut editor, &page_id, &[(10.0, 10.0), (150.0, 150.0)]);

    store.set_fail_writes(false);
    draw_on(&mut editor, &page_id, &[(10.0, 150.0), (150.0, 10.0)]).unwrap();
    assert_eq!(editor.sync_state(&page_id), Some(&SyncState::Synced));
    assert_eq!(store.get_page(&page_id).unwrap().unwrap().stroke_count(), 2);
}

#[test]
fn test_text_field_failure_marks_dirty() {
    let (store, mut editor, page_id) = notebook_with_page();
    editor.tools_mut().select_tool(ToolType::Text);
    store.set_fail_writes(true);

    let result = editor.pointer_down(&page_id, &PointerEvent::mouse(40.0, 40.0), &identity_mapper());
    assert!(result.is_err());
    assert_eq!(editor.page(&page_id).unwrap().page().text_fields.len(), 1);
    assert!(editor.sync_state(&page_id).unwrap().is_dirty());
}

#[test]
fn test_unknown_page_is_an_error() {
    let (_store, mut editor, _page_id) = notebook_with_page();
    let result = editor.pointer_down("nope", &PointerEvent::mouse(1.0, 1.0), &identity_mapper());
    assert!(matches!(result, Err(InkError::UnknownPage(id)) if id == "nope"));
    assert!(matches!(editor.retry_sync("nope"), Err(InkError::UnknownPage(_))));
}
