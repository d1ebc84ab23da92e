use super::{PageChange, PageEditor, ToolSettings};
use crate::error::{InkError, InkResult, StoreError};
use crate::input::{CoordinateMapper, DeviceObserver, DeviceReading, PointerEvent};
use crate::settings::InkSettings;
use crate::store::PageStore;
use crate::types::{Notebook, Page, PageTemplate};
use crate::undo::UndoController;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Whether the stored copy of a page matches memory.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum SyncState {
    #[default]
    Synced,
    /// The last write failed; memory holds changes the store does not
    Dirty { error: String },
}

impl SyncState {
    pub fn is_dirty(&self) -> bool {
        matches!(self, SyncState::Dirty { .. })
    }
}

/// Called synchronously after every committed page change, before the write.
pub type PageObserver = Box<dyn FnMut(&Page, &PageChange)>;

type SharedDeviceObserver = Rc<RefCell<DeviceObserver>>;

/// An open notebook: its pages in display order, the undo stack shared by all
/// of them and the store every change is written through.
///
/// A failed write does not roll back memory. The page is marked
/// [`SyncState::Dirty`] and the error is returned; [`retry_sync`] writes the
/// page again.
///
/// [`retry_sync`]: Self::retry_sync
pub struct NotebookEditor {
    store: Arc<dyn PageStore>,
    notebook: Notebook,
    pages: Vec<PageEditor>,
    undo: UndoController,
    tools: ToolSettings,
    settings: InkSettings,
    sync: HashMap<String, SyncState>,
    page_observer: Option<PageObserver>,
    device_observer: Option<SharedDeviceObserver>,
}

impl NotebookEditor {
    /// Create and store an empty notebook.
    pub fn create(
        store: Arc<dyn PageStore>,
        title: &str,
        settings: InkSettings,
    ) -> InkResult<Self> {
        let title = title.trim();
        if title.is_empty() {
            return Err(InkError::EmptyTitle);
        }
        let notebook = Notebook::new(title);
        store.create_notebook(&notebook)?;
        info!(notebook_id = %notebook.id, title, "Created notebook");
        Ok(Self::from_parts(store, notebook, Vec::new(), settings))
    }

    /// Load a notebook and its pages. Pages follow the notebook's page order;
    /// stored pages it does not list come last, oldest first.
    pub fn open(
        store: Arc<dyn PageStore>,
        notebook_id: &str,
        settings: InkSettings,
    ) -> InkResult<Self> {
        let notebook = store
            .get_notebook(notebook_id)?
            .ok_or_else(|| StoreError::notebook_not_found(notebook_id))?;

        let mut rest = store.get_pages(notebook_id)?;
        let mut ordered = Vec::with_capacity(rest.len());
        for page_id in &notebook.page_ids {
            if let Some(pos) = rest.iter().position(|p| &p.id == page_id) {
                ordered.push(rest.remove(pos));
            }
        }
        if !rest.is_empty() {
            debug!(count = rest.len(), "Pages missing from notebook order");
        }
        ordered.extend(rest);

        info!(notebook_id, pages = ordered.len(), "Opened notebook");
        Ok(Self::from_parts(store, notebook, ordered, settings))
    }

    fn from_parts(
        store: Arc<dyn PageStore>,
        notebook: Notebook,
        pages: Vec<Page>,
        settings: InkSettings,
    ) -> Self {
        let sync = pages
            .iter()
            .map(|p| (p.id.clone(), SyncState::Synced))
            .collect();
        let mut editor = Self {
            store,
            notebook,
            pages: Vec::with_capacity(pages.len()),
            undo: UndoController::new(settings.undo_limit),
            tools: ToolSettings::from_settings(&settings),
            settings,
            sync,
            page_observer: None,
            device_observer: None,
        };
        for page in pages {
            let page_editor = editor.page_editor(page);
            editor.pages.push(page_editor);
        }
        editor
    }

    fn page_editor(&self, page: Page) -> PageEditor {
        let mut editor = PageEditor::new(
            page,
            self.settings.geometry_engine(),
            self.settings.schedule,
            self.settings.page_size,
        );
        if let Some(shared) = self.device_observer.as_ref() {
            install_device_observer(&mut editor, shared);
        }
        editor
    }

    // ------------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------------

    pub fn notebook(&self) -> &Notebook {
        &self.notebook
    }

    pub fn pages(&self) -> &[PageEditor] {
        &self.pages
    }

    pub fn page(&self, page_id: &str) -> Option<&PageEditor> {
        self.pages.iter().find(|p| p.id() == page_id)
    }

    pub fn tools(&self) -> &ToolSettings {
        &self.tools
    }

    pub fn tools_mut(&mut self) -> &mut ToolSettings {
        &mut self.tools
    }

    pub fn settings(&self) -> &InkSettings {
        &self.settings
    }

    pub fn undo_stack(&self) -> &UndoController {
        &self.undo
    }

    pub fn sync_state(&self, page_id: &str) -> Option<&SyncState> {
        self.sync.get(page_id)
    }

    /// Pages whose last write failed, in display order.
    pub fn dirty_pages(&self) -> Vec<&str> {
        self.pages
            .iter()
            .map(PageEditor::id)
            .filter(|id| self.sync.get(*id).is_some_and(SyncState::is_dirty))
            .collect()
    }

    // ------------------------------------------------------------------------
    // Observers & settings
    // ------------------------------------------------------------------------

    pub fn set_page_observer(&mut self, observer: impl FnMut(&Page, &PageChange) + 'static) {
        self.page_observer = Some(Box::new(observer));
    }

    pub fn clear_page_observer(&mut self) {
        self.page_observer = None;
    }

    /// Report the device class of every stroke start, on any page.
    pub fn set_device_observer(&mut self, observer: impl FnMut(&DeviceReading) + 'static) {
        let shared: SharedDeviceObserver = Rc::new(RefCell::new(Box::new(observer)));
        for editor in &mut self.pages {
            install_device_observer(editor, &shared);
        }
        self.device_observer = Some(shared);
    }

    pub fn clear_device_observer(&mut self) {
        for editor in &mut self.pages {
            editor.session_mut().clear_device_observer();
        }
        self.device_observer = None;
    }

    /// Adopt reloaded settings. A geometry change re-renders every page.
    pub fn apply_settings(&mut self, settings: InkSettings) {
        let geometry_changed = settings.geometry_engine() != self.settings.geometry_engine()
            || settings.page_size != self.settings.page_size;
        self.undo.set_limit(settings.undo_limit);
        self.tools.color = settings.pen_color;
        self.tools.set_size(settings.tool_size);
        self.tools.font_size = settings.font_size;
        self.settings = settings;

        if geometry_changed {
            let pages: Vec<Page> = self.pages.drain(..).map(|e| e.page().clone()).collect();
            for page in pages {
                let editor = self.page_editor(page);
                self.pages.push(editor);
            }
        } else {
            for editor in &mut self.pages {
                editor.session_mut().set_policy(self.settings.schedule);
            }
        }
        debug!(geometry_changed, "Applied settings");
    }

    // ------------------------------------------------------------------------
    // Pages
    // ------------------------------------------------------------------------

    /// Create a page, append it to the notebook and store both. Returns the
    /// new page's id.
    pub fn add_page(&mut self, template: PageTemplate) -> InkResult<String> {
        let page = Page::new(self.notebook.id.clone(), template);
        self.store.create_page(&page)?;

        let mut updated = self.notebook.clone();
        updated.page_ids.push(page.id.clone());
        self.store.update_notebook(&updated)?;
        self.notebook = updated;

        let page_id = page.id.clone();
        self.sync.insert(page_id.clone(), SyncState::Synced);
        let editor = self.page_editor(page);
        self.pages.push(editor);
        info!(page_id = %page_id, ?template, "Added page");
        Ok(page_id)
    }

    /// Remove a page from the notebook and the store. Its undo entries go
    /// with it.
    pub fn delete_page(&mut self, page_id: &str) -> InkResult<()> {
        let idx = self.index_of(page_id)?;

        let mut updated = self.notebook.clone();
        updated.page_ids.retain(|id| id != page_id);
        self.store.update_notebook(&updated)?;
        self.notebook = updated;
        self.store.delete_page(page_id)?;

        self.pages.remove(idx);
        self.sync.remove(page_id);
        self.undo.forget_page(page_id);
        info!(page_id, "Deleted page");
        Ok(())
    }

    fn index_of(&self, page_id: &str) -> InkResult<usize> {
        self.pages
            .iter()
            .position(|p| p.id() == page_id)
            .ok_or_else(|| InkError::UnknownPage(page_id.to_string()))
    }

    // ------------------------------------------------------------------------
    // Pointer input
    // ------------------------------------------------------------------------

    pub fn pointer_down(
        &mut self,
        page_id: &str,
        event: &PointerEvent,
        mapper: &CoordinateMapper,
    ) -> InkResult<()> {
        let idx = self.index_of(page_id)?;
        let before = self.pages[idx].page().stroke_count();
        let changes = self.pages[idx].pointer_down(event, mapper, &self.tools);
        self.commit(idx, before, &changes)
    }

    pub fn pointer_move(
        &mut self,
        page_id: &str,
        event: &PointerEvent,
        mapper: &CoordinateMapper,
    ) -> bool {
        match self.index_of(page_id) {
            Ok(idx) => self.pages[idx].pointer_move(event, mapper),
            Err(_) => false,
        }
    }

    /// Display-refresh tick for every page. Returns the samples painted.
    pub fn frame(&mut self) -> usize {
        self.pages.iter_mut().map(PageEditor::frame).sum()
    }

    /// Release; returns the id of the committed stroke, if any.
    pub fn pointer_up(&mut self, page_id: &str, event: &PointerEvent) -> InkResult<Option<Uuid>> {
        let idx = self.index_of(page_id)?;
        let before = self.pages[idx].page().stroke_count();
        let change = self.pages[idx].pointer_up(event);
        self.commit_stroke(idx, before, change)
    }

    pub fn pointer_cancel(&mut self, page_id: &str, pointer_id: i64) -> InkResult<Option<Uuid>> {
        let idx = self.index_of(page_id)?;
        let before = self.pages[idx].page().stroke_count();
        let change = self.pages[idx].pointer_cancel(pointer_id);
        self.commit_stroke(idx, before, change)
    }

    fn commit_stroke(
        &mut self,
        idx: usize,
        before: usize,
        change: Option<PageChange>,
    ) -> InkResult<Option<Uuid>> {
        let Some(change) = change else {
            return Ok(None);
        };
        self.commit(idx, before, &[change])?;
        match change {
            PageChange::StrokeAdded(id) => Ok(Some(id)),
            _ => Ok(None),
        }
    }

    // ------------------------------------------------------------------------
    // Text fields
    // ------------------------------------------------------------------------

    pub fn edit_text(&mut self, page_id: &str, field_id: Uuid, text: &str) -> InkResult<bool> {
        let idx = self.index_of(page_id)?;
        let change = self.pages[idx].edit_text(field_id, text);
        self.commit_text(idx, change)
    }

    pub fn blur_text(&mut self, page_id: &str, field_id: Uuid) -> InkResult<bool> {
        let idx = self.index_of(page_id)?;
        let change = self.pages[idx].blur_text(field_id);
        self.commit_text(idx, change)
    }

    pub fn dismiss_text(&mut self, page_id: &str) -> InkResult<bool> {
        let idx = self.index_of(page_id)?;
        let change = self.pages[idx].dismiss_text();
        self.commit_text(idx, change)
    }

    pub fn delete_text(&mut self, page_id: &str, field_id: Uuid) -> InkResult<bool> {
        let idx = self.index_of(page_id)?;
        let change = self.pages[idx].delete_text(field_id);
        self.commit_text(idx, change)
    }

    fn commit_text(&mut self, idx: usize, change: Option<PageChange>) -> InkResult<bool> {
        let Some(change) = change else {
            return Ok(false);
        };
        let count = self.pages[idx].page().stroke_count();
        self.commit(idx, count, &[change])?;
        Ok(true)
    }

    // ------------------------------------------------------------------------
    // Undo & sync
    // ------------------------------------------------------------------------

    /// Remove the newest stroke of the page that most recently gained one.
    /// Returns `false` when there was nothing to undo.
    pub fn undo(&mut self) -> InkResult<bool> {
        let Some(page_id) = self.undo.pop() else {
            return Ok(false);
        };
        let Ok(idx) = self.index_of(&page_id) else {
            debug!(page_id, "Undo entry for a closed page");
            return Ok(false);
        };
        let before = self.pages[idx].page().stroke_count();
        let Some(change) = self.pages[idx].remove_last_stroke() else {
            return Ok(false);
        };
        self.commit(idx, before, &[change])?;
        Ok(true)
    }

    /// Adopt a page written by someone else. Unknown pages are ignored.
    pub fn apply_external(&mut self, page: Page) -> bool {
        let Ok(idx) = self.index_of(&page.id) else {
            return false;
        };
        self.pages[idx].apply_external(page)
    }

    /// Write a page again, whatever its sync state.
    pub fn retry_sync(&mut self, page_id: &str) -> InkResult<()> {
        let idx = self.index_of(page_id)?;
        self.persist(idx)
    }

    /// Retry every dirty page, stopping at the first failure.
    pub fn retry_all(&mut self) -> InkResult<usize> {
        let dirty: Vec<String> = self.dirty_pages().into_iter().map(String::from).collect();
        for page_id in &dirty {
            self.retry_sync(page_id)?;
        }
        Ok(dirty.len())
    }

    // ------------------------------------------------------------------------
    // Commit path
    // ------------------------------------------------------------------------

    fn commit(&mut self, idx: usize, strokes_before: usize, changes: &[PageChange]) -> InkResult<()> {
        if changes.is_empty() {
            return Ok(());
        }
        let editor = &self.pages[idx];
        let page = editor.page();
        self.undo.record(&page.id, strokes_before, page.stroke_count());
        if let Some(observer) = self.page_observer.as_mut() {
            for change in changes {
                observer(page, change);
            }
        }
        self.persist(idx)
    }

    fn persist(&mut self, idx: usize) -> InkResult<()> {
        let page = self.pages[idx].page();
        match self.store.update_page(page) {
            Ok(()) => {
                self.sync.insert(page.id.clone(), SyncState::Synced);
                Ok(())
            }
            Err(e) => {
                warn!(page_id = %page.id, error = %e, "Page write failed, keeping changes in memory");
                self.sync.insert(
                    page.id.clone(),
                    SyncState::Dirty {
                        error: e.to_string(),
                    },
                );
                Err(e.into())
            }
        }
    }
}

fn install_device_observer(editor: &mut PageEditor, shared: &SharedDeviceObserver) {
    let shared = Rc::clone(shared);
    editor.session_mut().set_device_observer(move |reading| {
        let mut observer = shared.borrow_mut();
        (*observer)(reading);
    });
}
