use super::{PageStore, sort_notebooks, sort_pages};
use crate::error::{StoreError, StoreResult};
use crate::types::{Notebook, Page};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

/// In-memory store for tests and embedding without a filesystem.
#[derive(Default)]
pub struct MemoryPageStore {
    pages: RwLock<HashMap<String, Page>>,
    notebooks: RwLock<HashMap<String, Notebook>>,
    fail_writes: AtomicBool,
}

impl MemoryPageStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// While set, every write fails with [`StoreError::Unavailable`].
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub fn page_count(&self) -> usize {
        self.pages.read().len()
    }

    fn check_writable(&self) -> StoreResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("writes disabled".to_string()));
        }
        Ok(())
    }
}

impl PageStore for MemoryPageStore {
    fn get_page(&self, id: &str) -> StoreResult<Option<Page>> {
        Ok(self.pages.read().get(id).cloned())
    }

    fn get_pages(&self, notebook_id: &str) -> StoreResult<Vec<Page>> {
        let mut pages: Vec<Page> = self
            .pages
            .read()
            .values()
            .filter(|p| p.notebook_id == notebook_id)
            .cloned()
            .collect();
        sort_pages(&mut pages);
        Ok(pages)
    }

    fn create_page(&self, page: &Page) -> StoreResult<()> {
        self.check_writable()?;
        let mut pages = self.pages.write();
        if pages.contains_key(&page.id) {
            return Err(StoreError::AlreadyExists {
                kind: "page",
                id: page.id.clone(),
            });
        }
        pages.insert(page.id.clone(), page.clone());
        Ok(())
    }

    fn update_page(&self, page: &Page) -> StoreResult<()> {
        self.check_writable()?;
        self.pages.write().insert(page.id.clone(), page.clone());
        Ok(())
    }

    fn delete_page(&self, id: &str) -> StoreResult<()> {
        self.check_writable()?;
        self.pages.write().remove(id);
        Ok(())
    }

    fn get_notebooks(&self) -> StoreResult<Vec<Notebook>> {
        let mut notebooks: Vec<Notebook> = self.notebooks.read().values().cloned().collect();
        sort_notebooks(&mut notebooks);
        Ok(notebooks)
    }

    fn get_notebook(&self, id: &str) -> StoreResult<Option<Notebook>> {
        Ok(self.notebooks.read().get(id).cloned())
    }

    fn create_notebook(&self, notebook: &Notebook) -> StoreResult<()> {
        self.check_writable()?;
        let mut notebooks = self.notebooks.write();
        if notebooks.contains_key(&notebook.id) {
            return Err(StoreError::AlreadyExists {
                kind: "notebook",
                id: notebook.id.clone(),
            });
        }
        notebooks.insert(notebook.id.clone(), notebook.clone());
        Ok(())
    }

    fn update_notebook(&self, notebook: &Notebook) -> StoreResult<()> {
        self.check_writable()?;
        let mut notebooks = self.notebooks.write();
        match notebooks.get_mut(&notebook.id) {
            Some(stored) => {
                *stored = notebook.clone();
                Ok(())
            }
            None => Err(StoreError::notebook_not_found(&notebook.id)),
        }
    }
}
