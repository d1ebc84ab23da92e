//! # Page Storage
//!
//! The engine persists whole pages through the [`PageStore`] trait. Every
//! write is a full replace of the page document; the last write wins.
//!
//! ## Implementations
//!
//! - [`memory::MemoryPageStore`]: maps behind a `parking_lot::RwLock`, with a
//!   switch that makes writes fail for testing error handling.
//! - [`fs::FsPageStore`]: one JSON document per page and notebook.
//!
//! ## Storage Layout
//!
//! ```text
//! <root>/
//! ├── notebooks/{id}.json
//! └── pages/{id}.json
//! ```

use crate::error::StoreResult;
use crate::types::{Notebook, Page};

pub mod fs;
pub mod memory;

pub use fs::FsPageStore;
pub use memory::MemoryPageStore;

/// Persistence for pages and the notebooks that order them.
///
/// Shared as `Arc<dyn PageStore>`, so implementations use interior locking.
pub trait PageStore: Send + Sync {
    fn get_page(&self, id: &str) -> StoreResult<Option<Page>>;

    /// Pages of a notebook, oldest first.
    fn get_pages(&self, notebook_id: &str) -> StoreResult<Vec<Page>>;

    /// Insert a new page; fails if the id is taken.
    fn create_page(&self, page: &Page) -> StoreResult<()>;

    /// Replace the stored page, inserting it if absent.
    fn update_page(&self, page: &Page) -> StoreResult<()>;

    /// Remove a page. Unknown ids are not an error.
    fn delete_page(&self, id: &str) -> StoreResult<()>;

    /// All notebooks, oldest first.
    fn get_notebooks(&self) -> StoreResult<Vec<Notebook>>;

    fn get_notebook(&self, id: &str) -> StoreResult<Option<Notebook>>;

    fn create_notebook(&self, notebook: &Notebook) -> StoreResult<()>;

    /// Replace a stored notebook; fails if it does not exist.
    fn update_notebook(&self, notebook: &Notebook) -> StoreResult<()>;
}

/// Oldest first, ties broken by id so listings are stable.
pub(crate) fn sort_pages(pages: &mut [Page]) {
    pages.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
}

pub(crate) fn sort_notebooks(notebooks: &mut [Notebook]) {
    notebooks.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
}
