use super::{PageStore, sort_notebooks, sort_pages};
use crate::error::{StoreError, StoreResult};
use crate::types::{Notebook, Page};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::warn;

const PAGES_DIR: &str = "pages";
const NOTEBOOKS_DIR: &str = "notebooks";

/// JSON-file store: one pretty-printed document per page and notebook.
///
/// Writes go to a temporary file in the target directory and are renamed into
/// place, so a crash never leaves a half-written document.
#[derive(Debug, Clone)]
pub struct FsPageStore {
    root: PathBuf,
}

impl FsPageStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Store under the platform data directory (`<data>/inkbook`).
    pub fn open_default() -> StoreResult<Self> {
        let root = Self::default_root()
            .ok_or_else(|| StoreError::Unavailable("no data directory".to_string()))?;
        Ok(Self::new(root))
    }

    pub fn default_root() -> Option<PathBuf> {
        dirs::data_dir().map(|d| d.join("inkbook"))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn doc_path(&self, dir: &str, id: &str) -> StoreResult<PathBuf> {
        let valid = !id.is_empty()
            && id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(StoreError::InvalidId(id.to_string()));
        }
        Ok(self.root.join(dir).join(format!("{}.json", id)))
    }

    fn read_doc<T: DeserializeOwned>(&self, path: &Path) -> StoreResult<Option<T>> {
        if !path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(path)?;
        Ok(Some(serde_json::from_str(&content)?))
    }

    fn write_doc<T: Serialize>(&self, path: &Path, doc: &T) -> StoreResult<()> {
        let dir = path
            .parent()
            .ok_or_else(|| StoreError::Unavailable(format!("no parent for {}", path.display())))?;
        fs::create_dir_all(dir)?;

        let content = serde_json::to_string_pretty(doc)?;
        let mut tmp = NamedTempFile::new_in(dir)?;
        tmp.write_all(content.as_bytes())?;
        tmp.persist(path).map_err(|e| StoreError::Io(e.error))?;
        Ok(())
    }

    /// Every document in a directory. Unreadable files are skipped with a warning.
    fn read_all<T: DeserializeOwned>(&self, dir: &str) -> StoreResult<Vec<T>> {
        let dir = self.root.join(dir);
        if !dir.exists() {
            return Ok(Vec::new());
        }
        let mut docs = Vec::new();
        for entry in fs::read_dir(&dir)? {
            let path = entry?.path();
            if path.extension().is_none_or(|ext| ext != "json") {
                continue;
            }
            match self.read_doc(&path) {
                Ok(Some(doc)) => docs.push(doc),
                Ok(None) => {}
                Err(e) => warn!(path = %path.display(), error = %e, "Skipping unreadable document"),
            }
        }
        Ok(docs)
    }
}

impl PageStore for FsPageStore {
    fn get_page(&self, id: &str) -> StoreResult<Option<Page>> {
        self.read_doc(&self.doc_path(PAGES_DIR, id)?)
    }

    fn get_pages(&self, notebook_id: &str) -> StoreResult<Vec<Page>> {
        let mut pages: Vec<Page> = self
            .read_all::<Page>(PAGES_DIR)?
            .into_iter()
            .filter(|p| p.notebook_id == notebook_id)
            .collect();
        sort_pages(&mut pages);
        Ok(pages)
    }

    fn create_page(&self, page: &Page) -> StoreResult<()> {
        let path = self.doc_path(PAGES_DIR, &page.id)?;
        if path.exists() {
            return Err(StoreError::AlreadyExists {
                kind: "page",
                id: page.id.clone(),
            });
        }
        self.write_doc(&path, page)
    }

    fn update_page(&self, page: &Page) -> StoreResult<()> {
        self.write_doc(&self.doc_path(PAGES_DIR, &page.id)?, page)
    }

    fn delete_page(&self, id: &str) -> StoreResult<()> {
        let path = self.doc_path(PAGES_DIR, id)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn get_notebooks(&self) -> StoreResult<Vec<Notebook>> {
        let mut notebooks = self.read_all::<Notebook>(NOTEBOOKS_DIR)?;
        sort_notebooks(&mut notebooks);
        Ok(notebooks)
    }

    fn get_notebook(&self, id: &str) -> StoreResult<Option<Notebook>> {
        self.read_doc(&self.doc_path(NOTEBOOKS_DIR, id)?)
    }

    fn create_notebook(&self, notebook: &Notebook) -> StoreResult<()> {
        let path = self.doc_path(NOTEBOOKS_DIR, &notebook.id)?;
        if path.exists() {
            return Err(StoreError::AlreadyExists {
                kind: "notebook",
                id: notebook.id.clone(),
            });
        }
        self.write_doc(&path, notebook)
    }

    fn update_notebook(&self, notebook: &Notebook) -> StoreResult<()> {
        let path = self.doc_path(NOTEBOOKS_DIR, &notebook.id)?;
        if !path.exists() {
            return Err(StoreError::notebook_not_found(&notebook.id));
        }
        self.write_doc(&path, notebook)
    }
}
