//! # Storage Layer
//!
//! Two collaborator interfaces sit under the page aggregate:
//!
//! - [`RecordStore`]: CRUD over per-locale page rows keyed by
//!   `(theme, file_name, lang)`, plus the lookups the write path validates
//!   against (URL and file-name duplicates).
//! - [`TreeStore`]: load/save of one [`TreeIndex`] per theme.
//!
//! [`PageStore`] is the union of both and is what page operations take.
//!
//! ## Backend Split
//!
//! As with the rest of the crate, "what" and "how" are kept apart:
//!
//! - [`backend::StorageBackend`] is raw I/O: load and save the whole page table
//!   and individual theme trees.
//! - [`table::PageTable`] is the query and constraint logic on top of any
//!   backend, and implements both store traits.
//!
//! ## Implementations
//!
//! - [`fs::FileStore`]: `PageTable` over [`fs_backend::FsBackend`] (JSON files).
//! - [`memory::InMemoryStore`]: `PageTable` over [`mem_backend::MemBackend`], for
//!   tests and embedding.
//!
//! ## Storage Layout
//!
//! ```text
//! <data_dir>/
//! ├── pages.json          # Page table: id counter + all rows of all themes
//! └── trees/
//!     └── {theme}.json    # Tree index of one theme
//! ```
//!
//! ## Transactions
//!
//! Every trait call is an independent write. Multi-row operations (saving
//! several locales, cascade deletes) are sequences of such calls with no
//! enclosing transaction; a failure midway leaves the earlier writes in place.

use crate::error::Result;
use crate::model::{PageRecord, RecordDraft, RecordId};
use crate::tree::TreeIndex;

pub mod backend;
pub mod fs;
pub mod fs_backend;
pub mod mem_backend;
pub mod memory;
pub mod table;

/// Per-locale page rows.
pub trait RecordStore {
    /// The row for one page in one locale.
    fn find_by_file_name(
        &self,
        theme: &str,
        file_name: &str,
        lang: &str,
    ) -> Result<Option<PageRecord>>;

    /// A row in `(theme, lang)` already using `url`, ignoring rows of
    /// `excluding` when given.
    fn find_duplicate_by_url(
        &self,
        theme: &str,
        excluding: Option<&str>,
        url: &str,
        lang: &str,
    ) -> Result<Option<PageRecord>>;

    /// Whether a row with this file name exists in `(theme, lang)`.
    fn find_duplicate_by_file_name(&self, theme: &str, file_name: &str, lang: &str)
        -> Result<bool>;

    /// File names of all pages in `(theme, lang)`, in insertion order.
    fn list_file_names(&self, theme: &str, lang: &str) -> Result<Vec<String>>;

    /// Row ids of a logical page across every locale.
    fn ids_for_file_name(&self, theme: &str, file_name: &str) -> Result<Vec<RecordId>>;

    fn insert(&mut self, draft: RecordDraft) -> Result<RecordId>;

    fn update(&mut self, id: RecordId, draft: RecordDraft) -> Result<()>;

    fn delete_by_id(&mut self, id: RecordId) -> Result<()>;
}

/// Per-theme tree index persistence.
pub trait TreeStore {
    /// The theme's index; empty when none was saved yet.
    fn load_tree(&self, theme: &str) -> Result<TreeIndex>;

    fn save_tree(&mut self, theme: &str, tree: &TreeIndex) -> Result<()>;
}

/// Everything page operations need from storage.
pub trait PageStore: RecordStore + TreeStore {}

impl<T: RecordStore + TreeStore + ?Sized> PageStore for T {}
