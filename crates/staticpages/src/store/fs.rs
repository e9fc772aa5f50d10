use super::fs_backend::FsBackend;
use super::table::PageTable;
use std::path::PathBuf;

/// Production store: the page table and tree indexes as JSON files.
pub type FileStore = PageTable<FsBackend>;

impl FileStore {
    pub fn new(root: PathBuf) -> Self {
        PageTable::with_backend(FsBackend::new(root))
    }
}
