use crate::error::Result;
use crate::model::{PageRecord, RecordId};
use crate::tree::TreeIndex;
use serde::{Deserialize, Serialize};

/// The persisted page table: every row of every theme plus the id counter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableData {
    /// Next id to hand out. Ids are never reused.
    pub next_id: RecordId,
    pub rows: Vec<PageRecord>,
}

impl Default for TableData {
    fn default() -> Self {
        Self {
            next_id: 1,
            rows: Vec::new(),
        }
    }
}

/// Abstract interface for raw storage I/O.
/// This trait handles the "how" of storage (filesystem vs memory),
/// while PageTable handles the "what" (lookups, constraints, ids).
pub trait StorageBackend {
    // --- Page Table ---

    /// Load the page table. A missing table loads as empty.
    fn load_table(&self) -> Result<TableData>;

    /// Replace the page table.
    /// MUST be atomic (e.g. write to tmp then rename) to avoid partial writes.
    fn save_table(&self, table: &TableData) -> Result<()>;

    // --- Tree Indexes ---

    /// Load a theme's tree index. Returns Ok(None) if none was saved.
    fn load_tree(&self, theme: &str) -> Result<Option<TreeIndex>>;

    /// Replace a theme's tree index.
    fn save_tree(&self, theme: &str, tree: &TreeIndex) -> Result<()>;
}
