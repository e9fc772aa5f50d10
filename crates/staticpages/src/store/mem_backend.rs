use super::backend::{StorageBackend, TableData};
use crate::error::{PagesError, Result};
use crate::tree::TreeIndex;
use std::cell::RefCell;
use std::collections::HashMap;

/// In-memory storage backend.
///
/// Uses `RefCell` for interior mutability since page operations are
/// single-threaded per request. This keeps the `StorageBackend` trait on
/// `&self` without paying for a lock.
#[derive(Default)]
pub struct MemBackend {
    table: RefCell<TableData>,
    trees: RefCell<HashMap<String, TreeIndex>>,
    simulate_write_error: RefCell<bool>,
    fail_after_writes: RefCell<Option<usize>>,
}

impl MemBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable write error simulation for testing error handling.
    pub fn set_simulate_write_error(&self, simulate: bool) {
        *self.simulate_write_error.borrow_mut() = simulate;
    }

    /// Let the next `writes` writes succeed, then fail every write after.
    pub fn fail_after_writes(&self, writes: usize) {
        *self.fail_after_writes.borrow_mut() = Some(writes);
    }

    fn check_write(&self) -> Result<()> {
        if *self.simulate_write_error.borrow() {
            return Err(PagesError::Store("Simulated write error".to_string()));
        }
        let mut budget = self.fail_after_writes.borrow_mut();
        if let Some(remaining) = budget.as_mut() {
            if *remaining == 0 {
                return Err(PagesError::Store("Simulated write error".to_string()));
            }
            *remaining -= 1;
        }
        Ok(())
    }
}

impl StorageBackend for MemBackend {
    fn load_table(&self) -> Result<TableData> {
        Ok(self.table.borrow().clone())
    }

    fn save_table(&self, table: &TableData) -> Result<()> {
        self.check_write()?;
        *self.table.borrow_mut() = table.clone();
        Ok(())
    }

    fn load_tree(&self, theme: &str) -> Result<Option<TreeIndex>> {
        Ok(self.trees.borrow().get(theme).cloned())
    }

    fn save_tree(&self, theme: &str, tree: &TreeIndex) -> Result<()> {
        self.check_write()?;
        self.trees
            .borrow_mut()
            .insert(theme.to_string(), tree.clone());
        Ok(())
    }
}
