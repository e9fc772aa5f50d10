use super::backend::{StorageBackend, TableData};
use crate::error::{PagesError, Result};
use crate::tree::TreeIndex;
use std::fs;
use std::path::{Path, PathBuf};
use uuid::Uuid;

const TABLE_FILE: &str = "pages.json";
const TREES_DIR: &str = "trees";

pub struct FsBackend {
    root: PathBuf,
}

impl FsBackend {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn table_path(&self) -> PathBuf {
        self.root.join(TABLE_FILE)
    }

    fn tree_path(&self, theme: &str) -> Result<PathBuf> {
        if theme.is_empty()
            || theme.starts_with('.')
            || theme.contains(['/', '\\'])
            || theme.contains('\0')
        {
            return Err(PagesError::Store(format!(
                "Invalid theme identifier: {:?}",
                theme
            )));
        }
        Ok(self.root.join(TREES_DIR).join(format!("{}.json", theme)))
    }

    fn ensure_dir(&self, path: &Path) -> Result<()> {
        if !path.exists() {
            fs::create_dir_all(path).map_err(PagesError::Io)?;
        }
        Ok(())
    }

    fn write_atomic(&self, target: &Path, content: &str) -> Result<()> {
        let dir = target
            .parent()
            .ok_or_else(|| PagesError::Store(format!("No parent for {}", target.display())))?;
        self.ensure_dir(dir)?;

        let tmp = dir.join(format!(".tmp-{}", Uuid::new_v4()));
        fs::write(&tmp, content).map_err(PagesError::Io)?;
        fs::rename(&tmp, target).map_err(PagesError::Io)?;
        Ok(())
    }
}

impl StorageBackend for FsBackend {
    fn load_table(&self) -> Result<TableData> {
        let path = self.table_path();
        if !path.exists() {
            return Ok(TableData::default());
        }
        let content = fs::read_to_string(path).map_err(PagesError::Io)?;
        let table: TableData = serde_json::from_str(&content).map_err(PagesError::Serialization)?;
        Ok(table)
    }

    fn save_table(&self, table: &TableData) -> Result<()> {
        let content = serde_json::to_string_pretty(table).map_err(PagesError::Serialization)?;
        self.write_atomic(&self.table_path(), &content)
    }

    fn load_tree(&self, theme: &str) -> Result<Option<TreeIndex>> {
        let path = self.tree_path(theme)?;
        if !path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(path).map_err(PagesError::Io)?;
        let tree: TreeIndex = serde_json::from_str(&content).map_err(PagesError::Serialization)?;
        Ok(Some(tree))
    }

    fn save_tree(&self, theme: &str, tree: &TreeIndex) -> Result<()> {
        let path = self.tree_path(theme)?;
        let content = serde_json::to_string_pretty(tree).map_err(PagesError::Serialization)?;
        self.write_atomic(&path, &content)
    }
}
