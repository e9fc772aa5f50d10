use super::backend::{StorageBackend, TableData};
use super::{RecordStore, TreeStore};
use crate::error::{PagesError, Result};
use crate::model::{PageRecord, RecordDraft, RecordId};
use crate::tree::TreeIndex;

/// Query and constraint logic over a [`StorageBackend`].
///
/// Every call loads the table fresh; nothing is cached between calls.
pub struct PageTable<B: StorageBackend> {
    /// The underlying storage backend.
    /// Exposed as pub(crate) for testing and internal access only.
    pub(crate) backend: B,
}

impl<B: StorageBackend> PageTable<B> {
    pub fn with_backend(backend: B) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// All rows of a theme, in insertion order.
    pub fn rows(&self, theme: &str) -> Result<Vec<PageRecord>> {
        let table = self.backend.load_table()?;
        Ok(table.rows.into_iter().filter(|r| r.theme == theme).collect())
    }

    fn ensure_unique_key(table: &TableData, draft: &RecordDraft, own_id: Option<RecordId>) -> Result<()> {
        let clash = table.rows.iter().any(|r| {
            Some(r.id) != own_id
                && r.theme == draft.theme
                && r.file_name == draft.file_name
                && r.lang == draft.lang
        });
        if clash {
            return Err(PagesError::Store(format!(
                "Row for {}/{} in {} already exists",
                draft.theme, draft.file_name, draft.lang
            )));
        }
        Ok(())
    }
}

impl<B: StorageBackend> RecordStore for PageTable<B> {
    fn find_by_file_name(
        &self,
        theme: &str,
        file_name: &str,
        lang: &str,
    ) -> Result<Option<PageRecord>> {
        let table = self.backend.load_table()?;
        Ok(table
            .rows
            .into_iter()
            .find(|r| r.theme == theme && r.file_name == file_name && r.lang == lang))
    }

    fn find_duplicate_by_url(
        &self,
        theme: &str,
        excluding: Option<&str>,
        url: &str,
        lang: &str,
    ) -> Result<Option<PageRecord>> {
        let table = self.backend.load_table()?;
        Ok(table.rows.into_iter().find(|r| {
            r.theme == theme
                && r.lang == lang
                && r.fields.url == url
                && excluding.map_or(true, |name| r.file_name != name)
        }))
    }

    fn find_duplicate_by_file_name(
        &self,
        theme: &str,
        file_name: &str,
        lang: &str,
    ) -> Result<bool> {
        Ok(self.find_by_file_name(theme, file_name, lang)?.is_some())
    }

    fn list_file_names(&self, theme: &str, lang: &str) -> Result<Vec<String>> {
        let table = self.backend.load_table()?;
        Ok(table
            .rows
            .into_iter()
            .filter(|r| r.theme == theme && r.lang == lang)
            .map(|r| r.file_name)
            .collect())
    }

    fn ids_for_file_name(&self, theme: &str, file_name: &str) -> Result<Vec<RecordId>> {
        let table = self.backend.load_table()?;
        Ok(table
            .rows
            .iter()
            .filter(|r| r.theme == theme && r.file_name == file_name)
            .map(|r| r.id)
            .collect())
    }

    fn insert(&mut self, draft: RecordDraft) -> Result<RecordId> {
        let mut table = self.backend.load_table()?;
        Self::ensure_unique_key(&table, &draft, None)?;

        let id = table.next_id;
        table.next_id += 1;
        table.rows.push(PageRecord::from_draft(id, draft));
        self.backend.save_table(&table)?;

        Ok(id)
    }

    fn update(&mut self, id: RecordId, draft: RecordDraft) -> Result<()> {
        let mut table = self.backend.load_table()?;
        Self::ensure_unique_key(&table, &draft, Some(id))?;

        let row = table
            .rows
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or(PagesError::RecordNotFound(id))?;
        *row = PageRecord::from_draft(id, draft);
        self.backend.save_table(&table)?;

        Ok(())
    }

    fn delete_by_id(&mut self, id: RecordId) -> Result<()> {
        let mut table = self.backend.load_table()?;
        let before = table.rows.len();
        table.rows.retain(|r| r.id != id);
        if table.rows.len() == before {
            return Err(PagesError::RecordNotFound(id));
        }
        self.backend.save_table(&table)?;
        Ok(())
    }
}

impl<B: StorageBackend> TreeStore for PageTable<B> {
    fn load_tree(&self, theme: &str) -> Result<TreeIndex> {
        Ok(self.backend.load_tree(theme)?.unwrap_or_default())
    }

    fn save_tree(&mut self, theme: &str, tree: &TreeIndex) -> Result<()> {
        self.backend.save_tree(theme, tree)
    }
}
