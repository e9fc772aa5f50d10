use super::mem_backend::MemBackend;
use super::table::PageTable;

pub type InMemoryStore = PageTable<MemBackend>;

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryStore {
    pub fn new() -> Self {
        PageTable::with_backend(MemBackend::new())
    }
}

// --- Test Fixtures ---

#[cfg(any(test, feature = "test_utils"))]
pub mod fixtures {
    use super::*;
    use crate::content::derive_code;
    use crate::model::{Placeholders, RecordDraft, ViewBag};
    use crate::store::{RecordStore, TreeStore};
    use chrono::Utc;

    /// Seeds an in-memory store with rows and tree entries directly, bypassing
    /// the page aggregate.
    pub struct StoreFixture {
        pub store: InMemoryStore,
        pub theme: String,
    }

    impl StoreFixture {
        pub fn new(theme: &str) -> Self {
            Self {
                store: InMemoryStore::new(),
                theme: theme.to_string(),
            }
        }

        /// Adds one locale row for a page.
        pub fn with_row(mut self, file_name: &str, lang: &str, url: &str, title: &str) -> Self {
            let mut settings = ViewBag::new();
            settings.set_url(url);
            settings.set("title", title);
            self.insert(file_name, lang, settings, Placeholders::new());
            self
        }

        /// Adds one locale row with placeholder content.
        pub fn with_content(
            mut self,
            file_name: &str,
            lang: &str,
            url: &str,
            placeholders: &[(&str, &str)],
        ) -> Self {
            let mut settings = ViewBag::new();
            settings.set_url(url);
            let placeholders: Placeholders = placeholders.iter().copied().collect();
            self.insert(file_name, lang, settings, placeholders);
            self
        }

        /// Places a page in the tree index.
        pub fn with_tree_entry(mut self, file_name: &str, parent: Option<&str>) -> Self {
            let mut tree = self.store.load_tree(&self.theme).unwrap();
            tree.append(file_name, parent).unwrap();
            self.store.save_tree(&self.theme, &tree).unwrap();
            self
        }

        fn insert(&mut self, file_name: &str, lang: &str, settings: ViewBag, placeholders: Placeholders) {
            let draft = RecordDraft {
                theme: self.theme.clone(),
                file_name: file_name.to_string(),
                lang: lang.to_string(),
                fields: settings.fields(),
                code: derive_code(Some(&placeholders)),
                settings,
                placeholders,
                markup: String::new(),
                mtime: Utc::now(),
            };
            self.store.insert(draft).unwrap();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::StoreFixture;
    use crate::store::{RecordStore, TreeStore};

    #[test]
    fn fixture_seeds_rows_and_tree() {
        let fixture = StoreFixture::new("demo")
            .with_row("about", "en", "/about", "About")
            .with_row("about", "fr", "/a-propos", "A propos")
            .with_tree_entry("about", None);

        let store = &fixture.store;
        assert_eq!(store.ids_for_file_name("demo", "about").unwrap().len(), 2);
        let row = store.find_by_file_name("demo", "about", "fr").unwrap().unwrap();
        assert_eq!(row.fields.title, "A propos");
        assert!(store.load_tree("demo").unwrap().contains("about"));
    }
}
