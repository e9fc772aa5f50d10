//! # API Facade
//!
//! [`PagesApi`] is the single entry point for page operations, whatever the
//! client. It is a **thin facade**:
//!
//! - it resolves the request context (locales, active locale, file name
//!   generator) that the page operations take explicitly;
//! - it dispatches to [`crate::page`] and [`crate::reconcile`];
//! - it returns structured types, never formatted output.
//!
//! Business logic lives in the page modules; this layer adds none.
//!
//! ## Generic Over PageStore
//!
//! - Production: `PagesApi<FileStore>`
//! - Testing: `PagesApi<InMemoryStore>`
//!
//! ## Testing Strategy
//!
//! API tests check that calls reach the right operation with the right
//! context. Operation semantics are tested next to the operations.

use crate::config::PagesConfig;
use crate::error::{PagesError, Result};
use crate::filename::FilenameGenerator;
use crate::hooks::PageHooks;
use crate::locale::LocaleDirectory;
use crate::page::{self, DeleteReport, PageContext, Render, SaveOutcome, StaticPage, Translations};
use crate::reconcile::{self, DoctorReport};
use crate::store::PageStore;
use crate::tree::TreeIndex;

pub struct PagesApi<S: PageStore> {
    store: S,
    locales: LocaleDirectory,
    filenames: FilenameGenerator,
}

impl<S: PageStore> PagesApi<S> {
    pub fn new(store: S, locales: LocaleDirectory) -> Self {
        Self {
            store,
            locales,
            filenames: FilenameGenerator::default(),
        }
    }

    pub fn from_config(store: S, config: &PagesConfig) -> Self {
        Self::new(store, LocaleDirectory::from_config(config))
            .with_filenames(FilenameGenerator::new(config.max_file_name_len))
    }

    pub fn with_filenames(mut self, filenames: FilenameGenerator) -> Self {
        self.filenames = filenames;
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Direct store access, bypassing the page operations.
    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn locales(&self) -> &LocaleDirectory {
        &self.locales
    }

    /// Request context for `theme`, displaying `active` or the default locale.
    pub fn context(&self, theme: &str, active: Option<&str>) -> PageContext {
        let ctx = PageContext::new(theme, self.locales.resolve()).with_filenames(self.filenames);
        match active {
            Some(locale) => ctx.with_active_locale(locale),
            None => ctx,
        }
    }

    pub fn load_page(
        &self,
        theme: &str,
        file_name: &str,
        active: Option<&str>,
        render: Render,
    ) -> Result<Option<StaticPage>> {
        page::load::run(&self.store, &self.context(theme, active), file_name, render)
    }

    /// Like [`Self::load_page`], but a missing page is an error.
    pub fn get_page(
        &self,
        theme: &str,
        file_name: &str,
        active: Option<&str>,
        render: Render,
    ) -> Result<StaticPage> {
        self.load_page(theme, file_name, active, render)?
            .ok_or_else(|| PagesError::PageNotFound(file_name.to_string()))
    }

    /// Every page of the theme that renders in the active locale, in creation
    /// order.
    pub fn list_pages(&self, theme: &str, active: Option<&str>) -> Result<Vec<StaticPage>> {
        let ctx = self.context(theme, active);
        let mut pages = Vec::new();
        for file_name in self.store.list_file_names(theme, ctx.default_locale())? {
            if let Some(page) = page::load::run(&self.store, &ctx, &file_name, Render::Frontend)? {
                pages.push(page);
            }
        }
        Ok(pages)
    }

    pub fn save_page<H: PageHooks + ?Sized>(
        &mut self,
        theme: &str,
        page: &mut StaticPage,
        translations: &Translations,
        hooks: &mut H,
    ) -> Result<SaveOutcome> {
        let ctx = self.context(theme, None);
        page::save::run(&mut self.store, &ctx, page, translations, hooks)
    }

    pub fn delete_page(&mut self, theme: &str, file_name: &str) -> Result<DeleteReport> {
        let page = self.get_page(theme, file_name, None, Render::Backend)?;
        let ctx = self.context(theme, None);
        page::delete::run(&mut self.store, &ctx, &page)
    }

    pub fn page_tree(&self, theme: &str) -> Result<TreeIndex> {
        let tree = self.store.load_tree(theme)?;
        tree.validate()?;
        Ok(tree)
    }

    pub fn doctor(&mut self, theme: &str) -> Result<DoctorReport> {
        let default_lang = self.locales.default_locale();
        reconcile::reconcile(&mut self.store, theme, &default_lang)
    }
}
