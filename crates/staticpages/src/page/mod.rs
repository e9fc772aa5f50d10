//! # Page Aggregate
//!
//! A [`StaticPage`] is the in-memory form of one logical page: the
//! default-locale attributes plus one [`LocaleVariant`] per translated locale
//! that has a row. It is built fresh for every request and owned by the caller
//! for one load, save or delete cycle.
//!
//! ## Request Context
//!
//! Everything an operation needs to know about its surroundings travels in a
//! [`PageContext`]: the theme, the resolved [`Locales`] snapshot, the locale
//! the caller is displaying and the [`FilenameGenerator`]. Nothing is kept in
//! process-wide state; the file name minted during a save lives only in that
//! save's local scope.
//!
//! ## Operations
//!
//! - [`load`]: assemble a page from its default row and translation overlays.
//! - [`save`]: validate then write one row per active locale.
//! - [`delete`]: cascade delete through the tree index.
//!
//! ## Rendering Modes
//!
//! [`Render::Backend`] loads are for editing: the page loads as long as the
//! default row exists. [`Render::Frontend`] loads are for display: a page
//! without a row for the active locale is treated as absent, and the loaded
//! page carries composed documents (see [`crate::content`]).

use crate::content::derive_code;
use crate::filename::FilenameGenerator;
use crate::locale::Locales;
use crate::model::{Placeholders, ViewBag};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub mod delete;
pub mod load;
pub mod save;

pub use delete::DeleteReport;
pub use save::SaveOutcome;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Render {
    Backend,
    Frontend,
}

impl Render {
    pub fn is_frontend(self) -> bool {
        self == Render::Frontend
    }
}

/// Per-request context shared by load, save and delete.
#[derive(Debug, Clone)]
pub struct PageContext {
    theme: String,
    locales: Locales,
    active_locale: String,
    filenames: FilenameGenerator,
}

impl PageContext {
    /// A context displaying the default locale.
    pub fn new(theme: impl Into<String>, locales: Locales) -> Self {
        let active_locale = locales.default_locale().to_string();
        Self {
            theme: theme.into(),
            locales,
            active_locale,
            filenames: FilenameGenerator::default(),
        }
    }

    pub fn with_active_locale(mut self, locale: impl Into<String>) -> Self {
        self.active_locale = locale.into();
        self
    }

    pub fn with_filenames(mut self, filenames: FilenameGenerator) -> Self {
        self.filenames = filenames;
        self
    }

    pub fn theme(&self) -> &str {
        &self.theme
    }

    pub fn locales(&self) -> &Locales {
        &self.locales
    }

    pub fn default_locale(&self) -> &str {
        self.locales.default_locale()
    }

    pub fn active_locale(&self) -> &str {
        &self.active_locale
    }

    pub fn filenames(&self) -> &FilenameGenerator {
        &self.filenames
    }

    /// True when the caller displays a locale other than the default.
    pub fn displays_translation(&self) -> bool {
        !self.locales.is_default(&self.active_locale)
    }
}

/// One translated locale of a page, as loaded from its row.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LocaleVariant {
    pub markup: String,
    pub view_bag: ViewBag,
    pub placeholders: Placeholders,
    /// Always derived from `placeholders`.
    pub code: String,
    /// Composed document; only set for the active locale of a front-end load.
    pub content: Option<String>,
}

impl LocaleVariant {
    pub fn new(view_bag: ViewBag, placeholders: Placeholders, markup: String) -> Self {
        let code = derive_code(Some(&placeholders));
        Self {
            markup,
            view_bag,
            placeholders,
            code,
            content: None,
        }
    }
}

/// Caller-supplied translation of one locale, as submitted by an editor.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct TranslationInput {
    #[serde(default)]
    pub view_bag: ViewBag,
    #[serde(default)]
    pub placeholders: Option<Placeholders>,
    #[serde(default)]
    pub markup: Option<String>,
}

/// Translation payloads keyed by locale code.
pub type Translations = BTreeMap<String, TranslationInput>;

#[derive(Debug, Clone, PartialEq)]
struct Snapshot {
    parent: Option<String>,
    view_bag: ViewBag,
    markup: String,
    placeholders: Placeholders,
}

/// One logical page across all of its locales.
#[derive(Debug, Clone, Default, Serialize)]
pub struct StaticPage {
    /// Identity shared by every locale row; `None` until first saved.
    pub file_name: Option<String>,
    /// Where a newly created page is placed in the tree index.
    pub parent: Option<String>,
    pub view_bag: ViewBag,
    pub markup: String,
    pub placeholders: Placeholders,
    /// Composed default-locale document of a front-end load.
    pub content: Option<String>,
    pub mtime: Option<DateTime<Utc>>,
    pub translations: BTreeMap<String, LocaleVariant>,
    #[serde(skip)]
    synced: Option<Snapshot>,
}

impl StaticPage {
    /// A new, unsaved page.
    pub fn new(view_bag: ViewBag) -> Self {
        Self {
            view_bag,
            ..Default::default()
        }
    }

    pub fn with_parent(mut self, parent: impl Into<String>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    pub fn with_markup(mut self, markup: impl Into<String>) -> Self {
        self.markup = markup.into();
        self
    }

    pub fn with_placeholders(mut self, placeholders: Placeholders) -> Self {
        self.placeholders = placeholders;
        self
    }

    pub fn url(&self) -> String {
        self.view_bag.url()
    }

    /// Body code of the default locale, rendered from the placeholders.
    pub fn code(&self) -> String {
        derive_code(Some(&self.placeholders))
    }

    pub fn translation(&self, lang: &str) -> Option<&LocaleVariant> {
        self.translations.get(lang)
    }

    pub fn is_saved(&self) -> bool {
        self.file_name.is_some()
    }

    /// Whether the default-locale state differs from what was last loaded or
    /// saved. Pages never synced with storage are always dirty.
    pub fn is_dirty(&self) -> bool {
        match &self.synced {
            Some(snapshot) => *snapshot != self.snapshot(),
            None => true,
        }
    }

    pub(crate) fn mark_synced(&mut self) {
        self.synced = Some(self.snapshot());
    }

    fn snapshot(&self) -> Snapshot {
        Snapshot {
            parent: self.parent.clone(),
            view_bag: self.view_bag.clone(),
            markup: self.markup.clone(),
            placeholders: self.placeholders.clone(),
        }
    }
}
