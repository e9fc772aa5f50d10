//! # Locale Directory
//!
//! Answers two questions for every page operation: which locale is the
//! default, and which locales are available. When a [`TranslationCatalog`] is
//! configured it is the source of truth; otherwise the directory runs in
//! single-locale mode on the configured application locale.
//!
//! Operations never query the directory mid-flight. They take a [`Locales`]
//! snapshot once (via [`LocaleDirectory::resolve`]) and carry it through the
//! request in the page context.

use crate::config::PagesConfig;

const CATALOG_FALLBACK_LOCALE: &str = "en";

/// A source of translation locales.
pub trait TranslationCatalog {
    /// The default locale code, if the catalog defines one.
    fn default_locale(&self) -> Option<String>;

    /// Available locale codes in display order.
    fn available_locales(&self) -> Vec<String>;
}

/// A fixed catalog, typically built from configuration.
#[derive(Debug, Clone)]
pub struct StaticCatalog {
    default: Option<String>,
    available: Vec<String>,
}

impl StaticCatalog {
    pub fn new(default: Option<String>, available: Vec<String>) -> Self {
        Self { default, available }
    }
}

impl TranslationCatalog for StaticCatalog {
    fn default_locale(&self) -> Option<String> {
        self.default.clone()
    }

    fn available_locales(&self) -> Vec<String> {
        self.available.clone()
    }
}

/// Resolved locale snapshot for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Locales {
    default: String,
    available: Vec<String>,
}

impl Locales {
    /// Builds a snapshot. A non-empty available list always contains the
    /// default locale (inserted first when missing) and no duplicates.
    pub fn new(default: impl Into<String>, available: Vec<String>) -> Self {
        let default = default.into();
        let mut ordered: Vec<String> = Vec::with_capacity(available.len() + 1);
        for code in available {
            if !code.is_empty() && !ordered.contains(&code) {
                ordered.push(code);
            }
        }
        if !ordered.is_empty() && !ordered.contains(&default) {
            ordered.insert(0, default.clone());
        }
        Self {
            default,
            available: ordered,
        }
    }

    /// Single-locale mode: no translations configured.
    pub fn single(default: impl Into<String>) -> Self {
        Self::new(default, Vec::new())
    }

    pub fn default_locale(&self) -> &str {
        &self.default
    }

    /// Available locales; empty in single-locale mode.
    pub fn available(&self) -> &[String] {
        &self.available
    }

    pub fn is_default(&self, code: &str) -> bool {
        self.default == code
    }

    /// Available locales other than the default, in order.
    pub fn translated(&self) -> impl Iterator<Item = &str> {
        self.available
            .iter()
            .map(String::as_str)
            .filter(move |code| *code != self.default)
    }
}

pub struct LocaleDirectory {
    catalog: Option<Box<dyn TranslationCatalog>>,
    app_locale: Option<String>,
    fallback_locale: String,
}

impl LocaleDirectory {
    /// Single-locale directory on the given application locale.
    pub fn single(app_locale: impl Into<String>) -> Self {
        Self {
            catalog: None,
            app_locale: Some(app_locale.into()),
            fallback_locale: CATALOG_FALLBACK_LOCALE.to_string(),
        }
    }

    pub fn from_config(config: &PagesConfig) -> Self {
        let catalog: Option<Box<dyn TranslationCatalog>> = if config.translations_enabled() {
            Some(Box::new(StaticCatalog::new(
                config.default_locale.clone(),
                config.locales.clone().unwrap_or_default(),
            )))
        } else {
            None
        };
        Self {
            catalog,
            app_locale: config.app_locale.clone(),
            fallback_locale: config.fallback_locale.clone(),
        }
    }

    pub fn with_catalog(mut self, catalog: impl TranslationCatalog + 'static) -> Self {
        self.catalog = Some(Box::new(catalog));
        self
    }

    pub fn default_locale(&self) -> String {
        match &self.catalog {
            Some(catalog) => catalog
                .default_locale()
                .filter(|code| !code.is_empty())
                .unwrap_or_else(|| CATALOG_FALLBACK_LOCALE.to_string()),
            None => self
                .app_locale
                .clone()
                .filter(|code| !code.is_empty())
                .unwrap_or_else(|| self.fallback_locale.clone()),
        }
    }

    pub fn available_locales(&self) -> Vec<String> {
        self.catalog
            .as_ref()
            .map(|catalog| catalog.available_locales())
            .unwrap_or_default()
    }

    pub fn resolve(&self) -> Locales {
        Locales::new(self.default_locale(), self.available_locales())
    }
}
