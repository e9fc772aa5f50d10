//! # Configuration
//!
//! Configuration is managed by [`confique`], layered in priority order:
//! 1. **Environment variables**: `STATICPAGES_DATA_DIR`, `STATICPAGES_APP_LOCALE`, etc.
//! 2. **Config file**: an optional `staticpages.toml`.
//! 3. **Compiled defaults**: via `#[config(default = ...)]`.
//!
//! ## Available Settings
//!
//! | Key | Default | Description |
//! |-----|---------|-------------|
//! | `data_dir` | `.staticpages` | Root of the file-backed store |
//! | `app_locale` | (unset) | Locale used when no translation catalog is configured |
//! | `fallback_locale` | `en` | Used when `app_locale` is unset |
//! | `locales` | (unset) | Ordered locale list; enables translation mode |
//! | `default_locale` | (unset) | Default locale in translation mode (`en` when unset) |
//! | `max_file_name_len` | `200` | Truncation length for generated file names |

use crate::error::Result;
use confique::Config;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const CONFIG_FILE: &str = "staticpages.toml";

#[derive(Config, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct PagesConfig {
    /// Directory holding `pages.json` and the per-theme tree files.
    #[config(env = "STATICPAGES_DATA_DIR", default = ".staticpages")]
    pub data_dir: PathBuf,

    /// Application locale for single-locale mode.
    #[config(env = "STATICPAGES_APP_LOCALE")]
    pub app_locale: Option<String>,

    #[config(env = "STATICPAGES_FALLBACK_LOCALE", default = "en")]
    pub fallback_locale: String,

    /// Available locales, in display order. Setting this enables translations.
    pub locales: Option<Vec<String>>,

    #[config(env = "STATICPAGES_DEFAULT_LOCALE")]
    pub default_locale: Option<String>,

    #[config(default = 200)]
    pub max_file_name_len: usize,
}

impl Default for PagesConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(".staticpages"),
            app_locale: None,
            fallback_locale: "en".to_string(),
            locales: None,
            default_locale: None,
            max_file_name_len: crate::filename::MAX_FILE_NAME_LEN,
        }
    }
}

impl PagesConfig {
    /// Loads environment overrides on top of an optional TOML file.
    pub fn load(file: Option<&Path>) -> Result<Self> {
        let mut builder = Self::builder().env();
        if let Some(path) = file {
            builder = builder.file(path);
        }
        Ok(builder.load()?)
    }

    /// True when a locale list is configured.
    pub fn translations_enabled(&self) -> bool {
        self.locales
            .as_ref()
            .map(|locales| !locales.is_empty())
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_default_config() {
        let config = PagesConfig::default();
        assert_eq!(config.fallback_locale, "en");
        assert_eq!(config.max_file_name_len, 200);
        assert!(!config.translations_enabled());
    }

    #[test]
    fn test_load_from_file() {
        let temp = tempdir().unwrap();
        let path = temp.path().join(CONFIG_FILE);
        fs::write(
            &path,
            "data_dir = \"/srv/pages\"\nlocales = [\"en\", \"fr\"]\ndefault_locale = \"en\"\n",
        )
        .unwrap();

        let config = PagesConfig::load(Some(&path)).unwrap();
        assert_eq!(config.data_dir, PathBuf::from("/srv/pages"));
        assert_eq!(config.locales, Some(vec!["en".to_string(), "fr".to_string()]));
        assert!(config.translations_enabled());
        assert_eq!(config.max_file_name_len, 200);
    }

    #[test]
    fn test_empty_locale_list_is_single_locale_mode() {
        let config = PagesConfig {
            locales: Some(Vec::new()),
            ..Default::default()
        };
        assert!(!config.translations_enabled());
    }
}
