//! # File Name Generation
//!
//! Every logical page is identified by a `file_name` minted once, from the
//! default-locale URL, when the page is first created:
//!
//! 1. Path separators become hyphens: `/blog/archive` → `blog-archive`.
//! 2. Leading and trailing hyphens are trimmed.
//! 3. The result is truncated to the configured length (200 characters).
//! 4. An empty result becomes `index`.
//! 5. Collisions in `(theme, lang)` get `-2`, `-3`, … appended until free.
//!
//! Translations never mint their own name: once a page has a file name, it is
//! reused for every locale row of that page.

use crate::error::Result;
use crate::store::RecordStore;

pub const MAX_FILE_NAME_LEN: usize = 200;
const EMPTY_NAME: &str = "index";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilenameGenerator {
    max_len: usize,
}

impl Default for FilenameGenerator {
    fn default() -> Self {
        Self::new(MAX_FILE_NAME_LEN)
    }
}

impl FilenameGenerator {
    pub fn new(max_len: usize) -> Self {
        Self { max_len }
    }

    /// Returns `existing` when the page already has a name; otherwise derives
    /// a free name from `url`.
    pub fn generate<S: RecordStore + ?Sized>(
        &self,
        store: &S,
        url: &str,
        theme: &str,
        lang: &str,
        existing: Option<&str>,
    ) -> Result<String> {
        if let Some(name) = existing {
            return Ok(name.to_string());
        }

        let base = self.slug(url);
        let mut candidate = base.clone();
        let mut counter = 2;
        while store.find_duplicate_by_file_name(theme, &candidate, lang)? {
            candidate = format!("{}-{}", base, counter);
            counter += 1;
        }

        tracing::debug!(theme, lang, url, file_name = %candidate, "generated file name");
        Ok(candidate)
    }

    /// The undeduplicated base name for a URL.
    pub fn slug(&self, url: &str) -> String {
        let replaced = url.trim().replace('/', "-");
        let trimmed: String = replaced.trim_matches('-').chars().take(self.max_len).collect();
        if trimmed.is_empty() {
            EMPTY_NAME.to_string()
        } else {
            trimmed
        }
    }
}
