//! # Staticpages Architecture
//!
//! Staticpages stores **localized static pages**: every logical page has one row
//! per locale, a stable `file_name` shared by all of those rows, per-locale URL
//! uniqueness and a place in a per-theme navigation tree. It is a UI-agnostic
//! library; the `staticpages` binary is one client of it.
//!
//! ## Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (api.rs)                                         │
//! │  - Resolves the request context (theme, locales)            │
//! │  - Dispatches to page operations, returns Rust types        │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Page Layer (page/, reconcile.rs)                           │
//! │  - Load / save / delete of the multi-locale aggregate       │
//! │  - Validation, file name minting, tree maintenance          │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Storage Layer (store/)                                     │
//! │  - RecordStore + TreeStore traits                           │
//! │  - FileStore (production), InMemoryStore (testing)          │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Identity and Locales
//!
//! The default-locale row is authoritative: a page exists when it exists, and
//! its URL mints the page's `file_name` on first save. Translations are optional
//! rows of the same `file_name` in other locales. Which locales exist comes from
//! the [`locale::LocaleDirectory`], resolved once per request into a
//! [`locale::Locales`] snapshot.
//!
//! ## No I/O Assumptions in Core
//!
//! Nothing below the CLI writes to stdout or stderr. Diagnostics go through
//! `tracing`; installing a subscriber is the client's business.
//!
//! ## Module Overview
//!
//! - [`api`]: The API facade
//! - [`page`]: The page aggregate and its load/save/delete operations
//! - [`reconcile`]: Tree index / page row consistency repair
//! - [`store`]: Storage traits and implementations
//! - [`tree`]: The navigation tree index
//! - [`model`]: Rows, view-bags and placeholders
//! - [`content`]: Derived code and composed documents
//! - [`filename`]: File name generation
//! - [`locale`]: Locale resolution
//! - [`hooks`]: Save lifecycle hooks
//! - [`config`]: Configuration management
//! - [`error`]: Error types

pub mod api;
pub mod config;
pub mod content;
pub mod error;
pub mod filename;
pub mod hooks;
pub mod locale;
pub mod model;
pub mod page;
pub mod reconcile;
pub mod store;
pub mod tree;

#[cfg(test)]
mod test_utils;
