//! # Tree / Record Reconciliation
//!
//! Saves and cascade deletes are sequences of independent writes, so a failure
//! partway can leave the tree index and the page rows disagreeing. The doctor
//! brings them back in line, treating the default-locale rows as the source of
//! truth:
//!
//! 1. Tree nodes without a default-locale row are dropped. Their children are
//!    lifted into the dropped node's place, so surviving pages keep their
//!    relative order.
//! 2. Default-locale pages missing from the tree are appended at top level, in
//!    row insertion order.
//!
//! The tree is only written back when one of the two steps changed something.

use crate::error::Result;
use crate::store::PageStore;
use serde::Serialize;
use std::collections::HashSet;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DoctorReport {
    /// Tree entries removed because the page has no default-locale row.
    pub pruned_nodes: Vec<String>,
    /// Pages added to the tree because they were missing from it.
    pub adopted_pages: Vec<String>,
}

impl DoctorReport {
    pub fn is_clean(&self) -> bool {
        self.pruned_nodes.is_empty() && self.adopted_pages.is_empty()
    }
}

pub fn reconcile<S: PageStore + ?Sized>(
    store: &mut S,
    theme: &str,
    default_lang: &str,
) -> Result<DoctorReport> {
    let pages = store.list_file_names(theme, default_lang)?;
    let known: HashSet<&str> = pages.iter().map(String::as_str).collect();

    let mut tree = store.load_tree(theme)?;
    tree.validate()?;

    let mut report = DoctorReport {
        pruned_nodes: tree.prune(|name| known.contains(name)),
        ..Default::default()
    };

    for page in &pages {
        if tree.append(page, None)? {
            report.adopted_pages.push(page.clone());
        }
    }

    if report.is_clean() {
        tracing::debug!(theme, "tree index consistent with page rows");
        return Ok(report);
    }

    for name in &report.pruned_nodes {
        tracing::warn!(theme, file_name = %name, "pruned tree entry without default-locale row");
    }
    for name in &report.adopted_pages {
        tracing::warn!(theme, file_name = %name, "adopted page missing from tree");
    }
    store.save_tree(theme, &tree)?;

    Ok(report)
}
