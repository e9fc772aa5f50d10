use super::{PageContext, StaticPage};
use crate::error::{PagesError, Result};
use crate::store::PageStore;
use crate::tree::PageList;
use serde::Serialize;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DeleteReport {
    /// Descendants first (depth-first), then the page itself.
    pub deleted_pages: Vec<String>,
    pub deleted_rows: usize,
}

/// Deletes a page, every page below it in the tree index and all of their
/// locale rows, then drops the page's subtree from the index.
///
/// Rows are deleted one by one; a failure partway is not rolled back.
pub fn run<S: PageStore + ?Sized>(
    store: &mut S,
    ctx: &PageContext,
    page: &StaticPage,
) -> Result<DeleteReport> {
    let file_name = page.file_name.as_deref().ok_or(PagesError::Unsaved)?;
    let theme = ctx.theme();

    let mut doomed = PageList::new(store, theme).load_config()?.descendants(file_name);
    doomed.push(file_name.to_string());

    let mut report = DeleteReport::default();
    for name in doomed {
        for id in store.ids_for_file_name(theme, &name)? {
            store.delete_by_id(id)?;
            report.deleted_rows += 1;
        }
        tracing::debug!(theme, file_name = %name, "deleted page rows");
        report.deleted_pages.push(name);
    }

    PageList::new(store, theme).remove_subtree(file_name)?;

    tracing::info!(
        theme,
        file_name,
        pages = report.deleted_pages.len(),
        rows = report.deleted_rows,
        "deleted page"
    );
    Ok(report)
}
