use super::{LocaleVariant, PageContext, Render, StaticPage};
use crate::content::{compose_document, compose_locale_document};
use crate::error::Result;
use crate::store::RecordStore;

/// Assembles a page from its default-locale row and every translation row.
///
/// Returns `None` when the default row is missing, or when a front-end load
/// displays a locale the page has no row for.
pub fn run<S: RecordStore + ?Sized>(
    store: &S,
    ctx: &PageContext,
    file_name: &str,
    render: Render,
) -> Result<Option<StaticPage>> {
    let theme = ctx.theme();
    let default_lang = ctx.default_locale();

    let Some(record) = store.find_by_file_name(theme, file_name, default_lang)? else {
        tracing::debug!(theme, file_name, lang = default_lang, "no default-locale row");
        return Ok(None);
    };

    if render.is_frontend() && ctx.displays_translation() {
        let active = ctx.active_locale();
        if store.find_by_file_name(theme, file_name, active)?.is_none() {
            tracing::debug!(theme, file_name, lang = active, "page not translated for display");
            return Ok(None);
        }
    }

    let mut page = StaticPage {
        file_name: Some(record.file_name.clone()),
        view_bag: record.view_bag(),
        markup: record.markup.clone(),
        placeholders: record.placeholders.clone(),
        mtime: Some(record.mtime),
        ..Default::default()
    };
    if render.is_frontend() {
        page.content = Some(compose_document(&record.fields, &page.code()));
    }
    // Snapshot before any front-end merge so the page reads as its stored state.
    page.mark_synced();

    for lang in ctx.locales().translated() {
        let Some(row) = store.find_by_file_name(theme, file_name, lang)? else {
            tracing::debug!(theme, file_name, lang, "no translation row");
            continue;
        };

        let mut variant = LocaleVariant::new(row.view_bag(), row.placeholders.clone(), row.markup.clone());
        if render.is_frontend() && ctx.displays_translation() && ctx.active_locale() == lang {
            page.view_bag.merge(&variant.view_bag);
            variant.content = Some(compose_locale_document(
                &row.fields,
                &variant.placeholders,
                &variant.code,
            ));
        }
        page.translations.insert(lang.to_string(), variant);
    }

    Ok(Some(page))
}
