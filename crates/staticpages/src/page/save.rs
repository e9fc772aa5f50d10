use super::{LocaleVariant, PageContext, StaticPage, Translations};
use crate::content::derive_code;
use crate::error::{FieldError, PagesError, Result, ValidationErrors};
use crate::hooks::{HookDecision, PageHooks};
use crate::model::{Placeholders, RecordDraft, ViewBag};
use crate::store::PageStore;
use crate::tree::PageList;
use chrono::{DateTime, Utc};

pub const URL_REQUIRED: &str = "url_required";
pub const URL_NOT_UNIQUE: &str = "url_not_unique";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    Saved,
    /// `on_saving` vetoed the save; nothing was written.
    Rejected,
}

/// What one locale row of a save will contain.
#[derive(Debug)]
struct WritePlan {
    lang: String,
    view_bag: ViewBag,
    placeholders: Placeholders,
    markup: String,
}

impl WritePlan {
    fn draft(&self, theme: &str, file_name: &str, mtime: DateTime<Utc>) -> RecordDraft {
        RecordDraft {
            theme: theme.to_string(),
            file_name: file_name.to_string(),
            lang: self.lang.clone(),
            fields: self.view_bag.fields(),
            settings: self.view_bag.clone(),
            code: derive_code(Some(&self.placeholders)),
            placeholders: self.placeholders.clone(),
            markup: self.markup.clone(),
            mtime,
        }
    }
}

/// Writes one row per active locale of the page.
///
/// Every locale is validated before the first write. Writes themselves are
/// independent: a failure partway leaves the rows already written in place.
pub fn run<S, H>(
    store: &mut S,
    ctx: &PageContext,
    page: &mut StaticPage,
    translations: &Translations,
    hooks: &mut H,
) -> Result<SaveOutcome>
where
    S: PageStore + ?Sized,
    H: PageHooks + ?Sized,
{
    if hooks.on_saving(page) == HookDecision::Reject {
        tracing::info!(theme = ctx.theme(), file_name = ?page.file_name, "save rejected by hook");
        return Ok(SaveOutcome::Rejected);
    }

    let mtime = Utc::now();
    let plans = build_plans(ctx, page, translations);

    for plan in &plans {
        validate(&*store, ctx, page.file_name.as_deref(), plan)?;
    }

    let theme = ctx.theme();
    // An unusable theme or a broken index fails here, before any row is written
    PageList::new(&mut *store, theme).load_config()?;

    let mut file_name = page.file_name.clone();
    for plan in &plans {
        let existing = match &file_name {
            Some(name) => store.find_by_file_name(theme, name, &plan.lang)?,
            None => None,
        };

        match existing {
            Some(row) => {
                store.update(row.id, plan.draft(theme, &row.file_name, mtime))?;
                tracing::debug!(theme, file_name = %row.file_name, lang = %plan.lang, id = row.id, "updated row");
            }
            None => {
                let name = match &file_name {
                    Some(name) => name.clone(),
                    None => {
                        let minted = ctx.filenames().generate(
                            &*store,
                            &page.url(),
                            theme,
                            ctx.default_locale(),
                            None,
                        )?;
                        file_name = Some(minted.clone());
                        minted
                    }
                };
                create_row(store, ctx, page, plan, &name, mtime, hooks)?;
            }
        }

        if !ctx.locales().is_default(&plan.lang) {
            page.translations.insert(
                plan.lang.clone(),
                LocaleVariant::new(plan.view_bag.clone(), plan.placeholders.clone(), plan.markup.clone()),
            );
        }
    }

    hooks.on_saved(page);
    page.mtime = Some(mtime);
    page.mark_synced();

    tracing::info!(
        theme,
        file_name = ?page.file_name,
        locales = plans.len(),
        "saved page"
    );
    Ok(SaveOutcome::Saved)
}

fn create_row<S, H>(
    store: &mut S,
    ctx: &PageContext,
    page: &mut StaticPage,
    plan: &WritePlan,
    file_name: &str,
    mtime: DateTime<Utc>,
    hooks: &mut H,
) -> Result<()>
where
    S: PageStore + ?Sized,
    H: PageHooks + ?Sized,
{
    let theme = ctx.theme();
    page.file_name = Some(file_name.to_string());
    hooks.on_creating(page, &plan.lang);

    let id = store.insert(plan.draft(theme, file_name, mtime))?;
    tracing::debug!(theme, file_name, lang = %plan.lang, id, "created row");

    PageList::new(store, theme).append_page(file_name, page.parent.as_deref())?;
    hooks.on_created(page, &plan.lang);
    Ok(())
}

/// Default locale first, then each translated locale that has something to
/// write: the caller's payload, else the overlay the page was loaded with.
fn build_plans(ctx: &PageContext, page: &StaticPage, translations: &Translations) -> Vec<WritePlan> {
    let mut plans = vec![WritePlan {
        lang: ctx.default_locale().to_string(),
        view_bag: page.view_bag.clone(),
        placeholders: page.placeholders.clone(),
        markup: page.markup.clone(),
    }];

    for lang in ctx.locales().translated() {
        let loaded = page.translation(lang);
        let plan = match translations.get(lang) {
            Some(input) => {
                let mut view_bag = input.view_bag.clone();
                let url = view_bag.url();
                view_bag.set_url(url);
                WritePlan {
                    lang: lang.to_string(),
                    view_bag,
                    placeholders: input
                        .placeholders
                        .clone()
                        .or_else(|| loaded.map(|v| v.placeholders.clone()))
                        .unwrap_or_default(),
                    markup: input
                        .markup
                        .clone()
                        .or_else(|| loaded.map(|v| v.markup.clone()))
                        .unwrap_or_default(),
                }
            }
            None => match loaded {
                Some(variant) => WritePlan {
                    lang: lang.to_string(),
                    view_bag: variant.view_bag.clone(),
                    placeholders: variant.placeholders.clone(),
                    markup: variant.markup.clone(),
                },
                None => {
                    tracing::debug!(theme = ctx.theme(), lang, "no translation to write");
                    continue;
                }
            },
        };
        plans.push(plan);
    }

    plans
}

fn validate<S: PageStore + ?Sized>(
    store: &S,
    ctx: &PageContext,
    file_name: Option<&str>,
    plan: &WritePlan,
) -> Result<()> {
    let url = plan.view_bag.url();
    if url.trim().is_empty() {
        if ctx.locales().is_default(&plan.lang) {
            return Err(PagesError::Validation(ValidationErrors::single(
                "url",
                FieldError::new(URL_REQUIRED).with_param("lang", plan.lang.as_str()),
            )));
        }
        return Ok(());
    }

    if let Some(other) = store.find_duplicate_by_url(ctx.theme(), file_name, &url, &plan.lang)? {
        tracing::debug!(
            theme = ctx.theme(),
            url = %url,
            lang = %plan.lang,
            owner = %other.file_name,
            "url already taken"
        );
        return Err(PagesError::Validation(ValidationErrors::single(
            "url",
            FieldError::new(URL_NOT_UNIQUE)
                .with_param("url", url.as_str())
                .with_param("lang", plan.lang.as_str()),
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hooks::NoHooks;
    use crate::locale::Locales;
    use crate::model::ViewBag;
    use crate::page::TranslationInput;
    use crate::store::memory::fixtures::StoreFixture;
    use crate::store::memory::InMemoryStore;
    use crate::store::{RecordStore, TreeStore};

    fn single() -> PageContext {
        PageContext::new("demo", Locales::single("en"))
    }

    fn bilingual() -> PageContext {
        PageContext::new("demo", Locales::new("en", vec!["en".into(), "fr".into()]))
    }

    fn page(url: &str) -> StaticPage {
        let mut bag = ViewBag::new();
        bag.set_url(url);
        bag.set("title", "Title");
        StaticPage::new(bag)
    }

    fn french(url: &str) -> Translations {
        let mut bag = ViewBag::new();
        bag.set_url(url);
        let mut translations = Translations::new();
        translations.insert(
            "fr".into(),
            TranslationInput {
                view_bag: bag,
                ..Default::default()
            },
        );
        translations
    }

    #[derive(Default)]
    struct Recorder {
        events: Vec<String>,
        reject: bool,
    }

    impl PageHooks for Recorder {
        fn on_saving(&mut self, _page: &StaticPage) -> HookDecision {
            self.events.push("saving".into());
            if self.reject {
                HookDecision::Reject
            } else {
                HookDecision::Proceed
            }
        }

        fn on_saved(&mut self, _page: &StaticPage) {
            self.events.push("saved".into());
        }

        fn on_creating(&mut self, page: &StaticPage, lang: &str) {
            self.events.push(format!(
                "creating {} {}",
                page.file_name.as_deref().unwrap_or("-"),
                lang
            ));
        }

        fn on_created(&mut self, _page: &StaticPage, lang: &str) {
            self.events.push(format!("created {}", lang));
        }
    }

    #[test]
    fn creates_default_row_and_tree_entry() {
        let mut store = InMemoryStore::new();
        let mut page = page("/about/team");

        let outcome = run(&mut store, &single(), &mut page, &Translations::new(), &mut NoHooks).unwrap();

        assert_eq!(outcome, SaveOutcome::Saved);
        assert_eq!(page.file_name.as_deref(), Some("about-team"));
        assert!(!page.is_dirty());
        let row = store.find_by_file_name("demo", "about-team", "en").unwrap().unwrap();
        assert_eq!(row.fields.title, "Title");
        assert_eq!(Some(row.mtime), page.mtime);
        assert!(store.load_tree("demo").unwrap().contains("about-team"));
    }

    #[test]
    fn rejected_save_writes_nothing() {
        let mut store = InMemoryStore::new();
        let mut page = page("/about");
        let mut hooks = Recorder {
            reject: true,
            ..Default::default()
        };

        let outcome = run(&mut store, &single(), &mut page, &Translations::new(), &mut hooks).unwrap();

        assert_eq!(outcome, SaveOutcome::Rejected);
        assert_eq!(hooks.events, ["saving"]);
        assert!(store.list_file_names("demo", "en").unwrap().is_empty());
        assert!(page.file_name.is_none());
    }

    #[test]
    fn hooks_fire_in_order_with_shared_file_name() {
        let mut store = InMemoryStore::new();
        let mut page = page("/about");
        let mut hooks = Recorder::default();

        run(&mut store, &bilingual(), &mut page, &french("/fr/a-propos"), &mut hooks).unwrap();

        assert_eq!(
            hooks.events,
            [
                "saving",
                "creating about en",
                "created en",
                "creating about fr",
                "created fr",
                "saved"
            ]
        );
        assert_eq!(store.ids_for_file_name("demo", "about").unwrap().len(), 2);
    }

    #[test]
    fn mtime_is_shared_by_all_rows() {
        let mut store = InMemoryStore::new();
        let mut page = page("/about");
        run(&mut store, &bilingual(), &mut page, &french("/fr/a-propos"), &mut NoHooks).unwrap();

        let en = store.find_by_file_name("demo", "about", "en").unwrap().unwrap();
        let fr = store.find_by_file_name("demo", "about", "fr").unwrap().unwrap();
        assert_eq!(en.mtime, fr.mtime);
    }

    #[test]
    fn empty_default_url_is_rejected() {
        let mut store = InMemoryStore::new();
        let mut page = page("");

        let err = run(&mut store, &single(), &mut page, &Translations::new(), &mut NoHooks).unwrap_err();

        let field = err.validation().unwrap().get("url").unwrap();
        assert_eq!(field.message, URL_REQUIRED);
        assert_eq!(field.params.get("lang").map(String::as_str), Some("en"));
        assert!(store.list_file_names("demo", "en").unwrap().is_empty());
    }

    #[test]
    fn empty_translation_url_is_allowed() {
        let mut store = InMemoryStore::new();
        let mut page = page("/about");

        run(&mut store, &bilingual(), &mut page, &french(""), &mut NoHooks).unwrap();

        let fr = store.find_by_file_name("demo", "about", "fr").unwrap().unwrap();
        assert_eq!(fr.fields.url, "");
    }

    #[test]
    fn duplicate_translation_url_blocks_every_write() {
        let fixture = StoreFixture::new("demo").with_row("contact", "fr", "/fr/contact", "Contact");
        let mut store = fixture.store;
        let mut page = page("/about");

        let err = run(&mut store, &bilingual(), &mut page, &french("/fr/contact"), &mut NoHooks)
            .unwrap_err();

        let field = err.validation().unwrap().get("url").unwrap();
        assert_eq!(field.message, URL_NOT_UNIQUE);
        assert_eq!(field.params.get("url").map(String::as_str), Some("/fr/contact"));
        assert!(store.find_by_file_name("demo", "about", "en").unwrap().is_none());
    }

    #[test]
    fn update_keeps_row_ids() {
        let mut store = InMemoryStore::new();
        let mut page = page("/about");
        run(&mut store, &single(), &mut page, &Translations::new(), &mut NoHooks).unwrap();
        let before = store.ids_for_file_name("demo", "about").unwrap();

        page.view_bag.set("title", "Changed");
        let mut hooks = Recorder::default();
        run(&mut store, &single(), &mut page, &Translations::new(), &mut hooks).unwrap();

        assert_eq!(store.ids_for_file_name("demo", "about").unwrap(), before);
        assert_eq!(hooks.events, ["saving", "saved"]);
        let row = store.find_by_file_name("demo", "about", "en").unwrap().unwrap();
        assert_eq!(row.fields.title, "Changed");
    }

    #[test]
    fn first_translation_of_existing_page_reuses_file_name() {
        let mut store = InMemoryStore::new();
        let mut page = page("/about");
        run(&mut store, &single(), &mut page, &Translations::new(), &mut NoHooks).unwrap();

        run(&mut store, &bilingual(), &mut page, &french("/fr/a-propos"), &mut NoHooks).unwrap();

        let fr = store.find_by_file_name("demo", "about", "fr").unwrap().unwrap();
        assert_eq!(fr.fields.url, "/fr/a-propos");
        assert_eq!(page.translation("fr").unwrap().view_bag.url(), "/fr/a-propos");
        assert_eq!(store.load_tree("demo").unwrap().file_names(), ["about"]);
    }

    #[test]
    fn translation_without_payload_keeps_loaded_overlay() {
        let mut store = InMemoryStore::new();
        let mut page = page("/about");
        let mut first = french("/fr/a-propos");
        first.get_mut("fr").unwrap().markup = Some("<p>fr</p>".into());
        run(&mut store, &bilingual(), &mut page, &first, &mut NoHooks).unwrap();

        run(&mut store, &bilingual(), &mut page, &Translations::new(), &mut NoHooks).unwrap();

        let fr = store.find_by_file_name("demo", "about", "fr").unwrap().unwrap();
        assert_eq!(fr.fields.url, "/fr/a-propos");
        assert_eq!(fr.markup, "<p>fr</p>");
    }

    #[test]
    fn translation_without_payload_or_overlay_is_not_written() {
        let mut store = InMemoryStore::new();
        let mut page = page("/about");
        run(&mut store, &bilingual(), &mut page, &Translations::new(), &mut NoHooks).unwrap();

        assert!(store.find_by_file_name("demo", "about", "fr").unwrap().is_none());
    }

    #[test]
    fn new_page_is_placed_under_parent() {
        let mut store = InMemoryStore::new();
        let mut parent = page("/products");
        run(&mut store, &single(), &mut parent, &Translations::new(), &mut NoHooks).unwrap();

        let mut child = page("/products/widget").with_parent("products");
        run(&mut store, &single(), &mut child, &Translations::new(), &mut NoHooks).unwrap();

        let tree = store.load_tree("demo").unwrap();
        assert_eq!(tree.descendants("products"), ["products-widget"]);
    }

    #[test]
    fn stored_code_is_derived_from_placeholders() {
        let mut store = InMemoryStore::new();
        let mut page = page("/about")
            .with_placeholders([("main", "Body"), ("aside", "")].into_iter().collect());
        run(&mut store, &single(), &mut page, &Translations::new(), &mut NoHooks).unwrap();

        let row = store.find_by_file_name("demo", "about", "en").unwrap().unwrap();
        assert_eq!(row.code, "{% put main %}\nBody\n{% endput %}");
    }

    #[test]
    fn invalid_theme_fails_before_any_row_is_written() {
        use crate::store::fs::FileStore;
        use tempfile::tempdir;

        let temp = tempdir().unwrap();
        let mut store = FileStore::new(temp.path().to_path_buf());
        let ctx = PageContext::new("a/b", Locales::single("en"));
        let mut page = page("/about");

        let result = run(&mut store, &ctx, &mut page, &Translations::new(), &mut NoHooks);

        assert!(matches!(result, Err(PagesError::Store(_))));
        assert!(!temp.path().join("pages.json").exists());
        assert!(store.list_file_names("a/b", "en").unwrap().is_empty());
        assert!(page.file_name.is_none());
    }

    #[test]
    fn broken_tree_index_blocks_the_save() {
        let mut store = InMemoryStore::new();
        let tree: crate::tree::TreeIndex =
            serde_json::from_value(serde_json::json!({"a": {"x": {}}, "b": {"x": {}}})).unwrap();
        store.save_tree("demo", &tree).unwrap();
        let mut page = page("/about");

        let result = run(&mut store, &single(), &mut page, &Translations::new(), &mut NoHooks);

        assert!(matches!(result, Err(PagesError::DuplicateTreeEntry(name)) if name == "x"));
        assert!(store.list_file_names("demo", "en").unwrap().is_empty());
    }

    #[test]
    fn failed_later_write_keeps_earlier_rows() {
        use crate::store::mem_backend::MemBackend;
        use crate::store::table::PageTable;

        let backend = MemBackend::new();
        // default row insert + its tree entry succeed, the French insert fails
        backend.fail_after_writes(2);
        let mut store = PageTable::with_backend(backend);
        let mut page = page("/about");

        let result = run(&mut store, &bilingual(), &mut page, &french("/fr/a-propos"), &mut NoHooks);

        assert!(matches!(result, Err(PagesError::Store(_))));
        assert!(store.find_by_file_name("demo", "about", "en").unwrap().is_some());
        assert!(store.find_by_file_name("demo", "about", "fr").unwrap().is_none());
    }
}
