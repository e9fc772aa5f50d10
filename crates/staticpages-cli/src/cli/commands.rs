use super::render;
use super::setup::{Cli, Commands};
use anyhow::{Context, Result};
use clap::Parser;
use serde::Deserialize;
use staticpages::api::PagesApi;
use staticpages::config::{PagesConfig, CONFIG_FILE};
use staticpages::hooks::NoHooks;
use staticpages::model::{Placeholders, ViewBag};
use staticpages::page::{Render, StaticPage, Translations};
use staticpages::store::fs::FileStore;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// The document `save` reads.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct PageInput {
    pub parent: Option<String>,
    pub view_bag: ViewBag,
    pub markup: Option<String>,
    pub placeholders: Option<Placeholders>,
    pub translations: Translations,
}

impl PageInput {
    /// A new page carrying everything in the document.
    pub fn into_new_page(self) -> (StaticPage, Translations) {
        let mut page = StaticPage::new(self.view_bag)
            .with_markup(self.markup.unwrap_or_default())
            .with_placeholders(self.placeholders.unwrap_or_default());
        page.parent = self.parent;
        (page, self.translations)
    }

    /// Applies the document to a loaded page; absent parts keep their
    /// loaded values. Tree placement of existing pages is not changed.
    pub fn apply_to(self, page: &mut StaticPage) -> Translations {
        if !self.view_bag.is_empty() {
            page.view_bag = self.view_bag;
        }
        if let Some(markup) = self.markup {
            page.markup = markup;
        }
        if let Some(placeholders) = self.placeholders {
            page.placeholders = placeholders;
        }
        self.translations
    }
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = load_config(&cli)?;
    tracing::debug!(data_dir = %config.data_dir.display(), "using page store");
    let mut api = PagesApi::from_config(FileStore::new(config.data_dir.clone()), &config);

    match cli.command {
        Commands::List {
            theme,
            locale,
            json,
        } => {
            let pages = api.list_pages(&theme, locale.as_deref())?;
            if json {
                let values = pages
                    .iter()
                    .map(render::page_value)
                    .collect::<serde_json::Result<Vec<_>>>()?;
                println!("{}", serde_json::to_string_pretty(&values)?);
            } else {
                print!("{}", render::render_page_list(&pages));
            }
        }
        Commands::Show {
            theme,
            file_name,
            locale,
            frontend,
            json,
        } => {
            let render_mode = if frontend {
                Render::Frontend
            } else {
                Render::Backend
            };
            let page = api.get_page(&theme, &file_name, locale.as_deref(), render_mode)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&render::page_value(&page)?)?);
            } else {
                print!("{}", render::render_page(&page));
            }
        }
        Commands::Tree { theme, json } => {
            let tree = api.page_tree(&theme)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&tree)?);
            } else {
                print!("{}", render::render_tree(&tree));
            }
        }
        Commands::Save {
            theme,
            input,
            file_name,
        } => {
            let document = read_input(&input)?;
            let (mut page, translations) = match file_name {
                Some(name) => {
                    let mut page = api.get_page(&theme, &name, None, Render::Backend)?;
                    let translations = document.apply_to(&mut page);
                    (page, translations)
                }
                None => document.into_new_page(),
            };
            let outcome = api.save_page(&theme, &mut page, &translations, &mut NoHooks)?;
            print!("{}", render::render_save(&page, outcome));
        }
        Commands::Delete { theme, file_name } => {
            let report = api.delete_page(&theme, &file_name)?;
            print!("{}", render::render_delete(&report));
        }
        Commands::Doctor { theme } => {
            let report = api.doctor(&theme)?;
            print!("{}", render::render_doctor(&report));
        }
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    // Logs go to stderr so stdout stays parseable with --json
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn config_path(cli: &Cli) -> Option<PathBuf> {
    match &cli.config {
        Some(path) => Some(path.clone()),
        None => {
            let local = PathBuf::from(CONFIG_FILE);
            local.exists().then_some(local)
        }
    }
}

fn load_config(cli: &Cli) -> Result<PagesConfig> {
    let path = config_path(cli);
    if let Some(path) = &path {
        if !path.exists() {
            anyhow::bail!("Config file not found: {}", path.display());
        }
    }
    let mut config = PagesConfig::load(path.as_deref())?;
    if let Some(dir) = &cli.data_dir {
        config.data_dir = dir.clone();
    }
    Ok(config)
}

fn read_input(path: &Path) -> Result<PageInput> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("Invalid page document {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(json: &str) -> PageInput {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn new_page_document_fills_every_part() {
        let (page, translations) = input(
            r#"{
                "parent": "products",
                "view_bag": {"url": "/products/widget", "title": "Widget"},
                "markup": "<p>hi</p>",
                "placeholders": {"main": "Body"},
                "translations": {"fr": {"view_bag": {"url": "/fr/widget"}}}
            }"#,
        )
        .into_new_page();

        assert_eq!(page.parent.as_deref(), Some("products"));
        assert_eq!(page.url(), "/products/widget");
        assert_eq!(page.markup, "<p>hi</p>");
        assert_eq!(page.placeholders.get("main"), Some("Body"));
        assert!(page.file_name.is_none());
        assert_eq!(translations["fr"].view_bag.url(), "/fr/widget");
    }

    #[test]
    fn update_document_keeps_absent_parts() {
        let mut bag = ViewBag::new();
        bag.set_url("/about");
        let mut page = StaticPage::new(bag).with_markup("<p>old</p>");

        let translations = input(r#"{"placeholders": {"main": "New"}}"#).apply_to(&mut page);

        assert_eq!(page.url(), "/about");
        assert_eq!(page.markup, "<p>old</p>");
        assert_eq!(page.placeholders.get("main"), Some("New"));
        assert!(translations.is_empty());
    }

    #[test]
    fn empty_document_is_accepted() {
        let (page, translations) = input("{}").into_new_page();
        assert!(page.view_bag.is_empty());
        assert!(translations.is_empty());
    }
}
