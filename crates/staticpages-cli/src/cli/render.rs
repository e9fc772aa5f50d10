//! # Rendering Module
//!
//! Turns API results into terminal text or JSON values. Nothing here touches
//! stdout; `commands.rs` prints what these functions return.
//!
//! Styling goes through `console`, which drops ANSI codes by itself when the
//! output is not a terminal.

use console::Style;
use serde_json::Value;
use staticpages::error::{PagesError, ValidationErrors};
use staticpages::page::{DeleteReport, SaveOutcome, StaticPage};
use staticpages::reconcile::DoctorReport;
use staticpages::tree::{TreeIndex, TreeNode};

const INDENT: &str = "  ";

fn title_style() -> Style {
    Style::new().bold()
}

fn muted_style() -> Style {
    Style::new().dim()
}

fn warning_style() -> Style {
    Style::new().yellow()
}

fn success_style() -> Style {
    Style::new().green()
}

fn error_style() -> Style {
    Style::new().red()
}

fn file_name_of(page: &StaticPage) -> &str {
    page.file_name.as_deref().unwrap_or("(unsaved)")
}

pub fn render_page_list(pages: &[StaticPage]) -> String {
    if pages.is_empty() {
        return format!("{}\n", muted_style().apply_to("No pages."));
    }

    let width = pages
        .iter()
        .map(|p| file_name_of(p).chars().count())
        .max()
        .unwrap_or(0);

    let mut out = String::new();
    for page in pages {
        let name = format!("{:<width$}", file_name_of(page), width = width);
        out.push_str(&format!(
            "{}  {}  {}\n",
            title_style().apply_to(name),
            page.url(),
            muted_style().apply_to(page.view_bag.title())
        ));
    }
    out
}

pub fn render_page(page: &StaticPage) -> String {
    let fields = page.view_bag.fields();
    let mut out = format!("{}\n", title_style().apply_to(file_name_of(page)));

    let mut rows = vec![
        ("url", fields.url),
        ("title", fields.title),
        ("layout", fields.layout),
        ("hidden", yes_no(fields.is_hidden).to_string()),
        ("nav hidden", yes_no(fields.navigation_hidden).to_string()),
    ];
    if let Some(mtime) = page.mtime {
        rows.push(("modified", mtime.format("%Y-%m-%d %H:%M:%S").to_string()));
    }
    if !page.placeholders.is_empty() {
        let names: Vec<&str> = page.placeholders.iter().map(|(name, _)| name).collect();
        rows.push(("placeholders", names.join(", ")));
    }
    for (label, value) in rows {
        out.push_str(&format!(
            "{}{} {}\n",
            INDENT,
            muted_style().apply_to(format!("{:<13}", format!("{}:", label))),
            value
        ));
    }

    if !page.translations.is_empty() {
        out.push_str(&format!("{}\n", title_style().apply_to("translations")));
        for (lang, variant) in &page.translations {
            let url = variant.view_bag.url();
            let url = if url.is_empty() { "-".to_string() } else { url };
            out.push_str(&format!("{}{}  {}\n", INDENT, lang, url));
        }
    }

    let code = page.code();
    if !code.is_empty() {
        out.push_str(&format!("{}\n{}\n", muted_style().apply_to("--- code"), code));
    }
    if let Some(content) = &page.content {
        out.push_str(&format!("{}\n{}\n", muted_style().apply_to("--- content"), content));
    }
    out
}

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "yes"
    } else {
        "no"
    }
}

/// The page as JSON, with its derived code.
pub fn page_value(page: &StaticPage) -> serde_json::Result<Value> {
    let mut value = serde_json::to_value(page)?;
    if let Value::Object(map) = &mut value {
        map.insert("code".to_string(), Value::String(page.code()));
    }
    Ok(value)
}

pub fn render_tree(tree: &TreeIndex) -> String {
    if tree.is_empty() {
        return format!("{}\n", muted_style().apply_to("(empty tree)"));
    }
    let mut out = String::new();
    for node in tree.roots() {
        render_node(node, 0, &mut out);
    }
    out
}

fn render_node(node: &TreeNode, depth: usize, out: &mut String) {
    out.push_str(&INDENT.repeat(depth));
    out.push_str(&node.file_name);
    out.push('\n');
    for child in &node.children {
        render_node(child, depth + 1, out);
    }
}

pub fn render_save(page: &StaticPage, outcome: SaveOutcome) -> String {
    match outcome {
        SaveOutcome::Saved => format!(
            "{} {}\n",
            success_style().apply_to("Saved page"),
            file_name_of(page)
        ),
        SaveOutcome::Rejected => format!("{}\n", warning_style().apply_to("Save rejected.")),
    }
}

pub fn render_delete(report: &DeleteReport) -> String {
    let pages = report.deleted_pages.len();
    format!(
        "{} {} {}, {} {}: {}\n",
        success_style().apply_to("Deleted"),
        pages,
        if pages == 1 { "page" } else { "pages" },
        report.deleted_rows,
        if report.deleted_rows == 1 { "row" } else { "rows" },
        report.deleted_pages.join(", ")
    )
}

pub fn render_doctor(report: &DoctorReport) -> String {
    if report.is_clean() {
        return format!("{}\n", success_style().apply_to("No inconsistencies found."));
    }

    let mut out = format!(
        "{}\n",
        warning_style().apply_to("Inconsistencies found and fixed:")
    );
    for name in &report.pruned_nodes {
        out.push_str(&format!("{}- Removed tree entry without page: {}\n", INDENT, name));
    }
    for name in &report.adopted_pages {
        out.push_str(&format!("{}- Added page missing from tree: {}\n", INDENT, name));
    }
    out
}

pub fn render_validation(errors: &ValidationErrors) -> String {
    errors
        .iter()
        .map(|(field, err)| format!("{}: {}", field, err))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Error text for stderr; validation failures list their fields.
pub fn render_error(err: &anyhow::Error) -> String {
    match err.downcast_ref::<PagesError>().and_then(PagesError::validation) {
        Some(errors) => error_style().apply_to(render_validation(errors)).to_string(),
        None => format!("{} {:#}", error_style().apply_to("Error:"), err),
    }
}
