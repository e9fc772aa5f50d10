#![allow(deprecated)]

use assert_cmd::cargo::cargo_bin;
use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

struct Workspace {
    temp: TempDir,
}

impl Workspace {
    fn new() -> Self {
        Self {
            temp: TempDir::new().unwrap(),
        }
    }

    /// A workspace whose config enables English and French.
    fn translated() -> Self {
        let ws = Self::new();
        fs::write(
            ws.temp.path().join("staticpages.toml"),
            "locales = [\"en\", \"fr\"]\ndefault_locale = \"en\"\n",
        )
        .unwrap();
        ws
    }

    fn data_dir(&self) -> PathBuf {
        self.temp.path().join("data")
    }

    fn cmd(&self) -> Command {
        let mut cmd = Command::new(cargo_bin("staticpages"));
        cmd.current_dir(self.temp.path())
            .env_remove("STATICPAGES_DATA_DIR")
            .env_remove("STATICPAGES_APP_LOCALE")
            .env_remove("STATICPAGES_FALLBACK_LOCALE")
            .env_remove("STATICPAGES_DEFAULT_LOCALE")
            .env_remove("RUST_LOG")
            .arg("--data-dir")
            .arg(self.data_dir());
        cmd
    }

    fn document(&self, name: &str, json: &str) -> PathBuf {
        let path = self.temp.path().join(name);
        fs::write(&path, json).unwrap();
        path
    }

    fn save(&self, json: &str) -> String {
        let input = self.document("input.json", json);
        let output = self
            .cmd()
            .args(["save", "demo"])
            .arg(&input)
            .assert()
            .success()
            .get_output()
            .stdout
            .clone();
        String::from_utf8(output).unwrap()
    }

    fn tree_json(&self) -> serde_json::Value {
        read_json(&self.data_dir().join("trees").join("demo.json"))
    }
}

fn read_json(path: &Path) -> serde_json::Value {
    serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
}

#[test]
fn save_list_show_workflow() {
    let ws = Workspace::new();

    let out = ws.save(
        r#"{"view_bag": {"url": "/about", "title": "About us"},
            "placeholders": {"main": "Hello"}}"#,
    );
    assert!(out.contains("Saved page about"));

    ws.cmd()
        .args(["list", "demo"])
        .assert()
        .success()
        .stdout(predicate::str::contains("about"))
        .stdout(predicate::str::contains("/about"))
        .stdout(predicate::str::contains("About us"));

    ws.cmd()
        .args(["show", "demo", "about"])
        .assert()
        .success()
        .stdout(predicate::str::contains("{% put main %}\nHello\n{% endput %}"));

    ws.cmd()
        .args(["show", "demo", "about", "--frontend"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--- content"))
        .stdout(predicate::str::contains("title = About us\n"));

    assert!(ws.data_dir().join("pages.json").exists());
    assert_eq!(ws.tree_json(), serde_json::json!({"about": {}}));
}

#[test]
fn list_json_is_parseable() {
    let ws = Workspace::new();
    ws.save(r#"{"view_bag": {"url": "/contact", "title": "Contact"}}"#);

    let output = ws
        .cmd()
        .args(["list", "demo", "--json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let pages: serde_json::Value = serde_json::from_slice(&output).unwrap();

    assert_eq!(pages[0]["file_name"], "contact");
    assert_eq!(pages[0]["view_bag"]["title"], "Contact");
    assert_eq!(pages[0]["code"], "");
}

#[test]
fn colliding_urls_get_numbered_file_names() {
    let ws = Workspace::new();

    assert!(ws
        .save(r#"{"view_bag": {"url": "/about"}}"#)
        .contains("Saved page about"));
    assert!(ws
        .save(r#"{"view_bag": {"url": "about/"}}"#)
        .contains("Saved page about-2"));
}

#[test]
fn duplicate_url_is_reported_per_field() {
    let ws = Workspace::new();
    ws.save(r#"{"view_bag": {"url": "/about"}}"#);

    let input = ws.document("dup.json", r#"{"view_bag": {"url": "/about"}}"#);
    ws.cmd()
        .args(["save", "demo"])
        .arg(&input)
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("url: url_not_unique"))
        .stderr(predicate::str::contains("url=/about"));
}

#[test]
fn missing_url_is_rejected() {
    let ws = Workspace::new();
    let input = ws.document("empty.json", r#"{"view_bag": {"title": "No url"}}"#);

    ws.cmd()
        .args(["save", "demo"])
        .arg(&input)
        .assert()
        .failure()
        .stderr(predicate::str::contains("url: url_required"));

    assert!(!ws.data_dir().join("pages.json").exists());
}

#[test]
fn update_keeps_file_name_and_tree_position() {
    let ws = Workspace::new();
    ws.save(r#"{"view_bag": {"url": "/docs"}}"#);
    ws.save(r#"{"parent": "docs", "view_bag": {"url": "/docs/intro", "title": "Intro"}}"#);

    let input = ws.document("update.json", r#"{"view_bag": {"url": "/docs/start", "title": "Start"}}"#);
    ws.cmd()
        .args(["save", "demo"])
        .arg(&input)
        .args(["--file-name", "docs-intro"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Saved page docs-intro"));

    ws.cmd()
        .args(["show", "demo", "docs-intro"])
        .assert()
        .success()
        .stdout(predicate::str::contains("/docs/start"));

    assert_eq!(ws.tree_json(), serde_json::json!({"docs": {"docs-intro": {}}}));
}

#[test]
fn tree_command_prints_hierarchy() {
    let ws = Workspace::new();
    ws.cmd()
        .args(["tree", "demo"])
        .assert()
        .success()
        .stdout(predicate::str::contains("(empty tree)"));

    ws.save(r#"{"view_bag": {"url": "/docs"}}"#);
    ws.save(r#"{"parent": "docs", "view_bag": {"url": "/docs/intro"}}"#);

    ws.cmd()
        .args(["tree", "demo"])
        .assert()
        .success()
        .stdout(predicate::eq("docs\n  docs-intro\n"));
}

#[test]
fn delete_cascades_to_children() {
    let ws = Workspace::new();
    ws.save(r#"{"view_bag": {"url": "/docs"}}"#);
    ws.save(r#"{"parent": "docs", "view_bag": {"url": "/docs/intro"}}"#);
    ws.save(r#"{"view_bag": {"url": "/contact"}}"#);

    ws.cmd()
        .args(["rm", "demo", "docs"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Deleted 2 pages, 2 rows"));

    assert_eq!(ws.tree_json(), serde_json::json!({"contact": {}}));

    ws.cmd()
        .args(["show", "demo", "docs-intro"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Page not found: docs-intro"));
}

#[test]
fn doctor_reports_clean_store() {
    let ws = Workspace::new();
    ws.save(r#"{"view_bag": {"url": "/about"}}"#);

    ws.cmd()
        .args(["doctor", "demo"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No inconsistencies found."));
}

#[test]
fn doctor_repairs_hand_edited_tree() {
    let ws = Workspace::new();
    ws.save(r#"{"view_bag": {"url": "/about"}}"#);
    fs::write(
        ws.data_dir().join("trees").join("demo.json"),
        r#"{"ghost": {}}"#,
    )
    .unwrap();

    ws.cmd()
        .args(["doctor", "demo"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Removed tree entry without page: ghost"))
        .stdout(predicate::str::contains("Added page missing from tree: about"));

    assert_eq!(ws.tree_json(), serde_json::json!({"about": {}}));
}

#[test]
fn translations_are_saved_and_shown_per_locale() {
    let ws = Workspace::translated();
    ws.save(
        r#"{"view_bag": {"url": "/about", "title": "About"},
            "translations": {"fr": {"view_bag": {"url": "/a-propos", "title": "A propos"},
                                    "placeholders": {"main": "Bonjour"}}}}"#,
    );

    ws.cmd()
        .args(["show", "demo", "about", "--locale", "fr", "--frontend", "--json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"url\": \"/a-propos\""))
        .stdout(predicate::str::contains("Bonjour"));

    ws.cmd()
        .args(["list", "demo", "--locale", "fr"])
        .assert()
        .success()
        .stdout(predicate::str::contains("/a-propos"));
}

#[test]
fn frontend_show_needs_the_active_translation() {
    let ws = Workspace::translated();
    ws.save(r#"{"view_bag": {"url": "/about"}}"#);

    ws.cmd()
        .args(["show", "demo", "about", "--locale", "fr", "--frontend"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Page not found: about"));

    ws.cmd()
        .args(["show", "demo", "about", "--locale", "fr"])
        .assert()
        .success()
        .stdout(predicate::str::contains("/about"));
}

#[test]
fn missing_config_file_is_an_error() {
    let ws = Workspace::new();
    ws.cmd()
        .args(["--config", "nope.toml", "list", "demo"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Config file not found"));
}
