//! # Domain Model: Page Records, View-Bags and Placeholders
//!
//! A *logical page* is the set of [`PageRecord`] rows sharing one `file_name`
//! within a theme, one row per locale. Each row carries two views of the same
//! display data:
//!
//! - **Settings** ([`ViewBag`]): an ordered key/value map holding everything the
//!   page author set, including custom keys.
//! - **Structured columns** ([`PageFields`]): a fixed projection of the settings
//!   map (`url`, `layout`, `title`, visibility flags, meta fields) kept for
//!   lookups such as URL uniqueness.
//!
//! The projection runs in one direction only: columns are always rebuilt from
//! the view-bag on write ([`ViewBag::fields`]), so the two never drift apart as
//! long as the page aggregate is the only writer.
//!
//! ## Placeholders
//!
//! [`Placeholders`] is an ordered slot-name → content map. Its order is the
//! authored order and is preserved through serialization, since the derived
//! `code` document emits blocks in that order.
//!
//! ## Lenient Flags
//!
//! Settings maps arrive from forms and older rows, so boolean flags are read
//! leniently: JSON booleans, non-zero numbers and the strings `1`, `true`,
//! `on`, `yes` all count as set.

use chrono::{DateTime, Utc};
use serde::de::Error as _;
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

pub type RecordId = u64;

/// View-bag keys projected into structured columns.
pub const PROJECTED_KEYS: [&str; 7] = [
    "url",
    "layout",
    "title",
    "is_hidden",
    "navigation_hidden",
    "meta_title",
    "meta_description",
];

/// The structured columns of a page row.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageFields {
    pub url: String,
    pub layout: String,
    pub title: String,
    pub is_hidden: bool,
    pub navigation_hidden: bool,
    pub meta_title: String,
    pub meta_description: String,
}

impl PageFields {
    /// `key = value` pairs in column order, as written into composed documents.
    pub fn lines(&self) -> Vec<(&'static str, String)> {
        vec![
            ("url", self.url.clone()),
            ("layout", self.layout.clone()),
            ("title", self.title.clone()),
            ("is_hidden", flag_str(self.is_hidden).to_string()),
            ("navigation_hidden", flag_str(self.navigation_hidden).to_string()),
            ("meta_title", self.meta_title.clone()),
            ("meta_description", self.meta_description.clone()),
        ]
    }
}

fn flag_str(value: bool) -> &'static str {
    if value {
        "1"
    } else {
        "0"
    }
}

/// Ordered settings map with typed accessors for the projected keys.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ViewBag(Map<String, Value>);

impl ViewBag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds a view-bag from structured columns, for rows whose settings
    /// blob is empty.
    pub fn from_fields(fields: &PageFields) -> Self {
        let mut bag = Self::new();
        bag.set("url", fields.url.clone());
        bag.set("layout", fields.layout.clone());
        bag.set("title", fields.title.clone());
        bag.set("is_hidden", fields.is_hidden);
        bag.set("navigation_hidden", fields.navigation_hidden);
        bag.set("meta_title", fields.meta_title.clone());
        bag.set("meta_description", fields.meta_description.clone());
        bag
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Sets a key, keeping its position when it already exists.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(key.into(), value.into());
    }

    /// String view of a key; absent and null values read as empty.
    pub fn get_str(&self, key: &str) -> String {
        self.0.get(key).map(value_to_string).unwrap_or_default()
    }

    pub fn get_flag(&self, key: &str) -> bool {
        self.0.get(key).map(value_to_flag).unwrap_or(false)
    }

    pub fn url(&self) -> String {
        self.get_str("url")
    }

    pub fn set_url(&mut self, url: impl Into<String>) {
        self.set("url", url.into());
    }

    pub fn title(&self) -> String {
        self.get_str("title")
    }

    pub fn layout(&self) -> String {
        self.get_str("layout")
    }

    pub fn is_hidden(&self) -> bool {
        self.get_flag("is_hidden")
    }

    pub fn navigation_hidden(&self) -> bool {
        self.get_flag("navigation_hidden")
    }

    /// Projects the allow-listed keys into structured columns.
    pub fn fields(&self) -> PageFields {
        PageFields {
            url: self.url(),
            layout: self.layout(),
            title: self.title(),
            is_hidden: self.is_hidden(),
            navigation_hidden: self.navigation_hidden(),
            meta_title: self.get_str("meta_title"),
            meta_description: self.get_str("meta_description"),
        }
    }

    /// Overlays `other` onto this bag; keys from `other` win.
    pub fn merge(&mut self, other: &ViewBag) {
        for (key, value) in &other.0 {
            self.0.insert(key.clone(), value.clone());
        }
    }
}

impl From<Map<String, Value>> for ViewBag {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

fn value_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.trim_end_matches(['\r', '\n']).to_string(),
        other => value_to_raw_string(other),
    }
}

/// Like [`value_to_string`] but keeps strings verbatim.
fn value_to_raw_string(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => flag_str(*b).to_string(),
        Value::Number(n) => n.to_string(),
        other => other.to_string(),
    }
}

fn value_to_flag(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(false),
        Value::String(s) => matches!(
            s.trim().to_ascii_lowercase().as_str(),
            "1" | "true" | "on" | "yes"
        ),
        _ => false,
    }
}

/// Ordered slot-name → raw content map.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Placeholders(Vec<(String, String)>);

impl Placeholders {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces a slot; a replaced slot keeps its position.
    pub fn insert(&mut self, name: impl Into<String>, content: impl Into<String>) {
        let name = name.into();
        let content = content.into();
        match self.0.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = content,
            None => self.0.push((name, content)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, c)| c.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(n, c)| (n.as_str(), c.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Placeholders {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut placeholders = Placeholders::new();
        for (name, content) in iter {
            placeholders.insert(name, content);
        }
        placeholders
    }
}

impl Serialize for Placeholders {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, content) in &self.0 {
            map.serialize_entry(name, content)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Placeholders {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match Value::deserialize(deserializer)? {
            Value::Null => Ok(Placeholders::new()),
            Value::Array(items) if items.is_empty() => Ok(Placeholders::new()),
            Value::Object(map) => Ok(map
                .into_iter()
                .map(|(name, content)| (name, value_to_raw_string(&content)))
                .collect()),
            other => Err(D::Error::custom(format!(
                "placeholders must be an object, got {}",
                other
            ))),
        }
    }
}

/// One persisted row: a logical page in one locale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageRecord {
    pub id: RecordId,
    pub theme: String,
    pub file_name: String,
    pub lang: String,
    #[serde(flatten)]
    pub fields: PageFields,
    #[serde(default)]
    pub settings: ViewBag,
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub placeholders: Placeholders,
    #[serde(default)]
    pub markup: String,
    pub mtime: DateTime<Utc>,
}

impl PageRecord {
    pub fn from_draft(id: RecordId, draft: RecordDraft) -> Self {
        Self {
            id,
            theme: draft.theme,
            file_name: draft.file_name,
            lang: draft.lang,
            fields: draft.fields,
            settings: draft.settings,
            code: draft.code,
            placeholders: draft.placeholders,
            markup: draft.markup,
            mtime: draft.mtime,
        }
    }

    /// The view-bag this row was written with, rebuilt from the columns when
    /// the settings blob is missing.
    pub fn view_bag(&self) -> ViewBag {
        if self.settings.is_empty() {
            ViewBag::from_fields(&self.fields)
        } else {
            self.settings.clone()
        }
    }
}

/// Everything an insert or update writes; the store assigns the id.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordDraft {
    pub theme: String,
    pub file_name: String,
    pub lang: String,
    pub fields: PageFields,
    pub settings: ViewBag,
    pub code: String,
    pub placeholders: Placeholders,
    pub markup: String,
    pub mtime: DateTime<Utc>,
}
