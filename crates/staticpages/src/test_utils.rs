use crate::model::{Placeholders, RecordDraft, ViewBag};
use chrono::Utc;

/// A bare row draft carrying only a URL.
pub fn draft(theme: &str, file_name: &str, lang: &str, url: &str) -> RecordDraft {
    let mut settings = ViewBag::new();
    settings.set_url(url);
    RecordDraft {
        theme: theme.to_string(),
        file_name: file_name.to_string(),
        lang: lang.to_string(),
        fields: settings.fields(),
        settings,
        code: String::new(),
        placeholders: Placeholders::new(),
        markup: String::new(),
        mtime: Utc::now(),
    }
}
