//! Derived page content.
//!
//! `code` is never authored directly: it is rendered from the placeholder map
//! every time it is needed, so a stale stored value can never leak out.
//! Front-end loads additionally get a *composed document*, the authorable
//! form of a page: a `[viewBag]` section, a `==` separator and the body.

use crate::model::{PageFields, Placeholders};

const SECTION_SEPARATOR: &str = "==\n";

/// Renders placeholders as a sequence of `{% put name %}` blocks.
///
/// Empty slots are skipped; blocks are separated by a blank line and the
/// result is trimmed. No placeholders yields an empty string.
pub fn derive_code(placeholders: Option<&Placeholders>) -> String {
    let Some(placeholders) = placeholders else {
        return String::new();
    };

    let mut result = String::new();
    for (name, content) in placeholders.iter() {
        if content.is_empty() {
            continue;
        }
        result.push_str(&format!("{{% put {} %}}\n", name));
        result.push_str(content);
        result.push('\n');
        result.push_str("{% endput %}\n");
        result.push('\n');
    }

    result.trim().to_string()
}

fn view_bag_section(fields: &PageFields) -> String {
    let mut section = String::from("[viewBag]\n");
    for (key, value) in fields.lines() {
        section.push_str(&format!("{} = {}\n", key, value));
    }
    section
}

/// Default-locale document: view-bag lines, separator, body code.
pub fn compose_document(fields: &PageFields, code: &str) -> String {
    let mut document = view_bag_section(fields);
    document.push_str(SECTION_SEPARATOR);
    document.push_str(code);
    document
}

/// Translated document: view-bag lines, a placeholders block, then the body.
pub fn compose_locale_document(
    fields: &PageFields,
    placeholders: &Placeholders,
    code: &str,
) -> String {
    let encoded = serde_json::to_string(placeholders).unwrap_or_else(|_| "{}".to_string());

    let mut document = view_bag_section(fields);
    document.push_str(SECTION_SEPARATOR);
    document.push_str(&format!("placeholders = {}\n", encoded));
    document.push_str(SECTION_SEPARATOR);
    document.push_str(code);
    document
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derives_single_block_and_skips_empty_slots() {
        let placeholders: Placeholders = [("a", "x"), ("b", "")].into_iter().collect();
        assert_eq!(
            derive_code(Some(&placeholders)),
            "{% put a %}\nx\n{% endput %}"
        );
    }

    #[test]
    fn derives_blocks_in_map_order_with_blank_line_between() {
        let placeholders: Placeholders = [("main", "Body"), ("sidebar", "Side")]
            .into_iter()
            .collect();
        assert_eq!(
            derive_code(Some(&placeholders)),
            "{% put main %}\nBody\n{% endput %}\n\n{% put sidebar %}\nSide\n{% endput %}"
        );
    }

    #[test]
    fn empty_or_missing_placeholders_derive_nothing() {
        assert_eq!(derive_code(Some(&Placeholders::new())), "");
        assert_eq!(derive_code(None), "");
    }

    #[test]
    fn composes_default_document() {
        let fields = PageFields {
            url: "/about".into(),
            title: "About".into(),
            layout: "default".into(),
            ..Default::default()
        };
        let doc = compose_document(&fields, "{% put main %}\nHi\n{% endput %}");

        assert!(doc.starts_with("[viewBag]\nurl = /about\nlayout = default\ntitle = About\n"));
        assert!(doc.contains("is_hidden = 0\n"));
        assert!(doc.ends_with("==\n{% put main %}\nHi\n{% endput %}"));
    }

    #[test]
    fn composes_locale_document_with_placeholder_block() {
        let fields = PageFields {
            url: "/fr/a-propos".into(),
            ..Default::default()
        };
        let placeholders: Placeholders = [("main", "Salut")].into_iter().collect();
        let code = derive_code(Some(&placeholders));
        let doc = compose_locale_document(&fields, &placeholders, &code);

        assert!(doc.contains("==\nplaceholders = {\"main\":\"Salut\"}\n==\n"));
        assert!(doc.ends_with("{% put main %}\nSalut\n{% endput %}"));
    }
}
