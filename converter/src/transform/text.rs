//! Free-text cleanup and Shopify rich-text payloads.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde::Serialize;

use crate::models::CellValue;

static TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]+>").expect("valid tag regex"));
static LINE_BREAK_TAG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^<br(\s[^>]*)?/?>$").expect("valid line-break regex"));
static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid whitespace regex"));

/// Strip markup and non-ASCII noise from vendor text.
///
/// `<br>` tags (with or without attributes) survive, every other tag is dropped. Characters outside
/// ASCII are removed (whitespace of any kind is kept and then collapsed).
pub fn clean_html(text: &str) -> String {
    let without_tags = TAG.replace_all(text, |caps: &Captures| {
        let tag = &caps[0];
        if LINE_BREAK_TAG.is_match(tag) {
            tag.to_string()
        } else {
            String::new()
        }
    });

    let ascii: String = without_tags
        .chars()
        .filter(|c| c.is_ascii() || c.is_whitespace())
        .collect();

    WHITESPACE.replace_all(&ascii, " ").trim().to_string()
}

/// [`clean_html`] over a cell; blank cells give an empty string.
pub fn clean_cell(value: &CellValue) -> String {
    match value.text() {
        Some(s) => clean_html(&s),
        None => String::new(),
    }
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum RichTextNode {
    Root { children: Vec<RichTextNode> },
    Paragraph { children: Vec<RichTextNode> },
    Text { value: String },
}

/// Wrap cleaned text in a Shopify rich-text document:
/// `{"type":"root","children":[{"type":"paragraph","children":[{"type":"text","value":…}]}]}`.
pub fn to_rich_text(value: &CellValue) -> String {
    let doc = RichTextNode::Root {
        children: vec![RichTextNode::Paragraph {
            children: vec![RichTextNode::Text { value: clean_cell(value) }],
        }],
    };
    // Only string fields, serialization cannot fail.
    serde_json::to_string(&doc).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    #[test]
    fn test_strips_tags_keeps_line_breaks() {
        let html = "<p>Bright <b>lamp</b><br>for desks<br/>and<BR />shelves</p>";
        assert_eq!(
            clean_html(html),
            "Bright lamp<br>for desks<br/>and<BR />shelves"
        );
        assert_eq!(clean_html(r#"one<br class="x">two"#), r#"one<br class="x">two"#);
        assert_eq!(clean_html(r#"a<BR style="">b<bra>c"#), r#"a<BR style="">bc"#);
    }

    #[test]
    fn test_drops_non_ascii() {
        assert_eq!(clean_html("Café – crème ™"), "Caf crme");
        assert_eq!(clean_html("Price: £20 (approx.)"), "Price: 20 (approx.)");
    }

    #[test]
    fn test_collapses_whitespace() {
        assert_eq!(clean_html("  one\n\n two\t three  "), "one two three");
        assert_eq!(clean_html("non\u{a0}breaking"), "non breaking");
    }

    #[test]
    fn test_blank_cells_clean_to_empty() {
        assert_eq!(clean_cell(&CellValue::Empty), "");
        assert_eq!(clean_cell(&CellValue::from("   ")), "");
        assert_eq!(clean_cell(&CellValue::from(42.0)), "42");
    }

    #[test]
    fn test_rich_text_structure() {
        let payload = to_rich_text(&CellValue::from("<i>Soft</i> glow"));
        let parsed: Value = serde_json::from_str(&payload).unwrap();
        assert_eq!(
            parsed,
            json!({
                "type": "root",
                "children": [
                    { "type": "paragraph", "children": [{ "type": "text", "value": "Soft glow" }] }
                ]
            })
        );
        assert!(payload.starts_with(r#"{"type":"root""#));
    }

    #[test]
    fn test_rich_text_for_empty_input() {
        let payload = to_rich_text(&CellValue::Empty);
        let parsed: Value = serde_json::from_str(&payload).unwrap();
        assert_eq!(parsed["children"][0]["children"][0]["value"], "");
    }
}
