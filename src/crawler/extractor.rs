//! HTML field extraction
//!
//! This module pulls the three report fields out of a fetched document:
//! - the text of the first `<h1>`
//! - the `content` of the first `<meta name="description">`
//! - the text of the first `<title>`

use crate::state::Field;
use scraper::{ElementRef, Html, Selector};

/// One extracted value tied to the URL it came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldEvent {
    pub field: Field,
    pub value: String,
    pub url: String,
}

/// Parses HTML content and emits at most one event per field
///
/// # Extraction Rules
///
/// | Field | Source |
/// |-------|--------|
/// | H1 | text of the first `<h1>` whose trimmed text is non-empty |
/// | MetaDescription | `content` of the first `<meta name="description">` with non-empty trimmed content |
/// | Title | text of the first `<title>` whose trimmed text is non-empty |
///
/// Values are whitespace-trimmed. An element whose trimmed value is empty
/// counts as absent, so a later element of the same kind can still supply
/// the field. The `name` attribute is compared case-insensitively.
///
/// # Example
///
/// ```
/// use semi_scrape::crawler::extract_fields;
/// use semi_scrape::state::Field;
///
/// let html = r#"<html><head><title>T</title></head><body><h1>H</h1></body></html>"#;
/// let events = extract_fields(html, "https://a.example/p1");
/// assert_eq!(events.len(), 2);
/// assert!(events.iter().any(|e| e.field == Field::Title && e.value == "T"));
/// ```
pub fn extract_fields(html: &str, url: &str) -> Vec<FieldEvent> {
    let document = Html::parse_document(html);

    let candidates = [
        (Field::H1, extract_h1(&document)),
        (Field::MetaDescription, extract_meta_description(&document)),
        (Field::Title, extract_title(&document)),
    ];

    candidates
        .into_iter()
        .filter_map(|(field, value)| {
            value.map(|value| FieldEvent {
                field,
                value,
                url: url.to_string(),
            })
        })
        .collect()
}

fn extract_h1(document: &Html) -> Option<String> {
    first_text(document, "h1")
}

fn extract_title(document: &Html) -> Option<String> {
    first_text(document, "title")
}

fn extract_meta_description(document: &Html) -> Option<String> {
    let selector = Selector::parse("meta[name][content]").ok()?;

    document
        .select(&selector)
        .filter(|element| {
            element
                .value()
                .attr("name")
                .is_some_and(|name| name.trim().eq_ignore_ascii_case("description"))
        })
        .filter_map(|element| element.value().attr("content"))
        .map(|content| content.trim().to_string())
        .find(|content| !content.is_empty())
}

/// Trimmed text of the first element matching `selector` that has any
fn first_text(document: &Html, selector: &str) -> Option<String> {
    let selector = Selector::parse(selector).ok()?;

    document
        .select(&selector)
        .map(element_text)
        .find(|text| !text.is_empty())
}

fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}
