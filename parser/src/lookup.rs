//! `getTagValue`/`getTagsGroup`: look up elements by tag, string or group.

use std::collections::HashMap;

use crate::dataset::{Dataset, Element};

/// The three ways `spec.md` §4.9 allows a caller to identify a tag.
#[derive(Debug, Clone, Copy)]
pub enum TagQuery<'a> {
    /// `[group, element]` as integers.
    Numeric(u16, u16),
    /// `[group, element]` as hex strings, matched case-insensitively.
    Hex(&'a str, &'a str),
    /// Matched case-insensitively against name, keyword, or the canonical
    /// tag string (after stripping whitespace, `(` and `,`).
    Text(&'a str),
}

impl<'a> From<(u16, u16)> for TagQuery<'a> {
    fn from(pair: (u16, u16)) -> Self {
        TagQuery::Numeric(pair.0, pair.1)
    }
}

impl<'a> From<(&'a str, &'a str)> for TagQuery<'a> {
    fn from(pair: (&'a str, &'a str)) -> Self {
        TagQuery::Hex(pair.0, pair.1)
    }
}

impl<'a> From<&'a str> for TagQuery<'a> {
    fn from(s: &'a str) -> Self {
        TagQuery::Text(s)
    }
}

fn normalize_text(s: &str) -> String {
    s.chars()
        .filter(|c| !c.is_whitespace() && *c != '(' && *c != ',')
        .collect::<String>()
        .to_lowercase()
}

fn matches(element: &Element, query: &TagQuery) -> bool {
    match *query {
        TagQuery::Numeric(group, elem) => element.group == group && element.element == elem,
        TagQuery::Hex(group, elem) => {
            format!("{:04x}", element.group).eq_ignore_ascii_case(group)
                && format!("{:04x}", element.element).eq_ignore_ascii_case(elem)
        }
        TagQuery::Text(text) => {
            let needle = normalize_text(text);
            normalize_text(&element.name) == needle
                || normalize_text(&element.keyword) == needle
                || normalize_text(&element.tag().to_hex_string()) == needle
        }
    }
}

/// Finds the first element in `dataset` matching `query`, in insertion
/// order.
pub fn get_tag_value<'a, 'q>(dataset: &'a Dataset, query: impl Into<TagQuery<'q>>) -> Option<&'a Element> {
    let query = query.into();
    dataset.iter().map(|(_, element)| element).find(|element| matches(element, &query))
}

fn lower_camel(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) => c.to_lowercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

/// Returns the submap of elements in `dataset` whose group (as a 4-hex-digit
/// string) equals `hex_group`, re-keyed by the lower-camel-case form of
/// their keyword.
pub fn get_tags_group<'a>(dataset: &'a Dataset, hex_group: &str) -> HashMap<String, &'a Element> {
    dataset
        .iter()
        .map(|(_, element)| element)
        .filter(|element| format!("{:04x}", element.group).eq_ignore_ascii_case(hex_group))
        .map(|element| (lower_camel(&element.keyword), element))
        .collect()
}
