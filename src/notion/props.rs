//! Property extraction: one typed field out of a semi-structured page.
//!
//! The contract is default-safe: a missing field, a field of the wrong
//! type, or a malformed value all degrade to the declared kind's
//! zero-value. Extraction never fails and never panics.
use serde_json::Value;

use crate::notion::model::{Page, Property};

/// Declared kind of a database property. Closed set: adding a kind
/// forces every `extract` match arm to be revisited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyKind {
    Title,
    RichText,
    Email,
    Url,
    Select,
    MultiSelect,
    Number,
    Date,
    Files,
}

/// Extracted, default-safe value of a property.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
    Text(String),
    Number(f64),
    Tags(Vec<String>),
    FileUrl(Option<String>),
}

impl PropertyValue {
    /// String content; empty string for non-text values.
    pub fn into_text(self) -> String {
        match self {
            PropertyValue::Text(s) => s,
            _ => String::new(),
        }
    }

    /// Numeric content; 0 for non-numeric values.
    pub fn into_number(self) -> f64 {
        match self {
            PropertyValue::Number(n) => n,
            _ => 0.0,
        }
    }

    /// Tag list; empty for non-list values.
    pub fn into_tags(self) -> Vec<String> {
        match self {
            PropertyValue::Tags(tags) => tags,
            _ => Vec::new(),
        }
    }

    /// Resolved file URL, if any.
    pub fn into_file_url(self) -> Option<String> {
        match self {
            PropertyValue::FileUrl(url) => url,
            _ => None,
        }
    }
}

/// Extract the named property from a page as the declared kind.
pub fn extract(page: &Page, name: &str, kind: PropertyKind) -> PropertyValue {
    let prop = decode(page.properties.get(name));
    match kind {
        PropertyKind::Title => PropertyValue::Text(match prop {
            Some(Property::Title { title }) => first_plain_text(&title),
            _ => String::new(),
        }),
        PropertyKind::RichText => PropertyValue::Text(match prop {
            Some(Property::RichText { rich_text }) => first_plain_text(&rich_text),
            _ => String::new(),
        }),
        PropertyKind::Email => PropertyValue::Text(match prop {
            Some(Property::Email { email }) => email.unwrap_or_default(),
            _ => String::new(),
        }),
        PropertyKind::Url => PropertyValue::Text(match prop {
            Some(Property::Url { url }) => url.unwrap_or_default(),
            _ => String::new(),
        }),
        PropertyKind::Select => PropertyValue::Text(match prop {
            Some(Property::Select { select }) => select.map(|s| s.name).unwrap_or_default(),
            _ => String::new(),
        }),
        PropertyKind::MultiSelect => PropertyValue::Tags(match prop {
            Some(Property::MultiSelect { multi_select }) => {
                multi_select.into_iter().map(|s| s.name).collect()
            }
            _ => Vec::new(),
        }),
        PropertyKind::Number => PropertyValue::Number(match prop {
            Some(Property::Number { number }) => number.unwrap_or(0.0),
            _ => 0.0,
        }),
        PropertyKind::Date => PropertyValue::Text(match prop {
            Some(Property::Date { date }) => date.map(|d| d.start).unwrap_or_default(),
            _ => String::new(),
        }),
        PropertyKind::Files => PropertyValue::FileUrl(match prop {
            Some(Property::Files { files }) => files.first().map(|f| f.url().to_string()),
            _ => None,
        }),
    }
}

/// Convenience: extract as text (title/rich_text/email/url/select/date).
pub fn text(page: &Page, name: &str, kind: PropertyKind) -> String {
    extract(page, name, kind).into_text()
}

/// Convenience: extract a number property.
pub fn number(page: &Page, name: &str) -> f64 {
    extract(page, name, PropertyKind::Number).into_number()
}

/// Convenience: extract a multi-select property.
pub fn tags(page: &Page, name: &str) -> Vec<String> {
    extract(page, name, PropertyKind::MultiSelect).into_tags()
}

/// Convenience: extract the first file URL of a files property.
pub fn file_url(page: &Page, name: &str) -> Option<String> {
    extract(page, name, PropertyKind::Files).into_file_url()
}

fn decode(raw: Option<&Value>) -> Option<Property> {
    raw.and_then(|v| serde_json::from_value(v.clone()).ok())
}

fn first_plain_text(items: &[crate::notion::model::RichTextItem]) -> String {
    items.first().map(|i| i.plain_text.clone()).unwrap_or_default()
}
