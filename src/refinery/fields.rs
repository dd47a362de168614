// * Field Extraction
// * Label/value pairs from a single container, e.g. the "top ratios" list of a company page.

use scraper::{ElementRef, Html, Selector};
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use tracing::debug;

use super::dom::visible_text;
use super::Extracted;

// * Precompiled CSS selectors for the top-ratios list
static SELECTOR_TOP_RATIOS: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("ul#top-ratios").expect("Invalid top-ratios selector"));
static SELECTOR_RATIO_ITEM: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("li.flex.flex-space-between").expect("Invalid ratio item selector"));
static SELECTOR_RATIO_NAME: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("span.name").expect("Invalid ratio name selector"));
static SELECTOR_RATIO_VALUE: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("span.nowrap.value").expect("Invalid ratio value selector"));

/// Ratio label → raw display string, in document order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RatioRecord {
    entries: Vec<(String, String)>,
}

impl RatioRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a value; a label seen before keeps its position and takes the new value
    pub fn insert(&mut self, label: impl Into<String>, value: impl Into<String>) {
        let label = label.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(existing, _)| *existing == label) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((label, value)),
        }
    }

    pub fn get(&self, label: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(existing, _)| existing == label)
            .map(|(_, value)| value.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(l, v)| (l.as_str(), v.as_str()))
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(l, _)| l.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Converts the record to a JSON string
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string())
    }
}

/// Structural anchors for one label/value list
#[derive(Clone, Copy)]
pub struct FieldLayout<'a> {
    pub container: &'a Selector,
    pub entry: &'a Selector,
    pub label: &'a Selector,
    pub value: &'a Selector,
}

impl FieldLayout<'static> {
    /// `ul#top-ratios > li > span.name + span.nowrap.value`
    pub fn top_ratios() -> Self {
        Self {
            container: &SELECTOR_TOP_RATIOS,
            entry: &SELECTOR_RATIO_ITEM,
            label: &SELECTOR_RATIO_NAME,
            value: &SELECTOR_RATIO_VALUE,
        }
    }
}

fn first_text(entry: &ElementRef, selector: &Selector) -> Option<String> {
    entry
        .select(selector)
        .next()
        .map(|el| visible_text(&el))
        .filter(|text| !text.is_empty())
}

/// Extracts label/value pairs from the first element matching `layout.container`.
///
/// Entries lacking a label or a value are skipped. A missing container yields
/// `Extracted::Absent`, a container without usable entries an empty record.
pub fn extract_fields(document: &Html, layout: &FieldLayout) -> Extracted<RatioRecord> {
    let Some(container) = document.select(layout.container).next() else {
        return Extracted::Absent;
    };

    let mut record = RatioRecord::new();
    for entry in container.select(layout.entry) {
        let (Some(label), Some(value)) = (
            first_text(&entry, layout.label),
            first_text(&entry, layout.value),
        ) else {
            debug!("Skipping ratio entry without label/value pair");
            continue;
        };
        record.insert(label, value);
    }

    Extracted::Found(record)
}

/// Extracts the top-ratios list of a company page
pub fn extract_top_ratios(document: &Html) -> Extracted<RatioRecord> {
    extract_fields(document, &FieldLayout::top_ratios())
}
