// * Link-List Extraction
// * Document sections of a company page (annual reports, credit ratings, concalls)
// * turned into typed link records with metadata derived from the surrounding text.

use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::LazyLock;
use tracing::debug;

use super::dom::{first_line, visible_text};
use super::Extracted;
use crate::config::constants::UNKNOWN_DATE_BUCKET;
use crate::engine::normalization::resolve_href;

// * Precompiled CSS selectors for performance
static SELECTOR_ANNUAL_REPORTS: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(".documents.annual-reports").expect("Invalid annual reports selector")
});
static SELECTOR_CREDIT_RATINGS: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(".documents.credit-ratings").expect("Invalid credit ratings selector")
});
static SELECTOR_CONCALLS: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(".documents.concalls").expect("Invalid concalls selector"));
static SELECTOR_LI: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("li").expect("Invalid li selector"));
static SELECTOR_ANCHOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a").expect("Invalid anchor selector"));
static SELECTOR_MUTED: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(".smaller").expect("Invalid muted selector"));

// * "<word> <4-digit year>", first match names the concall bucket
static PATTERN_MONTH_YEAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\w+)\s+(\d{4})").expect("Invalid month/year regex"));

static PATTERN_YEAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(\d{4})\b").expect("Invalid year regex"));

/// The document sections a company page exposes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DocumentKind {
    AnnualReports,
    CreditRatings,
    Concalls,
}

impl DocumentKind {
    pub const ALL: [DocumentKind; 3] = [
        DocumentKind::AnnualReports,
        DocumentKind::CreditRatings,
        DocumentKind::Concalls,
    ];

    /// Default container of the section on a company page
    pub fn section_selector(&self) -> &'static Selector {
        match self {
            DocumentKind::AnnualReports => &SELECTOR_ANNUAL_REPORTS,
            DocumentKind::CreditRatings => &SELECTOR_CREDIT_RATINGS,
            DocumentKind::Concalls => &SELECTOR_CONCALLS,
        }
    }

    /// Directory name used under a company's download folder
    pub fn dir_name(&self) -> &'static str {
        match self {
            DocumentKind::AnnualReports => "annual_reports",
            DocumentKind::CreditRatings => "credit_ratings",
            DocumentKind::Concalls => "concalls",
        }
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            DocumentKind::AnnualReports => "annual reports",
            DocumentKind::CreditRatings => "credit ratings",
            DocumentKind::Concalls => "conference calls",
        };
        f.write_str(label)
    }
}

/// Sub-documents attached to one concall
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConcallSlot {
    Transcript,
    Notes,
    Presentation,
    Recording,
}

impl ConcallSlot {
    pub const ALL: [ConcallSlot; 4] = [
        ConcallSlot::Transcript,
        ConcallSlot::Notes,
        ConcallSlot::Presentation,
        ConcallSlot::Recording,
    ];

    /// File stem used for the slot inside a period folder
    pub fn as_str(&self) -> &'static str {
        match self {
            ConcallSlot::Transcript => "transcript",
            ConcallSlot::Notes => "notes",
            ConcallSlot::Presentation => "presentation",
            ConcallSlot::Recording => "recording",
        }
    }
}

// * Evaluated top to bottom, first substring hit classifies the anchor.
// ! Order matters: "Transcript" must win over anything containing "rec".
pub const SLOT_RULES: &[(&str, ConcallSlot)] = &[
    ("transcript", ConcallSlot::Transcript),
    ("notes", ConcallSlot::Notes),
    ("ppt", ConcallSlot::Presentation),
    ("rec", ConcallSlot::Recording),
];

/// Classifies a concall anchor label against `SLOT_RULES` (case-insensitive)
pub fn classify_anchor(label: &str) -> Option<ConcallSlot> {
    let lower = label.to_lowercase();
    SLOT_RULES
        .iter()
        .find(|(needle, _)| lower.contains(needle))
        .map(|(_, slot)| *slot)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnualReport {
    pub period_label: String,
    pub fiscal_year: Option<u16>,
    pub remote_url: String,
    pub source_label: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreditRating {
    pub title: String,
    pub remote_url: String,
    pub date_source_label: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConcallEntry {
    pub period_bucket: String,
    pub transcript: Option<String>,
    pub notes: Option<String>,
    pub presentation: Option<String>,
    pub recording: Option<String>,
}

impl ConcallEntry {
    pub fn new(period_bucket: impl Into<String>) -> Self {
        Self {
            period_bucket: period_bucket.into(),
            ..Default::default()
        }
    }

    pub fn slot(&self, slot: ConcallSlot) -> Option<&str> {
        match slot {
            ConcallSlot::Transcript => self.transcript.as_deref(),
            ConcallSlot::Notes => self.notes.as_deref(),
            ConcallSlot::Presentation => self.presentation.as_deref(),
            ConcallSlot::Recording => self.recording.as_deref(),
        }
    }

    pub fn set_slot(&mut self, slot: ConcallSlot, url: String) {
        let target = match slot {
            ConcallSlot::Transcript => &mut self.transcript,
            ConcallSlot::Notes => &mut self.notes,
            ConcallSlot::Presentation => &mut self.presentation,
            ConcallSlot::Recording => &mut self.recording,
        };
        *target = Some(url);
    }

    /// Populated slots in `ConcallSlot::ALL` order
    pub fn populated_slots(&self) -> Vec<(ConcallSlot, &str)> {
        ConcallSlot::ALL
            .iter()
            .filter_map(|slot| self.slot(*slot).map(|url| (*slot, url)))
            .collect()
    }

    // * A recording on its own is not worth keeping
    pub fn has_documents(&self) -> bool {
        self.transcript.is_some() || self.notes.is_some() || self.presentation.is_some()
    }
}

/// A link record extracted from one document section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DocumentLink {
    AnnualReport(AnnualReport),
    CreditRating(CreditRating),
    Concall(ConcallEntry),
}

impl DocumentLink {
    pub fn kind(&self) -> DocumentKind {
        match self {
            DocumentLink::AnnualReport(_) => DocumentKind::AnnualReports,
            DocumentLink::CreditRating(_) => DocumentKind::CreditRatings,
            DocumentLink::Concall(_) => DocumentKind::Concalls,
        }
    }

    /// Short human-readable label for console listings
    pub fn describe(&self) -> String {
        match self {
            DocumentLink::AnnualReport(r) => match &r.source_label {
                Some(source) => format!("{} ({})", r.period_label, source),
                None => r.period_label.clone(),
            },
            DocumentLink::CreditRating(r) => match &r.date_source_label {
                Some(date) => format!("{} ({})", r.title, date),
                None => r.title.clone(),
            },
            DocumentLink::Concall(c) => {
                let slots: Vec<&str> = c.populated_slots().iter().map(|(s, _)| s.as_str()).collect();
                format!("{} [{}]", c.period_bucket, slots.join(", "))
            }
        }
    }
}

/// "Month_Year" bucket from free text, `Unknown_Date` when no fragment matches
pub fn period_bucket(text: &str) -> String {
    PATTERN_MONTH_YEAR
        .captures(text)
        .map(|caps| format!("{}_{}", &caps[1], &caps[2]))
        .unwrap_or_else(|| UNKNOWN_DATE_BUCKET.to_string())
}

fn fiscal_year(label: &str) -> Option<u16> {
    PATTERN_YEAR
        .captures(label)
        .and_then(|caps| caps[1].parse().ok())
}

fn muted_annotation(anchor: &ElementRef) -> Option<String> {
    anchor
        .select(&SELECTOR_MUTED)
        .next()
        .map(|el| visible_text(&el))
        .filter(|text| !text.is_empty())
}

fn anchor_url(anchor: &ElementRef, base_url: &str) -> Option<String> {
    let href = anchor.value().attr("href")?;
    let resolved = resolve_href(href, base_url);
    if resolved.is_none() {
        debug!(href, "Skipping anchor with unusable href");
    }
    resolved
}

fn extract_single(item: &ElementRef, kind: DocumentKind, base_url: &str) -> Option<DocumentLink> {
    let anchor = item.select(&SELECTOR_ANCHOR).next()?;
    let remote_url = anchor_url(&anchor, base_url)?;
    let label = first_line(&anchor);
    if label.is_empty() {
        return None;
    }
    let annotation = muted_annotation(&anchor).or_else(|| muted_annotation(item));

    match kind {
        DocumentKind::AnnualReports => Some(DocumentLink::AnnualReport(AnnualReport {
            fiscal_year: fiscal_year(&label),
            period_label: label,
            remote_url,
            source_label: annotation,
        })),
        DocumentKind::CreditRatings => Some(DocumentLink::CreditRating(CreditRating {
            title: label,
            remote_url,
            date_source_label: annotation,
        })),
        DocumentKind::Concalls => None,
    }
}

fn extract_concall(item: &ElementRef, base_url: &str) -> Option<DocumentLink> {
    let full_text = item.text().collect::<Vec<_>>().join(" ");
    let mut entry = ConcallEntry::new(period_bucket(&full_text));

    for anchor in item.select(&SELECTOR_ANCHOR) {
        let label = visible_text(&anchor);
        let Some(slot) = classify_anchor(&label) else {
            continue;
        };
        if let Some(url) = anchor_url(&anchor, base_url) {
            entry.set_slot(slot, url);
        }
    }

    if entry.has_documents() {
        Some(DocumentLink::Concall(entry))
    } else {
        debug!(bucket = %entry.period_bucket, "Dropping concall entry without documents");
        None
    }
}

/// Extracts the link records of one section, in document order.
///
/// `base_url` resolves relative hrefs. A missing section yields `Extracted::Absent`.
pub fn extract_links(
    document: &Html,
    section: &Selector,
    kind: DocumentKind,
    base_url: &str,
) -> Extracted<Vec<DocumentLink>> {
    let Some(container) = document.select(section).next() else {
        return Extracted::Absent;
    };

    let links = container
        .select(&SELECTOR_LI)
        .filter_map(|item| match kind {
            DocumentKind::Concalls => extract_concall(&item, base_url),
            _ => extract_single(&item, kind, base_url),
        })
        .collect();

    Extracted::Found(links)
}

/// Extracts a section using its default container selector
pub fn extract_section(document: &Html, kind: DocumentKind, base_url: &str) -> Extracted<Vec<DocumentLink>> {
    extract_links(document, kind.section_selector(), kind, base_url)
}
