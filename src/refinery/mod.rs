// * The Refinery (Extraction Pipeline)
// * Goal: Turn a fetched company page into typed records.
// * Ratios, shareholding grid and document links are extracted from one parsed document.

pub mod dom;
pub mod fields;
pub mod links;
pub mod listing;
pub mod numeric;
pub mod tables;

// * Re-exports for convenient access
pub use fields::{extract_fields, extract_top_ratios, FieldLayout, RatioRecord};
pub use links::{
    classify_anchor, extract_links, extract_section, period_bucket, AnnualReport, ConcallEntry,
    ConcallSlot, CreditRating, DocumentKind, DocumentLink, SLOT_RULES,
};
pub use listing::{extract_companies, extract_companies_from_file, CompanyRecord};
pub use numeric::{normalize, normalize_record, NormalizedValue};
pub use tables::{ShareholdingRow, ShareholdingTable, TableExtractor};

use scraper::Html;
use serde::{Deserialize, Serialize};

/// Outcome of looking for a structure in a document.
///
/// `Absent` means the anchor element was not on the page at all, which is
/// different from `Found` with an empty payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Extracted<T> {
    Found(T),
    Absent,
}

impl<T> Extracted<T> {
    pub fn is_found(&self) -> bool {
        matches!(self, Extracted::Found(_))
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, Extracted::Absent)
    }

    pub fn found(self) -> Option<T> {
        match self {
            Extracted::Found(value) => Some(value),
            Extracted::Absent => None,
        }
    }

    pub fn as_ref(&self) -> Extracted<&T> {
        match self {
            Extracted::Found(value) => Extracted::Found(value),
            Extracted::Absent => Extracted::Absent,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Extracted<U> {
        match self {
            Extracted::Found(value) => Extracted::Found(f(value)),
            Extracted::Absent => Extracted::Absent,
        }
    }
}

impl<T: Default> Extracted<T> {
    pub fn unwrap_or_default(self) -> T {
        self.found().unwrap_or_default()
    }
}

/// A parsed company page
pub struct CompanyPage {
    document: Html,
    base_url: String,
}

impl CompanyPage {
    /// Parses raw HTML; `base_url` resolves relative document links
    pub fn parse(html: &str, base_url: &str) -> Self {
        Self {
            document: Html::parse_document(html),
            base_url: base_url.to_string(),
        }
    }

    pub fn ratios(&self) -> Extracted<RatioRecord> {
        extract_top_ratios(&self.document)
    }

    pub fn shareholding(&self) -> Extracted<ShareholdingTable> {
        TableExtractor::extract_shareholding(&self.document)
    }

    pub fn documents(&self, kind: DocumentKind) -> Extracted<Vec<DocumentLink>> {
        extract_section(&self.document, kind, &self.base_url)
    }

    /// Runs every extractor over the page
    pub fn snapshot(&self) -> CompanySnapshot {
        let ratios = self.ratios();
        let shareholding = self.shareholding();
        let documents: Vec<DocumentLink> = DocumentKind::ALL
            .iter()
            .flat_map(|kind| self.documents(*kind).unwrap_or_default())
            .collect();

        let stats = SnapshotStats {
            ratio_count: ratios.as_ref().found().map_or(0, |r| r.len()),
            shareholding_rows: shareholding.as_ref().found().map_or(0, |t| t.rows().len()),
            document_count: documents.len(),
            has_ratios: ratios.is_found(),
            has_shareholding: shareholding.is_found(),
        };

        CompanySnapshot {
            ratios,
            shareholding,
            documents,
            stats,
        }
    }
}

/// Everything extracted from one company page
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompanySnapshot {
    pub ratios: Extracted<RatioRecord>,
    pub shareholding: Extracted<ShareholdingTable>,
    pub documents: Vec<DocumentLink>,
    pub stats: SnapshotStats,
}

impl CompanySnapshot {
    /// Converts the snapshot to pretty JSON string
    pub fn to_json_pretty(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|_| "{}".to_string())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SnapshotStats {
    pub ratio_count: usize,
    pub shareholding_rows: usize,
    pub document_count: usize,
    pub has_ratios: bool,
    pub has_shareholding: bool,
}
