// * Company Listing Extraction
// * Rows of the paginated screen table: serial number, company name and page URL.

use scraper::{Html, Selector};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::LazyLock;
use tracing::debug;

use super::dom::visible_text;
use super::Extracted;
use crate::engine::normalization::resolve_href;

static SELECTOR_DATA_TABLE: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("table.data-table").expect("Invalid data table selector"));
static SELECTOR_COMPANY_ROW: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("tr[data-row-company-id]").expect("Invalid company row selector")
});
static SELECTOR_TEXT_CELL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("td.text").expect("Invalid text cell selector"));
static SELECTOR_ANCHOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a").expect("Invalid anchor selector"));

/// One row of the exported company list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyRecord {
    #[serde(rename = "S.No")]
    pub serial: String,
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Url")]
    pub url: String,
}

/// Extracts the company rows of one listing page.
///
/// `serial` carries the page's own numbering with the trailing "." removed.
/// A page without `table.data-table` yields `Extracted::Absent`.
pub fn extract_companies(document: &Html, base_url: &str) -> Extracted<Vec<CompanyRecord>> {
    let Some(table) = document.select(&SELECTOR_DATA_TABLE).next() else {
        return Extracted::Absent;
    };

    let mut companies = Vec::new();
    for row in table.select(&SELECTOR_COMPANY_ROW) {
        let cells: Vec<_> = row.select(&SELECTOR_TEXT_CELL).collect();
        if cells.len() < 2 {
            continue;
        }

        let Some(link) = cells[1].select(&SELECTOR_ANCHOR).next() else {
            debug!("Skipping listing row without company link");
            continue;
        };
        let Some(url) = link.value().attr("href").and_then(|href| resolve_href(href, base_url)) else {
            debug!("Skipping listing row with unusable href");
            continue;
        };

        companies.push(CompanyRecord {
            serial: visible_text(&cells[0]).replace('.', ""),
            name: visible_text(&link),
            url,
        });
    }

    Extracted::Found(companies)
}

/// Same extraction from a listing page saved to disk
pub fn extract_companies_from_file(path: &Path, base_url: &str) -> std::io::Result<Extracted<Vec<CompanyRecord>>> {
    let html = std::fs::read_to_string(path)?;
    let document = Html::parse_document(&html);
    Ok(extract_companies(&document, base_url))
}
