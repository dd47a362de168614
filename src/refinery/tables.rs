// * Table Extraction
// * Category × period grids such as the quarterly shareholding pattern.
// * Header row supplies the period keys, the first cell of every body row the category.

use scraper::{ElementRef, Html, Selector};
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use tracing::debug;

use super::dom::visible_text;
use super::Extracted;

// * Precompiled CSS selectors for performance
static SELECTOR_SHAREHOLDING: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("section#shareholding").expect("Invalid shareholding selector"));
static SELECTOR_TABLE: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("table").expect("Invalid table selector"));
static SELECTOR_THEAD: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("thead").expect("Invalid thead selector"));
static SELECTOR_TBODY: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("tbody").expect("Invalid tbody selector"));
static SELECTOR_TH: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("th").expect("Invalid th selector"));
static SELECTOR_TR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("tr").expect("Invalid tr selector"));
static SELECTOR_TD: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("td").expect("Invalid td selector"));
static SELECTOR_TOGGLE: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("button").expect("Invalid button selector"));

/// One category row; `values[i]` belongs to `periods[i]` of the owning table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShareholdingRow {
    pub category: String,
    values: Vec<Option<String>>,
}

impl ShareholdingRow {
    /// Raw value at a period column, `None` if the cell was missing
    pub fn value_at(&self, index: usize) -> Option<&str> {
        self.values.get(index).and_then(|v| v.as_deref())
    }

    pub fn populated_count(&self) -> usize {
        self.values.iter().filter(|v| v.is_some()).count()
    }
}

/// Category label → (period label → raw display string)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ShareholdingTable {
    periods: Vec<String>,
    rows: Vec<ShareholdingRow>,
}

impl ShareholdingTable {
    pub fn new(periods: Vec<String>) -> Self {
        Self {
            periods,
            rows: Vec::new(),
        }
    }

    /// Adds a row, zipping `cells` positionally against the period keys.
    ///
    /// Cells beyond the key list are dropped and missing cells stay unset.
    /// A category seen before is overwritten in place.
    pub fn insert_row<I, S>(&mut self, category: impl Into<String>, cells: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let category = category.into();
        let mut values: Vec<Option<String>> = cells
            .into_iter()
            .take(self.periods.len())
            .map(|c| Some(c.into()))
            .collect();
        values.resize(self.periods.len(), None);

        let row = ShareholdingRow { category, values };
        match self.rows.iter_mut().find(|r| r.category == row.category) {
            Some(existing) => *existing = row,
            None => self.rows.push(row),
        }
    }

    pub fn periods(&self) -> &[String] {
        &self.periods
    }

    pub fn rows(&self) -> &[ShareholdingRow] {
        &self.rows
    }

    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.rows.iter().map(|r| r.category.as_str())
    }

    pub fn row(&self, category: &str) -> Option<&ShareholdingRow> {
        self.rows.iter().find(|r| r.category == category)
    }

    pub fn get(&self, category: &str, period: &str) -> Option<&str> {
        let index = self.periods.iter().position(|p| p == period)?;
        self.row(category)?.value_at(index)
    }

    /// Populated (period, value) pairs of a category, in header order
    pub fn values_of<'a>(&'a self, category: &str) -> Vec<(&'a str, &'a str)> {
        let Some(row) = self.row(category) else {
            return Vec::new();
        };
        self.periods
            .iter()
            .enumerate()
            .filter_map(|(i, period)| row.value_at(i).map(|v| (period.as_str(), v)))
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Converts the table to a JSON string
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string())
    }
}

/// Reads grids out of HTML tables
pub struct TableExtractor;

impl TableExtractor {
    /// Period keys: header cells minus the category column, empty labels discarded
    fn extract_periods(table: &ElementRef) -> Vec<String> {
        let header_cells: Vec<ElementRef> = match table.select(&SELECTOR_THEAD).next() {
            Some(thead) => thead.select(&SELECTOR_TH).collect(),
            // * Fallback: th cells of the first row
            None => table
                .select(&SELECTOR_TR)
                .next()
                .map(|tr| tr.select(&SELECTOR_TH).collect())
                .unwrap_or_default(),
        };

        header_cells
            .iter()
            .skip(1)
            .map(visible_text)
            .filter(|text| !text.is_empty())
            .collect()
    }

    /// Category label of a row's first cell; toggle buttons carry a trailing "+"
    fn category_label(cell: &ElementRef) -> String {
        match cell.select(&SELECTOR_TOGGLE).next() {
            Some(toggle) => visible_text(&toggle)
                .trim_end()
                .trim_end_matches('+')
                .trim_end()
                .to_string(),
            None => visible_text(cell),
        }
    }

    fn body_rows<'a>(table: &ElementRef<'a>) -> Vec<ElementRef<'a>> {
        match table.select(&SELECTOR_TBODY).next() {
            Some(tbody) => tbody.select(&SELECTOR_TR).collect(),
            None => table.select(&SELECTOR_TR).collect(),
        }
    }

    /// Extracts a single table element into a category × period grid
    pub fn extract_grid(table: &ElementRef) -> ShareholdingTable {
        let mut grid = ShareholdingTable::new(Self::extract_periods(table));

        for row in Self::body_rows(table) {
            let cells: Vec<ElementRef> = row.select(&SELECTOR_TD).collect();

            // * Header rows and stray single-cell rows carry no data
            if cells.len() < 2 {
                continue;
            }

            let category = Self::category_label(&cells[0]);
            if category.is_empty() {
                debug!("Skipping table row without category label");
                continue;
            }

            grid.insert_row(category, cells[1..].iter().map(visible_text));
        }

        grid
    }

    /// Locates `container`, then its first table, and extracts the grid
    pub fn extract_table(document: &Html, container: &Selector) -> Extracted<ShareholdingTable> {
        let Some(container) = document.select(container).next() else {
            return Extracted::Absent;
        };
        let Some(table) = container.select(&SELECTOR_TABLE).next() else {
            return Extracted::Absent;
        };

        Extracted::Found(Self::extract_grid(&table))
    }

    /// Extracts the quarterly shareholding pattern of a company page
    pub fn extract_shareholding(document: &Html) -> Extracted<ShareholdingTable> {
        Self::extract_table(document, &SELECTOR_SHAREHOLDING)
    }
}
