// * Trend Analysis
// * Earliest vs latest column of a shareholding grid, one delta per category.
// * Bad cells become per-row markers; only a grid with < 2 periods is an error.

use serde::Serialize;
use thiserror::Error;

use crate::config::constants::SHAREHOLDERS_LABEL;
use crate::refinery::{ShareholdingRow, ShareholdingTable};

#[derive(Debug, Error, PartialEq)]
pub enum TrendError {
    #[error("Trend needs at least two period columns, found {0}")]
    InsufficientPeriods(usize),
}

/// Per-row error marker
#[derive(Debug, Clone, Error, PartialEq, Serialize)]
pub enum RowError {
    #[error("no value for period '{0}'")]
    MissingValue(String),

    #[error("unparseable value '{0}'")]
    Unparseable(String),

    #[error("earliest count is zero")]
    ZeroBaseline,

    #[error("count change out of range ({from} → {to})")]
    OutOfRange { from: i64, to: i64 },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendDelta {
    pub category: String,
    pub from_value: f64,
    pub to_value: f64,
    pub delta: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShareholderCountDelta {
    pub from_count: i64,
    pub to_count: i64,
    pub absolute_delta: i64,
    pub percent_delta: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryTrend {
    pub category: String,
    pub result: Result<TrendDelta, RowError>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendReport {
    pub from_period: String,
    pub to_period: String,
    pub categories: Vec<CategoryTrend>,
    /// `None` when the grid has no shareholder-count row
    pub shareholders: Option<Result<ShareholderCountDelta, RowError>>,
}

impl TrendReport {
    pub fn delta_for(&self, category: &str) -> Option<&TrendDelta> {
        self.categories
            .iter()
            .find(|c| c.category == category)
            .and_then(|c| c.result.as_ref().ok())
    }

    pub fn error_count(&self) -> usize {
        let rows = self.categories.iter().filter(|c| c.result.is_err()).count();
        let count_row = matches!(self.shareholders, Some(Err(_))) as usize;
        rows + count_row
    }
}

/// "52.00%" → 52.0
pub fn parse_percent(raw: &str) -> Result<f64, RowError> {
    let trimmed = raw.trim();
    trimmed
        .strip_suffix('%')
        .unwrap_or(trimmed)
        .trim()
        .parse::<f64>()
        .map_err(|_| RowError::Unparseable(raw.to_string()))
}

/// "10,500" → 10500
pub fn parse_count(raw: &str) -> Result<i64, RowError> {
    raw.trim()
        .replace(',', "")
        .parse::<i64>()
        .map_err(|_| RowError::Unparseable(raw.to_string()))
}

fn endpoints<'a>(
    row: &'a ShareholdingRow,
    table: &'a ShareholdingTable,
) -> Result<(&'a str, &'a str), RowError> {
    let periods = table.periods();
    let last = periods.len() - 1;
    let from = row
        .value_at(0)
        .ok_or_else(|| RowError::MissingValue(periods[0].clone()))?;
    let to = row
        .value_at(last)
        .ok_or_else(|| RowError::MissingValue(periods[last].clone()))?;
    Ok((from, to))
}

fn percent_trend(row: &ShareholdingRow, table: &ShareholdingTable) -> Result<TrendDelta, RowError> {
    let (from, to) = endpoints(row, table)?;
    let from_value = parse_percent(from)?;
    let to_value = parse_percent(to)?;
    Ok(TrendDelta {
        category: row.category.clone(),
        from_value,
        to_value,
        delta: to_value - from_value,
    })
}

fn count_trend(row: &ShareholdingRow, table: &ShareholdingTable) -> Result<ShareholderCountDelta, RowError> {
    let (from, to) = endpoints(row, table)?;
    let from_count = parse_count(from)?;
    let to_count = parse_count(to)?;
    if from_count == 0 {
        return Err(RowError::ZeroBaseline);
    }
    let absolute_delta = to_count
        .checked_sub(from_count)
        .ok_or(RowError::OutOfRange {
            from: from_count,
            to: to_count,
        })?;
    Ok(ShareholderCountDelta {
        from_count,
        to_count,
        absolute_delta,
        percent_delta: absolute_delta as f64 / from_count as f64 * 100.0,
    })
}

/// Compares the first and last period columns (header order) of `table`
pub fn analyze(table: &ShareholdingTable) -> Result<TrendReport, TrendError> {
    let periods = table.periods();
    if periods.len() < 2 {
        return Err(TrendError::InsufficientPeriods(periods.len()));
    }

    let mut categories = Vec::new();
    let mut shareholders = None;

    for row in table.rows() {
        if row.category == SHAREHOLDERS_LABEL {
            shareholders = Some(count_trend(row, table));
        } else {
            categories.push(CategoryTrend {
                category: row.category.clone(),
                result: percent_trend(row, table),
            });
        }
    }

    Ok(TrendReport {
        from_period: periods[0].clone(),
        to_period: periods[periods.len() - 1].clone(),
        categories,
        shareholders,
    })
}
