// * Plain-text rendering for the console and report files.

use std::fmt::Write as _;
use std::path::Path;

use super::{ensure_parent, PersistenceError};
use crate::config::constants::SHAREHOLDERS_LABEL;
use crate::engine::downloader::{DownloadOutcome, DownloadStatus, DownloadSummary};
use crate::engine::trend::TrendReport;
use crate::refinery::{CompanyRecord, NormalizedValue, RatioRecord, ShareholdingTable};

const CATEGORY_WIDTH: usize = 15;
const PERIOD_WIDTH: usize = 12;
const PREVIEW_HEAD: usize = 10;
const PREVIEW_TAIL: usize = 3;
const PREVIEW_NAME_WIDTH: usize = 20;

/// 1234567 → "1,234,567"
pub fn group_digits(value: u64) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

/// -1234567 → "-1,234,567"
pub fn group_thousands(value: i64) -> String {
    let grouped = group_digits(value.unsigned_abs());
    if value < 0 {
        format!("-{grouped}")
    } else {
        grouped
    }
}

fn signed_thousands(value: i64) -> String {
    if value >= 0 {
        format!("+{}", group_thousands(value))
    } else {
        group_thousands(value)
    }
}

/// Raw ratio listing framed by 50-char rules
pub fn render_ratios(title: &str, record: &RatioRecord) -> String {
    let rule = "=".repeat(50);
    let mut out = String::new();
    let _ = writeln!(out, "{rule}");
    let _ = writeln!(out, "{} FINANCIAL INFORMATION", title.to_uppercase());
    let _ = writeln!(out, "{rule}");
    for (label, value) in record.iter() {
        let _ = writeln!(out, "{label:15}: {value}");
    }
    let _ = writeln!(out, "{rule}");
    out
}

/// Normalized ratio values under their own heading
pub fn render_normalized(values: &[(String, NormalizedValue)]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "NUMERIC VALUES EXTRACTED:");
    let _ = writeln!(out, "{}", "=".repeat(30));
    for (label, value) in values {
        let _ = writeln!(out, "{label:15}: {value}");
    }
    out
}

/// Trend section: one line per category plus the shareholder-count line
pub fn render_trend(report: &TrendReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Trend ({} → {})", report.from_period, report.to_period);
    let _ = writeln!(out, "{}", "-".repeat(40));

    for trend in &report.categories {
        match &trend.result {
            Ok(d) => {
                let _ = writeln!(
                    out,
                    "{}: {:+6.2}% ({:.2}% → {:.2}%)",
                    d.category, d.delta, d.from_value, d.to_value
                );
            }
            Err(e) => {
                let _ = writeln!(out, "{}: n/a ({e})", trend.category);
            }
        }
    }

    match &report.shareholders {
        Some(Ok(c)) => {
            let _ = writeln!(
                out,
                "{SHAREHOLDERS_LABEL}: {} ({:+.1}%) ({} → {})",
                signed_thousands(c.absolute_delta),
                c.percent_delta,
                group_thousands(c.from_count),
                group_thousands(c.to_count)
            );
        }
        Some(Err(e)) => {
            let _ = writeln!(out, "{SHAREHOLDERS_LABEL}: n/a ({e})");
        }
        None => {}
    }

    out
}

/// Fixed-width shareholding grid, followed by the trend section when given
pub fn render_shareholding(table: &ShareholdingTable, trend: Option<&TrendReport>) -> String {
    let mut out = String::new();

    let _ = write!(out, "{:<w$}", "Category", w = CATEGORY_WIDTH);
    for period in table.periods() {
        let _ = write!(out, "{period:>w$}", w = PERIOD_WIDTH);
    }
    out.push('\n');
    let _ = writeln!(
        out,
        "{}",
        "-".repeat(CATEGORY_WIDTH + PERIOD_WIDTH * table.periods().len())
    );

    for row in table.rows() {
        let _ = write!(out, "{:<w$}", row.category, w = CATEGORY_WIDTH);
        for index in 0..table.periods().len() {
            let value = row.value_at(index).unwrap_or("-");
            let _ = write!(out, "{value:>w$}", w = PERIOD_WIDTH);
        }
        out.push('\n');
    }

    if let Some(report) = trend {
        out.push('\n');
        out.push_str(&render_trend(report));
    }

    out
}

/// One status line per outcome plus the batch totals
pub fn render_outcomes(outcomes: &[DownloadOutcome], summary: &DownloadSummary) -> String {
    let mut out = String::new();
    for outcome in outcomes {
        let path = outcome.target_path.display();
        let _ = match &outcome.status {
            DownloadStatus::Downloaded => {
                writeln!(out, "  downloaded  {path} ({} bytes)", group_digits(outcome.byte_count))
            }
            DownloadStatus::AlreadyExists => writeln!(out, "  exists      {path}"),
            DownloadStatus::Failed(reason) => writeln!(out, "  failed      {path}: {reason}"),
        };
    }
    let _ = writeln!(
        out,
        "Done: {} downloaded, {} already present, {} failed ({} bytes)",
        summary.downloaded,
        summary.already_present,
        summary.failed,
        group_digits(summary.total_bytes)
    );
    out
}

fn preview_line(out: &mut String, record: &CompanyRecord) {
    let name = if record.name.chars().count() > PREVIEW_NAME_WIDTH {
        let head: String = record.name.chars().take(PREVIEW_NAME_WIDTH).collect();
        format!("{head}...")
    } else {
        record.name.clone()
    };
    let _ = writeln!(out, "{}\t{:<w$}\t{}", record.serial, name, record.url, w = PREVIEW_NAME_WIDTH);
}

/// First ten and last three rows of a company list
pub fn render_company_preview(records: &[CompanyRecord]) -> String {
    let mut out = String::new();
    let header = format!("S.No\tName\t\t\tUrl\n{}\n", "-".repeat(80));

    let _ = writeln!(out, "First {} entries:", PREVIEW_HEAD.min(records.len()));
    out.push_str(&header);
    for record in records.iter().take(PREVIEW_HEAD) {
        preview_line(&mut out, record);
    }

    if records.len() > PREVIEW_HEAD {
        let tail_start = records.len().saturating_sub(PREVIEW_TAIL).max(PREVIEW_HEAD);
        let _ = writeln!(out, "\nLast {} entries:", records.len() - tail_start);
        out.push_str(&header);
        for record in &records[tail_start..] {
            preview_line(&mut out, record);
        }
    }

    out
}

/// Saves a rendered report, creating parent directories as needed
pub fn write_report(path: &Path, text: &str) -> Result<(), PersistenceError> {
    ensure_parent(path)?;
    std::fs::write(path, text)?;
    Ok(())
}
