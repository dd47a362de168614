// * Persistence: files written by the pipeline.
// * CSV company lists, plain-text reports and the naming rules for downloaded documents.

pub mod csv_export;
pub mod paths;
pub mod report;

// * Re-exports for convenient access
pub use csv_export::{write_companies, write_companies_to};
pub use paths::{infer_extension, sanitize_component, PROVIDER_EXTENSIONS};
pub use report::{
    group_digits, group_thousands, render_company_preview, render_normalized, render_outcomes, render_ratios,
    render_shareholding, render_trend, write_report,
};

use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

// * Creates the parent directory of `path` if it has one
pub(crate) fn ensure_parent(path: &Path) -> Result<(), std::io::Error> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => std::fs::create_dir_all(parent),
        _ => Ok(()),
    }
}
