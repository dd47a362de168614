// * CSV export of the company list: `S.No,Name,Url`, quoted only when needed.

use std::io::Write;
use std::path::Path;
use tracing::{info, warn};

use super::{ensure_parent, PersistenceError};
use crate::refinery::CompanyRecord;

/// Serializes records (header included) into any writer
pub fn write_companies_to<W: Write>(out: W, records: &[CompanyRecord]) -> Result<W, PersistenceError> {
    let mut writer = csv::Writer::from_writer(out);
    for record in records {
        writer.serialize(record)?;
    }
    writer.flush()?;
    writer
        .into_inner()
        .map_err(|e| PersistenceError::Io(e.into_error()))
}

/// Writes the company list to `path`, returning the number of rows written.
///
/// An empty list leaves the filesystem untouched.
pub fn write_companies(path: &Path, records: &[CompanyRecord]) -> Result<usize, PersistenceError> {
    if records.is_empty() {
        warn!(path = %path.display(), "No company data to save");
        return Ok(0);
    }

    ensure_parent(path)?;
    let file = std::fs::File::create(path)?;
    write_companies_to(file, records)?;

    info!(path = %path.display(), rows = records.len(), "Company list saved");
    Ok(records.len())
}
