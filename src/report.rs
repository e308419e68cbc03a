//! Report rows and their CSV / console output.

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::io::{self, Write};
use std::path::Path;
use tracing::{error, info};

/// Placeholder for a field that could not be read
pub const NOT_AVAILABLE: &str = "N/A";

/// CSV column order for the report
pub const REPORT_COLUMNS: &[&str] = &[
    "PubmedID",
    "Title",
    "Publication Date",
    "Non-academic Author(s)",
    "Company Affiliation(s)",
    "Corresponding Author Email",
];

/// One output row per article
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportRow {
    #[serde(rename = "PubmedID")]
    pub pubmed_id: String,
    #[serde(rename = "Title")]
    pub title: String,
    #[serde(rename = "Publication Date")]
    pub publication_year: String,
    /// Comma-joined display names of flagged authors
    #[serde(rename = "Non-academic Author(s)")]
    pub non_academic_authors: String,
    /// Comma-joined affiliations, parallel to `non_academic_authors`
    #[serde(rename = "Company Affiliation(s)")]
    pub company_affiliations: String,
    #[serde(rename = "Corresponding Author Email")]
    pub corresponding_email: String,
}

/// Write rows to a CSV file.
///
/// The header is always written, even when `rows` is empty.
pub fn write_csv(path: &Path, rows: &[ReportRow]) -> Result<()> {
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path)?;

    wtr.write_record(REPORT_COLUMNS)?;
    for row in rows {
        wtr.serialize(row)?;
    }

    wtr.flush()?;
    info!(path = %path.display(), rows = rows.len(), "Report written");
    Ok(())
}

/// Read a report back from CSV
pub fn read_csv(path: &Path) -> Result<Vec<ReportRow>> {
    let mut rdr = csv::Reader::from_path(path)?;
    let rows = rdr
        .deserialize::<ReportRow>()
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(rows)
}

/// Write rows to `out` as a pretty JSON array
pub fn write_json<W: Write>(out: &mut W, rows: &[ReportRow]) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, rows)?;
    writeln!(out)?;
    out.flush()?;
    Ok(())
}

/// Write to `destination` if given, otherwise print to `out`. Failures are logged only.
pub fn emit_to<W: Write>(out: &mut W, rows: &[ReportRow], destination: Option<&Path>) {
    match destination {
        Some(path) => match write_csv(path, rows) {
            Ok(()) => {
                if let Err(e) = writeln!(out, "Results saved to {}", path.display()) {
                    error!(error = %e, "Error printing results");
                }
            }
            Err(e) => error!(path = %path.display(), error = %e, "Error saving to file"),
        },
        None => {
            if let Err(e) = write_json(out, rows) {
                error!(error = %e, "Error printing results");
            }
        }
    }
}

/// [`emit_to`] with stdout as the console
pub fn emit(rows: &[ReportRow], destination: Option<&Path>) {
    emit_to(&mut io::stdout().lock(), rows, destination);
}
