//! Output formatting and persistence for reports and normalized records.
//!
//! Supports pretty-printing, JSON report files, and CSV append for the
//! canonical record schema.

use anyhow::Result;
use serde::Serialize;
use tracing::{debug, info};

use crate::report::Report;
use csv::WriterBuilder;
use std::fs::OpenOptions;
use std::path::Path;

/// Logs a report using Rust's debug pretty-print format.
pub fn print_pretty(report: &Report) {
    debug!("{:#?}", report);
}

/// Logs a report as pretty-printed JSON.
pub fn print_json(report: &Report) -> Result<()> {
    info!("{}", serde_json::to_string_pretty(report)?);
    Ok(())
}

/// Writes a report as pretty-printed JSON to `path`.
pub fn write_report(path: &str, report: &Report) -> Result<()> {
    debug!(path, "Writing report JSON");
    std::fs::write(path, serde_json::to_vec_pretty(report)?)?;
    Ok(())
}

/// Appends normalized records as rows to a CSV file.
///
/// Creates the file with headers if it does not already exist.
pub fn append_records<T: Serialize>(path: &str, records: &[T]) -> Result<()> {
    let file_exists = Path::new(path).exists();
    debug!(path, file_exists, "Appending CSV records");

    let file = OpenOptions::new().append(true).create(true).open(path)?;

    let mut writer = WriterBuilder::new()
        .has_headers(!file_exists) // IMPORTANT when appending
        .from_writer(file);

    for record in records {
        writer.serialize(record)?;
    }
    writer.flush()?;

    Ok(())
}
