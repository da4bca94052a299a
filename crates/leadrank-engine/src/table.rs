//! CSV persistence for the raw input table and the ranked output table.
//!
//! Input rows that fail to parse are reported as [`SkipReason::MalformedRow`]
//! rather than aborting the read. Only a missing file or an I/O failure is
//! fatal. Output is written to a temporary sibling file and renamed into
//! place, so a failed write never leaves a partial table behind.

use std::io::{Read, Write};
use std::path::Path;

use leadrank_core::{OutputRow, RawLead, OUTPUT_COLUMNS};
use tempfile::NamedTempFile;

use crate::error::EngineError;
use crate::types::{RawRecord, SkipReason};

/// Reads the raw lead table at `path`.
///
/// # Errors
///
/// Returns [`EngineError::MissingInput`] if the file does not exist, and
/// [`EngineError::Io`] / [`EngineError::Csv`] for unreadable files or headers.
pub fn read_raw_leads(path: &Path) -> Result<Vec<RawRecord>, EngineError> {
    let file = open_input(path)?;
    read_raw_leads_from(file, &path.display().to_string())
}

/// Reads raw lead records from any reader. `label` names the source in errors.
///
/// Rows with a blank `name` become [`SkipReason::BlankName`]; rows that do
/// not fit the header become [`SkipReason::MalformedRow`].
///
/// # Errors
///
/// Returns [`EngineError::Csv`] if the header cannot be read or the
/// underlying reader fails.
pub fn read_raw_leads_from<R: Read>(reader: R, label: &str) -> Result<Vec<RawRecord>, EngineError> {
    let mut reader = csv::ReaderBuilder::new().from_reader(reader);
    reader.headers().map_err(|e| csv_error(label, e))?;

    let mut records = Vec::new();
    for (idx, result) in reader.deserialize::<RawLead>().enumerate() {
        let row = idx + 1;
        let outcome = match result {
            Ok(lead) if lead.has_name() => Ok(lead),
            Ok(_) => Err(SkipReason::BlankName),
            Err(e) if e.is_io_error() => return Err(csv_error(label, e)),
            Err(e) => Err(SkipReason::MalformedRow(e.to_string())),
        };
        records.push(RawRecord { row, outcome });
    }

    tracing::debug!(source = label, rows = records.len(), "read raw lead table");
    Ok(records)
}

/// Reads a ranked output table. Non-numeric or missing probabilities read as
/// `0`, and cells missing from a short row read as empty.
///
/// # Errors
///
/// Returns [`EngineError::MissingInput`] if the file does not exist, or
/// [`EngineError::Csv`] if a row cannot be read at all.
pub fn read_scored_rows(path: &Path) -> Result<Vec<OutputRow>, EngineError> {
    let label = path.display().to_string();
    let file = open_input(path)?;
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(file);
    reader
        .deserialize::<OutputRow>()
        .map(|row| row.map_err(|e| csv_error(&label, e)))
        .collect()
}

/// Writes the output table to `path`, replacing any existing file atomically.
///
/// The header row is always written, even for an empty table.
///
/// # Errors
///
/// Returns [`EngineError::Io`] or [`EngineError::Csv`] if the table cannot be
/// written or moved into place.
pub fn write_scored_rows<'a, I>(path: &Path, rows: I) -> Result<(), EngineError>
where
    I: IntoIterator<Item = &'a OutputRow>,
{
    let label = path.display().to_string();
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };

    let mut tmp = NamedTempFile::new_in(dir).map_err(|e| io_error(&label, e))?;
    write_scored_rows_to(tmp.as_file_mut(), rows, &label)?;
    tmp.persist(path).map_err(|e| io_error(&label, e.error))?;

    tracing::debug!(path = %label, "wrote scored lead table");
    Ok(())
}

/// Writes the output table, header first, to any writer.
///
/// # Errors
///
/// Returns [`EngineError::Csv`] if serialization or the writer fails.
pub fn write_scored_rows_to<'a, W, I>(writer: W, rows: I, label: &str) -> Result<(), EngineError>
where
    W: Write,
    I: IntoIterator<Item = &'a OutputRow>,
{
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);
    writer
        .write_record(OUTPUT_COLUMNS)
        .map_err(|e| csv_error(label, e))?;
    for row in rows {
        writer.serialize(row).map_err(|e| csv_error(label, e))?;
    }
    writer.flush().map_err(|e| io_error(label, e))?;
    Ok(())
}

/// Writes a raw lead table in the input schema, e.g. for a harvester.
///
/// # Errors
///
/// Returns [`EngineError::Io`] or [`EngineError::Csv`] on write failure.
pub fn write_raw_leads(path: &Path, leads: &[RawLead]) -> Result<(), EngineError> {
    let label = path.display().to_string();
    let mut writer = csv::Writer::from_path(path).map_err(|e| csv_error(&label, e))?;
    for lead in leads {
        writer.serialize(lead).map_err(|e| csv_error(&label, e))?;
    }
    writer.flush().map_err(|e| io_error(&label, e))?;
    Ok(())
}

fn open_input(path: &Path) -> Result<std::fs::File, EngineError> {
    std::fs::File::open(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            EngineError::MissingInput {
                path: path.display().to_string(),
            }
        } else {
            io_error(&path.display().to_string(), e)
        }
    })
}

fn csv_error(label: &str, source: csv::Error) -> EngineError {
    EngineError::Csv {
        path: label.to_string(),
        source,
    }
}

fn io_error(label: &str, source: std::io::Error) -> EngineError {
    EngineError::Io {
        path: label.to_string(),
        source,
    }
}

#[cfg(test)]
#[path = "table_test.rs"]
mod tests;
