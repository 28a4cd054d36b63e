//! Delimited text codec for catalog and task tables.
//!
//! The first line is a header and is skipped on read. Blank lines are
//! ignored. Fields are kept as raw strings; validation happens in
//! [`crate::import`].

use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use log::info;

use crate::error::Result;

/// Reads data rows (header skipped).
pub fn read_rows<R: Read>(reader: R, delimiter: u8) -> Result<Vec<Vec<String>>> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        if record.iter().all(|field| field.trim().is_empty()) {
            continue;
        }
        rows.push(record.iter().map(str::to_string).collect());
    }
    Ok(rows)
}

/// Writes a header followed by data rows.
pub fn write_rows<W: Write>(
    writer: W,
    delimiter: u8,
    header: &[&str],
    rows: &[Vec<String>],
) -> Result<()> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .from_writer(writer);
    writer.write_record(header)?;
    for row in rows {
        writer.write_record(row)?;
    }
    writer.flush()?;
    Ok(())
}

/// Reads data rows from a file.
pub fn read_rows_from_path(path: &Path, delimiter: u8) -> Result<Vec<Vec<String>>> {
    let rows = read_rows(File::open(path)?, delimiter)?;
    info!("Read {} row(s) from {}", rows.len(), path.display());
    Ok(rows)
}

/// Writes a table to a file, replacing it.
pub fn write_rows_to_path(
    path: &Path,
    delimiter: u8,
    header: &[&str],
    rows: &[Vec<String>],
) -> Result<()> {
    write_rows(File::create(path)?, delimiter, header, rows)?;
    info!("Wrote {} row(s) to {}", rows.len(), path.display());
    Ok(())
}
