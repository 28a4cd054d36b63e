//! Bulk row import and export.
//!
//! Rows are plain string vectors as read from a delimited file:
//!
//! | Table | Columns |
//! |-------|---------|
//! | Tasks | Part, Setup, Machine, Qty, Time/unit, Start date, End date |
//! | Nomenclature | Part, Setup, Machine, Time/unit |
//!
//! Imported task rows carry their own end dates; nothing is recomputed.
//!
//! # Load Policies
//!
//! - **Lenient** (silent background load): invalid rows are skipped and
//!   reported with their 1-based row index; the valid rows replace the
//!   store. If no row is valid the store is left as it was.
//! - **Strict** (interactive open): any invalid row rejects the batch
//!   and the store is left untouched.
//!
//! Each policy has its own entry point.

use std::fmt;

use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::models::{NomenclatureEntry, NomenclatureForm, TaskRecord};
use crate::store::{Catalog, TaskStore};
use crate::validation::{format_timestamp, normalize_decimal, Field, ValidationError, Validator};

/// Task table header.
pub const TASK_HEADER: [&str; 7] = [
    "Part",
    "Setup",
    "Machine",
    "Qty",
    "Time/unit",
    "Start date",
    "End date",
];

/// Nomenclature table header.
pub const NOMENCLATURE_HEADER: [&str; 4] = ["Part", "Setup", "Machine", "Time/unit"];

/// A row rejected during import.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowError {
    /// 1-based data row index (header excluded).
    pub row: usize,
    /// Why the row was rejected.
    pub reason: String,
}

impl fmt::Display for RowError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "row {}: {}", self.row, self.reason)
    }
}

/// Outcome of a lenient load.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportReport {
    /// Rows committed to the store.
    pub imported: usize,
    /// Rows skipped.
    pub errors: Vec<RowError>,
}

impl ImportReport {
    /// Whether every row was imported.
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Renders tasks as rows in store order.
pub fn export_task_rows(records: &[TaskRecord]) -> Vec<Vec<String>> {
    records
        .iter()
        .map(|r| {
            vec![
                r.part.clone(),
                r.setup.to_string(),
                r.machine.clone(),
                r.quantity.to_string(),
                r.time_per_unit.to_string(),
                format_timestamp(&r.start),
                format_timestamp(&r.end),
            ]
        })
        .collect()
}

/// Renders catalog entries as rows in catalog order.
pub fn export_catalog_rows(entries: &[NomenclatureEntry]) -> Vec<Vec<String>> {
    entries
        .iter()
        .map(|e| {
            vec![
                e.part.clone(),
                e.setup.to_string(),
                e.machine.clone(),
                e.time_per_unit.to_string(),
            ]
        })
        .collect()
}

fn check_width(row: &[String], expected: usize) -> std::result::Result<(), String> {
    if row.len() < expected {
        Err(format!("expected {expected} columns, found {}", row.len()))
    } else {
        Ok(())
    }
}

/// Parses one task row. The id is left at zero; the store assigns it.
pub fn parse_task_row(row: &[String], validator: &Validator) -> std::result::Result<TaskRecord, String> {
    check_width(row, TASK_HEADER.len())?;
    task_from_row(row, validator).map_err(|e| e.to_string())
}

fn task_from_row(
    row: &[String],
    validator: &Validator,
) -> std::result::Result<TaskRecord, ValidationError> {
    Ok(TaskRecord {
        id: 0,
        part: validator.text(Field::Part, &row[0])?,
        setup: validator.positive_integer(Field::Setup, &row[1])?,
        machine: validator.machine(&row[2])?,
        quantity: validator.positive_integer(Field::Quantity, &row[3])?,
        time_per_unit: validator
            .positive_minutes(Field::TimePerUnit, &normalize_decimal(&row[4]))?,
        setup_time: 0.0,
        start: validator.timestamp(Field::Start, &row[5])?,
        end: validator.timestamp(Field::End, &row[6])?,
    })
}

/// Builds a catalog form from one nomenclature row.
pub fn parse_nomenclature_row(row: &[String]) -> std::result::Result<NomenclatureForm, String> {
    check_width(row, NOMENCLATURE_HEADER.len())?;
    Ok(NomenclatureForm::new(
        row[0].trim(),
        row[1].trim(),
        row[2].trim(),
        normalize_decimal(&row[3]),
    ))
}

fn stage_tasks(rows: &[Vec<String>], validator: &Validator) -> (Vec<TaskRecord>, Vec<RowError>) {
    let mut records = Vec::new();
    let mut errors = Vec::new();
    for (i, row) in rows.iter().enumerate() {
        match parse_task_row(row, validator) {
            Ok(record) => records.push(record),
            Err(reason) => errors.push(RowError { row: i + 1, reason }),
        }
    }
    (records, errors)
}

fn stage_catalog(rows: &[Vec<String>], validator: &Validator) -> (Catalog, Vec<RowError>) {
    let mut staged = Catalog::new();
    let mut errors = Vec::new();
    for (i, row) in rows.iter().enumerate() {
        let added = parse_nomenclature_row(row)
            .and_then(|form| staged.add(&form, validator).map_err(|e| e.to_string()));
        if let Err(reason) = added {
            errors.push(RowError { row: i + 1, reason });
        }
    }
    (staged, errors)
}

fn log_row_errors(errors: &[RowError]) {
    for error in errors {
        warn!("Skipped {error}");
    }
}

/// Lenient task load: valid rows replace the store, invalid rows are reported.
pub fn load_tasks_lenient(
    store: &mut TaskStore,
    rows: &[Vec<String>],
    validator: &Validator,
) -> ImportReport {
    let (records, errors) = stage_tasks(rows, validator);
    log_row_errors(&errors);
    if records.is_empty() {
        warn!("No valid task rows among {}", rows.len());
        return ImportReport { imported: 0, errors };
    }
    let imported = records.len();
    store.replace_all(records);
    info!("Loaded {imported} task(s), skipped {}", errors.len());
    ImportReport { imported, errors }
}

/// Strict task load: all rows must be valid or nothing changes.
///
/// Returns the number of tasks loaded. An empty batch is rejected.
pub fn load_tasks_strict(
    store: &mut TaskStore,
    rows: &[Vec<String>],
    validator: &Validator,
) -> Result<usize> {
    if rows.is_empty() {
        return Err(Error::invalid_input("no task rows to import"));
    }
    let (records, errors) = stage_tasks(rows, validator);
    if !errors.is_empty() {
        return Err(Error::ImportRejected { errors });
    }
    let imported = records.len();
    store.replace_all(records);
    info!("Loaded {imported} task(s)");
    Ok(imported)
}

/// Lenient catalog load. Duplicate triples count as invalid rows.
pub fn load_catalog_lenient(
    catalog: &mut Catalog,
    rows: &[Vec<String>],
    validator: &Validator,
) -> ImportReport {
    let (staged, errors) = stage_catalog(rows, validator);
    log_row_errors(&errors);
    if staged.is_empty() {
        warn!("No valid nomenclature rows among {}", rows.len());
        return ImportReport { imported: 0, errors };
    }
    let imported = staged.len();
    catalog.replace_all(staged.entries().to_vec());
    info!("Loaded {imported} nomenclature entr(ies), skipped {}", errors.len());
    ImportReport { imported, errors }
}

/// Strict catalog load: all rows must be valid and unique or nothing changes.
pub fn load_catalog_strict(
    catalog: &mut Catalog,
    rows: &[Vec<String>],
    validator: &Validator,
) -> Result<usize> {
    if rows.is_empty() {
        return Err(Error::invalid_input("no nomenclature rows to import"));
    }
    let (staged, errors) = stage_catalog(rows, validator);
    if !errors.is_empty() {
        return Err(Error::ImportRejected { errors });
    }
    let imported = staged.len();
    catalog.replace_all(staged.entries().to_vec());
    info!("Loaded {imported} nomenclature entr(ies)");
    Ok(imported)
}
