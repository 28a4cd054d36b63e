//! Task record model.
//!
//! A task is one manufacturing operation occupying a machine for a time
//! interval. The end time is derived from quantity, time per unit, and
//! setup time when the task is created by hand; imported tasks carry
//! their end time as-is.

use std::cmp::Ordering;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::{Interval, RecordId};
use crate::validation::{format_timestamp, Field};

/// A scheduled manufacturing task.
///
/// # Time Representation
/// `start` and `end` are local wall-clock timestamps with minute
/// precision. `end` is never recomputed by field edits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskRecord {
    /// Unique record identifier, assigned by the task store.
    pub id: RecordId,
    /// Part name, conventionally `"<type> <drawing-number>"`.
    pub part: String,
    /// Setup (operation) number.
    pub setup: u32,
    /// Machine the task runs on.
    pub machine: String,
    /// Number of units.
    pub quantity: u32,
    /// Processing time per unit (minutes).
    pub time_per_unit: f64,
    /// Batch setup overhead (minutes).
    pub setup_time: f64,
    /// Start timestamp.
    pub start: NaiveDateTime,
    /// End timestamp.
    pub end: NaiveDateTime,
}

impl TaskRecord {
    /// Occupied interval `[start, end)`.
    #[inline]
    pub fn interval(&self) -> Interval {
        Interval::new(self.start, self.end)
    }

    /// Display text of a field, as shown in the task grid.
    pub fn field_text(&self, field: Field) -> String {
        match field {
            Field::Part => self.part.clone(),
            Field::Setup => self.setup.to_string(),
            Field::Machine => self.machine.clone(),
            Field::Quantity => self.quantity.to_string(),
            Field::TimePerUnit => self.time_per_unit.to_string(),
            Field::SetupTime => self.setup_time.to_string(),
            Field::Start => format_timestamp(&self.start),
            Field::End => format_timestamp(&self.end),
        }
    }

    /// Compares two records by one field using its typed value.
    pub fn cmp_by(&self, other: &Self, field: Field) -> Ordering {
        match field {
            Field::Part => self.part.cmp(&other.part),
            Field::Setup => self.setup.cmp(&other.setup),
            Field::Machine => self.machine.cmp(&other.machine),
            Field::Quantity => self.quantity.cmp(&other.quantity),
            Field::TimePerUnit => self.time_per_unit.total_cmp(&other.time_per_unit),
            Field::SetupTime => self.setup_time.total_cmp(&other.setup_time),
            Field::Start => self.start.cmp(&other.start),
            Field::End => self.end.cmp(&other.end),
        }
    }

    /// Case-insensitive substring match against every displayed field.
    pub fn matches(&self, needle: &str) -> bool {
        let needle = needle.to_lowercase();
        self.id.to_string().contains(&needle)
            || Field::ALL
                .iter()
                .any(|&f| self.field_text(f).to_lowercase().contains(&needle))
    }
}

/// Raw text input for a new task, as typed into the entry form.
///
/// Values are validated and parsed by the task store on commit.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaskForm {
    pub part: String,
    pub setup: String,
    pub machine: String,
    pub quantity: String,
    pub time_per_unit: String,
    /// Empty reads as zero minutes.
    pub setup_time: String,
    /// `DD.MM.YYYY HH:MM`.
    pub start: String,
}

impl TaskForm {
    /// Creates a form with part, setup, and machine filled in.
    pub fn new(
        part: impl Into<String>,
        setup: impl Into<String>,
        machine: impl Into<String>,
    ) -> Self {
        Self {
            part: part.into(),
            setup: setup.into(),
            machine: machine.into(),
            ..Self::default()
        }
    }

    /// Sets the quantity.
    pub fn with_quantity(mut self, quantity: impl Into<String>) -> Self {
        self.quantity = quantity.into();
        self
    }

    /// Sets the time per unit (minutes).
    pub fn with_time_per_unit(mut self, time_per_unit: impl Into<String>) -> Self {
        self.time_per_unit = time_per_unit.into();
        self
    }

    /// Sets the setup time (minutes).
    pub fn with_setup_time(mut self, setup_time: impl Into<String>) -> Self {
        self.setup_time = setup_time.into();
        self
    }

    /// Sets the start timestamp.
    pub fn with_start(mut self, start: impl Into<String>) -> Self {
        self.start = start.into();
        self
    }
}

/// A set of raw field replacements for an existing task.
///
/// Applied as a pass-through edit: no dependent field is recomputed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskPatch {
    changes: Vec<(Field, String)>,
}

impl TaskPatch {
    /// Creates an empty patch.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces a field. A later value for the same field wins.
    pub fn with(mut self, field: Field, value: impl Into<String>) -> Self {
        self.changes.retain(|(f, _)| *f != field);
        self.changes.push((field, value.into()));
        self
    }

    /// Pending changes in insertion order.
    pub fn changes(&self) -> &[(Field, String)] {
        &self.changes
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }
}
