//! Nomenclature (catalog) model.
//!
//! A nomenclature entry records the known per-unit processing time of one
//! setup of one part on one machine. The `(part, setup, machine)` triple
//! is the entry's natural key.

use serde::{Deserialize, Serialize};

use super::RecordId;

/// A known part/setup/machine/time combination.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NomenclatureEntry {
    /// Unique record identifier, assigned by the catalog.
    pub id: RecordId,
    /// Part name, conventionally `"<type> <drawing-number>"`.
    pub part: String,
    /// Setup (operation) number.
    pub setup: u32,
    /// Machine name.
    pub machine: String,
    /// Processing time per unit (minutes).
    pub time_per_unit: f64,
}

impl NomenclatureEntry {
    /// Whether this entry has the given natural key.
    #[inline]
    pub fn is_keyed(&self, part: &str, setup: u32, machine: &str) -> bool {
        self.part == part && self.setup == setup && self.machine == machine
    }

    /// Case-insensitive substring match against every displayed column.
    pub fn matches(&self, needle: &str) -> bool {
        let needle = needle.to_lowercase();
        [
            self.id.to_string(),
            self.part.clone(),
            self.setup.to_string(),
            self.machine.clone(),
            self.time_per_unit.to_string(),
        ]
        .iter()
        .any(|v| v.to_lowercase().contains(&needle))
    }
}

/// Raw text input for a catalog entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NomenclatureForm {
    pub part: String,
    pub setup: String,
    pub machine: String,
    pub time_per_unit: String,
}

impl NomenclatureForm {
    /// Creates a form from raw field values.
    pub fn new(
        part: impl Into<String>,
        setup: impl Into<String>,
        machine: impl Into<String>,
        time_per_unit: impl Into<String>,
    ) -> Self {
        Self {
            part: part.into(),
            setup: setup.into(),
            machine: machine.into(),
            time_per_unit: time_per_unit.into(),
        }
    }

    /// Creates a form whose part name is composed from type and drawing number.
    pub fn from_drawing(
        part_type: &str,
        drawing_number: &str,
        setup: impl Into<String>,
        machine: impl Into<String>,
        time_per_unit: impl Into<String>,
    ) -> Self {
        Self::new(
            format!("{} {}", part_type.trim(), drawing_number.trim()),
            setup,
            machine,
            time_per_unit,
        )
    }
}
