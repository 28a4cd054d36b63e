//! Nomenclature catalog.
//!
//! Ordered collection of known part/setup/machine/time combinations.
//! The `(part, setup, machine)` triple is unique: a duplicate insert is
//! rejected with the id of the entry already holding that triple.

use log::debug;

use super::next_id;
use crate::error::{Error, Result};
use crate::models::{NomenclatureEntry, NomenclatureForm, RecordId};
use crate::validation::{Field, Validator};

/// Parsed catalog fields, before an id is attached.
struct ParsedEntry {
    part: String,
    setup: u32,
    machine: String,
    time_per_unit: f64,
}

/// Ordered collection of nomenclature entries.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    entries: Vec<NomenclatureEntry>,
}

impl Catalog {
    /// Creates an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All entries in display order.
    pub fn entries(&self) -> &[NomenclatureEntry] {
        &self.entries
    }

    /// Finds an entry by id.
    pub fn get(&self, id: RecordId) -> Option<&NomenclatureEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    fn parse(form: &NomenclatureForm, validator: &Validator) -> Result<ParsedEntry> {
        Ok(ParsedEntry {
            part: validator.text(Field::Part, &form.part)?,
            setup: validator.positive_integer(Field::Setup, &form.setup)?,
            machine: validator.machine(&form.machine)?,
            time_per_unit: validator.positive_minutes(Field::TimePerUnit, &form.time_per_unit)?,
        })
    }

    /// Id of an entry holding the triple, other than `except`.
    fn duplicate_of(&self, parsed: &ParsedEntry, except: Option<RecordId>) -> Option<RecordId> {
        self.entries
            .iter()
            .filter(|e| Some(e.id) != except)
            .find(|e| e.is_keyed(&parsed.part, parsed.setup, &parsed.machine))
            .map(|e| e.id)
    }

    /// Adds an entry.
    ///
    /// # Errors
    /// - `Validation` if any field fails
    /// - `DuplicateEntry` if the triple already exists (nothing inserted)
    pub fn add(&mut self, form: &NomenclatureForm, validator: &Validator) -> Result<RecordId> {
        let parsed = Self::parse(form, validator)?;
        if let Some(existing_id) = self.duplicate_of(&parsed, None) {
            return Err(Error::DuplicateEntry { existing_id });
        }

        let id = next_id(self.entries.iter().map(|e| e.id))?;
        self.entries.push(NomenclatureEntry {
            id,
            part: parsed.part,
            setup: parsed.setup,
            machine: parsed.machine,
            time_per_unit: parsed.time_per_unit,
        });
        debug!("Nomenclature {id} added");
        Ok(id)
    }

    /// Exact lookup by `(part, setup, machine)`.
    pub fn lookup(&self, part: &str, setup: u32, machine: &str) -> Option<&NomenclatureEntry> {
        self.entries.iter().find(|e| e.is_keyed(part, setup, machine))
    }

    /// Replaces an entry's fields. The id never changes.
    ///
    /// # Errors
    /// - `NotFound` if no entry has `id`
    /// - `Validation` if any field fails
    /// - `DuplicateEntry` if the new triple belongs to another entry
    pub fn update(
        &mut self,
        id: RecordId,
        form: &NomenclatureForm,
        validator: &Validator,
    ) -> Result<()> {
        let index = self
            .entries
            .iter()
            .position(|e| e.id == id)
            .ok_or(Error::NotFound { id })?;
        let parsed = Self::parse(form, validator)?;
        if let Some(existing_id) = self.duplicate_of(&parsed, Some(id)) {
            return Err(Error::DuplicateEntry { existing_id });
        }

        let entry = &mut self.entries[index];
        entry.part = parsed.part;
        entry.setup = parsed.setup;
        entry.machine = parsed.machine;
        entry.time_per_unit = parsed.time_per_unit;
        debug!("Nomenclature {id} updated");
        Ok(())
    }

    /// Removes an entry, returning it.
    pub fn delete(&mut self, id: RecordId) -> Result<NomenclatureEntry> {
        let index = self
            .entries
            .iter()
            .position(|e| e.id == id)
            .ok_or(Error::NotFound { id })?;
        debug!("Nomenclature {id} deleted");
        Ok(self.entries.remove(index))
    }

    /// Removes every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Replaces the whole catalog (bulk load). Ids are reassigned `1..=n`.
    ///
    /// The caller guarantees the triples are unique.
    pub fn replace_all(&mut self, entries: Vec<NomenclatureEntry>) {
        self.entries = entries;
        for (entry, id) in self.entries.iter_mut().zip(1..) {
            entry.id = id;
        }
    }

    /// Every part name in catalog order, duplicates included.
    pub fn all_part_names(&self) -> Vec<String> {
        self.entries.iter().map(|e| e.part.clone()).collect()
    }

    /// Entries whose displayed text contains `text` (case-insensitive).
    pub fn filter(&self, text: &str) -> Vec<&NomenclatureEntry> {
        if text.is_empty() {
            return self.entries.iter().collect();
        }
        self.entries.iter().filter(|e| e.matches(text)).collect()
    }
}
