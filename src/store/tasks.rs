//! Task store.
//!
//! Ordered, single-owner collection of task records. Display order is
//! insertion order until [`TaskStore::reorder_by`] establishes another.
//!
//! Every mutation bumps a revision counter so derived data (conflicts)
//! can be cached per revision.

use std::cmp::Ordering;

use chrono::NaiveDateTime;
use log::debug;

use super::next_id;
use crate::error::{Error, Result};
use crate::models::{RecordId, TaskForm, TaskPatch, TaskRecord};
use crate::scheduler::compute_end;
use crate::validation::{Field, ValidationError, Validator};

/// Ordered collection of task records.
#[derive(Debug, Clone, Default)]
pub struct TaskStore {
    records: Vec<TaskRecord>,
    revision: u64,
}

impl TaskStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Mutation counter. Changes on every successful mutation.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// All records in display order.
    pub fn snapshot(&self) -> &[TaskRecord] {
        &self.records
    }

    /// Finds a record by id.
    pub fn get(&self, id: RecordId) -> Option<&TaskRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    fn position(&self, id: RecordId) -> Result<usize> {
        self.records
            .iter()
            .position(|r| r.id == id)
            .ok_or(Error::NotFound { id })
    }

    fn touch(&mut self) {
        self.revision = self.revision.wrapping_add(1);
    }

    /// Adds a task entered by hand.
    ///
    /// Validates every field, computes the end time from quantity, time
    /// per unit, and setup time, then appends the record. Conflicts are
    /// not checked: overlapping tasks are accepted and reported later.
    pub fn add(&mut self, form: &TaskForm, validator: &Validator) -> Result<RecordId> {
        let part = validator.text(Field::Part, &form.part)?;
        let setup = validator.positive_integer(Field::Setup, &form.setup)?;
        let machine = validator.machine(&form.machine)?;
        let quantity = validator.positive_integer(Field::Quantity, &form.quantity)?;
        let time_per_unit = validator.positive_minutes(Field::TimePerUnit, &form.time_per_unit)?;
        let setup_time = validator.setup_minutes(&form.setup_time)?;
        let start = validator.timestamp(Field::Start, &form.start)?;
        let end = compute_end(start, quantity, time_per_unit, setup_time)?;

        let id = next_id(self.records.iter().map(|r| r.id))?;
        self.records.push(TaskRecord {
            id,
            part,
            setup,
            machine,
            quantity,
            time_per_unit,
            setup_time,
            start,
            end,
        });
        self.touch();
        debug!("Task {id} added, ends {end}");
        Ok(id)
    }

    /// Replaces fields of an existing task.
    ///
    /// Every change is validated before any is applied. Dependent fields
    /// are NOT recomputed: editing quantity or start leaves `end` as
    /// stored. Use [`TaskStore::reschedule`] to recompute explicitly.
    pub fn update(&mut self, id: RecordId, patch: &TaskPatch, validator: &Validator) -> Result<()> {
        let index = self.position(id)?;
        let mut updated = self.records[index].clone();
        for (field, raw) in patch.changes() {
            apply_field(&mut updated, *field, raw, validator)?;
        }
        self.records[index] = updated;
        self.touch();
        debug!("Task {id} updated ({} field(s))", patch.changes().len());
        Ok(())
    }

    /// Recomputes a task's end from its current start, quantity, time
    /// per unit, and setup time.
    pub fn reschedule(&mut self, id: RecordId) -> Result<NaiveDateTime> {
        let index = self.position(id)?;
        let record = &self.records[index];
        let end = compute_end(
            record.start,
            record.quantity,
            record.time_per_unit,
            record.setup_time,
        )?;
        self.records[index].end = end;
        self.touch();
        debug!("Task {id} rescheduled, ends {end}");
        Ok(end)
    }

    /// Removes a task, returning it.
    pub fn delete(&mut self, id: RecordId) -> Result<TaskRecord> {
        let index = self.position(id)?;
        let removed = self.records.remove(index);
        self.touch();
        debug!("Task {id} deleted");
        Ok(removed)
    }

    /// Removes every task.
    pub fn clear(&mut self) {
        self.records.clear();
        self.touch();
    }

    /// Replaces the whole store (bulk load).
    ///
    /// Ids are reassigned `1..=n` in the given order.
    pub fn replace_all(&mut self, records: Vec<TaskRecord>) {
        self.records = records;
        for (record, id) in self.records.iter_mut().zip(1..) {
            record.id = id;
        }
        self.touch();
    }

    /// Stable sort by a caller-supplied comparator.
    pub fn reorder_by<F>(&mut self, compare: F)
    where
        F: FnMut(&TaskRecord, &TaskRecord) -> Ordering,
    {
        self.records.sort_by(compare);
        self.touch();
    }

    /// Stable sort by one column.
    pub fn sort_by_field(&mut self, field: Field, descending: bool) {
        self.reorder_by(|a, b| {
            let ord = a.cmp_by(b, field);
            if descending {
                ord.reverse()
            } else {
                ord
            }
        });
    }

    /// Records whose displayed text contains `text` (case-insensitive).
    ///
    /// An empty filter returns everything.
    pub fn filter(&self, text: &str) -> Vec<&TaskRecord> {
        if text.is_empty() {
            return self.records.iter().collect();
        }
        self.records.iter().filter(|r| r.matches(text)).collect()
    }
}

/// Parses one raw value into the record.
fn apply_field(
    record: &mut TaskRecord,
    field: Field,
    raw: &str,
    validator: &Validator,
) -> std::result::Result<(), ValidationError> {
    match field {
        Field::Part => record.part = validator.text(field, raw)?,
        Field::Setup => record.setup = validator.positive_integer(field, raw)?,
        Field::Machine => record.machine = validator.machine(raw)?,
        Field::Quantity => record.quantity = validator.positive_integer(field, raw)?,
        Field::TimePerUnit => record.time_per_unit = validator.positive_minutes(field, raw)?,
        Field::SetupTime => record.setup_time = validator.setup_minutes(raw)?,
        Field::Start => record.start = validator.timestamp(field, raw)?,
        Field::End => record.end = validator.timestamp(field, raw)?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn validator() -> Validator {
        Validator::new(["DMU-70", "HAAS VF-3"])
    }

    fn at(d: u32, h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, d)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    fn flange() -> TaskForm {
        TaskForm::new("Flange A", "1", "DMU-70")
            .with_quantity("100")
            .with_time_per_unit("2.5")
            .with_setup_time("30")
            .with_start("01.01.2024 08:00")
    }

    #[test]
    fn test_add_computes_end() {
        let mut store = TaskStore::new();
        let id = store.add(&flange(), &validator()).unwrap();
        assert_eq!(id, 1);

        let t = store.get(id).unwrap();
        assert_eq!(t.start, at(1, 8, 0));
        assert_eq!(t.end, at(1, 12, 40));
        assert_eq!(t.setup_time, 30.0);
    }

    #[test]
    fn test_add_accepts_comma_decimal() {
        let mut store = TaskStore::new();
        let id = store
            .add(&flange().with_time_per_unit("2,5"), &validator())
            .unwrap();
        assert_eq!(store.get(id).unwrap().time_per_unit, 2.5);
    }

    #[test]
    fn test_add_validation_errors() {
        let mut store = TaskStore::new();
        let v = validator();

        let err = store
            .add(&flange().with_quantity("0"), &v)
            .unwrap_err();
        assert!(matches!(err, Error::Validation(ValidationError { field: Field::Quantity, .. })));

        let mut unknown_machine = flange();
        unknown_machine.machine = "DMU-99".into();
        let err = store.add(&unknown_machine, &v).unwrap_err();
        assert!(matches!(err, Error::Validation(ValidationError { field: Field::Machine, .. })));

        let err = store.add(&flange().with_start("2024-01-01 08:00"), &v).unwrap_err();
        assert!(matches!(err, Error::Validation(ValidationError { field: Field::Start, .. })));

        let err = store.add(&flange().with_time_per_unit("0"), &v).unwrap_err();
        assert!(matches!(err, Error::Validation(ValidationError { field: Field::TimePerUnit, .. })));

        assert!(store.is_empty());
        assert_eq!(store.revision(), 0);
    }

    #[test]
    fn test_add_allows_overlap() {
        let mut store = TaskStore::new();
        store.add(&flange(), &validator()).unwrap();
        store.add(&flange(), &validator()).unwrap();
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_ids_max_plus_one() {
        let mut store = TaskStore::new();
        let v = validator();
        let a = store.add(&flange(), &v).unwrap();
        let b = store.add(&flange(), &v).unwrap();
        let c = store.add(&flange(), &v).unwrap();
        assert_eq!((a, b, c), (1, 2, 3));

        store.delete(2).unwrap();
        assert_eq!(store.add(&flange(), &v).unwrap(), 4);

        store.delete(4).unwrap();
        store.delete(3).unwrap();
        assert_eq!(store.add(&flange(), &v).unwrap(), 2);
    }

    #[test]
    fn test_update_is_pass_through() {
        let mut store = TaskStore::new();
        let v = validator();
        let id = store.add(&flange(), &v).unwrap();

        let patch = TaskPatch::new()
            .with(Field::Quantity, "200")
            .with(Field::Start, "02.01.2024 08:00");
        store.update(id, &patch, &v).unwrap();

        let t = store.get(id).unwrap();
        assert_eq!(t.quantity, 200);
        assert_eq!(t.start, at(2, 8, 0));
        // End stays as stored
        assert_eq!(t.end, at(1, 12, 40));
    }

    #[test]
    fn test_update_is_atomic() {
        let mut store = TaskStore::new();
        let v = validator();
        let id = store.add(&flange(), &v).unwrap();
        let before = store.get(id).unwrap().clone();
        let revision = store.revision();

        let patch = TaskPatch::new()
            .with(Field::Part, "Changed")
            .with(Field::Machine, "nope");
        assert!(store.update(id, &patch, &v).is_err());
        assert_eq!(store.get(id).unwrap(), &before);
        assert_eq!(store.revision(), revision);
    }

    #[test]
    fn test_update_rejects_empty_field() {
        let mut store = TaskStore::new();
        let v = validator();
        let id = store.add(&flange(), &v).unwrap();
        let err = store
            .update(id, &TaskPatch::new().with(Field::Part, " "), &v)
            .unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[test]
    fn test_update_and_delete_not_found() {
        let mut store = TaskStore::new();
        let v = validator();
        assert!(matches!(
            store.update(9, &TaskPatch::new(), &v),
            Err(Error::NotFound { id: 9 })
        ));
        assert!(matches!(store.delete(9), Err(Error::NotFound { id: 9 })));
        assert!(matches!(store.reschedule(9), Err(Error::NotFound { id: 9 })));
    }

    #[test]
    fn test_reschedule() {
        let mut store = TaskStore::new();
        let v = validator();
        let id = store.add(&flange(), &v).unwrap();
        store
            .update(id, &TaskPatch::new().with(Field::Quantity, "40"), &v)
            .unwrap();

        // 40 * 2.5 + 30 = 130 min
        let end = store.reschedule(id).unwrap();
        assert_eq!(end, at(1, 10, 10));
        assert_eq!(store.get(id).unwrap().end, end);
    }

    #[test]
    fn test_clear_and_revision() {
        let mut store = TaskStore::new();
        store.add(&flange(), &validator()).unwrap();
        let rev = store.revision();
        store.clear();
        assert!(store.is_empty());
        assert!(store.revision() > rev);
    }

    #[test]
    fn test_replace_all_reassigns_ids() {
        let mut store = TaskStore::new();
        let v = validator();
        store.add(&flange(), &v).unwrap();
        let mut records: Vec<_> = store.snapshot().to_vec();
        records[0].id = 42;
        records.push(records[0].clone());

        store.replace_all(records);
        let ids: Vec<_> = store.snapshot().iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn test_reorder_is_stable() {
        let mut store = TaskStore::new();
        let v = validator();
        store.add(&flange().with_quantity("5"), &v).unwrap();
        store.add(&flange().with_quantity("3"), &v).unwrap();
        store.add(&flange().with_quantity("5"), &v).unwrap();
        store.add(&flange().with_quantity("10"), &v).unwrap();

        store.sort_by_field(Field::Quantity, false);
        let ids: Vec<_> = store.snapshot().iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![2, 1, 3, 4]);

        store.sort_by_field(Field::Quantity, true);
        let ids: Vec<_> = store.snapshot().iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![4, 1, 3, 2]);

        store.reorder_by(|a, b| b.id.cmp(&a.id));
        let ids: Vec<_> = store.snapshot().iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![4, 3, 2, 1]);
    }

    #[test]
    fn test_filter() {
        let mut store = TaskStore::new();
        let v = validator();
        store.add(&flange(), &v).unwrap();
        let mut other = TaskForm::new("Shaft B", "2", "HAAS VF-3")
            .with_quantity("1")
            .with_time_per_unit("10")
            .with_start("01.01.2024 08:00");
        other.setup_time = String::new();
        store.add(&other, &v).unwrap();

        assert_eq!(store.filter("").len(), 2);
        let hits = store.filter("haas");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].part, "Shaft B");
        assert!(store.filter("nothing").is_empty());
    }
}
