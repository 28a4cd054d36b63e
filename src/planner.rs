//! Planner session.
//!
//! Bundles the catalog, the task store, the settings-derived validator,
//! and a conflict cache. The host UI renders read-only snapshots and
//! issues mutations through this type; it never holds domain data itself.
//!
//! # Conflict Cache
//! Conflicts are recomputed from scratch, but only when the task store's
//! revision differs from the one the cache was built for. Every store
//! mutation bumps the revision, so the cached set always matches the
//! current snapshot.

use std::io::ErrorKind;
use std::path::Path;

use chrono::NaiveDateTime;
use log::{info, warn};

use crate::config::Settings;
use crate::csv_io;
use crate::error::{Error, Result};
use crate::gantt::{self, GanttLayout};
use crate::import::{self, ImportReport, NOMENCLATURE_HEADER, TASK_HEADER};
use crate::models::{NomenclatureForm, RecordId, TaskForm, TaskPatch};
use crate::scheduler::{compute_window, detect_conflicts, ConflictSet, DisplayWindow, RangeSelector};
use crate::store::{Catalog, TaskStore};
use crate::validation::{Field, Validator};

#[derive(Debug, Clone, Default)]
struct ConflictCache {
    revision: Option<u64>,
    conflicts: ConflictSet,
}

/// Counters for a status line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlanSummary {
    pub tasks: usize,
    pub catalog_entries: usize,
}

/// An interactive planning session.
#[derive(Debug, Clone)]
pub struct Planner {
    settings: Settings,
    validator: Validator,
    catalog: Catalog,
    tasks: TaskStore,
    cache: ConflictCache,
}

impl Planner {
    /// Creates an empty session for the given settings.
    pub fn new(settings: Settings) -> Self {
        Self {
            validator: Validator::from_settings(&settings),
            settings,
            catalog: Catalog::new(),
            tasks: TaskStore::new(),
            cache: ConflictCache::default(),
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn validator(&self) -> &Validator {
        &self.validator
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn tasks(&self) -> &TaskStore {
        &self.tasks
    }

    /// Direct store access for reorder and filter operations.
    pub fn tasks_mut(&mut self) -> &mut TaskStore {
        &mut self.tasks
    }

    /// Adds a machine to the display order and the validator.
    pub fn add_machine(&mut self, name: &str) -> Result<()> {
        self.settings.add_machine(name)?;
        self.validator = Validator::from_settings(&self.settings);
        Ok(())
    }

    /// Removes a machine. Existing tasks on it are kept.
    pub fn remove_machine(&mut self, name: &str) -> bool {
        let removed = self.settings.remove_machine(name);
        if removed {
            self.validator = Validator::from_settings(&self.settings);
        }
        removed
    }

    /// Catalog time per unit for a part setup on a machine.
    pub fn fill_time_per_unit(&self, part: &str, setup: &str, machine: &str) -> Result<Option<f64>> {
        let part = self.validator.text(Field::Part, part)?;
        let setup = self.validator.positive_integer(Field::Setup, setup)?;
        let machine = self.validator.text(Field::Machine, machine)?;
        Ok(self
            .catalog
            .lookup(&part, setup, &machine)
            .map(|e| e.time_per_unit))
    }

    /// Part names for autocomplete.
    pub fn part_suggestions(&self, prefix: &str) -> Vec<String> {
        let prefix = prefix.to_lowercase();
        self.catalog
            .all_part_names()
            .into_iter()
            .filter(|p| p.to_lowercase().starts_with(&prefix))
            .collect()
    }

    pub fn add_task(&mut self, form: &TaskForm) -> Result<RecordId> {
        self.tasks.add(form, &self.validator)
    }

    pub fn update_task(&mut self, id: RecordId, patch: &TaskPatch) -> Result<()> {
        self.tasks.update(id, patch, &self.validator)
    }

    /// Recomputes a task's end from its current inputs.
    pub fn reschedule(&mut self, id: RecordId) -> Result<NaiveDateTime> {
        self.tasks.reschedule(id)
    }

    pub fn delete_task(&mut self, id: RecordId) -> Result<()> {
        self.tasks.delete(id).map(|_| ())
    }

    pub fn clear_tasks(&mut self) {
        self.tasks.clear();
    }

    pub fn add_nomenclature(&mut self, form: &NomenclatureForm) -> Result<RecordId> {
        self.catalog.add(form, &self.validator)
    }

    pub fn update_nomenclature(&mut self, id: RecordId, form: &NomenclatureForm) -> Result<()> {
        self.catalog.update(id, form, &self.validator)
    }

    pub fn delete_nomenclature(&mut self, id: RecordId) -> Result<()> {
        self.catalog.delete(id).map(|_| ())
    }

    /// Conflicts for the current task snapshot.
    pub fn conflicts(&mut self) -> &ConflictSet {
        let revision = self.tasks.revision();
        if self.cache.revision != Some(revision) {
            self.cache.conflicts = detect_conflicts(self.tasks.snapshot());
            self.cache.revision = Some(revision);
        }
        &self.cache.conflicts
    }

    /// Display window for the configured default range.
    pub fn window(&self, now: NaiveDateTime) -> Result<DisplayWindow> {
        compute_window(now, self.settings.default_range)
    }

    pub fn window_for(&self, now: NaiveDateTime, range: RangeSelector) -> Result<DisplayWindow> {
        compute_window(now, range)
    }

    /// Gantt bars for the current snapshot.
    pub fn gantt(&mut self) -> GanttLayout {
        self.conflicts();
        gantt::layout(self.tasks.snapshot(), &self.settings, &self.cache.conflicts)
    }

    pub fn summary(&self) -> PlanSummary {
        PlanSummary {
            tasks: self.tasks.len(),
            catalog_entries: self.catalog.len(),
        }
    }

    /// Startup load of the last catalog file. Bad rows are skipped.
    ///
    /// Does nothing when no file is configured or the file is gone.
    pub fn load_catalog_silently(&mut self) -> Result<Option<ImportReport>> {
        let Some(path) = self.settings.last_opened_file.clone() else {
            return Ok(None);
        };
        let rows = match csv_io::read_rows_from_path(&path, self.settings.delimiter()?) {
            Ok(rows) => rows,
            Err(Error::Io(e)) if e.kind() == ErrorKind::NotFound => {
                warn!("Catalog file {} not found, starting empty", path.display());
                return Ok(None);
            }
            Err(e) => return Err(e),
        };
        let report = import::load_catalog_lenient(&mut self.catalog, &rows, &self.validator);
        Ok(Some(report))
    }

    /// Interactive catalog open. Any bad row rejects the file.
    pub fn open_catalog(&mut self, path: &Path) -> Result<usize> {
        let rows = csv_io::read_rows_from_path(path, self.settings.delimiter()?)?;
        let loaded = import::load_catalog_strict(&mut self.catalog, &rows, &self.validator)?;
        self.settings.last_opened_file = Some(path.to_path_buf());
        info!("Opened catalog {}", path.display());
        Ok(loaded)
    }

    /// Writes the catalog and remembers the file.
    pub fn save_catalog(&mut self, path: &Path) -> Result<()> {
        let rows = import::export_catalog_rows(self.catalog.entries());
        csv_io::write_rows_to_path(path, self.settings.delimiter()?, &NOMENCLATURE_HEADER, &rows)?;
        self.settings.last_opened_file = Some(path.to_path_buf());
        Ok(())
    }

    /// Closes the catalog file and empties the catalog.
    pub fn close_catalog(&mut self) {
        self.catalog.clear();
        self.settings.last_opened_file = None;
    }

    /// Replaces all tasks with the contents of a task file.
    pub fn import_tasks(&mut self, path: &Path) -> Result<usize> {
        let rows = csv_io::read_rows_from_path(path, self.settings.delimiter()?)?;
        import::load_tasks_strict(&mut self.tasks, &rows, &self.validator)
    }

    /// Writes all tasks in display order.
    pub fn export_tasks(&self, path: &Path) -> Result<()> {
        let rows = import::export_task_rows(self.tasks.snapshot());
        csv_io::write_rows_to_path(path, self.settings.delimiter()?, &TASK_HEADER, &rows)
    }
}

impl Default for Planner {
    fn default() -> Self {
        Self::new(Settings::default())
    }
}
