//! Gantt chart projection.
//!
//! Turns a task snapshot into plain bar data for a renderer: one row per
//! configured machine, one bar per task, a conflict flag per bar. Colors,
//! axis ticks, and layout are left to the renderer.

use chrono::NaiveDateTime;
use log::warn;
use serde::{Deserialize, Serialize};

use crate::config::Settings;
use crate::models::{RecordId, TaskRecord};
use crate::scheduler::{ConflictSet, DisplayWindow};

/// One task bar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GanttBar {
    pub task_id: RecordId,
    /// Index of the machine in the configured display order.
    pub machine_row: usize,
    /// Legend text (part name).
    pub label: String,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    /// Whether the task overlaps another on the same machine.
    pub conflicting: bool,
}

/// Bars for a whole snapshot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GanttLayout {
    /// Bars in snapshot order.
    pub bars: Vec<GanttBar>,
    /// Tasks whose machine is not in the configured list.
    pub unplaced: Vec<RecordId>,
}

impl GanttLayout {
    /// Bars with any part inside the window.
    pub fn visible_in<'a>(&'a self, window: &'a DisplayWindow) -> impl Iterator<Item = &'a GanttBar> {
        self.bars
            .iter()
            .filter(move |bar| window.intersects(bar.start, bar.end))
    }
}

/// Lays out task bars against the configured machine display order.
pub fn layout(records: &[TaskRecord], settings: &Settings, conflicts: &ConflictSet) -> GanttLayout {
    let conflicting = conflicts.conflicting_ids();
    let mut result = GanttLayout::default();

    for record in records {
        match settings.machine_index(&record.machine) {
            Some(machine_row) => result.bars.push(GanttBar {
                task_id: record.id,
                machine_row,
                label: record.part.clone(),
                start: record.start,
                end: record.end,
                conflicting: conflicting.contains(&record.id),
            }),
            None => {
                warn!(
                    "Task {} uses unconfigured machine '{}'",
                    record.id,
                    record.machine
                );
                result.unplaced.push(record.id);
            }
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduler::{compute_window, detect_conflicts, RangeSelector};
    use chrono::{NaiveDate, TimeDelta};

    fn at(d: u32, h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, d)
            .unwrap()
            .and_hms_opt(h, 0, 0)
            .unwrap()
    }

    fn task(id: RecordId, machine: &str, start: NaiveDateTime, hours: i64) -> TaskRecord {
        TaskRecord {
            id,
            part: format!("Part {id}"),
            setup: 1,
            machine: machine.into(),
            quantity: 1,
            time_per_unit: 60.0,
            setup_time: 0.0,
            start,
            end: start + TimeDelta::hours(hours),
        }
    }

    fn settings() -> Settings {
        Settings {
            machines: vec!["M1".into(), "M2".into()],
            ..Settings::default()
        }
    }

    #[test]
    fn test_layout_rows_and_conflicts() {
        let records = vec![
            task(1, "M2", at(15, 8), 4),
            task(2, "M2", at(15, 10), 2),
            task(3, "M1", at(15, 8), 1),
        ];
        let conflicts = detect_conflicts(&records);
        let gantt = layout(&records, &settings(), &conflicts);

        assert_eq!(gantt.bars.len(), 3);
        assert_eq!(gantt.bars[0].machine_row, 1);
        assert_eq!(gantt.bars[2].machine_row, 0);
        assert!(gantt.bars[0].conflicting);
        assert!(gantt.bars[1].conflicting);
        assert!(!gantt.bars[2].conflicting);
        assert_eq!(gantt.bars[2].label, "Part 3");
    }

    #[test]
    fn test_rows_follow_settings_order() {
        let records = vec![task(1, "M1", at(15, 8), 1), task(2, "M2", at(15, 8), 1)];
        let mut settings = settings();
        settings.remove_machine("M1");
        settings.add_machine("M1").unwrap();

        let gantt = layout(&records, &settings, &ConflictSet::new());
        let rows: Vec<_> = gantt.bars.iter().map(|b| (b.task_id, b.machine_row)).collect();
        assert_eq!(rows, vec![(1, 1), (2, 0)]);
    }

    #[test]
    fn test_unplaced_machine() {
        let records = vec![task(1, "Retired", at(15, 8), 1)];
        let gantt = layout(&records, &settings(), &ConflictSet::new());
        assert!(gantt.bars.is_empty());
        assert_eq!(gantt.unplaced, vec![1]);
    }

    #[test]
    fn test_visible_in_window() {
        let records = vec![
            task(1, "M1", at(15, 8), 1),
            task(2, "M1", at(16, 8), 1),
            task(3, "M1", at(14, 22), 4), // spans midnight into the 15th
        ];
        let gantt = layout(&records, &settings(), &ConflictSet::new());
        let day = compute_window(at(15, 12), RangeSelector::Day).unwrap();
        let visible: Vec<_> = gantt.visible_in(&day).map(|b| b.task_id).collect();
        assert_eq!(visible, vec![1, 3]);

        // Storage is not filtered
        assert_eq!(gantt.bars.len(), 3);
    }
}
