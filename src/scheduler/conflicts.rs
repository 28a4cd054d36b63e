//! Machine conflict detection.
//!
//! Two tasks conflict when they run on the same machine and their
//! `[start, end)` intervals overlap by at least [`MIN_CONFLICT_OVERLAP_SECS`].
//! Tasks that touch at a boundary never conflict.
//!
//! # Algorithms
//!
//! - [`detect_conflicts`]: group by machine, compare every unordered pair.
//!   O(k²) per machine group of size k.
//! - [`detect_conflicts_sweep`]: per machine, sort by start and keep an
//!   active list of intervals that can still reach the threshold.
//!   O(k log k + conflicts) per machine.
//!
//! Both produce the same [`ConflictSet`].

use std::collections::{BTreeSet, HashMap};

use chrono::TimeDelta;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::models::{RecordId, TaskRecord};

/// Minimum overlap (seconds) for two tasks to conflict.
pub const MIN_CONFLICT_OVERLAP_SECS: i64 = 30;

fn min_overlap() -> TimeDelta {
    TimeDelta::seconds(MIN_CONFLICT_OVERLAP_SECS)
}

/// An unordered pair of conflicting task ids, stored as `(low, high)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ConflictPair {
    pub first: RecordId,
    pub second: RecordId,
}

impl ConflictPair {
    /// Creates a pair; argument order does not matter.
    pub fn new(a: RecordId, b: RecordId) -> Self {
        Self {
            first: a.min(b),
            second: a.max(b),
        }
    }

    /// Whether this pair involves a task.
    #[inline]
    pub fn involves(&self, id: RecordId) -> bool {
        self.first == id || self.second == id
    }
}

/// Conflicting task pairs for one snapshot of the task store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConflictSet {
    pairs: BTreeSet<ConflictPair>,
}

impl ConflictSet {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    fn insert(&mut self, a: RecordId, b: RecordId) {
        if a != b {
            self.pairs.insert(ConflictPair::new(a, b));
        }
    }

    /// Whether tasks `a` and `b` conflict (in either order).
    pub fn contains(&self, a: RecordId, b: RecordId) -> bool {
        self.pairs.contains(&ConflictPair::new(a, b))
    }

    /// Whether a task is part of any conflict.
    pub fn involves(&self, id: RecordId) -> bool {
        self.pairs.iter().any(|p| p.involves(id))
    }

    /// Ids of every task involved in at least one conflict.
    pub fn conflicting_ids(&self) -> BTreeSet<RecordId> {
        self.pairs
            .iter()
            .flat_map(|p| [p.first, p.second])
            .collect()
    }

    /// Pairs in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = &ConflictPair> {
        self.pairs.iter()
    }

    /// Number of conflicting pairs.
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

/// Groups records by machine, keeping snapshot order within each group.
fn group_by_machine(records: &[TaskRecord]) -> HashMap<&str, Vec<&TaskRecord>> {
    let mut groups: HashMap<&str, Vec<&TaskRecord>> = HashMap::new();
    for record in records {
        groups.entry(record.machine.as_str()).or_default().push(record);
    }
    groups
}

/// Detects conflicts by pairwise comparison within each machine.
///
/// # Algorithm
/// For every unordered pair `(i, j)`, `i < j`, on the same machine:
/// `overlap = min(end_i, end_j) - max(start_i, start_j)`. The pair
/// conflicts iff `overlap >= 30 s`.
pub fn detect_conflicts(records: &[TaskRecord]) -> ConflictSet {
    let mut conflicts = ConflictSet::new();
    let threshold = min_overlap();

    for tasks in group_by_machine(records).values() {
        for (i, a) in tasks.iter().enumerate() {
            for b in &tasks[i + 1..] {
                if a.interval().overlap(&b.interval()) >= threshold {
                    conflicts.insert(a.id, b.id);
                }
            }
        }
    }

    debug!(
        "Conflict scan: {} task(s), {} conflicting pair(s)",
        records.len(),
        conflicts.len()
    );
    conflicts
}

/// Detects conflicts with a per-machine sweep line.
///
/// # Algorithm
/// 1. Sort each machine's tasks by start.
/// 2. Before visiting a task, drop active tasks ending less than 30 s
///    after its start. No later task (starting no earlier) can reach
///    the threshold with them.
/// 3. Compare the task against the remaining active tasks with the same
///    overlap formula as [`detect_conflicts`].
pub fn detect_conflicts_sweep(records: &[TaskRecord]) -> ConflictSet {
    let mut conflicts = ConflictSet::new();
    let threshold = min_overlap();

    for mut tasks in group_by_machine(records).into_values() {
        tasks.sort_by_key(|t| t.start);
        let mut active: Vec<&TaskRecord> = Vec::new();

        for task in tasks {
            active.retain(|a| a.end - task.start >= threshold);
            for a in &active {
                if a.interval().overlap(&task.interval()) >= threshold {
                    conflicts.insert(a.id, task.id);
                }
            }
            active.push(task);
        }
    }

    conflicts
}
