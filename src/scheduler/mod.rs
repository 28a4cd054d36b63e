//! Stateless scheduling computations.
//!
//! Provides end-time computation, machine conflict detection, and Gantt
//! display windows. None of these own state: each call is a pure
//! transform over a snapshot of the task store, so the host recomputes
//! after every mutation.
//!
//! # Conflict Rule
//!
//! Two tasks conflict when they share a machine and their `[start, end)`
//! intervals overlap by at least 30 seconds. Touching intervals never
//! conflict.

mod conflicts;
mod duration;
mod window;

pub use conflicts::{
    detect_conflicts, detect_conflicts_sweep, ConflictPair, ConflictSet,
    MIN_CONFLICT_OVERLAP_SECS,
};
pub use duration::{compute_end, duration_hours};
pub use window::{compute_window, DisplayWindow, RangeSelector};
