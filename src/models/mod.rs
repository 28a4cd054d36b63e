//! Planning domain models.
//!
//! Plain data types owned by the task store and the catalog. They carry
//! no back-references; derived data (conflicts, display windows, Gantt
//! bars) is computed from snapshots of them.
//!
//! # Domain Mappings
//!
//! | u-gantt | Shop floor |
//! |---------|-----------|
//! | TaskRecord | Planned batch of one setup on one machine |
//! | NomenclatureEntry | Standard time for a part setup on a machine |
//! | Interval | Machine occupancy |

mod interval;
mod nomenclature;
mod task;

pub use interval::Interval;
pub use nomenclature::{NomenclatureEntry, NomenclatureForm};
pub use task::{TaskForm, TaskPatch, TaskRecord};

/// Record identifier. Positive, unique within its store.
pub type RecordId = u32;
