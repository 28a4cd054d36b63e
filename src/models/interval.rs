//! Time interval model.
//!
//! Task occupancy is a half-open interval `[start, end)`: two tasks that
//! merely touch at a boundary share no time.

use chrono::{NaiveDateTime, TimeDelta};
use serde::{Deserialize, Serialize};

/// Machine occupancy of one task, `[start, end)`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Interval {
    pub start: NaiveDateTime,
    /// First instant the machine is free again.
    pub end: NaiveDateTime,
}

impl Interval {
    /// Creates a new interval.
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> Self {
        Self { start, end }
    }

    /// Signed overlap length: `min(end) - max(start)`.
    ///
    /// Zero for touching intervals, negative for disjoint ones.
    pub fn overlap(&self, other: &Self) -> TimeDelta {
        self.end.min(other.end) - self.start.max(other.start)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(h: u32, m: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(h, m, s)
            .unwrap()
    }

    #[test]
    fn test_interval_overlap() {
        let a = Interval::new(at(8, 0, 0), at(10, 0, 0));
        let b = Interval::new(at(9, 0, 0), at(11, 0, 0));
        assert_eq!(a.overlap(&b), TimeDelta::hours(1));
        assert_eq!(b.overlap(&a), TimeDelta::hours(1));

        let c = Interval::new(at(10, 0, 0), at(12, 0, 0)); // touching but not overlapping
        assert_eq!(a.overlap(&c), TimeDelta::zero());
    }

    #[test]
    fn test_interval_disjoint_overlap_is_negative() {
        let a = Interval::new(at(8, 0, 0), at(9, 0, 0));
        let b = Interval::new(at(10, 0, 0), at(11, 0, 0));
        assert!(a.overlap(&b) < TimeDelta::zero());
    }

    #[test]
    fn test_interval_nested() {
        let outer = Interval::new(at(8, 0, 0), at(12, 0, 0));
        let inner = Interval::new(at(9, 0, 0), at(9, 0, 30));
        assert_eq!(outer.overlap(&inner), TimeDelta::seconds(30));
    }
}
