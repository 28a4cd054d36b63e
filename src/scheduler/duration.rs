//! Task duration and end-time computation.
//!
//! # Formula
//!
//! `duration_hours = quantity * time_per_unit / 60 + setup_time / 60`
//!
//! with `time_per_unit` and `setup_time` in minutes. The duration is
//! resolved to whole microseconds, then truncated to whole minutes
//! (seconds are dropped, not rounded). The end time always lies at least
//! one minute after the start.

use chrono::{NaiveDateTime, TimeDelta};

use crate::error::{Error, Result};

const MICROS_PER_MINUTE: i64 = 60_000_000;
const MICROS_PER_HOUR: f64 = 3_600_000_000.0;

/// Task duration in hours.
#[inline]
pub fn duration_hours(quantity: u32, time_per_unit: f64, setup_time: f64) -> f64 {
    f64::from(quantity) * time_per_unit / 60.0 + setup_time / 60.0
}

/// Computes a task's end time.
///
/// # Errors
/// `InvalidInput` if `quantity` is zero, `time_per_unit` is not a positive
/// finite number, `setup_time` is negative or not finite, or the end time
/// falls outside the representable calendar.
///
/// # Example
///
/// ```
/// use chrono::NaiveDate;
/// use u_gantt::scheduler::compute_end;
///
/// let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap().and_hms_opt(8, 0, 0).unwrap();
/// let end = compute_end(start, 100, 2.5, 30.0).unwrap();
/// assert_eq!(end, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap().and_hms_opt(12, 40, 0).unwrap());
/// ```
pub fn compute_end(
    start: NaiveDateTime,
    quantity: u32,
    time_per_unit: f64,
    setup_time: f64,
) -> Result<NaiveDateTime> {
    if quantity == 0 {
        return Err(Error::invalid_input("quantity must be positive"));
    }
    if !(time_per_unit.is_finite() && time_per_unit > 0.0) {
        return Err(Error::invalid_input("time per unit must be positive"));
    }
    if !(setup_time.is_finite() && setup_time >= 0.0) {
        return Err(Error::invalid_input("setup time must not be negative"));
    }

    let micros = (duration_hours(quantity, time_per_unit, setup_time) * MICROS_PER_HOUR).round();
    if micros >= i64::MAX as f64 {
        return Err(Error::invalid_input("task duration is too long"));
    }
    let minutes = (micros as i64 / MICROS_PER_MINUTE).max(1);
    TimeDelta::try_minutes(minutes)
        .and_then(|delta| start.checked_add_signed(delta))
        .ok_or_else(|| Error::invalid_input("end time is out of range"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use proptest::prelude::*;

    fn at(d: u32, h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, d)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    #[test]
    fn test_flange_example() {
        // 100 * 2.5 / 60 + 30 / 60 = 4.666.. h = 280 min
        let end = compute_end(at(1, 8, 0), 100, 2.5, 30.0).unwrap();
        assert_eq!(end, at(1, 12, 40));
    }

    #[test]
    fn test_duration_hours() {
        assert!((duration_hours(100, 2.5, 30.0) - 14.0 / 3.0).abs() < 1e-12);
        assert_eq!(duration_hours(60, 1.0, 0.0), 1.0);
    }

    #[test]
    fn test_partial_minute_is_truncated() {
        // 2.6 min: seconds are dropped
        assert_eq!(compute_end(at(1, 8, 0), 1, 2.6, 0.0).unwrap(), at(1, 8, 2));
        // 7 * 0.75 = 5.25 min
        assert_eq!(compute_end(at(1, 8, 0), 7, 0.75, 0.0).unwrap(), at(1, 8, 5));
        // 59.9 min stays in the first hour
        assert_eq!(compute_end(at(1, 8, 0), 1, 59.9, 0.0).unwrap(), at(1, 8, 59));
    }

    #[test]
    fn test_inexact_hours_land_on_the_minute() {
        // 0.1 h is not exact in binary; the microsecond step keeps it at 6 min
        assert_eq!(compute_end(at(1, 8, 0), 3, 2.0, 0.0).unwrap(), at(1, 8, 6));
        assert_eq!(compute_end(at(1, 8, 0), 1, 0.1, 19.9).unwrap(), at(1, 8, 20));
    }

    #[test]
    fn test_crosses_midnight() {
        let end = compute_end(at(1, 22, 0), 3, 60.0, 0.0).unwrap();
        assert_eq!(end, at(2, 1, 0));
    }

    #[test]
    fn test_sub_minute_duration_still_ends_after_start() {
        let end = compute_end(at(1, 8, 0), 1, 0.2, 0.0).unwrap();
        assert_eq!(end, at(1, 8, 1));
    }

    #[test]
    fn test_invalid_input() {
        let start = at(1, 8, 0);
        assert!(matches!(
            compute_end(start, 0, 2.5, 0.0),
            Err(Error::InvalidInput(_))
        ));
        assert!(matches!(
            compute_end(start, 10, 0.0, 0.0),
            Err(Error::InvalidInput(_))
        ));
        assert!(matches!(
            compute_end(start, 10, -1.0, 0.0),
            Err(Error::InvalidInput(_))
        ));
        assert!(matches!(
            compute_end(start, 10, f64::NAN, 0.0),
            Err(Error::InvalidInput(_))
        ));
        assert!(matches!(
            compute_end(start, 10, 1.0, -5.0),
            Err(Error::InvalidInput(_))
        ));
    }

    #[test]
    fn test_out_of_range() {
        assert!(matches!(
            compute_end(at(1, 8, 0), u32::MAX, 1e300, 0.0),
            Err(Error::InvalidInput(_))
        ));
        assert!(matches!(
            compute_end(NaiveDateTime::MAX, 1, 1.0, 0.0),
            Err(Error::InvalidInput(_))
        ));
    }

    proptest! {
        #[test]
        fn prop_end_after_start_and_matches_formula(
            quantity in 1u32..10_000,
            time_per_unit in 0.01f64..600.0,
            setup_time in 0.0f64..1_000.0,
            offset_min in 0i64..1_000_000,
        ) {
            let start = at(1, 0, 0) + TimeDelta::minutes(offset_min);
            let end = compute_end(start, quantity, time_per_unit, setup_time).unwrap();
            prop_assert!(end > start);

            let expected_min = duration_hours(quantity, time_per_unit, setup_time) * 60.0;
            let actual_min = (end - start).num_minutes() as f64;
            prop_assert!((actual_min - expected_min).abs() <= 1.0);
        }
    }
}
