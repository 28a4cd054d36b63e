//! Display window partitioning.
//!
//! Maps "now" and a range selector to the `(min, max)` bounds of the
//! Gantt view.
//!
//! | Range | min | max |
//! |-------|-----|-----|
//! | Day | today 00:00 | today 23:59:59 |
//! | Week | Monday 00:00 | next Monday 00:00 |
//! | Month | 1st 00:00 | last day 23:59:59 |
//!
//! The week bound is exclusive-style while day and month end one second
//! before the next period. Tasks starting exactly at next Monday 00:00
//! therefore still fall on the week axis.
//!
//! The window only bounds what is displayed; stored tasks are never
//! filtered by it.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Months, NaiveDateTime, NaiveTime, TimeDelta};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Gantt view range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum RangeSelector {
    Day,
    #[default]
    Week,
    Month,
}

impl RangeSelector {
    pub fn as_str(self) -> &'static str {
        match self {
            RangeSelector::Day => "Day",
            RangeSelector::Week => "Week",
            RangeSelector::Month => "Month",
        }
    }
}

impl fmt::Display for RangeSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RangeSelector {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "Day" => Ok(RangeSelector::Day),
            "Week" => Ok(RangeSelector::Week),
            "Month" => Ok(RangeSelector::Month),
            other => Err(Error::invalid_input(format!(
                "unknown range '{other}', expected Day, Week or Month"
            ))),
        }
    }
}

/// Inclusive `(min, max)` axis bounds of the Gantt view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayWindow {
    pub min: NaiveDateTime,
    pub max: NaiveDateTime,
}

impl DisplayWindow {
    /// Whether a timestamp lies on the axis.
    pub fn contains(&self, ts: NaiveDateTime) -> bool {
        ts >= self.min && ts <= self.max
    }

    /// Whether any part of `[start, end)` is visible.
    pub fn intersects(&self, start: NaiveDateTime, end: NaiveDateTime) -> bool {
        start <= self.max && end > self.min
    }
}

/// Computes the display window containing `now`.
///
/// # Errors
/// `InvalidInput` only when a bound falls outside the representable
/// calendar.
pub fn compute_window(now: NaiveDateTime, range: RangeSelector) -> Result<DisplayWindow> {
    let out_of_range = || Error::invalid_input("display window is out of range");
    let today = now.date();

    let (min, max) = match range {
        RangeSelector::Day => {
            let min = today.and_time(NaiveTime::MIN);
            let max = min
                .checked_add_signed(TimeDelta::days(1) - TimeDelta::seconds(1))
                .ok_or_else(out_of_range)?;
            (min, max)
        }
        RangeSelector::Week => {
            let back = TimeDelta::days(i64::from(today.weekday().num_days_from_monday()));
            let monday = today.checked_sub_signed(back).ok_or_else(out_of_range)?;
            let min = monday.and_time(NaiveTime::MIN);
            let max = min
                .checked_add_signed(TimeDelta::days(7))
                .ok_or_else(out_of_range)?;
            (min, max)
        }
        RangeSelector::Month => {
            let first = today.with_day(1).ok_or_else(out_of_range)?;
            let last = first
                .checked_add_months(Months::new(1))
                .and_then(|next| next.pred_opt())
                .ok_or_else(out_of_range)?;
            let max = last
                .and_hms_opt(23, 59, 59)
                .ok_or_else(out_of_range)?;
            (first.and_time(NaiveTime::MIN), max)
        }
    };

    Ok(DisplayWindow { min, max })
}
