//! Field-level input validation.
//!
//! Every mutation of the task store or the catalog passes through this
//! gate first. Checks are syntactic:
//! - Machine names must belong to the configured machine set
//! - Timestamps must read `DD.MM.YYYY HH:MM`
//! - Decimals accept `.` or `,` as the separator
//! - Integers must be all digits and greater than zero
//!
//! Empty numeric values pass [`check_rule`] (the user has not typed
//! anything yet). Commit paths use the typed parsers on [`Validator`],
//! which reject empty input.

use std::fmt;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::config::Settings;

/// Timestamp format used for display, import, and export.
pub const DATETIME_FORMAT: &str = "%d.%m.%Y %H:%M";

/// Record fields that accept user input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Field {
    Part,
    Setup,
    Machine,
    Quantity,
    TimePerUnit,
    SetupTime,
    Start,
    End,
}

/// Syntactic rule applied to a field's raw text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldRule {
    /// Any text.
    Text,
    /// Member of the allowed value set.
    Enumerated,
    /// `DD.MM.YYYY HH:MM`.
    DateTime,
    /// Unsigned decimal with `.` or `,` as separator.
    PositiveDecimal,
    /// Digits only, value > 0.
    PositiveInteger,
}

impl Field {
    /// All fields in row order.
    pub const ALL: [Field; 8] = [
        Field::Part,
        Field::Setup,
        Field::Machine,
        Field::Quantity,
        Field::TimePerUnit,
        Field::SetupTime,
        Field::Start,
        Field::End,
    ];

    /// The rule that governs this field.
    pub fn rule(self) -> FieldRule {
        match self {
            Field::Part => FieldRule::Text,
            Field::Machine => FieldRule::Enumerated,
            Field::Setup | Field::Quantity => FieldRule::PositiveInteger,
            Field::TimePerUnit | Field::SetupTime => FieldRule::PositiveDecimal,
            Field::Start | Field::End => FieldRule::DateTime,
        }
    }

    /// Column heading used in exported rows.
    pub fn label(self) -> &'static str {
        match self {
            Field::Part => "Part",
            Field::Setup => "Setup",
            Field::Machine => "Machine",
            Field::Quantity => "Qty",
            Field::TimePerUnit => "Time/unit",
            Field::SetupTime => "Setup time",
            Field::Start => "Start date",
            Field::End => "End date",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A field that failed validation.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("invalid {field}: {reason}")]
pub struct ValidationError {
    /// Offending field.
    pub field: Field,
    /// Human-readable description.
    pub reason: String,
}

impl ValidationError {
    fn new(field: Field, reason: impl Into<String>) -> Self {
        Self {
            field,
            reason: reason.into(),
        }
    }
}

/// Checks raw text against a rule.
///
/// `allowed` is consulted only by [`FieldRule::Enumerated`]. Empty input
/// passes the numeric rules.
pub fn check_rule(rule: FieldRule, raw: &str, allowed: &[String]) -> Result<(), String> {
    match rule {
        FieldRule::Text => Ok(()),
        FieldRule::Enumerated => {
            if allowed.iter().any(|v| v == raw) {
                Ok(())
            } else {
                Err(format!("value must be one of: {}", allowed.join(",")))
            }
        }
        FieldRule::DateTime => NaiveDateTime::parse_from_str(raw, DATETIME_FORMAT)
            .map(|_| ())
            .map_err(|_| "invalid date, expected DD.MM.YYYY HH:MM".to_string()),
        FieldRule::PositiveDecimal => {
            if raw.is_empty() || is_decimal(raw) {
                Ok(())
            } else {
                Err("value must be a positive number".to_string())
            }
        }
        FieldRule::PositiveInteger => {
            if raw.is_empty() {
                return Ok(());
            }
            if !raw.bytes().all(|b| b.is_ascii_digit()) {
                return Err("value must be a positive integer".to_string());
            }
            match raw.parse::<u32>() {
                Ok(0) => Err("value must be a positive integer".to_string()),
                Ok(_) => Ok(()),
                Err(_) => Err("value is too large".to_string()),
            }
        }
    }
}

/// Matches `^\d*([.,]?\d+)?$`.
fn is_decimal(raw: &str) -> bool {
    let digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
    match raw.find(['.', ',']) {
        Some(pos) => {
            let (int, frac) = (&raw[..pos], &raw[pos + 1..]);
            digits(int) && !frac.is_empty() && digits(frac)
        }
        None => digits(raw),
    }
}

/// Trims and replaces a `,` decimal separator with `.`.
pub fn normalize_decimal(raw: &str) -> String {
    raw.trim().replace(',', ".")
}

/// Formats a timestamp as `DD.MM.YYYY HH:MM`.
pub fn format_timestamp(ts: &NaiveDateTime) -> String {
    ts.format(DATETIME_FORMAT).to_string()
}

/// Validation gate bound to a machine set snapshot.
///
/// The machine list is owned by the configuration; the validator keeps
/// an immutable copy and never mutates it.
#[derive(Debug, Clone, Default)]
pub struct Validator {
    machines: Vec<String>,
}

impl Validator {
    /// Creates a validator that accepts the given machine names.
    pub fn new<I, S>(machines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            machines: machines.into_iter().map(Into::into).collect(),
        }
    }

    /// Creates a validator from the configured machine list.
    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(settings.machines.iter().cloned())
    }

    /// Allowed machine names.
    pub fn machines(&self) -> &[String] {
        &self.machines
    }

    /// Syntactic check of a field, as done while typing.
    ///
    /// Never mutates state. Empty numeric values pass.
    pub fn validate(&self, field: Field, raw: &str) -> Result<(), ValidationError> {
        check_rule(field.rule(), raw, &self.machines)
            .map_err(|reason| ValidationError::new(field, reason))
    }

    /// Non-empty trimmed text.
    pub fn text(&self, field: Field, raw: &str) -> Result<String, ValidationError> {
        let value = raw.trim();
        if value.is_empty() {
            return Err(ValidationError::new(field, "must not be empty"));
        }
        Ok(value.to_string())
    }

    /// A configured machine name.
    pub fn machine(&self, raw: &str) -> Result<String, ValidationError> {
        let value = self.text(Field::Machine, raw)?;
        self.validate(Field::Machine, &value)?;
        Ok(value)
    }

    /// A positive integer (setup number or quantity).
    pub fn positive_integer(&self, field: Field, raw: &str) -> Result<u32, ValidationError> {
        let value = self.text(field, raw)?;
        check_rule(FieldRule::PositiveInteger, &value, &[])
            .map_err(|reason| ValidationError::new(field, reason))?;
        value
            .parse()
            .map_err(|_| ValidationError::new(field, "value must be a positive integer"))
    }

    /// Minutes strictly greater than zero (time per unit).
    pub fn positive_minutes(&self, field: Field, raw: &str) -> Result<f64, ValidationError> {
        let minutes = self.minutes(field, raw)?;
        if minutes > 0.0 {
            Ok(minutes)
        } else {
            Err(ValidationError::new(field, "value must be greater than zero"))
        }
    }

    /// Non-negative minutes (setup time). Empty input reads as zero.
    pub fn setup_minutes(&self, raw: &str) -> Result<f64, ValidationError> {
        if raw.trim().is_empty() {
            return Ok(0.0);
        }
        self.minutes(Field::SetupTime, raw)
    }

    fn minutes(&self, field: Field, raw: &str) -> Result<f64, ValidationError> {
        let value = normalize_decimal(&self.text(field, raw)?);
        check_rule(FieldRule::PositiveDecimal, &value, &[])
            .map_err(|reason| ValidationError::new(field, reason))?;
        // "5" and ".5" both parse; is_decimal guarantees no other shapes.
        let minutes: f64 = value
            .parse()
            .map_err(|_| ValidationError::new(field, "value must be a positive number"))?;
        if minutes.is_finite() {
            Ok(minutes)
        } else {
            Err(ValidationError::new(field, "value is too large"))
        }
    }

    /// A `DD.MM.YYYY HH:MM` timestamp.
    pub fn timestamp(&self, field: Field, raw: &str) -> Result<NaiveDateTime, ValidationError> {
        let value = self.text(field, raw)?;
        NaiveDateTime::parse_from_str(&value, DATETIME_FORMAT).map_err(|_| {
            ValidationError::new(field, "invalid date, expected DD.MM.YYYY HH:MM")
        })
    }
}
