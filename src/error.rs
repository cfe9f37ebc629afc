//! Error types.
//!
//! Configuration problems surface when rules, rosters or engines are
//! built. Evaluating a month never fails: rules answer with a status or
//! leave the cell alone, and an unmet rest quota is reported in the
//! outcome rather than raised.

use chrono::NaiveDate;
use thiserror::Error;

use crate::validation::ValidationError;

/// A rule was constructed or bound with an inconsistent configuration.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RuleConfigError {
    /// A week period or limit that must be positive was zero.
    #[error("{rule}: `{field}` must be greater than zero")]
    ZeroValue {
        rule: &'static str,
        field: &'static str,
    },
    /// A weekday set that drives the rule is empty.
    #[error("{rule}: `{field}` must name at least one weekday")]
    EmptyDaySet {
        rule: &'static str,
        field: &'static str,
    },
    /// A rotation or group list is empty.
    #[error("{rule}: `{field}` must list at least one employee")]
    EmptyRotation {
        rule: &'static str,
        field: &'static str,
    },
    /// The same name appears twice in one rotation list.
    #[error("{rule}: `{name}` appears more than once in `{field}`")]
    DuplicateInRotation {
        rule: &'static str,
        field: &'static str,
        name: String,
    },
    /// A rotation cycle has no slots.
    #[error("{rule}: rotation cycle must have at least one slot")]
    EmptyCycle { rule: &'static str },
    /// The starting slot lies outside the cycle.
    #[error("{rule}: cycle offset {offset} is out of range for a cycle of {len}")]
    CycleOffsetOutOfRange {
        rule: &'static str,
        offset: usize,
        len: usize,
    },
    /// A probability is not within [0, 1].
    #[error("{rule}: `{field}` must be within [0, 1], got {value}")]
    InvalidProbability {
        rule: &'static str,
        field: &'static str,
        value: f64,
    },
    /// A paired rule names its own employee as the partner.
    #[error("{rule}: `{employee}` cannot be paired with itself")]
    SelfPairing {
        rule: &'static str,
        employee: String,
    },
    /// The bound employee is missing from the rule's own rotation.
    #[error("{rule}: `{employee}` is not part of the rotation")]
    NotInRotation {
        rule: &'static str,
        employee: String,
    },
}

/// Failure to set up a scheduling run.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScheduleError {
    /// The requested (year, month) is not a calendar month.
    #[error("invalid month {month} for year {year}")]
    InvalidMonth { year: i32, month: u32 },
    /// The roster failed validation.
    #[error("invalid roster ({} issue(s)): {}", .0.len(), summarize(.0))]
    InvalidRoster(Vec<ValidationError>),
    /// A rule could not be built.
    #[error(transparent)]
    Rule(#[from] RuleConfigError),
}

/// A grid read back from storage whose parts do not fit together.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GridShapeError {
    /// The cell table is not `days × employees` long.
    #[error("grid has {cells} cells, expected {days} days x {employees} employees")]
    CellCount {
        cells: usize,
        days: usize,
        employees: usize,
    },
    /// Dates repeat or go backwards.
    #[error("grid dates are not strictly ascending at {date}")]
    UnorderedDates { date: NaiveDate },
}

fn summarize(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}
