//! Rest and duty rules.
//!
//! Each employee is bound to one [`ShiftRule`]. The assignment engine asks
//! the rule, date by date, whether it claims the employee's cell, and
//! lends it the employee's [`RotationState`] for the call.
//!
//! # Phases
//!
//! Rules carry a [`Phase`] tag. The engine runs the whole month once per
//! phase, in this order, so that commitments are locked in before volume
//! balancing runs:
//!
//! | Phase | Rules |
//! |-------|-------|
//! | Baseline | `WeekendRest`, `FixedDaysRest`, `PeriodicRest` |
//! | WeeklyShape | `DirectorRule`, `WeekendRotationRule`, `JiangdongWeekendRule` |
//! | SpecialtyDuty | `SatelliteDutyRule`, `DevelopmentDutyRule` |
//! | MainDuty | `MainHospitalDutyRule` |
//! | Balancing | `InternalExternalRule` |
//!
//! # Usage
//!
//! ```
//! use duty_roster::models::Roster;
//! use duty_roster::rules::{DirectorRule, FixedDaysRest, WeekendRest};
//! use chrono::Weekday;
//!
//! let roster = Roster::new()
//!     .with_employee("Alice", WeekendRest)
//!     .with_employee("Bob", FixedDaysRest::new([Weekday::Mon, Weekday::Tue]).unwrap())
//!     .with_employee("Dora", DirectorRule::new());
//! assert_eq!(roster.len(), 3);
//! ```

mod balance;
mod duty;
mod rest;
mod state;
mod weekend;

pub use balance::InternalExternalRule;
pub use duty::{DevelopmentDutyRule, MainHospitalDutyRule, SatelliteDutyRule};
pub use rest::{DirectorRule, FixedDaysRest, PeriodicRest, WeekendRest};
pub use state::{RotationCursor, RotationState};
pub use weekend::{JiangdongWeekendRule, WeekendRotationRule};

use rand::RngCore;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

use crate::error::RuleConfigError;
use crate::models::{Day, RestDays, ScheduleGrid, ShiftStatus};

/// Evaluation group of a rule.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum Phase {
    /// Fixed weekly rest patterns.
    Baseline,
    /// Director exemptions and paired weekend duty.
    WeeklyShape,
    /// Satellite-site and development duty.
    SpecialtyDuty,
    /// Main hospital Friday duty.
    MainDuty,
    /// Internal/external balancing.
    Balancing,
}

impl Phase {
    /// Evaluation order.
    pub const ORDER: [Phase; 5] = [
        Phase::Baseline,
        Phase::WeeklyShape,
        Phase::SpecialtyDuty,
        Phase::MainDuty,
        Phase::Balancing,
    ];

    /// Short name for logs.
    pub fn label(self) -> &'static str {
        match self {
            Phase::Baseline => "baseline",
            Phase::WeeklyShape => "weekly-shape",
            Phase::SpecialtyDuty => "specialty-duty",
            Phase::MainDuty => "main-duty",
            Phase::Balancing => "balancing",
        }
    }
}

/// Answer of a rule for one cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleOutcome {
    /// No opinion; the cell keeps its current status.
    Unchanged,
    /// Write this status.
    Assign(ShiftStatus),
}

impl RuleOutcome {
    /// The status to write, if any.
    pub fn status(self) -> Option<ShiftStatus> {
        match self {
            RuleOutcome::Unchanged => None,
            RuleOutcome::Assign(status) => Some(status),
        }
    }
}

impl From<Option<ShiftStatus>> for RuleOutcome {
    fn from(status: Option<ShiftStatus>) -> Self {
        status.map_or(RuleOutcome::Unchanged, RuleOutcome::Assign)
    }
}

/// Read-only view handed to a rule for one (date, employee) cell.
#[derive(Debug, Clone, Copy)]
pub struct RuleContext<'a> {
    /// Day being decided.
    pub day: &'a Day,
    /// Employee the rule is bound to.
    pub employee: &'a str,
    /// Row of that employee in the grid.
    pub employee_index: usize,
    /// Grid as built so far.
    pub grid: &'a ScheduleGrid,
    /// The employee's rest/duty dates so far.
    pub rest_days: &'a RestDays,
}

impl RuleContext<'_> {
    /// Current status of the cell.
    #[inline]
    pub fn current(&self) -> ShiftStatus {
        self.grid.status_at(self.day.index, self.employee_index)
    }

    /// Whether the date is already spent on rest or duty.
    #[inline]
    pub fn is_rest_day(&self) -> bool {
        self.rest_days.contains(self.day.date)
    }

    /// Whether the cell is unavailable for a new claim.
    #[inline]
    pub fn is_taken(&self) -> bool {
        self.is_rest_day() || self.current().is_protected()
    }

    /// Status of another employee on the same date.
    pub fn status_of(&self, employee: &str) -> Option<ShiftStatus> {
        self.grid
            .employee_index(employee)
            .map(|idx| self.grid.status_at(self.day.index, idx))
    }
}

/// Configuration that must agree between employees sharing a rotation.
///
/// Each member holds its own copy of the rotation; validation compares
/// the copies so the members advance in lock-step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RotationKey {
    /// Two employees naming each other as partner.
    Pair {
        /// The other member.
        partner: String,
        /// Starting role. Both members must start on opposite roles.
        seed: Option<bool>,
        /// Weekly duty cycle, identical for both members.
        cycle: Vec<bool>,
        /// Starting slot of the cycle, identical for both members.
        cycle_offset: usize,
    },
    /// Ordered lists every listed member must hold identically.
    Group {
        /// Rotation or group lists.
        lists: Vec<Vec<String>>,
    },
}

impl RotationKey {
    /// Compares this member's key with the key of `peer`.
    ///
    /// `employee` is the owner of `self`. Returns a description of the
    /// first disagreement found.
    pub fn mismatch(&self, employee: &str, peer: Option<&RotationKey>) -> Option<String> {
        match (self, peer) {
            (
                RotationKey::Pair {
                    seed,
                    cycle,
                    cycle_offset,
                    ..
                },
                Some(RotationKey::Pair {
                    partner: back,
                    seed: peer_seed,
                    cycle: peer_cycle,
                    cycle_offset: peer_offset,
                }),
            ) => {
                if back != employee {
                    Some(format!("is paired with '{back}'"))
                } else if cycle != peer_cycle || cycle_offset != peer_offset {
                    Some("uses a different duty cycle".to_string())
                } else if matches!((seed, peer_seed), (Some(a), Some(b)) if a == b) {
                    Some("starts on the same role".to_string())
                } else {
                    None
                }
            }
            (RotationKey::Group { lists }, Some(RotationKey::Group { lists: peer_lists })) => {
                (lists != peer_lists).then(|| "holds a different rotation list".to_string())
            }
            _ => Some("holds no matching rotation".to_string()),
        }
    }
}

/// A per-employee rest/duty policy.
///
/// Rules are immutable configuration; everything that changes over the
/// month lives in the [`RotationState`] the engine passes in.
///
/// # Contract
/// `evaluate` is total: it never fails and signals "no opinion" with
/// [`RuleOutcome::Unchanged`]. Dates arrive in ascending order within the
/// rule's phase.
pub trait ShiftRule: Send + Sync + Debug {
    /// Rule name (e.g., "WeekendRest").
    fn name(&self) -> &'static str;

    /// Phase in which the engine evaluates this rule.
    fn phase(&self) -> Phase;

    /// Decides the cell described by `ctx`.
    fn evaluate(
        &self,
        ctx: &RuleContext<'_>,
        state: &mut RotationState,
        rng: &mut dyn RngCore,
    ) -> RuleOutcome;

    /// Rotation state at the start of a month.
    fn initial_state(&self) -> RotationState {
        RotationState::default()
    }

    /// Whether the weekly rest-quota pass skips employees with this rule.
    fn backfill_exempt(&self) -> bool {
        false
    }

    /// Other employees this rule refers to (partners, rotation members).
    fn referenced_employees(&self) -> Vec<&str> {
        Vec::new()
    }

    /// Rotation settings other members must mirror, if the rule shares one.
    fn rotation_key(&self) -> Option<RotationKey> {
        None
    }

    /// Checks that the rule can be bound to `employee`.
    fn check_binding(&self, _employee: &str) -> Result<(), RuleConfigError> {
        Ok(())
    }

    /// Rule description.
    fn description(&self) -> &'static str {
        self.name()
    }
}

/// Rejects a probability outside [0, 1].
pub(crate) fn check_probability(
    rule: &'static str,
    field: &'static str,
    value: f64,
) -> Result<f64, RuleConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err(RuleConfigError::InvalidProbability { rule, field, value })
    }
}

/// Rejects an empty or repeating rotation list.
pub(crate) fn check_rotation(
    rule: &'static str,
    field: &'static str,
    names: &[String],
) -> Result<(), RuleConfigError> {
    if names.is_empty() {
        return Err(RuleConfigError::EmptyRotation { rule, field });
    }
    for (i, name) in names.iter().enumerate() {
        if names[..i].contains(name) {
            return Err(RuleConfigError::DuplicateInRotation {
                rule,
                field,
                name: name.clone(),
            });
        }
    }
    Ok(())
}
