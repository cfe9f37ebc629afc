//! Rotating specialty and main duty.
//!
//! # Shared Rotations
//! A rotation list is walked by every member's rule instance. Each instance
//! advances its own cursor once per matching date, so all instances agree
//! on whose turn it is; only the instance whose employee holds the turn
//! claims the cell (and, where a probability applies, draws from the
//! random source).

use chrono::Weekday;
use rand::{Rng, RngCore};

use super::weekend::check_partner;
use super::{
    check_probability, check_rotation, Phase, RotationCursor, RotationKey, RotationState,
    RuleContext, RuleOutcome, ShiftRule,
};
use crate::error::RuleConfigError;
use crate::models::ShiftStatus;

/// Main hospital duty, round-robin on Fridays.
///
/// The cursor starts at the head of the ordered list and moves one slot
/// per Friday. When it reaches the employee's own list position, the
/// employee takes `MainDuty`, unless:
/// - the cell is already protected (the turn is deferred, i.e. lost), or
/// - the previous main duty lies within [`MIN_DUTY_GAP_DAYS`] days.
///
/// [`MIN_DUTY_GAP_DAYS`]: MainHospitalDutyRule::MIN_DUTY_GAP_DAYS
#[derive(Debug, Clone)]
pub struct MainHospitalDutyRule {
    rotation: Vec<String>,
}

impl MainHospitalDutyRule {
    /// Weekday on which main duty is assigned.
    pub const DUTY_WEEKDAY: Weekday = Weekday::Fri;

    /// Two main duties of one employee must be more than this many days apart.
    pub const MIN_DUTY_GAP_DAYS: i64 = 4;

    /// Creates the rule over an ordered, non-empty rotation.
    pub fn new<S: Into<String>>(rotation: impl IntoIterator<Item = S>) -> Result<Self, RuleConfigError> {
        let rotation: Vec<String> = rotation.into_iter().map(Into::into).collect();
        check_rotation("MainHospitalDuty", "rotation", &rotation)?;
        Ok(Self { rotation })
    }

    /// Ordered rotation.
    pub fn rotation(&self) -> &[String] {
        &self.rotation
    }

    fn position_of(&self, employee: &str) -> Option<usize> {
        self.rotation.iter().position(|n| n == employee)
    }
}

impl ShiftRule for MainHospitalDutyRule {
    fn name(&self) -> &'static str {
        "MainHospitalDuty"
    }

    fn phase(&self) -> Phase {
        Phase::MainDuty
    }

    fn initial_state(&self) -> RotationState {
        RotationState {
            cursor: RotationCursor::new(0, self.rotation.len()),
            ..Default::default()
        }
    }

    fn evaluate(
        &self,
        ctx: &RuleContext<'_>,
        state: &mut RotationState,
        _rng: &mut dyn RngCore,
    ) -> RuleOutcome {
        if ctx.day.weekday != Self::DUTY_WEEKDAY {
            return RuleOutcome::Unchanged;
        }
        let turn = state.cursor.advance();
        if self.position_of(ctx.employee) != Some(turn) {
            return RuleOutcome::Unchanged;
        }
        if ctx.current().is_protected() {
            return RuleOutcome::Unchanged;
        }
        if state
            .days_since_duty(ctx.day.date)
            .is_some_and(|days| days <= Self::MIN_DUTY_GAP_DAYS)
        {
            return RuleOutcome::Unchanged;
        }
        state.record_duty(ctx.day.date);
        RuleOutcome::Assign(ShiftStatus::MainDuty)
    }

    fn referenced_employees(&self) -> Vec<&str> {
        self.rotation.iter().map(String::as_str).collect()
    }

    fn rotation_key(&self) -> Option<RotationKey> {
        Some(RotationKey::Group {
            lists: vec![self.rotation.clone()],
        })
    }

    fn check_binding(&self, employee: &str) -> Result<(), RuleConfigError> {
        match self.position_of(employee) {
            Some(_) => Ok(()),
            None => Err(RuleConfigError::NotInRotation {
                rule: self.name(),
                employee: employee.to_string(),
            }),
        }
    }

    fn description(&self) -> &'static str {
        "Round-robin Friday main duty with a minimum gap"
    }
}

/// Development duty on Wednesday to Friday, shared by a pair.
///
/// The employee takes `DevelopmentDuty` until the monthly limit is reached,
/// provided the partner is not on development duty the same date and the
/// date is still free.
#[derive(Debug, Clone)]
pub struct DevelopmentDutyRule {
    partner: String,
    monthly_limit: u32,
}

impl DevelopmentDutyRule {
    /// Default number of development duties per month.
    pub const DEFAULT_MONTHLY_LIMIT: u32 = 4;

    /// Creates the rule with the default monthly limit.
    pub fn new(partner: impl Into<String>) -> Self {
        Self {
            partner: partner.into(),
            monthly_limit: Self::DEFAULT_MONTHLY_LIMIT,
        }
    }

    /// Sets the monthly limit (must be positive).
    pub fn with_monthly_limit(mut self, limit: u32) -> Result<Self, RuleConfigError> {
        if limit == 0 {
            return Err(RuleConfigError::ZeroValue {
                rule: "DevelopmentDuty",
                field: "monthly_limit",
            });
        }
        self.monthly_limit = limit;
        Ok(self)
    }

    /// Paired employee.
    pub fn partner(&self) -> &str {
        &self.partner
    }
}

impl ShiftRule for DevelopmentDutyRule {
    fn name(&self) -> &'static str {
        "DevelopmentDuty"
    }

    fn phase(&self) -> Phase {
        Phase::SpecialtyDuty
    }

    fn evaluate(
        &self,
        ctx: &RuleContext<'_>,
        state: &mut RotationState,
        _rng: &mut dyn RngCore,
    ) -> RuleOutcome {
        if !matches!(ctx.day.weekday, Weekday::Wed | Weekday::Thu | Weekday::Fri) {
            return RuleOutcome::Unchanged;
        }
        if ctx.is_taken() || state.duty_count >= self.monthly_limit {
            return RuleOutcome::Unchanged;
        }
        if ctx.status_of(&self.partner) == Some(ShiftStatus::DevelopmentDuty) {
            return RuleOutcome::Unchanged;
        }
        state.record_duty(ctx.day.date);
        RuleOutcome::Assign(ShiftStatus::DevelopmentDuty)
    }

    fn referenced_employees(&self) -> Vec<&str> {
        vec![self.partner.as_str()]
    }

    fn rotation_key(&self) -> Option<RotationKey> {
        Some(RotationKey::Pair {
            partner: self.partner.clone(),
            seed: None,
            cycle: Vec::new(),
            cycle_offset: 0,
        })
    }

    fn check_binding(&self, employee: &str) -> Result<(), RuleConfigError> {
        check_partner(self.name(), employee, &self.partner)
    }

    fn description(&self) -> &'static str {
        "Paired Wednesday-Friday development duty with a monthly limit"
    }
}

/// Satellite-site (Jiangdong) duty rotation.
///
/// Monday and Tuesday follow the early rotation; Wednesday through Sunday
/// follow the late rotation. On Fridays and weekends the turn-holder only
/// takes the duty if an acceptance draw passes, which thins out duty on
/// those days.
#[derive(Debug, Clone)]
pub struct SatelliteDutyRule {
    early_rotation: Vec<String>,
    late_rotation: Vec<String>,
    friday_acceptance: f64,
    weekend_acceptance: f64,
}

impl SatelliteDutyRule {
    /// Default acceptance probability on Fridays.
    pub const DEFAULT_FRIDAY_ACCEPTANCE: f64 = 0.5;
    /// Default acceptance probability on Saturdays and Sundays.
    pub const DEFAULT_WEEKEND_ACCEPTANCE: f64 = 0.5;

    /// Creates the rule from the Monday/Tuesday and the Wednesday-Sunday lists.
    pub fn new<S: Into<String>>(
        early_rotation: impl IntoIterator<Item = S>,
        late_rotation: impl IntoIterator<Item = S>,
    ) -> Result<Self, RuleConfigError> {
        let early_rotation: Vec<String> = early_rotation.into_iter().map(Into::into).collect();
        let late_rotation: Vec<String> = late_rotation.into_iter().map(Into::into).collect();
        check_rotation("SatelliteDuty", "early_rotation", &early_rotation)?;
        check_rotation("SatelliteDuty", "late_rotation", &late_rotation)?;
        Ok(Self {
            early_rotation,
            late_rotation,
            friday_acceptance: Self::DEFAULT_FRIDAY_ACCEPTANCE,
            weekend_acceptance: Self::DEFAULT_WEEKEND_ACCEPTANCE,
        })
    }

    /// Sets the Friday and weekend acceptance probabilities.
    pub fn with_acceptance(mut self, friday: f64, weekend: f64) -> Result<Self, RuleConfigError> {
        self.friday_acceptance = check_probability("SatelliteDuty", "friday_acceptance", friday)?;
        self.weekend_acceptance =
            check_probability("SatelliteDuty", "weekend_acceptance", weekend)?;
        Ok(self)
    }

    /// Probability that the turn-holder takes the duty on `weekday`.
    pub fn acceptance(&self, weekday: Weekday) -> f64 {
        match weekday {
            Weekday::Fri => self.friday_acceptance,
            Weekday::Sat | Weekday::Sun => self.weekend_acceptance,
            _ => 1.0,
        }
    }

    fn is_early(weekday: Weekday) -> bool {
        matches!(weekday, Weekday::Mon | Weekday::Tue)
    }
}

impl ShiftRule for SatelliteDutyRule {
    fn name(&self) -> &'static str {
        "SatelliteDuty"
    }

    fn phase(&self) -> Phase {
        Phase::SpecialtyDuty
    }

    fn initial_state(&self) -> RotationState {
        RotationState {
            cursor: RotationCursor::new(0, self.early_rotation.len()),
            alt_cursor: RotationCursor::new(0, self.late_rotation.len()),
            ..Default::default()
        }
    }

    fn evaluate(
        &self,
        ctx: &RuleContext<'_>,
        state: &mut RotationState,
        rng: &mut dyn RngCore,
    ) -> RuleOutcome {
        let weekday = ctx.day.weekday;
        let (rotation, turn) = if Self::is_early(weekday) {
            (&self.early_rotation, state.cursor.advance())
        } else {
            (&self.late_rotation, state.alt_cursor.advance())
        };
        if rotation.get(turn).map(String::as_str) != Some(ctx.employee) {
            return RuleOutcome::Unchanged;
        }
        if ctx.is_taken() {
            return RuleOutcome::Unchanged;
        }
        let acceptance = self.acceptance(weekday);
        if acceptance < 1.0 && !rng.random_bool(acceptance) {
            return RuleOutcome::Unchanged;
        }
        state.record_duty(ctx.day.date);
        RuleOutcome::Assign(ShiftStatus::SatelliteDuty)
    }

    fn referenced_employees(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.early_rotation.iter().map(String::as_str).collect();
        for name in &self.late_rotation {
            if !names.contains(&name.as_str()) {
                names.push(name);
            }
        }
        names
    }

    fn rotation_key(&self) -> Option<RotationKey> {
        Some(RotationKey::Group {
            lists: vec![self.early_rotation.clone(), self.late_rotation.clone()],
        })
    }

    fn check_binding(&self, employee: &str) -> Result<(), RuleConfigError> {
        let listed = self.early_rotation.iter().any(|n| n == employee)
            || self.late_rotation.iter().any(|n| n == employee);
        if listed {
            Ok(())
        } else {
            Err(RuleConfigError::NotInRotation {
                rule: self.name(),
                employee: employee.to_string(),
            })
        }
    }

    fn description(&self) -> &'static str {
        "Satellite-site round-robin with Friday/weekend acceptance"
    }
}
