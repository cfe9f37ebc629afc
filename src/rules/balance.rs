//! Internal/external balancing.

use rand::{Rng, RngCore};

use super::{
    check_probability, check_rotation, Phase, RotationKey, RotationState, RuleContext,
    RuleOutcome, ShiftRule,
};
use crate::error::RuleConfigError;
use crate::models::ShiftStatus;

/// Spreads internal (in-office) days evenly across a group.
///
/// On every free weekday the employee's workday counter grows by one and
/// its fair share of internal days becomes `workdays / group size`. While
/// the employee is below that share, a coin with probability `p` decides
/// between `Internal` and `External`; above it, the day is `External`.
/// Free weekend cells are always `External`. Cells already taken by rest
/// or a duty are left alone.
#[derive(Debug, Clone)]
pub struct InternalExternalRule {
    group: Vec<String>,
    internal_probability: f64,
}

impl InternalExternalRule {
    /// Default probability of taking an internal day while below the share.
    pub const DEFAULT_INTERNAL_PROBABILITY: f64 = 0.5;

    /// Creates the rule for a non-empty group.
    pub fn new<S: Into<String>>(group: impl IntoIterator<Item = S>) -> Result<Self, RuleConfigError> {
        let group: Vec<String> = group.into_iter().map(Into::into).collect();
        check_rotation("InternalExternal", "group", &group)?;
        Ok(Self {
            group,
            internal_probability: Self::DEFAULT_INTERNAL_PROBABILITY,
        })
    }

    /// Sets the internal-day probability.
    pub fn with_internal_probability(mut self, p: f64) -> Result<Self, RuleConfigError> {
        self.internal_probability = check_probability("InternalExternal", "internal_probability", p)?;
        Ok(self)
    }

    /// Balancing group.
    pub fn group(&self) -> &[String] {
        &self.group
    }

    /// Internal days owed after `workdays` free weekdays.
    #[inline]
    pub fn target(&self, workdays: u32) -> u32 {
        workdays / self.group.len() as u32
    }
}

impl ShiftRule for InternalExternalRule {
    fn name(&self) -> &'static str {
        "InternalExternal"
    }

    fn phase(&self) -> Phase {
        Phase::Balancing
    }

    fn evaluate(
        &self,
        ctx: &RuleContext<'_>,
        state: &mut RotationState,
        rng: &mut dyn RngCore,
    ) -> RuleOutcome {
        if ctx.is_taken() {
            return RuleOutcome::Unchanged;
        }
        if ctx.day.is_weekend() {
            return RuleOutcome::Assign(ShiftStatus::External);
        }

        state.workday_count += 1;
        let target = self.target(state.workday_count);
        if state.duty_count < target && rng.random_bool(self.internal_probability) {
            state.duty_count += 1;
            RuleOutcome::Assign(ShiftStatus::Internal)
        } else {
            RuleOutcome::Assign(ShiftStatus::External)
        }
    }

    fn referenced_employees(&self) -> Vec<&str> {
        self.group.iter().map(String::as_str).collect()
    }

    fn rotation_key(&self) -> Option<RotationKey> {
        Some(RotationKey::Group {
            lists: vec![self.group.clone()],
        })
    }

    fn check_binding(&self, employee: &str) -> Result<(), RuleConfigError> {
        if self.group.iter().any(|n| n == employee) {
            Ok(())
        } else {
            Err(RuleConfigError::NotInRotation {
                rule: self.name(),
                employee: employee.to_string(),
            })
        }
    }

    fn description(&self) -> &'static str {
        "Probabilistic internal/external split against a fair share"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{MonthCalendar, RestDays, ScheduleGrid};
    use crate::rules::testing::outcomes;
    use chrono::NaiveDate;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn count(out: &[RuleOutcome], status: ShiftStatus) -> usize {
        out.iter().filter(|o| **o == RuleOutcome::Assign(status)).count()
    }

    #[test]
    fn test_internal_days_stay_within_share() {
        // April 2025 has 22 weekdays; a group of three owes at most 7.
        let cal = MonthCalendar::new(2025, 4).unwrap();
        let rule = InternalExternalRule::new(["A", "B", "C"]).unwrap();
        for seed in 0..20 {
            let (out, state) = outcomes(&rule, &cal, seed);
            let internal = count(&out, ShiftStatus::Internal);
            assert!(internal <= 7, "seed {seed}: {internal}");
            assert_eq!(internal as u32, state.duty_count);
            assert_eq!(state.workday_count, 22);
            assert_eq!(internal + count(&out, ShiftStatus::External), 30);
        }
    }

    #[test]
    fn test_certain_probability_reaches_share() {
        let cal = MonthCalendar::new(2025, 4).unwrap();
        let rule = InternalExternalRule::new(["A", "B", "C"])
            .unwrap()
            .with_internal_probability(1.0)
            .unwrap();
        let (out, _) = outcomes(&rule, &cal, 42);
        assert_eq!(count(&out, ShiftStatus::Internal), 7);
    }

    #[test]
    fn test_zero_probability_is_all_external() {
        let cal = MonthCalendar::new(2025, 4).unwrap();
        let rule = InternalExternalRule::new(["A"])
            .unwrap()
            .with_internal_probability(0.0)
            .unwrap();
        let (out, _) = outcomes(&rule, &cal, 42);
        assert_eq!(count(&out, ShiftStatus::External), 30);
    }

    #[test]
    fn test_weekend_is_external() {
        let cal = MonthCalendar::new(2025, 4).unwrap();
        let rule = InternalExternalRule::new(["A"]).unwrap();
        let (out, _) = outcomes(&rule, &cal, 7);
        for (day, outcome) in cal.days().iter().zip(out) {
            if day.is_weekend() {
                assert_eq!(outcome, RuleOutcome::Assign(ShiftStatus::External));
            }
        }
    }

    #[test]
    fn test_taken_cell_untouched() {
        let cal = MonthCalendar::new(2025, 4).unwrap();
        let monday = NaiveDate::from_ymd_opt(2025, 4, 7).unwrap();
        let mut grid = ScheduleGrid::new(cal.dates(), vec!["A".into()]);
        grid.set(monday, "A", ShiftStatus::MainDuty);
        let mut rest = RestDays::new();
        rest.insert(monday);

        let rule = InternalExternalRule::new(["A"]).unwrap();
        let mut state = rule.initial_state();
        let mut rng = SmallRng::seed_from_u64(42);
        let ctx = RuleContext {
            day: cal.day(monday).unwrap(),
            employee: "A",
            employee_index: 0,
            grid: &grid,
            rest_days: &rest,
        };
        assert_eq!(rule.evaluate(&ctx, &mut state, &mut rng), RuleOutcome::Unchanged);
        assert_eq!(state.workday_count, 0);
    }

    #[test]
    fn test_binding_and_config() {
        let rule = InternalExternalRule::new(["A", "B"]).unwrap();
        assert!(rule.check_binding("B").is_ok());
        assert!(rule.check_binding("Z").is_err());
        assert_eq!(rule.target(5), 2);
        assert!(InternalExternalRule::new(Vec::<String>::new()).is_err());
        assert!(rule.with_internal_probability(-0.1).is_err());
    }
}
