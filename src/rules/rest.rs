//! Fixed rest patterns and the director exemption.
//!
//! These rules depend only on the date. Weekend, periodic and director
//! patterns define every rest day themselves and are skipped by the weekly
//! rest-quota pass. A fixed weekday pattern may rest fewer days than the
//! quota, so its weeks are topped up like any other.

use chrono::Weekday;
use rand::RngCore;

use super::{Phase, RotationState, RuleContext, RuleOutcome, ShiftRule};
use crate::error::RuleConfigError;
use crate::models::ShiftStatus;

/// Rest on Saturdays, Sundays and statutory holidays.
#[derive(Debug, Clone, Copy, Default)]
pub struct WeekendRest;

impl ShiftRule for WeekendRest {
    fn name(&self) -> &'static str {
        "WeekendRest"
    }

    fn phase(&self) -> Phase {
        Phase::Baseline
    }

    fn evaluate(
        &self,
        ctx: &RuleContext<'_>,
        _state: &mut RotationState,
        _rng: &mut dyn RngCore,
    ) -> RuleOutcome {
        if ctx.day.is_weekend() || ctx.day.is_holiday {
            RuleOutcome::Assign(ShiftStatus::Rest)
        } else {
            RuleOutcome::Unchanged
        }
    }

    fn backfill_exempt(&self) -> bool {
        true
    }

    fn description(&self) -> &'static str {
        "Rest on weekends and statutory holidays"
    }
}

/// Rest on a fixed set of weekdays.
#[derive(Debug, Clone)]
pub struct FixedDaysRest {
    rest_days: Vec<Weekday>,
}

impl FixedDaysRest {
    /// Creates the rule. The set must not be empty.
    pub fn new(rest_days: impl IntoIterator<Item = Weekday>) -> Result<Self, RuleConfigError> {
        let rest_days = dedup_weekdays(rest_days);
        if rest_days.is_empty() {
            return Err(RuleConfigError::EmptyDaySet {
                rule: "FixedDaysRest",
                field: "rest_days",
            });
        }
        Ok(Self { rest_days })
    }

    /// Configured rest weekdays.
    pub fn rest_days(&self) -> &[Weekday] {
        &self.rest_days
    }
}

impl ShiftRule for FixedDaysRest {
    fn name(&self) -> &'static str {
        "FixedDaysRest"
    }

    fn phase(&self) -> Phase {
        Phase::Baseline
    }

    fn evaluate(
        &self,
        ctx: &RuleContext<'_>,
        _state: &mut RotationState,
        _rng: &mut dyn RngCore,
    ) -> RuleOutcome {
        if self.rest_days.contains(&ctx.day.weekday) {
            RuleOutcome::Assign(ShiftStatus::Rest)
        } else {
            RuleOutcome::Unchanged
        }
    }

    fn description(&self) -> &'static str {
        "Rest on fixed weekdays"
    }
}

/// Rest every N weeks, night shift every M weeks.
///
/// Rest applies in weeks where `iso_week % N == 1`, night shift (`Duty`)
/// in weeks where `iso_week % M == 0`. Rest wins if both match.
#[derive(Debug, Clone)]
pub struct PeriodicRest {
    rest_every_n_weeks: u32,
    rest_days: Vec<Weekday>,
    night_shift_every_n_weeks: u32,
    night_shift_days: Vec<Weekday>,
}

impl PeriodicRest {
    /// Creates the rule without night shifts. The rest-day set must not be
    /// empty; the night-shift period defaults to the rest period.
    pub fn new(
        rest_every_n_weeks: u32,
        rest_days: impl IntoIterator<Item = Weekday>,
    ) -> Result<Self, RuleConfigError> {
        if rest_every_n_weeks == 0 {
            return Err(RuleConfigError::ZeroValue {
                rule: "PeriodicRest",
                field: "rest_every_n_weeks",
            });
        }
        let rest_days = dedup_weekdays(rest_days);
        if rest_days.is_empty() {
            return Err(RuleConfigError::EmptyDaySet {
                rule: "PeriodicRest",
                field: "rest_days",
            });
        }
        Ok(Self {
            rest_every_n_weeks,
            rest_days,
            night_shift_every_n_weeks: rest_every_n_weeks,
            night_shift_days: Vec::new(),
        })
    }

    /// Adds night shifts on `days` every `every_n_weeks` weeks.
    pub fn with_night_shifts(
        mut self,
        every_n_weeks: u32,
        days: impl IntoIterator<Item = Weekday>,
    ) -> Result<Self, RuleConfigError> {
        if every_n_weeks == 0 {
            return Err(RuleConfigError::ZeroValue {
                rule: "PeriodicRest",
                field: "night_shift_every_n_weeks",
            });
        }
        self.night_shift_every_n_weeks = every_n_weeks;
        self.night_shift_days = dedup_weekdays(days);
        Ok(self)
    }

    fn is_resting(&self, iso_week: u32, weekday: Weekday) -> bool {
        iso_week % self.rest_every_n_weeks == 1 && self.rest_days.contains(&weekday)
    }

    fn is_night_shift(&self, iso_week: u32, weekday: Weekday) -> bool {
        iso_week % self.night_shift_every_n_weeks == 0 && self.night_shift_days.contains(&weekday)
    }
}

impl ShiftRule for PeriodicRest {
    fn name(&self) -> &'static str {
        "PeriodicRest"
    }

    fn phase(&self) -> Phase {
        Phase::Baseline
    }

    fn evaluate(
        &self,
        ctx: &RuleContext<'_>,
        _state: &mut RotationState,
        _rng: &mut dyn RngCore,
    ) -> RuleOutcome {
        let (week, weekday) = (ctx.day.iso_week, ctx.day.weekday);
        if self.is_resting(week, weekday) {
            RuleOutcome::Assign(ShiftStatus::Rest)
        } else if self.is_night_shift(week, weekday) {
            RuleOutcome::Assign(ShiftStatus::Duty)
        } else {
            RuleOutcome::Unchanged
        }
    }

    fn backfill_exempt(&self) -> bool {
        true
    }

    fn description(&self) -> &'static str {
        "Periodic rest with night-shift rotation"
    }
}

/// Director: rest on weekends, work every weekday.
///
/// Statutory holidays falling on weekdays are workdays for directors.
#[derive(Debug, Clone, Copy, Default)]
pub struct DirectorRule;

impl DirectorRule {
    /// Creates the rule.
    pub fn new() -> Self {
        Self
    }
}

impl ShiftRule for DirectorRule {
    fn name(&self) -> &'static str {
        "Director"
    }

    fn phase(&self) -> Phase {
        Phase::WeeklyShape
    }

    fn evaluate(
        &self,
        ctx: &RuleContext<'_>,
        _state: &mut RotationState,
        _rng: &mut dyn RngCore,
    ) -> RuleOutcome {
        if ctx.day.is_weekend() {
            RuleOutcome::Assign(ShiftStatus::Rest)
        } else {
            RuleOutcome::Assign(ShiftStatus::Work)
        }
    }

    fn backfill_exempt(&self) -> bool {
        true
    }

    fn description(&self) -> &'static str {
        "Weekend rest, weekdays (holidays included) at work"
    }
}

fn dedup_weekdays(days: impl IntoIterator<Item = Weekday>) -> Vec<Weekday> {
    let mut out: Vec<Weekday> = Vec::new();
    for day in days {
        if !out.contains(&day) {
            out.push(day);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MonthCalendar;
    use crate::rules::testing::outcomes;
    use chrono::{Datelike, NaiveDate};

    fn rest_days_of(rule: &dyn ShiftRule, cal: &MonthCalendar) -> Vec<u32> {
        let (out, _) = outcomes(rule, cal, 1);
        cal.days()
            .iter()
            .zip(out)
            .filter(|(_, o)| *o == RuleOutcome::Assign(ShiftStatus::Rest))
            .map(|(d, _)| d.date.day())
            .collect()
    }

    #[test]
    fn test_weekend_rest() {
        let cal = MonthCalendar::new(2025, 4).unwrap();
        assert_eq!(
            rest_days_of(&WeekendRest, &cal),
            vec![5, 6, 12, 13, 19, 20, 26, 27]
        );
    }

    #[test]
    fn test_weekend_rest_includes_holidays() {
        let may_day = NaiveDate::from_ymd_opt(2025, 5, 1).unwrap();
        let cal = MonthCalendar::new(2025, 5).unwrap().with_holidays([may_day]);
        let days = rest_days_of(&WeekendRest, &cal);
        assert_eq!(days[0], 1);
        assert!(days.contains(&3) && days.contains(&4));
    }

    #[test]
    fn test_fixed_days_rest() {
        let rule = FixedDaysRest::new([Weekday::Mon, Weekday::Tue, Weekday::Mon]).unwrap();
        assert_eq!(rule.rest_days(), &[Weekday::Mon, Weekday::Tue]);
        let cal = MonthCalendar::new(2025, 4).unwrap();
        assert_eq!(
            rest_days_of(&rule, &cal),
            vec![1, 7, 8, 14, 15, 21, 22, 28, 29]
        );
    }

    #[test]
    fn test_fixed_days_rejects_empty() {
        assert_eq!(
            FixedDaysRest::new([]).unwrap_err(),
            RuleConfigError::EmptyDaySet {
                rule: "FixedDaysRest",
                field: "rest_days"
            }
        );
    }

    #[test]
    fn test_periodic_rest_and_night_shift() {
        // January 2024 spans ISO weeks 1..=5.
        let rule = PeriodicRest::new(2, [Weekday::Wed])
            .unwrap()
            .with_night_shifts(2, [Weekday::Fri])
            .unwrap();
        let cal = MonthCalendar::new(2024, 1).unwrap();
        let (out, _) = outcomes(&rule, &cal, 1);

        for (day, outcome) in cal.days().iter().zip(out) {
            let expected = match day.date.day() {
                3 | 17 | 31 => RuleOutcome::Assign(ShiftStatus::Rest),
                12 | 26 => RuleOutcome::Assign(ShiftStatus::Duty),
                _ => RuleOutcome::Unchanged,
            };
            assert_eq!(outcome, expected, "{}", day.date);
        }
    }

    #[test]
    fn test_periodic_rest_rejects_zero_period() {
        assert!(PeriodicRest::new(0, [Weekday::Wed]).is_err());
        assert!(PeriodicRest::new(2, [Weekday::Wed])
            .unwrap()
            .with_night_shifts(0, [Weekday::Fri])
            .is_err());
    }

    #[test]
    fn test_periodic_rest_rejects_empty_rest_days() {
        assert_eq!(
            PeriodicRest::new(2, Vec::<Weekday>::new()).unwrap_err(),
            RuleConfigError::EmptyDaySet {
                rule: "PeriodicRest",
                field: "rest_days",
            }
        );
        let no_nights = PeriodicRest::new(2, [Weekday::Wed])
            .unwrap()
            .with_night_shifts(2, Vec::<Weekday>::new())
            .unwrap();
        assert!(no_nights.night_shift_days.is_empty());
    }

    #[test]
    fn test_director_works_holidays() {
        let may_day = NaiveDate::from_ymd_opt(2025, 5, 1).unwrap();
        let cal = MonthCalendar::new(2025, 5).unwrap().with_holidays([may_day]);
        let (out, _) = outcomes(&DirectorRule::new(), &cal, 1);
        for (day, outcome) in cal.days().iter().zip(out) {
            let expected = if day.is_weekend() {
                ShiftStatus::Rest
            } else {
                ShiftStatus::Work
            };
            assert_eq!(outcome, RuleOutcome::Assign(expected), "{}", day.date);
        }
    }

    #[test]
    fn test_backfill_exemptions() {
        assert!(WeekendRest.backfill_exempt());
        assert!(DirectorRule::new().backfill_exempt());
        assert!(PeriodicRest::new(2, [Weekday::Wed]).unwrap().backfill_exempt());
        assert!(!FixedDaysRest::new([Weekday::Mon]).unwrap().backfill_exempt());
    }
}
