//! Paired weekend duty.
//!
//! Both rules bind two employees to each other. Each member carries its
//! own copy of the pair's rotation (seeded oppositely where the roles
//! differ), and both copies advance on the same ISO-week boundaries, so
//! the pair stays in lock-step without sharing mutable state.

use chrono::Weekday;
use rand::RngCore;

use super::{
    Phase, RotationCursor, RotationKey, RotationState, RuleContext, RuleOutcome, ShiftRule,
};
use crate::error::RuleConfigError;
use crate::models::ShiftStatus;

/// Alternating weekend duty for the satellite site.
///
/// The weekly toggle starts at `starts_on` and flips at every new ISO
/// week. In an "on" week the employee holds Saturday and Sunday duty; in
/// the "off" week before it, Thursday and Friday are rest days.
///
/// Seed one member with `starts_on = true` and the partner with `false`
/// so that exactly one of them covers each weekend.
#[derive(Debug, Clone)]
pub struct JiangdongWeekendRule {
    partner: String,
    starts_on: bool,
}

impl JiangdongWeekendRule {
    /// Creates the rule for one member of the pair.
    pub fn new(partner: impl Into<String>, starts_on: bool) -> Self {
        Self {
            partner: partner.into(),
            starts_on,
        }
    }

    /// Paired employee.
    pub fn partner(&self) -> &str {
        &self.partner
    }
}

impl ShiftRule for JiangdongWeekendRule {
    fn name(&self) -> &'static str {
        "JiangdongWeekend"
    }

    fn phase(&self) -> Phase {
        Phase::WeeklyShape
    }

    fn initial_state(&self) -> RotationState {
        RotationState {
            toggle: self.starts_on,
            ..Default::default()
        }
    }

    fn evaluate(
        &self,
        ctx: &RuleContext<'_>,
        state: &mut RotationState,
        _rng: &mut dyn RngCore,
    ) -> RuleOutcome {
        let week = ctx.day.iso_week;
        if state.enter_week(week) {
            state.toggle = !state.toggle;
        }
        let on = state.toggle;
        state.week_flags.insert(week, on);

        match ctx.day.weekday {
            Weekday::Sat | Weekday::Sun if on => RuleOutcome::Assign(ShiftStatus::Duty),
            Weekday::Thu | Weekday::Fri if !on => RuleOutcome::Assign(ShiftStatus::Rest),
            _ => RuleOutcome::Unchanged,
        }
    }

    fn referenced_employees(&self) -> Vec<&str> {
        vec![self.partner.as_str()]
    }

    fn rotation_key(&self) -> Option<RotationKey> {
        Some(RotationKey::Pair {
            partner: self.partner.clone(),
            seed: Some(self.starts_on),
            cycle: Vec::new(),
            cycle_offset: 0,
        })
    }

    fn check_binding(&self, employee: &str) -> Result<(), RuleConfigError> {
        check_partner(self.name(), employee, &self.partner)
    }

    fn description(&self) -> &'static str {
        "Alternating weekend duty with Thursday/Friday rest the week before"
    }
}

/// Weekend duty rotation shared by several pairs.
///
/// A boolean cycle (one slot per week, default `[true, false, false]`)
/// decides whether this pair covers the weekend; other pairs use the same
/// cycle with a different offset. Within a duty week the *first* member
/// works Saturday and rests Thursday/Friday, the *second* works Sunday and
/// rests Tuesday/Wednesday. Roles swap every week. Outside duty weeks both
/// members rest on the weekend.
#[derive(Debug, Clone)]
pub struct WeekendRotationRule {
    partner: String,
    starts_first: bool,
    cycle: Vec<bool>,
    cycle_offset: usize,
}

impl WeekendRotationRule {
    /// Default three-week cycle: one duty week in three.
    pub const DEFAULT_CYCLE: [bool; 3] = [true, false, false];

    /// Creates the rule with the default cycle at offset 0.
    pub fn new(partner: impl Into<String>, starts_first: bool) -> Self {
        Self {
            partner: partner.into(),
            starts_first,
            cycle: Self::DEFAULT_CYCLE.to_vec(),
            cycle_offset: 0,
        }
    }

    /// Replaces the duty cycle and its starting slot.
    pub fn with_cycle(mut self, cycle: Vec<bool>, offset: usize) -> Result<Self, RuleConfigError> {
        if cycle.is_empty() {
            return Err(RuleConfigError::EmptyCycle {
                rule: "WeekendRotation",
            });
        }
        if offset >= cycle.len() {
            return Err(RuleConfigError::CycleOffsetOutOfRange {
                rule: "WeekendRotation",
                offset,
                len: cycle.len(),
            });
        }
        self.cycle = cycle;
        self.cycle_offset = offset;
        Ok(self)
    }

    /// Paired employee.
    pub fn partner(&self) -> &str {
        &self.partner
    }
}

impl ShiftRule for WeekendRotationRule {
    fn name(&self) -> &'static str {
        "WeekendRotation"
    }

    fn phase(&self) -> Phase {
        Phase::WeeklyShape
    }

    fn initial_state(&self) -> RotationState {
        RotationState {
            toggle: self.starts_first,
            alt_cursor: RotationCursor::new(self.cycle_offset, self.cycle.len()),
            ..Default::default()
        }
    }

    fn evaluate(
        &self,
        ctx: &RuleContext<'_>,
        state: &mut RotationState,
        _rng: &mut dyn RngCore,
    ) -> RuleOutcome {
        let week = ctx.day.iso_week;
        if state.enter_week(week) {
            state.toggle = !state.toggle;
            state.alt_cursor.advance();
        }
        let on_duty = self
            .cycle
            .get(state.alt_cursor.current())
            .copied()
            .unwrap_or(false);
        state.week_flags.insert(week, on_duty);
        let first = state.toggle;

        use Weekday::*;
        let status = match (on_duty, first, ctx.day.weekday) {
            (false, _, Sat | Sun) => Some(ShiftStatus::Rest),
            (true, true, Sat) | (true, false, Sun) => Some(ShiftStatus::Duty),
            (true, true, Thu | Fri) | (true, false, Tue | Wed) => Some(ShiftStatus::Rest),
            _ => None,
        };
        status.into()
    }

    fn referenced_employees(&self) -> Vec<&str> {
        vec![self.partner.as_str()]
    }

    fn rotation_key(&self) -> Option<RotationKey> {
        Some(RotationKey::Pair {
            partner: self.partner.clone(),
            seed: Some(self.starts_first),
            cycle: self.cycle.clone(),
            cycle_offset: self.cycle_offset,
        })
    }

    fn check_binding(&self, employee: &str) -> Result<(), RuleConfigError> {
        check_partner(self.name(), employee, &self.partner)
    }

    fn description(&self) -> &'static str {
        "Paired weekend duty on a shared weekly cycle"
    }
}

pub(super) fn check_partner(
    rule: &'static str,
    employee: &str,
    partner: &str,
) -> Result<(), RuleConfigError> {
    if employee == partner {
        return Err(RuleConfigError::SelfPairing {
            rule,
            employee: employee.to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MonthCalendar;
    use crate::rules::testing::outcomes;
    use chrono::Datelike;

    fn by_day(rule: &dyn ShiftRule, cal: &MonthCalendar) -> Vec<(u32, RuleOutcome)> {
        let (out, _) = outcomes(rule, cal, 1);
        cal.days().iter().map(|d| d.date.day()).zip(out).collect()
    }

    #[test]
    fn test_jiangdong_alternates_weekly() {
        // April 2025: W14 has Sat 5/Sun 6, W15 has Thu 10/Fri 11 and Sat 12/Sun 13.
        let cal = MonthCalendar::new(2025, 4).unwrap();
        let on = by_day(&JiangdongWeekendRule::new("B", true), &cal);
        let off = by_day(&JiangdongWeekendRule::new("A", false), &cal);

        let duty = RuleOutcome::Assign(ShiftStatus::Duty);
        let rest = RuleOutcome::Assign(ShiftStatus::Rest);

        // W14 on, W15 off, W16 on, W17 off
        for (day, expected) in [(5, duty), (6, duty), (10, rest), (11, rest), (19, duty), (24, rest)] {
            assert_eq!(on[day as usize - 1].1, expected, "on-member day {day}");
        }
        // the partner mirrors it
        for (day, expected) in [(3, rest), (4, rest), (12, duty), (13, duty), (26, duty)] {
            assert_eq!(off[day as usize - 1].1, expected, "off-member day {day}");
        }
        // weekdays outside Thu/Fri are never claimed
        assert_eq!(on[6].1, RuleOutcome::Unchanged);
        assert_eq!(off[6].1, RuleOutcome::Unchanged);
    }

    #[test]
    fn test_jiangdong_records_week_flags() {
        let cal = MonthCalendar::new(2025, 4).unwrap();
        let (_, state) = outcomes(&JiangdongWeekendRule::new("B", true), &cal, 1);
        let flags: Vec<(u32, bool)> = state.week_flags.into_iter().collect();
        assert_eq!(
            flags,
            vec![(14, true), (15, false), (16, true), (17, false), (18, true)]
        );
    }

    #[test]
    fn test_weekend_rotation_duty_week() {
        let cal = MonthCalendar::new(2025, 4).unwrap();
        let first = by_day(&WeekendRotationRule::new("B", true), &cal);
        let second = by_day(&WeekendRotationRule::new("A", false), &cal);

        let duty = RuleOutcome::Assign(ShiftStatus::Duty);
        let rest = RuleOutcome::Assign(ShiftStatus::Rest);
        let none = RuleOutcome::Unchanged;

        // W14 (Apr 1-6) is a duty week.
        assert_eq!(first[2].1, rest); // Thu 3
        assert_eq!(first[3].1, rest); // Fri 4
        assert_eq!(first[4].1, duty); // Sat 5
        assert_eq!(first[5].1, none); // Sun 6
        assert_eq!(second[0].1, rest); // Tue 1
        assert_eq!(second[1].1, rest); // Wed 2
        assert_eq!(second[4].1, none); // Sat 5
        assert_eq!(second[5].1, duty); // Sun 6

        // W15, W16 are off: weekend rest for both.
        for idx in [11, 12, 18, 19] {
            assert_eq!(first[idx].1, rest);
            assert_eq!(second[idx].1, rest);
        }
        assert_eq!(first[7].1, none);
    }

    #[test]
    fn test_weekend_rotation_roles_swap() {
        // W17 (Apr 21-27) is the next duty week; three swaps later the
        // initial second member holds Saturday.
        let cal = MonthCalendar::new(2025, 4).unwrap();
        let first = by_day(&WeekendRotationRule::new("B", true), &cal);
        let second = by_day(&WeekendRotationRule::new("A", false), &cal);
        let duty = RuleOutcome::Assign(ShiftStatus::Duty);
        let rest = RuleOutcome::Assign(ShiftStatus::Rest);

        assert_eq!(second[25].1, duty); // Sat 26
        assert_eq!(second[23].1, rest); // Thu 24
        assert_eq!(first[26].1, duty); // Sun 27
        assert_eq!(first[21].1, rest); // Tue 22
    }

    #[test]
    fn test_weekend_rotation_offset() {
        let cal = MonthCalendar::new(2025, 4).unwrap();
        let rule = WeekendRotationRule::new("B", true)
            .with_cycle(vec![true, false, false], 2)
            .unwrap();
        let (_, state) = outcomes(&rule, &cal, 1);
        let flags: Vec<bool> = state.week_flags.values().copied().collect();
        assert_eq!(flags, vec![false, true, false, false, true]);
    }

    #[test]
    fn test_weekend_rotation_rejects_bad_cycle() {
        assert_eq!(
            WeekendRotationRule::new("B", true).with_cycle(vec![], 0).unwrap_err(),
            RuleConfigError::EmptyCycle {
                rule: "WeekendRotation"
            }
        );
        assert!(matches!(
            WeekendRotationRule::new("B", true).with_cycle(vec![true, false], 2),
            Err(RuleConfigError::CycleOffsetOutOfRange { offset: 2, len: 2, .. })
        ));
    }

    #[test]
    fn test_self_pairing_rejected() {
        let rule = JiangdongWeekendRule::new("A", true);
        assert!(rule.check_binding("A").is_err());
        assert!(rule.check_binding("B").is_ok());
        assert_eq!(rule.referenced_employees(), vec!["A"]);
    }
}
