//! Phased assignment engine.
//!
//! # Algorithm
//!
//! 1. Build the month calendar and a grid with every cell set to `Work`.
//! 2. For each phase in [`Phase::ORDER`], walk the days in ascending order
//!    and, within a day, the employees in roster order whose rule carries
//!    that phase. Write the rule's answer through [`write_cell`].
//! 3. Run the rest-quota backfill.
//!
//! Earlier phases commit protected statuses (rest, duties) that later
//! phases can read but not overwrite.
//!
//! # Complexity
//! O(p * d * e) rule calls for p phases, d days and e employees.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use rand::Rng;
use tracing::{debug, info, trace};

use super::backfill::{QuotaShortfall, RestQuotaBackfill};
use super::summary::ScheduleSummary;
use crate::error::ScheduleError;
use crate::models::{Day, MonthCalendar, RestDays, Roster, ScheduleGrid};
use crate::rules::{Phase, RotationState, RuleContext, RuleOutcome};
use crate::validation::validate_roster;

/// Result of one month's run.
#[derive(Debug, Clone)]
pub struct ScheduleOutcome {
    /// Calendar the run was built on (holidays marked).
    pub calendar: MonthCalendar,
    /// Completed grid.
    pub grid: ScheduleGrid,
    /// Rest Days Set per employee, in roster order.
    pub rest_days: Vec<RestDays>,
    /// Final rotation state per employee, in roster order.
    pub rotation_states: Vec<RotationState>,
    /// Weeks left below the rest quota.
    pub shortfalls: Vec<QuotaShortfall>,
}

impl ScheduleOutcome {
    /// Calendar year.
    pub fn year(&self) -> i32 {
        self.calendar.year()
    }

    /// Calendar month.
    pub fn month(&self) -> u32 {
        self.calendar.month()
    }

    /// Whether every non-exempt employee met the weekly rest quota.
    pub fn is_quota_met(&self) -> bool {
        self.shortfalls.is_empty()
    }

    /// Rest Days Set of an employee.
    pub fn rest_days_for(&self, employee: &str) -> Option<&RestDays> {
        self.grid
            .employee_index(employee)
            .and_then(|idx| self.rest_days.get(idx))
    }

    /// Final rotation state of an employee.
    pub fn rotation_state_for(&self, employee: &str) -> Option<&RotationState> {
        self.grid
            .employee_index(employee)
            .and_then(|idx| self.rotation_states.get(idx))
    }

    /// Per-employee status and weekly rest counts.
    pub fn summary(&self) -> ScheduleSummary {
        ScheduleSummary::calculate(&self.grid, &self.calendar)
    }
}

/// Assigns a status to every (date, employee) cell of a month.
///
/// # Example
/// ```
/// use duty_roster::models::{Roster, ShiftStatus};
/// use duty_roster::rules::{DirectorRule, WeekendRest};
/// use duty_roster::scheduler::AssignmentEngine;
/// use chrono::NaiveDate;
/// use rand::rngs::SmallRng;
/// use rand::SeedableRng;
///
/// let roster = Roster::new()
///     .with_employee("Alice", WeekendRest)
///     .with_employee("Dora", DirectorRule::new());
/// let engine = AssignmentEngine::new(roster).unwrap();
///
/// let mut rng = SmallRng::seed_from_u64(42);
/// let outcome = engine.schedule(2025, 4, &mut rng).unwrap();
///
/// let saturday = NaiveDate::from_ymd_opt(2025, 4, 5).unwrap();
/// assert_eq!(outcome.grid.get(saturday, "Alice"), Some(ShiftStatus::Rest));
/// assert_eq!(outcome.grid.cell_count(), 60);
/// ```
#[derive(Debug, Clone)]
pub struct AssignmentEngine {
    roster: Roster,
    holidays: BTreeSet<NaiveDate>,
    backfill: RestQuotaBackfill,
}

impl AssignmentEngine {
    /// Creates an engine over a validated roster.
    pub fn new(roster: Roster) -> Result<Self, ScheduleError> {
        validate_roster(&roster).map_err(ScheduleError::InvalidRoster)?;
        Ok(Self {
            roster,
            holidays: BTreeSet::new(),
            backfill: RestQuotaBackfill::default(),
        })
    }

    /// Sets the statutory holidays.
    pub fn with_holidays(mut self, holidays: impl IntoIterator<Item = NaiveDate>) -> Self {
        self.holidays = holidays.into_iter().collect();
        self
    }

    /// Replaces the rest-quota backfill pass.
    pub fn with_backfill(mut self, backfill: RestQuotaBackfill) -> Self {
        self.backfill = backfill;
        self
    }

    /// Sets the weekly rest quota.
    pub fn with_rest_quota(self, quota: usize) -> Self {
        self.with_backfill(RestQuotaBackfill::new(quota))
    }

    /// Roster being scheduled.
    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    /// Configured holidays.
    pub fn holidays(&self) -> &BTreeSet<NaiveDate> {
        &self.holidays
    }

    /// Builds the calendar for `year`/`month` and runs it.
    pub fn schedule<R: Rng>(
        &self,
        year: i32,
        month: u32,
        rng: &mut R,
    ) -> Result<ScheduleOutcome, ScheduleError> {
        let calendar =
            MonthCalendar::new(year, month)?.with_holidays(self.holidays.iter().copied());
        Ok(self.run(calendar, rng))
    }

    /// Runs every phase and the backfill over `calendar`.
    ///
    /// The calendar is used as given; holidays configured on the engine
    /// are applied by [`schedule`](Self::schedule) only.
    pub fn run<R: Rng>(&self, calendar: MonthCalendar, rng: &mut R) -> ScheduleOutcome {
        let employees = self.roster.employees();
        info!(
            year = calendar.year(),
            month = calendar.month(),
            employees = employees.len(),
            "scheduling month"
        );

        let mut grid = ScheduleGrid::new(calendar.dates(), self.roster.names());
        let mut rest_days = vec![RestDays::new(); employees.len()];
        let mut states: Vec<RotationState> =
            employees.iter().map(|e| e.rule().initial_state()).collect();

        for phase in Phase::ORDER {
            let members: Vec<usize> = employees
                .iter()
                .enumerate()
                .filter(|(_, e)| e.rule().phase() == phase)
                .map(|(idx, _)| idx)
                .collect();
            if members.is_empty() {
                continue;
            }

            let mut written = 0usize;
            for day in calendar.days() {
                for &emp in &members {
                    let employee = &employees[emp];
                    let outcome = {
                        let ctx = RuleContext {
                            day,
                            employee: employee.name(),
                            employee_index: emp,
                            grid: &grid,
                            rest_days: &rest_days[emp],
                        };
                        employee.rule().evaluate(&ctx, &mut states[emp], &mut *rng)
                    };
                    if write_cell(&mut grid, &mut rest_days[emp], day, emp, outcome) {
                        written += 1;
                    } else if outcome != RuleOutcome::Unchanged {
                        trace!(
                            employee = employee.name(),
                            date = %day.date,
                            ?outcome,
                            "refused to overwrite protected cell"
                        );
                    }
                }
            }
            debug!(
                phase = phase.label(),
                employees = members.len(),
                written,
                "phase complete"
            );
        }

        let shortfalls =
            self.backfill
                .apply(&calendar, &self.roster, &mut grid, &mut rest_days, rng);

        info!(
            year = calendar.year(),
            month = calendar.month(),
            shortfalls = shortfalls.len(),
            "month scheduled"
        );

        ScheduleOutcome {
            calendar,
            grid,
            rest_days,
            rotation_states: states,
            shortfalls,
        }
    }
}

/// Writes a rule's answer into the grid.
///
/// A protected cell keeps its status unless the same status is written
/// again. Any protected status written is recorded in `rest_days`.
/// Returns `true` if the outcome was applied.
pub(crate) fn write_cell(
    grid: &mut ScheduleGrid,
    rest_days: &mut RestDays,
    day: &Day,
    employee: usize,
    outcome: RuleOutcome,
) -> bool {
    let RuleOutcome::Assign(status) = outcome else {
        return false;
    };
    let current = grid.status_at(day.index, employee);
    if current.is_protected() && current != status {
        return false;
    }
    grid.set_at(day.index, employee, status);
    if status.is_protected() {
        rest_days.insert(day.date);
    }
    true
}

/// Validates `roster` and schedules one month with default settings.
pub fn schedule_month<R: Rng>(
    year: i32,
    month: u32,
    roster: Roster,
    rng: &mut R,
) -> Result<ScheduleOutcome, ScheduleError> {
    AssignmentEngine::new(roster)?.schedule(year, month, rng)
}
