//! Weekly rest-quota backfill.
//!
//! Runs after every phase. For each employee whose rule is not exempt and
//! each ISO week of the month (clipped to the month), Rest cells are
//! counted; while the count is below the quota, a random still-working
//! cell of that week becomes Rest.
//!
//! # Shortfalls
//! Short partial weeks or weeks already packed with duties may not offer
//! enough working cells. Those weeks are reported as [`QuotaShortfall`]s
//! instead of failing the run.

use rand::seq::IndexedRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::models::{MonthCalendar, RestDays, Roster, ScheduleGrid, ShiftStatus};

/// Default number of rest days per ISO week.
pub const DEFAULT_WEEKLY_REST_QUOTA: usize = 2;

/// A week in which an employee ended below the rest quota.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuotaShortfall {
    /// Employee name.
    pub employee: String,
    /// ISO week-based year.
    pub iso_year: i32,
    /// ISO week number.
    pub iso_week: u32,
    /// Rest days reached.
    pub rest: usize,
    /// Rest days required.
    pub quota: usize,
}

/// Tops up weekly rest to a fixed quota.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RestQuotaBackfill {
    quota: usize,
}

impl Default for RestQuotaBackfill {
    fn default() -> Self {
        Self {
            quota: DEFAULT_WEEKLY_REST_QUOTA,
        }
    }
}

impl RestQuotaBackfill {
    /// Creates a backfill pass with the given weekly quota.
    pub fn new(quota: usize) -> Self {
        Self { quota }
    }

    /// Weekly quota.
    pub fn quota(&self) -> usize {
        self.quota
    }

    /// Converts working cells to Rest until every week meets the quota.
    ///
    /// `rest_days` is indexed like the roster and is updated alongside the
    /// grid.
    pub fn apply<R: Rng + ?Sized>(
        &self,
        calendar: &MonthCalendar,
        roster: &Roster,
        grid: &mut ScheduleGrid,
        rest_days: &mut [RestDays],
        rng: &mut R,
    ) -> Vec<QuotaShortfall> {
        let mut shortfalls = Vec::new();
        if self.quota == 0 {
            return shortfalls;
        }
        let weeks = calendar.weeks();
        let days = calendar.days();

        for (emp, employee) in roster.employees().iter().enumerate() {
            if employee.rule().backfill_exempt() {
                continue;
            }
            let rest = &mut rest_days[emp];

            for week in &weeks {
                let mut count = week
                    .days
                    .clone()
                    .filter(|&d| grid.status_at(d, emp) == ShiftStatus::Rest)
                    .count();

                while count < self.quota {
                    let eligible: Vec<usize> = week
                        .days
                        .clone()
                        .filter(|&d| {
                            grid.status_at(d, emp).is_working() && !rest.contains(days[d].date)
                        })
                        .collect();
                    let Some(&pick) = eligible.choose(rng) else {
                        break;
                    };
                    grid.set_at(pick, emp, ShiftStatus::Rest);
                    rest.insert(days[pick].date);
                    count += 1;
                    debug!(
                        employee = employee.name(),
                        date = %days[pick].date,
                        iso_week = week.iso_week,
                        "backfilled rest day"
                    );
                }

                if count < self.quota {
                    warn!(
                        employee = employee.name(),
                        iso_year = week.iso_year,
                        iso_week = week.iso_week,
                        rest = count,
                        quota = self.quota,
                        "weekly rest quota not met"
                    );
                    shortfalls.push(QuotaShortfall {
                        employee: employee.name().to_string(),
                        iso_year: week.iso_year,
                        iso_week: week.iso_week,
                        rest: count,
                        quota: self.quota,
                    });
                }
            }
        }

        shortfalls
    }
}
