//! Schedule summary.
//!
//! Condenses a completed grid into per-employee figures.
//!
//! # Figures
//!
//! | Figure | Definition |
//! |--------|-----------|
//! | Status counts | Days per status over the month |
//! | Weekly rest | Rest days per ISO week, clipped to the month |

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::models::{MonthCalendar, ScheduleGrid, ShiftStatus};

/// Rest days of one employee in one week.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeeklyRest {
    /// ISO week-based year.
    pub iso_year: i32,
    /// ISO week number.
    pub iso_week: u32,
    /// In-month days of the week.
    pub days: usize,
    /// Rest days in the week.
    pub rest: usize,
}

/// Figures for one employee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeSummary {
    /// Employee name.
    pub name: String,
    /// Days per status; statuses that never occur are absent.
    pub status_counts: BTreeMap<ShiftStatus, usize>,
    /// Rest per week, in calendar order.
    pub weekly_rest: Vec<WeeklyRest>,
}

impl EmployeeSummary {
    /// Days spent in `status`.
    pub fn count(&self, status: ShiftStatus) -> usize {
        self.status_counts.get(&status).copied().unwrap_or(0)
    }

    /// Whether every week reached `quota` rest days.
    pub fn meets_rest_quota(&self, quota: usize) -> bool {
        self.weekly_rest.iter().all(|w| w.rest >= quota)
    }
}

/// Per-employee figures of a month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleSummary {
    /// One entry per employee, in grid order.
    pub employees: Vec<EmployeeSummary>,
}

impl ScheduleSummary {
    /// Computes the summary of `grid`, whose dates should be those of
    /// `calendar`. A week that falls outside the grid counts no rest.
    pub fn calculate(grid: &ScheduleGrid, calendar: &MonthCalendar) -> Self {
        let weeks = calendar.weeks();
        let employees = grid
            .employees()
            .iter()
            .enumerate()
            .map(|(emp, name)| {
                let row = grid.row(emp);

                let mut status_counts = BTreeMap::new();
                for status in row {
                    *status_counts.entry(*status).or_insert(0) += 1;
                }

                let weekly_rest = weeks
                    .iter()
                    .map(|week| WeeklyRest {
                        iso_year: week.iso_year,
                        iso_week: week.iso_week,
                        days: week.len(),
                        rest: row
                            .get(week.days.clone())
                            .map_or(0, |days| {
                                days.iter().filter(|s| **s == ShiftStatus::Rest).count()
                            }),
                    })
                    .collect();

                EmployeeSummary {
                    name: name.clone(),
                    status_counts,
                    weekly_rest,
                }
            })
            .collect();

        Self { employees }
    }

    /// Summary of one employee.
    pub fn employee(&self, name: &str) -> Option<&EmployeeSummary> {
        self.employees.iter().find(|e| e.name == name)
    }

    /// Days in `status` across all employees.
    pub fn total(&self, status: ShiftStatus) -> usize {
        self.employees.iter().map(|e| e.count(status)).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn april(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 4, d).unwrap()
    }

    #[test]
    fn test_summary_counts() {
        let cal = MonthCalendar::new(2025, 4).unwrap();
        let mut grid = ScheduleGrid::new(cal.dates(), vec!["A".into(), "B".into()]);
        for d in [5, 6, 12] {
            grid.set(april(d), "A", ShiftStatus::Rest);
        }
        grid.set(april(4), "B", ShiftStatus::MainDuty);

        let summary = ScheduleSummary::calculate(&grid, &cal);
        let a = summary.employee("A").unwrap();
        assert_eq!(a.count(ShiftStatus::Rest), 3);
        assert_eq!(a.count(ShiftStatus::Work), 27);
        assert_eq!(a.count(ShiftStatus::Duty), 0);
        assert_eq!(summary.total(ShiftStatus::MainDuty), 1);
        assert_eq!(summary.total(ShiftStatus::Work), 56);
    }

    #[test]
    fn test_weekly_rest() {
        let cal = MonthCalendar::new(2025, 4).unwrap();
        let mut grid = ScheduleGrid::new(cal.dates(), vec!["A".into()]);
        for d in [5, 6, 12] {
            grid.set(april(d), "A", ShiftStatus::Rest);
        }

        let summary = ScheduleSummary::calculate(&grid, &cal);
        let a = &summary.employees[0];
        assert_eq!(a.weekly_rest.len(), 5);
        assert_eq!(
            a.weekly_rest[0],
            WeeklyRest {
                iso_year: 2025,
                iso_week: 14,
                days: 6,
                rest: 2
            }
        );
        assert_eq!(a.weekly_rest[1].rest, 1);
        assert_eq!(a.weekly_rest[4].days, 3);
        assert!(a.meets_rest_quota(0));
        assert!(!a.meets_rest_quota(1));
    }

    #[test]
    fn test_empty_grid() {
        let cal = MonthCalendar::new(2025, 4).unwrap();
        let grid = ScheduleGrid::new(cal.dates(), Vec::new());
        let summary = ScheduleSummary::calculate(&grid, &cal);
        assert!(summary.employees.is_empty());
        assert_eq!(summary.total(ShiftStatus::Work), 0);
    }

    #[test]
    fn test_grid_shorter_than_calendar() {
        let cal = MonthCalendar::new(2025, 4).unwrap();
        let mut grid = ScheduleGrid::new((1..=10).map(april).collect(), vec!["A".into()]);
        grid.set(april(5), "A", ShiftStatus::Rest);

        let summary = ScheduleSummary::calculate(&grid, &cal);
        let a = summary.employee("A").unwrap();
        assert_eq!(a.count(ShiftStatus::Work), 9);
        assert_eq!(a.weekly_rest.len(), cal.weeks().len());
        assert_eq!(a.weekly_rest[0].rest, 1);
        assert!(a.weekly_rest[2..].iter().all(|w| w.rest == 0));
    }
}
