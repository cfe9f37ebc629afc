//! Month scheduling and schedule summaries.
//!
//! Runs the rules of a roster over one calendar month and reports the
//! result.
//!
//! # Algorithm
//!
//! `AssignmentEngine` evaluates the rules phase by phase, each phase
//! sweeping the month in date order. Protected statuses committed by an
//! earlier phase are never overwritten. `RestQuotaBackfill` then tops up
//! weekly rest for employees without a fixed rest pattern.
//!
//! # Summary
//!
//! `ScheduleSummary` counts statuses and weekly rest per employee, so
//! callers can check quotas without walking the grid.

mod backfill;
mod engine;
mod summary;

pub use backfill::{QuotaShortfall, RestQuotaBackfill, DEFAULT_WEEKLY_REST_QUOTA};
pub use engine::{schedule_month, AssignmentEngine, ScheduleOutcome};
pub use summary::{EmployeeSummary, ScheduleSummary, WeeklyRest};
