//! Monthly duty roster engine.
//!
//! Assigns one status (work, rest, duty, ...) to every employee on every
//! day of a calendar month. Each employee is bound to one rule: a fixed
//! rest pattern, a paired weekend rotation, a round-robin duty, or
//! internal/external balancing. A final pass guarantees a weekly rest
//! quota.
//!
//! # Modules
//!
//! - **`models`**: Domain types: `MonthCalendar`, `ShiftStatus`,
//!   `ScheduleGrid`, `RestDays`, `Employee`, `Roster`
//! - **`rules`**: The `ShiftRule` trait, its phases and the built-in rules
//! - **`scheduler`**: `AssignmentEngine`, `RestQuotaBackfill`, `ScheduleSummary`
//! - **`validation`**: Roster integrity checks (duplicates, dangling references,
//!   inconsistent rotation peers)
//! - **`config`**: Serde-loadable roster description
//! - **`export`**: `ExportSink` and the labelled table layout
//! - **`error`**: Configuration and scheduling errors
//!
//! # Example
//!
//! ```
//! use duty_roster::models::{Roster, ShiftStatus};
//! use duty_roster::rules::{FixedDaysRest, WeekendRest};
//! use duty_roster::scheduler::schedule_month;
//! use chrono::{NaiveDate, Weekday};
//! use rand::rngs::SmallRng;
//! use rand::SeedableRng;
//!
//! let roster = Roster::new()
//!     .with_employee("Alice", WeekendRest)
//!     .with_employee("Bob", FixedDaysRest::new([Weekday::Mon, Weekday::Tue]).unwrap());
//!
//! let mut rng = SmallRng::seed_from_u64(42);
//! let outcome = schedule_month(2025, 4, roster, &mut rng).unwrap();
//!
//! let monday = NaiveDate::from_ymd_opt(2025, 4, 7).unwrap();
//! assert_eq!(outcome.grid.get(monday, "Alice"), Some(ShiftStatus::Work));
//! assert_eq!(outcome.grid.get(monday, "Bob"), Some(ShiftStatus::Rest));
//! ```
//!
//! # Randomness
//!
//! Internal/external balancing, satellite duty acceptance and the rest
//! backfill draw from the caller's `rand::Rng`. A seeded generator gives
//! reproducible rosters.
//!
//! # Logging
//!
//! The crate emits `tracing` events and never installs a subscriber.

pub mod config;
pub mod error;
pub mod export;
pub mod models;
pub mod rules;
pub mod scheduler;
pub mod validation;
