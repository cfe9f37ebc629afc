//! Roster domain models.
//!
//! Provides the data types a scheduling run reads and writes: the month
//! calendar, shift statuses, the schedule grid with per-employee rest
//! bookkeeping, and the roster of employees with their bound rules.
//!
//! # Shape of a Run
//!
//! | Model | Role |
//! |-------|------|
//! | `MonthCalendar` | Days of the month, weekday, ISO week, holidays |
//! | `Roster` | Employees in evaluation order, one rule each |
//! | `ScheduleGrid` | (date, employee) → `ShiftStatus`, starts all `Work` |
//! | `RestDays` | Dates an employee already spent on rest or duty |

mod calendar;
mod employee;
mod grid;
mod status;

pub use calendar::{Day, MonthCalendar, Week};
pub use employee::{Employee, Roster};
pub use grid::{RestDays, ScheduleGrid};
pub use status::ShiftStatus;
