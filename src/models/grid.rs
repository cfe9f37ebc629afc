//! Schedule grid and rest-day bookkeeping.
//!
//! The grid is the month's (date, employee) → status table. It is created
//! with every cell set to [`ShiftStatus::Work`] and filled in place by the
//! assignment engine, so no cell is ever missing. A grid read back through
//! serde is checked for the same shape before it is handed out.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::ShiftStatus;
use crate::error::GridShapeError;

/// The (date, employee) → status table of one month.
///
/// Cells are stored employee-major: one contiguous row of days per
/// employee, in roster order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawGrid")]
pub struct ScheduleGrid {
    dates: Vec<NaiveDate>,
    employees: Vec<String>,
    cells: Vec<ShiftStatus>,
}

#[derive(Deserialize)]
struct RawGrid {
    dates: Vec<NaiveDate>,
    employees: Vec<String>,
    cells: Vec<ShiftStatus>,
}

impl TryFrom<RawGrid> for ScheduleGrid {
    type Error = GridShapeError;

    fn try_from(raw: RawGrid) -> Result<Self, Self::Error> {
        if let Some(pair) = raw.dates.windows(2).find(|pair| pair[0] >= pair[1]) {
            return Err(GridShapeError::UnorderedDates { date: pair[1] });
        }
        if raw.cells.len() != raw.dates.len() * raw.employees.len() {
            return Err(GridShapeError::CellCount {
                cells: raw.cells.len(),
                days: raw.dates.len(),
                employees: raw.employees.len(),
            });
        }
        Ok(Self {
            dates: raw.dates,
            employees: raw.employees,
            cells: raw.cells,
        })
    }
}

impl ScheduleGrid {
    /// Creates a grid with every cell set to `Work`.
    ///
    /// `dates` must be ascending.
    pub fn new(dates: Vec<NaiveDate>, employees: Vec<String>) -> Self {
        let cells = vec![ShiftStatus::Work; dates.len() * employees.len()];
        Self {
            dates,
            employees,
            cells,
        }
    }

    /// Dates covered, ascending.
    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    /// Employee names in roster order.
    pub fn employees(&self) -> &[String] {
        &self.employees
    }

    /// Number of days covered.
    pub fn day_count(&self) -> usize {
        self.dates.len()
    }

    /// Number of employees covered.
    pub fn employee_count(&self) -> usize {
        self.employees.len()
    }

    /// Total number of cells (days × employees).
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Index of a date, if covered.
    pub fn day_index(&self, date: NaiveDate) -> Option<usize> {
        self.dates.binary_search(&date).ok()
    }

    /// Index of an employee, if covered.
    pub fn employee_index(&self, name: &str) -> Option<usize> {
        self.employees.iter().position(|e| e == name)
    }

    #[inline]
    fn offset(&self, day: usize, employee: usize) -> usize {
        employee * self.dates.len() + day
    }

    /// Status by index.
    ///
    /// # Panics
    /// Panics if either index is out of range.
    #[inline]
    pub fn status_at(&self, day: usize, employee: usize) -> ShiftStatus {
        self.cells[self.offset(day, employee)]
    }

    /// Overwrites a cell by index.
    ///
    /// # Panics
    /// Panics if either index is out of range.
    #[inline]
    pub fn set_at(&mut self, day: usize, employee: usize, status: ShiftStatus) {
        let offset = self.offset(day, employee);
        self.cells[offset] = status;
    }

    /// Status of `employee` on `date`.
    pub fn get(&self, date: NaiveDate, employee: &str) -> Option<ShiftStatus> {
        let day = self.day_index(date)?;
        let emp = self.employee_index(employee)?;
        Some(self.status_at(day, emp))
    }

    /// Overwrites a cell. Returns `false` if the date or employee is unknown.
    pub fn set(&mut self, date: NaiveDate, employee: &str, status: ShiftStatus) -> bool {
        match (self.day_index(date), self.employee_index(employee)) {
            (Some(day), Some(emp)) => {
                self.set_at(day, emp, status);
                true
            }
            _ => false,
        }
    }

    /// One employee's statuses, one per day.
    pub fn row(&self, employee: usize) -> &[ShiftStatus] {
        let start = employee * self.dates.len();
        &self.cells[start..start + self.dates.len()]
    }

    /// Row of an employee by name.
    pub fn row_of(&self, employee: &str) -> Option<&[ShiftStatus]> {
        self.employee_index(employee).map(|idx| self.row(idx))
    }

    /// Dates on which `employee` holds `status`.
    pub fn dates_with(&self, employee: &str, status: ShiftStatus) -> Vec<NaiveDate> {
        let Some(row) = self.row_of(employee) else {
            return Vec::new();
        };
        row.iter()
            .zip(&self.dates)
            .filter(|(s, _)| **s == status)
            .map(|(_, d)| *d)
            .collect()
    }

    /// Employees holding `status` on `date`.
    pub fn employees_with(&self, date: NaiveDate, status: ShiftStatus) -> Vec<&str> {
        let Some(day) = self.day_index(date) else {
            return Vec::new();
        };
        self.employees
            .iter()
            .enumerate()
            .filter(|(emp, _)| self.status_at(day, *emp) == status)
            .map(|(_, name)| name.as_str())
            .collect()
    }

    /// Iterates all cells as (date, employee, status), employee-major.
    pub fn iter(&self) -> impl Iterator<Item = (NaiveDate, &str, ShiftStatus)> + '_ {
        self.employees.iter().enumerate().flat_map(move |(emp, name)| {
            self.dates
                .iter()
                .enumerate()
                .map(move |(day, date)| (*date, name.as_str(), self.status_at(day, emp)))
        })
    }
}

/// Dates an employee has already spent on rest or protected duty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RestDays(BTreeSet<NaiveDate>);

impl RestDays {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a date. Returns `false` if it was already recorded.
    pub fn insert(&mut self, date: NaiveDate) -> bool {
        self.0.insert(date)
    }

    /// Whether a date is recorded.
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.0.contains(&date)
    }

    /// Number of recorded dates.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether nothing is recorded.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Recorded dates, ascending.
    pub fn iter(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.0.iter().copied()
    }
}
