//! Month calendar.
//!
//! Enumerates the days of one calendar month together with the attributes
//! the rules key on: weekday, ISO week and statutory holidays.
//!
//! # Week Model
//! Weeks follow ISO 8601 (Monday first). A month's weeks are clipped to
//! the month, so the first and last week may be partial:
//!
//! ```text
//!      April 2025
//! Mo Tu We Th Fr Sa Su
//!     1  2  3  4  5  6   W14 (days 0..6)
//!  7  8  9 10 11 12 13   W15
//! ...
//! 28 29 30               W18 (days 27..30)
//! ```

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::ops::Range;

use crate::error::ScheduleError;

/// One day of the month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Day {
    /// Position within the month (0-based).
    pub index: usize,
    /// Calendar date.
    pub date: NaiveDate,
    /// Day of week.
    pub weekday: Weekday,
    /// ISO 8601 week number (1..=53).
    pub iso_week: u32,
    /// ISO 8601 week-based year.
    pub iso_year: i32,
    /// Configured statutory holiday.
    pub is_holiday: bool,
}

impl Day {
    fn new(index: usize, date: NaiveDate) -> Self {
        let iso = date.iso_week();
        Self {
            index,
            date,
            weekday: date.weekday(),
            iso_week: iso.week(),
            iso_year: iso.year(),
            is_holiday: false,
        }
    }

    /// Weekday as Monday = 0 .. Sunday = 6.
    #[inline]
    pub fn weekday_index(&self) -> u32 {
        self.weekday.num_days_from_monday()
    }

    /// Saturday or Sunday.
    #[inline]
    pub fn is_weekend(&self) -> bool {
        matches!(self.weekday, Weekday::Sat | Weekday::Sun)
    }
}

/// An ISO week clipped to the month.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Week {
    /// ISO week-based year.
    pub iso_year: i32,
    /// ISO week number.
    pub iso_week: u32,
    /// Day indices of the month falling in this week.
    pub days: Range<usize>,
}

impl Week {
    /// Number of in-month days.
    pub fn len(&self) -> usize {
        self.days.len()
    }

    /// Whether the week has no in-month days (never true for weeks
    /// produced by [`MonthCalendar::weeks`]).
    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }
}

/// The days of one calendar month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthCalendar {
    year: i32,
    month: u32,
    days: Vec<Day>,
}

impl MonthCalendar {
    /// Builds the calendar for `year`/`month` (1..=12).
    pub fn new(year: i32, month: u32) -> Result<Self, ScheduleError> {
        let invalid = || ScheduleError::InvalidMonth { year, month };
        if !(1..=12).contains(&month) {
            return Err(invalid());
        }
        let first = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(invalid)?;

        let days = first
            .iter_days()
            .take_while(|d| d.month() == month)
            .enumerate()
            .map(|(index, date)| Day::new(index, date))
            .collect();

        Ok(Self { year, month, days })
    }

    /// Marks statutory holidays. Dates outside the month are ignored.
    pub fn with_holidays(mut self, holidays: impl IntoIterator<Item = NaiveDate>) -> Self {
        let holidays: BTreeSet<NaiveDate> = holidays.into_iter().collect();
        for day in &mut self.days {
            day.is_holiday = holidays.contains(&day.date);
        }
        self
    }

    /// Calendar year.
    pub fn year(&self) -> i32 {
        self.year
    }

    /// Calendar month (1..=12).
    pub fn month(&self) -> u32 {
        self.month
    }

    /// All days in ascending order.
    pub fn days(&self) -> &[Day] {
        &self.days
    }

    /// Number of days in the month.
    pub fn day_count(&self) -> usize {
        self.days.len()
    }

    /// All dates in ascending order.
    pub fn dates(&self) -> Vec<NaiveDate> {
        self.days.iter().map(|d| d.date).collect()
    }

    /// Looks up a date of this month.
    pub fn day(&self, date: NaiveDate) -> Option<&Day> {
        if date.year() != self.year || date.month() != self.month {
            return None;
        }
        self.days.get(date.day0() as usize)
    }

    /// ISO weeks overlapping the month, clipped to the month.
    pub fn weeks(&self) -> Vec<Week> {
        let mut weeks: Vec<Week> = Vec::new();
        for day in &self.days {
            match weeks.last_mut() {
                Some(week) if week.iso_week == day.iso_week && week.iso_year == day.iso_year => {
                    week.days.end = day.index + 1;
                }
                _ => weeks.push(Week {
                    iso_year: day.iso_year,
                    iso_week: day.iso_week,
                    days: day.index..day.index + 1,
                }),
            }
        }
        weeks
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_day_counts() {
        assert_eq!(MonthCalendar::new(2025, 4).unwrap().day_count(), 30);
        assert_eq!(MonthCalendar::new(2024, 2).unwrap().day_count(), 29);
        assert_eq!(MonthCalendar::new(2025, 2).unwrap().day_count(), 28);
        assert_eq!(MonthCalendar::new(2025, 12).unwrap().day_count(), 31);
    }

    #[test]
    fn test_invalid_month() {
        assert_eq!(
            MonthCalendar::new(2025, 13),
            Err(ScheduleError::InvalidMonth {
                year: 2025,
                month: 13
            })
        );
        assert!(MonthCalendar::new(2025, 0).is_err());
    }

    #[test]
    fn test_day_attributes() {
        let cal = MonthCalendar::new(2025, 4).unwrap();
        let first = cal.days()[0];
        assert_eq!(first.date, date(2025, 4, 1));
        assert_eq!(first.weekday, Weekday::Tue);
        assert_eq!(first.weekday_index(), 1);
        assert_eq!(first.iso_week, 14);
        assert!(!first.is_weekend());

        let sat = cal.day(date(2025, 4, 5)).unwrap();
        assert!(sat.is_weekend());
        assert_eq!(sat.index, 4);
        assert_eq!(sat.weekday_index(), 5);
    }

    #[test]
    fn test_day_lookup_outside_month() {
        let cal = MonthCalendar::new(2025, 4).unwrap();
        assert!(cal.day(date(2025, 5, 1)).is_none());
        assert!(cal.day(date(2024, 4, 1)).is_none());
    }

    #[test]
    fn test_weeks_are_clipped() {
        let cal = MonthCalendar::new(2025, 4).unwrap();
        let weeks = cal.weeks();
        assert_eq!(weeks.len(), 5);
        assert_eq!(weeks[0].iso_week, 14);
        assert_eq!(weeks[0].days, 0..6);
        assert_eq!(weeks[1].days, 6..13);
        assert_eq!(weeks[4].iso_week, 18);
        assert_eq!(weeks[4].days, 27..30);
        assert_eq!(weeks.iter().map(Week::len).sum::<usize>(), 30);
    }

    #[test]
    fn test_iso_weeks_january_2024() {
        let cal = MonthCalendar::new(2024, 1).unwrap();
        let weeks: Vec<u32> = cal.weeks().iter().map(|w| w.iso_week).collect();
        assert_eq!(weeks, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_iso_year_at_year_boundary() {
        // 2024-12-30 and 31 belong to ISO week 1 of 2025.
        let cal = MonthCalendar::new(2024, 12).unwrap();
        let last = cal.weeks().pop().unwrap();
        assert_eq!((last.iso_year, last.iso_week), (2025, 1));
        assert_eq!(last.len(), 2);
    }

    #[test]
    fn test_holidays() {
        let cal = MonthCalendar::new(2025, 5)
            .unwrap()
            .with_holidays([date(2025, 5, 1), date(2025, 5, 2), date(2025, 6, 1)]);
        assert!(cal.day(date(2025, 5, 1)).unwrap().is_holiday);
        assert!(cal.day(date(2025, 5, 2)).unwrap().is_holiday);
        assert!(!cal.day(date(2025, 5, 5)).unwrap().is_holiday);
    }
}
