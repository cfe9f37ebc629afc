//! Rotation state.
//!
//! Everything a rule needs to remember across the dates of one month:
//! rotation cursors, last-duty date, cumulative counters and the weekly
//! toggle. The engine owns one record per employee and lends it to the
//! employee's rule on each call, so the state can be inspected after a
//! run and constructed directly in tests.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Position in a cyclic rotation: an index plus its modulus.
///
/// A modulus of zero denotes an empty rotation; the index then stays 0.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RotationCursor {
    /// Current slot.
    pub index: usize,
    /// Number of slots.
    pub modulus: usize,
}

impl RotationCursor {
    /// Creates a cursor at `index` (reduced modulo `modulus`).
    pub fn new(index: usize, modulus: usize) -> Self {
        let index = if modulus == 0 { 0 } else { index % modulus };
        Self { index, modulus }
    }

    /// Current slot.
    #[inline]
    pub fn current(&self) -> usize {
        self.index
    }

    /// Moves to the next slot, returning the slot that was current.
    pub fn advance(&mut self) -> usize {
        let current = self.index;
        if self.modulus > 0 {
            self.index = (self.index + 1) % self.modulus;
        }
        current
    }
}

/// Mutable per-employee bookkeeping for one month.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RotationState {
    /// Primary rotation cursor.
    pub cursor: RotationCursor,
    /// Secondary rotation cursor (second list or cycle).
    pub alt_cursor: RotationCursor,
    /// Date of the most recent duty assigned by the rule.
    pub last_duty: Option<NaiveDate>,
    /// Duties (or internal assignments) given so far.
    pub duty_count: u32,
    /// Workdays counted so far.
    pub workday_count: u32,
    /// Two-state weekly flag.
    pub toggle: bool,
    /// ISO week of the last evaluated date.
    pub current_week: Option<u32>,
    /// Per-week decision, keyed by ISO week.
    pub week_flags: BTreeMap<u32, bool>,
}

impl RotationState {
    /// Notes the ISO week of the date being evaluated.
    ///
    /// Returns `true` when a different week than the previous call begins;
    /// the very first call returns `false`.
    pub fn enter_week(&mut self, week: u32) -> bool {
        match self.current_week.replace(week) {
            Some(previous) => previous != week,
            None => false,
        }
    }

    /// Records a duty on `date`.
    pub fn record_duty(&mut self, date: NaiveDate) {
        self.last_duty = Some(date);
        self.duty_count += 1;
    }

    /// Days since the last recorded duty.
    pub fn days_since_duty(&self, date: NaiveDate) -> Option<i64> {
        self.last_duty.map(|last| (date - last).num_days())
    }
}
