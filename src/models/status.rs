//! Shift status labels.
//!
//! Every (date, employee) cell of a roster holds exactly one status.
//! Statuses split into two families:
//!
//! | Family | Statuses | Meaning |
//! |--------|----------|---------|
//! | Working | Work, Internal, External | Ordinary attendance; may still become Rest |
//! | Protected | Rest, Duty, MainDuty, DevelopmentDuty, SatelliteDuty | Committed; later phases keep them |

use serde::{Deserialize, Serialize};
use std::fmt;

/// Status of one employee on one date.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum ShiftStatus {
    /// Regular day work (initial value of every cell).
    #[default]
    Work,
    /// Day off.
    Rest,
    /// Night or weekend duty.
    Duty,
    /// Main hospital duty (Friday rotation).
    MainDuty,
    /// Internal assignment.
    Internal,
    /// External assignment.
    External,
    /// Development duty.
    DevelopmentDuty,
    /// Duty at the satellite site.
    SatelliteDuty,
}

impl ShiftStatus {
    /// All statuses in declaration order.
    pub const ALL: [ShiftStatus; 8] = [
        ShiftStatus::Work,
        ShiftStatus::Rest,
        ShiftStatus::Duty,
        ShiftStatus::MainDuty,
        ShiftStatus::Internal,
        ShiftStatus::External,
        ShiftStatus::DevelopmentDuty,
        ShiftStatus::SatelliteDuty,
    ];

    /// Whether later phases must leave this status in place.
    #[inline]
    pub fn is_protected(self) -> bool {
        matches!(
            self,
            ShiftStatus::Rest
                | ShiftStatus::Duty
                | ShiftStatus::MainDuty
                | ShiftStatus::DevelopmentDuty
                | ShiftStatus::SatelliteDuty
        )
    }

    /// Whether this is an ordinary working status.
    #[inline]
    pub fn is_working(self) -> bool {
        matches!(
            self,
            ShiftStatus::Work | ShiftStatus::Internal | ShiftStatus::External
        )
    }

    /// Label printed in exported sheets.
    pub fn label(self) -> &'static str {
        match self {
            ShiftStatus::Work => "工作",
            ShiftStatus::Rest => "休息",
            ShiftStatus::Duty => "值班",
            ShiftStatus::MainDuty => "总院值班",
            ShiftStatus::Internal => "内勤",
            ShiftStatus::External => "外勤",
            ShiftStatus::DevelopmentDuty => "开发值班",
            ShiftStatus::SatelliteDuty => "江东值班",
        }
    }
}

impl fmt::Display for ShiftStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
