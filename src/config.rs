//! Serializable roster configuration.
//!
//! Describes a roster as plain data (names, rule kinds and their
//! parameters) so it can be loaded from any serde format. Omitted
//! parameters take the same defaults as the rule constructors.
//!
//! ```
//! use duty_roster::config::{EmployeeConfig, RosterConfig, RuleConfig};
//!
//! let config = RosterConfig {
//!     employees: vec![
//!         EmployeeConfig::new("Alice", RuleConfig::WeekendRest),
//!         EmployeeConfig::new("Dora", RuleConfig::Director),
//!     ],
//!     ..Default::default()
//! };
//! let roster = config.build_roster().unwrap();
//! assert_eq!(roster.len(), 2);
//! ```

use std::sync::Arc;

use chrono::{NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use crate::error::{RuleConfigError, ScheduleError};
use crate::models::{Employee, Roster};
use crate::rules::{
    DevelopmentDutyRule, DirectorRule, FixedDaysRest, InternalExternalRule, JiangdongWeekendRule,
    MainHospitalDutyRule, PeriodicRest, SatelliteDutyRule, ShiftRule, WeekendRest,
    WeekendRotationRule,
};
use crate::scheduler::{AssignmentEngine, DEFAULT_WEEKLY_REST_QUOTA};

/// A roster and its engine settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RosterConfig {
    /// Statutory holidays.
    #[serde(default)]
    pub holidays: Vec<NaiveDate>,
    /// Rest days required per ISO week.
    #[serde(default = "default_rest_quota")]
    pub weekly_rest_quota: usize,
    /// Employees in roster order.
    #[serde(default)]
    pub employees: Vec<EmployeeConfig>,
}

impl Default for RosterConfig {
    fn default() -> Self {
        Self {
            holidays: Vec::new(),
            weekly_rest_quota: DEFAULT_WEEKLY_REST_QUOTA,
            employees: Vec::new(),
        }
    }
}

/// One employee and its rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmployeeConfig {
    /// Employee name.
    pub name: String,
    /// Bound rule.
    pub rule: RuleConfig,
}

impl EmployeeConfig {
    /// Creates an entry.
    pub fn new(name: impl Into<String>, rule: RuleConfig) -> Self {
        Self {
            name: name.into(),
            rule,
        }
    }
}

/// Rule kind and parameters, tagged by `kind`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RuleConfig {
    /// See [`WeekendRest`].
    WeekendRest,
    /// See [`FixedDaysRest`].
    FixedDaysRest { rest_days: Vec<Weekday> },
    /// See [`PeriodicRest`].
    PeriodicRest {
        rest_every_n_weeks: u32,
        rest_days: Vec<Weekday>,
        /// Defaults to `rest_every_n_weeks`.
        #[serde(default)]
        night_shift_every_n_weeks: Option<u32>,
        #[serde(default)]
        night_shift_days: Vec<Weekday>,
    },
    /// See [`DirectorRule`].
    Director,
    /// See [`JiangdongWeekendRule`].
    JiangdongWeekend {
        partner: String,
        #[serde(default)]
        starts_on: bool,
    },
    /// See [`WeekendRotationRule`].
    WeekendRotation {
        partner: String,
        #[serde(default)]
        starts_first: bool,
        #[serde(default = "default_cycle")]
        cycle: Vec<bool>,
        #[serde(default)]
        cycle_offset: usize,
    },
    /// See [`MainHospitalDutyRule`].
    MainHospitalDuty { rotation: Vec<String> },
    /// See [`InternalExternalRule`].
    InternalExternal {
        group: Vec<String>,
        #[serde(default = "default_internal_probability")]
        internal_probability: f64,
    },
    /// See [`DevelopmentDutyRule`].
    DevelopmentDuty {
        partner: String,
        #[serde(default = "default_monthly_limit")]
        monthly_limit: u32,
    },
    /// See [`SatelliteDutyRule`].
    SatelliteDuty {
        early_rotation: Vec<String>,
        late_rotation: Vec<String>,
        #[serde(default = "default_friday_acceptance")]
        friday_acceptance: f64,
        #[serde(default = "default_weekend_acceptance")]
        weekend_acceptance: f64,
    },
}

fn default_rest_quota() -> usize {
    DEFAULT_WEEKLY_REST_QUOTA
}

fn default_cycle() -> Vec<bool> {
    WeekendRotationRule::DEFAULT_CYCLE.to_vec()
}

fn default_internal_probability() -> f64 {
    InternalExternalRule::DEFAULT_INTERNAL_PROBABILITY
}

fn default_monthly_limit() -> u32 {
    DevelopmentDutyRule::DEFAULT_MONTHLY_LIMIT
}

fn default_friday_acceptance() -> f64 {
    SatelliteDutyRule::DEFAULT_FRIDAY_ACCEPTANCE
}

fn default_weekend_acceptance() -> f64 {
    SatelliteDutyRule::DEFAULT_WEEKEND_ACCEPTANCE
}

impl RuleConfig {
    /// Builds the rule.
    pub fn build(&self) -> Result<Arc<dyn ShiftRule>, RuleConfigError> {
        let rule: Arc<dyn ShiftRule> = match self {
            RuleConfig::WeekendRest => Arc::new(WeekendRest),
            RuleConfig::FixedDaysRest { rest_days } => {
                Arc::new(FixedDaysRest::new(rest_days.iter().copied())?)
            }
            RuleConfig::PeriodicRest {
                rest_every_n_weeks,
                rest_days,
                night_shift_every_n_weeks,
                night_shift_days,
            } => Arc::new(
                PeriodicRest::new(*rest_every_n_weeks, rest_days.iter().copied())?
                    .with_night_shifts(
                        night_shift_every_n_weeks.unwrap_or(*rest_every_n_weeks),
                        night_shift_days.iter().copied(),
                    )?,
            ),
            RuleConfig::Director => Arc::new(DirectorRule::new()),
            RuleConfig::JiangdongWeekend { partner, starts_on } => {
                Arc::new(JiangdongWeekendRule::new(partner.clone(), *starts_on))
            }
            RuleConfig::WeekendRotation {
                partner,
                starts_first,
                cycle,
                cycle_offset,
            } => Arc::new(
                WeekendRotationRule::new(partner.clone(), *starts_first)
                    .with_cycle(cycle.clone(), *cycle_offset)?,
            ),
            RuleConfig::MainHospitalDuty { rotation } => {
                Arc::new(MainHospitalDutyRule::new(rotation.iter().cloned())?)
            }
            RuleConfig::InternalExternal {
                group,
                internal_probability,
            } => Arc::new(
                InternalExternalRule::new(group.iter().cloned())?
                    .with_internal_probability(*internal_probability)?,
            ),
            RuleConfig::DevelopmentDuty {
                partner,
                monthly_limit,
            } => Arc::new(
                DevelopmentDutyRule::new(partner.clone()).with_monthly_limit(*monthly_limit)?,
            ),
            RuleConfig::SatelliteDuty {
                early_rotation,
                late_rotation,
                friday_acceptance,
                weekend_acceptance,
            } => Arc::new(
                SatelliteDutyRule::new(early_rotation.iter().cloned(), late_rotation.iter().cloned())?
                    .with_acceptance(*friday_acceptance, *weekend_acceptance)?,
            ),
        };
        Ok(rule)
    }
}

impl RosterConfig {
    /// Builds every rule and the roster, in order.
    ///
    /// The roster is not validated here; [`build_engine`](Self::build_engine)
    /// does that.
    pub fn build_roster(&self) -> Result<Roster, RuleConfigError> {
        self.employees
            .iter()
            .map(|e| {
                e.rule
                    .build()
                    .map(|rule| Employee::with_shared_rule(e.name.clone(), rule))
            })
            .collect()
    }

    /// Builds a validated engine with the configured holidays and quota.
    pub fn build_engine(&self) -> Result<AssignmentEngine, ScheduleError> {
        let engine = AssignmentEngine::new(self.build_roster()?)?
            .with_holidays(self.holidays.iter().copied())
            .with_rest_quota(self.weekly_rest_quota);
        Ok(engine)
    }
}
