//! Roster validation.
//!
//! Checks the structural integrity of a roster before scheduling.
//! Detects:
//! - Duplicate employee names
//! - Partners or rotation members missing from the roster
//! - Rules bound to an employee they cannot serve
//! - Peers of a shared rotation configured inconsistently
//!
//! All issues are collected, not just the first one.

use std::collections::HashSet;

use thiserror::Error;

use crate::models::{Employee, Roster};

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{message}")]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// Two employees share the same name.
    DuplicateEmployee,
    /// A rule refers to a name that is not on the roster.
    UnknownEmployee,
    /// A rule rejects the employee it is bound to.
    InvalidBinding,
}

impl ValidationError {
    /// Creates an error of `kind`.
    pub fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Validates a roster.
///
/// Checks:
/// 1. No duplicate employee names
/// 2. Every name a rule refers to is on the roster
/// 3. Every rule accepts its employee (`ShiftRule::check_binding`)
/// 4. Every peer of a shared rotation runs the same rule kind with a
///    matching [`RotationKey`](crate::rules::RotationKey): pairs point at
///    each other, share their cycle and start on opposite roles; group
///    members hold identical lists
///
/// Each pair of peers is compared once.
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_roster(roster: &Roster) -> ValidationResult {
    let mut errors = Vec::new();

    let mut names = HashSet::new();
    for employee in roster.employees() {
        if !names.insert(employee.name()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateEmployee,
                format!("Duplicate employee: {}", employee.name()),
            ));
        }
    }

    for (position, employee) in roster.employees().iter().enumerate() {
        let rule = employee.rule();

        if let Err(e) = rule.check_binding(employee.name()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidBinding,
                format!("Employee '{}': {e}", employee.name()),
            ));
        }

        for referenced in rule.referenced_employees() {
            if roster.get(referenced).is_none() {
                errors.push(ValidationError::new(
                    ValidationErrorKind::UnknownEmployee,
                    format!(
                        "Employee '{}' ({}) references unknown employee '{}'",
                        employee.name(),
                        rule.name(),
                        referenced
                    ),
                ));
            }
        }

        check_peers(roster, position, employee, &mut errors);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Compares the employee at `position` against every rotation peer that
/// has not already compared itself against this employee.
fn check_peers(
    roster: &Roster,
    position: usize,
    employee: &Employee,
    errors: &mut Vec<ValidationError>,
) {
    let rule = employee.rule();
    let Some(key) = rule.rotation_key() else {
        return;
    };

    for referenced in rule.referenced_employees() {
        if referenced == employee.name() {
            continue;
        }
        let (Some(peer_position), Some(peer)) = (roster.position(referenced), roster.get(referenced))
        else {
            continue;
        };
        let peer_rule = peer.rule();

        let problem = if peer_rule.name() != rule.name() {
            Some(format!("is bound to {}", peer_rule.name()))
        } else if peer_position < position
            && peer_rule.referenced_employees().contains(&employee.name())
        {
            None
        } else {
            key.mismatch(employee.name(), peer_rule.rotation_key().as_ref())
        };

        if let Some(problem) = problem {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidBinding,
                format!(
                    "Employee '{}' ({}) shares a rotation with '{}', which {}",
                    employee.name(),
                    rule.name(),
                    referenced,
                    problem
                ),
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::{
        DevelopmentDutyRule, InternalExternalRule, JiangdongWeekendRule, MainHospitalDutyRule,
        SatelliteDutyRule, WeekendRest, WeekendRotationRule,
    };

    fn binding_errors(roster: &Roster) -> Vec<ValidationError> {
        validate_roster(roster)
            .unwrap_err()
            .into_iter()
            .filter(|e| e.kind == ValidationErrorKind::InvalidBinding)
            .collect()
    }

    #[test]
    fn test_valid_roster() {
        let roster = Roster::new()
            .with_employee("A", JiangdongWeekendRule::new("B", true))
            .with_employee("B", JiangdongWeekendRule::new("A", false))
            .with_employee("C", WeekendRest);
        assert!(validate_roster(&roster).is_ok());
    }

    #[test]
    fn test_empty_roster_is_valid() {
        assert!(validate_roster(&Roster::new()).is_ok());
    }

    #[test]
    fn test_duplicate_employee() {
        let roster = Roster::new()
            .with_employee("A", WeekendRest)
            .with_employee("A", WeekendRest);
        let errors = validate_roster(&roster).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind, ValidationErrorKind::DuplicateEmployee);
    }

    #[test]
    fn test_unknown_partner() {
        let roster = Roster::new().with_employee("A", DevelopmentDutyRule::new("Ghost"));
        let errors = validate_roster(&roster).unwrap_err();
        assert_eq!(errors[0].kind, ValidationErrorKind::UnknownEmployee);
        assert!(errors[0].message.contains("Ghost"));
    }

    #[test]
    fn test_invalid_binding() {
        let rotation = MainHospitalDutyRule::new(["A", "B"]).unwrap();
        let roster = Roster::new()
            .with_employee("A", rotation.clone())
            .with_employee("B", rotation.clone())
            .with_employee("C", rotation);
        let errors = validate_roster(&roster).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind, ValidationErrorKind::InvalidBinding);
        assert!(errors[0].message.contains("'C'"));
    }

    #[test]
    fn test_collects_all_errors() {
        let roster = Roster::new()
            .with_employee("A", JiangdongWeekendRule::new("A", true))
            .with_employee("A", WeekendRest)
            .with_employee("B", DevelopmentDutyRule::new("Z"));
        let errors = validate_roster(&roster).unwrap_err();
        let kinds: Vec<_> = errors.iter().map(|e| e.kind).collect();
        assert!(kinds.contains(&ValidationErrorKind::DuplicateEmployee));
        assert!(kinds.contains(&ValidationErrorKind::InvalidBinding));
        assert!(kinds.contains(&ValidationErrorKind::UnknownEmployee));
    }

    #[test]
    fn test_jiangdong_pair_with_same_start() {
        let roster = Roster::new()
            .with_employee("A", JiangdongWeekendRule::new("B", true))
            .with_employee("B", JiangdongWeekendRule::new("A", true));
        let errors = binding_errors(&roster);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].message.contains("same role"), "{}", errors[0].message);
    }

    #[test]
    fn test_weekend_rotation_pair_with_same_start() {
        let roster = Roster::new()
            .with_employee("A", WeekendRotationRule::new("B", true))
            .with_employee("B", WeekendRotationRule::new("A", true));
        assert_eq!(binding_errors(&roster).len(), 1);
    }

    #[test]
    fn test_weekend_rotation_cycle_mismatch() {
        let roster = Roster::new()
            .with_employee("A", WeekendRotationRule::new("B", true))
            .with_employee(
                "B",
                WeekendRotationRule::new("A", false)
                    .with_cycle(vec![true, false, false], 1)
                    .unwrap(),
            );
        let errors = binding_errors(&roster);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].message.contains("duty cycle"), "{}", errors[0].message);
    }

    #[test]
    fn test_partner_not_reciprocal() {
        let roster = Roster::new()
            .with_employee("A", DevelopmentDutyRule::new("B"))
            .with_employee("B", DevelopmentDutyRule::new("C"))
            .with_employee("C", DevelopmentDutyRule::new("B"));
        let errors = binding_errors(&roster);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].message.starts_with("Employee 'A'"));
        assert!(errors[0].message.contains("paired with 'C'"));
    }

    #[test]
    fn test_main_duty_lists_differ() {
        let roster = Roster::new()
            .with_employee("A", MainHospitalDutyRule::new(["A", "B"]).unwrap())
            .with_employee("B", MainHospitalDutyRule::new(["B", "A"]).unwrap());
        let errors = binding_errors(&roster);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].message.contains("different rotation list"));
    }

    #[test]
    fn test_satellite_late_lists_differ() {
        let roster = Roster::new()
            .with_employee("A", SatelliteDutyRule::new(["A", "B"], ["A", "B"]).unwrap())
            .with_employee("B", SatelliteDutyRule::new(["A", "B"], ["B", "A"]).unwrap());
        assert_eq!(binding_errors(&roster).len(), 1);
    }

    #[test]
    fn test_group_member_under_other_rule() {
        let roster = Roster::new()
            .with_employee("A", InternalExternalRule::new(["A", "B"]).unwrap())
            .with_employee("B", WeekendRest);
        let errors = binding_errors(&roster);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].message.contains("bound to WeekendRest"));
    }

    #[test]
    fn test_consistent_shared_rotations() {
        let main = MainHospitalDutyRule::new(["C", "D"]).unwrap();
        let roster = Roster::new()
            .with_employee("A", WeekendRotationRule::new("B", true))
            .with_employee("B", WeekendRotationRule::new("A", false))
            .with_employee("C", main.clone())
            .with_employee("D", main)
            .with_employee("E", DevelopmentDutyRule::new("F"))
            .with_employee("F", DevelopmentDutyRule::new("E"));
        assert!(validate_roster(&roster).is_ok());
    }
}
