//! Employees and the roster.
//!
//! An employee is a name bound to exactly one rule. The roster keeps
//! employees in a fixed order, which is also the evaluation order within a
//! day and the row order of the schedule grid.

use std::sync::Arc;

use crate::rules::ShiftRule;

/// A staff member and the rule that decides their days.
#[derive(Debug, Clone)]
pub struct Employee {
    name: String,
    rule: Arc<dyn ShiftRule>,
}

impl Employee {
    /// Binds `rule` to a new employee.
    pub fn new<R: ShiftRule + 'static>(name: impl Into<String>, rule: R) -> Self {
        Self::with_shared_rule(name, Arc::new(rule))
    }

    /// Binds an already shared rule.
    pub fn with_shared_rule(name: impl Into<String>, rule: Arc<dyn ShiftRule>) -> Self {
        Self {
            name: name.into(),
            rule,
        }
    }

    /// Employee name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Bound rule.
    pub fn rule(&self) -> &dyn ShiftRule {
        self.rule.as_ref()
    }
}

/// Ordered list of employees.
#[derive(Debug, Clone, Default)]
pub struct Roster {
    employees: Vec<Employee>,
}

impl Roster {
    /// Creates an empty roster.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an employee bound to `rule`.
    pub fn with_employee<R: ShiftRule + 'static>(mut self, name: impl Into<String>, rule: R) -> Self {
        self.employees.push(Employee::new(name, rule));
        self
    }

    /// Appends an employee.
    pub fn add_employee(&mut self, employee: Employee) {
        self.employees.push(employee);
    }

    /// Employees in roster order.
    pub fn employees(&self) -> &[Employee] {
        &self.employees
    }

    /// Names in roster order.
    pub fn names(&self) -> Vec<String> {
        self.employees.iter().map(|e| e.name.clone()).collect()
    }

    /// Finds an employee by name.
    pub fn get(&self, name: &str) -> Option<&Employee> {
        self.employees.iter().find(|e| e.name == name)
    }

    /// Roster position of an employee.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.employees.iter().position(|e| e.name == name)
    }

    /// Number of employees.
    pub fn len(&self) -> usize {
        self.employees.len()
    }

    /// Whether the roster is empty.
    pub fn is_empty(&self) -> bool {
        self.employees.is_empty()
    }
}

impl FromIterator<Employee> for Roster {
    fn from_iter<I: IntoIterator<Item = Employee>>(iter: I) -> Self {
        Self {
            employees: iter.into_iter().collect(),
        }
    }
}
