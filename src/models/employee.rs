//! Employee model and compensation basis.
//!
//! This module defines the [`Employee`] struct and the [`Compensation`] enum
//! describing how an employee is paid.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// How an employee's basic salary is derived.
///
/// An employee is paid on exactly one basis: a fixed annual salary or an
/// hourly rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "basis", rename_all = "snake_case")]
pub enum Compensation {
    /// A fixed annual salary.
    Fixed {
        /// The gross annual salary.
        annual_salary: Decimal,
    },
    /// Paid per hour worked.
    Hourly {
        /// The rate per ordinary hour.
        hourly_rate: Decimal,
    },
}

/// Represents an employee subject to payroll and attendance accounting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    /// Unique identifier for the employee.
    pub id: String,
    /// The employee's display name.
    pub name: String,
    /// The compensation basis.
    pub compensation: Compensation,
    /// Opaque reference to the employee's department.
    #[serde(default)]
    pub department_id: Option<String>,
    /// Opaque reference to the employee's job role.
    #[serde(default)]
    pub role_id: Option<String>,
}

impl Employee {
    /// Returns true if the employee is paid by the hour.
    ///
    /// # Examples
    ///
    /// ```
    /// use hr_engine::models::{Compensation, Employee};
    /// use rust_decimal::Decimal;
    ///
    /// let employee = Employee {
    ///     id: "emp_001".to_string(),
    ///     name: "Ada Lovelace".to_string(),
    ///     compensation: Compensation::Hourly { hourly_rate: Decimal::new(35, 0) },
    ///     department_id: None,
    ///     role_id: None,
    /// };
    /// assert!(employee.is_hourly());
    /// ```
    pub fn is_hourly(&self) -> bool {
        matches!(self.compensation, Compensation::Hourly { .. })
    }
}
