//! Payroll record models.
//!
//! This module contains the [`PayrollRecord`] type and the structures that
//! travel with it: the attendance figures it was computed from and the audit
//! trace recording every calculation step.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{PayPeriod, PayrollStatus};

/// Attendance figures for one employee over a pay period.
///
/// # Example
///
/// ```
/// use hr_engine::models::AttendanceSummary;
/// use rust_decimal::Decimal;
///
/// let summary = AttendanceSummary {
///     present_days: 20,
///     leave_days: 2,
///     hours_worked: Decimal::new(160, 0),
///     overtime_hours: Decimal::new(15, 0),
/// };
/// assert_eq!(summary.present_days + summary.leave_days, 22);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceSummary {
    /// Days counted as present (including late and half days).
    pub present_days: i64,
    /// Days on leave.
    pub leave_days: i64,
    /// Total worked hours.
    pub hours_worked: Decimal,
    /// Total overtime hours.
    pub overtime_hours: Decimal,
}

/// A single step in the audit trace recording a calculation decision.
///
/// Each step captures the input, output, and reasoning for a rule application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditStep {
    /// The sequential step number.
    pub step_number: u32,
    /// The unique identifier of the rule that was applied.
    pub rule_id: String,
    /// The human-readable name of the rule.
    pub rule_name: String,
    /// The input data for this step.
    pub input: serde_json::Value,
    /// The output data from this step.
    pub output: serde_json::Value,
    /// Human-readable explanation of the decision.
    pub reasoning: String,
}

/// A warning generated during calculation.
///
/// Warnings flag results that were computed but may need review.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditWarning {
    /// A code identifying the type of warning.
    pub code: String,
    /// A human-readable description of the warning.
    pub message: String,
}

/// The complete audit trace for a payroll calculation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditTrace {
    /// The sequence of calculation steps.
    pub steps: Vec<AuditStep>,
    /// Any warnings generated during calculation.
    pub warnings: Vec<AuditWarning>,
}

impl AuditTrace {
    /// Returns the step recorded for `rule_id`, if any.
    pub fn step(&self, rule_id: &str) -> Option<&AuditStep> {
        self.steps.iter().find(|s| s.rule_id == rule_id)
    }

    /// Returns true if a warning with `code` was recorded.
    pub fn has_warning(&self, code: &str) -> bool {
        self.warnings.iter().any(|w| w.code == code)
    }
}

/// The payroll result for one employee and pay period.
///
/// `gross_salary` and `net_salary` are derived:
/// `gross = basic + overtime + bonuses` and
/// `net = gross - tax - other deductions`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollRecord {
    /// Unique identifier for this record.
    pub id: Uuid,
    /// The employee paid.
    pub employee_id: String,
    /// The period covered.
    pub pay_period: PayPeriod,
    /// Salary before overtime and bonuses.
    pub basic_salary: Decimal,
    /// Pay for overtime hours.
    pub overtime_pay: Decimal,
    /// Bonus amount.
    pub bonuses: Decimal,
    /// Income tax withheld.
    pub tax_deduction: Decimal,
    /// Non-tax deductions.
    pub other_deductions: Decimal,
    /// `basic + overtime + bonuses`.
    pub gross_salary: Decimal,
    /// `gross - tax - other deductions`.
    pub net_salary: Decimal,
    /// Lifecycle status.
    pub status: PayrollStatus,
    /// When the amounts were generated.
    pub generated_on: NaiveDate,
    /// When the record was paid.
    #[serde(default)]
    pub paid_on: Option<NaiveDate>,
    /// The attendance figures the record was computed from.
    pub attendance: AttendanceSummary,
    /// Step-by-step record of the calculation.
    pub audit_trace: AuditTrace,
}
