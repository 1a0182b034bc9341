//! Period-level payroll reporting.

use std::collections::{BTreeMap, BTreeSet};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{PayPeriod, PayrollRecord, PayrollStatus};

/// Totals over every payroll record of one pay period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollSummary {
    /// The period summarized.
    pub pay_period: PayPeriod,
    /// Distinct employees with a record in the period.
    pub employee_count: usize,
    /// Sum of gross salaries.
    pub total_gross: Decimal,
    /// Sum of net salaries.
    pub total_net: Decimal,
    /// Sum of tax withheld.
    pub total_tax: Decimal,
    /// Sum of non-tax deductions.
    pub total_other_deductions: Decimal,
    /// Sum of bonuses.
    pub total_bonuses: Decimal,
    /// Number of records in each status.
    pub by_status: BTreeMap<PayrollStatus, usize>,
}

impl PayrollSummary {
    /// Number of records summarized.
    pub fn record_count(&self) -> usize {
        self.by_status.values().sum()
    }
}

/// Summarizes the records whose pay period equals `period`.
///
/// Records for other periods are ignored.
pub fn summarize_payroll(period: &PayPeriod, records: &[PayrollRecord]) -> PayrollSummary {
    let mut employees = BTreeSet::new();
    let mut summary = PayrollSummary {
        pay_period: *period,
        employee_count: 0,
        total_gross: Decimal::ZERO,
        total_net: Decimal::ZERO,
        total_tax: Decimal::ZERO,
        total_other_deductions: Decimal::ZERO,
        total_bonuses: Decimal::ZERO,
        by_status: BTreeMap::new(),
    };

    for record in records.iter().filter(|r| r.pay_period == *period) {
        employees.insert(record.employee_id.as_str());
        summary.total_gross += record.gross_salary;
        summary.total_net += record.net_salary;
        summary.total_tax += record.tax_deduction;
        summary.total_other_deductions += record.other_deductions;
        summary.total_bonuses += record.bonuses;
        *summary.by_status.entry(record.status).or_insert(0) += 1;
    }

    summary.employee_count = employees.len();
    summary
}
