//! Payroll calculation.
//!
//! This module derives a [`PayrollRecord`] from an employee's compensation,
//! an attendance summary and bonuses. Each stage is a separate function
//! returning its amount together with the [`AuditStep`] that documents it;
//! [`generate`] chains them into a full audit trace.
//!
//! Stage order:
//!
//! 1. basic salary
//! 2. overtime pay
//! 3. gross salary
//! 4. tax
//! 5. other deductions
//! 6. net salary

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::config::{FixedSalaryBasis, PayrollConfig, TaxRule};
use crate::error::{EngineError, EngineResult};
use crate::models::{
    AttendanceSummary, AuditStep, AuditTrace, AuditWarning, Compensation, Employee, PayPeriod,
    PayrollRecord, PayrollStatus,
};

use super::rounding::round_to;

const MONTHS_PER_YEAR: Decimal = Decimal::from_parts(12, 0, 0, false, 0);

/// Warning code for a monthly fixed salary paid over a non-monthly period.
pub const UNPRORATED_FIXED_SALARY: &str = "UNPRORATED_FIXED_SALARY";

/// Warning code for a prorated salary over a period without working days.
pub const NO_WORKING_DAYS: &str = "NO_WORKING_DAYS";

/// The result of calculating basic salary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BasicSalaryResult {
    /// The rounded basic salary.
    pub basic_salary: Decimal,
    /// A warning raised while calculating, if any.
    pub warning: Option<AuditWarning>,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// The result of calculating overtime pay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OvertimePayResult {
    /// The unrounded hourly rate overtime is paid from.
    pub hourly_equivalent: Decimal,
    /// The rounded overtime pay.
    pub overtime_pay: Decimal,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// The result of applying a rate-based deduction to gross salary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeductionResult {
    /// The rounded amount deducted.
    pub amount: Decimal,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

fn overflow(field: &str) -> EngineError {
    EngineError::InvalidInput {
        field: field.to_string(),
        message: "amount overflow".to_string(),
    }
}

/// Hourly rate used to pay overtime.
///
/// Hourly employees use their hourly rate. Fixed-salary employees use one
/// month of salary spread over the standard monthly hours.
///
/// # Errors
///
/// Returns [`EngineError::InvalidConfig`] if a fixed salary is spread over
/// non-positive standard monthly hours, and [`EngineError::InvalidInput`]
/// if the rate overflows.
///
/// ```
/// use hr_engine::calculation::hourly_equivalent;
/// use hr_engine::config::PayrollConfig;
/// use hr_engine::models::Compensation;
/// use rust_decimal::Decimal;
///
/// let fixed = Compensation::Fixed { annual_salary: Decimal::new(96000, 0) };
/// assert_eq!(hourly_equivalent(&fixed, &PayrollConfig::default()).unwrap(), Decimal::new(50, 0));
/// ```
pub fn hourly_equivalent(
    compensation: &Compensation,
    config: &PayrollConfig,
) -> EngineResult<Decimal> {
    match compensation {
        Compensation::Hourly { hourly_rate } => Ok(*hourly_rate),
        Compensation::Fixed { annual_salary } => {
            let hours = config.standard_monthly_hours;
            if hours <= Decimal::ZERO {
                return Err(EngineError::InvalidConfig {
                    field: "standard_monthly_hours".to_string(),
                    message: format!("{} is not positive", hours),
                });
            }
            (*annual_salary / MONTHS_PER_YEAR)
                .checked_div(hours)
                .ok_or_else(|| overflow("annual_salary"))
        }
    }
}

/// Calculates basic salary for the period.
///
/// - Hourly: `hourly_rate × hours_worked`.
/// - Fixed, monthly basis: `annual_salary / 12`. Periods shorter than 28 or
///   longer than 31 days raise an [`UNPRORATED_FIXED_SALARY`] warning.
/// - Fixed, prorated basis: `annual_salary / 12 × paid_days / working_days`,
///   where paid days are present days plus paid leave days, capped at the
///   working days of the period.
///
/// # Errors
///
/// Returns [`EngineError::InvalidInput`] if the amount overflows.
pub fn calculate_basic_salary(
    compensation: &Compensation,
    period: &PayPeriod,
    attendance: &AttendanceSummary,
    config: &PayrollConfig,
    step_number: u32,
) -> EngineResult<BasicSalaryResult> {
    let dp = config.rounding_dp;

    let (basic_salary, warning, input, reasoning) = match compensation {
        Compensation::Hourly { hourly_rate } => {
            let basic = hourly_rate
                .checked_mul(attendance.hours_worked)
                .ok_or_else(|| overflow("hourly_rate"))?;
            let basic = round_to(basic, dp);
            (
                basic,
                None,
                serde_json::json!({
                    "basis": "hourly",
                    "hourly_rate": hourly_rate.normalize().to_string(),
                    "hours_worked": attendance.hours_worked.normalize().to_string()
                }),
                format!(
                    "{} hours at {} per hour",
                    attendance.hours_worked.normalize(),
                    hourly_rate.normalize()
                ),
            )
        }
        Compensation::Fixed { annual_salary } => {
            let monthly = *annual_salary / MONTHS_PER_YEAR;
            match config.fixed_salary_basis {
                FixedSalaryBasis::Monthly => {
                    let total_days = period.total_days();
                    let warning = (!(28..=31).contains(&total_days)).then(|| AuditWarning {
                        code: UNPRORATED_FIXED_SALARY.to_string(),
                        message: format!(
                            "Full monthly salary paid for a {}-day period",
                            total_days
                        ),
                    });
                    (
                        round_to(monthly, dp),
                        warning,
                        serde_json::json!({
                            "basis": "monthly",
                            "annual_salary": annual_salary.normalize().to_string()
                        }),
                        format!("{} annual salary / 12", annual_salary.normalize()),
                    )
                }
                FixedSalaryBasis::Prorated => {
                    let working_days = period.working_days();
                    let paid_days = (attendance.present_days + attendance.leave_days)
                        .min(working_days);
                    let (basic, warning) = if working_days == 0 {
                        (
                            Decimal::ZERO,
                            Some(AuditWarning {
                                code: NO_WORKING_DAYS.to_string(),
                                message: format!(
                                    "Period {} to {} has no working days",
                                    period.start_date, period.end_date
                                ),
                            }),
                        )
                    } else {
                        let basic = monthly
                            .checked_mul(Decimal::from(paid_days))
                            .ok_or_else(|| overflow("annual_salary"))?
                            / Decimal::from(working_days);
                        (round_to(basic, dp), None)
                    };
                    (
                        basic,
                        warning,
                        serde_json::json!({
                            "basis": "prorated",
                            "annual_salary": annual_salary.normalize().to_string(),
                            "paid_days": paid_days,
                            "working_days": working_days
                        }),
                        format!(
                            "{} annual salary / 12 prorated over {} of {} working days",
                            annual_salary.normalize(),
                            paid_days,
                            working_days
                        ),
                    )
                }
            }
        }
    };

    let audit_step = AuditStep {
        step_number,
        rule_id: "basic_salary".to_string(),
        rule_name: "Basic Salary".to_string(),
        input,
        output: serde_json::json!({
            "basic_salary": basic_salary.normalize().to_string()
        }),
        reasoning,
    };

    Ok(BasicSalaryResult {
        basic_salary,
        warning,
        audit_step,
    })
}

/// Calculates overtime pay as
/// `hourly_equivalent × overtime_hours × overtime_multiplier`.
///
/// # Errors
///
/// Fails as [`hourly_equivalent`] does, and with
/// [`EngineError::InvalidInput`] if the pay overflows.
pub fn calculate_overtime_pay(
    compensation: &Compensation,
    overtime_hours: Decimal,
    config: &PayrollConfig,
    step_number: u32,
) -> EngineResult<OvertimePayResult> {
    let rate = hourly_equivalent(compensation, config)?;
    let multiplier = config.overtime_multiplier;
    let overtime_pay = rate
        .checked_mul(overtime_hours)
        .and_then(|pay| pay.checked_mul(multiplier))
        .ok_or_else(|| overflow("overtime_hours"))?;
    let overtime_pay = round_to(overtime_pay, config.rounding_dp);

    let reasoning = if overtime_hours > Decimal::ZERO {
        format!(
            "{} overtime hours at {} per hour × {}",
            overtime_hours.normalize(),
            round_to(rate, config.rounding_dp).normalize(),
            multiplier.normalize()
        )
    } else {
        "No overtime hours in period".to_string()
    };

    let audit_step = AuditStep {
        step_number,
        rule_id: "overtime_pay".to_string(),
        rule_name: "Overtime Pay".to_string(),
        input: serde_json::json!({
            "hourly_equivalent": rate.normalize().to_string(),
            "overtime_hours": overtime_hours.normalize().to_string(),
            "multiplier": multiplier.normalize().to_string()
        }),
        output: serde_json::json!({
            "overtime_pay": overtime_pay.normalize().to_string()
        }),
        reasoning,
    };

    Ok(OvertimePayResult {
        hourly_equivalent: rate,
        overtime_pay,
        audit_step,
    })
}

/// Tax owed on `gross` under `rule`, before rounding.
///
/// Progressive rules tax each slab's share of `gross` at the slab's rate.
///
/// ```
/// use hr_engine::calculation::tax_on;
/// use hr_engine::config::{TaxRule, TaxSlab};
/// use rust_decimal::Decimal;
///
/// let rule = TaxRule::Progressive {
///     slabs: vec![
///         TaxSlab { min: Decimal::ZERO, max: Some(Decimal::new(1000, 0)), rate: Decimal::ZERO },
///         TaxSlab { min: Decimal::new(1000, 0), max: Some(Decimal::new(5000, 0)), rate: Decimal::new(10, 2) },
///         TaxSlab { min: Decimal::new(5000, 0), max: None, rate: Decimal::new(20, 2) },
///     ],
/// };
/// assert_eq!(tax_on(Decimal::new(6325, 0), &rule).unwrap(), Decimal::new(665, 0));
/// ```
///
/// # Errors
///
/// Returns [`EngineError::InvalidInput`] if the tax overflows.
pub fn tax_on(gross: Decimal, rule: &TaxRule) -> EngineResult<Decimal> {
    if gross <= Decimal::ZERO {
        return Ok(Decimal::ZERO);
    }
    let tax = match rule {
        TaxRule::Flat { rate } => gross.checked_mul(*rate),
        TaxRule::Progressive { slabs } => slabs
            .iter()
            .filter(|slab| gross > slab.min)
            .try_fold(Decimal::ZERO, |total, slab| {
                let top = slab.max.map_or(gross, |max| gross.min(max));
                (top - slab.min)
                    .checked_mul(slab.rate)
                    .and_then(|share| total.checked_add(share))
            }),
    };
    tax.ok_or_else(|| overflow("gross_salary"))
}

/// Calculates the income tax withheld from `gross`.
///
/// # Errors
///
/// Fails as [`tax_on`] does.
pub fn calculate_tax(
    gross: Decimal,
    config: &PayrollConfig,
    step_number: u32,
) -> EngineResult<DeductionResult> {
    let amount = round_to(tax_on(gross, &config.tax)?, config.rounding_dp);

    let (input, reasoning) = match &config.tax {
        TaxRule::Flat { rate } => (
            serde_json::json!({
                "mode": "flat",
                "gross_salary": gross.normalize().to_string(),
                "rate": rate.normalize().to_string()
            }),
            format!("{} × {}", gross.normalize(), rate.normalize()),
        ),
        TaxRule::Progressive { slabs } => (
            serde_json::json!({
                "mode": "progressive",
                "gross_salary": gross.normalize().to_string(),
                "slabs": slabs.len()
            }),
            format!(
                "{} taxed across {} progressive slabs",
                gross.normalize(),
                slabs.len()
            ),
        ),
    };

    Ok(DeductionResult {
        amount,
        audit_step: AuditStep {
            step_number,
            rule_id: "tax".to_string(),
            rule_name: "Income Tax".to_string(),
            input,
            output: serde_json::json!({
                "tax_deduction": amount.normalize().to_string()
            }),
            reasoning,
        },
    })
}

/// Calculates non-tax deductions as `gross × other_deduction_rate`.
///
/// # Errors
///
/// Returns [`EngineError::InvalidInput`] if the amount overflows.
pub fn calculate_other_deductions(
    gross: Decimal,
    config: &PayrollConfig,
    step_number: u32,
) -> EngineResult<DeductionResult> {
    let rate = config.other_deduction_rate;
    let amount = gross
        .checked_mul(rate)
        .ok_or_else(|| overflow("gross_salary"))?;
    let amount = round_to(amount.max(Decimal::ZERO), config.rounding_dp);

    Ok(DeductionResult {
        amount,
        audit_step: AuditStep {
            step_number,
            rule_id: "other_deductions".to_string(),
            rule_name: "Other Deductions".to_string(),
            input: serde_json::json!({
                "gross_salary": gross.normalize().to_string(),
                "rate": rate.normalize().to_string()
            }),
            output: serde_json::json!({
                "other_deductions": amount.normalize().to_string()
            }),
            reasoning: format!("{} × {}", gross.normalize(), rate.normalize()),
        },
    })
}

fn require_non_negative(field: &str, value: Decimal) -> EngineResult<()> {
    if value < Decimal::ZERO {
        return Err(EngineError::InvalidInput {
            field: field.to_string(),
            message: format!("{} must not be negative", value),
        });
    }
    Ok(())
}

fn validate_inputs(
    employee: &Employee,
    attendance: &AttendanceSummary,
    bonuses: Decimal,
) -> EngineResult<()> {
    match employee.compensation {
        Compensation::Fixed { annual_salary } => require_non_negative("annual_salary", annual_salary)?,
        Compensation::Hourly { hourly_rate } => require_non_negative("hourly_rate", hourly_rate)?,
    }
    require_non_negative("hours_worked", attendance.hours_worked)?;
    require_non_negative("overtime_hours", attendance.overtime_hours)?;
    require_non_negative("present_days", Decimal::from(attendance.present_days))?;
    require_non_negative("leave_days", Decimal::from(attendance.leave_days))?;
    require_non_negative("bonuses", bonuses)
}

/// Generates the payroll record for one employee and period.
///
/// Every monetary amount is rounded to `rounding_dp` places (half away from
/// zero). Gross and net are summed from the rounded parts, so
/// `gross = basic + overtime + bonuses` and `net = gross - tax - other` hold
/// exactly on the result.
///
/// # Errors
///
/// - [`EngineError::InvalidRange`] if the period ends before it starts
/// - [`EngineError::InvalidConfig`] if `config` fails
///   [`PayrollConfig::validate`]
/// - [`EngineError::InvalidInput`] if a rate, hour count, day count or the
///   bonus amount is negative, or an amount overflows
///
/// # Example
///
/// ```
/// use hr_engine::calculation::generate;
/// use hr_engine::config::PayrollConfig;
/// use hr_engine::models::{AttendanceSummary, Compensation, Employee, PayPeriod};
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
///
/// let employee = Employee {
///     id: "emp_001".to_string(),
///     name: "Ada".to_string(),
///     compensation: Compensation::Hourly { hourly_rate: Decimal::new(35, 0) },
///     department_id: None,
///     role_id: None,
/// };
/// let period = PayPeriod::new(
///     NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
///     NaiveDate::from_ymd_opt(2026, 1, 31).unwrap(),
/// ).unwrap();
/// let attendance = AttendanceSummary {
///     present_days: 20,
///     leave_days: 0,
///     hours_worked: Decimal::new(160, 0),
///     overtime_hours: Decimal::new(15, 0),
/// };
/// let now = NaiveDate::from_ymd_opt(2026, 2, 1).unwrap().and_hms_opt(9, 0, 0).unwrap();
///
/// let record = generate(&employee, &period, &attendance, Decimal::new(200, 0), &PayrollConfig::default(), now).unwrap();
/// assert_eq!(record.gross_salary, Decimal::new(632500, 2));
/// assert_eq!(record.net_salary, Decimal::new(379500, 2));
/// ```
pub fn generate(
    employee: &Employee,
    period: &PayPeriod,
    attendance: &AttendanceSummary,
    bonuses: Decimal,
    config: &PayrollConfig,
    now: NaiveDateTime,
) -> EngineResult<PayrollRecord> {
    period.validate()?;
    config.validate()?;
    validate_inputs(employee, attendance, bonuses)?;

    let dp = config.rounding_dp;
    let mut audit_trace = AuditTrace::default();

    let basic = calculate_basic_salary(&employee.compensation, period, attendance, config, 1)?;
    let basic_salary = basic.basic_salary;
    audit_trace.steps.push(basic.audit_step);
    audit_trace.warnings.extend(basic.warning);

    let overtime = calculate_overtime_pay(
        &employee.compensation,
        attendance.overtime_hours,
        config,
        2,
    )?;
    let overtime_pay = overtime.overtime_pay;
    audit_trace.steps.push(overtime.audit_step);

    let bonuses = round_to(bonuses, dp);
    let gross_salary = basic_salary
        .checked_add(overtime_pay)
        .and_then(|gross| gross.checked_add(bonuses))
        .ok_or_else(|| overflow("gross_salary"))?;
    audit_trace.steps.push(AuditStep {
        step_number: 3,
        rule_id: "gross_salary".to_string(),
        rule_name: "Gross Salary".to_string(),
        input: serde_json::json!({
            "basic_salary": basic_salary.normalize().to_string(),
            "overtime_pay": overtime_pay.normalize().to_string(),
            "bonuses": bonuses.normalize().to_string()
        }),
        output: serde_json::json!({
            "gross_salary": gross_salary.normalize().to_string()
        }),
        reasoning: "Basic salary plus overtime pay plus bonuses".to_string(),
    });

    let tax = calculate_tax(gross_salary, config, 4)?;
    let tax_deduction = tax.amount;
    audit_trace.steps.push(tax.audit_step);

    let other = calculate_other_deductions(gross_salary, config, 5)?;
    let other_deductions = other.amount;
    audit_trace.steps.push(other.audit_step);

    let net_salary = gross_salary - tax_deduction - other_deductions;
    audit_trace.steps.push(AuditStep {
        step_number: 6,
        rule_id: "net_salary".to_string(),
        rule_name: "Net Salary".to_string(),
        input: serde_json::json!({
            "gross_salary": gross_salary.normalize().to_string(),
            "tax_deduction": tax_deduction.normalize().to_string(),
            "other_deductions": other_deductions.normalize().to_string()
        }),
        output: serde_json::json!({
            "net_salary": net_salary.normalize().to_string()
        }),
        reasoning: "Gross salary less tax and other deductions".to_string(),
    });

    debug!(
        employee_id = %employee.id,
        gross = %gross_salary,
        net = %net_salary,
        warnings = audit_trace.warnings.len(),
        "Payroll generated"
    );

    Ok(PayrollRecord {
        id: Uuid::new_v4(),
        employee_id: employee.id.clone(),
        pay_period: *period,
        basic_salary,
        overtime_pay,
        bonuses,
        tax_deduction,
        other_deductions,
        gross_salary,
        net_salary,
        status: PayrollStatus::Generated,
        generated_on: now.date(),
        paid_on: None,
        attendance: attendance.clone(),
        audit_trace,
    })
}

/// Opens a `pending` payroll record for one employee and period.
///
/// Every amount is zero until [`generate`] fills the record in.
///
/// # Errors
///
/// Returns [`EngineError::InvalidRange`] if the period ends before it starts.
pub fn schedule(
    employee: &Employee,
    period: &PayPeriod,
    now: NaiveDateTime,
) -> EngineResult<PayrollRecord> {
    period.validate()?;

    Ok(PayrollRecord {
        id: Uuid::new_v4(),
        employee_id: employee.id.clone(),
        pay_period: *period,
        basic_salary: Decimal::ZERO,
        overtime_pay: Decimal::ZERO,
        bonuses: Decimal::ZERO,
        tax_deduction: Decimal::ZERO,
        other_deductions: Decimal::ZERO,
        gross_salary: Decimal::ZERO,
        net_salary: Decimal::ZERO,
        status: PayrollStatus::Pending,
        generated_on: now.date(),
        paid_on: None,
        attendance: AttendanceSummary::default(),
        audit_trace: AuditTrace::default(),
    })
}

/// Marks a generated payroll record as paid.
///
/// # Errors
///
/// Returns [`EngineError::InvalidState`] unless the record is `generated`;
/// paying a record twice fails.
pub fn mark_paid(record: &PayrollRecord, now: NaiveDateTime) -> EngineResult<PayrollRecord> {
    if !record.status.can_transition_to(PayrollStatus::Paid) {
        return Err(EngineError::invalid_state(format!(
            "payroll record {} is {} and cannot be paid",
            record.id, record.status
        )));
    }

    Ok(PayrollRecord {
        status: PayrollStatus::Paid,
        paid_on: Some(now.date()),
        ..record.clone()
    })
}
