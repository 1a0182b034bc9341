//! Configuration types for payroll, attendance and leave.
//!
//! This module contains the strongly-typed configuration structures that
//! are deserialized from YAML configuration files. Every field has a default
//! so a file only needs to name what it overrides.

use std::collections::HashSet;

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::error::{EngineError, EngineResult};
use crate::models::LeaveType;

/// One marginal tax bracket.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TaxSlab {
    /// Lower bound of the bracket (inclusive).
    pub min: Decimal,
    /// Upper bound of the bracket; `None` for the top bracket.
    #[serde(default)]
    pub max: Option<Decimal>,
    /// Rate applied to income inside the bracket, as a fraction.
    pub rate: Decimal,
}

/// How income tax is withheld from gross salary.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum TaxRule {
    /// A single rate applied to the whole gross salary.
    Flat {
        /// The withholding rate, as a fraction.
        rate: Decimal,
    },
    /// Marginal rates over ordered brackets.
    Progressive {
        /// Brackets ordered by `min`.
        slabs: Vec<TaxSlab>,
    },
}

impl Default for TaxRule {
    fn default() -> Self {
        TaxRule::Flat {
            rate: Decimal::new(25, 2),
        }
    }
}

/// How a fixed annual salary becomes a period's basic salary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FixedSalaryBasis {
    /// One twelfth of the annual salary, whatever the period length.
    #[default]
    Monthly,
    /// One twelfth scaled by paid days over working days in the period.
    Prorated,
}

/// Payroll calculation settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PayrollConfig {
    /// Tax withholding rule.
    #[serde(default)]
    pub tax: TaxRule,
    /// Rate of non-tax deductions, as a fraction of gross.
    #[serde(default = "default_other_deduction_rate")]
    pub other_deduction_rate: Decimal,
    /// Working hours in a standard month.
    #[serde(default = "default_standard_monthly_hours")]
    pub standard_monthly_hours: Decimal,
    /// Multiplier applied to the hourly rate for overtime hours.
    #[serde(default = "default_overtime_multiplier")]
    pub overtime_multiplier: Decimal,
    /// How fixed salaries map onto a period.
    #[serde(default)]
    pub fixed_salary_basis: FixedSalaryBasis,
    /// Decimal places monetary outputs are rounded to.
    #[serde(default = "default_rounding_dp")]
    pub rounding_dp: u32,
}

fn default_other_deduction_rate() -> Decimal {
    Decimal::new(15, 2)
}

fn default_standard_monthly_hours() -> Decimal {
    Decimal::new(160, 0)
}

fn default_overtime_multiplier() -> Decimal {
    Decimal::ONE
}

fn default_rounding_dp() -> u32 {
    2
}

impl Default for PayrollConfig {
    fn default() -> Self {
        Self {
            tax: TaxRule::default(),
            other_deduction_rate: default_other_deduction_rate(),
            standard_monthly_hours: default_standard_monthly_hours(),
            overtime_multiplier: default_overtime_multiplier(),
            fixed_salary_basis: FixedSalaryBasis::default(),
            rounding_dp: default_rounding_dp(),
        }
    }
}

/// Attendance accounting settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AttendanceConfig {
    /// Hours per day before overtime starts.
    #[serde(default = "default_overtime_threshold_hours")]
    pub overtime_threshold_hours: Decimal,
}

fn default_overtime_threshold_hours() -> Decimal {
    Decimal::new(8, 0)
}

impl Default for AttendanceConfig {
    fn default() -> Self {
        Self {
            overtime_threshold_hours: default_overtime_threshold_hours(),
        }
    }
}

/// Leave types configuration file structure.
#[derive(Debug, Clone, Deserialize)]
pub struct LeaveTypesConfig {
    /// The configured leave categories.
    pub leave_types: Vec<LeaveType>,
}

/// The complete engine configuration.
///
/// ```
/// use hr_engine::config::HrConfig;
/// use rust_decimal::Decimal;
///
/// let config = HrConfig::default();
/// assert_eq!(config.payroll.standard_monthly_hours, Decimal::new(160, 0));
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HrConfig {
    /// Payroll settings.
    pub payroll: PayrollConfig,
    /// Attendance settings.
    pub attendance: AttendanceConfig,
    /// Leave categories.
    pub leave_types: Vec<LeaveType>,
}

impl Default for HrConfig {
    fn default() -> Self {
        Self {
            payroll: PayrollConfig::default(),
            attendance: AttendanceConfig::default(),
            leave_types: vec![
                leave_type("annual", "Annual Leave", 21),
                leave_type("sick", "Sick Leave", 10),
                leave_type("casual", "Casual Leave", 5),
            ],
        }
    }
}

fn leave_type(id: &str, name: &str, annual_allotment: u32) -> LeaveType {
    LeaveType {
        id: id.to_string(),
        name: name.to_string(),
        annual_allotment,
        is_paid: true,
    }
}

fn invalid(field: &str, message: impl Into<String>) -> EngineError {
    EngineError::InvalidConfig {
        field: field.to_string(),
        message: message.into(),
    }
}

fn check_fraction(field: &str, value: Decimal) -> EngineResult<()> {
    if value < Decimal::ZERO || value > Decimal::ONE {
        return Err(invalid(field, format!("{} is outside [0, 1]", value)));
    }
    Ok(())
}

impl TaxRule {
    /// The highest marginal rate the rule can apply.
    pub fn top_rate(&self) -> Decimal {
        match self {
            TaxRule::Flat { rate } => *rate,
            TaxRule::Progressive { slabs } => slabs
                .iter()
                .map(|s| s.rate)
                .max()
                .unwrap_or(Decimal::ZERO),
        }
    }

    fn validate(&self) -> EngineResult<()> {
        match self {
            TaxRule::Flat { rate } => check_fraction("tax.rate", *rate),
            TaxRule::Progressive { slabs } => {
                if slabs.is_empty() {
                    return Err(invalid("tax.slabs", "at least one slab is required"));
                }
                for (i, slab) in slabs.iter().enumerate() {
                    check_fraction("tax.slabs.rate", slab.rate)?;
                    if slab.min < Decimal::ZERO {
                        return Err(invalid("tax.slabs.min", "must not be negative"));
                    }
                    match (slab.max, slabs.get(i + 1)) {
                        (Some(max), _) if max <= slab.min => {
                            return Err(invalid(
                                "tax.slabs.max",
                                format!("slab {} has max {} not above min {}", i, max, slab.min),
                            ));
                        }
                        (Some(max), Some(next)) if next.min < max => {
                            return Err(invalid(
                                "tax.slabs",
                                format!("slab {} overlaps slab {}", i, i + 1),
                            ));
                        }
                        (None, Some(_)) => {
                            return Err(invalid(
                                "tax.slabs.max",
                                "only the last slab may be open-ended",
                            ));
                        }
                        _ => {}
                    }
                }
                Ok(())
            }
        }
    }
}

impl PayrollConfig {
    /// Checks every payroll value is usable.
    ///
    /// Rejects rates outside `[0, 1]`, a tax plus deduction rate above one
    /// (which would make net salary negative), non-positive standard monthly
    /// hours, an overtime multiplier below one, and more than six decimal
    /// places.
    pub fn validate(&self) -> EngineResult<()> {
        self.tax.validate()?;
        check_fraction("other_deduction_rate", self.other_deduction_rate)?;
        if self.tax.top_rate() + self.other_deduction_rate > Decimal::ONE {
            return Err(invalid(
                "other_deduction_rate",
                "tax and other deductions together exceed 100%",
            ));
        }
        if self.standard_monthly_hours <= Decimal::ZERO {
            return Err(invalid("standard_monthly_hours", "must be positive"));
        }
        if self.overtime_multiplier < Decimal::ONE {
            return Err(invalid("overtime_multiplier", "must be at least 1"));
        }
        if self.rounding_dp > 6 {
            return Err(invalid("rounding_dp", "must be at most 6"));
        }
        Ok(())
    }
}

impl HrConfig {
    /// Checks every value is usable.
    ///
    /// Runs [`PayrollConfig::validate`], then rejects a non-positive overtime
    /// threshold and empty or duplicate leave type IDs.
    pub fn validate(&self) -> EngineResult<()> {
        self.payroll.validate()?;
        if self.attendance.overtime_threshold_hours <= Decimal::ZERO {
            return Err(invalid("overtime_threshold_hours", "must be positive"));
        }

        let mut seen = HashSet::new();
        for leave_type in &self.leave_types {
            if leave_type.id.trim().is_empty() {
                return Err(invalid("leave_types.id", "must not be empty"));
            }
            if !seen.insert(leave_type.id.as_str()) {
                return Err(invalid(
                    "leave_types.id",
                    format!("duplicate leave type '{}'", leave_type.id),
                ));
            }
        }
        Ok(())
    }

    /// Looks up a leave type by ID.
    pub fn leave_type(&self, id: &str) -> EngineResult<&LeaveType> {
        self.leave_types
            .iter()
            .find(|t| t.id == id)
            .ok_or_else(|| EngineError::not_found("Leave type", id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn slab(min: &str, max: Option<&str>, rate: &str) -> TaxSlab {
        TaxSlab {
            min: dec(min),
            max: max.map(dec),
            rate: dec(rate),
        }
    }

    fn expect_invalid(config: &HrConfig, expected_field: &str) {
        match config.validate() {
            Err(EngineError::InvalidConfig { field, .. }) => assert_eq!(field, expected_field),
            other => panic!("Expected InvalidConfig({}), got {:?}", expected_field, other),
        }
    }

    #[test]
    fn test_defaults() {
        let config = HrConfig::default();
        assert_eq!(config.payroll.tax, TaxRule::Flat { rate: dec("0.25") });
        assert_eq!(config.payroll.other_deduction_rate, dec("0.15"));
        assert_eq!(config.payroll.overtime_multiplier, dec("1"));
        assert_eq!(config.payroll.rounding_dp, 2);
        assert_eq!(config.attendance.overtime_threshold_hours, dec("8"));
        assert_eq!(config.leave_types.len(), 3);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rate_above_one_rejected() {
        let mut config = HrConfig::default();
        config.payroll.tax = TaxRule::Flat { rate: dec("1.2") };
        expect_invalid(&config, "tax.rate");
    }

    #[test]
    fn test_combined_rates_above_one_rejected() {
        let mut config = HrConfig::default();
        config.payroll.tax = TaxRule::Flat { rate: dec("0.6") };
        config.payroll.other_deduction_rate = dec("0.5");
        expect_invalid(&config, "other_deduction_rate");
    }

    #[test]
    fn test_multiplier_below_one_rejected() {
        let mut config = HrConfig::default();
        config.payroll.overtime_multiplier = dec("0.5");
        expect_invalid(&config, "overtime_multiplier");
    }

    #[test]
    fn test_zero_threshold_rejected() {
        let mut config = HrConfig::default();
        config.attendance.overtime_threshold_hours = Decimal::ZERO;
        expect_invalid(&config, "overtime_threshold_hours");
    }

    #[test]
    fn test_zero_standard_monthly_hours_rejected() {
        let mut config = HrConfig::default();
        config.payroll.standard_monthly_hours = Decimal::ZERO;
        expect_invalid(&config, "standard_monthly_hours");
        assert!(matches!(
            config.payroll.validate(),
            Err(EngineError::InvalidConfig { .. })
        ));
    }

    #[test]
    fn test_duplicate_leave_type_rejected() {
        let mut config = HrConfig::default();
        config.leave_types.push(leave_type("sick", "Sick Again", 3));
        expect_invalid(&config, "leave_types.id");
    }

    #[test]
    fn test_valid_progressive_slabs() {
        let mut config = HrConfig::default();
        config.payroll.tax = TaxRule::Progressive {
            slabs: vec![
                slab("0", Some("1000"), "0"),
                slab("1000", Some("5000"), "0.10"),
                slab("5000", None, "0.20"),
            ],
        };
        assert!(config.validate().is_ok());
        assert_eq!(config.payroll.tax.top_rate(), dec("0.20"));
    }

    #[test]
    fn test_overlapping_slabs_rejected() {
        let mut config = HrConfig::default();
        config.payroll.tax = TaxRule::Progressive {
            slabs: vec![slab("0", Some("1000"), "0"), slab("900", None, "0.10")],
        };
        expect_invalid(&config, "tax.slabs");
    }

    #[test]
    fn test_open_ended_middle_slab_rejected() {
        let mut config = HrConfig::default();
        config.payroll.tax = TaxRule::Progressive {
            slabs: vec![slab("0", None, "0"), slab("1000", None, "0.10")],
        };
        expect_invalid(&config, "tax.slabs.max");
    }

    #[test]
    fn test_empty_slabs_rejected() {
        let mut config = HrConfig::default();
        config.payroll.tax = TaxRule::Progressive { slabs: vec![] };
        expect_invalid(&config, "tax.slabs");
    }

    #[test]
    fn test_leave_type_lookup() {
        let config = HrConfig::default();
        assert_eq!(config.leave_type("annual").unwrap().annual_allotment, 21);
        assert!(matches!(
            config.leave_type("sabbatical"),
            Err(EngineError::NotFound { .. })
        ));
    }

    #[test]
    fn test_deserialize_partial_payroll_config() {
        let yaml = r#"
tax:
  mode: progressive
  slabs:
    - { min: "0", max: "1000", rate: "0" }
    - { min: "1000", rate: "0.1" }
fixed_salary_basis: prorated
"#;
        let payroll: PayrollConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(payroll.fixed_salary_basis, FixedSalaryBasis::Prorated);
        assert_eq!(payroll.other_deduction_rate, dec("0.15"));
        match payroll.tax {
            TaxRule::Progressive { slabs } => assert_eq!(slabs.len(), 2),
            other => panic!("Expected progressive tax, got {:?}", other),
        }
    }
}
