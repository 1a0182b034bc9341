//! Configuration loading and management for the HR engine.
//!
//! This module loads payroll, attendance and leave settings from YAML files
//! and validates them before any calculation runs.
//!
//! # Example
//!
//! ```no_run
//! use hr_engine::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config/default").unwrap();
//! println!("Overtime after {} hours", config.config().attendance.overtime_threshold_hours);
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{
    AttendanceConfig, FixedSalaryBasis, HrConfig, LeaveTypesConfig, PayrollConfig, TaxRule,
    TaxSlab,
};
