//! Core data models for the HR engine.
//!
//! This module contains all the domain records the calculators read and
//! produce.

mod attendance;
mod employee;
mod leave;
mod pay_period;
mod payroll;
mod role;
mod status;

pub use attendance::AttendanceRecord;
pub use employee::{Compensation, Employee};
pub use leave::{LeaveBalance, LeaveRequest, LeaveType};
pub use pay_period::PayPeriod;
pub use payroll::{AttendanceSummary, AuditStep, AuditTrace, AuditWarning, PayrollRecord};
pub use role::{Action, Actor, Role};
pub use status::{AttendanceStatus, LeaveStatus, PayrollStatus};
