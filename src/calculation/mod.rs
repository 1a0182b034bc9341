//! Calculation logic for the HR engine.
//!
//! This module contains the pure calculators: clock-in/clock-out and break
//! accounting with the daily overtime split, leave requests and balances,
//! attendance aggregation over a pay period, payroll generation with its
//! audit trace, and period-level payroll reporting. None of them perform
//! I/O.

mod attendance_summary;
mod leave_accounting;
mod payroll;
mod payroll_summary;
mod rounding;
mod time_accounting;

pub use attendance_summary::summarize_attendance;
pub use leave_accounting::{apply_leave, balance, cancel, days_requested, decide};
pub use payroll::{
    BasicSalaryResult, DeductionResult, NO_WORKING_DAYS, OvertimePayResult,
    UNPRORATED_FIXED_SALARY, calculate_basic_salary, calculate_other_deductions,
    calculate_overtime_pay, calculate_tax, generate, hourly_equivalent, mark_paid, schedule,
    tax_on,
};
pub use payroll_summary::{PayrollSummary, summarize_payroll};
pub use rounding::{HOURS_DP, round_hours, round_to};
pub use time_accounting::{
    DailyHoursSplit, add_break, clock_in, clock_out, format_duration, split_daily_hours,
};
