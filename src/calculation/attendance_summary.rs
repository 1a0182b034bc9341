//! Aggregation of attendance and leave over a pay period.

use std::collections::BTreeSet;

use chrono::NaiveDate;

use crate::error::EngineResult;
use crate::models::{
    AttendanceRecord, AttendanceStatus, AttendanceSummary, LeaveRequest, LeaveStatus, PayPeriod,
};

/// Summarizes one employee's attendance over `period`.
///
/// Only records for `employee_id` dated inside the period count. Present
/// days are records labelled `present`, `late` or `half_day`. Hours worked
/// sum the regular hours of those records and overtime hours sum their
/// overtime, so overtime is never counted twice.
///
/// Leave days are the distinct working days (Monday to Friday) in the
/// period that either carry a `leave` attendance record or are covered by
/// an approved paid request. A date covered by both counts once.
///
/// # Errors
///
/// Returns [`crate::error::EngineError::InvalidRange`] if the period ends
/// before it starts.
pub fn summarize_attendance(
    employee_id: &str,
    records: &[AttendanceRecord],
    approved_leave: &[LeaveRequest],
    period: &PayPeriod,
) -> EngineResult<AttendanceSummary> {
    period.validate()?;

    let mut summary = AttendanceSummary::default();
    let mut leave_dates: BTreeSet<NaiveDate> = BTreeSet::new();

    for record in records
        .iter()
        .filter(|r| r.employee_id == employee_id && period.contains_date(r.date))
    {
        if record.status.counts_as_present() {
            summary.present_days += 1;
        }
        if record.status == AttendanceStatus::Leave && PayPeriod::is_working_day(record.date) {
            leave_dates.insert(record.date);
        }
        summary.hours_worked += record.regular_hours;
        summary.overtime_hours += record.overtime_hours;
    }

    for request in approved_leave.iter().filter(|r| {
        r.employee_id == employee_id && r.status == LeaveStatus::Approved && r.leave_type.is_paid
    }) {
        if let Some((from, to)) = period.clip(request.start_date, request.end_date) {
            leave_dates.extend(
                from.iter_days()
                    .take_while(|d| *d <= to)
                    .filter(|d| PayPeriod::is_working_day(*d)),
            );
        }
    }

    summary.leave_days = leave_dates.len() as i64;

    Ok(summary)
}
