//! Leave request workflow and balances.
//!
//! Requests are created `pending`, then decided exactly once by an approver
//! or cancelled by the requester. Balances are derived from approved
//! requests and are never stored.

use chrono::{NaiveDate, NaiveDateTime};
use tracing::debug;
use uuid::Uuid;

use crate::error::{EngineError, EngineResult};
use crate::models::{
    Action, Actor, Employee, LeaveBalance, LeaveRequest, LeaveStatus, LeaveType,
};

/// Inclusive day count of `start..=end`.
///
/// ```
/// use hr_engine::calculation::days_requested;
/// use chrono::NaiveDate;
///
/// let start = NaiveDate::from_ymd_opt(2024, 2, 15).unwrap();
/// let end = NaiveDate::from_ymd_opt(2024, 2, 20).unwrap();
/// assert_eq!(days_requested(start, end).unwrap(), 6);
/// ```
///
/// # Errors
///
/// Returns [`EngineError::InvalidRange`] if `end` is before `start`.
pub fn days_requested(start: NaiveDate, end: NaiveDate) -> EngineResult<i64> {
    if end < start {
        return Err(EngineError::InvalidRange { start, end });
    }
    Ok((end - start).num_days() + 1)
}

/// Creates a pending leave request.
///
/// # Errors
///
/// - [`EngineError::InvalidRange`] if `end` is before `start`
/// - [`EngineError::MissingReason`] if `reason` is empty or whitespace
pub fn apply_leave(
    employee: &Employee,
    leave_type: &LeaveType,
    start: NaiveDate,
    end: NaiveDate,
    reason: &str,
    now: NaiveDateTime,
) -> EngineResult<LeaveRequest> {
    let days = days_requested(start, end)?;

    let reason = reason.trim();
    if reason.is_empty() {
        return Err(EngineError::MissingReason);
    }

    debug!(
        employee_id = %employee.id,
        leave_type = %leave_type.id,
        days,
        "Leave applied"
    );

    Ok(LeaveRequest {
        id: Uuid::new_v4(),
        employee_id: employee.id.clone(),
        leave_type: leave_type.clone(),
        start_date: start,
        end_date: end,
        days_requested: days,
        reason: reason.to_string(),
        status: LeaveStatus::Pending,
        applied_on: now.date(),
        decided_by: None,
        decided_on: None,
        comments: String::new(),
    })
}

fn ensure_pending(request: &LeaveRequest) -> EngineResult<()> {
    if request.status.is_terminal() {
        return Err(EngineError::AlreadyDecided {
            request_id: request.id.to_string(),
            status: request.status.to_string(),
        });
    }
    Ok(())
}

/// Approves or rejects a pending request.
///
/// # Errors
///
/// - [`EngineError::AlreadyDecided`] if the request is not pending
/// - [`EngineError::Unauthorized`] if the approver's role cannot decide
///   leave, or the approver is the requester
pub fn decide(
    request: &LeaveRequest,
    approver: &Actor,
    approve: bool,
    comment: &str,
    now: NaiveDateTime,
) -> EngineResult<LeaveRequest> {
    ensure_pending(request)?;
    approver.role.require(Action::DecideLeave)?;

    if approver.is(&request.employee_id) {
        return Err(EngineError::Unauthorized {
            role: approver.role.to_string(),
            action: "decide their own leave request".to_string(),
        });
    }

    let status = if approve {
        LeaveStatus::Approved
    } else {
        LeaveStatus::Rejected
    };

    debug!(request_id = %request.id, %status, approver = %approver.id, "Leave decided");

    Ok(LeaveRequest {
        status,
        decided_by: Some(approver.id.clone()),
        decided_on: Some(now.date()),
        comments: comment.trim().to_string(),
        ..request.clone()
    })
}

/// Withdraws a pending request on behalf of its requester.
///
/// # Errors
///
/// - [`EngineError::AlreadyDecided`] if the request is not pending
/// - [`EngineError::Unauthorized`] if `actor` is not the requester
pub fn cancel(request: &LeaveRequest, actor: &Actor) -> EngineResult<LeaveRequest> {
    ensure_pending(request)?;

    if !actor.is(&request.employee_id) {
        return Err(EngineError::Unauthorized {
            role: actor.role.to_string(),
            action: "cancel another employee's leave request".to_string(),
        });
    }

    Ok(LeaveRequest {
        status: LeaveStatus::Cancelled,
        ..request.clone()
    })
}

/// Derives used and remaining days of `leave_type` for an employee.
///
/// Only approved requests count. Remaining days go negative when more days
/// were approved than allotted.
pub fn balance(employee_id: &str, leave_type: &LeaveType, requests: &[LeaveRequest]) -> LeaveBalance {
    let days_used: i64 = requests
        .iter()
        .filter(|r| {
            r.employee_id == employee_id
                && r.leave_type.id == leave_type.id
                && r.status == LeaveStatus::Approved
        })
        .map(|r| r.days_requested)
        .sum();

    let days_total = i64::from(leave_type.annual_allotment);

    LeaveBalance {
        employee_id: employee_id.to_string(),
        leave_type_id: leave_type.id.clone(),
        days_used,
        days_total,
        remaining: days_total - days_used,
    }
}
