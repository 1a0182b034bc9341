//! Status lifecycles for attendance, leave and payroll records.
//!
//! Each record kind has its own finite state machine. Leave and payroll
//! states only move forward; a terminal state has no outgoing transition.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The status label of an attendance record.
///
/// The label does not decide whether a record can be clocked out. That is
/// governed by whether the record's time-out is still empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttendanceStatus {
    /// The employee attended.
    Present,
    /// The employee did not attend.
    Absent,
    /// The employee attended but arrived late.
    Late,
    /// The employee attended for half a day.
    HalfDay,
    /// The day was a holiday.
    Holiday,
    /// The employee was on leave.
    Leave,
}

impl AttendanceStatus {
    /// Whether the status counts as a day the employee was present.
    pub fn counts_as_present(self) -> bool {
        matches!(self, Self::Present | Self::Late | Self::HalfDay)
    }
}

/// The status of a leave request.
///
/// ```text
/// pending ──► approved
///    │  └───► rejected
///    └──────► cancelled
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeaveStatus {
    /// Awaiting a decision.
    Pending,
    /// Approved by an approver.
    Approved,
    /// Rejected by an approver.
    Rejected,
    /// Withdrawn by the requester before a decision.
    Cancelled,
}

impl LeaveStatus {
    /// Returns true if no further transition is possible.
    pub fn is_terminal(self) -> bool {
        !matches!(self, Self::Pending)
    }

    /// Returns true if `self -> next` is a legal transition.
    ///
    /// ```
    /// use hr_engine::models::LeaveStatus;
    ///
    /// assert!(LeaveStatus::Pending.can_transition_to(LeaveStatus::Approved));
    /// assert!(!LeaveStatus::Approved.can_transition_to(LeaveStatus::Rejected));
    /// ```
    pub fn can_transition_to(self, next: LeaveStatus) -> bool {
        matches!(
            (self, next),
            (
                Self::Pending,
                Self::Approved | Self::Rejected | Self::Cancelled
            )
        )
    }
}

impl fmt::Display for LeaveStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Approved => write!(f, "approved"),
            Self::Rejected => write!(f, "rejected"),
            Self::Cancelled => write!(f, "cancelled"),
        }
    }
}

/// The status of a payroll record.
///
/// `pending -> generated -> paid`, one step at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PayrollStatus {
    /// Scheduled but not yet calculated.
    Pending,
    /// Amounts calculated.
    Generated,
    /// Paid out.
    Paid,
}

impl PayrollStatus {
    /// Returns true if no further transition is possible.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Paid)
    }

    /// Returns true if `self -> next` is a legal transition.
    pub fn can_transition_to(self, next: PayrollStatus) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::Generated) | (Self::Generated, Self::Paid)
        )
    }
}

impl fmt::Display for PayrollStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Generated => write!(f, "generated"),
            Self::Paid => write!(f, "paid"),
        }
    }
}
