//! Leave types, requests and balances.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::LeaveStatus;

/// A leave category with its annual allotment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaveType {
    /// Identifier for the category (e.g. "annual").
    pub id: String,
    /// Display name (e.g. "Annual Leave").
    pub name: String,
    /// Days granted per year.
    pub annual_allotment: u32,
    /// Whether days of this type are paid.
    #[serde(default = "default_is_paid")]
    pub is_paid: bool,
}

fn default_is_paid() -> bool {
    true
}

/// A request for leave over an inclusive date range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaveRequest {
    /// Unique identifier for the request.
    pub id: Uuid,
    /// The requesting employee.
    pub employee_id: String,
    /// The category requested.
    pub leave_type: LeaveType,
    /// First day of leave.
    pub start_date: NaiveDate,
    /// Last day of leave (inclusive).
    pub end_date: NaiveDate,
    /// Inclusive day count of the range.
    pub days_requested: i64,
    /// Why the leave is requested.
    pub reason: String,
    /// Workflow status.
    pub status: LeaveStatus,
    /// When the request was submitted.
    pub applied_on: NaiveDate,
    /// Who approved or rejected the request.
    #[serde(default)]
    pub decided_by: Option<String>,
    /// When the decision was made.
    #[serde(default)]
    pub decided_on: Option<NaiveDate>,
    /// Approver comments.
    #[serde(default)]
    pub comments: String,
}

/// Used and remaining days for one employee and leave category.
///
/// Derived from the set of leave requests; never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaveBalance {
    /// The employee.
    pub employee_id: String,
    /// The leave category.
    pub leave_type_id: String,
    /// Days consumed by approved requests.
    pub days_used: i64,
    /// The category's allotment.
    pub days_total: i64,
    /// `days_total - days_used`; negative when over-allotted.
    pub remaining: i64,
}

impl LeaveBalance {
    /// Returns true if more days were approved than allotted.
    pub fn is_overdrawn(&self) -> bool {
        self.remaining < 0
    }
}
