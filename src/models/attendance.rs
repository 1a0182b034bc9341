//! Attendance record model.
//!
//! An [`AttendanceRecord`] covers one employee on one calendar day. It is
//! opened on clock-in and closed exactly once on clock-out.

use chrono::{NaiveDate, NaiveTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::AttendanceStatus;

/// A single day's attendance session for an employee.
///
/// `total_hours`, `regular_hours` and `overtime_hours` are derived on
/// clock-out and are zero while the record is open.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttendanceRecord {
    /// Unique identifier for the record.
    pub id: Uuid,
    /// The employee the record belongs to.
    pub employee_id: String,
    /// The calendar date of the session.
    pub date: NaiveDate,
    /// Time of day the employee clocked in.
    pub time_in: Option<NaiveTime>,
    /// Time of day the employee clocked out.
    pub time_out: Option<NaiveTime>,
    /// Unpaid break minutes taken during the session.
    #[serde(default)]
    pub break_minutes: u32,
    /// Worked hours after breaks, rounded to two places.
    pub total_hours: Decimal,
    /// Hours up to the daily overtime threshold.
    pub regular_hours: Decimal,
    /// Hours beyond the daily overtime threshold.
    pub overtime_hours: Decimal,
    /// The attendance status label.
    pub status: AttendanceStatus,
    /// Where the employee clocked in from.
    #[serde(default)]
    pub location: Option<String>,
    /// Free-text notes.
    #[serde(default)]
    pub notes: String,
}

impl AttendanceRecord {
    /// Returns true while the record has a time-in but no time-out.
    pub fn is_open(&self) -> bool {
        self.time_in.is_some() && self.time_out.is_none()
    }
}
