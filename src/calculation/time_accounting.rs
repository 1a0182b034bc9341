//! Clock-in/clock-out accounting.
//!
//! This module opens and closes daily [`AttendanceRecord`]s and derives the
//! worked, regular and overtime hours of a closed session.

use chrono::{NaiveDateTime, NaiveTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::config::AttendanceConfig;
use crate::error::{EngineError, EngineResult};
use crate::models::{AttendanceRecord, AttendanceStatus, Employee};

use super::rounding::{round_hours, round_to};

const MINUTES_PER_HOUR: Decimal = Decimal::from_parts(60, 0, 0, false, 0);

/// The split of a day's worked hours at the overtime threshold.
///
/// # Example
///
/// ```
/// use hr_engine::calculation::split_daily_hours;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let split = split_daily_hours(Decimal::from_str("9.5").unwrap(), Decimal::from(8));
/// assert_eq!(split.regular_hours, Decimal::from(8));
/// assert_eq!(split.overtime_hours, Decimal::from_str("1.5").unwrap());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyHoursSplit {
    /// Hours up to the threshold.
    pub regular_hours: Decimal,
    /// Hours beyond the threshold (can be zero).
    pub overtime_hours: Decimal,
}

/// Splits worked hours into regular hours (capped at `threshold`) and
/// overtime hours (the excess).
///
/// `regular_hours + overtime_hours` always equals `worked_hours`.
pub fn split_daily_hours(worked_hours: Decimal, threshold: Decimal) -> DailyHoursSplit {
    let overtime_hours = (worked_hours - threshold).max(Decimal::ZERO);
    DailyHoursSplit {
        regular_hours: worked_hours - overtime_hours,
        overtime_hours,
    }
}

/// Opens an attendance record for `employee` at `now`.
///
/// The record starts with status `present`, no time-out, no breaks and zero
/// derived hours.
///
/// # Errors
///
/// Returns [`EngineError::AlreadyClockedIn`] if `existing_records` already
/// holds a record for the employee on the same date, open or closed. An
/// employee has at most one attendance record per day.
pub fn clock_in(
    employee: &Employee,
    now: NaiveDateTime,
    existing_records: &[AttendanceRecord],
) -> EngineResult<AttendanceRecord> {
    let date = now.date();

    if existing_records
        .iter()
        .any(|r| r.employee_id == employee.id && r.date == date)
    {
        return Err(EngineError::AlreadyClockedIn {
            employee_id: employee.id.clone(),
            date,
        });
    }

    debug!(employee_id = %employee.id, %date, time_in = %now.time(), "Clock-in");

    Ok(AttendanceRecord {
        id: Uuid::new_v4(),
        employee_id: employee.id.clone(),
        date,
        time_in: Some(now.time()),
        time_out: None,
        break_minutes: 0,
        total_hours: Decimal::ZERO,
        regular_hours: Decimal::ZERO,
        overtime_hours: Decimal::ZERO,
        status: AttendanceStatus::Present,
        location: None,
        notes: String::new(),
    })
}

/// Adds `minutes` of break to an open record.
///
/// # Errors
///
/// - [`EngineError::InvalidState`] if the record is not open
/// - [`EngineError::InvalidInput`] if `minutes` is zero
pub fn add_break(record: &AttendanceRecord, minutes: u32) -> EngineResult<AttendanceRecord> {
    if !record.is_open() {
        return Err(EngineError::invalid_state(format!(
            "attendance record {} is not open",
            record.id
        )));
    }
    if minutes == 0 {
        return Err(EngineError::InvalidInput {
            field: "break_minutes".to_string(),
            message: "must be positive".to_string(),
        });
    }

    let break_minutes =
        record
            .break_minutes
            .checked_add(minutes)
            .ok_or_else(|| EngineError::InvalidInput {
                field: "break_minutes".to_string(),
                message: "total break minutes overflow".to_string(),
            })?;

    Ok(AttendanceRecord {
        break_minutes,
        ..record.clone()
    })
}

/// Closes an open record at `now` and derives its hours.
///
/// Elapsed time is counted in whole minutes. Total hours are
/// `round2((elapsed - break) / 60)`; overtime is whatever exceeds the
/// configured daily threshold, and regular hours are the rest.
///
/// # Errors
///
/// Returns [`EngineError::InvalidState`] if:
/// - the record has no time-in or already has a time-out
/// - `now` falls on a different date than the record
/// - `now` is earlier than the time-in
/// - the recorded breaks exceed the elapsed time
///
/// # Example
///
/// ```
/// use hr_engine::calculation::{clock_in, clock_out};
/// use hr_engine::config::AttendanceConfig;
/// use hr_engine::models::{Compensation, Employee};
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
/// let day = NaiveDate::from_ymd_opt(2026, 1, 12).unwrap();
/// let open = clock_in(&employee, day.and_hms_opt(9, 0, 0).unwrap(), &[]).unwrap();
/// let closed = clock_out(&open, day.and_hms_opt(18, 30, 0).unwrap(), &AttendanceConfig::default()).unwrap();
///
/// assert_eq!(closed.total_hours, Decimal::new(95, 1));
/// assert_eq!(closed.overtime_hours, Decimal::new(15, 1));
/// ```
pub fn clock_out(
    record: &AttendanceRecord,
    now: NaiveDateTime,
    config: &AttendanceConfig,
) -> EngineResult<AttendanceRecord> {
    let time_in = opened_at(record)?;

    if now.date() != record.date {
        return Err(EngineError::invalid_state(format!(
            "clock-out on {} does not match record date {}",
            now.date(),
            record.date
        )));
    }

    let time_out = now.time();
    if time_out < time_in {
        return Err(EngineError::invalid_state(format!(
            "clock-out at {} precedes clock-in at {}",
            time_out, time_in
        )));
    }

    let elapsed_minutes = (time_out - time_in).num_minutes();
    let worked_minutes = elapsed_minutes - i64::from(record.break_minutes);
    if worked_minutes < 0 {
        return Err(EngineError::invalid_state(format!(
            "{} break minutes exceed {} elapsed minutes",
            record.break_minutes, elapsed_minutes
        )));
    }

    let total_hours = round_hours(Decimal::from(worked_minutes) / MINUTES_PER_HOUR);
    let split = split_daily_hours(total_hours, config.overtime_threshold_hours);

    debug!(
        record_id = %record.id,
        total_hours = %total_hours,
        overtime_hours = %split.overtime_hours,
        "Clock-out"
    );

    Ok(AttendanceRecord {
        time_out: Some(time_out),
        total_hours,
        regular_hours: split.regular_hours,
        overtime_hours: split.overtime_hours,
        ..record.clone()
    })
}

fn opened_at(record: &AttendanceRecord) -> EngineResult<NaiveTime> {
    match (record.time_in, record.time_out) {
        (Some(time_in), None) => Ok(time_in),
        (None, _) => Err(EngineError::invalid_state(format!(
            "attendance record {} has no clock-in",
            record.id
        ))),
        (Some(_), Some(time_out)) => Err(EngineError::invalid_state(format!(
            "attendance record {} was already clocked out at {}",
            record.id, time_out
        ))),
    }
}

/// Renders fractional hours as `"{h}h {m}m"`.
///
/// Minutes are rounded, carrying into the hour when they reach 60. Zero and
/// negative durations render as `"0h 0m"`.
///
/// ```
/// use hr_engine::calculation::format_duration;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// assert_eq!(format_duration(Decimal::from_str("8.5").unwrap()), "8h 30m");
/// assert_eq!(format_duration(Decimal::from_str("1.999").unwrap()), "2h 0m");
/// ```
pub fn format_duration(hours: Decimal) -> String {
    if hours <= Decimal::ZERO {
        return "0h 0m".to_string();
    }

    let mut whole = hours.floor();
    let mut minutes = round_to((hours - whole) * MINUTES_PER_HOUR, 0);
    if minutes >= MINUTES_PER_HOUR {
        whole += Decimal::ONE;
        minutes = Decimal::ZERO;
    }

    format!("{}h {}m", whole.normalize(), minutes.normalize())
}
