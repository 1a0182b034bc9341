//! Error types for the HR engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for every condition a calculation, transition or configuration load can
//! reject.

use chrono::NaiveDate;
use thiserror::Error;

/// The main error type for the HR engine.
///
/// Every operation returns this error type. All variants are recoverable: the
/// caller is expected to present them to the end user.
///
/// # Example
///
/// ```
/// use hr_engine::error::EngineError;
/// use chrono::NaiveDate;
///
/// let error = EngineError::InvalidRange {
///     start: NaiveDate::from_ymd_opt(2024, 2, 20).unwrap(),
///     end: NaiveDate::from_ymd_opt(2024, 2, 15).unwrap(),
/// };
/// assert_eq!(error.to_string(), "Invalid date range: end 2024-02-15 is before start 2024-02-20");
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// An end date preceded its start date.
    #[error("Invalid date range: end {end} is before start {start}")]
    InvalidRange {
        /// The start of the range.
        start: NaiveDate,
        /// The end of the range.
        end: NaiveDate,
    },

    /// A transition was attempted from a state that forbids it.
    #[error("Invalid state: {message}")]
    InvalidState {
        /// A description of the rejected transition.
        message: String,
    },

    /// The employee already has an attendance record for the day.
    #[error("Employee '{employee_id}' is already clocked in on {date}")]
    AlreadyClockedIn {
        /// The employee that attempted to clock in.
        employee_id: String,
        /// The calendar date of the existing record.
        date: NaiveDate,
    },

    /// The leave request has already left the pending state.
    #[error("Leave request '{request_id}' has already been {status}")]
    AlreadyDecided {
        /// The ID of the leave request.
        request_id: String,
        /// The terminal status the request is in.
        status: String,
    },

    /// A leave request was submitted without a reason.
    #[error("A reason is required for a leave request")]
    MissingReason,

    /// The acting role lacks the capability for an action.
    #[error("Role '{role}' is not permitted to {action}")]
    Unauthorized {
        /// The role of the actor.
        role: String,
        /// The action that was refused.
        action: String,
    },

    /// A numeric or textual input was out of range.
    #[error("Invalid input '{field}': {message}")]
    InvalidInput {
        /// The offending input.
        field: String,
        /// What made the input invalid.
        message: String,
    },

    /// A referenced record does not exist.
    #[error("{entity} not found: {id}")]
    NotFound {
        /// The kind of record (e.g. "Employee").
        entity: String,
        /// The identifier that was looked up.
        id: String,
    },

    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// Configuration parsed but holds an unusable value.
    #[error("Invalid configuration '{field}': {message}")]
    InvalidConfig {
        /// The configuration key.
        field: String,
        /// Why the value was rejected.
        message: String,
    },

    /// The backing store failed.
    #[error("Storage error: {message}")]
    Storage {
        /// A description of the failure.
        message: String,
    },
}

impl EngineError {
    /// Shorthand for an [`EngineError::InvalidState`].
    pub fn invalid_state(message: impl Into<String>) -> Self {
        Self::InvalidState {
            message: message.into(),
        }
    }

    /// Shorthand for an [`EngineError::NotFound`].
    pub fn not_found(entity: &str, id: impl ToString) -> Self {
        Self::NotFound {
            entity: entity.to_string(),
            id: id.to_string(),
        }
    }
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;
