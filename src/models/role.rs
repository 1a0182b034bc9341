//! Access roles and the capability table.
//!
//! Authorization decisions are a pure lookup over `(Role, Action)`.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// The access role of an authenticated user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// System administrator.
    Admin,
    /// Human resources staff.
    Hr,
    /// A regular employee.
    Employee,
}

/// An operation whose permission depends on role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    /// See every employee's records.
    ViewAllEmployees,
    /// Create or edit employees.
    ManageEmployees,
    /// Clock in and out for oneself.
    RecordOwnAttendance,
    /// Edit other employees' attendance.
    ManageAttendance,
    /// Submit a leave request for oneself.
    ApplyLeave,
    /// Approve or reject leave requests.
    DecideLeave,
    /// Run payroll generation.
    GeneratePayroll,
    /// Mark payroll records as paid.
    MarkPayrollPaid,
    /// Read aggregate reports.
    ViewReports,
}

impl Action {
    /// All actions, in table order.
    pub const ALL: [Action; 9] = [
        Action::ViewAllEmployees,
        Action::ManageEmployees,
        Action::RecordOwnAttendance,
        Action::ManageAttendance,
        Action::ApplyLeave,
        Action::DecideLeave,
        Action::GeneratePayroll,
        Action::MarkPayrollPaid,
        Action::ViewReports,
    ];
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Action::ViewAllEmployees => "view all employees",
            Action::ManageEmployees => "manage employees",
            Action::RecordOwnAttendance => "record own attendance",
            Action::ManageAttendance => "manage attendance",
            Action::ApplyLeave => "apply for leave",
            Action::DecideLeave => "decide leave",
            Action::GeneratePayroll => "generate payroll",
            Action::MarkPayrollPaid => "mark payroll paid",
            Action::ViewReports => "view reports",
        };
        f.write_str(text)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Admin => write!(f, "admin"),
            Role::Hr => write!(f, "hr"),
            Role::Employee => write!(f, "employee"),
        }
    }
}

// Actions granted to an employee; admin and hr hold every action.
const EMPLOYEE_CAPABILITIES: &[Action] = &[Action::RecordOwnAttendance, Action::ApplyLeave];

impl Role {
    /// Returns true if the role holds the capability for `action`.
    ///
    /// ```
    /// use hr_engine::models::{Action, Role};
    ///
    /// assert!(Role::Hr.can(Action::DecideLeave));
    /// assert!(!Role::Employee.can(Action::DecideLeave));
    /// ```
    pub fn can(self, action: Action) -> bool {
        match self {
            Role::Admin | Role::Hr => true,
            Role::Employee => EMPLOYEE_CAPABILITIES.contains(&action),
        }
    }

    /// Like [`Role::can`] but returns [`EngineError::Unauthorized`] on refusal.
    pub fn require(self, action: Action) -> EngineResult<()> {
        if self.can(action) {
            Ok(())
        } else {
            Err(EngineError::Unauthorized {
                role: self.to_string(),
                action: action.to_string(),
            })
        }
    }
}

/// The authenticated principal performing an operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    /// The employee ID of the principal.
    pub id: String,
    /// The principal's access role.
    pub role: Role,
}

impl Actor {
    /// Creates an actor.
    pub fn new(id: impl Into<String>, role: Role) -> Self {
        Self {
            id: id.into(),
            role,
        }
    }

    /// Returns true if the actor is the given employee.
    pub fn is(&self, employee_id: &str) -> bool {
        self.id == employee_id
    }
}
