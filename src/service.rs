//! Orchestration of the calculators over stored records.
//!
//! [`HrService`] is the entry point a backend calls. Each operation checks
//! the actor's capability, loads the prior-state snapshot from the
//! repositories, runs the pure calculator and saves the result. Every call
//! gets a correlation ID that ties its log events together.

use std::sync::Arc;
use std::time::Instant;

use chrono::{Datelike, NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use tracing::{info, warn};
use uuid::Uuid;

use crate::calculation::{self, PayrollSummary};
use crate::config::HrConfig;
use crate::error::{EngineError, EngineResult};
use crate::models::{
    Action, Actor, AttendanceRecord, Employee, LeaveBalance, LeaveRequest, LeaveStatus, PayPeriod,
    PayrollRecord, PayrollStatus,
};
use crate::repository::Repositories;

/// Shared HR service over a set of repositories.
///
/// Cloning is cheap; clones share the same repositories and configuration.
///
/// # Example
///
/// ```
/// use hr_engine::config::HrConfig;
/// use hr_engine::models::{Actor, Compensation, Employee, Role};
/// use hr_engine::repository::InMemoryRepositories;
/// use hr_engine::service::HrService;
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
/// let service = HrService::new(InMemoryRepositories::with_employees([employee]), HrConfig::default()).unwrap();
/// let actor = Actor::new("emp_001", Role::Employee);
/// let now = NaiveDate::from_ymd_opt(2026, 1, 12).unwrap().and_hms_opt(9, 0, 0).unwrap();
///
/// let record = service.clock_in(&actor, "emp_001", now, None).unwrap();
/// assert!(record.is_open());
/// ```
pub struct HrService<R> {
    repositories: Arc<R>,
    config: Arc<HrConfig>,
}

impl<R> Clone for HrService<R> {
    fn clone(&self) -> Self {
        Self {
            repositories: Arc::clone(&self.repositories),
            config: Arc::clone(&self.config),
        }
    }
}

/// Requires `own` when the actor acts on themself and `others` otherwise.
fn authorize(actor: &Actor, employee_id: &str, own: Action, others: Action) -> EngineResult<()> {
    if actor.is(employee_id) {
        actor.role.require(own)
    } else {
        actor.role.require(others)
    }
}

fn rejected<T>(correlation_id: Uuid, operation: &str, result: EngineResult<T>) -> EngineResult<T> {
    if let Err(err) = &result {
        warn!(
            correlation_id = %correlation_id,
            operation,
            error = %err,
            "Operation rejected"
        );
    }
    result
}

fn year_bounds(year: i32) -> EngineResult<(NaiveDate, NaiveDate)> {
    let invalid = || EngineError::InvalidInput {
        field: "year".to_string(),
        message: format!("{} is out of range", year),
    };
    let start = NaiveDate::from_ymd_opt(year, 1, 1).ok_or_else(invalid)?;
    let end = NaiveDate::from_ymd_opt(year, 12, 31).ok_or_else(invalid)?;
    Ok((start, end))
}

impl<R: Repositories> HrService<R> {
    /// Creates a service over `repositories` using `config`.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidConfig`] if `config` fails
    /// [`HrConfig::validate`].
    pub fn new(repositories: R, config: HrConfig) -> EngineResult<Self> {
        config.validate()?;
        Ok(Self {
            repositories: Arc::new(repositories),
            config: Arc::new(config),
        })
    }

    /// Returns the configuration in use.
    pub fn config(&self) -> &HrConfig {
        &self.config
    }

    /// Returns the underlying repositories.
    pub fn repositories(&self) -> &R {
        &self.repositories
    }

    /// Registers or updates an employee.
    pub fn save_employee(&self, actor: &Actor, employee: Employee) -> EngineResult<()> {
        let correlation_id = Uuid::new_v4();
        info!(correlation_id = %correlation_id, employee_id = %employee.id, "Saving employee");

        let result = actor
            .role
            .require(Action::ManageEmployees)
            .and_then(|_| self.repositories.save_employee(employee));
        rejected(correlation_id, "save_employee", result)
    }

    /// Opens today's attendance record for `employee_id`.
    pub fn clock_in(
        &self,
        actor: &Actor,
        employee_id: &str,
        now: NaiveDateTime,
        location: Option<String>,
    ) -> EngineResult<AttendanceRecord> {
        let correlation_id = Uuid::new_v4();
        info!(correlation_id = %correlation_id, employee_id, "Processing clock-in");

        let result = (|| -> EngineResult<_> {
            authorize(
                actor,
                employee_id,
                Action::RecordOwnAttendance,
                Action::ManageAttendance,
            )?;
            let employee = self.repositories.employee(employee_id)?;
            let today = now.date();
            let existing = self
                .repositories
                .attendance_between(employee_id, today, today)?;

            let mut record = calculation::clock_in(&employee, now, &existing)?;
            record.location = location;
            self.repositories.save_attendance(record.clone())?;
            Ok(record)
        })()
        .inspect(|record| {
            info!(
                correlation_id = %correlation_id,
                record_id = %record.id,
                date = %record.date,
                "Clock-in recorded"
            )
        });

        rejected(correlation_id, "clock_in", result)
    }

    /// Adds break minutes to an open attendance record.
    pub fn add_break(
        &self,
        actor: &Actor,
        record_id: Uuid,
        minutes: u32,
    ) -> EngineResult<AttendanceRecord> {
        let correlation_id = Uuid::new_v4();
        info!(correlation_id = %correlation_id, %record_id, minutes, "Processing break");

        let result = (|| -> EngineResult<_> {
            let record = self.repositories.attendance_record(record_id)?;
            authorize(
                actor,
                &record.employee_id,
                Action::RecordOwnAttendance,
                Action::ManageAttendance,
            )?;
            let updated = calculation::add_break(&record, minutes)?;
            self.repositories.save_attendance(updated.clone())?;
            Ok(updated)
        })();

        rejected(correlation_id, "add_break", result)
    }

    /// Closes an open attendance record.
    pub fn clock_out(
        &self,
        actor: &Actor,
        record_id: Uuid,
        now: NaiveDateTime,
    ) -> EngineResult<AttendanceRecord> {
        let correlation_id = Uuid::new_v4();
        info!(correlation_id = %correlation_id, %record_id, "Processing clock-out");

        let result = (|| -> EngineResult<_> {
            let record = self.repositories.attendance_record(record_id)?;
            authorize(
                actor,
                &record.employee_id,
                Action::RecordOwnAttendance,
                Action::ManageAttendance,
            )?;
            let closed = calculation::clock_out(&record, now, &self.config.attendance)?;
            self.repositories.save_attendance(closed.clone())?;
            Ok(closed)
        })()
        .inspect(|record| {
            info!(
                correlation_id = %correlation_id,
                total_hours = %record.total_hours,
                overtime_hours = %record.overtime_hours,
                worked = %calculation::format_duration(record.total_hours),
                "Clock-out recorded"
            )
        });

        rejected(correlation_id, "clock_out", result)
    }

    /// Files a leave request.
    ///
    /// Employees may file for themselves; filing for someone else requires
    /// the attendance management capability.
    #[allow(clippy::too_many_arguments)]
    pub fn apply_leave(
        &self,
        actor: &Actor,
        employee_id: &str,
        leave_type_id: &str,
        start: NaiveDate,
        end: NaiveDate,
        reason: &str,
        now: NaiveDateTime,
    ) -> EngineResult<LeaveRequest> {
        let correlation_id = Uuid::new_v4();
        info!(
            correlation_id = %correlation_id,
            employee_id,
            leave_type = leave_type_id,
            %start,
            %end,
            "Processing leave application"
        );

        let result = (|| -> EngineResult<_> {
            authorize(
                actor,
                employee_id,
                Action::ApplyLeave,
                Action::ManageAttendance,
            )?;
            let employee = self.repositories.employee(employee_id)?;
            let leave_type = self.config.leave_type(leave_type_id)?;
            let request =
                calculation::apply_leave(&employee, leave_type, start, end, reason, now)?;
            self.repositories.save_leave_request(request.clone())?;
            Ok(request)
        })()
        .inspect(|request| {
            info!(
                correlation_id = %correlation_id,
                request_id = %request.id,
                days = request.days_requested,
                "Leave request filed"
            )
        });

        rejected(correlation_id, "apply_leave", result)
    }

    /// Approves or rejects a pending leave request.
    pub fn decide_leave(
        &self,
        actor: &Actor,
        request_id: Uuid,
        approve: bool,
        comment: &str,
        now: NaiveDateTime,
    ) -> EngineResult<LeaveRequest> {
        let correlation_id = Uuid::new_v4();
        info!(correlation_id = %correlation_id, %request_id, approve, "Processing leave decision");

        let result = (|| -> EngineResult<_> {
            let request = self.repositories.leave_request(request_id)?;
            let decided = calculation::decide(&request, actor, approve, comment, now)?;
            self.repositories.save_leave_request(decided.clone())?;

            if decided.status == LeaveStatus::Approved {
                let year = decided.start_date.year();
                let approved = self.approved_in_year(&decided.employee_id, year)?;
                let balance =
                    calculation::balance(&decided.employee_id, &decided.leave_type, &approved);
                if balance.is_overdrawn() {
                    warn!(
                        correlation_id = %correlation_id,
                        employee_id = %decided.employee_id,
                        leave_type = %balance.leave_type_id,
                        remaining = balance.remaining,
                        "Leave allotment exceeded"
                    );
                }
            }
            Ok(decided)
        })()
        .inspect(|request| {
            info!(
                correlation_id = %correlation_id,
                status = %request.status,
                "Leave request decided"
            )
        });

        rejected(correlation_id, "decide_leave", result)
    }

    /// Cancels a pending leave request on behalf of its requester.
    pub fn cancel_leave(&self, actor: &Actor, request_id: Uuid) -> EngineResult<LeaveRequest> {
        let correlation_id = Uuid::new_v4();
        info!(correlation_id = %correlation_id, %request_id, "Processing leave cancellation");

        let result = (|| -> EngineResult<_> {
            let request = self.repositories.leave_request(request_id)?;
            let cancelled = calculation::cancel(&request, actor)?;
            self.repositories.save_leave_request(cancelled.clone())?;
            Ok(cancelled)
        })();

        rejected(correlation_id, "cancel_leave", result)
    }

    fn approved_in_year(&self, employee_id: &str, year: i32) -> EngineResult<Vec<LeaveRequest>> {
        Ok(self
            .repositories
            .leave_requests_for(employee_id)?
            .into_iter()
            .filter(|r| r.status == LeaveStatus::Approved && r.start_date.year() == year)
            .collect())
    }

    /// Balances of every configured leave type for `employee_id` in `year`.
    ///
    /// A request counts toward the year its leave starts in. Employees may
    /// view their own balances; viewing another employee's requires the
    /// view-all capability.
    pub fn leave_balances(
        &self,
        actor: &Actor,
        employee_id: &str,
        year: i32,
    ) -> EngineResult<Vec<LeaveBalance>> {
        let correlation_id = Uuid::new_v4();
        info!(correlation_id = %correlation_id, employee_id, year, "Computing leave balances");

        let result = (|| -> EngineResult<_> {
            if !actor.is(employee_id) {
                actor.role.require(Action::ViewAllEmployees)?;
            }
            year_bounds(year)?;
            self.repositories.employee(employee_id)?;
            let approved = self.approved_in_year(employee_id, year)?;
            Ok(self
                .config
                .leave_types
                .iter()
                .map(|leave_type| calculation::balance(employee_id, leave_type, &approved))
                .collect())
        })();

        rejected(correlation_id, "leave_balances", result)
    }

    /// Opens a `pending` payroll record for every employee without a record
    /// for `period`.
    ///
    /// Returns the records opened; employees that already have a record of
    /// any status are skipped.
    pub fn schedule_payroll(
        &self,
        actor: &Actor,
        period: &PayPeriod,
        now: NaiveDateTime,
    ) -> EngineResult<Vec<PayrollRecord>> {
        let correlation_id = Uuid::new_v4();
        info!(
            correlation_id = %correlation_id,
            start = %period.start_date,
            end = %period.end_date,
            "Scheduling payroll run"
        );

        let result = (|| -> EngineResult<_> {
            actor.role.require(Action::GeneratePayroll)?;
            period.validate()?;

            let mut scheduled = Vec::new();
            for employee in self.repositories.employees()? {
                if self.repositories.payroll_for(&employee.id, period)?.is_some() {
                    continue;
                }
                let record = calculation::schedule(&employee, period, now)?;
                self.repositories.save_payroll(record.clone())?;
                scheduled.push(record);
            }
            Ok(scheduled)
        })()
        .inspect(|records| {
            info!(
                correlation_id = %correlation_id,
                scheduled = records.len(),
                "Payroll run scheduled"
            )
        });

        rejected(correlation_id, "schedule_payroll", result)
    }

    /// Generates the payroll record for an employee and period.
    ///
    /// Attendance is summarized from the stored attendance records and the
    /// employee's approved leave. A pending record for the same period, as
    /// opened by [`HrService::schedule_payroll`], is replaced, keeping its ID.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidState`] if a generated or paid record
    /// already exists for the employee and period.
    pub fn generate_payroll(
        &self,
        actor: &Actor,
        employee_id: &str,
        period: &PayPeriod,
        bonuses: Decimal,
        now: NaiveDateTime,
    ) -> EngineResult<PayrollRecord> {
        let correlation_id = Uuid::new_v4();
        info!(
            correlation_id = %correlation_id,
            employee_id,
            start = %period.start_date,
            end = %period.end_date,
            "Processing payroll generation"
        );
        let start_time = Instant::now();

        let result = (|| -> EngineResult<_> {
            actor.role.require(Action::GeneratePayroll)?;
            period.validate()?;
            let employee = self.repositories.employee(employee_id)?;

            let existing = self.repositories.payroll_for(employee_id, period)?;
            if let Some(record) = existing.as_ref().filter(|r| r.status != PayrollStatus::Pending) {
                return Err(EngineError::invalid_state(format!(
                    "payroll for {} from {} to {} is already {}",
                    employee_id, period.start_date, period.end_date, record.status
                )));
            }

            let records = self.repositories.attendance_between(
                employee_id,
                period.start_date,
                period.end_date,
            )?;
            let approved: Vec<LeaveRequest> = self
                .repositories
                .leave_requests_for(employee_id)?
                .into_iter()
                .filter(|r| r.status == LeaveStatus::Approved)
                .collect();
            let attendance =
                calculation::summarize_attendance(employee_id, &records, &approved, period)?;

            let mut record = calculation::generate(
                &employee,
                period,
                &attendance,
                bonuses,
                &self.config.payroll,
                now,
            )?;
            if let Some(pending) = existing {
                record.id = pending.id;
            }
            self.repositories.save_payroll(record.clone())?;
            Ok(record)
        })()
        .inspect(|record| {
            for warning in &record.audit_trace.warnings {
                warn!(
                    correlation_id = %correlation_id,
                    code = %warning.code,
                    message = %warning.message,
                    "Payroll warning"
                );
            }
            info!(
                correlation_id = %correlation_id,
                record_id = %record.id,
                gross_salary = %record.gross_salary,
                net_salary = %record.net_salary,
                duration_us = start_time.elapsed().as_micros(),
                "Payroll generated"
            )
        });

        rejected(correlation_id, "generate_payroll", result)
    }

    /// Marks a generated payroll record as paid.
    pub fn mark_payroll_paid(
        &self,
        actor: &Actor,
        record_id: Uuid,
        now: NaiveDateTime,
    ) -> EngineResult<PayrollRecord> {
        let correlation_id = Uuid::new_v4();
        info!(correlation_id = %correlation_id, %record_id, "Processing payroll payment");

        let result = (|| -> EngineResult<_> {
            actor.role.require(Action::MarkPayrollPaid)?;
            let record = self.repositories.payroll_record(record_id)?;
            let paid = calculation::mark_paid(&record, now)?;
            self.repositories.save_payroll(paid.clone())?;
            Ok(paid)
        })()
        .inspect(|record| {
            info!(
                correlation_id = %correlation_id,
                net_salary = %record.net_salary,
                "Payroll paid"
            )
        });

        rejected(correlation_id, "mark_payroll_paid", result)
    }

    /// Totals every payroll record of `period`.
    pub fn payroll_summary(&self, actor: &Actor, period: &PayPeriod) -> EngineResult<PayrollSummary> {
        let correlation_id = Uuid::new_v4();
        info!(
            correlation_id = %correlation_id,
            start = %period.start_date,
            end = %period.end_date,
            "Building payroll summary"
        );

        let result = (|| -> EngineResult<_> {
            actor.role.require(Action::ViewReports)?;
            period.validate()?;
            let records = self.repositories.payroll_for_period(period)?;
            Ok(calculation::summarize_payroll(period, &records))
        })()
        .inspect(|summary| {
            info!(
                correlation_id = %correlation_id,
                employees = summary.employee_count,
                total_net = %summary.total_net,
                "Payroll summary built"
            )
        });

        rejected(correlation_id, "payroll_summary", result)
    }
}
