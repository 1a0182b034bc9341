//! Storage gateways for employees, attendance, leave and payroll.
//!
//! The calculators never touch storage. [`crate::service::HrService`] loads
//! prior-state snapshots through these traits and saves the records the
//! calculators return. [`InMemoryRepositories`] implements all four for tests
//! and for embedders without a database.

use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::NaiveDate;
use uuid::Uuid;

use crate::error::{EngineError, EngineResult};
use crate::models::{AttendanceRecord, Employee, LeaveRequest, PayPeriod, PayrollRecord};

/// Employee lookup and storage.
pub trait EmployeeRepository {
    /// Fetches an employee by ID.
    fn employee(&self, id: &str) -> EngineResult<Employee>;
    /// Inserts or replaces an employee.
    fn save_employee(&self, employee: Employee) -> EngineResult<()>;
    /// Lists every employee, ordered by ID.
    fn employees(&self) -> EngineResult<Vec<Employee>>;
}

/// Attendance record lookup and storage.
pub trait AttendanceRepository {
    /// Fetches an attendance record by ID.
    fn attendance_record(&self, id: Uuid) -> EngineResult<AttendanceRecord>;
    /// Lists an employee's records dated `from..=to`, ordered by date.
    fn attendance_between(
        &self,
        employee_id: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> EngineResult<Vec<AttendanceRecord>>;
    /// Inserts or replaces an attendance record.
    fn save_attendance(&self, record: AttendanceRecord) -> EngineResult<()>;
}

/// Leave request lookup and storage.
pub trait LeaveRepository {
    /// Fetches a leave request by ID.
    fn leave_request(&self, id: Uuid) -> EngineResult<LeaveRequest>;
    /// Lists an employee's requests, ordered by start date.
    fn leave_requests_for(&self, employee_id: &str) -> EngineResult<Vec<LeaveRequest>>;
    /// Inserts or replaces a leave request.
    fn save_leave_request(&self, request: LeaveRequest) -> EngineResult<()>;
}

/// Payroll record lookup and storage.
pub trait PayrollRepository {
    /// Fetches a payroll record by ID.
    fn payroll_record(&self, id: Uuid) -> EngineResult<PayrollRecord>;
    /// Finds the record for an employee and period, if one exists.
    fn payroll_for(
        &self,
        employee_id: &str,
        period: &PayPeriod,
    ) -> EngineResult<Option<PayrollRecord>>;
    /// Lists every record for a period, ordered by employee ID.
    fn payroll_for_period(&self, period: &PayPeriod) -> EngineResult<Vec<PayrollRecord>>;
    /// Inserts or replaces a payroll record.
    fn save_payroll(&self, record: PayrollRecord) -> EngineResult<()>;
}

/// The full set of gateways a service needs.
pub trait Repositories:
    EmployeeRepository + AttendanceRepository + LeaveRepository + PayrollRepository
{
}

impl<T> Repositories for T where
    T: EmployeeRepository + AttendanceRepository + LeaveRepository + PayrollRepository
{
}

/// In-memory storage for every record type.
///
/// Each map sits behind its own [`RwLock`], so the store can be shared
/// across threads. A poisoned lock surfaces as [`EngineError::Storage`].
#[derive(Debug, Default)]
pub struct InMemoryRepositories {
    employees: RwLock<HashMap<String, Employee>>,
    attendance: RwLock<HashMap<Uuid, AttendanceRecord>>,
    leave: RwLock<HashMap<Uuid, LeaveRequest>>,
    payroll: RwLock<HashMap<Uuid, PayrollRecord>>,
}

impl InMemoryRepositories {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store holding `employees`.
    pub fn with_employees(employees: impl IntoIterator<Item = Employee>) -> Self {
        let store = Self::new();
        if let Ok(mut map) = store.employees.write() {
            map.extend(employees.into_iter().map(|e| (e.id.clone(), e)));
        }
        store
    }
}

fn read<'a, T>(lock: &'a RwLock<T>, name: &str) -> EngineResult<RwLockReadGuard<'a, T>> {
    lock.read().map_err(|_| EngineError::Storage {
        message: format!("{} store lock poisoned", name),
    })
}

fn write<'a, T>(lock: &'a RwLock<T>, name: &str) -> EngineResult<RwLockWriteGuard<'a, T>> {
    lock.write().map_err(|_| EngineError::Storage {
        message: format!("{} store lock poisoned", name),
    })
}

impl EmployeeRepository for InMemoryRepositories {
    fn employee(&self, id: &str) -> EngineResult<Employee> {
        read(&self.employees, "employee")?
            .get(id)
            .cloned()
            .ok_or_else(|| EngineError::not_found("Employee", id))
    }

    fn save_employee(&self, employee: Employee) -> EngineResult<()> {
        write(&self.employees, "employee")?.insert(employee.id.clone(), employee);
        Ok(())
    }

    fn employees(&self) -> EngineResult<Vec<Employee>> {
        let mut employees: Vec<Employee> =
            read(&self.employees, "employee")?.values().cloned().collect();
        employees.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(employees)
    }
}

impl AttendanceRepository for InMemoryRepositories {
    fn attendance_record(&self, id: Uuid) -> EngineResult<AttendanceRecord> {
        read(&self.attendance, "attendance")?
            .get(&id)
            .cloned()
            .ok_or_else(|| EngineError::not_found("Attendance record", id))
    }

    fn attendance_between(
        &self,
        employee_id: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> EngineResult<Vec<AttendanceRecord>> {
        let mut records: Vec<AttendanceRecord> = read(&self.attendance, "attendance")?
            .values()
            .filter(|r| r.employee_id == employee_id && r.date >= from && r.date <= to)
            .cloned()
            .collect();
        records.sort_by_key(|r| r.date);
        Ok(records)
    }

    fn save_attendance(&self, record: AttendanceRecord) -> EngineResult<()> {
        write(&self.attendance, "attendance")?.insert(record.id, record);
        Ok(())
    }
}

impl LeaveRepository for InMemoryRepositories {
    fn leave_request(&self, id: Uuid) -> EngineResult<LeaveRequest> {
        read(&self.leave, "leave")?
            .get(&id)
            .cloned()
            .ok_or_else(|| EngineError::not_found("Leave request", id))
    }

    fn leave_requests_for(&self, employee_id: &str) -> EngineResult<Vec<LeaveRequest>> {
        let mut requests: Vec<LeaveRequest> = read(&self.leave, "leave")?
            .values()
            .filter(|r| r.employee_id == employee_id)
            .cloned()
            .collect();
        requests.sort_by_key(|r| r.start_date);
        Ok(requests)
    }

    fn save_leave_request(&self, request: LeaveRequest) -> EngineResult<()> {
        write(&self.leave, "leave")?.insert(request.id, request);
        Ok(())
    }
}

impl PayrollRepository for InMemoryRepositories {
    fn payroll_record(&self, id: Uuid) -> EngineResult<PayrollRecord> {
        read(&self.payroll, "payroll")?
            .get(&id)
            .cloned()
            .ok_or_else(|| EngineError::not_found("Payroll record", id))
    }

    fn payroll_for(
        &self,
        employee_id: &str,
        period: &PayPeriod,
    ) -> EngineResult<Option<PayrollRecord>> {
        Ok(read(&self.payroll, "payroll")?
            .values()
            .find(|r| r.employee_id == employee_id && r.pay_period == *period)
            .cloned())
    }

    fn payroll_for_period(&self, period: &PayPeriod) -> EngineResult<Vec<PayrollRecord>> {
        let mut records: Vec<PayrollRecord> = read(&self.payroll, "payroll")?
            .values()
            .filter(|r| r.pay_period == *period)
            .cloned()
            .collect();
        records.sort_by(|a, b| a.employee_id.cmp(&b.employee_id));
        Ok(records)
    }

    fn save_payroll(&self, record: PayrollRecord) -> EngineResult<()> {
        write(&self.payroll, "payroll")?.insert(record.id, record);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AttendanceStatus, Compensation};
    use rust_decimal::Decimal;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn employee(id: &str) -> Employee {
        Employee {
            id: id.to_string(),
            name: format!("Employee {}", id),
            compensation: Compensation::Hourly {
                hourly_rate: Decimal::new(25, 0),
            },
            department_id: None,
            role_id: None,
        }
    }

    fn attendance(employee_id: &str, day: NaiveDate) -> AttendanceRecord {
        AttendanceRecord {
            id: Uuid::new_v4(),
            employee_id: employee_id.to_string(),
            date: day,
            time_in: None,
            time_out: None,
            break_minutes: 0,
            total_hours: Decimal::ZERO,
            regular_hours: Decimal::ZERO,
            overtime_hours: Decimal::ZERO,
            status: AttendanceStatus::Absent,
            location: None,
            notes: String::new(),
        }
    }

    #[test]
    fn test_employee_round_trip_and_listing() {
        let store = InMemoryRepositories::with_employees([employee("emp_002"), employee("emp_001")]);
        assert_eq!(store.employee("emp_001").unwrap().name, "Employee emp_001");

        let ids: Vec<String> = store.employees().unwrap().into_iter().map(|e| e.id).collect();
        assert_eq!(ids, ["emp_001", "emp_002"]);
    }

    #[test]
    fn test_missing_employee_is_not_found() {
        let store = InMemoryRepositories::new();
        match store.employee("ghost") {
            Err(EngineError::NotFound { entity, id }) => {
                assert_eq!(entity, "Employee");
                assert_eq!(id, "ghost");
            }
            other => panic!("Expected NotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_attendance_between_filters_and_orders() {
        let store = InMemoryRepositories::new();
        store.save_attendance(attendance("emp_001", date(2026, 1, 14))).unwrap();
        store.save_attendance(attendance("emp_001", date(2026, 1, 12))).unwrap();
        store.save_attendance(attendance("emp_001", date(2026, 2, 2))).unwrap();
        store.save_attendance(attendance("emp_002", date(2026, 1, 13))).unwrap();

        let records = store
            .attendance_between("emp_001", date(2026, 1, 1), date(2026, 1, 31))
            .unwrap();
        let dates: Vec<NaiveDate> = records.iter().map(|r| r.date).collect();
        assert_eq!(dates, [date(2026, 1, 12), date(2026, 1, 14)]);
    }

    #[test]
    fn test_save_replaces_by_id() {
        let store = InMemoryRepositories::new();
        let mut record = attendance("emp_001", date(2026, 1, 12));
        store.save_attendance(record.clone()).unwrap();
        record.notes = "updated".to_string();
        store.save_attendance(record.clone()).unwrap();

        assert_eq!(store.attendance_record(record.id).unwrap().notes, "updated");
        assert_eq!(
            store
                .attendance_between("emp_001", date(2026, 1, 12), date(2026, 1, 12))
                .unwrap()
                .len(),
            1
        );
    }
}
