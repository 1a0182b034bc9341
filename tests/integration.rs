//! End-to-end tests for the HR engine.
//!
//! These tests drive [`HrService`] with the in-memory repositories and the
//! YAML configuration in `config/default`, covering:
//! - Clock-in, breaks and clock-out
//! - Leave application, decisions, cancellation and balances
//! - Payroll generation from stored attendance, payment and reporting
//! - Authorization and lifecycle errors

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use std::str::FromStr;

use hr_engine::config::{ConfigLoader, FixedSalaryBasis, HrConfig};
use hr_engine::error::EngineError;
use hr_engine::models::{
    Actor, AttendanceStatus, Compensation, Employee, LeaveStatus, PayPeriod, PayrollStatus, Role,
};
use hr_engine::repository::{AttendanceRepository, InMemoryRepositories};
use hr_engine::service::HrService;

// =============================================================================
// Test Helpers
// =============================================================================

fn decimal(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn at(day: NaiveDate, h: u32, m: u32) -> NaiveDateTime {
    day.and_hms_opt(h, m, 0).unwrap()
}

fn hourly(id: &str, rate: &str) -> Employee {
    Employee {
        id: id.to_string(),
        name: format!("Hourly {}", id),
        compensation: Compensation::Hourly {
            hourly_rate: decimal(rate),
        },
        department_id: Some("engineering".to_string()),
        role_id: None,
    }
}

fn salaried(id: &str, annual: &str) -> Employee {
    Employee {
        id: id.to_string(),
        name: format!("Salaried {}", id),
        compensation: Compensation::Fixed {
            annual_salary: decimal(annual),
        },
        department_id: Some("finance".to_string()),
        role_id: None,
    }
}

fn load_config() -> HrConfig {
    ConfigLoader::load("./config/default")
        .expect("Failed to load config")
        .into_config()
}

fn create_service(config: HrConfig) -> HrService<InMemoryRepositories> {
    HrService::new(
        InMemoryRepositories::with_employees([
            hourly("emp_001", "35"),
            salaried("emp_002", "60000"),
        ]),
        config,
    )
    .unwrap()
}

fn hr() -> Actor {
    Actor::new("hr_001", Role::Hr)
}

fn admin() -> Actor {
    Actor::new("admin_001", Role::Admin)
}

fn staff(id: &str) -> Actor {
    Actor::new(id, Role::Employee)
}

fn january() -> PayPeriod {
    PayPeriod::new(date(2026, 1, 1), date(2026, 1, 31)).unwrap()
}

/// Working days of January 2026 (Mon-Fri).
fn january_workdays() -> Vec<NaiveDate> {
    date(2026, 1, 1)
        .iter_days()
        .take_while(|d| *d <= date(2026, 1, 31))
        .filter(|d| {
            use chrono::{Datelike, Weekday};
            !matches!(d.weekday(), Weekday::Sat | Weekday::Sun)
        })
        .collect()
}

/// Records a full day for `employee_id` through the service.
fn work_day(
    service: &HrService<InMemoryRepositories>,
    employee_id: &str,
    day: NaiveDate,
    start: (u32, u32),
    end: (u32, u32),
    break_minutes: u32,
) {
    let actor = staff(employee_id);
    let record = service
        .clock_in(&actor, employee_id, at(day, start.0, start.1), None)
        .unwrap();
    if break_minutes > 0 {
        service.add_break(&actor, record.id, break_minutes).unwrap();
    }
    service
        .clock_out(&actor, record.id, at(day, end.0, end.1))
        .unwrap();
}

// =============================================================================
// Attendance
// =============================================================================

#[test]
fn test_attendance_full_day_with_break() {
    let service = create_service(load_config());
    let day = date(2026, 1, 12);
    let actor = staff("emp_001");

    let record = service
        .clock_in(&actor, "emp_001", at(day, 8, 30), Some("HQ".to_string()))
        .unwrap();
    assert!(record.is_open());

    service.add_break(&actor, record.id, 45).unwrap();
    let closed = service.clock_out(&actor, record.id, at(day, 18, 0)).unwrap();

    // 570 minutes elapsed - 45 break = 525 minutes = 8.75 hours
    assert_eq!(closed.total_hours, decimal("8.75"));
    assert_eq!(closed.regular_hours, decimal("8"));
    assert_eq!(closed.overtime_hours, decimal("0.75"));
    assert_eq!(closed.status, AttendanceStatus::Present);
    assert_eq!(closed.location.as_deref(), Some("HQ"));

    let stored = service.repositories().attendance_record(record.id).unwrap();
    assert_eq!(stored, closed);
}

#[test]
fn test_attendance_double_clock_out_rejected() {
    let service = create_service(load_config());
    let day = date(2026, 1, 12);
    let actor = staff("emp_001");

    let record = service.clock_in(&actor, "emp_001", at(day, 9, 0), None).unwrap();
    service.clock_out(&actor, record.id, at(day, 17, 0)).unwrap();

    match service.clock_out(&actor, record.id, at(day, 18, 0)) {
        Err(EngineError::InvalidState { .. }) => {}
        other => panic!("Expected InvalidState, got {:?}", other),
    }
}

#[test]
fn test_attendance_one_record_per_day() {
    let service = create_service(load_config());
    let day = date(2026, 1, 12);
    work_day(&service, "emp_001", day, (9, 0), (12, 0), 0);

    match service.clock_in(&staff("emp_001"), "emp_001", at(day, 13, 0), None) {
        Err(EngineError::AlreadyClockedIn { employee_id, date: d }) => {
            assert_eq!(employee_id, "emp_001");
            assert_eq!(d, day);
        }
        other => panic!("Expected AlreadyClockedIn, got {:?}", other),
    }

    // The following day is unaffected
    assert!(service
        .clock_in(&staff("emp_001"), "emp_001", at(day.succ_opt().unwrap(), 9, 0), None)
        .is_ok());
}

// =============================================================================
// Leave
// =============================================================================

#[test]
fn test_leave_apply_approve_and_balance() {
    let service = create_service(load_config());
    let now = at(date(2026, 1, 5), 10, 0);
    let requester = staff("emp_001");

    let first = service
        .apply_leave(&requester, "emp_001", "sick", date(2026, 3, 2), date(2026, 3, 4), "Flu", now)
        .unwrap();
    let second = service
        .apply_leave(&requester, "emp_001", "sick", date(2026, 5, 11), date(2026, 5, 13), "Flu again", now)
        .unwrap();
    assert_eq!(first.status, LeaveStatus::Pending);
    assert_eq!(first.days_requested, 3);

    service.decide_leave(&hr(), first.id, true, "Approved", now).unwrap();
    service.decide_leave(&hr(), second.id, true, "", now).unwrap();

    let balances = service.leave_balances(&requester, "emp_001", 2026).unwrap();
    let sick = balances.iter().find(|b| b.leave_type_id == "sick").unwrap();
    assert_eq!(sick.days_used, 6);
    assert_eq!(sick.days_total, 10);
    assert_eq!(sick.remaining, 4);

    let annual = balances.iter().find(|b| b.leave_type_id == "annual").unwrap();
    assert_eq!(annual.days_used, 0);
    assert_eq!(annual.remaining, 21);
}

#[test]
fn test_leave_balance_counts_only_requested_year() {
    let service = create_service(load_config());
    let now = at(date(2025, 12, 1), 10, 0);
    let requester = staff("emp_001");

    let request = service
        .apply_leave(&requester, "emp_001", "casual", date(2025, 12, 22), date(2025, 12, 24), "Family", now)
        .unwrap();
    service.decide_leave(&hr(), request.id, true, "", now).unwrap();

    let balances_2026 = service.leave_balances(&requester, "emp_001", 2026).unwrap();
    let casual = balances_2026.iter().find(|b| b.leave_type_id == "casual").unwrap();
    assert_eq!(casual.days_used, 0);

    let balances_2025 = service.leave_balances(&requester, "emp_001", 2025).unwrap();
    let casual = balances_2025.iter().find(|b| b.leave_type_id == "casual").unwrap();
    assert_eq!(casual.days_used, 3);
    assert_eq!(casual.remaining, 2);
}

#[test]
fn test_leave_decided_twice_rejected() {
    let service = create_service(load_config());
    let now = at(date(2026, 1, 5), 10, 0);

    let request = service
        .apply_leave(&staff("emp_001"), "emp_001", "annual", date(2026, 2, 2), date(2026, 2, 6), "Trip", now)
        .unwrap();
    service.decide_leave(&hr(), request.id, false, "Busy period", now).unwrap();

    match service.decide_leave(&admin(), request.id, true, "", now) {
        Err(EngineError::AlreadyDecided { status, .. }) => assert_eq!(status, "rejected"),
        other => panic!("Expected AlreadyDecided, got {:?}", other),
    }
}

#[test]
fn test_leave_requires_reason_and_valid_range() {
    let service = create_service(load_config());
    let now = at(date(2026, 1, 5), 10, 0);
    let requester = staff("emp_001");

    assert!(matches!(
        service.apply_leave(&requester, "emp_001", "annual", date(2026, 2, 2), date(2026, 2, 3), "", now),
        Err(EngineError::MissingReason)
    ));
    assert!(matches!(
        service.apply_leave(&requester, "emp_001", "annual", date(2026, 2, 3), date(2026, 2, 2), "Trip", now),
        Err(EngineError::InvalidRange { .. })
    ));
    assert!(matches!(
        service.apply_leave(&requester, "emp_001", "sabbatical", date(2026, 2, 2), date(2026, 2, 3), "Trip", now),
        Err(EngineError::NotFound { .. })
    ));
}

#[test]
fn test_leave_employee_cannot_approve() {
    let service = create_service(load_config());
    let now = at(date(2026, 1, 5), 10, 0);

    let request = service
        .apply_leave(&staff("emp_001"), "emp_001", "annual", date(2026, 2, 2), date(2026, 2, 3), "Trip", now)
        .unwrap();

    assert!(matches!(
        service.decide_leave(&staff("emp_002"), request.id, true, "", now),
        Err(EngineError::Unauthorized { .. })
    ));
}

#[test]
fn test_leave_cancellation() {
    let service = create_service(load_config());
    let now = at(date(2026, 1, 5), 10, 0);
    let requester = staff("emp_001");

    let request = service
        .apply_leave(&requester, "emp_001", "annual", date(2026, 2, 2), date(2026, 2, 3), "Trip", now)
        .unwrap();

    assert!(matches!(
        service.cancel_leave(&staff("emp_002"), request.id),
        Err(EngineError::Unauthorized { .. })
    ));

    let cancelled = service.cancel_leave(&requester, request.id).unwrap();
    assert_eq!(cancelled.status, LeaveStatus::Cancelled);

    assert!(matches!(
        service.decide_leave(&hr(), request.id, true, "", now),
        Err(EngineError::AlreadyDecided { .. })
    ));
}

// =============================================================================
// Payroll
// =============================================================================

#[test]
fn test_payroll_hourly_from_attendance() {
    let service = create_service(load_config());

    // 20 days of 09:00-17:00 (8h) and 2 days of 09:00-19:00 (10h)
    let workdays = january_workdays();
    assert_eq!(workdays.len(), 22);
    for day in &workdays[..20] {
        work_day(&service, "emp_001", *day, (9, 0), (17, 0), 0);
    }
    for day in &workdays[20..] {
        work_day(&service, "emp_001", *day, (9, 0), (19, 0), 0);
    }

    let record = service
        .generate_payroll(&hr(), "emp_001", &january(), decimal("200"), at(date(2026, 2, 1), 9, 0))
        .unwrap();

    // 176 regular hours × 35 = 6160; 4 overtime hours × 35 = 140
    assert_eq!(record.attendance.present_days, 22);
    assert_eq!(record.attendance.hours_worked, decimal("176"));
    assert_eq!(record.attendance.overtime_hours, decimal("4"));
    assert_eq!(record.basic_salary, decimal("6160.00"));
    assert_eq!(record.overtime_pay, decimal("140.00"));
    assert_eq!(record.gross_salary, decimal("6500.00"));
    assert_eq!(record.tax_deduction, decimal("1625.00"));
    assert_eq!(record.other_deductions, decimal("975.00"));
    assert_eq!(record.net_salary, decimal("3900.00"));
    assert_eq!(record.status, PayrollStatus::Generated);
    assert_eq!(record.audit_trace.steps.len(), 6);
}

#[test]
fn test_payroll_fixed_prorated_with_approved_leave() {
    let mut config = load_config();
    config.payroll.fixed_salary_basis = FixedSalaryBasis::Prorated;
    let service = create_service(config);
    let now = at(date(2026, 1, 2), 9, 0);

    let workdays = january_workdays();
    // Works 18 days, takes 2 days of approved annual leave, misses 2 days
    for day in &workdays[..18] {
        work_day(&service, "emp_002", *day, (9, 0), (17, 0), 0);
    }
    let leave = service
        .apply_leave(&staff("emp_002"), "emp_002", "annual", workdays[18], workdays[19], "Break", now)
        .unwrap();
    service.decide_leave(&hr(), leave.id, true, "", now).unwrap();

    let record = service
        .generate_payroll(&admin(), "emp_002", &january(), Decimal::ZERO, at(date(2026, 2, 1), 9, 0))
        .unwrap();

    // 5000 × 20 / 22
    assert_eq!(record.attendance.present_days, 18);
    assert_eq!(record.attendance.leave_days, 2);
    assert_eq!(record.basic_salary, decimal("4545.45"));
    assert_eq!(
        record.net_salary,
        record.gross_salary - record.tax_deduction - record.other_deductions
    );
}

#[test]
fn test_payroll_prorated_leave_over_weekend() {
    let mut config = load_config();
    config.payroll.fixed_salary_basis = FixedSalaryBasis::Prorated;
    let service = create_service(config);
    let now = at(date(2026, 1, 2), 9, 0);

    // 10 working days present, then leave from Friday 23 to Monday 26
    for day in &january_workdays()[..10] {
        work_day(&service, "emp_002", *day, (9, 0), (17, 0), 0);
    }
    let leave = service
        .apply_leave(&staff("emp_002"), "emp_002", "annual", date(2026, 1, 23), date(2026, 1, 26), "Long weekend", now)
        .unwrap();
    assert_eq!(leave.days_requested, 4);
    service.decide_leave(&hr(), leave.id, true, "", now).unwrap();

    let record = service
        .generate_payroll(&hr(), "emp_002", &january(), Decimal::ZERO, at(date(2026, 2, 1), 9, 0))
        .unwrap();

    // 5000 × 12 / 22; the Saturday and Sunday are not paid days
    assert_eq!(record.attendance.present_days, 10);
    assert_eq!(record.attendance.leave_days, 2);
    assert_eq!(record.basic_salary, decimal("2727.27"));
    let step = record.audit_trace.step("basic_salary").unwrap();
    assert_eq!(step.input["paid_days"], 12);
}

#[test]
fn test_payroll_scheduled_run_then_generated() {
    let service = create_service(load_config());
    let now = at(date(2026, 2, 1), 9, 0);

    let scheduled = service.schedule_payroll(&hr(), &january(), now).unwrap();
    assert_eq!(scheduled.len(), 2);

    let summary = service.payroll_summary(&admin(), &january()).unwrap();
    assert_eq!(summary.by_status.get(&PayrollStatus::Pending), Some(&2));
    assert_eq!(summary.total_gross, Decimal::ZERO);

    let record = service
        .generate_payroll(&hr(), "emp_002", &january(), Decimal::ZERO, now)
        .unwrap();
    assert!(scheduled.iter().any(|r| r.id == record.id));
    assert_eq!(record.basic_salary, decimal("5000.00"));

    let summary = service.payroll_summary(&admin(), &january()).unwrap();
    assert_eq!(summary.by_status.get(&PayrollStatus::Pending), Some(&1));
    assert_eq!(summary.by_status.get(&PayrollStatus::Generated), Some(&1));
}

#[test]
fn test_service_rejects_invalid_config() {
    let mut config = load_config();
    config.payroll.other_deduction_rate = decimal("0.9");
    assert!(matches!(
        HrService::new(InMemoryRepositories::new(), config),
        Err(EngineError::InvalidConfig { .. })
    ));
}

#[test]
fn test_payroll_no_regeneration_and_single_payment() {
    let service = create_service(load_config());
    let now = at(date(2026, 2, 1), 9, 0);

    let record = service
        .generate_payroll(&hr(), "emp_002", &january(), Decimal::ZERO, now)
        .unwrap();

    match service.generate_payroll(&hr(), "emp_002", &january(), Decimal::ZERO, now) {
        Err(EngineError::InvalidState { .. }) => {}
        other => panic!("Expected InvalidState, got {:?}", other),
    }

    let paid = service.mark_payroll_paid(&hr(), record.id, now).unwrap();
    assert_eq!(paid.status, PayrollStatus::Paid);
    assert_eq!(paid.paid_on, Some(date(2026, 2, 1)));

    assert!(matches!(
        service.mark_payroll_paid(&hr(), record.id, now),
        Err(EngineError::InvalidState { .. })
    ));
    assert!(matches!(
        service.mark_payroll_paid(&staff("emp_002"), record.id, now),
        Err(EngineError::Unauthorized { .. })
    ));
}

#[test]
fn test_payroll_summary_report() {
    let service = create_service(load_config());
    let now = at(date(2026, 2, 1), 9, 0);

    for day in january_workdays() {
        work_day(&service, "emp_001", day, (9, 0), (17, 0), 0);
    }
    let hourly = service
        .generate_payroll(&hr(), "emp_001", &january(), Decimal::ZERO, now)
        .unwrap();
    let fixed = service
        .generate_payroll(&hr(), "emp_002", &january(), decimal("500"), now)
        .unwrap();
    service.mark_payroll_paid(&hr(), fixed.id, now).unwrap();

    let summary = service.payroll_summary(&admin(), &january()).unwrap();
    assert_eq!(summary.employee_count, 2);
    assert_eq!(summary.total_gross, hourly.gross_salary + fixed.gross_salary);
    assert_eq!(summary.total_net, hourly.net_salary + fixed.net_salary);
    assert_eq!(summary.total_bonuses, decimal("500"));
    assert_eq!(summary.by_status.get(&PayrollStatus::Generated), Some(&1));
    assert_eq!(summary.by_status.get(&PayrollStatus::Paid), Some(&1));
}

#[test]
fn test_payroll_invalid_period_rejected() {
    let service = create_service(load_config());
    let inverted = PayPeriod {
        start_date: date(2026, 1, 31),
        end_date: date(2026, 1, 1),
    };

    assert!(matches!(
        service.generate_payroll(&hr(), "emp_001", &inverted, Decimal::ZERO, at(date(2026, 2, 1), 9, 0)),
        Err(EngineError::InvalidRange { .. })
    ));
}
