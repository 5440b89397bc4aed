//! Store access, one repository per aggregate
//!
//! A repository borrows any [`ConnectionTrait`](sea_orm::ConnectionTrait), so
//! the same type works on the pool and inside a transaction.

use std::{collections::HashMap, hash::Hash};

use chrono::NaiveDate;
use sea_orm::QuerySelect;
use uuid::Uuid;

use crate::entity::{attendance, overtime, payslip, reimbursement};

pub mod attendance_repository;
pub mod overtime_repository;
pub mod payroll_repository;
pub mod reimbursement_repository;
pub mod user_repository;

pub use attendance_repository::AttendanceRepository;
pub use overtime_repository::OvertimeRepository;
pub use payroll_repository::PayrollRepository;
pub use reimbursement_repository::ReimbursementRepository;
pub use user_repository::UserRepository;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lock {
    None,
    /// `FOR UPDATE`
    Exclusive,
}

pub(crate) trait WithLock: QuerySelect + Sized {
    fn with_lock(self, lock: Lock) -> Self {
        match lock {
            Lock::None => self,
            Lock::Exclusive => self.lock_exclusive(),
        }
    }
}

impl<Q: QuerySelect> WithLock for Q {}

/// A field records can be bucketed by
pub trait GroupKey<M> {
    type Key: Eq + Hash;

    fn key(model: &M) -> Self::Key;
}

/// Buckets by the employee a record belongs to
pub struct ByEmployee;

/// Buckets by the calendar date of a record
pub struct ByDate;

impl GroupKey<attendance::Model> for ByEmployee {
    type Key = Uuid;

    fn key(model: &attendance::Model) -> Uuid {
        model.user_id
    }
}

impl GroupKey<overtime::Model> for ByEmployee {
    type Key = Uuid;

    fn key(model: &overtime::Model) -> Uuid {
        model.user_id
    }
}

impl GroupKey<reimbursement::Model> for ByEmployee {
    type Key = Uuid;

    fn key(model: &reimbursement::Model) -> Uuid {
        model.user_id
    }
}

impl GroupKey<payslip::Model> for ByEmployee {
    type Key = Uuid;

    fn key(model: &payslip::Model) -> Uuid {
        model.user_id
    }
}

impl GroupKey<attendance::Model> for ByDate {
    type Key = NaiveDate;

    fn key(model: &attendance::Model) -> NaiveDate {
        model.attendance_date
    }
}

/// Buckets `models` by `K`, keeping the load order inside each bucket
pub fn group<K: GroupKey<M>, M>(models: Vec<M>) -> HashMap<K::Key, Vec<M>> {
    let mut groups: HashMap<K::Key, Vec<M>> = HashMap::new();

    for model in models {
        groups.entry(K::key(&model)).or_default().push(model);
    }

    groups
}

#[cfg(test)]
pub(crate) mod fixtures {
    use chrono::{DateTime, FixedOffset, NaiveDate, TimeZone as _};
    use uuid::Uuid;

    use crate::entity::{
        attendance, attendance_period, overtime, payroll, payroll_summary, payslip, reimbursement,
        sea_orm_active_enums::RoleType, user,
    };

    pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    pub fn at(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> DateTime<FixedOffset> {
        FixedOffset::east_opt(7 * 3600).unwrap()
            .with_ymd_and_hms(year, month, day, hour, minute, 0).unwrap()
    }

    fn stamp() -> DateTime<FixedOffset> {
        at(2023, 11, 1, 10, 0)
    }

    pub fn user(username: &str, role: RoleType, salary: i64) -> user::Model {
        user::Model {
            id: Uuid::new_v4(),
            created_at: stamp(),
            updated_at: stamp(),
            username: username.to_owned(),
            password: Vec::new(),
            role,
            salary,
        }
    }

    pub fn period(start: NaiveDate, end: NaiveDate) -> attendance_period::Model {
        attendance_period::Model {
            id: Uuid::new_v4(),
            created_at: stamp(),
            updated_at: stamp(),
            created_by: None,
            updated_by: None,
            ip_address: "127.0.0.1".to_owned(),
            start_date: start,
            end_date: end,
        }
    }

    pub fn attendance(user_id: Uuid, attendance_date: NaiveDate) -> attendance::Model {
        attendance::Model {
            id: Uuid::new_v4(),
            created_at: stamp(),
            updated_at: stamp(),
            created_by: Some(user_id),
            updated_by: Some(user_id),
            ip_address: "127.0.0.1".to_owned(),
            user_id,
            attendance_date,
        }
    }

    pub fn overtime(user_id: Uuid, overtime_date: NaiveDate, hours: i64) -> overtime::Model {
        overtime::Model {
            id: Uuid::new_v4(),
            created_at: stamp(),
            updated_at: stamp(),
            created_by: Some(user_id),
            updated_by: Some(user_id),
            ip_address: "127.0.0.1".to_owned(),
            user_id,
            overtime_date,
            duration_seconds: hours * 3600,
        }
    }

    pub fn reimbursement(user_id: Uuid, reimbursement_date: NaiveDate, amount: i64) -> reimbursement::Model {
        reimbursement::Model {
            id: Uuid::new_v4(),
            created_at: stamp(),
            updated_at: stamp(),
            created_by: Some(user_id),
            updated_by: Some(user_id),
            ip_address: "127.0.0.1".to_owned(),
            user_id,
            amount,
            description: Some("Taxi".to_owned()),
            reimbursement_date,
        }
    }

    pub fn payroll(period_id: Uuid, run_by: Uuid) -> payroll::Model {
        payroll::Model {
            id: Uuid::new_v4(),
            created_at: stamp(),
            updated_at: stamp(),
            created_by: Some(run_by),
            updated_by: Some(run_by),
            ip_address: "127.0.0.1".to_owned(),
            period_id,
            run_by,
            run_at: stamp(),
        }
    }

    pub fn payslip(user: &user::Model, payroll_id: Uuid, attendance_days: i64, overtime_hours: i64) -> payslip::Model {
        payslip::Model {
            id: Uuid::new_v4(),
            created_at: stamp(),
            updated_at: stamp(),
            created_by: None,
            updated_by: None,
            ip_address: "127.0.0.1".to_owned(),
            user_id: user.id,
            payroll_id,
            base_salary: user.salary,
            attendance_days,
            overtime_seconds: overtime_hours * 3600,
            overtime_pay: 0,
            reimbursement_total: 0,
            total_take_home: 0,
        }
    }

    pub fn summary(payroll_id: Uuid, total_take_home: i64, generated_by: Uuid) -> payroll_summary::Model {
        payroll_summary::Model {
            id: Uuid::new_v4(),
            created_at: stamp(),
            updated_at: stamp(),
            created_by: Some(generated_by),
            updated_by: Some(generated_by),
            ip_address: "127.0.0.1".to_owned(),
            payroll_id,
            total_take_home,
            generated_by,
            generated_at: stamp(),
        }
    }
}
