use chrono::NaiveDate;
use sea_orm::{sea_query::OnConflict, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder};
use uuid::Uuid;

use crate::{entity::{attendance, attendance_period, payroll, prelude::*}, error::{AppError, StoreContext as _}};

use super::{Lock, WithLock as _};

pub struct AttendanceRepository<'c, C> {
    db: &'c C,
}

impl<'c, C: ConnectionTrait> AttendanceRepository<'c, C> {
    pub fn new(db: &'c C) -> Self {
        Self { db }
    }

    /// Records a day of attendance, a repeated submission for the same day only
    /// refreshes the audit columns
    pub async fn upsert(&self, model: attendance::ActiveModel) -> Result<attendance::Model, AppError> {
        Attendance::insert(model)
            .on_conflict(
                OnConflict::columns([attendance::Column::UserId, attendance::Column::AttendanceDate])
                    .update_columns([
                        attendance::Column::UpdatedAt,
                        attendance::Column::UpdatedBy,
                        attendance::Column::IpAddress,
                    ])
                    .to_owned()
            )
            .exec_with_returning(self.db).await
            .context("AttendanceRepository::upsert()")
    }

    pub async fn find_by_period(&self, start: NaiveDate, end: NaiveDate, lock: Lock) -> Result<Vec<attendance::Model>, AppError> {
        Attendance::find()
            .filter(attendance::Column::AttendanceDate.between(start, end))
            .order_by_asc(attendance::Column::AttendanceDate)
            .with_lock(lock)
            .all(self.db).await
            .context("AttendanceRepository::find_by_period()")
    }

    pub async fn insert_period(&self, model: attendance_period::ActiveModel) -> Result<attendance_period::Model, AppError> {
        AttendancePeriod::insert(model)
            .exec_with_returning(self.db).await
            .context("AttendanceRepository::insert_period()")
    }

    pub async fn find_period_by_id(&self, id: Uuid, lock: Lock) -> Result<Option<attendance_period::Model>, AppError> {
        AttendancePeriod::find_by_id(id)
            .with_lock(lock)
            .one(self.db).await
            .context("AttendanceRepository::find_period_by_id()")
    }

    /// The period a payroll was run for
    pub async fn find_period_by_payroll_id(&self, payroll_id: Uuid) -> Result<Option<attendance_period::Model>, AppError> {
        AttendancePeriod::find()
            .inner_join(Payroll)
            .filter(payroll::Column::Id.eq(payroll_id))
            .one(self.db).await
            .context("AttendanceRepository::find_period_by_payroll_id()")
    }
}
