use std::sync::Arc;

use chrono::NaiveDate;
use sea_orm::{ActiveValue::Set, DatabaseConnection};
use tracing::{info, instrument};

use crate::{
    auth::Identity,
    clock::Clock,
    database::{on_unique_violation, with_audit_context},
    entity::{attendance, attendance_period},
    error::{AppError, Issue},
    repository::AttendanceRepository,
    utils,
};

pub struct AttendanceService {
    db: Arc<DatabaseConnection>,
    clock: Arc<dyn Clock>,
}

impl AttendanceService {
    pub fn new(db: Arc<DatabaseConnection>, clock: Arc<dyn Clock>) -> Self {
        Self { db, clock }
    }

    /// Marks the caller present for today
    ///
    /// Submitting twice on the same day keeps a single record.
    #[instrument(skip_all, fields(employee_id = %identity.employee_id, request_id = %identity.request_id))]
    pub async fn submit(&self, identity: &Identity) -> Result<attendance::Model, AppError> {
        let now = self.clock.now();
        if utils::is_weekend(&now) {
            return Err(Issue::InvalidDay.into());
        }

        let record = with_audit_context(&self.db, identity, async |txn| {
            AttendanceRepository::new(txn).upsert(attendance::ActiveModel {
                created_at: Set(now),
                updated_at: Set(now),
                created_by: Set(Some(identity.employee_id)),
                updated_by: Set(Some(identity.employee_id)),
                ip_address: Set(identity.ip_address.clone()),
                user_id: Set(identity.employee_id),
                attendance_date: Set(now.date_naive()),
                ..Default::default()
            }).await
        }).await?;

        info!(attendance_id = %record.id, date = %record.attendance_date, "attendance submitted");

        Ok(record)
    }

    #[instrument(skip_all, fields(employee_id = %identity.employee_id, request_id = %identity.request_id, %start, %end))]
    pub async fn create_period(&self, identity: &Identity, start: NaiveDate, end: NaiveDate) -> Result<attendance_period::Model, AppError> {
        if !identity.is_admin {
            return Err(Issue::AttendanceNotAuthorized.into());
        }

        if start > end {
            return Err(Issue::InvalidPeriod.into());
        }

        let now = self.clock.now();
        let period = with_audit_context(&self.db, identity, async |txn| {
            AttendanceRepository::new(txn).insert_period(attendance_period::ActiveModel {
                created_at: Set(now),
                updated_at: Set(now),
                created_by: Set(Some(identity.employee_id)),
                updated_by: Set(Some(identity.employee_id)),
                ip_address: Set(identity.ip_address.clone()),
                start_date: Set(start),
                end_date: Set(end),
                ..Default::default()
            }).await
        }).await.map_err(on_unique_violation(Issue::PeriodAlreadyExists))?;

        info!(period_id = %period.id, "attendance period created");

        Ok(period)
    }
}
