use std::sync::Arc;

use chrono::{Duration, NaiveDate};
use sea_orm::{ActiveValue::Set, DatabaseConnection};
use tracing::{info, instrument};

use crate::{
    auth::Identity,
    clock::Clock,
    consts::OVERTIME_DAILY_CAP_HOURS,
    database::with_audit_context,
    entity::overtime,
    error::{AppError, Issue},
    iso8601,
    repository::OvertimeRepository,
    utils,
};

pub struct OvertimeService {
    db: Arc<DatabaseConnection>,
    clock: Arc<dyn Clock>,
}

impl OvertimeService {
    pub fn new(db: Arc<DatabaseConnection>, clock: Arc<dyn Clock>) -> Self {
        Self { db, clock }
    }

    /// Adds `duration` (ISO-8601) of overtime to the caller's record for `date`
    ///
    /// Overtime can only be filed outside working hours. The day's total,
    /// including what is already stored, may not go past the daily cap.
    #[instrument(skip_all, fields(employee_id = %identity.employee_id, request_id = %identity.request_id, %date, duration = %duration))]
    pub async fn submit(&self, identity: &Identity, date: NaiveDate, duration: &str) -> Result<overtime::Model, AppError> {
        let now = self.clock.now();
        if utils::is_working_hours(&now) {
            return Err(Issue::InvalidTimeRequest.into());
        }

        let requested = iso8601::parse(duration).map_err(Issue::from)?;
        let cap = Duration::hours(OVERTIME_DAILY_CAP_HOURS);

        let record = with_audit_context(&self.db, identity, async |txn| {
            let overtimes = OvertimeRepository::new(txn);

            let existing = overtimes.find_by_user_date(identity.employee_id, date).await?;

            if requested > cap {
                return Err(Issue::ExceedsLimit.into());
            }

            let merged = existing.as_ref().map_or(Duration::zero(), overtime::Model::duration) + requested;
            if merged > cap {
                return Err(Issue::ExceedsLimit.into());
            }

            overtimes.upsert(overtime::ActiveModel {
                created_at: Set(now),
                updated_at: Set(now),
                created_by: Set(Some(identity.employee_id)),
                updated_by: Set(Some(identity.employee_id)),
                ip_address: Set(identity.ip_address.clone()),
                user_id: Set(identity.employee_id),
                overtime_date: Set(date),
                duration_seconds: Set(merged.num_seconds()),
                ..Default::default()
            }).await
        }).await?;

        info!(overtime_id = %record.id, total = %iso8601::format(record.duration()), "overtime submitted");

        Ok(record)
    }
}
