use chrono::NaiveDate;
use sea_orm::{sea_query::OnConflict, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder};
use uuid::Uuid;

use crate::{entity::{overtime, prelude::*}, error::{AppError, StoreContext as _}};

use super::{Lock, WithLock as _};

pub struct OvertimeRepository<'c, C> {
    db: &'c C,
}

impl<'c, C: ConnectionTrait> OvertimeRepository<'c, C> {
    pub fn new(db: &'c C) -> Self {
        Self { db }
    }

    pub async fn find_by_user_date(&self, user_id: Uuid, date: NaiveDate) -> Result<Option<overtime::Model>, AppError> {
        Overtime::find()
            .filter(overtime::Column::UserId.eq(user_id))
            .filter(overtime::Column::OvertimeDate.eq(date))
            .one(self.db).await
            .context("OvertimeRepository::find_by_user_date()")
    }

    /// Stores the day's overtime, replacing the duration already on record
    pub async fn upsert(&self, model: overtime::ActiveModel) -> Result<overtime::Model, AppError> {
        Overtime::insert(model)
            .on_conflict(
                OnConflict::columns([overtime::Column::UserId, overtime::Column::OvertimeDate])
                    .update_columns([
                        overtime::Column::DurationSeconds,
                        overtime::Column::UpdatedAt,
                        overtime::Column::UpdatedBy,
                        overtime::Column::IpAddress,
                    ])
                    .to_owned()
            )
            .exec_with_returning(self.db).await
            .context("OvertimeRepository::upsert()")
    }

    pub async fn find_by_period(&self, start: NaiveDate, end: NaiveDate, lock: Lock) -> Result<Vec<overtime::Model>, AppError> {
        Overtime::find()
            .filter(overtime::Column::OvertimeDate.between(start, end))
            .order_by_asc(overtime::Column::OvertimeDate)
            .with_lock(lock)
            .all(self.db).await
            .context("OvertimeRepository::find_by_period()")
    }
}
