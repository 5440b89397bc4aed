use chrono::NaiveDate;
use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder};
use uuid::Uuid;

use crate::{entity::{prelude::*, reimbursement}, error::{AppError, StoreContext as _}};

use super::{Lock, WithLock as _};

pub struct ReimbursementRepository<'c, C> {
    db: &'c C,
}

impl<'c, C: ConnectionTrait> ReimbursementRepository<'c, C> {
    pub fn new(db: &'c C) -> Self {
        Self { db }
    }

    pub async fn insert(&self, model: reimbursement::ActiveModel) -> Result<reimbursement::Model, AppError> {
        Reimbursement::insert(model)
            .exec_with_returning(self.db).await
            .context("ReimbursementRepository::insert()")
    }

    pub async fn find_by_period(&self, start: NaiveDate, end: NaiveDate, lock: Lock) -> Result<Vec<reimbursement::Model>, AppError> {
        Reimbursement::find()
            .filter(reimbursement::Column::ReimbursementDate.between(start, end))
            .order_by_asc(reimbursement::Column::ReimbursementDate)
            .order_by_asc(reimbursement::Column::CreatedAt)
            .with_lock(lock)
            .all(self.db).await
            .context("ReimbursementRepository::find_by_period()")
    }

    pub async fn find_by_user_period(&self, user_id: Uuid, start: NaiveDate, end: NaiveDate) -> Result<Vec<reimbursement::Model>, AppError> {
        Reimbursement::find()
            .filter(reimbursement::Column::UserId.eq(user_id))
            .filter(reimbursement::Column::ReimbursementDate.between(start, end))
            .order_by_asc(reimbursement::Column::ReimbursementDate)
            .order_by_asc(reimbursement::Column::CreatedAt)
            .all(self.db).await
            .context("ReimbursementRepository::find_by_user_period()")
    }
}
