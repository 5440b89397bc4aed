use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter};
use uuid::Uuid;

use crate::{entity::{payroll, payroll_summary, payslip, prelude::*}, error::{AppError, StoreContext as _}};

use super::{Lock, WithLock as _};

pub struct PayrollRepository<'c, C> {
    db: &'c C,
}

impl<'c, C: ConnectionTrait> PayrollRepository<'c, C> {
    pub fn new(db: &'c C) -> Self {
        Self { db }
    }

    pub async fn find_by_period_id(&self, period_id: Uuid, lock: Lock) -> Result<Option<payroll::Model>, AppError> {
        Payroll::find()
            .filter(payroll::Column::PeriodId.eq(period_id))
            .with_lock(lock)
            .one(self.db).await
            .context("PayrollRepository::find_by_period_id()")
    }

    pub async fn insert_payroll(&self, model: payroll::ActiveModel) -> Result<payroll::Model, AppError> {
        Payroll::insert(model)
            .exec_with_returning(self.db).await
            .context("PayrollRepository::insert_payroll()")
    }

    /// Inserts all payslips in one statement and returns how many were stored
    pub async fn insert_payslips(&self, models: Vec<payslip::ActiveModel>) -> Result<usize, AppError> {
        if models.is_empty() {
            return Ok(0);
        }

        let expected = models.len();
        let ids = Payslip::insert_many(models)
            .exec_with_returning_keys(self.db).await
            .context("PayrollRepository::insert_payslips()")?;

        if ids.len() != expected {
            return Err(AppError::Internal(format!(
                "PayrollRepository::insert_payslips(): stored {} of {expected} payslips",
                ids.len(),
            )));
        }

        Ok(ids.len())
    }

    pub async fn insert_summary(&self, model: payroll_summary::ActiveModel) -> Result<payroll_summary::Model, AppError> {
        PayrollSummary::insert(model)
            .exec_with_returning(self.db).await
            .context("PayrollRepository::insert_summary()")
    }

    pub async fn find_payslip(&self, user_id: Uuid, payroll_id: Uuid) -> Result<Option<payslip::Model>, AppError> {
        Payslip::find()
            .filter(payslip::Column::UserId.eq(user_id))
            .filter(payslip::Column::PayrollId.eq(payroll_id))
            .one(self.db).await
            .context("PayrollRepository::find_payslip()")
    }

    pub async fn find_payslips(&self, payroll_id: Uuid) -> Result<Vec<payslip::Model>, AppError> {
        Payslip::find()
            .filter(payslip::Column::PayrollId.eq(payroll_id))
            .all(self.db).await
            .context("PayrollRepository::find_payslips()")
    }
}
