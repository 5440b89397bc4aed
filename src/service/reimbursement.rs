use std::sync::Arc;

use chrono::NaiveDate;
use sea_orm::{ActiveValue::Set, DatabaseConnection};
use tracing::{info, instrument};

use crate::{
    auth::Identity,
    clock::Clock,
    database::with_audit_context,
    entity::reimbursement,
    error::AppError,
    repository::ReimbursementRepository,
};

pub struct ReimbursementService {
    db: Arc<DatabaseConnection>,
    clock: Arc<dyn Clock>,
}

impl ReimbursementService {
    pub fn new(db: Arc<DatabaseConnection>, clock: Arc<dyn Clock>) -> Self {
        Self { db, clock }
    }

    #[instrument(skip(self, identity, description), fields(employee_id = %identity.employee_id, request_id = %identity.request_id))]
    pub async fn submit(
        &self,
        identity: &Identity,
        amount: i64,
        date: NaiveDate,
        description: Option<String>,
    ) -> Result<reimbursement::Model, AppError> {
        let now = self.clock.now();

        let record = with_audit_context(&self.db, identity, async |txn| {
            ReimbursementRepository::new(txn).insert(reimbursement::ActiveModel {
                created_at: Set(now),
                updated_at: Set(now),
                created_by: Set(Some(identity.employee_id)),
                updated_by: Set(Some(identity.employee_id)),
                ip_address: Set(identity.ip_address.clone()),
                user_id: Set(identity.employee_id),
                amount: Set(amount),
                description: Set(description),
                reimbursement_date: Set(date),
                ..Default::default()
            }).await
        }).await?;

        info!(reimbursement_id = %record.id, "reimbursement submitted");

        Ok(record)
    }
}
