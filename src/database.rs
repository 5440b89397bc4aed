use sea_orm::{sqlx, ConnectionTrait, DatabaseConnection, DatabaseTransaction, DbErr, RuntimeErr, Statement, TransactionTrait};
use tracing::warn;

use crate::{auth::Identity, error::{AppError, Issue, StoreContext as _}};

/// Runs `body` in a transaction stamped with the acting user and the request id
///
/// Both values are set transaction-local (`app.current_user`, `app.request_id`)
/// for the audit triggers to read. An error from `body` rolls the transaction
/// back and is returned untouched; if the rollback fails as well, both errors
/// come back as [`AppError::Rollback`]. Nothing is retried.
pub async fn with_audit_context<T>(
    db: &DatabaseConnection,
    identity: &Identity,
    body: impl AsyncFnOnce(&DatabaseTransaction) -> Result<T, AppError>,
) -> Result<T, AppError> {
    let txn = db.begin().await.context("db.begin()")?;

    set_local(&txn, "app.current_user", identity.employee_id.to_string()).await?;
    set_local(&txn, "app.request_id", identity.request_id.clone()).await?;

    let result = body(&txn).await;

    match result {
        Ok(value) => {
            txn.commit().await.map_err(AppError::Commit)?;
            Ok(value)
        }
        Err(err) => {
            if let Err(rollback) = txn.rollback().await {
                warn!(error = %err, rollback = %rollback, "rollback failed");
                return Err(AppError::Rollback { source: Box::new(err), rollback });
            }

            Err(err)
        }
    }
}

async fn set_local(txn: &DatabaseTransaction, name: &'static str, value: String) -> Result<(), AppError> {
    txn.execute(Statement::from_sql_and_values(
        txn.get_database_backend(),
        "SELECT set_config($1, $2, true)",
        [name.into(), value.into()],
    )).await.context("set_config()")?;

    Ok(())
}

pub fn is_unique_violation(err: &DbErr) -> bool {
    match err {
        DbErr::Exec(RuntimeErr::SqlxError(sqlx::Error::Database(err)))
        | DbErr::Query(RuntimeErr::SqlxError(sqlx::Error::Database(err))) => err.is_unique_violation(),
        _ => false,
    }
}

/// Reports a unique violation hit by a store operation as `issue`, passing
/// every other error through
///
/// ```ignore
/// repository.insert_period(period).await.map_err(on_unique_violation(Issue::PeriodAlreadyExists))?;
/// ```
pub fn on_unique_violation(issue: Issue) -> impl FnOnce(AppError) -> AppError {
    move |err| match err {
        AppError::Store { ref source, .. } if is_unique_violation(source) => issue.into(),
        err => err,
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::{error::Error, sync::Arc};

    use sea_orm::{
        sqlx::{self, error::{DatabaseError, ErrorKind}},
        DatabaseConnection, DbErr, MockExecResult, RuntimeErr, Transaction,
    };

    /// Results of the two `set_config` calls opening every audited transaction
    pub fn audit_exec_results() -> [MockExecResult; 2] {
        [
            MockExecResult { last_insert_id: 0, rows_affected: 1 },
            MockExecResult { last_insert_id: 0, rows_affected: 1 },
        ]
    }

    /// Every holder of `db` (services, apps) must be dropped first
    pub fn transaction_log(db: Arc<DatabaseConnection>) -> Vec<Transaction> {
        match Arc::try_unwrap(db) {
            Ok(db) => db.into_transaction_log(),
            Err(_) => panic!("connection is still shared"),
        }
    }

    #[derive(Debug, thiserror::Error)]
    #[error("duplicate key value violates unique constraint")]
    struct DuplicateKey;

    impl DatabaseError for DuplicateKey {
        fn message(&self) -> &str {
            "duplicate key value violates unique constraint"
        }

        fn as_error(&self) -> &(dyn Error + Send + Sync + 'static) {
            self
        }

        fn as_error_mut(&mut self) -> &mut (dyn Error + Send + Sync + 'static) {
            self
        }

        fn into_error(self: Box<Self>) -> Box<dyn Error + Send + Sync + 'static> {
            self
        }

        fn kind(&self) -> ErrorKind {
            ErrorKind::UniqueViolation
        }
    }

    /// What an `INSERT .. RETURNING` reports when it hits a unique index
    pub fn duplicate_key() -> DbErr {
        DbErr::Query(RuntimeErr::SqlxError(sqlx::Error::Database(Box::new(DuplicateKey))))
    }
}
