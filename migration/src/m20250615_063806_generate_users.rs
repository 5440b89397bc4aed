use sea_orm_migration::prelude::*;
use sha2::Digest as _;

use crate::m20250613_083042_init::User;

const EMPLOYEE_COUNT: u128 = 100;
const ADMIN_ID: u128 = 12345;

#[derive(DeriveMigrationName)]
pub struct Migration;

/// Seeded accounts log in with their username as password
fn insert_user(id: u128, username: &str, role: &str, salary: i64) -> InsertStatement {
    let time = Expr::val("2025-06-15T06:58:41.474Z").cast_as("timestamptz");
    let hashed_password = sha2::Sha256::digest(format!("{username}:{username}")).to_vec();

    Query::insert()
        .into_table(User::Table)
        .columns(["id", "created_at", "updated_at", "username", "password", "role", "salary"])
        .values_panic([
            Expr::val(format!("{id:032x}")).cast_as("uuid"),
            time.clone(),
            time,
            username.into(),
            hashed_password.into(),
            Expr::val(role).cast_as("role_type"),
            salary.into(),
        ])
        .to_owned()
}

fn delete_user(id: u128) -> DeleteStatement {
    Query::delete()
        .from_table(User::Table)
        .and_where(Expr::col("id").eq(Expr::val(format!("{id:032x}")).cast_as("uuid")))
        .to_owned()
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for i in 1..=EMPLOYEE_COUNT {
            let salary = rand::random_range(5_000_000..=20_000_000);

            manager.exec_stmt(insert_user(i, &i.to_string(), "employee", salary)).await?;
        }

        manager.exec_stmt(insert_user(ADMIN_ID, "admin", "admin", 0)).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for i in 1..=EMPLOYEE_COUNT {
            manager.exec_stmt(delete_user(i)).await?;
        }

        manager.exec_stmt(delete_user(ADMIN_ID)).await?;

        Ok(())
    }
}
