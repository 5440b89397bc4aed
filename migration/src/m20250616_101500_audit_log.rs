use sea_orm_migration::prelude::*;

use crate::util::DefaultColumn;

/// Tables whose row changes land in `audit_log`, each carrying `ip_address`
const AUDITED_TABLES: [&str; 7] = [
    "attendance_period",
    "attendance",
    "overtime",
    "reimbursement",
    "payroll",
    "payslip",
    "payroll_summary",
];

/// Reads the session variables `with_audit_context` sets with
/// `set_config(.., true)`; both are empty outside such a transaction
const AUDIT_TRIGGER_FUNCTION: &str = r#"
CREATE OR REPLACE FUNCTION audit_trigger() RETURNS trigger AS $$
DECLARE
    actor uuid := NULLIF(current_setting('app.current_user', true), '')::uuid;
    request text := NULLIF(current_setting('app.request_id', true), '');
BEGIN
    IF TG_OP = 'DELETE' THEN
        INSERT INTO audit_log (table_name, record_id, action, changed_by, ip_address, request_id, old_data, new_data, created_at)
        VALUES (TG_TABLE_NAME, OLD.id, TG_OP, actor, OLD.ip_address, request, to_jsonb(OLD), NULL, now());
        RETURN OLD;
    ELSIF TG_OP = 'UPDATE' THEN
        INSERT INTO audit_log (table_name, record_id, action, changed_by, ip_address, request_id, old_data, new_data, created_at)
        VALUES (TG_TABLE_NAME, NEW.id, TG_OP, actor, NEW.ip_address, request, to_jsonb(OLD), to_jsonb(NEW), now());
        RETURN NEW;
    ELSE
        INSERT INTO audit_log (table_name, record_id, action, changed_by, ip_address, request_id, old_data, new_data, created_at)
        VALUES (TG_TABLE_NAME, NEW.id, TG_OP, actor, NEW.ip_address, request, NULL, to_jsonb(NEW), now());
        RETURN NEW;
    END IF;
END;
$$ LANGUAGE plpgsql;
"#;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let mut table = Table::create();
        table
            .table(AuditLog::Table)
            .if_not_exists()
            .col(ColumnDef::new(DefaultColumn::Id)
                .uuid()
                .primary_key()
                .default(Expr::cust("GEN_RANDOM_UUID()")))
            .col(ColumnDef::new(AuditLog::TableName)
                .text()
                .not_null())
            .col(ColumnDef::new(AuditLog::RecordId)
                .uuid()
                .not_null())
            .col(ColumnDef::new(AuditLog::Action)
                .text()
                .not_null())
            .col(ColumnDef::new(AuditLog::ChangedBy)
                .uuid())
            .col(ColumnDef::new(AuditLog::IpAddress)
                .text())
            .col(ColumnDef::new(AuditLog::RequestId)
                .text())
            .col(ColumnDef::new(AuditLog::OldData)
                .json_binary())
            .col(ColumnDef::new(AuditLog::NewData)
                .json_binary())
            .col(ColumnDef::new(DefaultColumn::CreatedAt)
                .timestamp_with_time_zone()
                .not_null()
                .default(Expr::current_timestamp()));

        manager.create_table(table).await?;

        let db = manager.get_connection();
        db.execute_unprepared(AUDIT_TRIGGER_FUNCTION).await?;

        for table in AUDITED_TABLES {
            db.execute_unprepared(&format!(
                "CREATE TRIGGER {table}_audit AFTER INSERT OR UPDATE OR DELETE ON \"{table}\" \
                 FOR EACH ROW EXECUTE FUNCTION audit_trigger()"
            )).await?;
        }

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        for table in AUDITED_TABLES.iter().rev() {
            db.execute_unprepared(&format!("DROP TRIGGER IF EXISTS {table}_audit ON \"{table}\"")).await?;
        }

        db.execute_unprepared("DROP FUNCTION IF EXISTS audit_trigger()").await?;

        manager
            .drop_table(
                TableDropStatement::new()
                    .table(AuditLog::Table)
                    .if_exists()
                    .take()
            ).await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum AuditLog {
    Table,
    TableName,
    RecordId,
    Action,
    ChangedBy,
    IpAddress,
    RequestId,
    OldData,
    NewData,
}
