use sea_orm_migration::{prelude::{extension::postgres::TypeDropStatement, *}, sea_orm::{ActiveEnum, DbBackend, DeriveActiveEnum, EnumIter, Schema}};

use crate::{setup_user_table_fk, util::{default_table_statement, default_user_table_statement, references, unique_index}};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let schema = Schema::new(DbBackend::Postgres);

        manager
            .create_type(
                schema.create_enum_from_active_enum::<RoleType>()
            ).await?;

        manager
            .create_table(default_table_statement()
                .table(User::Table)
                .col(ColumnDef::new(User::Username)
                    .text()
                    .unique_key()
                    .not_null())
                .col(ColumnDef::new(User::Password)
                    .binary()
                    .not_null()) // sha256("{password}:{username}")
                .col(ColumnDef::new(User::Salary)
                    .big_integer()
                    .not_null())
                .col(ColumnDef::new(User::Role)
                    .custom(RoleType::name())
                    .not_null())
                .take()
            ).await?;

        manager
            .create_table(default_user_table_statement()
                .table(AttendancePeriod::Table)
                .col(ColumnDef::new(AttendancePeriod::StartDate)
                    .date()
                    .not_null())
                .col(ColumnDef::new(AttendancePeriod::EndDate)
                    .date()
                    .not_null())
                .check(Expr::col(AttendancePeriod::StartDate).lte(Expr::col(AttendancePeriod::EndDate)))
                .take()
            ).await?;
        setup_user_table_fk!(manager, AttendancePeriod::Table);
        manager.create_index(unique_index(AttendancePeriod::Table, &["start_date", "end_date"])).await?;

        manager
            .create_table(default_user_table_statement()
                .table(Attendance::Table)
                .col(ColumnDef::new(Attendance::UserId)
                    .uuid()
                    .not_null())
                .col(ColumnDef::new(Attendance::AttendanceDate)
                    .date()
                    .not_null())
                .take()
            ).await?;
        setup_user_table_fk!(manager, Attendance::Table);
        manager.create_foreign_key(references(Attendance::Table, Attendance::UserId, User::Table, ForeignKeyAction::Cascade)).await?;
        manager.create_index(unique_index(Attendance::Table, &["user_id", "attendance_date"])).await?;

        manager
            .create_table(default_user_table_statement()
                .table(Overtime::Table)
                .col(ColumnDef::new(Overtime::UserId)
                    .uuid()
                    .not_null())
                .col(ColumnDef::new(Overtime::OvertimeDate)
                    .date()
                    .not_null())
                .col(ColumnDef::new(Overtime::DurationSeconds)
                    .big_integer()
                    .not_null())
                .check(Expr::col(Overtime::DurationSeconds).between(0, 3 * 60 * 60))
                .take()
            ).await?;
        setup_user_table_fk!(manager, Overtime::Table);
        manager.create_foreign_key(references(Overtime::Table, Overtime::UserId, User::Table, ForeignKeyAction::Cascade)).await?;
        manager.create_index(unique_index(Overtime::Table, &["user_id", "overtime_date"])).await?;

        manager
            .create_table(default_user_table_statement()
                .table(Reimbursement::Table)
                .col(ColumnDef::new(Reimbursement::UserId)
                    .uuid()
                    .not_null())
                .col(ColumnDef::new(Reimbursement::Amount)
                    .big_integer()
                    .not_null())
                .col(ColumnDef::new(Reimbursement::Description)
                    .text())
                .col(ColumnDef::new(Reimbursement::ReimbursementDate)
                    .date()
                    .not_null())
                .check(Expr::col(Reimbursement::Amount).gt(0))
                .take()
            ).await?;
        setup_user_table_fk!(manager, Reimbursement::Table);
        manager.create_foreign_key(references(Reimbursement::Table, Reimbursement::UserId, User::Table, ForeignKeyAction::Cascade)).await?;

        manager
            .create_table(default_user_table_statement()
                .table(Payroll::Table)
                .col(ColumnDef::new(Payroll::PeriodId)
                    .uuid()
                    .not_null()
                    .unique_key()) // One payroll per period
                .col(ColumnDef::new(Payroll::RunBy)
                    .uuid()
                    .not_null())
                .col(ColumnDef::new(Payroll::RunAt)
                    .timestamp_with_time_zone()
                    .not_null())
                .take()
            ).await?;
        setup_user_table_fk!(manager, Payroll::Table);
        manager.create_foreign_key(references(Payroll::Table, Payroll::PeriodId, AttendancePeriod::Table, ForeignKeyAction::Restrict)).await?;
        manager.create_foreign_key(references(Payroll::Table, Payroll::RunBy, User::Table, ForeignKeyAction::Restrict)).await?;

        manager
            .create_table(default_user_table_statement()
                .table(Payslip::Table)
                .col(ColumnDef::new(Payslip::UserId)
                    .uuid()
                    .not_null())
                .col(ColumnDef::new(Payslip::PayrollId)
                    .uuid()
                    .not_null())
                .col(ColumnDef::new(Payslip::BaseSalary)
                    .big_integer()
                    .not_null())
                .col(ColumnDef::new(Payslip::AttendanceDays)
                    .big_integer()
                    .not_null())
                .col(ColumnDef::new(Payslip::OvertimeSeconds)
                    .big_integer()
                    .not_null())
                .col(ColumnDef::new(Payslip::OvertimePay)
                    .big_integer()
                    .not_null())
                .col(ColumnDef::new(Payslip::ReimbursementTotal)
                    .big_integer()
                    .not_null())
                .col(ColumnDef::new(Payslip::TotalTakeHome)
                    .big_integer()
                    .not_null())
                .take()
            ).await?;
        setup_user_table_fk!(manager, Payslip::Table);
        manager.create_foreign_key(references(Payslip::Table, Payslip::UserId, User::Table, ForeignKeyAction::Restrict)).await?;
        manager.create_foreign_key(references(Payslip::Table, Payslip::PayrollId, Payroll::Table, ForeignKeyAction::Cascade)).await?;
        manager.create_index(unique_index(Payslip::Table, &["user_id", "payroll_id"])).await?;

        manager
            .create_table(default_user_table_statement()
                .table(PayrollSummary::Table)
                .col(ColumnDef::new(PayrollSummary::PayrollId)
                    .uuid()
                    .not_null()
                    .unique_key())
                .col(ColumnDef::new(PayrollSummary::TotalTakeHome)
                    .big_integer()
                    .not_null())
                .col(ColumnDef::new(PayrollSummary::GeneratedBy)
                    .uuid()
                    .not_null())
                .col(ColumnDef::new(PayrollSummary::GeneratedAt)
                    .timestamp_with_time_zone()
                    .not_null())
                .take()
            ).await?;
        setup_user_table_fk!(manager, PayrollSummary::Table);
        manager.create_foreign_key(references(PayrollSummary::Table, PayrollSummary::PayrollId, Payroll::Table, ForeignKeyAction::Cascade)).await?;
        manager.create_foreign_key(references(PayrollSummary::Table, PayrollSummary::GeneratedBy, User::Table, ForeignKeyAction::Restrict)).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Dependents first
        for table in [
            PayrollSummary::Table.into_iden(),
            Payslip::Table.into_iden(),
            Payroll::Table.into_iden(),
            Reimbursement::Table.into_iden(),
            Overtime::Table.into_iden(),
            Attendance::Table.into_iden(),
            AttendancePeriod::Table.into_iden(),
            User::Table.into_iden(),
        ] {
            manager
                .drop_table(
                    TableDropStatement::new()
                        .table(table)
                        .if_exists()
                        .take()
                ).await?;
        }

        manager
            .drop_type(
                TypeDropStatement::new()
                    .name(RoleType::name())
                    .to_owned()
            ).await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
pub(crate) enum User {
    Table,
    Username,
    Password,
    Role,
    Salary,
}

#[derive(EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "role_type")]
enum RoleType {
    #[sea_orm(string_value = "employee")]
    Employee,
    #[sea_orm(string_value = "admin")]
    Admin,
}

#[derive(DeriveIden)]
pub(crate) enum AttendancePeriod {
    Table,
    StartDate,
    EndDate,
}

#[derive(DeriveIden)]
pub(crate) enum Attendance {
    Table,
    UserId,
    AttendanceDate,
}

#[derive(DeriveIden)]
pub(crate) enum Overtime {
    Table,
    UserId,
    OvertimeDate,
    DurationSeconds,
}

#[derive(DeriveIden)]
pub(crate) enum Reimbursement {
    Table,
    UserId,
    Amount,
    Description,
    ReimbursementDate,
}

#[derive(DeriveIden)]
pub(crate) enum Payroll {
    Table,
    PeriodId,
    RunBy,
    RunAt,
}

#[derive(DeriveIden)]
pub(crate) enum Payslip {
    Table,
    UserId,
    PayrollId,
    BaseSalary,
    AttendanceDays,
    OvertimeSeconds,
    OvertimePay,
    ReimbursementTotal,
    TotalTakeHome,
}

#[derive(DeriveIden)]
pub(crate) enum PayrollSummary {
    Table,
    PayrollId,
    TotalTakeHome,
    GeneratedBy,
    GeneratedAt,
}
