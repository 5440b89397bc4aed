use sea_orm_migration::prelude::*;

pub(crate) fn default_table_statement() -> TableCreateStatement {
    TableCreateStatement::new()
        .if_not_exists()
        .col(ColumnDef::new(DefaultColumn::Id)
            .uuid()
            .primary_key()
            .default(Expr::cust("GEN_RANDOM_UUID()"))
            .take())
        .col(ColumnDef::new(DefaultColumn::CreatedAt)
            .timestamp_with_time_zone()
            .not_null()
            .take())
        .col(ColumnDef::new(DefaultColumn::UpdatedAt)
            .timestamp_with_time_zone()
            .not_null()
            .take())
        .take()
}

#[derive(DeriveIden)]
pub(crate) enum DefaultColumn {
    Id,
    CreatedAt,
    UpdatedAt,
}

/// Table whose rows are written on behalf of a user, with the audit columns
///
/// Must run `setup_user_table_fk` macro on the table afterwards
///
/// # Example
///
/// ```rs
/// manager
///     .create_table(default_user_table_statement()
///         .table(Reimbursement::Table)
///         .col(ColumnDef::new(Reimbursement::Amount)
///             .big_integer()
///             .not_null())
///         .take()
///     ).await?;
/// setup_user_table_fk!(manager, Reimbursement::Table);
/// ```
pub(crate) fn default_user_table_statement() -> TableCreateStatement {
    default_table_statement()
        .col(ColumnDef::new(DefaultUserColumn::CreatedBy)
            .uuid())
        .col(ColumnDef::new(DefaultUserColumn::UpdatedBy)
            .uuid())
        .col(ColumnDef::new(DefaultUserColumn::IpAddress)
            .text()
            .not_null())
        .take()
}

#[macro_export]
macro_rules! setup_user_table_fk {
    ($m:expr,$t:expr) => {{
        use crate::util::*;
        use crate::m20250613_083042_init::User;

        $m.create_foreign_key(ForeignKeyCreateStatement::new()
                .from($t, DefaultUserColumn::CreatedBy)
                .to(User::Table, DefaultColumn::Id)
                .on_delete(ForeignKeyAction::SetNull)
                .on_update(ForeignKeyAction::Cascade)
                .take()
        ).await?;

        $m.create_foreign_key(ForeignKeyCreateStatement::new()
                .from($t, DefaultUserColumn::UpdatedBy)
                .to(User::Table, DefaultColumn::Id)
                .on_delete(ForeignKeyAction::SetNull)
                .on_update(ForeignKeyAction::Cascade)
                .take()
        ).await?;
    }};
}

#[derive(DeriveIden)]
pub(crate) enum DefaultUserColumn {
    CreatedBy,
    UpdatedBy,
    IpAddress,
}

/// `from.column` references `to.id`
pub(crate) fn references(from: impl IntoIden, column: impl IntoIden, to: impl IntoIden, on_delete: ForeignKeyAction) -> ForeignKeyCreateStatement {
    ForeignKeyCreateStatement::new()
        .from(from, column)
        .to(to, DefaultColumn::Id)
        .on_delete(on_delete)
        .on_update(ForeignKeyAction::Cascade)
        .take()
}

/// Unique index named after its table and columns
pub(crate) fn unique_index(table: impl IntoIden, columns: &[&'static str]) -> IndexCreateStatement {
    let table = table.into_iden();

    let mut index = Index::create();
    index
        .if_not_exists()
        .name(format!("uq_{}_{}", table.to_string(), columns.join("_")))
        .table(table)
        .unique();

    for column in columns {
        index.col(Alias::new(*column));
    }

    index
}
