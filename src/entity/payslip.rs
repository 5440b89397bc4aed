use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "payslip")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
    pub created_by: Option<Uuid>,
    pub updated_by: Option<Uuid>,
    pub ip_address: String,
    pub user_id: Uuid,
    pub payroll_id: Uuid,
    pub base_salary: i64,
    pub attendance_days: i64,
    pub overtime_seconds: i64,
    pub overtime_pay: i64,
    pub reimbursement_total: i64,
    pub total_take_home: i64,
}

impl Model {
    pub fn overtime(&self) -> chrono::Duration {
        chrono::Duration::seconds(self.overtime_seconds)
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::payroll::Entity",
        from = "Column::PayrollId",
        to = "super::payroll::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    Payroll,
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id",
        on_update = "Cascade",
        on_delete = "Restrict"
    )]
    User,
}

impl Related<super::payroll::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Payroll.def()
    }
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
