use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "payroll")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
    pub created_by: Option<Uuid>,
    pub updated_by: Option<Uuid>,
    pub ip_address: String,
    #[sea_orm(unique)]
    pub period_id: Uuid,
    pub run_by: Uuid,
    pub run_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::attendance_period::Entity",
        from = "Column::PeriodId",
        to = "super::attendance_period::Column::Id",
        on_update = "Cascade",
        on_delete = "Restrict"
    )]
    AttendancePeriod,
    #[sea_orm(has_many = "super::payslip::Entity")]
    Payslip,
    #[sea_orm(has_one = "super::payroll_summary::Entity")]
    PayrollSummary,
}

impl Related<super::attendance_period::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AttendancePeriod.def()
    }
}

impl Related<super::payslip::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Payslip.def()
    }
}

impl Related<super::payroll_summary::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PayrollSummary.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
