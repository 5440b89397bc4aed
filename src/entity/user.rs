use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::RoleType;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "user")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
    #[sea_orm(unique)]
    pub username: String,
    /// `sha256("{password}:{username}")`
    #[serde(skip_serializing, default)]
    pub password: Vec<u8>,
    pub role: RoleType,
    /// Base salary of a whole period, in the smallest currency unit
    pub salary: i64,
}

impl Model {
    pub fn is_admin(&self) -> bool {
        self.role == RoleType::Admin
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::attendance::Entity")]
    Attendance,
    #[sea_orm(has_many = "super::overtime::Entity")]
    Overtime,
    #[sea_orm(has_many = "super::reimbursement::Entity")]
    Reimbursement,
    #[sea_orm(has_many = "super::payslip::Entity")]
    Payslip,
}

impl Related<super::attendance::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Attendance.def()
    }
}

impl Related<super::overtime::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Overtime.def()
    }
}

impl Related<super::reimbursement::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Reimbursement.def()
    }
}

impl Related<super::payslip::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Payslip.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
