use std::sync::Arc;

use chrono::NaiveDate;
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use tracing::instrument;
use uuid::Uuid;

use crate::{
    auth::Identity,
    consts::OVERTIME_MULTIPLIER_PERCENT,
    entity::{attendance_period, payslip, reimbursement, user},
    error::{AppError, Issue},
    iso8601,
    repository::{group, AttendanceRepository, ByEmployee, Lock, PayrollRepository, ReimbursementRepository, UserRepository},
    utils,
};

use super::payroll::attendance_pay;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayslipView {
    pub id: Uuid,
    pub user: PayslipUser,
    pub attendance_period: PayslipPeriod,
    pub base_salary: i64,
    pub working_days: i64,
    pub attendance_days: i64,
    pub attendance_pay: i64,
    pub overtime: PayslipOvertime,
    pub reimbursements: Vec<PayslipReimbursement>,
    pub reimbursement_total: i64,
    #[serde(rename = "total_take_home_pay")]
    pub total_take_home: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayslipUser {
    pub id: Uuid,
    pub username: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayslipPeriod {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayslipOvertime {
    /// ISO-8601 duration
    pub duration: String,
    pub daily_rate: i64,
    pub multiplier: f64,
    pub overtime_pay: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayslipReimbursement {
    pub description: Option<String>,
    pub amount: i64,
    pub reimbursement_date: NaiveDate,
}

impl From<reimbursement::Model> for PayslipReimbursement {
    fn from(model: reimbursement::Model) -> Self {
        Self {
            description: model.description,
            amount: model.amount,
            reimbursement_date: model.reimbursement_date,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayslipList {
    pub payslips: Vec<PayslipView>,
    #[serde(rename = "total_take_home_pay")]
    pub total_take_home: i64,
}

/// Assembles the readable payslip from what was stored at generation time
fn view(
    slip: payslip::Model,
    user: &user::Model,
    period: &attendance_period::Model,
    reimbursements: Vec<reimbursement::Model>,
) -> Result<PayslipView, AppError> {
    let period_days = utils::period_days(period.start_date, period.end_date);

    Ok(PayslipView {
        id: slip.id,
        user: PayslipUser {
            id: user.id,
            username: user.username.clone(),
        },
        attendance_period: PayslipPeriod {
            start_date: period.start_date,
            end_date: period.end_date,
        },
        base_salary: slip.base_salary,
        working_days: period_days,
        attendance_days: slip.attendance_days,
        attendance_pay: attendance_pay(slip.base_salary, slip.attendance_days, period_days)?,
        overtime: PayslipOvertime {
            duration: iso8601::format(slip.overtime()),
            daily_rate: slip.base_salary / period_days,
            multiplier: OVERTIME_MULTIPLIER_PERCENT as f64 / 100.0,
            overtime_pay: slip.overtime_pay,
        },
        reimbursements: reimbursements.into_iter().map(PayslipReimbursement::from).collect(),
        reimbursement_total: slip.reimbursement_total,
        total_take_home: slip.total_take_home,
    })
}

/// Read side of generated payrolls
pub struct PayslipService {
    db: Arc<DatabaseConnection>,
}

impl PayslipService {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// The caller's own payslip in a payroll
    #[instrument(skip_all, fields(employee_id = %identity.employee_id, request_id = %identity.request_id, %payroll_id))]
    pub async fn show_for_employee(&self, identity: &Identity, payroll_id: Uuid) -> Result<PayslipView, AppError> {
        let Some(user) = UserRepository::new(self.db.as_ref()).find_by_id(identity.employee_id).await? else {
            return Err(Issue::UserNotFound.into());
        };

        let Some(period) = AttendanceRepository::new(self.db.as_ref()).find_period_by_payroll_id(payroll_id).await? else {
            return Err(Issue::PeriodNotFound.into());
        };

        let Some(slip) = PayrollRepository::new(self.db.as_ref()).find_payslip(user.id, payroll_id).await? else {
            return Err(Issue::PayslipNotFound.into());
        };

        let reimbursements = ReimbursementRepository::new(self.db.as_ref())
            .find_by_user_period(user.id, period.start_date, period.end_date).await?;

        view(slip, &user, &period, reimbursements)
    }

    /// Every payslip in a payroll, in user order, with the payroll's total
    ///
    /// Users that had no payslip generated are left out.
    #[instrument(skip_all, fields(employee_id = %identity.employee_id, request_id = %identity.request_id, %payroll_id))]
    pub async fn list_for_payroll(&self, identity: &Identity, payroll_id: Uuid) -> Result<PayslipList, AppError> {
        if !identity.is_admin {
            return Err(Issue::PayrollNotAuthorized.into());
        }

        let users = UserRepository::new(self.db.as_ref()).find_all(Lock::None).await?;
        let mut payslips = group::<ByEmployee, _>(PayrollRepository::new(self.db.as_ref()).find_payslips(payroll_id).await?);

        let Some(period) = AttendanceRepository::new(self.db.as_ref()).find_period_by_payroll_id(payroll_id).await? else {
            return Err(Issue::PeriodNotFound.into());
        };

        let mut reimbursements = group::<ByEmployee, _>(
            ReimbursementRepository::new(self.db.as_ref())
                .find_by_period(period.start_date, period.end_date, Lock::None).await?
        );

        let mut list = PayslipList { payslips: Vec::with_capacity(payslips.len()), total_take_home: 0 };
        for user in &users {
            // One payslip per user and payroll
            let Some(slip) = payslips.remove(&user.id).and_then(|slips| slips.into_iter().next()) else {
                continue;
            };

            list.total_take_home = list.total_take_home.checked_add(slip.total_take_home)
                .ok_or_else(|| AppError::Internal("payroll total overflows".to_owned()))?;
            list.payslips.push(view(slip, user, &period, reimbursements.remove(&user.id).unwrap_or_default())?);
        }

        Ok(list)
    }
}
