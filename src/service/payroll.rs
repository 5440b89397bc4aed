use std::sync::Arc;

use chrono::Duration;
use sea_orm::{prelude::DateTimeWithTimeZone, ActiveValue::Set, DatabaseConnection};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};
use uuid::Uuid;

use crate::{
    auth::Identity,
    clock::Clock,
    consts::{OVERTIME_MULTIPLIER_PERCENT, SECONDS_PER_HOUR},
    database::{on_unique_violation, with_audit_context},
    entity::{payroll, payroll_summary, payslip, user},
    error::{AppError, Issue},
    repository::{
        group, AttendanceRepository, ByDate, ByEmployee, Lock, OvertimeRepository, PayrollRepository,
        ReimbursementRepository, UserRepository,
    },
    utils,
};

/// Outcome of a payroll run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedPayroll {
    pub period_id: Uuid,
    pub payroll_id: Uuid,
    #[serde(rename = "total_take_home_pay")]
    pub total_take_home: i64,
    pub total_employee: usize,
    pub total_payslip: usize,
    pub generated_by: Uuid,
    pub generated_at: DateTimeWithTimeZone,
}

/// Pay of one employee for one period
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PayslipFigures {
    pub attendance_days: i64,
    pub overtime: Duration,
    pub attendance_pay: i64,
    pub overtime_pay: i64,
    pub reimbursement_total: i64,
    pub total_take_home: i64,
}

/// `salary * attendance_days / period_days`, truncated
pub fn attendance_pay(salary: i64, attendance_days: i64, period_days: i64) -> Result<i64, AppError> {
    let pay = i128::from(salary) * i128::from(attendance_days) / i128::from(period_days.max(1));

    i64::try_from(pay).map_err(|_| AppError::Internal(format!("attendance pay overflows: {pay}")))
}

/// Overtime hours paid at the daily rate (`salary / period_days`) times the
/// multiplier, truncated
///
/// Worked out in whole seconds so fractions of an hour are not rounded away
/// before the multiplication.
pub fn overtime_pay(salary: i64, overtime: Duration, period_days: i64) -> Result<i64, AppError> {
    let pay = i128::from(overtime.num_seconds()) * i128::from(salary) * i128::from(OVERTIME_MULTIPLIER_PERCENT)
        / (i128::from(period_days.max(1)) * i128::from(SECONDS_PER_HOUR) * 100);

    i64::try_from(pay).map_err(|_| AppError::Internal(format!("overtime pay overflows: {pay}")))
}

/// Reimbursements are reported on the payslip but are not part of the take
/// home pay
pub fn compute_payslip(
    salary: i64,
    period_days: i64,
    attendance_days: i64,
    overtime: Duration,
    reimbursement_total: i64,
) -> Result<PayslipFigures, AppError> {
    let attendance_pay = attendance_pay(salary, attendance_days, period_days)?;
    let overtime_pay = overtime_pay(salary, overtime, period_days)?;

    let total_take_home = attendance_pay.checked_add(overtime_pay)
        .ok_or_else(|| AppError::Internal("take home pay overflows".to_owned()))?;

    Ok(PayslipFigures {
        attendance_days,
        overtime,
        attendance_pay,
        overtime_pay,
        reimbursement_total,
        total_take_home,
    })
}

pub struct PayrollService {
    db: Arc<DatabaseConnection>,
    clock: Arc<dyn Clock>,
}

impl PayrollService {
    pub fn new(db: Arc<DatabaseConnection>, clock: Arc<dyn Clock>) -> Self {
        Self { db, clock }
    }

    /// Runs payroll for a period, once
    ///
    /// Everything read for the run is locked until it commits, so a second run
    /// for the same period waits and then sees the first one's payroll.
    #[instrument(skip_all, fields(employee_id = %identity.employee_id, request_id = %identity.request_id, %period_id))]
    pub async fn generate(&self, identity: &Identity, period_id: Uuid) -> Result<GeneratedPayroll, AppError> {
        if !identity.is_admin {
            return Err(Issue::PayrollNotAuthorized.into());
        }

        let now = self.clock.now();

        let generated = with_audit_context(&self.db, identity, async |txn| {
            let payrolls = PayrollRepository::new(txn);
            let attendance = AttendanceRepository::new(txn);

            if payrolls.find_by_period_id(period_id, Lock::Exclusive).await?.is_some() {
                return Err(Issue::AlreadyGenerated.into());
            }

            let Some(period) = attendance.find_period_by_id(period_id, Lock::Exclusive).await? else {
                return Err(Issue::PeriodNotFound.into());
            };
            let (start, end) = (period.start_date, period.end_date);

            let users = UserRepository::new(txn).find_all(Lock::Exclusive).await?;
            let mut attendances = group::<ByEmployee, _>(attendance.find_by_period(start, end, Lock::Exclusive).await?);
            let mut overtimes = group::<ByEmployee, _>(OvertimeRepository::new(txn).find_by_period(start, end, Lock::Exclusive).await?);
            let mut reimbursements = group::<ByEmployee, _>(ReimbursementRepository::new(txn).find_by_period(start, end, Lock::Exclusive).await?);

            let period_days = utils::period_days(start, end);
            debug!(users = users.len(), period_days, "computing payslips");

            let mut total_take_home: i64 = 0;
            let mut figures = Vec::with_capacity(users.len());
            for user in &users {
                // Distinct days, a day filed twice still counts once
                let attendance_days = attendances.remove(&user.id)
                    .map_or(0, |records| group::<ByDate, _>(records).len() as i64);
                let overtime = overtimes.remove(&user.id).unwrap_or_default()
                    .iter()
                    .map(|record| record.duration_seconds)
                    .sum::<i64>();
                let reimbursement_total = reimbursements.remove(&user.id).unwrap_or_default()
                    .iter()
                    .map(|record| record.amount)
                    .sum::<i64>();

                let slip = compute_payslip(user.salary, period_days, attendance_days, Duration::seconds(overtime), reimbursement_total)?;

                total_take_home = total_take_home.checked_add(slip.total_take_home)
                    .ok_or_else(|| AppError::Internal("payroll total overflows".to_owned()))?;
                figures.push((user, slip));
            }

            let payroll = payrolls.insert_payroll(payroll::ActiveModel {
                created_at: Set(now),
                updated_at: Set(now),
                created_by: Set(Some(identity.employee_id)),
                updated_by: Set(Some(identity.employee_id)),
                ip_address: Set(identity.ip_address.clone()),
                period_id: Set(period.id),
                run_by: Set(identity.employee_id),
                run_at: Set(now),
                ..Default::default()
            })
            .await
            // Lost the race against a run that committed after our lookup
            .map_err(on_unique_violation(Issue::AlreadyGenerated))?;

            let payslips = figures.into_iter()
                .map(|(user, slip)| payslip_model(identity, now, payroll.id, user, &slip))
                .collect();
            let total_payslip = payrolls.insert_payslips(payslips).await?;

            payrolls.insert_summary(payroll_summary::ActiveModel {
                created_at: Set(now),
                updated_at: Set(now),
                created_by: Set(Some(identity.employee_id)),
                updated_by: Set(Some(identity.employee_id)),
                ip_address: Set(identity.ip_address.clone()),
                payroll_id: Set(payroll.id),
                total_take_home: Set(total_take_home),
                generated_by: Set(identity.employee_id),
                generated_at: Set(now),
                ..Default::default()
            }).await?;

            Ok(GeneratedPayroll {
                period_id: period.id,
                payroll_id: payroll.id,
                total_take_home,
                total_employee: users.len(),
                total_payslip,
                generated_by: identity.employee_id,
                generated_at: now,
            })
        }).await?;

        info!(
            payroll_id = %generated.payroll_id,
            total_take_home = generated.total_take_home,
            total_payslip = generated.total_payslip,
            "payroll generated",
        );

        Ok(generated)
    }
}

fn payslip_model(
    identity: &Identity,
    now: DateTimeWithTimeZone,
    payroll_id: Uuid,
    user: &user::Model,
    slip: &PayslipFigures,
) -> payslip::ActiveModel {
    payslip::ActiveModel {
        created_at: Set(now),
        updated_at: Set(now),
        created_by: Set(Some(identity.employee_id)),
        updated_by: Set(Some(identity.employee_id)),
        ip_address: Set(identity.ip_address.clone()),
        user_id: Set(user.id),
        payroll_id: Set(payroll_id),
        base_salary: Set(user.salary),
        attendance_days: Set(slip.attendance_days),
        overtime_seconds: Set(slip.overtime.num_seconds()),
        overtime_pay: Set(slip.overtime_pay),
        reimbursement_total: Set(slip.reimbursement_total),
        total_take_home: Set(slip.total_take_home),
        ..Default::default()
    }
}
