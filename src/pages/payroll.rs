use actix_web::{get, post, web, HttpResponse, Responder};
use uuid::Uuid;

use crate::{auth::Identity, error::AppError, service::{PayrollService, PayslipService}};

use super::Response;

use model::*;

mod model;

pub(super) fn config(cfg: &mut web::ServiceConfig) {
    cfg
        .service(generate_payroll)
        .service(show_payslip)
        .service(list_payslips);
}

#[post("")]
async fn generate_payroll(service: web::Data<PayrollService>, identity: Identity, payload: web::Json<GeneratePayroll>) -> Result<impl Responder, AppError> {
    let generated = service.generate(&identity, payload.period_id).await?;

    Ok(
        HttpResponse::Created()
            .json(Response::new(identity.request_id, generated).into_inner())
    )
}

#[get("/{payroll_id}/payslip")]
async fn show_payslip(service: web::Data<PayslipService>, identity: Identity, payroll_id: web::Path<Uuid>) -> Result<impl Responder, AppError> {
    let view = service.show_for_employee(&identity, payroll_id.into_inner()).await?;

    Ok(Response::new(identity.request_id, view))
}

#[get("/{payroll_id}/payslips")]
async fn list_payslips(
    service: web::Data<PayslipService>,
    identity: Identity,
    payroll_id: web::Path<Uuid>,
    pagination: web::Query<Pagination>,
) -> Result<impl Responder, AppError> {
    let list = service.list_for_payroll(&identity, payroll_id.into_inner()).await?;
    let (page, limit) = pagination.resolve();

    let total = list.payslips.len() as u64;
    let payslips = list.payslips.into_iter()
        .skip((page - 1).saturating_mul(limit) as usize)
        .take(limit as usize)
        .collect();

    Ok(Response::new(identity.request_id, PayslipPage {
        payslips,
        total_take_home_pay: list.total_take_home,
        page,
        limit,
        total,
    }))
}
