use actix_web::{post, web, HttpResponse, Responder};

use crate::{auth::Identity, error::AppError, service::ReimbursementService};

use super::Response;

use model::*;

mod model;

pub(super) fn config(cfg: &mut web::ServiceConfig) {
    cfg
        .service(submit_reimbursement);
}

#[post("")]
async fn submit_reimbursement(service: web::Data<ReimbursementService>, identity: Identity, payload: web::Json<SubmitReimbursement>) -> Result<impl Responder, AppError> {
    let date = payload.validate()?;
    let SubmitReimbursement { amount, description, .. } = payload.into_inner();

    let record = service.submit(&identity, amount, date, description).await?;

    Ok(
        HttpResponse::Created()
            .json(Response::new(identity.request_id, record).into_inner())
    )
}
