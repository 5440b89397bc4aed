use actix_web::web;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{consts::DATE_FORMAT, error::{AppError, Issue}};

mod auth;
mod attendance;
mod overtime;
mod payroll;
mod reimbursement;

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg
        .app_data(web::JsonConfig::default().error_handler(|err, _| validation_error(err)))
        .app_data(web::PathConfig::default().error_handler(|err, _| validation_error(err)))
        .app_data(web::QueryConfig::default().error_handler(|err, _| validation_error(err)))
        .service(web::scope("/auth")
            .configure(auth::config))
        .service(web::scope("/attendance")
            .configure(attendance::config))
        .service(web::scope("/overtime")
            .configure(overtime::config))
        .service(web::scope("/reimbursement")
            .configure(reimbursement::config))
        .service(web::scope("/payroll")
            .configure(payroll::config));
}

fn validation_error(err: impl ToString) -> actix_web::Error {
    AppError::from(Issue::Validation(err.to_string())).into()
}

/// Envelope of every successful response
#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct Response<T> {
    pub(crate) request_id: String,
    pub(crate) data: T,
}

impl<T> Response<T> {
    pub(crate) fn new(request_id: impl Into<String>, data: T) -> web::Json<Self> {
        web::Json(Self { request_id: request_id.into(), data })
    }
}

pub(crate) fn parse_date(field: &str, value: &str) -> Result<NaiveDate, Issue> {
    NaiveDate::parse_from_str(value, DATE_FORMAT)
        .map_err(|_| Issue::Validation(format!("`{field}` must be a date formatted as YYYY-MM-DD")))
}

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::Arc;

    use actix_web::web;
    use sea_orm::DatabaseConnection;

    use crate::{
        auth::Authority,
        clock::FixedClock,
        service::{AttendanceService, OvertimeService, PayrollService, PayslipService, ReimbursementService},
    };

    pub const SECRET: &[u8] = b"secret";

    /// Everything `main` attaches to the app, built on `db` and `clock`
    pub fn app_data(db: DatabaseConnection, clock: FixedClock) -> impl FnOnce(&mut web::ServiceConfig) {
        move |cfg| {
            let db = Arc::new(db);
            let clock = Arc::new(clock);

            cfg
                .app_data(web::Data::new(Authority::new(SECRET)))
                .app_data(web::Data::from(db.clone()))
                .app_data(web::Data::new(AttendanceService::new(db.clone(), clock.clone())))
                .app_data(web::Data::new(OvertimeService::new(db.clone(), clock.clone())))
                .app_data(web::Data::new(ReimbursementService::new(db.clone(), clock.clone())))
                .app_data(web::Data::new(PayrollService::new(db.clone(), clock)))
                .app_data(web::Data::new(PayslipService::new(db)));
        }
    }
}
