use std::{error::Error, fs::OpenOptions, sync::Arc};

use actix_web::{web, App, HttpServer};
use sea_orm::Database;
use tracing::{info, Level};
use tracing_actix_web::TracingLogger;
use tracing_subscriber::{filter, fmt, layer::SubscriberExt, EnvFilter, Layer, Registry};

use crate::{
    auth::Authority,
    clock::{Clock, SystemClock},
    service::{AttendanceService, OvertimeService, PayrollService, PayslipService, ReimbursementService},
};

mod clock;
mod config;
mod consts;
mod error;
mod iso8601;
mod utils;

mod auth;
mod database;
mod entity;
mod pages;
mod repository;
mod service;

#[actix_web::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let _ = dotenvy::dotenv();

    let config::Config {
        host_address,
        database_opt,
        jwt_key,
        log_file,
    } = config::load()?;

    let log_file = OpenOptions::new()
        .append(true)
        .create(true)
        .open(log_file)?;

    let subscriber = Registry::default()
        .with(
            fmt::layer()
                .with_ansi(true)
                .with_line_number(true)
                .with_filter(EnvFilter::from_default_env())
        )
        .with(
            fmt::layer()
                .with_ansi(false)
                .with_writer(log_file)
                .with_filter(filter::LevelFilter::from_level(Level::TRACE))
        );

    tracing::subscriber::set_global_default(subscriber)?;

    let database = Arc::new(Database::connect(database_opt).await?);
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);

    let authority = web::Data::new(Authority::new(jwt_key.as_bytes()));
    let attendance = web::Data::new(AttendanceService::new(database.clone(), clock.clone()));
    let overtime = web::Data::new(OvertimeService::new(database.clone(), clock.clone()));
    let reimbursement = web::Data::new(ReimbursementService::new(database.clone(), clock.clone()));
    let payroll = web::Data::new(PayrollService::new(database.clone(), clock));
    let payslip = web::Data::new(PayslipService::new(database.clone()));
    let database = web::Data::from(database);

    let server = HttpServer::new(move || {
        App::new()
            .app_data(database.clone())
            .app_data(authority.clone())
            .app_data(attendance.clone())
            .app_data(overtime.clone())
            .app_data(reimbursement.clone())
            .app_data(payroll.clone())
            .app_data(payslip.clone())
            .wrap(TracingLogger::default())
            .configure(pages::config)
    });

    let server = server.bind(host_address)?;
    info!(addresses = ?server.addrs(), "listening");

    server.run().await?;

    Ok(())
}
