use actix_web::{post, web, HttpResponse, Responder};

use crate::{auth::Identity, error::AppError, service::AttendanceService};

use super::Response;

use model::*;

mod model;

pub(super) fn config(cfg: &mut web::ServiceConfig) {
    cfg
        .service(submit_attendance)
        .service(create_period);
}

#[post("")]
async fn submit_attendance(service: web::Data<AttendanceService>, identity: Identity) -> Result<impl Responder, AppError> {
    let record = service.submit(&identity).await?;

    Ok(Response::new(identity.request_id, record))
}

#[post("/period")]
async fn create_period(service: web::Data<AttendanceService>, identity: Identity, payload: web::Json<CreatePeriod>) -> Result<impl Responder, AppError> {
    let (start, end) = payload.dates()?;
    let period = service.create_period(&identity, start, end).await?;

    Ok(
        HttpResponse::Created()
            .json(Response::new(identity.request_id, period).into_inner())
    )
}

#[cfg(test)]
mod tests {
    use actix_web::{http::{Method, StatusCode}, test, App};
    use sea_orm::{DatabaseBackend, MockDatabase};

    use crate::{
        auth::Authority,
        clock::FixedClock,
        database::testing::audit_exec_results,
        entity::{attendance, attendance_period, sea_orm_active_enums::RoleType},
        error::ErrorBody,
        pages::testing::{app_data, SECRET},
        repository::fixtures::{self, at, date},
    };

    use super::*;

    #[actix_web::test]
    async fn test_submit_attendance() {
        let employee = fixtures::user("Bob", RoleType::Employee, 1000);
        let record = fixtures::attendance(employee.id, date(2023, 10, 2));
        let token = Authority::new(SECRET).issue_for(&employee).unwrap();

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results(audit_exec_results())
            .append_query_results([vec![ record.clone() ]])
            .into_connection();

        let app = test::init_service(
            App::new()
                .configure(app_data(db, FixedClock(at(2023, 10, 2, 8, 30))))
                .configure(crate::pages::config)
        ).await;

        let req = test::TestRequest::default()
            .uri("/attendance")
            .method(Method::POST)
            .insert_header(("Authorization", format!("JWT {token}")))
            .to_request();

        let response: Response<attendance::Model> = test::call_and_read_body_json(&app, req).await;
        assert_eq!(response.data, record);
    }

    #[actix_web::test]
    async fn test_submit_attendance_on_weekend() {
        let employee = fixtures::user("Bob", RoleType::Employee, 1000);
        let token = Authority::new(SECRET).issue_for(&employee).unwrap();

        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();

        let app = test::init_service(
            App::new()
                .configure(app_data(db, FixedClock(at(2023, 10, 8, 9, 0))))
                .configure(crate::pages::config)
        ).await;

        let req = test::TestRequest::default()
            .uri("/attendance")
            .method(Method::POST)
            .insert_header(("Authorization", format!("JWT {token}")))
            .to_request();

        let response = test::call_service(&app, req).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body: ErrorBody = test::read_body_json(response).await;
        assert_eq!(body.issues[0].issue_code, "ATTENDANCE_INVALID_DAY");
    }

    #[actix_web::test]
    async fn test_create_period() {
        let admin = fixtures::user("Admin", RoleType::Admin, 0);
        let period = fixtures::period(date(2023, 10, 1), date(2023, 10, 31));
        let token = Authority::new(SECRET).issue_for(&admin).unwrap();

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results(audit_exec_results())
            .append_query_results([vec![ period.clone() ]])
            .into_connection();

        let app = test::init_service(
            App::new()
                .configure(app_data(db, FixedClock(at(2023, 10, 2, 8, 30))))
                .configure(crate::pages::config)
        ).await;

        {
            let req = test::TestRequest::default()
                .uri("/attendance/period")
                .method(Method::POST)
                .insert_header(("Authorization", format!("JWT {token}")))
                .set_json(CreatePeriod { start_date: "2023-10-01".to_owned(), end_date: "31/10/2023".to_owned() })
                .to_request();

            let response = test::call_service(&app, req).await;
            assert_eq!(response.status(), StatusCode::BAD_REQUEST);

            let body: ErrorBody = test::read_body_json(response).await;
            assert_eq!(body.issues[0].issue_code, "VALIDATION_ERROR");
        }

        {
            let req = test::TestRequest::default()
                .uri("/attendance/period")
                .method(Method::POST)
                .insert_header(("Authorization", format!("JWT {token}")))
                .set_json(CreatePeriod { start_date: "2023-10-01".to_owned(), end_date: "2023-10-31".to_owned() })
                .to_request();

            let response = test::call_service(&app, req).await;
            assert_eq!(response.status(), StatusCode::CREATED);

            let body: Response<attendance_period::Model> = test::read_body_json(response).await;
            assert_eq!(body.data, period);
        }
    }

    #[actix_web::test]
    async fn test_create_period_as_employee() {
        let employee = fixtures::user("Bob", RoleType::Employee, 1000);
        let token = Authority::new(SECRET).issue_for(&employee).unwrap();

        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();

        let app = test::init_service(
            App::new()
                .configure(app_data(db, FixedClock(at(2023, 10, 2, 8, 30))))
                .configure(crate::pages::config)
        ).await;

        let req = test::TestRequest::default()
            .uri("/attendance/period")
            .method(Method::POST)
            .insert_header(("Authorization", format!("JWT {token}")))
            .set_json(CreatePeriod { start_date: "2023-10-01".to_owned(), end_date: "2023-10-31".to_owned() })
            .to_request();

        let response = test::call_service(&app, req).await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }
}
