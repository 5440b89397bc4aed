use actix_web::{post, web, Responder};

use crate::{auth::Identity, error::AppError, service::OvertimeService};

use super::{parse_date, Response};

use model::*;

mod model;

pub(super) fn config(cfg: &mut web::ServiceConfig) {
    cfg
        .service(submit_overtime);
}

#[post("")]
async fn submit_overtime(service: web::Data<OvertimeService>, identity: Identity, payload: web::Json<SubmitOvertime>) -> Result<impl Responder, AppError> {
    let date = parse_date("date", &payload.date)?;
    let record = service.submit(&identity, date, &payload.overtime).await?;

    Ok(Response::new(identity.request_id, record))
}

#[cfg(test)]
mod tests {
    use actix_web::{http::{Method, StatusCode}, test, App};
    use sea_orm::{DatabaseBackend, MockDatabase};

    use crate::{
        auth::Authority,
        clock::FixedClock,
        database::testing::audit_exec_results,
        entity::{overtime, sea_orm_active_enums::RoleType},
        error::ErrorBody,
        pages::testing::{app_data, SECRET},
        repository::fixtures::{self, at, date},
    };

    use super::*;

    #[actix_web::test]
    async fn test_submit_overtime() {
        let employee = fixtures::user("Bob", RoleType::Employee, 1000);
        let record = fixtures::overtime(employee.id, date(2023, 10, 2), 2);
        let token = Authority::new(SECRET).issue_for(&employee).unwrap();

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results(audit_exec_results())
            .append_query_results([Vec::<overtime::Model>::new()])
            .append_query_results([vec![ record.clone() ]])
            .into_connection();

        let app = test::init_service(
            App::new()
                .configure(app_data(db, FixedClock(at(2023, 10, 2, 20, 0))))
                .configure(crate::pages::config)
        ).await;

        let req = test::TestRequest::default()
            .uri("/overtime")
            .method(Method::POST)
            .insert_header(("Authorization", format!("JWT {token}")))
            .set_json(SubmitOvertime { date: "2023-10-02".to_owned(), overtime: "PT2H".to_owned() })
            .to_request();

        let response: Response<overtime::Model> = test::call_and_read_body_json(&app, req).await;
        assert_eq!(response.data, record);
    }

    #[actix_web::test]
    async fn test_submit_overtime_rejections() {
        let employee = fixtures::user("Bob", RoleType::Employee, 1000);
        let token = Authority::new(SECRET).issue_for(&employee).unwrap();

        let cases = [
            (at(2023, 10, 2, 14, 0), "PT1H", "OVERTIME_INVALID_TIME_REQUEST"),
            (at(2023, 10, 2, 20, 0), "1 hour", "OVERTIME_INVALID_DURATION"),
        ];

        for (now, overtime, issue_code) in cases {
            let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();

            let app = test::init_service(
                App::new()
                    .configure(app_data(db, FixedClock(now)))
                    .configure(crate::pages::config)
            ).await;

            let req = test::TestRequest::default()
                .uri("/overtime")
                .method(Method::POST)
                .insert_header(("Authorization", format!("JWT {token}")))
                .set_json(SubmitOvertime { date: "2023-10-02".to_owned(), overtime: overtime.to_owned() })
                .to_request();

            let response = test::call_service(&app, req).await;
            assert_eq!(response.status(), StatusCode::BAD_REQUEST);

            let body: ErrorBody = test::read_body_json(response).await;
            assert_eq!(body.issues[0].issue_code, issue_code);
        }
    }
}
