use actix_web::{get, post, web, Responder};
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing_actix_web::RequestId;

use crate::{auth::{Authority, Identity}, repository::UserRepository};

use super::Response;

pub(super) fn config(cfg: &mut web::ServiceConfig) {
    cfg
        .service(login)
        .service(whoami);
}

#[derive(Debug, Serialize, Deserialize)]
struct Login {
    username: String,
    password: String,
}

#[post("/login")]
async fn login(db: web::Data<DatabaseConnection>, authority: web::Data<Authority>, request_id: RequestId, credentials: web::Json<Login>) -> actix_web::Result<impl Responder> {
    let hashed_password = &Sha256::digest(format!("{}:{}", credentials.password, credentials.username))[..];

    let Some(user) = UserRepository::new(db.get_ref())
        .find_by_credentials(&credentials.username, hashed_password).await?
    else {
        return Err(actix_web::error::ErrorForbidden("invalid credentials"));
    };

    Ok(Response::new(request_id.to_string(), authority.issue_for(&user)?))
}

#[get("")]
async fn whoami(identity: Identity) -> impl Responder {
    Response::new(identity.request_id.clone(), identity)
}
