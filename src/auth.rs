use std::net::SocketAddr;

use actix_web::{body, dev, http::{self, header::ContentType, StatusCode}, web, FromRequest, HttpMessage as _, HttpRequest, HttpResponse};
use chrono::{Duration, Local};
use futures_util::future::LocalBoxFuture;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing_actix_web::RequestId;
use uuid::Uuid;

use crate::entity::user;

/// Issues and checks the bearer tokens handed out by `/auth/login`
pub struct Authority {
    jwt_key: (EncodingKey, DecodingKey),
}

impl Authority {
    pub fn new(jwt_key: &[u8]) -> Self {
        Self {
            jwt_key: (EncodingKey::from_secret(jwt_key), DecodingKey::from_secret(jwt_key))
        }
    }

    /// Issue a token for specified user with 1 week of expiration time
    pub fn issue_for(&self, user: &user::Model) -> Result<String, AuthError> {
        let claims = Claims {
            exp: (Local::now() + Duration::weeks(1)).timestamp(),
            data: Subject::from(user),
        };

        Ok(encode(&Header::default(), &claims, &self.jwt_key.0)?)
    }

    pub fn authorize(&self, token: impl AsRef<str>) -> Result<Subject, AuthError> {
        let payload = decode::<Claims<Subject>>(token.as_ref(), &self.jwt_key.1, &Validation::default())?;

        Ok(payload.claims.data)
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct Claims<T> {
    exp: i64,
    data: T,
}

/// What a token says about its bearer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subject {
    pub id: Uuid,
    pub username: String,
    pub is_admin: bool,
}

impl From<&user::Model> for Subject {
    fn from(user: &user::Model) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            is_admin: user.is_admin(),
        }
    }
}

/// The caller of a request: who they are, where they called from and which
/// request they are making
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub employee_id: Uuid,
    pub username: String,
    pub is_admin: bool,
    pub ip_address: String,
    pub request_id: String,
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("authority error")]
    AuthorityError(#[from] jsonwebtoken::errors::Error),
}

impl actix_web::error::ResponseError for AuthError {
    fn error_response(&self) -> HttpResponse<body::BoxBody> {
        HttpResponse::build(self.status_code())
            .insert_header(ContentType::plaintext())
            .body(self.to_string())
    }

    fn status_code(&self) -> http::StatusCode {
        match self {
            AuthError::AuthorityError(_) => StatusCode::FORBIDDEN,
        }
    }
}

impl FromRequest for Identity {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut dev::Payload) -> Self::Future {
        let req = req.clone();

        Box::pin(async move {
            // Basically grabs the value after space ( ) from `Authorization` header
            // Example: JWT sometoken
            //              ^ grabs this value
            let Some(Ok(Some((_, token)))) = req.headers()
                .get("Authorization")
                .map(|v|
                    v.to_str()
                        .map(|str| str.split_once(" "))
                )
            else {
                return Err(actix_web::error::ErrorUnauthorized("unauthorized"))
            };

            let Some(authority) = req.app_data::<web::Data<Authority>>() else {
                return Err(actix_web::error::ErrorInternalServerError("authority is not configured"))
            };
            let subject = authority.authorize(token)?;

            Ok(Self {
                employee_id: subject.id,
                username: subject.username,
                is_admin: subject.is_admin,
                ip_address: client_ip(&req),
                request_id: request_id(&req),
            })
        })
    }
}

fn client_ip(req: &HttpRequest) -> String {
    let info = req.connection_info();
    let Some(addr) = info.realip_remote_addr() else {
        return "unknown".to_owned();
    };

    addr.parse::<SocketAddr>()
        .map(|addr| addr.ip().to_string())
        .unwrap_or_else(|_| addr.to_owned())
}

/// The id `TracingLogger` assigned to this request, or a fresh one when the
/// middleware is not mounted
fn request_id(req: &HttpRequest) -> String {
    req.extensions()
        .get::<RequestId>()
        .map(ToString::to_string)
        .unwrap_or_else(|| Uuid::new_v4().to_string())
}

#[cfg(test)]
pub(crate) fn identity_for(user: &user::Model) -> Identity {
    Identity {
        employee_id: user.id,
        username: user.username.clone(),
        is_admin: user.is_admin(),
        ip_address: "127.0.0.1".to_owned(),
        request_id: Uuid::new_v4().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use actix_web::{get, test, web, App, Responder};
    use tracing_actix_web::TracingLogger;

    use crate::entity::sea_orm_active_enums::RoleType;

    use super::*;

    fn user(role: RoleType) -> user::Model {
        user::Model {
            id: Uuid::new_v4(),
            created_at: Local::now().into(),
            updated_at: Local::now().into(),
            username: "Bob".to_string(),
            password: Vec::new(),
            role,
            salary: 1_000_000,
        }
    }

    #[actix_web::test]
    async fn test_authority() {
        let authority = Authority::new(b"secret");

        let user = user(RoleType::Admin);
        let token = authority.issue_for(&user).unwrap();

        let subject = authority.authorize(token).expect("Unable to authorize user from token");
        assert_eq!(subject, Subject { id: user.id, username: "Bob".to_owned(), is_admin: true });

        assert!(Authority::new(b"other").authorize(authority.issue_for(&user).unwrap()).is_err());
    }

    #[actix_web::test]
    async fn test_extractor() {
        let secret = b"secret";

        #[get("/")]
        async fn test_handler(identity: Identity) -> impl Responder {
            web::Json(identity)
        }

        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(Authority::new(secret)))
                .wrap(TracingLogger::default())
                .service(test_handler)
        ).await;

        {
            let forbidden_req = test::TestRequest::default()
                .uri("/")
                .insert_header(("Authorization", "JWT wrong"))
                .to_request();

            let response = test::call_service(&app, forbidden_req).await;
            assert_eq!(response.status(), StatusCode::FORBIDDEN);
        }

        {
            let unauthorized_req = test::TestRequest::default()
                .uri("/")
                .to_request();

            let response = test::call_service(&app, unauthorized_req).await;
            assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        }

        {
            let user = user(RoleType::Employee);
            let token = Authority::new(secret).issue_for(&user).unwrap();

            let authorized_req = test::TestRequest::default()
                .insert_header(("Authorization", format!("JWT {token}")))
                .peer_addr("10.0.0.7:52100".parse().unwrap())
                .to_request();

            let identity: Identity = test::call_and_read_body_json(&app, authorized_req).await;
            assert_eq!(identity.employee_id, user.id);
            assert_eq!(identity.username, "Bob");
            assert!(!identity.is_admin);
            assert_eq!(identity.ip_address, "10.0.0.7");
            assert!(Uuid::parse_str(&identity.request_id).is_ok());
        }
    }

    #[actix_web::test]
    async fn test_extractor_prefers_forwarded_address() {
        let secret = b"secret";

        #[get("/")]
        async fn test_handler(identity: Identity) -> impl Responder {
            identity.ip_address
        }

        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(Authority::new(secret)))
                .service(test_handler)
        ).await;

        let token = Authority::new(secret).issue_for(&user(RoleType::Employee)).unwrap();
        let req = test::TestRequest::default()
            .insert_header(("Authorization", format!("JWT {token}")))
            .insert_header(("X-Forwarded-For", "203.0.113.9"))
            .peer_addr("10.0.0.7:52100".parse().unwrap())
            .to_request();

        let body = test::call_and_read_body(&app, req).await;
        assert_eq!(body, "203.0.113.9".as_bytes());
    }
}
