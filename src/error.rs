use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use sea_orm::DbErr;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::error;

use crate::iso8601::DurationFormatError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssueKind {
    BadRequest,
    Forbidden,
    NotFound,
}

/// A business rule violation that is reported back to the caller as is
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Issue {
    #[error("Attendance cannot be submitted on weekends")]
    InvalidDay,
    #[error("You are not authorized to perform this action")]
    AttendanceNotAuthorized,
    #[error("The attendance period is invalid, start date must be before end date")]
    InvalidPeriod,
    #[error("An attendance period with the same start and end date already exists")]
    PeriodAlreadyExists,
    #[error("Overtime cannot be submitted on working hours")]
    InvalidTimeRequest,
    #[error("Overtime exceeds the allowed limit for the day")]
    ExceedsLimit,
    #[error("Overtime duration is invalid: {0}")]
    InvalidDuration(#[from] DurationFormatError),
    #[error("You are not authorized to perform this action")]
    PayrollNotAuthorized,
    #[error("Payroll for this period has already been generated")]
    AlreadyGenerated,
    #[error("Attendance period not found")]
    PeriodNotFound,
    #[error("User not found")]
    UserNotFound,
    #[error("Payslip not found")]
    PayslipNotFound,
    #[error("{0}")]
    Validation(String),
}

impl Issue {
    pub fn kind(&self) -> IssueKind {
        match self {
            Issue::AttendanceNotAuthorized | Issue::PayrollNotAuthorized => IssueKind::Forbidden,
            Issue::PeriodNotFound | Issue::UserNotFound | Issue::PayslipNotFound => IssueKind::NotFound,
            _ => IssueKind::BadRequest,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Issue::InvalidDay => "ATTENDANCE_INVALID_DAY",
            Issue::AttendanceNotAuthorized => "ATTENDANCE_NOT_AUTHORIZED",
            Issue::InvalidPeriod => "ATTENDANCE_INVALID_PERIOD",
            Issue::PeriodAlreadyExists => "ATTENDANCE_PERIOD_ALREADY_EXISTS",
            Issue::InvalidTimeRequest => "OVERTIME_INVALID_TIME_REQUEST",
            Issue::ExceedsLimit => "OVERTIME_EXCEEDS_LIMIT",
            Issue::InvalidDuration(_) => "OVERTIME_INVALID_DURATION",
            Issue::PayrollNotAuthorized => "PAYROLL_NOT_AUTHORIZED",
            Issue::AlreadyGenerated => "PAYROLL_ALREADY_GENERATED",
            Issue::PeriodNotFound => "ATTENDANCE_PERIOD_NOT_FOUND",
            Issue::UserNotFound => "USER_NOT_FOUND",
            Issue::PayslipNotFound => "PAYSLIP_NOT_FOUND",
            Issue::Validation(_) => "VALIDATION_ERROR",
        }
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Issue(#[from] Issue),

    /// Store failure tagged with the operation that produced it
    #[error("{op}: {source}")]
    Store {
        op: &'static str,
        source: DbErr,
    },

    #[error("tx.commit(): {0}")]
    Commit(#[source] DbErr),

    /// The body failed and the rollback that followed failed too
    #[error("cannot rollback ({rollback}): {source}")]
    Rollback {
        source: Box<AppError>,
        rollback: DbErr,
    },

    #[error("{0}")]
    Internal(String),
}

impl AppError {
    pub fn issue(&self) -> Option<&Issue> {
        match self {
            AppError::Issue(issue) => Some(issue),
            _ => None,
        }
    }
}

pub trait StoreContext<T> {
    fn context(self, op: &'static str) -> Result<T, AppError>;
}

impl<T> StoreContext<T> for Result<T, DbErr> {
    fn context(self, op: &'static str) -> Result<T, AppError> {
        self.map_err(|source| AppError::Store { op, source })
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub issues: Vec<ErrorIssue>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorIssue {
    pub issue_code: String,
    pub message: String,
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self.issue().map(Issue::kind) {
            Some(IssueKind::BadRequest) => StatusCode::BAD_REQUEST,
            Some(IssueKind::Forbidden) => StatusCode::FORBIDDEN,
            Some(IssueKind::NotFound) => StatusCode::NOT_FOUND,
            None => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let issue = match self.issue() {
            Some(issue) => ErrorIssue {
                issue_code: issue.code().to_owned(),
                message: issue.to_string(),
            },
            None => {
                error!(error = %self, "request failed");

                ErrorIssue {
                    issue_code: "INTERNAL_SERVER_ERROR".to_owned(),
                    message: "An internal error occurred".to_owned(),
                }
            }
        };

        HttpResponse::build(self.status_code())
            .json(ErrorBody { issues: vec![issue] })
    }
}

#[cfg(test)]
mod tests {
    use actix_web::body::MessageBody as _;

    use super::*;

    #[test]
    fn test_issue_status() {
        let cases = [
            (Issue::InvalidDay, StatusCode::BAD_REQUEST),
            (Issue::ExceedsLimit, StatusCode::BAD_REQUEST),
            (Issue::AlreadyGenerated, StatusCode::BAD_REQUEST),
            (Issue::PayrollNotAuthorized, StatusCode::FORBIDDEN),
            (Issue::AttendanceNotAuthorized, StatusCode::FORBIDDEN),
            (Issue::PeriodNotFound, StatusCode::NOT_FOUND),
            (Issue::PayslipNotFound, StatusCode::NOT_FOUND),
        ];

        for (issue, status) in cases {
            assert_eq!(AppError::from(issue).status_code(), status);
        }
    }

    #[test]
    fn test_issue_response_body() {
        let response = AppError::from(Issue::AlreadyGenerated).error_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body: ErrorBody = serde_json::from_slice(&response.into_body().try_into_bytes().unwrap()).unwrap();
        assert_eq!(body.issues.len(), 1);
        assert_eq!(body.issues[0].issue_code, "PAYROLL_ALREADY_GENERATED");
        assert_eq!(body.issues[0].message, "Payroll for this period has already been generated");
    }

    #[test]
    fn test_internal_error_hides_details() {
        let err = Err::<(), _>(DbErr::Custom("connection reset by peer".to_owned()))
            .context("PayrollRepository::insert_payroll()")
            .unwrap_err();
        assert!(err.to_string().starts_with("PayrollRepository::insert_payroll(): "));
        assert!(err.to_string().contains("connection reset by peer"));

        let response = err.error_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = response.into_body().try_into_bytes().unwrap();
        let body = String::from_utf8_lossy(&body);
        assert!(body.contains("INTERNAL_SERVER_ERROR"));
        assert!(!body.contains("connection reset"));
    }

    #[test]
    fn test_rollback_error_keeps_both_causes() {
        let err = AppError::Rollback {
            source: Box::new(AppError::Issue(Issue::ExceedsLimit)),
            rollback: DbErr::Custom("broken pipe".to_owned()),
        };

        let message = err.to_string();
        assert!(message.contains("broken pipe"));
        assert!(message.contains("Overtime exceeds the allowed limit"));
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
