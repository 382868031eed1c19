use actix_web::error::ResponseError;
use actix_web::http::StatusCode;
use actix_web::HttpResponse;
use serde::Serialize;
use thiserror::Error;
use tracing::error;

use crate::trace_ctx;

/// Structured rejection body returned on every error path.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub message: String,
    pub code: String,
    pub status: u16,
    pub trace_id: String,
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Missing access token")]
    MissingToken,
    #[error("Invalid access token")]
    InvalidToken,
    #[error("Expired access token")]
    ExpiredToken,
    #[error("User not found")]
    UserNotFound,
    #[error("Insufficient role")]
    InsufficientRole,
    #[error("User lookup failed: {detail}")]
    LookupFailure { detail: String },
    #[error("Internal error: {detail}")]
    Internal { detail: String },
    #[error("Configuration error: {detail}")]
    Config { detail: String },
    #[error("Bad request: {detail}")]
    BadRequest { code: &'static str, detail: String },
    #[error("Conflict: {detail}")]
    Conflict { code: &'static str, detail: String },
    #[error("Database error: {detail}")]
    Db { detail: String },
}

impl AppError {
    /// Stable machine-readable code for this error
    pub fn code(&self) -> &'static str {
        match self {
            AppError::MissingToken => "MISSING_TOKEN",
            AppError::InvalidToken => "INVALID_TOKEN",
            AppError::ExpiredToken => "EXPIRED_TOKEN",
            AppError::UserNotFound => "USER_NOT_FOUND",
            AppError::InsufficientRole => "INSUFFICIENT_ROLE",
            AppError::LookupFailure { .. } => "LOOKUP_FAILURE",
            AppError::Internal { .. } => "INTERNAL",
            AppError::Config { .. } => "CONFIG_ERROR",
            AppError::BadRequest { code, .. } => *code,
            AppError::Conflict { code, .. } => *code,
            AppError::Db { .. } => "DB_ERROR",
        }
    }

    /// Client-facing message. Server-side details never leak through here.
    pub fn message(&self) -> String {
        match self {
            AppError::MissingToken => "Unauthorized user".to_string(),
            AppError::InvalidToken | AppError::ExpiredToken => "Access Forbidden".to_string(),
            AppError::UserNotFound => "user not found!".to_string(),
            AppError::InsufficientRole => "Forbidden Access".to_string(),
            AppError::LookupFailure { .. }
            | AppError::Internal { .. }
            | AppError::Config { .. }
            | AppError::Db { .. } => "Internal Server Error".to_string(),
            AppError::BadRequest { detail, .. } => detail.clone(),
            AppError::Conflict { detail, .. } => detail.clone(),
        }
    }

    /// Get the HTTP status code for this error
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::MissingToken => StatusCode::UNAUTHORIZED,
            AppError::InvalidToken => StatusCode::FORBIDDEN,
            AppError::ExpiredToken => StatusCode::FORBIDDEN,
            AppError::UserNotFound => StatusCode::NOT_FOUND,
            AppError::InsufficientRole => StatusCode::FORBIDDEN,
            AppError::LookupFailure { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Config { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            AppError::Conflict { .. } => StatusCode::CONFLICT,
            AppError::Db { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn lookup_failure(detail: impl Into<String>) -> Self {
        Self::LookupFailure {
            detail: detail.into(),
        }
    }

    pub fn internal(detail: impl Into<String>) -> Self {
        Self::Internal {
            detail: detail.into(),
        }
    }

    pub fn config(detail: impl Into<String>) -> Self {
        Self::Config {
            detail: detail.into(),
        }
    }

    pub fn bad_request(code: &'static str, detail: impl Into<String>) -> Self {
        Self::BadRequest {
            code,
            detail: detail.into(),
        }
    }

    pub fn conflict(code: &'static str, detail: impl Into<String>) -> Self {
        Self::Conflict {
            code,
            detail: detail.into(),
        }
    }

    pub fn db(detail: impl Into<String>) -> Self {
        Self::Db {
            detail: detail.into(),
        }
    }
}

impl From<std::env::VarError> for AppError {
    fn from(e: std::env::VarError) -> Self {
        AppError::config(format!("env var error: {e}"))
    }
}

impl From<sea_orm::DbErr> for AppError {
    fn from(e: sea_orm::DbErr) -> Self {
        AppError::db(format!("db error: {e}"))
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        self.status()
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status();
        let trace_id = trace_ctx::trace_id();

        if status.is_server_error() {
            error!(code = self.code(), trace_id = %trace_id, error = %self, "request failed");
        }

        let body = ErrorBody {
            message: self.message(),
            code: self.code().to_string(),
            status: status.as_u16(),
            trace_id: trace_id.clone(),
        };

        HttpResponse::build(status)
            .insert_header(("x-trace-id", trace_id))
            .json(body)
    }
}

#[cfg(test)]
mod tests {
    use actix_web::body::to_bytes;
    use serde_json::Value;

    use super::*;

    #[test]
    fn gate_rejections_map_to_contract_statuses() {
        assert_eq!(AppError::MissingToken.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(AppError::InvalidToken.status(), StatusCode::FORBIDDEN);
        assert_eq!(AppError::ExpiredToken.status(), StatusCode::FORBIDDEN);
        assert_eq!(AppError::UserNotFound.status(), StatusCode::NOT_FOUND);
        assert_eq!(AppError::InsufficientRole.status(), StatusCode::FORBIDDEN);
        assert_eq!(
            AppError::lookup_failure("down").status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn gate_rejections_carry_contract_messages() {
        assert_eq!(AppError::MissingToken.message(), "Unauthorized user");
        assert_eq!(AppError::InvalidToken.message(), "Access Forbidden");
        assert_eq!(AppError::ExpiredToken.message(), "Access Forbidden");
        assert_eq!(AppError::UserNotFound.message(), "user not found!");
        assert_eq!(AppError::InsufficientRole.message(), "Forbidden Access");
        assert_eq!(
            AppError::lookup_failure("connection refused").message(),
            "Internal Server Error"
        );
    }

    #[actix_web::test]
    async fn server_errors_do_not_leak_detail() {
        let resp = AppError::db("relation \"users\" does not exist").error_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(resp.headers().contains_key("x-trace-id"));

        let body = to_bytes(resp.into_body()).await.unwrap();
        let json: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["message"], "Internal Server Error");
        assert_eq!(json["code"], "DB_ERROR");
        assert_eq!(json["status"], 500);
        assert!(!body.windows(8).any(|w| w == b"relation"));
    }

    #[actix_web::test]
    async fn trace_id_in_body_matches_header() {
        let resp = trace_ctx::with_trace_id("trace-abc".to_string(), async {
            AppError::MissingToken.error_response()
        })
        .await;

        assert_eq!(resp.headers().get("x-trace-id").unwrap(), "trace-abc");
        let body = to_bytes(resp.into_body()).await.unwrap();
        let json: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["trace_id"], "trace-abc");
        assert_eq!(json["message"], "Unauthorized user");
    }
}
