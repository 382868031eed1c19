//! SeaORM -> DirectoryError translation.
//!
//! Adapters convert `sea_orm::DbErr` here so that higher layers only see
//! `DirectoryError`, with unique-email violations singled out for a 409.

use tracing::warn;

use crate::logging::pii::redact;
use crate::repos::users::DirectoryError;
use crate::trace_ctx;

/// SQLite reports "UNIQUE constraint failed: users.email"; Postgres names the
/// constraint (`users_email_key`) and carries SQLSTATE 23505.
fn is_unique_email_violation(msg: &str) -> bool {
    msg.contains("UNIQUE constraint failed: users.email")
        || msg.contains("users_email_key")
        || (msg.contains("23505") && msg.contains("email"))
}

/// Translate a `DbErr` into a `DirectoryError` with PII-safe detail.
pub fn map_db_err(e: sea_orm::DbErr, email: &str) -> DirectoryError {
    let error_msg = e.to_string();

    if is_unique_email_violation(&error_msg) {
        return DirectoryError::Duplicate {
            email: email.to_string(),
        };
    }

    let detail = redact(&error_msg);
    warn!(
        trace_id = %trace_ctx::trace_id(),
        error = %detail,
        "user directory query failed"
    );
    DirectoryError::Unavailable { detail }
}

#[cfg(test)]
mod tests {
    use sea_orm::{DbErr, RuntimeErr};

    use super::*;

    #[test]
    fn sqlite_unique_violation_is_duplicate() {
        let err = DbErr::Exec(RuntimeErr::Internal(
            "error returned from database: (code: 2067) UNIQUE constraint failed: users.email"
                .to_string(),
        ));
        assert_eq!(
            map_db_err(err, "a@x.com"),
            DirectoryError::Duplicate {
                email: "a@x.com".to_string()
            }
        );
    }

    #[test]
    fn postgres_unique_violation_is_duplicate() {
        let err = DbErr::Query(RuntimeErr::Internal(
            "duplicate key value violates unique constraint \"users_email_key\"".to_string(),
        ));
        assert!(matches!(
            map_db_err(err, "a@x.com"),
            DirectoryError::Duplicate { .. }
        ));
    }

    #[test]
    fn other_errors_are_unavailable_and_redacted() {
        let err = DbErr::Conn(RuntimeErr::Internal(
            "connection refused for bob@example.com".to_string(),
        ));
        match map_db_err(err, "bob@example.com") {
            DirectoryError::Unavailable { detail } => {
                assert!(detail.contains("connection refused"));
                assert!(!detail.contains("bob@example.com"));
            }
            other => panic!("expected Unavailable, got {other:?}"),
        }
    }
}
