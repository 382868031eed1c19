//! User directory: the persistence capability the gate and the user routes
//! are written against.

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use time::OffsetDateTime;

use crate::auth::role::Role;
use crate::error::AppError;

/// Stored user record, keyed by email.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserRecord {
    pub id: i64,
    pub email: String,
    pub name: Option<String>,
    pub photo_url: Option<String>,
    pub provider: Option<String>,
    pub role: Role,
    #[serde(with = "time::serde::rfc3339::option")]
    pub last_login_at: Option<OffsetDateTime>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl UserRecord {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// Fields accepted when a user record is created explicitly.
#[derive(Debug, Clone, Deserialize)]
pub struct NewUser {
    pub email: String,
    pub name: Option<String>,
    #[serde(alias = "photoURL")]
    pub photo_url: Option<String>,
    pub provider: Option<String>,
}

/// A sign-in event to fold into the directory.
#[derive(Debug, Clone)]
pub struct LoginUpsert {
    pub email: String,
    pub name: Option<String>,
    pub photo_url: Option<String>,
    pub provider: Option<String>,
    pub at: OffsetDateTime,
}

/// Result of folding a login into the directory.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoginOutcome {
    pub user: UserRecord,
    /// True when this login created the record with default fields
    pub created: bool,
}

/// Self-service profile edits.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfileUpdate {
    pub name: Option<String>,
    #[serde(alias = "photoURL")]
    pub photo_url: Option<String>,
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum DirectoryError {
    #[error("user '{email}' already exists")]
    Duplicate { email: String },
    #[error("directory unavailable: {detail}")]
    Unavailable { detail: String },
}

impl From<DirectoryError> for AppError {
    fn from(e: DirectoryError) -> Self {
        match e {
            DirectoryError::Duplicate { .. } => {
                AppError::conflict("USER_EXISTS", "A user with this email already exists")
            }
            DirectoryError::Unavailable { detail } => AppError::db(detail),
        }
    }
}

/// Read/write access to user records.
///
/// Implementations must be safe for unsynchronized concurrent use; the
/// credential gate and handlers share one instance across workers.
#[async_trait]
pub trait UserDirectory: Send + Sync + fmt::Debug {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<UserRecord>, DirectoryError>;

    async fn list_users(&self) -> Result<Vec<UserRecord>, DirectoryError>;

    /// Insert a new record with role `user`. Fails with `Duplicate` when the
    /// email is taken.
    async fn create_user(
        &self,
        new_user: NewUser,
        now: OffsetDateTime,
    ) -> Result<UserRecord, DirectoryError>;

    /// Upsert keyed by email. An absent record is created with defaults
    /// (role `user`, `created_at`); an existing one only has its login time,
    /// photo and provider refreshed.
    async fn record_login(&self, login: LoginUpsert) -> Result<LoginOutcome, DirectoryError>;

    /// Apply a profile edit. `Ok(None)` when no record has this email.
    async fn update_profile(
        &self,
        email: &str,
        update: ProfileUpdate,
        now: OffsetDateTime,
    ) -> Result<Option<UserRecord>, DirectoryError>;

    /// Delete by email, returning the number of removed records.
    async fn delete_user_by_email(&self, email: &str) -> Result<u64, DirectoryError>;
}

#[cfg(test)]
mod tests {
    use actix_web::http::StatusCode;

    use super::*;

    #[test]
    fn directory_errors_map_to_http() {
        let dup: AppError = DirectoryError::Duplicate {
            email: "a@x.com".into(),
        }
        .into();
        assert_eq!(dup.status(), StatusCode::CONFLICT);
        assert_eq!(dup.code(), "USER_EXISTS");

        let down: AppError = DirectoryError::Unavailable {
            detail: "pool timed out".into(),
        }
        .into();
        assert_eq!(down.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(down.message(), "Internal Server Error");
    }

    #[test]
    fn new_user_accepts_camel_case_photo() {
        let new_user: NewUser =
            serde_json::from_str(r#"{"email":"a@x.com","photoURL":"https://p/1.png"}"#).unwrap();
        assert_eq!(new_user.photo_url.as_deref(), Some("https://p/1.png"));
    }

    #[test]
    fn only_admin_records_are_admin() {
        let at = time::macros::datetime!(2025-01-01 0:00 UTC);
        let mut record = UserRecord {
            id: 1,
            email: "a@x.com".into(),
            name: None,
            photo_url: None,
            provider: None,
            role: Role::User,
            last_login_at: None,
            created_at: at,
            updated_at: at,
        };
        assert!(!record.is_admin());

        record.role = Role::Admin;
        assert!(record.is_admin());
    }
}
