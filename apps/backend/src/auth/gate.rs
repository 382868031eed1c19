//! Accept/reject decisions behind the credential gate and role authority
//! middleware. Kept free of actix types so they can be exercised directly.

use std::time::SystemTime;

use tracing::debug;

use crate::auth::claims::IdentityClaim;
use crate::auth::jwt::TokenCodec;
use crate::auth::role::Role;
use crate::error::AppError;
use crate::logging::pii::Redacted;
use crate::repos::users::{UserDirectory, UserRecord};

/// Turn the raw cookie value into a trusted identity.
///
/// A missing or empty value is `MissingToken` (401); anything the codec
/// rejects is `InvalidToken`/`ExpiredToken` (403).
pub fn authenticate(
    token: Option<&str>,
    codec: &TokenCodec,
    now: SystemTime,
) -> Result<IdentityClaim, AppError> {
    let token = match token {
        Some(t) if !t.is_empty() => t,
        _ => return Err(AppError::MissingToken),
    };
    codec.verify(token, now)
}

/// Check that the authenticated identity holds `required`.
///
/// Returns the looked-up record so handlers need not fetch it again.
pub async fn authorize(
    identity: Option<&IdentityClaim>,
    required: Role,
    users: &dyn UserDirectory,
) -> Result<UserRecord, AppError> {
    let email = match identity {
        Some(claim) if !claim.email.is_empty() => claim.email.as_str(),
        Some(_) => return Err(AppError::internal("authenticated identity has no email")),
        None => {
            return Err(AppError::internal(
                "role check ran without an authenticated identity",
            ))
        }
    };

    let record = users
        .find_user_by_email(email)
        .await
        .map_err(|e| AppError::lookup_failure(e.to_string()))?
        .ok_or(AppError::UserNotFound)?;

    if record.role != required {
        crate::logging::security::role_denied(email, required.as_str(), record.role.as_str());
        return Err(AppError::InsufficientRole);
    }

    debug!(email = %Redacted(email), role = %record.role, "role check passed");
    Ok(record)
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use async_trait::async_trait;
    use time::macros::datetime;

    use super::*;
    use crate::adapters::users_memory::MemoryUserDirectory;
    use crate::auth::jwt::TOKEN_TTL;
    use crate::repos::users::{
        DirectoryError, LoginOutcome, LoginUpsert, NewUser, ProfileUpdate,
    };
    use crate::state::security_config::SecurityConfig;

    fn codec() -> TokenCodec {
        TokenCodec::new(SecurityConfig::new("gate-secret")).unwrap()
    }

    fn at(secs: u64) -> SystemTime {
        SystemTime::UNIX_EPOCH + Duration::from_secs(secs)
    }

    #[derive(Debug)]
    struct Unreachable;

    #[async_trait]
    impl UserDirectory for Unreachable {
        async fn find_user_by_email(
            &self,
            _email: &str,
        ) -> Result<Option<UserRecord>, DirectoryError> {
            Err(DirectoryError::Unavailable {
                detail: "connection refused".into(),
            })
        }
        async fn list_users(&self) -> Result<Vec<UserRecord>, DirectoryError> {
            unreachable!()
        }
        async fn create_user(
            &self,
            _new_user: NewUser,
            _now: time::OffsetDateTime,
        ) -> Result<UserRecord, DirectoryError> {
            unreachable!()
        }
        async fn record_login(&self, _login: LoginUpsert) -> Result<LoginOutcome, DirectoryError> {
            unreachable!()
        }
        async fn update_profile(
            &self,
            _email: &str,
            _update: ProfileUpdate,
            _now: time::OffsetDateTime,
        ) -> Result<Option<UserRecord>, DirectoryError> {
            unreachable!()
        }
        async fn delete_user_by_email(&self, _email: &str) -> Result<u64, DirectoryError> {
            unreachable!()
        }
    }

    #[test]
    fn missing_or_empty_cookie_is_unauthenticated() {
        let codec = codec();
        assert!(matches!(
            authenticate(None, &codec, at(1_000)),
            Err(AppError::MissingToken)
        ));
        assert!(matches!(
            authenticate(Some(""), &codec, at(1_000)),
            Err(AppError::MissingToken)
        ));
    }

    #[test]
    fn garbage_cookie_is_forbidden() {
        let err = authenticate(Some("abc.def"), &codec(), at(1_000)).unwrap_err();
        assert_eq!(err.status(), actix_web::http::StatusCode::FORBIDDEN);
    }

    #[test]
    fn valid_token_yields_signed_email() {
        let codec = codec();
        let token = codec.issue(&IdentityClaim::new("a@x.com"), at(5_000)).unwrap();

        let identity = authenticate(Some(&token), &codec, at(5_001)).unwrap();
        assert_eq!(identity.email, "a@x.com");

        // Same token, same answer.
        assert_eq!(
            authenticate(Some(&token), &codec, at(5_001)).unwrap(),
            identity
        );
    }

    #[test]
    fn token_past_one_hour_is_forbidden() {
        let codec = codec();
        let token = codec.issue(&IdentityClaim::new("a@x.com"), at(5_000)).unwrap();

        let err = authenticate(Some(&token), &codec, at(5_000) + TOKEN_TTL).unwrap_err();
        assert!(matches!(err, AppError::ExpiredToken));
        assert_eq!(err.message(), "Access Forbidden");
    }

    #[tokio::test]
    async fn admin_is_authorized() {
        let dir = MemoryUserDirectory::new();
        dir.seed("admin@x.com", Role::Admin, datetime!(2025-01-01 0:00 UTC));

        let record = authorize(Some(&IdentityClaim::new("admin@x.com")), Role::Admin, &dir)
            .await
            .unwrap();
        assert_eq!(record.email, "admin@x.com");
    }

    #[tokio::test]
    async fn plain_user_is_forbidden() {
        let dir = MemoryUserDirectory::new();
        dir.seed("u@x.com", Role::User, datetime!(2025-01-01 0:00 UTC));

        let err = authorize(Some(&IdentityClaim::new("u@x.com")), Role::Admin, &dir)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InsufficientRole));
    }

    #[tokio::test]
    async fn unknown_user_is_not_found() {
        let dir = MemoryUserDirectory::new();

        let err = authorize(Some(&IdentityClaim::new("ghost@x.com")), Role::Admin, &dir)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::UserNotFound));
    }

    #[tokio::test]
    async fn lookup_failure_is_internal() {
        let err = authorize(Some(&IdentityClaim::new("a@x.com")), Role::Admin, &Unreachable)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::LookupFailure { .. }));
        assert_eq!(err.message(), "Internal Server Error");
    }

    #[tokio::test]
    async fn missing_identity_is_contract_violation() {
        let dir = MemoryUserDirectory::new();

        let err = authorize(None, Role::Admin, &dir).await.unwrap_err();
        assert!(matches!(err, AppError::Internal { .. }));

        let err = authorize(Some(&IdentityClaim::new("")), Role::Admin, &dir)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Internal { .. }));
    }
}
