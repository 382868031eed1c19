//! User-facing operations that sit between the routes and the directory.

use std::time::SystemTime;

use time::OffsetDateTime;
use tracing::info;

use crate::auth::claims::IdentityClaim;
use crate::auth::role::Role;
use crate::error::AppError;
use crate::logging::pii::Redacted;
use crate::repos::users::{
    LoginOutcome, LoginUpsert, NewUser, ProfileUpdate, UserDirectory, UserRecord,
};

/// Trim and sanity-check an email used as a directory key.
pub fn validate_email(raw: &str) -> Result<String, AppError> {
    let email = raw.trim();
    if email.is_empty() {
        return Err(AppError::bad_request("INVALID_EMAIL", "Email cannot be empty"));
    }
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() => Ok(email.to_string()),
        _ => Err(AppError::bad_request(
            "INVALID_EMAIL",
            "Email must look like name@domain",
        )),
    }
}

/// Explicit registration. The stored role is always `user`.
pub async fn register(
    users: &dyn UserDirectory,
    mut new_user: NewUser,
    now: SystemTime,
) -> Result<UserRecord, AppError> {
    new_user.email = validate_email(&new_user.email)?;
    Ok(users.create_user(new_user, OffsetDateTime::from(now)).await?)
}

/// Fold a sign-in by the authenticated caller into the directory.
pub async fn record_login(
    users: &dyn UserDirectory,
    identity: &IdentityClaim,
    profile: ProfileFields,
    now: SystemTime,
) -> Result<LoginOutcome, AppError> {
    let outcome = users
        .record_login(LoginUpsert {
            email: identity.email.clone(),
            name: profile.name,
            photo_url: profile.photo_url,
            provider: profile.provider,
            at: OffsetDateTime::from(now),
        })
        .await?;

    if outcome.created {
        info!(email = %Redacted(&identity.email), "first login recorded");
    }
    Ok(outcome)
}

/// Profile fields a client may send with a login.
#[derive(Debug, Clone, Default, serde::Deserialize)]
pub struct ProfileFields {
    pub name: Option<String>,
    #[serde(alias = "photoURL")]
    pub photo_url: Option<String>,
    pub provider: Option<String>,
}

/// Apply a profile edit. Callers may edit their own record; admins may edit
/// any record.
pub async fn update_profile(
    users: &dyn UserDirectory,
    caller: &IdentityClaim,
    target_email: &str,
    update: ProfileUpdate,
    now: SystemTime,
) -> Result<UserRecord, AppError> {
    if caller.email != target_email {
        let caller_record = users
            .find_user_by_email(&caller.email)
            .await
            .map_err(|e| AppError::lookup_failure(e.to_string()))?
            .ok_or(AppError::UserNotFound)?;
        if !caller_record.is_admin() {
            crate::logging::security::role_denied(
                &caller.email,
                Role::Admin.as_str(),
                caller_record.role.as_str(),
            );
            return Err(AppError::InsufficientRole);
        }
    }

    users
        .update_profile(target_email, update, OffsetDateTime::from(now))
        .await?
        .ok_or(AppError::UserNotFound)
}
