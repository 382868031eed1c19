use actix_web::{web, HttpResponse};
use serde_json::json;
use tracing::info;

use crate::error::AppError;
use crate::extractors::{AuthorizedUser, Identity};
use crate::logging::pii::Redacted;
use crate::middleware::{CredentialGate, RequireRole};
use crate::repos::users::{NewUser, ProfileUpdate};
use crate::services::users::{self as user_service, ProfileFields};
use crate::state::app_state::AppState;

async fn create_user(
    body: web::Json<NewUser>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let record = user_service::register(
        app_state.users.as_ref(),
        body.into_inner(),
        app_state.clock.now(),
    )
    .await?;
    Ok(HttpResponse::Created().json(record))
}

/// Login upsert keyed by the email in the caller's token.
async fn upsert_login(
    identity: Identity,
    body: web::Json<ProfileFields>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let outcome = user_service::record_login(
        app_state.users.as_ref(),
        &identity,
        body.into_inner(),
        app_state.clock.now(),
    )
    .await?;
    Ok(HttpResponse::Ok().json(outcome))
}

async fn list_users(
    admin: AuthorizedUser,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let users = app_state.users.list_users().await?;
    info!(admin_id = admin.id, count = users.len(), "users listed");
    Ok(HttpResponse::Ok().json(users))
}

async fn get_user(
    path: web::Path<String>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let record = app_state
        .users
        .find_user_by_email(&path)
        .await?
        .ok_or(AppError::UserNotFound)?;
    Ok(HttpResponse::Ok().json(record))
}

async fn update_user(
    identity: Identity,
    path: web::Path<String>,
    body: web::Json<ProfileUpdate>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let record = user_service::update_profile(
        app_state.users.as_ref(),
        &identity,
        &path,
        body.into_inner(),
        app_state.clock.now(),
    )
    .await?;
    Ok(HttpResponse::Ok().json(record))
}

async fn delete_user(
    admin: AuthorizedUser,
    path: web::Path<String>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let deleted = app_state.users.delete_user_by_email(&path).await?;
    info!(
        admin_id = admin.id,
        target = %Redacted(path.as_str()),
        deleted,
        "user delete requested"
    );
    Ok(HttpResponse::Ok().json(json!({ "deleted": deleted })))
}

/// Per-route gates: the last `wrap` runs first, so `CredentialGate` always
/// precedes `RequireRole`.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/users")
            .route(web::post().to(create_user))
            .route(web::put().to(upsert_login).wrap(CredentialGate))
            .route(
                web::get()
                    .to(list_users)
                    .wrap(RequireRole::admin())
                    .wrap(CredentialGate),
            ),
    )
    .service(
        web::resource("/users/{email}")
            .route(web::get().to(get_user).wrap(CredentialGate))
            .route(web::patch().to(update_user).wrap(CredentialGate))
            .route(
                web::delete()
                    .to(delete_user)
                    .wrap(RequireRole::admin())
                    .wrap(CredentialGate),
            ),
    );
}
