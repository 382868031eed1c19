use actix_web::{web, HttpResponse};
use serde_json::json;

use crate::auth::claims::IdentityClaim;
use crate::error::AppError;
use crate::extractors::Identity;
use crate::logging::security;
use crate::middleware::CredentialGate;
use crate::services::users::validate_email;
use crate::state::app_state::AppState;

/// Issue a token for the posted identity and hand it back as a cookie.
async fn issue_token(
    body: web::Json<IdentityClaim>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let mut claim = body.into_inner();
    claim.email = validate_email(&claim.email)?;

    let token = app_state.codec.issue(&claim, app_state.clock.now())?;
    security::token_issued(&claim.email);

    Ok(HttpResponse::Ok()
        .cookie(app_state.cookies.access_cookie(token))
        .json(json!({ "success": true })))
}

/// Drop the access cookie. Tokens are stateless, so nothing server-side
/// needs revoking.
async fn logout(app_state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok()
        .cookie(app_state.cookies.removal_cookie())
        .json(json!({ "success": true }))
}

async fn me(identity: Identity) -> HttpResponse {
    HttpResponse::Ok().json(identity.0)
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/jwt", web::post().to(issue_token))
        .route("/logout", web::post().to(logout))
        .service(
            web::resource("/auth/me")
                .wrap(CredentialGate)
                .route(web::get().to(me)),
        );
}
