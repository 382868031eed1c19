use std::future::{ready, Ready};
use std::ops::Deref;

use actix_web::dev::Payload;
use actix_web::{FromRequest, HttpMessage, HttpRequest};

use crate::auth::claims::IdentityClaim;
use crate::error::AppError;
use crate::repos::users::UserRecord;

/// Identity attached by `CredentialGate`.
///
/// Only valid on routes wrapped by the gate; elsewhere extraction fails with
/// an internal error, since that is a route-table mistake rather than a
/// client one.
#[derive(Debug, Clone)]
pub struct Identity(pub IdentityClaim);

impl Deref for Identity {
    type Target = IdentityClaim;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl FromRequest for Identity {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(
            req.extensions()
                .get::<IdentityClaim>()
                .cloned()
                .map(Identity)
                .ok_or_else(|| AppError::internal("identity requested on an ungated route")),
        )
    }
}

/// User record that `RequireRole` looked up and approved.
#[derive(Debug, Clone)]
pub struct AuthorizedUser(pub UserRecord);

impl Deref for AuthorizedUser {
    type Target = UserRecord;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl FromRequest for AuthorizedUser {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(
            req.extensions()
                .get::<UserRecord>()
                .cloned()
                .map(AuthorizedUser)
                .ok_or_else(|| AppError::internal("authorized user requested without a role check")),
        )
    }
}
