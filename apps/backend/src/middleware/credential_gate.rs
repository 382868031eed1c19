//! Credential gate middleware.
//!
//! Reads the `access_token` cookie, verifies it against the codec and the
//! injected clock, and stores the resulting `IdentityClaim` in request
//! extensions. Rejections are written as responses here and the wrapped
//! service is never called.

use actix_web::body::EitherBody;
use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::{web, Error, HttpMessage};
use futures_util::future::{ready, LocalBoxFuture, Ready};

use crate::auth::cookie::ACCESS_TOKEN_COOKIE;
use crate::auth::gate::authenticate;
use crate::error::AppError;
use crate::logging::security;
use crate::state::app_state::AppState;

pub struct CredentialGate;

impl<S, B> Transform<S, ServiceRequest> for CredentialGate
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = CredentialGateMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(CredentialGateMiddleware { service }))
    }
}

pub struct CredentialGateMiddleware<S> {
    service: S,
}

fn reject<B>(req: ServiceRequest, err: AppError) -> ServiceResponse<EitherBody<B>> {
    req.error_response(err).map_into_right_body()
}

impl<S, B> Service<ServiceRequest> for CredentialGateMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let Some(state) = req.app_data::<web::Data<AppState>>().cloned() else {
            let res = reject(req, AppError::internal("AppState not available"));
            return Box::pin(async move { Ok(res) });
        };

        let token = req.cookie(ACCESS_TOKEN_COOKIE);
        let decision = authenticate(
            token.as_ref().map(|c| c.value()),
            &state.codec,
            state.clock.now(),
        );

        match decision {
            Ok(identity) => {
                req.extensions_mut().insert(identity);
                let fut = self.service.call(req);
                Box::pin(async move { fut.await.map(ServiceResponse::map_into_left_body) })
            }
            Err(err) => {
                security::token_rejected(err.code(), req.path());
                let res = reject(req, err);
                Box::pin(async move { Ok(res) })
            }
        }
    }
}
