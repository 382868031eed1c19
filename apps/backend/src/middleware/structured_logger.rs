use std::future::{ready, Ready};
use std::time::{Duration, Instant};

use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::StatusCode;
use actix_web::{Error as ActixError, HttpMessage};
use futures_util::future::LocalBoxFuture;
use tracing::{error, info, warn};

use crate::auth::claims::IdentityClaim;
use crate::logging::pii::redact;
use crate::trace_ctx;

/// Emits one `request_completed` event per request, levelled by status class.
/// Requests that passed the credential gate also carry the redacted caller.
pub struct StructuredLogger;

impl<S, B> Transform<S, ServiceRequest> for StructuredLogger
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = ActixError>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = ActixError;
    type InitError = ();
    type Transform = StructuredLoggerMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(StructuredLoggerMiddleware { service }))
    }
}

pub struct StructuredLoggerMiddleware<S> {
    service: S,
}

/// What is known about a request once its response is ready.
#[derive(Debug)]
struct Completion {
    method: String,
    path: String,
    status: StatusCode,
    caller: Option<String>,
    elapsed: Duration,
}

impl Completion {
    fn emit(&self) {
        let status = self.status.as_u16();
        let duration_us = self.elapsed.as_micros() as u64;
        let trace_id = trace_ctx::trace_id();
        let caller = self.caller.as_deref().unwrap_or("-");

        if self.status.is_server_error() {
            error!(http.method = %self.method, url.path = %self.path, http.status_code = status, duration_us, caller, trace_id = %trace_id, "request_completed");
        } else if self.status.is_client_error() {
            warn!(http.method = %self.method, url.path = %self.path, http.status_code = status, duration_us, caller, trace_id = %trace_id, "request_completed");
        } else {
            info!(http.method = %self.method, url.path = %self.path, http.status_code = status, duration_us, caller, trace_id = %trace_id, "request_completed");
        }
    }
}

fn caller_of<B>(res: &ServiceResponse<B>) -> Option<String> {
    res.request()
        .extensions()
        .get::<IdentityClaim>()
        .map(|identity| redact(&identity.email))
}

impl<S, B> Service<ServiceRequest> for StructuredLoggerMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = ActixError>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = ActixError;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let start = Instant::now();
        let method = req.method().to_string();
        let path = req.path().to_string();

        let fut = self.service.call(req);

        Box::pin(async move {
            let result = fut.await;

            let (status, caller) = match &result {
                Ok(res) => (res.status(), caller_of(res)),
                Err(err) => (err.as_response_error().status_code(), None),
            };
            Completion {
                method,
                path,
                status,
                caller,
                elapsed: start.elapsed(),
            }
            .emit();

            result
        })
    }
}
