#![deny(clippy::wildcard_imports)]
#![cfg_attr(test, allow(clippy::wildcard_imports))]

pub mod adapters;
pub mod auth;
pub mod clock;
pub mod config;
pub mod entities;
pub mod error;
pub mod extractors;
pub mod infra;
pub mod logging;
pub mod middleware;
pub mod repos;
pub mod routes;
pub mod services;
pub mod state;
pub mod trace_ctx;

// Re-exports for public API
pub use auth::claims::IdentityClaim;
pub use auth::jwt::{TokenCodec, TOKEN_TTL};
pub use auth::role::Role;
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::db::{db_url, DbKind, DbProfile};
pub use error::AppError;
pub use extractors::{AuthorizedUser, Identity};
pub use middleware::{CredentialGate, RequestTrace, RequireRole, StructuredLogger, TraceSpan};
pub use repos::users::{UserDirectory, UserRecord};
pub use state::app_state::AppState;
pub use state::security_config::SecurityConfig;

// Auto-initialize logging for unit tests
#[cfg(test)]
#[ctor::ctor]
fn init_test_logging() {
    backend_test_support::logging::init();
}
