#![allow(dead_code)]

// tests/common/mod.rs
use std::sync::Arc;
use std::time::{Duration, SystemTime};

use actix_http::Request;
use actix_web::body::MessageBody;
use actix_web::cookie::Cookie;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::{test, web, App};
use backend_test_support::unique_helpers::unique_str;
use sharevites::adapters::users_memory::MemoryUserDirectory;
use sharevites::config::app::RuntimeEnv;
use sharevites::routes;
use sharevites::{
    AppState, Clock, IdentityClaim, ManualClock, RequestTrace, SecurityConfig, StructuredLogger,
    TokenCodec, TraceSpan, UserDirectory,
};

#[ctor::ctor]
fn init_logging() {
    backend_test_support::logging::init();
}

/// 2025-01-01T00:00:00Z
pub fn epoch_2025() -> SystemTime {
    SystemTime::UNIX_EPOCH + Duration::from_secs(1_735_689_600)
}

/// State over an in-memory directory with a manual clock, plus handles to
/// both so tests can seed users and move time.
pub struct TestHarness {
    pub state: AppState,
    pub users: Arc<MemoryUserDirectory>,
    pub clock: Arc<ManualClock>,
}

impl TestHarness {
    pub fn new() -> Self {
        Self::with_env(RuntimeEnv::Development)
    }

    pub fn with_env(env: RuntimeEnv) -> Self {
        let codec = TokenCodec::new(SecurityConfig::new(unique_str("secret")))
            .expect("non-empty secret");
        let users = Arc::new(MemoryUserDirectory::new());
        let clock = Arc::new(ManualClock::new(epoch_2025()));
        let state = AppState::with_directory(users.clone(), codec, env).with_clock(clock.clone());
        Self {
            state,
            users,
            clock,
        }
    }

    /// Harness over a caller-supplied directory (e.g. one that fails).
    pub fn with_directory(users: Arc<dyn UserDirectory>) -> AppState {
        let codec = TokenCodec::new(SecurityConfig::new(unique_str("secret")))
            .expect("non-empty secret");
        AppState::with_directory(users, codec, RuntimeEnv::Development)
            .with_clock(Arc::new(ManualClock::new(epoch_2025())))
    }

    pub fn token_for(&self, email: &str) -> String {
        token_for(&self.state, email)
    }

    pub fn seed(&self, email: &str, role: sharevites::Role) {
        self.users
            .seed(email, role, time::OffsetDateTime::from(epoch_2025()));
    }
}

pub fn token_for(state: &AppState, email: &str) -> String {
    state
        .codec
        .issue(&IdentityClaim::new(email), state.clock.now())
        .expect("issue token")
}

pub fn access_cookie(token: &str) -> Cookie<'static> {
    Cookie::new("access_token", token.to_string())
}

/// The production route table and middleware stack over `state`.
pub async fn init_app(
    state: AppState,
) -> impl Service<Request, Response = ServiceResponse<impl MessageBody>, Error = actix_web::Error>
{
    test::init_service(
        App::new()
            .wrap(StructuredLogger)
            .wrap(TraceSpan)
            .wrap(RequestTrace)
            .app_data(web::Data::new(state))
            .configure(routes::configure),
    )
    .await
}
