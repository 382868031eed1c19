use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::adapters::users_memory::MemoryUserDirectory;
use crate::adapters::users_sea::SeaUserDirectory;
use crate::auth::cookie::CookiePolicy;
use crate::auth::jwt::TokenCodec;
use crate::clock::{Clock, SystemClock};
use crate::config::app::RuntimeEnv;
use crate::repos::users::UserDirectory;

/// Shared resources, immutable after startup and cloned into each worker
#[derive(Debug, Clone)]
pub struct AppState {
    /// Connection pool; `None` when running on the in-memory directory
    pub db: Option<DatabaseConnection>,
    /// User lookups for the role authority and the user routes
    pub users: Arc<dyn UserDirectory>,
    pub codec: TokenCodec,
    pub clock: Arc<dyn Clock>,
    pub cookies: CookiePolicy,
}

impl AppState {
    /// State backed by a database connection
    pub fn new(db: DatabaseConnection, codec: TokenCodec, env: RuntimeEnv) -> Self {
        Self {
            users: Arc::new(SeaUserDirectory::new(db.clone())),
            db: Some(db),
            codec,
            clock: Arc::new(SystemClock),
            cookies: CookiePolicy::for_env(env),
        }
    }

    /// State backed by an empty in-memory directory
    pub fn in_memory(codec: TokenCodec, env: RuntimeEnv) -> Self {
        Self::with_directory(Arc::new(MemoryUserDirectory::new()), codec, env)
    }

    /// State over any directory implementation
    pub fn with_directory(
        users: Arc<dyn UserDirectory>,
        codec: TokenCodec,
        env: RuntimeEnv,
    ) -> Self {
        Self {
            db: None,
            users,
            codec,
            clock: Arc::new(SystemClock),
            cookies: CookiePolicy::for_env(env),
        }
    }

    /// Replace the time source
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn db(&self) -> Option<&DatabaseConnection> {
        self.db.as_ref()
    }
}
