use std::env;

use crate::config::db::DbKind;
use crate::error::AppError;

/// Deployment environment. Drives the cookie policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RuntimeEnv {
    Production,
    #[default]
    Development,
}

impl RuntimeEnv {
    /// Read `APP_ENV`; anything other than "production"/"prod" is development.
    pub fn from_env() -> Self {
        match env::var("APP_ENV")
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase()
            .as_str()
        {
            "production" | "prod" => RuntimeEnv::Production,
            _ => RuntimeEnv::Development,
        }
    }

    pub fn is_production(self) -> bool {
        matches!(self, RuntimeEnv::Production)
    }
}

/// Process-level configuration read once at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub runtime_env: RuntimeEnv,
    pub db_kind: DbKind,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, AppError> {
        let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = match env::var("PORT") {
            Ok(raw) => raw
                .trim()
                .parse::<u16>()
                .map_err(|_| AppError::config(format!("PORT must be a valid port number, got '{raw}'")))?,
            Err(_) => 5000,
        };
        let db_kind = match env::var("DB_KIND") {
            Ok(raw) => DbKind::parse(&raw)?,
            Err(_) => DbKind::Postgres,
        };

        Ok(Self {
            host,
            port,
            runtime_env: RuntimeEnv::from_env(),
            db_kind,
        })
    }
}
