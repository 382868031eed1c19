use migration::{migrate, MigrationCommand};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use tracing::info;

use crate::auth::jwt::TokenCodec;
use crate::config::app::RuntimeEnv;
use crate::config::db::{db_url, DbKind, DbProfile};
use crate::error::AppError;
use crate::state::app_state::AppState;
use crate::state::security_config::SecurityConfig;

/// Open the single process-wide connection for `kind`. SQLite schemas are
/// brought up to date here; Postgres is migrated out of band by the
/// `migration` binary.
pub async fn connect_db(
    kind: DbKind,
    profile: DbProfile,
) -> Result<Option<DatabaseConnection>, AppError> {
    let Some(url) = db_url(kind, profile)? else {
        return Ok(None);
    };

    let mut opts = ConnectOptions::new(url);
    opts.sqlx_logging(false);
    let conn = Database::connect(opts).await?;

    if kind == DbKind::SqliteFile {
        migrate(&conn, MigrationCommand::Up).await?;
    }

    info!(?kind, ?profile, "database connected");
    Ok(Some(conn))
}

/// Builder for `AppState` (used by main and by tests)
pub struct StateBuilder {
    security_config: SecurityConfig,
    runtime_env: RuntimeEnv,
    db: Option<(DbKind, DbProfile)>,
}

impl StateBuilder {
    pub fn new(security_config: SecurityConfig) -> Self {
        Self {
            security_config,
            runtime_env: RuntimeEnv::default(),
            db: None,
        }
    }

    pub fn with_db(mut self, kind: DbKind, profile: DbProfile) -> Self {
        self.db = Some((kind, profile));
        self
    }

    pub fn with_env(mut self, runtime_env: RuntimeEnv) -> Self {
        self.runtime_env = runtime_env;
        self
    }

    pub async fn build(self) -> Result<AppState, AppError> {
        let codec = TokenCodec::new(self.security_config)?;

        let conn = match self.db {
            Some((kind, profile)) => connect_db(kind, profile).await?,
            None => None,
        };

        Ok(match conn {
            Some(conn) => AppState::new(conn, codec, self.runtime_env),
            None => AppState::in_memory(codec, self.runtime_env),
        })
    }
}

pub fn build_state(security_config: SecurityConfig) -> StateBuilder {
    StateBuilder::new(security_config)
}
