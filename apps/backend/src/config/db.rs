use std::env;

use crate::error::AppError;

/// Database profile for different environments
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DbProfile {
    /// Production database profile
    Prod,
    /// Test database profile - enforces safety rules
    Test,
}

/// Which backing store holds user records
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DbKind {
    Postgres,
    SqliteFile,
    /// In-process directory, nothing persisted
    Memory,
}

impl DbKind {
    pub fn parse(raw: &str) -> Result<Self, AppError> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(DbKind::Postgres),
            "sqlite-file" | "sqlite" => Ok(DbKind::SqliteFile),
            "memory" => Ok(DbKind::Memory),
            other => Err(AppError::config(format!(
                "DB_KIND must be one of postgres | sqlite-file | memory, got '{other}'"
            ))),
        }
    }
}

/// Connection URL for the given kind, or `None` for the in-process directory
pub fn db_url(kind: DbKind, profile: DbProfile) -> Result<Option<String>, AppError> {
    match kind {
        DbKind::Postgres => postgres_url(profile).map(Some),
        DbKind::SqliteFile => sqlite_url().map(Some),
        DbKind::Memory => Ok(None),
    }
}

/// Builds a Postgres URL from environment variables based on profile
pub fn postgres_url(profile: DbProfile) -> Result<String, AppError> {
    let host = env::var("POSTGRES_HOST").unwrap_or_else(|_| "localhost".to_string());
    let port = env::var("POSTGRES_PORT").unwrap_or_else(|_| "5432".to_string());
    let db_name = db_name(profile)?;
    let username = must_var("APP_DB_USER")?;
    let password = must_var("APP_DB_PASSWORD")?;

    Ok(format!(
        "postgresql://{username}:{password}@{host}:{port}/{db_name}"
    ))
}

fn sqlite_url() -> Result<String, AppError> {
    let path = must_var("SQLITE_PATH")?;
    Ok(format!("sqlite://{path}?mode=rwc"))
}

fn db_name(profile: DbProfile) -> Result<String, AppError> {
    match profile {
        DbProfile::Prod => must_var("PROD_DB"),
        DbProfile::Test => {
            let db_name = must_var("TEST_DB")?;
            if !db_name.ends_with("_test") {
                return Err(AppError::config(format!(
                    "Test profile requires database name to end with '_test', but got: '{db_name}'"
                )));
            }
            Ok(db_name)
        }
    }
}

/// Get required environment variable or return error
fn must_var(name: &str) -> Result<String, AppError> {
    env::var(name)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| AppError::config(format!("Required environment variable '{name}' is not set")))
}
