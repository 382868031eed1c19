pub mod app;
pub mod db;

pub use app::{AppConfig, RuntimeEnv};
pub use db::{db_url, DbKind, DbProfile};
