use clap::{Parser, ValueEnum};
use migration::{migrate, MigrationCommand};
use sea_orm::Database;
use sharevites::config::db::{db_url, DbKind, DbProfile};

#[derive(Clone, Copy, ValueEnum)]
enum Env {
    Prod,
    Test,
}

#[derive(Clone, Copy, ValueEnum)]
enum Db {
    Postgres,
    SqliteFile,
}

#[derive(Parser)]
#[command(name = "migration")]
#[command(about = "shareVites database migration tool")]
struct Args {
    /// up | down | fresh | reset | refresh | status
    command: String,

    /// Database profile
    #[arg(short, long, value_enum, default_value = "test")]
    env: Env,

    /// Database type. The in-memory directory has no schema to migrate.
    #[arg(short, long, value_enum, default_value = "postgres")]
    db: Db,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stdout)
        .without_time()
        .with_target(false)
        .with_env_filter("migration=info,sqlx=warn")
        .init();

    let args = Args::parse();

    let Some(command) = MigrationCommand::parse(&args.command) else {
        eprintln!(
            "Unknown command: {}. Use: up | down | fresh | reset | refresh | status",
            args.command
        );
        std::process::exit(2);
    };

    let profile = match args.env {
        Env::Prod => DbProfile::Prod,
        Env::Test => DbProfile::Test,
    };
    let kind = match args.db {
        Db::Postgres => DbKind::Postgres,
        Db::SqliteFile => DbKind::SqliteFile,
    };

    let url = match db_url(kind, profile) {
        Ok(Some(url)) => url,
        Ok(None) => {
            eprintln!("Nothing to migrate for this database kind");
            std::process::exit(2);
        }
        Err(e) => {
            eprintln!("Configuration error: {e}");
            std::process::exit(1);
        }
    };

    let conn = match Database::connect(&url).await {
        Ok(conn) => conn,
        Err(e) => {
            eprintln!("Failed to connect: {e}");
            std::process::exit(1);
        }
    };

    let outcome = migrate(&conn, command).await;
    let _ = conn.close().await;

    if let Err(e) = outcome {
        eprintln!("Migration failed: {e}");
        std::process::exit(1);
    }
}
