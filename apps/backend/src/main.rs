use actix_web::{web, App, HttpServer};
use sharevites::config::app::AppConfig;
use sharevites::config::db::DbProfile;
use sharevites::infra::state::build_state;
use sharevites::middleware::{
    cors_middleware, RequestTrace, StructuredLogger, TraceSpan,
};
use sharevites::routes;
use sharevites::state::security_config::SecurityConfig;
use tracing::{error, info};

mod telemetry;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    telemetry::init_tracing();

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "invalid configuration");
            std::process::exit(1);
        }
    };

    // Without a signing secret no token can be issued or checked.
    let security_config = match SecurityConfig::from_env() {
        Ok(security) => security,
        Err(e) => {
            error!(error = %e, "token signing secret unavailable");
            std::process::exit(1);
        }
    };

    let app_state = match build_state(security_config)
        .with_env(config.runtime_env)
        .with_db(config.db_kind, DbProfile::Prod)
        .build()
        .await
    {
        Ok(state) => state,
        Err(e) => {
            error!(error = %e, "failed to build application state");
            std::process::exit(1);
        }
    };

    info!(
        host = %config.host,
        port = config.port,
        env = ?config.runtime_env,
        db = ?config.db_kind,
        "starting shareVites server"
    );

    let db = app_state.db.clone();
    let data = web::Data::new(app_state);

    let result = HttpServer::new(move || {
        App::new()
            .wrap(cors_middleware())
            .wrap(StructuredLogger)
            .wrap(TraceSpan)
            .wrap(RequestTrace)
            .app_data(data.clone())
            .configure(routes::configure)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await;

    if let Some(conn) = db {
        if let Err(e) = conn.close().await {
            error!(error = %e, "failed to close database connection");
        }
    }

    result
}
