//! LINTAS Server — application entry point.
//!
//! Reads configuration from `LINTAS_*` environment variables, connects
//! to SurrealDB, applies migrations and serves the admin API.

use lintas_db::{DbManager, run_migrations};
use lintas_mikrotik::MockRouterOs;
use lintas_server::api::{self, AppState};
use lintas_server::config::ServerConfig;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    // LINTAS_LOG_FORMAT=json switches to machine-parseable output.
    let log_format = std::env::var("LINTAS_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "lintas=info,tower_http=debug".into());

    match log_format.as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer())
                .init();
        }
    }

    let config = ServerConfig::from_env();

    let db = match DbManager::connect(&config.db).await {
        Ok(db) => db,
        Err(e) => {
            tracing::error!(error = %e, "Database connection failed");
            std::process::exit(1);
        }
    };

    if let Err(e) = run_migrations(db.client()).await {
        tracing::error!(error = %e, "Schema migration failed");
        std::process::exit(1);
    }

    let state = AppState::new(&db, MockRouterOs::new());

    if let Err(e) = api::run_server(&config.listen_addr, state).await {
        tracing::error!(error = %e, "Server exited with error");
        std::process::exit(1);
    }
}
