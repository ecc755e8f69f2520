use api::auth::middleware::log_request;
use api::routes::routes;
use api::state::AppState;
use axum::{http::header::CONTENT_TYPE, middleware::from_fn};
use db::connect;
use sea_orm::DatabaseConnection;
use services::idempotency::DatabaseIdempotencyStore;
use std::{net::SocketAddr, time::Duration};
use tower_http::cors::CorsLayer;
use tracing::{info, warn};
use tracing_appender::rolling;
use util::config::{self, IdempotencyBackend};

const PURGE_INTERVAL: Duration = Duration::from_secs(60 * 60);

#[tokio::main]
async fn main() {
    // Load configuration and initialize logging
    let _log_guard = init_logging(&config::log_file(), &config::log_level());

    let db = connect().await;
    let app_state = AppState::from_config(db.clone()).expect("Failed to build idempotency store");

    if config::idempotency_backend() == IdempotencyBackend::Database {
        spawn_idempotency_purger(db);
    }

    let cors = CorsLayer::very_permissive().expose_headers([CONTENT_TYPE]);

    let app = routes(app_state).layer(from_fn(log_request)).layer(cors);

    let addr: SocketAddr = format!("{}:{}", config::host(), config::port())
        .parse()
        .expect("Invalid address");

    info!(
        project = %config::project_name(),
        env = %config::env(),
        backend = ?config::idempotency_backend(),
        "Starting on http://{addr}"
    );

    axum::serve(
        tokio::net::TcpListener::bind(&addr)
            .await
            .expect("Failed to bind"),
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .expect("Server crashed");
}

fn init_logging(log_file: &str, log_level: &str) -> tracing_appender::non_blocking::WorkerGuard {
    use std::fs;
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    fs::create_dir_all("logs").ok();

    let file_appender = rolling::daily("logs", log_file);
    let (file_writer, guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = fmt::layer()
        .with_writer(file_writer)
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(true);

    let stdout_layer = fmt::layer()
        .with_writer(std::io::stdout)
        .with_ansi(true)
        .with_target(true)
        .with_thread_ids(true);

    let env_filter =
        EnvFilter::try_new(log_level).unwrap_or_else(|_| EnvFilter::new("api=info,services=info"));

    let registry = tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer);

    if config::log_to_stdout() {
        registry.with(stdout_layer).init();
    } else {
        registry.init();
    }

    guard
}

/// Deletes idempotency rows whose retry window has passed, once an hour.
fn spawn_idempotency_purger(db: DatabaseConnection) {
    let ttl = Duration::from_secs(config::idempotency_ttl_hours() * 60 * 60);

    tokio::spawn(async move {
        let store = match DatabaseIdempotencyStore::new(db, ttl) {
            Ok(store) => store,
            Err(e) => {
                warn!(error = %e, "Idempotency purge disabled");
                return;
            }
        };

        let mut interval = tokio::time::interval(PURGE_INTERVAL);
        loop {
            interval.tick().await;
            match store.purge_expired().await {
                Ok(0) => {}
                Ok(purged) => info!(purged, "Purged expired idempotency keys"),
                Err(e) => warn!(error = %e, "Failed to purge idempotency keys"),
            }
        }
    });
}
