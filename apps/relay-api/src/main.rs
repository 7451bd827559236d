use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;

use axum::http::HeaderValue;
use axum::Router;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use relay_api::config::Config;
use relay_api::db::store::{MessageStore, PgMessageStore};
use relay_api::AppState;

#[tokio::main]
async fn main() {
    // Load .env file (silently skip if missing; env vars may be set externally)
    if dotenvy::dotenv().is_err() {
        let env_path = Path::new(env!("CARGO_MANIFEST_DIR")).join(".env");
        let _ = dotenvy::from_path(env_path);
    }

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env();
    let port = config.port;

    let store: Option<Arc<dyn MessageStore>> = match config.database_url.as_deref() {
        Some(url) => match relay_api::db::pool::connect(url) {
            Ok(pool) => Some(Arc::new(PgMessageStore::new(pool))),
            Err(err) => {
                tracing::warn!(?err, "message persistence disabled");
                None
            }
        },
        None => {
            tracing::info!("DATABASE_URL not set, messages are kept in memory only");
            None
        }
    };

    let cors = match config.cors_origin.as_deref().map(HeaderValue::from_str) {
        Some(Ok(origin)) => CorsLayer::new().allow_origin(AllowOrigin::exact(origin)),
        Some(Err(err)) => {
            tracing::warn!(?err, "invalid CORS_ORIGIN, allowing any origin");
            CorsLayer::new().allow_origin(Any)
        }
        None => CorsLayer::new().allow_origin(Any),
    }
    .allow_methods(Any)
    .allow_headers(Any);

    tracing::info!(
        log_capacity = config.message_log_capacity,
        history_replay = config.history_replay_limit,
        persistence = store.is_some(),
        "relay configured"
    );

    let state = AppState::new(config, store);

    let app = Router::new()
        .merge(relay_api::routes::router())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!(%addr, "relay-api listening");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("failed to bind");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("server error");

    tracing::info!("relay-api stopped, in-memory chat state discarded");
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(?err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
