pub mod config;
pub mod db;
pub mod error;
pub mod gateway;
pub mod models;
pub mod routes;

use std::sync::Arc;
use std::time::Instant;

use config::Config;
use db::sink::PersistenceSink;
use db::store::MessageStore;
use gateway::{Coordinator, GatewayBroadcast};

/// Shared application state available to all route handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub coordinator: Arc<Coordinator>,
    pub broadcast: GatewayBroadcast,
    /// Durable message store, when one is configured.
    pub store: Option<Arc<dyn MessageStore>>,
    pub started_at: Instant,
}

impl AppState {
    /// Wire the broadcast hub, persistence sink and coordinator together.
    ///
    /// Spawns the persistence worker when a store is given, so it must be
    /// called inside a Tokio runtime.
    pub fn new(config: Config, store: Option<Arc<dyn MessageStore>>) -> Self {
        let broadcast = GatewayBroadcast::new(config.broadcast_capacity);
        let sink = store.clone().map(|store| PersistenceSink::spawn(store).0);

        let coordinator = Coordinator::new(
            Arc::new(broadcast.clone()),
            sink,
            config.message_log_capacity,
            config.history_replay_limit,
        );

        Self {
            config: Arc::new(config),
            coordinator: Arc::new(coordinator),
            broadcast,
            store,
            started_at: Instant::now(),
        }
    }
}
