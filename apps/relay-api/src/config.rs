const DEFAULT_PORT: u16 = 3001;
const DEFAULT_MESSAGE_LOG_CAPACITY: usize = 100;
const DEFAULT_HISTORY_REPLAY_LIMIT: usize = 20;
const DEFAULT_BROADCAST_CAPACITY: usize = 4096;

/// Relay configuration, loaded from environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Port the HTTP server binds to.
    pub port: u16,
    /// PostgreSQL connection string. Messages are only kept in memory when unset.
    pub database_url: Option<String>,
    /// Allowed CORS origin. Any origin is allowed when unset.
    pub cors_origin: Option<String>,
    /// Number of recent messages retained in memory.
    pub message_log_capacity: usize,
    /// Number of messages replayed to a client when it joins.
    pub history_replay_limit: usize,
    /// Capacity of the gateway broadcast channel. Slower sessions lag.
    pub broadcast_capacity: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            database_url: None,
            cors_origin: None,
            message_log_capacity: DEFAULT_MESSAGE_LOG_CAPACITY,
            history_replay_limit: DEFAULT_HISTORY_REPLAY_LIMIT,
            broadcast_capacity: DEFAULT_BROADCAST_CAPACITY,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build a config from an arbitrary variable source. Missing or
    /// unparseable values fall back to defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let non_empty = |name: &str| lookup(name).filter(|s| !s.trim().is_empty());

        Self {
            port: parse_var(&lookup, "PORT").unwrap_or(defaults.port),
            database_url: non_empty("DATABASE_URL"),
            cors_origin: non_empty("CORS_ORIGIN"),
            message_log_capacity: parse_var(&lookup, "MESSAGE_LOG_CAPACITY")
                .filter(|v: &usize| *v > 0)
                .unwrap_or(defaults.message_log_capacity),
            history_replay_limit: parse_var(&lookup, "HISTORY_REPLAY_LIMIT")
                .unwrap_or(defaults.history_replay_limit),
            broadcast_capacity: parse_var(&lookup, "BROADCAST_CAPACITY")
                .filter(|v: &usize| *v > 0)
                .unwrap_or(defaults.broadcast_capacity),
        }
    }
}

fn parse_var<T: std::str::FromStr>(lookup: &impl Fn(&str) -> Option<String>, name: &str) -> Option<T> {
    lookup(name).and_then(|v| v.trim().parse().ok())
}
