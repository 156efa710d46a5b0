//! Environment configuration.
//!
//! Everything comes from the process environment; the `--port` CLI flag is
//! applied on top by `main`.

/// Default listening port when `PORT` is unset or unparseable
pub const DEFAULT_PORT: u16 = 5000;

/// Default deployment when `MONGODB_URI` is unset
const DEFAULT_MONGODB_URI: &str = "mongodb://localhost:27017";

/// Default database name when `DB_NAME` is unset
const DEFAULT_DB_NAME: &str = "Task-Management";

/// Runtime configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP/WebSocket listening port
    pub port: u16,
    /// MongoDB connection string
    pub mongodb_uri: String,
    /// Database holding the `Tasks` and `Users` collections
    pub db_name: String,
}

impl Config {
    /// Load configuration from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary lookup function.
    ///
    /// Tests pass a closure instead of mutating process-wide env vars.
    pub fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Self {
        let port = get("PORT")
            .and_then(|p| p.parse().ok())
            .unwrap_or(DEFAULT_PORT);

        Self {
            port,
            mongodb_uri: get("MONGODB_URI").unwrap_or_else(|| DEFAULT_MONGODB_URI.to_string()),
            db_name: get("DB_NAME").unwrap_or_else(|| DEFAULT_DB_NAME.to_string()),
        }
    }
}
