//! Application configuration loaded from environment variables.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use maas_infra::{DatabaseConfig, RateLimitConfig};

/// Storage used when neither `STORAGE_LOCATION` nor `DATABASE_URL` is set.
pub const DEFAULT_STORAGE_LOCATION: &str = "sqlite://maas.db?mode=rwc";

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub rate_limit: RateLimitConfig,
    pub storage: DatabaseConfig,
    pub shutdown_timeout: Duration,
    pub client_request_timeout: Duration,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from any key lookup. Unparsable values fall back to defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = RateLimitConfig::default();
        let rate_limit = RateLimitConfig {
            capacity: parse_or(&lookup, "RATE_LIMIT_CAPACITY", defaults.capacity),
            refill_per_sec: parse_or(&lookup, "RATE_LIMIT_REFILL_PER_SEC", defaults.refill_per_sec),
        };

        let location = lookup("STORAGE_LOCATION")
            .or_else(|| lookup("DATABASE_URL"))
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_STORAGE_LOCATION.to_string());

        let mut storage = DatabaseConfig::new(location.trim());
        storage.max_connections = parse_or(&lookup, "DB_MAX_CONNECTIONS", storage.max_connections);
        storage.min_connections = parse_or(&lookup, "DB_MIN_CONNECTIONS", storage.min_connections);
        storage.auto_migrate = lookup("AUTO_MIGRATE")
            .map(|v| v != "false" && v != "0")
            .unwrap_or(true);

        Self {
            host: lookup("HOST").unwrap_or_else(|| "127.0.0.1".to_string()),
            port: parse_or(&lookup, "PORT", 8080),
            rate_limit,
            storage,
            shutdown_timeout: Duration::from_secs(parse_or(&lookup, "SHUTDOWN_TIMEOUT_SECS", 30)),
            client_request_timeout: Duration::from_secs(parse_or(
                &lookup,
                "CLIENT_REQUEST_TIMEOUT_SECS",
                5,
            )),
        }
    }
}

fn parse_or<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> T {
    lookup(key)
        .and_then(|value| value.trim().parse().ok())
        .unwrap_or(default)
}
