//! Application state - shared across all handlers.

use std::sync::Arc;

use maas_core::AdmissionPipeline;
use maas_core::ports::{LedgerError, LedgerStore, RateLimitError, RateLimiter};
use maas_infra::{DatabaseConfig, InMemoryLedgerStore, TokenBucketLimiter};

use crate::config::AppConfig;

/// Failures that stop the server from starting.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error(transparent)]
    RateLimit(#[from] RateLimitError),

    #[error("Ledger storage unavailable: {0}")]
    Storage(#[from] LedgerError),

    #[cfg(feature = "database")]
    #[error("Migration failed: {0}")]
    Migration(String),

    #[cfg(not(feature = "database"))]
    #[error("Storage location {0} needs the `database` feature")]
    DatabaseDisabled(String),
}

/// Shared application state.
///
/// One limiter and one ledger per process. Both pipelines share the limiter,
/// so account traffic and metered traffic draw from the same bucket.
#[derive(Clone)]
pub struct AppState {
    pub ledger: Arc<dyn LedgerStore>,
    pub metered: Arc<AdmissionPipeline>,
    pub account: Arc<AdmissionPipeline>,
}

impl AppState {
    /// Build the application state from configuration.
    pub async fn new(config: &AppConfig) -> Result<Self, StartupError> {
        let bucket = TokenBucketLimiter::new(config.rate_limit.clone())?;
        tracing::info!(
            capacity = bucket.config().capacity,
            refill_per_sec = bucket.config().refill_per_sec,
            "Token bucket rate limiter initialized"
        );
        let limiter: Arc<dyn RateLimiter> = Arc::new(bucket);
        let ledger = open_ledger(&config.storage).await?;

        tracing::info!("Application state initialized");

        Ok(Self::with_components(limiter, ledger))
    }

    /// Wire the pipelines around an existing limiter and ledger.
    pub fn with_components(limiter: Arc<dyn RateLimiter>, ledger: Arc<dyn LedgerStore>) -> Self {
        let metered = Arc::new(AdmissionPipeline::metered(limiter.clone(), ledger.clone()));
        let account = Arc::new(AdmissionPipeline::account(limiter));

        Self {
            ledger,
            metered,
            account,
        }
    }
}

async fn open_ledger(storage: &DatabaseConfig) -> Result<Arc<dyn LedgerStore>, StartupError> {
    if storage.is_in_memory() {
        tracing::warn!("Using in-memory ledger. Balances are lost on restart.");
        return Ok(Arc::new(InMemoryLedgerStore::new()));
    }

    open_database_ledger(storage).await
}

#[cfg(feature = "database")]
async fn open_database_ledger(
    storage: &DatabaseConfig,
) -> Result<Arc<dyn LedgerStore>, StartupError> {
    use maas_infra::SqlLedgerStore;
    use migration::{Migrator, MigratorTrait};

    let ledger = SqlLedgerStore::connect(storage).await?;

    if storage.auto_migrate {
        Migrator::up(ledger.connection(), None)
            .await
            .map_err(|e| StartupError::Migration(e.to_string()))?;
        tracing::info!("Ledger schema up to date");
    }

    Ok(Arc::new(ledger))
}

#[cfg(not(feature = "database"))]
async fn open_database_ledger(
    storage: &DatabaseConfig,
) -> Result<Arc<dyn LedgerStore>, StartupError> {
    Err(StartupError::DatabaseDisabled(storage.redacted_url()))
}
