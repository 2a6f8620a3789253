//! # MaaS Infrastructure
//!
//! Concrete implementations of the ports defined in `maas-core`:
//! the token bucket rate limiter and the ledger stores.
//!
//! ## Feature Flags
//!
//! - `full` (default) - All features enabled
//! - `database` - SQLite / PostgreSQL ledger via SeaORM
//!
//! Without `database` only the in-memory ledger is available.

pub mod database;
pub mod ledger;
pub mod rate_limit;

// Re-exports
pub use database::DatabaseConfig;
pub use ledger::InMemoryLedgerStore;
pub use rate_limit::{RateLimitConfig, TokenBucketLimiter};

#[cfg(feature = "database")]
pub use ledger::SqlLedgerStore;
