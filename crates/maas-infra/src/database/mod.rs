//! Database connection management and the SQL-backed ledger.

mod connections;

#[cfg(feature = "database")]
pub mod entity;
#[cfg(feature = "database")]
mod ledger_repo;

#[cfg(feature = "database")]
pub use connections::connect;
pub use connections::{DatabaseConfig, IN_MEMORY_LOCATION};

#[cfg(feature = "database")]
pub use ledger_repo::SqlLedgerStore;
