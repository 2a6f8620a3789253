//! Ledger store implementations.

mod memory;

pub use memory::InMemoryLedgerStore;

#[cfg(feature = "database")]
pub use crate::database::SqlLedgerStore;
