//! Token ledger port.

use async_trait::async_trait;

use crate::domain::{ClientLedgerEntry, DebitOutcome};

/// Ledger store - durable per-client token balances.
///
/// Every method is a single atomic unit against the stored entry.
/// Implementations must never decide a debit from a balance read in a
/// separate step.
#[async_trait]
pub trait LedgerStore: Send + Sync {
    /// Current balance, or 0 when the client has no entry.
    /// Never creates an entry.
    async fn get_balance(&self, client_id: &str) -> Result<i64, LedgerError>;

    /// Add `amount` to the balance, creating the entry if absent.
    /// `amount` must be strictly positive.
    async fn credit(&self, client_id: &str, amount: i64) -> Result<(), LedgerError>;

    /// Take one unit iff the balance is strictly positive.
    ///
    /// An absent client is `Rejected` and no entry is created.
    async fn try_debit_one(&self, client_id: &str) -> Result<DebitOutcome, LedgerError>;

    /// The stored entry, if any. Never creates an entry.
    async fn entry(&self, client_id: &str) -> Result<Option<ClientLedgerEntry>, LedgerError>;
}

/// Ledger operation failures.
///
/// An exhausted balance is not an error, see [`DebitOutcome::Rejected`].
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    #[error("Credit amount must be positive, got {0}")]
    InvalidAmount(i64),

    #[error("Balance overflow for client {0}")]
    Overflow(String),

    #[error("Ledger storage unavailable: {0}")]
    Connection(String),

    #[error("Ledger query failed: {0}")]
    Query(String),
}
