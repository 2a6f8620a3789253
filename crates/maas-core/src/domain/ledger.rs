use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A client's persisted token balance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientLedgerEntry {
    pub client_id: String,
    pub balance: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ClientLedgerEntry {
    /// Create an entry for a first credit.
    pub fn new(client_id: impl Into<String>, balance: i64) -> Self {
        let now = Utc::now();
        Self {
            client_id: client_id.into(),
            balance,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Balance as reported to a client. An absent ledger entry reads as zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientBalance {
    pub client_id: String,
    pub balance: i64,
}

/// Result of an atomic check-and-decrement against the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DebitOutcome {
    /// The balance was positive and one unit was taken.
    Admitted,
    /// The balance was zero, negative or absent. Nothing changed.
    Rejected,
}

impl DebitOutcome {
    pub fn is_admitted(self) -> bool {
        matches!(self, DebitOutcome::Admitted)
    }
}
