//! In-memory ledger - used when no database is configured.

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::{Mutex, RwLock};

use maas_core::domain::{ClientLedgerEntry, DebitOutcome};
use maas_core::ports::{LedgerError, LedgerStore};

type Slot = Arc<Mutex<ClientLedgerEntry>>;

/// In-memory ledger keyed by client id.
///
/// The map lock is only held to find or insert a client's slot. Balance
/// changes happen under that client's own mutex, so traffic for different
/// clients never serializes.
/// Note: Balances are lost on process restart.
pub struct InMemoryLedgerStore {
    entries: RwLock<HashMap<String, Slot>>,
}

impl InMemoryLedgerStore {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }

    async fn slot(&self, client_id: &str) -> Option<Slot> {
        self.entries.read().await.get(client_id).cloned()
    }
}

impl Default for InMemoryLedgerStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LedgerStore for InMemoryLedgerStore {
    async fn get_balance(&self, client_id: &str) -> Result<i64, LedgerError> {
        let Some(slot) = self.slot(client_id).await else {
            return Ok(0);
        };
        let balance = slot.lock().await.balance;
        Ok(balance)
    }

    async fn credit(&self, client_id: &str, amount: i64) -> Result<(), LedgerError> {
        if amount <= 0 {
            return Err(LedgerError::InvalidAmount(amount));
        }

        let slot = match self.slot(client_id).await {
            Some(slot) => slot,
            None => {
                let mut entries = self.entries.write().await;
                match entries.entry(client_id.to_string()) {
                    // Another task created it between our read and write.
                    Entry::Occupied(existing) => existing.get().clone(),
                    Entry::Vacant(vacant) => {
                        vacant.insert(Arc::new(Mutex::new(ClientLedgerEntry::new(
                            client_id, amount,
                        ))));
                        tracing::debug!(client_id, amount, "Ledger entry created");
                        return Ok(());
                    }
                }
            }
        };

        let mut entry = slot.lock().await;
        entry.balance = entry
            .balance
            .checked_add(amount)
            .ok_or_else(|| LedgerError::Overflow(client_id.to_string()))?;
        entry.updated_at = Utc::now();

        tracing::debug!(client_id, amount, balance = entry.balance, "Ledger credited");
        Ok(())
    }

    async fn try_debit_one(&self, client_id: &str) -> Result<DebitOutcome, LedgerError> {
        let Some(slot) = self.slot(client_id).await else {
            return Ok(DebitOutcome::Rejected);
        };

        let mut entry = slot.lock().await;
        if entry.balance <= 0 {
            return Ok(DebitOutcome::Rejected);
        }
        entry.balance -= 1;
        entry.updated_at = Utc::now();

        Ok(DebitOutcome::Admitted)
    }

    async fn entry(&self, client_id: &str) -> Result<Option<ClientLedgerEntry>, LedgerError> {
        let Some(slot) = self.slot(client_id).await else {
            return Ok(None);
        };
        let entry = slot.lock().await.clone();
        Ok(Some(entry))
    }
}
