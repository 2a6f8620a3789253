//! Test doubles for the ports.

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU32, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use crate::domain::{ClientLedgerEntry, DebitOutcome};
use crate::ports::{LedgerError, LedgerStore, RateLimitDecision, RateLimiter};

/// Limiter with a fixed number of tokens and no refill.
pub struct FixedBudgetLimiter {
    remaining: AtomicU32,
    calls: AtomicUsize,
}

impl FixedBudgetLimiter {
    pub fn new(budget: u32) -> Self {
        Self {
            remaining: AtomicU32::new(budget),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl RateLimiter for FixedBudgetLimiter {
    fn check(&self) -> RateLimitDecision {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self
            .remaining
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
        {
            Ok(_) => RateLimitDecision::Allowed,
            Err(_) => RateLimitDecision::Throttled {
                retry_after: Duration::from_secs(1),
            },
        }
    }
}

/// Ledger backed by a mutex-guarded map that counts every call.
#[derive(Default)]
pub struct FakeLedger {
    entries: Mutex<HashMap<String, ClientLedgerEntry>>,
    calls: AtomicUsize,
}

impl FakeLedger {
    pub fn with_balance(client_id: &str, balance: i64) -> Self {
        let ledger = Self::default();
        ledger.entries.lock().unwrap().insert(
            client_id.to_string(),
            ClientLedgerEntry::new(client_id, balance),
        );
        ledger
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn balance(&self, client_id: &str) -> Option<i64> {
        self.entries
            .lock()
            .unwrap()
            .get(client_id)
            .map(|entry| entry.balance)
    }
}

#[async_trait]
impl LedgerStore for FakeLedger {
    async fn get_balance(&self, client_id: &str) -> Result<i64, LedgerError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.balance(client_id).unwrap_or(0))
    }

    async fn credit(&self, client_id: &str, amount: i64) -> Result<(), LedgerError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let mut entries = self.entries.lock().unwrap();
        entries
            .entry(client_id.to_string())
            .or_insert_with(|| ClientLedgerEntry::new(client_id, 0))
            .balance += amount;
        Ok(())
    }

    async fn try_debit_one(&self, client_id: &str) -> Result<DebitOutcome, LedgerError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let mut entries = self.entries.lock().unwrap();
        match entries.get_mut(client_id) {
            Some(entry) if entry.balance > 0 => {
                entry.balance -= 1;
                Ok(DebitOutcome::Admitted)
            }
            _ => Ok(DebitOutcome::Rejected),
        }
    }

    async fn entry(&self, client_id: &str) -> Result<Option<ClientLedgerEntry>, LedgerError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.entries.lock().unwrap().get(client_id).cloned())
    }
}

/// Ledger whose storage is always down.
pub struct FailingLedger;

#[async_trait]
impl LedgerStore for FailingLedger {
    async fn get_balance(&self, _client_id: &str) -> Result<i64, LedgerError> {
        Err(LedgerError::Connection("storage offline".to_string()))
    }

    async fn credit(&self, _client_id: &str, _amount: i64) -> Result<(), LedgerError> {
        Err(LedgerError::Connection("storage offline".to_string()))
    }

    async fn try_debit_one(&self, _client_id: &str) -> Result<DebitOutcome, LedgerError> {
        Err(LedgerError::Connection("storage offline".to_string()))
    }

    async fn entry(&self, _client_id: &str) -> Result<Option<ClientLedgerEntry>, LedgerError> {
        Err(LedgerError::Connection("storage offline".to_string()))
    }
}
