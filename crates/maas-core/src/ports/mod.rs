//! Ports - trait definitions for external dependencies.
//! These are the "interfaces" that infrastructure must implement.

mod ledger;
mod rate_limit;

pub use ledger::{LedgerError, LedgerStore};
pub use rate_limit::{RateLimitDecision, RateLimitError, RateLimiter};
