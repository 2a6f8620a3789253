//! Rate limiting port.

use std::time::Duration;

/// Process-wide admission filter shared by every client.
///
/// Checks never fail. A throttled request is an answer, not an error.
pub trait RateLimiter: Send + Sync {
    /// Try to consume one unit of capacity.
    fn check(&self) -> RateLimitDecision;

    /// `true` iff a unit was consumed.
    fn allow(&self) -> bool {
        self.check().is_allowed()
    }
}

/// Result of a rate limit check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateLimitDecision {
    Allowed,
    Throttled { retry_after: Duration },
}

impl RateLimitDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, RateLimitDecision::Allowed)
    }
}

/// Rate limiter construction errors.
#[derive(Debug, thiserror::Error)]
pub enum RateLimitError {
    #[error("Invalid rate limit configuration: {0}")]
    InvalidConfig(String),
}
