//! In-memory token bucket using the governor crate.

use std::num::NonZeroU32;

use governor::clock::{Clock, DefaultClock};
use governor::middleware::NoOpMiddleware;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter as GovernorRateLimiter};

use maas_core::ports::{RateLimitDecision, RateLimitError, RateLimiter};

type DirectBucket<C> =
    GovernorRateLimiter<NotKeyed, InMemoryState, C, NoOpMiddleware<<C as Clock>::Instant>>;

/// Token bucket configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateLimitConfig {
    /// Burst ceiling: tokens available after a quiet period.
    pub capacity: u32,
    /// Steady-state admissions per second.
    pub refill_per_sec: u32,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            capacity: 200,
            refill_per_sec: 100,
        }
    }
}

impl RateLimitConfig {
    fn quota(&self) -> Result<Quota, RateLimitError> {
        let capacity = NonZeroU32::new(self.capacity).ok_or_else(|| {
            RateLimitError::InvalidConfig("capacity must be greater than zero".to_string())
        })?;
        let refill = NonZeroU32::new(self.refill_per_sec).ok_or_else(|| {
            RateLimitError::InvalidConfig("refill rate must be greater than zero".to_string())
        })?;

        Ok(Quota::per_second(refill).allow_burst(capacity))
    }
}

/// Process-wide token bucket.
///
/// Backed by governor's GCRA state, a single atomic word updated with
/// compare-and-swap, so concurrent checks never lose or double-spend a token.
/// Limits are per-process, not shared across instances.
pub struct TokenBucketLimiter<C: Clock = DefaultClock> {
    bucket: DirectBucket<C>,
    clock: C,
    config: RateLimitConfig,
}

impl TokenBucketLimiter {
    pub fn new(config: RateLimitConfig) -> Result<Self, RateLimitError> {
        Self::with_clock(config, DefaultClock::default())
    }
}

impl<C: Clock + Clone> TokenBucketLimiter<C> {
    /// Build a limiter on an explicit clock.
    pub fn with_clock(config: RateLimitConfig, clock: C) -> Result<Self, RateLimitError> {
        let quota = config.quota()?;
        let bucket = GovernorRateLimiter::direct_with_clock(quota, clock.clone());

        Ok(Self {
            bucket,
            clock,
            config,
        })
    }

    /// Limits this bucket was built with.
    pub fn config(&self) -> &RateLimitConfig {
        &self.config
    }
}

impl<C> RateLimiter for TokenBucketLimiter<C>
where
    C: Clock + Send + Sync,
    C::Instant: Send + Sync,
{
    fn check(&self) -> RateLimitDecision {
        match self.bucket.check() {
            Ok(()) => RateLimitDecision::Allowed,
            Err(not_until) => RateLimitDecision::Throttled {
                retry_after: not_until.wait_time_from(self.clock.now()),
            },
        }
    }
}
