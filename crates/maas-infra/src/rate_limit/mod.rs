//! Rate limiting implementations.

mod token_bucket;

pub use token_bucket::{RateLimitConfig, TokenBucketLimiter};
