use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::DebitOutcome;
use crate::ports::{LedgerStore, RateLimitDecision, RateLimiter};

use super::{Admission, AdmissionRequest, AdmissionStage, Rejection};

/// Global throttle. Consulted for every request, with or without identity.
pub struct RateLimitStage {
    limiter: Arc<dyn RateLimiter>,
}

impl RateLimitStage {
    pub fn new(limiter: Arc<dyn RateLimiter>) -> Self {
        Self { limiter }
    }
}

#[async_trait]
impl AdmissionStage for RateLimitStage {
    fn name(&self) -> &'static str {
        "rate_limit"
    }

    async fn evaluate(&self, _request: &AdmissionRequest) -> Admission {
        match self.limiter.check() {
            RateLimitDecision::Allowed => Ok(()),
            RateLimitDecision::Throttled { retry_after } => {
                Err(Rejection::RateLimited { retry_after })
            }
        }
    }
}

/// Identity check plus the one-token charge.
pub struct MeteringStage {
    ledger: Arc<dyn LedgerStore>,
}

impl MeteringStage {
    pub fn new(ledger: Arc<dyn LedgerStore>) -> Self {
        Self { ledger }
    }
}

#[async_trait]
impl AdmissionStage for MeteringStage {
    fn name(&self) -> &'static str {
        "metering"
    }

    async fn evaluate(&self, request: &AdmissionRequest) -> Admission {
        // No identity, no ledger access.
        let client_id = request.client_id().ok_or(Rejection::Unauthorized)?;

        match self.ledger.try_debit_one(client_id).await? {
            DebitOutcome::Admitted => Ok(()),
            DebitOutcome::Rejected => Err(Rejection::InsufficientFunds {
                client_id: client_id.to_string(),
            }),
        }
    }
}
