use std::sync::Arc;

use crate::ports::{LedgerStore, RateLimiter};

use super::{Admission, AdmissionRequest, AdmissionStage, MeteringStage, RateLimitStage};

/// Fixed, ordered sequence of admission stages.
pub struct AdmissionPipeline {
    stages: Vec<Box<dyn AdmissionStage>>,
}

impl AdmissionPipeline {
    /// Rate limit, then charge one token.
    pub fn metered(limiter: Arc<dyn RateLimiter>, ledger: Arc<dyn LedgerStore>) -> Self {
        Self {
            stages: vec![
                Box::new(RateLimitStage::new(limiter)),
                Box::new(MeteringStage::new(ledger)),
            ],
        }
    }

    /// Rate limit only. Used by the account-management routes.
    pub fn account(limiter: Arc<dyn RateLimiter>) -> Self {
        Self {
            stages: vec![Box::new(RateLimitStage::new(limiter))],
        }
    }

    /// Stage names in evaluation order.
    pub fn stage_names(&self) -> Vec<&'static str> {
        self.stages.iter().map(|stage| stage.name()).collect()
    }

    /// Run every stage in order, stopping at the first rejection.
    pub async fn run(&self, request: &AdmissionRequest) -> Admission {
        for stage in &self.stages {
            stage.evaluate(request).await?;
        }
        Ok(())
    }
}
