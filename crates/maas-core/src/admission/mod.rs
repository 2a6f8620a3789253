//! Admission pipeline - decides whether a request may reach a protected
//! operation.
//!
//! A pipeline is an ordered list of [`AdmissionStage`]s. The runner asks each
//! stage in turn and stops at the first rejection, so later stages never see
//! a request an earlier stage turned away. Two fixed pipelines exist:
//!
//! - **metered**: rate limit, then charge one token from the client's ledger.
//! - **account**: rate limit only, for top-ups and balance queries.
//!
//! A successful charge is final. If the protected operation fails afterwards
//! the token is not returned.

mod pipeline;
mod stages;

use std::time::Duration;

use thiserror::Error;

use crate::ports::LedgerError;

pub use pipeline::AdmissionPipeline;
pub use stages::{MeteringStage, RateLimitStage};

/// Outcome of a stage or a whole pipeline.
pub type Admission = Result<(), Rejection>;

/// Why a request was turned away.
#[derive(Debug, Error)]
pub enum Rejection {
    #[error("Rate limit exceeded")]
    RateLimited { retry_after: Duration },

    #[error("Missing client identity")]
    Unauthorized,

    #[error("Insufficient tokens for client {client_id}")]
    InsufficientFunds { client_id: String },

    /// The ledger could not answer. Distinct from an exhausted balance.
    #[error("Ledger operation failed: {0}")]
    StorageFault(#[from] LedgerError),
}

/// What a stage gets to see of the inbound request.
#[derive(Debug, Clone, Default)]
pub struct AdmissionRequest {
    client_id: Option<String>,
}

impl AdmissionRequest {
    /// Blank identities are treated as missing.
    pub fn new(client_id: Option<&str>) -> Self {
        let client_id = client_id
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(String::from);
        Self { client_id }
    }

    pub fn client_id(&self) -> Option<&str> {
        self.client_id.as_deref()
    }
}

/// A single admission decision.
#[async_trait::async_trait]
pub trait AdmissionStage: Send + Sync {
    /// Stage name for logs.
    fn name(&self) -> &'static str;

    /// Admit or reject with a reason.
    async fn evaluate(&self, request: &AdmissionRequest) -> Admission;
}
