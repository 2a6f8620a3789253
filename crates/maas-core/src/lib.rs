//! # MaaS Core
//!
//! The domain layer of the metered gateway.
//! This crate holds the ledger and limiter contracts, the admission pipeline
//! and the account operations. It has no infrastructure dependencies.

pub mod account;
pub mod admission;
pub mod domain;
pub mod error;
pub mod ports;

pub use admission::{Admission, AdmissionPipeline, AdmissionRequest, Rejection};
pub use error::DomainError;

#[cfg(test)]
mod testing;
