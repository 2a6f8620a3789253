//! Middleware modules.

pub mod admission;
pub mod client_id;
pub mod error;
