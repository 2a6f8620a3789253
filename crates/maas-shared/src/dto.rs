//! Data Transfer Objects - request/response types for the API.

use serde::{Deserialize, Serialize};

/// Request to credit tokens to a client.
///
/// `balance` is accepted as an alias of `amount` for older clients.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopUpRequest {
    #[serde(default)]
    pub client_id: String,
    #[serde(alias = "balance")]
    pub amount: i64,
}

/// Acknowledgement of a top-up.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopUpResponse {
    pub status: String,
}

impl TopUpResponse {
    pub fn success() -> Self {
        Self {
            status: "success".to_string(),
        }
    }
}

/// A client's current balance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceResponse {
    pub client_id: String,
    pub balance: i64,
}

/// Query parameters for a meme.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemeQuery {
    #[serde(default)]
    pub query: String,
    pub lat: Option<String>,
    pub lon: Option<String>,
}

/// A generated meme.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemeResponse {
    pub id: String,
    pub url: String,
    pub caption: String,
    pub query: String,
    pub latitude: f64,
    pub longitude: f64,
    pub created_at: String,
}
