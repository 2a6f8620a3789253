use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

const PLACEHOLDER_URL: &str = "https://example.com/meme.jpg";

/// Meme entity - the resource handed out behind the metering gate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Meme {
    pub id: Uuid,
    pub url: String,
    pub caption: String,
    pub query: String,
    pub latitude: f64,
    pub longitude: f64,
    pub created_at: DateTime<Utc>,
}

impl Meme {
    /// Build the placeholder meme for a query at the given coordinates.
    pub fn placeholder(query: impl Into<String>, latitude: f64, longitude: f64) -> Self {
        let query = query.into();
        Self {
            id: Uuid::new_v4(),
            url: PLACEHOLDER_URL.to_string(),
            caption: format!("A meme about {}", query),
            query,
            latitude,
            longitude,
            created_at: Utc::now(),
        }
    }
}
