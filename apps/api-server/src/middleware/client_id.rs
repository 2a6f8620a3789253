//! Client identity extractor.

use std::future::{Ready, ready};

use actix_web::{FromRequest, HttpRequest, dev::Payload};

use super::error::AppError;

/// Header carrying the caller's client id.
pub const CLIENT_ID_HEADER: &str = "X-Client-ID";

/// Read the client id header. Blank or non-UTF-8 values count as missing.
pub fn client_id_header(req: &HttpRequest) -> Option<&str> {
    req.headers()
        .get(CLIENT_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|id| !id.is_empty())
}

/// Identified caller.
///
/// Use this in handlers that need the caller's id:
/// ```ignore
/// async fn balance(client: ClientId) -> impl Responder {
///     format!("Hello, {}!", client.as_str())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct ClientId(pub String);

impl ClientId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromRequest for ClientId {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        match client_id_header(req) {
            Some(id) => ready(Ok(ClientId(id.to_string()))),
            None => ready(Err(AppError::Unauthorized)),
        }
    }
}
