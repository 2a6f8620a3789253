//! Meme endpoint - the metered resource.

use actix_web::{HttpResponse, web};
use maas_core::domain::Meme;
use maas_shared::dto::{MemeQuery, MemeResponse};

use crate::middleware::error::{AppError, AppResult};

/// Hand out a meme for the query at the given coordinates.
/// The caller has already paid one token by the time this runs.
///
/// GET /memes?lat=..&lon=..&query=..
pub async fn get_meme(params: web::Query<MemeQuery>) -> AppResult<HttpResponse> {
    let params = params.into_inner();
    let latitude = parse_coordinate(params.lat.as_deref(), "latitude")?;
    let longitude = parse_coordinate(params.lon.as_deref(), "longitude")?;

    let meme = Meme::placeholder(params.query, latitude, longitude);

    Ok(HttpResponse::Ok().json(MemeResponse {
        id: meme.id.to_string(),
        url: meme.url,
        caption: meme.caption,
        query: meme.query,
        latitude: meme.latitude,
        longitude: meme.longitude,
        created_at: meme.created_at.to_rfc3339(),
    }))
}

fn parse_coordinate(raw: Option<&str>, name: &str) -> AppResult<f64> {
    raw.and_then(|value| value.trim().parse::<f64>().ok())
        .filter(|value| value.is_finite())
        .ok_or_else(|| AppError::BadRequest(format!("invalid {}", name)))
}
