//! Account endpoints - balance query and top-up.

use actix_web::{HttpResponse, web};
use maas_core::account;
use maas_shared::dto::{BalanceResponse, TopUpRequest, TopUpResponse};

use crate::middleware::client_id::ClientId;
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// Current balance of the calling client. Unknown clients read zero.
///
/// GET /balance
pub async fn get_balance(state: web::Data<AppState>, client: ClientId) -> AppResult<HttpResponse> {
    let balance = account::query_balance(state.ledger.as_ref(), client.as_str()).await?;

    Ok(HttpResponse::Ok().json(BalanceResponse {
        client_id: balance.client_id,
        balance: balance.balance,
    }))
}

/// Credit tokens to a client.
///
/// POST /tokens
pub async fn top_up(
    state: web::Data<AppState>,
    body: web::Json<TopUpRequest>,
) -> AppResult<HttpResponse> {
    let request = body.into_inner();

    account::top_up(state.ledger.as_ref(), &request.client_id, request.amount).await?;
    tracing::info!(client_id = %request.client_id.trim(), amount = request.amount, "Tokens added");

    Ok(HttpResponse::Ok().json(TopUpResponse::success()))
}
