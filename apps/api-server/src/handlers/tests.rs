use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::{App, test, web};
use serde_json::{Value, json};

use maas_core::domain::{ClientLedgerEntry, DebitOutcome};
use maas_core::ports::{LedgerError, LedgerStore, RateLimiter};
use maas_infra::{InMemoryLedgerStore, RateLimitConfig, TokenBucketLimiter};

use super::configure_routes;
use crate::middleware::client_id::CLIENT_ID_HEADER;
use crate::observability::RequestIdMiddleware;
use crate::state::AppState;

macro_rules! init_app {
    ($state:expr) => {{
        let state: AppState = $state;
        test::init_service(
            App::new()
                .wrap(RequestIdMiddleware)
                .app_data(web::Data::new(state.clone()))
                .configure(|cfg| configure_routes(cfg, &state)),
        )
        .await
    }};
}

fn limiter(capacity: u32) -> Arc<dyn RateLimiter> {
    let config = RateLimitConfig {
        capacity,
        refill_per_sec: 1,
    };
    Arc::new(TokenBucketLimiter::new(config).unwrap())
}

fn state_with(capacity: u32, ledger: Arc<dyn LedgerStore>) -> AppState {
    AppState::with_components(limiter(capacity), ledger)
}

fn meme_request(client_id: &str) -> test::TestRequest {
    test::TestRequest::get()
        .uri("/memes?lat=40.73061&lon=-73.935242&query=funny")
        .insert_header((CLIENT_ID_HEADER, client_id))
}

fn top_up_request(body: Value) -> test::TestRequest {
    test::TestRequest::post().uri("/tokens").set_json(body)
}

fn balance_request(client_id: &str) -> test::TestRequest {
    test::TestRequest::get()
        .uri("/balance")
        .insert_header((CLIENT_ID_HEADER, client_id))
}

struct FailingLedger;

#[async_trait::async_trait]
impl LedgerStore for FailingLedger {
    async fn get_balance(&self, _client_id: &str) -> Result<i64, LedgerError> {
        Err(LedgerError::Connection("database is down".to_string()))
    }

    async fn credit(&self, _client_id: &str, _amount: i64) -> Result<(), LedgerError> {
        Err(LedgerError::Connection("database is down".to_string()))
    }

    async fn try_debit_one(&self, _client_id: &str) -> Result<DebitOutcome, LedgerError> {
        Err(LedgerError::Connection("database is down".to_string()))
    }

    async fn entry(&self, _client_id: &str) -> Result<Option<ClientLedgerEntry>, LedgerError> {
        Err(LedgerError::Connection("database is down".to_string()))
    }
}

#[actix_web::test]
async fn test_alice_spends_exactly_her_top_up() {
    let ledger = Arc::new(InMemoryLedgerStore::new());
    let app = init_app!(state_with(100, ledger.clone()));

    let res = test::call_service(&app, balance_request("alice").to_request()).await;
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body, json!({"client_id": "alice", "balance": 0}));

    let res = test::call_service(
        &app,
        top_up_request(json!({"client_id": "alice", "amount": 5})).to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body, json!({"status": "success"}));

    for _ in 0..5 {
        let res = test::call_service(&app, meme_request("alice").to_request()).await;
        assert_eq!(res.status(), StatusCode::OK);
        let meme: Value = test::read_body_json(res).await;
        assert_eq!(meme["caption"], "A meme about funny");
        assert_eq!(meme["latitude"], 40.73061);
    }

    let res = test::call_service(&app, meme_request("alice").to_request()).await;
    assert_eq!(res.status(), StatusCode::PAYMENT_REQUIRED);
    let problem: Value = test::read_body_json(res).await;
    assert_eq!(problem["status"], 402);

    let res = test::call_service(&app, balance_request("alice").to_request()).await;
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body, json!({"client_id": "alice", "balance": 0}));
}

#[actix_web::test]
async fn test_unknown_client_reads_zero_without_entry() {
    let ledger = Arc::new(InMemoryLedgerStore::new());
    let app = init_app!(state_with(100, ledger.clone()));

    let res = test::call_service(&app, balance_request("bob").to_request()).await;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body, json!({"client_id": "bob", "balance": 0}));
    assert!(ledger.entry("bob").await.unwrap().is_none());

    let res = test::call_service(
        &app,
        top_up_request(json!({"client_id": "bob", "balance": 3})).to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);

    let res = test::call_service(&app, balance_request("bob").to_request()).await;
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["balance"], 3);
}

#[actix_web::test]
async fn test_missing_identity_is_unauthorized_but_rate_limited() {
    let ledger = Arc::new(InMemoryLedgerStore::new());
    ledger.credit("alice", 5).await.unwrap();
    let app = init_app!(state_with(1, ledger.clone()));

    let req = test::TestRequest::get()
        .uri("/memes?lat=1&lon=2&query=x")
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    // The anonymous request used the only unit in the bucket.
    let res = test::call_service(&app, meme_request("alice").to_request()).await;
    assert_eq!(res.status(), StatusCode::TOO_MANY_REQUESTS);
    assert!(res.headers().contains_key("Retry-After"));
    assert_eq!(ledger.get_balance("alice").await.unwrap(), 5);
}

#[actix_web::test]
async fn test_balance_requires_identity() {
    let app = init_app!(state_with(10, Arc::new(InMemoryLedgerStore::new())));

    let req = test::TestRequest::get().uri("/balance").to_request();
    let res = test::call_service(&app, req).await;

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn test_bad_coordinates_are_rejected_after_charge() {
    let ledger = Arc::new(InMemoryLedgerStore::new());
    ledger.credit("alice", 2).await.unwrap();
    let app = init_app!(state_with(10, ledger.clone()));

    let req = test::TestRequest::get()
        .uri("/memes?lat=north&lon=2&query=x")
        .insert_header((CLIENT_ID_HEADER, "alice"))
        .to_request();
    let res = test::call_service(&app, req).await;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(ledger.get_balance("alice").await.unwrap(), 1);
}

#[actix_web::test]
async fn test_wrong_method_is_not_charged() {
    let ledger = Arc::new(InMemoryLedgerStore::new());
    ledger.credit("alice", 5).await.unwrap();
    let app = init_app!(state_with(1, ledger.clone()));

    for req in [
        test::TestRequest::post().uri("/memes"),
        test::TestRequest::delete().uri("/memes"),
        test::TestRequest::put().uri("/balance"),
        test::TestRequest::get().uri("/tokens"),
    ] {
        let req = req.insert_header((CLIENT_ID_HEADER, "alice")).to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::METHOD_NOT_ALLOWED);
    }
    assert_eq!(ledger.get_balance("alice").await.unwrap(), 5);

    // The single bucket unit is still there.
    let res = test::call_service(&app, meme_request("alice").to_request()).await;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(ledger.get_balance("alice").await.unwrap(), 4);
}

#[actix_web::test]
async fn test_invalid_top_up_is_bad_request() {
    let ledger = Arc::new(InMemoryLedgerStore::new());
    let app = init_app!(state_with(10, ledger.clone()));

    for body in [
        json!({"client_id": "alice", "amount": 0}),
        json!({"client_id": "alice", "amount": -4}),
        json!({"client_id": "", "amount": 5}),
        json!({"client_id": "alice"}),
    ] {
        let res = test::call_service(&app, top_up_request(body).to_request()).await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    assert!(ledger.entry("alice").await.unwrap().is_none());
}

#[actix_web::test]
async fn test_concurrent_requests_admit_exactly_the_balance() {
    let ledger = Arc::new(InMemoryLedgerStore::new());
    ledger.credit("alice", 5).await.unwrap();
    let app = init_app!(state_with(100, ledger.clone()));

    let calls = (0..20).map(|_| test::call_service(&app, meme_request("alice").to_request()));
    let statuses: Vec<StatusCode> = futures::future::join_all(calls)
        .await
        .into_iter()
        .map(|res| res.status())
        .collect();

    let admitted = statuses.iter().filter(|s| **s == StatusCode::OK).count();
    let refused = statuses
        .iter()
        .filter(|s| **s == StatusCode::PAYMENT_REQUIRED)
        .count();
    assert_eq!(admitted, 5);
    assert_eq!(refused, 15);
    assert_eq!(ledger.get_balance("alice").await.unwrap(), 0);
}

#[actix_web::test]
async fn test_storage_fault_is_internal_error() {
    let app = init_app!(state_with(10, Arc::new(FailingLedger)));

    let res = test::call_service(&app, meme_request("alice").to_request()).await;
    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let res = test::call_service(&app, balance_request("alice").to_request()).await;
    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[actix_web::test]
async fn test_health_is_not_rate_limited() {
    let app = init_app!(state_with(1, Arc::new(InMemoryLedgerStore::new())));

    for _ in 0..3 {
        let req = test::TestRequest::get().uri("/health").to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::OK);
    }
}

#[actix_web::test]
async fn test_request_id_is_echoed() {
    let app = init_app!(state_with(10, Arc::new(InMemoryLedgerStore::new())));

    let req = test::TestRequest::get()
        .uri("/health")
        .insert_header(("X-Request-ID", "req-42"))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.headers().get("x-request-id").unwrap(), "req-42");

    let req = test::TestRequest::get().uri("/health").to_request();
    let res = test::call_service(&app, req).await;
    assert!(res.headers().contains_key("x-request-id"));
}
