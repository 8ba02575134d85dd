//! End-to-end hire flow through the router.

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use jsonwebtoken::{encode, EncodingKey, Header};
use serde::Serialize;
use tower::ServiceExt;

use gigwork_api::{create_router, ApiConfig, AppState};
use gigwork_models::{Bid, BidId, BidStatus, Gig, GigId, GigStatus};

const SECRET: &str = "integration-secret";

#[derive(Serialize)]
struct TestClaims<'a> {
    sub: &'a str,
    exp: i64,
}

fn bearer(uid: &str) -> String {
    let claims = TestClaims {
        sub: uid,
        exp: chrono::Utc::now().timestamp() + 3600,
    };
    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(SECRET.as_bytes()),
    )
    .unwrap();
    format!("Bearer {}", token)
}

async fn seeded_state() -> AppState {
    let config = ApiConfig {
        jwt_secret: SECRET.to_string(),
        ..ApiConfig::default()
    };
    let state = AppState::new(config);
    state
        .store
        .put_gig(Gig::new(GigId::from("g1"), "owner", "Logo design"))
        .await
        .unwrap();
    state
        .store
        .put_bid(Bid::new(BidId::from("b1"), GigId::from("g1"), "alice", 40_000))
        .await
        .unwrap();
    state
        .store
        .put_bid(Bid::new(BidId::from("b2"), GigId::from("g1"), "bob", 35_000))
        .await
        .unwrap();
    state
}

fn hire_request(bid_id: &str, auth: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("PATCH")
        .uri(format!("/api/bids/{}/hire", bid_id));
    if let Some(auth) = auth {
        builder = builder.header(header::AUTHORIZATION, auth);
    }
    builder.body(Body::empty()).unwrap()
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_hire_happy_path() {
    let state = seeded_state().await;
    let app = create_router(state.clone(), None);

    let response = app
        .oneshot(hire_request("b1", Some(&bearer("owner"))))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["message"], "Freelancer hired successfully");
    assert_eq!(body["gig_id"], "g1");
    assert_eq!(body["bid_id"], "b1");

    let gig = state.store.get_gig(&GigId::from("g1")).await.unwrap().unwrap();
    assert_eq!(gig.status, GigStatus::Assigned);
    let b2 = state.store.get_bid(&BidId::from("b2")).await.unwrap().unwrap();
    assert_eq!(b2.status, BidStatus::Rejected);
}

#[tokio::test]
async fn test_hire_requires_token() {
    let state = seeded_state().await;
    let app = create_router(state, None);

    let response = app.oneshot(hire_request("b1", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_hire_rejects_garbage_token() {
    let state = seeded_state().await;
    let app = create_router(state, None);

    let response = app
        .oneshot(hire_request("b1", Some("Bearer not-a-token")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_hire_rejects_non_owner() {
    let state = seeded_state().await;
    let app = create_router(state.clone(), None);

    let response = app
        .oneshot(hire_request("b1", Some(&bearer("bob"))))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // No store mutation happened.
    let gig = state.store.get_gig(&GigId::from("g1")).await.unwrap().unwrap();
    assert_eq!(gig.status, GigStatus::Open);
    let b1 = state.store.get_bid(&BidId::from("b1")).await.unwrap().unwrap();
    assert_eq!(b1.status, BidStatus::Pending);
}

#[tokio::test]
async fn test_second_hire_conflicts() {
    let state = seeded_state().await;
    let app = create_router(state.clone(), None);

    let first = app
        .clone()
        .oneshot(hire_request("b1", Some(&bearer("owner"))))
        .await
        .unwrap();
    assert_eq!(first.status(), StatusCode::OK);

    let second = app
        .oneshot(hire_request("b2", Some(&bearer("owner"))))
        .await
        .unwrap();
    assert_eq!(second.status(), StatusCode::CONFLICT);

    // The winner is still the first bid.
    let b1 = state.store.get_bid(&BidId::from("b1")).await.unwrap().unwrap();
    assert_eq!(b1.status, BidStatus::Hired);
}

#[tokio::test]
async fn test_unknown_bid_is_not_found() {
    let state = seeded_state().await;
    let app = create_router(state, None);

    let response = app
        .oneshot(hire_request("nope", Some(&bearer("owner"))))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_health_probe() {
    let state = seeded_state().await;
    let app = create_router(state, None);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["status"], "healthy");
}
