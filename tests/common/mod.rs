#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, Response},
};
use chrono::NaiveDate;
use http_body_util::BodyExt;
use moodlypulse_api::{
    auth::jwt::create_access_token, build_router, clock::FixedClock, store::MemoryEntryStore,
    AppState, Config,
};
use serde::de::DeserializeOwned;
use tower::ServiceExt;
use uuid::Uuid;

pub const JWT_SECRET: &str = "test_secret";

/// The day every test app treats as today.
pub fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 10).unwrap()
}

pub struct TestApp {
    pub router: axum::Router,
    pub store: MemoryEntryStore,
    pub config: Arc<Config>,
}

pub fn test_config() -> Config {
    Config {
        database_url: "postgres://unused".to_string(),
        database_max_connections: 1,
        host: "127.0.0.1".to_string(),
        port: 0,
        frontend_url: "http://localhost:4200".to_string(),
        cors_extra_origins: Vec::new(),
        jwt_secret: JWT_SECRET.to_string(),
    }
}

pub fn spawn_app() -> TestApp {
    let store = MemoryEntryStore::new();
    let config = Arc::new(test_config());

    let state = AppState {
        store: Arc::new(store.clone()),
        clock: Arc::new(FixedClock(today())),
        config: config.clone(),
    };

    TestApp {
        router: build_router(state),
        store,
        config,
    }
}

impl TestApp {
    pub fn bearer_for(&self, user_id: Uuid) -> String {
        let token = create_access_token(user_id, "user@example.com", 900, &self.config)
            .expect("Failed to mint test token");
        format!("Bearer {}", token)
    }

    pub async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.router.clone().oneshot(request).await.unwrap()
    }
}

pub async fn read_json<T: DeserializeOwned>(response: Response<Body>) -> T {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

pub fn json_request(method: &str, uri: &str, auth: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .method(method)
        .header("Content-Type", "application/json")
        .header("Authorization", auth)
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn empty_request(method: &str, uri: &str, auth: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .method(method)
        .header("Authorization", auth)
        .body(Body::empty())
        .unwrap()
}
