use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use carnival_backend::{
    database::{memory::MemoryStore, seed::seed_catalog},
    routes,
    utils::{random::SeededRandom, time::ManualClock, token::TokenKeys},
    AppState,
};
use chrono::Utc;
use serde_json::{json, Value as JsonValue};
use tower::ServiceExt;

pub struct TestApp {
    pub app: Router,
    pub store: Arc<MemoryStore>,
    pub clock: Arc<ManualClock>,
}

fn catalog_json(general: usize, per_category: usize, fun: usize) -> JsonValue {
    let questions = |prefix: &str, n: usize| -> Vec<JsonValue> {
        (0..n)
            .map(|i| {
                json!({
                    "text": format!("{} question {}", prefix, i),
                    "option_a": "Right",
                    "option_b": "Wrong",
                    "correct": "A"
                })
            })
            .collect()
    };

    let mut categories: Vec<JsonValue> = (1..=general)
        .map(|i| {
            let name = format!("Trial{}", i);
            json!({
                "name": name,
                "description": format!("{} riddles", name),
                "questions": questions(&name, per_category)
            })
        })
        .collect();
    categories.push(json!({ "name": "Fun", "questions": questions("Fun", fun) }));
    json!({ "categories": categories })
}

pub async fn spawn_app() -> TestApp {
    let store = Arc::new(MemoryStore::new());
    let seed = serde_json::from_value(catalog_json(7, 6, 3)).expect("seed json");
    seed_catalog(store.as_ref(), seed).await.expect("seed catalog");

    let clock = Arc::new(ManualClock::new(Utc::now()));
    let state = AppState::with_sources(
        store.clone(),
        TokenKeys::new("test_secret_key", 3600),
        Arc::new(SeededRandom::new(42)),
        clock.clone(),
    );

    TestApp {
        app: routes::router(state),
        store,
        clock,
    }
}

impl TestApp {
    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<JsonValue>,
    ) -> (StatusCode, JsonValue) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let req = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let resp = self.app.clone().oneshot(req).await.unwrap();
        let status = resp.status();
        let bytes = to_bytes(resp.into_body(), 1024 * 1024).await.unwrap();
        let body = if bytes.is_empty() {
            JsonValue::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(JsonValue::Null)
        };
        (status, body)
    }

    /// Registers a player and returns their bearer token.
    pub async fn player_token(&self, name: &str, email: &str) -> String {
        let (status, _) = self
            .send(
                Method::POST,
                "/api/v1/auth/signup",
                None,
                Some(json!({ "name": name, "email": email, "password": "cyber_guardian" })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);

        let (status, body) = self
            .send(
                Method::POST,
                "/api/v1/auth/login",
                None,
                Some(json!({ "email": email, "password": "cyber_guardian" })),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        body["access_token"].as_str().unwrap().to_string()
    }
}
