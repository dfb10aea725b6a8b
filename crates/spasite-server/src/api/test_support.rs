use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header::AUTHORIZATION, Method, Request, StatusCode},
    Router,
};
use spasite_db::MemoryDocumentStore;
use spasite_places::PlacesClient;
use tower::ServiceExt;

use crate::middleware::{test_support::StaticVerifier, AdminAuth};

use super::{build_app, default_rate_limit_state, AppState};

pub(crate) const ADMIN_TOKEN: &str = "admin-token";
pub(crate) const GUEST_TOKEN: &str = "guest-token";

pub(crate) fn test_auth() -> AdminAuth {
    let tokens = HashMap::from([
        (ADMIN_TOKEN.to_string(), "owner@example.com".to_string()),
        (GUEST_TOKEN.to_string(), "guest@example.com".to_string()),
    ]);
    AdminAuth::new(
        Some(Arc::new(StaticVerifier(tokens))),
        vec!["owner@example.com".to_string()],
    )
}

/// App over `store` whose upstream calls go to `upstream_base`.
pub(crate) fn test_app(store: Arc<MemoryDocumentStore>, upstream_base: &str) -> Router {
    let places = PlacesClient::with_base_url(upstream_base, 5).expect("client");
    build_app(
        AppState {
            store,
            places: Arc::new(places),
            auth: test_auth(),
            promotion_edits: Arc::default(),
        },
        default_rate_limit_state(),
    )
}

/// Sends one request and returns the status with the decoded JSON body.
pub(crate) async fn send(
    app: Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<serde_json::Value>,
) -> (StatusCode, serde_json::Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .expect("request"),
        None => builder.body(Body::empty()).expect("request"),
    };

    let response = app.oneshot(request).await.expect("response");
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    let json = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("json body")
    };
    (status, json)
}
