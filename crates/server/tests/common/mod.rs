//! Common test utilities for in-process API testing with mocks.
//!
//! This module provides a test fixture that builds the router with a mock
//! shop and an in-memory cursor store, so the HTTP surface can be exercised
//! without a real shop.

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use shopsync_core::{
    testing::MockShop, Config, CursorConfig, CursorStore, InMemoryCursorStore, OrderFetcher,
    OrderProxy, OrderSync, ServerConfig, ShopConfig, SyncConfig, TokenProvider,
};

/// Re-export fixtures for test convenience
pub use shopsync_core::testing::fixtures;

/// Test fixture with a mock shop behind every upstream trait.
///
/// # Example
///
/// ```rust,ignore
/// #[tokio::test]
/// async fn test_fetch() {
///     let fixture = TestFixture::new();
///     fixture.shop.set_orders(vec![...]).await;
///
///     let response = fixture.post_empty("/api/v1/orders/fetch").await;
///     assert_eq!(response.status, 200);
/// }
/// ```
pub struct TestFixture {
    /// The Axum router for testing
    pub router: Router,
    /// Mock shop - configure orders, tokens, failures
    pub shop: Arc<MockShop>,
    /// Cursor store shared with the sync
    pub cursor: Arc<InMemoryCursorStore>,
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
    pub text: String,
}

impl TestFixture {
    /// Create a fixture with no stored cursor.
    pub fn new() -> Self {
        Self::with_cursor_store(InMemoryCursorStore::new())
    }

    /// Create a fixture around a pre-seeded cursor store.
    pub fn with_cursor_store(store: InMemoryCursorStore) -> Self {
        let shop = Arc::new(MockShop::new());
        let cursor = Arc::new(store);
        let config = test_config();

        let sync = Arc::new(OrderSync::new(
            config.sync.clone(),
            config.shop.credentials(),
            Arc::clone(&cursor) as Arc<dyn CursorStore>,
            Arc::clone(&shop) as Arc<dyn TokenProvider>,
            Arc::clone(&shop) as Arc<dyn OrderFetcher>,
        ));

        let state = Arc::new(shopsync_server::state::AppState::new(
            config,
            sync,
            Arc::clone(&shop) as Arc<dyn OrderProxy>,
        ));

        let router = shopsync_server::api::create_router(state);

        Self {
            router,
            shop,
            cursor,
        }
    }

    /// Send a GET request to the test server.
    pub async fn get(&self, path: &str) -> TestResponse {
        self.request("GET", path, None).await
    }

    /// Send a POST request with JSON body.
    pub async fn post(&self, path: &str, body: Value) -> TestResponse {
        self.request("POST", path, Some(body)).await
    }

    /// Send a POST request without a body.
    pub async fn post_empty(&self, path: &str) -> TestResponse {
        self.request("POST", path, None).await
    }

    /// Send a POST request with raw string body (for testing malformed JSON).
    pub async fn post_raw(&self, path: &str, body: &str) -> TestResponse {
        let request = Request::builder()
            .method("POST")
            .uri(path)
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        self.send(request).await
    }

    async fn request(&self, method: &str, path: &str, body: Option<Value>) -> TestResponse {
        let mut request_builder = Request::builder().method(method).uri(path);

        let body = if let Some(json_body) = body {
            request_builder = request_builder.header("Content-Type", "application/json");
            Body::from(serde_json::to_vec(&json_body).unwrap())
        } else {
            Body::empty()
        };

        self.send(request_builder.body(body).unwrap()).await
    }

    async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body_bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to collect body")
            .to_bytes();

        let text = String::from_utf8_lossy(&body_bytes).into_owned();
        let body: Value = if body_bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body_bytes).unwrap_or(Value::Null)
        };

        TestResponse { status, body, text }
    }
}

fn test_config() -> Config {
    Config {
        shop: ShopConfig {
            base_url: "http://shop.test".to_string(),
            access_key: "SWSCTESTKEY".to_string(),
            client_id: "test-client".to_string(),
            client_secret: "super-secret".to_string(),
            static_token: None,
            timeout_secs: 5,
        },
        server: ServerConfig {
            host: std::net::IpAddr::V4(std::net::Ipv4Addr::LOCALHOST),
            port: 0, // Not used for in-process testing
        },
        cursor: CursorConfig::default(),
        sync: SyncConfig::default(),
    }
}

/// Helper to assert a response has expected status.
#[macro_export]
macro_rules! assert_status {
    ($response:expr, $status:expr) => {
        assert_eq!(
            $response.status, $status,
            "Expected status {:?}, got {:?}. Body: {}",
            $status, $response.status, $response.text
        );
    };
}
