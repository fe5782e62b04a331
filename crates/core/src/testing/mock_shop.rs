//! Mock shop API for testing.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::shop::{
    AccessToken, AuthError, ClientCredentials, FetchError, Order, OrderFetcher, OrderProxy,
    TokenProvider,
};

/// A recorded upstream call for test assertions.
#[derive(Debug, Clone, PartialEq)]
pub enum RecordedShopCall {
    AcquireToken { client_id: String },
    FetchAllOrders { token: String },
    GetOrders,
    SearchOrders { criteria: serde_json::Value },
}

/// Mock implementation of the shop traits.
///
/// Provides controllable behavior for testing:
/// - Return a configurable order set
/// - Track calls for assertions
/// - Simulate token and fetch failures
#[derive(Debug)]
pub struct MockShop {
    orders: Arc<RwLock<Vec<Order>>>,
    token: Arc<RwLock<String>>,
    proxy_response: Arc<RwLock<serde_json::Value>>,
    calls: Arc<RwLock<Vec<RecordedShopCall>>>,
    next_auth_error: Arc<RwLock<Option<AuthError>>>,
    next_fetch_error: Arc<RwLock<Option<FetchError>>>,
}

impl Default for MockShop {
    fn default() -> Self {
        Self::new()
    }
}

impl MockShop {
    /// Create a mock with no orders.
    pub fn new() -> Self {
        Self {
            orders: Arc::new(RwLock::new(Vec::new())),
            token: Arc::new(RwLock::new("mock-token".to_string())),
            proxy_response: Arc::new(RwLock::new(serde_json::json!({ "data": [] }))),
            calls: Arc::new(RwLock::new(Vec::new())),
            next_auth_error: Arc::new(RwLock::new(None)),
            next_fetch_error: Arc::new(RwLock::new(None)),
        }
    }

    // =========================================================================
    // Configuration
    // =========================================================================

    /// Replace the order set returned by every fetch.
    pub async fn set_orders(&self, orders: Vec<Order>) {
        *self.orders.write().await = orders;
    }

    /// Append an order to the upstream set.
    pub async fn add_order(&self, order: Order) {
        self.orders.write().await.push(order);
    }

    /// Token value handed out by `acquire_token`.
    pub async fn set_token(&self, token: impl Into<String>) {
        *self.token.write().await = token.into();
    }

    /// Body returned by the proxy calls.
    pub async fn set_proxy_response(&self, response: serde_json::Value) {
        *self.proxy_response.write().await = response;
    }

    // =========================================================================
    // Error Injection
    // =========================================================================

    /// Configure the next token request to fail.
    pub async fn set_next_auth_error(&self, error: AuthError) {
        *self.next_auth_error.write().await = Some(error);
    }

    /// Configure the next fetch or proxy call to fail.
    pub async fn set_next_fetch_error(&self, error: FetchError) {
        *self.next_fetch_error.write().await = Some(error);
    }

    // =========================================================================
    // Call Recording
    // =========================================================================

    /// Get all recorded calls.
    pub async fn recorded_calls(&self) -> Vec<RecordedShopCall> {
        self.calls.read().await.clone()
    }

    /// Total number of upstream calls.
    pub async fn call_count(&self) -> usize {
        self.calls.read().await.len()
    }

    /// Number of token requests.
    pub async fn token_requests(&self) -> usize {
        self.calls
            .read()
            .await
            .iter()
            .filter(|c| matches!(c, RecordedShopCall::AcquireToken { .. }))
            .count()
    }

    /// Number of full order fetches.
    pub async fn order_fetches(&self) -> usize {
        self.calls
            .read()
            .await
            .iter()
            .filter(|c| matches!(c, RecordedShopCall::FetchAllOrders { .. }))
            .count()
    }

    /// Clear recorded calls.
    pub async fn clear_recorded(&self) {
        self.calls.write().await.clear();
    }

    async fn record(&self, call: RecordedShopCall) {
        self.calls.write().await.push(call);
    }

    async fn take_fetch_error(&self) -> Option<FetchError> {
        self.next_fetch_error.write().await.take()
    }
}

#[async_trait]
impl TokenProvider for MockShop {
    async fn acquire_token(
        &self,
        credentials: &ClientCredentials,
    ) -> Result<AccessToken, AuthError> {
        self.record(RecordedShopCall::AcquireToken {
            client_id: credentials.client_id().to_string(),
        })
        .await;

        if let Some(error) = self.next_auth_error.write().await.take() {
            return Err(error);
        }

        Ok(AccessToken::new(self.token.read().await.clone()))
    }
}

#[async_trait]
impl OrderFetcher for MockShop {
    async fn fetch_all_orders(&self, token: &AccessToken) -> Result<Vec<Order>, FetchError> {
        self.record(RecordedShopCall::FetchAllOrders {
            token: token.as_str().to_string(),
        })
        .await;

        if let Some(error) = self.take_fetch_error().await {
            return Err(error);
        }

        Ok(self.orders.read().await.clone())
    }
}

#[async_trait]
impl OrderProxy for MockShop {
    async fn get_orders(&self) -> Result<serde_json::Value, FetchError> {
        self.record(RecordedShopCall::GetOrders).await;

        if let Some(error) = self.take_fetch_error().await {
            return Err(error);
        }

        Ok(self.proxy_response.read().await.clone())
    }

    async fn search_orders(
        &self,
        criteria: serde_json::Value,
    ) -> Result<serde_json::Value, FetchError> {
        self.record(RecordedShopCall::SearchOrders { criteria }).await;

        if let Some(error) = self.take_fetch_error().await {
            return Err(error);
        }

        Ok(self.proxy_response.read().await.clone())
    }
}
