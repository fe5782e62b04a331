//! Shopware Admin API client.
//!
//! Every request carries the `sw-access` header. Order calls are authorized
//! with a bearer token from the client-credentials grant.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use tracing::{debug, warn};

use super::types::{OrderSearchResponse, TokenRequest, TokenResponse};
use super::{
    AccessToken, AuthError, ClientCredentials, FetchError, Order, OrderFetcher, OrderProxy,
    TokenProvider,
};
use crate::config::ShopConfig;
use crate::metrics::record_upstream;

const ACCESS_KEY_HEADER: &str = "sw-access";
const TOKEN_PATH: &str = "/api/oauth/token";
const ORDER_PATH: &str = "/api/order";
const ORDER_SEARCH_PATH: &str = "/api/search/order";

/// Longest slice of an upstream error body carried into error messages.
const ERROR_BODY_LIMIT: usize = 200;

/// First `ERROR_BODY_LIMIT` characters of an upstream error body, trimmed.
fn error_excerpt(body: &str) -> String {
    let body = body.trim();
    match body.char_indices().nth(ERROR_BODY_LIMIT) {
        Some((cut, _)) => format!("{}...", &body[..cut]),
        None => body.to_string(),
    }
}

/// HTTP client for the shop's token and order endpoints.
pub struct ShopwareClient {
    client: Client,
    base_url: String,
    access_key: String,
    credentials: ClientCredentials,
    static_token: Option<AccessToken>,
}

impl ShopwareClient {
    /// Create a new client. The configured timeout bounds every request.
    pub fn new(config: &ShopConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(Duration::from_secs(u64::from(config.timeout_secs)))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            access_key: config.access_key.clone(),
            credentials: config.credentials(),
            static_token: config
                .static_token
                .as_ref()
                .filter(|t| !t.is_empty())
                .map(AccessToken::new),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn with_access_key(&self, request: RequestBuilder) -> RequestBuilder {
        request.header(ACCESS_KEY_HEADER, &self.access_key)
    }

    /// Token for the proxy routes: the static one if configured, otherwise a fresh grant.
    async fn proxy_token(&self) -> Result<AccessToken, AuthError> {
        match &self.static_token {
            Some(token) => Ok(token.clone()),
            None => self.acquire_token(&self.credentials).await,
        }
    }

    async fn send_authorized(
        &self,
        operation: &str,
        request: RequestBuilder,
        token: &AccessToken,
    ) -> Result<Response, FetchError> {
        let started = Instant::now();
        let result = self
            .with_access_key(request)
            .bearer_auth(token.as_str())
            .send()
            .await;

        let response = match result {
            Ok(response) => response,
            Err(e) => {
                record_upstream(operation, false, started.elapsed().as_secs_f64());
                warn!(operation, error = %e, "Upstream request failed");
                return Err(FetchError::transport(e));
            }
        };

        let status = response.status();
        record_upstream(
            operation,
            status.is_success(),
            started.elapsed().as_secs_f64(),
        );

        if !status.is_success() {
            let body = error_excerpt(&response.text().await.unwrap_or_default());
            warn!(operation, status = status.as_u16(), "Upstream returned error status");
            return Err(FetchError::ApiError {
                status: status.as_u16(),
                message: body,
            });
        }

        Ok(response)
    }

    async fn json_body(response: Response) -> Result<serde_json::Value, FetchError> {
        response
            .json()
            .await
            .map_err(|e| FetchError::ParseError(format!("Response is not valid JSON: {}", e)))
    }
}

#[async_trait]
impl TokenProvider for ShopwareClient {
    async fn acquire_token(
        &self,
        credentials: &ClientCredentials,
    ) -> Result<AccessToken, AuthError> {
        let url = self.url(TOKEN_PATH);
        debug!(client_id = credentials.client_id(), "Requesting access token");

        let started = Instant::now();
        let result = self
            .with_access_key(self.client.post(&url))
            .json(&TokenRequest::client_credentials(credentials))
            .send()
            .await;

        let response = match result {
            Ok(response) => response,
            Err(e) => {
                record_upstream("token", false, started.elapsed().as_secs_f64());
                return Err(AuthError::transport(e));
            }
        };

        let status = response.status();
        record_upstream("token", status.is_success(), started.elapsed().as_secs_f64());

        if !status.is_success() {
            let body = error_excerpt(&response.text().await.unwrap_or_default());
            return Err(AuthError::Rejected {
                status: status.as_u16(),
                message: body,
            });
        }

        let token: TokenResponse = response.json().await.map_err(|e| {
            AuthError::ParseError(format!("Failed to parse token response: {}", e))
        })?;

        match token.access_token {
            Some(value) if !value.is_empty() => Ok(AccessToken::new(value)),
            _ => Err(AuthError::MissingToken),
        }
    }
}

#[async_trait]
impl OrderFetcher for ShopwareClient {
    async fn fetch_all_orders(&self, token: &AccessToken) -> Result<Vec<Order>, FetchError> {
        let url = self.url(ORDER_SEARCH_PATH);
        debug!(%url, "Fetching orders");

        let request = self.client.post(&url).json(&serde_json::json!({}));
        let response = self.send_authorized("order_search", request, token).await?;

        let parsed: OrderSearchResponse = response.json().await.map_err(|e| {
            FetchError::ParseError(format!("Failed to parse order search response: {}", e))
        })?;

        let orders = parsed.data.unwrap_or_default();
        debug!(count = orders.len(), "Fetched orders");
        Ok(orders)
    }
}

#[async_trait]
impl OrderProxy for ShopwareClient {
    async fn get_orders(&self) -> Result<serde_json::Value, FetchError> {
        let token = self.proxy_token().await?;
        let request = self.client.get(self.url(ORDER_PATH));
        let response = self.send_authorized("order_list", request, &token).await?;
        Self::json_body(response).await
    }

    async fn search_orders(
        &self,
        criteria: serde_json::Value,
    ) -> Result<serde_json::Value, FetchError> {
        let token = self.proxy_token().await?;
        let request = self.client.post(self.url(ORDER_SEARCH_PATH)).json(&criteria);
        let response = self.send_authorized("order_search_proxy", request, &token).await?;
        Self::json_body(response).await
    }
}
