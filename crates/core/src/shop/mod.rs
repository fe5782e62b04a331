//! Shop order API integration.
//!
//! This module provides the upstream side of the sync: the client-credentials
//! token exchange, the order search call, and raw pass-through proxy calls.

mod client;
mod types;

pub use client::ShopwareClient;
pub use types::{AccessToken, ClientCredentials, Order};

use async_trait::async_trait;
use thiserror::Error;

/// Errors from the token endpoint.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Transport-level failure.
    #[error("Token request failed: {0}")]
    Http(#[source] reqwest::Error),

    /// The request did not finish within the configured timeout.
    #[error("Token request timed out")]
    Timeout,

    /// The endpoint answered with a non-success status.
    #[error("Token endpoint rejected the request: {status} - {message}")]
    Rejected { status: u16, message: String },

    /// The response carried no `access_token`.
    #[error("Token response did not contain an access_token")]
    MissingToken,

    /// Failed to parse response.
    #[error("Failed to parse token response: {0}")]
    ParseError(String),
}

impl AuthError {
    pub(crate) fn transport(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            Self::Timeout
        } else {
            Self::Http(e)
        }
    }
}

/// Errors from order retrieval and proxy calls.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Transport-level failure.
    #[error("Order request failed: {0}")]
    Http(#[source] reqwest::Error),

    /// The request did not finish within the configured timeout.
    #[error("Order request timed out")]
    Timeout,

    /// API returned an error.
    #[error("API error: {status} - {message}")]
    ApiError { status: u16, message: String },

    /// Failed to parse response.
    #[error("Failed to parse order response: {0}")]
    ParseError(String),

    /// No bearer token could be obtained for a proxy call.
    #[error("Could not authorize upstream request: {0}")]
    Unauthorized(#[from] AuthError),
}

impl FetchError {
    pub(crate) fn transport(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            Self::Timeout
        } else {
            Self::Http(e)
        }
    }
}

/// Exchanges client credentials for a bearer token.
#[async_trait]
pub trait TokenProvider: Send + Sync {
    /// Request a fresh token. No caching: every call hits the endpoint.
    async fn acquire_token(
        &self,
        credentials: &ClientCredentials,
    ) -> Result<AccessToken, AuthError>;
}

/// Retrieves the complete current order set.
#[async_trait]
pub trait OrderFetcher: Send + Sync {
    /// Fetch every order the search endpoint returns.
    ///
    /// A response without `data` (or with an empty list) is zero orders, not an error.
    async fn fetch_all_orders(&self, token: &AccessToken) -> Result<Vec<Order>, FetchError>;
}

/// Raw pass-through access to the order endpoints.
#[async_trait]
pub trait OrderProxy: Send + Sync {
    /// `GET /api/order`, returned as-is.
    async fn get_orders(&self) -> Result<serde_json::Value, FetchError>;

    /// `POST /api/search/order` with a caller-supplied criteria body, returned as-is.
    async fn search_orders(
        &self,
        criteria: serde_json::Value,
    ) -> Result<serde_json::Value, FetchError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_error_converts_into_fetch_error() {
        let err: FetchError = AuthError::MissingToken.into();
        assert!(matches!(err, FetchError::Unauthorized(AuthError::MissingToken)));
        assert!(err.to_string().contains("access_token"));
    }

    #[test]
    fn test_rejected_message_includes_status() {
        let err = AuthError::Rejected {
            status: 401,
            message: "invalid_client".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Token endpoint rejected the request: 401 - invalid_client"
        );
    }
}
