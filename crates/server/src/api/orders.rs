//! Pass-through handlers for the upstream order endpoints.

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;
use tracing::error;

use super::handlers::ErrorResponse;
use crate::state::AppState;

/// Upstream payload wrapper.
#[derive(Debug, Serialize)]
pub struct ProxyResponse {
    pub api_data: serde_json::Value,
}

type ProxyResult = Result<Json<ProxyResponse>, (StatusCode, Json<ErrorResponse>)>;

/// GET /api/v1/orders
///
/// Fetch the order list from the shop and return it unchanged.
pub async fn list_orders(State(state): State<Arc<AppState>>) -> ProxyResult {
    match state.proxy().get_orders().await {
        Ok(api_data) => Ok(Json(ProxyResponse { api_data })),
        Err(e) => {
            error!("Error fetching orders from shop: {}", e);
            Err((
                StatusCode::BAD_GATEWAY,
                Json(ErrorResponse {
                    error: "Failed to fetch data from shop API".to_string(),
                }),
            ))
        }
    }
}

/// POST /api/v1/orders/search
///
/// Forward the JSON criteria body to the shop's order search.
pub async fn search_orders(
    State(state): State<Arc<AppState>>,
    Json(criteria): Json<serde_json::Value>,
) -> ProxyResult {
    match state.proxy().search_orders(criteria).await {
        Ok(api_data) => Ok(Json(ProxyResponse { api_data })),
        Err(e) => {
            error!("Error searching orders in shop: {}", e);
            Err((
                StatusCode::BAD_GATEWAY,
                Json(ErrorResponse {
                    error: "Failed to fetch data from shop API".to_string(),
                }),
            ))
        }
    }
}
