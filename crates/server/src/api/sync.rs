//! Sync API handlers.

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;
use shopsync_core::{format_cursor, SyncError, SyncReport};
use tracing::error;

use super::handlers::ErrorResponse;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct CursorResponse {
    pub cursor: Option<String>,
    pub location: String,
}

fn failure_status(error: &SyncError) -> StatusCode {
    if error.is_upstream() {
        StatusCode::BAD_GATEWAY
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    }
}

/// POST /api/v1/orders/fetch
///
/// Run one incremental sync attempt and report its outcome.
pub async fn fetch_orders(State(state): State<Arc<AppState>>) -> (StatusCode, Json<SyncReport>) {
    let result = state.sync().run().await;
    let report = SyncReport::from(&result);

    let status = match &result {
        Ok(_) => StatusCode::OK,
        Err(e) => {
            error!(kind = e.kind_label(), "Error processing orders: {}", e);
            failure_status(e)
        }
    };

    (status, Json(report))
}

/// GET /api/v1/sync/cursor
///
/// Show the stored cursor without running a sync.
pub async fn get_cursor(
    State(state): State<Arc<AppState>>,
) -> Result<Json<CursorResponse>, (StatusCode, Json<ErrorResponse>)> {
    let sync = state.sync();
    match sync.current_cursor().await {
        Ok(cursor) => Ok(Json(CursorResponse {
            cursor: cursor.map(format_cursor),
            location: sync.cursor_location(),
        })),
        Err(e) => Err((
            failure_status(&e),
            Json(ErrorResponse {
                error: e.to_string(),
            }),
        )),
    }
}
