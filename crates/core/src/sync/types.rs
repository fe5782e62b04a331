//! Sync outcome and error types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::cursor::{format_cursor, CursorError};
use crate::shop::{AuthError, FetchError, Order};

/// Successful result of a sync attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum SyncOutcome {
    /// The upstream returned nothing newer than the cursor.
    NoNewOrders,
    /// Nothing to do: the cursor is fresh, or the new batch was too old to commit.
    UpToDate,
    /// New orders, oldest first, and the cursor they were committed under.
    Processed {
        orders: Vec<Order>,
        new_cursor: DateTime<Utc>,
    },
}

impl SyncOutcome {
    pub fn kind(&self) -> SyncKind {
        match self {
            SyncOutcome::NoNewOrders => SyncKind::NoNewOrders,
            SyncOutcome::UpToDate => SyncKind::UpToDate,
            SyncOutcome::Processed { .. } => SyncKind::Processed,
        }
    }
}

/// A sync attempt that aborted. The cursor is never modified on failure.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("Token acquisition failed: {0}")]
    Auth(#[from] AuthError),

    #[error("Order fetch failed: {0}")]
    Fetch(#[from] FetchError),

    #[error("Cursor state is unreadable: {0}")]
    CorruptState(#[source] CursorError),

    #[error("Failed to persist cursor: {0}")]
    Store(#[source] CursorError),
}

impl SyncError {
    /// Stable machine-readable label.
    pub fn kind_label(&self) -> &'static str {
        match self {
            SyncError::Auth(_) => "auth",
            SyncError::Fetch(_) => "fetch",
            SyncError::CorruptState(_) => "corrupt_state",
            SyncError::Store(_) => "store",
        }
    }

    /// True when the failure came from the upstream shop rather than local state.
    pub fn is_upstream(&self) -> bool {
        matches!(self, SyncError::Auth(_) | SyncError::Fetch(_))
    }
}

/// Discriminant of a sync report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncKind {
    NoNewOrders,
    UpToDate,
    Processed,
    Failed,
}

impl SyncKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SyncKind::NoNewOrders => "no_new_orders",
            SyncKind::UpToDate => "up_to_date",
            SyncKind::Processed => "processed",
            SyncKind::Failed => "failed",
        }
    }
}

/// Error details in a failed report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncFailure {
    pub kind: String,
    pub message: String,
}

/// Serializable summary of one sync attempt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncReport {
    pub kind: SyncKind,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub orders: Option<Vec<Order>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_cursor: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<SyncFailure>,
}

impl From<&SyncOutcome> for SyncReport {
    fn from(outcome: &SyncOutcome) -> Self {
        match outcome {
            SyncOutcome::NoNewOrders => Self {
                kind: SyncKind::NoNewOrders,
                message: "No new orders found.".to_string(),
                orders: None,
                new_cursor: None,
                error: None,
            },
            SyncOutcome::UpToDate => Self {
                kind: SyncKind::UpToDate,
                message: "No new orders to process.".to_string(),
                orders: None,
                new_cursor: None,
                error: None,
            },
            SyncOutcome::Processed { orders, new_cursor } => Self {
                kind: SyncKind::Processed,
                message: "Orders processed successfully.".to_string(),
                orders: Some(orders.clone()),
                new_cursor: Some(format_cursor(*new_cursor)),
                error: None,
            },
        }
    }
}

impl From<&SyncError> for SyncReport {
    fn from(error: &SyncError) -> Self {
        Self {
            kind: SyncKind::Failed,
            message: "Failed to process orders.".to_string(),
            orders: None,
            new_cursor: None,
            error: Some(SyncFailure {
                kind: error.kind_label().to_string(),
                message: error.to_string(),
            }),
        }
    }
}

impl From<&Result<SyncOutcome, SyncError>> for SyncReport {
    fn from(result: &Result<SyncOutcome, SyncError>) -> Self {
        match result {
            Ok(outcome) => outcome.into(),
            Err(error) => error.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn test_processed_report_shape() {
        let ts = Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap();
        let outcome = SyncOutcome::Processed {
            orders: vec![Order::new("o1", ts)],
            new_cursor: ts,
        };

        let json = serde_json::to_value(SyncReport::from(&outcome)).unwrap();
        assert_eq!(json["kind"], "processed");
        assert_eq!(json["new_cursor"], "2024-01-02T00:00:00.000Z");
        assert_eq!(json["orders"][0]["id"], "o1");
        assert!(json.get("error").is_none());
    }

    #[test]
    fn test_up_to_date_report_omits_optional_fields() {
        let json = serde_json::to_value(SyncReport::from(&SyncOutcome::UpToDate)).unwrap();
        assert_eq!(json, json!({ "kind": "up_to_date", "message": "No new orders to process." }));
    }

    #[test]
    fn test_failed_report_carries_error_kind() {
        let result: Result<SyncOutcome, SyncError> = Err(SyncError::Auth(AuthError::MissingToken));
        let report = SyncReport::from(&result);

        assert_eq!(report.kind, SyncKind::Failed);
        let failure = report.error.unwrap();
        assert_eq!(failure.kind, "auth");
        assert!(failure.message.contains("access_token"));
    }

    #[test]
    fn test_error_labels_and_upstream_flag() {
        let corrupt = SyncError::CorruptState(CursorError::Corrupt {
            location: "memory".to_string(),
            content: "x".to_string(),
            reason: "bad".to_string(),
        });
        assert_eq!(corrupt.kind_label(), "corrupt_state");
        assert!(!corrupt.is_upstream());

        let fetch = SyncError::Fetch(FetchError::Timeout);
        assert_eq!(fetch.kind_label(), "fetch");
        assert!(fetch.is_upstream());
    }

    #[test]
    fn test_kind_as_str_matches_serde() {
        for kind in [
            SyncKind::NoNewOrders,
            SyncKind::UpToDate,
            SyncKind::Processed,
            SyncKind::Failed,
        ] {
            assert_eq!(serde_json::to_value(kind).unwrap(), json!(kind.as_str()));
        }
    }
}
