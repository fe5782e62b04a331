//! Cursor storage for incremental order sync.
//!
//! The cursor is a single timestamp: the `orderDateTime` of the newest order
//! committed by a successful sync. Stores hold it as RFC 3339 text so the
//! on-disk value stays human-readable and round-trips exactly.

mod file;
mod memory;

pub use file::FileCursorStore;
pub use memory::InMemoryCursorStore;

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use thiserror::Error;

/// Errors that can occur when reading or writing the cursor.
#[derive(Debug, Error)]
pub enum CursorError {
    /// Stored content exists but is not a valid timestamp.
    #[error("Stored cursor '{content}' in {location} is not a valid timestamp: {reason}")]
    Corrupt {
        location: String,
        content: String,
        reason: String,
    },

    /// Underlying storage failed.
    #[error("Cursor storage I/O failed for {location}: {source}")]
    Io {
        location: String,
        #[source]
        source: std::io::Error,
    },
}

/// Single-slot durable storage for the sync cursor.
#[async_trait]
pub trait CursorStore: Send + Sync {
    /// Read the stored cursor. `Ok(None)` means no sync has been committed yet.
    async fn read(&self) -> Result<Option<DateTime<Utc>>, CursorError>;

    /// Replace the stored cursor.
    async fn write(&self, cursor: DateTime<Utc>) -> Result<(), CursorError>;

    /// Human-readable location of the store, for logs.
    fn describe(&self) -> String;
}

/// Canonical text form of a cursor: UTC with a `Z` suffix and at least
/// millisecond precision. Sub-millisecond instants keep their extra digits so
/// the stored value reads back unchanged.
pub fn format_cursor(cursor: DateTime<Utc>) -> String {
    let precision = if cursor.timestamp_subsec_nanos() % 1_000_000 == 0 {
        SecondsFormat::Millis
    } else {
        SecondsFormat::AutoSi
    };
    cursor.to_rfc3339_opts(precision, true)
}

/// Parse stored cursor text.
///
/// Blank content counts as "no cursor", anything else must be RFC 3339.
pub fn parse_cursor(location: &str, raw: &str) -> Result<Option<DateTime<Utc>>, CursorError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    DateTime::parse_from_rfc3339(trimmed)
        .map(|dt| Some(dt.with_timezone(&Utc)))
        .map_err(|e| CursorError::Corrupt {
            location: location.to_string(),
            content: trimmed.to_string(),
            reason: e.to_string(),
        })
}
