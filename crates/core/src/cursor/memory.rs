//! In-memory cursor store.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use super::{format_cursor, parse_cursor, CursorError, CursorStore};

/// Cursor store backed by a string slot in memory.
///
/// Holds the same text a file store would, so raw content can be seeded to
/// exercise corruption handling.
#[derive(Debug, Default)]
pub struct InMemoryCursorStore {
    slot: RwLock<Option<String>>,
    writes: AtomicUsize,
}

impl InMemoryCursorStore {
    /// Create an empty store (no cursor).
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store holding the given cursor.
    pub fn with_cursor(cursor: DateTime<Utc>) -> Self {
        Self::with_raw(format_cursor(cursor))
    }

    /// Create a store holding arbitrary raw content.
    pub fn with_raw(raw: impl Into<String>) -> Self {
        Self {
            slot: RwLock::new(Some(raw.into())),
            writes: AtomicUsize::new(0),
        }
    }

    /// Raw stored text, if any.
    pub async fn raw(&self) -> Option<String> {
        self.slot.read().await.clone()
    }

    /// Number of successful writes since creation.
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CursorStore for InMemoryCursorStore {
    async fn read(&self) -> Result<Option<DateTime<Utc>>, CursorError> {
        match self.slot.read().await.as_deref() {
            Some(raw) => parse_cursor(&self.describe(), raw),
            None => Ok(None),
        }
    }

    async fn write(&self, cursor: DateTime<Utc>) -> Result<(), CursorError> {
        *self.slot.write().await = Some(format_cursor(cursor));
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn describe(&self) -> String {
        "memory".to_string()
    }
}
