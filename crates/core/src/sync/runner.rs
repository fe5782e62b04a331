//! Sync orchestrator implementation.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::Mutex;
use tracing::{debug, info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::config::SyncConfig;
use crate::cursor::{format_cursor, CursorStore};
use crate::metrics::{ORDERS_SYNCED, STALE_BATCHES_DROPPED, SYNC_ATTEMPTS};
use crate::shop::{ClientCredentials, Order, OrderFetcher, TokenProvider};

use super::types::{SyncError, SyncOutcome};

/// Drives one incremental sync attempt at a time against the shop.
pub struct OrderSync {
    config: SyncConfig,
    credentials: ClientCredentials,
    cursor_store: Arc<dyn CursorStore>,
    token_provider: Arc<dyn TokenProvider>,
    order_fetcher: Arc<dyn OrderFetcher>,
    /// Held across the cursor read..write span so concurrent callers cannot
    /// both commit from the same starting cursor.
    attempt_lock: Mutex<()>,
}

impl OrderSync {
    pub fn new(
        config: SyncConfig,
        credentials: ClientCredentials,
        cursor_store: Arc<dyn CursorStore>,
        token_provider: Arc<dyn TokenProvider>,
        order_fetcher: Arc<dyn OrderFetcher>,
    ) -> Self {
        Self {
            config,
            credentials,
            cursor_store,
            token_provider,
            order_fetcher,
            attempt_lock: Mutex::new(()),
        }
    }

    /// Run one sync attempt against the current wall clock.
    pub async fn run(&self) -> Result<SyncOutcome, SyncError> {
        self.run_at(Utc::now()).await
    }

    /// Run one sync attempt as if the current time were `now`.
    pub async fn run_at(&self, now: DateTime<Utc>) -> Result<SyncOutcome, SyncError> {
        let span = info_span!("order_sync", attempt = %Uuid::new_v4());
        let result = self.attempt(now).instrument(span).await;

        let label = match &result {
            Ok(outcome) => outcome.kind().as_str(),
            Err(_) => "failed",
        };
        SYNC_ATTEMPTS.with_label_values(&[label]).inc();

        result
    }

    /// The stored cursor, without starting an attempt.
    pub async fn current_cursor(&self) -> Result<Option<DateTime<Utc>>, SyncError> {
        self.cursor_store
            .read()
            .await
            .map_err(SyncError::CorruptState)
    }

    pub fn cursor_location(&self) -> String {
        self.cursor_store.describe()
    }

    async fn attempt(&self, now: DateTime<Utc>) -> Result<SyncOutcome, SyncError> {
        let _guard = self.attempt_lock.lock().await;

        let cursor = self
            .cursor_store
            .read()
            .await
            .map_err(SyncError::CorruptState)?;
        // A window reaching past the earliest representable instant makes
        // every stored cursor fresh.
        let stale_cutoff = now
            .checked_sub_signed(self.config.staleness_window())
            .unwrap_or(DateTime::<Utc>::MIN_UTC);

        debug!(
            cursor = ?cursor.map(format_cursor),
            stale_cutoff = %format_cursor(stale_cutoff),
            "Starting sync attempt"
        );

        if let Some(c) = cursor {
            if c >= stale_cutoff {
                info!(cursor = %format_cursor(c), "Cursor is fresh, skipping upstream");
                return Ok(SyncOutcome::UpToDate);
            }
        }

        let token = self
            .token_provider
            .acquire_token(&self.credentials)
            .await
            .inspect_err(|e| warn!(error = %e, "Token acquisition failed"))?;

        let orders = self
            .order_fetcher
            .fetch_all_orders(&token)
            .await
            .inspect_err(|e| warn!(error = %e, "Order fetch failed"))?;

        let fetched = orders.len();
        let batch = select_new_orders(orders, cursor);

        let Some(newest) = batch.last().map(|o| o.order_date_time) else {
            info!(fetched, "No new orders found");
            return Ok(SyncOutcome::NoNewOrders);
        };

        // TODO: decide whether a batch that is new relative to the cursor but
        // entirely older than the window should be committed instead of dropped.
        if newest < stale_cutoff {
            STALE_BATCHES_DROPPED.inc();
            warn!(
                fetched,
                dropped = batch.len(),
                newest = %format_cursor(newest),
                "New orders are all older than the staleness window, cursor not advanced"
            );
            return Ok(SyncOutcome::UpToDate);
        }

        self.cursor_store
            .write(newest)
            .await
            .map_err(SyncError::Store)?;

        ORDERS_SYNCED.inc_by(batch.len() as u64);
        info!(
            fetched,
            processed = batch.len(),
            new_cursor = %format_cursor(newest),
            "Orders processed"
        );

        Ok(SyncOutcome::Processed {
            orders: batch,
            new_cursor: newest,
        })
    }
}

/// Keep orders strictly newer than `cursor` (all of them when there is no
/// cursor), oldest first. Equal timestamps keep their upstream order.
pub fn select_new_orders(orders: Vec<Order>, cursor: Option<DateTime<Utc>>) -> Vec<Order> {
    let mut selected: Vec<Order> = match cursor {
        Some(c) => orders
            .into_iter()
            .filter(|o| o.order_date_time > c)
            .collect(),
        None => orders,
    };
    selected.sort_by_key(|o| o.order_date_time);
    selected
}
