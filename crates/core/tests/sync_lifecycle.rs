//! Order sync lifecycle integration tests.
//!
//! These tests drive `OrderSync` through repeated attempts against a mock
//! shop and both cursor stores:
//! first run -> up to date -> stale -> processed -> ...

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tempfile::TempDir;

use shopsync_core::{
    testing::{fixtures, MockShop},
    AuthError, ClientCredentials, CursorStore, FileCursorStore, InMemoryCursorStore, OrderSync,
    SyncConfig, SyncError, SyncOutcome,
};

fn ts(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
}

/// Test helper bundling a sync with its collaborators.
struct TestHarness<S: CursorStore + 'static> {
    store: Arc<S>,
    shop: Arc<MockShop>,
    sync: Arc<OrderSync>,
}

impl<S: CursorStore + 'static> TestHarness<S> {
    fn new(store: S) -> Self {
        let store = Arc::new(store);
        let shop = Arc::new(MockShop::new());
        let sync = Arc::new(OrderSync::new(
            SyncConfig::default(),
            ClientCredentials::new("client", "secret"),
            Arc::clone(&store) as Arc<dyn CursorStore>,
            Arc::clone(&shop) as Arc<dyn shopsync_core::TokenProvider>,
            Arc::clone(&shop) as Arc<dyn shopsync_core::OrderFetcher>,
        ));
        Self { store, shop, sync }
    }
}

#[tokio::test]
async fn test_first_run_with_file_store_commits_newest() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("saved_timestamp.txt");
    let harness = TestHarness::new(FileCursorStore::new(&path));
    harness
        .shop
        .set_orders(vec![
            fixtures::order("o2", "2024-01-02T00:00:00Z"),
            fixtures::order("o1", "2024-01-01T00:00:00Z"),
        ])
        .await;

    let outcome = harness
        .sync
        .run_at(ts("2024-01-02T06:00:00Z"))
        .await
        .unwrap();

    let SyncOutcome::Processed { orders, new_cursor } = outcome else {
        panic!("expected Processed");
    };
    assert_eq!(
        orders.iter().map(|o| o.id.as_str()).collect::<Vec<_>>(),
        vec!["o1", "o2"]
    );
    assert_eq!(new_cursor, ts("2024-01-02T00:00:00Z"));
    assert_eq!(
        std::fs::read_to_string(&path).unwrap(),
        "2024-01-02T00:00:00.000Z"
    );
}

#[tokio::test]
async fn test_immediate_second_run_is_a_no_op() {
    let harness = TestHarness::new(InMemoryCursorStore::new());
    harness
        .shop
        .set_orders(vec![fixtures::order("o1", "2024-03-01T09:00:00Z")])
        .await;
    let now = ts("2024-03-01T10:00:00Z");

    let first = harness.sync.run_at(now).await.unwrap();
    assert!(matches!(first, SyncOutcome::Processed { .. }));
    harness.shop.clear_recorded().await;

    let second = harness.sync.run_at(now).await.unwrap();
    assert_eq!(second, SyncOutcome::UpToDate);
    assert_eq!(harness.shop.call_count().await, 0);
    assert_eq!(harness.store.write_count(), 1);
}

#[tokio::test]
async fn test_second_run_after_window_without_new_orders() {
    let harness = TestHarness::new(InMemoryCursorStore::new());
    harness
        .shop
        .set_orders(vec![fixtures::order("o1", "2024-03-01T09:00:00Z")])
        .await;

    harness
        .sync
        .run_at(ts("2024-03-01T10:00:00Z"))
        .await
        .unwrap();
    let later = harness
        .sync
        .run_at(ts("2024-03-03T10:00:00Z"))
        .await
        .unwrap();

    assert_eq!(later, SyncOutcome::NoNewOrders);
    assert_eq!(harness.store.write_count(), 1);
    assert_eq!(
        harness.store.read().await.unwrap(),
        Some(ts("2024-03-01T09:00:00Z"))
    );
}

#[tokio::test]
async fn test_cursor_is_monotonic_across_runs() {
    let harness = TestHarness::new(InMemoryCursorStore::new());
    let mut now = ts("2024-06-01T00:00:00Z");
    let mut previous: Option<DateTime<Utc>> = None;

    for day in 0..5 {
        let order_time = now - Duration::hours(1);
        harness
            .shop
            .add_order(fixtures::order_at(&format!("day{}", day), order_time))
            .await;

        let outcome = harness.sync.run_at(now).await.unwrap();
        let SyncOutcome::Processed { orders, new_cursor } = outcome else {
            panic!("expected Processed on day {}", day);
        };

        assert_eq!(orders.len(), 1, "only the new order is returned");
        if let Some(prev) = previous {
            assert!(new_cursor >= prev);
        }
        previous = Some(new_cursor);
        now += Duration::days(2);
    }

    assert_eq!(harness.store.write_count(), 5);
}

#[tokio::test]
async fn test_filter_boundary_keeps_only_strictly_newer() {
    let harness = TestHarness::new(InMemoryCursorStore::with_cursor(ts("2024-01-02T00:00:00Z")));
    harness
        .shop
        .set_orders(vec![
            fixtures::order("before", "2024-01-01T23:59:59Z"),
            fixtures::order("equal", "2024-01-02T00:00:00Z"),
            fixtures::order("after", "2024-01-02T00:00:01Z"),
        ])
        .await;

    let outcome = harness
        .sync
        .run_at(ts("2024-01-03T12:00:00Z"))
        .await
        .unwrap();

    let SyncOutcome::Processed { orders, new_cursor } = outcome else {
        panic!("expected Processed");
    };
    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0].id, "after");
    assert_eq!(new_cursor, ts("2024-01-02T00:00:01Z"));
}

#[tokio::test]
async fn test_stale_batch_is_fetched_again_next_time() {
    let harness = TestHarness::new(InMemoryCursorStore::new());
    harness
        .shop
        .set_orders(vec![fixtures::order("old", "2024-01-01T00:00:00Z")])
        .await;
    let now = ts("2024-01-03T00:00:00Z");

    assert_eq!(harness.sync.run_at(now).await.unwrap(), SyncOutcome::UpToDate);
    assert_eq!(harness.sync.run_at(now).await.unwrap(), SyncOutcome::UpToDate);

    assert_eq!(harness.shop.order_fetches().await, 2);
    assert_eq!(harness.store.read().await.unwrap(), None);
}

#[tokio::test]
async fn test_corrupt_file_fails_before_any_call() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("saved_timestamp.txt");
    std::fs::write(&path, "Invalid Date").unwrap();
    let harness = TestHarness::new(FileCursorStore::new(&path));

    let result = harness.sync.run_at(ts("2024-01-03T00:00:00Z")).await;

    assert!(matches!(result, Err(SyncError::CorruptState(_))));
    assert_eq!(harness.shop.call_count().await, 0);
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "Invalid Date");
}

#[tokio::test]
async fn test_auth_failure_aborts_before_fetch() {
    let harness = TestHarness::new(InMemoryCursorStore::new());
    harness
        .shop
        .set_next_auth_error(AuthError::Rejected {
            status: 401,
            message: "invalid_client".to_string(),
        })
        .await;

    let result = harness.sync.run_at(ts("2024-01-03T00:00:00Z")).await;

    assert!(matches!(result, Err(SyncError::Auth(_))));
    assert_eq!(harness.shop.token_requests().await, 1);
    assert_eq!(harness.shop.order_fetches().await, 0);
    assert_eq!(harness.store.write_count(), 0);
}

#[tokio::test]
async fn test_concurrent_runs_are_serialized() {
    let harness = TestHarness::new(InMemoryCursorStore::new());
    harness
        .shop
        .set_orders(vec![fixtures::order("o1", "2024-01-02T23:00:00Z")])
        .await;
    let now = ts("2024-01-03T00:00:00Z");

    let a = {
        let sync = Arc::clone(&harness.sync);
        tokio::spawn(async move { sync.run_at(now).await })
    };
    let b = {
        let sync = Arc::clone(&harness.sync);
        tokio::spawn(async move { sync.run_at(now).await })
    };

    let results = [a.await.unwrap().unwrap(), b.await.unwrap().unwrap()];
    let processed = results
        .iter()
        .filter(|r| matches!(r, SyncOutcome::Processed { .. }))
        .count();
    let up_to_date = results
        .iter()
        .filter(|r| **r == SyncOutcome::UpToDate)
        .count();

    assert_eq!(processed, 1);
    assert_eq!(up_to_date, 1);
    assert_eq!(harness.store.write_count(), 1);
    assert_eq!(harness.shop.order_fetches().await, 1);
}
