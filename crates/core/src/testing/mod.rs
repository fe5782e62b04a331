//! Testing utilities and mock implementations.
//!
//! This module provides a mock of the upstream shop API, allowing the sync
//! and the HTTP surface to be tested without a real shop.
//!
//! # Example
//!
//! ```rust,ignore
//! use shopsync_core::testing::{fixtures, MockShop};
//!
//! let shop = MockShop::new();
//! shop.set_orders(vec![fixtures::order("o1", "2024-01-02T00:00:00Z")]).await;
//!
//! // Use as TokenProvider + OrderFetcher in OrderSync...
//! ```

mod mock_shop;

pub use mock_shop::{MockShop, RecordedShopCall};

/// Test fixtures and helper functions.
pub mod fixtures {
    use chrono::{DateTime, Utc};
    use serde_json::json;

    use crate::shop::Order;

    /// Create an order at an RFC 3339 timestamp.
    ///
    /// Panics on an invalid timestamp.
    pub fn order(id: &str, order_date_time: &str) -> Order {
        let ts = DateTime::parse_from_rfc3339(order_date_time)
            .unwrap_or_else(|e| panic!("invalid fixture timestamp {}: {}", order_date_time, e))
            .with_timezone(&Utc);
        let mut order = Order::new(id, ts);
        order
            .extra
            .insert("orderNumber".to_string(), json!(format!("1{}", id)));
        order
    }

    /// Create an order at an exact instant.
    pub fn order_at(id: &str, order_date_time: DateTime<Utc>) -> Order {
        Order::new(id, order_date_time)
    }
}
