//! Incremental order sync.
//!
//! One attempt reads the cursor, skips the upstream entirely while the cursor
//! is younger than the staleness window, otherwise fetches every order, keeps
//! those strictly newer than the cursor (oldest first) and commits the newest
//! timestamp as the next cursor.

mod runner;
mod types;

pub use runner::{select_new_orders, OrderSync};
pub use types::{SyncError, SyncFailure, SyncKind, SyncOutcome, SyncReport};
