//! HTTP surface for the order sync shim.

pub mod api;
pub mod metrics;
pub mod state;
