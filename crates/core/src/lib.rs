pub mod config;
pub mod cursor;
pub mod metrics;
pub mod shop;
pub mod sync;
pub mod testing;

pub use config::{
    load_config, load_config_from_str, validate_config, Config, ConfigError, CursorConfig,
    SanitizedConfig, ServerConfig, ShopConfig, SyncConfig,
};
pub use cursor::{format_cursor, CursorError, CursorStore, FileCursorStore, InMemoryCursorStore};
pub use shop::{
    AccessToken, AuthError, ClientCredentials, FetchError, Order, OrderFetcher, OrderProxy,
    ShopwareClient, TokenProvider,
};
pub use sync::{OrderSync, SyncError, SyncKind, SyncOutcome, SyncReport};
