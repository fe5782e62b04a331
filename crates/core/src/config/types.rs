use serde::{Deserialize, Serialize};
use std::net::IpAddr;
use std::path::PathBuf;

use crate::shop::ClientCredentials;

/// Root configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub shop: ShopConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub cursor: CursorConfig,
    #[serde(default)]
    pub sync: SyncConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: IpAddr,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> IpAddr {
    IpAddr::V4(std::net::Ipv4Addr::UNSPECIFIED)
}

fn default_port() -> u16 {
    3000
}

/// Upstream shop API configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ShopConfig {
    /// Shop base URL (e.g., "https://shop.example.com")
    pub base_url: String,
    /// Sales channel access key, sent as the `sw-access` header
    pub access_key: String,
    /// OAuth client id for the client-credentials grant
    pub client_id: String,
    /// OAuth client secret for the client-credentials grant
    pub client_secret: String,
    /// Pre-issued bearer token for the proxy routes.
    /// When unset, the proxy routes request a fresh token per call.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub static_token: Option<String>,
    /// Timeout applied to every upstream request, in seconds (default: 30)
    #[serde(default = "default_timeout")]
    pub timeout_secs: u32,
}

impl ShopConfig {
    pub fn credentials(&self) -> ClientCredentials {
        ClientCredentials::new(self.client_id.clone(), self.client_secret.clone())
    }
}

fn default_timeout() -> u32 {
    30
}

/// Cursor storage configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CursorConfig {
    #[serde(default = "default_cursor_path")]
    pub path: PathBuf,
}

impl Default for CursorConfig {
    fn default() -> Self {
        Self {
            path: default_cursor_path(),
        }
    }
}

fn default_cursor_path() -> PathBuf {
    PathBuf::from("saved_timestamp.txt")
}

/// Sync orchestration configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SyncConfig {
    /// Minimum age of the cursor before a new upstream sync is attempted.
    #[serde(default = "default_staleness_window")]
    pub staleness_window_hours: u32,
}

impl SyncConfig {
    pub fn staleness_window(&self) -> chrono::Duration {
        chrono::Duration::hours(i64::from(self.staleness_window_hours))
    }
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            staleness_window_hours: default_staleness_window(),
        }
    }
}

fn default_staleness_window() -> u32 {
    24
}

/// Sanitized config for API responses (secrets redacted)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedConfig {
    pub server: ServerConfig,
    pub shop: SanitizedShopConfig,
    pub cursor: CursorConfig,
    pub sync: SyncConfig,
}

/// Sanitized shop config (keys and secrets hidden)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedShopConfig {
    pub base_url: String,
    pub client_id: String,
    pub access_key_configured: bool,
    pub client_secret_configured: bool,
    pub static_token_configured: bool,
    pub timeout_secs: u32,
}

impl From<&Config> for SanitizedConfig {
    fn from(config: &Config) -> Self {
        Self {
            server: config.server.clone(),
            shop: SanitizedShopConfig {
                base_url: config.shop.base_url.clone(),
                client_id: config.shop.client_id.clone(),
                access_key_configured: !config.shop.access_key.is_empty(),
                client_secret_configured: !config.shop.client_secret.is_empty(),
                static_token_configured: config
                    .shop
                    .static_token
                    .as_ref()
                    .is_some_and(|t| !t.is_empty()),
                timeout_secs: config.shop.timeout_secs,
            },
            cursor: config.cursor.clone(),
            sync: config.sync.clone(),
        }
    }
}
