use super::{types::Config, ConfigError};

/// Upper bound for `sync.staleness_window_hours` (one year).
pub const MAX_STALENESS_WINDOW_HOURS: u32 = 24 * 365;

/// Validate configuration
/// Currently validates:
/// - Shop section exists (enforced by serde)
/// - Server port is not 0
/// - Shop base URL is http(s) and credentials are present
/// - Timeouts are non-zero
/// - The staleness window is between 1 hour and one year
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "server.port cannot be 0".to_string(),
        ));
    }

    let base_url = config.shop.base_url.trim();
    if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
        return Err(ConfigError::ValidationError(format!(
            "shop.base_url must be an http(s) URL, got '{}'",
            config.shop.base_url
        )));
    }

    if config.shop.client_id.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "shop.client_id cannot be empty".to_string(),
        ));
    }

    if config.shop.client_secret.is_empty() {
        return Err(ConfigError::ValidationError(
            "shop.client_secret cannot be empty".to_string(),
        ));
    }

    if config.shop.timeout_secs == 0 {
        return Err(ConfigError::ValidationError(
            "shop.timeout_secs must be greater than 0".to_string(),
        ));
    }

    if config.sync.staleness_window_hours == 0 {
        return Err(ConfigError::ValidationError(
            "sync.staleness_window_hours must be greater than 0".to_string(),
        ));
    }

    if config.sync.staleness_window_hours > MAX_STALENESS_WINDOW_HOURS {
        return Err(ConfigError::ValidationError(format!(
            "sync.staleness_window_hours cannot exceed {}, got {}",
            MAX_STALENESS_WINDOW_HOURS, config.sync.staleness_window_hours
        )));
    }

    Ok(())
}
