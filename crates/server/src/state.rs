use std::sync::Arc;
use shopsync_core::{Config, OrderProxy, OrderSync, SanitizedConfig};

/// Shared application state
pub struct AppState {
    config: Config,
    sync: Arc<OrderSync>,
    proxy: Arc<dyn OrderProxy>,
}

impl AppState {
    pub fn new(config: Config, sync: Arc<OrderSync>, proxy: Arc<dyn OrderProxy>) -> Self {
        Self {
            config,
            sync,
            proxy,
        }
    }

    pub fn sanitized_config(&self) -> SanitizedConfig {
        SanitizedConfig::from(&self.config)
    }

    pub fn sync(&self) -> &OrderSync {
        self.sync.as_ref()
    }

    pub fn proxy(&self) -> &dyn OrderProxy {
        self.proxy.as_ref()
    }
}
