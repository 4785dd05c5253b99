//! Application state shared across all request handlers.

use crate::config::runtime::SharedConfig;
use crate::storage::ConfigurationEntity;
use sermepa_core::config::ConfigStore;
use sermepa_sdk::gateway::GatewayCatalog;
use std::sync::Arc;

/// Application state that is shared across all request handlers.
///
/// This is cloneable and cheap to pass around (everything is behind Arc).
#[derive(Clone)]
pub struct AppState {
    /// Server and admin configuration (can be reloaded via SIGHUP).
    pub config: SharedConfig,
    /// The payment method configuration entity being administered.
    pub entity: ConfigStore<ConfigurationEntity>,
    /// Field limits and option lists of the payment gateway.
    pub catalog: Arc<dyn GatewayCatalog + Send + Sync>,
}

impl AppState {
    pub fn new(
        config: SharedConfig,
        entity: ConfigStore<ConfigurationEntity>,
        catalog: Arc<dyn GatewayCatalog + Send + Sync>,
    ) -> Self {
        Self {
            config,
            entity,
            catalog,
        }
    }
}
