//! Device state providers and the presence service that routes queries to them.
//!
//! Subscribers ask for a device such as `Agent:1001`. The part before the
//! colon names a provider, the rest is handed to that provider.

use crate::agent::{AgentRegistry, DeviceState};
use crate::error::PresenceError;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info};

/// Answers presence for devices under one provider name.
pub trait DeviceStateProvider: Send + Sync {
    fn device_state(&self, device: &str) -> DeviceState;
}

/// Presence of pool agents, read from the registry.
pub struct AgentDeviceStateProvider {
    registry: Arc<AgentRegistry>,
}

impl AgentDeviceStateProvider {
    pub fn new(registry: Arc<AgentRegistry>) -> Self {
        Self { registry }
    }
}

impl DeviceStateProvider for AgentDeviceStateProvider {
    fn device_state(&self, agent_id: &str) -> DeviceState {
        match self.registry.find_by_username(agent_id) {
            Some(agent) => agent.device_state(),
            None => DeviceState::Invalid,
        }
    }
}

/// Registry of device state providers keyed by provider name.
#[derive(Default)]
pub struct PresenceService {
    providers: RwLock<HashMap<String, Arc<dyn DeviceStateProvider>>>,
}

impl PresenceService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a provider. Names are unique.
    pub fn add_provider(
        &self,
        name: &str,
        provider: Arc<dyn DeviceStateProvider>,
    ) -> Result<(), PresenceError> {
        if name.is_empty() {
            return Err(PresenceError::EmptyProviderName);
        }
        let mut providers = self.providers.write();
        if providers.contains_key(name) {
            return Err(PresenceError::DuplicateProvider(name.to_string()));
        }
        providers.insert(name.to_string(), provider);
        info!(provider = name, "Registered device state provider");
        Ok(())
    }

    /// Unregister a provider. Returns false if it was not registered.
    pub fn remove_provider(&self, name: &str) -> bool {
        let removed = self.providers.write().remove(name).is_some();
        if removed {
            info!(provider = name, "Removed device state provider");
        }
        removed
    }

    pub fn has_provider(&self, name: &str) -> bool {
        self.providers.read().contains_key(name)
    }

    /// Query `<provider>:<device>`. Unknown providers and malformed devices are invalid.
    pub fn query(&self, device: &str) -> DeviceState {
        let Some((name, id)) = device.split_once(':') else {
            debug!(device, "Malformed device string");
            return DeviceState::Invalid;
        };
        let provider = self.providers.read().get(name).cloned();
        match provider {
            Some(provider) => provider.device_state(id),
            None => DeviceState::Invalid,
        }
    }
}
