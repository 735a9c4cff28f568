//! The agent pool: configuration store, agent registry and presence hook
//! owned together, with load, reload and teardown.

use crate::agent::{
    agent_info, Agent, AgentInfoItem, AgentRegistry, AgentSummary, ChannelHandle, DeviceState,
    LoginOverrides,
};
use crate::config::{ConfigSnapshot, ConfigSource, ConfigStore, DEFAULT_PROVIDER_NAME};
use crate::devstate::{AgentDeviceStateProvider, PresenceService};
use crate::error::PoolError;
use crate::reconcile::{ReconcileReport, ReconciliationEngine};
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::{error, info, warn};

/// Owned pool state.
///
/// Created by [`AgentPool::start`], torn down by [`AgentPool::shutdown`] or
/// drop, which also unregisters the device state provider.
pub struct AgentPool {
    config: ConfigStore,
    registry: Arc<AgentRegistry>,
    presence: Arc<PresenceService>,
    provider_name: String,
    /// Serializes reloads.
    reload_lock: Mutex<()>,
}

impl AgentPool {
    /// Load the initial configuration and register the `Agent` provider.
    pub fn start(source: &ConfigSource, presence: Arc<PresenceService>) -> Result<Self, PoolError> {
        Self::start_with_provider(source, presence, DEFAULT_PROVIDER_NAME)
    }

    /// Like [`AgentPool::start`] with a custom provider name.
    ///
    /// Any configuration error aborts startup before a registry exists.
    pub fn start_with_provider(
        source: &ConfigSource,
        presence: Arc<PresenceService>,
        provider_name: &str,
    ) -> Result<Self, PoolError> {
        let snapshot = ConfigStore::load(source).map_err(|e| {
            error!(error = %e, "Unable to load agent configuration");
            e
        })?;

        let config = ConfigStore::new();
        let registry = Arc::new(AgentRegistry::new());
        let published = config.publish(snapshot);
        ReconciliationEngine::reconcile(&published, &registry);

        presence.add_provider(
            provider_name,
            Arc::new(AgentDeviceStateProvider::new(Arc::clone(&registry))),
        )?;

        info!(agents = registry.len(), provider = provider_name, "Agent pool started");
        Ok(Self {
            config,
            registry,
            presence,
            provider_name: provider_name.to_string(),
            reload_lock: Mutex::new(()),
        })
    }

    /// Reload configuration and reconcile the registry.
    ///
    /// On error the active configuration and registry are left as they were.
    pub fn reload(&self, source: &ConfigSource) -> Result<ReconcileReport, PoolError> {
        let _guard = self.reload_lock.lock();
        let snapshot = match ConfigStore::load(source) {
            Ok(snapshot) => snapshot,
            Err(e) => {
                warn!(error = %e, "Reload failed, keeping current agent configuration");
                return Err(e.into());
            }
        };
        let published = self.config.publish(snapshot);
        Ok(ReconciliationEngine::reconcile(&published, &self.registry))
    }

    /// Tear the pool down.
    pub fn shutdown(self) {
        info!(agents = self.registry.len(), "Agent pool shutting down");
    }

    pub fn registry(&self) -> &Arc<AgentRegistry> {
        &self.registry
    }

    pub fn config_store(&self) -> &ConfigStore {
        &self.config
    }

    pub fn current_config(&self) -> Arc<ConfigSnapshot> {
        self.config.current()
    }

    pub fn provider_name(&self) -> &str {
        &self.provider_name
    }

    pub fn agent(&self, username: &str) -> Result<Arc<Agent>, PoolError> {
        self.registry
            .find_by_username(username)
            .ok_or_else(|| PoolError::UnknownAgent(username.to_string()))
    }

    /// Presence of an agent as subscribers see it.
    pub fn device_state(&self, username: &str) -> DeviceState {
        self.presence
            .query(&format!("{}:{}", self.provider_name, username))
    }

    pub fn agent_info(&self, username: &str, item: AgentInfoItem) -> Result<String, PoolError> {
        let agent = self.agent(username)?;
        Ok(agent_info(&agent, item))
    }

    /// Summaries of every linked agent in username order.
    pub fn summaries(&self) -> Vec<AgentSummary> {
        self.registry
            .list()
            .iter()
            .map(|agent| AgentSummary::of(agent))
            .collect()
    }

    /// Log an agent in on `channel`.
    pub fn login(
        &self,
        username: &str,
        channel: ChannelHandle,
        overrides: LoginOverrides,
    ) -> Result<Arc<Agent>, PoolError> {
        let agent = self.agent(username)?;
        agent.login(channel, overrides)?;
        Ok(agent)
    }

    /// Log an agent off. Dead agents are removed from the pool.
    pub fn logoff(&self, username: &str) -> Result<ChannelHandle, PoolError> {
        let agent = self.agent(username)?;
        self.registry
            .logoff(&agent)
            .ok_or_else(|| PoolError::NotLoggedIn(username.to_string()))
    }
}

impl Drop for AgentPool {
    fn drop(&mut self) {
        self.presence.remove_provider(&self.provider_name);
    }
}
