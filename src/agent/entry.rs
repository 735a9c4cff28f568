//! A live agent in the pool.

use super::channel::ChannelHandle;
use super::overrides::{EffectiveParams, LoginOverrides};
use super::state::{AgentLifecycle, DeviceState};
use crate::config::AgentConfig;
use crate::error::PoolError;
use crate::keyed::Keyed;
use chrono::{DateTime, Utc};
use parking_lot::{Mutex, MutexGuard};
use std::sync::Arc;
use tracing::debug;

/// Mutable agent state, only reachable through [`Agent::lock`].
#[derive(Debug)]
pub struct AgentFields {
    config: Arc<AgentConfig>,
    overrides: LoginOverrides,
    state: DeviceState,
    channel: Option<ChannelHandle>,
    login_started: Option<DateTime<Utc>>,
    call_started: Option<DateTime<Utc>>,
    last_disconnect: Option<DateTime<Utc>>,
    /// Reconciliation scratch flag, false outside a pass.
    mark: bool,
    /// Config entry is gone; no new logins.
    dead: bool,
    /// Set by the bridging layer when it joined the login channel.
    joined_bridge: bool,
    /// Unlinked from the registry.
    unlinked: bool,
}

impl AgentFields {
    pub fn config(&self) -> &Arc<AgentConfig> {
        &self.config
    }

    pub fn overrides(&self) -> &LoginOverrides {
        &self.overrides
    }

    pub fn state(&self) -> DeviceState {
        self.state
    }

    pub fn channel(&self) -> Option<&ChannelHandle> {
        self.channel.as_ref()
    }

    pub fn is_logged_in(&self) -> bool {
        self.channel.is_some()
    }

    pub fn login_started(&self) -> Option<DateTime<Utc>> {
        self.login_started
    }

    pub fn call_started(&self) -> Option<DateTime<Utc>> {
        self.call_started
    }

    pub fn last_disconnect(&self) -> Option<DateTime<Utc>> {
        self.last_disconnect
    }

    pub fn is_marked(&self) -> bool {
        self.mark
    }

    pub fn is_dead(&self) -> bool {
        self.dead
    }

    pub fn joined_bridge(&self) -> bool {
        self.joined_bridge
    }

    pub fn set_joined_bridge(&mut self, joined: bool) {
        self.joined_bridge = joined;
    }

    pub fn lifecycle(&self) -> AgentLifecycle {
        if self.unlinked {
            AgentLifecycle::Removed
        } else if self.dead {
            AgentLifecycle::DeadButBusy
        } else {
            AgentLifecycle::Active
        }
    }

    pub fn effective_params(&self) -> EffectiveParams {
        EffectiveParams::resolve(&self.config, &self.overrides)
    }

    pub(crate) fn set_mark(&mut self, mark: bool) {
        self.mark = mark;
    }

    pub(crate) fn set_dead(&mut self, dead: bool) {
        self.dead = dead;
    }

    pub(crate) fn set_unlinked(&mut self) {
        self.unlinked = true;
    }

    /// Drop the login channel and reset the session fields.
    pub(crate) fn take_channel(&mut self) -> Option<ChannelHandle> {
        let channel = self.channel.take();
        if channel.is_some() {
            self.state = DeviceState::Unavailable;
            self.overrides = LoginOverrides::default();
            self.login_started = None;
            self.call_started = None;
            self.joined_bridge = false;
            self.last_disconnect = Some(Utc::now());
        }
        channel
    }
}

/// One operator in the pool.
///
/// The username never changes. Everything else lives behind the agent's own
/// lock; the registry lock only guards which agents are linked.
#[derive(Debug)]
pub struct Agent {
    username: String,
    fields: Mutex<AgentFields>,
}

impl Agent {
    /// Create an unavailable, logged out agent bound to `config`.
    pub fn new(config: Arc<AgentConfig>) -> Self {
        Self {
            username: config.username.clone(),
            fields: Mutex::new(AgentFields {
                config,
                overrides: LoginOverrides::default(),
                state: DeviceState::Unavailable,
                channel: None,
                login_started: None,
                call_started: None,
                last_disconnect: None,
                mark: false,
                dead: false,
                joined_bridge: false,
                unlinked: false,
            }),
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    /// Lock the agent's mutable fields.
    pub fn lock(&self) -> MutexGuard<'_, AgentFields> {
        self.fields.lock()
    }

    /// The config this agent was created from.
    pub fn config(&self) -> Arc<AgentConfig> {
        Arc::clone(&self.lock().config)
    }

    pub fn device_state(&self) -> DeviceState {
        self.lock().state
    }

    pub fn channel(&self) -> Option<ChannelHandle> {
        self.lock().channel.clone()
    }

    pub fn is_logged_in(&self) -> bool {
        self.lock().is_logged_in()
    }

    pub fn is_dead(&self) -> bool {
        self.lock().dead
    }

    pub fn lifecycle(&self) -> AgentLifecycle {
        self.lock().lifecycle()
    }

    pub fn effective_params(&self) -> EffectiveParams {
        self.lock().effective_params()
    }

    /// Log the agent in on `channel`.
    ///
    /// Dead agents and agents already holding a channel are refused.
    pub fn login(&self, channel: ChannelHandle, overrides: LoginOverrides) -> Result<(), PoolError> {
        let mut fields = self.lock();
        if fields.dead {
            return Err(PoolError::AgentDead(self.username.clone()));
        }
        if fields.channel.is_some() {
            return Err(PoolError::AlreadyLoggedIn(self.username.clone()));
        }
        debug!(agent = %self.username, channel = channel.name(), "Agent logged in");
        fields.channel = Some(channel);
        fields.overrides = overrides;
        fields.state = DeviceState::NotInUse;
        fields.login_started = Some(Utc::now());
        Ok(())
    }

    /// A call was bridged to the agent.
    pub fn begin_call(&self) -> Result<(), PoolError> {
        let mut fields = self.lock();
        if fields.channel.is_none() {
            return Err(PoolError::NotLoggedIn(self.username.clone()));
        }
        fields.state = DeviceState::InUse;
        fields.call_started = Some(Utc::now());
        Ok(())
    }

    /// The current call ended; the agent is idle but still logged in.
    pub fn end_call(&self) -> Result<(), PoolError> {
        let mut fields = self.lock();
        if fields.channel.is_none() {
            return Err(PoolError::NotLoggedIn(self.username.clone()));
        }
        fields.state = DeviceState::NotInUse;
        fields.call_started = None;
        fields.last_disconnect = Some(Utc::now());
        Ok(())
    }
}

impl Keyed for Agent {
    fn key(&self) -> &str {
        &self.username
    }
}
