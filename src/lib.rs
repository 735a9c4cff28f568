//! Agent Pool: Call Center Agent Configuration and Presence
//!
//! Loads agent definitions from `agents.conf`, keeps a registry of live
//! agents in step with the active configuration across reloads, and reports
//! each agent's presence through a device state provider.

pub mod agent;
pub mod cli;
pub mod config;
pub mod devstate;
pub mod error;
pub mod keyed;
pub mod logging;
pub mod pool;
pub mod reconcile;
pub mod watch;

pub use agent::{Agent, AgentLifecycle, AgentRegistry, ChannelHandle, DeviceState, LoginOverrides};
pub use config::{ConfigSnapshot, ConfigSource, ConfigStore};
pub use devstate::{DeviceStateProvider, PresenceService};
pub use error::{ConfigError, PoolError, PresenceError};
pub use keyed::Keyed;
pub use pool::AgentPool;
pub use reconcile::{ReconcileReport, ReconciliationEngine};
