//! Live Agents
//!
//! Agents are the pool entries operators log in to. Each one carries its own
//! lock for session state; the registry tracks which agents are linked and
//! supports lookup by username, username prefix or login channel.

pub mod channel;
pub mod entry;
pub mod info;
pub mod overrides;
pub mod registry;
pub mod state;

pub use channel::ChannelHandle;
pub use entry::{Agent, AgentFields};
pub use info::{agent_info, AgentInfoItem, AgentSummary};
pub use overrides::{EffectiveParams, LoginOverrides, OverrideFlags};
pub use registry::AgentRegistry;
pub use state::{AgentLifecycle, DeviceState};
