//! Agent configuration: records, snapshots, the published store and service settings.

pub mod agent;
pub mod group;
pub mod parser;
pub mod settings;
pub mod snapshot;
pub mod store;

pub use agent::{normalize_save_calls_in, AgentConfig, AgentOption};
pub use group::GroupMask;
pub use settings::{PoolSettings, SettingsLoader, WatchSettings, DEFAULT_PROVIDER_NAME};
pub use snapshot::{ConfigSnapshot, GENERAL_SECTION};
pub use store::{ConfigSource, ConfigStore};
