//! Service settings: where `agents.conf` lives, provider name, watch and logging.
//!
//! Precedence: defaults (lowest) -> settings file -> `AGENT_POOL__*` environment (highest).

use crate::error::ConfigError;
use crate::logging::LoggingConfig;
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Name the agent device-state provider registers under.
pub const DEFAULT_PROVIDER_NAME: &str = "Agent";

fn default_agents_file() -> PathBuf {
    PathBuf::from("agents.conf")
}

fn default_provider_name() -> String {
    DEFAULT_PROVIDER_NAME.to_string()
}

fn default_debounce_ms() -> u64 {
    250
}

/// Config file watch settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WatchSettings {
    /// Quiet period after the last change before a reload runs.
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
}

impl Default for WatchSettings {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
        }
    }
}

/// Top-level service settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PoolSettings {
    /// Path to the agents configuration file.
    #[serde(default = "default_agents_file")]
    pub agents_file: PathBuf,

    /// Presence provider name, devices are addressed as `<name>:<agent>`.
    #[serde(default = "default_provider_name")]
    pub provider_name: String,

    #[serde(default)]
    pub watch: WatchSettings,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for PoolSettings {
    fn default() -> Self {
        Self {
            agents_file: default_agents_file(),
            provider_name: default_provider_name(),
            watch: WatchSettings::default(),
            logging: LoggingConfig::default(),
        }
    }
}

/// Loads [`PoolSettings`] from a settings file and the environment.
pub struct SettingsLoader;

impl SettingsLoader {
    /// Load settings, optionally from a specific file, with environment overlay.
    pub fn load(path: Option<&Path>) -> Result<PoolSettings, ConfigError> {
        let mut builder = builder_with_defaults()?;
        if let Some(path) = path {
            builder = builder.add_source(File::from(path).required(true));
        }
        let builder = add_environment(builder, "AGENT_POOL");
        let settings = builder.build()?;
        Ok(settings.try_deserialize()?)
    }
}

fn builder_with_defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    let builder = Config::builder()
        .set_default("provider_name", DEFAULT_PROVIDER_NAME)?
        .set_default("watch.debounce_ms", default_debounce_ms())?;
    Ok(builder)
}

/// Environment overlay with `__` as the separator for nested keys.
fn add_environment(builder: ConfigBuilder<DefaultState>, prefix: &str) -> ConfigBuilder<DefaultState> {
    builder.add_source(
        Environment::with_prefix(prefix)
            .separator("__")
            .try_parsing(true),
    )
}
