//! CLI Tooling
//!
//! Command-line interface for checking, inspecting and watching an agents
//! configuration file.

use crate::agent::{AgentInfoItem, AgentLifecycle, AgentSummary};
use crate::config::{ConfigSource, ConfigStore, PoolSettings, SettingsLoader};
use crate::devstate::PresenceService;
use crate::error::PoolError;
use crate::pool::AgentPool;
use crate::watch::ConfigWatcher;
use clap::{Parser, Subcommand, ValueEnum};
use serde_json::json;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

/// Agent pool CLI - load, inspect and watch call center agent configuration
#[derive(Parser)]
#[command(name = "agent-pool")]
#[command(about = "Call center agent pool configuration tool")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Settings file path (TOML)
    #[arg(long, global = true)]
    pub settings: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long, global = true)]
    pub log_format: Option<String>,

    /// Log output (stdout, stderr, file, file+stderr, both)
    #[arg(long, global = true)]
    pub log_output: Option<String>,

    /// Log file path (if output includes "file")
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Validate an agents configuration file
    Check {
        /// Agents file (defaults to the settings' agents_file)
        file: Option<PathBuf>,
    },
    /// List configured agents and their state
    Show {
        /// Agents file (defaults to the settings' agents_file)
        file: Option<PathBuf>,
        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// Query one item of one agent (status, password, name, mohclass, channel, fullchannel)
    Query {
        /// Agents file
        file: PathBuf,
        /// Agent username
        agent: String,
        /// Item to read (default: status)
        item: Option<String>,
    },
    /// Load the file and reload it whenever it changes
    Watch {
        /// Agents file (defaults to the settings' agents_file)
        file: Option<PathBuf>,
        /// Debounce window in milliseconds (overrides settings)
        #[arg(long)]
        debounce_ms: Option<u64>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

impl Cli {
    /// Fold the global logging flags into loaded settings.
    pub fn apply_overrides(&self, settings: &mut PoolSettings) {
        if let Some(level) = &self.log_level {
            settings.logging.level = level.clone();
        }
        if let Some(format) = &self.log_format {
            settings.logging.format = format.clone();
        }
        if let Some(output) = &self.log_output {
            settings.logging.output = output.clone();
        }
        if let Some(file) = &self.log_file {
            settings.logging.file = Some(file.clone());
        }
    }
}

/// Settings plus command dispatch.
pub struct CliContext {
    settings: PoolSettings,
}

impl CliContext {
    pub fn new(settings: PoolSettings) -> Self {
        Self { settings }
    }

    /// Load settings for `cli` and apply its logging flags.
    pub fn from_cli(cli: &Cli) -> Result<Self, PoolError> {
        let mut settings = SettingsLoader::load(cli.settings.as_deref())?;
        cli.apply_overrides(&mut settings);
        Ok(Self::new(settings))
    }

    pub fn settings(&self) -> &PoolSettings {
        &self.settings
    }

    pub fn execute(&self, command: &Commands) -> Result<String, PoolError> {
        match command {
            Commands::Check { file } => {
                let path = self.agents_file(file.as_deref());
                let snapshot = ConfigStore::load(&ConfigSource::file(path))?;
                Ok(format!(
                    "{}: {} agent(s) configured",
                    path.display(),
                    snapshot.len()
                ))
            }
            Commands::Show { file, format } => {
                let path = self.agents_file(file.as_deref());
                let pool = self.start_pool(path)?;
                let summaries = pool.summaries();
                pool.shutdown();
                match format {
                    OutputFormat::Text => Ok(format_summaries_text(&summaries)),
                    OutputFormat::Json => Ok(serde_json::to_string_pretty(&json!({
                        "file": path.display().to_string(),
                        "agents": summaries,
                    }))?),
                }
            }
            Commands::Query { file, agent, item } => {
                let item: AgentInfoItem = item.as_deref().unwrap_or("").parse()?;
                let pool = self.start_pool(file)?;
                let value = pool.agent_info(agent, item)?;
                pool.shutdown();
                Ok(value)
            }
            Commands::Watch { file, debounce_ms } => {
                let path = self.agents_file(file.as_deref());
                let mut watch = self.settings.watch.clone();
                if let Some(ms) = debounce_ms {
                    watch.debounce_ms = *ms;
                }
                let pool = Arc::new(self.start_pool(path)?);
                info!(agents = pool.registry().len(), "Initial configuration loaded");
                ConfigWatcher::new(Arc::clone(&pool), path, &watch).run()?;
                Ok(format!("Stopped watching {}", path.display()))
            }
        }
    }

    fn agents_file<'a>(&'a self, file: Option<&'a Path>) -> &'a Path {
        file.unwrap_or(&self.settings.agents_file)
    }

    fn start_pool(&self, path: &Path) -> Result<AgentPool, PoolError> {
        AgentPool::start_with_provider(
            &ConfigSource::file(path),
            Arc::new(PresenceService::new()),
            &self.settings.provider_name,
        )
    }
}

fn lifecycle_label(lifecycle: AgentLifecycle) -> &'static str {
    match lifecycle {
        AgentLifecycle::Active => "active",
        AgentLifecycle::DeadButBusy => "dead (busy)",
        AgentLifecycle::Removed => "removed",
    }
}

/// Render agent summaries as a table.
pub fn format_summaries_text(summaries: &[AgentSummary]) -> String {
    if summaries.is_empty() {
        return "No agents configured.".to_string();
    }
    use comfy_table::Table;
    let mut table = Table::new();
    table.load_preset(comfy_table::presets::UTF8_FULL);
    table.set_header(vec!["Agent", "Name", "Groups", "State", "Lifecycle", "Channel"]);
    for s in summaries {
        table.add_row(vec![
            s.username.clone(),
            s.full_name.clone(),
            s.groups.clone(),
            s.state.to_string(),
            lifecycle_label(s.lifecycle).to_string(),
            s.channel.clone().unwrap_or_else(|| "-".to_string()),
        ]);
    }
    table.to_string()
}
