//! Immutable, validated set of agent configurations.

use super::agent::AgentConfig;
use super::parser::{parse_sections, RawSection};
use crate::error::ConfigError;
use crate::keyed::Keyed;
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::ops::Bound;
use std::sync::Arc;

/// Section reserved for global settings. Accepted but carries no options.
pub const GENERAL_SECTION: &str = "general";

/// Section names that can never name an agent.
pub const RESERVED_SECTIONS: &[&str] = &[GENERAL_SECTION, "agents"];

/// A point-in-time set of agent configurations, unique and ordered by username.
///
/// Snapshots are shared behind `Arc`; a superseded snapshot stays valid for
/// as long as anyone still holds it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigSnapshot {
    agents: BTreeMap<String, Arc<AgentConfig>>,
}

impl ConfigSnapshot {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Parse and validate `agents.conf` text.
    pub fn parse(text: &str) -> Result<Self, ConfigError> {
        Self::from_sections(parse_sections(text)?)
    }

    /// Build agent records from parsed sections.
    pub fn from_sections(sections: Vec<RawSection>) -> Result<Self, ConfigError> {
        let mut agents = BTreeMap::new();
        let mut seen_general = false;

        for section in sections {
            if section.name == GENERAL_SECTION {
                if seen_general {
                    return Err(ConfigError::DuplicateSection {
                        line: section.line,
                        section: section.name,
                    });
                }
                seen_general = true;
                if let Some(option) = section.options.first() {
                    return Err(ConfigError::UnknownOption {
                        line: option.line,
                        section: section.name.clone(),
                        key: option.key.clone(),
                    });
                }
                continue;
            }
            if RESERVED_SECTIONS.contains(&section.name.as_str()) {
                return Err(ConfigError::ReservedSection {
                    line: section.line,
                    section: section.name,
                });
            }

            let mut cfg = AgentConfig::new(section.name.as_str());
            for option in &section.options {
                cfg.apply_option(&option.key, &option.value, option.line)?;
            }
            if agents.contains_key(&cfg.username) {
                return Err(ConfigError::DuplicateAgent(cfg.username));
            }
            agents.insert(cfg.username.clone(), Arc::new(cfg));
        }

        Ok(Self { agents })
    }

    /// Build a snapshot from ready-made records, rejecting duplicate usernames.
    pub fn from_configs<I>(configs: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = AgentConfig>,
    {
        let mut agents = BTreeMap::new();
        for cfg in configs {
            if agents.contains_key(&cfg.username) {
                return Err(ConfigError::DuplicateAgent(cfg.username));
            }
            agents.insert(cfg.username.clone(), Arc::new(cfg));
        }
        Ok(Self { agents })
    }

    /// Exact username lookup.
    pub fn get(&self, username: &str) -> Option<Arc<AgentConfig>> {
        self.agents.get(username).cloned()
    }

    /// All records whose username starts with `prefix`, in key order.
    pub fn find_prefix(&self, prefix: &str) -> Vec<Arc<AgentConfig>> {
        self.agents
            .range::<str, _>((Bound::Included(prefix), Bound::Unbounded))
            .map(|(_, cfg)| cfg)
            .take_while(|cfg| cfg.compare_by_prefix(prefix) == Ordering::Equal)
            .cloned()
            .collect()
    }

    /// Records in username order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<AgentConfig>> {
        self.agents.values()
    }

    pub fn usernames(&self) -> Vec<String> {
        self.agents.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }
}
