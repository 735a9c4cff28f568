//! Read-only views of agents for queries and listings.

use super::entry::Agent;
use super::state::{AgentLifecycle, DeviceState};
use crate::error::PoolError;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::str::FromStr;

/// Items answerable about a single agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgentInfoItem {
    /// `LOGGEDIN` or `LOGGEDOUT`.
    Status,
    Password,
    Name,
    MohClass,
    /// Login channel name without its unique suffix.
    Channel,
    FullChannel,
}

impl FromStr for AgentInfoItem {
    type Err = PoolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "status" => Ok(AgentInfoItem::Status),
            "password" => Ok(AgentInfoItem::Password),
            "name" => Ok(AgentInfoItem::Name),
            "mohclass" => Ok(AgentInfoItem::MohClass),
            "channel" => Ok(AgentInfoItem::Channel),
            "fullchannel" => Ok(AgentInfoItem::FullChannel),
            other => Err(PoolError::InvalidField(other.to_string())),
        }
    }
}

/// Answer one info item. Channel items are empty when logged out.
pub fn agent_info(agent: &Agent, item: AgentInfoItem) -> String {
    let fields = agent.lock();
    match item {
        AgentInfoItem::Status => {
            if fields.is_logged_in() {
                "LOGGEDIN".to_string()
            } else {
                "LOGGEDOUT".to_string()
            }
        }
        AgentInfoItem::Password => fields.config().password.clone(),
        AgentInfoItem::Name => fields.config().full_name.clone(),
        AgentInfoItem::MohClass => fields.config().moh.clone(),
        AgentInfoItem::Channel => fields
            .channel()
            .map(|c| c.base_name().to_string())
            .unwrap_or_default(),
        AgentInfoItem::FullChannel => fields
            .channel()
            .map(|c| c.name().to_string())
            .unwrap_or_default(),
    }
}

/// Point-in-time summary of an agent for listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AgentSummary {
    pub username: String,
    pub full_name: String,
    pub state: DeviceState,
    pub lifecycle: AgentLifecycle,
    pub channel: Option<String>,
    pub groups: String,
    pub login_started: Option<DateTime<Utc>>,
    pub call_started: Option<DateTime<Utc>>,
    pub last_disconnect: Option<DateTime<Utc>>,
}

impl AgentSummary {
    pub fn of(agent: &Agent) -> Self {
        let fields = agent.lock();
        Self {
            username: agent.username().to_string(),
            full_name: fields.config().full_name.clone(),
            state: fields.state(),
            lifecycle: fields.lifecycle(),
            channel: fields.channel().map(|c| c.name().to_string()),
            groups: fields.config().group.to_string(),
            login_started: fields.login_started(),
            call_started: fields.call_started(),
            last_disconnect: fields.last_disconnect(),
        }
    }
}
