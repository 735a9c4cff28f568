//! Per-agent configuration record and the option table that builds it.

use super::group::GroupMask;
use crate::error::ConfigError;
use crate::keyed::Keyed;
use serde::{Deserialize, Serialize};

/// Agent configuration loaded from one `agents.conf` section.
///
/// Immutable once the snapshot holding it is built; live agents share it
/// through an `Arc`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Agent id and section name. Unique within a snapshot.
    pub username: String,
    /// Password the agent needs when logging in.
    pub password: String,
    /// Display name used for logging and queries.
    pub full_name: String,
    /// DTMF string an agent sends to accept a call.
    pub dtmf_accept: String,
    /// DTMF string an agent sends to end a call.
    pub dtmf_end: String,
    /// Sound played to alert the agent that a call is waiting.
    pub beep_sound: String,
    /// Music-on-hold class while waiting for a call.
    pub moh: String,
    /// Recording directory, always starting and ending with `/` unless empty.
    pub save_calls_in: String,
    /// Recording file format extension.
    pub record_format: String,
    pub group: GroupMask,
    /// Failed login attempts allowed. Zero means unlimited.
    pub max_login_tries: u32,
    /// Seconds to ack a call before being logged off. Zero disables the timer.
    pub auto_logoff: u32,
    /// Milliseconds after a call before the agent can take another.
    pub wrapup_time: u32,
    pub ack_call: bool,
    pub end_call: bool,
    pub record_agent_calls: bool,
}

impl AgentConfig {
    /// Create a record with every option at its default.
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: String::new(),
            full_name: String::new(),
            dtmf_accept: "#".to_string(),
            dtmf_end: "*".to_string(),
            beep_sound: "beep".to_string(),
            moh: "default".to_string(),
            save_calls_in: String::new(),
            record_format: "wav".to_string(),
            group: GroupMask::EMPTY,
            max_login_tries: 3,
            auto_logoff: 0,
            wrapup_time: 0,
            ack_call: false,
            end_call: true,
            record_agent_calls: false,
        }
    }

    /// Apply one `key = value` option. `line` is used for error reporting.
    pub fn apply_option(&mut self, key: &str, value: &str, line: usize) -> Result<(), ConfigError> {
        let option = AgentOption::from_key(key).ok_or_else(|| ConfigError::UnknownOption {
            line,
            section: self.username.clone(),
            key: key.to_string(),
        })?;
        let invalid = |reason: &str| ConfigError::InvalidValue {
            line,
            key: key.to_string(),
            value: value.to_string(),
            reason: reason.to_string(),
        };

        match option {
            AgentOption::MaxLoginTries => {
                self.max_login_tries = parse_uint(value).ok_or_else(|| invalid("expected an unsigned integer"))?
            }
            AgentOption::AutoLogoff => {
                self.auto_logoff = parse_uint(value).ok_or_else(|| invalid("expected an unsigned integer"))?
            }
            AgentOption::WrapupTime => {
                self.wrapup_time = parse_uint(value).ok_or_else(|| invalid("expected an unsigned integer"))?
            }
            AgentOption::AckCall => {
                self.ack_call = parse_bool(value).ok_or_else(|| invalid("expected a boolean"))?
            }
            AgentOption::EndCall => {
                self.end_call = parse_bool(value).ok_or_else(|| invalid("expected a boolean"))?
            }
            AgentOption::RecordAgentCalls => {
                self.record_agent_calls = parse_bool(value).ok_or_else(|| invalid("expected a boolean"))?
            }
            AgentOption::AcceptDtmf => self.dtmf_accept = value.to_string(),
            AgentOption::EndDtmf => self.dtmf_end = value.to_string(),
            AgentOption::MusicOnHold => self.moh = value.to_string(),
            AgentOption::RecordFormat => self.record_format = value.to_string(),
            AgentOption::Password => self.password = value.to_string(),
            AgentOption::FullName => self.full_name = value.to_string(),
            AgentOption::Group => self.group = GroupMask::parse(value),
            AgentOption::SaveCallsIn => self.save_calls_in = normalize_save_calls_in(value),
            AgentOption::CustomBeep => {
                self.beep_sound = validate_custom_beep(value).map_err(|reason| invalid(reason))?
            }
        }
        Ok(())
    }
}

impl Keyed for AgentConfig {
    fn key(&self) -> &str {
        &self.username
    }
}

/// Options recognized in an agent section.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgentOption {
    MaxLoginTries,
    AutoLogoff,
    AckCall,
    AcceptDtmf,
    EndCall,
    EndDtmf,
    WrapupTime,
    MusicOnHold,
    Group,
    RecordAgentCalls,
    RecordFormat,
    SaveCallsIn,
    CustomBeep,
    Password,
    FullName,
}

impl AgentOption {
    /// Match option names exactly, as written in `agents.conf`.
    pub fn from_key(key: &str) -> Option<Self> {
        let option = match key {
            "maxlogintries" => Self::MaxLoginTries,
            "autologoff" => Self::AutoLogoff,
            "ackcall" => Self::AckCall,
            "acceptdtmf" => Self::AcceptDtmf,
            "endcall" => Self::EndCall,
            "enddtmf" => Self::EndDtmf,
            "wrapuptime" => Self::WrapupTime,
            "musiconhold" => Self::MusicOnHold,
            "group" => Self::Group,
            "recordagentcalls" => Self::RecordAgentCalls,
            "recordformat" => Self::RecordFormat,
            "savecallsin" => Self::SaveCallsIn,
            "custom_beep" => Self::CustomBeep,
            "password" => Self::Password,
            "fullname" => Self::FullName,
            _ => return None,
        };
        Some(option)
    }
}

/// Make a recording directory start and end with `/`. Empty stays empty.
pub fn normalize_save_calls_in(value: &str) -> String {
    if value.is_empty() {
        return String::new();
    }
    let leading = if value.starts_with('/') { "" } else { "/" };
    let trailing = if value.ends_with('/') { "" } else { "/" };
    format!("{}{}{}", leading, value, trailing)
}

/// Beep sound ids cannot be empty.
pub fn validate_custom_beep(value: &str) -> Result<String, &'static str> {
    if value.is_empty() {
        return Err("beep sound cannot be empty");
    }
    Ok(value.to_string())
}

fn parse_uint(value: &str) -> Option<u32> {
    value.trim().parse::<u32>().ok()
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "yes" | "true" | "y" | "t" | "on" | "1" => Some(true),
        "no" | "false" | "n" | "f" | "off" | "0" => Some(false),
        _ => None,
    }
}
