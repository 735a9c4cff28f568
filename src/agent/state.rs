//! Presence state and lifecycle of an agent.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Externally observable presence of an agent device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceState {
    /// Configured but not logged in.
    Unavailable,
    /// Logged in and idle.
    NotInUse,
    /// Logged in and on a call.
    InUse,
    Busy,
    /// No such agent.
    Invalid,
}

impl DeviceState {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeviceState::Unavailable => "UNAVAILABLE",
            DeviceState::NotInUse => "NOT_INUSE",
            DeviceState::InUse => "INUSE",
            DeviceState::Busy => "BUSY",
            DeviceState::Invalid => "INVALID",
        }
    }
}

impl fmt::Display for DeviceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where an agent stands with respect to removal.
///
/// A dead agent that is still on a call stays linked as `DeadButBusy` until
/// the call side logs it off through the registry, which moves it to
/// `Removed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentLifecycle {
    Active,
    DeadButBusy,
    Removed,
}
