//! Error types for configuration loading and pool operations.

use thiserror::Error;

/// Errors raised while reading or validating configuration.
///
/// Any of these aborts the load that produced it; a previously published
/// snapshot is never touched.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Line {line}: {message}")]
    Syntax { line: usize, message: String },

    #[error("Line {line}: option '{key}' appears outside of any section")]
    OptionOutsideSection { line: usize, key: String },

    #[error("Line {line}: section '{section}' is declared more than once")]
    DuplicateSection { line: usize, section: String },

    #[error("Duplicate agent '{0}' in configuration")]
    DuplicateAgent(String),

    #[error("Line {line}: section '{section}' is reserved")]
    ReservedSection { line: usize, section: String },

    #[error("Line {line}: unknown option '{key}' in section '{section}'")]
    UnknownOption {
        line: usize,
        section: String,
        key: String,
    },

    #[error("Line {line}: invalid value '{value}' for option '{key}': {reason}")]
    InvalidValue {
        line: usize,
        key: String,
        value: String,
        reason: String,
    },

    #[error("Settings error: {0}")]
    Settings(#[from] config::ConfigError),
}

/// Errors reported by presence provider registration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PresenceError {
    #[error("Device state provider '{0}' is already registered")]
    DuplicateProvider(String),

    #[error("Device state provider name cannot be empty")]
    EmptyProviderName,
}

/// Errors reported by pool operations.
#[derive(Debug, Error)]
pub enum PoolError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Presence(#[from] PresenceError),

    #[error("Agent not found: {0}")]
    UnknownAgent(String),

    #[error("Agent {0} has been removed from configuration and cannot log in")]
    AgentDead(String),

    #[error("Agent {0} is already logged in")]
    AlreadyLoggedIn(String),

    #[error("Agent {0} is not logged in")]
    NotLoggedIn(String),

    #[error("Unknown agent info item: {0}")]
    InvalidField(String),

    #[error("Logging error: {0}")]
    Logging(String),

    #[error("Watch error: {0}")]
    Watch(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
