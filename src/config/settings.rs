// Ledger configuration

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

pub const ENV_REENTRANCY: &str = "LEDGER_REENTRANCY";
pub const ENV_MAX_CALL_DEPTH: &str = "LEDGER_MAX_CALL_DEPTH";
pub const ENV_EVENT_LOG_CAPACITY: &str = "LEDGER_EVENT_LOG_CAPACITY";

/// Default nesting limit. Each level recurses through the value sink, so
/// this has to fit a 2 MiB thread stack in unoptimized builds.
pub const DEFAULT_MAX_CALL_DEPTH: usize = 32;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: &'static str, value: String },

    #[error("Config decoding failed: {0}")]
    Decode(String),

    #[error("Config encoding failed: {0}")]
    Encode(String),
}

/// How the ledger treats a call that re-enters while the same account
/// already has a withdrawal in flight.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReentrancyPolicy {
    /// Allow re-entry. The balance is debited before value leaves the
    /// ledger, so a nested call only sees what is left.
    #[default]
    Checked,
    /// Reject any call for an account with a withdrawal in flight
    Locked,
}

impl FromStr for ReentrancyPolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "checked" => Ok(ReentrancyPolicy::Checked),
            "locked" => Ok(ReentrancyPolicy::Locked),
            _ => Err(ConfigError::InvalidValue {
                key: ENV_REENTRANCY,
                value: s.to_string(),
            }),
        }
    }
}

/// Configuration for the ledger
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerConfig {
    /// Reentrancy handling for withdrawals
    pub reentrancy: ReentrancyPolicy,
    /// Maximum nesting of calls made from inside value transfers
    pub max_call_depth: usize,
    /// Committed events kept in memory (0 = unbounded)
    pub event_log_capacity: usize,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            reentrancy: ReentrancyPolicy::Checked,
            max_call_depth: DEFAULT_MAX_CALL_DEPTH,
            event_log_capacity: 0,
        }
    }
}

impl LedgerConfig {
    /// Create a new config builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Set reentrancy policy
    pub fn with_reentrancy(mut self, policy: ReentrancyPolicy) -> Self {
        self.reentrancy = policy;
        self
    }

    /// Set maximum call depth
    pub fn with_max_call_depth(mut self, depth: usize) -> Self {
        self.max_call_depth = depth;
        self
    }

    /// Set event log capacity
    pub fn with_event_log_capacity(mut self, capacity: usize) -> Self {
        self.event_log_capacity = capacity;
        self
    }

    /// Build from `LEDGER_*` environment variables, defaulting what is unset
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(value) = lookup(ENV_REENTRANCY) {
            config.reentrancy = value.parse()?;
        }
        if let Some(value) = lookup(ENV_MAX_CALL_DEPTH) {
            config.max_call_depth = parse_usize(ENV_MAX_CALL_DEPTH, &value)?;
        }
        if let Some(value) = lookup(ENV_EVENT_LOG_CAPACITY) {
            config.event_log_capacity = parse_usize(ENV_EVENT_LOG_CAPACITY, &value)?;
        }

        Ok(config)
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, ConfigError> {
        postcard::to_allocvec(self).map_err(|e| ConfigError::Encode(e.to_string()))
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ConfigError> {
        postcard::from_bytes(bytes).map_err(|e| ConfigError::Decode(e.to_string()))
    }
}

fn parse_usize(key: &'static str, value: &str) -> Result<usize, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidValue {
        key,
        value: value.to_string(),
    })
}
