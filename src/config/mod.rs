// Config module - ledger settings and logging setup

mod logging;
mod settings;

pub use logging::{init_logging, init_logging_with, DEFAULT_LOG_FILTER};
pub use settings::{
    ConfigError, LedgerConfig, ReentrancyPolicy, DEFAULT_MAX_CALL_DEPTH, ENV_EVENT_LOG_CAPACITY,
    ENV_MAX_CALL_DEPTH, ENV_REENTRANCY,
};
