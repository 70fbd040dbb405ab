//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Invalid port number")]
    InvalidPort,

    #[error("Invalid bind address: {0}")]
    InvalidAddress(String),

    #[error("Heartbeat interval must be greater than zero")]
    InvalidHeartbeatInterval,

    #[error("Payment time limit must be greater than zero")]
    InvalidTimeLimit,

    #[error("Payment time limit must exceed the heartbeat interval")]
    TimeLimitBelowHeartbeat,
}
