//! Booking session configuration

use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

use crate::domain::i18n::Locale;

use super::error::ValidationError;

/// Heartbeat, payment window and locale settings
#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    /// Seconds between pings; silence beyond twice this drops the connection
    #[serde(default = "default_heartbeat_interval")]
    pub heartbeat_interval_secs: u64,

    /// Payment window announced to clients on start
    #[serde(default = "default_payment_time_limit")]
    pub payment_time_limit_secs: u64,

    /// Locale used when neither the payload nor the connection has one
    #[serde(default)]
    pub default_locale: Locale,

    /// JSON array of reservations for the in-memory service
    pub seed_file: Option<PathBuf>,
}

impl SessionConfig {
    pub fn heartbeat_interval(&self) -> Duration {
        Duration::from_secs(self.heartbeat_interval_secs)
    }

    /// Validate session configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.heartbeat_interval_secs == 0 {
            return Err(ValidationError::InvalidHeartbeatInterval);
        }
        if self.payment_time_limit_secs == 0 {
            return Err(ValidationError::InvalidTimeLimit);
        }
        if self.payment_time_limit_secs <= self.heartbeat_interval_secs {
            return Err(ValidationError::TimeLimitBelowHeartbeat);
        }
        Ok(())
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            heartbeat_interval_secs: default_heartbeat_interval(),
            payment_time_limit_secs: default_payment_time_limit(),
            default_locale: Locale::default(),
            seed_file: None,
        }
    }
}

fn default_heartbeat_interval() -> u64 {
    10
}

fn default_payment_time_limit() -> u64 {
    75
}
