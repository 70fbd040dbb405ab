//! Application configuration module
//!
//! Type-safe configuration loaded from environment variables with the
//! `config` and `dotenvy` crates. Variables use the `HOTEL_BOOKING` prefix
//! and `__` to separate nested values.
//!
//! # Example
//!
//! ```no_run
//! use hotel_booking_session::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//! ```

mod error;
mod server;
mod session;

pub use error::{ConfigError, ValidationError};
pub use server::{Environment, ServerConfig};
pub use session::SessionConfig;

use serde::Deserialize;

/// Root application configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Server configuration (host, port, environment)
    #[serde(default)]
    pub server: ServerConfig,

    /// Booking session configuration (heartbeat, time limit, locale)
    #[serde(default)]
    pub session: SessionConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `HOTEL_BOOKING` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    ///
    /// # Environment Variable Format
    ///
    /// - `HOTEL_BOOKING__SERVER__PORT=8080` -> `server.port = 8080`
    /// - `HOTEL_BOOKING__SESSION__HEARTBEAT_INTERVAL_SECS=10`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into expected types.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("HOTEL_BOOKING")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.session.validate()?;
        Ok(())
    }

    /// Check if running in production environment
    pub fn is_production(&self) -> bool {
        self.server.is_production()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::i18n::Locale;
    use std::env;
    use std::sync::Mutex;

    // Env vars are process-global
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    const VARS: &[&str] = &[
        "HOTEL_BOOKING__SERVER__PORT",
        "HOTEL_BOOKING__SERVER__ENVIRONMENT",
        "HOTEL_BOOKING__SESSION__HEARTBEAT_INTERVAL_SECS",
        "HOTEL_BOOKING__SESSION__PAYMENT_TIME_LIMIT_SECS",
        "HOTEL_BOOKING__SESSION__DEFAULT_LOCALE",
        "HOTEL_BOOKING__SESSION__SEED_FILE",
    ];

    fn clear_env() {
        for var in VARS {
            env::remove_var(var);
        }
    }

    #[test]
    fn test_load_defaults_without_environment() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        let result = AppConfig::load();

        assert!(result.is_ok(), "Failed to load config: {:?}", result.err());
        let config = result.unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.session.heartbeat_interval_secs, 10);
        assert_eq!(config.session.payment_time_limit_secs, 75);
        assert_eq!(config.session.default_locale, Locale::Es);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_session_overrides() {
        let _guard = ENV_MUTEX.lock().unwrap();
        env::set_var("HOTEL_BOOKING__SESSION__HEARTBEAT_INTERVAL_SECS", "5");
        env::set_var("HOTEL_BOOKING__SESSION__DEFAULT_LOCALE", "en");
        env::set_var("HOTEL_BOOKING__SESSION__SEED_FILE", "/tmp/reservations.json");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.session.heartbeat_interval_secs, 5);
        assert_eq!(config.session.default_locale, Locale::En);
        assert_eq!(
            config.session.seed_file.as_deref(),
            Some(std::path::Path::new("/tmp/reservations.json"))
        );
    }

    #[test]
    fn test_is_production() {
        let _guard = ENV_MUTEX.lock().unwrap();
        env::set_var("HOTEL_BOOKING__SERVER__ENVIRONMENT", "production");
        let result = AppConfig::load();
        clear_env();

        assert!(result.unwrap().is_production());
    }

    #[test]
    fn test_custom_server_port() {
        let _guard = ENV_MUTEX.lock().unwrap();
        env::set_var("HOTEL_BOOKING__SERVER__PORT", "3000");
        let result = AppConfig::load();
        clear_env();

        assert_eq!(result.unwrap().server.port, 3000);
    }

    #[test]
    fn test_validate_rejects_bad_session() {
        let _guard = ENV_MUTEX.lock().unwrap();
        env::set_var("HOTEL_BOOKING__SESSION__PAYMENT_TIME_LIMIT_SECS", "5");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(
            config.validate(),
            Err(ValidationError::TimeLimitBelowHeartbeat)
        );
    }
}
