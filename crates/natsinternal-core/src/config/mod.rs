//! Application configuration schemas.
//!
//! All configuration structs are deserialized from TOML files via the
//! `config` crate. Each sub-module represents a logical configuration
//! section.

pub mod app;
pub mod auth;
pub mod database;
pub mod logging;
pub mod realtime;

use serde::{Deserialize, Serialize};

pub use self::app::{CorsConfig, ServerConfig};
pub use self::auth::AuthConfig;
pub use self::database::{DatabaseConfig, MemoryUserSeed};
pub use self::logging::LoggingConfig;
pub use self::realtime::{NotificationsConfig, RealtimeConfig};

use crate::error::AppError;

/// Prefix of environment variables that override file configuration.
const ENV_PREFIX: &str = "NATSINTERNAL";

/// Root application configuration.
///
/// This struct is the top-level deserialization target for the merged
/// TOML configuration files (default.toml + environment overlay).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,
    /// Database provider settings.
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Token verification settings.
    #[serde(default)]
    pub auth: AuthConfig,
    /// Real-time hub settings.
    #[serde(default)]
    pub realtime: RealtimeConfig,
    /// Notification creation settings.
    #[serde(default)]
    pub notifications: NotificationsConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from TOML files.
    ///
    /// Merges `config/default.toml` with `config/{env}.toml` and environment
    /// variables prefixed with `NATSINTERNAL__`.
    pub fn load(env: &str) -> Result<Self, AppError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))
    }

    /// Parse configuration from an in-memory TOML document.
    pub fn from_toml(source: &str) -> Result<Self, AppError> {
        let config = config::Config::builder()
            .add_source(config::File::from_str(source, config::FileFormat::Toml))
            .build()?;

        Ok(config.try_deserialize()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_fill_missing_sections() {
        let config = AppConfig::from_toml(
            r#"
            [database]
            provider = "memory"
            "#,
        )
        .expect("config should parse");

        assert_eq!(config.database.provider, "memory");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.realtime.max_connections_per_user, 5);
        assert!(config.notifications.exclude_actor);
        assert_eq!(config.logging.format, "json");
    }

    #[test]
    fn test_overrides_are_applied() {
        let config = AppConfig::from_toml(
            r#"
            [server]
            port = 9090

            [notifications]
            exclude_actor = false

            [realtime]
            channel_buffer_size = 8
            "#,
        )
        .expect("config should parse");

        assert_eq!(config.server.bind_address(), "0.0.0.0:9090");
        assert!(!config.notifications.exclude_actor);
        assert_eq!(config.realtime.channel_buffer_size, 8);
    }

    #[test]
    fn test_memory_users_parse_as_array_of_tables() {
        let config = AppConfig::from_toml(
            r#"
            [database]
            provider = "memory"

            [[database.memory_users]]
            id = 1
            user_name = "admin"
            permissions = ["GetCustomerDetail", "GetOrderDetail"]

            [[database.memory_users]]
            id = 2
            user_name = "staff"
            display_name = "Front Desk"
            "#,
        )
        .expect("config should parse");

        let users = &config.database.memory_users;
        assert_eq!(users.len(), 2);
        assert_eq!(users[0].permissions, vec!["GetCustomerDetail", "GetOrderDetail"]);
        assert_eq!(users[1].display_name, "Front Desk");
        assert!(users[1].permissions.is_empty());
    }

    #[test]
    fn test_invalid_value_is_configuration_error() {
        let err = AppConfig::from_toml(
            r#"
            [server]
            port = "not-a-port"
            "#,
        )
        .expect_err("port must be numeric");

        assert_eq!(err.kind, crate::error::ErrorKind::Configuration);
    }
}
