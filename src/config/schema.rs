//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the
//! application. All types derive Serde traits for deserialization from config
//! files.

use serde::{Deserialize, Serialize};

use crate::routing::{PatternOptions, RouterSettings};

/// Root configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// Listener configuration (bind address, public URL).
    pub listener: ListenerConfig,

    /// Route compilation settings.
    pub routing: RoutingConfig,

    /// Session cookie settings.
    pub session: SessionConfig,

    /// Account rules.
    pub accounts: AccountsConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    #[serde(default)]
    pub security: SecurityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:3000").
    pub bind_address: String,

    /// Externally visible base URL, used when building absolute links.
    pub public_url: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:3000".to_string(),
            public_url: "http://localhost:3000".to_string(),
        }
    }
}

/// Route compilation settings.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct RoutingConfig {
    /// Match path letter case exactly.
    pub case_sensitive: bool,

    /// Reject a trailing slash.
    pub strict: bool,

    /// Prefix controllers of nested resources with the parent resource name
    /// (`bands/albums` rather than `albums`).
    pub nest_resource_controllers: bool,
}

impl From<&RoutingConfig> for RouterSettings {
    fn from(config: &RoutingConfig) -> Self {
        Self {
            pattern: PatternOptions {
                case_sensitive: config.case_sensitive,
                strict: config.strict,
            },
            nest_resource_controllers: config.nest_resource_controllers,
            ..RouterSettings::default()
        }
    }
}

/// Session cookie settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Name of the cookie carrying the session id.
    pub cookie_name: String,

    /// Idle lifetime of a session in seconds.
    pub ttl_secs: u64,

    /// Only send the cookie over HTTPS.
    pub secure: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            cookie_name: "switchyard.sid".to_string(),
            ttl_secs: 60 * 60 * 24,
            secure: false,
        }
    }
}

/// Account rules.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AccountsConfig {
    /// Minimum accepted password length at registration.
    pub min_password_length: usize,
}

impl Default for AccountsConfig {
    fn default() -> Self {
        Self {
            min_password_length: 6,
        }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

/// Security hardening configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SecurityConfig {
    /// Maximum request body size in bytes.
    pub max_body_size: usize,

    /// Value of the `X-Powered-By` response header; empty disables it.
    pub powered_by: String,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            max_body_size: 64 * 1024,
            powered_by: "Switchyard".to_string(),
        }
    }
}
