//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the mock.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Root configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct MockConfig {
    /// Listener configuration (bind address, TLS, body limit).
    pub listener: ListenerConfig,

    /// Admin identity and external-auth settings.
    pub auth: AuthConfig,

    /// API behaviour knobs (version context, default partition).
    pub api: ApiConfig,

    /// Initial store contents.
    pub seed: SeedConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:4443").
    pub bind_address: String,

    /// Serve HTTPS with this certificate/key when set, plain HTTP otherwise.
    pub tls: Option<TlsConfig>,

    /// Largest accepted request body (uploads included).
    pub max_body_bytes: usize,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:4443".to_string(),
            tls: None,
            max_body_bytes: 10 * 1024 * 1024,
        }
    }
}

/// TLS configuration for the listener.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TlsConfig {
    /// Path to certificate file (PEM).
    pub cert_path: String,

    /// Path to private key file (PEM).
    pub key_path: String,
}

impl Default for TlsConfig {
    fn default() -> Self {
        Self {
            cert_path: "/etc/ssl/f5/cert.pem".to_string(),
            key_path: "/etc/ssl/f5/key.pem".to_string(),
        }
    }
}

/// Authentication configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AuthConfig {
    pub admin_username: String,

    pub admin_password: String,

    /// Enables external auth (token login) when set.
    pub login_provider: Option<String>,

    /// Session token lifetime in seconds.
    pub token_ttl_secs: u64,
}

impl AuthConfig {
    /// The configured login provider, ignoring blank values.
    pub fn login_provider(&self) -> Option<&str> {
        self.login_provider
            .as_deref()
            .filter(|provider| !provider.is_empty())
    }

    pub fn token_ttl(&self) -> Duration {
        Duration::from_secs(self.token_ttl_secs)
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            admin_username: "admin".to_string(),
            admin_password: "admin".to_string(),
            login_provider: None,
            token_ttl_secs: 20 * 60,
        }
    }
}

/// API behaviour configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ApiConfig {
    /// Version assumed when a request carries no `ver` parameter.
    pub base_version: Option<String>,

    /// Partition used for bare resource names (no `~`).
    pub default_partition: Option<String>,
}

impl ApiConfig {
    pub fn default_partition(&self) -> Option<&str> {
        self.default_partition
            .as_deref()
            .filter(|partition| !partition.is_empty())
    }
}

/// Seed data configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct SeedConfig {
    /// YAML seed file; an empty store when unset.
    pub path: Option<String>,
}

/// Log output format.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    pub log_format: LogFormat,

    /// Enable Prometheus metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_toml() {
        let config: MockConfig = toml::from_str("[auth]\nlogin_provider = \"tmos\"\n").unwrap();
        assert_eq!(config.auth.login_provider(), Some("tmos"));
        assert_eq!(config.auth.admin_username, "admin");
        assert_eq!(config.listener.bind_address, "0.0.0.0:4443");
        assert!(config.listener.tls.is_none());
    }

    #[test]
    fn test_blank_values_disable_options() {
        let mut config = MockConfig::default();
        config.auth.login_provider = Some(String::new());
        config.api.default_partition = Some(String::new());
        assert_eq!(config.auth.login_provider(), None);
        assert_eq!(config.api.default_partition(), None);
    }

    #[test]
    fn test_log_format() {
        let config: MockConfig = toml::from_str("[observability]\nlog_format = \"json\"\n").unwrap();
        assert_eq!(config.observability.log_format, LogFormat::Json);
    }
}
