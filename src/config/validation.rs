//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate addresses, TLS paths, token lifetime and the base version
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: MockConfig → Result<(), Vec<ConfigIssue>>
//! - Runs before config is accepted into the system

use std::fmt;
use std::net::SocketAddr;

use crate::config::schema::MockConfig;
use crate::http::version::ApiVersion;

/// One semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigIssue {
    pub field: &'static str,
    pub message: String,
}

impl ConfigIssue {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for ConfigIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

pub fn validate_config(config: &MockConfig) -> Result<(), Vec<ConfigIssue>> {
    let mut issues = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        issues.push(ConfigIssue::new(
            "listener.bind_address",
            format!("'{}' is not a socket address", config.listener.bind_address),
        ));
    }

    if let Some(tls) = &config.listener.tls {
        if tls.cert_path.is_empty() {
            issues.push(ConfigIssue::new("listener.tls.cert_path", "must not be empty"));
        }
        if tls.key_path.is_empty() {
            issues.push(ConfigIssue::new("listener.tls.key_path", "must not be empty"));
        }
    }

    if config.listener.max_body_bytes == 0 {
        issues.push(ConfigIssue::new("listener.max_body_bytes", "must be greater than 0"));
    }

    if config.auth.admin_username.is_empty() {
        issues.push(ConfigIssue::new("auth.admin_username", "must not be empty"));
    }

    if config.auth.token_ttl_secs == 0 {
        issues.push(ConfigIssue::new("auth.token_ttl_secs", "must be greater than 0"));
    }

    if let Some(version) = config.api.base_version.as_deref().filter(|v| !v.is_empty()) {
        if ApiVersion::parse(version).is_err() {
            issues.push(ConfigIssue::new(
                "api.base_version",
                format!("'{}' is not a version", version),
            ));
        }
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        issues.push(ConfigIssue::new(
            "observability.metrics_address",
            format!("'{}' is not a socket address", config.observability.metrics_address),
        ));
    }

    if issues.is_empty() {
        Ok(())
    } else {
        Err(issues)
    }
}
