//! Command-line and environment overrides.
//!
//! Each flag falls back to an `F5_*` environment variable; anything set here
//! wins over the config file.

use clap::Args;
use std::path::PathBuf;

use crate::config::schema::{LogFormat, MockConfig, TlsConfig};

#[derive(Debug, Clone, Default, Args)]
pub struct Overrides {
    /// TOML configuration file.
    #[arg(short, long, env = "F5_CONFIG")]
    pub config: Option<PathBuf>,

    /// Listen address, e.g. 0.0.0.0:4443.
    #[arg(long, env = "F5_BIND_ADDRESS")]
    pub bind: Option<String>,

    /// TLS certificate (PEM); enables HTTPS together with --tls-key.
    #[arg(long, env = "F5_CERT_PATH")]
    pub tls_cert: Option<String>,

    /// TLS private key (PEM).
    #[arg(long, env = "F5_KEY_PATH")]
    pub tls_key: Option<String>,

    /// YAML seed file.
    #[arg(long, env = "F5_SEED_FILE")]
    pub seed: Option<String>,

    /// Enables external auth with this login provider name.
    #[arg(long, env = "F5_LOGIN_PROVIDER")]
    pub login_provider: Option<String>,

    #[arg(long, env = "F5_ADMIN_USERNAME")]
    pub admin_username: Option<String>,

    #[arg(long, env = "F5_ADMIN_PASSWORD", hide_env_values = true)]
    pub admin_password: Option<String>,

    /// Version used when a request has no `ver` parameter.
    #[arg(long, env = "F5_BASE_VERSION")]
    pub base_version: Option<String>,

    /// Partition for bare resource names.
    #[arg(long, env = "F5_DEFAULT_PARTITION")]
    pub default_partition: Option<String>,

    #[arg(long, env = "F5_LOG_LEVEL")]
    pub log_level: Option<String>,

    #[arg(long, env = "F5_LOG_FORMAT", value_parser = parse_log_format)]
    pub log_format: Option<LogFormat>,
}

impl Overrides {
    /// True when nothing beyond the config file path was given.
    pub fn is_empty(&self) -> bool {
        let Self {
            config: _,
            bind,
            tls_cert,
            tls_key,
            seed,
            login_provider,
            admin_username,
            admin_password,
            base_version,
            default_partition,
            log_level,
            log_format,
        } = self;

        [
            bind,
            tls_cert,
            tls_key,
            seed,
            login_provider,
            admin_username,
            admin_password,
            base_version,
            default_partition,
            log_level,
        ]
        .iter()
        .all(|value| value.is_none())
            && log_format.is_none()
    }

    pub fn apply(self, config: &mut MockConfig) {
        if let Some(bind) = self.bind {
            config.listener.bind_address = bind;
        }

        if self.tls_cert.is_some() || self.tls_key.is_some() {
            let tls = config.listener.tls.get_or_insert_with(TlsConfig::default);
            if let Some(cert) = self.tls_cert {
                tls.cert_path = cert;
            }
            if let Some(key) = self.tls_key {
                tls.key_path = key;
            }
        }

        if let Some(seed) = self.seed {
            config.seed.path = Some(seed);
        }
        if let Some(provider) = self.login_provider {
            config.auth.login_provider = Some(provider);
        }
        if let Some(username) = self.admin_username {
            config.auth.admin_username = username;
        }
        if let Some(password) = self.admin_password {
            config.auth.admin_password = password;
        }
        if let Some(version) = self.base_version {
            config.api.base_version = Some(version);
        }
        if let Some(partition) = self.default_partition {
            config.api.default_partition = Some(partition);
        }
        if let Some(level) = self.log_level {
            config.observability.log_level = level;
        }
        if let Some(format) = self.log_format {
            config.observability.log_format = format;
        }
    }
}

fn parse_log_format(value: &str) -> Result<LogFormat, String> {
    match value {
        "pretty" => Ok(LogFormat::Pretty),
        "json" => Ok(LogFormat::Json),
        other => Err(format!("unknown log format '{}'", other)),
    }
}
