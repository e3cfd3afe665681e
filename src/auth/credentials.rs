//! Admin identity checks and HTTP basic-auth decoding.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CredentialError {
    #[error("unsupported auth header format")]
    UnsupportedScheme,

    #[error("malformed basic auth")]
    MalformedEncoding,

    #[error("malformed basic auth payload")]
    MalformedPayload,

    #[error("unknown username")]
    UnknownUsername,

    #[error("bad authentication")]
    BadPassword,
}

/// The single admin identity the mock accepts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminIdentity {
    pub username: String,
    pub password: String,
}

impl AdminIdentity {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    pub fn check(&self, username: &str, password: &str) -> Result<(), CredentialError> {
        if username != self.username {
            return Err(CredentialError::UnknownUsername);
        }
        if password != self.password {
            return Err(CredentialError::BadPassword);
        }
        Ok(())
    }
}

/// Decode an `Authorization: Basic ...` header value into `(username, password)`.
///
/// The password is everything after the first `:`.
pub fn decode_basic(header: &str) -> Result<(String, String), CredentialError> {
    let encoded = header
        .strip_prefix("Basic ")
        .ok_or(CredentialError::UnsupportedScheme)?;
    let decoded = STANDARD
        .decode(encoded.trim())
        .map_err(|_| CredentialError::MalformedEncoding)?;
    let decoded = String::from_utf8(decoded).map_err(|_| CredentialError::MalformedEncoding)?;

    let (username, password) = decoded
        .split_once(':')
        .ok_or(CredentialError::MalformedPayload)?;
    Ok((username.to_string(), password.to_string()))
}
