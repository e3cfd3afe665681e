//! Authentication primitives.
//!
//! # Modes
//! - Basic (default): every request carries `Authorization: Basic` for the
//!   single admin identity
//! - External: enabled by configuring a login provider; clients log in once
//!   and send the issued token in `X-F5-Auth-Token`
//!
//! The HTTP-facing decision lives in `api::auth`; this module only holds the
//! identity check and the token cache.

pub mod credentials;
pub mod tokens;

pub use credentials::{decode_basic, AdminIdentity, CredentialError};
pub use tokens::{TokenCache, DEFAULT_TOKEN_TTL};

/// Header carrying a session token in external-auth mode.
pub const AUTH_TOKEN_HEADER: &str = "X-F5-Auth-Token";
