//! API-version context.
//!
//! Clients select the appliance firmware line they expect with the `ver`
//! query parameter; behaviour that differs between lines (certificate
//! algorithm strictness) keys off its major component.

use axum::{
    body::Body,
    extract::{Query, State},
    http::Request,
    middleware::Next,
    response::Response,
};
use std::collections::HashMap;
use thiserror::Error;

use crate::api::error::ApiError;
use crate::http::server::AppState;

/// Version assumed when neither the request nor the config names one.
pub const DEFAULT_VERSION: &str = "17";

/// Query parameter selecting the version.
pub const VERSION_PARAM: &str = "ver";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid version")]
pub struct InvalidVersion;

/// Per-request version: the dotted string as given and its major number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiVersion {
    raw: String,
    major: u32,
}

impl ApiVersion {
    pub fn parse(raw: &str) -> Result<Self, InvalidVersion> {
        let major = raw
            .split('.')
            .next()
            .and_then(|major| major.parse::<u32>().ok())
            .ok_or(InvalidVersion)?;
        Ok(Self {
            raw: raw.to_string(),
            major,
        })
    }

    /// First non-empty of the request's value, the configured base version
    /// and [`DEFAULT_VERSION`].
    pub fn resolve(requested: Option<&str>, base: Option<&str>) -> Result<Self, InvalidVersion> {
        let raw = [requested, base]
            .into_iter()
            .flatten()
            .find(|v| !v.is_empty())
            .unwrap_or(DEFAULT_VERSION);
        Self::parse(raw)
    }

    pub fn major(&self) -> u32 {
        self.major
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

impl Default for ApiVersion {
    fn default() -> Self {
        Self {
            raw: DEFAULT_VERSION.to_string(),
            major: 17,
        }
    }
}

/// Resolve the version context and attach it to the request extensions.
pub async fn version_middleware(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, ApiError> {
    let version = ApiVersion::resolve(
        params.get(VERSION_PARAM).map(String::as_str),
        state.config.api.base_version.as_deref(),
    )
    .map_err(|e| ApiError::BadRequest(e.to_string()))?;

    request.extensions_mut().insert(version);
    Ok(next.run(request).await)
}
