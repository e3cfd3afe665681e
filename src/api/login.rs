//! Session login for external-auth mode.

use axum::{body::Bytes, extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::api::error::ApiError;
use crate::http::server::AppState;

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
    pub login_provider: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: SessionToken,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SessionToken {
    pub token: String,
    /// Lifetime in seconds.
    pub timeout: u64,
}

/// Exchange admin credentials for a session token.
pub async fn login(State(state): State<AppState>, body: Bytes) -> Result<Json<LoginResponse>, ApiError> {
    let provider = state
        .login_provider()
        .ok_or_else(|| ApiError::Forbidden("login not available".to_string()))?;

    let request: LoginRequest =
        serde_json::from_slice(&body).map_err(|_| ApiError::bad_request("invalid JSON body"))?;
    if request.username.is_empty() || request.password.is_empty() || request.login_provider.is_empty() {
        return Err(ApiError::bad_request("invalid request"));
    }

    state
        .admin
        .check(&request.username, &request.password)
        .map_err(|e| ApiError::bad_request(e.to_string()))?;

    if request.login_provider != provider {
        return Err(ApiError::bad_request("unknown login provider"));
    }

    let token = state.tokens.issue();
    tracing::info!(username = %request.username, "Issued session token");

    Ok(Json(LoginResponse {
        token: SessionToken {
            token,
            timeout: state.tokens.ttl().as_secs(),
        },
    }))
}
