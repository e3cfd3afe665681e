//! Authentication middleware for every route except login.

use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderMap, Request},
    middleware::Next,
    response::Response,
};

use crate::api::error::ApiError;
use crate::auth::{decode_basic, CredentialError, AUTH_TOKEN_HEADER};
use crate::http::server::AppState;

const MISSING_AUTHENTICATION: &str = "missing authentication";

/// Admit the request when it carries valid credentials for the active mode:
/// a session token when a login provider is configured, basic credentials
/// for the admin identity otherwise.
pub async fn authenticate(
    State(state): State<AppState>,
    request: Request<Body>,
    next: Next,
) -> Result<Response, ApiError> {
    if state.login_provider().is_some() {
        check_token(&state, request.headers())?;
    } else {
        check_basic(&state, request.headers())?;
    }
    Ok(next.run(request).await)
}

fn check_token(state: &AppState, headers: &HeaderMap) -> Result<(), ApiError> {
    let token = headers
        .get(AUTH_TOKEN_HEADER)
        .ok_or_else(|| ApiError::Unauthorized(MISSING_AUTHENTICATION.to_string()))?;

    match token.to_str() {
        Ok(token) if state.tokens.validate(token) => Ok(()),
        _ => Err(ApiError::Unauthorized("invalid authentication".to_string())),
    }
}

fn check_basic(state: &AppState, headers: &HeaderMap) -> Result<(), ApiError> {
    let header = headers
        .get(header::AUTHORIZATION)
        .ok_or_else(|| ApiError::Unauthorized(MISSING_AUTHENTICATION.to_string()))?
        .to_str()
        .map_err(|_| CredentialError::UnsupportedScheme)?;

    let (username, password) = decode_basic(header)?;
    state.admin.check(&username, &password)?;
    Ok(())
}
