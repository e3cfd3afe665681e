//! Management API routes.
//!
//! # Data Flow
//! ```text
//! request
//!     → auth.rs (basic credentials or session token; login is exempt)
//!     → http::version (ApiVersion extension)
//!     → handler (profiles / cipher_groups / crypto / files / declare)
//!     → ConfigStore / VirtualFilesystem
//!     → JSON body, or error.rs `{"message": ...}`
//! ```
//!
//! # Design Decisions
//! - Authentication is a route layer outside the version layer, so a bad
//!   credential is reported before a bad `ver`
//! - Unknown paths and unsupported methods answer with the same JSON error
//!   shape as handler failures

pub mod auth;
pub mod cipher_groups;
pub mod crypto;
pub mod declare;
pub mod error;
pub mod files;
pub mod login;
pub mod profiles;

use axum::{
    http::{header, HeaderMap},
    middleware,
    routing::{get, post},
    Router,
};

use crate::http::server::AppState;
use crate::http::version::version_middleware;

pub use error::ApiError;

pub const LOGIN_PATH: &str = "/mgmt/shared/authn/login";
pub const DECLARE_PATH: &str = "/mgmt/shared/appsvcs/declare";
pub const PROFILES_PATH: &str = "/mgmt/tm/ltm/profile/client-ssl";

pub(crate) const APPLICATION_JSON: &str = "application/json";
pub(crate) const OCTET_STREAM: &str = "application/octet-stream";

/// Build the API router over `state`.
pub fn router(state: AppState) -> Router {
    let protected = Router::new()
        .route(DECLARE_PATH, get(declare::get_declaration).patch(declare::patch_declaration))
        .route(PROFILES_PATH, get(profiles::list_profiles).post(profiles::create_profile))
        .route(
            "/mgmt/tm/ltm/profile/client-ssl/{id}",
            get(profiles::get_profile).patch(profiles::patch_profile),
        )
        .route("/mgmt/tm/ltm/cipher/group/{id}", get(cipher_groups::get_cipher_group))
        .route("/mgmt/shared/file-transfer/uploads/{name}", post(files::upload))
        .route("/mgmt/tm/sys/crypto/cert", post(crypto::install_cert))
        .route("/mgmt/tm/sys/crypto/key", post(crypto::install_key))
        .route("/mgmt/tm/sys/file/ssl-cert/{id}", get(files::get_ssl_cert))
        .route_layer(middleware::from_fn_with_state(state.clone(), version_middleware))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth::authenticate));

    Router::new()
        .route(LOGIN_PATH, post(login::login))
        .merge(protected)
        .fallback(not_found)
        .method_not_allowed_fallback(method_not_allowed)
        .with_state(state)
}

async fn not_found() -> ApiError {
    ApiError::NotFound("route not found".to_string())
}

async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed("invalid method".to_string())
}

/// Require the request's media type to be `expected`; parameters such as
/// `charset` are ignored.
pub(crate) fn require_content_type(headers: &HeaderMap, expected: &str) -> Result<(), ApiError> {
    let matches = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .is_some_and(|media_type| media_type.trim().eq_ignore_ascii_case(expected));

    if matches {
        Ok(())
    } else {
        Err(ApiError::UnsupportedMediaType(format!(
            "invalid content-type: expected {}",
            expected
        )))
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    //! Router fixtures shared by the handler tests.

    use axum::{
        body::Body,
        http::{header, Request, StatusCode},
        Router,
    };
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine;
    use serde_json::Value;
    use tower::ServiceExt;

    use crate::config::MockConfig;
    use crate::http::server::AppState;
    use crate::model::{CipherGroups, ClientSslProfile};
    use crate::store::{ConfigStore, ResourceStore};
    use crate::vfs::VirtualFilesystem;

    pub const RSA_CERT: &[u8] = include_bytes!("../../tests/fixtures/rsa.crt");
    pub const RSA_KEY: &[u8] = include_bytes!("../../tests/fixtures/rsa.key");
    pub const ECDSA_CERT: &[u8] = include_bytes!("../../tests/fixtures/ecdsa.crt");

    /// State with one profile `~Common~prof1` on an RSA certificate, an
    /// ECDSA certificate installed and cipher groups `a` and `new-cipher`.
    pub fn state(config: MockConfig) -> AppState {
        let fs = VirtualFilesystem::new();
        fs.write_file("/certs/Common/rsa.crt", RSA_CERT).unwrap();
        fs.write_file("/certs/Common/ecdsa.crt", ECDSA_CERT).unwrap();
        fs.write_file("/keys/Common/rsa.key", RSA_KEY).unwrap();

        let mut profiles = ResourceStore::new();
        let mut prof1 = ClientSslProfile::new("Common", "prof1");
        prof1.cert = "/Common/rsa.crt".into();
        prof1.key = "/Common/rsa.key".into();
        prof1.cipher_group = "a".into();
        profiles.create(prof1).unwrap();

        let store = ConfigStore::new(profiles, CipherGroups::new(["a", "new-cipher"]), fs);
        AppState::new(config, store)
    }

    pub fn app() -> (AppState, Router) {
        let state = state(MockConfig::default());
        (state.clone(), super::router(state))
    }

    pub fn basic_auth() -> String {
        format!("Basic {}", STANDARD.encode("admin:admin"))
    }

    pub fn get(uri: &str) -> Request<Body> {
        Request::get(uri)
            .header(header::AUTHORIZATION, basic_auth())
            .body(Body::empty())
            .unwrap()
    }

    pub fn send_json(method: &str, uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::AUTHORIZATION, basic_auth())
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    pub async fn call(router: &Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if body.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body).unwrap()
        };
        (status, value)
    }
}
