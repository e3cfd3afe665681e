//! Certificate and key installation.
//!
//! An install copies an already uploaded file into the certificate or key
//! namespace of the virtual filesystem after checking its format. The
//! destination is write-once like every other path.

use axum::{body::Bytes, extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::api::error::ApiError;
use crate::http::server::AppState;
use crate::validation::credentials::{is_valid_pem_certificate, is_valid_pem_key};
use crate::vfs::{self, VfsError, CERTS_ROOT, KEYS_ROOT};

const INSTALL: &str = "install";

/// Body of a `/mgmt/tm/sys/crypto/{cert,key}` command.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CryptoCommand {
    pub command: String,
    pub name: String,
    #[serde(rename = "from-local-file")]
    pub from_local_file: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub security_type: String,
}

#[derive(Debug, Serialize)]
pub struct InstallResponse {
    pub kind: &'static str,
    #[serde(flatten)]
    pub command: CryptoCommand,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Material {
    Certificate,
    Key,
}

impl Material {
    fn root(self) -> &'static str {
        match self {
            Material::Certificate => CERTS_ROOT,
            Material::Key => KEYS_ROOT,
        }
    }

    fn kind(self) -> &'static str {
        match self {
            Material::Certificate => "tm:sys:crypto:cert:installstate",
            Material::Key => "tm:sys:crypto:key:installstate",
        }
    }

    fn check(self, content: &[u8]) -> Result<(), ApiError> {
        match self {
            Material::Certificate if !is_valid_pem_certificate(content) => {
                Err(ApiError::bad_request("invalid certificate file"))
            }
            Material::Key if !is_valid_pem_key(content) => Err(ApiError::bad_request("invalid pem file")),
            _ => Ok(()),
        }
    }
}

pub async fn install_cert(State(state): State<AppState>, body: Bytes) -> Result<Json<InstallResponse>, ApiError> {
    install(&state, &body, Material::Certificate)
}

pub async fn install_key(State(state): State<AppState>, body: Bytes) -> Result<Json<InstallResponse>, ApiError> {
    install(&state, &body, Material::Key)
}

fn install(state: &AppState, body: &[u8], material: Material) -> Result<Json<InstallResponse>, ApiError> {
    let command: CryptoCommand =
        serde_json::from_slice(body).map_err(|_| ApiError::bad_request("invalid JSON body"))?;
    if command.command.is_empty() || command.name.is_empty() || command.from_local_file.is_empty() {
        return Err(ApiError::bad_request("invalid request"));
    }
    if command.command != INSTALL {
        return Err(ApiError::bad_request("unsupported command"));
    }

    let fs = state.store.fs();
    let dest = vfs::join(material.root(), &command.name);
    if !vfs::is_within(material.root(), &dest) {
        return Err(ApiError::bad_request("invalid path"));
    }
    if fs.exists(&dest) {
        return Err(dest_exists());
    }

    let content = fs
        .read_file(&command.from_local_file)
        .map_err(|_| ApiError::bad_request("could not read local file"))?;
    material.check(&content)?;

    fs.write_file(&dest, content).map_err(|e| match e {
        VfsError::AlreadyExists(_) => dest_exists(),
        other => ApiError::from(other),
    })?;
    tracing::info!(path = %dest, source = %command.from_local_file, "Installed crypto material");

    Ok(Json(InstallResponse {
        kind: material.kind(),
        command,
    }))
}

fn dest_exists() -> ApiError {
    ApiError::Conflict("dest path already exists".to_string())
}
