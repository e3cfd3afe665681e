//! Raw file upload and installed-certificate reads.

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::HeaderMap,
    Json,
};
use serde::{Deserialize, Serialize};

use crate::api::error::ApiError;
use crate::api::{require_content_type, OCTET_STREAM};
use crate::http::server::AppState;
use crate::model::ResourceId;
use crate::vfs::{self, CERTS_ROOT, UPLOAD_ROOT};

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub local_file_path: String,
    pub total_byte_count: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SslCertResponse {
    pub cert: String,
}

/// Store the request body under the upload root.
pub async fn upload(
    State(state): State<AppState>,
    Path(name): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<UploadResponse>, ApiError> {
    require_content_type(&headers, OCTET_STREAM)?;

    let path = vfs::join(UPLOAD_ROOT, &name);
    if !vfs::is_within(UPLOAD_ROOT, &path) {
        return Err(ApiError::bad_request("invalid path"));
    }

    let written = state.store.fs().write_file(&path, &body[..])?;
    tracing::info!(path = %path, bytes = written, "Stored upload");

    Ok(Json(UploadResponse {
        local_file_path: path,
        total_byte_count: written,
    }))
}

/// Read an installed certificate, addressed as `~partition~file`.
pub async fn get_ssl_cert(
    State(state): State<AppState>,
    Path(segment): Path<String>,
) -> Result<Json<SslCertResponse>, ApiError> {
    let id = ResourceId::parse(&segment, state.default_partition())?;
    let path = vfs::join(CERTS_ROOT, &format!("{}/{}", id.partition, id.name));
    if !vfs::is_within(CERTS_ROOT, &path) {
        return Err(ApiError::bad_request("invalid path"));
    }

    let content = state.store.fs().read_file(&path)?;
    Ok(Json(SslCertResponse {
        cert: String::from_utf8_lossy(&content).into_owned(),
    }))
}

#[cfg(test)]
mod tests {
    use crate::api::test_support::*;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};

    fn upload_request(name: &str, content_type: &str, body: &'static [u8]) -> Request<Body> {
        Request::post(format!("/mgmt/shared/file-transfer/uploads/{}", name))
            .header(header::AUTHORIZATION, basic_auth())
            .header(header::CONTENT_TYPE, content_type)
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn test_upload_is_write_once() {
        let (state, router) = app();

        let (status, body) = call(&router, upload_request("a.crt", "application/octet-stream", b"first")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["localFilePath"], "/var/config/rest/downloads/a.crt");
        assert_eq!(body["totalByteCount"], 5);

        let (status, body) = call(&router, upload_request("a.crt", "application/octet-stream", b"second")).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["message"], "file already exists");
        assert_eq!(
            &*state.store.fs().read_file("/var/config/rest/downloads/./a.crt").unwrap(),
            b"first"
        );
    }

    #[tokio::test]
    async fn test_upload_rejections() {
        let (_, router) = app();

        let (status, _) = call(&router, upload_request("a.crt", "application/json", b"x")).await;
        assert_eq!(status, StatusCode::UNSUPPORTED_MEDIA_TYPE);

        let (status, body) = call(&router, upload_request("..", "application/octet-stream", b"x")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "invalid path");

        let (status, _) = call(&router, upload_request("..%2F..%2Fcerts%2Fx", "application/octet-stream", b"x")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_get_ssl_cert() {
        let (_, router) = app();
        let (status, body) = call(&router, get("/mgmt/tm/sys/file/ssl-cert/~Common~rsa.crt")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["cert"].as_str().unwrap().as_bytes(), RSA_CERT);

        let (status, body) = call(&router, get("/mgmt/tm/sys/file/ssl-cert/~Common~missing.crt")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], "file does not exist");
    }
}
