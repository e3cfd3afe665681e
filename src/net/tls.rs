//! TLS configuration and certificate loading.

use axum_server::tls_rustls::RustlsConfig;
use std::io;
use std::path::Path;

use crate::config::TlsConfig;
use crate::validation::credentials::parse_pem_certificate;

/// Load the listener's certificate and key into a rustls configuration.
pub async fn load_tls_config(tls: &TlsConfig) -> Result<RustlsConfig, io::Error> {
    let cert_path = Path::new(&tls.cert_path);
    let key_path = Path::new(&tls.key_path);

    if !cert_path.exists() {
        return Err(io::Error::new(
            io::ErrorKind::NotFound,
            format!("Certificate file not found: {:?}", cert_path),
        ));
    }
    if !key_path.exists() {
        return Err(io::Error::new(
            io::ErrorKind::NotFound,
            format!("Private key file not found: {:?}", key_path),
        ));
    }

    let pem = tokio::fs::read(cert_path).await?;
    let info = parse_pem_certificate(&pem)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, format!("{:?}: {}", cert_path, e)))?;
    tracing::info!(subject = %info.subject, "Loaded listener certificate");

    RustlsConfig::from_pem_file(cert_path, key_path).await
}
