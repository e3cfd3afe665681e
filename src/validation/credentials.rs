//! Certificate and key format checks.
//!
//! # Responsibilities
//! - Decode the first PEM certificate block of a blob and parse it as X.509
//! - Report the certificate's declared public-key algorithm
//! - Recognise PEM private keys (PKCS#1, PKCS#8, SEC1)
//!
//! # Design Decisions
//! - No chain building, signature or expiry checks: only format and algorithm
//! - PEM framing comes from `rustls-pemfile`, DER parsing from `x509-parser`

use thiserror::Error;
use x509_parser::oid_registry::{OID_KEY_TYPE_EC_PUBLIC_KEY, OID_PKCS1_RSAENCRYPTION};
use x509_parser::parse_x509_certificate;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CredentialError {
    #[error("invalid pem file")]
    InvalidPem,

    #[error("malformed certificate: {0}")]
    MalformedCertificate(String),
}

/// Public-key algorithm declared by a certificate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyAlgorithm {
    Rsa,
    Ecdsa,
    Other(String),
}

/// Summary of a parsed certificate.
#[derive(Debug, Clone)]
pub struct CertificateInfo {
    pub subject: String,
    pub algorithm: KeyAlgorithm,
}

/// Parse the first PEM certificate in `content`.
pub fn parse_pem_certificate(content: &[u8]) -> Result<CertificateInfo, CredentialError> {
    let mut reader = content;
    let der = rustls_pemfile::certs(&mut reader)
        .next()
        .ok_or(CredentialError::InvalidPem)?
        .map_err(|_| CredentialError::InvalidPem)?;

    let (_, cert) = parse_x509_certificate(der.as_ref())
        .map_err(|e| CredentialError::MalformedCertificate(e.to_string()))?;

    let oid = &cert.public_key().algorithm.algorithm;
    let algorithm = if *oid == OID_PKCS1_RSAENCRYPTION {
        KeyAlgorithm::Rsa
    } else if *oid == OID_KEY_TYPE_EC_PUBLIC_KEY {
        KeyAlgorithm::Ecdsa
    } else {
        KeyAlgorithm::Other(oid.to_id_string())
    };

    Ok(CertificateInfo {
        subject: cert.subject().to_string(),
        algorithm,
    })
}

pub fn is_valid_pem_certificate(content: &[u8]) -> bool {
    parse_pem_certificate(content).is_ok()
}

/// Whether `content` holds a PEM-encoded private key.
pub fn is_valid_pem_key(content: &[u8]) -> bool {
    let mut reader = content;
    matches!(rustls_pemfile::private_key(&mut reader), Ok(Some(_)))
}
