//! Admission checks for client SSL profiles.
//!
//! # Responsibilities
//! - Structural checks (required identity fields)
//! - Cross-field checks (`cipherGroup` XOR `ciphers`)
//! - Cross-resource checks (cipher group exists)
//! - External references (certificate, key and chain files exist in the
//!   virtual filesystem) and version-gated certificate algorithm checks
//!
//! # Design Decisions
//! - Checks run in a fixed order and stop at the first failure
//! - The filesystem and cipher-group set are passed in, never looked up globally
//! - Validation is read-only against both

pub mod credentials;

use thiserror::Error;

use crate::model::{CipherGroups, ClientSslProfile};
use crate::validation::credentials::{parse_pem_certificate, CredentialError, KeyAlgorithm};
use crate::vfs::{self, VirtualFilesystem, CERTS_ROOT, KEYS_ROOT};

/// First appliance major version that accepts non-RSA certificates.
pub const RELAXED_ALGORITHM_MAJOR: u32 = 17;

/// Why a profile was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{0} is required")]
    MissingField(&'static str),

    #[error("Profile {partition}/{name} cannot contain both ciphers and a cipher-group.")]
    CipherConflict { partition: String, name: String },

    #[error("cipher group {0} does not exist")]
    UnknownCipherGroup(String),

    #[error("invalid cert: no path defined")]
    NoCertificatePath,

    #[error("invalid cert: file does not exist")]
    CertificateNotFound(String),

    #[error("invalid cert: {0}")]
    InvalidCertificate(CredentialError),

    #[error("invalid cert: must have RSA certificate/key pair.")]
    RsaRequired,

    #[error("invalid key: file does not exist")]
    KeyNotFound(String),

    #[error("invalid chain: file does not exist")]
    ChainNotFound(String),
}

/// Runs the ordered checks for one API-version context.
#[derive(Debug, Clone, Copy)]
pub struct Validator<'a> {
    fs: &'a VirtualFilesystem,
    cipher_groups: &'a CipherGroups,
    version: u32,
}

impl<'a> Validator<'a> {
    pub fn new(fs: &'a VirtualFilesystem, cipher_groups: &'a CipherGroups, version: u32) -> Self {
        Self {
            fs,
            cipher_groups,
            version,
        }
    }

    /// Full pipeline, stopping at the first failing check.
    pub fn validate(&self, profile: &ClientSslProfile) -> Result<(), ValidationError> {
        check_shape(profile, self.cipher_groups)?;
        self.check_certificate(profile)?;
        self.check_keys(profile)?;
        self.check_chains(profile)
    }

    fn check_certificate(&self, profile: &ClientSslProfile) -> Result<(), ValidationError> {
        let cert = profile.primary_cert().ok_or(ValidationError::NoCertificatePath)?;
        let path = vfs::join(CERTS_ROOT, cert);
        if !self.fs.exists(&path) {
            return Err(ValidationError::CertificateNotFound(path));
        }

        if self.version >= RELAXED_ALGORITHM_MAJOR {
            return Ok(());
        }

        let content = self
            .fs
            .read_file(&path)
            .map_err(|_| ValidationError::CertificateNotFound(path.clone()))?;
        let info = parse_pem_certificate(&content).map_err(ValidationError::InvalidCertificate)?;
        if info.algorithm != KeyAlgorithm::Rsa {
            tracing::debug!(
                path = %path,
                algorithm = ?info.algorithm,
                version = self.version,
                "Rejecting non-RSA certificate"
            );
            return Err(ValidationError::RsaRequired);
        }
        Ok(())
    }

    fn check_keys(&self, profile: &ClientSslProfile) -> Result<(), ValidationError> {
        let keys = std::iter::once(profile.key.as_str())
            .chain(profile.cert_key_chain.iter().map(|element| element.key.as_str()));
        self.require_all(KEYS_ROOT, keys, ValidationError::KeyNotFound)
    }

    fn check_chains(&self, profile: &ClientSslProfile) -> Result<(), ValidationError> {
        let chains = std::iter::once(profile.chain.as_str())
            .chain(profile.cert_key_chain.iter().map(|element| element.chain.as_str()));
        self.require_all(CERTS_ROOT, chains, ValidationError::ChainNotFound)
    }

    fn require_all<'p>(
        &self,
        root: &str,
        paths: impl Iterator<Item = &'p str>,
        missing: fn(String) -> ValidationError,
    ) -> Result<(), ValidationError> {
        for relative in paths.filter(|p| !p.is_empty()) {
            let path = vfs::join(root, relative);
            if !self.fs.exists(&path) {
                return Err(missing(path));
            }
        }
        Ok(())
    }
}

/// Checks that need no external material: required fields, cipher
/// exclusivity and cipher-group existence.
pub fn check_shape(
    profile: &ClientSslProfile,
    cipher_groups: &CipherGroups,
) -> Result<(), ValidationError> {
    if profile.name.is_empty() {
        return Err(ValidationError::MissingField("name"));
    }
    if profile.partition.is_empty() {
        return Err(ValidationError::MissingField("partition"));
    }

    if !profile.cipher_group.is_empty() && !profile.ciphers.is_empty() {
        return Err(ValidationError::CipherConflict {
            partition: profile.partition.clone(),
            name: profile.name.clone(),
        });
    }

    if !profile.cipher_group.is_empty() && !cipher_groups.contains(&profile.cipher_group) {
        return Err(ValidationError::UnknownCipherGroup(profile.cipher_group.clone()));
    }

    Ok(())
}
