//! Seed data: the declarative file that populates the store at startup.

use serde::Deserialize;
use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::model::{CipherGroups, ClientSslProfile};
use crate::store::{resources::ResourceStore, StoreError};
use crate::validation::{check_shape, ValidationError};
use crate::vfs::{VfsError, VirtualFilesystem};

#[derive(Debug, Error)]
pub enum SeedError {
    #[error("failed to read seed file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse seed file: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("seeded profile {id} is invalid: {source}")]
    InvalidProfile {
        id: String,
        #[source]
        source: ValidationError,
    },

    #[error("seeded profile conflicts: {0}")]
    Duplicate(#[from] StoreError),

    #[error("seeded file {path}: {source}")]
    File {
        path: String,
        #[source]
        source: VfsError,
    },
}

/// A file placed in the virtual filesystem before serving.
#[derive(Debug, Clone, Deserialize)]
pub struct SeedFile {
    pub path: String,
    pub content: String,
}

/// Contents of a seed file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SeedData {
    #[serde(alias = "clientSslProfiles")]
    pub client_ssl_profiles: Vec<ClientSslProfile>,
    #[serde(alias = "cipherGroups")]
    pub cipher_groups: Vec<String>,
    pub files: Vec<SeedFile>,
}

/// Store contents built from seed data.
#[derive(Debug)]
pub struct Seeded {
    pub profiles: ResourceStore,
    pub cipher_groups: CipherGroups,
    pub fs: VirtualFilesystem,
}

impl SeedData {
    pub fn load(path: &Path) -> Result<Self, SeedError> {
        let content = fs::read_to_string(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self, SeedError> {
        Ok(serde_yaml::from_str(content)?)
    }

    /// Build the initial store.
    ///
    /// Seeded profiles get the checks that need no file material (required
    /// fields, cipher rules) plus identity uniqueness.
    pub fn into_store(self) -> Result<Seeded, SeedError> {
        let cipher_groups = CipherGroups::new(self.cipher_groups);

        let fs = VirtualFilesystem::new();
        for file in self.files {
            fs.write_file(&file.path, file.content.into_bytes())
                .map_err(|source| SeedError::File {
                    path: file.path.clone(),
                    source,
                })?;
        }

        let mut profiles = ResourceStore::new();
        for profile in self.client_ssl_profiles {
            check_shape(&profile, &cipher_groups).map_err(|source| SeedError::InvalidProfile {
                id: profile.id().to_string(),
                source,
            })?;
            profiles.create(profile)?;
        }

        tracing::info!(
            profiles = profiles.len(),
            cipher_groups = cipher_groups.len(),
            files = fs.len(),
            "Seed data loaded"
        );

        Ok(Seeded {
            profiles,
            cipher_groups,
            fs,
        })
    }
}
