//! Configuration object store.
//!
//! # Data Flow
//! ```text
//! create:  candidate ─────────────────────┐
//! patch:   snapshot + ProfilePatch        │
//!              → patch.rs (merge) ────────┤
//!                                         ▼
//!                               validation (Validator)
//!                                         │ ok
//!                                         ▼
//!                           resources.rs (create / replace)
//! ```
//!
//! # Design Decisions
//! - One mutex guards the profile collection for the whole
//!   merge → validate → commit window, so checks and commit are atomic
//!   with respect to other requests
//! - A rejected candidate never reaches the collection
//! - The virtual filesystem and cipher groups are owned here and handed to
//!   the validator explicitly

pub mod patch;
pub mod resources;
pub mod seed;

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use thiserror::Error;

use crate::model::{CipherGroups, ClientSslProfile, ResourceId};
use crate::observability::metrics;
use crate::validation::{ValidationError, Validator};
use crate::vfs::VirtualFilesystem;

pub use patch::{merge, FieldPatch, ProfilePatch};
pub use resources::ResourceStore;
pub use seed::{SeedData, SeedError, Seeded};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("profile already exists")]
    Conflict(ResourceId),

    #[error("could not find profile")]
    NotFound(ResourceId),

    #[error("could not find certificate {certificate} in profile {profile}")]
    CertificateNotFound {
        profile: ResourceId,
        certificate: String,
    },

    #[error(transparent)]
    Invalid(#[from] ValidationError),
}

/// Shared, lock-guarded view over profiles, cipher groups and files.
#[derive(Debug)]
pub struct ConfigStore {
    profiles: Mutex<ResourceStore>,
    cipher_groups: CipherGroups,
    fs: Arc<VirtualFilesystem>,
}

impl ConfigStore {
    pub fn new(profiles: ResourceStore, cipher_groups: CipherGroups, fs: VirtualFilesystem) -> Self {
        Self {
            profiles: Mutex::new(profiles),
            cipher_groups,
            fs: Arc::new(fs),
        }
    }

    pub fn from_seed(seeded: Seeded) -> Self {
        Self::new(seeded.profiles, seeded.cipher_groups, seeded.fs)
    }

    pub fn fs(&self) -> &VirtualFilesystem {
        &self.fs
    }

    pub fn cipher_groups(&self) -> &CipherGroups {
        &self.cipher_groups
    }

    pub fn get(&self, id: &ResourceId) -> Option<ClientSslProfile> {
        self.lock().find(id).cloned()
    }

    pub fn list(&self, partition: Option<&str>) -> Vec<ClientSslProfile> {
        self.lock().list(partition)
    }

    /// Validate and append a new profile.
    pub fn create(&self, profile: ClientSslProfile, version: u32) -> Result<ClientSslProfile, StoreError> {
        let mut profiles = self.lock();

        self.validator(version).validate(&profile).inspect_err(|e| {
            metrics::record_validation_failure();
            tracing::debug!(profile = %profile.id(), error = %e, "Rejected new profile");
        })?;
        profiles.create(profile.clone())?;

        metrics::record_store_commit("create");
        tracing::debug!(profile = %profile.id(), "Added profile");
        Ok(profile)
    }

    /// Merge `patch` onto the profile `id`, validate the result and commit it.
    pub fn patch(&self, id: &ResourceId, patch: ProfilePatch, version: u32) -> Result<ClientSslProfile, StoreError> {
        let mut committed = self.patch_many(vec![(id.clone(), patch)], version)?;
        committed
            .pop()
            .ok_or_else(|| StoreError::NotFound(id.clone()))
    }

    /// Apply several patches as one unit: every candidate is validated before
    /// any of them is committed. Patches to the same profile compose in order.
    pub fn patch_many(
        &self,
        patches: Vec<(ResourceId, ProfilePatch)>,
        version: u32,
    ) -> Result<Vec<ClientSslProfile>, StoreError> {
        let edits = patches
            .into_iter()
            .map(|(id, patch)| (id, move |current: &ClientSslProfile| Ok::<_, StoreError>(merge(current, patch))))
            .collect();
        self.update_many(edits, version)
    }

    /// Derive a candidate from each addressed profile with its edit, validate
    /// them all and commit them together, or commit none.
    ///
    /// Edits run under the store lock against a working copy, so an edit sees
    /// the result of earlier edits in the same batch.
    pub fn update_many<F>(
        &self,
        edits: Vec<(ResourceId, F)>,
        version: u32,
    ) -> Result<Vec<ClientSslProfile>, StoreError>
    where
        F: FnOnce(&ClientSslProfile) -> Result<ClientSslProfile, StoreError>,
    {
        let mut profiles = self.lock();
        let validator = self.validator(version);

        let mut working = profiles.clone();
        let mut touched = Vec::with_capacity(edits.len());
        for (id, edit) in edits {
            // A profile renamed by an earlier edit is addressed by its new identity.
            let current = working
                .find(&id)
                .ok_or_else(|| StoreError::NotFound(id.clone()))?;
            let candidate = edit(current)?;

            validator.validate(&candidate).inspect_err(|e| {
                metrics::record_validation_failure();
                tracing::debug!(profile = %id, error = %e, "Rejected profile update");
            })?;

            let new_id = candidate.id();
            working.replace(&id, candidate)?;
            touched.retain(|existing: &ResourceId| *existing != id);
            touched.push(new_id);
        }

        *profiles = working;
        metrics::record_store_commit("patch");
        tracing::debug!(count = touched.len(), "Committed profile updates");

        Ok(touched
            .iter()
            .filter_map(|id| profiles.find(id).cloned())
            .collect())
    }

    fn validator(&self, version: u32) -> Validator<'_> {
        Validator::new(&self.fs, &self.cipher_groups, version)
    }

    fn lock(&self) -> MutexGuard<'_, ResourceStore> {
        // Mutations only happen through a full replace, so a poisoned guard
        // still holds a consistent collection.
        self.profiles.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
