//! Ordered collection of client SSL profiles.

use crate::model::{ClientSslProfile, ResourceId};
use crate::store::StoreError;

/// The authoritative profile collection, in creation order.
///
/// Not synchronized on its own; [`ConfigStore`](crate::store::ConfigStore)
/// owns it behind a mutex.
#[derive(Debug, Clone, Default)]
pub struct ResourceStore {
    profiles: Vec<ClientSslProfile>,
}

impl ResourceStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Exact, case-sensitive lookup by identity.
    pub fn find(&self, id: &ResourceId) -> Option<&ClientSslProfile> {
        self.profiles.iter().find(|profile| profile.is(id))
    }

    /// Append a profile whose identity is not yet taken.
    pub fn create(&mut self, profile: ClientSslProfile) -> Result<(), StoreError> {
        let id = profile.id();
        if self.find(&id).is_some() {
            return Err(StoreError::Conflict(id));
        }
        self.profiles.push(profile);
        Ok(())
    }

    /// Replace the profile identified by `id` in place.
    ///
    /// The replacement may carry a different identity, as long as that
    /// identity belongs to no other profile.
    pub fn replace(&mut self, id: &ResourceId, profile: ClientSslProfile) -> Result<(), StoreError> {
        let new_id = profile.id();
        if new_id != *id && self.find(&new_id).is_some() {
            return Err(StoreError::Conflict(new_id));
        }

        let slot = self
            .profiles
            .iter_mut()
            .find(|existing| existing.is(id))
            .ok_or_else(|| StoreError::NotFound(id.clone()))?;
        *slot = profile;
        Ok(())
    }

    /// All profiles, or those of one partition, in store order.
    pub fn list(&self, partition: Option<&str>) -> Vec<ClientSslProfile> {
        self.profiles
            .iter()
            .filter(|profile| partition.map_or(true, |p| profile.partition == p))
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}
