//! Cipher groups: a read-only set fixed at startup.

use serde::Serialize;
use std::collections::BTreeSet;
use std::sync::Arc;

pub const CIPHER_GROUP_KIND: &str = "tm:ltm:cipher:group:groupstate";

/// The process-lifetime set of declared cipher group names.
#[derive(Debug, Clone, Default)]
pub struct CipherGroups {
    names: Arc<BTreeSet<String>>,
}

impl CipherGroups {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: Arc::new(names.into_iter().map(Into::into).collect()),
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// Wire representation of a cipher group.
#[derive(Debug, Serialize)]
pub struct CipherGroupView {
    pub kind: &'static str,
    pub name: String,
}

impl CipherGroupView {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            kind: CIPHER_GROUP_KIND,
            name: name.into(),
        }
    }
}
