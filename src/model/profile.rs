//! Client SSL profile resource.

use serde::{Deserialize, Deserializer, Serialize};

use crate::model::identity::ResourceId;

/// One certificate/key pair of a multi-certificate (SNI) profile.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChainElement {
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub cert: String,
    #[serde(deserialize_with = "null_as_default")]
    pub key: String,
    #[serde(skip_serializing_if = "String::is_empty", deserialize_with = "null_as_default")]
    pub chain: String,
}

/// A client-side TLS profile.
///
/// Certificate material is referenced by path: `cert` and `chain` relative to
/// `/certs`, `key` relative to `/keys`. Both the single-certificate form
/// (`cert`/`key`) and the `certKeyChain` form may be set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ClientSslProfile {
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub partition: String,
    #[serde(deserialize_with = "null_as_default")]
    pub cert: String,
    #[serde(deserialize_with = "null_as_default")]
    pub key: String,
    #[serde(deserialize_with = "null_as_default")]
    pub chain: String,
    #[serde(alias = "cert_key_chain", deserialize_with = "null_as_default")]
    pub cert_key_chain: Vec<ChainElement>,
    #[serde(alias = "cipher_group", deserialize_with = "null_as_default")]
    pub cipher_group: String,
    #[serde(deserialize_with = "null_as_default")]
    pub ciphers: String,
    #[serde(alias = "defaults_from", deserialize_with = "null_as_default")]
    pub defaults_from: String,
}

/// Read `null` as the field's empty value.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl ClientSslProfile {
    pub fn new(partition: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            partition: partition.into(),
            ..Self::default()
        }
    }

    pub fn id(&self) -> ResourceId {
        ResourceId::new(self.partition.clone(), self.name.clone())
    }

    pub fn is(&self, id: &ResourceId) -> bool {
        self.partition == id.partition && self.name == id.name
    }

    /// Certificate that identifies the profile: the single-certificate `cert`,
    /// else the first `certKeyChain` entry's.
    pub fn primary_cert(&self) -> Option<&str> {
        if !self.cert.is_empty() {
            return Some(&self.cert);
        }
        self.cert_key_chain
            .first()
            .map(|element| element.cert.as_str())
            .filter(|cert| !cert.is_empty())
    }
}
