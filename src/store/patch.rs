//! Top-level merge-patch of client SSL profiles.
//!
//! # Responsibilities
//! - Decode a partial-update document into a typed [`ProfilePatch`]
//! - Merge it onto a profile snapshot without touching the store
//!
//! # Design Decisions
//! - Merge is one level deep: `certKeyChain` is replaced wholesale when present
//! - Absent key keeps the field, `null` clears it, any other value overwrites it
//! - Keys the profile does not know (`kind`, `selfLink`, ...) are ignored

use serde::{Deserialize, Deserializer};

use crate::model::{ChainElement, ClientSslProfile};

/// Change requested for one field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FieldPatch<T> {
    /// Key absent from the document.
    #[default]
    Keep,
    /// Key present with `null`.
    Clear,
    /// Key present with a value.
    Set(T),
}

impl<T: Default> FieldPatch<T> {
    fn apply_to(self, field: &mut T) {
        match self {
            FieldPatch::Keep => {}
            FieldPatch::Clear => *field = T::default(),
            FieldPatch::Set(value) => *field = value,
        }
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for FieldPatch<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match Option::<T>::deserialize(deserializer)? {
            Some(value) => FieldPatch::Set(value),
            None => FieldPatch::Clear,
        })
    }
}

/// A partial update of a [`ClientSslProfile`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ProfilePatch {
    pub name: FieldPatch<String>,
    pub partition: FieldPatch<String>,
    pub cert: FieldPatch<String>,
    pub key: FieldPatch<String>,
    pub chain: FieldPatch<String>,
    #[serde(alias = "cert_key_chain")]
    pub cert_key_chain: FieldPatch<Vec<ChainElement>>,
    #[serde(alias = "cipher_group")]
    pub cipher_group: FieldPatch<String>,
    pub ciphers: FieldPatch<String>,
    #[serde(alias = "defaults_from")]
    pub defaults_from: FieldPatch<String>,
}

impl ProfilePatch {
    /// Decode a patch document; anything but a JSON object is rejected.
    pub fn from_value(document: serde_json::Value) -> Result<Self, serde_json::Error> {
        if !document.is_object() {
            return Err(serde::de::Error::custom("patch document must be an object"));
        }
        serde_json::from_value(document)
    }

    /// A patch that only replaces the profile's CA chain.
    pub fn chain(chain: impl Into<String>) -> Self {
        Self {
            chain: FieldPatch::Set(chain.into()),
            ..Self::default()
        }
    }
}

/// Candidate produced by applying `patch` to a copy of `current`.
pub fn merge(current: &ClientSslProfile, patch: ProfilePatch) -> ClientSslProfile {
    let mut candidate = current.clone();
    patch.name.apply_to(&mut candidate.name);
    patch.partition.apply_to(&mut candidate.partition);
    patch.cert.apply_to(&mut candidate.cert);
    patch.key.apply_to(&mut candidate.key);
    patch.chain.apply_to(&mut candidate.chain);
    patch.cert_key_chain.apply_to(&mut candidate.cert_key_chain);
    patch.cipher_group.apply_to(&mut candidate.cipher_group);
    patch.ciphers.apply_to(&mut candidate.ciphers);
    patch.defaults_from.apply_to(&mut candidate.defaults_from);
    candidate
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn existing() -> ClientSslProfile {
        ClientSslProfile {
            name: "prof1".into(),
            partition: "Common".into(),
            cert: "c1.crt".into(),
            key: "k1.key".into(),
            cert_key_chain: vec![
                ChainElement {
                    name: "a".into(),
                    cert: "a.crt".into(),
                    key: "a.key".into(),
                    chain: String::new(),
                },
                ChainElement {
                    name: "b".into(),
                    cert: "b.crt".into(),
                    key: "b.key".into(),
                    chain: String::new(),
                },
            ],
            cipher_group: "a".into(),
            ..ClientSslProfile::default()
        }
    }

    fn patch(value: serde_json::Value) -> ProfilePatch {
        ProfilePatch::from_value(value).unwrap()
    }

    #[test]
    fn test_empty_patch_round_trips() {
        let current = existing();
        assert_eq!(merge(&current, patch(json!({}))), current);
    }

    #[test]
    fn test_absent_null_and_present() {
        let merged = merge(
            &existing(),
            patch(json!({"ciphers": "some-cipher", "cipherGroup": null})),
        );
        assert_eq!(merged.ciphers, "some-cipher");
        assert_eq!(merged.cipher_group, "");
        assert_eq!(merged.cert, "c1.crt");
        assert_eq!(merged.key, "k1.key");
    }

    #[test]
    fn test_nested_list_replaced_wholesale() {
        let merged = merge(
            &existing(),
            patch(json!({"certKeyChain": [{"name": "c", "cert": "c.crt"}]})),
        );
        assert_eq!(merged.cert_key_chain.len(), 1);
        assert_eq!(merged.cert_key_chain[0].cert, "c.crt");
        assert_eq!(merged.cert_key_chain[0].key, "");

        let cleared = merge(&existing(), patch(json!({"certKeyChain": null})));
        assert!(cleared.cert_key_chain.is_empty());
    }

    #[test]
    fn test_null_inside_chain_elements() {
        let merged = merge(
            &existing(),
            patch(json!({"certKeyChain": [{"name": "a", "cert": "a.crt", "key": null, "chain": null}]})),
        );
        assert_eq!(merged.cert_key_chain.len(), 1);
        assert_eq!(merged.cert_key_chain[0].key, "");
        assert_eq!(merged.cert_key_chain[0].chain, "");
    }

    #[test]
    fn test_snake_case_aliases() {
        let merged = merge(
            &existing(),
            patch(json!({
                "cipher_group": null,
                "defaults_from": "/Common/clientssl",
                "cert_key_chain": [{"cert": "z.crt"}]
            })),
        );
        assert_eq!(merged.cipher_group, "");
        assert_eq!(merged.defaults_from, "/Common/clientssl");
        assert_eq!(merged.cert_key_chain[0].cert, "z.crt");
    }

    #[test]
    fn test_idempotent() {
        let document = json!({"cert": "x"});
        let once = merge(&existing(), patch(document.clone()));
        let twice = merge(&once, patch(document));
        assert_eq!(once, twice);
        assert_eq!(twice.cert, "x");
    }

    #[test]
    fn test_unknown_keys_ignored() {
        let merged = merge(
            &existing(),
            patch(json!({"kind": "tm:ltm:profile:client-ssl:client-sslstate", "selfLink": "x", "bogus": 1})),
        );
        assert_eq!(merged, existing());
    }

    #[test]
    fn test_rejects_non_objects_and_bad_types() {
        assert!(ProfilePatch::from_value(json!("not-json")).is_err());
        assert!(ProfilePatch::from_value(json!([1, 2])).is_err());
        assert!(ProfilePatch::from_value(json!({"cert": 5})).is_err());
    }

    #[test]
    fn test_merge_leaves_input_untouched() {
        let current = existing();
        let _ = merge(&current, patch(json!({"name": "renamed"})));
        assert_eq!(current, existing());
    }
}
