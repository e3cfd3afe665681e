//! Declarative (AS3-style) view of the profile set.
//!
//! # Data Flow
//! ```text
//! GET:   profiles → partition (Tenant) → profile (Application)
//!                 → certificate basename (Certificate, chainCA)
//! PATCH: [{op, path, value}] → (ResourceId, chain edit)*
//!                 → ConfigStore::update_many (all or nothing) → tree
//! ```
//!
//! # Design Decisions
//! - Only `replace` of a certificate's `chainCA` is accepted
//! - Every operation of one request commits together or not at all

use axum::{
    body::Bytes,
    extract::State,
    Extension, Json,
};
use serde::Deserialize;
use serde_json::{json, Map, Value};

use crate::api::error::ApiError;
use crate::http::server::AppState;
use crate::http::version::ApiVersion;
use crate::model::{ClientSslProfile, ResourceId};
use crate::store::StoreError;

const CHAIN_CA: &str = "chainCA";

#[derive(Debug, Deserialize)]
pub struct DeclarationOp {
    pub op: String,
    pub path: String,
    pub value: Value,
}

/// Target of a `chainCA` replace: a profile and optionally one of its
/// certificates by basename.
#[derive(Debug, Clone, PartialEq, Eq)]
struct ChainTarget {
    profile: ResourceId,
    certificate: Option<String>,
}

impl ChainTarget {
    /// Parse `/~partition~name[/<certificate>]/chainCA`.
    fn parse(path: &str, default_partition: Option<&str>) -> Result<Self, ApiError> {
        let unsupported = || ApiError::bad_request("unsupported path");

        let segments: Vec<&str> = path.strip_prefix('/').ok_or_else(unsupported)?.split('/').collect();
        let (profile, certificate) = match segments.as_slice() {
            [profile, CHAIN_CA] => (*profile, None),
            [profile, certificate, CHAIN_CA] if !certificate.is_empty() => {
                (*profile, Some(certificate.to_string()))
            }
            _ => return Err(unsupported()),
        };

        Ok(Self {
            profile: ResourceId::parse(profile, default_partition).map_err(|_| unsupported())?,
            certificate,
        })
    }
}

fn basename(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

/// Set the chain of the certificate named by `certificate`, or of the
/// profile's primary certificate.
fn replace_chain(
    current: &ClientSslProfile,
    certificate: Option<&str>,
    chain: &str,
) -> Result<ClientSslProfile, StoreError> {
    let mut candidate = current.clone();
    let names_primary = |cert: &str| certificate.map_or(true, |wanted| basename(cert) == wanted);

    if !candidate.cert.is_empty() && names_primary(&candidate.cert) {
        candidate.chain = chain.to_string();
        return Ok(candidate);
    }

    let element = if candidate.cert.is_empty() && certificate.is_none() {
        candidate.cert_key_chain.first_mut()
    } else {
        candidate
            .cert_key_chain
            .iter_mut()
            .find(|element| certificate.is_some_and(|wanted| basename(&element.cert) == wanted))
    };

    match element {
        Some(element) => {
            element.chain = chain.to_string();
            Ok(candidate)
        }
        None => Err(StoreError::CertificateNotFound {
            profile: current.id(),
            certificate: certificate.unwrap_or_default().to_string(),
        }),
    }
}

/// Render every profile as a partition → tenant → application tree.
pub fn render_tree(profiles: &[ClientSslProfile]) -> Value {
    let mut tree = Map::new();
    for profile in profiles {
        let tenant = tree
            .entry(profile.partition.clone())
            .or_insert_with(|| json!({"class": "Tenant"}));

        let mut application = Map::new();
        application.insert("class".to_string(), Value::from("Application"));

        if let Some(cert) = profile.primary_cert() {
            let chain = if profile.cert.is_empty() {
                profile
                    .cert_key_chain
                    .first()
                    .map(|element| element.chain.as_str())
                    .unwrap_or_default()
            } else {
                profile.chain.as_str()
            };

            let mut certificate = Map::new();
            certificate.insert("class".to_string(), Value::from("Certificate"));
            if !chain.is_empty() {
                certificate.insert(CHAIN_CA.to_string(), Value::from(chain));
            }
            application.insert(basename(cert).to_string(), Value::Object(certificate));
        }

        if let Value::Object(tenant) = tenant {
            tenant.insert(profile.name.clone(), Value::Object(application));
        }
    }
    Value::Object(tree)
}

pub async fn get_declaration(State(state): State<AppState>) -> Json<Value> {
    Json(render_tree(&state.store.list(None)))
}

pub async fn patch_declaration(
    State(state): State<AppState>,
    Extension(version): Extension<ApiVersion>,
    body: Bytes,
) -> Result<Json<Value>, ApiError> {
    let ops: Vec<DeclarationOp> =
        serde_json::from_slice(&body).map_err(|_| ApiError::bad_request("invalid patch request"))?;

    let mut edits = Vec::with_capacity(ops.len());
    for op in ops {
        if op.op != "replace" {
            return Err(ApiError::bad_request("unsupported op"));
        }
        let target = ChainTarget::parse(&op.path, state.default_partition())?;
        let chain = op
            .value
            .as_str()
            .ok_or_else(|| ApiError::bad_request("invalid value"))?
            .to_string();

        let certificate = target.certificate;
        edits.push((target.profile, move |current: &ClientSslProfile| {
            replace_chain(current, certificate.as_deref(), &chain)
        }));
    }

    let count = edits.len();
    state.store.update_many(edits, version.major())?;
    tracing::info!(operations = count, "Applied declaration patch");

    Ok(Json(render_tree(&state.store.list(None))))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::test_support::*;
    use crate::api::DECLARE_PATH;
    use crate::model::ChainElement;
    use axum::http::StatusCode;

    #[test]
    fn test_parse_target() {
        let target = ChainTarget::parse("/~Common~prof1/chainCA", None).unwrap();
        assert_eq!(target.profile, ResourceId::new("Common", "prof1"));
        assert_eq!(target.certificate, None);

        let target = ChainTarget::parse("/~Common~prof1/rsa.crt/chainCA", None).unwrap();
        assert_eq!(target.certificate.as_deref(), Some("rsa.crt"));

        for bad in ["~Common~prof1/chainCA", "/~Common~prof1/remark", "/prof1/chainCA", "/~Common~prof1/a/b/chainCA"] {
            assert_eq!(
                ChainTarget::parse(bad, None),
                Err(ApiError::bad_request("unsupported path")),
                "{}",
                bad
            );
        }
    }

    #[test]
    fn test_render_tree() {
        let mut single = ClientSslProfile::new("Common", "single");
        single.cert = "/Common/site.crt".into();
        single.chain = "/Common/ca.crt".into();

        let mut sni = ClientSslProfile::new("Tenant2", "sni");
        sni.cert_key_chain = vec![ChainElement {
            name: "default".into(),
            cert: "/Tenant2/sni.crt".into(),
            ..ChainElement::default()
        }];

        let bare = ClientSslProfile::new("Common", "bare");

        assert_eq!(
            render_tree(&[single, sni, bare]),
            json!({
                "Common": {
                    "class": "Tenant",
                    "single": {
                        "class": "Application",
                        "site.crt": {"class": "Certificate", "chainCA": "/Common/ca.crt"}
                    },
                    "bare": {"class": "Application"}
                },
                "Tenant2": {
                    "class": "Tenant",
                    "sni": {"class": "Application", "sni.crt": {"class": "Certificate"}}
                }
            })
        );
    }

    #[test]
    fn test_replace_chain_on_chain_element() {
        let mut profile = ClientSslProfile::new("Common", "sni");
        profile.cert_key_chain = vec![
            ChainElement {
                cert: "/Common/a.crt".into(),
                ..ChainElement::default()
            },
            ChainElement {
                cert: "/Common/b.crt".into(),
                ..ChainElement::default()
            },
        ];

        let updated = replace_chain(&profile, Some("b.crt"), "/Common/ca.crt").unwrap();
        assert_eq!(updated.cert_key_chain[1].chain, "/Common/ca.crt");
        assert!(updated.cert_key_chain[0].chain.is_empty());

        let updated = replace_chain(&profile, None, "/Common/ca.crt").unwrap();
        assert_eq!(updated.cert_key_chain[0].chain, "/Common/ca.crt");

        assert!(matches!(
            replace_chain(&profile, Some("c.crt"), "/Common/ca.crt"),
            Err(StoreError::CertificateNotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_patch_declaration() {
        let (state, router) = app();
        let ops = json!([{"op": "replace", "path": "/~Common~prof1/rsa.crt/chainCA", "value": "/Common/rsa.crt"}]);

        let (status, body) = call(&router, send_json("PATCH", DECLARE_PATH, ops)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["Common"]["prof1"]["rsa.crt"]["chainCA"], "/Common/rsa.crt");
        assert_eq!(state.store.list(None)[0].chain, "/Common/rsa.crt");

        let (status, body) = call(&router, get(DECLARE_PATH)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["Common"]["class"], "Tenant");
    }

    #[tokio::test]
    async fn test_patch_declaration_rejections() {
        let (state, router) = app();
        let cases = [
            (json!([{"op": "add", "path": "/~Common~prof1/chainCA", "value": "x"}]), StatusCode::BAD_REQUEST, "unsupported op"),
            (json!([{"op": "replace", "path": "/~Common~prof1/name", "value": "x"}]), StatusCode::BAD_REQUEST, "unsupported path"),
            (json!([{"op": "replace", "path": "/~Common~prof1/chainCA", "value": 1}]), StatusCode::BAD_REQUEST, "invalid value"),
            (json!([{"op": "replace", "path": "/~Common~nope/chainCA", "value": "x"}]), StatusCode::NOT_FOUND, "could not find profile"),
            (
                json!([{"op": "replace", "path": "/~Common~prof1/chainCA", "value": "/Common/missing.crt"}]),
                StatusCode::BAD_REQUEST,
                "invalid chain: file does not exist",
            ),
        ];
        for (ops, expected, message) in cases {
            let (status, body) = call(&router, send_json("PATCH", DECLARE_PATH, ops)).await;
            assert_eq!(status, expected, "{}", message);
            assert_eq!(body["message"], message);
        }
        assert!(state.store.list(None)[0].chain.is_empty());
    }

    #[tokio::test]
    async fn test_patch_declaration_is_atomic() {
        let (state, router) = app();
        let ops = json!([
            {"op": "replace", "path": "/~Common~prof1/chainCA", "value": "/Common/rsa.crt"},
            {"op": "replace", "path": "/~Common~prof1/chainCA", "value": "/Common/missing.crt"}
        ]);
        let (status, _) = call(&router, send_json("PATCH", DECLARE_PATH, ops)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(state.store.list(None)[0].chain.is_empty());
    }
}
