//! Client SSL profile collection and item handlers.
//!
//! # Responsibilities
//! - List profiles, optionally filtered by partition and limited to fields
//! - Create a profile from a full JSON document
//! - Read and merge-patch a single profile addressed as `~partition~name`
//! - Decorate every rendered profile with `kind` and `selfLink`

use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::HeaderMap,
    Extension, Json,
};
use serde::Deserialize;
use serde_json::{json, Map, Value};

use crate::api::error::ApiError;
use crate::api::{require_content_type, APPLICATION_JSON, PROFILES_PATH};
use crate::http::server::AppState;
use crate::http::version::ApiVersion;
use crate::model::{ClientSslProfile, ResourceId};
use crate::store::ProfilePatch;

pub const PROFILE_KIND: &str = "tm:ltm:profile:client-ssl:client-sslstate";
pub const PROFILE_COLLECTION_KIND: &str = "tm:ltm:profile:client-ssl:client-sslcollectionstate";

/// Host used in rendered `selfLink`s, as the appliance reports them.
const SELF_LINK_HOST: &str = "https://localhost";

#[derive(Debug, Default, Deserialize)]
pub struct ProfileQuery {
    #[serde(rename = "$select")]
    pub select: Option<String>,
    #[serde(rename = "$filter")]
    pub filter: Option<String>,
}

impl ProfileQuery {
    /// Partition named by a `partition eq <value>` filter.
    fn partition(&self) -> Result<Option<&str>, ApiError> {
        match self.filter.as_deref().filter(|f| !f.is_empty()) {
            None => Ok(None),
            Some(filter) => filter
                .strip_prefix("partition eq ")
                .map(|partition| Some(partition.trim()).filter(|p| !p.is_empty()))
                .ok_or_else(|| ApiError::bad_request("unsupported $filter")),
        }
    }

    fn fields(&self) -> Option<Vec<&str>> {
        self.select
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .map(|s| s.split(',').map(str::trim).filter(|f| !f.is_empty()).collect())
    }
}

/// Wire form of a profile: its fields plus `kind` and `selfLink`,
/// optionally reduced to the `select`ed keys.
pub fn render(
    profile: &ClientSslProfile,
    version: &ApiVersion,
    select: Option<&[&str]>,
) -> Result<Map<String, Value>, ApiError> {
    let mut object = match serde_json::to_value(profile) {
        Ok(Value::Object(object)) => object,
        Ok(_) => return Err(ApiError::internal("profile did not render as an object")),
        Err(e) => return Err(ApiError::internal(format!("could not render profile: {}", e))),
    };

    object.insert("kind".to_string(), Value::from(PROFILE_KIND));
    object.insert(
        "selfLink".to_string(),
        Value::from(format!(
            "{}{}/{}?ver={}",
            SELF_LINK_HOST,
            PROFILES_PATH,
            profile.id(),
            version.as_str()
        )),
    );

    if let Some(fields) = select {
        object.retain(|key, _| fields.contains(&key.as_str()));
    }
    Ok(object)
}

pub async fn list_profiles(
    State(state): State<AppState>,
    Extension(version): Extension<ApiVersion>,
    Query(query): Query<ProfileQuery>,
) -> Result<Json<Value>, ApiError> {
    let partition = query.partition()?;
    let fields = query.fields();

    let items = state
        .store
        .list(partition)
        .iter()
        .map(|profile| render(profile, &version, fields.as_deref()).map(Value::Object))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Json(json!({
        "kind": PROFILE_COLLECTION_KIND,
        "items": items,
    })))
}

pub async fn create_profile(
    State(state): State<AppState>,
    Extension(version): Extension<ApiVersion>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<Map<String, Value>>, ApiError> {
    require_content_type(&headers, APPLICATION_JSON)?;
    let profile: ClientSslProfile =
        serde_json::from_slice(&body).map_err(|_| ApiError::bad_request("invalid post request"))?;

    let created = state.store.create(profile, version.major())?;
    tracing::info!(profile = %created.id(), "Created client-ssl profile");
    Ok(Json(render(&created, &version, None)?))
}

pub async fn get_profile(
    State(state): State<AppState>,
    Extension(version): Extension<ApiVersion>,
    Path(segment): Path<String>,
    Query(query): Query<ProfileQuery>,
) -> Result<Json<Map<String, Value>>, ApiError> {
    let id = ResourceId::parse(&segment, state.default_partition())?;
    let profile = state
        .store
        .get(&id)
        .ok_or_else(|| ApiError::NotFound("could not find profile".to_string()))?;

    Ok(Json(render(&profile, &version, query.fields().as_deref())?))
}

pub async fn patch_profile(
    State(state): State<AppState>,
    Extension(version): Extension<ApiVersion>,
    Path(segment): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<Map<String, Value>>, ApiError> {
    let id = ResourceId::parse(&segment, state.default_partition())?;
    require_content_type(&headers, APPLICATION_JSON)?;

    let patch = serde_json::from_slice::<Value>(&body)
        .ok()
        .and_then(|document| ProfilePatch::from_value(document).ok())
        .ok_or_else(|| ApiError::bad_request("invalid patch request"))?;

    let updated = state.store.patch(&id, patch, version.major())?;
    tracing::info!(profile = %id, "Patched client-ssl profile");
    Ok(Json(render(&updated, &version, None)?))
}
