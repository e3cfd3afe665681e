use axum::{
    extract::{Path, State},
    Json,
};

use crate::api::error::ApiError;
use crate::http::server::AppState;
use crate::model::cipher_group::CipherGroupView;
use crate::model::ResourceId;

/// Read a cipher group. Groups are global, so the partition is ignored.
pub async fn get_cipher_group(
    State(state): State<AppState>,
    Path(segment): Path<String>,
) -> Result<Json<CipherGroupView>, ApiError> {
    let id = ResourceId::parse(&segment, state.default_partition())?;
    if !state.store.cipher_groups().contains(&id.name) {
        return Err(ApiError::NotFound("group not found".to_string()));
    }
    Ok(Json(CipherGroupView::new(id.name)))
}
