//! Upload, status and identifier listing handlers.

use axum::{
    Json,
    body::Bytes,
    extract::{Path, Query, State},
};
use pitchlens::{PlayerId, Role, TableSlot};
use serde::{Deserialize, Serialize};

use crate::server::error::ApiError;
use crate::server::state::AppState;

/// Query parameters for an upload.
#[derive(Deserialize)]
pub struct UploadParams {
    /// Original file name, used as the table label.
    pub name: Option<String>,
}

/// Summary of one loaded upload slot.
#[derive(Serialize)]
pub struct SlotStatus {
    pub slot: TableSlot,
    pub description: &'static str,
    pub loaded: bool,
    pub label: Option<String>,
    pub rows: Option<usize>,
    pub hash: Option<String>,
}

/// Response for the status endpoint.
#[derive(Serialize)]
pub struct StatusResponse {
    pub slots: Vec<SlotStatus>,
    pub complete: bool,
    pub analyses: usize,
    pub transport: String,
}

/// POST /api/upload/:slot
pub async fn upload_table(
    State(state): State<AppState>,
    Path(slot): Path<String>,
    Query(params): Query<UploadParams>,
    body: Bytes,
) -> Result<Json<SlotStatus>, ApiError> {
    let slot: TableSlot = slot.parse().map_err(ApiError::BadRequest)?;
    if body.is_empty() {
        return Err(ApiError::BadRequest(format!(
            "Empty upload for {}",
            slot.description()
        )));
    }

    let label = params.name.unwrap_or_else(|| format!("{}.csv", slot));
    let mut store = state.store.write().await;
    let metadata = store.load_bytes(slot, label, &body)?;

    Ok(Json(SlotStatus {
        slot,
        description: slot.description(),
        loaded: true,
        label: Some(metadata.label.clone()),
        rows: Some(metadata.row_count),
        hash: Some(metadata.hash.clone()),
    }))
}

/// GET /api/status
pub async fn get_status(State(state): State<AppState>) -> Json<StatusResponse> {
    let store = state.store.read().await;
    let sources: Vec<_> = store.sources().collect();

    let slots = TableSlot::ALL
        .iter()
        .map(|&slot| {
            let source = sources.iter().find(|(s, _)| **s == slot).map(|(_, m)| *m);
            SlotStatus {
                slot,
                description: slot.description(),
                loaded: source.is_some(),
                label: source.map(|m| m.label.clone()),
                rows: source.map(|m| m.row_count),
                hash: source.map(|m| m.hash.clone()),
            }
        })
        .collect();

    Json(StatusResponse {
        slots,
        complete: store.is_complete(),
        analyses: state.session.read().await.len(),
        transport: state.analyzer.client().transport_name().to_string(),
    })
}

/// Query parameters for the identifier listing.
#[derive(Deserialize)]
pub struct IdsParams {
    pub role: Option<Role>,
}

/// Selectable identifiers for one role.
#[derive(Serialize)]
pub struct IdsResponse {
    pub role: Role,
    pub ids: Vec<PlayerId>,
}

/// GET /api/ids?role=player|goalkeeper
pub async fn list_ids(
    State(state): State<AppState>,
    Query(params): Query<IdsParams>,
) -> Json<IdsResponse> {
    let role = params.role.unwrap_or(Role::Player);
    let store = state.store.read().await;

    let ids = match role {
        Role::Player => store.player_ids(),
        Role::Goalkeeper => store.goalkeeper_ids(),
    };

    Json(IdsResponse { role, ids })
}
