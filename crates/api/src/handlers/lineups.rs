//! Handlers for lineups and their items.
//!
//! Attaching a lineup to a virtual occurrence materializes it first: the
//! projection becomes a real row, then the lineup is linked to that row.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use validator::Validate;

use radiodesk_core::error::CoreError;
use radiodesk_core::schedule::SlotId;
use radiodesk_core::types::DbId;
use radiodesk_db::models::lineup::{
    CreateLineupItem, LineupForSlot, LineupWithItems, ReorderLineupItems, UpdateLineup,
    UpdateLineupItem,
};
use radiodesk_db::repositories::{LineupRepo, SlotRepo};

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// Item kinds accepted by the lineup editor, mirroring the DB check.
const ITEM_KINDS: [&str; 5] = ["song", "talk", "ad", "jingle", "sweeper"];

fn validate_item_kind(kind: &str) -> AppResult<()> {
    if ITEM_KINDS.contains(&kind) {
        Ok(())
    } else {
        Err(AppError::BadRequest(format!(
            "unknown item kind '{kind}' (expected one of: {})",
            ITEM_KINDS.join(", ")
        )))
    }
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/lineups/for-slot
///
/// Find or create the lineup for a slot occurrence. Accepts virtual slot
/// ids and materializes them before linking.
pub async fn for_slot(
    State(state): State<AppState>,
    Json(body): Json<LineupForSlot>,
) -> AppResult<impl IntoResponse> {
    let slot_id = match body.slot_id {
        SlotId::Real(id) => {
            let row = SlotRepo::find_by_id(&state.pool, id)
                .await?
                .filter(|row| !row.is_deleted)
                .ok_or(AppError::Core(CoreError::NotFound {
                    entity: "ScheduleSlot",
                    id,
                }))?;
            if row.is_master {
                return Err(AppError::BadRequest(
                    "lineups attach to occurrences; pass the occurrence's virtual id".to_string(),
                ));
            }
            row.id
        }
        SlotId::Virtual { master_id, date } => {
            if date != body.date {
                return Err(AppError::BadRequest(
                    "virtual slot id date does not match lineup date".to_string(),
                ));
            }
            let materialized = SlotRepo::materialize(&state.pool, master_id, date).await?;
            materialized.slot.id
        }
    };

    let lineup = LineupRepo::find_or_create(&state.pool, slot_id, body.date).await?;
    let items = LineupRepo::list_items(&state.pool, lineup.id).await?;
    Ok(Json(DataResponse {
        data: LineupWithItems { lineup, items },
    }))
}

/// GET /api/v1/lineups/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let lineup = LineupRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Lineup",
            id,
        }))?;
    let items = LineupRepo::list_items(&state.pool, id).await?;
    Ok(Json(DataResponse {
        data: LineupWithItems { lineup, items },
    }))
}

/// PUT /api/v1/lineups/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(body): Json<UpdateLineup>,
) -> AppResult<impl IntoResponse> {
    body.validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;
    let lineup = LineupRepo::update(&state.pool, id, &body).await?;
    Ok(Json(DataResponse { data: lineup }))
}

/// POST /api/v1/lineups/{id}/items
pub async fn add_item(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(body): Json<CreateLineupItem>,
) -> AppResult<impl IntoResponse> {
    body.validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;
    validate_item_kind(&body.kind)?;

    LineupRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Lineup",
            id,
        }))?;

    let item = LineupRepo::add_item(&state.pool, id, &body).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: item })))
}

/// PUT /api/v1/lineups/{id}/items/{item_id}
pub async fn update_item(
    State(state): State<AppState>,
    Path((id, item_id)): Path<(DbId, DbId)>,
    Json(body): Json<UpdateLineupItem>,
) -> AppResult<impl IntoResponse> {
    body.validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;
    if let Some(kind) = &body.kind {
        validate_item_kind(kind)?;
    }
    let item = LineupRepo::update_item(&state.pool, id, item_id, &body).await?;
    Ok(Json(DataResponse { data: item }))
}

/// DELETE /api/v1/lineups/{id}/items/{item_id}
pub async fn remove_item(
    State(state): State<AppState>,
    Path((id, item_id)): Path<(DbId, DbId)>,
) -> AppResult<StatusCode> {
    if LineupRepo::remove_item(&state.pool, id, item_id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound {
            entity: "LineupItem",
            id: item_id,
        }))
    }
}

/// PUT /api/v1/lineups/{id}/items/reorder
pub async fn reorder_items(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(body): Json<ReorderLineupItems>,
) -> AppResult<impl IntoResponse> {
    LineupRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Lineup",
            id,
        }))?;

    let items = LineupRepo::reorder_items(&state.pool, id, &body.item_ids).await?;
    Ok(Json(DataResponse { data: items }))
}
