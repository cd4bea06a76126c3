//! Handlers for the schedule: resolved views, master and instance CRUD,
//! materialization, and occurrence suppression.
//!
//! Every write that lands on a calendar day goes through the conflict check
//! against that day's resolved slots before touching the store.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use validator::Validate;

use radiodesk_core::error::CoreError;
use radiodesk_core::schedule::{
    self, check_conflict, find_conflict, validate_day_of_week, validate_time_window, week_bounds,
    windows_overlap, CandidateWindow, ResolvedSlot, SlotId,
};
use radiodesk_core::types::DbId;
use radiodesk_db::models::slot::{
    CreateInstanceSlot, CreateMasterSlot, MaterializeOccurrence, ScheduleSlotRow,
    SuppressOccurrence, UpdateSlot,
};
use radiodesk_db::repositories::SlotRepo;
use radiodesk_db::DbPool;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Query/request types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct RangeQuery {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

#[derive(Debug, Deserialize)]
pub struct WeekQuery {
    pub date: NaiveDate,
}

/// Dry-run conflict validation request for the admin UI.
#[derive(Debug, Deserialize)]
pub struct ConflictCheckRequest {
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    /// Identity of the slot being edited, excluded from the check.
    pub exclude_id: Option<SlotId>,
}

#[derive(Debug, Serialize)]
pub struct ConflictCheckResponse {
    pub conflicts: bool,
    pub with: Option<ResolvedSlot>,
}

// ---------------------------------------------------------------------------
// Shared resolution helper
// ---------------------------------------------------------------------------

/// Load masters and range instances, then resolve the effective schedule.
pub(crate) async fn resolve_range(
    pool: &DbPool,
    start: NaiveDate,
    end: NaiveDate,
) -> AppResult<Vec<ResolvedSlot>> {
    let master_rows = SlotRepo::list_masters(pool).await?;
    let instance_rows = SlotRepo::list_instances_in_range(pool, start, end).await?;

    let masters = master_rows
        .iter()
        .map(ScheduleSlotRow::to_master)
        .collect::<Result<Vec<_>, _>>()?;
    let overrides = instance_rows
        .iter()
        .map(ScheduleSlotRow::to_instance)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(schedule::resolve(&masters, &overrides, start, end)?)
}

// ---------------------------------------------------------------------------
// Resolved views
// ---------------------------------------------------------------------------

/// GET /api/v1/schedule?start=YYYY-MM-DD&end=YYYY-MM-DD
///
/// Resolve an arbitrary inclusive date range.
pub async fn get_range(
    State(state): State<AppState>,
    Query(query): Query<RangeQuery>,
) -> AppResult<impl IntoResponse> {
    let slots = resolve_range(&state.pool, query.start, query.end).await?;
    Ok(Json(DataResponse { data: slots }))
}

/// GET /api/v1/schedule/week?date=YYYY-MM-DD
///
/// Resolve the Sunday-to-Saturday week containing `date`.
pub async fn get_week(
    State(state): State<AppState>,
    Query(query): Query<WeekQuery>,
) -> AppResult<impl IntoResponse> {
    let (start, end) = week_bounds(query.date);
    let slots = resolve_range(&state.pool, start, end).await?;
    Ok(Json(DataResponse { data: slots }))
}

/// POST /api/v1/schedule/conflict-check
///
/// Validate a candidate window against its day without writing anything.
pub async fn conflict_check(
    State(state): State<AppState>,
    Json(body): Json<ConflictCheckRequest>,
) -> AppResult<impl IntoResponse> {
    validate_time_window(body.start_time, body.end_time)?;

    let resolved = resolve_range(&state.pool, body.date, body.date).await?;
    let candidate = CandidateWindow {
        start_time: body.start_time,
        end_time: body.end_time,
    };
    let hit = find_conflict(&resolved, candidate, body.exclude_id.as_ref());

    Ok(Json(DataResponse {
        data: ConflictCheckResponse {
            conflicts: hit.is_some(),
            with: hit.cloned(),
        },
    }))
}

// ---------------------------------------------------------------------------
// Masters
// ---------------------------------------------------------------------------

/// GET /api/v1/schedule/masters
pub async fn list_masters(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let masters = SlotRepo::list_masters(&state.pool).await?;
    Ok(Json(DataResponse { data: masters }))
}

/// POST /api/v1/schedule/masters
///
/// Template-level invariant: masters on the same weekday must not overlap.
pub async fn create_master(
    State(state): State<AppState>,
    Json(body): Json<CreateMasterSlot>,
) -> AppResult<impl IntoResponse> {
    body.validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;
    validate_day_of_week(body.day_of_week)?;
    validate_time_window(body.start_time, body.end_time)?;

    check_master_overlap(
        &state.pool,
        body.day_of_week,
        body.start_time,
        body.end_time,
        None,
    )
    .await?;

    let row = SlotRepo::create_master(&state.pool, &body).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: row })))
}

/// PUT /api/v1/schedule/masters/{id}
pub async fn update_master(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(body): Json<UpdateSlot>,
) -> AppResult<impl IntoResponse> {
    body.validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let existing = SlotRepo::find_by_id(&state.pool, id)
        .await?
        .filter(|row| row.is_master && !row.is_deleted)
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "MasterSlot",
            id,
        }))?;
    let master = existing.to_master()?;

    let day_of_week = body.day_of_week.unwrap_or(master.day_of_week);
    let start_time = body.start_time.unwrap_or(master.start_time);
    let end_time = body.end_time.unwrap_or(master.end_time);
    validate_day_of_week(day_of_week)?;
    validate_time_window(start_time, end_time)?;

    check_master_overlap(&state.pool, day_of_week, start_time, end_time, Some(id)).await?;

    let row = SlotRepo::update(&state.pool, id, &body).await?;
    Ok(Json(DataResponse { data: row }))
}

/// DELETE /api/v1/schedule/masters/{id}
///
/// Hard delete; overrides of this master cascade away with it.
pub async fn delete_master(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if SlotRepo::delete_master(&state.pool, id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound {
            entity: "MasterSlot",
            id,
        }))
    }
}

/// Reject a master window overlapping another master on the same weekday.
async fn check_master_overlap(
    pool: &DbPool,
    day_of_week: i16,
    start_time: NaiveTime,
    end_time: NaiveTime,
    exclude_id: Option<DbId>,
) -> AppResult<()> {
    let masters = SlotRepo::list_masters(pool).await?;
    for row in masters
        .iter()
        .filter(|m| m.day_of_week == Some(day_of_week) && Some(m.id) != exclude_id)
    {
        if windows_overlap(start_time, end_time, row.start_time, row.end_time) {
            return Err(AppError::Core(CoreError::Conflict(format!(
                "time window {}-{} overlaps master '{}' ({}-{})",
                start_time, end_time, row.show_name, row.start_time, row.end_time
            ))));
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Instances
// ---------------------------------------------------------------------------

/// POST /api/v1/schedule/instances
///
/// Create a standalone custom slot, or an override of a master occurrence
/// when `parent_slot_id` is set. The candidate is checked against the
/// resolved day; an override never conflicts with the projection it
/// replaces.
pub async fn create_instance(
    State(state): State<AppState>,
    Json(body): Json<CreateInstanceSlot>,
) -> AppResult<impl IntoResponse> {
    body.validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;
    validate_time_window(body.start_time, body.end_time)?;

    if let Some(parent) = body.parent_slot_id {
        let parent_row = SlotRepo::find_by_id(&state.pool, parent)
            .await?
            .ok_or(AppError::Core(CoreError::NotFound {
                entity: "MasterSlot",
                id: parent,
            }))?;
        if !parent_row.is_master {
            return Err(AppError::BadRequest(
                "parent_slot_id must reference a master slot".to_string(),
            ));
        }
        // The occurrence may already carry a real override; edit that row
        // instead of stacking a second one. The partial unique index catches
        // the race this check cannot see.
        if SlotRepo::find_active_override(&state.pool, parent, body.slot_date)
            .await?
            .is_some()
        {
            return Err(AppError::Core(CoreError::AlreadyMaterialized {
                master_id: parent,
                date: body.slot_date,
            }));
        }
    }

    let resolved = resolve_range(&state.pool, body.slot_date, body.slot_date).await?;
    let exclude = body.parent_slot_id.map(|parent| SlotId::Virtual {
        master_id: parent,
        date: body.slot_date,
    });
    check_conflict(
        &resolved,
        CandidateWindow {
            start_time: body.start_time,
            end_time: body.end_time,
        },
        exclude.as_ref(),
    )?;

    let row = SlotRepo::create_instance(&state.pool, &body).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: row })))
}

/// PUT /api/v1/schedule/instances/{id}
pub async fn update_instance(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(body): Json<UpdateSlot>,
) -> AppResult<impl IntoResponse> {
    body.validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;
    if body.day_of_week.is_some() {
        return Err(AppError::BadRequest(
            "instances derive day_of_week from their date".to_string(),
        ));
    }

    let existing = SlotRepo::find_by_id(&state.pool, id)
        .await?
        .filter(|row| !row.is_master && !row.is_deleted)
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "InstanceSlot",
            id,
        }))?;
    let instance = existing.to_instance()?;

    let start_time = body.start_time.unwrap_or(instance.start_time);
    let end_time = body.end_time.unwrap_or(instance.end_time);
    validate_time_window(start_time, end_time)?;

    let resolved = resolve_range(&state.pool, instance.date, instance.date).await?;
    let own_id = SlotId::Real(id);
    check_conflict(
        &resolved,
        CandidateWindow {
            start_time,
            end_time,
        },
        Some(&own_id),
    )?;

    let row = SlotRepo::update(&state.pool, id, &body).await?;
    Ok(Json(DataResponse { data: row }))
}

/// DELETE /api/v1/schedule/instances/{id}
///
/// Soft delete. For an override this permanently suppresses the master
/// occurrence on that date; it does not revert to the master default.
pub async fn delete_instance(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if SlotRepo::soft_delete_instance(&state.pool, id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound {
            entity: "InstanceSlot",
            id,
        }))
    }
}

// ---------------------------------------------------------------------------
// Occurrences
// ---------------------------------------------------------------------------

/// POST /api/v1/schedule/occurrences/materialize
///
/// Convert a virtual occurrence into a real row. Idempotent: repeating the
/// call returns the existing row with `created = false`.
pub async fn materialize_occurrence(
    State(state): State<AppState>,
    Json(body): Json<MaterializeOccurrence>,
) -> AppResult<impl IntoResponse> {
    let materialized = SlotRepo::materialize(&state.pool, body.master_id, body.date).await?;
    let status = if materialized.created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok((status, Json(DataResponse { data: materialized })))
}

/// DELETE /api/v1/schedule/occurrences?master_id=&date=
///
/// Suppress one master occurrence with a deletion override.
pub async fn suppress_occurrence(
    State(state): State<AppState>,
    Query(query): Query<SuppressOccurrence>,
) -> AppResult<impl IntoResponse> {
    let row = SlotRepo::suppress_occurrence(&state.pool, query.master_id, query.date).await?;
    Ok(Json(DataResponse { data: row }))
}
