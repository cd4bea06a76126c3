//! Handlers for divisions and workers.
//!
//! The divisions listing is served through the TTL cache on `AppState`;
//! every division write invalidates it. Department input is classified to
//! the typed enum once, at the write path.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use validator::Validate;

use radiodesk_core::error::CoreError;
use radiodesk_core::staff::Department;
use radiodesk_core::types::DbId;
use radiodesk_db::models::staff::{CreateDivision, CreateWorker, UpdateDivision, UpdateWorker};
use radiodesk_db::repositories::{DivisionRepo, WorkerRepo};

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Divisions
// ---------------------------------------------------------------------------

/// GET /api/v1/divisions
pub async fn list_divisions(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    if let Some(divisions) = state.cached_divisions() {
        return Ok(Json(DataResponse { data: divisions }));
    }

    let divisions = DivisionRepo::list(&state.pool).await?;
    state.cache_divisions(divisions.clone());
    Ok(Json(DataResponse { data: divisions }))
}

/// POST /api/v1/divisions
pub async fn create_division(
    State(state): State<AppState>,
    Json(body): Json<CreateDivision>,
) -> AppResult<impl IntoResponse> {
    body.validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;
    let department = Department::classify(&body.department)?;

    let division = DivisionRepo::create(&state.pool, &body.name, department).await?;
    state.invalidate_divisions();
    Ok((StatusCode::CREATED, Json(DataResponse { data: division })))
}

/// PUT /api/v1/divisions/{id}
pub async fn update_division(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(body): Json<UpdateDivision>,
) -> AppResult<impl IntoResponse> {
    body.validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;
    let department = body
        .department
        .as_deref()
        .map(Department::classify)
        .transpose()?;

    let division = DivisionRepo::update(&state.pool, id, body.name.as_deref(), department).await?;
    state.invalidate_divisions();
    Ok(Json(DataResponse { data: division }))
}

/// DELETE /api/v1/divisions/{id}
pub async fn delete_division(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if DivisionRepo::delete(&state.pool, id).await? {
        state.invalidate_divisions();
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound {
            entity: "Division",
            id,
        }))
    }
}

// ---------------------------------------------------------------------------
// Workers
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct WorkerListQuery {
    pub division_id: Option<DbId>,
    /// Department filter; accepts the same spellings as data entry.
    pub department: Option<String>,
    /// When true, only active workers are returned.
    #[serde(default)]
    pub active: bool,
}

/// GET /api/v1/workers?division_id=&department=&active=
pub async fn list_workers(
    State(state): State<AppState>,
    Query(query): Query<WorkerListQuery>,
) -> AppResult<impl IntoResponse> {
    let department = query
        .department
        .as_deref()
        .map(Department::classify)
        .transpose()?;

    let workers =
        WorkerRepo::list(&state.pool, query.division_id, department, query.active).await?;
    Ok(Json(DataResponse { data: workers }))
}

/// GET /api/v1/workers/{id}
pub async fn get_worker(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let worker = WorkerRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Worker",
            id,
        }))?;
    Ok(Json(DataResponse { data: worker }))
}

/// POST /api/v1/workers
pub async fn create_worker(
    State(state): State<AppState>,
    Json(body): Json<CreateWorker>,
) -> AppResult<impl IntoResponse> {
    body.validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    if let Some(division_id) = body.division_id {
        DivisionRepo::find_by_id(&state.pool, division_id)
            .await?
            .ok_or(AppError::Core(CoreError::NotFound {
                entity: "Division",
                id: division_id,
            }))?;
    }

    let worker = WorkerRepo::create(&state.pool, &body).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: worker })))
}

/// PUT /api/v1/workers/{id}
pub async fn update_worker(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(body): Json<UpdateWorker>,
) -> AppResult<impl IntoResponse> {
    body.validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    if let Some(division_id) = body.division_id {
        DivisionRepo::find_by_id(&state.pool, division_id)
            .await?
            .ok_or(AppError::Core(CoreError::NotFound {
                entity: "Division",
                id: division_id,
            }))?;
    }

    let worker = WorkerRepo::update(&state.pool, id, &body).await?;
    Ok(Json(DataResponse { data: worker }))
}

/// POST /api/v1/workers/{id}/deactivate
pub async fn deactivate_worker(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if WorkerRepo::deactivate(&state.pool, id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound {
            entity: "Worker",
            id,
        }))
    }
}
