//! Handlers for the station settings panel.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use validator::Validate;

use radiodesk_db::models::settings::UpdateStationSettings;
use radiodesk_db::repositories::SettingsRepo;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/settings
pub async fn get_settings(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let settings = SettingsRepo::get(&state.pool).await?;
    Ok(Json(DataResponse { data: settings }))
}

/// PUT /api/v1/settings
pub async fn update_settings(
    State(state): State<AppState>,
    Json(body): Json<UpdateStationSettings>,
) -> AppResult<impl IntoResponse> {
    body.validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;
    let settings = SettingsRepo::update(&state.pool, &body).await?;
    Ok(Json(DataResponse { data: settings }))
}
