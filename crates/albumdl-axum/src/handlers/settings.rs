//! Settings handlers - download directory and audio format.

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use serde::Serialize;

use albumdl_core::{Settings, SettingsUpdate};

use crate::error::HttpError;
use crate::state::AppState;

/// Settings envelope returned by both settings endpoints.
#[derive(Debug, Serialize)]
pub struct SettingsResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,
    pub settings: Settings,
}

/// Get the current settings.
pub async fn get(State(state): State<AppState>) -> Json<SettingsResponse> {
    Json(SettingsResponse {
        success: true,
        message: None,
        settings: state.settings.snapshot().await,
    })
}

/// Apply a partial settings update. Jobs already submitted keep their snapshot.
pub async fn update(
    State(state): State<AppState>,
    payload: Result<Json<SettingsUpdate>, JsonRejection>,
) -> Result<Json<SettingsResponse>, HttpError> {
    let Json(update) = payload?;
    let settings = state.settings.update(&update).await?;

    Ok(Json(SettingsResponse {
        success: true,
        message: Some("Settings updated"),
        settings,
    }))
}
