//! Download handlers - job submission and status queries.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use albumdl_core::{AlbumRequest, Job, JobId, JobStatus};

use crate::error::HttpError;
use crate::state::AppState;

/// Request to start a download.
///
/// Fields are optional here so a missing one yields the documented 400
/// message instead of a deserializer error.
#[derive(Debug, Default, Deserialize)]
pub struct StartDownloadRequest {
    pub url: Option<String>,
    pub artist: Option<String>,
    pub album: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct StartDownloadResponse {
    pub success: bool,
    pub download_id: JobId,
    pub message: &'static str,
}

/// Status of an id the store has never seen.
#[derive(Debug, Serialize)]
pub struct MissingJob {
    pub status: JobStatus,
    pub message: &'static str,
    pub progress: u8,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum StatusResponse {
    Found(Box<Job>),
    Missing(MissingJob),
}

/// Create a job and return its id. The download runs in the background.
pub async fn start(
    State(state): State<AppState>,
    payload: Result<Json<StartDownloadRequest>, JsonRejection>,
) -> Result<Json<StartDownloadResponse>, HttpError> {
    let Json(req) = payload?;
    let request = AlbumRequest::from_parts(req.url, req.artist, req.album, req.kind)?;
    let download_id = state.manager.submit(request).await?;

    Ok(Json(StartDownloadResponse {
        success: true,
        download_id,
        message: "Download started",
    }))
}

/// Get one job. Unknown ids answer 200 with `status: "not_found"`.
pub async fn status(State(state): State<AppState>, Path(id): Path<String>) -> Json<StatusResponse> {
    let response = match state.manager.get(&JobId::from(id.as_str())).await {
        Some(job) => StatusResponse::Found(Box::new(job)),
        None => StatusResponse::Missing(MissingJob {
            status: JobStatus::NotFound,
            message: "Download not found",
            progress: 0,
        }),
    };
    Json(response)
}

/// Every job keyed by id, in creation order.
pub async fn list(State(state): State<AppState>) -> Json<IndexMap<JobId, Job>> {
    let jobs = state.manager.list().await;

    tracing::debug!(
        target: "albumdl.http",
        total = jobs.len(),
        "Job list returned from /downloads",
    );

    Json(jobs)
}
