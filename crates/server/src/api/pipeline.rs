//! Pipeline API handlers.
//!
//! Operation endpoints run the adapter call to completion and respond with
//! the snapshot taken afterwards, so a client always renders from the
//! post-operation state.

use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use overdub_core::{ComposeRequest, PipelineError, PipelineSnapshot, Stage};

use crate::state::AppState;

// ============================================================================
// Request/Response Types
// ============================================================================

/// Request body for starting a source-video download
#[derive(Debug, Deserialize)]
pub struct DownloadBody {
    /// URL of the source video
    pub url: String,
}

/// Request body for translating script text
#[derive(Debug, Deserialize)]
pub struct TranslateBody {
    /// Text to translate
    pub text: String,
}

/// Request body for synthesizing narration
#[derive(Debug, Deserialize)]
pub struct SynthesizeBody {
    /// Script to narrate
    pub script: String,
}

/// Request body for composing the final video
#[derive(Debug, Deserialize)]
pub struct ComposeBody {
    /// Source video track
    pub video_path: String,
    /// Narration audio track
    pub audio_path: String,
    /// Background music track
    pub bgm_path: String,
    /// Sound effects track
    pub sfx_path: String,
}

/// Request body for manual stage navigation
#[derive(Debug, Deserialize)]
pub struct NavigateBody {
    /// Target stage
    pub stage: Stage,
}

/// Request body for replacing the working script
#[derive(Debug, Deserialize)]
pub struct ScriptBody {
    /// New script text
    pub script: String,
}

/// Request body for resolving the cleanup decision
#[derive(Debug, Deserialize)]
pub struct CleanupBody {
    /// Whether intermediate files should be deleted
    pub delete: bool,
}

/// Cleaner report in the cleanup response
#[derive(Debug, Serialize)]
pub struct CleanupReportBody {
    pub deleted_count: usize,
    pub errors: Vec<String>,
}

/// Response for the cleanup endpoint
#[derive(Debug, Serialize)]
pub struct CleanupResponse {
    /// Cleaner report, null when the caller declined
    pub report: Option<CleanupReportBody>,
    pub state: PipelineSnapshot,
}

/// Error response
#[derive(Debug, Serialize)]
pub struct PipelineErrorResponse {
    pub error: String,
}

fn error_response(err: PipelineError) -> (StatusCode, Json<PipelineErrorResponse>) {
    let status = match &err {
        PipelineError::Validation(_) => StatusCode::BAD_REQUEST,
        PipelineError::NoCredential(_) => StatusCode::CONFLICT,
        PipelineError::Busy => StatusCode::CONFLICT,
        PipelineError::Adapter(_) => StatusCode::BAD_GATEWAY,
    };
    (
        status,
        Json(PipelineErrorResponse {
            error: err.to_string(),
        }),
    )
}

// ============================================================================
// Handlers
// ============================================================================

/// Get the current pipeline snapshot
pub async fn get_pipeline(State(state): State<Arc<AppState>>) -> Json<PipelineSnapshot> {
    Json(state.orchestrator().snapshot().await)
}

/// Download the source video
pub async fn download(
    State(state): State<Arc<AppState>>,
    Json(body): Json<DownloadBody>,
) -> Result<Json<PipelineSnapshot>, impl IntoResponse> {
    match state.orchestrator().request_download(&body.url).await {
        Ok(_) => Ok(Json(state.orchestrator().snapshot().await)),
        Err(e) => Err(error_response(e)),
    }
}

/// Translate text and replace the working script with the result
pub async fn translate(
    State(state): State<Arc<AppState>>,
    Json(body): Json<TranslateBody>,
) -> Result<Json<PipelineSnapshot>, impl IntoResponse> {
    match state.orchestrator().request_translation(&body.text).await {
        Ok(_) => Ok(Json(state.orchestrator().snapshot().await)),
        Err(e) => Err(error_response(e)),
    }
}

/// Synthesize narration audio for a script
pub async fn synthesize(
    State(state): State<Arc<AppState>>,
    Json(body): Json<SynthesizeBody>,
) -> Result<Json<PipelineSnapshot>, impl IntoResponse> {
    match state.orchestrator().request_synthesis(&body.script).await {
        Ok(_) => Ok(Json(state.orchestrator().snapshot().await)),
        Err(e) => Err(error_response(e)),
    }
}

/// Compose the final video from the four input tracks
pub async fn compose(
    State(state): State<Arc<AppState>>,
    Json(body): Json<ComposeBody>,
) -> Result<Json<PipelineSnapshot>, impl IntoResponse> {
    let request = ComposeRequest {
        video_path: body.video_path,
        audio_path: body.audio_path,
        bgm_path: body.bgm_path,
        sfx_path: body.sfx_path,
    };

    match state.orchestrator().request_composition(request).await {
        Ok(_) => Ok(Json(state.orchestrator().snapshot().await)),
        Err(e) => Err(error_response(e)),
    }
}

/// Jump to a stage manually
pub async fn navigate(
    State(state): State<Arc<AppState>>,
    Json(body): Json<NavigateBody>,
) -> Json<PipelineSnapshot> {
    state.orchestrator().navigate_to(body.stage).await;
    Json(state.orchestrator().snapshot().await)
}

/// Replace the working script text
pub async fn set_script(
    State(state): State<Arc<AppState>>,
    Json(body): Json<ScriptBody>,
) -> Json<PipelineSnapshot> {
    state.orchestrator().set_script(&body.script).await;
    Json(state.orchestrator().snapshot().await)
}

/// Resolve the pending cleanup decision
pub async fn cleanup(
    State(state): State<Arc<AppState>>,
    Json(body): Json<CleanupBody>,
) -> Result<Json<CleanupResponse>, impl IntoResponse> {
    match state.orchestrator().resolve_cleanup(body.delete).await {
        Ok(report) => Ok(Json(CleanupResponse {
            report: report.map(|r| CleanupReportBody {
                deleted_count: r.deleted_count(),
                errors: r.errors,
            }),
            state: state.orchestrator().snapshot().await,
        })),
        Err(e) => Err(error_response(e)),
    }
}
