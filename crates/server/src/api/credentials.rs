//! Credential pool API handlers.
//!
//! Pools are addressed by provider name in the path (`translation` or
//! `speech-synthesis`). Records carry their secrets in responses; the server
//! fronts a single-user desktop workflow, not a multi-tenant service.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use overdub_core::{CredentialError, CredentialRecord, CredentialUpdate, Provider};

use crate::state::AppState;

// ============================================================================
// Request/Response Types
// ============================================================================

/// Request body for adding a credential to a pool
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddCredentialBody {
    /// Label shown in the credential list
    pub display_name: String,
}

/// Error response
#[derive(Debug, Serialize)]
pub struct CredentialErrorResponse {
    pub error: String,
}

type ErrorReply = (StatusCode, Json<CredentialErrorResponse>);

fn parse_provider(name: &str) -> Result<Provider, ErrorReply> {
    Provider::from_name(name).ok_or_else(|| {
        (
            StatusCode::BAD_REQUEST,
            Json(CredentialErrorResponse {
                error: format!("Unknown provider: {}", name),
            }),
        )
    })
}

fn error_response(err: CredentialError) -> ErrorReply {
    let status = match &err {
        // A pool with no enabled record has no active credential to return
        CredentialError::NoCredential(_) => StatusCode::NOT_FOUND,
        CredentialError::NotFound(_) => StatusCode::NOT_FOUND,
        CredentialError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (
        status,
        Json(CredentialErrorResponse {
            error: err.to_string(),
        }),
    )
}

// ============================================================================
// Handlers
// ============================================================================

/// List a pool's records in priority order
pub async fn list_credentials(
    State(state): State<Arc<AppState>>,
    Path(provider): Path<String>,
) -> Result<Json<Vec<CredentialRecord>>, ErrorReply> {
    let provider = parse_provider(&provider)?;
    Ok(Json(state.credentials().list(provider).await))
}

/// Add a fresh record (enabled, empty secret) to the end of a pool
pub async fn add_credential(
    State(state): State<Arc<AppState>>,
    Path(provider): Path<String>,
    Json(body): Json<AddCredentialBody>,
) -> Result<(StatusCode, Json<CredentialRecord>), ErrorReply> {
    let provider = parse_provider(&provider)?;
    match state.credentials().add(provider, &body.display_name).await {
        Ok(record) => Ok((StatusCode::CREATED, Json(record))),
        Err(e) => Err(error_response(e)),
    }
}

/// Get the record selection would currently pick for a provider
pub async fn get_active(
    State(state): State<Arc<AppState>>,
    Path(provider): Path<String>,
) -> Result<Json<CredentialRecord>, ErrorReply> {
    let provider = parse_provider(&provider)?;
    match state.credentials().select_active(provider).await {
        Ok(record) => Ok(Json(record)),
        Err(e) => Err(error_response(e)),
    }
}

/// Update fields of an existing record
pub async fn update_credential(
    State(state): State<Arc<AppState>>,
    Path((provider, id)): Path<(String, String)>,
    Json(update): Json<CredentialUpdate>,
) -> Result<Json<CredentialRecord>, ErrorReply> {
    let provider = parse_provider(&provider)?;
    match state.credentials().update(provider, &id, update).await {
        Ok(record) => Ok(Json(record)),
        Err(e) => Err(error_response(e)),
    }
}

/// Remove a record from a pool (idempotent)
pub async fn remove_credential(
    State(state): State<Arc<AppState>>,
    Path((provider, id)): Path<(String, String)>,
) -> Result<StatusCode, ErrorReply> {
    let provider = parse_provider(&provider)?;
    match state.credentials().remove(provider, &id).await {
        Ok(()) => Ok(StatusCode::NO_CONTENT),
        Err(e) => Err(error_response(e)),
    }
}
