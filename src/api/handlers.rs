//! HTTP request handlers

use super::types::{ErrorResponse, SkillRequest, SkillResponse};
use super::AppState;
use crate::dialog::DialogError;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};

/// Create the API router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Skill webhook
        .route("/", post(handle_skill))
        // Version
        .route("/version", get(get_version))
        .with_state(state)
}

// ============================================================
// Skill Webhook
// ============================================================

async fn handle_skill(
    State(state): State<AppState>,
    Json(req): Json<SkillRequest>,
) -> Result<Json<SkillResponse>, AppError> {
    let utterance = req.request.utterance();
    let response = state
        .directory
        .handle(&req.session.session_id, &utterance)
        .await?;

    if response.end_session {
        tracing::info!(session_id = %req.session.session_id, "Conversation ended");
    }

    Ok(Json(SkillResponse {
        response: response.into(),
        session: req.session,
        version: req.version,
    }))
}

async fn get_version() -> &'static str {
    concat!("dialog-arcade ", env!("CARGO_PKG_VERSION"))
}

// ============================================================
// Error Handling
// ============================================================

enum AppError {
    Internal(String),
}

impl From<DialogError> for AppError {
    fn from(e: DialogError) -> Self {
        AppError::Internal(e.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        let body = Json(ErrorResponse::new(message));
        (status, body).into_response()
    }
}
