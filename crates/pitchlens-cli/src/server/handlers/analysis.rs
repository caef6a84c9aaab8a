//! Analysis, export and session handlers.

use axum::{Json, extract::State, http::header, response::IntoResponse};
use pitchlens::{AnalysisResult, DEFAULT_EXPORT_FILE, PlayerId, Role, Selection};
use serde::{Deserialize, Serialize};

use crate::server::error::ApiError;
use crate::server::state::AppState;

/// Request body for an analysis.
#[derive(Deserialize)]
pub struct AnalyzeRequest {
    pub role: Role,
    pub player_id: String,
}

/// One analysis as shown in the page.
///
/// Remote response bodies are logged server-side, not returned.
#[derive(Serialize)]
pub struct AnalysisView {
    pub player_id: PlayerId,
    pub text: String,
    pub success: bool,
    pub failure: Option<&'static str>,
}

impl From<&AnalysisResult> for AnalysisView {
    fn from(result: &AnalysisResult) -> Self {
        Self {
            player_id: result.player_id.clone(),
            text: result.text().to_string(),
            success: result.is_success(),
            failure: result.error().map(|e| e.kind()),
        }
    }
}

/// Response for the analyze endpoint.
#[derive(Serialize)]
pub struct AnalyzeResponse {
    pub title: String,
    pub role: Role,
    pub analyses: Vec<AnalysisView>,
    pub session_size: usize,
}

/// POST /api/analyze
pub async fn analyze(
    State(state): State<AppState>,
    Json(req): Json<AnalyzeRequest>,
) -> Result<Json<AnalyzeResponse>, ApiError> {
    let id = PlayerId::new(req.player_id);
    if id.as_str().is_empty() {
        return Err(ApiError::BadRequest("player_id must not be empty".into()));
    }
    let role = req.role;

    // The store lock is released before any request is made
    let selection = {
        let store = state.store.read().await;
        Selection::resolve(&store, role, &id)?
    };

    // Retries sleep on the calling thread
    let analyzer = state.analyzer.clone();
    let results = tokio::task::spawn_blocking(move || analyzer.analyze_selected(&selection))
        .await
        .map_err(|e| ApiError::Internal(format!("Analysis task failed: {}", e)))?;

    let analyses: Vec<AnalysisView> = results.iter().map(AnalysisView::from).collect();

    let mut session = state.session.write().await;
    session.record(role, results);

    let title = match role {
        Role::Player => format!("Performance Analysis for Player ID: {}", id),
        Role::Goalkeeper => format!("Performance Analysis for Goalkeeper ID: {}", id),
    };

    Ok(Json(AnalyzeResponse {
        title,
        role,
        analyses,
        session_size: session.len(),
    }))
}

/// GET /api/export
pub async fn export_csv(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let session = state.session.read().await;
    if session.is_empty() {
        return Err(ApiError::NotFound("No analyses to export".into()));
    }

    let csv = session.to_csv()?;
    let disposition = format!("attachment; filename=\"{}\"", DEFAULT_EXPORT_FILE);

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        csv,
    ))
}

/// Response after clearing the session.
#[derive(Serialize)]
pub struct ClearResponse {
    pub cleared: usize,
}

/// POST /api/session/clear
pub async fn clear_session(State(state): State<AppState>) -> Json<ClearResponse> {
    let mut session = state.session.write().await;
    let cleared = session.len();
    session.clear();
    Json(ClearResponse { cleared })
}
