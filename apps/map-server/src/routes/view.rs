//! Browser view reports and current-view lookup.

use axum::body::Bytes;
use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;
use serde_json::Value;
use utoipa::ToSchema;

use crate::view::{View, ViewReport};
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/viewChanged", post(view_changed))
        .route("/api/view", get(current_view))
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AckResponse {
    pub status: String,
}

// ---------------------------------------------------------------------------
// POST /api/viewChanged
// ---------------------------------------------------------------------------

/// The body is parsed leniently: anything that isn't a JSON object, or any
/// field of the wrong shape, is skipped and the report is still acknowledged.
#[utoipa::path(
    post,
    path = "/api/viewChanged",
    tag = "View",
    request_body(content = Object, description = "Any subset of `center`, `zoom`, `bounds`", content_type = "application/json"),
    responses((status = 200, description = "Report accepted", body = AckResponse)),
)]
pub async fn view_changed(State(state): State<AppState>, body: Bytes) -> Json<AckResponse> {
    match serde_json::from_slice::<Value>(&body) {
        Ok(report) => state.view.apply_report(ViewReport::from_json(&report)),
        Err(err) => tracing::debug!(%err, "ignoring unparseable view report"),
    }
    Json(AckResponse {
        status: "success".to_string(),
    })
}

// ---------------------------------------------------------------------------
// GET /api/view
// ---------------------------------------------------------------------------

#[utoipa::path(
    get,
    path = "/api/view",
    tag = "View",
    responses((status = 200, description = "Last reported view", body = View)),
)]
pub async fn current_view(State(state): State<AppState>) -> Json<View> {
    Json(state.view.read())
}
