//! Admin maintenance routes.

use axum::{extract::State, Json};
use serde::Serialize;
use std::sync::Arc;

use crate::api::http::ApiError;
use crate::app::App;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CleanupResponse {
    pub success: bool,
    pub message: String,
    pub deleted_count: u64,
}

pub async fn cleanup(State(app): State<Arc<App>>) -> Result<Json<CleanupResponse>, ApiError> {
    let deleted = app.reaper.execute().await?;
    Ok(Json(CleanupResponse {
        success: true,
        message: format!(
            "Cleaned up {deleted} inactive user(s) (inactive for {}+ days)",
            app.reaper.retention_days()
        ),
        deleted_count: deleted,
    }))
}
