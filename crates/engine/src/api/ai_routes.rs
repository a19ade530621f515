//! AI generation route.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::api::http::ApiError;
use crate::app::App;
use crate::infrastructure::ports::TokenUsage;
use crate::use_cases::ai::GenerationContext;

#[derive(Debug, Deserialize)]
pub struct GenerateRequest {
    pub prompt: String,
    #[serde(default)]
    pub context: GenerationContext,
}

#[derive(Debug, Serialize)]
pub struct GenerateResponse {
    pub success: bool,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage: Option<TokenUsage>,
}

pub async fn generate(
    State(app): State<Arc<App>>,
    Json(request): Json<GenerateRequest>,
) -> Result<Json<GenerateResponse>, ApiError> {
    if request.prompt.trim().is_empty() {
        return Err(ApiError::BadRequest("prompt is required".to_string()));
    }

    let reply = app
        .generate
        .execute(&request.prompt, &request.context)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Generation failed");
            ApiError::Upstream("Failed to generate content".to_string())
        })?;

    Ok(Json(GenerateResponse {
        success: true,
        text: reply.text,
        usage: reply.usage,
    }))
}
