//! Axum route handlers for the Persona API.

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde::Deserialize;

use crate::errors::AppError;
use crate::persona::types::{GenerationOptions, PersonaCategory, PersonaProfile};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct GeneratePersonaRequest {
    pub keyword: String,
    pub category: PersonaCategory,
    #[serde(default)]
    pub options: GenerationOptions,
}

/// POST /api/v1/personas
///
/// One stateless generation per call. The profile is returned as-is and never stored.
pub async fn handle_generate_persona(
    State(state): State<AppState>,
    payload: Result<Json<GeneratePersonaRequest>, JsonRejection>,
) -> Result<Json<PersonaProfile>, AppError> {
    let Json(request) = payload?;
    let keyword = request.keyword.trim();
    if keyword.is_empty() {
        return Err(AppError::Validation("keyword cannot be empty".to_string()));
    }

    let profile = state
        .generator
        .generate(keyword, request.category, request.options)
        .await?;

    Ok(Json(profile))
}
