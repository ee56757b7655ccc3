//! Axum route handlers for the cover letter API.

use axum::{extract::rejection::JsonRejection, extract::State, Json};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;
use crate::generation::generator::generate_cover_letters;
use crate::models::application::ApplicationRecord;
use crate::state::AppState;
use crate::templates::{RenderedLetter, TemplateStyle};

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CoverLetterRequest {
    pub application: ApplicationRecord,
    /// Style picked in the settings panel. Informational: every style is
    /// always rendered; the page only uses it to choose the open panel.
    #[serde(default)]
    pub template_style: TemplateStyle,
}

#[derive(Debug, Serialize)]
pub struct CoverLetterResponse {
    pub generation_id: Uuid,
    pub generated_on: String,
    pub selected_style: TemplateStyle,
    pub raw_text: String,
    pub letter_body: String,
    pub letters: Vec<RenderedLetter>,
}

#[derive(Debug, Serialize)]
pub struct SettingsResponse {
    pub device: String,
    pub model_path: String,
    pub architecture: String,
    pub template_styles: Vec<TemplateStyle>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/cover-letters
///
/// Generates one letter body and returns it rendered in all three layouts.
pub async fn handle_generate_cover_letter(
    State(state): State<AppState>,
    payload: Result<Json<CoverLetterRequest>, JsonRejection>,
) -> Result<Json<CoverLetterResponse>, AppError> {
    // Existence check only: a missing or mistyped field is rejected here.
    let Json(request) = payload.map_err(|e| AppError::InvalidRequest(e.body_text()))?;
    let today = chrono::Local::now().date_naive();

    let set = generate_cover_letters(
        state.generator.as_ref(),
        &request.application,
        today,
        state.config.generation_seed,
    )
    .await?;

    Ok(Json(CoverLetterResponse {
        generation_id: set.generation_id,
        generated_on: set.generated_on,
        selected_style: request.template_style,
        raw_text: set.generation.raw_text,
        letter_body: set.generation.letter_body,
        letters: set.letters,
    }))
}

/// GET /api/v1/settings
///
/// Device and model details for the settings panel.
pub async fn handle_settings(State(state): State<AppState>) -> Json<SettingsResponse> {
    Json(SettingsResponse {
        device: state.model_info.device.clone(),
        model_path: state.model_info.model_path.clone(),
        architecture: state.model_info.architecture.clone(),
        template_styles: TemplateStyle::ALL.to_vec(),
    })
}
