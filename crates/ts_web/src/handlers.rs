use axum::{extract::State, response::IntoResponse, Json};
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;
use ts_core::{Error, SummaryRequest, SummaryResult, TargetLength};
use ts_sources::{ensure_pdf_file_name, extract_pdf_text, extract_video_id};
use crate::error::ApiError;
use crate::form::FormFields;
use crate::AppState;

pub const SERVICE_NAME: &str = "AI Text Summarizer";
const DEFAULT_TARGET_WORDS: u32 = 150;

#[derive(Debug, Serialize)]
pub struct YoutubeSummary {
    #[serde(flatten)]
    pub result: SummaryResult,
    pub video_id: String,
}

fn target_length(form: &FormFields) -> Result<TargetLength, ApiError> {
    Ok(TargetLength::from_words(form.integer_or("max_length", DEFAULT_TARGET_WORDS)?))
}

pub async fn summarize_text(
    State(state): State<Arc<AppState>>,
    form: FormFields,
) -> Result<Json<SummaryResult>, ApiError> {
    let text = form.require_text("text")?;
    let request = SummaryRequest::new(text, target_length(&form)?)?;
    let result = state.summarizer.summarize_request(request).await?;
    Ok(Json(result))
}

pub async fn summarize_pdf(
    State(state): State<Arc<AppState>>,
    mut form: FormFields,
) -> Result<Json<SummaryResult>, ApiError> {
    let target = target_length(&form)?;
    let file = form.take_file("file")?;
    ensure_pdf_file_name(&file.file_name)?;

    tracing::info!("📄 Extracting text from {} ({} bytes)", file.file_name, file.bytes.len());
    let text = extract_pdf_text(file.bytes).await?;
    if text.trim().is_empty() {
        return Err(ApiError(Error::InvalidInput(
            "No text could be extracted from the PDF".to_string(),
        )));
    }

    let result = state.summarizer.summarize_request(SummaryRequest::new(text, target)?).await?;
    Ok(Json(result))
}

pub async fn summarize_youtube(
    State(state): State<Arc<AppState>>,
    form: FormFields,
) -> Result<Json<YoutubeSummary>, ApiError> {
    let target = target_length(&form)?;
    let video_id = extract_video_id(form.require_text("url")?)?;

    tracing::info!("🎬 Fetching transcript for video {}", video_id);
    let text = state.transcripts.fetch_text(&video_id).await?;
    if text.trim().is_empty() {
        return Err(ApiError(Error::TranscriptUnavailable(format!(
            "Transcript for video {} is empty",
            video_id
        ))));
    }

    let result = state.summarizer.summarize_request(SummaryRequest::new(text, target)?).await?;
    Ok(Json(YoutubeSummary { result, video_id }))
}

pub async fn health() -> impl IntoResponse {
    Json(json!({ "status": "healthy", "service": SERVICE_NAME }))
}
