//! Speech transcription, translation, and synthesis endpoints.

use axum::{extract::State, Json};
use base64::Engine;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::ApiError;
use crate::state::AppState;
use parlance_core::{AudioPayload, TextResult, TranslationConfig};

/// Inbound audio request.
#[derive(Debug, Deserialize)]
pub struct AudioRequest {
    /// Base64-encoded audio bytes.
    #[serde(default)]
    pub data: String,

    /// Container format tag ("wav" is the only supported value).
    #[serde(default)]
    pub file_type: String,

    /// Language configuration; its absence is answered with a sentinel
    /// response, not an HTTP error.
    #[serde(default)]
    pub config: Option<TranslationConfig>,
}

#[derive(Debug, Serialize)]
pub struct TextResponse {
    pub text: String,
    pub recognized: bool,
    pub language: String,
}

impl From<TextResult> for TextResponse {
    fn from(result: TextResult) -> Self {
        Self {
            text: result.text,
            recognized: result.recognized,
            language: result.language,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SynthesizeRequest {
    pub text: String,
}

/// Placeholder audio reply; synthesized bytes stay with the engine and the
/// synthesis outcome is observable through logs only.
#[derive(Debug, Serialize)]
pub struct AudioReply {
    pub data: String,
    pub file_type: String,
}

pub async fn transcribe(
    State(state): State<AppState>,
    Json(req): Json<AudioRequest>,
) -> Result<Json<TextResponse>, ApiError> {
    info!(file_type = %req.file_type, "transcribe request");
    let _permit = state.acquire_permit().await;

    let payload = decode_payload(req)?;
    let result = state.orchestrator.transcribe(payload).await;
    Ok(Json(result.into()))
}

pub async fn translate(
    State(state): State<AppState>,
    Json(req): Json<AudioRequest>,
) -> Result<Json<TextResponse>, ApiError> {
    info!(file_type = %req.file_type, "translate request");
    let _permit = state.acquire_permit().await;

    let payload = decode_payload(req)?;
    let result = state.orchestrator.translate(payload).await;
    Ok(Json(result.into()))
}

pub async fn synthesize(
    State(state): State<AppState>,
    Json(req): Json<SynthesizeRequest>,
) -> Json<AudioReply> {
    info!(chars = req.text.len(), "synthesize request");
    let _permit = state.acquire_permit().await;

    state.orchestrator.synthesize(&req.text).await;

    Json(AudioReply {
        data: String::new(),
        file_type: String::new(),
    })
}

fn decode_payload(req: AudioRequest) -> Result<AudioPayload, ApiError> {
    let bytes = base64::engine::general_purpose::STANDARD
        .decode(&req.data)
        .map_err(|e| parlance_core::Error::InvalidAudio(format!("base64 decode failed: {e}")))?;

    Ok(AudioPayload {
        bytes,
        format_tag: req.file_type,
        config: req.config,
    })
}
