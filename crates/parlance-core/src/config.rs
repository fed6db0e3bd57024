//! Configuration for the speech engine and staging layer.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::types::DEFAULT_RECOGNITION_LANGUAGE;

/// Credentials for the external speech capability.
///
/// Constructed once at process start and passed in explicitly; nothing in
/// this crate reads credential state from globals.
#[derive(Debug, Clone)]
pub struct EngineSecrets {
    pub subscription_key: String,
    pub region: String,
}

impl EngineSecrets {
    pub fn new(subscription_key: impl Into<String>, region: impl Into<String>) -> Self {
        Self {
            subscription_key: subscription_key.into(),
            region: region.into(),
        }
    }

    /// Read `SPEECH_KEY` / `SPEECH_REGION` from the environment.
    pub fn from_env() -> Option<Self> {
        let key = std::env::var("SPEECH_KEY").ok()?;
        let region = std::env::var("SPEECH_REGION").ok()?;
        if key.trim().is_empty() || region.trim().is_empty() {
            return None;
        }
        Some(Self::new(key, region))
    }
}

/// Main speech service configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpeechConfig {
    /// Directory where inbound audio is staged, one file per call.
    #[serde(default = "default_staging_dir")]
    pub staging_dir: PathBuf,

    /// Fallback recognition language.
    #[serde(default = "default_recognition_language")]
    pub recognition_language: String,

    /// Voice used for synthesis.
    #[serde(default = "default_voice")]
    pub voice: String,

    /// Override for the recognition endpoint (tests, self-hosted gateways).
    #[serde(default)]
    pub recognition_endpoint: Option<String>,

    /// Override for the text translation endpoint.
    #[serde(default)]
    pub translation_endpoint: Option<String>,

    /// Override for the synthesis endpoint.
    #[serde(default)]
    pub synthesis_endpoint: Option<String>,
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            staging_dir: default_staging_dir(),
            recognition_language: default_recognition_language(),
            voice: default_voice(),
            recognition_endpoint: None,
            translation_endpoint: None,
            synthesis_endpoint: None,
        }
    }
}

fn default_staging_dir() -> PathBuf {
    if let Ok(from_env) = std::env::var("PARLANCE_STAGING_DIR") {
        let trimmed = from_env.trim();
        if !trimmed.is_empty() {
            return PathBuf::from(trimmed);
        }
    }

    dirs::cache_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("parlance")
        .join("staging")
}

fn default_recognition_language() -> String {
    DEFAULT_RECOGNITION_LANGUAGE.to_string()
}

fn default_voice() -> String {
    "en-US-JennyNeural".to_string()
}
