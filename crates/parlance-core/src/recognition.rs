//! Single-shot recognition and translation over the engine capability.

use std::sync::Arc;

use tracing::debug;

use crate::engine::SpeechEngine;
use crate::error::{Error, Result};
use crate::staging::StagedAudio;
use crate::types::EngineOutcome;

/// Drives one engine invocation per call. No retries, no timeouts here;
/// deadlines are the engine's concern.
pub struct RecognitionAdapter {
    engine: Arc<dyn SpeechEngine>,
    default_language: String,
}

impl RecognitionAdapter {
    pub fn new(engine: Arc<dyn SpeechEngine>, default_language: &str) -> Self {
        Self {
            engine,
            default_language: default_language.to_string(),
        }
    }

    /// The recognition language used when a call supplies none.
    pub fn default_language(&self) -> &str {
        &self.default_language
    }

    /// Recognize one staged utterance, defaulting the language when the
    /// caller supplied none.
    pub async fn transcribe(
        &self,
        audio: &StagedAudio,
        recognized_language: Option<&str>,
    ) -> Result<EngineOutcome> {
        if !audio.exists() {
            return Err(Error::ResourceNotFound(audio.path().to_path_buf()));
        }

        let path = audio.path();
        let language = self.effective_language(recognized_language);
        debug!(language, path = %path.display(), "invoking engine recognition");
        self.engine.recognize(path, language).await
    }

    /// Recognize one staged utterance and translate it into exactly one
    /// target language.
    pub async fn translate(
        &self,
        audio: &StagedAudio,
        target_language: &str,
        recognized_language: Option<&str>,
    ) -> Result<EngineOutcome> {
        if !audio.exists() {
            return Err(Error::ResourceNotFound(audio.path().to_path_buf()));
        }

        let path = audio.path();
        let language = self.effective_language(recognized_language);
        debug!(language, target_language, path = %path.display(), "invoking engine translation");
        self.engine.translate(path, language, target_language).await
    }

    fn effective_language<'a>(&'a self, tag: Option<&'a str>) -> &'a str {
        match tag {
            Some(tag) if !tag.is_empty() => tag,
            _ => &self.default_language,
        }
    }
}
