//! Request orchestration: validation, staging, engine invocation, and
//! response mapping.
//!
//! Every call walks the same sequence: check the format allow-list, check
//! the config, stage the audio, invoke the engine once, map the normalized
//! outcome onto a terminal [`TextResult`]. Known failure paths answer with
//! fixed sentinel texts; engine diagnostics go to the logs, never to the
//! caller.

use std::sync::Arc;

use tracing::{error, info};

use crate::config::SpeechConfig;
use crate::engine::SpeechEngine;
use crate::recognition::RecognitionAdapter;
use crate::staging::AudioStaging;
use crate::synthesis::SynthesisAdapter;
use crate::types::{
    AudioPayload, CancellationDetails, CancellationReason, EngineOutcome, TextResult,
    TranslationConfig,
};

/// The single supported inbound container format.
pub const SUPPORTED_FORMAT: &str = "wav";

pub const MEDIA_UNSUPPORTED: &str = "Media unsupported";
pub const UNTRANSCRIBED: &str = "Untranscribed";
pub const SPEECH_NOT_RECOGNIZED: &str = "Speech could not be recognized";
pub const TRANSCRIPTION_CANCELLED: &str = "Transcription is cancelled";
pub const UNRECOGNIZED_SPEECH: &str = "Unrecognized speech";
pub const TRANSLATION_CANCELLED: &str = "Canceled translation";
pub const INTERNAL_ERROR: &str = "Internal server error";

pub struct TranslationOrchestrator {
    staging: AudioStaging,
    recognition: RecognitionAdapter,
    synthesis: SynthesisAdapter,
}

impl TranslationOrchestrator {
    pub fn new(engine: Arc<dyn SpeechEngine>, config: &SpeechConfig) -> Self {
        Self {
            staging: AudioStaging::new(&config.staging_dir),
            recognition: RecognitionAdapter::new(Arc::clone(&engine), &config.recognition_language),
            synthesis: SynthesisAdapter::new(engine, &config.voice),
        }
    }

    /// Transcribe one utterance. Always yields exactly one terminal result;
    /// the staged file is released on every path through here.
    pub async fn transcribe(&self, payload: AudioPayload) -> TextResult {
        info!("received transcribe request");

        let config = match validate(&payload) {
            Ok(config) => config,
            Err(sentinel) => return sentinel,
        };
        let language = config
            .effective_recognized_language(self.recognition.default_language())
            .to_string();

        let outcome = self
            .run_transcribe(&payload.bytes, config.recognized_language.as_deref())
            .await;

        match outcome {
            Ok(EngineOutcome::Success { text, .. }) => TextResult {
                text,
                recognized: true,
                language,
            },
            Ok(EngineOutcome::NoMatch) => TextResult {
                text: SPEECH_NOT_RECOGNIZED.to_string(),
                recognized: false,
                language,
            },
            Ok(EngineOutcome::Cancelled(details)) => {
                log_cancellation("transcription", &details);
                TextResult {
                    text: TRANSCRIPTION_CANCELLED.to_string(),
                    recognized: false,
                    language,
                }
            }
            Err(err) => {
                error!(error = %err, "transcription failed with an unexpected fault");
                TextResult {
                    text: INTERNAL_ERROR.to_string(),
                    recognized: false,
                    language,
                }
            }
        }
    }

    async fn run_transcribe(
        &self,
        bytes: &[u8],
        recognized_language: Option<&str>,
    ) -> crate::error::Result<EngineOutcome> {
        let mut staged = self.staging.stage(bytes)?;
        let outcome = self.recognition.transcribe(&staged, recognized_language).await;
        staged.release();
        outcome
    }

    /// Translate one utterance into the configured target language.
    pub async fn translate(&self, payload: AudioPayload) -> TextResult {
        info!("received translate request");

        let config = match validate(&payload) {
            Ok(config) => config,
            Err(sentinel) => return sentinel,
        };
        let target = match config.translated_language.as_deref() {
            Some(target) if !target.is_empty() => target.to_string(),
            _ => {
                error!("translated language is missing");
                return sentinel_result(UNTRANSCRIBED);
            }
        };

        let outcome = self
            .run_translate(&payload.bytes, &target, config.recognized_language.as_deref())
            .await;

        // The translate path never populates `language`.
        match outcome {
            Ok(EngineOutcome::Success { translations, .. }) => {
                let mut text = String::new();
                for value in translations.values() {
                    text.push_str(value);
                }
                TextResult {
                    text,
                    recognized: true,
                    language: String::new(),
                }
            }
            Ok(EngineOutcome::NoMatch) => {
                error!("no speech could be recognized for translation");
                sentinel_result(UNRECOGNIZED_SPEECH)
            }
            Ok(EngineOutcome::Cancelled(details)) => {
                log_cancellation("translation", &details);
                sentinel_result(TRANSLATION_CANCELLED)
            }
            Err(err) => {
                error!(error = %err, "translation failed with an unexpected fault");
                sentinel_result(INTERNAL_ERROR)
            }
        }
    }

    async fn run_translate(
        &self,
        bytes: &[u8],
        target_language: &str,
        recognized_language: Option<&str>,
    ) -> crate::error::Result<EngineOutcome> {
        let staged = self.staging.stage(bytes)?;
        let outcome = self
            .recognition
            .translate(&staged, target_language, recognized_language)
            .await;
        // The translate path hands its staged file over instead of deleting
        // it; cleanup is deferred to the host process.
        let _ = staged.persist();
        outcome
    }

    /// Synthesize speech for `text`. The outcome is observable through logs
    /// only; no audio bytes are returned.
    pub async fn synthesize(&self, text: &str) {
        info!("received synthesize request");

        if let Err(err) = self.synthesis.synthesize(text).await {
            error!(error = %err, "speech synthesis failed with an unexpected fault");
        }
    }
}

/// Format and config checks shared by transcribe and translate. A failed
/// check short-circuits to a sentinel response before anything is staged.
fn validate(payload: &AudioPayload) -> Result<&TranslationConfig, TextResult> {
    if payload.format_tag != SUPPORTED_FORMAT {
        error!(format = %payload.format_tag, "unsupported audio file type");
        return Err(sentinel_result(MEDIA_UNSUPPORTED));
    }

    match &payload.config {
        Some(config) => Ok(config),
        None => {
            error!("translation config is missing");
            Err(sentinel_result(UNTRANSCRIBED))
        }
    }
}

fn sentinel_result(text: &str) -> TextResult {
    TextResult {
        text: text.to_string(),
        recognized: false,
        language: String::new(),
    }
}

fn log_cancellation(operation: &str, details: &CancellationDetails) {
    info!(operation, reason = %details.reason, "engine call cancelled");
    if details.reason == CancellationReason::Error {
        error!(
            operation,
            code = details.error_code.as_deref().unwrap_or("unknown"),
            details = details.error_details.as_deref().unwrap_or(""),
            "engine reported an error; check the speech resource key and region"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::MockSpeechEngine;
    use crate::types::EngineOutcome;

    fn wav_payload(bytes: &[u8], config: Option<TranslationConfig>) -> AudioPayload {
        AudioPayload {
            bytes: bytes.to_vec(),
            format_tag: "wav".to_string(),
            config,
        }
    }

    fn transcribe_config(language: &str) -> TranslationConfig {
        TranslationConfig {
            recognized_language: Some(language.to_string()),
            translated_language: None,
        }
    }

    fn orchestrator_with(
        dir: &tempfile::TempDir,
        engine: Arc<MockSpeechEngine>,
    ) -> TranslationOrchestrator {
        let config = SpeechConfig {
            staging_dir: dir.path().to_path_buf(),
            ..SpeechConfig::default()
        };
        TranslationOrchestrator::new(engine, &config)
    }

    fn staged_files(dir: &tempfile::TempDir) -> usize {
        std::fs::read_dir(dir.path()).map(|d| d.count()).unwrap_or(0)
    }

    #[tokio::test]
    async fn transcribe_rejects_unsupported_format_without_engine_call() {
        let dir = tempfile::tempdir().unwrap();
        let engine = Arc::new(MockSpeechEngine::returning(EngineOutcome::success("hi")));
        let orchestrator = orchestrator_with(&dir, Arc::clone(&engine));

        let result = orchestrator
            .transcribe(AudioPayload {
                bytes: b"ogg bytes".to_vec(),
                format_tag: "ogg".to_string(),
                config: Some(transcribe_config("en-US")),
            })
            .await;

        assert_eq!(
            result,
            TextResult {
                text: MEDIA_UNSUPPORTED.to_string(),
                recognized: false,
                language: String::new(),
            }
        );
        assert!(engine.calls().is_empty());
        assert_eq!(staged_files(&dir), 0);
    }

    #[tokio::test]
    async fn transcribe_rejects_missing_config_without_engine_call() {
        let dir = tempfile::tempdir().unwrap();
        let engine = Arc::new(MockSpeechEngine::returning(EngineOutcome::success("hi")));
        let orchestrator = orchestrator_with(&dir, Arc::clone(&engine));

        let result = orchestrator.transcribe(wav_payload(b"audio", None)).await;

        assert_eq!(
            result,
            TextResult {
                text: UNTRANSCRIBED.to_string(),
                recognized: false,
                language: String::new(),
            }
        );
        assert!(engine.calls().is_empty());
    }

    #[tokio::test]
    async fn transcribe_success_with_empty_language_defaults_to_en_us() {
        // Scenario A: empty recognized language, engine returns "hello world".
        let dir = tempfile::tempdir().unwrap();
        let engine = Arc::new(MockSpeechEngine::returning(EngineOutcome::success(
            "hello world",
        )));
        let orchestrator = orchestrator_with(&dir, Arc::clone(&engine));

        let result = orchestrator
            .transcribe(wav_payload(b"audio", Some(transcribe_config(""))))
            .await;

        assert_eq!(
            result,
            TextResult {
                text: "hello world".to_string(),
                recognized: true,
                language: "en-US".to_string(),
            }
        );
        assert_eq!(engine.calls()[0].language, "en-US");
        assert_eq!(staged_files(&dir), 0);
    }

    #[tokio::test]
    async fn transcribe_uses_configured_fallback_language() {
        let dir = tempfile::tempdir().unwrap();
        let engine = Arc::new(MockSpeechEngine::returning(EngineOutcome::success("hallo")));
        let config = SpeechConfig {
            staging_dir: dir.path().to_path_buf(),
            recognition_language: "de-DE".to_string(),
            ..SpeechConfig::default()
        };
        let orchestrator = TranslationOrchestrator::new(Arc::clone(&engine) as Arc<dyn SpeechEngine>, &config);

        let result = orchestrator
            .transcribe(wav_payload(b"audio", Some(transcribe_config(""))))
            .await;

        assert_eq!(engine.calls()[0].language, "de-DE");
        assert_eq!(result.language, "de-DE");
    }

    #[tokio::test]
    async fn transcribe_maps_no_match_to_sentinel() {
        // Scenario C.
        let dir = tempfile::tempdir().unwrap();
        let engine = Arc::new(MockSpeechEngine::returning(EngineOutcome::NoMatch));
        let orchestrator = orchestrator_with(&dir, engine);

        let result = orchestrator
            .transcribe(wav_payload(b"audio", Some(transcribe_config("en-US"))))
            .await;

        assert_eq!(result.text, SPEECH_NOT_RECOGNIZED);
        assert!(!result.recognized);
        assert_eq!(result.language, "en-US");
    }

    #[tokio::test]
    async fn transcribe_maps_cancellation_to_sentinel() {
        let dir = tempfile::tempdir().unwrap();
        let engine = Arc::new(MockSpeechEngine::returning(EngineOutcome::Cancelled(
            CancellationDetails::error("401", "key rejected"),
        )));
        let orchestrator = orchestrator_with(&dir, engine);

        let result = orchestrator
            .transcribe(wav_payload(b"audio", Some(transcribe_config("en-US"))))
            .await;

        assert_eq!(result.text, TRANSCRIPTION_CANCELLED);
        assert!(!result.recognized);
        assert_eq!(result.language, "en-US");
    }

    #[tokio::test]
    async fn transcribe_maps_unexpected_fault_and_releases_staged_file() {
        // Scenario D: the engine raises instead of returning an outcome.
        let dir = tempfile::tempdir().unwrap();
        let engine = Arc::new(MockSpeechEngine::failing());
        let orchestrator = orchestrator_with(&dir, engine);

        let result = orchestrator
            .transcribe(wav_payload(b"audio", Some(transcribe_config("en-US"))))
            .await;

        assert_eq!(result.text, INTERNAL_ERROR);
        assert!(!result.recognized);
        assert_eq!(result.language, "en-US");
        assert_eq!(staged_files(&dir), 0);
    }

    #[tokio::test]
    async fn concurrent_transcribes_stage_disjoint_files() {
        let dir = tempfile::tempdir().unwrap();
        let engine = Arc::new(MockSpeechEngine::returning(EngineOutcome::success("ok")));
        let orchestrator = orchestrator_with(&dir, Arc::clone(&engine));

        let first = orchestrator.transcribe(wav_payload(b"payload-aaaa", Some(transcribe_config("en-US"))));
        let second = orchestrator.transcribe(wav_payload(b"payload-bbbb", Some(transcribe_config("en-US"))));
        let (first, second) = tokio::join!(first, second);

        assert!(first.recognized);
        assert!(second.recognized);

        let calls = engine.calls();
        assert_eq!(calls.len(), 2);
        let mut seen: Vec<&[u8]> = calls.iter().map(|c| c.bytes.as_slice()).collect();
        seen.sort();
        assert_eq!(seen, vec![&b"payload-aaaa"[..], &b"payload-bbbb"[..]]);
        assert_ne!(calls[0].audio, calls[1].audio);
    }

    #[tokio::test]
    async fn translate_concatenates_translations() {
        // Scenario B.
        let dir = tempfile::tempdir().unwrap();
        let engine = Arc::new(MockSpeechEngine::returning(EngineOutcome::translated(
            "hello", "fr-FR", "bonjour",
        )));
        let orchestrator = orchestrator_with(&dir, engine);

        let result = orchestrator
            .translate(wav_payload(
                b"audio",
                Some(TranslationConfig {
                    recognized_language: Some("en-US".to_string()),
                    translated_language: Some("fr-FR".to_string()),
                }),
            ))
            .await;

        assert_eq!(
            result,
            TextResult {
                text: "bonjour".to_string(),
                recognized: true,
                language: String::new(),
            }
        );
    }

    #[tokio::test]
    async fn translate_leaves_staged_file_in_place() {
        let dir = tempfile::tempdir().unwrap();
        let engine = Arc::new(MockSpeechEngine::returning(EngineOutcome::translated(
            "hello", "fr-FR", "bonjour",
        )));
        let orchestrator = orchestrator_with(&dir, engine);

        orchestrator
            .translate(wav_payload(
                b"audio",
                Some(TranslationConfig {
                    recognized_language: None,
                    translated_language: Some("fr-FR".to_string()),
                }),
            ))
            .await;

        assert_eq!(staged_files(&dir), 1);
    }

    #[tokio::test]
    async fn translate_maps_no_match_and_cancellation_to_sentinels() {
        let dir = tempfile::tempdir().unwrap();
        let config = TranslationConfig {
            recognized_language: Some("en-US".to_string()),
            translated_language: Some("fr-FR".to_string()),
        };

        let engine = Arc::new(MockSpeechEngine::returning(EngineOutcome::NoMatch));
        let orchestrator = orchestrator_with(&dir, engine);
        let result = orchestrator
            .translate(wav_payload(b"audio", Some(config.clone())))
            .await;
        assert_eq!(result.text, UNRECOGNIZED_SPEECH);
        assert_eq!(result.language, "");

        let engine = Arc::new(MockSpeechEngine::returning(EngineOutcome::Cancelled(
            CancellationDetails::error("429", "quota"),
        )));
        let orchestrator = orchestrator_with(&dir, engine);
        let result = orchestrator
            .translate(wav_payload(b"audio", Some(config)))
            .await;
        assert_eq!(result.text, TRANSLATION_CANCELLED);
        assert_eq!(result.language, "");
    }

    #[tokio::test]
    async fn translate_requires_target_language() {
        let dir = tempfile::tempdir().unwrap();
        let engine = Arc::new(MockSpeechEngine::returning(EngineOutcome::success("hi")));
        let orchestrator = orchestrator_with(&dir, Arc::clone(&engine));

        let result = orchestrator
            .translate(wav_payload(b"audio", Some(transcribe_config("en-US"))))
            .await;

        assert_eq!(result.text, UNTRANSCRIBED);
        assert!(engine.calls().is_empty());
    }

    #[tokio::test]
    async fn empty_payload_maps_to_internal_error() {
        let dir = tempfile::tempdir().unwrap();
        let engine = Arc::new(MockSpeechEngine::returning(EngineOutcome::success("hi")));
        let orchestrator = orchestrator_with(&dir, Arc::clone(&engine));

        let result = orchestrator
            .transcribe(wav_payload(b"", Some(transcribe_config("en-US"))))
            .await;

        assert_eq!(result.text, INTERNAL_ERROR);
        assert!(engine.calls().is_empty());
    }
}
