//! Scripted engine double for tests and offline scaffolding.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use async_trait::async_trait;

use super::SpeechEngine;
use crate::error::{Error, Result};
use crate::types::{EngineOutcome, SynthesisOutcome};

/// One recorded engine invocation.
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub audio: PathBuf,
    /// Bytes read from the staged file at invocation time.
    pub bytes: Vec<u8>,
    pub language: String,
    pub target_language: Option<String>,
}

/// Returns a scripted outcome and records every invocation.
pub struct MockSpeechEngine {
    outcome: EngineOutcome,
    synthesis: SynthesisOutcome,
    fail: bool,
    calls: Mutex<Vec<RecordedCall>>,
}

impl MockSpeechEngine {
    /// Every recognition/translation call yields a clone of `outcome`.
    pub fn returning(outcome: EngineOutcome) -> Self {
        Self {
            outcome,
            synthesis: SynthesisOutcome::completed(),
            fail: false,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Every call fails with a local fault, simulating e.g. an I/O error
    /// inside the engine invocation.
    pub fn failing() -> Self {
        Self {
            outcome: EngineOutcome::NoMatch,
            synthesis: SynthesisOutcome::completed(),
            fail: true,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn with_synthesis(mut self, synthesis: SynthesisOutcome) -> Self {
        self.synthesis = synthesis;
        self
    }

    /// All invocations seen so far, in call order.
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().expect("mock call log poisoned").clone()
    }

    fn record(&self, audio: &Path, language: &str, target_language: Option<&str>) {
        let bytes = std::fs::read(audio).unwrap_or_default();
        self.calls
            .lock()
            .expect("mock call log poisoned")
            .push(RecordedCall {
                audio: audio.to_path_buf(),
                bytes,
                language: language.to_string(),
                target_language: target_language.map(|t| t.to_string()),
            });
    }
}

fn mock_failure() -> Error {
    Error::Io(std::io::Error::new(
        std::io::ErrorKind::Other,
        "mock engine failure",
    ))
}

#[async_trait]
impl SpeechEngine for MockSpeechEngine {
    async fn recognize(&self, audio: &Path, language: &str) -> Result<EngineOutcome> {
        if self.fail {
            return Err(mock_failure());
        }
        self.record(audio, language, None);
        Ok(self.outcome.clone())
    }

    async fn translate(
        &self,
        audio: &Path,
        source_language: &str,
        target_language: &str,
    ) -> Result<EngineOutcome> {
        if self.fail {
            return Err(mock_failure());
        }
        self.record(audio, source_language, Some(target_language));
        Ok(self.outcome.clone())
    }

    async fn synthesize(&self, _text: &str, _voice: &str) -> Result<SynthesisOutcome> {
        if self.fail {
            return Err(mock_failure());
        }
        Ok(self.synthesis.clone())
    }
}
