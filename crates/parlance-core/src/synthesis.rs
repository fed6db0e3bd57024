//! Text-to-speech over the engine capability.

use std::sync::Arc;

use tracing::{error, info};

use crate::engine::SpeechEngine;
use crate::error::Result;
use crate::types::SynthesisOutcome;

/// Single-shot synthesis. The synthesized audio stays with the engine; the
/// outcome is only observable through logs and the returned completion flag.
pub struct SynthesisAdapter {
    engine: Arc<dyn SpeechEngine>,
    voice: String,
}

impl SynthesisAdapter {
    pub fn new(engine: Arc<dyn SpeechEngine>, voice: impl Into<String>) -> Self {
        Self {
            engine,
            voice: voice.into(),
        }
    }

    pub async fn synthesize(&self, text: &str) -> Result<SynthesisOutcome> {
        let outcome = self.engine.synthesize(text, &self.voice).await?;

        if outcome.completed {
            info!(chars = text.len(), voice = %self.voice, "speech synthesized");
        } else if let Some(details) = &outcome.cancellation {
            error!(
                reason = %details.reason,
                code = details.error_code.as_deref().unwrap_or("unknown"),
                details = details.error_details.as_deref().unwrap_or(""),
                "speech synthesis cancelled; check the speech resource key and region"
            );
        }

        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::MockSpeechEngine;
    use crate::types::{CancellationDetails, EngineOutcome};

    #[tokio::test]
    async fn synthesize_reports_completion() {
        let engine = Arc::new(MockSpeechEngine::returning(EngineOutcome::NoMatch));
        let adapter = SynthesisAdapter::new(engine, "en-US-JennyNeural");

        let outcome = adapter.synthesize("hello world").await.unwrap();

        assert!(outcome.completed);
        assert!(outcome.cancellation.is_none());
    }

    #[tokio::test]
    async fn synthesize_surfaces_cancellation_details() {
        let cancellation = CancellationDetails::error("403", "quota exceeded");
        let engine = Arc::new(
            MockSpeechEngine::returning(EngineOutcome::NoMatch)
                .with_synthesis(SynthesisOutcome::cancelled(cancellation.clone())),
        );
        let adapter = SynthesisAdapter::new(engine, "en-US-JennyNeural");

        let outcome = adapter.synthesize("hello world").await.unwrap();

        assert!(!outcome.completed);
        assert_eq!(outcome.cancellation, Some(cancellation));
    }
}
