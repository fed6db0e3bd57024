//! The external speech capability, behind a trait seam.

mod mock;
mod rest;

pub use mock::{MockSpeechEngine, RecordedCall};
pub use rest::RestSpeechEngine;

use std::path::Path;

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{EngineOutcome, SynthesisOutcome};

/// Remote speech recognition, translation, and synthesis capability.
///
/// Implementations fold engine-side faults (HTTP error status, network
/// failure to the engine) into [`EngineOutcome::Cancelled`] or a
/// non-completed [`SynthesisOutcome`]; `Err` is reserved for local faults
/// such as a missing staged file. Callers therefore handle exactly one
/// failure channel.
#[async_trait]
pub trait SpeechEngine: Send + Sync {
    /// Recognize a complete utterance from a staged audio file.
    async fn recognize(&self, audio: &Path, language: &str) -> Result<EngineOutcome>;

    /// Recognize and translate into a single target language. The outcome's
    /// translation map is keyed by the caller's target language tag.
    async fn translate(
        &self,
        audio: &Path,
        source_language: &str,
        target_language: &str,
    ) -> Result<EngineOutcome>;

    /// Synthesize speech for `text` with the given voice.
    async fn synthesize(&self, text: &str, voice: &str) -> Result<SynthesisOutcome>;
}
