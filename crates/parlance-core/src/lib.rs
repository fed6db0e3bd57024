//! Parlance Core - speech transcription and translation orchestration
//!
//! This crate wraps a remote speech capability (recognition, translation,
//! synthesis) behind a small set of adapters and drives single-shot calls
//! against it:
//! - inbound audio is staged to a per-call temporary file,
//! - the engine is invoked exactly once (no retries, no streaming),
//! - the engine outcome is normalized into a closed taxonomy
//!   (success / no match / cancelled) before anything maps it to a
//!   caller-facing response.
//!
//! The engine itself is out of scope; it is consumed through the
//! [`SpeechEngine`] trait, with a REST implementation for Azure-style
//! speech services and a scripted mock for tests.

pub mod config;
pub mod engine;
pub mod error;
pub mod orchestrator;
pub mod recognition;
pub mod staging;
pub mod synthesis;
pub mod types;

pub use config::{EngineSecrets, SpeechConfig};
pub use engine::{MockSpeechEngine, RestSpeechEngine, SpeechEngine};
pub use error::{Error, Result};
pub use orchestrator::TranslationOrchestrator;
pub use recognition::RecognitionAdapter;
pub use staging::{AudioStaging, StagedAudio};
pub use synthesis::SynthesisAdapter;
pub use types::{
    AudioPayload, CancellationDetails, CancellationReason, EngineOutcome, SynthesisOutcome,
    TextResult, TranslationConfig,
};
