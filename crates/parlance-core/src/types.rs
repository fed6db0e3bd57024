//! Request, response, and engine outcome types.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Recognition language used when the caller supplies none.
pub const DEFAULT_RECOGNITION_LANGUAGE: &str = "en-US";

/// Inbound audio payload, consumed once per call.
#[derive(Debug, Clone)]
pub struct AudioPayload {
    /// Raw audio bytes.
    pub bytes: Vec<u8>,

    /// Container format tag supplied by the caller ("wav" is the only
    /// supported value).
    pub format_tag: String,

    /// Language configuration; absence is a terminal validation failure.
    pub config: Option<TranslationConfig>,
}

/// Language configuration for one transcribe/translate call.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TranslationConfig {
    /// Language of the spoken audio. The configured fallback applies when
    /// absent or empty.
    #[serde(default)]
    pub recognized_language: Option<String>,

    /// Target language for the translate path. Ignored on transcribe.
    #[serde(default)]
    pub translated_language: Option<String>,
}

impl TranslationConfig {
    /// The recognition language actually passed to the engine, falling back
    /// to `fallback` when the call supplied none.
    pub fn effective_recognized_language<'a>(&'a self, fallback: &'a str) -> &'a str {
        match self.recognized_language.as_deref() {
            Some(tag) if !tag.is_empty() => tag,
            _ => fallback,
        }
    }
}

/// Terminal result of one transcribe/translate call.
///
/// `text` holds either recognized/translated speech or a fixed sentinel
/// string on a known failure path; raw engine diagnostics never appear here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextResult {
    pub text: String,
    pub recognized: bool,
    #[serde(default)]
    pub language: String,
}

/// Why the engine cancelled a call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CancellationReason {
    /// An engine-side error (bad audio, auth, quota, network to the engine).
    Error,
    /// The audio stream ended before the engine produced a result.
    EndOfStream,
}

impl fmt::Display for CancellationReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CancellationReason::Error => write!(f, "Error"),
            CancellationReason::EndOfStream => write!(f, "EndOfStream"),
        }
    }
}

/// Engine-supplied cancellation context, surfaced only through logs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CancellationDetails {
    pub reason: CancellationReason,
    pub error_code: Option<String>,
    pub error_details: Option<String>,
}

impl CancellationDetails {
    pub fn error(code: impl Into<String>, details: impl Into<String>) -> Self {
        let details = details.into();
        Self {
            reason: CancellationReason::Error,
            error_code: Some(code.into()),
            error_details: if details.is_empty() {
                None
            } else {
                Some(details)
            },
        }
    }
}

/// Normalized result of a single engine invocation.
///
/// Every engine call reduces to exactly one of these before the
/// orchestrator touches it; there is no silent fall-through branch.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineOutcome {
    /// Speech was recognized. `translations` maps target language tag to
    /// translated text and is empty on the transcribe path.
    Success {
        text: String,
        translations: HashMap<String, String>,
    },
    /// The engine completed but found no recognizable speech.
    NoMatch,
    /// The engine gave up; details carry its reason/code/diagnostics.
    Cancelled(CancellationDetails),
}

impl EngineOutcome {
    pub fn success(text: impl Into<String>) -> Self {
        EngineOutcome::Success {
            text: text.into(),
            translations: HashMap::new(),
        }
    }

    pub fn translated(text: impl Into<String>, target: impl Into<String>, translation: impl Into<String>) -> Self {
        let mut translations = HashMap::new();
        translations.insert(target.into(), translation.into());
        EngineOutcome::Success {
            text: text.into(),
            translations,
        }
    }
}

/// Terminal result of one synthesis call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SynthesisOutcome {
    pub completed: bool,
    pub cancellation: Option<CancellationDetails>,
}

impl SynthesisOutcome {
    pub fn completed() -> Self {
        Self {
            completed: true,
            cancellation: None,
        }
    }

    pub fn cancelled(details: CancellationDetails) -> Self {
        Self {
            completed: false,
            cancellation: Some(details),
        }
    }
}
