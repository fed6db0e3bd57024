//! REST backend for Azure-style speech services.

use std::collections::HashMap;
use std::path::Path;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use super::SpeechEngine;
use crate::config::{EngineSecrets, SpeechConfig};
use crate::error::Result;
use crate::types::{CancellationDetails, EngineOutcome, SynthesisOutcome};

const SUBSCRIPTION_KEY_HEADER: &str = "Ocp-Apim-Subscription-Key";
const SUBSCRIPTION_REGION_HEADER: &str = "Ocp-Apim-Subscription-Region";

/// Speech engine client for the subscription-key/region REST endpoints.
pub struct RestSpeechEngine {
    client: reqwest::Client,
    secrets: EngineSecrets,
    recognition_endpoint: String,
    translation_endpoint: String,
    synthesis_endpoint: String,
}

impl RestSpeechEngine {
    pub fn new(secrets: EngineSecrets, config: &SpeechConfig) -> Self {
        let recognition_endpoint = config.recognition_endpoint.clone().unwrap_or_else(|| {
            format!(
                "https://{}.stt.speech.microsoft.com/speech/recognition/conversation/cognitiveservices/v1",
                secrets.region
            )
        });
        let translation_endpoint = config
            .translation_endpoint
            .clone()
            .unwrap_or_else(|| "https://api.cognitive.microsofttranslator.com/translate".to_string());
        let synthesis_endpoint = config.synthesis_endpoint.clone().unwrap_or_else(|| {
            format!(
                "https://{}.tts.speech.microsoft.com/cognitiveservices/v1",
                secrets.region
            )
        });

        Self {
            client: reqwest::Client::new(),
            secrets,
            recognition_endpoint,
            translation_endpoint,
            synthesis_endpoint,
        }
    }

    async fn cancellation_from_response(response: reqwest::Response) -> CancellationDetails {
        let code = response.status().as_u16().to_string();
        let body = response.text().await.unwrap_or_default();
        CancellationDetails::error(code, body)
    }

    fn cancellation_from_transport(err: reqwest::Error) -> CancellationDetails {
        CancellationDetails {
            reason: crate::types::CancellationReason::Error,
            error_code: None,
            error_details: Some(err.to_string()),
        }
    }
}

/// Short-audio recognition reply.
#[derive(Debug, Deserialize)]
struct RecognitionReply {
    #[serde(rename = "RecognitionStatus")]
    status: String,
    #[serde(rename = "DisplayText", default)]
    display_text: String,
}

#[derive(Debug, Deserialize)]
struct TranslationReply {
    translations: Vec<TranslatedText>,
}

#[derive(Debug, Deserialize)]
struct TranslatedText {
    text: String,
}

/// The translator endpoint takes primary subtags ("fr"), not full BCP-47
/// tags ("fr-FR").
fn primary_language_tag(tag: &str) -> &str {
    tag.split('-').next().unwrap_or(tag)
}

fn escape_ssml(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('\'', "&apos;")
        .replace('"', "&quot;")
}

#[async_trait]
impl SpeechEngine for RestSpeechEngine {
    async fn recognize(&self, audio: &Path, language: &str) -> Result<EngineOutcome> {
        let bytes = tokio::fs::read(audio).await?;
        debug!(endpoint = %self.recognition_endpoint, language, len = bytes.len(), "sending audio for recognition");

        let response = match self
            .client
            .post(&self.recognition_endpoint)
            .query(&[("language", language), ("format", "simple")])
            .header(SUBSCRIPTION_KEY_HEADER, &self.secrets.subscription_key)
            .header(reqwest::header::CONTENT_TYPE, "audio/wav")
            .body(bytes)
            .send()
            .await
        {
            Ok(response) => response,
            Err(err) => {
                return Ok(EngineOutcome::Cancelled(Self::cancellation_from_transport(
                    err,
                )))
            }
        };

        if !response.status().is_success() {
            return Ok(EngineOutcome::Cancelled(
                Self::cancellation_from_response(response).await,
            ));
        }

        let reply: RecognitionReply = match response.json().await {
            Ok(reply) => reply,
            Err(err) => {
                return Ok(EngineOutcome::Cancelled(Self::cancellation_from_transport(
                    err,
                )))
            }
        };

        Ok(match reply.status.as_str() {
            "Success" => EngineOutcome::success(reply.display_text),
            "NoMatch" | "InitialSilenceTimeout" | "BabbleTimeout" => EngineOutcome::NoMatch,
            other => EngineOutcome::Cancelled(CancellationDetails::error(
                other.to_string(),
                "recognition did not complete",
            )),
        })
    }

    async fn translate(
        &self,
        audio: &Path,
        source_language: &str,
        target_language: &str,
    ) -> Result<EngineOutcome> {
        let recognized = match self.recognize(audio, source_language).await? {
            EngineOutcome::Success { text, .. } => text,
            other => return Ok(other),
        };

        debug!(endpoint = %self.translation_endpoint, target_language, "translating recognized text");

        let response = match self
            .client
            .post(&self.translation_endpoint)
            .query(&[
                ("api-version", "3.0"),
                ("from", primary_language_tag(source_language)),
                ("to", primary_language_tag(target_language)),
            ])
            .header(SUBSCRIPTION_KEY_HEADER, &self.secrets.subscription_key)
            .header(SUBSCRIPTION_REGION_HEADER, &self.secrets.region)
            .json(&[serde_json::json!({ "Text": recognized })])
            .send()
            .await
        {
            Ok(response) => response,
            Err(err) => {
                return Ok(EngineOutcome::Cancelled(Self::cancellation_from_transport(
                    err,
                )))
            }
        };

        if !response.status().is_success() {
            return Ok(EngineOutcome::Cancelled(
                Self::cancellation_from_response(response).await,
            ));
        }

        let replies: Vec<TranslationReply> = match response.json().await {
            Ok(replies) => replies,
            Err(err) => {
                return Ok(EngineOutcome::Cancelled(Self::cancellation_from_transport(
                    err,
                )))
            }
        };

        let translated = replies
            .into_iter()
            .next()
            .and_then(|reply| reply.translations.into_iter().next());
        let Some(translated) = translated else {
            return Ok(EngineOutcome::Cancelled(CancellationDetails::error(
                "EmptyTranslation",
                "translator returned no translations",
            )));
        };

        let mut translations = HashMap::new();
        translations.insert(target_language.to_string(), translated.text);
        Ok(EngineOutcome::Success {
            text: recognized,
            translations,
        })
    }

    async fn synthesize(&self, text: &str, voice: &str) -> Result<SynthesisOutcome> {
        let ssml = format!(
            "<speak version='1.0' xml:lang='en-US'><voice name='{}'>{}</voice></speak>",
            voice,
            escape_ssml(text)
        );
        debug!(endpoint = %self.synthesis_endpoint, voice, chars = text.len(), "sending text for synthesis");

        let response = match self
            .client
            .post(&self.synthesis_endpoint)
            .header(SUBSCRIPTION_KEY_HEADER, &self.secrets.subscription_key)
            .header(reqwest::header::CONTENT_TYPE, "application/ssml+xml")
            .header("X-Microsoft-OutputFormat", "riff-16khz-16bit-mono-pcm")
            .body(ssml)
            .send()
            .await
        {
            Ok(response) => response,
            Err(err) => {
                return Ok(SynthesisOutcome::cancelled(
                    Self::cancellation_from_transport(err),
                ))
            }
        };

        if !response.status().is_success() {
            return Ok(SynthesisOutcome::cancelled(
                Self::cancellation_from_response(response).await,
            ));
        }

        Ok(SynthesisOutcome::completed())
    }
}
