//! Gemini HTTP client
//!
//! Talks to the Generative Language REST API (`models/{model}:generateContent`).
//! See: https://ai.google.dev/api/generate-content
//!
//! ## Notes
//!
//! The API key travels in the `key` query parameter, URL-encoded. Energy and
//! identification prompts ask for JSON via `responseMimeType` plus a
//! `responseSchema`, so the answer can be deserialized directly. Audio goes
//! inline as base64, which caps clips at the inline request size limit
//! (about 20 MB).

use std::time::Duration;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde_json::json;

use super::{adapter, dto};
use crate::enrichment::domain::{AudioClip, EnrichmentError, IdentifiedTrack};
use crate::model::Track;

/// Public endpoint of the Generative Language API.
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Default model for all three prompts.
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// Largest clip we will inline.
const MAX_INLINE_BYTES: usize = 20 * 1024 * 1024;

const IDENTIFY_PROMPT: &str = "Listen to this audio clip carefully.
1. Identify the song title and artist.
2. Estimate the BPM (beats per minute) as accurately as possible.
3. Estimate the energy level (1-10).
4. Estimate the musical key in Camelot notation (like 8A or 5B) if possible, otherwise null.

Return JSON only.";

/// Gemini API client
pub struct GeminiClient {
    api_key: String,
    model: String,
    http_client: reqwest::Client,
    base_url: String,
}

impl GeminiClient {
    /// Create a new client.
    ///
    /// The client accepts gzip responses and gives up on requests after `timeout`.
    pub fn new(
        api_key: impl Into<String>,
        model: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, EnrichmentError> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(EnrichmentError::MissingApiKey);
        }

        let http_client = reqwest::Client::builder()
            .gzip(true)
            .timeout(timeout)
            .user_agent(concat!(
                env!("CARGO_PKG_NAME"),
                "/",
                env!("CARGO_PKG_VERSION")
            ))
            .build()
            .map_err(|e| EnrichmentError::Network(e.to_string()))?;

        Ok(Self {
            api_key,
            model: model.into(),
            http_client,
            base_url: DEFAULT_BASE_URL.to_string(),
        })
    }

    /// Point the client at a different API root (proxies, tests).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Rate a track's energy from 1 (ambient) to 10 (peak hour).
    pub async fn analyze_energy(&self, track: &Track) -> Result<u8, EnrichmentError> {
        let request = dto::GenerateContentRequest {
            contents: vec![text_content(energy_prompt(track))],
            generation_config: Some(json_output(json!({
                "type": "OBJECT",
                "properties": {
                    "energy": { "type": "INTEGER" },
                    "reasoning": { "type": "STRING" }
                }
            }))),
        };
        adapter::to_energy(self.generate(&request).await?)
    }

    /// Ask which candidate to play next, with a short justification.
    pub async fn suggest_next(
        &self,
        current: &Track,
        candidates: &[Track],
    ) -> Result<String, EnrichmentError> {
        let request = dto::GenerateContentRequest {
            contents: vec![text_content(narration_prompt(current, candidates))],
            generation_config: None,
        };
        adapter::to_narration(self.generate(&request).await?)
    }

    /// Recognise the song in an audio clip.
    pub async fn identify(&self, clip: &AudioClip) -> Result<Option<IdentifiedTrack>, EnrichmentError> {
        if clip.is_empty() {
            return Err(EnrichmentError::Audio("clip is empty".to_string()));
        }
        if clip.data.len() > MAX_INLINE_BYTES {
            return Err(EnrichmentError::Audio(format!(
                "clip is {} bytes, inline limit is {}",
                clip.data.len(),
                MAX_INLINE_BYTES
            )));
        }

        let request = dto::GenerateContentRequest {
            contents: vec![dto::Content {
                parts: vec![
                    dto::Part::InlineData {
                        inline_data: dto::Blob {
                            mime_type: clip.mime_type.clone(),
                            data: STANDARD.encode(&clip.data),
                        },
                    },
                    dto::Part::Text {
                        text: IDENTIFY_PROMPT.to_string(),
                    },
                ],
            }],
            generation_config: Some(json_output(json!({
                "type": "OBJECT",
                "properties": {
                    "artist": { "type": "STRING" },
                    "title": { "type": "STRING" },
                    "bpm": { "type": "NUMBER" },
                    "key": { "type": "STRING" },
                    "energy": { "type": "INTEGER" }
                }
            }))),
        };
        adapter::to_identified(self.generate(&request).await?)
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent?key={}",
            self.base_url,
            self.model,
            urlencoding::encode(&self.api_key)
        )
    }

    /// Send one `generateContent` call and decode the response envelope.
    async fn generate(
        &self,
        request: &dto::GenerateContentRequest,
    ) -> Result<dto::GenerateContentResponse, EnrichmentError> {
        tracing::debug!(target: "enrichment::gemini", model = %self.model, "generateContent");

        let response = self
            .http_client
            .post(self.endpoint())
            .json(request)
            .send()
            .await
            .map_err(|e| EnrichmentError::Network(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(adapter::to_api_error(status, &body));
        }

        response
            .json::<dto::GenerateContentResponse>()
            .await
            .map_err(|e| EnrichmentError::Parse(e.to_string()))
    }
}

fn text_content(text: String) -> dto::Content {
    dto::Content {
        parts: vec![dto::Part::Text { text }],
    }
}

fn json_output(schema: serde_json::Value) -> dto::GenerationConfig {
    dto::GenerationConfig {
        response_mime_type: "application/json".to_string(),
        response_schema: schema,
    }
}

fn energy_text(track: &Track) -> String {
    track
        .known_energy()
        .map(|e| e.to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

fn energy_prompt(track: &Track) -> String {
    format!(
        "Analyze the energy level of the song \"{}\" by \"{}\".\n\
         Return a single integer between 1 (very chill/ambient) and 10 (peak hour/banger).\n\
         Consider BPM ({}) and genre ({}) if known.",
        track.title, track.artist, track.bpm, track.genre
    )
}

fn narration_prompt(current: &Track, candidates: &[Track]) -> String {
    let options = candidates
        .iter()
        .map(|t| {
            format!(
                "- {} - {} (Key: {}, BPM: {}, Energy: {})",
                t.artist,
                t.title,
                t.key,
                t.bpm,
                energy_text(t)
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "I am a DJ playing \"{}\" by \"{}\" (Key: {}, BPM: {}, Energy: {}).\n\n\
         Here are my compatible options:\n{}\n\n\
         Select the BEST track to mix next to maintain a good flow.\n\
         Explain why in 2 sentences max. Focus on vibe and harmonic mixing.",
        current.title,
        current.artist,
        current.key,
        current.bpm,
        energy_text(current),
        options
    )
}
