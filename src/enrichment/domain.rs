//! Internal domain models for AI enrichment.
//!
//! These types don't change when the provider's API changes. Responses are
//! converted into them by the provider's adapter.

use std::path::Path;

use crate::harmonic;
use crate::model::Track;

/// Energy returned when no collaborator is available or it fails.
pub const NEUTRAL_ENERGY: u8 = 5;

/// Tempo assumed for a live identification without a BPM estimate.
pub const LIVE_BPM: f64 = 120.0;

/// Key assumed for a live identification without a key estimate.
pub const LIVE_KEY: &str = "8A";

/// Genre given to every live identification.
pub const LIVE_GENRE: &str = "Detected Live";

/// Clamp a raw energy estimate into 1..=10. Zero means "no estimate".
pub fn clamp_energy(raw: i64) -> u8 {
    if raw == 0 {
        NEUTRAL_ENERGY
    } else {
        raw.clamp(1, 10) as u8
    }
}

/// A short recording submitted for identification.
#[derive(Debug, Clone)]
pub struct AudioClip {
    pub data: Vec<u8>,
    pub mime_type: String,
}

impl AudioClip {
    pub fn new(data: Vec<u8>, mime_type: impl Into<String>) -> Self {
        Self {
            data,
            mime_type: mime_type.into(),
        }
    }

    /// MIME type for a clip file, by extension.
    pub fn mime_for_path(path: &Path) -> Option<&'static str> {
        let ext = path.extension()?.to_str()?.to_lowercase();
        match ext.as_str() {
            "webm" => Some("audio/webm"),
            "ogg" | "oga" => Some("audio/ogg"),
            "mp3" => Some("audio/mpeg"),
            "wav" => Some("audio/wav"),
            "flac" => Some("audio/flac"),
            "m4a" | "aac" => Some("audio/aac"),
            _ => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// What the identifier heard in a clip.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IdentifiedTrack {
    pub title: Option<String>,
    pub artist: Option<String>,
    pub bpm: Option<f64>,
    /// Key text as reported, not yet validated
    pub key: Option<String>,
    pub energy: Option<u8>,
}

impl IdentifiedTrack {
    /// Both title and artist are present and non-blank.
    pub fn is_identified(&self) -> bool {
        let present = |s: &Option<String>| s.as_deref().is_some_and(|v| !v.trim().is_empty());
        present(&self.title) && present(&self.artist)
    }

    /// Build a playable track, applying the live defaults.
    ///
    /// Returns `None` unless both title and artist are known.
    pub fn into_track(self, id: impl Into<String>) -> Option<Track> {
        if !self.is_identified() {
            return None;
        }
        let bpm = self.bpm.filter(|b| b.is_finite() && *b > 0.0).unwrap_or(LIVE_BPM);
        let key = self
            .key
            .as_deref()
            .and_then(harmonic::canonical)
            .unwrap_or_else(|| LIVE_KEY.to_string());
        let energy = self.energy.map(|e| clamp_energy(e.into())).unwrap_or(NEUTRAL_ENERGY);

        Some(Track {
            id: id.into(),
            artist: self.artist?.trim().to_string(),
            title: self.title?.trim().to_string(),
            bpm,
            key,
            energy: Some(energy),
            genre: LIVE_GENRE.to_string(),
        })
    }
}

/// Id for a track heard live: `live-<unix millis>`.
pub fn live_id() -> String {
    format!("live-{}", chrono::Utc::now().timestamp_millis())
}

/// Errors that can occur while talking to the AI collaborator.
#[derive(Debug, Clone, thiserror::Error)]
pub enum EnrichmentError {
    #[error("No Gemini API key configured")]
    MissingApiKey,

    #[error("Network error: {0}")]
    Network(String),

    #[error("API request failed: {0}")]
    ApiError(String),

    #[error("Failed to parse response: {0}")]
    Parse(String),

    #[error("Invalid API response: {0}")]
    InvalidResponse(String),

    #[error("Unusable audio clip: {0}")]
    Audio(String),
}
