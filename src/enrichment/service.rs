//! Enrichment service - orchestrates the AI collaborators
//!
//! This is the high-level API the CLI uses. Every call degrades gracefully:
//! 1. No API key: neutral answers, nothing is sent anywhere
//! 2. Collaborator error: logged, then the same neutral answer
//! 3. Success: answers are clamped/capped before they reach the caller

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::enrichment::{
    domain::{AudioClip, EnrichmentError, NEUTRAL_ENERGY, live_id},
    gemini::{DEFAULT_BASE_URL, DEFAULT_MODEL, GeminiClient},
    traits::{EnergyAnalyzer, Narrator, TrackIdentifier},
};
use crate::library::Library;
use crate::model::{Recommendation, Track};
use crate::requests;

/// Shown when no narrator is configured.
pub const NARRATION_UNAVAILABLE: &str = "AI unavailable";
/// Shown when the narrator fails.
pub const NARRATION_FAILED: &str = "Could not generate suggestion.";
/// Shown when the narrator answers with nothing.
pub const NARRATION_EMPTY: &str = "No suggestion generated.";

/// Configuration for the enrichment service
#[derive(Debug, Clone)]
pub struct EnrichmentConfig {
    /// Gemini API key; `None` runs the service offline
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
    /// How many ranked candidates the narrator sees
    pub narration_candidates: usize,
    pub timeout: Duration,
}

impl Default for EnrichmentConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            narration_candidates: 10,
            timeout: Duration::from_secs(30),
        }
    }
}

/// Result of identifying a live clip
#[derive(Debug, Clone, PartialEq)]
pub enum LiveMatch {
    /// The heard track is already in the library
    InLibrary(Track),
    /// Not in the library; built from the identification with live defaults
    Detected(Track),
}

impl LiveMatch {
    pub fn track(&self) -> &Track {
        match self {
            Self::InLibrary(track) | Self::Detected(track) => track,
        }
    }
}

/// Service for AI-assisted enrichment
pub struct EnrichmentService {
    config: EnrichmentConfig,
    energy: Option<Arc<dyn EnergyAnalyzer>>,
    narrator: Option<Arc<dyn Narrator>>,
    identifier: Option<Arc<dyn TrackIdentifier>>,
}

impl EnrichmentService {
    /// Create a service backed by Gemini when an API key is configured.
    pub fn new(config: EnrichmentConfig) -> Self {
        let client = config.api_key.as_deref().map(|key| {
            GeminiClient::new(key, config.model.clone(), config.timeout)
                .map(|client| Arc::new(client.with_base_url(config.base_url.clone())))
        });

        match client {
            Some(Ok(client)) => {
                info!(target: "enrichment", model = %client.model(), "Gemini collaborators enabled");
                Self {
                    energy: Some(client.clone()),
                    narrator: Some(client.clone()),
                    identifier: Some(client),
                    config,
                }
            }
            Some(Err(e)) => {
                warn!(target: "enrichment", error = %e, "Gemini client unavailable, running offline");
                Self::offline(config)
            }
            None => Self::offline(config),
        }
    }

    /// A service with no collaborators; every call returns its fallback.
    pub fn offline(config: EnrichmentConfig) -> Self {
        Self {
            config,
            energy: None,
            narrator: None,
            identifier: None,
        }
    }

    pub fn with_energy_analyzer(mut self, analyzer: impl EnergyAnalyzer + 'static) -> Self {
        self.energy = Some(Arc::new(analyzer));
        self
    }

    pub fn with_narrator(mut self, narrator: impl Narrator + 'static) -> Self {
        self.narrator = Some(Arc::new(narrator));
        self
    }

    pub fn with_identifier(mut self, identifier: impl TrackIdentifier + 'static) -> Self {
        self.identifier = Some(Arc::new(identifier));
        self
    }

    pub fn is_online(&self) -> bool {
        self.energy.is_some() || self.narrator.is_some() || self.identifier.is_some()
    }

    /// Energy estimate for a track, always in 1..=10.
    ///
    /// Falls back to the neutral 5 when offline or on any error.
    pub async fn energy_for(&self, track: &Track) -> u8 {
        let Some(ref analyzer) = self.energy else {
            debug!(target: "enrichment", "No energy analyzer, using neutral energy");
            return NEUTRAL_ENERGY;
        };

        match analyzer.analyze_energy(track).await {
            Ok(0) => NEUTRAL_ENERGY,
            Ok(energy) => energy.clamp(1, 10),
            Err(e) => {
                warn!(target: "enrichment", track = %track.id, error = %e, "Energy analysis failed");
                NEUTRAL_ENERGY
            }
        }
    }

    /// Re-rate one library track and store the result.
    ///
    /// Returns the new energy, or `None` if no track has that id.
    pub async fn enrich_energy(&self, library: &mut Library, id: &str) -> Option<u8> {
        let track = library.get(id)?.clone();
        let energy = self.energy_for(&track).await;
        library.set_energy(id, Some(energy));
        info!(target: "enrichment", track = %id, energy, "Energy updated");
        Some(energy)
    }

    /// Narrated pick among the top-ranked candidates.
    ///
    /// Only the first `narration_candidates` recommendations are shown to
    /// the narrator. Failures come back as fixed fallback text.
    pub async fn suggest_next(&self, current: &Track, ranked: &[Recommendation]) -> String {
        let Some(ref narrator) = self.narrator else {
            return NARRATION_UNAVAILABLE.to_string();
        };

        let candidates: Vec<Track> = ranked
            .iter()
            .take(self.config.narration_candidates)
            .map(|rec| rec.track.clone())
            .collect();

        match narrator.suggest_next(current, &candidates).await {
            Ok(text) if text.trim().is_empty() => NARRATION_EMPTY.to_string(),
            Ok(text) => text,
            Err(e) => {
                warn!(target: "enrichment", error = %e, "Narration failed");
                NARRATION_FAILED.to_string()
            }
        }
    }

    /// Identify a clip and resolve it against the library.
    ///
    /// `Ok(None)` means nothing was recognised. Errors are returned so the
    /// caller can tell "silence" from "offline".
    pub async fn identify(
        &self,
        clip: &AudioClip,
        library: &[Track],
    ) -> Result<Option<LiveMatch>, EnrichmentError> {
        let identifier = self.identifier.as_ref().ok_or(EnrichmentError::MissingApiKey)?;

        let Some(identified) = identifier.identify(clip).await? else {
            info!(target: "enrichment", "Nothing recognised in clip");
            return Ok(None);
        };

        let title = identified.title.clone().unwrap_or_default();
        let artist = identified.artist.clone().unwrap_or_default();

        if let Some(known) = requests::find_in_library(&title, &artist, library) {
            info!(target: "enrichment", track = %known.id, "Identified track is in the library");
            return Ok(Some(LiveMatch::InLibrary(known.clone())));
        }

        Ok(identified.into_track(live_id()).map(|track| {
            info!(target: "enrichment", track = %track, "Identified track not in library");
            LiveMatch::Detected(track)
        }))
    }
}
