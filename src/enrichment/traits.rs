//! Trait definitions for the AI collaborators.
//!
//! The enrichment service only talks to these traits, so tests can swap in
//! the mocks below and the provider can change without touching callers.
//!
//! # Example
//!
//! ```ignore
//! use harmonic_mixer::enrichment::traits::EnergyAnalyzer;
//!
//! async fn rate<A: EnergyAnalyzer>(analyzer: &A, track: &Track) -> u8 {
//!     analyzer.analyze_energy(track).await.unwrap_or(5)
//! }
//! ```

use async_trait::async_trait;

use super::domain::{AudioClip, EnrichmentError, IdentifiedTrack};
use crate::model::Track;

/// Estimates a track's energy on the 1-10 scale.
#[async_trait]
pub trait EnergyAnalyzer: Send + Sync {
    async fn analyze_energy(&self, track: &Track) -> Result<u8, EnrichmentError>;
}

/// Picks the next track from a list of compatible candidates and says why.
#[async_trait]
pub trait Narrator: Send + Sync {
    async fn suggest_next(
        &self,
        current: &Track,
        candidates: &[Track],
    ) -> Result<String, EnrichmentError>;
}

/// Recognises a track from a short audio clip.
///
/// `Ok(None)` means the clip was processed but nothing was recognised.
#[async_trait]
pub trait TrackIdentifier: Send + Sync {
    async fn identify(&self, clip: &AudioClip) -> Result<Option<IdentifiedTrack>, EnrichmentError>;
}

// Implement traits for the real client

#[async_trait]
impl EnergyAnalyzer for super::gemini::GeminiClient {
    async fn analyze_energy(&self, track: &Track) -> Result<u8, EnrichmentError> {
        self.analyze_energy(track).await
    }
}

#[async_trait]
impl Narrator for super::gemini::GeminiClient {
    async fn suggest_next(
        &self,
        current: &Track,
        candidates: &[Track],
    ) -> Result<String, EnrichmentError> {
        self.suggest_next(current, candidates).await
    }
}

#[async_trait]
impl TrackIdentifier for super::gemini::GeminiClient {
    async fn identify(&self, clip: &AudioClip) -> Result<Option<IdentifiedTrack>, EnrichmentError> {
        self.identify(clip).await
    }
}

/// Mock collaborators for testing.
///
/// Each returns a canned answer, or a canned error that takes precedence.
#[cfg(test)]
pub mod mocks {
    use std::sync::Mutex;

    use super::*;

    /// Mock energy analyzer.
    pub struct MockEnergyAnalyzer {
        pub energy: u8,
        pub error: Option<EnrichmentError>,
    }

    impl MockEnergyAnalyzer {
        pub fn returning(energy: u8) -> Self {
            Self { energy, error: None }
        }

        pub fn with_error(error: EnrichmentError) -> Self {
            Self { energy: 0, error: Some(error) }
        }
    }

    #[async_trait]
    impl EnergyAnalyzer for MockEnergyAnalyzer {
        async fn analyze_energy(&self, _track: &Track) -> Result<u8, EnrichmentError> {
            if let Some(ref err) = self.error {
                return Err(err.clone());
            }
            Ok(self.energy)
        }
    }

    /// Mock narrator. Records how many candidates it was shown.
    pub struct MockNarrator {
        pub text: String,
        pub error: Option<EnrichmentError>,
        pub seen: Mutex<Option<usize>>,
    }

    impl MockNarrator {
        pub fn saying(text: &str) -> Self {
            Self {
                text: text.to_string(),
                error: None,
                seen: Mutex::new(None),
            }
        }

        pub fn with_error(error: EnrichmentError) -> Self {
            Self {
                text: String::new(),
                error: Some(error),
                seen: Mutex::new(None),
            }
        }

        /// Candidate count from the last call.
        pub fn candidates_seen(&self) -> Option<usize> {
            *self.seen.lock().unwrap()
        }
    }

    #[async_trait]
    impl Narrator for MockNarrator {
        async fn suggest_next(
            &self,
            _current: &Track,
            candidates: &[Track],
        ) -> Result<String, EnrichmentError> {
            *self.seen.lock().unwrap() = Some(candidates.len());
            if let Some(ref err) = self.error {
                return Err(err.clone());
            }
            Ok(self.text.clone())
        }
    }

    /// Mock identifier.
    pub struct MockIdentifier {
        pub result: Option<IdentifiedTrack>,
        pub error: Option<EnrichmentError>,
    }

    impl MockIdentifier {
        pub fn nothing_heard() -> Self {
            Self { result: None, error: None }
        }

        pub fn hearing(title: &str, artist: &str) -> Self {
            Self {
                result: Some(IdentifiedTrack {
                    title: Some(title.to_string()),
                    artist: Some(artist.to_string()),
                    ..Default::default()
                }),
                error: None,
            }
        }

        pub fn with_error(error: EnrichmentError) -> Self {
            Self { result: None, error: Some(error) }
        }
    }

    #[async_trait]
    impl TrackIdentifier for MockIdentifier {
        async fn identify(
            &self,
            _clip: &AudioClip,
        ) -> Result<Option<IdentifiedTrack>, EnrichmentError> {
            if let Some(ref err) = self.error {
                return Err(err.clone());
            }
            Ok(self.result.clone())
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use crate::test_utils::{demo_library, mock_track};

        #[tokio::test]
        async fn test_mock_energy_analyzer() {
            let mock = MockEnergyAnalyzer::returning(8);
            assert_eq!(mock.analyze_energy(&mock_track("1")).await.unwrap(), 8);
        }

        #[tokio::test]
        async fn test_mock_energy_analyzer_error() {
            let mock = MockEnergyAnalyzer::with_error(EnrichmentError::Network("timeout".to_string()));
            let result = mock.analyze_energy(&mock_track("1")).await;
            assert!(matches!(result, Err(EnrichmentError::Network(_))));
        }

        #[tokio::test]
        async fn test_mock_narrator_records_candidates() {
            let mock = MockNarrator::saying("Play Cola next.");
            let library = demo_library();
            let text = mock.suggest_next(&library[0], &library[1..4]).await.unwrap();
            assert_eq!(text, "Play Cola next.");
            assert_eq!(mock.candidates_seen(), Some(3));
        }

        #[tokio::test]
        async fn test_mock_identifier() {
            let clip = AudioClip::new(vec![1, 2, 3], "audio/webm");
            let heard = MockIdentifier::hearing("Strobe", "Deadmau5")
                .identify(&clip)
                .await
                .unwrap()
                .unwrap();
            assert_eq!(heard.title.as_deref(), Some("Strobe"));

            let nothing = MockIdentifier::nothing_heard().identify(&clip).await.unwrap();
            assert!(nothing.is_none());
        }
    }
}
