//! Ranking a library against the track that is currently playing.
//!
//! Every candidate is scored independently (in parallel with rayon), the
//! optional filters are applied to the scored set, and the result is sorted
//! by score. The sort is stable, so equal scores keep library order no
//! matter how the scoring work was scheduled.

use rayon::prelude::*;
use tracing::debug;

use crate::harmonic;
use crate::model::{Recommendation, Track};

/// Optional filters applied after scoring.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecommendFilter {
    /// Only keep candidates with exactly this genre
    pub genre: Option<String>,
    /// Only keep candidates with at least this energy (unknown never passes)
    pub min_energy: Option<u8>,
}

impl RecommendFilter {
    /// No filtering.
    pub fn none() -> Self {
        Self::default()
    }

    /// Only high-energy candidates.
    pub fn fire_mode(min_energy: u8) -> Self {
        Self {
            genre: None,
            min_energy: Some(min_energy),
        }
    }

    pub fn with_genre(mut self, genre: impl Into<String>) -> Self {
        self.genre = Some(genre.into());
        self
    }

    pub fn with_min_energy(mut self, min_energy: u8) -> Self {
        self.min_energy = Some(min_energy);
        self
    }

    /// Whether a scored recommendation survives the filter.
    pub fn accepts(&self, rec: &Recommendation) -> bool {
        if let Some(ref genre) = self.genre
            && rec.track.genre != *genre
        {
            return false;
        }
        if let Some(min) = self.min_energy
            && rec.track.energy.unwrap_or(0) < min
        {
            return false;
        }
        true
    }
}

/// Rank every other track in `library` as a follow-up to `reference`.
pub fn rank(reference: &Track, library: &[Track]) -> Vec<Recommendation> {
    rank_filtered(reference, library, &RecommendFilter::none())
}

/// [`rank`] with genre/energy filters applied to the scored set.
pub fn rank_filtered(
    reference: &Track,
    library: &[Track],
    filter: &RecommendFilter,
) -> Vec<Recommendation> {
    // Indexed parallel collect keeps library order.
    let scored: Vec<Option<Recommendation>> = library
        .par_iter()
        .map(|candidate| harmonic::score(reference, candidate))
        .collect();

    let mut recs: Vec<Recommendation> = scored
        .into_iter()
        .flatten()
        .filter(|rec| filter.accepts(rec))
        .collect();

    recs.sort_by(|a, b| b.compatibility_score.cmp(&a.compatibility_score));

    debug!(
        target: "recommend",
        reference = %reference.id,
        candidates = library.len(),
        kept = recs.len(),
        "Ranked library"
    );
    recs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::MixType;
    use crate::test_utils::{demo_library, track_with};

    #[test]
    fn test_rank_sorted_descending() {
        let library = demo_library();
        let reference = &library[3]; // Strobe, 128, 8A, energy 5
        let recs = rank(reference, &library);

        assert!(!recs.is_empty());
        assert!(recs.iter().all(|r| r.track.id != reference.id));
        assert!(
            recs.windows(2)
                .all(|w| w[0].compatibility_score >= w[1].compatibility_score)
        );
    }

    #[test]
    fn test_rank_demo_expectations() {
        let library = demo_library();
        let reference = &library[3]; // Strobe
        let recs = rank(reference, &library);
        let ids: Vec<_> = recs.iter().map(|r| r.track.id.as_str()).collect();

        // Cola: 122 BPM (4.7%), 8A, energy 6 -> 25 + 50 + 10
        let cola = recs.iter().find(|r| r.track.id == "9").unwrap();
        assert_eq!(cola.compatibility_score, 85);
        assert_eq!(cola.mix_type, MixType::Perfect);

        // Atmosphere: 128, 7A, energy 9 -> 40 + 40 - 5
        let atmosphere = recs.iter().find(|r| r.track.id == "5").unwrap();
        assert_eq!(atmosphere.compatibility_score, 75);
        assert_eq!(atmosphere.mix_type, MixType::Harmonic);

        // Summer: 128, 12B vs 8A -> 40 - 20 + 0 (energy +3)
        assert!(!ids.contains(&"7"));
    }

    #[test]
    fn test_ties_keep_library_order() {
        let reference = track_with("ref", 128.0, "8A", None);
        let library = vec![
            track_with("b", 128.0, "9A", None),
            track_with("a", 128.0, "7A", None),
            track_with("best", 128.0, "8A", None),
            track_with("c", 128.0, "8B", None),
        ];
        let recs = rank(&reference, &library);
        let ids: Vec<_> = recs.iter().map(|r| r.track.id.as_str()).collect();
        assert_eq!(ids, vec!["best", "b", "a", "c"]);
    }

    #[test]
    fn test_genre_filter_after_scoring() {
        let library = demo_library();
        let reference = &library[0]; // One More Time, House
        let filter = RecommendFilter::none().with_genre("House");
        let recs = rank_filtered(reference, &library, &filter);
        assert!(!recs.is_empty());
        assert!(recs.iter().all(|r| r.track.genre == "House"));
    }

    #[test]
    fn test_fire_mode_filter() {
        let library = demo_library();
        let reference = &library[3];
        let recs = rank_filtered(reference, &library, &RecommendFilter::fire_mode(8));
        assert!(recs.iter().all(|r| r.track.energy.unwrap_or(0) >= 8));
    }

    #[test]
    fn test_unknown_energy_fails_min_energy() {
        let reference = track_with("ref", 128.0, "8A", None);
        let library = vec![track_with("x", 128.0, "8A", None)];
        assert_eq!(rank(&reference, &library).len(), 1);
        let filtered = rank_filtered(
            &reference,
            &library,
            &RecommendFilter::none().with_min_energy(1),
        );
        assert!(filtered.is_empty());
    }

    #[test]
    fn test_empty_library() {
        let reference = track_with("ref", 128.0, "8A", None);
        assert!(rank(&reference, &[]).is_empty());
    }
}
