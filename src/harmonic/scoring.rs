//! Pairwise compatibility scoring.
//!
//! Points are accumulated in three stages and then thresholded:
//!
//! | Stage    | Outcome                                   | Points |
//! |----------|-------------------------------------------|--------|
//! | Tempo    | within 3%                                 | +40    |
//! |          | within 6%                                 | +25    |
//! |          | double or half time (±5 BPM)              | +20    |
//! |          | anything else                             | reject |
//! | Harmony  | identical key                             | +50    |
//! |          | compatible key                            | +40    |
//! |          | same mode, +1 step                        | +35    |
//! |          | same mode, +2 steps                       | +20    |
//! |          | otherwise                                 | -20    |
//! | Energy   | equal                                     | +15    |
//! |          | +1 or +2                                  | +10    |
//! |          | -1                                        | +5     |
//! |          | below -2                                  | -15    |
//! |          | above +3                                  | -5     |
//!
//! Pairs scoring below [`MIN_SCORE`] produce no recommendation at all.

use smallvec::SmallVec;
use tracing::debug;

use super::{CamelotKey, parse_key};
use crate::model::{MixType, Recommendation, Track};

/// Lowest score that still yields a recommendation.
pub const MIN_SCORE: i32 = 45;

/// Tolerance (absolute BPM) for double/half time matches.
const DOUBLE_TIME_TOLERANCE: f64 = 5.0;

type Reasons = SmallVec<[&'static str; 4]>;

/// Score `candidate` as the next track after `reference`.
///
/// Returns `None` when the pair is not mixable: same track, unknown tempo,
/// tempo too far apart, or a total below [`MIN_SCORE`].
pub fn score(reference: &Track, candidate: &Track) -> Option<Recommendation> {
    if reference.id == candidate.id {
        return None;
    }
    if !reference.has_tempo() || !candidate.has_tempo() {
        return None;
    }

    let mut reasons = Reasons::new();
    let mut total = tempo_points(reference.bpm, candidate.bpm, &mut reasons)?;

    let mut mix_type = MixType::VibeChange;
    if let (Some(ref_key), Some(cand_key)) = (parse_key(&reference.key), parse_key(&candidate.key))
    {
        let (points, kind) = harmonic_points(ref_key, cand_key, &mut reasons);
        total += points;
        if let Some(kind) = kind {
            mix_type = kind;
        }
    }

    if let (Some(ref_energy), Some(cand_energy)) =
        (reference.known_energy(), candidate.known_energy())
    {
        total += energy_points(i32::from(cand_energy) - i32::from(ref_energy), &mut reasons);
    }

    if total < MIN_SCORE {
        debug!(
            target: "harmonic::score",
            reference = %reference.id,
            candidate = %candidate.id,
            score = total,
            "Below threshold"
        );
        return None;
    }

    Some(Recommendation {
        track: candidate.clone(),
        compatibility_score: total,
        reason: reasons.join(", "),
        mix_type,
    })
}

/// Tempo gate. `None` means the gap is a hard disqualifier.
fn tempo_points(reference_bpm: f64, candidate_bpm: f64, reasons: &mut Reasons) -> Option<i32> {
    let percent = (reference_bpm - candidate_bpm).abs() / reference_bpm * 100.0;

    if percent <= 3.0 {
        reasons.push("exact tempo");
        Some(40)
    } else if percent <= 6.0 {
        reasons.push("adjustable tempo");
        Some(25)
    } else if is_double_or_half(reference_bpm, candidate_bpm) {
        reasons.push("double/half time");
        Some(20)
    } else {
        None
    }
}

fn is_double_or_half(reference_bpm: f64, candidate_bpm: f64) -> bool {
    (candidate_bpm - reference_bpm * 2.0).abs() < DOUBLE_TIME_TOLERANCE
        || (candidate_bpm - reference_bpm / 2.0).abs() < DOUBLE_TIME_TOLERANCE
}

/// Harmonic stage for two parsed keys.
///
/// Only a step difference of -11 (12 -> 1) is corrected as a wrap; other
/// negative differences fall through to the penalty.
fn harmonic_points(
    reference: CamelotKey,
    candidate: CamelotKey,
    reasons: &mut Reasons,
) -> (i32, Option<MixType>) {
    if reference == candidate {
        reasons.push("identical key");
        return (50, Some(MixType::Perfect));
    }
    if reference.compatible().contains(&candidate) {
        reasons.push("compatible harmony");
        return (40, Some(MixType::Harmonic));
    }

    let diff = i32::from(candidate.position()) - i32::from(reference.position());
    let adjusted = if diff == -11 { 1 } else { diff };
    let same_mode = candidate.mode() == reference.mode();

    match (same_mode, adjusted) {
        (true, 1) => {
            reasons.push("+1 energy");
            (35, Some(MixType::EnergyBoost))
        }
        (true, 2) => {
            reasons.push("+2 energy jump");
            (20, Some(MixType::EnergyBoost))
        }
        _ => (-20, None),
    }
}

/// Energy stage. Differences of -2 and +3 deliberately score nothing.
fn energy_points(diff: i32, reasons: &mut Reasons) -> i32 {
    match diff {
        0 => 15,
        1 | 2 => 10,
        -1 => 5,
        d if d < -2 => {
            reasons.push("abrupt drop");
            -15
        }
        d if d > 3 => -5,
        _ => 0,
    }
}
