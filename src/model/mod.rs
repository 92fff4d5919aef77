//! Core data models for the mixing engine.
//!
//! Defines the primary entities: [`Track`], [`Recommendation`] and [`MixType`].
//! Tracks are produced by the library parser (or by a live identification)
//! and are treated as immutable values by the scorer. Recommendations are
//! created fresh per (reference, candidate) pair and never stored.

use serde::{Deserialize, Serialize};
use std::fmt;

/// BPM used when a row carries no recoverable tempo.
pub const DEFAULT_BPM: f64 = 120.0;

/// Key text used when a row carries no recoverable key (position 12, minor).
pub const DEFAULT_KEY: &str = "12A";

/// Genre used when a row carries no genre.
pub const UNKNOWN_GENRE: &str = "Unknown";

/// A track in the DJ's library.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    /// Identity, unique within a library snapshot
    pub id: String,
    /// Artist name (never empty)
    pub artist: String,
    /// Track title (never empty)
    pub title: String,
    /// Tempo in beats per minute
    pub bpm: f64,
    /// Camelot key text, e.g. "8A" or "12B"
    pub key: String,
    /// Subjective intensity 1-10; `None` means unknown
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub energy: Option<u8>,
    /// Genre or crate folder ("Unknown" when absent)
    pub genre: String,
}

impl Track {
    /// Energy as a presence signal.
    ///
    /// A stored value of 0 counts as unknown, matching the rule that a zero
    /// BPM is unknown.
    pub fn known_energy(&self) -> Option<u8> {
        self.energy.filter(|&e| e != 0)
    }

    /// Whether the track has a usable tempo.
    pub fn has_tempo(&self) -> bool {
        self.bpm.is_finite() && self.bpm > 0.0
    }
}

impl fmt::Display for Track {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.artist, self.title)
    }
}

/// Why two tracks mix well.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum MixType {
    /// Identical key
    Perfect,
    /// Adjacent or relative key on the wheel
    Harmonic,
    /// Same mode, one or two steps up the wheel
    #[serde(rename = "Energy Boost")]
    EnergyBoost,
    /// No harmonic relation
    #[default]
    #[serde(rename = "Vibe Change")]
    VibeChange,
}

impl MixType {
    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            MixType::Perfect => "Perfect",
            MixType::Harmonic => "Harmonic",
            MixType::EnergyBoost => "Energy Boost",
            MixType::VibeChange => "Vibe Change",
        }
    }
}

impl fmt::Display for MixType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A scored candidate for the next track.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    pub track: Track,
    pub compatibility_score: i32,
    /// Comma-joined reason tags (may be empty)
    pub reason: String,
    pub mix_type: MixType,
}
