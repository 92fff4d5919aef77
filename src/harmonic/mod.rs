//! Camelot wheel key algebra.
//!
//! The Camelot wheel arranges the 24 musical keys on 12 positions, each with
//! a minor ("A", inner ring) and a major ("B", outer ring) variant. Keys
//! that sit next to each other on the wheel, or share a position, mix
//! without harmonic clashes.
//!
//! # Key text
//!
//! The only bit-exact format handled here is `^\d{1,2}[AB]$`, accepted in
//! either case with surrounding whitespace ignored. Canonical output is
//! upper-case without a leading zero ("8A", "12B").
//!
//! Parsing never fails loudly: text that is not a usable key yields `None`,
//! and callers treat that as "no harmonic information".

pub mod scoring;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub use scoring::score;

/// Number of positions on the wheel.
pub const WHEEL_SIZE: u8 = 12;

/// Ring of the wheel a key sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Mode {
    /// Outer ring, letter `B`
    Major,
    /// Inner ring, letter `A`
    Minor,
}

impl Mode {
    /// Single-letter code used in key text.
    pub fn letter(&self) -> char {
        match self {
            Mode::Major => 'B',
            Mode::Minor => 'A',
        }
    }

    /// Parse a mode letter (either case).
    pub fn from_letter(c: char) -> Option<Self> {
        match c.to_ascii_uppercase() {
            'A' => Some(Mode::Minor),
            'B' => Some(Mode::Major),
            _ => None,
        }
    }

    /// The relative major/minor.
    pub fn opposite(&self) -> Self {
        match self {
            Mode::Major => Mode::Minor,
            Mode::Minor => Mode::Major,
        }
    }
}

/// A position on the Camelot wheel.
///
/// The position is always in `1..=12`; there is no way to build a key
/// outside that range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CamelotKey {
    position: u8,
    mode: Mode,
}

impl CamelotKey {
    /// Create a key, or `None` if the position is off the wheel.
    pub fn new(position: u8, mode: Mode) -> Option<Self> {
        (1..=WHEEL_SIZE)
            .contains(&position)
            .then_some(Self { position, mode })
    }

    pub fn position(&self) -> u8 {
        self.position
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// One step clockwise (12 wraps to 1).
    pub fn next(&self) -> Self {
        Self {
            position: self.position % WHEEL_SIZE + 1,
            mode: self.mode,
        }
    }

    /// One step counter-clockwise (1 wraps to 12).
    pub fn prev(&self) -> Self {
        Self {
            position: (self.position + WHEEL_SIZE - 2) % WHEEL_SIZE + 1,
            mode: self.mode,
        }
    }

    /// Same position on the other ring.
    pub fn relative(&self) -> Self {
        Self {
            position: self.position,
            mode: self.mode.opposite(),
        }
    }

    /// The four compatible keys in wheel order: identity, +1, -1, relative.
    pub fn compatible(&self) -> [CamelotKey; 4] {
        [*self, self.next(), self.prev(), self.relative()]
    }

    /// Named view of [`CamelotKey::compatible`].
    pub fn neighbors(&self) -> HarmonicNeighbors {
        HarmonicNeighbors {
            perfect: *self,
            energy_up: self.next(),
            energy_down: self.prev(),
            relative: self.relative(),
        }
    }
}

impl fmt::Display for CamelotKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.position, self.mode.letter())
    }
}

impl FromStr for CamelotKey {
    type Err = InvalidKey;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_key(s).ok_or_else(|| InvalidKey(s.to_string()))
    }
}

/// Returned by [`CamelotKey::from_str`] for text that is not a key.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Not a Camelot key: {0:?}")]
pub struct InvalidKey(pub String);

/// The four harmonic neighbours of a key, by role.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HarmonicNeighbors {
    pub perfect: CamelotKey,
    pub energy_up: CamelotKey,
    pub energy_down: CamelotKey,
    pub relative: CamelotKey,
}

/// Parse key text such as `"8A"` or `" 12b "`.
///
/// Accepts one or two ASCII digits followed by a single mode letter.
/// Anything else, including positions 0 and 13-99, is `None`.
pub fn parse_key(text: &str) -> Option<CamelotKey> {
    let text = text.trim();
    let mut chars = text.chars();
    let mode = Mode::from_letter(chars.next_back()?)?;
    let digits = chars.as_str();

    if digits.is_empty() || digits.len() > 2 || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    let position: u8 = digits.parse().ok()?;
    CamelotKey::new(position, mode)
}

/// Canonical text for the keys compatible with `text`.
///
/// Exactly four entries (identity, +1, -1, relative) when the key parses,
/// empty otherwise. Entries are not deduplicated.
pub fn compatible_keys(text: &str) -> Vec<String> {
    parse_key(text)
        .map(|key| key.compatible().iter().map(ToString::to_string).collect())
        .unwrap_or_default()
}

/// Named neighbours for key text, or `None` if it does not parse.
pub fn harmonic_neighbors(text: &str) -> Option<HarmonicNeighbors> {
    parse_key(text).map(|key| key.neighbors())
}

/// Canonical form of key text, if it parses.
pub fn canonical(text: &str) -> Option<String> {
    parse_key(text).map(|key| key.to_string())
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn any_mode() -> impl Strategy<Value = Mode> {
        prop_oneof![Just(Mode::Major), Just(Mode::Minor)]
    }

    proptest! {
        /// Canonical text always parses back to the same key
        #[test]
        fn canonical_text_roundtrips(position in 1u8..=12, mode in any_mode()) {
            let key = CamelotKey::new(position, mode).unwrap();
            prop_assert_eq!(parse_key(&key.to_string()), Some(key));
        }

        /// Lower-case input parses to the same key as upper-case
        #[test]
        fn lowercase_parses_same(position in 1u8..=12, mode in any_mode()) {
            let key = CamelotKey::new(position, mode).unwrap();
            let lower = key.to_string().to_lowercase();
            prop_assert_eq!(parse_key(&lower), Some(key));
        }

        /// Parsed keys are always on the wheel
        #[test]
        fn parsed_position_in_range(text in "[0-9]{1,2}[ABab]") {
            if let Some(key) = parse_key(&text) {
                prop_assert!((1..=12).contains(&key.position()));
            }
        }

        /// Four entries, stepping by one in each direction
        #[test]
        fn compatible_has_four_entries(position in 1u8..=12, mode in any_mode()) {
            let key = CamelotKey::new(position, mode).unwrap();
            let keys = compatible_keys(&key.to_string());
            prop_assert_eq!(keys.len(), 4);
            prop_assert_eq!(key.next().prev(), key);
            prop_assert_eq!(key.relative().relative(), key);
        }
    }
}
