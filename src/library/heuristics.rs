//! Column detection for track exports.
//!
//! Two strategies, tried in this order per input:
//!
//! 1. **Header row** - a row whose cells name the columns (`Artist`, `BPM`,
//!    `Tono`, ...). Matching is case-insensitive against a fixed synonym
//!    list per field, English and Spanish.
//! 2. **Positional** - no header: artist and title are the first two
//!    columns, and the remaining columns are offered to an ordered rule
//!    list. The first rule that claims a value wins that column.

use super::csv::leading_number;
use crate::harmonic::{CamelotKey, Mode, parse_key};

/// A field a column can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Artist,
    Title,
    Bpm,
    Key,
    Genre,
}

/// Lower-case header names recognised for each field.
const HEADER_SYNONYMS: &[(Field, &[&str])] = &[
    (Field::Artist, &["artist", "artista"]),
    (Field::Title, &["title", "name", "song", "canción", "titulo"]),
    (Field::Bpm, &["bpm", "tempo"]),
    (Field::Key, &["key", "key text", "tono"]),
    (Field::Genre, &["genre", "género"]),
];

/// Which field a header cell names, if any.
pub fn header_field(cell: &str) -> Option<Field> {
    let cell = cell.to_lowercase();
    HEADER_SYNONYMS
        .iter()
        .find(|(_, names)| names.contains(&cell.as_str()))
        .map(|(field, _)| *field)
}

/// Column positions captured from a header row.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HeaderIndex {
    pub artist: Option<usize>,
    pub title: Option<usize>,
    pub bpm: Option<usize>,
    pub key: Option<usize>,
    pub genre: Option<usize>,
}

impl HeaderIndex {
    /// Scan a row for header names. A later cell naming the same field wins.
    pub fn scan(cells: &[String]) -> Self {
        let mut index = Self::default();
        for (i, cell) in cells.iter().enumerate() {
            let slot = match header_field(cell) {
                Some(Field::Artist) => &mut index.artist,
                Some(Field::Title) => &mut index.title,
                Some(Field::Bpm) => &mut index.bpm,
                Some(Field::Key) => &mut index.key,
                Some(Field::Genre) => &mut index.genre,
                None => continue,
            };
            *slot = Some(i);
        }
        index
    }

    /// A row is a header only if it names the artist or title column.
    pub fn is_header(&self) -> bool {
        self.artist.is_some() || self.title.is_some()
    }
}

/// Raw field values pulled out of one row, before defaults.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RowFields {
    pub artist: String,
    pub title: String,
    pub bpm: Option<f64>,
    pub key: Option<CamelotKey>,
    pub genre: Option<String>,
}

/// Extract fields by header position. Missing columns stay absent.
pub fn extract_by_header(cells: &[String], header: &HeaderIndex) -> RowFields {
    let cell = |idx: Option<usize>| idx.and_then(|i| cells.get(i)).map(String::as_str);

    RowFields {
        artist: cell(header.artist).unwrap_or_default().to_string(),
        title: cell(header.title).unwrap_or_default().to_string(),
        bpm: cell(header.bpm).and_then(leading_number).filter(|b| *b > 0.0),
        key: cell(header.key).and_then(key_token),
        genre: cell(header.genre)
            .filter(|g| !g.is_empty())
            .map(str::to_string),
    }
}

/// A rule that may claim a value for one of the optional fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnRule {
    /// A number strictly between 50 and 220
    Bpm,
    /// One or two digits plus a mode letter (`m`/`n` read as minor)
    Key,
    /// Non-numeric text longer than three characters
    Genre,
}

/// Evaluation order for positional columns.
pub const POSITIONAL_RULES: [ColumnRule; 3] = [ColumnRule::Bpm, ColumnRule::Key, ColumnRule::Genre];

impl ColumnRule {
    /// The rule only fires while its field is unassigned.
    pub fn is_open(&self, row: &RowFields) -> bool {
        match self {
            ColumnRule::Bpm => row.bpm.is_none(),
            ColumnRule::Key => row.key.is_none(),
            ColumnRule::Genre => row.genre.is_none(),
        }
    }

    /// Try to claim `value`, writing it into `row` on success.
    pub fn claim(&self, value: &str, row: &mut RowFields) -> bool {
        match self {
            ColumnRule::Bpm => match leading_number(value).filter(|b| *b > 50.0 && *b < 220.0) {
                Some(bpm) => {
                    row.bpm = Some(bpm);
                    true
                }
                None => false,
            },
            ColumnRule::Key => match key_token(value) {
                Some(key) => {
                    row.key = Some(key);
                    true
                }
                None => false,
            },
            ColumnRule::Genre => {
                if value.chars().count() > 3 && leading_number(value).is_none() {
                    row.genre = Some(value.to_string());
                    true
                } else {
                    false
                }
            }
        }
    }
}

/// Extract fields positionally: artist, title, then rule-claimed columns.
pub fn extract_positional(cells: &[String]) -> RowFields {
    let mut row = RowFields {
        artist: cells.first().cloned().unwrap_or_default(),
        title: cells.get(1).cloned().unwrap_or_default(),
        ..Default::default()
    };

    for value in cells.iter().skip(2) {
        for rule in POSITIONAL_RULES {
            if rule.is_open(&row) && rule.claim(value, &mut row) {
                break;
            }
        }
    }
    row
}

/// Read a key cell, accepting the informal lower-case `m`/`n` minor markers.
pub fn key_token(value: &str) -> Option<CamelotKey> {
    let value = value.trim();
    let (idx, marker) = value.char_indices().next_back()?;
    match marker {
        'm' | 'n' => parse_key(&format!("{}{}", &value[..idx], Mode::Minor.letter())),
        _ => parse_key(value),
    }
}
