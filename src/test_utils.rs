//! Test utilities and fixtures for harmonic-mixer tests.
//!
//! # Example
//!
//! ```ignore
//! use crate::test_utils::{demo_library, track_with};
//!
//! let reference = track_with("ref", 128.0, "8A", Some(5));
//! let recs = recommend::rank(&reference, &demo_library());
//! ```

use crate::model::Track;

/// Creates a mock Track with sensible defaults.
///
/// Customize with struct update syntax:
///
/// ```ignore
/// let track = Track {
///     genre: "Techno".to_string(),
///     ..mock_track("1")
/// };
/// ```
pub fn mock_track(id: &str) -> Track {
    Track {
        id: id.to_string(),
        artist: "Test Artist".to_string(),
        title: format!("Test Track {}", id),
        bpm: 128.0,
        key: "8A".to_string(),
        energy: Some(5),
        genre: "House".to_string(),
    }
}

/// Creates a mock Track with the fields the scorer looks at.
pub fn track_with(id: &str, bpm: f64, key: &str, energy: Option<u8>) -> Track {
    Track {
        bpm,
        key: key.to_string(),
        energy,
        ..mock_track(id)
    }
}

/// A small, varied library (ids "1" to "10").
pub fn demo_library() -> Vec<Track> {
    let rows: [(&str, &str, &str, f64, &str, u8, &str); 10] = [
        ("1", "Daft Punk", "One More Time", 123.0, "8B", 8, "House"),
        ("2", "Stardust", "Music Sounds Better With You", 124.0, "8B", 7, "House"),
        ("3", "Modjo", "Lady (Hear Me Tonight)", 126.0, "9B", 6, "House"),
        ("4", "Deadmau5", "Strobe", 128.0, "8A", 5, "Progressive"),
        ("5", "Kaskade", "Atmosphere", 128.0, "7A", 9, "EDM"),
        ("6", "Zedd", "Clarity", 128.0, "6A", 9, "Pop"),
        ("7", "Calvin Harris", "Summer", 128.0, "12B", 8, "Pop"),
        ("8", "Fisher", "Losing It", 125.0, "2A", 10, "Tech House"),
        ("9", "CamelPhat", "Cola", 122.0, "8A", 6, "Deep House"),
        ("10", "Swedish House Mafia", "Don't You Worry Child", 129.0, "2B", 9, "Progressive"),
    ];

    rows.into_iter()
        .map(|(id, artist, title, bpm, key, energy, genre)| Track {
            id: id.to_string(),
            artist: artist.to_string(),
            title: title.to_string(),
            bpm,
            key: key.to_string(),
            energy: Some(energy),
            genre: genre.to_string(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_track_defaults() {
        let track = mock_track("42");
        assert_eq!(track.id, "42");
        assert_eq!(track.title, "Test Track 42");
        assert_eq!(track.key, "8A");
        assert_eq!(track.energy, Some(5));
    }

    #[test]
    fn test_demo_library_ids_unique() {
        let library = demo_library();
        let mut ids: Vec<_> = library.iter().map(|t| t.id.clone()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), library.len());
    }
}
