//! Matching free-text audience requests against the library.
//!
//! Requests arrive as whatever the guest typed ("daft punk", "one more").
//! Each track is scored on its title and artist, case-insensitively:
//!
//! - exact title or artist: 100
//! - title or artist starts with the query: 80
//! - title or artist contains the query: 50
//!
//! Tracks that match none of these are left out.

use serde::Serialize;

use crate::model::Track;

/// Score for an exact title/artist match.
pub const EXACT_SCORE: u8 = 100;
/// Score for a prefix match.
pub const PREFIX_SCORE: u8 = 80;
/// Score for a substring match.
pub const CONTAINS_SCORE: u8 = 50;

/// A library track that matches a request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RequestMatch<'a> {
    pub track: &'a Track,
    pub score: u8,
}

/// Match a request against the library, best first.
///
/// A blank query matches nothing. Equal scores keep library order.
pub fn match_request<'a>(query: &str, library: &'a [Track]) -> Vec<RequestMatch<'a>> {
    let query = query.trim();
    if query.is_empty() {
        return Vec::new();
    }
    let query = query.to_lowercase();

    let mut matches: Vec<RequestMatch<'a>> = library
        .iter()
        .filter_map(|track| {
            let score = request_score(&query, track);
            (score > 0).then_some(RequestMatch { track, score })
        })
        .collect();

    matches.sort_by(|a, b| b.score.cmp(&a.score));
    matches
}

/// Score one track against an already lower-cased query.
fn request_score(query: &str, track: &Track) -> u8 {
    let title = track.title.to_lowercase();
    let artist = track.artist.to_lowercase();

    if title == query || artist == query {
        EXACT_SCORE
    } else if title.starts_with(query) || artist.starts_with(query) {
        PREFIX_SCORE
    } else if title.contains(query) || artist.contains(query) {
        CONTAINS_SCORE
    } else {
        0
    }
}

/// Whether the request names this track's title or artist exactly.
pub fn is_exact(query: &str, track: &Track) -> bool {
    let query = query.trim().to_lowercase();
    !query.is_empty()
        && (track.title.to_lowercase() == query || track.artist.to_lowercase() == query)
}

/// Resolve an identified title/artist against the library.
///
/// First track whose title equals `title`, or whose title contains `title`
/// and whose artist contains `artist` (all case-insensitive).
pub fn find_in_library<'a>(title: &str, artist: &str, library: &'a [Track]) -> Option<&'a Track> {
    let title = title.to_lowercase();
    let artist = artist.to_lowercase();

    library.iter().find(|track| {
        let track_title = track.title.to_lowercase();
        track_title == title
            || (track_title.contains(&title) && track.artist.to_lowercase().contains(&artist))
    })
}
