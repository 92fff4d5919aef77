//! Track library ingestion.
//!
//! Turns the text of a DJ software export (Serato, VirtualDJ, a hand-made
//! spreadsheet...) into [`Track`]s. The format is inferred per call:
//!
//! - Lines are split on `\n`; blank lines are skipped.
//! - The first non-blank line, or any line with a `bpm` cell while no artist
//!   column is known, is checked for header names. If it names the artist
//!   or title column it is consumed as a header.
//! - With a header, fields are read by column. Without one, a positional
//!   heuristic is used (see [`heuristics`]).
//! - Rows without both artist and title are dropped silently.
//!
//! Parsing never fails. Reading files can, and an ingestion that yields no
//! tracks at all is reported by [`load_paths`] as [`Error::NoTracks`].

pub mod csv;
pub mod heuristics;
pub mod ids;

use std::collections::{BTreeSet, HashSet};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::error::{Error, Result, ResultExt};
use crate::model::{DEFAULT_BPM, DEFAULT_KEY, Track, UNKNOWN_GENRE};
use heuristics::{HeaderIndex, RowFields};
pub use ids::{
    ContentHashIds, EnergySource, FixedEnergy, IdScheme, IdSchemeKind, LineTitleIds, RandomEnergy,
    SequentialIds,
};

/// Parse export text with the default id scheme and placeholder energy.
pub fn parse(raw: &str) -> Vec<Track> {
    LibraryParser::new().parse(raw)
}

/// Export parser with explicit id and energy collaborators.
pub struct LibraryParser {
    ids: Box<dyn IdScheme>,
    energy: Box<dyn EnergySource>,
}

impl Default for LibraryParser {
    fn default() -> Self {
        Self::new()
    }
}

impl LibraryParser {
    /// Line/title ids and random placeholder energy.
    pub fn new() -> Self {
        Self {
            ids: Box::new(LineTitleIds),
            energy: Box::new(RandomEnergy),
        }
    }

    pub fn with_ids(mut self, ids: impl IdScheme + 'static) -> Self {
        self.ids = Box::new(ids);
        self
    }

    pub fn with_id_scheme(mut self, kind: IdSchemeKind) -> Self {
        self.ids = kind.build();
        self
    }

    pub fn with_energy(mut self, energy: impl EnergySource + 'static) -> Self {
        self.energy = Box::new(energy);
        self
    }

    /// Parse one export. Rows come back in line order.
    pub fn parse(&mut self, raw: &str) -> Vec<Track> {
        let mut tracks = Vec::new();
        let mut header: Option<HeaderIndex> = None;
        let mut seen_content = false;
        let mut dropped = 0usize;

        for (index, line) in raw.split('\n').enumerate() {
            let line = line.strip_suffix('\r').unwrap_or(line);
            if line.trim().is_empty() {
                continue;
            }

            let cells = csv::split_line(line);
            let first = !seen_content;
            seen_content = true;

            let artist_known = header.is_some_and(|h| h.artist.is_some());
            if first || (!artist_known && cells.iter().any(|c| c.eq_ignore_ascii_case("bpm"))) {
                let scanned = HeaderIndex::scan(&cells);
                if scanned.is_header() {
                    debug!(target: "library::parse", line = index, ?scanned, "Header row");
                    header = Some(scanned);
                    continue;
                }
            }

            let row = match &header {
                Some(h) => heuristics::extract_by_header(&cells, h),
                None => heuristics::extract_positional(&cells),
            };

            match self.build_track(index, row) {
                Some(track) => tracks.push(track),
                None => {
                    dropped += 1;
                    debug!(target: "library::parse", line = index, "Dropped row without artist/title");
                }
            }
        }

        info!(
            target: "library::parse",
            tracks = tracks.len(),
            dropped,
            header = header.is_some(),
            "Parsed export"
        );
        tracks
    }

    fn build_track(&mut self, line_index: usize, row: RowFields) -> Option<Track> {
        let artist = row.artist.trim();
        let title = row.title.trim();
        if artist.is_empty() || title.is_empty() {
            return None;
        }

        Some(Track {
            id: self.ids.id_for(line_index, artist, title),
            artist: artist.to_string(),
            title: title.to_string(),
            bpm: row.bpm.unwrap_or(DEFAULT_BPM),
            key: row
                .key
                .map(|k| k.to_string())
                .unwrap_or_else(|| DEFAULT_KEY.to_string()),
            energy: self.energy.energy(),
            genre: row.genre.unwrap_or_else(|| UNKNOWN_GENRE.to_string()),
        })
    }
}

/// An ordered collection of tracks, in ingestion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Library {
    tracks: Vec<Track>,
}

impl Library {
    pub fn new(tracks: Vec<Track>) -> Self {
        Self { tracks }
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    /// Add tracks after the existing ones.
    pub fn append(&mut self, tracks: Vec<Track>) {
        self.tracks.extend(tracks);
    }

    /// Discard the current tracks and start over.
    pub fn replace(&mut self, tracks: Vec<Track>) {
        self.tracks = tracks;
    }

    pub fn get(&self, id: &str) -> Option<&Track> {
        self.tracks.iter().find(|t| t.id == id)
    }

    /// Look a track up by id, then by case-insensitive title.
    pub fn find(&self, id_or_title: &str) -> Option<&Track> {
        self.get(id_or_title).or_else(|| {
            let wanted = id_or_title.to_lowercase();
            self.tracks.iter().find(|t| t.title.to_lowercase() == wanted)
        })
    }

    /// Record enriched energy for a track. Returns false if the id is unknown.
    pub fn set_energy(&mut self, id: &str, energy: Option<u8>) -> bool {
        match self.tracks.iter_mut().find(|t| t.id == id) {
            Some(track) => {
                track.energy = energy;
                true
            }
            None => false,
        }
    }

    /// Sorted unique genres.
    pub fn genres(&self) -> Vec<String> {
        self.tracks
            .iter()
            .map(|t| {
                if t.genre.is_empty() {
                    UNKNOWN_GENRE.to_string()
                } else {
                    t.genre.clone()
                }
            })
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}

/// Read and parse a single export file.
pub fn load_file(path: &Path, parser: &mut LibraryParser) -> Result<Vec<Track>> {
    if !path.exists() {
        return Err(Error::not_found(path));
    }
    let raw = std::fs::read_to_string(path).with_context(format!("reading {}", path.display()))?;
    let tracks = parser.parse(&raw);
    info!(target: "library::load", path = %path.display(), tracks = tracks.len(), "Loaded export");
    Ok(tracks)
}

/// Load several files or directories into one library, in path order.
///
/// Directories are walked recursively for `.csv` and `.txt` files. Ids stay
/// unique across the whole library: a track whose id was already taken by an
/// earlier file gets that file's ordinal as a prefix (`"2:1-Strobe"`).
pub fn load_paths(paths: &[PathBuf], parser: &mut LibraryParser) -> Result<Library> {
    let mut library = Library::default();
    let mut seen = HashSet::new();
    let files = paths.iter().flat_map(|path| collect_export_files(path));

    for (ordinal, file) in files.enumerate() {
        let mut tracks = load_file(&file, parser)?;
        for track in &mut tracks {
            track.id = unique_id(&mut seen, std::mem::take(&mut track.id), ordinal + 1);
        }
        library.append(tracks);
    }

    if library.is_empty() {
        return Err(Error::NoTracks);
    }
    Ok(library)
}

/// Claim `id`, qualifying it with the file ordinal (and a counter if needed) on collision.
fn unique_id(seen: &mut HashSet<String>, id: String, file_ordinal: usize) -> String {
    if seen.insert(id.clone()) {
        return id;
    }
    let mut candidate = format!("{file_ordinal}:{id}");
    let mut n = 2;
    while !seen.insert(candidate.clone()) {
        candidate = format!("{file_ordinal}:{id}#{n}");
        n += 1;
    }
    debug!(target: "library::load", %id, renamed = %candidate, "Duplicate id across exports");
    candidate
}

/// Expand a path into export files, sorted for a stable load order.
pub fn collect_export_files(path: &Path) -> Vec<PathBuf> {
    if !path.is_dir() {
        return vec![path.to_path_buf()];
    }

    let mut files: Vec<PathBuf> = walkdir::WalkDir::new(path)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter(|e| is_export_file(e.path()))
        .map(|e| e.path().to_path_buf())
        .collect();
    files.sort();
    files
}

/// Check if a path has an export file extension
pub fn is_export_file(path: &Path) -> bool {
    let ext = path
        .extension()
        .and_then(|s| s.to_str())
        .map(|s| s.to_lowercase());
    matches!(ext.as_deref(), Some("csv" | "txt"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parser() -> LibraryParser {
        LibraryParser::new().with_energy(FixedEnergy(Some(7)))
    }

    #[test]
    fn test_header_then_rows() {
        let raw = "Artist,Title,BPM,Key,Genre\n\
                   Daft Punk,One More Time,123,8B,House\n\
                   Deadmau5,Strobe,128,8a,Progressive\n";
        let tracks = parser().parse(raw);

        assert_eq!(tracks.len(), 2);
        assert_eq!(tracks[0].id, "1-OneMoreTime");
        assert_eq!(tracks[0].artist, "Daft Punk");
        assert_eq!(tracks[0].bpm, 123.0);
        assert_eq!(tracks[0].key, "8B");
        assert_eq!(tracks[0].genre, "House");
        assert_eq!(tracks[0].energy, Some(7));
        assert_eq!(tracks[1].id, "2-Strobe");
        assert_eq!(tracks[1].key, "8A");
    }

    #[test]
    fn test_header_columns_in_any_order() {
        let raw = "Tono;x,Canción,Artista,Tempo\n7A,Despacito,Fonsi,89\n";
        let tracks = parser().parse(raw);
        assert_eq!(tracks.len(), 1);
        assert_eq!(tracks[0].title, "Despacito");
        assert_eq!(tracks[0].artist, "Fonsi");
        assert_eq!(tracks[0].bpm, 89.0);
        // "Tono;x" is not a key header
        assert_eq!(tracks[0].key, DEFAULT_KEY);
    }

    #[test]
    fn test_headerless_heuristic() {
        let raw = "Fisher,Losing It,125.00,2A,Tech House\n\
                   \"Earth, Wind & Fire\",September,126,10m,Disco\n";
        let tracks = parser().parse(raw);

        assert_eq!(tracks.len(), 2);
        assert_eq!(tracks[0].id, "0-LosingIt");
        assert_eq!(tracks[0].bpm, 125.0);
        assert_eq!(tracks[0].key, "2A");
        assert_eq!(tracks[0].genre, "Tech House");
        assert_eq!(tracks[1].artist, "Earth, Wind & Fire");
        assert_eq!(tracks[1].key, "10A");
    }

    #[test]
    fn test_defaults_for_missing_fields() {
        let tracks = parser().parse("Someone,Something\n");
        assert_eq!(tracks.len(), 1);
        assert_eq!(tracks[0].bpm, DEFAULT_BPM);
        assert_eq!(tracks[0].key, DEFAULT_KEY);
        assert_eq!(tracks[0].genre, UNKNOWN_GENRE);
    }

    #[test]
    fn test_unparseable_header_values_default() {
        let raw = "Artist,Title,BPM,Key\nA,T,n/a,Am\n";
        let tracks = parser().parse(raw);
        assert_eq!(tracks[0].bpm, DEFAULT_BPM);
        assert_eq!(tracks[0].key, DEFAULT_KEY);
    }

    #[test]
    fn test_malformed_row_dropped_without_shifting_ids() {
        let raw = "Artist,Title,BPM\nA,One,120\n,Orphan,121\nC,Three,122\n";
        let tracks = parser().parse(raw);
        let ids: Vec<_> = tracks.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["1-One", "3-Three"]);
    }

    #[test]
    fn test_blank_lines_and_crlf() {
        let raw = "\r\n\nArtist,Title,BPM\r\n\r\nA,One,120\r\nB,\"Two\",121\r\n";
        let tracks = parser().parse(raw);
        assert_eq!(tracks.len(), 2);
        assert_eq!(tracks[0].id, "4-One");
        assert_eq!(tracks[1].title, "Two");
    }

    #[test]
    fn test_late_header_detected_by_bpm_cell() {
        let raw = "My Export v2\n\
                   Artist,Title,BPM,Key\n\
                   A,One,120,5B\n";
        let tracks = parser().parse(raw);
        // "My Export v2" has no title column so it becomes a (dropped) row
        assert_eq!(tracks.len(), 1);
        assert_eq!(tracks[0].key, "5B");
        assert_eq!(tracks[0].id, "2-One");
    }

    #[test]
    fn test_sequential_ids_across_inputs() {
        let mut parser = parser().with_ids(SequentialIds::new("t"));
        let first = parser.parse("A,One\nB,Two\n");
        let second = parser.parse("C,Three\n");
        assert_eq!(first[1].id, "t2");
        assert_eq!(second[0].id, "t3");
    }

    #[test]
    fn test_library_genres_sorted_unique() {
        let library = Library::new(parser().parse(
            "Artist,Title,Genre\nA,1,Techno\nB,2,House\nC,3,Techno\nD,4,\n",
        ));
        assert_eq!(library.genres(), vec!["House", "Techno", "Unknown"]);
    }

    #[test]
    fn test_library_append_replace_and_energy() {
        let mut library = Library::new(parser().parse("A,One\n"));
        library.append(parser().parse("Artist,Title\nB,Two\n"));
        assert_eq!(library.len(), 2);

        assert!(library.set_energy("1-Two", Some(3)));
        assert_eq!(library.get("1-Two").unwrap().energy, Some(3));
        assert!(!library.set_energy("missing", Some(3)));

        library.replace(vec![]);
        assert!(library.is_empty());
    }

    #[test]
    fn test_library_find_by_title() {
        let library = Library::new(parser().parse("A,One More Time\n"));
        assert_eq!(library.find("one more time").unwrap().id, "0-OneMoreTime");
        assert_eq!(library.find("0-OneMoreTime").unwrap().title, "One More Time");
        assert!(library.find("nope").is_none());
    }

    #[test]
    fn test_load_paths_from_directory() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("b.csv"), "Artist,Title\nB,Two\n").unwrap();
        std::fs::write(dir.path().join("a.txt"), "A,One\n").unwrap();
        std::fs::write(dir.path().join("notes.md"), "X,Ignored\n").unwrap();

        let library = load_paths(&[dir.path().to_path_buf()], &mut parser()).unwrap();
        let titles: Vec<_> = library.tracks().iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, vec!["One", "Two"]);
    }

    #[test]
    fn test_load_paths_ids_unique_across_files() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a.csv");
        let b = dir.path().join("b.csv");
        std::fs::write(&a, "Artist,Title,BPM,Key\nDeadmau5,Strobe,128,8A\n").unwrap();
        std::fs::write(&b, "Artist,Title,BPM,Key\nRemixer,Strobe,128,8A\n").unwrap();

        // Unknown energy keeps the pair at tempo + key points only
        let mut parser = LibraryParser::new().with_energy(FixedEnergy(None));
        let library = load_paths(&[a, b], &mut parser).unwrap();
        let ids: Vec<_> = library.tracks().iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["1-Strobe", "2:1-Strobe"]);

        let recs = crate::recommend::rank(&library.tracks()[0], library.tracks());
        assert_eq!(recs.len(), 1);
        assert_eq!(recs[0].track.artist, "Remixer");
        assert_eq!(recs[0].compatibility_score, 90);
    }

    #[test]
    fn test_unique_id_counts_past_repeats() {
        let mut seen = HashSet::new();
        assert_eq!(unique_id(&mut seen, "x".to_string(), 1), "x");
        assert_eq!(unique_id(&mut seen, "x".to_string(), 2), "2:x");
        assert_eq!(unique_id(&mut seen, "x".to_string(), 2), "2:x#2");
    }

    #[test]
    fn test_load_paths_no_tracks() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("empty.csv");
        std::fs::write(&file, "Artist,Title\n").unwrap();
        let result = load_paths(&[file], &mut parser());
        assert!(matches!(result, Err(Error::NoTracks)));
    }

    #[test]
    fn test_load_missing_file() {
        let result = load_file(Path::new("/definitely/not/here.csv"), &mut parser());
        assert!(matches!(result, Err(Error::NotFound(_))));
    }
}
