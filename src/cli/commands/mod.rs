//! CLI command definitions and dispatch.
//!
//! Each group of subcommands lives in its own submodule:
//! - `library`: parsing exports, listing genres, exploring the key wheel
//! - `recommend`: ranking the next track
//! - `requests`: matching audience requests
//! - `enrich`: energy ratings, narration and live identification
//! - `settings`: showing the effective configuration

mod enrich;
mod library;
mod recommend;
mod requests;
mod settings;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use tokio::runtime::Runtime;

use crate::config::{self, Config};
use crate::error::Error;
use crate::library::{IdSchemeKind, Library, LibraryParser};
use crate::model::{Recommendation, Track};

pub use enrich::{cmd_energy, cmd_identify, cmd_suggest};
pub use library::{cmd_genres, cmd_keys, cmd_parse};
pub use recommend::cmd_recommend;
pub use requests::cmd_request;
pub use settings::cmd_config;

/// Harmonic mixing assistant for DJs
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Use this config file instead of the default location
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Exports to load and how to identify their rows
#[derive(Args, Debug, Clone, Default)]
pub struct LibraryArgs {
    /// CSV/TXT exports or folders of them (defaults to [library] paths)
    pub files: Vec<PathBuf>,

    /// Id scheme: line-title, sequential or content-hash
    #[arg(long)]
    pub ids: Option<IdSchemeKind>,
}

/// Available subcommands
#[derive(Subcommand)]
pub enum Commands {
    /// Parse exports and print the tracks found
    Parse {
        #[command(flatten)]
        library: LibraryArgs,
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// List the genres in the library
    Genres {
        #[command(flatten)]
        library: LibraryArgs,
    },
    /// Show the keys that mix with a Camelot key
    Keys {
        /// Camelot key, e.g. 8A
        key: String,
    },
    /// Rank what to play after a track
    Recommend {
        #[command(flatten)]
        library: LibraryArgs,
        /// Track id or title currently playing
        #[arg(short, long)]
        track: String,
        /// Only recommend this genre
        #[arg(long)]
        genre: Option<String>,
        /// Only recommend tracks with at least this energy
        #[arg(long)]
        min_energy: Option<u8>,
        /// High-energy tracks only (uses [recommend] fire_min_energy)
        #[arg(long)]
        fire: bool,
        /// Maximum rows to print (0 = all; defaults to [recommend] limit)
        #[arg(short, long)]
        limit: Option<usize>,
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Match an audience request against the library
    Request {
        /// What the guest asked for
        query: String,
        #[command(flatten)]
        library: LibraryArgs,
    },
    /// Rate a track's energy with the AI collaborator
    Energy {
        #[command(flatten)]
        library: LibraryArgs,
        /// Track id or title
        #[arg(short, long)]
        track: String,
        /// Gemini API key (or set GEMINI_API_KEY env var)
        #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
        api_key: Option<String>,
    },
    /// Ask the AI collaborator which compatible track to play next
    Suggest {
        #[command(flatten)]
        library: LibraryArgs,
        /// Track id or title currently playing
        #[arg(short, long)]
        track: String,
        /// Gemini API key (or set GEMINI_API_KEY env var)
        #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
        api_key: Option<String>,
    },
    /// Identify a recorded clip and rank what to play after it
    Identify {
        /// Audio clip (webm, ogg, mp3, wav, flac, m4a)
        clip: PathBuf,
        #[command(flatten)]
        library: LibraryArgs,
        /// Gemini API key (or set GEMINI_API_KEY env var)
        #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
        api_key: Option<String>,
        /// Maximum recommendations to print (defaults to [recommend] limit)
        #[arg(short, long)]
        limit: Option<usize>,
    },
    /// Print the config file location and effective settings
    Config {
        /// Write the effective settings to the config file if it doesn't exist yet
        #[arg(long)]
        init: bool,
    },
}

/// Run the specified CLI command.
pub fn run_command(cli: &Cli) -> anyhow::Result<()> {
    let config = match &cli.config {
        Some(path) => config::load_from(path),
        None => config::load(),
    };

    match &cli.command {
        Commands::Parse { library, json } => cmd_parse(&config, library, *json),
        Commands::Genres { library } => cmd_genres(&config, library),
        Commands::Keys { key } => cmd_keys(key),
        Commands::Recommend {
            library,
            track,
            genre,
            min_energy,
            fire,
            limit,
            json,
        } => cmd_recommend(
            &config,
            library,
            track,
            genre.as_deref(),
            *min_energy,
            *fire,
            *limit,
            *json,
        ),
        Commands::Request { query, library } => cmd_request(&config, library, query),
        Commands::Energy {
            library,
            track,
            api_key,
        } => {
            let rt = Runtime::new()?;
            cmd_energy(&rt, &config, library, track, api_key.clone())
        }
        Commands::Suggest {
            library,
            track,
            api_key,
        } => {
            let rt = Runtime::new()?;
            cmd_suggest(&rt, &config, library, track, api_key.clone())
        }
        Commands::Identify {
            clip,
            library,
            api_key,
            limit,
        } => {
            let rt = Runtime::new()?;
            cmd_identify(&rt, &config, clip, library, api_key.clone(), *limit)
        }
        Commands::Config { init } => cmd_config(&config, cli.config.as_deref(), *init),
    }
}

// ============================================================================
// Shared helper functions
// ============================================================================

/// Load the exports named on the command line, or the configured ones.
pub(crate) fn load_library(config: &Config, args: &LibraryArgs) -> anyhow::Result<Library> {
    let paths: &[PathBuf] = if args.files.is_empty() {
        &config.library.paths
    } else {
        &args.files
    };
    if paths.is_empty() {
        return Err(Error::config(
            "no exports given; pass CSV files or set [library] paths in the config file",
        )
        .into());
    }

    let scheme = args.ids.unwrap_or(config.library.id_scheme);
    let mut parser = LibraryParser::new().with_id_scheme(scheme);
    crate::library::load_paths(paths, &mut parser).map_err(|e| match e {
        Error::NoTracks => anyhow::anyhow!(
            "No tracks could be read from {}. Check that the export has artist and title columns.",
            describe_paths(paths)
        ),
        other => anyhow::Error::new(other).context("loading library"),
    })
}

/// Find the track the DJ is talking about, by id or title.
pub(crate) fn resolve_track<'a>(library: &'a Library, id_or_title: &str) -> anyhow::Result<&'a Track> {
    library
        .find(id_or_title)
        .with_context(|| format!("No track with id or title '{}' in the library", id_or_title))
}

fn describe_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Apply a display limit where 0 means everything.
pub(crate) fn limited<T>(items: &[T], limit: usize) -> &[T] {
    if limit == 0 {
        items
    } else {
        &items[..items.len().min(limit)]
    }
}

pub(crate) fn energy_label(track: &Track) -> String {
    track
        .known_energy()
        .map(|e| e.to_string())
        .unwrap_or_else(|| "-".to_string())
}

/// Print ranked recommendations as a table.
pub(crate) fn print_recommendations(reference: &Track, recs: &[Recommendation], limit: usize) {
    println!(
        "After: {} [{} | {} BPM | energy {}]",
        reference,
        reference.key,
        reference.bpm,
        energy_label(reference)
    );
    println!();

    if recs.is_empty() {
        println!("No compatible tracks found. Try removing filters or loading more exports.");
        return;
    }

    let shown = limited(recs, limit);
    for (i, rec) in shown.iter().enumerate() {
        println!(
            "{:>3}. {:>3}  {:<12} {:<45} {:>4} {:>6.1} {:>3}  {}",
            i + 1,
            rec.compatibility_score,
            rec.mix_type.label(),
            truncate(&rec.track.to_string(), 45),
            rec.track.key,
            rec.track.bpm,
            energy_label(&rec.track),
            rec.reason
        );
    }
    if shown.len() < recs.len() {
        println!("... and {} more (use --limit 0 to show all)", recs.len() - shown.len());
    }
}

/// Truncate to `max` characters, marking the cut with an ellipsis.
pub(crate) fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let mut out: String = text.chars().take(max.saturating_sub(1)).collect();
        out.push('…');
        out
    }
}

/// Read a clip file and work out its MIME type.
pub(crate) fn read_clip(path: &Path) -> anyhow::Result<crate::enrichment::AudioClip> {
    let mime = crate::enrichment::AudioClip::mime_for_path(path).ok_or_else(|| {
        Error::invalid_format(format!("unsupported audio file type: {}", path.display()))
    })?;
    if !path.exists() {
        return Err(Error::not_found(path).into());
    }
    let data = std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    Ok(crate::enrichment::AudioClip::new(data, mime))
}
