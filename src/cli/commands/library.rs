//! Export parsing, genre listing and key wheel commands.

use crate::config::Config;
use crate::harmonic;

use super::{LibraryArgs, energy_label, load_library, truncate};

/// Parse exports and print every track
pub fn cmd_parse(config: &Config, args: &LibraryArgs, json: bool) -> anyhow::Result<()> {
    let library = load_library(config, args)?;

    if json {
        println!("{}", serde_json::to_string_pretty(library.tracks())?);
        return Ok(());
    }

    println!("{} tracks:", library.len());
    println!();
    for track in library.tracks() {
        println!(
            "{:<24} {:<45} {:>4} {:>6.1} {:>3}  {}",
            truncate(&track.id, 24),
            truncate(&track.to_string(), 45),
            track.key,
            track.bpm,
            energy_label(track),
            track.genre
        );
    }
    Ok(())
}

/// List the library's genres
pub fn cmd_genres(config: &Config, args: &LibraryArgs) -> anyhow::Result<()> {
    let library = load_library(config, args)?;
    for genre in library.genres() {
        let count = library.tracks().iter().filter(|t| t.genre == genre).count();
        println!("{} ({})", genre, count);
    }
    Ok(())
}

/// Show the wheel neighbours of a key
pub fn cmd_keys(key: &str) -> anyhow::Result<()> {
    let Some(neighbors) = harmonic::harmonic_neighbors(key) else {
        anyhow::bail!("'{}' is not a Camelot key (expected 1-12 followed by A or B)", key);
    };

    println!("Compatible with {}: {}", neighbors.perfect, harmonic::compatible_keys(key).join(", "));
    println!();
    println!("  Perfect:     {}", neighbors.perfect);
    println!("  Energy up:   {}", neighbors.energy_up);
    println!("  Energy down: {}", neighbors.energy_down);
    println!("  Relative:    {}", neighbors.relative);
    Ok(())
}
