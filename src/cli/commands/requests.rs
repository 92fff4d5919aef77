//! Audience request command.

use crate::config::Config;
use crate::requests;

use super::{LibraryArgs, load_library};

/// Match what a guest asked for
pub fn cmd_request(config: &Config, args: &LibraryArgs, query: &str) -> anyhow::Result<()> {
    let library = load_library(config, args)?;
    let matches = requests::match_request(query, library.tracks());

    if matches.is_empty() {
        println!("Nothing in the library matches '{}'.", query.trim());
        return Ok(());
    }

    for m in &matches {
        let marker = if requests::is_exact(query, m.track) { "*" } else { " " };
        println!(
            "{} {:>3}  {}  [{} | {} BPM]  id: {}",
            marker, m.score, m.track, m.track.key, m.track.bpm, m.track.id
        );
    }
    Ok(())
}
