//! AI-assisted commands: energy ratings, narration and live identification.

use std::path::Path;
use tokio::runtime::Runtime;

use crate::config::Config;
use crate::enrichment::{EnrichmentService, LiveMatch};
use crate::recommend;

use super::{LibraryArgs, energy_label, load_library, print_recommendations, read_clip, resolve_track};

fn service(config: &Config, api_key: Option<String>) -> EnrichmentService {
    let service = EnrichmentService::new(config.enrichment_config(api_key));
    if !service.is_online() {
        eprintln!("Note: no Gemini API key (use --api-key, GEMINI_API_KEY or [credentials] in the config).");
    }
    service
}

/// Rate one track's energy
pub fn cmd_energy(
    rt: &Runtime,
    config: &Config,
    args: &LibraryArgs,
    track: &str,
    api_key: Option<String>,
) -> anyhow::Result<()> {
    let mut library = load_library(config, args)?;
    let id = resolve_track(&library, track)?.id.clone();
    let before = library.get(&id).map(energy_label).unwrap_or_default();

    let service = service(config, api_key);
    let energy = rt.block_on(service.enrich_energy(&mut library, &id));

    if let (Some(energy), Some(track)) = (energy, library.get(&id)) {
        println!("{}", track);
        println!("  Energy: {} -> {}", before, energy);
    }
    Ok(())
}

/// Narrated pick among the best-ranked candidates
pub fn cmd_suggest(
    rt: &Runtime,
    config: &Config,
    args: &LibraryArgs,
    track: &str,
    api_key: Option<String>,
) -> anyhow::Result<()> {
    let library = load_library(config, args)?;
    let current = resolve_track(&library, track)?;
    let ranked = recommend::rank(current, library.tracks());

    if ranked.is_empty() {
        println!("No compatible tracks found for {}, nothing to suggest.", current);
        return Ok(());
    }

    let service = service(config, api_key);
    let suggestion = rt.block_on(service.suggest_next(current, &ranked));

    println!("Playing: {}", current);
    println!();
    println!("{}", suggestion);
    Ok(())
}

/// Identify a recorded clip, then rank the library against it
pub fn cmd_identify(
    rt: &Runtime,
    config: &Config,
    clip_path: &Path,
    args: &LibraryArgs,
    api_key: Option<String>,
    limit: Option<usize>,
) -> anyhow::Result<()> {
    let clip = read_clip(clip_path)?;

    // A library is optional here; without one we only report the identification
    let library = if args.files.is_empty() && config.library.paths.is_empty() {
        None
    } else {
        Some(load_library(config, args)?)
    };
    let tracks = library.as_ref().map(|l| l.tracks()).unwrap_or_default();

    let service = service(config, api_key);
    println!("Listening to: {}", clip_path.display());
    println!();

    let Some(found) = rt.block_on(service.identify(&clip, tracks))? else {
        println!("✗ Could not recognise the track in this clip.");
        return Ok(());
    };

    match &found {
        LiveMatch::InLibrary(track) => println!("✓ {} (in your library, id {})", track, track.id),
        LiveMatch::Detected(track) => println!(
            "✓ {} (not in your library; estimated {} | {} BPM | energy {})",
            track,
            track.key,
            track.bpm,
            energy_label(track)
        ),
    }

    if tracks.is_empty() {
        return Ok(());
    }

    println!();
    let recs = recommend::rank(found.track(), tracks);
    print_recommendations(found.track(), &recs, limit.unwrap_or(config.recommend.limit));
    Ok(())
}
