//! Next-track ranking command.

use crate::config::Config;
use crate::recommend::{self, RecommendFilter};

use super::{LibraryArgs, load_library, print_recommendations, resolve_track};

/// Rank the library against the track that is playing
#[allow(clippy::too_many_arguments)]
pub fn cmd_recommend(
    config: &Config,
    args: &LibraryArgs,
    track: &str,
    genre: Option<&str>,
    min_energy: Option<u8>,
    fire: bool,
    limit: Option<usize>,
    json: bool,
) -> anyhow::Result<()> {
    let library = load_library(config, args)?;
    let reference = resolve_track(&library, track)?;

    let mut filter = if fire {
        RecommendFilter::fire_mode(config.recommend.fire_min_energy)
    } else {
        RecommendFilter::none()
    };
    if let Some(genre) = genre {
        filter = filter.with_genre(genre);
    }
    // An explicit floor wins over fire mode
    if let Some(min) = min_energy {
        filter = filter.with_min_energy(min);
    }

    let recs = recommend::rank_filtered(reference, library.tracks(), &filter);
    let limit = limit.unwrap_or(config.recommend.limit);

    if json {
        println!("{}", serde_json::to_string_pretty(super::limited(&recs, limit))?);
        return Ok(());
    }

    print_recommendations(reference, &recs, limit);
    Ok(())
}
