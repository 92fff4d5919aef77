//! Harmonic Mixer - a harmonic-mixing assistant for DJs.
//!
//! Reads library exports from DJ software, ranks which track to play next
//! using the Camelot wheel, tempo and energy, and optionally asks an AI
//! collaborator for energy ratings, narration and live identification.

pub mod cli;
pub mod config;
pub mod enrichment;
pub mod error;
pub mod harmonic;
pub mod library;
pub mod model;
pub mod recommend;
pub mod requests;
#[cfg(test)]
pub mod test_utils;

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Log filter used when `RUST_LOG` is unset. Events carry their own
/// targets (`library::parse`, `enrichment`, ...), so each root is listed.
const DEFAULT_LOG_FILTER: &str =
    "harmonic_mixer=info,config=info,library=info,harmonic=info,recommend=info,enrichment=info";

fn main() -> anyhow::Result<()> {
    let args = cli::Cli::parse();

    // Initialize logging (stderr, so command output stays pipeable)
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .with(filter)
        .init();

    cli::run_command(&args)
}
