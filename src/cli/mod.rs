//! Command-line interface for harmonic-mixer.
//!
//! Loads DJ library exports, ranks what to play next and calls the AI
//! collaborators for energy ratings, narration and live identification.

mod commands;

pub use commands::{Cli, Commands, run_command};
