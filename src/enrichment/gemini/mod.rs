//! Google Gemini integration
//!
//! One client backs all three collaborators: energy rating, next-track
//! narration and live audio identification.
//! API docs: https://ai.google.dev/api/generate-content

mod adapter;
mod client;
pub mod dto;

pub use client::{DEFAULT_BASE_URL, DEFAULT_MODEL, GeminiClient};
