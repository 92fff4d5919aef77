//! AI enrichment - energy ratings, next-track narration and live identification.
//!
//! # Architecture
//!
//! - **Domain models** (`domain.rs`) - our types, independent of any provider
//! - **Traits** (`traits.rs`) - the three collaborator seams, plus test mocks
//! - **Gemini** (`gemini/`) - DTOs, adapter and HTTP client for Google Gemini
//! - **Service** (`service.rs`) - fallbacks, clamping and library resolution
//!
//! The mixing core never depends on this module; it only consumes the
//! tracks and energies it produces.
//!
//! # Usage
//!
//! ```ignore
//! use enrichment::{EnrichmentConfig, EnrichmentService};
//!
//! let service = EnrichmentService::new(EnrichmentConfig {
//!     api_key: Some("your-api-key".to_string()),
//!     ..Default::default()
//! });
//! let energy = service.energy_for(&track).await;
//! ```

pub mod domain;
pub mod gemini;
pub mod service;
pub mod traits;

pub use domain::{AudioClip, EnrichmentError, IdentifiedTrack, NEUTRAL_ENERGY};
pub use gemini::GeminiClient;
pub use service::{EnrichmentConfig, EnrichmentService, LiveMatch};
