//! Field extraction from normalized drawing pages.
//!
//! Provides the semantic half of the pipeline: candidate scoring, title
//! reconstruction, revision history parsing and resolution, and phase
//! classification. All extractors share the pattern table in [`patterns`].

pub mod candidate;
pub mod patterns;
pub mod phase;
pub mod resolver;
pub mod revision;
pub mod title;

pub use candidate::{Candidate, CandidateOrigin, CandidateScorer, Exclusion, FieldTarget};
pub use phase::TablePhase;
pub use resolver::{resolve, Resolution, RevisionFamily};
pub use revision::{RevisionEntry, RevisionParser};
pub use title::{ReconstructedTitle, TitleReconstructor, TitleSource};
