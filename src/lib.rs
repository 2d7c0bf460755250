// Allow some clippy lints that are too pedantic for this project
#![allow(clippy::too_many_arguments)]
#![allow(clippy::enum_variant_names)]
// Allow unused for tests
#![cfg_attr(test, allow(dead_code))]

//! # Drawing Oxide
//!
//! Title-block and revision-history extraction for architectural and
//! engineering drawing sheets.
//!
//! Given the positioned text fragments of a drawing page, the pipeline
//! reconstructs the sheet's metadata despite inconsistent layout, wrapped
//! values and page furniture:
//!
//! - **Title**: label-anchored multi-line reconstruction, with a
//!   content-anchored fallback for sheets without a readable label
//! - **Drawing number**: structured `L##-...-#####` codes, title block first
//! - **Current revision**: `T*`, `N*` and `0N` codes from the title block
//! - **Revision history**: `CODE DATE REASON [CHECKER]` rows, including rows
//!   flattened onto one line
//! - **Latest revision**: cross-checked against the current revision
//! - **Table phase**: one of five project-delivery stages
//!
//! ## Architecture
//!
//! - **Provider seam**: PDFs are read elsewhere; a [`provider::LayoutProvider`]
//!   hands the pipeline materialized pages
//! - **Declarative rules**: every pattern lives in one table,
//!   [`extractors::patterns`], and every weight in [`config::ScoringConfig`]
//! - **Status, not panics**: each document yields an
//!   [`pipeline::ExtractionResult`] whose status explains any failure
//!
//! ## Quick Start
//!
//! ```no_run
//! use drawing_oxide::pipeline::DrawingPipeline;
//! use drawing_oxide::provider::JsonLayoutProvider;
//!
//! # fn main() -> drawing_oxide::Result<()> {
//! let provider = JsonLayoutProvider::open("layout_dumps/sheet.json")?;
//! let outcome = DrawingPipeline::new().extract(&provider);
//!
//! println!("{} {} {}", outcome.result.drawing_number, outcome.result.title, outcome.result.status);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

// Error handling
pub mod error;

// Configuration
pub mod config;

// Layout analysis
pub mod geometry;
pub mod layout;

// Field extraction
pub mod extractors;

// Per-document pipeline
pub mod pipeline;

// Page sources
pub mod provider;

// Corroboration and batch reporting
pub mod report;
pub mod validation;

// Re-exports
pub use config::ExtractionConfig;
pub use error::{Error, Result};
pub use extractors::{RevisionEntry, TablePhase};
pub use pipeline::{DocumentOutcome, DrawingPipeline, ExtractionResult, FailureReason, Status};
pub use provider::{JsonLayoutProvider, LayoutProvider, MemoryLayoutProvider};

// Version info
/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
