//! Page layout analysis for drawing sheets.
//!
//! This module provides the geometric half of the pipeline:
//! - Fragment and line types shared by every extractor
//! - Fragment normalization and line reconstruction
//! - Title band and title block classification

pub mod fragment;
pub mod fragment_store;
pub mod region;

// Re-export main types
pub use fragment::{collapse_whitespace, Line, Page, TextFragment, TextItem};
pub use fragment_store::{FragmentStore, PageLayout};
pub use region::{RegionClassifier, RegionMembership, TitleBlockPass};
