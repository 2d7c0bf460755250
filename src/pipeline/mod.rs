//! Per-document extraction pipeline.
//!
//! ```text
//! LayoutProvider
//!     ↓
//! [FragmentStore] (fragments → sorted fragments + lines)
//!     ↓
//! PageLayout (single intermediate representation)
//!     ↓
//! [TitleReconstructor] [CandidateScorer] [RevisionParser] [phase::classify]
//!     ↓
//! [resolve] (latest history entry)
//!     ↓
//! [assemble] (ExtractionResult + status)
//! ```
//!
//! Every document is processed independently and the pipeline holds no
//! mutable state, so one pipeline can serve a whole batch, across threads if
//! the caller wants.

pub mod assembler;
pub mod result;

pub use assembler::{assemble, infer_reason, ExtractedFields};
pub use result::{ExtractionResult, FailureReason, Status};

use crate::config::ExtractionConfig;
use crate::error::{Error, Result};
use crate::extractors::candidate::{CandidateOrigin, CandidateScorer, FieldTarget};
use crate::extractors::phase;
use crate::extractors::resolver::resolve;
use crate::extractors::revision::{RevisionEntry, RevisionParser};
use crate::extractors::title::{TitleReconstructor, TitleSource};
use crate::layout::region::TitleBlockPass;
use crate::layout::{FragmentStore, Page, PageLayout, RegionClassifier};
use crate::provider::LayoutProvider;
use crate::validation::drawing_number_in_source_name;
use serde::Serialize;

/// Where the selected drawing number was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DrawingNumberTier {
    /// Narrow title block
    NarrowTitleBlock,
    /// Widened title block
    WideTitleBlock,
    /// Outside the title block
    PageWide,
    /// No drawing number found
    Absent,
}

impl From<CandidateOrigin> for DrawingNumberTier {
    fn from(origin: CandidateOrigin) -> Self {
        match origin {
            CandidateOrigin::TitleBlock(TitleBlockPass::Narrow) => DrawingNumberTier::NarrowTitleBlock,
            CandidateOrigin::TitleBlock(TitleBlockPass::Wide) => DrawingNumberTier::WideTitleBlock,
            CandidateOrigin::TitleBand | CandidateOrigin::Page => DrawingNumberTier::PageWide,
        }
    }
}

/// How a document's fields were found.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagnostics {
    /// Document name from the provider
    pub source: String,
    /// Page the fields were read from (0-based)
    pub page_index: usize,
    /// Reconstructed lines on that page
    pub line_count: usize,
    /// Title reconstruction mode
    pub title_source: TitleSource,
    /// Drawing number region
    pub drawing_number_tier: DrawingNumberTier,
    /// Every parsed revision history entry
    pub revision_entries: Vec<RevisionEntry>,
    /// Whether the drawing number appears in the document name
    pub drawing_number_matches_source_name: Option<bool>,
}

impl Diagnostics {
    /// Diagnostics for a document that could not be read.
    pub fn unread(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            page_index: 0,
            line_count: 0,
            title_source: TitleSource::Absent,
            drawing_number_tier: DrawingNumberTier::Absent,
            revision_entries: Vec::new(),
            drawing_number_matches_source_name: None,
        }
    }
}

/// Result record plus diagnostics for one document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DocumentOutcome {
    /// The extraction record
    pub result: ExtractionResult,
    /// How it was produced
    pub diagnostics: Diagnostics,
}

/// The drawing extraction pipeline.
///
/// # Examples
///
/// ```
/// use drawing_oxide::geometry::PageSize;
/// use drawing_oxide::layout::{Page, TextFragment};
/// use drawing_oxide::pipeline::DrawingPipeline;
///
/// let page = Page::new(
///     PageSize::new(1190.0, 842.0),
///     vec![TextFragment::new("L01-H01D01-FOS-00-XX-MUP-AR-80050", 900.0, 760.0, 1080.0, 770.0, 10.0)],
/// );
/// let outcome = DrawingPipeline::new().process_page(&page);
/// assert_eq!(outcome.result.drawing_number, "L01-H01D01-FOS-00-XX-MUP-AR-80050");
/// assert!(!outcome.result.is_success());
/// ```
#[derive(Debug, Clone)]
pub struct DrawingPipeline {
    config: ExtractionConfig,
    store: FragmentStore,
    scorer: CandidateScorer,
    titles: TitleReconstructor,
    revisions: RevisionParser,
}

impl DrawingPipeline {
    /// Create a pipeline with default configuration.
    pub fn new() -> Self {
        Self::with_config(ExtractionConfig::default())
    }

    /// Create a pipeline with custom configuration.
    pub fn with_config(config: ExtractionConfig) -> Self {
        let regions = RegionClassifier::new(config.regions.clone());
        let scorer = CandidateScorer::new(config.scoring.clone(), regions);
        Self {
            store: FragmentStore::new(config.fragments.clone()),
            titles: TitleReconstructor::new(config.title.clone(), scorer.clone()),
            revisions: RevisionParser::new(config.revisions.clone()),
            scorer,
            config,
        }
    }

    /// Get the current configuration.
    pub fn config(&self) -> &ExtractionConfig {
        &self.config
    }

    /// Extract one document, surfacing provider failures as errors.
    ///
    /// Page 1 is used unless it carries fewer than `min_page_text_chars`
    /// characters and page 2 carries more. A page 2 that cannot be read
    /// leaves page 1 in use.
    pub fn try_extract(&self, provider: &dyn LayoutProvider) -> Result<DocumentOutcome> {
        let count = provider.page_count();
        if count == 0 {
            return Err(Error::EmptyDocument);
        }

        let mut page_index = 0;
        let mut layout = self.store.load_page(&provider.page(0)?);
        let chars = layout.text_char_count();
        if chars < self.config.min_page_text_chars && count > 1 {
            match provider.page(1) {
                Ok(page) => {
                    let second = self.store.load_page(&page);
                    if second.text_char_count() > chars {
                        log::info!(
                            "{}: page 1 has only {} characters, using page 2",
                            provider.name(),
                            chars
                        );
                        page_index = 1;
                        layout = second;
                    }
                },
                Err(e) => log::warn!("{}: page 2 unreadable, keeping page 1: {}", provider.name(), e),
            }
        }

        let mut outcome = self.process_layout(&layout);
        outcome.diagnostics.source = provider.name().to_string();
        outcome.diagnostics.page_index = page_index;
        outcome.diagnostics.drawing_number_matches_source_name = (!outcome.result.drawing_number.is_empty())
            .then(|| drawing_number_in_source_name(&outcome.result.drawing_number, provider.name()));

        if outcome.diagnostics.drawing_number_matches_source_name == Some(false) {
            log::warn!(
                "{}: drawing number {} does not appear in the document name",
                provider.name(),
                outcome.result.drawing_number
            );
        }
        Ok(outcome)
    }

    /// Extract one document; never fails.
    ///
    /// Provider errors become `FAILED - malformed document` results.
    pub fn extract(&self, provider: &dyn LayoutProvider) -> DocumentOutcome {
        match self.try_extract(provider) {
            Ok(outcome) => outcome,
            Err(e) => Self::failed_outcome(provider.name(), &e),
        }
    }

    /// Outcome for a document that could not be read.
    pub fn failed_outcome(source: &str, error: &Error) -> DocumentOutcome {
        log::warn!("{}: {}", source, error);
        let message = match error {
            Error::MalformedDocument(msg) => msg.clone(),
            other => other.to_string(),
        };
        DocumentOutcome {
            result: ExtractionResult::failed(FailureReason::MalformedDocument(message)),
            diagnostics: Diagnostics::unread(source),
        }
    }

    /// Extract the fields of a single materialized page.
    pub fn process_page(&self, page: &Page) -> DocumentOutcome {
        self.process_layout(&self.store.load_page(page))
    }

    /// Extract the fields of a normalized page.
    pub fn process_layout(&self, layout: &PageLayout) -> DocumentOutcome {
        let line_texts = layout.line_texts();

        let title = self.titles.reconstruct(layout);
        let title_source = title.as_ref().map_or(TitleSource::Absent, |t| t.source);

        let drawing_number = self
            .scorer
            .score_candidates(layout, FieldTarget::DrawingNumber)
            .into_iter()
            .next();
        let drawing_number_tier = drawing_number
            .as_ref()
            .map_or(DrawingNumberTier::Absent, |c| c.origin.into());

        let current_revision = self
            .scorer
            .score_candidates(layout, FieldTarget::RevisionCode)
            .into_iter()
            .next()
            .map(|c| c.text);

        let entries = self.revisions.parse_entries(&line_texts);
        let resolution = resolve(&entries, current_revision.as_deref());

        log::debug!(
            "Fields: title={:?} number={:?} revision={:?} entries={}",
            title.as_ref().map(|t| &t.text),
            drawing_number.as_ref().map(|c| &c.text),
            current_revision,
            entries.len()
        );

        let fields = ExtractedFields {
            title: title.map(|t| t.text),
            drawing_number: drawing_number.map(|c| c.text),
            current_revision,
            table_phase: phase::classify(&line_texts),
        };
        let result = assemble(fields, &resolution);

        DocumentOutcome {
            result,
            diagnostics: Diagnostics {
                source: String::new(),
                page_index: 0,
                line_count: layout.lines.len(),
                title_source,
                drawing_number_tier,
                revision_entries: entries,
                drawing_number_matches_source_name: None,
            },
        }
    }
}

impl Default for DrawingPipeline {
    fn default() -> Self {
        Self::new()
    }
}
