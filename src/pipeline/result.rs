//! The per-document extraction record.

use crate::extractors::phase::TablePhase;
use serde::{Serialize, Serializer};
use std::fmt;

/// Why a document did not extract cleanly.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FailureReason {
    /// No title was found
    MissingTitle,
    /// No drawing number was found
    MissingDrawingNumber,
    /// No current revision code in the title block
    MissingCurrentRevision,
    /// No revision history entry could be resolved
    MissingLatestRevision,
    /// The current revision code has no entry in the history
    RevisionNotInHistory,
    /// The layout provider could not yield a usable page
    MalformedDocument(String),
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureReason::MissingTitle => write!(f, "missing title"),
            FailureReason::MissingDrawingNumber => write!(f, "missing drawing number"),
            FailureReason::MissingCurrentRevision => write!(f, "missing current revision"),
            FailureReason::MissingLatestRevision => write!(f, "missing latest revision"),
            FailureReason::RevisionNotInHistory => write!(f, "revision not found in history"),
            FailureReason::MalformedDocument(msg) => write!(f, "malformed document: {}", msg),
        }
    }
}

impl FailureReason {
    /// Grouping key for batch reports; malformed documents share one key.
    pub fn kind(&self) -> &'static str {
        match self {
            FailureReason::MissingTitle => "missing title",
            FailureReason::MissingDrawingNumber => "missing drawing number",
            FailureReason::MissingCurrentRevision => "missing current revision",
            FailureReason::MissingLatestRevision => "missing latest revision",
            FailureReason::RevisionNotInHistory => "revision not found in history",
            FailureReason::MalformedDocument(_) => "malformed document",
        }
    }
}

/// Validity of an extraction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Status {
    /// Every required field is present and consistent
    Success,
    /// The first missing or mismatched field
    Failed(FailureReason),
}

impl Status {
    /// Whether the status is `Success`.
    pub fn is_success(&self) -> bool {
        matches!(self, Status::Success)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::Success => write!(f, "SUCCESS"),
            Status::Failed(reason) => write!(f, "FAILED - {}", reason),
        }
    }
}

impl Serialize for Status {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Structured metadata of one drawing.
///
/// Absent fields are empty strings. Revision codes are plain strings, so
/// `07` keeps its leading zero.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractionResult {
    /// Drawing title
    pub title: String,
    /// Structured drawing number
    pub drawing_number: String,
    /// Revision code from the title block
    pub current_revision: String,
    /// Code of the resolved latest history entry
    pub latest_revision: String,
    /// Date of the resolved latest history entry
    pub latest_date: String,
    /// Reason for issue of the resolved latest history entry
    pub latest_reason: String,
    /// Project phase
    pub table_phase: TablePhase,
    /// Validity status
    pub status: Status,
}

impl ExtractionResult {
    /// A result with every field empty and the given failure.
    pub fn failed(reason: FailureReason) -> Self {
        Self {
            title: String::new(),
            drawing_number: String::new(),
            current_revision: String::new(),
            latest_revision: String::new(),
            latest_date: String::new(),
            latest_reason: String::new(),
            table_phase: TablePhase::default(),
            status: Status::Failed(reason),
        }
    }

    /// Whether the extraction succeeded.
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Text fields by their serialized names, in record order.
    pub fn text_fields(&self) -> [(&'static str, &str); 6] {
        [
            ("title", &self.title),
            ("drawingNumber", &self.drawing_number),
            ("currentRevision", &self.current_revision),
            ("latestRevision", &self.latest_revision),
            ("latestDate", &self.latest_date),
            ("latestReason", &self.latest_reason),
        ]
    }
}
