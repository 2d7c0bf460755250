//! Result assembly and status computation.

use crate::extractors::phase::TablePhase;
use crate::extractors::resolver::Resolution;
use crate::pipeline::result::{ExtractionResult, FailureReason, Status};

/// Field values picked by the extractors for one page.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtractedFields {
    /// Reconstructed title
    pub title: Option<String>,
    /// Best drawing number candidate
    pub drawing_number: Option<String>,
    /// Best current revision candidate
    pub current_revision: Option<String>,
    /// Classified project phase
    pub table_phase: TablePhase,
}

/// Reason implied by a revision code when the history row gives none.
///
/// # Examples
///
/// ```
/// use drawing_oxide::pipeline::assembler::infer_reason;
///
/// assert_eq!(infer_reason("T1", ""), "Issued for Tender");
/// assert_eq!(infer_reason("N0", ""), "Issued for Construction");
/// assert_eq!(infer_reason("T1", "UPDATED LEVELS"), "UPDATED LEVELS");
/// assert_eq!(infer_reason("07", ""), "");
/// ```
pub fn infer_reason(code: &str, reason: &str) -> String {
    if !reason.trim().is_empty() {
        return reason.to_string();
    }
    match code.chars().next() {
        Some('T') => "Issued for Tender".to_string(),
        Some('N') => "Issued for Construction".to_string(),
        _ => String::new(),
    }
}

/// Combine extracted fields and the resolved history entry into a record.
///
/// When the current revision is missing from the history, every
/// revision-dependent field stays empty.
pub fn assemble(fields: ExtractedFields, resolution: &Resolution<'_>) -> ExtractionResult {
    let (latest_revision, latest_date, latest_reason) = match resolution.entry() {
        Some(entry) => (
            entry.code.clone(),
            entry.date.clone(),
            infer_reason(&entry.code, &entry.reason),
        ),
        None => (String::new(), String::new(), String::new()),
    };

    let mut result = ExtractionResult {
        title: fields.title.unwrap_or_default(),
        drawing_number: fields.drawing_number.unwrap_or_default(),
        current_revision: fields.current_revision.unwrap_or_default(),
        latest_revision,
        latest_date,
        latest_reason,
        table_phase: fields.table_phase,
        status: Status::Success,
    };
    result.status = compute_status(&result, resolution);
    result
}

/// First missing or mismatched field, in record order.
fn compute_status(result: &ExtractionResult, resolution: &Resolution<'_>) -> Status {
    let failure = if result.title.is_empty() {
        Some(FailureReason::MissingTitle)
    } else if result.drawing_number.is_empty() {
        Some(FailureReason::MissingDrawingNumber)
    } else if result.current_revision.is_empty() {
        Some(FailureReason::MissingCurrentRevision)
    } else if matches!(resolution, Resolution::NotInHistory { .. }) {
        Some(FailureReason::RevisionNotInHistory)
    } else if result.latest_revision.is_empty() {
        Some(FailureReason::MissingLatestRevision)
    } else if result.current_revision != result.latest_revision {
        Some(FailureReason::RevisionNotInHistory)
    } else {
        None
    };

    match failure {
        Some(reason) => {
            log::info!("Extraction failed: {}", reason);
            Status::Failed(reason)
        },
        None => Status::Success,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractors::revision::RevisionEntry;

    fn fields(current: &str) -> ExtractedFields {
        ExtractedFields {
            title: Some("Pool Enlargement Plan".to_string()),
            drawing_number: Some("L02-R02DXX-RSG-00-ZZ-SKT-LS-12801".to_string()),
            current_revision: Some(current.to_string()),
            table_phase: TablePhase::ConstructionProcurement,
        }
    }

    #[test]
    fn test_success_requires_matching_revision() {
        let entry = RevisionEntry::new("T1", "07/11/2024", 3).with_reason("ISSUED FOR TENDER");
        let result = assemble(fields("T1"), &Resolution::Latest(&entry));
        assert_eq!(result.status, Status::Success);
        assert_eq!(result.latest_revision, "T1");
        assert_eq!(result.latest_date, "07/11/2024");
        assert_eq!(result.latest_reason, "ISSUED FOR TENDER");
    }

    #[test]
    fn test_not_in_history_leaves_revision_fields_empty() {
        let resolution = Resolution::NotInHistory { code: "T2".to_string() };
        let result = assemble(fields("T2"), &resolution);
        assert_eq!(result.status, Status::Failed(FailureReason::RevisionNotInHistory));
        assert_eq!(result.current_revision, "T2");
        assert!(result.latest_revision.is_empty());
        assert!(result.latest_date.is_empty());
        assert!(result.latest_reason.is_empty());
    }

    #[test]
    fn test_reason_inferred_only_when_empty() {
        let entry = RevisionEntry::new("N0", "31/07/25", 0);
        let result = assemble(fields("N0"), &Resolution::Latest(&entry));
        assert_eq!(result.latest_reason, "Issued for Construction");
    }

    #[test]
    fn test_status_priority() {
        let result = assemble(ExtractedFields::default(), &Resolution::NoEntries);
        assert_eq!(result.status, Status::Failed(FailureReason::MissingTitle));

        let mut partial = fields("T1");
        partial.drawing_number = None;
        let result = assemble(partial, &Resolution::NoEntries);
        assert_eq!(result.status, Status::Failed(FailureReason::MissingDrawingNumber));

        let mut partial = fields("T1");
        partial.current_revision = None;
        let entry = RevisionEntry::new("T1", "07/11/2024", 0);
        let result = assemble(partial, &Resolution::Latest(&entry));
        assert_eq!(result.status, Status::Failed(FailureReason::MissingCurrentRevision));
        assert_eq!(result.latest_revision, "T1");

        let result = assemble(fields("T1"), &Resolution::NoEntries);
        assert_eq!(result.status, Status::Failed(FailureReason::MissingLatestRevision));
    }
}
