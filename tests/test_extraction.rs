//! End-to-end extraction tests over synthetic drawing sheets.
//!
//! Sheets are 1190x842 (A3 landscape) with the title block in the bottom
//! right corner, the way most project sheets are laid out.

use drawing_oxide::extractors::phase::{classify, TablePhase};
use drawing_oxide::extractors::resolver::{resolve, Resolution};
use drawing_oxide::extractors::revision::RevisionParser;
use drawing_oxide::extractors::TitleSource;
use drawing_oxide::geometry::PageSize;
use drawing_oxide::layout::{Page, TextFragment};
use drawing_oxide::pipeline::{DrawingNumberTier, DrawingPipeline, FailureReason, Status};
use drawing_oxide::MemoryLayoutProvider;

// ============================================================================
// Helper Functions
// ============================================================================

const SHEET: PageSize = PageSize {
    width: 1190.0,
    height: 842.0,
};

fn frag(text: &str, x: f32, y: f32, size: f32) -> TextFragment {
    TextFragment::new(text, x, y, x + text.chars().count() as f32 * size * 0.5, y + size, size)
}

/// Title block with a two-line title, the revision field under a "Rev"
/// label, and a two-row history table above it.
fn mockup_sheet(history: Vec<TextFragment>, current_revision: &str, phase: &str) -> Page {
    let mut fragments = vec![
        frag("MOCKUP GENERAL ARRANGEMENT", 300.0, 60.0, 9.0),
        frag("Rev Date Reason for Issue Chk", 750.0, 560.0, 8.0),
        frag("Drawing Title", 750.0, 640.0, 8.0),
        frag("Mockup External Wall Systems", 750.0, 655.0, 10.0),
        frag("Typical Façade Section Details", 750.0, 670.0, 10.0),
        frag("Drawing Number", 750.0, 700.0, 8.0),
        frag("Rev", 1100.0, 700.0, 8.0),
        frag("L01-H01D01-FOS-00-XX-MUP-AR-80050", 750.0, 715.0, 10.0),
        frag(current_revision, 1100.0, 715.0, 10.0),
        frag(phase, 750.0, 780.0, 9.0),
    ];
    fragments.extend(history);
    Page::new(SHEET, fragments)
}

fn separate_history() -> Vec<TextFragment> {
    vec![
        frag("T1 07/11/2024 ISSUED FOR TENDER NQ", 750.0, 575.0, 8.0),
        frag("T0 26/10/2023 ISSUED FOR TENDER AK", 750.0, 590.0, 8.0),
    ]
}

fn concatenated_history() -> Vec<TextFragment> {
    vec![frag(
        "T0 26/10/2023 ISSUED FOR TENDER AK T1 07/11/2024 ISSUED FOR TENDER NQ",
        750.0,
        575.0,
        8.0,
    )]
}

// ============================================================================
// Full Sheet Extraction
// ============================================================================

#[test]
fn test_mockup_sheet_fields() {
    let page = mockup_sheet(separate_history(), "T1", "Construction Procurement");
    let outcome = DrawingPipeline::new().process_page(&page);
    let result = &outcome.result;

    assert_eq!(result.drawing_number, "L01-H01D01-FOS-00-XX-MUP-AR-80050");
    assert_eq!(result.title, "Mockup External Wall Systems Typical Façade Section Details");
    assert_eq!(result.current_revision, "T1");
    assert_eq!(result.latest_revision, "T1");
    assert_eq!(result.latest_date, "07/11/2024");
    assert_eq!(result.latest_reason, "ISSUED FOR TENDER");
    assert_eq!(result.status, Status::Success);

    assert_eq!(outcome.diagnostics.title_source, TitleSource::LabelAnchored);
    assert_eq!(outcome.diagnostics.drawing_number_tier, DrawingNumberTier::NarrowTitleBlock);
}

#[test]
fn test_history_layouts_agree() {
    let pipeline = DrawingPipeline::new();
    let separate = pipeline.process_page(&mockup_sheet(separate_history(), "T1", "Construction Procurement"));
    let concatenated = pipeline.process_page(&mockup_sheet(concatenated_history(), "T1", "Construction Procurement"));

    assert_eq!(separate.diagnostics.revision_entries.len(), 2);
    assert_eq!(concatenated.diagnostics.revision_entries.len(), 2);
    assert_eq!(concatenated.result.latest_revision, "T1");
    assert_eq!(concatenated.result.latest_date, "07/11/2024");
    assert!(concatenated.result.is_success());
}

#[test]
fn test_current_revision_missing_from_history() {
    let page = mockup_sheet(separate_history(), "T2", "Construction Procurement");
    let result = DrawingPipeline::new().process_page(&page).result;

    assert_eq!(result.current_revision, "T2");
    assert_eq!(result.status, Status::Failed(FailureReason::RevisionNotInHistory));
    assert_eq!(result.status.to_string(), "FAILED - revision not found in history");
}

#[test]
fn test_provider_extraction_checks_source_name() {
    let page = mockup_sheet(separate_history(), "T1", "Construction Procurement");
    let provider = MemoryLayoutProvider::new("L01-H01D01-FOS-00-XX-MUP-AR-80050[T1].pdf", vec![page]);
    let outcome = DrawingPipeline::new().extract(&provider);

    assert_eq!(outcome.diagnostics.source, "L01-H01D01-FOS-00-XX-MUP-AR-80050[T1].pdf");
    assert_eq!(outcome.diagnostics.drawing_number_matches_source_name, Some(true));
    assert!(outcome.result.is_success());
}

#[test]
fn test_blank_sheet_fails_on_title() {
    let page = Page::new(SHEET, vec![frag("1:100", 1000.0, 800.0, 8.0)]);
    let result = DrawingPipeline::new().process_page(&page).result;

    assert_eq!(result.status, Status::Failed(FailureReason::MissingTitle));
    assert!(result.title.is_empty());
    assert!(result.drawing_number.is_empty());
}

// ============================================================================
// Revision History and Resolution
// ============================================================================

#[test]
fn test_resolution_without_current_revision() {
    let parser = RevisionParser::default();
    let entries = parser.parse_entries(&["T0 26/10/2023 ISSUED FOR TENDER AK", "T1 07/11/2024 ISSUED FOR TENDER NQ"]);

    let latest = resolve(&entries, None).entry().map(|e| e.code.clone());
    assert_eq!(latest.as_deref(), Some("T1"));
}

#[test]
fn test_resolution_with_current_revision() {
    let parser = RevisionParser::default();
    let entries = parser.parse_entries(&["T0 26/10/2023 ISSUED FOR TENDER AK T1 07/11/2024 ISSUED FOR TENDER NQ"]);

    let latest = resolve(&entries, Some("T1")).entry().cloned();
    assert_eq!(latest.map(|e| (e.code, e.date)), Some(("T1".to_string(), "07/11/2024".to_string())));

    assert_eq!(
        resolve(&entries, Some("T2")),
        Resolution::NotInHistory {
            code: "T2".to_string()
        }
    );
}

#[test]
fn test_tender_issue_outranks_construction() {
    let parser = RevisionParser::default();
    let entries = parser.parse_entries(&[
        "T0 26/10/2023 ISSUED FOR TENDER AK",
        "N0 31/07/25 ISSUED FOR CONSTRUCTION",
        "T3 02/02/2025 ISSUED FOR TENDER NQ",
    ]);

    assert_eq!(resolve(&entries, None).entry().map(|e| e.code.as_str()), Some("T3"));
}

// ============================================================================
// Table Phase
// ============================================================================

#[test]
fn test_phase_ignores_case() {
    for text in ["construction procurement", "CONSTRUCTION PROCUREMENT", "Construction  Procurement"] {
        assert_eq!(classify(&[text]), TablePhase::ConstructionProcurement, "{}", text);
    }
}

#[test]
fn test_phase_from_sheet() {
    let page = mockup_sheet(separate_history(), "T1", "SCHEMATIC DESIGN");
    let result = DrawingPipeline::new().process_page(&page).result;
    assert_eq!(result.table_phase, TablePhase::SchematicDesign);
}

#[test]
fn test_phase_defaults_to_procurement() {
    let page = mockup_sheet(separate_history(), "T1", "Issued for Information");
    let result = DrawingPipeline::new().process_page(&page).result;
    assert_eq!(result.table_phase, TablePhase::ConstructionProcurement);
}

// ============================================================================
// Result Serialization
// ============================================================================

#[test]
fn test_result_json_fields() {
    let page = mockup_sheet(separate_history(), "T1", "Construction Procurement");
    let result = DrawingPipeline::new().process_page(&page).result;
    let json = serde_json::to_value(&result).unwrap();

    assert_eq!(json["drawingNumber"], "L01-H01D01-FOS-00-XX-MUP-AR-80050");
    assert_eq!(json["tablePhase"], "Construction Procurement");
    assert_eq!(json["status"], "SUCCESS");
}
