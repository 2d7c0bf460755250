//! Property-Based Tests
//!
//! Invariants that must hold for arbitrary inputs:
//! - Region classification depends on geometry alone
//! - Revision histories never repeat a `(code, date)` pair
//! - Resolution never substitutes a different code for the current one
//! - A `SUCCESS` record always carries every required field

use drawing_oxide::extractors::candidate::CandidateScorer;
use drawing_oxide::extractors::phase::TablePhase;
use drawing_oxide::extractors::resolver::{resolve, Resolution};
use drawing_oxide::extractors::revision::{RevisionEntry, RevisionParser};
use drawing_oxide::geometry::{PageSize, Rect};
use drawing_oxide::layout::region::TitleBlockPass;
use drawing_oxide::layout::{Line, RegionClassifier, TextFragment};
use drawing_oxide::pipeline::{assemble, ExtractedFields};
use proptest::prelude::*;
use std::collections::HashSet;

const CODES: &[&str] = &["T0", "T1", "T2", "T3", "N0", "N1", "01", "02", "07"];
const REASONS: &[&str] = &["ISSUED FOR TENDER", "ISSUED FOR CONSTRUCTION", "100% Design Development", ""];

fn history_line() -> impl Strategy<Value = String> {
    (0..CODES.len(), 1u32..29, 1u32..13, 0..REASONS.len(), prop::bool::ANY).prop_map(
        |(code, day, month, reason, checker)| {
            let checker = if checker { " AK" } else { "" };
            format!("{} {:02}/{:02}/2024 {}{}", CODES[code], day, month, REASONS[reason], checker)
        },
    )
}

fn entries() -> impl Strategy<Value = Vec<RevisionEntry>> {
    prop::collection::vec((0..CODES.len(), 0usize..50), 0..8).prop_map(|picks| {
        picks
            .into_iter()
            .map(|(code, order)| RevisionEntry::new(CODES[code], "01/01/2024", order))
            .collect()
    })
}

// ============================================================================
// Region Classification Properties
// ============================================================================

/// Property: classification is a pure function of geometry
#[test]
fn proptest_region_classification_is_stable() {
    proptest!(|(x in 0.0f32..1190.0, y in 0.0f32..842.0, w in 1.0f32..300.0, h in 1.0f32..40.0)| {
        let classifier = RegionClassifier::default();
        let page = PageSize::new(1190.0, 842.0);
        let bbox = Rect::from_points(x, y, x + w, y + h);

        prop_assert_eq!(classifier.classify(&bbox, &page), classifier.classify(&bbox, &page));
    });
}

/// Property: the wide title block contains the narrow one
#[test]
fn proptest_wide_block_contains_narrow() {
    proptest!(|(x in 0.0f32..1190.0, y in 0.0f32..842.0)| {
        let classifier = RegionClassifier::default();
        let page = PageSize::new(1190.0, 842.0);
        let bbox = Rect::from_points(x, y, x + 10.0, y + 10.0);

        if classifier.in_title_block(&bbox, &page, TitleBlockPass::Narrow) {
            prop_assert!(classifier.in_title_block(&bbox, &page, TitleBlockPass::Wide));
        }
    });
}

// ============================================================================
// Revision History Properties
// ============================================================================

/// Property: parsed histories never repeat a (code, date) pair
#[test]
fn proptest_no_duplicate_entries() {
    proptest!(|(lines in prop::collection::vec(history_line(), 0..12))| {
        let entries = RevisionParser::default().parse_entries(&lines);
        let mut seen = HashSet::new();
        for entry in &entries {
            prop_assert!(seen.insert((entry.code.clone(), entry.date.clone())));
        }
    });
}

/// Property: concatenating rows onto one line finds the same entries
#[test]
fn proptest_concatenated_rows_match_separate_rows() {
    proptest!(|(lines in prop::collection::vec(history_line(), 1..6))| {
        let parser = RevisionParser::default();
        let separate = parser.parse_entries(&lines);
        let joined = parser.parse_entries(&[lines.join(" ")]);

        let keys = |entries: &[RevisionEntry]| -> Vec<(String, String)> {
            entries.iter().map(|e| (e.code.clone(), e.date.clone())).collect()
        };
        prop_assert_eq!(keys(&separate), keys(&joined));
    });
}

/// Property: a resolved entry always carries the current revision code
#[test]
fn proptest_resolution_keeps_current_code() {
    proptest!(|(entries in entries(), current in 0..CODES.len())| {
        let current = CODES[current];
        match resolve(&entries, Some(current)) {
            Resolution::Latest(entry) => {
                prop_assert_eq!(entry.code.as_str(), current);
            },
            Resolution::NotInHistory { code } => {
                prop_assert_eq!(code.as_str(), current);
                prop_assert!(entries.iter().all(|e| e.code != current));
            },
            Resolution::NoEntries => {
                prop_assert!(entries.is_empty());
            },
        }
    });
}

/// Property: ranking without a current code always picks some entry
#[test]
fn proptest_ranking_picks_an_entry() {
    proptest!(|(entries in entries())| {
        let resolution = resolve(&entries, None);
        prop_assert_eq!(resolution.entry().is_some(), !entries.is_empty());
    });
}

// ============================================================================
// Title Scoring Properties
// ============================================================================

/// Property: re-scoring a reconstructed title as a synthetic line matches
/// the score of the same text as a fragment
#[test]
fn proptest_synthetic_title_rescoring() {
    proptest!(|(text in "[A-Z][a-z]{3,8}( [A-Z][a-z]{3,8}){0,4}", x in 0.0f32..900.0, y in 0.0f32..800.0, size in 6.0f32..16.0)| {
        let scorer = CandidateScorer::default();
        let page = PageSize::new(1190.0, 842.0);
        let fragment = TextFragment::new(text.clone(), x, y, x + 200.0, y + size, size);
        let line = Line::synthetic(0, text, fragment.bbox, size);

        prop_assert_eq!(scorer.title_score(&fragment, &page), scorer.title_score(&line, &page));
    });
}

// ============================================================================
// Status Properties
// ============================================================================

/// Property: SUCCESS implies every required field is present and the
/// current revision equals the latest
#[test]
fn proptest_success_implies_complete_record() {
    proptest!(|(
        title in prop::option::of("[A-Za-z ]{0,20}"),
        number in prop::option::of("[A-Z0-9-]{0,12}"),
        current in prop::option::of(0..CODES.len()),
        entries in entries()
    )| {
        let current = current.map(|i| CODES[i].to_string());
        let resolution = resolve(&entries, current.as_deref());
        let fields = ExtractedFields {
            title,
            drawing_number: number,
            current_revision: current,
            table_phase: TablePhase::default(),
        };
        let result = assemble(fields, &resolution);

        if result.is_success() {
            prop_assert!(!result.title.is_empty());
            prop_assert!(!result.drawing_number.is_empty());
            prop_assert!(!result.current_revision.is_empty());
            prop_assert!(!result.latest_revision.is_empty());
            prop_assert_eq!(&result.current_revision, &result.latest_revision);
        }
    });
}
