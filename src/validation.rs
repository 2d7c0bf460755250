//! Post-hoc corroboration of extracted values.
//!
//! Two independent checks are available: whether the extracted drawing
//! number appears in the document's file name, and whether extracted values
//! agree with a reference record of known-correct values. Both only report.
//! Neither ever fills in or replaces an extracted field.

use crate::error::Result;
use crate::pipeline::result::ExtractionResult;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// Whether `number` appears in the document name, ignoring case.
///
/// # Examples
///
/// ```
/// use drawing_oxide::validation::drawing_number_in_source_name;
///
/// let name = "L01-H01D01-FOS-00-XX-MUP-AR-80050[T0].pdf";
/// assert!(drawing_number_in_source_name("L01-H01D01-FOS-00-XX-MUP-AR-80050", name));
/// assert!(!drawing_number_in_source_name("L01-H01D01-FOS-00-XX-MUP-AR-80051", name));
/// ```
pub fn drawing_number_in_source_name(number: &str, name: &str) -> bool {
    let number = number.trim();
    !number.is_empty() && name.to_uppercase().contains(&number.to_uppercase())
}

/// Known-correct values for one drawing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReferenceRecord {
    /// Drawing number
    #[serde(default)]
    pub document_number: String,
    /// Current revision code
    #[serde(default)]
    pub revision: String,
    /// Drawing title
    #[serde(default)]
    pub title: String,
}

/// Outcome of comparing one field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "camelCase")]
pub enum FieldCheck {
    /// Extracted value matches the reference
    Agreement {
        /// Field name
        field: String,
    },
    /// Extracted value differs from the reference
    Discrepancy {
        /// Field name
        field: String,
        /// Reference value
        expected: String,
        /// Extracted value
        extracted: String,
    },
}

impl FieldCheck {
    /// Whether the field agreed.
    pub fn is_agreement(&self) -> bool {
        matches!(self, FieldCheck::Agreement { .. })
    }
}

/// Per-field comparison of one document against its reference record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Corroboration {
    /// Document name
    pub source: String,
    /// Field outcomes; fields blank in the reference are skipped
    pub checks: Vec<FieldCheck>,
}

impl Corroboration {
    /// Whether every compared field agreed.
    pub fn is_consistent(&self) -> bool {
        self.checks.iter().all(FieldCheck::is_agreement)
    }

    /// Only the discrepancies.
    pub fn discrepancies(&self) -> impl Iterator<Item = &FieldCheck> {
        self.checks.iter().filter(|c| !c.is_agreement())
    }
}

/// Reference records keyed by document file name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReferenceStore {
    records: HashMap<String, ReferenceRecord>,
}

impl ReferenceStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a JSON object mapping file names to records.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Parse a JSON object mapping file names to records.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let store: Self = serde_json::from_str(json)?;
        log::debug!("Loaded {} reference records", store.records.len());
        Ok(store)
    }

    /// Add or replace a record.
    pub fn insert(&mut self, name: impl Into<String>, record: ReferenceRecord) {
        self.records.insert(name.into(), record);
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Record for a document, by exact name or by file stem ignoring case.
    pub fn lookup(&self, name: &str) -> Option<&ReferenceRecord> {
        if let Some(record) = self.records.get(name) {
            return Some(record);
        }
        let stem = file_stem(name).to_lowercase();
        self.records
            .iter()
            .find(|(key, _)| file_stem(key).to_lowercase() == stem)
            .map(|(_, record)| record)
    }

    /// Compare an extraction with the document's reference record.
    ///
    /// Returns `None` when the store has no record for `name`.
    pub fn corroborate(&self, name: &str, result: &ExtractionResult) -> Option<Corroboration> {
        let record = self.lookup(name)?;
        let mut checks = Vec::new();

        compare(
            &mut checks,
            "drawingNumber",
            &record.document_number,
            &result.drawing_number,
            |a, b| a.trim().eq_ignore_ascii_case(b.trim()),
        );
        compare(&mut checks, "currentRevision", &record.revision, &result.current_revision, same_revision);
        compare(&mut checks, "title", &record.title, &result.title, same_title);

        let corroboration = Corroboration {
            source: name.to_string(),
            checks,
        };
        if !corroboration.is_consistent() {
            log::info!(
                "{}: {} field(s) disagree with the reference",
                name,
                corroboration.discrepancies().count()
            );
        }
        Some(corroboration)
    }
}

fn compare(
    checks: &mut Vec<FieldCheck>,
    field: &str,
    expected: &str,
    extracted: &str,
    equal: impl Fn(&str, &str) -> bool,
) {
    if expected.trim().is_empty() {
        return;
    }
    let check = if equal(expected, extracted) {
        FieldCheck::Agreement {
            field: field.to_string(),
        }
    } else {
        FieldCheck::Discrepancy {
            field: field.to_string(),
            expected: expected.to_string(),
            extracted: extracted.to_string(),
        }
    };
    checks.push(check);
}

/// Revision codes compare exactly, except that spreadsheets drop the leading
/// zero of numeric codes (`7` for `07`).
fn same_revision(expected: &str, extracted: &str) -> bool {
    let (expected, extracted) = (expected.trim(), extracted.trim());
    if expected.eq_ignore_ascii_case(extracted) {
        return true;
    }
    match (expected.parse::<u32>(), extracted.parse::<u32>()) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

/// Titles compare ignoring whitespace and case.
fn same_title(expected: &str, extracted: &str) -> bool {
    let squash = |s: &str| -> String { s.chars().filter(|c| !c.is_whitespace()).collect::<String>().to_lowercase() };
    squash(expected) == squash(extracted)
}

fn file_stem(name: &str) -> &str {
    Path::new(name)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(name)
}
