//! Batch reporting over many extraction results.

use crate::pipeline::result::{ExtractionResult, Status};
use indexmap::IndexMap;
use serde::Serialize;
use std::fmt;

/// Aggregate statistics for a batch of documents.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchSummary {
    /// Documents processed
    pub total: usize,
    /// Documents with `SUCCESS`
    pub succeeded: usize,
    /// Documents with any failure
    pub failed: usize,
    /// Failure counts by reason, in first-seen order
    pub failures: IndexMap<String, usize>,
    /// Non-empty counts per text field, in record order
    pub non_empty: IndexMap<String, usize>,
}

impl BatchSummary {
    /// Summarize a list of results.
    pub fn from_results(results: &[ExtractionResult]) -> Self {
        let mut failures: IndexMap<String, usize> = IndexMap::new();
        let mut non_empty: IndexMap<String, usize> = IndexMap::new();
        let mut succeeded = 0;

        for result in results {
            match &result.status {
                Status::Success => succeeded += 1,
                Status::Failed(reason) => *failures.entry(reason.kind().to_string()).or_insert(0) += 1,
            }
            for (field, value) in result.text_fields() {
                let count = non_empty.entry(field.to_string()).or_insert(0);
                if !value.trim().is_empty() {
                    *count += 1;
                }
            }
        }

        Self {
            total: results.len(),
            succeeded,
            failed: results.len() - succeeded,
            failures,
            non_empty,
        }
    }

    /// Share of successful documents in percent.
    pub fn success_rate(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.succeeded as f64 * 100.0 / self.total as f64
        }
    }
}

impl fmt::Display for BatchSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Total documents: {}", self.total)?;
        writeln!(f, "  Succeeded:     {} ({:.1}%)", self.succeeded, self.success_rate())?;
        writeln!(f, "  Failed:        {}", self.failed)?;
        for (reason, count) in &self.failures {
            writeln!(f, "    {:32} {}", reason, count)?;
        }
        writeln!(f, "Fields found:")?;
        for (field, count) in &self.non_empty {
            writeln!(f, "  {:16} {}/{}", field, count, self.total)?;
        }
        Ok(())
    }
}
