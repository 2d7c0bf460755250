//! Revision history parsing.
//!
//! Revision tables are read from reconstructed line text. Each entry follows
//! the grammar `CODE DATE REASON [CHECKER]`. Layout providers often flatten a
//! whole table row, or several rows, onto one line:
//!
//! ```text
//! T0 26/10/2023 ISSUED FOR TENDER AK T1 07/11/2024 ISSUED FOR TENDER NQ
//! ```
//!
//! so every line is scanned for all non-overlapping `CODE DATE` starts, and
//! each reason runs up to the next start. A reason that wraps onto the next
//! line is appended only under a conservative continuation rule.

use crate::config::RevisionConfig;
use crate::extractors::patterns::{
    contains_date, is_checker, is_revision_label, is_structural_label, RE_ENTRY_START, RE_PREFIXED_ENTRY_START,
};
use crate::layout::collapse_whitespace;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Short words that end a wrapped reason and are never checker initials.
const REASON_WORDS: &[&str] = &["FOR", "OF", "AND", "THE", "TO", "IN", "ON", "BY"];

/// One row of the revision history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RevisionEntry {
    /// Revision code, `[A-Z0-9]{1,3}`
    pub code: String,
    /// Issue date, `DD/MM/YYYY` or `DD/MM/YY`
    pub date: String,
    /// Reason for issue
    pub reason: String,
    /// Checker initials, empty when absent
    pub checker: String,
    /// Index of the source line in the page's line sequence
    pub document_order: usize,
}

impl RevisionEntry {
    /// Create an entry with an empty reason and checker.
    pub fn new(code: impl Into<String>, date: impl Into<String>, document_order: usize) -> Self {
        Self {
            code: code.into(),
            date: date.into(),
            reason: String::new(),
            checker: String::new(),
            document_order,
        }
    }

    /// Set the reason for issue.
    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = reason.into();
        self
    }

    /// Set the checker initials.
    pub fn with_checker(mut self, checker: impl Into<String>) -> Self {
        self.checker = checker.into();
        self
    }
}

/// Position of one `CODE DATE` start within a line.
#[derive(Debug, Clone)]
struct EntryStart {
    start: usize,
    end: usize,
    code: String,
    date: String,
    checker: Option<String>,
}

/// Parses revision entries from line texts.
#[derive(Debug, Clone, Default)]
pub struct RevisionParser {
    config: RevisionConfig,
}

impl RevisionParser {
    /// Create a parser.
    pub fn new(config: RevisionConfig) -> Self {
        Self { config }
    }

    /// Parse every revision entry on a page.
    ///
    /// `lines` is the full reconstructed line sequence; an entry's
    /// `document_order` is the index of its source line. Entries repeating an
    /// earlier `(code, date)` pair are dropped.
    pub fn parse_entries<S: AsRef<str>>(&self, lines: &[S]) -> Vec<RevisionEntry> {
        let mut entries = Vec::new();
        let mut seen: HashSet<(String, String)> = HashSet::new();

        for (index, line) in lines.iter().enumerate() {
            let text = line.as_ref();
            let starts = self.entry_starts(text);
            if starts.is_empty() {
                continue;
            }

            let mut parsed: Vec<RevisionEntry> = starts
                .iter()
                .enumerate()
                .map(|(k, start)| {
                    let reason_end = starts.get(k + 1).map_or(text.len(), |next| next.start);
                    build_entry(start, &text[start.end..reason_end], index)
                })
                .collect();

            if let Some(last) = parsed.last_mut() {
                self.append_continuations(last, &lines[index + 1..]);
            }

            for entry in parsed {
                if seen.insert((entry.code.clone(), entry.date.clone())) {
                    entries.push(entry);
                } else {
                    log::trace!("Duplicate revision entry {} {} dropped", entry.code, entry.date);
                }
            }
        }

        log::debug!("Parsed {} revision entries", entries.len());
        entries
    }

    /// All non-overlapping entry starts of a line, left to right.
    fn entry_starts(&self, text: &str) -> Vec<EntryStart> {
        let mut starts: Vec<EntryStart> = RE_ENTRY_START
            .captures_iter(text)
            .filter_map(|caps| {
                let whole = caps.get(0)?;
                Some(EntryStart {
                    start: whole.start(),
                    end: whole.end(),
                    code: caps.get(1)?.as_str().to_string(),
                    date: caps.get(2)?.as_str().to_string(),
                    checker: None,
                })
            })
            .collect();

        if self.config.accept_prefixed_codes {
            for caps in RE_PREFIXED_ENTRY_START.captures_iter(text) {
                let (Some(whole), Some(code), Some(date)) = (caps.get(0), caps.get(1), caps.get(2)) else {
                    continue;
                };
                let overlaps = starts.iter().any(|s| whole.start() < s.end && s.start < whole.end());
                if !overlaps {
                    starts.push(EntryStart {
                        start: whole.start(),
                        end: whole.end(),
                        code: code.as_str().to_string(),
                        date: date.as_str().to_string(),
                        checker: Some(text[whole.start()..code.start()].to_string()),
                    });
                }
            }
            starts.sort_by_key(|s| s.start);
        }

        starts
    }

    /// Append wrapped reason text from the lines following an entry.
    fn append_continuations<S: AsRef<str>>(&self, entry: &mut RevisionEntry, following: &[S]) {
        for line in following.iter().take(self.config.max_continuation_lines) {
            let text = line.as_ref().trim();
            if !self.is_continuation(text) {
                break;
            }
            if entry.checker.is_empty() && is_checker(text) && !REASON_WORDS.contains(&text) {
                entry.checker = text.to_string();
            } else {
                entry.reason = collapse_whitespace(&format!("{} {}", entry.reason, text));
            }
        }
    }

    fn is_continuation(&self, text: &str) -> bool {
        !text.is_empty()
            && text.chars().count() < self.config.continuation_max_len
            && !contains_date(text)
            && self.entry_starts(text).is_empty()
            && !is_structural_label(text)
            && !text.split_whitespace().next().is_some_and(is_revision_label)
    }
}

/// Split the text after `CODE DATE` into reason and trailing checker.
fn build_entry(start: &EntryStart, rest: &str, document_order: usize) -> RevisionEntry {
    let mut tokens: Vec<&str> = rest.split_whitespace().collect();
    let mut checker = start.checker.clone().unwrap_or_default();

    if tokens.len() > 1 {
        if let Some(last) = tokens.last() {
            if is_checker(last) && !REASON_WORDS.contains(last) {
                if checker.is_empty() {
                    checker = last.to_string();
                }
                tokens.pop();
            }
        }
    }

    RevisionEntry {
        code: start.code.clone(),
        date: start.date.clone(),
        reason: tokens.join(" "),
        checker,
        document_order,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(lines: &[&str]) -> Vec<RevisionEntry> {
        RevisionParser::default().parse_entries(lines)
    }

    #[test]
    fn test_one_entry_per_line() {
        let entries = parse(&["T0 26/10/2023 ISSUED FOR TENDER AK", "T1 07/11/2024 ISSUED FOR TENDER NQ"]);
        assert_eq!(
            entries,
            vec![
                RevisionEntry::new("T0", "26/10/2023", 0)
                    .with_reason("ISSUED FOR TENDER")
                    .with_checker("AK"),
                RevisionEntry::new("T1", "07/11/2024", 1)
                    .with_reason("ISSUED FOR TENDER")
                    .with_checker("NQ"),
            ]
        );
    }

    #[test]
    fn test_concatenated_entries_on_one_line() {
        let entries = parse(&["T0 26/10/2023 ISSUED FOR TENDER AK T1 07/11/2024 ISSUED FOR TENDER NQ"]);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].code, "T0");
        assert_eq!(entries[0].reason, "ISSUED FOR TENDER");
        assert_eq!(entries[0].checker, "AK");
        assert_eq!(entries[1].code, "T1");
        assert_eq!(entries[1].date, "07/11/2024");
        assert_eq!(entries[1].checker, "NQ");
        assert!(entries.iter().all(|e| e.document_order == 0));
    }

    #[test]
    fn test_duplicates_suppressed() {
        let entries = parse(&[
            "T0 26/10/2023 ISSUED FOR TENDER AK",
            "Rev Date Reason",
            "T0 26/10/2023 ISSUED FOR TENDER AK",
        ]);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].document_order, 0);
        assert_eq!(entries[0].reason, "ISSUED FOR TENDER");
    }

    #[test]
    fn test_missing_checker() {
        let entries = parse(&["N0 31/07/25 ISSUED FOR CONSTRUCTION"]);
        assert_eq!(entries[0].reason, "ISSUED FOR CONSTRUCTION");
        assert_eq!(entries[0].checker, "");
        assert_eq!(entries[0].date, "31/07/25");
    }

    #[test]
    fn test_date_inside_reason() {
        let entries = parse(&["T2 12/02/2025 REISSUED AS PER 01/02/2025 COMMENTS"]);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].code, "T2");
        assert_eq!(entries[0].date, "12/02/2025");
        assert_eq!(entries[0].reason, "REISSUED AS PER 01/02/2025 COMMENTS");
        assert_eq!(entries[0].checker, "");
    }

    #[test]
    fn test_wrapped_reason_continuation() {
        let entries = parse(&["T2 12/02/2025 UPDATE OF DRAINAGE", "LAYOUT AND LEVELS", "Drawing Number"]);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].reason, "UPDATE OF DRAINAGE LAYOUT AND LEVELS");
    }

    #[test]
    fn test_continuation_rejections() {
        // Long lines, dated lines and labels are never merged into a reason.
        let long = "THIS LINE IS FAR TOO LONG TO BE A WRAPPED REASON FRAGMENT";
        for next in [long, "Issued 01/01/2024", "Drawing Number", "Scale"] {
            let entries = parse(&["T0 26/10/2023 ISSUED FOR TENDER", next]);
            assert_eq!(entries[0].reason, "ISSUED FOR TENDER", "{}", next);
        }
    }

    #[test]
    fn test_continuation_only_one_line() {
        let entries = parse(&["T0 26/10/2023 ISSUED", "FOR TENDER", "EXTRA WORDS"]);
        assert_eq!(entries[0].reason, "ISSUED FOR TENDER");
    }

    #[test]
    fn test_wrapped_checker() {
        let entries = parse(&["T1 07/11/2024 ISSUED FOR TENDER", "NQ"]);
        assert_eq!(entries[0].reason, "ISSUED FOR TENDER");
        assert_eq!(entries[0].checker, "NQ");
    }

    #[test]
    fn test_prefixed_numeric_rows() {
        let entries = parse(&["EB0707/03/2024 100% Design Development"]);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].code, "07");
        assert_eq!(entries[0].date, "07/03/2024");
        assert_eq!(entries[0].checker, "EB");
        assert_eq!(entries[0].reason, "100% Design Development");

        let entries = RevisionParser::new(RevisionConfig::default().with_prefixed_codes(false)).parse_entries(&["EB0707/03/2024 100% Design Development"]);
        assert!(entries.is_empty());
    }

    #[test]
    fn test_document_order_is_line_index() {
        let entries = parse(&["Revision History", "Rev Date Reason Chk", "T1 07/11/2024 ISSUED FOR TENDER NQ"]);
        assert_eq!(entries[0].document_order, 2);
    }

    #[test]
    fn test_no_entries() {
        assert!(parse(&["Drawing Title", "Pool Enlargement Plan"]).is_empty());
        assert!(parse(&[]).is_empty());
    }
}
