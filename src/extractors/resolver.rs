//! Latest-revision resolution.
//!
//! Two rules decide which history entry is authoritative:
//!
//! - With a current revision code read from the title block, the entry
//!   carrying that code is the latest. If no entry carries it, resolution
//!   fails instead of falling back to a guess.
//! - Without one, codes are grouped into families (`T*`, `N*`, numeric
//!   `0N`) ranked by prefix, so tender issues sit above construction
//!   issues and both above numeric codes. The highest family wins, then
//!   the highest numeric suffix within it, then the entry nearest the
//!   table header.

use crate::extractors::revision::RevisionEntry;
use std::cmp::Ordering;

/// Revision code family, in ascending precedence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RevisionFamily {
    /// Anything that fits no known family
    Other,
    /// Numeric design-stage codes (`01`..`09`)
    Numeric,
    /// Construction issues (`N0`, `N1`, ...)
    Construction,
    /// Tender issues (`T0`, `T1`, ...)
    Tender,
}

impl RevisionFamily {
    /// Family of a revision code.
    pub fn of(code: &str) -> Self {
        let mut chars = code.chars();
        match chars.next() {
            Some('N') if chars.as_str().chars().all(|c| c.is_ascii_digit()) && code.len() > 1 => Self::Construction,
            Some('T') if chars.as_str().chars().all(|c| c.is_ascii_digit()) && code.len() > 1 => Self::Tender,
            Some(_) if code.chars().all(|c| c.is_ascii_digit()) => Self::Numeric,
            _ => Self::Other,
        }
    }
}

/// Numeric suffix of a code (`T12` -> 12, `07` -> 7), if it has one.
pub fn numeric_suffix(code: &str) -> Option<u32> {
    let start = code.len() - code.chars().rev().take_while(|c| c.is_ascii_digit()).count();
    code[start..].parse().ok()
}

/// Outcome of resolving the latest revision.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution<'a> {
    /// The authoritative entry
    Latest(&'a RevisionEntry),
    /// The current revision code has no entry in the history
    NotInHistory {
        /// Code read from the title block
        code: String,
    },
    /// No history entries were parsed
    NoEntries,
}

impl<'a> Resolution<'a> {
    /// The resolved entry, if any.
    pub fn entry(&self) -> Option<&'a RevisionEntry> {
        match self {
            Resolution::Latest(entry) => Some(*entry),
            _ => None,
        }
    }
}

/// Resolve the latest entry of a revision history.
///
/// # Examples
///
/// ```
/// use drawing_oxide::extractors::resolver::{resolve, Resolution};
/// use drawing_oxide::extractors::revision::RevisionEntry;
///
/// let entries = vec![RevisionEntry::new("T0", "26/10/2023", 5), RevisionEntry::new("T1", "07/11/2024", 20)];
///
/// assert_eq!(resolve(&entries, None).entry().map(|e| e.code.as_str()), Some("T1"));
/// assert_eq!(resolve(&entries, Some("T0")).entry().map(|e| e.code.as_str()), Some("T0"));
/// assert!(matches!(resolve(&entries, Some("T2")), Resolution::NotInHistory { .. }));
/// ```
pub fn resolve<'a>(entries: &'a [RevisionEntry], current_revision: Option<&str>) -> Resolution<'a> {
    if entries.is_empty() {
        return Resolution::NoEntries;
    }

    match current_revision.map(str::trim).filter(|code| !code.is_empty()) {
        Some(code) => match positional_latest(entries.iter().filter(|e| e.code == code)) {
            Some(entry) => Resolution::Latest(entry),
            None => {
                log::warn!("Current revision {} not found among {} history entries", code, entries.len());
                Resolution::NotInHistory { code: code.to_string() }
            },
        },
        None => ranked_latest(entries).map_or(Resolution::NoEntries, Resolution::Latest),
    }
}

/// The entry nearest the table header: the smallest `document_order`.
pub fn positional_latest<'a>(entries: impl IntoIterator<Item = &'a RevisionEntry>) -> Option<&'a RevisionEntry> {
    entries.into_iter().min_by_key(|e| e.document_order)
}

/// Latest entry by family precedence, then numeric suffix, then position.
pub fn ranked_latest(entries: &[RevisionEntry]) -> Option<&RevisionEntry> {
    let family = entries.iter().map(|e| RevisionFamily::of(&e.code)).max()?;
    let in_family: Vec<&RevisionEntry> = entries
        .iter()
        .filter(|e| RevisionFamily::of(&e.code) == family)
        .collect();
    let top = in_family.iter().map(|e| numeric_suffix(&e.code)).max()?;

    let latest = positional_latest(in_family.into_iter().filter(|e| numeric_suffix(&e.code) == top));
    if let Some(entry) = latest {
        log::debug!("Ranked latest revision {} ({:?} family)", entry.code, family);
    }
    latest
}

/// Compare two codes by family, then by numeric suffix.
pub fn compare_codes(a: &str, b: &str) -> Ordering {
    RevisionFamily::of(a)
        .cmp(&RevisionFamily::of(b))
        .then_with(|| numeric_suffix(a).cmp(&numeric_suffix(b)))
}
