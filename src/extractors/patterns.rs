//! Declarative pattern table for title-block fields.
//!
//! Every grammar the extractors rely on is compiled once here. Extractors
//! combine these predicates with the weights in
//! [`ScoringConfig`](crate::config::ScoringConfig) instead of carrying
//! their own ad-hoc expressions.

use lazy_static::lazy_static;
use regex::Regex;

/// Descriptive vocabulary of drawing titles.
pub const DESCRIPTIVE_KEYWORDS: &[&str] = &[
    "plan",
    "section",
    "detail",
    "layout",
    "system",
    "room",
    "wall",
    "pool",
    "piping",
    "conduit",
    "mockup",
    "mock-up",
    "grms",
    "enlargement",
    "grading",
    "drainage",
    "technical",
    "information",
    "cover",
    "sheet",
    "facade",
    "façade",
    "external",
    "typical",
    "mep",
    "door",
    "overall",
    "elevation",
    "floor",
    "roof",
    "foundation",
    "structural",
    "mechanical",
    "electrical",
];

lazy_static! {
    /// Structured drawing number, e.g. `L01-H01D01-FOS-00-XX-MUP-AR-80050`
    static ref RE_DRAWING_NUMBER: Regex = Regex::new(
        r"\bL\d{2}-[A-Z]\d{2}[A-Z](?:\d{2}|XX)-[A-Z]{3}-(?:\d{2}|[A-Z]{2})-(?:[A-Z]{2}|\d{2})-[A-Z]{3}-[A-Z]{2}-\d{5}\b"
    ).unwrap();

    /// Current revision code: `T0`..`T99`, `N0`..`N99`, `01`..`09`
    static ref RE_REVISION_CODE: Regex = Regex::new(r"^(?:[TN]\d{1,2}|0[1-9])$").unwrap();

    /// Revision table date, `DD/MM/YYYY` or `DD/MM/YY`
    static ref RE_DATE: Regex = Regex::new(r"\b\d{1,2}/\d{1,2}/\d{2,4}\b").unwrap();

    /// Start of a revision entry: `CODE DATE`, where the code is `T*`, `N*`
    /// or two digits, so a word followed by a date inside a reason is not
    /// taken for a new row
    pub(crate) static ref RE_ENTRY_START: Regex =
        Regex::new(r"\b([TN]\d{1,2}|\d{2})\s+(\d{1,2}/\d{1,2}/\d{2,4})\b").unwrap();

    /// Start of a prefixed numeric entry: `EB07` glued to `07/03/2024`
    pub(crate) static ref RE_PREFIXED_ENTRY_START: Regex =
        Regex::new(r"\b[A-Z]{2}(\d{2})(\d{1,2}/\d{1,2}/\d{4})\b").unwrap();

    /// Checker initials
    static ref RE_CHECKER: Regex = Regex::new(r"^[A-Z]{1,3}$").unwrap();

    /// Scale token such as `1:50`
    static ref RE_SCALE: Regex = Regex::new(r"^1:\d+$").unwrap();

    /// Revision field label
    static ref RE_REVISION_LABEL: Regex = Regex::new(r"(?i)^(?:rev\.?|revision)\s*:?$").unwrap();

    /// The "Drawing Title" label
    static ref RE_TITLE_LABEL: Regex = Regex::new(r"(?i)\bdrawing\s+title\b\s*:?").unwrap();

    /// Labels that end a title: drawing number, drawn-by, project-no, revision
    static ref RE_TITLE_BOUNDARY: Regex = Regex::new(
        r"(?i)\b(?:drawing\s+(?:number|no\b\.?)|drawn\s+by|checked\s+by|approved\s+by|project\s+(?:no\b\.?|number)|model\s+file\s+reference|(?:first\s+)?issue\s+date|scale\s+at\s+iso|revision)\b|^rev\b\.?"
    ).unwrap();

    /// Multi-word structural labels, matched anywhere in the text
    static ref RE_LABEL_PHRASE: Regex = Regex::new(
        r"(?i)\b(?:drawing\s+(?:title|number|no\b\.?)|drawn\s+by|checked\s+by|approved\s+by|project\s+(?:no\b\.?|number)|(?:first\s+)?issue\s+date|model\s+file\s+reference|scale\s+at\s+iso|reason\s+for\s+issue)"
    ).unwrap();

    /// Single-word structural labels, matched against the whole text
    static ref RE_LABEL_WORD: Regex = Regex::new(
        r"(?i)^(?:rev\.?|revision|date|scale|client|status|checker|chk|sheet(?:\s*\d+)?|as\s+indicated|notes?|key\s+plan|north|consultant|architect)\s*:?$"
    ).unwrap();

    /// Company and address boilerplate
    static ref RE_BOILERPLATE: Regex = Regex::new(
        r"(?i)©|\bcopyright\b|\bwww\.|\.com\b|\+\d{2}[\s\d]|\ball\s+rights\s+reserved\b|\bltd\b|\bllp\b|\bpartners\b|\btel\b"
    ).unwrap();

    /// Text that is only digits and separators
    static ref RE_NUMERIC_ONLY: Regex = Regex::new(r"^[0-9.\s\-/:%]+$").unwrap();

    /// Short uppercase clusters such as `F+P AN HC`
    static ref RE_ABBREVIATION_CLUSTER: Regex =
        Regex::new(r"^[A-Z+&]{1,3}(?:\s+[A-Z+&]{1,3})*$").unwrap();

    /// A letter followed by digits, such as `T0` or `A1`
    static ref RE_LETTER_CODE: Regex = Regex::new(r"^[A-Z]\d+$").unwrap();
}

/// All drawing numbers in `text`, left to right.
pub fn find_drawing_numbers(text: &str) -> Vec<&str> {
    RE_DRAWING_NUMBER.find_iter(text).map(|m| m.as_str()).collect()
}

/// Whether `text` contains a full drawing number.
pub fn contains_drawing_number(text: &str) -> bool {
    RE_DRAWING_NUMBER.is_match(text)
}

/// Whether a token is an acceptable current revision code.
///
/// Two-digit codes must start with `0`; `12` is never a revision code.
///
/// # Examples
///
/// ```
/// use drawing_oxide::extractors::patterns::is_revision_code;
///
/// assert!(is_revision_code("T1"));
/// assert!(is_revision_code("07"));
/// assert!(!is_revision_code("12"));
/// assert!(!is_revision_code("A1"));
/// ```
pub fn is_revision_code(token: &str) -> bool {
    token.len() <= 3 && RE_REVISION_CODE.is_match(token)
}

/// Whether `text` contains a revision-table date.
pub fn contains_date(text: &str) -> bool {
    RE_DATE.is_match(text)
}

/// Whether `token` looks like checker initials.
pub fn is_checker(token: &str) -> bool {
    RE_CHECKER.is_match(token)
}

/// Whether `token` is a drawing scale such as `1:50`.
pub fn is_scale(token: &str) -> bool {
    RE_SCALE.is_match(token)
}

/// Whether `text` is a revision field label.
pub fn is_revision_label(text: &str) -> bool {
    RE_REVISION_LABEL.is_match(text.trim())
}

/// Byte offset just past the "Drawing Title" label, if present.
pub fn title_label_end(text: &str) -> Option<usize> {
    RE_TITLE_LABEL.find(text).map(|m| m.end())
}

/// Whether `text` carries a label that ends a title.
pub fn is_title_boundary(text: &str) -> bool {
    RE_TITLE_BOUNDARY.is_match(text.trim())
}

/// Whether `text` is a structural label of the title block.
pub fn is_structural_label(text: &str) -> bool {
    let text = text.trim();
    RE_LABEL_PHRASE.is_match(text) || RE_LABEL_WORD.is_match(text)
}

/// Whether `text` is company or address boilerplate.
pub fn is_boilerplate(text: &str) -> bool {
    RE_BOILERPLATE.is_match(text)
}

/// Whether `text` has the shape of page furniture rather than prose.
///
/// Covers bare numbers, dates, letter codes and abbreviation clusters.
pub fn is_title_noise(text: &str) -> bool {
    let text = text.trim();
    RE_NUMERIC_ONLY.is_match(text)
        || RE_LETTER_CODE.is_match(text)
        || RE_ABBREVIATION_CLUSTER.is_match(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drawing_number_grammar() {
        let valid = [
            "L01-H01D01-FOS-00-XX-MUP-AR-80050",
            "L01-H01D02-WSP-75-XX-MUP-IC-80301",
            "L02-R02DXX-RSG-00-ZZ-SKT-LS-12801",
            "L02-R02DXX-RSG-BN-ZZ-SKT-LS-11435",
            "L04-A04D02-CHP-16-00-DWG-SP-10001",
        ];
        for number in valid {
            assert!(contains_drawing_number(number), "{}", number);
        }

        assert!(!contains_drawing_number("L01-H01D01-FOS-00-XX-MUP-AR-8005"));
        assert!(!contains_drawing_number("L01-H01D01-FO-00-XX-MUP-AR-80050"));
        assert!(!contains_drawing_number("Drawing Number"));
    }

    #[test]
    fn test_find_drawing_numbers_in_context() {
        let found = find_drawing_numbers("Drawing Number L01-H01D01-FOS-00-XX-MUP-AR-80050[T0].pdf");
        assert_eq!(found, vec!["L01-H01D01-FOS-00-XX-MUP-AR-80050"]);
    }

    #[test]
    fn test_revision_codes() {
        for code in ["T0", "T1", "T12", "N0", "N3", "01", "09"] {
            assert!(is_revision_code(code), "{}", code);
        }
        for code in ["12", "00", "10", "T", "A1", "T123", "t1", "N0A"] {
            assert!(!is_revision_code(code), "{}", code);
        }
    }

    #[test]
    fn test_dates() {
        assert!(contains_date("T0 26/10/2023 ISSUED FOR TENDER"));
        assert!(contains_date("31/07/25"));
        assert!(!contains_date("Scale 1:50"));
        assert!(!contains_date("19/34"));
    }

    #[test]
    fn test_structural_labels() {
        for label in ["Drawing Number", "Drawn By", "Project No", "Rev.", "Scale", "Revision", "Checked By", "Issue Date"] {
            assert!(is_structural_label(label), "{}", label);
        }
        assert!(!is_structural_label("Technical and Project Information Cover Sheet"));
        assert!(!is_structural_label("Typical Façade Section Details"));
        assert!(!is_structural_label("Update of drainage"));
    }

    #[test]
    fn test_title_boundaries() {
        assert!(is_title_boundary("Drawing Number"));
        assert!(is_title_boundary("Drawing No."));
        assert!(is_title_boundary("Project No"));
        assert!(is_title_boundary("Rev"));
        assert!(is_title_boundary("Drawing Number Revision"));
        assert!(!is_title_boundary("Mockup External Wall Systems"));
        assert!(!is_title_boundary("Review Room Layout"));
    }

    #[test]
    fn test_title_label() {
        assert_eq!(title_label_end("Drawing Title"), Some(13));
        assert_eq!(title_label_end("Drawing Title: Pool Plan"), Some(14));
        assert_eq!(title_label_end("Title"), None);
    }

    #[test]
    fn test_boilerplate() {
        assert!(is_boilerplate("© Foster + Partners 2023"));
        assert!(is_boilerplate("www.example.com"));
        assert!(is_boilerplate("T +44 20 7738 0455"));
        assert!(!is_boilerplate("Main Pool Piping & Conduit Overall Layout"));
    }

    #[test]
    fn test_title_noise() {
        assert!(is_title_noise("1:50"));
        assert!(is_title_noise("26/10/2023"));
        assert!(is_title_noise("T0"));
        assert!(is_title_noise("F+P AN HC"));
        assert!(!is_title_noise("Pool Enlargement Plan"));
        assert!(!is_title_noise("GRMS Layout"));
    }

    #[test]
    fn test_revision_label_and_scale() {
        assert!(is_revision_label("Rev"));
        assert!(is_revision_label("Revision:"));
        assert!(!is_revision_label("Revision History"));
        assert!(is_scale("1:50"));
        assert!(!is_scale("1:50 T1"));
    }

    #[test]
    fn test_checker() {
        assert!(is_checker("AK"));
        assert!(is_checker("NQ"));
        assert!(!is_checker("TENDER"));
        assert!(!is_checker("A1"));
    }
}
