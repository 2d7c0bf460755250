//! Positioned text fragments and the lines reconstructed from them.
//!
//! A [`TextFragment`] is one run of text as the layout provider emits it:
//! its string, bounding box and font size. Fragments are immutable once
//! created. A [`Line`] is a derived view grouping fragments that share a
//! visual row; lines are rebuilt for every page and never persisted.

use crate::geometry::{PageSize, Rect};

/// Largest gap, relative to font size, between two fragments that continue
/// one another without a space.
pub const ABUTTING_GAP_RATIO: f32 = 0.1;

/// One positioned run of text on a page.
#[derive(Debug, Clone, PartialEq)]
pub struct TextFragment {
    /// Text content as extracted
    pub content: String,
    /// Bounding box in page space
    pub bbox: Rect,
    /// Font size in points
    pub font_size: f32,
}

impl TextFragment {
    /// Create a fragment from its content and corner coordinates.
    ///
    /// # Examples
    ///
    /// ```
    /// use drawing_oxide::layout::TextFragment;
    ///
    /// let fragment = TextFragment::new("Drawing Title", 600.0, 480.0, 660.0, 488.0, 8.0);
    /// assert_eq!(fragment.bbox.width(), 60.0);
    /// assert!(!fragment.is_blank());
    /// ```
    pub fn new(content: impl Into<String>, x0: f32, y0: f32, x1: f32, y1: f32, font_size: f32) -> Self {
        Self {
            content: content.into(),
            bbox: Rect::from_points(x0, y0, x1, y1),
            font_size,
        }
    }

    /// Whether the fragment carries no visible text.
    pub fn is_blank(&self) -> bool {
        self.content.trim().is_empty()
    }
}

/// Fragments judged to share one visual row, left to right.
#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    /// Position of this line in the page's reading order
    pub index: usize,
    /// Member fragments sorted by left edge
    pub fragments: Vec<TextFragment>,
    /// Space-joined fragment contents
    pub text: String,
    /// Union of member bounding boxes
    pub bbox: Rect,
    /// Largest member font size
    pub font_size: f32,
}

impl Line {
    /// Build a line from fragments already sorted left to right.
    ///
    /// Returns `None` for an empty fragment list.
    pub fn from_fragments(index: usize, fragments: Vec<TextFragment>) -> Option<Self> {
        let first = fragments.first()?;
        let mut bbox = first.bbox;
        let mut font_size = first.font_size;
        for fragment in &fragments[1..] {
            bbox = bbox.union(&fragment.bbox);
            font_size = font_size.max(fragment.font_size);
        }
        let text = join_contents(fragments.iter());

        Some(Self {
            index,
            fragments,
            text,
            bbox,
            font_size,
        })
    }

    /// Build a single-fragment line from free text.
    ///
    /// Used for text-only sources and for re-scoring reconstructed values.
    pub fn synthetic(index: usize, text: impl Into<String>, bbox: Rect, font_size: f32) -> Self {
        let content = collapse_whitespace(&text.into());
        let fragment = TextFragment {
            content: content.clone(),
            bbox,
            font_size,
        };
        Self {
            index,
            fragments: vec![fragment],
            text: content,
            bbox,
            font_size,
        }
    }

    /// Text of the fragments reaching into the column `(x_min, x_max)`.
    ///
    /// This restricts a full-width row to one column of the sheet. Pass
    /// `f32::INFINITY` for an open right edge.
    pub fn text_within(&self, x_min: f32, x_max: f32) -> String {
        join_contents(self.column(x_min, x_max))
    }

    /// Fragments reaching into the column `(x_min, x_max)`.
    pub fn column(&self, x_min: f32, x_max: f32) -> impl Iterator<Item = &TextFragment> {
        self.fragments
            .iter()
            .filter(move |f| f.bbox.x1 > x_min && f.bbox.x0 < x_max)
    }

    /// Member fragments with abutting neighbours merged, left to right.
    ///
    /// Providers sometimes cut one word into several fragments that touch.
    /// Neighbours merge without a space when the gap between them is within
    /// [`ABUTTING_GAP_RATIO`] of the smaller font size and neither side has
    /// whitespace at the seam.
    ///
    /// # Examples
    ///
    /// ```
    /// use drawing_oxide::layout::{Line, TextFragment};
    ///
    /// let line = Line::from_fragments(0, vec![
    ///     TextFragment::new("L01-H01D01-", 100.0, 50.0, 160.0, 60.0, 10.0),
    ///     TextFragment::new("AR-80050", 160.5, 50.0, 200.0, 60.0, 10.0),
    ///     TextFragment::new("T1", 260.0, 50.0, 270.0, 60.0, 10.0),
    /// ]).unwrap();
    ///
    /// let runs: Vec<String> = line.runs().into_iter().map(|f| f.content).collect();
    /// assert_eq!(runs, ["L01-H01D01-AR-80050", "T1"]);
    /// ```
    pub fn runs(&self) -> Vec<TextFragment> {
        let mut runs: Vec<TextFragment> = Vec::with_capacity(self.fragments.len());
        for fragment in &self.fragments {
            match runs.last_mut() {
                Some(run) if abuts(run, fragment) => {
                    run.content.push_str(&fragment.content);
                    run.bbox = run.bbox.union(&fragment.bbox);
                    run.font_size = run.font_size.max(fragment.font_size);
                },
                _ => runs.push(fragment.clone()),
            }
        }
        runs
    }
}

fn abuts(prev: &TextFragment, next: &TextFragment) -> bool {
    if prev.content.ends_with(char::is_whitespace) || next.content.starts_with(char::is_whitespace) {
        return false;
    }
    let margin = ABUTTING_GAP_RATIO * prev.font_size.min(next.font_size);
    (next.bbox.x0 - prev.bbox.x1).abs() <= margin
}

/// A page as materialized by the layout provider.
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    /// Page dimensions
    pub size: PageSize,
    /// Fragments in provider order
    pub fragments: Vec<TextFragment>,
}

impl Page {
    /// Create a page.
    pub fn new(size: PageSize, fragments: Vec<TextFragment>) -> Self {
        Self { size, fragments }
    }
}

/// Read access shared by fragments and lines, so scoring rules apply to both.
pub trait TextItem {
    /// Text used for pattern matching
    fn text(&self) -> &str;
    /// Bounding box used for position rules
    fn bbox(&self) -> Rect;
    /// Font size used for size rules
    fn font_size(&self) -> f32;
}

impl TextItem for TextFragment {
    fn text(&self) -> &str {
        &self.content
    }

    fn bbox(&self) -> Rect {
        self.bbox
    }

    fn font_size(&self) -> f32 {
        self.font_size
    }
}

impl TextItem for Line {
    fn text(&self) -> &str {
        &self.text
    }

    fn bbox(&self) -> Rect {
        self.bbox
    }

    fn font_size(&self) -> f32 {
        self.font_size
    }
}

/// Collapse runs of whitespace into single spaces and trim the ends.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn join_contents<'a>(fragments: impl Iterator<Item = &'a TextFragment>) -> String {
    let parts: Vec<&str> = fragments
        .map(|f| f.content.trim())
        .filter(|c| !c.is_empty())
        .collect();
    collapse_whitespace(&parts.join(" "))
}
