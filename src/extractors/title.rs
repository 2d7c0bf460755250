//! Drawing title reconstruction.
//!
//! Titles frequently wrap across two or three lines of the title block, so
//! the value is rebuilt from several lines rather than picked from one.
//! Two modes are tried in order:
//!
//! 1. **Label-anchored**: find the "Drawing Title" label and collect the lines
//!    below it, restricted to the label's column, until a boundary label.
//! 2. **Content-anchored**: take the best-scoring title candidate on the page
//!    and append a wrapped neighbor directly below it.

use crate::config::TitleConfig;
use crate::extractors::candidate::{CandidateOrigin, CandidateScorer, FieldTarget};
use crate::extractors::patterns::{is_title_boundary, title_label_end};
use crate::geometry::Rect;
use crate::layout::{collapse_whitespace, Line, PageLayout, TextFragment};
use serde::{Deserialize, Serialize};

/// How a title was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TitleSource {
    /// Collected below the "Drawing Title" label
    LabelAnchored,
    /// Best-scoring candidate on the page
    ContentAnchored,
    /// No title found
    Absent,
}

/// A reconstructed title with its provenance.
#[derive(Debug, Clone, PartialEq)]
pub struct ReconstructedTitle {
    /// Space-joined title text
    pub text: String,
    /// Mode that produced it
    pub source: TitleSource,
}

/// Rebuilds multi-line titles from page lines.
#[derive(Debug, Clone, Default)]
pub struct TitleReconstructor {
    config: TitleConfig,
    scorer: CandidateScorer,
}

impl TitleReconstructor {
    /// Create a reconstructor sharing the scorer's title rules.
    pub fn new(config: TitleConfig, scorer: CandidateScorer) -> Self {
        Self { config, scorer }
    }

    /// Reconstruct the title of a page, label-anchored first.
    pub fn reconstruct(&self, layout: &PageLayout) -> Option<ReconstructedTitle> {
        if let Some(text) = self.label_anchored(layout, None) {
            log::debug!("Label-anchored title: {:?}", text);
            return Some(ReconstructedTitle {
                text,
                source: TitleSource::LabelAnchored,
            });
        }

        let text = self.content_anchored(layout)?;
        log::debug!("Content-anchored title: {:?}", text);
        Some(ReconstructedTitle {
            text,
            source: TitleSource::ContentAnchored,
        })
    }

    /// Collect title lines below the "Drawing Title" label.
    ///
    /// `start` names the label line when the caller already knows it;
    /// otherwise the first line carrying the label is used.
    pub fn label_anchored(&self, layout: &PageLayout, start: Option<usize>) -> Option<String> {
        let lines = &layout.lines;
        let start = match start {
            Some(index) => index,
            None => lines.iter().position(|l| title_label_end(&l.text).is_some())?,
        };
        let label_line = lines.get(start)?;
        let (x_min, x_max) = self.label_column(label_line);

        let mut parts: Vec<String> = Vec::new();
        if let Some(rest) = label_remainder(label_line) {
            if self.accepts(&rest, label_line.bbox, label_line.font_size) {
                parts.push(rest);
            }
        }

        for line in lines.iter().skip(start + 1).take(self.config.max_lookahead) {
            let column: Vec<&TextFragment> = line.column(x_min, x_max).collect();
            let Some(part) = column_line(line.index, &column) else {
                continue;
            };
            if is_title_boundary(&part.text) {
                break;
            }
            if self.accepts(&part.text, part.bbox, part.font_size) {
                parts.push(part.text);
            } else if !parts.is_empty() {
                // A title is contiguous; anything after a rejected line is
                // other title block content.
                break;
            }
        }

        let title = collapse_whitespace(&parts.join(" "));
        (!title.is_empty()).then_some(title)
    }

    /// Best title candidate on the page plus a wrapped neighbor below it.
    pub fn content_anchored(&self, layout: &PageLayout) -> Option<String> {
        let candidates = self.scorer.score_candidates(layout, FieldTarget::Title);
        let best = candidates
            .iter()
            .find(|c| c.score > 0 && c.origin == CandidateOrigin::TitleBand)
            .or_else(|| candidates.iter().find(|c| c.score > 0))?;

        let mut title = best.text.clone();
        if let Some(neighbor) = self.wrapped_neighbor(&best.source_bbox, layout) {
            log::debug!("Appending wrapped title line {:?}", neighbor.content);
            title.push(' ');
            title.push_str(neighbor.content.trim());
        }
        Some(collapse_whitespace(&title))
    }

    /// Horizontal extent of the label's column.
    ///
    /// The column starts slightly left of the label and ends where the next
    /// fragment to its right on the label row begins.
    fn label_column(&self, label_line: &Line) -> (f32, f32) {
        let label = label_line
            .fragments
            .iter()
            .find(|f| title_label_end(&f.content).is_some())
            .or_else(|| label_line.fragments.first());
        match label {
            Some(label) => {
                let x_max = label_line
                    .fragments
                    .iter()
                    .filter(|f| f.bbox.x0 >= label.bbox.x1)
                    .map(|f| f.bbox.x0)
                    .fold(f32::INFINITY, f32::min);
                (label.bbox.x0 - self.config.column_slack, x_max)
            },
            None => (f32::NEG_INFINITY, f32::INFINITY),
        }
    }

    fn accepts(&self, text: &str, bbox: Rect, font_size: f32) -> bool {
        let probe = Line::synthetic(0, text, bbox, font_size);
        match self.scorer.title_exclusion(&probe) {
            Some(exclusion) => {
                log::trace!("Title part {:?} rejected: {:?}", text, exclusion);
                false
            },
            None => true,
        }
    }

    fn wrapped_neighbor<'a>(&self, anchor: &Rect, layout: &'a PageLayout) -> Option<&'a TextFragment> {
        layout
            .fragments
            .iter()
            .filter(|f| f.bbox != *anchor)
            .filter(|f| {
                let gap = anchor.gap_below(&f.bbox);
                gap >= 0.0
                    && gap < self.config.neighbor_max_gap
                    && (f.bbox.x0 - anchor.x0).abs() <= self.config.neighbor_x_tolerance
            })
            .filter(|f| self.scorer.title_score(*f, &layout.size).is_some_and(|s| s > 0))
            .min_by(|a, b| {
                anchor
                    .gap_below(&a.bbox)
                    .partial_cmp(&anchor.gap_below(&b.bbox))
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
    }
}

/// Text following the label inside the label's own fragment.
fn label_remainder(label_line: &Line) -> Option<String> {
    label_line.fragments.iter().find_map(|f| {
        let end = title_label_end(&f.content)?;
        let rest = collapse_whitespace(&f.content[end..]);
        (!rest.is_empty()).then_some(rest)
    })
}

/// The column fragments of one line as a synthetic line.
fn column_line(index: usize, fragments: &[&TextFragment]) -> Option<Line> {
    Line::from_fragments(index, fragments.iter().map(|f| (*f).clone()).collect())
}
