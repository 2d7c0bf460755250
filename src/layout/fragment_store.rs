//! Fragment normalization and line reconstruction.
//!
//! The store turns the provider's fragment list into two views of the same
//! page: a position-sorted fragment sequence for geometry-aware scoring, and
//! a reading-order line sequence for text pattern matching. Blank fragments
//! are dropped; every other fragment appears in exactly one line.

use crate::config::FragmentConfig;
use crate::geometry::PageSize;
use crate::layout::fragment::{Line, Page, TextFragment};
use std::cmp::Ordering;

/// A page after normalization.
#[derive(Debug, Clone)]
pub struct PageLayout {
    /// Page dimensions
    pub size: PageSize,
    /// Non-blank fragments, top-to-bottom then left-to-right
    pub fragments: Vec<TextFragment>,
    /// Reconstructed lines in reading order; `lines[i].index == i`
    pub lines: Vec<Line>,
}

impl PageLayout {
    /// Flattened text of every line, in order.
    pub fn line_texts(&self) -> Vec<&str> {
        self.lines.iter().map(|l| l.text.as_str()).collect()
    }

    /// Count of non-whitespace characters on the page.
    pub fn text_char_count(&self) -> usize {
        self.lines
            .iter()
            .map(|l| l.text.chars().filter(|c| !c.is_whitespace()).count())
            .sum()
    }
}

/// Builds [`PageLayout`]s from raw pages.
#[derive(Debug, Clone, Default)]
pub struct FragmentStore {
    config: FragmentConfig,
}

impl FragmentStore {
    /// Create a store with the given line-grouping settings.
    pub fn new(config: FragmentConfig) -> Self {
        Self { config }
    }

    /// Normalize a page into sorted fragments and reconstructed lines.
    pub fn load_page(&self, page: &Page) -> PageLayout {
        let mut fragments: Vec<TextFragment> = page
            .fragments
            .iter()
            .filter(|f| !f.is_blank())
            .cloned()
            .collect();
        fragments.sort_by(compare_top_left);

        let lines = self.group_lines(&fragments);
        log::trace!("Grouped {} fragments into {} lines", fragments.len(), lines.len());

        PageLayout {
            size: page.size,
            fragments,
            lines,
        }
    }

    /// Vertical tolerance for two fragments to share a line.
    fn tolerance(&self, a_size: f32, b_size: f32) -> f32 {
        let smaller = a_size.min(b_size).max(0.0);
        (smaller * self.config.line_tolerance_ratio).max(self.config.min_line_tolerance)
    }

    fn group_lines(&self, fragments: &[TextFragment]) -> Vec<Line> {
        let mut by_center: Vec<&TextFragment> = fragments.iter().collect();
        by_center.sort_by(|a, b| {
            a.bbox
                .center_y()
                .partial_cmp(&b.bbox.center_y())
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.bbox.x0.partial_cmp(&b.bbox.x0).unwrap_or(Ordering::Equal))
        });

        // Each group tracks (sum of centers, member count, smallest font size).
        let mut groups: Vec<(Vec<TextFragment>, f32, usize, f32)> = Vec::new();
        for fragment in by_center {
            let center = fragment.bbox.center_y();
            let joined = match groups.last_mut() {
                Some((members, sum, count, min_size)) => {
                    let line_center = *sum / *count as f32;
                    if (center - line_center).abs() <= self.tolerance(fragment.font_size, *min_size) {
                        members.push(fragment.clone());
                        *sum += center;
                        *count += 1;
                        *min_size = min_size.min(fragment.font_size);
                        true
                    } else {
                        false
                    }
                },
                None => false,
            };
            if !joined {
                groups.push((vec![fragment.clone()], center, 1, fragment.font_size));
            }
        }

        let mut rows: Vec<Vec<TextFragment>> = groups
            .into_iter()
            .map(|(mut members, _, _, _)| {
                members.sort_by(|a, b| a.bbox.x0.partial_cmp(&b.bbox.x0).unwrap_or(Ordering::Equal));
                members
            })
            .collect();
        rows.sort_by(|a, b| {
            let top_a = a.iter().map(|f| f.bbox.y0).fold(f32::INFINITY, f32::min);
            let top_b = b.iter().map(|f| f.bbox.y0).fold(f32::INFINITY, f32::min);
            top_a.partial_cmp(&top_b).unwrap_or(Ordering::Equal)
        });

        rows.into_iter()
            .enumerate()
            .filter_map(|(index, members)| Line::from_fragments(index, members))
            .collect()
    }
}

fn compare_top_left(a: &TextFragment, b: &TextFragment) -> Ordering {
    a.bbox
        .y0
        .partial_cmp(&b.bbox.y0)
        .unwrap_or(Ordering::Equal)
        .then_with(|| a.bbox.x0.partial_cmp(&b.bbox.x0).unwrap_or(Ordering::Equal))
}
