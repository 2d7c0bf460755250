//! Page-relative region classification.
//!
//! Two regions matter on a drawing sheet: the title search band across the
//! top of the page, and the title block in the bottom-right corner. Both are
//! fixed fractions of the page size. Classification is a pure function of
//! geometry and never looks at text.
//!
//! The title block has two sizes. Callers search the narrow block first and
//! retry with the wide block only when the narrow one produced nothing; see
//! [`RegionClassifier::widening`].

use crate::config::{BlockBounds, RegionConfig};
use crate::geometry::{PageSize, Point, Rect};

/// Which title block bounds a search used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TitleBlockPass {
    /// The narrow bottom-right rectangle
    Narrow,
    /// The widened rectangle used as a retry
    Wide,
}

impl TitleBlockPass {
    /// Passes in retry order.
    pub const ORDER: [TitleBlockPass; 2] = [TitleBlockPass::Narrow, TitleBlockPass::Wide];
}

/// Region membership of one bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegionMembership {
    /// Top edge lies in the title search band
    pub in_title_band: bool,
    /// Top-left corner lies in the title block
    pub in_title_block: bool,
}

/// Classifies bounding boxes into page regions.
#[derive(Debug, Clone, Default)]
pub struct RegionClassifier {
    config: RegionConfig,
}

impl RegionClassifier {
    /// Create a classifier with the given region fractions.
    pub fn new(config: RegionConfig) -> Self {
        Self { config }
    }

    /// Classify against the title band and the narrow title block.
    pub fn classify(&self, bbox: &Rect, page: &PageSize) -> RegionMembership {
        self.classify_with(bbox, page, TitleBlockPass::Narrow)
    }

    /// Classify against the title band and the title block of `pass`.
    pub fn classify_with(&self, bbox: &Rect, page: &PageSize, pass: TitleBlockPass) -> RegionMembership {
        RegionMembership {
            in_title_band: self.in_title_band(bbox, page),
            in_title_block: self.in_title_block(bbox, page, pass),
        }
    }

    /// Whether the box starts within the top band of the page.
    pub fn in_title_band(&self, bbox: &Rect, page: &PageSize) -> bool {
        bbox.y0 <= page.height * self.config.title_band_fraction
    }

    /// Whether the box's top-left corner lies in the bottom-right title block.
    pub fn in_title_block(&self, bbox: &Rect, page: &PageSize, pass: TitleBlockPass) -> bool {
        let bounds = self.bounds(pass);
        bbox.x0 >= page.width * (1.0 - bounds.right_fraction)
            && bbox.y0 >= page.height * (1.0 - bounds.bottom_fraction)
    }

    /// Anchor of the title band: the top-center of the page.
    pub fn title_band_anchor(&self, page: &PageSize) -> Point {
        Point::new(page.width / 2.0, 0.0)
    }

    /// Anchor of the title block: the bottom-right corner of the page.
    pub fn title_block_anchor(&self, page: &PageSize) -> Point {
        Point::new(page.width, page.height)
    }

    /// Run `search` against the narrow title block, then the wide one.
    ///
    /// Returns the first pass that produced results together with them, or
    /// `None` and an empty list when both passes came back empty.
    pub fn widening<T>(&self, mut search: impl FnMut(TitleBlockPass) -> Vec<T>) -> (Option<TitleBlockPass>, Vec<T>) {
        for pass in TitleBlockPass::ORDER {
            let found = search(pass);
            if !found.is_empty() {
                if pass == TitleBlockPass::Wide {
                    log::debug!("Narrow title block empty, widened search found {} items", found.len());
                }
                return (Some(pass), found);
            }
        }
        (None, Vec::new())
    }

    fn bounds(&self, pass: TitleBlockPass) -> BlockBounds {
        match pass {
            TitleBlockPass::Narrow => self.config.narrow_title_block,
            TitleBlockPass::Wide => self.config.wide_title_block,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: PageSize = PageSize {
        width: 1000.0,
        height: 1000.0,
    };

    fn rect(x0: f32, y0: f32) -> Rect {
        Rect::from_points(x0, y0, x0 + 50.0, y0 + 10.0)
    }

    #[test]
    fn test_title_band() {
        let classifier = RegionClassifier::default();
        assert!(classifier.in_title_band(&rect(500.0, 100.0), &PAGE));
        assert!(classifier.in_title_band(&rect(500.0, 400.0), &PAGE));
        assert!(!classifier.in_title_band(&rect(500.0, 401.0), &PAGE));
    }

    #[test]
    fn test_narrow_and_wide_title_block() {
        let classifier = RegionClassifier::default();
        // Narrow: x >= 600, y >= 700. Wide: x >= 400, y >= 300.
        let corner = rect(700.0, 800.0);
        let mid = rect(450.0, 500.0);
        let outside = rect(100.0, 900.0);

        assert!(classifier.in_title_block(&corner, &PAGE, TitleBlockPass::Narrow));
        assert!(!classifier.in_title_block(&mid, &PAGE, TitleBlockPass::Narrow));
        assert!(classifier.in_title_block(&mid, &PAGE, TitleBlockPass::Wide));
        assert!(!classifier.in_title_block(&outside, &PAGE, TitleBlockPass::Wide));
    }

    #[test]
    fn test_classify_is_idempotent() {
        let classifier = RegionClassifier::default();
        let bbox = rect(650.0, 750.0);
        let first = classifier.classify(&bbox, &PAGE);
        let second = classifier.classify(&bbox, &PAGE);
        assert_eq!(first, second);
        assert_eq!(
            first,
            RegionMembership {
                in_title_band: false,
                in_title_block: true
            }
        );
    }

    #[test]
    fn test_widening_prefers_narrow() {
        let classifier = RegionClassifier::default();
        let (pass, found) = classifier.widening(|pass| match pass {
            TitleBlockPass::Narrow => vec!["narrow"],
            TitleBlockPass::Wide => vec!["wide"],
        });
        assert_eq!(pass, Some(TitleBlockPass::Narrow));
        assert_eq!(found, vec!["narrow"]);
    }

    #[test]
    fn test_widening_retries_when_narrow_is_empty() {
        let classifier = RegionClassifier::default();
        let mut calls = Vec::new();
        let (pass, found) = classifier.widening(|pass| {
            calls.push(pass);
            match pass {
                TitleBlockPass::Narrow => Vec::new(),
                TitleBlockPass::Wide => vec![1],
            }
        });
        assert_eq!(calls, vec![TitleBlockPass::Narrow, TitleBlockPass::Wide]);
        assert_eq!(pass, Some(TitleBlockPass::Wide));
        assert_eq!(found, vec![1]);
    }

    #[test]
    fn test_widening_exhausted() {
        let classifier = RegionClassifier::default();
        let (pass, found): (_, Vec<u8>) = classifier.widening(|_| Vec::new());
        assert_eq!(pass, None);
        assert!(found.is_empty());
    }
}
