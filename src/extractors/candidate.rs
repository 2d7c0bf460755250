//! Field candidate scoring.
//!
//! The scorer proposes ranked values for one semantic field at a time. All
//! three targets share the same shape: exclusion rules run first and drop an
//! item outright, then independent additive rules award points, and the
//! survivors are sorted by score with ties going to the item closest to the
//! region anchor.
//!
//! | Target          | Source        | Tiering                                     |
//! |-----------------|---------------|---------------------------------------------|
//! | Title           | fragments     | position, font size, length, vocabulary     |
//! | Drawing number  | line runs     | title block (narrow, then wide) over page |
//! | Revision code   | fragment tokens  | title block (narrow, then wide) over page |

use crate::config::ScoringConfig;
use crate::extractors::patterns::{
    self, contains_drawing_number, find_drawing_numbers, is_boilerplate, is_revision_code,
    is_revision_label, is_scale, is_structural_label, is_title_noise,
};
use crate::geometry::{PageSize, Point, Rect};
use crate::layout::{Line, PageLayout, RegionClassifier, TextFragment, TextItem, TitleBlockPass};
use std::cmp::Ordering;
use std::collections::HashSet;

/// Semantic field a candidate is proposed for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldTarget {
    /// Drawing title
    Title,
    /// Structured drawing number
    DrawingNumber,
    /// Current revision code from the title block
    RevisionCode,
}

/// Where on the page a candidate was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CandidateOrigin {
    /// Inside the title block, with the bounds that found it
    TitleBlock(TitleBlockPass),
    /// Inside the title search band
    TitleBand,
    /// Anywhere else on the page
    Page,
}

/// A provisional value for one field.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    /// Proposed value
    pub text: String,
    /// Additive score; higher is better
    pub score: i32,
    /// Bounding box of the source fragment or line
    pub source_bbox: Rect,
    /// Font size of the source
    pub font_size: f32,
    /// Region the candidate came from
    pub origin: CandidateOrigin,
}

/// Reason an item was rejected before scoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exclusion {
    /// Shorter than the minimum length
    TooShort,
    /// Longer than the maximum length
    TooLong,
    /// Font smaller than the minimum size
    SmallFont,
    /// A structural label of the title block
    StructuralLabel,
    /// Company or address boilerplate
    Boilerplate,
    /// Contains a full drawing number
    DrawingNumber,
    /// Bare numbers, dates or abbreviation clusters
    Noise,
}

/// Scores fragments and lines against field targets.
#[derive(Debug, Clone, Default)]
pub struct CandidateScorer {
    config: ScoringConfig,
    regions: RegionClassifier,
}

impl CandidateScorer {
    /// Create a scorer.
    pub fn new(config: ScoringConfig, regions: RegionClassifier) -> Self {
        Self { config, regions }
    }

    /// Scoring configuration in use.
    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    /// Ranked candidates for `target` on a normalized page.
    pub fn score_candidates(&self, layout: &PageLayout, target: FieldTarget) -> Vec<Candidate> {
        let mut candidates = match target {
            FieldTarget::Title => self.title_candidates(&layout.fragments, &layout.size),
            FieldTarget::DrawingNumber => self.drawing_number_candidates(layout),
            FieldTarget::RevisionCode => self.revision_code_candidates(layout),
        };
        self.rank(&mut candidates, &layout.size, target);
        candidates
    }

    /// Ranked title candidates drawn from arbitrary items.
    pub fn score_title_items<T: TextItem>(&self, items: &[T], page: &PageSize) -> Vec<Candidate> {
        let mut candidates = self.title_candidates(items, page);
        self.rank(&mut candidates, page, FieldTarget::Title);
        candidates
    }

    /// First title exclusion rule that rejects `item`, if any.
    ///
    /// Rules run in order: length and font size, the label and boilerplate
    /// denylist, the drawing-number grammar, then noise shapes.
    pub fn title_exclusion(&self, item: &impl TextItem) -> Option<Exclusion> {
        let text = item.text().trim();
        let len = text.chars().count();
        if len < self.config.min_text_len {
            return Some(Exclusion::TooShort);
        }
        if len > self.config.max_text_len {
            return Some(Exclusion::TooLong);
        }
        let font_size = item.font_size();
        if self.config.min_font_size > 0.0 && font_size > 0.0 && font_size < self.config.min_font_size {
            return Some(Exclusion::SmallFont);
        }
        if is_structural_label(text) {
            return Some(Exclusion::StructuralLabel);
        }
        if is_boilerplate(text) {
            return Some(Exclusion::Boilerplate);
        }
        if contains_drawing_number(text) {
            return Some(Exclusion::DrawingNumber);
        }
        if is_title_noise(text) {
            return Some(Exclusion::Noise);
        }
        None
    }

    /// Title score of one item, or `None` when an exclusion rule rejects it.
    pub fn title_score(&self, item: &impl TextItem, page: &PageSize) -> Option<i32> {
        if let Some(exclusion) = self.title_exclusion(item) {
            log::trace!("Title candidate {:?} excluded: {:?}", item.text(), exclusion);
            return None;
        }

        let weights = &self.config.weights;
        let text = item.text().trim();
        let mut score = 0;

        let margin = page.width * (1.0 - self.config.center_band_fraction) / 2.0;
        let center_x = item.bbox().center().x;
        if center_x >= margin && center_x <= page.width - margin {
            score += weights.centered;
        }

        let font_size = item.font_size();
        if font_size >= self.config.large_font_size {
            score += weights.large_font;
        } else if font_size >= self.config.medium_font_size {
            score += weights.medium_font;
        }

        let len = text.chars().count();
        if len >= self.config.long_text_len {
            score += weights.long_text;
        } else if len >= self.config.medium_text_len {
            score += weights.medium_text;
        }

        if self.has_keyword(text) {
            score += weights.keyword;
        }

        Some(score)
    }

    /// Whether an item scores positively as a title.
    pub fn is_title_like(&self, item: &impl TextItem, page: &PageSize) -> bool {
        self.title_score(item, page).is_some_and(|score| score > 0)
    }

    fn has_keyword(&self, text: &str) -> bool {
        let lower = text.to_lowercase();
        self.config.keywords.iter().any(|k| lower.contains(k.as_str()))
    }

    fn title_candidates<T: TextItem>(&self, items: &[T], page: &PageSize) -> Vec<Candidate> {
        items
            .iter()
            .filter_map(|item| {
                let score = self.title_score(item, page)?;
                let origin = if self.regions.in_title_band(&item.bbox(), page) {
                    CandidateOrigin::TitleBand
                } else {
                    CandidateOrigin::Page
                };
                Some(Candidate {
                    text: item.text().trim().to_string(),
                    score,
                    source_bbox: item.bbox(),
                    font_size: item.font_size(),
                    origin,
                })
            })
            .collect()
    }

    fn drawing_number_candidates(&self, layout: &PageLayout) -> Vec<Candidate> {
        let weights = &self.config.weights;
        // Runs rejoin numbers the provider split into touching fragments.
        let runs: Vec<TextFragment> = layout.lines.iter().flat_map(Line::runs).collect();

        let (pass, mut candidates) = self.regions.widening(|pass| {
            runs.iter()
                .filter(|run| self.regions.in_title_block(&run.bbox, &layout.size, pass))
                .flat_map(|run| numbers_in(run, weights.title_block_tier, CandidateOrigin::TitleBlock(pass)))
                .collect()
        });
        if pass.is_none() {
            log::debug!("No drawing number in the title block, searching the whole page");
        }

        // Page-wide matches rank below any title block match.
        for run in &runs {
            candidates.extend(numbers_in(run, weights.page_tier, CandidateOrigin::Page));
        }

        dedup_by_text(candidates)
    }

    fn revision_code_candidates(&self, layout: &PageLayout) -> Vec<Candidate> {
        let labels: Vec<&TextFragment> = layout
            .fragments
            .iter()
            .filter(|f| is_revision_label(&f.content))
            .collect();

        let (_, mut candidates) = self.regions.widening(|pass| {
            self.code_tokens(layout, &labels, |bbox| {
                self.regions
                    .in_title_block(bbox, &layout.size, pass)
                    .then_some((self.config.weights.title_block_tier, CandidateOrigin::TitleBlock(pass)))
            })
        });

        if candidates.is_empty() {
            log::debug!("No revision code in the title block, searching the whole page");
            candidates = self.code_tokens(layout, &labels, |_| {
                Some((self.config.weights.page_tier, CandidateOrigin::Page))
            });
        }

        dedup_by_text(candidates)
    }

    /// Revision code tokens of every fragment that `region` accepts.
    ///
    /// Tokens that open a `CODE DATE` history row on their line are skipped:
    /// they belong to the revision table, not to the current revision field.
    fn code_tokens(
        &self,
        layout: &PageLayout,
        labels: &[&TextFragment],
        region: impl Fn(&Rect) -> Option<(i32, CandidateOrigin)>,
    ) -> Vec<Candidate> {
        let weights = &self.config.weights;
        let mut candidates = Vec::new();

        for line in &layout.lines {
            let history_codes = history_codes(line);
            let line_tokens: Vec<&str> = line.text.split_whitespace().collect();

            for fragment in &line.fragments {
                let Some((tier, origin)) = region(&fragment.bbox) else {
                    continue;
                };
                for raw in fragment.content.split_whitespace() {
                    let token = trim_token(raw);
                    if !is_revision_code(token) || history_codes.contains(token) {
                        continue;
                    }

                    let mut score = tier;
                    if fragment.content.trim() == token {
                        score += weights.standalone_code;
                    }
                    if follows_scale(&line_tokens, token) {
                        score += weights.scale_prefix;
                    }
                    if labels.iter().any(|label| labels_fragment(label, fragment)) {
                        score += weights.revision_label;
                    }
                    if fragment.font_size >= self.config.large_font_size {
                        score += weights.large_font;
                    } else if fragment.font_size >= self.config.medium_font_size {
                        score += weights.medium_font;
                    }

                    candidates.push(Candidate {
                        text: token.to_string(),
                        score,
                        source_bbox: fragment.bbox,
                        font_size: fragment.font_size,
                        origin,
                    });
                }
            }
        }

        candidates
    }

    fn anchor(&self, page: &PageSize, target: FieldTarget) -> Point {
        match target {
            FieldTarget::Title => self.regions.title_band_anchor(page),
            FieldTarget::DrawingNumber | FieldTarget::RevisionCode => self.regions.title_block_anchor(page),
        }
    }

    /// Sort by descending score, ties to the smaller offset from the anchor.
    fn rank(&self, candidates: &mut [Candidate], page: &PageSize, target: FieldTarget) {
        let anchor = self.anchor(page, target);
        candidates.sort_by(|a, b| {
            b.score.cmp(&a.score).then_with(|| {
                let da = a.source_bbox.center().distance_to(&anchor);
                let db = b.source_bbox.center().distance_to(&anchor);
                da.partial_cmp(&db).unwrap_or(Ordering::Equal)
            })
        });
    }
}

fn numbers_in(item: &impl TextItem, score: i32, origin: CandidateOrigin) -> Vec<Candidate> {
    find_drawing_numbers(item.text())
        .into_iter()
        .map(|number| Candidate {
            text: number.to_string(),
            score,
            source_bbox: item.bbox(),
            font_size: item.font_size(),
            origin,
        })
        .collect()
}

/// Keep the highest-scoring candidate per distinct text, in first-seen order.
fn dedup_by_text(candidates: Vec<Candidate>) -> Vec<Candidate> {
    let mut kept: Vec<Candidate> = Vec::with_capacity(candidates.len());
    for candidate in candidates {
        match kept.iter_mut().find(|k| k.text == candidate.text) {
            Some(existing) if existing.score < candidate.score => *existing = candidate,
            Some(_) => {},
            None => kept.push(candidate),
        }
    }
    kept
}

fn history_codes(line: &Line) -> HashSet<&str> {
    patterns::RE_ENTRY_START
        .captures_iter(&line.text)
        .filter_map(|caps| caps.get(1).map(|m| m.as_str()))
        .collect()
}

fn trim_token(token: &str) -> &str {
    token.trim_matches(|c: char| matches!(c, '[' | ']' | '(' | ')' | ',' | ';' | ':' | '.'))
}

fn follows_scale(line_tokens: &[&str], token: &str) -> bool {
    line_tokens
        .windows(2)
        .any(|pair| is_scale(pair[0]) && trim_token(pair[1]) == token)
}

/// Whether `label` sits left of `fragment` on its row, or directly above it.
fn labels_fragment(label: &TextFragment, fragment: &TextFragment) -> bool {
    let height = fragment.bbox.height().max(fragment.font_size).max(1.0);
    let same_row = (label.bbox.center_y() - fragment.bbox.center_y()).abs() <= height / 2.0
        && label.bbox.x1 <= fragment.bbox.x0;
    let gap = label.bbox.gap_below(&fragment.bbox);
    let above = gap >= -1.0 && gap <= height * 3.0 && label.bbox.horizontal_overlap(&fragment.bbox) > 0.0;
    same_row || above
}
