//! Configuration for title-block extraction.
//!
//! Every threshold used by the extraction pipeline lives here as a constant
//! configured once per run. Nothing in this module is derived from page
//! content. All structs deserialize with `#[serde(default)]`, so a JSON file
//! only needs to name the values it overrides.

use crate::error::{Error, Result};
use crate::extractors::patterns::DESCRIPTIVE_KEYWORDS;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Line reconstruction settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FragmentConfig {
    /// Vertical tolerance as a fraction of the smaller font size of the two
    /// fragments being compared.
    pub line_tolerance_ratio: f32,

    /// Lower bound on the vertical tolerance, for fragments with no usable
    /// font size.
    pub min_line_tolerance: f32,
}

impl Default for FragmentConfig {
    fn default() -> Self {
        Self {
            line_tolerance_ratio: 0.5,
            min_line_tolerance: 1.0,
        }
    }
}

impl FragmentConfig {
    /// Set the line tolerance ratio.
    pub fn with_line_tolerance_ratio(mut self, ratio: f32) -> Self {
        self.line_tolerance_ratio = ratio;
        self
    }
}

/// Bottom-right rectangle bounds, as fractions of page width and height.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BlockBounds {
    /// Fraction of page width, measured from the right edge
    pub right_fraction: f32,
    /// Fraction of page height, measured from the bottom edge
    pub bottom_fraction: f32,
}

impl BlockBounds {
    /// Create new bounds.
    pub fn new(right_fraction: f32, bottom_fraction: f32) -> Self {
        Self {
            right_fraction,
            bottom_fraction,
        }
    }
}

/// Page-relative region settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegionConfig {
    /// Title search band: top fraction of page height.
    pub title_band_fraction: f32,

    /// Title block bounds tried first.
    pub narrow_title_block: BlockBounds,

    /// Title block bounds tried when the narrow block yields no candidates.
    pub wide_title_block: BlockBounds,
}

impl Default for RegionConfig {
    fn default() -> Self {
        Self {
            title_band_fraction: 0.4,
            narrow_title_block: BlockBounds::new(0.4, 0.3),
            wide_title_block: BlockBounds::new(0.6, 0.7),
        }
    }
}

impl RegionConfig {
    /// Set the title band fraction.
    pub fn with_title_band_fraction(mut self, fraction: f32) -> Self {
        self.title_band_fraction = fraction;
        self
    }

    /// Set the narrow title block bounds.
    pub fn with_narrow_title_block(mut self, bounds: BlockBounds) -> Self {
        self.narrow_title_block = bounds;
        self
    }

    /// Set the wide title block bounds.
    pub fn with_wide_title_block(mut self, bounds: BlockBounds) -> Self {
        self.wide_title_block = bounds;
        self
    }

    fn validate(&self) -> Result<()> {
        let fractions = [
            ("title_band_fraction", self.title_band_fraction),
            ("narrow_title_block.right_fraction", self.narrow_title_block.right_fraction),
            ("narrow_title_block.bottom_fraction", self.narrow_title_block.bottom_fraction),
            ("wide_title_block.right_fraction", self.wide_title_block.right_fraction),
            ("wide_title_block.bottom_fraction", self.wide_title_block.bottom_fraction),
        ];
        for (name, value) in fractions {
            if !(value > 0.0 && value <= 1.0) {
                return Err(Error::InvalidConfig(format!("{} must be in (0, 1], got {}", name, value)));
            }
        }

        if self.narrow_title_block.right_fraction > self.wide_title_block.right_fraction
            || self.narrow_title_block.bottom_fraction > self.wide_title_block.bottom_fraction
        {
            return Err(Error::InvalidConfig(
                "narrow_title_block must not exceed wide_title_block".to_string(),
            ));
        }

        Ok(())
    }
}

/// Additive point weights for candidate scoring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreWeights {
    /// Horizontal center within the middle band of the page
    pub centered: i32,
    /// Font size at or above `large_font_size`
    pub large_font: i32,
    /// Font size at or above `medium_font_size`
    pub medium_font: i32,
    /// Text length at or above `long_text_len`
    pub long_text: i32,
    /// Text length at or above `medium_text_len`
    pub medium_text: i32,
    /// Text contains a descriptive keyword
    pub keyword: i32,
    /// Drawing number found inside the title block
    pub title_block_tier: i32,
    /// Drawing number found elsewhere on the page
    pub page_tier: i32,
    /// Revision code is the whole fragment
    pub standalone_code: i32,
    /// Revision code sits next to a `Rev`/`Revision` label
    pub revision_label: i32,
    /// Revision code follows a scale token such as `1:50`
    pub scale_prefix: i32,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            centered: 20,
            large_font: 15,
            medium_font: 10,
            long_text: 15,
            medium_text: 8,
            keyword: 25,
            title_block_tier: 100,
            page_tier: 50,
            standalone_code: 30,
            revision_label: 20,
            scale_prefix: 20,
        }
    }
}

/// Candidate scoring settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Minimum trimmed text length for a title candidate
    pub min_text_len: usize,
    /// Maximum trimmed text length for a title candidate
    pub max_text_len: usize,
    /// Minimum font size for a title candidate (0 disables the check)
    pub min_font_size: f32,
    /// Width of the centered band, as a fraction of page width
    pub center_band_fraction: f32,
    /// Font size threshold for `large_font`
    pub large_font_size: f32,
    /// Font size threshold for `medium_font`
    pub medium_font_size: f32,
    /// Length threshold for `long_text`
    pub long_text_len: usize,
    /// Length threshold for `medium_text`
    pub medium_text_len: usize,
    /// Descriptive vocabulary, matched case-insensitively
    pub keywords: Vec<String>,
    /// Point weights
    pub weights: ScoreWeights,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            min_text_len: 4,
            max_text_len: 100,
            min_font_size: 9.0,
            center_band_fraction: 0.7,
            large_font_size: 12.0,
            medium_font_size: 10.0,
            long_text_len: 20,
            medium_text_len: 10,
            keywords: DESCRIPTIVE_KEYWORDS.iter().map(|k| k.to_string()).collect(),
            weights: ScoreWeights::default(),
        }
    }
}

impl ScoringConfig {
    /// Set the minimum font size for title candidates.
    pub fn with_min_font_size(mut self, size: f32) -> Self {
        self.min_font_size = size;
        self
    }

    /// Replace the descriptive vocabulary.
    pub fn with_keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.keywords = keywords.into_iter().map(Into::into).collect();
        self
    }
}

/// Title reconstruction settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TitleConfig {
    /// Lines examined after the "Drawing Title" label
    pub max_lookahead: usize,
    /// Maximum vertical gap to a wrapped continuation fragment
    pub neighbor_max_gap: f32,
    /// Maximum left-edge offset to a wrapped continuation fragment
    pub neighbor_x_tolerance: f32,
    /// Slack left of the label column when restricting lines to it
    pub column_slack: f32,
}

impl Default for TitleConfig {
    fn default() -> Self {
        Self {
            max_lookahead: 12,
            neighbor_max_gap: 12.0,
            neighbor_x_tolerance: 20.0,
            column_slack: 10.0,
        }
    }
}

impl TitleConfig {
    /// Set the label look-ahead.
    pub fn with_max_lookahead(mut self, lines: usize) -> Self {
        self.max_lookahead = lines;
        self
    }

    /// Set the wrapped-neighbor search window.
    pub fn with_neighbor_window(mut self, max_gap: f32, x_tolerance: f32) -> Self {
        self.neighbor_max_gap = max_gap;
        self.neighbor_x_tolerance = x_tolerance;
        self
    }
}

/// Revision history parsing settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RevisionConfig {
    /// Continuation lines must be shorter than this
    pub continuation_max_len: usize,
    /// Maximum continuation lines appended to one entry
    pub max_continuation_lines: usize,
    /// Accept rows such as `EB0707/03/2024 ...` with a glued checker prefix
    pub accept_prefixed_codes: bool,
}

impl Default for RevisionConfig {
    fn default() -> Self {
        Self {
            continuation_max_len: 40,
            max_continuation_lines: 1,
            accept_prefixed_codes: true,
        }
    }
}

impl RevisionConfig {
    /// Set the continuation length cap.
    pub fn with_continuation_max_len(mut self, len: usize) -> Self {
        self.continuation_max_len = len;
        self
    }

    /// Enable or disable rows with a glued checker prefix.
    pub fn with_prefixed_codes(mut self, accept: bool) -> Self {
        self.accept_prefixed_codes = accept;
        self
    }
}

/// Complete extraction configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Line reconstruction
    pub fragments: FragmentConfig,
    /// Page regions
    pub regions: RegionConfig,
    /// Candidate scoring
    pub scoring: ScoringConfig,
    /// Title reconstruction
    pub title: TitleConfig,
    /// Revision history parsing
    pub revisions: RevisionConfig,
    /// Below this many non-whitespace characters on page 1, page 2 is used
    pub min_page_text_chars: usize,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl ExtractionConfig {
    /// Create a configuration with all defaults.
    pub fn new() -> Self {
        Self {
            fragments: FragmentConfig::default(),
            regions: RegionConfig::default(),
            scoring: ScoringConfig::default(),
            title: TitleConfig::default(),
            revisions: RevisionConfig::default(),
            min_page_text_chars: 100,
        }
    }

    /// Load overrides from a JSON file and validate them.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Parse overrides from a JSON string and validate them.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Set region configuration.
    pub fn with_regions(mut self, regions: RegionConfig) -> Self {
        self.regions = regions;
        self
    }

    /// Set scoring configuration.
    pub fn with_scoring(mut self, scoring: ScoringConfig) -> Self {
        self.scoring = scoring;
        self
    }

    /// Set title configuration.
    pub fn with_title(mut self, title: TitleConfig) -> Self {
        self.title = title;
        self
    }

    /// Set revision configuration.
    pub fn with_revisions(mut self, revisions: RevisionConfig) -> Self {
        self.revisions = revisions;
        self
    }

    /// Set the page-2 fallback threshold.
    pub fn with_min_page_text_chars(mut self, chars: usize) -> Self {
        self.min_page_text_chars = chars;
        self
    }

    /// Check that the configured constants are mutually consistent.
    pub fn validate(&self) -> Result<()> {
        self.regions.validate()?;

        let band = self.scoring.center_band_fraction;
        if !(band > 0.0 && band <= 1.0) {
            return Err(Error::InvalidConfig(format!(
                "center_band_fraction must be in (0, 1], got {}",
                band
            )));
        }
        if self.scoring.min_text_len > self.scoring.max_text_len {
            return Err(Error::InvalidConfig("min_text_len exceeds max_text_len".to_string()));
        }
        if self.fragments.line_tolerance_ratio < 0.0 {
            return Err(Error::InvalidConfig("line_tolerance_ratio must not be negative".to_string()));
        }

        Ok(())
    }
}
