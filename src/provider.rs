//! Layout providers.
//!
//! The pipeline never reads PDFs itself. A [`LayoutProvider`] materializes
//! pages as positioned text fragments; everything downstream works from
//! those fragments alone.
//!
//! [`JsonLayoutProvider`] reads the span dumps written by common PDF text
//! dumpers:
//!
//! ```json
//! {
//!   "source": "L01-H01D01-FOS-00-XX-MUP-AR-80050[T0].pdf",
//!   "pages": [
//!     {
//!       "width": 1190.0,
//!       "height": 842.0,
//!       "fragments": [
//!         { "text": "Drawing Title", "x0": 850.0, "y0": 650.0, "x1": 902.0, "y1": 658.0, "size": 8.0 }
//!       ]
//!     }
//!   ]
//! }
//! ```

use crate::error::{Error, Result};
use crate::geometry::PageSize;
use crate::layout::{Page, TextFragment};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Source of positioned text for one document.
pub trait LayoutProvider {
    /// Number of pages in the document.
    fn page_count(&self) -> usize;

    /// Materialize one page (0-based).
    fn page(&self, index: usize) -> Result<Page>;

    /// Name of the document, usually its file name.
    fn name(&self) -> &str;
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct RawFragment {
    text: String,
    x0: f32,
    y0: f32,
    x1: f32,
    y1: f32,
    #[serde(default)]
    size: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct RawPage {
    width: f32,
    height: f32,
    #[serde(default)]
    fragments: Vec<RawFragment>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct RawDump {
    #[serde(default)]
    source: Option<String>,
    pages: Vec<RawPage>,
}

/// Pages loaded from a JSON span dump.
#[derive(Debug, Clone)]
pub struct JsonLayoutProvider {
    name: String,
    pages: Vec<RawPage>,
}

impl JsonLayoutProvider {
    /// Load a dump file.
    ///
    /// The document name is the dump's `source` field, or the dump's file
    /// name when `source` is missing.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let fallback = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        Self::from_json_str(&text, &fallback)
    }

    /// Parse a dump from a string.
    pub fn from_json_str(json: &str, fallback_name: &str) -> Result<Self> {
        let dump: RawDump = serde_json::from_str(json)?;
        let name = dump
            .source
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| fallback_name.to_string());
        log::debug!("Loaded layout dump {} with {} pages", name, dump.pages.len());
        Ok(Self { name, pages: dump.pages })
    }
}

impl LayoutProvider for JsonLayoutProvider {
    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn page(&self, index: usize) -> Result<Page> {
        let raw = self.pages.get(index).ok_or(Error::PageOutOfRange {
            index,
            count: self.pages.len(),
        })?;

        let size = PageSize::new(raw.width, raw.height);
        if !size.is_valid() {
            return Err(Error::MalformedDocument(format!(
                "page {} has invalid size {}x{}",
                index, raw.width, raw.height
            )));
        }

        let fragments = raw
            .fragments
            .iter()
            .map(|f| TextFragment::new(f.text.clone(), f.x0, f.y0, f.x1, f.y1, f.size))
            .collect();
        Ok(Page::new(size, fragments))
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Pages held in memory.
#[derive(Debug, Clone)]
pub struct MemoryLayoutProvider {
    name: String,
    pages: Vec<Page>,
}

impl MemoryLayoutProvider {
    /// Wrap already materialized pages.
    pub fn new(name: impl Into<String>, pages: Vec<Page>) -> Self {
        Self {
            name: name.into(),
            pages,
        }
    }
}

impl LayoutProvider for MemoryLayoutProvider {
    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn page(&self, index: usize) -> Result<Page> {
        let page = self.pages.get(index).ok_or(Error::PageOutOfRange {
            index,
            count: self.pages.len(),
        })?;
        if !page.size.is_valid() {
            return Err(Error::MalformedDocument(format!("page {} has invalid size", index)));
        }
        Ok(page.clone())
    }

    fn name(&self) -> &str {
        &self.name
    }
}
