//! Project phase classification.
//!
//! The phase printed on a sheet comes from a closed vocabulary of five
//! project-delivery stages. Phases are tried in priority order against the
//! whole page text; the first one found wins.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Project-delivery stage of a drawing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TablePhase {
    /// Concept Design
    ConceptDesign,
    /// Schematic Design
    SchematicDesign,
    /// Design Development
    DesignDevelopment,
    /// Construction Documents
    ConstructionDocuments,
    /// Construction Procurement, also the default when no phase is printed
    #[default]
    ConstructionProcurement,
}

impl TablePhase {
    /// All phases in match priority order.
    pub const ALL: [TablePhase; 5] = [
        TablePhase::ConceptDesign,
        TablePhase::SchematicDesign,
        TablePhase::DesignDevelopment,
        TablePhase::ConstructionDocuments,
        TablePhase::ConstructionProcurement,
    ];

    /// Printed label of the phase.
    pub fn label(&self) -> &'static str {
        match self {
            TablePhase::ConceptDesign => "Concept Design",
            TablePhase::SchematicDesign => "Schematic Design",
            TablePhase::DesignDevelopment => "Design Development",
            TablePhase::ConstructionDocuments => "Construction Documents",
            TablePhase::ConstructionProcurement => "Construction Procurement",
        }
    }

    /// Phase for a label, ignoring case and surrounding whitespace.
    pub fn from_label(label: &str) -> Option<Self> {
        let label = label.trim();
        Self::ALL.into_iter().find(|p| p.label().eq_ignore_ascii_case(label))
    }
}

impl fmt::Display for TablePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for TablePhase {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

impl<'de> Deserialize<'de> for TablePhase {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let label = String::deserialize(deserializer)?;
        Self::from_label(&label)
            .ok_or_else(|| serde::de::Error::custom(format!("unknown table phase: {}", label)))
    }
}

/// Classify a page by the first phase label found in its text.
///
/// Lines are joined before matching so that a label split across two lines
/// still matches. Falls back to [`TablePhase::ConstructionProcurement`].
///
/// # Examples
///
/// ```
/// use drawing_oxide::extractors::phase::{classify, TablePhase};
///
/// assert_eq!(classify(&["100% DESIGN DEVELOPMENT"]), TablePhase::DesignDevelopment);
/// assert_eq!(classify(&["Pool Enlargement Plan"]), TablePhase::ConstructionProcurement);
/// ```
pub fn classify<S: AsRef<str>>(lines: &[S]) -> TablePhase {
    let text = lines
        .iter()
        .map(|l| l.as_ref().split_whitespace().collect::<Vec<_>>().join(" "))
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase();

    match TablePhase::ALL
        .into_iter()
        .find(|phase| text.contains(&phase.label().to_lowercase()))
    {
        Some(phase) => phase,
        None => {
            log::debug!("No phase label on page, defaulting to {}", TablePhase::default());
            TablePhase::default()
        },
    }
}
