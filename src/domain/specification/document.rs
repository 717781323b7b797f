//! Specification aggregate - metadata plus ordered sections.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{DomainError, SectionId, Timestamp};

use super::{Metadata, Section};

/// The root document being authored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Specification {
    #[serde(default)]
    pub metadata: Metadata,

    #[serde(default)]
    pub sections: Vec<Section>,
}

impl Specification {
    /// An empty specification with fresh metadata.
    pub fn empty(now: Timestamp, version: impl Into<String>) -> Self {
        Self {
            metadata: Metadata::fresh(now, version),
            sections: Vec::new(),
        }
    }

    /// Parses the JSON interchange format.
    pub fn from_json(json: &str) -> Result<Self, DomainError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Sections sorted by their `order` field. Ties keep sequence order.
    pub fn sorted_sections(&self) -> Vec<&Section> {
        let mut sorted: Vec<&Section> = self.sections.iter().collect();
        sorted.sort_by_key(|s| s.order);
        sorted
    }

    /// Position of the first section with the given id.
    pub fn position_of(&self, id: &SectionId) -> Option<usize> {
        self.sections.iter().position(|s| &s.id == id)
    }

    pub fn section(&self, id: &SectionId) -> Option<&Section> {
        self.sections.iter().find(|s| &s.id == id)
    }

    pub(crate) fn section_mut(&mut self, id: &SectionId) -> Option<&mut Section> {
        self.sections.iter_mut().find(|s| &s.id == id)
    }

    /// Rewrites every `order` to its positional index.
    pub fn renumber(&mut self) {
        for (index, section) in self.sections.iter_mut().enumerate() {
            section.order = index as i64;
        }
    }

    /// True when the `order` values are exactly `0..n-1` in sequence.
    pub fn has_sequential_order(&self) -> bool {
        self.sections
            .iter()
            .enumerate()
            .all(|(index, s)| s.order == index as i64)
    }
}

impl Default for Specification {
    fn default() -> Self {
        Self {
            metadata: Metadata::default(),
            sections: Vec::new(),
        }
    }
}
