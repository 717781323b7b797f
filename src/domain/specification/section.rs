//! Section entity - one titled, typed content block.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{SectionId, Timestamp};

use super::{ContentMap, ContentValue};

/// One content block within a specification.
///
/// `order` is the source of truth for display and export order; the position
/// in the owning sequence is only the default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    #[serde(default)]
    pub id: SectionId,

    /// Template identifier. Not required to resolve to a registered template.
    #[serde(rename = "type", default)]
    pub section_type: String,

    #[serde(default)]
    pub title: String,

    #[serde(default)]
    pub order: i64,

    /// `None` only for persisted data that lacks the key entirely.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<ContentMap>,

    #[serde(default)]
    pub created_at: Timestamp,

    #[serde(default)]
    pub updated_at: Timestamp,
}

impl Section {
    /// Returns true when the content is missing or has no keys.
    pub fn has_empty_content(&self) -> bool {
        self.content.as_ref().map(|c| c.is_empty()).unwrap_or(true)
    }

    /// Iterates over content fields in declaration order.
    pub fn content_fields(&self) -> impl Iterator<Item = (&String, &ContentValue)> {
        self.content.iter().flat_map(|c| c.iter())
    }

    /// Content merged with the section title under the `title` key.
    ///
    /// This is the data handed to template renderers.
    pub fn render_data(&self) -> ContentMap {
        let mut data = self.content.clone().unwrap_or_default();
        data.insert("title".to_string(), ContentValue::Text(self.title.clone()));
        data
    }
}

/// Input for creating a section.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewSection {
    pub title: Option<String>,
    pub content: Option<ContentMap>,
}

impl NewSection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates input with a title.
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            content: None,
        }
    }

    /// Sets the initial content.
    pub fn with_content(mut self, content: ContentMap) -> Self {
        self.content = Some(content);
        self
    }
}

/// Partial update merged shallowly into an existing section.
///
/// The section id is never updatable.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SectionUpdate {
    pub section_type: Option<String>,
    pub title: Option<String>,
    pub order: Option<i64>,
    pub content: Option<ContentMap>,
}

impl SectionUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn section_type(mut self, section_type: impl Into<String>) -> Self {
        self.section_type = Some(section_type.into());
        self
    }

    pub fn order(mut self, order: i64) -> Self {
        self.order = Some(order);
        self
    }

    /// Replaces the whole content mapping (shallow merge at the section level).
    pub fn content(mut self, content: ContentMap) -> Self {
        self.content = Some(content);
        self
    }

    /// Applies the update and refreshes `updated_at`.
    pub fn apply_to(self, section: &mut Section, now: Timestamp) {
        if let Some(section_type) = self.section_type {
            section.section_type = section_type;
        }
        if let Some(title) = self.title {
            section.title = title;
        }
        if let Some(order) = self.order {
            section.order = order;
        }
        if let Some(content) = self.content {
            section.content = Some(content);
        }
        section.updated_at = now;
    }
}
