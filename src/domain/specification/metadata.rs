//! Specification metadata.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::Timestamp;

/// Version assigned to freshly created specifications.
pub const DEFAULT_VERSION: &str = "1.0.0";

/// Document-level metadata.
///
/// Empty strings stand for "missing"; validation treats both the same way.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    #[serde(default)]
    pub title: String,

    /// Expected to be semver `MAJOR.MINOR.PATCH`; checked by validation only.
    #[serde(default)]
    pub version: String,

    #[serde(default)]
    pub author: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<Timestamp>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated: Option<Timestamp>,
}

impl Metadata {
    /// Fresh metadata stamped with `now`.
    pub fn fresh(now: Timestamp, version: impl Into<String>) -> Self {
        Self {
            title: String::new(),
            version: version.into(),
            author: String::new(),
            created: Some(now),
            updated: Some(now),
        }
    }
}

impl Default for Metadata {
    fn default() -> Self {
        Self::fresh(Timestamp::now(), DEFAULT_VERSION)
    }
}

/// Partial metadata update, merged shallowly.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MetadataUpdate {
    pub title: Option<String>,
    pub version: Option<String>,
    pub author: Option<String>,
    pub created: Option<Timestamp>,
}

impl MetadataUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    pub fn author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    /// Applies the update; `updated` is always refreshed.
    pub fn apply_to(self, metadata: &mut Metadata, now: Timestamp) {
        if let Some(title) = self.title {
            metadata.title = title;
        }
        if let Some(version) = self.version {
            metadata.version = version;
        }
        if let Some(author) = self.author {
            metadata.author = author;
        }
        if let Some(created) = self.created {
            metadata.created = Some(created);
        }
        metadata.updated = Some(now);
    }
}
