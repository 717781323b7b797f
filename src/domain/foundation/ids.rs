//! Strongly-typed identifier value objects.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::{Timestamp, ValidationError};

const SECTION_ID_PREFIX: &str = "section-";

/// Opaque identifier for a section within a specification.
///
/// Minted ids have the shape `section-<counter>-<unix millis>`. Ids read back
/// from persisted data are accepted verbatim (even empty ones) so that
/// validation can report on them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SectionId(String);

impl SectionId {
    /// Creates a SectionId, rejecting blank values.
    pub fn new(id: impl Into<String>) -> Result<Self, ValidationError> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(ValidationError::empty_field("section_id"));
        }
        Ok(Self(id))
    }

    /// Wraps a raw value without validation (persisted data).
    pub fn from_raw(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Mints a fresh id from the store counter and the current instant.
    pub fn mint(counter: u64, at: Timestamp) -> Self {
        Self(format!(
            "{}{}-{}",
            SECTION_ID_PREFIX,
            counter,
            at.as_unix_millis()
        ))
    }

    /// Returns the counter component of a minted id, if this id has that shape.
    pub fn counter(&self) -> Option<u64> {
        let rest = self.0.strip_prefix(SECTION_ID_PREFIX)?;
        let (counter, millis) = rest.split_once('-')?;
        if millis.is_empty() || !millis.chars().all(|c| c.is_ascii_digit()) {
            return None;
        }
        counter.parse().ok()
    }

    /// Returns the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true when the id is blank.
    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Display for SectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for SectionId {
    fn from(s: &str) -> Self {
        Self::from_raw(s)
    }
}
