//! Specification module - the shared data model.
//!
//! A `Specification` is metadata plus an ordered sequence of `Section`s whose
//! content is an open-ended tree of `ContentValue`s. The JSON form of these
//! types is the interchange format used for persistence and export.

mod document;
mod metadata;
mod section;
mod value;

pub use document::Specification;
pub use metadata::{Metadata, MetadataUpdate, DEFAULT_VERSION};
pub use section::{NewSection, Section, SectionUpdate};
pub use value::{content_map, ContentMap, ContentValue};
