//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the core to external systems:
//! - `storage` - Key-value persistence (in-memory, file)
//! - `document` - Markdown to HTML rendering (pulldown-cmark)

pub mod document;
pub mod storage;

pub use document::PulldownMarkdownRenderer;
pub use storage::{FileKeyValueStore, InMemoryKeyValueStore};
