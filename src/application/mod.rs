//! Application layer - the document store and its notifications.
//!
//! The store orchestrates the domain services (registry, validator, exporter)
//! around one live specification and coordinates persistence through the
//! `KeyValueStore` port.

mod document_store;
mod events;

pub use document_store::{DocumentStore, StoreSettings, DEFAULT_SECTION_TITLE, DEFAULT_STORAGE_KEY};
pub use events::{EventEmitter, ListenerId, StoreEvent, StoreEventKind, StoreListener};
