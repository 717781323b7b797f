//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the core and the outside world. Adapters implement these ports.
//!
//! ## Persistence Ports
//!
//! - `KeyValueStore` - Durable string store holding the serialized specification

mod key_value_store;

pub use key_value_store::{KeyValueStore, StorageError};
