//! Templates module - section schemas and reusable rendering blocks.
//!
//! # Components
//!
//! - `TemplateRegistry` - Registration, lookup and rendering by string id
//! - `Template` / `FieldDescriptor` - Field schema of a section type
//! - `Block` - Independently invokable renderer
//! - `Renderable` - The rendering capability both share

mod defaults;
mod registry;
mod template;

pub use registry::{TemplateRegistry, DEFAULT_CODE_LANGUAGE};
pub use template::{Block, FieldDescriptor, FieldType, Renderable, Template};
