//! Template and block definitions.

use indexmap::IndexMap;
use std::fmt;
use std::sync::Arc;

use crate::domain::foundation::DomainError;
use crate::domain::specification::ContentMap;

/// Rendering capability shared by templates with custom output and by blocks.
///
/// Any `Fn(&ContentMap) -> Result<String, DomainError>` closure is a `Renderable`.
pub trait Renderable: Send + Sync {
    fn render(&self, data: &ContentMap) -> Result<String, DomainError>;
}

impl<F> Renderable for F
where
    F: Fn(&ContentMap) -> Result<String, DomainError> + Send + Sync,
{
    fn render(&self, data: &ContentMap) -> Result<String, DomainError> {
        self(data)
    }
}

/// Display semantics of a template field.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FieldType {
    Text,
    Textarea,
    List,
    Code,
    /// Unrecognised type; rendered verbatim without a heading.
    Other(String),
}

impl FieldType {
    pub fn parse(s: &str) -> Self {
        match s {
            "text" => FieldType::Text,
            "textarea" => FieldType::Textarea,
            "list" => FieldType::List,
            "code" => FieldType::Code,
            other => FieldType::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            FieldType::Text => "text",
            FieldType::Textarea => "textarea",
            FieldType::List => "list",
            FieldType::Code => "code",
            FieldType::Other(s) => s,
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Schema entry for one template field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDescriptor {
    pub field_type: FieldType,
    pub label: String,
    pub required: bool,
    /// Fence language for `code` fields.
    pub language: Option<String>,
}

impl FieldDescriptor {
    pub fn new(field_type: FieldType, label: impl Into<String>) -> Self {
        Self {
            field_type,
            label: label.into(),
            required: false,
            language: None,
        }
    }

    pub fn text(label: impl Into<String>) -> Self {
        Self::new(FieldType::Text, label)
    }

    pub fn textarea(label: impl Into<String>) -> Self {
        Self::new(FieldType::Textarea, label)
    }

    pub fn list(label: impl Into<String>) -> Self {
        Self::new(FieldType::List, label)
    }

    pub fn code(label: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            language: Some(language.into()),
            ..Self::new(FieldType::Code, label)
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }
}

/// A named section schema.
///
/// Immutable once registered; re-registering the same id replaces it.
#[derive(Clone)]
pub struct Template {
    /// Assigned by the registry on registration.
    pub id: String,
    pub name: String,
    pub icon: String,
    pub category: String,
    /// Field name → descriptor, in declaration order.
    pub fields: IndexMap<String, FieldDescriptor>,
    /// When present, rendering is delegated entirely to this function.
    pub renderer: Option<Arc<dyn Renderable>>,
}

impl Template {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: String::new(),
            name: name.into(),
            icon: String::new(),
            category: String::new(),
            fields: IndexMap::new(),
            renderer: None,
        }
    }

    pub fn icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = icon.into();
        self
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    /// Appends a field; declaration order is rendering order.
    pub fn field(mut self, name: impl Into<String>, descriptor: FieldDescriptor) -> Self {
        self.fields.insert(name.into(), descriptor);
        self
    }

    /// Delegates rendering to a closure.
    pub fn with_renderer<F>(mut self, render: F) -> Self
    where
        F: Fn(&ContentMap) -> Result<String, DomainError> + Send + Sync + 'static,
    {
        let renderer: Arc<dyn Renderable> = Arc::new(render);
        self.renderer = Some(renderer);
        self
    }

    /// Delegates rendering to an existing renderer.
    pub fn with_renderable(mut self, renderer: Arc<dyn Renderable>) -> Self {
        self.renderer = Some(renderer);
        self
    }

    /// Names of the fields flagged `required`.
    pub fn required_fields(&self) -> impl Iterator<Item = &str> {
        self.fields
            .iter()
            .filter(|(_, d)| d.required)
            .map(|(name, _)| name.as_str())
    }
}

impl fmt::Debug for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Template")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("icon", &self.icon)
            .field("category", &self.category)
            .field("fields", &self.fields)
            .field("custom_renderer", &self.renderer.is_some())
            .finish()
    }
}

/// A reusable renderer invoked explicitly by id.
#[derive(Clone)]
pub struct Block {
    /// Assigned by the registry on registration.
    pub id: String,
    pub name: String,
    pub renderer: Arc<dyn Renderable>,
}

impl Block {
    pub fn new<F>(name: impl Into<String>, render: F) -> Self
    where
        F: Fn(&ContentMap) -> Result<String, DomainError> + Send + Sync + 'static,
    {
        Self::from_renderable(name, Arc::new(render))
    }

    pub fn from_renderable(name: impl Into<String>, renderer: Arc<dyn Renderable>) -> Self {
        Self {
            id: String::new(),
            name: name.into(),
            renderer,
        }
    }
}

impl fmt::Debug for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Block")
            .field("id", &self.id)
            .field("name", &self.name)
            .finish()
    }
}
