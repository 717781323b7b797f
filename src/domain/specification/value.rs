//! Open-ended section content modelled as a recursive tagged value.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Field name → value mapping. Insertion order is preserved and drives export order.
pub type ContentMap = IndexMap<String, ContentValue>;

/// A value stored in section content.
///
/// Serialized untagged so the JSON interchange format stays a plain JSON document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ContentValue {
    Null,
    Bool(bool),
    Number(serde_json::Number),
    Text(String),
    List(Vec<ContentValue>),
    Map(ContentMap),
}

impl ContentValue {
    /// Loose truthiness used by the "omit empty" rendering policy.
    ///
    /// Null, `false`, zero and the empty string are falsy; every list and map is truthy.
    pub fn is_truthy(&self) -> bool {
        match self {
            ContentValue::Null => false,
            ContentValue::Bool(b) => *b,
            ContentValue::Number(n) => n.as_f64().map(|v| v != 0.0).unwrap_or(true),
            ContentValue::Text(s) => !s.is_empty(),
            ContentValue::List(_) | ContentValue::Map(_) => true,
        }
    }

    /// True for null, booleans, numbers and text.
    pub fn is_scalar(&self) -> bool {
        !matches!(self, ContentValue::List(_) | ContentValue::Map(_))
    }

    pub fn is_null(&self) -> bool {
        matches!(self, ContentValue::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ContentValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[ContentValue]> {
        match self {
            ContentValue::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&ContentMap> {
        match self {
            ContentValue::Map(map) => Some(map),
            _ => None,
        }
    }

    /// Looks up a key when this value is a map.
    pub fn get(&self, key: &str) -> Option<&ContentValue> {
        self.as_map().and_then(|m| m.get(key))
    }

    /// Converts into a `serde_json::Value`.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            ContentValue::Null => serde_json::Value::Null,
            ContentValue::Bool(b) => serde_json::Value::Bool(*b),
            ContentValue::Number(n) => serde_json::Value::Number(n.clone()),
            ContentValue::Text(s) => serde_json::Value::String(s.clone()),
            ContentValue::List(items) => {
                serde_json::Value::Array(items.iter().map(ContentValue::to_json).collect())
            }
            ContentValue::Map(map) => serde_json::Value::Object(
                map.iter().map(|(k, v)| (k.clone(), v.to_json())).collect(),
            ),
        }
    }
}

/// Builds a content map from a JSON object; any other JSON value yields an empty map.
pub fn content_map(value: serde_json::Value) -> ContentMap {
    match ContentValue::from(value) {
        ContentValue::Map(map) => map,
        _ => ContentMap::new(),
    }
}

/// Scalars print raw; lists and maps print as compact JSON.
impl fmt::Display for ContentValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContentValue::Null => write!(f, "null"),
            ContentValue::Bool(b) => write!(f, "{}", b),
            ContentValue::Number(n) => write!(f, "{}", n),
            ContentValue::Text(s) => write!(f, "{}", s),
            ContentValue::List(_) | ContentValue::Map(_) => {
                let json = serde_json::to_string(&self.to_json()).map_err(|_| fmt::Error)?;
                write!(f, "{}", json)
            }
        }
    }
}

impl From<serde_json::Value> for ContentValue {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => ContentValue::Null,
            serde_json::Value::Bool(b) => ContentValue::Bool(b),
            serde_json::Value::Number(n) => ContentValue::Number(n),
            serde_json::Value::String(s) => ContentValue::Text(s),
            serde_json::Value::Array(items) => {
                ContentValue::List(items.into_iter().map(ContentValue::from).collect())
            }
            serde_json::Value::Object(map) => ContentValue::Map(
                map.into_iter()
                    .map(|(k, v)| (k, ContentValue::from(v)))
                    .collect(),
            ),
        }
    }
}

impl From<&str> for ContentValue {
    fn from(s: &str) -> Self {
        ContentValue::Text(s.to_string())
    }
}

impl From<String> for ContentValue {
    fn from(s: String) -> Self {
        ContentValue::Text(s)
    }
}

impl From<bool> for ContentValue {
    fn from(b: bool) -> Self {
        ContentValue::Bool(b)
    }
}

impl From<i64> for ContentValue {
    fn from(n: i64) -> Self {
        ContentValue::Number(n.into())
    }
}

impl From<f64> for ContentValue {
    fn from(n: f64) -> Self {
        serde_json::Number::from_f64(n)
            .map(ContentValue::Number)
            .unwrap_or(ContentValue::Null)
    }
}

impl<T: Into<ContentValue>> From<Vec<T>> for ContentValue {
    fn from(items: Vec<T>) -> Self {
        ContentValue::List(items.into_iter().map(Into::into).collect())
    }
}

impl From<ContentMap> for ContentValue {
    fn from(map: ContentMap) -> Self {
        ContentValue::Map(map)
    }
}
