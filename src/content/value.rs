//! Opaque payload container for rule bodies.
//!
//! The catalog never inspects rule metadata; it only needs a value tree that
//! survives the binary codec and can be rendered as JSON for tooling.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A structured value of unknown shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub enum ContentValue {
    #[default]
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
    List(Vec<ContentValue>),
    Map(BTreeMap<String, ContentValue>),
}

impl ContentValue {
    /// Build an empty map value.
    pub fn map() -> Self {
        ContentValue::Map(BTreeMap::new())
    }

    /// Look up a key when this value is a map.
    pub fn get(&self, key: &str) -> Option<&ContentValue> {
        match self {
            ContentValue::Map(entries) => entries.get(key),
            _ => None,
        }
    }

    /// Insert a key when this value is a map. Returns false for other variants.
    pub fn insert(&mut self, key: impl Into<String>, value: ContentValue) -> bool {
        match self {
            ContentValue::Map(entries) => {
                entries.insert(key.into(), value);
                true
            }
            _ => false,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ContentValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Find the first value the binary codec cannot round-trip.
    ///
    /// Returns a dotted path to the offending value (`$` is the root).
    pub fn find_unsupported(&self) -> Option<String> {
        fn walk(value: &ContentValue, path: &mut String) -> bool {
            match value {
                ContentValue::Float(f) => !f.is_finite(),
                ContentValue::List(items) => {
                    for (i, item) in items.iter().enumerate() {
                        let len = path.len();
                        path.push_str(&format!("[{}]", i));
                        if walk(item, path) {
                            return true;
                        }
                        path.truncate(len);
                    }
                    false
                }
                ContentValue::Map(entries) => {
                    for (key, item) in entries {
                        let len = path.len();
                        path.push('.');
                        path.push_str(key);
                        if walk(item, path) {
                            return true;
                        }
                        path.truncate(len);
                    }
                    false
                }
                _ => false,
            }
        }

        let mut path = String::from("$");
        if walk(self, &mut path) {
            Some(path)
        } else {
            None
        }
    }
}

impl From<&str> for ContentValue {
    fn from(s: &str) -> Self {
        ContentValue::String(s.to_string())
    }
}

impl From<String> for ContentValue {
    fn from(s: String) -> Self {
        ContentValue::String(s)
    }
}

impl From<bool> for ContentValue {
    fn from(b: bool) -> Self {
        ContentValue::Bool(b)
    }
}

impl From<i64> for ContentValue {
    fn from(i: i64) -> Self {
        ContentValue::Integer(i)
    }
}

impl From<f64> for ContentValue {
    fn from(f: f64) -> Self {
        ContentValue::Float(f)
    }
}

impl From<toml::Value> for ContentValue {
    fn from(value: toml::Value) -> Self {
        match value {
            toml::Value::String(s) => ContentValue::String(s),
            toml::Value::Integer(i) => ContentValue::Integer(i),
            toml::Value::Float(f) => ContentValue::Float(f),
            toml::Value::Boolean(b) => ContentValue::Bool(b),
            toml::Value::Datetime(dt) => ContentValue::String(dt.to_string()),
            toml::Value::Array(items) => {
                ContentValue::List(items.into_iter().map(ContentValue::from).collect())
            }
            toml::Value::Table(table) => ContentValue::Map(
                table
                    .into_iter()
                    .map(|(k, v)| (k, ContentValue::from(v)))
                    .collect(),
            ),
        }
    }
}

impl From<serde_json::Value> for ContentValue {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => ContentValue::Null,
            serde_json::Value::Bool(b) => ContentValue::Bool(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => ContentValue::Integer(i),
                // u64 beyond i64 range and real numbers both land here
                None => ContentValue::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            serde_json::Value::String(s) => ContentValue::String(s),
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

impl From<&ContentValue> for serde_json::Value {
    fn from(value: &ContentValue) -> Self {
        match value {
            ContentValue::Null => serde_json::Value::Null,
            ContentValue::Bool(b) => serde_json::Value::Bool(*b),
            ContentValue::Integer(i) => serde_json::Value::from(*i),
            ContentValue::Float(f) => serde_json::Number::from_f64(*f)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            ContentValue::String(s) => serde_json::Value::String(s.clone()),
            ContentValue::List(items) => {
                serde_json::Value::Array(items.iter().map(serde_json::Value::from).collect())
            }
            ContentValue::Map(entries) => serde_json::Value::Object(
                entries
                    .iter()
                    .map(|(k, v)| (k.clone(), serde_json::Value::from(v)))
                    .collect(),
            ),
        }
    }
}
