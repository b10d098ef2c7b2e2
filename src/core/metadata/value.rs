//! core::metadata::value
//!
//! Front-matter values and the ordered metadata map.
//!
//! # Value Model
//!
//! Front-matter is heterogeneous: most hierarchy fields are strings, `tags`
//! is usually a list, and everything else (numbers, booleans, dates, nested
//! maps) must survive a round-trip untouched. [`MetadataValue`] captures
//! this as a tagged union instead of an untyped blob:
//!
//! - `Text` - a YAML string
//! - `List` - a YAML sequence of strings
//! - `Other` - any other YAML value, carried opaquely
//!
//! # Example
//!
//! ```
//! use vaultkit::core::metadata::{MetadataMap, MetadataValue};
//!
//! let mut map = MetadataMap::new();
//! map.insert("program", "MBA");
//! map.insert("tags", vec!["course".to_string()]);
//!
//! assert_eq!(map.get_text("program"), Some("MBA"));
//! assert!(map.is_missing_or_empty("course"));
//! assert!(matches!(map.get("tags"), Some(MetadataValue::List(_))));
//! ```

use std::borrow::Cow;
use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A single front-matter value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetadataValue {
    /// A string value.
    Text(String),
    /// A list of strings.
    List(Vec<String>),
    /// Any other YAML value (numbers, booleans, null, nested structures).
    Other(serde_yaml::Value),
}

impl MetadataValue {
    /// Whether the value carries no usable content.
    ///
    /// Blank strings, empty lists and YAML `null` are blank.
    pub fn is_blank(&self) -> bool {
        match self {
            MetadataValue::Text(s) => s.trim().is_empty(),
            MetadataValue::List(items) => items.iter().all(|i| i.trim().is_empty()),
            MetadataValue::Other(v) => v.is_null(),
        }
    }

    /// Borrow the value as a string, if it is one.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            MetadataValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// The value as text when it is a YAML scalar string or integer.
    ///
    /// `module: 5` and `module: "5"` both give `"5"`.
    pub fn scalar_text(&self) -> Option<Cow<'_, str>> {
        match self {
            MetadataValue::Text(s) => Some(Cow::Borrowed(s)),
            MetadataValue::Other(serde_yaml::Value::Number(n)) if n.is_u64() || n.is_i64() => {
                Some(Cow::Owned(n.to_string()))
            }
            _ => None,
        }
    }

    /// Flatten the value into a list of strings.
    ///
    /// - `Text` is split on commas and whitespace
    /// - `List` is returned as-is
    /// - scalar `Other` values are stringified, sequences flattened
    ///
    /// Leading `#` markers are stripped and empty entries dropped, so
    /// `"#a, b"` and `["a", "b"]` both give `["a", "b"]`.
    pub fn to_string_list(&self) -> Vec<String> {
        let raw: Vec<String> = match self {
            MetadataValue::Text(s) => s
                .split(|c: char| c == ',' || c.is_whitespace())
                .map(str::to_string)
                .collect(),
            MetadataValue::List(items) => items.clone(),
            MetadataValue::Other(v) => yaml_to_strings(v),
        };

        raw.into_iter()
            .map(|s| s.trim().trim_start_matches('#').trim().to_string())
            .filter(|s| !s.is_empty())
            .collect()
    }
}

fn yaml_to_strings(value: &serde_yaml::Value) -> Vec<String> {
    use serde_yaml::Value;
    match value {
        Value::Null => Vec::new(),
        Value::Bool(b) => vec![b.to_string()],
        Value::Number(n) => vec![n.to_string()],
        Value::String(s) => vec![s.clone()],
        Value::Sequence(items) => items.iter().flat_map(yaml_to_strings).collect(),
        Value::Mapping(_) => Vec::new(),
        Value::Tagged(tagged) => yaml_to_strings(&tagged.value),
    }
}

impl fmt::Display for MetadataValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetadataValue::Text(s) => f.write_str(s),
            MetadataValue::List(items) => write!(f, "[{}]", items.join(", ")),
            MetadataValue::Other(v) => match serde_yaml::to_string(v) {
                Ok(s) => f.write_str(s.trim_end()),
                Err(_) => f.write_str("<unprintable>"),
            },
        }
    }
}

impl From<&str> for MetadataValue {
    fn from(s: &str) -> Self {
        MetadataValue::Text(s.to_string())
    }
}

impl From<String> for MetadataValue {
    fn from(s: String) -> Self {
        MetadataValue::Text(s)
    }
}

impl From<Vec<String>> for MetadataValue {
    fn from(items: Vec<String>) -> Self {
        MetadataValue::List(items)
    }
}

impl From<serde_yaml::Value> for MetadataValue {
    fn from(value: serde_yaml::Value) -> Self {
        match value {
            serde_yaml::Value::String(s) => MetadataValue::Text(s),
            serde_yaml::Value::Sequence(ref items)
                if items.iter().all(serde_yaml::Value::is_string) =>
            {
                MetadataValue::List(
                    items
                        .iter()
                        .filter_map(|i| i.as_str().map(str::to_string))
                        .collect(),
                )
            }
            other => MetadataValue::Other(other),
        }
    }
}

/// Ordered front-matter map.
///
/// Insertion order is preserved, and removal keeps the order of the
/// remaining keys, so a merged map serializes in a stable order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MetadataMap(IndexMap<String, MetadataValue>);

impl MetadataMap {
    /// Create an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a value.
    pub fn get(&self, key: &str) -> Option<&MetadataValue> {
        self.0.get(key)
    }

    /// Look up a string value.
    pub fn get_text(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(MetadataValue::as_text)
    }

    /// Insert or replace a value, keeping the key's original position.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<MetadataValue>) {
        self.0.insert(key.into(), value.into());
    }

    /// Remove a key, preserving the order of the rest.
    pub fn remove(&mut self, key: &str) -> Option<MetadataValue> {
        self.0.shift_remove(key)
    }

    /// Whether the key is present (even if blank).
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Whether the key is absent or holds a blank value.
    pub fn is_missing_or_empty(&self, key: &str) -> bool {
        self.0.get(key).map_or(true, MetadataValue::is_blank)
    }

    /// Iterate entries in order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &MetadataValue)> {
        self.0.iter()
    }

    /// Iterate keys in order.
    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.0.keys()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the map is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<MetadataValue>> FromIterator<(K, V)> for MetadataMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}
