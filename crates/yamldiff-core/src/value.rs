use std::fmt;

use indexmap::IndexMap;
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};
use serde_yaml::Value as YamlValue;

use crate::{LoadError, Number};

/// Mapping keyed by field name, preserving the order keys were written in.
///
/// Equality ignores order; only display and serialization observe it.
pub type Mapping = IndexMap<String, Value>;

/// The recursive data model documents are decoded into.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    /// YAML `null`, `~`, or an empty node.
    Null,
    /// YAML boolean.
    Bool(bool),
    /// YAML integer or float.
    Number(Number),
    /// YAML string scalar.
    String(String),
    /// Ordered sequence.
    Sequence(Vec<Value>),
    /// Key-value mapping with unique string keys.
    Mapping(Mapping),
}

impl Value {
    /// Decodes a serde YAML value.
    ///
    /// Scalar keys are stringified, tags are dropped in favor of the tagged
    /// value, and sequence or mapping keys are rejected.
    ///
    /// ```
    /// # use yamldiff_core::Value;
    /// let raw: serde_yaml::Value = serde_yaml::from_str("a: [1, true]")?;
    /// let value = Value::from_yaml_value(raw)?;
    /// assert_eq!(value.to_string(), "{a: [1, true]}");
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn from_yaml_value(value: YamlValue) -> Result<Self, LoadError> {
        match value {
            YamlValue::Null => Ok(Self::Null),
            YamlValue::Bool(v) => Ok(Self::Bool(v)),
            YamlValue::Number(n) => Ok(Self::Number(Number::from_yaml(&n))),
            YamlValue::String(s) => Ok(Self::String(s)),
            YamlValue::Sequence(seq) => {
                let mut items = Vec::with_capacity(seq.len());
                for item in seq {
                    items.push(Self::from_yaml_value(item)?);
                }
                Ok(Self::Sequence(items))
            }
            YamlValue::Mapping(map) => {
                let mut mapping = Mapping::with_capacity(map.len());
                for (key, value) in map {
                    let key = mapping_key(key)?;
                    if mapping.contains_key(&key) {
                        return Err(LoadError::DuplicateKey { key });
                    }
                    mapping.insert(key, Self::from_yaml_value(value)?);
                }
                Ok(Self::Mapping(mapping))
            }
            YamlValue::Tagged(tagged) => Self::from_yaml_value(tagged.value),
        }
    }

    /// Converts into a serde YAML value with every mapping's keys sorted.
    ///
    /// Two values that differ only in key order produce identical output.
    #[must_use]
    pub fn to_canonical_yaml(&self) -> YamlValue {
        match self {
            Self::Null => YamlValue::Null,
            Self::Bool(v) => YamlValue::Bool(*v),
            Self::Number(n) => YamlValue::Number(n.to_yaml()),
            Self::String(s) => YamlValue::String(s.clone()),
            Self::Sequence(items) => {
                YamlValue::Sequence(items.iter().map(Self::to_canonical_yaml).collect())
            }
            Self::Mapping(map) => {
                let mut keys: Vec<&String> = map.keys().collect();
                keys.sort();
                let mut out = serde_yaml::Mapping::with_capacity(map.len());
                for key in keys {
                    out.insert(YamlValue::String(key.clone()), map[key].to_canonical_yaml());
                }
                YamlValue::Mapping(out)
            }
        }
    }

    /// Returns the mapping when this value is one.
    #[must_use]
    pub fn as_mapping(&self) -> Option<&Mapping> {
        match self {
            Self::Mapping(map) => Some(map),
            _ => None,
        }
    }

    /// Returns the string content when this value is a string scalar.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Looks up a direct child of a mapping.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_mapping().and_then(|map| map.get(key))
    }

    /// Short name of the variant, used in error messages.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "boolean",
            Self::Number(_) => "number",
            Self::String(_) => "string",
            Self::Sequence(_) => "sequence",
            Self::Mapping(_) => "mapping",
        }
    }

    /// Go-template style truthiness: empty, zero, false and null are false.
    #[must_use]
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Null => false,
            Self::Bool(v) => *v,
            Self::Number(n) => !n.is_zero(),
            Self::String(s) => !s.is_empty(),
            Self::Sequence(items) => !items.is_empty(),
            Self::Mapping(map) => !map.is_empty(),
        }
    }

    /// Renders with mapping keys sorted, so the result is independent of
    /// the order keys were written in. Leaf comparisons use this form.
    ///
    /// ```
    /// # use yamldiff_core::{Mapping, Value};
    /// let mut map = Mapping::new();
    /// map.insert("b".into(), Value::Bool(true));
    /// map.insert("a".into(), Value::Null);
    /// let value = Value::Mapping(map);
    /// assert_eq!(value.to_string(), "{b: true, a: null}");
    /// assert_eq!(value.render_sorted(), "{a: null, b: true}");
    /// ```
    #[must_use]
    pub fn render_sorted(&self) -> String {
        let mut out = String::new();
        // Writing into a String cannot fail.
        let _ = self.write_flow(&mut out, true);
        out
    }

    fn write_flow<W: fmt::Write>(&self, out: &mut W, sorted: bool) -> fmt::Result {
        match self {
            Self::Null => out.write_str("null"),
            Self::Bool(v) => write!(out, "{v}"),
            Self::Number(n) => write!(out, "{n}"),
            Self::String(s) => out.write_str(s),
            Self::Sequence(items) => {
                out.write_char('[')?;
                for (idx, item) in items.iter().enumerate() {
                    if idx > 0 {
                        out.write_str(", ")?;
                    }
                    item.write_flow(out, sorted)?;
                }
                out.write_char(']')
            }
            Self::Mapping(map) => {
                let mut entries: Vec<(&String, &Value)> = map.iter().collect();
                if sorted {
                    entries.sort_by(|a, b| a.0.cmp(b.0));
                }
                out.write_char('{')?;
                for (idx, (key, value)) in entries.into_iter().enumerate() {
                    if idx > 0 {
                        out.write_str(", ")?;
                    }
                    write!(out, "{key}: ")?;
                    value.write_flow(out, sorted)?;
                }
                out.write_char('}')
            }
        }
    }
}

impl fmt::Display for Value {
    /// Flow-style rendering in insertion order. Strings are written verbatim.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_flow(f, false)
    }
}

impl Serialize for Value {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Self::Null => serializer.serialize_unit(),
            Self::Bool(v) => serializer.serialize_bool(*v),
            Self::Number(n) => n.serialize(serializer),
            Self::String(s) => serializer.serialize_str(s),
            Self::Sequence(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Self::Mapping(entries) => {
                let mut map = serializer.serialize_map(Some(entries.len()))?;
                for (key, value) in entries {
                    map.serialize_entry(key, value)?;
                }
                map.end()
            }
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Number(Number::Int(value))
    }
}

impl From<Mapping> for Value {
    fn from(value: Mapping) -> Self {
        Self::Mapping(value)
    }
}

fn mapping_key(key: YamlValue) -> Result<String, LoadError> {
    match key {
        YamlValue::String(s) => Ok(s),
        YamlValue::Null => Ok("null".to_string()),
        YamlValue::Bool(v) => Ok(v.to_string()),
        YamlValue::Number(n) => Ok(Number::from_yaml(&n).to_string()),
        YamlValue::Tagged(tagged) => mapping_key(tagged.value),
        YamlValue::Sequence(_) => Err(LoadError::UnsupportedKey { found: "sequence" }),
        YamlValue::Mapping(_) => Err(LoadError::UnsupportedKey { found: "mapping" }),
    }
}
