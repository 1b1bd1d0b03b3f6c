use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::{LoadError, Mapping, Value};

/// One YAML document from a multi-document stream.
///
/// `raw` is the canonical serialization of `content` (keys sorted at every
/// level), so two documents with the same `raw` are considered identical no
/// matter how their source text was laid out.
#[derive(Clone, Debug, PartialEq)]
pub struct Document {
    content: Value,
    raw: String,
    key: String,
}

impl Document {
    /// Builds a document from its root mapping, computing the canonical form.
    ///
    /// ```
    /// # use yamldiff_core::{Document, Mapping, Value};
    /// let mut root = Mapping::new();
    /// root.insert("kind".into(), Value::from("ConfigMap"));
    /// let doc = Document::new(root)?;
    /// assert_eq!(doc.raw(), "kind: ConfigMap\n");
    /// assert!(doc.key().is_empty());
    /// # Ok::<(), yamldiff_core::LoadError>(())
    /// ```
    pub fn new(content: Mapping) -> Result<Self, LoadError> {
        let content = Value::Mapping(content);
        let raw = serde_yaml::to_string(&content.to_canonical_yaml())?;
        Ok(Self { content, raw, key: String::new() })
    }

    /// The decoded document; always a [`Value::Mapping`].
    #[must_use]
    pub fn content(&self) -> &Value {
        &self.content
    }

    /// Canonical YAML text of the content.
    #[must_use]
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Identifier assigned by the matcher; empty until matched.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    pub(crate) fn with_key(mut self, key: String) -> Self {
        self.key = key;
        self
    }
}

/// Parses a (possibly multi-document) YAML stream into documents.
///
/// Empty documents decode as empty mappings. Any other non-mapping root is
/// rejected, as is malformed YAML; no partial result is returned.
///
/// ```
/// # use yamldiff_core::parse_documents;
/// let docs = parse_documents("a: 1\n---\nb: 2\n")?;
/// assert_eq!(docs.len(), 2);
/// assert_eq!(docs[1].raw(), "b: 2\n");
/// # Ok::<(), yamldiff_core::LoadError>(())
/// ```
pub fn parse_documents(input: &str) -> Result<Vec<Document>, LoadError> {
    if input.trim().is_empty() {
        return Ok(Vec::new());
    }
    let mut documents = Vec::new();
    for (index, deserializer) in serde_yaml::Deserializer::from_str(input).enumerate() {
        let raw = serde_yaml::Value::deserialize(deserializer)?;
        let content = match Value::from_yaml_value(raw)? {
            Value::Mapping(map) => map,
            Value::Null => Mapping::new(),
            other => return Err(LoadError::NotAMapping { index, found: other.kind() }),
        };
        documents.push(Document::new(content)?);
    }
    tracing::debug!(count = documents.len(), "parsed YAML documents");
    Ok(documents)
}

/// Reads and parses a YAML file.
pub fn read_documents(path: impl AsRef<Path>) -> Result<Vec<Document>, LoadError> {
    let path = path.as_ref();
    let text = fs::read_to_string(path)
        .map_err(|source| LoadError::Io { path: path.to_path_buf(), source })?;
    parse_documents(&text)
}
