use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use crate::Value;

/// Default identifier path, matching Kubernetes-style manifests.
pub const DEFAULT_IDENTIFIER_PATH: &str = "metadata.name";

/// Dot-separated path to the string field that identifies a document.
///
/// Empty segments (from leading, trailing or doubled dots) are dropped.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IdentifierPath {
    raw: String,
    segments: Vec<String>,
}

impl IdentifierPath {
    /// Parses a dotted path.
    ///
    /// ```
    /// # use yamldiff_core::IdentifierPath;
    /// let path = IdentifierPath::new(".spec..selector.app.");
    /// assert_eq!(path.segments(), ["spec", "selector", "app"]);
    /// ```
    #[must_use]
    pub fn new(path: &str) -> Self {
        let segments =
            path.split('.').filter(|segment| !segment.is_empty()).map(str::to_string).collect();
        Self { raw: path.to_string(), segments }
    }

    /// The path segments in traversal order.
    #[must_use]
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// The path as it was configured.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Walks nested mappings and returns the string found at the path.
    ///
    /// Returns `None` when a segment is missing, an intermediate value is not
    /// a mapping, or the final value is not a string.
    #[must_use]
    pub fn lookup<'a>(&self, root: &'a Value) -> Option<&'a str> {
        let mut current = root;
        for segment in &self.segments {
            current = current.as_mapping()?.get(segment)?;
        }
        current.as_str()
    }

    /// Like [`lookup`](Self::lookup), with absence reported as an empty string.
    #[must_use]
    pub fn extract(&self, root: &Value) -> String {
        self.lookup(root).unwrap_or_default().to_string()
    }
}

impl Default for IdentifierPath {
    fn default() -> Self {
        Self::new(DEFAULT_IDENTIFIER_PATH)
    }
}

impl FromStr for IdentifierPath {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::new(s))
    }
}

impl fmt::Display for IdentifierPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Extracts the identifier at `path` from `root`, or `""` when there is none.
///
/// ```
/// # use yamldiff_core::{extract_key, parse_documents};
/// let docs = parse_documents("metadata:\n  name: web\n")?;
/// assert_eq!(extract_key(docs[0].content(), "metadata.name"), "web");
/// assert_eq!(extract_key(docs[0].content(), "metadata.uid"), "");
/// # Ok::<(), yamldiff_core::LoadError>(())
/// ```
#[must_use]
pub fn extract_key(root: &Value, path: &str) -> String {
    IdentifierPath::new(path).extract(root)
}
