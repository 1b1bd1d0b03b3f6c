use std::collections::BTreeSet;

use crate::result::Modification;
use crate::{structural_diff, ComparisonResult, Document, IdentifierPath, KeyedSet};

/// Classifies every identifier of two keyed collections.
///
/// Identifiers only in `new` are added, only in `old` are deleted, and those
/// in both are modified when their canonical YAML differs. Output maps are
/// ordered by identifier, so repeated runs produce identical results.
///
/// ```
/// # use yamldiff_core::{compare, parse_documents, IdentifierPath, KeyedSet};
/// let path = IdentifierPath::default();
/// let old = KeyedSet::build(parse_documents("metadata: {name: a}\n")?, &path);
/// let new = KeyedSet::build(parse_documents("metadata: {name: b}\n")?, &path);
/// let result = compare(&old, &new);
/// assert_eq!(result.added_keys(), ["b"]);
/// assert_eq!(result.deleted_keys(), ["a"]);
/// assert!(result.has_differences());
/// # Ok::<(), yamldiff_core::LoadError>(())
/// ```
#[must_use]
pub fn compare(old: &KeyedSet, new: &KeyedSet) -> ComparisonResult {
    let keys: BTreeSet<&str> = old.keys().chain(new.keys()).collect();
    let mut result = ComparisonResult::default();
    let mut unchanged = 0usize;

    for key in keys {
        match (old.get(key), new.get(key)) {
            (None, Some(doc)) => {
                result.added.insert(key.to_string(), doc.clone());
            }
            (Some(doc), None) => {
                result.deleted.insert(key.to_string(), doc.clone());
            }
            (Some(lhs), Some(rhs)) if lhs.raw() == rhs.raw() => unchanged += 1,
            (Some(lhs), Some(rhs)) => {
                let diffs = structural_diff("", lhs.content(), rhs.content());
                let modification = Modification::new(lhs.clone(), rhs.clone(), diffs);
                result.modified.insert(key.to_string(), modification);
            }
            (None, None) => {}
        }
    }

    tracing::debug!(
        added = result.added.len(),
        deleted = result.deleted.len(),
        modified = result.modified.len(),
        unchanged,
        "compared document collections"
    );
    result
}

/// Holds the identifier path for a comparison run.
#[derive(Clone, Debug, Default)]
pub struct Engine {
    path: IdentifierPath,
}

impl Engine {
    /// Creates an engine matching documents by `path`.
    #[must_use]
    pub fn new(path: IdentifierPath) -> Self {
        Self { path }
    }

    /// The configured identifier path.
    #[must_use]
    pub fn identifier_path(&self) -> &IdentifierPath {
        &self.path
    }

    /// Keys both collections and compares them.
    ///
    /// ```
    /// # use yamldiff_core::{parse_documents, Engine, IdentifierPath};
    /// let engine = Engine::new(IdentifierPath::new("id"));
    /// let old = parse_documents("id: a\nv: 1\n")?;
    /// let new = parse_documents("id: a\nv: 2\n")?;
    /// let result = engine.compare(old, new);
    /// assert_eq!(result.modified_keys(), ["a"]);
    /// # Ok::<(), yamldiff_core::LoadError>(())
    /// ```
    #[must_use]
    pub fn compare(&self, old: Vec<Document>, new: Vec<Document>) -> ComparisonResult {
        let old = KeyedSet::build(old, &self.path);
        let new = KeyedSet::build(new, &self.path);
        compare(&old, &new)
    }
}
