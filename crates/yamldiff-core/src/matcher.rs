use std::collections::btree_map::{self, BTreeMap};

use crate::{Document, IdentifierPath};

/// Identifier assigned to a document that has no usable identifier.
///
/// Fallback identifiers are positional: they are unique within one collection
/// and only meaningful within a single comparison.
///
/// ```
/// assert_eq!(yamldiff_core::fallback_key(3), "__index_3__");
/// ```
#[must_use]
pub fn fallback_key(index: usize) -> String {
    format!("__index_{index}__")
}

/// Documents of one collection keyed by identifier.
///
/// Iteration is in lexicographic identifier order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct KeyedSet {
    documents: BTreeMap<String, Document>,
}

impl KeyedSet {
    /// Assigns each document an identifier and indexes it.
    ///
    /// When two documents resolve to the same identifier the later one
    /// replaces the earlier one. The replacement is logged at `warn` level.
    ///
    /// ```
    /// # use yamldiff_core::{parse_documents, IdentifierPath, KeyedSet};
    /// let docs = parse_documents("metadata: {name: web}\n---\nkind: Orphan\n")?;
    /// let set = KeyedSet::build(docs, &IdentifierPath::default());
    /// assert_eq!(set.keys().collect::<Vec<_>>(), ["__index_1__", "web"]);
    /// # Ok::<(), yamldiff_core::LoadError>(())
    /// ```
    pub fn build<I>(documents: I, path: &IdentifierPath) -> Self
    where
        I: IntoIterator<Item = Document>,
    {
        let mut keyed = BTreeMap::new();
        for (index, document) in documents.into_iter().enumerate() {
            let key = match path.lookup(document.content()) {
                Some(key) if !key.is_empty() => key.to_string(),
                _ => fallback_key(index),
            };
            if keyed.insert(key.clone(), document.with_key(key.clone())).is_some() {
                // Last write wins; the earlier document is dropped from the comparison.
                tracing::warn!(key = %key, index, "duplicate identifier; earlier document replaced");
            }
        }
        tracing::debug!(path = %path, documents = keyed.len(), "built keyed set");
        Self { documents: keyed }
    }

    /// Looks up a document by identifier.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Document> {
        self.documents.get(key)
    }

    /// Returns `true` when a document with this identifier exists.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.documents.contains_key(key)
    }

    /// Number of distinct identifiers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    /// Returns `true` when the collection held no documents.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Identifiers in sorted order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.documents.keys().map(String::as_str)
    }

    /// `(identifier, document)` pairs in sorted order.
    pub fn iter(&self) -> btree_map::Iter<'_, String, Document> {
        self.documents.iter()
    }
}

impl<'a> IntoIterator for &'a KeyedSet {
    type Item = (&'a String, &'a Document);
    type IntoIter = btree_map::Iter<'a, String, Document>;

    fn into_iter(self) -> Self::IntoIter {
        self.documents.iter()
    }
}

/// Free-function form of [`KeyedSet::build`].
pub fn build_keyed_set(documents: Vec<Document>, path: &IdentifierPath) -> KeyedSet {
    KeyedSet::build(documents, path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse_documents;

    fn keyed(input: &str) -> KeyedSet {
        build_keyed_set(parse_documents(input).unwrap(), &IdentifierPath::default())
    }

    #[test]
    fn documents_are_keyed_by_identifier() {
        let set = keyed("metadata: {name: b}\n---\nmetadata: {name: a}\n");
        assert_eq!(set.keys().collect::<Vec<_>>(), ["a", "b"]);
        assert_eq!(set.get("a").unwrap().key(), "a");
    }

    #[test]
    fn missing_identifier_gets_positional_fallback() {
        let set = keyed("metadata: {name: a}\n---\nfoo: 1\n---\nmetadata: {name: 7}\n");
        assert_eq!(set.keys().collect::<Vec<_>>(), ["__index_1__", "__index_2__", "a"]);
        assert_eq!(set.get("__index_2__").unwrap().key(), "__index_2__");
    }

    #[test]
    fn empty_identifier_gets_fallback() {
        let set = keyed("metadata: {name: ''}\n");
        assert!(set.contains_key("__index_0__"));
    }

    #[test]
    fn duplicate_identifier_keeps_last_document() {
        let set = keyed("metadata: {name: a}\nv: 1\n---\nmetadata: {name: a}\nv: 2\n");
        assert_eq!(set.len(), 1);
        let doc = set.get("a").unwrap();
        assert_eq!(doc.content().get("v"), Some(&crate::Value::from(2_i64)));
    }

    #[test]
    fn custom_identifier_path() {
        let docs = parse_documents("id: x\n---\nid: y\n").unwrap();
        let set = KeyedSet::build(docs, &IdentifierPath::new("id"));
        assert_eq!(set.keys().collect::<Vec<_>>(), ["x", "y"]);
    }

    #[test]
    fn empty_collection_builds_empty_set() {
        let set = KeyedSet::build(Vec::new(), &IdentifierPath::default());
        assert!(set.is_empty());
    }
}
