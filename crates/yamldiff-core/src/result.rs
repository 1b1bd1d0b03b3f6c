use std::collections::BTreeMap;

use serde::Serialize;

use crate::{DiffEntry, Document};

/// A document present in both collections whose canonical form differs.
#[derive(Clone, Debug, PartialEq)]
pub struct Modification {
    old: Document,
    new: Document,
    diffs: Vec<DiffEntry>,
}

impl Modification {
    pub(crate) fn new(old: Document, new: Document, diffs: Vec<DiffEntry>) -> Self {
        Self { old, new, diffs }
    }

    /// The document from the first collection.
    #[must_use]
    pub fn old(&self) -> &Document {
        &self.old
    }

    /// The document from the second collection.
    #[must_use]
    pub fn new_document(&self) -> &Document {
        &self.new
    }

    /// Field-level changes in sorted path order.
    ///
    /// May be empty when the documents differ only in ways the leaf
    /// rendering does not distinguish, e.g. `"1"` versus `1`.
    #[must_use]
    pub fn diffs(&self) -> &[DiffEntry] {
        &self.diffs
    }
}

/// Outcome of comparing two keyed collections.
///
/// The added, deleted and modified identifier sets are pairwise disjoint;
/// identifiers in none of them were unchanged.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ComparisonResult {
    pub(crate) added: BTreeMap<String, Document>,
    pub(crate) deleted: BTreeMap<String, Document>,
    pub(crate) modified: BTreeMap<String, Modification>,
}

impl ComparisonResult {
    /// Documents only in the second collection, keyed by identifier.
    #[must_use]
    pub fn added(&self) -> &BTreeMap<String, Document> {
        &self.added
    }

    /// Documents only in the first collection, keyed by identifier.
    #[must_use]
    pub fn deleted(&self) -> &BTreeMap<String, Document> {
        &self.deleted
    }

    /// Documents in both collections that differ, keyed by identifier.
    #[must_use]
    pub fn modified(&self) -> &BTreeMap<String, Modification> {
        &self.modified
    }

    /// Sorted identifiers of added documents.
    #[must_use]
    pub fn added_keys(&self) -> Vec<&str> {
        self.added.keys().map(String::as_str).collect()
    }

    /// Sorted identifiers of deleted documents.
    #[must_use]
    pub fn deleted_keys(&self) -> Vec<&str> {
        self.deleted.keys().map(String::as_str).collect()
    }

    /// Sorted identifiers of modified documents.
    #[must_use]
    pub fn modified_keys(&self) -> Vec<&str> {
        self.modified.keys().map(String::as_str).collect()
    }

    /// Returns `true` when anything was added, deleted or modified.
    #[must_use]
    pub fn has_differences(&self) -> bool {
        !self.added.is_empty() || !self.deleted.is_empty() || !self.modified.is_empty()
    }

    /// Counts and sorted identifier lists for automation consumers.
    #[must_use]
    pub fn summary(&self) -> Summary {
        Summary {
            added: self.added.len(),
            deleted: self.deleted.len(),
            modified: self.modified.len(),
            added_list: self.added.keys().cloned().collect(),
            deleted_list: self.deleted.keys().cloned().collect(),
            modified_list: self.modified.keys().cloned().collect(),
            has_changes: self.has_differences(),
        }
    }
}

/// Machine-readable digest of a [`ComparisonResult`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    /// Number of added documents.
    pub added: usize,
    /// Number of deleted documents.
    pub deleted: usize,
    /// Number of modified documents.
    pub modified: usize,
    /// Sorted identifiers of added documents.
    pub added_list: Vec<String>,
    /// Sorted identifiers of deleted documents.
    pub deleted_list: Vec<String>,
    /// Sorted identifiers of modified documents.
    pub modified_list: Vec<String>,
    /// Whether any category is non-empty.
    pub has_changes: bool,
}

impl Summary {
    /// One-line plan summary, e.g. `Plan: 1 to add, 0 to delete, 2 to modify`.
    ///
    /// ```
    /// # use yamldiff_core::Summary;
    /// let summary = Summary { added: 1, modified: 2, ..Summary::default() };
    /// assert_eq!(summary.plan_line(), "Plan: 1 to add, 0 to delete, 2 to modify");
    /// ```
    #[must_use]
    pub fn plan_line(&self) -> String {
        format!(
            "Plan: {} to add, {} to delete, {} to modify",
            self.added, self.deleted, self.modified
        )
    }
}
