//! Field-level structural diff between two matched documents.
//!
//! Mappings are walked key by key in sorted order; everything else (scalars,
//! sequences, and type changes) is compared as an opaque value. Sequences are
//! never decomposed element by element.

mod leaf;
mod mapping;

use std::fmt;

use serde::Serialize;

use crate::Value;

/// How a field changed between the old and new document.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeKind {
    /// The field only exists in the new document.
    Added,
    /// The field only exists in the old document.
    Deleted,
    /// The field exists in both with different renderings.
    Changed,
}

/// One field-level change, addressed by a dotted path.
///
/// ```
/// # use yamldiff_core::{DiffEntry, Value};
/// let entry = DiffEntry::changed("spec.replicas", Value::from(1_i64), Value::from(3_i64));
/// assert_eq!(entry.to_string(), "~ spec.replicas: 1 → 3");
/// ```
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DiffEntry {
    /// Dotted field path; empty for a whole-document record.
    pub path: String,
    /// The kind of change.
    pub kind: ChangeKind,
    /// Value in the old document, absent for additions.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub old_value: Option<Value>,
    /// Value in the new document, absent for deletions.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_value: Option<Value>,
}

impl DiffEntry {
    /// A field present only in the new document.
    #[must_use]
    pub fn added(path: impl Into<String>, value: Value) -> Self {
        Self { path: path.into(), kind: ChangeKind::Added, old_value: None, new_value: Some(value) }
    }

    /// A field present only in the old document.
    #[must_use]
    pub fn deleted(path: impl Into<String>, value: Value) -> Self {
        Self {
            path: path.into(),
            kind: ChangeKind::Deleted,
            old_value: Some(value),
            new_value: None,
        }
    }

    /// A field whose value differs.
    #[must_use]
    pub fn changed(path: impl Into<String>, old: Value, new: Value) -> Self {
        Self {
            path: path.into(),
            kind: ChangeKind::Changed,
            old_value: Some(old),
            new_value: Some(new),
        }
    }
}

impl fmt::Display for DiffEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let old = self.old_value.as_ref().unwrap_or(&Value::Null);
        let new = self.new_value.as_ref().unwrap_or(&Value::Null);
        match self.kind {
            ChangeKind::Added => write!(f, "+ {}: {new}", self.path),
            ChangeKind::Deleted => write!(f, "- {}: {old}", self.path),
            ChangeKind::Changed => write!(f, "~ {}: {old} → {new}", self.path),
        }
    }
}

/// Recursively compares two values, returning changes in sorted path order.
///
/// ```
/// # use yamldiff_core::{parse_documents, structural_diff, DiffEntry, Value};
/// let old = parse_documents("a: 1\nb: 2\n")?;
/// let new = parse_documents("a: 1\nb: 3\nc: 4\n")?;
/// let diffs = structural_diff("", old[0].content(), new[0].content());
/// assert_eq!(
///     diffs,
///     vec![
///         DiffEntry::changed("b", Value::from(2_i64), Value::from(3_i64)),
///         DiffEntry::added("c", Value::from(4_i64)),
///     ]
/// );
/// # Ok::<(), yamldiff_core::LoadError>(())
/// ```
#[must_use]
pub fn structural_diff(path: &str, old: &Value, new: &Value) -> Vec<DiffEntry> {
    let mut entries = Vec::new();
    diff_into(path, old, new, &mut entries);
    entries
}

pub(super) fn diff_into(path: &str, old: &Value, new: &Value, out: &mut Vec<DiffEntry>) {
    match (old, new) {
        (Value::Mapping(lhs), Value::Mapping(rhs)) => mapping::diff_mappings(path, lhs, rhs, out),
        _ => leaf::diff_leaves(path, old, new, out),
    }
}

pub(super) fn child_path(parent: &str, key: &str) -> String {
    if parent.is_empty() {
        key.to_string()
    } else {
        format!("{parent}.{key}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse_documents;

    fn root(input: &str) -> Value {
        parse_documents(input).unwrap().remove(0).content().clone()
    }

    #[test]
    fn changed_added_in_sorted_order() {
        let diffs = structural_diff("", &root("a: 1\nb: 2\n"), &root("c: 4\nb: 3\na: 1\n"));
        assert_eq!(
            diffs,
            vec![
                DiffEntry::changed("b", Value::from(2_i64), Value::from(3_i64)),
                DiffEntry::added("c", Value::from(4_i64)),
            ]
        );
    }

    #[test]
    fn nested_paths_use_dots() {
        let old = root("spec:\n  template:\n    image: nginx:1\n  gone: true\n");
        let new = root("spec:\n  template:\n    image: nginx:2\n");
        let diffs = structural_diff("", &old, &new);
        assert_eq!(
            diffs,
            vec![
                DiffEntry::deleted("spec.gone", Value::from(true)),
                DiffEntry::changed(
                    "spec.template.image",
                    Value::from("nginx:1"),
                    Value::from("nginx:2")
                ),
            ]
        );
    }

    #[test]
    fn sequences_are_opaque() {
        let old = root("ports: [80, 443]\n");
        let new = root("ports: [80, 8443]\n");
        let diffs = structural_diff("", &old, &new);
        assert_eq!(diffs.len(), 1);
        assert_eq!(diffs[0].path, "ports");
        assert_eq!(diffs[0].to_string(), "~ ports: [80, 443] → [80, 8443]");
    }

    #[test]
    fn type_change_is_single_entry() {
        let diffs = structural_diff("", &root("a: {b: 1}\n"), &root("a: flat\n"));
        assert_eq!(diffs, vec![DiffEntry::changed("a", root("b: 1\n"), Value::from("flat"))]);
    }

    #[test]
    fn equal_renderings_are_not_reported() {
        let diffs = structural_diff("", &root("a: [{x: 1, y: 2}]\n"), &root("a: [{y: 2, x: 1}]\n"));
        assert!(diffs.is_empty());
    }

    #[test]
    fn prefix_is_applied_to_children() {
        let diffs = structural_diff("root", &root("a: 1\n"), &root("a: 2\n"));
        assert_eq!(diffs[0].path, "root.a");
    }

    #[test]
    fn display_formats() {
        assert_eq!(DiffEntry::added("x", Value::from("v")).to_string(), "+ x: v");
        assert_eq!(DiffEntry::deleted("x", Value::Null).to_string(), "- x: null");
    }

    #[test]
    fn serializes_with_lowercase_kind() {
        let entry = DiffEntry::added("a.b", Value::from(1_i64));
        let json = serde_json::to_string(&entry).unwrap();
        assert_eq!(json, r#"{"path":"a.b","kind":"added","new_value":1}"#);
    }
}
