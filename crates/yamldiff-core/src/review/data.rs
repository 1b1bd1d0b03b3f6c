use std::collections::BTreeMap;

use serde::Serialize;

use crate::{ComparisonResult, Mapping, Value};

/// Values exposed to the comment template.
///
/// Template field names follow the Go-style capitalized spelling:
/// `Summary`, `Details`, `HasChanges`, `Added`, `Deleted`, `Modified`,
/// `AddedList`, `DeletedList`, `ModifiedList`, `Link`, `Vars`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct TemplateData {
    /// `Plan: A to add, D to delete, M to modify`.
    pub summary: String,
    /// Rendered terminal report, without color.
    pub details: String,
    /// Whether anything changed.
    pub has_changes: bool,
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
    /// CI build link.
    pub link: String,
    /// User-supplied `--var` values.
    pub vars: BTreeMap<String, String>,
}

impl TemplateData {
    /// Collects template values from a comparison.
    ///
    /// ```
    /// # use std::collections::BTreeMap;
    /// # use yamldiff_core::{review::TemplateData, ComparisonResult};
    /// let data = TemplateData::new(&ComparisonResult::default(), "", "https://ci", BTreeMap::new());
    /// assert_eq!(data.summary, "Plan: 0 to add, 0 to delete, 0 to modify");
    /// assert!(!data.has_changes);
    /// ```
    #[must_use]
    pub fn new(
        result: &ComparisonResult,
        details: &str,
        link: &str,
        vars: BTreeMap<String, String>,
    ) -> Self {
        let summary = result.summary();
        Self {
            summary: summary.plan_line(),
            details: details.to_string(),
            has_changes: summary.has_changes,
            added: summary.added,
            deleted: summary.deleted,
            modified: summary.modified,
            added_list: summary.added_list,
            deleted_list: summary.deleted_list,
            modified_list: summary.modified_list,
            link: link.to_string(),
            vars,
        }
    }

    /// The template's root value.
    #[must_use]
    pub fn to_value(&self) -> Value {
        let list = |items: &[String]| {
            Value::Sequence(items.iter().map(|item| Value::from(item.as_str())).collect())
        };
        let count = |n: usize| Value::from(i64::try_from(n).unwrap_or(i64::MAX));
        let vars: Mapping =
            self.vars.iter().map(|(k, v)| (k.clone(), Value::from(v.as_str()))).collect();

        let mut root = Mapping::new();
        root.insert("Summary".into(), Value::from(self.summary.as_str()));
        root.insert("Details".into(), Value::from(self.details.as_str()));
        root.insert("HasChanges".into(), Value::from(self.has_changes));
        root.insert("Added".into(), count(self.added));
        root.insert("Deleted".into(), count(self.deleted));
        root.insert("Modified".into(), count(self.modified));
        root.insert("AddedList".into(), list(&self.added_list));
        root.insert("DeletedList".into(), list(&self.deleted_list));
        root.insert("ModifiedList".into(), list(&self.modified_list));
        root.insert("Link".into(), Value::from(self.link.as_str()));
        root.insert("Vars".into(), Value::Mapping(vars));
        Value::Mapping(root)
    }
}
