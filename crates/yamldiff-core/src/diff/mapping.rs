use std::collections::BTreeSet;

use super::{child_path, diff_into, DiffEntry};
use crate::Mapping;

pub(super) fn diff_mappings(path: &str, lhs: &Mapping, rhs: &Mapping, out: &mut Vec<DiffEntry>) {
    let keys: BTreeSet<&String> = lhs.keys().chain(rhs.keys()).collect();
    for key in keys {
        let sub_path = child_path(path, key);
        match (lhs.get(key), rhs.get(key)) {
            (Some(old), Some(new)) => diff_into(&sub_path, old, new, out),
            (Some(old), None) => out.push(DiffEntry::deleted(sub_path, old.clone())),
            (None, Some(new)) => out.push(DiffEntry::added(sub_path, new.clone())),
            (None, None) => {}
        }
    }
}
