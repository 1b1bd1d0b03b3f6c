use super::DiffEntry;
use crate::Value;

/// Compares non-mapping values by their key-order-independent rendering.
pub(super) fn diff_leaves(path: &str, old: &Value, new: &Value, out: &mut Vec<DiffEntry>) {
    if old.render_sorted() != new.render_sorted() {
        out.push(DiffEntry::changed(path, old.clone(), new.clone()));
    }
}
