use serde_json::json;
use yamldiff_core::{
    parse_documents, review::TemplateData, ChangeKind, Engine, IdentifierPath, LoadError,
};

#[test]
fn summary_serializes_for_automation() {
    let old = parse_documents("metadata: {name: a}\n---\nmetadata: {name: b}\nx: 1\n").unwrap();
    let new = parse_documents("metadata: {name: b}\nx: 2\n---\nmetadata: {name: c}\n").unwrap();
    let summary = Engine::default().compare(old, new).summary();
    assert_eq!(
        serde_json::to_value(&summary).unwrap(),
        json!({
            "added": 1,
            "deleted": 1,
            "modified": 1,
            "added_list": ["c"],
            "deleted_list": ["a"],
            "modified_list": ["b"],
            "has_changes": true,
        })
    );
}

#[test]
fn diff_entries_serialize_without_missing_sides() {
    let old = parse_documents("id: a\ngone: true\n").unwrap();
    let new = parse_documents("id: a\nfresh: [1, 2]\n").unwrap();
    let result = Engine::new(IdentifierPath::new("id")).compare(old, new);
    let diffs = result.modified()["a"].diffs();
    assert_eq!(diffs[0].kind, ChangeKind::Added);
    assert_eq!(
        serde_json::to_value(diffs).unwrap(),
        json!([
            {"path": "fresh", "kind": "added", "new_value": [1, 2]},
            {"path": "gone", "kind": "deleted", "old_value": true},
        ])
    );
}

#[test]
fn template_data_feeds_comment_templates() {
    let old = parse_documents("metadata: {name: a}\n").unwrap();
    let result = Engine::default().compare(old, Vec::new());
    let data = TemplateData::new(&result, "details", "https://ci/1", Default::default());
    let body = yamldiff_core::review::render_template(
        "{{if .HasChanges}}{{.Summary}}\n{{range .DeletedList}}- {{.}}\n{{end}}{{.Link}}{{end}}",
        &data.to_value(),
    )
    .unwrap();
    assert_eq!(body, "Plan: 0 to add, 1 to delete, 0 to modify\n- a\nhttps://ci/1");
}

#[test]
fn non_mapping_documents_are_rejected() {
    let err = parse_documents("metadata: {name: a}\n---\n- just\n- a list\n").unwrap_err();
    assert!(matches!(err, LoadError::NotAMapping { index: 1, .. }));
}
