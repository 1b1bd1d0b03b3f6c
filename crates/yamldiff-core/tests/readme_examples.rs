use yamldiff_core::{parse_documents, Engine, IdentifierPath, RenderConfig};

#[test]
fn yamldiff_core_readme_example() -> Result<(), Box<dyn std::error::Error>> {
    let old = parse_documents("kind: App\nid: api\nport: 80\n---\nkind: App\nid: worker\n")?;
    let new = parse_documents("kind: App\nid: api\nport: 8080\n")?;

    let result = Engine::new(IdentifierPath::new("id")).compare(old, new);
    assert_eq!(result.deleted_keys(), ["worker"]);
    assert_eq!(result.modified_keys(), ["api"]);

    let report = result.render(&RenderConfig::default());
    println!("{report}");
    assert!(report.starts_with("- Deleted: worker\n~ Modified: api\n  ~ port: 80 → 8080\n"));
    Ok(())
}
