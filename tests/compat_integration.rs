//! End-to-end tests against the testdata fixture packages.
//!
//! `testdata/api_v1` and `testdata/api_v2` hold two versions of a small
//! plugin API; v2 changes an interface method's parameter type, drops a
//! method, changes a type alias, and adds a free function.

use std::path::Path;

use symcheck::{compare_trees, extract, load_package, snapshot, SymbolKind};

fn extract_fixture(name: &str) -> symcheck::SymbolTree {
    let dir = Path::new("testdata").join(name);
    let files = load_package(&dir, None).expect("fixture should load");
    extract(&files).expect("fixture should extract")
}

#[test]
fn test_v1_exported_surface() {
    let tree = extract_fixture("api_v1");

    let labels: Vec<&str> = tree.iter().map(|s| s.label.as_str()).collect();
    assert_eq!(
        labels,
        vec![
            "Version", "UserID", "[]string", "Info", "Plugin", "NewInfo", "Title"
        ]
    );

    // Unexported declarations never appear.
    assert!(!labels.contains(&"debugMode"));
    assert!(!labels.contains(&"helper"));

    let plugin = tree.iter().find(|s| s.label == "Plugin").unwrap();
    assert_eq!(plugin.kind, SymbolKind::Interface);
    assert_eq!(plugin.members.len(), 2);

    let title = tree.iter().find(|s| s.label == "Title").unwrap();
    assert_eq!(title.kind, SymbolKind::Method);
    assert_eq!(title.receiver_type, "Info");

    // Top-level symbols carry diagnostic locations.
    assert!(tree.iter().all(|s| s.file_name.ends_with("api.go")));
    assert!(tree.iter().all(|s| s.pos > 0));
}

#[test]
fn test_snapshot_roundtrip() {
    let tree = extract_fixture("api_v1");
    let json = snapshot::encode(&tree).unwrap();
    let back = snapshot::decode(&json).unwrap();
    assert_eq!(back, tree);
}

#[test]
fn test_same_version_is_compatible() {
    let tree = extract_fixture("api_v1");
    let again = extract_fixture("api_v1");
    assert!(compare_trees(&tree, &again, true).is_empty());
}

#[test]
fn test_v1_to_v2_incompatibilities() {
    let v1 = extract_fixture("api_v1");
    let v2 = extract_fixture("api_v2");

    let diffs = compare_trees(&v1, &v2, true);

    // One diagnostic per independent structural change.
    assert_eq!(diffs.len(), 4, "unexpected diagnostics: {:#?}", diffs);

    assert!(diffs.iter().any(|d| {
        d.contains("type alias")
            && d.contains("different underlying types: int64 and string")
    }));
    assert!(diffs
        .iter()
        .any(|d| d.starts_with("func param mismatch:")
            && d.contains("int and string")));
    assert!(diffs.iter().any(|d| d.contains("missing symbol: .Stop")));
    assert!(diffs
        .iter()
        .any(|d| d.contains("extra symbol found: .Shutdown")));
}

#[test]
fn test_comparison_is_deterministic() {
    let v1 = extract_fixture("api_v1");
    let v2 = extract_fixture("api_v2");

    let first = compare_trees(&v1, &v2, true);
    let second = compare_trees(&v1, &v2, true);
    assert_eq!(first, second);
}

#[test]
fn test_baseline_file_workflow() {
    let v1 = extract_fixture("api_v1");
    let v2 = extract_fixture("api_v2");

    let dir = tempfile::tempdir().unwrap();
    let baseline_path = dir.path().join("export_ref.json");
    std::fs::write(&baseline_path, snapshot::encode(&v1).unwrap()).unwrap();

    let baseline = snapshot::read_baseline(&baseline_path).unwrap();
    assert_eq!(baseline, v1);

    let diffs = compare_trees(&baseline, &v2, true);
    assert_eq!(diffs.len(), 4);
}

#[test]
fn test_malformed_baseline_is_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.json");
    std::fs::write(&path, "{ not json").unwrap();
    assert!(snapshot::read_baseline(&path).is_err());
}

#[test]
fn test_locations_do_not_affect_comparison() {
    let v1 = extract_fixture("api_v1");

    // Strip locations, as a decoded legacy snapshot might lack them.
    let mut stripped = v1.clone();
    for sym in &mut stripped {
        sym.file_name.clear();
        sym.pos = 0;
    }

    assert!(compare_trees(&stripped, &v1, true).is_empty());
}
