//! Options, accepted types, defaults and `cfgtree.toml`

use crate::test_utils::*;
use cfgtree::{
    ConfigNode, Error, MapOrdering, Options, RawValue, ScalarType, TreeConfig, CONFIG_FILE_NAME,
};
use serde_json::json;
use std::sync::Arc;
use tempfile::TempDir;

fn strings_only() -> ConfigNode {
    ConfigNode::root(Arc::new(
        Options::default().with_native_types(Some([ScalarType::String])),
    ))
}

#[test]
fn test_rejected_scalar_reports_path_and_type() {
    let root = strings_only();
    let err = root.node(["server", "port"]).set(8080).unwrap_err();
    match err {
        Error::TypeNotAccepted { path, found } => {
            assert_eq!(path.to_string(), "server.port");
            assert_eq!(found, ScalarType::Int);
        }
        other => panic!("unexpected error: {}", other),
    }
    assert!(root.is_null());
}

#[test]
fn test_rejected_nested_value_leaves_node_unchanged() {
    let root = strings_only();
    root.node(["l"]).set(vec!["a", "b"]).unwrap();
    let mixed = RawValue::from(vec![RawValue::from("c"), RawValue::from(true)]);
    assert!(root.node(["l"]).set(mixed).is_err());
    assert_eq!(root.node(["l"]).get(), Some(raw(json!(["a", "b"]))));
}

#[test]
fn test_merge_and_set_node_check_types() {
    let root = strings_only();
    let other = tree(json!({"n": 1}));
    assert!(root.merge_from(&other).is_err());
    assert!(root.set_node(&other).is_err());
    assert!(root.is_null());
}

#[test]
fn test_options_shared_by_whole_tree() {
    let options = Arc::new(Options::default().with_header(Some("generated")));
    let root = ConfigNode::root(Arc::clone(&options));
    root.node(["a", "b"]).set(1).unwrap();
    assert!(Arc::ptr_eq(root.node(["a", "b"]).options(), &options));
    assert!(Arc::ptr_eq(root.node(["virtual"]).options(), &options));
}

#[test]
fn test_default_roots_share_default_options() {
    let a = ConfigNode::new_root();
    let b = ConfigNode::new_root();
    assert!(Arc::ptr_eq(a.options(), b.options()));
}

#[test]
fn test_sorted_and_unordered_maps() {
    let sorted = ConfigNode::root(Arc::new(
        Options::default().with_map_ordering(MapOrdering::Sorted),
    ));
    let unordered = ConfigNode::root(Arc::new(
        Options::default().with_map_ordering(MapOrdering::Unordered),
    ));
    for key in ["c", "a", "b"] {
        sorted.node([key]).set(1).unwrap();
        unordered.node([key]).set(1).unwrap();
    }
    let keys: Vec<String> = sorted.children_map().keys().map(|k| k.to_string()).collect();
    assert_eq!(keys, vec!["a", "b", "c"]);
    assert_eq!(unordered.children_map().len(), 3);
    assert_eq!(sorted, unordered);
}

#[test]
fn test_copy_defaults_writes_missing_values() {
    let root = ConfigNode::root(Arc::new(Options::default().with_copy_defaults(true)));
    assert_eq!(root.node(["retries"]).get_i64_or(3).unwrap(), 3);
    assert_eq!(root.node(["ratio"]).get_f64_or(0.5).unwrap(), 0.5);
    assert_eq!(root.get(), Some(raw(json!({"retries": 3, "ratio": 0.5}))));
}

#[test]
fn test_defaults_not_written_by_default() {
    let root = ConfigNode::new_root();
    assert_eq!(root.node(["retries"]).get_i64_or(3).unwrap(), 3);
    assert_eq!(root.node(["name"]).get_string_or("x").unwrap(), "x");
    assert!(root.is_null());
}

#[test]
fn test_config_file_drives_options() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join(CONFIG_FILE_NAME);
    std::fs::write(
        &path,
        "map_ordering = \"sorted\"\nnative_types = [\"string\", \"int\"]\ncopy_defaults = true\n",
    )
    .unwrap();

    let options = TreeConfig::from_file(&path).unwrap().to_options();
    let root = ConfigNode::root(Arc::new(options));
    root.node(["z"]).set("last").unwrap();
    root.node(["a"]).set(1).unwrap();
    assert!(root.node(["f"]).set(1.5).is_err());
    assert_eq!(root.node(["d"]).get_i64_or(9).unwrap(), 9);

    let keys: Vec<String> = root.children_map().keys().map(|k| k.to_string()).collect();
    assert_eq!(keys, vec!["a", "d", "z"]);
}

#[test]
fn test_default_config_file_round_trip() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join(CONFIG_FILE_NAME);
    TreeConfig::write_default_if_missing(&path).unwrap();
    let options = TreeConfig::from_file(&path).unwrap().to_options();
    assert_eq!(options, Options::default());

    let tree_options = Options::default().with_map_ordering(MapOrdering::Unordered);
    TreeConfig::from(&tree_options).write_to_file(&path).unwrap();
    assert_eq!(TreeConfig::from_file(&path).unwrap().to_options(), tree_options);
}
