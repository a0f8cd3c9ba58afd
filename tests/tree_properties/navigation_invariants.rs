//! Navigation, virtual nodes and removal

use crate::test_utils::*;
use cfgtree::{ConfigNode, Key, NodePath, RawValue, ValueType};
use serde_json::json;

#[test]
fn test_virtual_until_written() {
    init_tracing();
    let root = ConfigNode::new_root();
    assert!(root.node(["a", "b"]).is_virtual());
    assert!(root.is_empty());

    root.node(["a", "b"]).set("x").unwrap();
    assert!(!root.node(["a"]).is_virtual());
    assert!(root.is_map());
    assert_eq!(root.node(["a"]).node(["b"]).get(), Some(RawValue::from("x")));
}

#[test]
fn test_navigation_never_mutates() {
    let root = tree(json!({"a": 1}));
    let before = root.get();
    let _ = root.node(["x", "y", "z"]);
    let _ = root.node(["a", "deeper"]);
    let _ = root.child(3);
    let _ = root.append_list_node();
    assert_eq!(root.get(), before);
    assert_eq!(root.value_type(), ValueType::Map);
}

#[test]
fn test_existing_nodes_are_shared_handles() {
    let root = tree(json!({"a": {"b": true}}));
    let first = root.node(["a", "b"]);
    let second = root.node(["a"]).child("b");
    assert!(first.ptr_eq(&second));
}

#[test]
fn test_path_is_recomputed() {
    let root = tree(json!({"list": ["x", "y", "z"]}));
    let z = root.node([Key::from("list"), Key::from(2)]);
    assert_eq!(z.path().to_string(), "list[2]");
    assert!(root.node(["list"]).remove_child(0));
    assert_eq!(z.path().to_string(), "list[1]");
}

#[test]
fn test_node_at_parsed_path() {
    let root = tree(json!({"servers": [{"host": "a"}, {"host": "b"}]}));
    let path: NodePath = "servers[1].host".parse().unwrap();
    assert_eq!(root.node_at(&path).get_string(), Some("b".to_string()));
    assert_eq!(root.node_at(&path).path(), path);
}

#[test]
fn test_remove_detaches_subtree() {
    let root = ConfigNode::new_root();
    root.node(["a", "b"]).set(1).unwrap();
    let b = root.node(["a", "b"]);
    assert!(!b.is_virtual());

    assert!(root.remove_child("a"));
    assert!(b.is_virtual());
    assert!(b.is_null());
    assert!(!root.has_child("a"));
    assert!(!root.remove_child("a"));
}

#[test]
fn test_detached_handle_can_be_rewritten() {
    let root = ConfigNode::new_root();
    root.node(["a", "b"]).set(1).unwrap();
    let b = root.node(["a", "b"]);
    root.remove_child("a");

    b.set(2).unwrap();
    assert!(!b.is_virtual());
    assert_eq!(root.node(["a", "b"]).get_i64(), Some(2));
}

#[test]
fn test_set_null_removes_node() {
    let root = tree(json!({"keep": 1, "drop": {"x": 2}}));
    let dropped = root.node(["drop", "x"]);
    root.node(["drop"]).set(RawValue::Null).unwrap();
    assert!(!root.has_child("drop"));
    assert!(dropped.is_virtual());
    assert_eq!(root.get(), Some(raw(json!({"keep": 1}))));
}

#[test]
fn test_null_entries_are_skipped_on_write() {
    let root = tree(json!({"a": null, "b": [1, null, 2]}));
    assert!(!root.has_child("a"));
    assert_eq!(root.node(["b"]).children_list().len(), 2);
}

#[test]
fn test_is_empty() {
    let root = ConfigNode::new_root();
    assert!(root.is_empty());
    root.set("").unwrap();
    assert!(root.is_empty());
    root.set("x").unwrap();
    assert!(!root.is_empty());
    root.set(RawValue::list()).unwrap();
    assert!(root.is_empty());
    assert!(root.is_list());
    root.set(RawValue::map()).unwrap();
    assert!(root.is_empty());
    assert!(root.is_map());
}
