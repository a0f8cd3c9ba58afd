//! Deep copy and structural equality

use crate::test_utils::*;
use cfgtree::{ConfigNode, Key, RawValue};
use serde_json::json;

#[test]
fn test_copy_is_equal_then_independent() {
    let original = tree(json!({"a": {"b": [1, 2, {"c": "d"}]}, "e": true}));
    let copy = original.copy();
    assert_eq!(copy, original);

    copy.node([Key::from("a"), Key::from("b"), Key::from(2), Key::from("c")])
        .set("changed")
        .unwrap();
    assert_ne!(copy, original);
    assert_eq!(
        original.node([Key::from("a"), Key::from("b"), Key::from(2), Key::from("c")]).get(),
        Some(RawValue::from("d"))
    );
}

#[test]
fn test_copy_of_subtree_is_root() {
    let original = tree(json!({"a": {"b": 1}}));
    let sub = original.node(["a"]).copy();
    assert!(sub.is_root());
    assert!(!sub.is_virtual());
    assert_eq!(sub.key(), Some(Key::from("a")));
    assert_eq!(sub.node(["b"]).path().to_string(), "b");
}

#[test]
fn test_copy_nodes_are_distinct() {
    let original = tree(json!({"a": [1]}));
    let copy = original.copy();
    assert!(!copy.node(["a"]).ptr_eq(&original.node(["a"])));
    assert!(!copy.node(["a", "0"]).ptr_eq(&original.node(["a", "0"])));
}

#[test]
fn test_copy_of_null_node() {
    let root = ConfigNode::new_root();
    let copy = root.copy();
    assert!(copy.is_null());
    assert_eq!(copy, root);
}

#[test]
fn test_set_node_deep_copies() {
    let source = tree(json!({"x": [1, 2]}));
    let target = ConfigNode::new_root();
    target.node(["from_source"]).set_node(&source).unwrap();
    source.node(["x"]).append_list_node().set(3).unwrap();
    assert_eq!(target.node(["from_source", "x"]).get(), Some(raw(json!([1, 2]))));
}

#[test]
fn test_set_node_with_scalar_and_null() {
    let target = tree(json!({"k": "old"}));
    target.node(["k"]).set_node(&tree(json!(7))).unwrap();
    assert_eq!(target.node(["k"]).get_i64(), Some(7));

    target.node(["k"]).set_node(&ConfigNode::new_root()).unwrap();
    assert!(!target.has_child("k"));
}

#[test]
fn test_equality_ignores_map_order() {
    let a = ConfigNode::new_root();
    a.set(RawValue::map_of([("x", 1), ("y", 2)])).unwrap();
    let b = ConfigNode::new_root();
    b.set(RawValue::map_of([("y", 2), ("x", 1)])).unwrap();
    assert_eq!(a, b);
}

#[test]
fn test_equality_respects_list_order() {
    assert_ne!(tree(json!([1, 2])), tree(json!([2, 1])));
}

#[test]
fn test_copy_keeps_null_list_elements_in_place() {
    let root = ConfigNode::new_root();
    root.attached_child(0);
    root.node([1]).set("x").unwrap();
    assert_eq!(root.children_list().len(), 2);

    let copy = root.copy();
    let children = copy.children_list();
    assert_eq!(children.len(), 2);
    assert!(children[0].is_null());
    assert!(!children[0].is_virtual());
    assert_eq!(children[1].key(), Some(Key::Index(1)));
    assert_eq!(copy.node([1]).get_string(), root.node([1]).get_string());
    assert_eq!(copy, root);
}

#[test]
fn test_copy_keeps_null_map_entries() {
    let root = ConfigNode::new_root();
    root.attached_child("hole");
    root.node(["full"]).set(1).unwrap();

    let copy = root.copy();
    assert_eq!(copy.children_map().len(), 2);
    assert!(copy.has_child("hole"));
    assert!(copy.node(["hole"]).is_null());
    assert_eq!(copy, root);
}

#[test]
fn test_set_node_keeps_null_children() {
    let source = ConfigNode::new_root();
    source.attached_child(0);
    source.node([1]).set(true).unwrap();

    let target = ConfigNode::new_root();
    target.node(["t"]).set_node(&source).unwrap();
    let children = target.node(["t"]).children_list();
    assert_eq!(children.len(), 2);
    assert!(children[0].is_null());
    assert_eq!(target.node([Key::from("t"), Key::from(1)]).get_bool(), Some(true));
}
