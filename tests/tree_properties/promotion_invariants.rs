//! Value type inference and promotion

use crate::test_utils::*;
use cfgtree::{ConfigNode, Key, RawValue, ValueType};
use serde_json::json;

fn list_values(node: &ConfigNode) -> Vec<RawValue> {
    node.children_list().iter().filter_map(ConfigNode::get).collect()
}

#[test]
fn test_write_shape_decides_value_type() {
    let root = ConfigNode::new_root();
    root.node(["s"]).set(1.5).unwrap();
    root.node(["l"]).set(vec![1, 2]).unwrap();
    root.node(["m"]).set(raw(json!({"k": "v"}))).unwrap();
    assert_eq!(root.node(["s"]).value_type(), ValueType::Scalar);
    assert_eq!(root.node(["l"]).value_type(), ValueType::List);
    assert_eq!(root.node(["m"]).value_type(), ValueType::Map);
}

#[test]
fn test_scalar_preserved_when_promoted_to_list() {
    let root = ConfigNode::new_root();
    root.set("hello").unwrap();
    root.node([1]).set("world").unwrap();
    assert!(root.is_list());
    assert_eq!(list_values(&root), vec![RawValue::from("hello"), RawValue::from("world")]);
}

#[test]
fn test_write_at_zero_overwrites_seed() {
    let root = ConfigNode::new_root();
    root.set("hello").unwrap();
    root.node([0]).set("world").unwrap();
    assert_eq!(list_values(&root), vec![RawValue::from("world")]);
}

#[test]
fn test_name_key_turns_scalar_into_map() {
    let root = ConfigNode::new_root();
    root.set(10).unwrap();
    root.node(["k"]).set(11).unwrap();
    assert_eq!(root.get(), Some(raw(json!({"k": 11}))));
}

#[test]
fn test_append_to_map_replaces_it_with_list() {
    let root = tree(json!({"old": 1}));
    let old = root.node(["old"]);
    root.append_list_node().set("new").unwrap();
    assert!(root.is_list());
    assert!(old.is_virtual());
    assert_eq!(root.get(), Some(raw(json!(["new"]))));
}

#[test]
fn test_numeric_key_on_map_stays_map_entry() {
    let root = tree(json!({"a": 1}));
    root.node([5]).set(2).unwrap();
    assert!(root.is_map());
    assert_eq!(root.node([5]).get_i64(), Some(2));
    assert_eq!(root.node([5]).key(), Some(Key::Index(5)));
}

#[test]
fn test_intermediate_lists_materialize() {
    let root = ConfigNode::new_root();
    root.node([Key::from("servers"), Key::from(0), Key::from("host")])
        .set("a")
        .unwrap();
    assert_eq!(root.get(), Some(raw(json!({"servers": [{"host": "a"}]}))));
}

#[test]
fn test_append_list_node_indices() {
    let root = ConfigNode::new_root();
    let list = root.node(["items"]);
    let pending = list.append_list_node();
    assert_eq!(pending.key(), Some(Key::Unallocated));
    assert!(pending.is_virtual());

    for word in ["a", "b", "c"] {
        list.append_list_node().set(word).unwrap();
    }
    pending.set("d").unwrap();
    assert_eq!(pending.key(), Some(Key::Index(3)));
    assert_eq!(list.get(), Some(raw(json!(["a", "b", "c", "d"]))));
}

#[test]
fn test_out_of_range_index_appends() {
    let root = tree(json!([1, 2]));
    let far = root.node([10]);
    far.set(3).unwrap();
    assert_eq!(far.key(), Some(Key::Index(2)));
    assert_eq!(root.get(), Some(raw(json!([1, 2, 3]))));
}

#[test]
fn test_overwriting_list_detaches_old_elements() {
    let root = tree(json!({"l": [1, 2, 3]}));
    let old: Vec<_> = root.node(["l"]).children_list();
    root.node(["l"]).set(vec![9]).unwrap();
    assert!(old.iter().all(ConfigNode::is_virtual));
    assert_eq!(root.node(["l"]).get(), Some(raw(json!([9]))));
}

#[test]
fn test_scalar_over_map_detaches_children() {
    let root = tree(json!({"m": {"x": 1}}));
    let x = root.node(["m", "x"]);
    root.node(["m"]).set("flat").unwrap();
    assert!(x.is_virtual());
    assert_eq!(root.node(["m"]).get_string(), Some("flat".to_string()));
}
