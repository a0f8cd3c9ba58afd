//! Non-overwriting merge

use crate::test_utils::*;
use cfgtree::{ConfigNode, RawValue};
use serde_json::json;

#[test]
fn test_merge_keeps_present_values() {
    let a = tree(json!({"x": 1}));
    let b = tree(json!({"x": 2, "y": 3}));
    a.merge_from(&b).unwrap();
    assert_eq!(a.node(["x"]).get(), Some(RawValue::from(1)));
    assert_eq!(a.node(["y"]).get(), Some(RawValue::from(3)));
}

#[test]
fn test_merge_recurses_into_maps() {
    let ours = tree(json!({"server": {"port": 80}}));
    let defaults = tree(json!({"server": {"port": 8080, "host": "localhost"}, "debug": false}));
    ours.merge_from(&defaults).unwrap();
    assert_eq!(
        ours.get(),
        Some(raw(json!({"server": {"port": 80, "host": "localhost"}, "debug": false})))
    );
}

#[test]
fn test_merge_does_not_touch_source() {
    let ours = tree(json!({"a": 1}));
    let theirs = tree(json!({"b": {"c": 2}}));
    ours.merge_from(&theirs).unwrap();
    ours.node(["b", "c"]).set(5).unwrap();
    assert_eq!(theirs.node(["b", "c"]).get_i64(), Some(2));
    assert!(!ours.node(["b"]).ptr_eq(&theirs.node(["b"])));
}

#[test]
fn test_merge_never_replaces_lists() {
    let ours = tree(json!({"hosts": ["a"]}));
    let theirs = tree(json!({"hosts": ["b", "c"]}));
    ours.merge_from(&theirs).unwrap();
    assert_eq!(ours.node(["hosts"]).get(), Some(raw(json!(["a"]))));
}

#[test]
fn test_merge_list_into_missing_key() {
    let ours = tree(json!({"name": "svc"}));
    let theirs = tree(json!({"hosts": ["b", "c"]}));
    ours.merge_from(&theirs).unwrap();
    assert_eq!(ours.node(["hosts"]).get(), Some(raw(json!(["b", "c"]))));
}

#[test]
fn test_merge_into_virtual_node_attaches_it() {
    let root = ConfigNode::new_root();
    let target = root.node(["section"]);
    let theirs = tree(json!({"k": "v"}));
    target.merge_from(&theirs).unwrap();
    assert!(!target.is_virtual());
    assert_eq!(root.get(), Some(raw(json!({"section": {"k": "v"}}))));
}

#[test]
fn test_merge_map_into_list_is_noop() {
    let ours = tree(json!([1, 2]));
    let theirs = tree(json!({"k": "v"}));
    ours.merge_from(&theirs).unwrap();
    assert_eq!(ours.get(), Some(raw(json!([1, 2]))));
}

#[test]
fn test_merge_scalar_fills_null_only() {
    let theirs = tree(json!("fallback"));

    let empty = ConfigNode::new_root();
    empty.merge_from(&theirs).unwrap();
    assert_eq!(empty.get_string(), Some("fallback".to_string()));

    let set = tree(json!("mine"));
    set.merge_from(&theirs).unwrap();
    assert_eq!(set.get_string(), Some("mine".to_string()));
}

#[test]
fn test_merge_adopts_target_options() {
    use cfgtree::{MapOrdering, Options};
    use std::sync::Arc;

    let sorted = ConfigNode::root(Arc::new(Options::default().with_map_ordering(MapOrdering::Sorted)));
    let theirs = ConfigNode::new_root();
    theirs.set(RawValue::map_of([("z", 1), ("a", 2)])).unwrap();
    sorted.merge_from(&theirs).unwrap();
    let keys: Vec<String> = sorted.children_map().keys().map(|k| k.to_string()).collect();
    assert_eq!(keys, vec!["a", "z"]);
}
