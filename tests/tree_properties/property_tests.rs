//! Property-based checks over generated trees

use cfgtree::{ConfigNode, Key, RawValue};
use indexmap::IndexMap;
use proptest::prelude::*;

/// Raw values without nulls, floats or empty containers, so that a write
/// followed by a read gives back exactly what was written.
fn arb_raw() -> impl Strategy<Value = RawValue> {
    let leaf = prop_oneof![
        any::<bool>().prop_map(RawValue::from),
        any::<i64>().prop_map(RawValue::from),
        "[a-z]{0,8}".prop_map(RawValue::from),
    ];
    leaf.prop_recursive(4, 32, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 1..4).prop_map(RawValue::List),
            prop::collection::vec(("[a-z]{1,4}", inner), 1..4).prop_map(|entries| {
                let map: IndexMap<Key, RawValue> =
                    entries.into_iter().map(|(k, v)| (Key::from(k), v)).collect();
                RawValue::Map(map)
            }),
        ]
    })
}

fn arb_path() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec("[a-d]", 1..4)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_set_then_get_round_trips(value in arb_raw()) {
        let root = ConfigNode::new_root();
        root.set(value.clone()).unwrap();
        prop_assert_eq!(root.get(), Some(value));
    }

    #[test]
    fn prop_copy_equals_original(value in arb_raw()) {
        let root = ConfigNode::new_root();
        root.set(value).unwrap();
        let copy = root.copy();
        prop_assert_eq!(&copy, &root);
        prop_assert_eq!(copy.get(), root.get());
    }

    #[test]
    fn prop_copy_is_independent(value in arb_raw(), path in arb_path()) {
        let root = ConfigNode::new_root();
        root.set(value).unwrap();
        let before = root.get();
        let copy = root.copy();
        copy.node(path.iter().map(String::as_str)).set("mutated").unwrap();
        prop_assert_eq!(root.get(), before);
    }

    #[test]
    fn prop_write_attaches_whole_path(path in arb_path(), leaf in any::<i64>()) {
        let root = ConfigNode::new_root();
        let target = root.node(path.iter().map(String::as_str));
        prop_assert!(target.is_virtual());
        target.set(leaf).unwrap();
        prop_assert!(!target.is_virtual());
        prop_assert_eq!(target.path().len(), path.len());
        prop_assert_eq!(root.node(path.iter().map(String::as_str)).get_i64(), Some(leaf));
    }

    #[test]
    fn prop_merge_preserves_existing(ours in arb_raw(), theirs in arb_raw()) {
        let a = ConfigNode::new_root();
        a.set(ours).unwrap();
        let before = a.get();
        let b = ConfigNode::new_root();
        b.set(theirs).unwrap();
        a.merge_from(&b).unwrap();
        // Everything that was there is still there with the same value.
        if let (Some(RawValue::Map(old)), Some(RawValue::Map(new))) = (before.clone(), a.get()) {
            for (key, value) in old {
                if !value.is_map() {
                    prop_assert_eq!(new.get(&key), Some(&value));
                }
            }
        } else {
            prop_assert_eq!(a.get(), before);
        }
    }

    #[test]
    fn prop_list_keys_match_positions(len in 1usize..12, removals in prop::collection::vec(0usize..12, 0..6)) {
        let root = ConfigNode::new_root();
        root.set((0..len as i64).collect::<Vec<_>>()).unwrap();
        for index in removals {
            root.remove_child(index);
        }
        for (i, child) in root.children_list().iter().enumerate() {
            prop_assert_eq!(child.key(), Some(Key::Index(i)));
        }
    }
}
