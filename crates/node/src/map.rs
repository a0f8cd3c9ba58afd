//! Map storage
//!
//! Map children live in one of three stores picked from the tree's
//! [`MapOrdering`]. Every single-call operation is atomic; `put_child_if_absent`
//! is the only check-then-insert primitive.

use crate::node::ConfigNode;
use cfgtree_core::{Key, MapOrdering, RawValue};
use dashmap::mapref::entry::Entry as DashEntry;
use dashmap::DashMap;
use indexmap::map::Entry as IndexEntry;
use indexmap::IndexMap;
use parking_lot::Mutex;
use std::collections::btree_map::Entry as BTreeEntry;
use std::collections::BTreeMap;
use std::fmt;

enum MapStore {
    Insertion(Mutex<IndexMap<Key, ConfigNode>>),
    Sorted(Mutex<BTreeMap<Key, ConfigNode>>),
    Unordered(DashMap<Key, ConfigNode>),
}

pub(crate) struct MapValue {
    store: MapStore,
}

impl MapValue {
    pub(crate) fn new(ordering: MapOrdering) -> Self {
        let store = match ordering {
            MapOrdering::Insertion => MapStore::Insertion(Mutex::new(IndexMap::new())),
            MapOrdering::Sorted => MapStore::Sorted(Mutex::new(BTreeMap::new())),
            MapOrdering::Unordered => MapStore::Unordered(DashMap::new()),
        };
        MapValue { store }
    }

    pub(crate) fn with_entries(ordering: MapOrdering, entries: Vec<(Key, ConfigNode)>) -> Self {
        let map = Self::new(ordering);
        map.replace(entries);
        map
    }

    pub(crate) fn child(&self, key: &Key) -> Option<ConfigNode> {
        match &self.store {
            MapStore::Insertion(m) => m.lock().get(key).cloned(),
            MapStore::Sorted(m) => m.lock().get(key).cloned(),
            MapStore::Unordered(m) => m.get(key).map(|e| e.value().clone()),
        }
    }

    /// Insert or replace (`Some`) or remove (`None`) the child at `key`.
    pub(crate) fn put_child(&self, key: &Key, child: Option<ConfigNode>) -> Option<ConfigNode> {
        match (&self.store, child) {
            (MapStore::Insertion(m), Some(node)) => m.lock().insert(key.clone(), node),
            (MapStore::Insertion(m), None) => m.lock().shift_remove(key),
            (MapStore::Sorted(m), Some(node)) => m.lock().insert(key.clone(), node),
            (MapStore::Sorted(m), None) => m.lock().remove(key),
            (MapStore::Unordered(m), Some(node)) => m.insert(key.clone(), node),
            (MapStore::Unordered(m), None) => m.remove(key).map(|(_, node)| node),
        }
    }

    /// Insert `child` unless the key is taken; returns the resident child.
    pub(crate) fn put_child_if_absent(&self, key: &Key, child: ConfigNode) -> Option<ConfigNode> {
        match &self.store {
            MapStore::Insertion(m) => match m.lock().entry(key.clone()) {
                IndexEntry::Occupied(e) => Some(e.get().clone()),
                IndexEntry::Vacant(e) => {
                    e.insert(child);
                    None
                }
            },
            MapStore::Sorted(m) => match m.lock().entry(key.clone()) {
                BTreeEntry::Occupied(e) => Some(e.get().clone()),
                BTreeEntry::Vacant(e) => {
                    e.insert(child);
                    None
                }
            },
            MapStore::Unordered(m) => match m.entry(key.clone()) {
                DashEntry::Occupied(e) => Some(e.get().clone()),
                DashEntry::Vacant(e) => {
                    e.insert(child);
                    None
                }
            },
        }
    }

    /// Key/child pairs in iteration order, as of the call
    pub(crate) fn entries(&self) -> Vec<(Key, ConfigNode)> {
        match &self.store {
            MapStore::Insertion(m) => m.lock().iter().map(|(k, v)| (k.clone(), v.clone())).collect(),
            MapStore::Sorted(m) => m.lock().iter().map(|(k, v)| (k.clone(), v.clone())).collect(),
            MapStore::Unordered(m) => m
                .iter()
                .map(|e| (e.key().clone(), e.value().clone()))
                .collect(),
        }
    }

    pub(crate) fn children(&self) -> Vec<ConfigNode> {
        match &self.store {
            MapStore::Insertion(m) => m.lock().values().cloned().collect(),
            MapStore::Sorted(m) => m.lock().values().cloned().collect(),
            MapStore::Unordered(m) => m.iter().map(|e| e.value().clone()).collect(),
        }
    }

    pub(crate) fn len(&self) -> usize {
        match &self.store {
            MapStore::Insertion(m) => m.lock().len(),
            MapStore::Sorted(m) => m.lock().len(),
            MapStore::Unordered(m) => m.len(),
        }
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Swap in a fresh set of entries, returning the old children.
    ///
    /// The sharded store has no whole-map swap, so readers may briefly see it
    /// empty.
    pub(crate) fn replace(&self, entries: Vec<(Key, ConfigNode)>) -> Vec<ConfigNode> {
        match &self.store {
            MapStore::Insertion(m) => {
                let fresh: IndexMap<_, _> = entries.into_iter().collect();
                std::mem::replace(&mut *m.lock(), fresh).into_values().collect()
            }
            MapStore::Sorted(m) => {
                let fresh: BTreeMap<_, _> = entries.into_iter().collect();
                std::mem::replace(&mut *m.lock(), fresh).into_values().collect()
            }
            MapStore::Unordered(m) => {
                let keys: Vec<Key> = m.iter().map(|e| e.key().clone()).collect();
                let old = keys
                    .iter()
                    .filter_map(|k| m.remove(k).map(|(_, node)| node))
                    .collect();
                for (key, node) in entries {
                    m.insert(key, node);
                }
                old
            }
        }
    }

    pub(crate) fn take_children(&self) -> Vec<ConfigNode> {
        self.replace(Vec::new())
    }

    pub(crate) fn raw(&self) -> RawValue {
        RawValue::Map(
            self.entries()
                .into_iter()
                .filter_map(|(key, child)| child.get().map(|v| (key, v)))
                .collect(),
        )
    }
}

/// Maps compare as sets of entries, whatever their iteration order.
impl PartialEq for MapValue {
    fn eq(&self, other: &Self) -> bool {
        let ours = self.entries();
        ours.len() == other.len()
            && ours
                .iter()
                .all(|(key, child)| other.child(key).is_some_and(|theirs| *child == theirs))
    }
}

impl fmt::Debug for MapValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.entries()).finish()
    }
}
