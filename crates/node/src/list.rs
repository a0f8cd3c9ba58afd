//! List storage
//!
//! The backing vector is never mutated in place. Writers clone the current
//! vector, edit the clone and install it with a compare-and-swap, retrying
//! when another writer got there first. Readers load a snapshot without
//! blocking.
//!
//! The index of an appended element is decided inside the winning swap, so
//! two concurrent appends can never claim the same position.

use crate::node::ConfigNode;
use arc_swap::ArcSwap;
use cfgtree_core::{Key, RawValue, Scalar};
use std::fmt;
use std::sync::Arc;
use tracing::trace;

pub(crate) struct ListValue {
    values: ArcSwap<Vec<ConfigNode>>,
}

impl ListValue {
    pub(crate) fn new() -> Self {
        Self::with_children(Vec::new())
    }

    pub(crate) fn with_children(children: Vec<ConfigNode>) -> Self {
        ListValue {
            values: ArcSwap::from_pointee(children),
        }
    }

    /// List whose first element holds a former scalar value of `holder`
    pub(crate) fn seeded(holder: &ConfigNode, seed: Scalar) -> Self {
        let first = holder.attached_child_from_raw(Key::Index(0), RawValue::from(&seed));
        Self::with_children(vec![first])
    }

    /// Snapshot of the current children
    pub(crate) fn children(&self) -> Arc<Vec<ConfigNode>> {
        self.values.load_full()
    }

    pub(crate) fn len(&self) -> usize {
        self.values.load().len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub(crate) fn child(&self, key: &Key) -> Option<ConfigNode> {
        let index = key.to_index()?;
        self.values.load().get(index).cloned()
    }

    /// Insert, replace or remove the element at `key`.
    ///
    /// - `None` removes the element and shifts the keys of later elements
    ///   down by one.
    /// - An index inside the list replaces that element, or leaves it in place
    ///   when `only_if_absent` is set.
    /// - [`Key::Unallocated`], or any index at or past the end, appends.
    ///
    /// Returns the element previously at the position, if any.
    pub(crate) fn put_child(
        &self,
        key: &Key,
        child: Option<ConfigNode>,
        only_if_absent: bool,
    ) -> Option<ConfigNode> {
        let position = match key {
            Key::Unallocated => None,
            other => Some(other.to_index()?),
        };

        loop {
            let current = self.values.load_full();
            let mut next: Vec<ConfigNode> = (*current).clone();

            let mut appended_at = None;
            let (previous, removed_at) = match &child {
                None => match position {
                    Some(i) if i < next.len() => (Some(next.remove(i)), Some(i)),
                    _ => return None,
                },
                Some(node) => match position {
                    Some(i) if i < next.len() => {
                        if only_if_absent {
                            return Some(next[i].clone());
                        }
                        node.set_key(Key::Index(i));
                        (Some(std::mem::replace(&mut next[i], node.clone())), None)
                    }
                    _ => {
                        let index = next.len();
                        node.set_key(Key::Index(index));
                        next.push(node.clone());
                        appended_at = Some(index);
                        (None, None)
                    }
                },
            };

            let installed = self.values.compare_and_swap(&current, Arc::new(next));
            if Arc::ptr_eq(&*installed, &current) {
                if let Some(from) = removed_at {
                    self.renumber_from(from);
                } else if let Some(index) = appended_at {
                    trace!(index, "list index allocated");
                }
                return previous;
            }
            trace!(key = %key, "list swap lost, retrying");
        }
    }

    /// Rewrite element keys from `from` onwards to match their positions.
    ///
    /// Concurrent removals can interleave their renumbering; each pass checks
    /// that the snapshot it renumbered is still current and repeats if not.
    fn renumber_from(&self, from: usize) {
        loop {
            let snapshot = self.values.load_full();
            for (i, node) in snapshot.iter().enumerate().skip(from) {
                node.set_key(Key::Index(i));
            }
            if Arc::ptr_eq(&snapshot, &self.values.load()) {
                return;
            }
        }
    }

    /// Swap in a fresh set of children, returning the old ones.
    pub(crate) fn replace(&self, children: Vec<ConfigNode>) -> Vec<ConfigNode> {
        let old = self.values.swap(Arc::new(children));
        Arc::try_unwrap(old).unwrap_or_else(|shared| (*shared).clone())
    }

    pub(crate) fn take_children(&self) -> Vec<ConfigNode> {
        self.replace(Vec::new())
    }

    pub(crate) fn raw(&self) -> RawValue {
        RawValue::List(self.values.load().iter().filter_map(ConfigNode::get).collect())
    }
}

impl PartialEq for ListValue {
    fn eq(&self, other: &Self) -> bool {
        let ours = self.children();
        let theirs = other.children();
        ours.len() == theirs.len() && ours.iter().zip(theirs.iter()).all(|(a, b)| a == b)
    }
}

impl fmt::Debug for ListValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.values.load().iter()).finish()
    }
}
