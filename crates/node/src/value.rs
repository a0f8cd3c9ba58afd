//! Node values
//!
//! Every node owns exactly one `Value`. Scalars are shared (`Scalar` is
//! cheap to clone); lists and maps sit behind an `Arc` so a reader can grab
//! the collection under the node lock and work on it after releasing the lock.

use crate::list::ListValue;
use crate::map::MapValue;
use crate::node::ConfigNode;
use cfgtree_core::{Key, MapOrdering, RawValue, Scalar};
use std::fmt;
use std::sync::Arc;

/// Shape of the value held by a node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueType {
    /// No content
    Null,
    /// Single immutable value
    Scalar,
    /// Index-addressed children
    List,
    /// Key-addressed children
    Map,
}

#[derive(Clone, Default)]
pub(crate) enum Value {
    #[default]
    Null,
    Scalar(Scalar),
    List(Arc<ListValue>),
    Map(Arc<MapValue>),
}

/// Freshly built children, not yet installed into any value.
///
/// Building happens outside the holder's lock; installing happens inside it.
pub(crate) enum Content {
    Scalar(Scalar),
    List(Vec<ConfigNode>),
    Map(Vec<(Key, ConfigNode)>),
}

impl Content {
    /// Build children for `holder` from a raw value. `None` for null input.
    pub(crate) fn from_raw(holder: &ConfigNode, raw: RawValue) -> Option<Content> {
        let content = match raw {
            RawValue::Null => return None,
            RawValue::Bool(b) => Content::Scalar(Scalar::Bool(b)),
            RawValue::Int(i) => Content::Scalar(Scalar::Int(i)),
            RawValue::Float(f) => Content::Scalar(Scalar::Float(f)),
            RawValue::String(s) => Content::Scalar(Scalar::String(s.into())),
            RawValue::List(items) => Content::List(
                items
                    .into_iter()
                    .filter(|item| !item.is_null())
                    .enumerate()
                    .map(|(i, item)| holder.attached_child_from_raw(Key::Index(i), item))
                    .collect(),
            ),
            RawValue::Map(entries) => Content::Map(
                entries
                    .into_iter()
                    .filter(|(_, item)| !item.is_null())
                    .map(|(key, item)| {
                        let child = holder.attached_child_from_raw(key.clone(), item);
                        (key, child)
                    })
                    .collect(),
            ),
        };
        Some(content)
    }

    /// Deep-copy the children of a list or map value under `holder`.
    ///
    /// Every child is copied, null ones included, and keeps its key.
    pub(crate) fn copy_of(holder: &ConfigNode, value: &Value) -> Option<Content> {
        match value {
            Value::Null => None,
            Value::Scalar(s) => Some(Content::Scalar(s.clone())),
            Value::List(list) => Some(Content::List(
                list.children()
                    .iter()
                    .enumerate()
                    .map(|(i, child)| child.copy_into(Some(holder), Some(Key::Index(i))))
                    .collect(),
            )),
            Value::Map(map) => Some(Content::Map(
                map.entries()
                    .into_iter()
                    .map(|(key, child)| {
                        let copy = child.copy_into(Some(holder), Some(key.clone()));
                        (key, copy)
                    })
                    .collect(),
            )),
        }
    }
}

impl Value {
    pub(crate) fn from_content(ordering: MapOrdering, content: Content) -> Value {
        match content {
            Content::Scalar(s) => Value::Scalar(s),
            Content::List(children) => Value::List(Arc::new(ListValue::with_children(children))),
            Content::Map(entries) => Value::Map(Arc::new(MapValue::with_entries(ordering, entries))),
        }
    }

    pub(crate) fn value_type(&self) -> ValueType {
        match self {
            Value::Null => ValueType::Null,
            Value::Scalar(_) => ValueType::Scalar,
            Value::List(_) => ValueType::List,
            Value::Map(_) => ValueType::Map,
        }
    }

    pub(crate) fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Deep materialization into a detached raw value
    pub(crate) fn get(&self) -> Option<RawValue> {
        match self {
            Value::Null => None,
            Value::Scalar(s) => Some(RawValue::from(s)),
            Value::List(list) => Some(list.raw()),
            Value::Map(map) => Some(map.raw()),
        }
    }

    pub(crate) fn child(&self, key: &Key) -> Option<ConfigNode> {
        match self {
            Value::List(list) => list.child(key),
            Value::Map(map) => map.child(key),
            Value::Null | Value::Scalar(_) => None,
        }
    }

    /// Insert, replace or (with `None`) remove the child at `key`.
    ///
    /// Null and scalar values hold no children; the call is ignored.
    pub(crate) fn put_child(&self, key: &Key, child: Option<ConfigNode>) -> Option<ConfigNode> {
        match self {
            Value::List(list) => list.put_child(key, child, false),
            Value::Map(map) => map.put_child(key, child),
            Value::Null | Value::Scalar(_) => None,
        }
    }

    /// Insert `child` unless a child is already present; returns the resident one.
    pub(crate) fn put_child_if_absent(&self, key: &Key, child: ConfigNode) -> Option<ConfigNode> {
        match self {
            Value::List(list) => list.put_child(key, Some(child), true),
            Value::Map(map) => map.put_child_if_absent(key, child),
            Value::Null | Value::Scalar(_) => None,
        }
    }

    pub(crate) fn children(&self) -> Vec<ConfigNode> {
        match self {
            Value::List(list) => list.children().to_vec(),
            Value::Map(map) => map.children(),
            Value::Null | Value::Scalar(_) => Vec::new(),
        }
    }

    pub(crate) fn is_empty(&self) -> bool {
        match self {
            Value::Null => true,
            Value::Scalar(s) => s.is_empty(),
            Value::List(list) => list.is_empty(),
            Value::Map(map) => map.is_empty(),
        }
    }

    /// Empty the child collection, returning the removed children for the
    /// caller to detach.
    pub(crate) fn take_children(&self) -> Vec<ConfigNode> {
        match self {
            Value::List(list) => list.take_children(),
            Value::Map(map) => map.take_children(),
            Value::Null | Value::Scalar(_) => Vec::new(),
        }
    }

    /// Write `content` into this value.
    ///
    /// A list or map of the matching shape keeps its identity and has its
    /// children swapped out; any other value is replaced. Returns every child
    /// that is no longer part of the value.
    pub(crate) fn install(&mut self, ordering: MapOrdering, content: Content) -> Vec<ConfigNode> {
        let content = match (&*self, content) {
            (Value::List(list), Content::List(children)) => return list.replace(children),
            (Value::Map(map), Content::Map(entries)) => return map.replace(entries),
            (_, content) => content,
        };
        let old = std::mem::replace(self, Value::from_content(ordering, content));
        old.take_children()
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Scalar(a), Value::Scalar(b)) => a == b,
            (Value::List(a), Value::List(b)) => Arc::ptr_eq(a, b) || **a == **b,
            (Value::Map(a), Value::Map(b)) => Arc::ptr_eq(a, b) || **a == **b,
            _ => false,
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("Null"),
            Value::Scalar(s) => write!(f, "{:?}", s),
            Value::List(list) => fmt::Debug::fmt(&**list, f),
            Value::Map(map) => fmt::Debug::fmt(&**map, f),
        }
    }
}
