//! Configuration nodes
//!
//! A [`ConfigNode`] is a cheap, cloneable handle to one vertex of a tree.
//! Navigating to a path that does not exist yet returns a *virtual* node: a
//! scratch object that remembers where it would live but is not reachable from
//! the root. Writing a value to a virtual node (or to any of its descendants)
//! promotes it, attaching every virtual ancestor top-down and materializing
//! the intermediate lists and maps on the way.
//!
//! # Ownership
//!
//! Parents own their children through their value. An attached child only
//! holds a weak link back to its parent. A virtual or detached node holds a
//! strong link instead, so a chain built by navigation keeps its ancestors
//! alive until it is either attached or dropped.
//!
//! # Locking
//!
//! Each node has one mutex around its value slot. It is held only for the
//! O(1) read-modify-write of the slot; building new children, detaching old
//! ones and walking subtrees all happen outside it. The only nesting is
//! parent value lock, then child parent-link lock, during attachment.

use crate::list::ListValue;
use crate::map::MapValue;
use crate::value::{Content, Value, ValueType};
use cfgtree_core::{Error, Key, NodePath, Options, RawValue, Result};
use indexmap::IndexMap;
use parking_lot::{Mutex, RwLock};
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};
use tracing::{debug, error, trace};

enum ParentLink {
    None,
    Owned(ConfigNode),
    Weak(Weak<NodeInner>),
}

struct NodeInner {
    key: RwLock<Option<Key>>,
    parent: Mutex<ParentLink>,
    value: Mutex<Value>,
    attached: AtomicBool,
    options: Arc<Options>,
}

/// Handle to a node in a configuration tree
///
/// Cloning the handle is cheap and yields another handle to the same node.
///
/// # Examples
///
/// ```
/// use cfgtree_node::ConfigNode;
///
/// let root = ConfigNode::new_root();
/// let port = root.node(["server", "port"]);
/// assert!(port.is_virtual());
///
/// port.set(8080).unwrap();
/// assert!(!root.node(["server"]).is_virtual());
/// assert_eq!(root.node(["server", "port"]).get_i64(), Some(8080));
/// ```
#[derive(Clone)]
pub struct ConfigNode {
    inner: Arc<NodeInner>,
}

impl ConfigNode {
    // ========================================================================
    // Construction
    // ========================================================================

    /// Create an empty, attached root node sharing `options`
    pub fn root(options: Arc<Options>) -> Self {
        Self::build(None, ParentLink::None, options, true)
    }

    /// Create an empty root with the process-wide default options
    pub fn new_root() -> Self {
        Self::root(Options::defaults())
    }

    fn build(key: Option<Key>, parent: ParentLink, options: Arc<Options>, attached: bool) -> Self {
        ConfigNode {
            inner: Arc::new(NodeInner {
                key: RwLock::new(key),
                parent: Mutex::new(parent),
                value: Mutex::new(Value::Null),
                attached: AtomicBool::new(attached),
                options,
            }),
        }
    }

    fn virtual_child(&self, key: Key) -> ConfigNode {
        Self::build(
            Some(key),
            ParentLink::Owned(self.clone()),
            Arc::clone(&self.inner.options),
            false,
        )
    }

    fn new_attached_child(&self, key: Key) -> ConfigNode {
        Self::build(
            Some(key),
            ParentLink::Weak(Arc::downgrade(&self.inner)),
            Arc::clone(&self.inner.options),
            true,
        )
    }

    /// New child of `self`, already marked attached and filled from `raw`.
    ///
    /// The child is not inserted into `self`'s value; the caller does that.
    pub(crate) fn attached_child_from_raw(&self, key: Key, raw: RawValue) -> ConfigNode {
        let child = self.new_attached_child(key);
        if let Some(content) = Content::from_raw(&child, raw) {
            *child.inner.value.lock() = Value::from_content(child.options().map_ordering(), content);
        }
        child
    }

    /// Deep copy of this node, owned by `holder` (or parentless).
    ///
    /// The copy takes `holder`'s options when there is one.
    pub(crate) fn copy_into(&self, holder: Option<&ConfigNode>, key: Option<Key>) -> ConfigNode {
        let (link, options) = match holder {
            Some(h) => (
                ParentLink::Weak(Arc::downgrade(&h.inner)),
                Arc::clone(&h.inner.options),
            ),
            None => (ParentLink::None, Arc::clone(&self.inner.options)),
        };
        let copy = Self::build(key, link, options, true);
        let source = self.current_value();
        if let Some(content) = Content::copy_of(&copy, &source) {
            *copy.inner.value.lock() = Value::from_content(copy.options().map_ordering(), content);
        }
        copy
    }

    /// Deep copy of this node and its subtree
    ///
    /// The copy keeps this node's key and options but has no parent, so it is
    /// the attached root of a new tree. Scalars are shared, not duplicated.
    pub fn copy(&self) -> ConfigNode {
        self.copy_into(None, self.key())
    }

    // ========================================================================
    // Identity and structure
    // ========================================================================

    /// Whether two handles refer to the same node
    pub fn ptr_eq(&self, other: &ConfigNode) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// Key of this node within its parent (`None` for most roots)
    pub fn key(&self) -> Option<Key> {
        self.inner.key.read().clone()
    }

    pub(crate) fn set_key(&self, key: Key) {
        *self.inner.key.write() = Some(key);
    }

    /// Options shared by every node of this tree
    pub fn options(&self) -> &Arc<Options> {
        &self.inner.options
    }

    /// Parent node, if this node has one that is still alive
    pub fn parent(&self) -> Option<ConfigNode> {
        match &*self.inner.parent.lock() {
            ParentLink::None => None,
            ParentLink::Owned(parent) => Some(parent.clone()),
            ParentLink::Weak(weak) => weak.upgrade().map(|inner| ConfigNode { inner }),
        }
    }

    /// Whether this node has no parent
    pub fn is_root(&self) -> bool {
        matches!(&*self.inner.parent.lock(), ParentLink::None)
    }

    /// Whether this node is unreachable from its root
    pub fn is_virtual(&self) -> bool {
        !self.inner.attached.load(Ordering::Acquire)
    }

    /// Keys from the root down to this node, recomputed on every call
    pub fn path(&self) -> NodePath {
        let mut segments = Vec::new();
        let mut current = self.clone();
        while let Some(parent) = current.parent() {
            if let Some(key) = current.key() {
                segments.push(key);
            }
            current = parent;
        }
        segments.reverse();
        NodePath::from_segments(segments)
    }

    pub(crate) fn current_value(&self) -> Value {
        self.inner.value.lock().clone()
    }

    // ========================================================================
    // Reading
    // ========================================================================

    /// Detached copy of this node's content (`None` when null)
    pub fn get(&self) -> Option<RawValue> {
        self.current_value().get()
    }

    /// Shape of this node's value
    pub fn value_type(&self) -> ValueType {
        self.inner.value.lock().value_type()
    }

    /// Whether this node holds no value
    pub fn is_null(&self) -> bool {
        self.inner.value.lock().is_null()
    }

    /// Whether this node holds a list
    pub fn is_list(&self) -> bool {
        self.value_type() == ValueType::List
    }

    /// Whether this node holds a map
    pub fn is_map(&self) -> bool {
        self.value_type() == ValueType::Map
    }

    /// Whether the value is null, an empty string, or a childless list or map
    pub fn is_empty(&self) -> bool {
        self.current_value().is_empty()
    }

    /// Whether a child exists at `key`
    pub fn has_child(&self, key: impl Into<Key>) -> bool {
        self.current_value().child(&key.into()).is_some()
    }

    /// List children in index order; empty unless this node is a list
    pub fn children_list(&self) -> Vec<ConfigNode> {
        match self.current_value() {
            Value::List(list) => list.children().to_vec(),
            _ => Vec::new(),
        }
    }

    /// Map children in iteration order; empty unless this node is a map
    pub fn children_map(&self) -> IndexMap<Key, ConfigNode> {
        match self.current_value() {
            Value::Map(map) => map.entries().into_iter().collect(),
            _ => IndexMap::new(),
        }
    }

    /// Children of a list or map, in iteration order
    pub(crate) fn children(&self) -> Vec<ConfigNode> {
        self.current_value().children()
    }

    // ========================================================================
    // Navigation
    // ========================================================================

    /// Follow `path` from this node without modifying the tree
    ///
    /// Never fails: missing segments yield a chain of virtual nodes, the last
    /// of which is returned.
    pub fn node<I>(&self, path: I) -> ConfigNode
    where
        I: IntoIterator,
        I::Item: Into<Key>,
    {
        let mut pointer = self.clone();
        for key in path {
            pointer = pointer.get_child(key.into(), false);
        }
        pointer
    }

    /// Follow a parsed [`NodePath`] from this node
    pub fn node_at(&self, path: &NodePath) -> ConfigNode {
        self.node(path.segments())
    }

    /// Existing child at `key`, or a virtual one
    pub fn child(&self, key: impl Into<Key>) -> ConfigNode {
        self.get_child(key.into(), false)
    }

    /// Existing child at `key`, or a new empty child attached in its place
    ///
    /// Attaches this node first if needed. When another thread attaches a
    /// child at the same key first, that child is returned.
    pub fn attached_child(&self, key: impl Into<Key>) -> ConfigNode {
        self.get_child(key.into(), true)
    }

    /// Virtual child that becomes the next list element once written
    ///
    /// Its index is allocated at attachment time, so concurrent appends never
    /// collide.
    pub fn append_list_node(&self) -> ConfigNode {
        self.get_child(Key::Unallocated, false)
    }

    fn get_child(&self, key: Key, attach: bool) -> ConfigNode {
        if let Some(child) = self.current_value().child(&key) {
            return child;
        }
        if !attach {
            return self.virtual_child(key);
        }
        self.attach_if_necessary();
        let child = self.virtual_child(key);
        self.attach_child(&child, true)
    }

    // ========================================================================
    // Attachment
    // ========================================================================

    /// Promote this node and its virtual ancestors into the tree.
    fn attach_if_necessary(&self) {
        if !self.is_virtual() {
            return;
        }
        let parent = match self.parent_ensure_attached() {
            Some(parent) => parent,
            None => invariant_violation(self, "virtual node has no parent"),
        };
        trace!(path = %self.path(), "promoting virtual node");
        parent.attach_child(self, false);
    }

    /// Promote this node unless its key is already occupied.
    ///
    /// Returns the node resident at the key afterwards: this node, or the one
    /// another writer attached first.
    fn attach_if_absent(&self) -> ConfigNode {
        if !self.is_virtual() {
            return self.clone();
        }
        let parent = match self.parent_ensure_attached() {
            Some(parent) => parent,
            None => invariant_violation(self, "virtual node has no parent"),
        };
        parent.attach_child(self, true)
    }

    /// Attached parent of this node, attaching virtual ancestors on the way.
    ///
    /// When a racing writer already attached a different node at an
    /// ancestor's key, this node is re-parented onto the winner.
    fn parent_ensure_attached(&self) -> Option<ConfigNode> {
        let parent = self.parent()?;
        if !parent.is_virtual() {
            return Some(parent);
        }
        let grandparent = match parent.parent_ensure_attached() {
            Some(grandparent) => grandparent,
            None => invariant_violation(&parent, "virtual node has no parent"),
        };
        let resident = grandparent.attach_child(&parent, true);
        if !resident.ptr_eq(&parent) {
            self.reparent_if_virtual(&resident);
        }
        Some(resident)
    }

    /// Point a still-virtual node at `parent`.
    ///
    /// A racing writer may have attached this node (and downgraded its link)
    /// since the caller looked; an attached node keeps its weak link so it
    /// never holds its owner strongly.
    fn reparent_if_virtual(&self, parent: &ConfigNode) {
        let mut link = self.inner.parent.lock();
        if self.inner.attached.load(Ordering::Acquire) {
            return;
        }
        *link = ParentLink::Owned(parent.clone());
    }

    /// Insert `child` into this node's value, promoting the value to a list
    /// or map as the child's key requires.
    ///
    /// With `only_if_absent`, an existing child at the key wins and is
    /// returned. Otherwise `child` replaces whatever was there.
    fn attach_child(&self, child: &ConfigNode, only_if_absent: bool) -> ConfigNode {
        if self.is_virtual() {
            invariant_violation(self, "cannot attach a child to a virtual node");
        }
        match child.parent_ensure_attached() {
            Some(parent) if parent.ptr_eq(self) => {}
            _ => invariant_violation(child, "child's parent is not the attaching node"),
        }

        let (resident, evicted, replaced) = {
            let mut slot = self.inner.value.lock();
            let key = match child.key() {
                Some(key) => key,
                None => invariant_violation(child, "attached child has no key"),
            };

            if !child.is_virtual() {
                // Lost a race with another writer promoting the same handle.
                if slot.child(&key).is_some_and(|resident| resident.ptr_eq(child)) {
                    return child.clone();
                }
                invariant_violation(child, "node is already attached elsewhere");
            }

            let transitioned = match &*slot {
                Value::Map(_) if key.is_unallocated() => Some(Value::List(Arc::new(ListValue::new()))),
                Value::Map(_) => None,
                Value::List(_) if key.is_index() => None,
                Value::Null if key.is_index() => Some(Value::List(Arc::new(ListValue::new()))),
                Value::Scalar(s) if key.is_index() => {
                    Some(Value::List(Arc::new(ListValue::seeded(self, s.clone()))))
                }
                _ => Some(Value::Map(Arc::new(MapValue::new(self.options().map_ordering())))),
            };
            let target = transitioned.as_ref().unwrap_or(&*slot);

            let (resident, evicted) = if only_if_absent {
                match target.put_child_if_absent(&key, child.clone()) {
                    Some(existing) => (existing, None),
                    None => (child.clone(), None),
                }
            } else {
                (child.clone(), target.put_child(&key, Some(child.clone())))
            };

            let replaced = transitioned.map(|value| std::mem::replace(&mut *slot, value));
            if resident.ptr_eq(child) {
                child.mark_attached();
            }
            (resident, evicted, replaced)
        };

        if let Some(old) = replaced {
            if matches!(old.value_type(), ValueType::List | ValueType::Map) {
                debug!(
                    path = %self.path(),
                    from = ?old.value_type(),
                    "container replaced on attach; dropping its children"
                );
            }
            for orphan in old.take_children() {
                orphan.detach();
            }
        }
        if let Some(evicted) = evicted {
            if !evicted.ptr_eq(child) {
                evicted.detach();
            }
        }
        if resident.ptr_eq(child) {
            trace!(path = %child.path(), "attached node");
        }
        resident
    }

    fn mark_attached(&self) {
        let mut link = self.inner.parent.lock();
        self.inner.attached.store(true, Ordering::Release);
        if let ParentLink::Owned(parent) = &*link {
            let weak = Arc::downgrade(&parent.inner);
            *link = ParentLink::Weak(weak);
        }
    }

    /// Flag this node as virtual again, keeping its parent alive.
    ///
    /// A node whose parent is already gone has nowhere to be re-attached, so
    /// it becomes a root of its own.
    fn mark_detached(&self) {
        let mut link = self.inner.parent.lock();
        match &*link {
            ParentLink::Weak(weak) => match weak.upgrade() {
                Some(inner) => {
                    *link = ParentLink::Owned(ConfigNode { inner });
                    self.inner.attached.store(false, Ordering::Release);
                }
                None => {
                    *link = ParentLink::None;
                    self.inner.attached.store(true, Ordering::Release);
                }
            },
            ParentLink::Owned(_) => self.inner.attached.store(false, Ordering::Release),
            ParentLink::None => {}
        }
    }

    /// Detach this node and release its subtree.
    fn detach(&self) {
        self.mark_detached();
        self.clear();
        trace!(key = ?self.key(), "detached node");
    }

    /// Reset this node to null, detaching every descendant.
    ///
    /// Uses a work list so deep trees do not exhaust the stack. Children are
    /// marked detached while their parent is still alive, so each one ends up
    /// holding its former parent.
    fn clear(&self) {
        let mut pending = vec![self.clone()];
        while let Some(node) = pending.pop() {
            for child in node.take_value_children() {
                child.mark_detached();
                pending.push(child);
            }
        }
    }

    fn take_value_children(&self) -> Vec<ConfigNode> {
        let old = std::mem::take(&mut *self.inner.value.lock());
        old.take_children()
    }

    // ========================================================================
    // Writing
    // ========================================================================

    /// Write a raw value into this node
    ///
    /// Lists become list values and maps become map values; anything else is
    /// stored as a scalar. Writing null removes the node from its parent (or
    /// clears it, for a root). Virtual nodes are attached first.
    ///
    /// # Errors
    ///
    /// [`Error::TypeNotAccepted`] if the value contains a scalar type the
    /// tree's options reject. The node is left unchanged.
    pub fn set(&self, value: impl Into<RawValue>) -> Result<()> {
        let raw = value.into();
        if raw.is_null() {
            self.remove_from_parent();
            return Ok(());
        }
        self.check_accepted(&raw)?;
        self.insert_new_value(raw, false);
        Ok(())
    }

    /// Write a copy of another node's content into this node
    ///
    /// List and map children are deep-copied under this node and adopt this
    /// tree's options; scalar and null content behave like [`set`](Self::set).
    pub fn set_node(&self, other: &ConfigNode) -> Result<()> {
        if other.ptr_eq(self) {
            return Ok(());
        }
        let source = other.current_value();
        match &source {
            Value::List(_) | Value::Map(_) => {
                if let Some(raw) = source.get() {
                    self.check_accepted(&raw)?;
                }
                self.attach_if_necessary();
                if let Some(content) = Content::copy_of(self, &source) {
                    self.install(content);
                }
                Ok(())
            }
            Value::Null | Value::Scalar(_) => self.set(source.get()),
        }
    }

    /// Merge another node's content into this one without overwriting
    ///
    /// - Map into map (or into null): every key missing here is copied over;
    ///   keys present on both sides merge recursively. A null on the other
    ///   side never replaces a non-null value here.
    /// - Anything else is written only if this node is null.
    /// - Merging a map into a scalar or list does nothing.
    pub fn merge_from(&self, other: &ConfigNode) -> Result<()> {
        if let Some(raw) = other.get() {
            self.check_accepted(&raw)?;
        }

        if !other.is_map() {
            if let Some(raw) = other.get() {
                self.insert_new_value(raw, true);
            }
            return Ok(());
        }

        self.attach_if_necessary();
        let map = {
            let mut slot = self.inner.value.lock();
            match &*slot {
                Value::Map(map) => Arc::clone(map),
                Value::Null => {
                    let map = Arc::new(MapValue::new(self.options().map_ordering()));
                    *slot = Value::Map(Arc::clone(&map));
                    map
                }
                Value::Scalar(_) | Value::List(_) => return Ok(()),
            }
        };

        for (key, theirs) in other.children_map() {
            let theirs_null = theirs.is_null();
            if theirs_null && map.child(&key).is_some_and(|ours| !ours.is_null()) {
                continue;
            }
            let fresh = self.new_attached_child(key.clone());
            if !theirs_null {
                fresh.set_node(&theirs)?;
            }
            if let Some(existing) = map.put_child_if_absent(&key, fresh.clone()) {
                existing.merge_from(&fresh)?;
            }
        }
        Ok(())
    }

    /// Remove the child at `key`, detaching it and clearing its subtree
    ///
    /// Returns whether a child was removed. Removing a list element shifts
    /// the keys of the elements after it.
    pub fn remove_child(&self, key: impl Into<Key>) -> bool {
        let key = key.into();
        match self.current_value().put_child(&key, None) {
            Some(removed) => {
                removed.detach();
                true
            }
            None => false,
        }
    }

    fn remove_from_parent(&self) {
        if let (Some(parent), Some(key)) = (self.parent(), self.key()) {
            parent.remove_child(key);
        }
        self.clear();
    }

    pub(crate) fn check_accepted(&self, raw: &RawValue) -> Result<()> {
        match self.options().first_rejected(raw) {
            Some(found) => Err(Error::TypeNotAccepted {
                path: self.path(),
                found,
            }),
            None => Ok(()),
        }
    }

    /// Attach, build `raw` outside the lock, then install it.
    ///
    /// With `only_if_null`, nothing is written unless the node is null; a
    /// virtual node whose key is already taken writes into the resident node
    /// under the same condition. The return value says whether a write
    /// happened.
    pub(crate) fn insert_new_value(&self, raw: RawValue, only_if_null: bool) -> bool {
        if only_if_null {
            if !self.is_null() {
                return false;
            }
            let resident = self.attach_if_absent();
            if !resident.ptr_eq(self) {
                return resident.insert_new_value(raw, true);
            }
        } else {
            self.attach_if_necessary();
        }
        let content = match Content::from_raw(self, raw) {
            Some(content) => content,
            None => return false,
        };

        let displaced = {
            let mut slot = self.inner.value.lock();
            if only_if_null && !slot.is_null() {
                return false;
            }
            slot.install(self.options().map_ordering(), content)
        };
        for orphan in displaced {
            orphan.detach();
        }
        true
    }

    fn install(&self, content: Content) {
        let displaced = self
            .inner
            .value
            .lock()
            .install(self.options().map_ordering(), content);
        for orphan in displaced {
            orphan.detach();
        }
    }
}

#[cold]
#[track_caller]
fn invariant_violation(node: &ConfigNode, what: &str) -> ! {
    let path = node.path();
    error!(path = %path, "{}", what);
    panic!("node invariant violated at '{}': {}", path, what);
}

/// Nodes are equal when their keys and values are structurally equal
impl PartialEq for ConfigNode {
    fn eq(&self, other: &Self) -> bool {
        if self.ptr_eq(other) {
            return true;
        }
        self.key() == other.key() && self.current_value() == other.current_value()
    }
}

impl fmt::Debug for ConfigNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfigNode")
            .field("key", &self.key())
            .field("virtual", &self.is_virtual())
            .field("value", &self.current_value())
            .finish()
    }
}
