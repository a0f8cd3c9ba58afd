//! Tree transformations
//!
//! A transformation rewrites a tree in place: renaming and moving nodes,
//! dropping obsolete ones, or filling in values. The usual use is migrating a
//! loaded document to the layout the program expects.
//!
//! - [`TransformationBuilder`] maps [`PathPattern`]s to actions. A pattern may
//!   contain wildcards (`*`) matching every child of a list or map.
//! - An action may return a new path; the node is then moved there using the
//!   builder's [`MoveStrategy`] and removed from its old place.
//! - [`VersionedBuilder`] runs a sequence of transformations keyed by version
//!   number and records the reached version in the tree.
//!
//! # Example
//!
//! ```
//! use cfgtree_node::transform::{actions, PathPattern, Transformation, TransformationBuilder};
//! use cfgtree_node::ConfigNode;
//!
//! let root = ConfigNode::new_root();
//! root.node(["servers", "eu", "addr"]).set("10.0.0.1").unwrap();
//! root.node(["servers", "us", "addr"]).set("10.0.0.2").unwrap();
//!
//! TransformationBuilder::new()
//!     .add_action("servers.*.addr".parse::<PathPattern>().unwrap(), actions::rename("host"))
//!     .build()
//!     .apply(&root)
//!     .unwrap();
//!
//! assert_eq!(root.node(["servers", "us", "host"]).get_string().as_deref(), Some("10.0.0.2"));
//! assert!(root.node(["servers", "eu", "addr"]).is_virtual());
//! ```

use crate::node::ConfigNode;
use cfgtree_core::{Key, NodePath, PathParseError, Result};
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use tracing::{debug, trace};

// ============================================================================
// Path patterns
// ============================================================================

/// One step of a [`PathPattern`]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PatternSegment {
    /// Exactly this key
    Key(Key),
    /// Any child of a list or map
    Wildcard,
}

/// Node path whose segments may be wildcards
///
/// Patterns order the actions of a transformation: segment by segment, with
/// concrete keys before wildcards, and a longer pattern before its own
/// prefix. Deeper nodes are therefore handled before their ancestors move.
///
/// The text form is a [`NodePath`] in which a `*` segment is a wildcard:
/// `servers.*.addr`, `hosts[0].*`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct PathPattern {
    segments: Vec<PatternSegment>,
}

impl PathPattern {
    /// Pattern matching only the node the transformation is applied to
    pub fn root() -> Self {
        PathPattern::default()
    }

    /// Append a concrete key
    pub fn key(mut self, key: impl Into<Key>) -> Self {
        self.segments.push(PatternSegment::Key(key.into()));
        self
    }

    /// Append a wildcard
    pub fn wildcard(mut self) -> Self {
        self.segments.push(PatternSegment::Wildcard);
        self
    }

    /// The pattern's segments
    pub fn segments(&self) -> &[PatternSegment] {
        &self.segments
    }

    /// Number of segments
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Whether this is the root pattern
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Whether `path` is matched by this pattern
    pub fn matches(&self, path: &NodePath) -> bool {
        self.segments.len() == path.len()
            && self
                .segments
                .iter()
                .zip(path.segments())
                .all(|(segment, key)| match segment {
                    PatternSegment::Wildcard => true,
                    PatternSegment::Key(expected) => expected == key,
                })
    }
}

impl From<NodePath> for PathPattern {
    fn from(path: NodePath) -> Self {
        PathPattern {
            segments: path.segments().iter().cloned().map(PatternSegment::Key).collect(),
        }
    }
}

impl FromStr for PathPattern {
    type Err = PathParseError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let mut pattern = PathPattern::root();
        if s.is_empty() {
            return Ok(pattern);
        }
        let mut offset = 0;
        for part in s.split('.') {
            match part {
                "" => return Err(PathParseError::EmptyKey(offset)),
                "*" => pattern.segments.push(PatternSegment::Wildcard),
                _ => {
                    let path: NodePath = part.parse().map_err(|e| shift_position(e, offset))?;
                    pattern
                        .segments
                        .extend(path.segments().iter().cloned().map(PatternSegment::Key));
                }
            }
            offset += part.len() + 1;
        }
        Ok(pattern)
    }
}

fn shift_position(err: PathParseError, offset: usize) -> PathParseError {
    match err {
        PathParseError::EmptyKey(p) => PathParseError::EmptyKey(p + offset),
        PathParseError::UnclosedBracket(p) => PathParseError::UnclosedBracket(p + offset),
        PathParseError::InvalidIndex(p, s) => PathParseError::InvalidIndex(p + offset, s),
        PathParseError::UnexpectedChar(c, p) => PathParseError::UnexpectedChar(c, p + offset),
    }
}

impl Ord for PathPattern {
    fn cmp(&self, other: &Self) -> Ordering {
        for (a, b) in self.segments.iter().zip(&other.segments) {
            let order = match (a, b) {
                (PatternSegment::Wildcard, PatternSegment::Wildcard) => Ordering::Equal,
                (PatternSegment::Wildcard, PatternSegment::Key(_)) => Ordering::Greater,
                (PatternSegment::Key(_), PatternSegment::Wildcard) => Ordering::Less,
                (PatternSegment::Key(a), PatternSegment::Key(b)) => a.cmp(b),
            };
            if order != Ordering::Equal {
                return order;
            }
        }
        other.segments.len().cmp(&self.segments.len())
    }
}

impl PartialOrd for PathPattern {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for PathPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            match segment {
                PatternSegment::Wildcard => {
                    if i > 0 {
                        f.write_str(".")?;
                    }
                    f.write_str("*")?;
                }
                PatternSegment::Key(Key::Name(name)) => {
                    if i > 0 {
                        f.write_str(".")?;
                    }
                    f.write_str(name)?;
                }
                PatternSegment::Key(Key::Index(index)) => write!(f, "[{}]", index)?,
                PatternSegment::Key(Key::Unallocated) => f.write_str("[]")?,
            }
        }
        Ok(())
    }
}

// ============================================================================
// Actions and move strategies
// ============================================================================

/// Action run on every node matched by a pattern
///
/// Receives the concrete path of the node and the node itself. Returning
/// `Some(path)` different from the input moves the node there.
pub type TransformAction =
    Box<dyn Fn(&NodePath, &ConfigNode) -> Result<Option<NodePath>> + Send + Sync>;

/// Ready-made actions
pub mod actions {
    use crate::node::ConfigNode;
    use cfgtree_core::{Error, Key, NodePath, RawValue, Result};

    /// Remove the matched node
    pub fn remove() -> impl Fn(&NodePath, &ConfigNode) -> Result<Option<NodePath>> + Send + Sync {
        |_, node| {
            node.set(())?;
            Ok(None)
        }
    }

    /// Move the matched node to a sibling named `key`
    ///
    /// Renaming the node the transformation is applied to fails with
    /// [`Error::Transformation`].
    pub fn rename(
        key: impl Into<Key>,
    ) -> impl Fn(&NodePath, &ConfigNode) -> Result<Option<NodePath>> + Send + Sync {
        let key = key.into();
        move |path, _| match path.parent() {
            Some(parent) => Ok(Some(parent.child(key.clone()))),
            None => Err(Error::Transformation {
                path: path.clone(),
                reason: "the root node cannot be renamed".to_string(),
            }),
        }
    }

    /// Overwrite the matched node with `value`
    pub fn set(
        value: impl Into<RawValue>,
    ) -> impl Fn(&NodePath, &ConfigNode) -> Result<Option<NodePath>> + Send + Sync {
        let value = value.into();
        move |_, node| {
            node.set(value.clone())?;
            Ok(None)
        }
    }

    /// Overwrite the matched node with a freshly produced value
    pub fn set_with<F>(supply: F) -> impl Fn(&NodePath, &ConfigNode) -> Result<Option<NodePath>> + Send + Sync
    where
        F: Fn() -> RawValue + Send + Sync,
    {
        move |_, node| {
            node.set(supply())?;
            Ok(None)
        }
    }
}

/// How a moved node's content lands at its destination
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MoveStrategy {
    /// Replace whatever is at the destination
    #[default]
    Overwrite,
    /// Merge into the destination, keeping values already there
    Merge,
}

impl MoveStrategy {
    /// Copy `source`'s content into `target`
    pub fn move_node(self, source: &ConfigNode, target: &ConfigNode) -> Result<()> {
        match self {
            MoveStrategy::Overwrite => target.set_node(source),
            MoveStrategy::Merge => target.merge_from(source),
        }
    }
}

// ============================================================================
// Transformations
// ============================================================================

/// An in-place rewrite of a tree
pub trait Transformation: Send + Sync {
    /// Rewrite the tree rooted at `node`
    ///
    /// # Errors
    ///
    /// The first error raised by an action, or by writing a moved node into
    /// its destination, stops the transformation. Changes already made stay.
    fn apply(&self, node: &ConfigNode) -> Result<()>;
}

impl<T: Transformation + ?Sized> Transformation for Box<T> {
    fn apply(&self, node: &ConfigNode) -> Result<()> {
        (**self).apply(node)
    }
}

/// Builder for a [`PatternTransformation`]
#[derive(Default)]
pub struct TransformationBuilder {
    actions: BTreeMap<PathPattern, TransformAction>,
    strategy: MoveStrategy,
}

impl TransformationBuilder {
    /// Empty builder using [`MoveStrategy::Overwrite`]
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `action` on every node matching `pattern`
    ///
    /// Adding a second action for an equal pattern replaces the first.
    pub fn add_action<F>(mut self, pattern: impl Into<PathPattern>, action: F) -> Self
    where
        F: Fn(&NodePath, &ConfigNode) -> Result<Option<NodePath>> + Send + Sync + 'static,
    {
        self.actions.insert(pattern.into(), Box::new(action));
        self
    }

    /// Strategy used when an action moves a node
    pub fn move_strategy(mut self, strategy: MoveStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Finish building
    pub fn build(self) -> PatternTransformation {
        PatternTransformation {
            actions: self.actions,
            strategy: self.strategy,
        }
    }
}

/// Transformation that runs actions on the nodes matching path patterns
///
/// Actions run in pattern order (see [`PathPattern`]); a wildcard visits
/// children in their iteration order. Patterns that reach a missing node
/// are skipped.
pub struct PatternTransformation {
    actions: BTreeMap<PathPattern, TransformAction>,
    strategy: MoveStrategy,
}

impl PatternTransformation {
    /// Strategy used when an action moves a node
    pub fn strategy(&self) -> MoveStrategy {
        self.strategy
    }

    fn apply_matching(
        &self,
        start: &ConfigNode,
        segments: &[PatternSegment],
        mut node: ConfigNode,
        mut path: NodePath,
        action: &TransformAction,
    ) -> Result<()> {
        for (i, segment) in segments.iter().enumerate() {
            match segment {
                PatternSegment::Key(key) => {
                    node = node.child(key);
                    if node.is_virtual() {
                        return Ok(());
                    }
                    path.push(key.clone());
                }
                PatternSegment::Wildcard => {
                    for child in node.children() {
                        if let Some(key) = child.key() {
                            let child_path = path.clone().child(key);
                            self.apply_matching(start, &segments[i + 1..], child, child_path, action)?;
                        }
                    }
                    return Ok(());
                }
            }
        }

        trace!(path = %path, "transform action matched");
        let target = match action(&path, &node)? {
            Some(target) if target != path => target,
            _ => return Ok(()),
        };
        self.strategy.move_node(&node, &start.node_at(&target))?;
        // Overwriting an ancestor may already have detached the source.
        if !node.is_virtual() {
            node.set(())?;
        }
        debug!(from = %path, to = %target, "moved node");
        Ok(())
    }
}

impl Transformation for PatternTransformation {
    fn apply(&self, node: &ConfigNode) -> Result<()> {
        for (pattern, action) in &self.actions {
            self.apply_matching(node, pattern.segments(), node.clone(), NodePath::root(), action)?;
        }
        Ok(())
    }
}

/// Transformations applied one after another
#[derive(Default)]
pub struct ChainedTransformation {
    steps: Vec<Box<dyn Transformation>>,
}

impl ChainedTransformation {
    /// Empty chain; applying it changes nothing
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a step
    pub fn then(mut self, step: impl Transformation + 'static) -> Self {
        self.steps.push(Box::new(step));
        self
    }
}

impl Transformation for ChainedTransformation {
    fn apply(&self, node: &ConfigNode) -> Result<()> {
        self.steps.iter().try_for_each(|step| step.apply(node))
    }
}

/// Builder for a [`VersionedTransformation`]
pub struct VersionedBuilder {
    version_key: NodePath,
    versions: BTreeMap<u32, Box<dyn Transformation>>,
}

impl Default for VersionedBuilder {
    fn default() -> Self {
        VersionedBuilder {
            version_key: NodePath::root().child("version"),
            versions: BTreeMap::new(),
        }
    }
}

impl VersionedBuilder {
    /// Empty builder storing the version at `version`
    pub fn new() -> Self {
        Self::default()
    }

    /// Store the version at `path` instead
    pub fn version_key(mut self, path: NodePath) -> Self {
        self.version_key = path;
        self
    }

    /// Transformation that upgrades a tree to `version`
    pub fn add_version(mut self, version: u32, step: impl Transformation + 'static) -> Self {
        self.versions.insert(version, Box::new(step));
        self
    }

    /// Finish building
    pub fn build(self) -> VersionedTransformation {
        VersionedTransformation {
            version_key: self.version_key,
            versions: self.versions,
        }
    }
}

/// Transformation that brings a tree up to the latest known version
///
/// Every step whose version is newer than the one stored in the tree runs,
/// in ascending version order. The last applied version is then written back.
/// A tree without a readable version runs every step.
pub struct VersionedTransformation {
    version_key: NodePath,
    versions: BTreeMap<u32, Box<dyn Transformation>>,
}

impl VersionedTransformation {
    /// Path of the version number
    pub fn version_key(&self) -> &NodePath {
        &self.version_key
    }

    /// Newest version a tree can be upgraded to
    pub fn latest_version(&self) -> Option<u32> {
        self.versions.keys().next_back().copied()
    }

    /// Version stored in the tree rooted at `node`
    pub fn version(&self, node: &ConfigNode) -> Option<u32> {
        node.node_at(&self.version_key)
            .get_i64()
            .and_then(|v| u32::try_from(v).ok())
    }
}

impl Transformation for VersionedTransformation {
    fn apply(&self, node: &ConfigNode) -> Result<()> {
        let mut current = self.version(node);
        for (&version, step) in &self.versions {
            if current.is_some_and(|c| version <= c) {
                continue;
            }
            step.apply(node)?;
            debug!(version, "applied versioned transformation");
            current = Some(version);
        }
        if let Some(version) = current {
            node.node_at(&self.version_key).set(version)?;
        }
        Ok(())
    }
}
