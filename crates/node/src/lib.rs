//! Node engine for cfgtree
//!
//! This crate holds the mutable tree itself:
//! - ConfigNode: tree vertex with navigation, set/merge/copy and the
//!   attach/detach protocol
//! - Visitor: iterative depth-first traversal with container boundaries
//! - Walk: breadth-first and depth-first node iterators
//! - Transformation: pattern-driven moves, renames and versioned migrations
//!
//! Nodes are safe to share and mutate from many threads. Structural writes to
//! one node are serialized by that node's lock; list appends allocate their
//! index with a compare-and-swap so concurrent appends never collide.

#![warn(missing_docs)]
#![warn(clippy::all)]

mod access;
mod list;
mod map;
pub mod node;
pub mod transform;
pub mod value;
pub mod visitor;
pub mod walker;

pub use node::ConfigNode;
pub use transform::{
    ChainedTransformation, MoveStrategy, PathPattern, PatternTransformation, Transformation,
    TransformationBuilder, VersionedBuilder, VersionedTransformation,
};
pub use value::ValueType;
pub use visitor::Visitor;
pub use walker::{VisitedNode, Walk, WalkOrder};
