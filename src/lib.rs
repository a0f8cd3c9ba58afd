//! cfgtree - format-independent configuration tree engine
//!
//! cfgtree is the in-memory representation that sits between serialized
//! configuration documents and typed application objects. Loaders write into a
//! tree of [`ConfigNode`]s, emitters walk it with a [`Visitor`], and
//! applications read typed values back out.
//!
//! # Quick Start
//!
//! ```
//! use cfgtree::{ConfigNode, RawValue};
//!
//! let root = ConfigNode::new_root();
//!
//! // Navigating never modifies the tree
//! let port = root.node(["server", "port"]);
//! assert!(port.is_virtual());
//!
//! // Writing attaches the node and every missing ancestor
//! port.set(8080)?;
//! assert!(root.is_map());
//!
//! // Appends allocate their index when written
//! let hosts = root.node(["server", "hosts"]);
//! hosts.append_list_node().set("a.example")?;
//! hosts.append_list_node().set("b.example")?;
//! assert_eq!(hosts.get(), Some(RawValue::from(vec!["a.example", "b.example"])));
//! # Ok::<(), cfgtree::Error>(())
//! ```
//!
//! # Architecture
//!
//! - `cfgtree-core`: keys, scalars, raw values, paths, options and errors
//! - `cfgtree-node`: the node engine, visitors, walkers and transformations
//!
//! This crate re-exports both.

pub use cfgtree_core::{
    Error, Key, MapOrdering, NodePath, Options, PathParseError, RawValue, Result, Scalar,
    ScalarType, TreeConfig, CONFIG_FILE_NAME,
};
pub use cfgtree_node::transform::{self, actions};
pub use cfgtree_node::{
    ChainedTransformation, ConfigNode, MoveStrategy, PathPattern, PatternTransformation,
    Transformation, TransformationBuilder, ValueType, VersionedBuilder, VersionedTransformation,
    VisitedNode, Visitor, Walk, WalkOrder,
};
