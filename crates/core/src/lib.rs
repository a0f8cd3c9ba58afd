//! Core types for cfgtree
//!
//! This crate defines the data types shared by the node engine and by the
//! loaders built on top of it:
//! - Key: list index, map name, or the append placeholder
//! - Scalar / ScalarType: immutable leaf values and their runtime types
//! - RawValue: detached, owned value trees written into and read out of nodes
//! - NodePath: key sequence from a root to a node
//! - Options / TreeConfig: per-tree settings and their `cfgtree.toml` form
//! - Error: recoverable error type

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod error;
pub mod key;
pub mod options;
pub mod path;
pub mod raw;
pub mod scalar;

pub use config::{TreeConfig, CONFIG_FILE_NAME};
pub use error::{Error, Result};
pub use key::Key;
pub use options::{MapOrdering, Options};
pub use path::{NodePath, PathParseError};
pub use raw::RawValue;
pub use scalar::{Scalar, ScalarType};
