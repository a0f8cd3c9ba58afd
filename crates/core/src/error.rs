//! Error types for cfgtree
//!
//! Only recoverable conditions are represented here. Structural invariant
//! violations inside the node engine are bugs and panic instead.
//! We use `thiserror` for automatic `Display` and `Error` trait implementations.

use crate::path::NodePath;
use crate::scalar::ScalarType;
use std::io;
use thiserror::Error;

/// Result type alias for cfgtree operations
pub type Result<T> = std::result::Result<T, Error>;

/// Recoverable errors returned by tree operations
#[derive(Debug, Error)]
pub enum Error {
    /// A scalar's type is not accepted by the tree's options
    #[error("Type not accepted at '{path}': {found} values are not native to this tree")]
    TypeNotAccepted {
        /// Node the write was aimed at
        path: NodePath,
        /// Rejected scalar type
        found: ScalarType,
    },

    /// A transformation action refused to act on a node
    #[error("Transformation failed at '{path}': {reason}")]
    Transformation {
        /// Path the action was applied to
        path: NodePath,
        /// Why the action failed
        reason: String,
    },

    /// Invalid tree configuration
    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    /// I/O error while reading or writing configuration files
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<toml::de::Error> for Error {
    fn from(e: toml::de::Error) -> Self {
        Error::InvalidConfig(e.to_string())
    }
}

impl From<toml::ser::Error> for Error {
    fn from(e: toml::ser::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}
