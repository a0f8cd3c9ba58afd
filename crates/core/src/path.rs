//! Node paths
//!
//! A [`NodePath`] is the sequence of keys leading from a root to a node. Nodes
//! never store their path: keys shift when list elements are removed, so the
//! path is recomputed from parent links on demand.
//!
//! # Path Syntax
//!
//! | Syntax | Meaning | Example |
//! |--------|---------|---------|
//! | `key` | Map entry | `server` |
//! | `[n]` | List index | `[0]` |
//! | `a.b` | Nested entries | `server.port` |
//! | `a[n]` | Entry then index | `hosts[0]` |
//! | (empty) | Root | `` |

use crate::key::Key;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Error type for path parsing
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PathParseError {
    /// Empty key in path
    #[error("empty key in path at position {0}")]
    EmptyKey(usize),
    /// Unclosed bracket
    #[error("unclosed bracket starting at position {0}")]
    UnclosedBracket(usize),
    /// Invalid list index
    #[error("invalid list index at position {0}: {1}")]
    InvalidIndex(usize, String),
    /// Unexpected character
    #[error("unexpected character '{0}' at position {1}")]
    UnexpectedChar(char, usize),
}

/// Sequence of keys from a root to a node
///
/// # Examples
///
/// ```
/// use cfgtree_core::{Key, NodePath};
///
/// let port = NodePath::root().child("server").child("port");
/// assert_eq!(port.to_string(), "server.port");
///
/// let parsed: NodePath = "hosts[1].name".parse().unwrap();
/// assert_eq!(parsed.segments()[1], Key::Index(1));
/// assert!(NodePath::root().child("hosts").is_ancestor_of(&parsed));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct NodePath {
    segments: Vec<Key>,
}

impl NodePath {
    /// The empty path, addressing a root
    pub fn root() -> Self {
        NodePath {
            segments: Vec::new(),
        }
    }

    /// Create a path from a vector of keys
    pub fn from_segments(segments: Vec<Key>) -> Self {
        NodePath { segments }
    }

    /// Get the path segments
    pub fn segments(&self) -> &[Key] {
        &self.segments
    }

    /// Get the number of segments in the path
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Check if the path has no segments
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Check if this is the root path
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// Append a segment (builder pattern)
    pub fn child(mut self, key: impl Into<Key>) -> Self {
        self.segments.push(key.into());
        self
    }

    /// Push a segment (mutating)
    pub fn push(&mut self, key: impl Into<Key>) {
        self.segments.push(key.into());
    }

    /// Get the parent path (None if root)
    pub fn parent(&self) -> Option<NodePath> {
        if self.segments.is_empty() {
            None
        } else {
            let mut parent = self.clone();
            parent.segments.pop();
            Some(parent)
        }
    }

    /// Get the last segment (None if root)
    pub fn last(&self) -> Option<&Key> {
        self.segments.last()
    }

    /// Check if this path is a prefix of `other` (or equal to it)
    pub fn is_ancestor_of(&self, other: &NodePath) -> bool {
        self.segments.len() <= other.segments.len()
            && self
                .segments
                .iter()
                .zip(other.segments.iter())
                .all(|(a, b)| a == b)
    }

    /// Check if `other` is a prefix of this path (or equal to it)
    pub fn is_descendant_of(&self, other: &NodePath) -> bool {
        other.is_ancestor_of(self)
    }

    /// Convert to a string representation
    pub fn to_path_string(&self) -> String {
        let mut result = String::new();
        for seg in &self.segments {
            match seg {
                Key::Index(i) => {
                    result.push('[');
                    result.push_str(&i.to_string());
                    result.push(']');
                }
                Key::Unallocated => result.push_str("[]"),
                Key::Name(name) => {
                    if !result.is_empty() {
                        result.push('.');
                    }
                    result.push_str(name);
                }
            }
        }
        result
    }
}

impl FromIterator<Key> for NodePath {
    fn from_iter<I: IntoIterator<Item = Key>>(iter: I) -> Self {
        NodePath {
            segments: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a NodePath {
    type Item = &'a Key;
    type IntoIter = std::slice::Iter<'a, Key>;

    fn into_iter(self) -> Self::IntoIter {
        self.segments.iter()
    }
}

impl FromStr for NodePath {
    type Err = PathParseError;

    /// Parse a path from a string
    ///
    /// Supported syntax:
    /// - `foo` or `.foo` - map entry
    /// - `[0]` - list index
    /// - `foo.bar` - nested entries
    /// - `foo[0].bar` - mixed
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Ok(NodePath::root());
        }

        let mut segments = Vec::new();
        let chars: Vec<char> = s.chars().collect();
        let mut i = 0;

        if chars[i] == '.' {
            i += 1;
        }

        while i < chars.len() {
            if chars[i] == '.' {
                i += 1;
                if i >= chars.len() {
                    return Err(PathParseError::EmptyKey(i));
                }
            }

            if chars[i] == '[' {
                let start = i;
                i += 1;
                let idx_start = i;

                while i < chars.len() && chars[i] != ']' {
                    i += 1;
                }

                if i >= chars.len() {
                    return Err(PathParseError::UnclosedBracket(start));
                }

                let idx_str: String = chars[idx_start..i].iter().collect();
                let idx = idx_str
                    .parse::<usize>()
                    .map_err(|_| PathParseError::InvalidIndex(idx_start, idx_str))?;

                segments.push(Key::Index(idx));
                i += 1;
            } else if is_name_char(chars[i]) {
                let key_start = i;
                while i < chars.len() && is_name_char(chars[i]) {
                    i += 1;
                }
                let key: String = chars[key_start..i].iter().collect();
                segments.push(Key::Name(key));
            } else if chars[i] == '.' {
                return Err(PathParseError::EmptyKey(i));
            } else {
                return Err(PathParseError::UnexpectedChar(chars[i], i));
            }
        }

        Ok(NodePath { segments })
    }
}

fn is_name_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '-'
}

impl fmt::Display for NodePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_path_string())
    }
}
