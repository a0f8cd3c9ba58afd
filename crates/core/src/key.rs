//! Node keys
//!
//! Every non-root node is addressed by a [`Key`] inside its parent:
//!
//! - `Key::Index(n)`: position `n` in a list
//! - `Key::Name(s)`: entry `s` in a map
//! - `Key::Unallocated`: placeholder for a list element whose index is not yet
//!   known. Appended nodes carry it until the owning list assigns the real
//!   index at insertion time.
//!
//! Integer-typed keys (including the placeholder) cause a `Null` or scalar
//! parent to become a list when the child is attached; anything else makes the
//! parent a map.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Key of a node within its parent
///
/// # Examples
///
/// ```
/// use cfgtree_core::Key;
///
/// assert_eq!(Key::from("server"), Key::Name("server".to_string()));
/// assert_eq!(Key::from(3usize), Key::Index(3));
/// assert!(Key::from(0).is_index());
/// assert!(Key::Unallocated.is_index());
/// assert!(!Key::from("port").is_index());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Key {
    /// List position
    Index(usize),
    /// Map entry name
    Name(String),
    /// Append placeholder; replaced by a real index on insertion
    Unallocated,
}

impl Key {
    /// Whether this key addresses a list position (real or placeholder)
    pub fn is_index(&self) -> bool {
        matches!(self, Key::Index(_) | Key::Unallocated)
    }

    /// Whether this is the append placeholder
    pub fn is_unallocated(&self) -> bool {
        matches!(self, Key::Unallocated)
    }

    /// Get the index if this is `Key::Index`
    pub fn as_index(&self) -> Option<usize> {
        match self {
            Key::Index(i) => Some(*i),
            _ => None,
        }
    }

    /// Get the name if this is `Key::Name`
    pub fn as_name(&self) -> Option<&str> {
        match self {
            Key::Name(s) => Some(s),
            _ => None,
        }
    }

    /// Interpret this key as a list position
    ///
    /// Names consisting only of ASCII digits are accepted, so `"2"` addresses
    /// the same list element as `2`.
    pub fn to_index(&self) -> Option<usize> {
        match self {
            Key::Index(i) => Some(*i),
            Key::Name(s) if !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit()) => s.parse().ok(),
            _ => None,
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Index(i) => write!(f, "{}", i),
            Key::Name(s) => write!(f, "{}", s),
            Key::Unallocated => write!(f, "<unallocated>"),
        }
    }
}

impl From<&str> for Key {
    fn from(s: &str) -> Self {
        Key::Name(s.to_string())
    }
}

impl From<String> for Key {
    fn from(s: String) -> Self {
        Key::Name(s)
    }
}

impl From<&String> for Key {
    fn from(s: &String) -> Self {
        Key::Name(s.clone())
    }
}

impl From<&Key> for Key {
    fn from(k: &Key) -> Self {
        k.clone()
    }
}

impl From<usize> for Key {
    fn from(i: usize) -> Self {
        Key::Index(i)
    }
}

impl From<u32> for Key {
    fn from(i: u32) -> Self {
        Key::Index(i as usize)
    }
}

/// Negative values map to [`Key::Unallocated`]
impl From<i32> for Key {
    fn from(i: i32) -> Self {
        usize::try_from(i).map(Key::Index).unwrap_or(Key::Unallocated)
    }
}

/// Negative values map to [`Key::Unallocated`]
impl From<i64> for Key {
    fn from(i: i64) -> Self {
        usize::try_from(i).map(Key::Index).unwrap_or(Key::Unallocated)
    }
}
