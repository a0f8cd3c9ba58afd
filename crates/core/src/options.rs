//! Per-tree options
//!
//! [`Options`] is immutable and shared (`Arc`) by every node of a tree. To
//! change an option, build a new `Options` with one of the `with_*` methods and
//! construct a new root from it; existing trees are never affected.

use crate::raw::RawValue;
use crate::scalar::ScalarType;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::sync::Arc;

/// Process-wide default options, shared by every root built without explicit
/// options.
static DEFAULT_OPTIONS: Lazy<Arc<Options>> = Lazy::new(|| Arc::new(Options::default()));

/// Iteration order of map children
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MapOrdering {
    /// Children iterate in the order they were first inserted
    #[default]
    Insertion,
    /// Children iterate in key order
    Sorted,
    /// No ordering guarantee; backed by a sharded concurrent map
    Unordered,
}

/// Immutable configuration shared by all nodes of one tree
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Options {
    map_ordering: MapOrdering,
    native_types: Option<BTreeSet<ScalarType>>,
    header: Option<String>,
    copy_defaults: bool,
}

impl Options {
    /// Shared default options
    ///
    /// Insertion-ordered maps, every scalar type accepted, no header, defaults
    /// not copied.
    pub fn defaults() -> Arc<Options> {
        Arc::clone(&DEFAULT_OPTIONS)
    }

    /// Map child ordering policy
    pub fn map_ordering(&self) -> MapOrdering {
        self.map_ordering
    }

    /// Scalar types accepted by this tree (`None` accepts every type)
    pub fn native_types(&self) -> Option<&BTreeSet<ScalarType>> {
        self.native_types.as_ref()
    }

    /// Header text loaders emit above the document
    pub fn header(&self) -> Option<&str> {
        self.header.as_deref()
    }

    /// Whether reading a missing value with a default stores that default
    pub fn copy_defaults(&self) -> bool {
        self.copy_defaults
    }

    /// Whether scalars of `ty` may be stored in this tree
    pub fn accepts_type(&self, ty: ScalarType) -> bool {
        match &self.native_types {
            None => true,
            Some(types) => types.contains(&ty),
        }
    }

    /// First scalar type in `value` this tree rejects, if any
    pub fn first_rejected(&self, value: &RawValue) -> Option<ScalarType> {
        if self.native_types.is_none() {
            return None;
        }
        value.find_scalar(|ty| (!self.accepts_type(ty)).then_some(ty))
    }

    /// Copy with a different map ordering
    pub fn with_map_ordering(&self, map_ordering: MapOrdering) -> Options {
        Options {
            map_ordering,
            ..self.clone()
        }
    }

    /// Copy with a different set of accepted scalar types
    ///
    /// `None` accepts every type.
    pub fn with_native_types<I>(&self, types: Option<I>) -> Options
    where
        I: IntoIterator<Item = ScalarType>,
    {
        Options {
            native_types: types.map(|t| t.into_iter().collect()),
            ..self.clone()
        }
    }

    /// Copy with a different header
    pub fn with_header(&self, header: Option<impl Into<String>>) -> Options {
        Options {
            header: header.map(Into::into),
            ..self.clone()
        }
    }

    /// Copy with a different copy-defaults flag
    pub fn with_copy_defaults(&self, copy_defaults: bool) -> Options {
        Options {
            copy_defaults,
            ..self.clone()
        }
    }
}
