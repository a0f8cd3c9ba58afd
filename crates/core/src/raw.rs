//! Plain tree-shaped values
//!
//! [`RawValue`] is what callers write into a node and what a node reads back
//! out of itself: a detached, owned tree of scalars, lists and maps. Its shape
//! decides the variant a node takes on write:
//!
//! | RawValue | Node value |
//! |----------|------------|
//! | `List` | List |
//! | `Map` | Map |
//! | `Null` | node is removed from its parent |
//! | anything else | Scalar |
//!
//! Maps preserve insertion order (`IndexMap`). Conversions to and from
//! `serde_json::Value` are provided for loaders.

use crate::key::Key;
use crate::scalar::{Scalar, ScalarType};
use indexmap::IndexMap;
use std::sync::Arc;

/// Owned, detached value tree
#[derive(Debug, Clone, PartialEq, Default)]
pub enum RawValue {
    /// Absent value
    #[default]
    Null,
    /// Boolean
    Bool(bool),
    /// 64-bit signed integer
    Int(i64),
    /// 64-bit floating point
    Float(f64),
    /// UTF-8 string
    String(String),
    /// Ordered sequence
    List(Vec<RawValue>),
    /// Ordered mapping
    Map(IndexMap<Key, RawValue>),
}

impl RawValue {
    /// Empty list
    pub fn list() -> Self {
        RawValue::List(Vec::new())
    }

    /// Empty map
    pub fn map() -> Self {
        RawValue::Map(IndexMap::new())
    }

    /// Build a map from key/value pairs, keeping their order
    pub fn map_of<K, V, I>(entries: I) -> Self
    where
        K: Into<Key>,
        V: Into<RawValue>,
        I: IntoIterator<Item = (K, V)>,
    {
        RawValue::Map(
            entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// Get the type name as a string
    pub fn type_name(&self) -> &'static str {
        match self {
            RawValue::Null => "null",
            RawValue::Bool(_) => "bool",
            RawValue::Int(_) => "int",
            RawValue::Float(_) => "float",
            RawValue::String(_) => "string",
            RawValue::List(_) => "list",
            RawValue::Map(_) => "map",
        }
    }

    /// Check if this is the null value
    pub fn is_null(&self) -> bool {
        matches!(self, RawValue::Null)
    }

    /// Check if this is a list
    pub fn is_list(&self) -> bool {
        matches!(self, RawValue::List(_))
    }

    /// Check if this is a map
    pub fn is_map(&self) -> bool {
        matches!(self, RawValue::Map(_))
    }

    /// Scalar type of this value, if it is a scalar
    pub fn scalar_type(&self) -> Option<ScalarType> {
        match self {
            RawValue::Bool(_) => Some(ScalarType::Bool),
            RawValue::Int(_) => Some(ScalarType::Int),
            RawValue::Float(_) => Some(ScalarType::Float),
            RawValue::String(_) => Some(ScalarType::String),
            _ => None,
        }
    }

    /// Convert a scalar raw value into a [`Scalar`]
    pub fn to_scalar(&self) -> Option<Scalar> {
        match self {
            RawValue::Bool(b) => Some(Scalar::Bool(*b)),
            RawValue::Int(i) => Some(Scalar::Int(*i)),
            RawValue::Float(f) => Some(Scalar::Float(*f)),
            RawValue::String(s) => Some(Scalar::String(Arc::from(s.as_str()))),
            _ => None,
        }
    }

    /// Get as bool if this is a Bool value
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            RawValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Get as i64 if this is an Int value
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            RawValue::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Get as f64 if this is a Float value
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            RawValue::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Get as &str if this is a String value
    pub fn as_str(&self) -> Option<&str> {
        match self {
            RawValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Get as a slice if this is a List value
    pub fn as_list(&self) -> Option<&[RawValue]> {
        match self {
            RawValue::List(l) => Some(l),
            _ => None,
        }
    }

    /// Get as a map if this is a Map value
    pub fn as_map(&self) -> Option<&IndexMap<Key, RawValue>> {
        match self {
            RawValue::Map(m) => Some(m),
            _ => None,
        }
    }

    /// Visit every scalar in this tree, stopping at the first `Some` returned
    pub fn find_scalar<T>(&self, mut f: impl FnMut(ScalarType) -> Option<T>) -> Option<T> {
        let mut pending = vec![self];
        while let Some(value) = pending.pop() {
            match value {
                RawValue::List(items) => pending.extend(items.iter()),
                RawValue::Map(entries) => pending.extend(entries.values()),
                RawValue::Null => {}
                scalar => {
                    if let Some(found) = scalar.scalar_type().and_then(&mut f) {
                        return Some(found);
                    }
                }
            }
        }
        None
    }
}

impl From<&Scalar> for RawValue {
    fn from(s: &Scalar) -> Self {
        match s {
            Scalar::Bool(b) => RawValue::Bool(*b),
            Scalar::Int(i) => RawValue::Int(*i),
            Scalar::Float(f) => RawValue::Float(*f),
            Scalar::String(s) => RawValue::String(s.to_string()),
        }
    }
}

// ============================================================================
// From implementations for ergonomic API usage
// ============================================================================

impl From<&str> for RawValue {
    fn from(s: &str) -> Self {
        RawValue::String(s.to_string())
    }
}

impl From<String> for RawValue {
    fn from(s: String) -> Self {
        RawValue::String(s)
    }
}

impl From<bool> for RawValue {
    fn from(b: bool) -> Self {
        RawValue::Bool(b)
    }
}

impl From<i64> for RawValue {
    fn from(i: i64) -> Self {
        RawValue::Int(i)
    }
}

impl From<i32> for RawValue {
    fn from(i: i32) -> Self {
        RawValue::Int(i as i64)
    }
}

impl From<u32> for RawValue {
    fn from(i: u32) -> Self {
        RawValue::Int(i as i64)
    }
}

/// Values beyond `i64::MAX` degrade to float, as in the JSON bridge
impl From<usize> for RawValue {
    fn from(i: usize) -> Self {
        match i64::try_from(i) {
            Ok(i) => RawValue::Int(i),
            Err(_) => RawValue::Float(i as f64),
        }
    }
}

impl From<f64> for RawValue {
    fn from(f: f64) -> Self {
        RawValue::Float(f)
    }
}

impl From<f32> for RawValue {
    fn from(f: f32) -> Self {
        RawValue::Float(f as f64)
    }
}

impl<T: Into<RawValue>> From<Vec<T>> for RawValue {
    fn from(items: Vec<T>) -> Self {
        RawValue::List(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<RawValue>> From<Option<T>> for RawValue {
    fn from(v: Option<T>) -> Self {
        match v {
            Some(v) => v.into(),
            None => RawValue::Null,
        }
    }
}

impl From<IndexMap<Key, RawValue>> for RawValue {
    fn from(m: IndexMap<Key, RawValue>) -> Self {
        RawValue::Map(m)
    }
}

impl From<()> for RawValue {
    fn from(_: ()) -> Self {
        RawValue::Null
    }
}

// ============================================================================
// serde_json interop
// ============================================================================

impl From<serde_json::Value> for RawValue {
    fn from(v: serde_json::Value) -> Self {
        match v {
            serde_json::Value::Null => RawValue::Null,
            serde_json::Value::Bool(b) => RawValue::Bool(b),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    RawValue::Int(i)
                } else {
                    // u64 beyond i64 range degrades to float
                    RawValue::Float(n.as_f64().unwrap_or(0.0))
                }
            }
            serde_json::Value::String(s) => RawValue::String(s),
            serde_json::Value::Array(arr) => {
                RawValue::List(arr.into_iter().map(RawValue::from).collect())
            }
            serde_json::Value::Object(obj) => RawValue::Map(
                obj.into_iter()
                    .map(|(k, v)| (Key::Name(k), RawValue::from(v)))
                    .collect(),
            ),
        }
    }
}

impl From<RawValue> for serde_json::Value {
    fn from(v: RawValue) -> Self {
        match v {
            RawValue::Null => serde_json::Value::Null,
            RawValue::Bool(b) => serde_json::Value::Bool(b),
            RawValue::Int(i) => serde_json::Value::Number(i.into()),
            RawValue::Float(f) => serde_json::Number::from_f64(f)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            RawValue::String(s) => serde_json::Value::String(s),
            RawValue::List(items) => {
                serde_json::Value::Array(items.into_iter().map(serde_json::Value::from).collect())
            }
            RawValue::Map(entries) => serde_json::Value::Object(
                entries
                    .into_iter()
                    .map(|(k, v)| (k.to_string(), serde_json::Value::from(v)))
                    .collect(),
            ),
        }
    }
}
