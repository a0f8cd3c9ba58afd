//! Scalar leaf values
//!
//! A [`Scalar`] is the immutable payload of a scalar node. String payloads are
//! reference counted so copying a tree shares them instead of cloning.
//!
//! ## Type Rules
//!
//! - Four scalar types: Bool, Int, Float, String
//! - No implicit coercion on storage; `Int(1) != Float(1.0)`
//! - Float equality is IEEE-754 (`NaN != NaN`)
//! - Lenient coercion is only applied by the `as_*_lossy` readers

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Runtime type of a scalar, used by [`crate::Options`] type acceptance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScalarType {
    /// Boolean
    Bool,
    /// 64-bit signed integer
    Int,
    /// 64-bit float
    Float,
    /// UTF-8 string
    String,
}

impl ScalarType {
    /// Lowercase name, as used in configuration files
    pub fn name(&self) -> &'static str {
        match self {
            ScalarType::Bool => "bool",
            ScalarType::Int => "int",
            ScalarType::Float => "float",
            ScalarType::String => "string",
        }
    }
}

impl fmt::Display for ScalarType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Immutable scalar payload
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    /// Boolean value
    Bool(bool),
    /// 64-bit signed integer
    Int(i64),
    /// 64-bit floating point (IEEE-754)
    Float(f64),
    /// Shared UTF-8 string
    String(Arc<str>),
}

impl Scalar {
    /// Runtime type of this scalar
    pub fn scalar_type(&self) -> ScalarType {
        match self {
            Scalar::Bool(_) => ScalarType::Bool,
            Scalar::Int(_) => ScalarType::Int,
            Scalar::Float(_) => ScalarType::Float,
            Scalar::String(_) => ScalarType::String,
        }
    }

    /// A scalar is empty only if it is the empty string
    pub fn is_empty(&self) -> bool {
        matches!(self, Scalar::String(s) if s.is_empty())
    }

    /// Get as &str if this is a String
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Scalar::String(s) => Some(s),
            _ => None,
        }
    }

    /// Render the scalar as a string; every scalar has a string form
    pub fn to_string_lossy(&self) -> String {
        match self {
            Scalar::Bool(b) => b.to_string(),
            Scalar::Int(i) => i.to_string(),
            Scalar::Float(f) => f.to_string(),
            Scalar::String(s) => s.to_string(),
        }
    }

    /// Read as an integer, parsing strings and accepting integral floats
    pub fn as_i64_lossy(&self) -> Option<i64> {
        match self {
            Scalar::Int(i) => Some(*i),
            Scalar::Float(f) if f.fract() == 0.0 && in_i64_range(*f) => Some(*f as i64),
            Scalar::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// Read as a float, widening integers and parsing strings
    pub fn as_f64_lossy(&self) -> Option<f64> {
        match self {
            Scalar::Float(f) => Some(*f),
            Scalar::Int(i) => Some(*i as f64),
            Scalar::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// Read as a boolean
    ///
    /// Strings `true`/`yes`/`t`/`y`/`1` and `false`/`no`/`f`/`n`/`0` are
    /// accepted case-insensitively; integers are true when non-zero.
    pub fn as_bool_lossy(&self) -> Option<bool> {
        match self {
            Scalar::Bool(b) => Some(*b),
            Scalar::Int(i) => Some(*i != 0),
            Scalar::String(s) => match s.trim().to_ascii_lowercase().as_str() {
                "true" | "yes" | "t" | "y" | "1" => Some(true),
                "false" | "no" | "f" | "n" | "0" => Some(false),
                _ => None,
            },
            Scalar::Float(_) => None,
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_string_lossy())
    }
}

/// `i64::MIN` is exactly representable; `i64::MAX` rounds up to 2^63.
fn in_i64_range(f: f64) -> bool {
    f >= i64::MIN as f64 && f < -(i64::MIN as f64)
}
