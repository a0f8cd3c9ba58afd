//! Typed accessors
//!
//! Getters coerce leniently: `"8080"` reads as an integer, `1` as `true`.
//! The `*_or` forms fall back to a default and, when the tree's options ask
//! for it, write that default into a node that has no value yet.

use crate::node::ConfigNode;
use crate::value::Value;
use cfgtree_core::{RawValue, Result, Scalar};

impl ConfigNode {
    fn scalar(&self) -> Option<Scalar> {
        match self.current_value() {
            Value::Scalar(s) => Some(s),
            _ => None,
        }
    }

    /// Scalar rendered as a string
    pub fn get_string(&self) -> Option<String> {
        self.scalar().map(|s| s.to_string_lossy())
    }

    /// Scalar read as an integer
    pub fn get_i64(&self) -> Option<i64> {
        self.scalar().and_then(|s| s.as_i64_lossy())
    }

    /// Scalar read as a float
    pub fn get_f64(&self) -> Option<f64> {
        self.scalar().and_then(|s| s.as_f64_lossy())
    }

    /// Scalar read as a boolean
    pub fn get_bool(&self) -> Option<bool> {
        self.scalar().and_then(|s| s.as_bool_lossy())
    }

    /// Raw content, or `default` when the node is null
    ///
    /// # Errors
    ///
    /// Storing the default (with `copy_defaults` on) can be rejected by the
    /// tree's accepted types.
    pub fn get_or(&self, default: impl Into<RawValue>) -> Result<RawValue> {
        match self.get() {
            Some(value) => Ok(value),
            None => {
                let default = default.into();
                self.store_default(&default)?;
                Ok(default)
            }
        }
    }

    /// String value, or `default`
    pub fn get_string_or(&self, default: &str) -> Result<String> {
        match self.get_string() {
            Some(value) => Ok(value),
            None => {
                self.store_default(&RawValue::from(default))?;
                Ok(default.to_string())
            }
        }
    }

    /// Integer value, or `default`
    pub fn get_i64_or(&self, default: i64) -> Result<i64> {
        match self.get_i64() {
            Some(value) => Ok(value),
            None => {
                self.store_default(&RawValue::from(default))?;
                Ok(default)
            }
        }
    }

    /// Float value, or `default`
    pub fn get_f64_or(&self, default: f64) -> Result<f64> {
        match self.get_f64() {
            Some(value) => Ok(value),
            None => {
                self.store_default(&RawValue::from(default))?;
                Ok(default)
            }
        }
    }

    /// Boolean value, or `default`
    pub fn get_bool_or(&self, default: bool) -> Result<bool> {
        match self.get_bool() {
            Some(value) => Ok(value),
            None => {
                self.store_default(&RawValue::from(default))?;
                Ok(default)
            }
        }
    }

    /// Transform each list element with `f`, skipping elements it rejects
    ///
    /// A non-list value is treated as a single-element list; null yields an
    /// empty vector.
    pub fn get_list<T>(&self, mut f: impl FnMut(RawValue) -> Option<T>) -> Vec<T> {
        match self.get() {
            Some(RawValue::List(items)) => items.into_iter().filter_map(f).collect(),
            Some(other) => f(other).into_iter().collect(),
            None => Vec::new(),
        }
    }

    /// Write `default` when copying defaults is on and the node is still null.
    ///
    /// A value that is present but fails to coerce is left alone. The null
    /// check is repeated under the node lock, so a concurrent writer's value
    /// is never replaced by the default.
    fn store_default(&self, default: &RawValue) -> Result<()> {
        if self.options().copy_defaults() && !default.is_null() && self.is_null() {
            self.check_accepted(default)?;
            self.insert_new_value(default.clone(), true);
        }
        Ok(())
    }
}
