//! Tree options via `cfgtree.toml`
//!
//! Loaders that let users tune tree behaviour read a small TOML file and turn
//! it into [`Options`]. Missing fields fall back to the defaults.

use crate::error::{Error, Result};
use crate::options::{MapOrdering, Options};
use crate::scalar::ScalarType;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Config file name conventionally placed next to the configuration document.
pub const CONFIG_FILE_NAME: &str = "cfgtree.toml";

/// Serializable form of [`Options`].
///
/// # Example
///
/// ```toml
/// # "insertion" (default), "sorted" or "unordered"
/// map_ordering = "insertion"
///
/// # Omit to accept every scalar type
/// # native_types = ["string", "int", "float", "bool"]
///
/// # header = "Generated file, do not edit"
/// copy_defaults = false
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TreeConfig {
    /// Map child ordering policy.
    #[serde(default)]
    pub map_ordering: MapOrdering,
    /// Accepted scalar types; `None` accepts all.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub native_types: Option<Vec<ScalarType>>,
    /// Header text emitted by loaders.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub header: Option<String>,
    /// Store defaults supplied to getters when the node has no value.
    #[serde(default)]
    pub copy_defaults: bool,
}

impl TreeConfig {
    /// Parse a config from TOML text.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not valid TOML for this schema, or if
    /// `native_types` is present but empty (a tree that accepts no scalars).
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: TreeConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject configurations that could never store a value.
    pub fn validate(&self) -> Result<()> {
        if matches!(&self.native_types, Some(types) if types.is_empty()) {
            return Err(Error::InvalidConfig(
                "native_types is empty; omit it to accept every scalar type".to_string(),
            ));
        }
        Ok(())
    }

    /// Build the [`Options`] this config describes.
    pub fn to_options(&self) -> Options {
        Options::default()
            .with_map_ordering(self.map_ordering)
            .with_native_types(self.native_types.clone())
            .with_header(self.header.clone())
            .with_copy_defaults(self.copy_defaults)
    }

    /// Returns the default config file content with comments.
    pub fn default_toml() -> &'static str {
        r#"# cfgtree options
#
# Map child ordering: "insertion" (default), "sorted" or "unordered"
#   "insertion" = children keep the order they were first written in
#   "sorted"    = children iterate in key order
#   "unordered" = no order guarantee, lowest contention
map_ordering = "insertion"

# Scalar types the tree accepts. Omit to accept all of them.
# native_types = ["string", "int", "float", "bool"]

# Header text emitted above the document by loaders.
# header = "Generated file, do not edit"

# Store defaults passed to getters when a node has no value (default: false)
copy_defaults = false
"#
    }

    /// Read and parse config from a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content).map_err(|e| match e {
            Error::InvalidConfig(msg) => Error::InvalidConfig(format!(
                "Failed to parse config file '{}': {}",
                path.display(),
                msg
            )),
            other => other,
        })
    }

    /// Write the default config file if it does not already exist.
    ///
    /// Returns `Ok(())` whether the file was created or already existed.
    pub fn write_default_if_missing(path: &Path) -> Result<()> {
        if !path.exists() {
            std::fs::write(path, Self::default_toml())?;
        }
        Ok(())
    }

    /// Serialize this config to TOML and write it to the given path.
    pub fn write_to_file(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

impl From<&Options> for TreeConfig {
    fn from(options: &Options) -> Self {
        TreeConfig {
            map_ordering: options.map_ordering(),
            native_types: options.native_types().map(|t| t.iter().copied().collect()),
            header: options.header().map(str::to_string),
            copy_defaults: options.copy_defaults(),
        }
    }
}
