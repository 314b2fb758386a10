// Validator configuration

use crate::errors::Result;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Default limit on struct nesting plus dive levels
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Settings applied when building a [`Validator`](crate::Validator).
///
/// ```toml
/// max_depth = 32
///
/// [aliases]
/// varchar = "required,max=255"
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ValidatorConfig {
    /// Maximum recursion depth before validation aborts
    pub max_depth: usize,

    /// Aliases registered on construction
    pub aliases: BTreeMap<String, String>,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            aliases: BTreeMap::new(),
        }
    }
}

impl ValidatorConfig {
    /// Parse a TOML document
    pub fn from_toml_str(source: &str) -> Result<Self> {
        Ok(toml::from_str(source)?)
    }

    /// Load a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let source = std::fs::read_to_string(path)?;
        Self::from_toml_str(&source)
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_alias(mut self, name: impl Into<String>, rules: impl Into<String>) -> Self {
        self.aliases.insert(name.into(), rules.into());
        self
    }
}
