//! Registry configuration.

use crate::error::{Error, Result};
use crate::types::{BaseKind, TypeMutability};
use serde::Deserialize;
use std::path::Path;

/// Default maximum length of type and property ids.
pub const DEFAULT_MAX_ID_LENGTH: usize = 255;

/// Configuration shared by every repository of a registry.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RegistryConfig {
    /// Base types seeded into each attached repository, in listing order.
    pub base_kinds: Vec<BaseKind>,

    /// Maximum length of type and property ids.
    pub max_id_length: usize,

    /// Mutability given to created types that do not declare one.
    pub custom_type_mutability: TypeMutability,
}

impl RegistryConfig {
    /// Create the default configuration.
    pub fn new() -> Self {
        Self {
            base_kinds: BaseKind::ALL.to_vec(),
            max_id_length: DEFAULT_MAX_ID_LENGTH,
            custom_type_mutability: TypeMutability::all(),
        }
    }

    /// Load a configuration from a JSON file. Missing fields keep their defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("failed to read {}: {}", path.display(), e)))?;
        let config: Self = serde_json::from_str(&text)
            .map_err(|e| Error::Config(format!("failed to parse {}: {}", path.display(), e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Set the seeded base kinds.
    pub fn with_base_kinds(mut self, kinds: impl IntoIterator<Item = BaseKind>) -> Self {
        self.base_kinds = kinds.into_iter().collect();
        self
    }

    /// Set the maximum id length.
    pub fn with_max_id_length(mut self, length: usize) -> Self {
        self.max_id_length = length;
        self
    }

    /// Set the mutability of created types.
    pub fn with_custom_type_mutability(mut self, mutability: TypeMutability) -> Self {
        self.custom_type_mutability = mutability;
        self
    }

    /// Check the configuration is usable.
    pub fn validate(&self) -> Result<()> {
        if self.base_kinds.is_empty() {
            return Err(Error::Config("at least one base kind is required".to_string()));
        }
        for (i, kind) in self.base_kinds.iter().enumerate() {
            if self.base_kinds[..i].contains(kind) {
                return Err(Error::Config(format!("duplicate base kind: {kind}")));
            }
        }
        if self.max_id_length == 0 {
            return Err(Error::Config("maxIdLength must be positive".to_string()));
        }
        Ok(())
    }
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self::new()
    }
}
