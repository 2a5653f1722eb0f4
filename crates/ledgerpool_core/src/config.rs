//! # Pool Configuration
//!
//! Pool parameters, loaded once at startup from TOML or built in code.
//!
//! ```toml
//! pool_size = 1048576
//! base_alignment = 16
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{PoolError, PoolResult};

/// Default pool capacity: 1 MiB.
pub const DEFAULT_POOL_SIZE: usize = 1024 * 1024;

/// Default alignment of the pool buffer base.
pub const DEFAULT_BASE_ALIGNMENT: usize = 16;

/// Configuration for a [`Pool`](crate::memory::Pool).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PoolConfig {
    /// Total pool capacity in bytes.
    pub pool_size: usize,
    /// Alignment of the first byte of the pool buffer.
    pub base_alignment: usize,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            pool_size: DEFAULT_POOL_SIZE,
            base_alignment: DEFAULT_BASE_ALIGNMENT,
        }
    }
}

impl PoolConfig {
    /// Creates a config with the given capacity and the default base alignment.
    #[inline]
    #[must_use]
    pub const fn with_size(pool_size: usize) -> Self {
        Self {
            pool_size,
            base_alignment: DEFAULT_BASE_ALIGNMENT,
        }
    }

    /// Sets the base alignment.
    #[inline]
    #[must_use]
    pub const fn with_base_alignment(mut self, base_alignment: usize) -> Self {
        self.base_alignment = base_alignment;
        self
    }

    /// Parses and validates a config from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::InvalidConfig`] if the text is not valid TOML,
    /// has unknown keys, or fails [`PoolConfig::validate`].
    pub fn from_toml_str(text: &str) -> PoolResult<Self> {
        let config: Self =
            toml::from_str(text).map_err(|e| PoolError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a config file.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::InvalidConfig`] if the file cannot be read or
    /// its contents are rejected by [`PoolConfig::from_toml_str`].
    pub fn from_toml_file(path: impl AsRef<Path>) -> PoolResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| PoolError::InvalidConfig(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&text)
    }

    /// Checks the parameters.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::InvalidConfig`] for a zero pool size or a base
    /// alignment that is not a power of two.
    pub fn validate(&self) -> PoolResult<()> {
        if self.pool_size == 0 {
            return Err(PoolError::InvalidConfig(
                "pool_size must be greater than zero".to_string(),
            ));
        }
        if !self.base_alignment.is_power_of_two() {
            return Err(PoolError::InvalidConfig(format!(
                "base_alignment {} is not a power of two",
                self.base_alignment
            )));
        }
        Ok(())
    }
}
