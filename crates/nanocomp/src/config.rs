//! # Registry Configuration
//!
//! Loaded once at startup from TOML:
//!
//! ```toml
//! start_id = 1000
//! initial_capacity = 4096
//! ```
//!
//! Both keys are optional.

use std::path::Path;

use serde::Deserialize;
use tracing::debug;

use crate::error::{EcsError, EcsResult};

/// Construction parameters for a [`Registry`](crate::Registry).
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RegistryConfig {
    /// Id issued to the first entity.
    pub start_id: u64,
    /// Entities to reserve storage for up front.
    pub initial_capacity: usize,
}

impl RegistryConfig {
    /// Largest accepted `initial_capacity`.
    pub const MAX_INITIAL_CAPACITY: usize = 1 << 24;

    /// Parses and validates a configuration from TOML text.
    ///
    /// # Errors
    ///
    /// [`EcsError::InvalidConfig`] if the text is not valid TOML, has
    /// unknown keys, or fails [`validate`](Self::validate).
    pub fn from_toml_str(source: &str) -> EcsResult<Self> {
        let config: Self =
            toml::from_str(source).map_err(|e| EcsError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        debug!(
            start_id = config.start_id,
            initial_capacity = config.initial_capacity,
            "registry config loaded"
        );
        Ok(config)
    }

    /// Reads a configuration file.
    ///
    /// # Errors
    ///
    /// [`EcsError::InvalidConfig`] if the file cannot be read or parsed.
    pub fn load(path: impl AsRef<Path>) -> EcsResult<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path)
            .map_err(|e| EcsError::InvalidConfig(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&source)
    }

    /// Checks that the configuration can issue at least one id and that its
    /// up-front reservation is bounded.
    ///
    /// # Errors
    ///
    /// [`EcsError::InvalidConfig`] if `start_id` is `u64::MAX` or
    /// `initial_capacity` exceeds [`MAX_INITIAL_CAPACITY`](Self::MAX_INITIAL_CAPACITY).
    pub fn validate(&self) -> EcsResult<()> {
        if self.start_id == u64::MAX {
            return Err(EcsError::InvalidConfig(
                "start_id leaves no ids to issue".to_owned(),
            ));
        }
        if self.initial_capacity > Self::MAX_INITIAL_CAPACITY {
            return Err(EcsError::InvalidConfig(format!(
                "initial_capacity {} exceeds {}",
                self.initial_capacity,
                Self::MAX_INITIAL_CAPACITY
            )));
        }
        Ok(())
    }
}
