//! # Error Types
//!
//! Checked operations report failures through [`EcsError`]. Unchecked
//! accessors (`Entity::get`, `Entity::get_mut`) never return an error value:
//! a missing component there is a programmer error and panics.

use thiserror::Error;

use crate::ecs::EntityId;

/// Errors reported by checked registry operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EcsError {
    /// No live entity has this ID (never issued, or already reaped).
    #[error("entity not found: {0}")]
    NotFound(EntityId),

    /// Registry configuration could not be read or is invalid.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result type for registry operations.
pub type EcsResult<T> = Result<T, EcsError>;
