//! # nanocomp
//!
//! Typed entity-component storage for simulation and game loops:
//! - Component types fixed at compile time, one owned slot per type
//! - Sequential, never-reused entity ids with O(1) lookup
//! - Mark-then-sweep deletion
//! - Closure-driven per-entity systems
//!
//! ## Example
//!
//! ```rust,ignore
//! use nanocomp::{component_set, Registry};
//!
//! #[derive(Debug, PartialEq)]
//! struct Position { x: i32, y: i32 }
//!
//! component_set! {
//!     pub struct GameComponents {
//!         position: Position,
//!     }
//! }
//!
//! let mut registry: Registry<GameComponents> = Registry::new();
//! let a = registry.new_entity().id();
//! registry.get_mut(a)?.add(Position { x: 1, y: 1 });
//!
//! registry.get(a)?.mark_delete();
//! registry.clean_up();
//! assert!(!registry.contains(a));
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod config;
pub mod ecs;
pub mod error;
pub mod sync;

pub use config::RegistryConfig;
pub use ecs::{ComponentSet, Entity, EntityId, Registry, Signature, Stores};
pub use error::{EcsError, EcsResult};
pub use sync::SharedRegistry;
