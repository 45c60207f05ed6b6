//! # Entity Component System
//!
//! Entities own one optional slot per component type of a set declared at
//! compile time; a registry owns the entities.
//!
//! ## Design Philosophy
//!
//! - Component types are fixed per registry type, resolved statically
//! - Each slot holds at most one value, owned by its entity
//! - Deletion is mark-then-sweep, so iteration never sees removal
//! - Systems are plain closures over entities

mod component;
mod entity;
mod registry;

pub use component::{ComponentSet, Signature, Stores};
pub use entity::{Entity, EntityId};
pub use registry::Registry;
