//! # Entity Management
//!
//! An entity is an identifier, one optional slot per declared component
//! type, and a deletion flag.
//!
//! ## Lifecycle
//!
//! ```text
//! new_entity() ──► Live ──mark_delete()──► Marked ──clean_up()──► Reaped
//! ```
//!
//! Marked entities stay visible to lookups and iteration until the owning
//! registry sweeps them.

use std::any::type_name;
use std::cell::Cell;
use std::fmt;

use super::component::{ComponentSet, Signature, Stores};

/// Unique identifier for an entity.
///
/// Issued sequentially by a registry and never reused, even after the
/// entity it named has been reaped.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct EntityId(u64);

impl EntityId {
    /// Creates an entity ID from its raw value.
    #[inline]
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the raw value.
    #[inline]
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl From<u64> for EntityId {
    fn from(raw: u64) -> Self {
        Self(raw)
    }
}

impl From<EntityId> for u64 {
    fn from(id: EntityId) -> Self {
        id.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// An entity and the components it owns.
///
/// Entities are created and owned by a [`Registry`](crate::Registry); callers
/// only ever see references into it.
///
/// # Access tiers
///
/// - [`get`](Self::get) / [`get_mut`](Self::get_mut) require the component
///   to be present and panic otherwise. Guard with [`has`](Self::has) when
///   absence is possible.
/// - [`get_if`](Self::get_if) / [`get_if_mut`](Self::get_if_mut) never fail.
pub struct Entity<S: ComponentSet> {
    id: EntityId,
    components: S,
    /// Interior flag so marking works through a shared reference.
    marked_delete: Cell<bool>,
}

impl<S: ComponentSet> Entity<S> {
    pub(crate) fn new(id: EntityId) -> Self {
        Self {
            id,
            components: S::default(),
            marked_delete: Cell::new(false),
        }
    }

    /// Returns this entity's identifier.
    #[inline]
    #[must_use]
    pub const fn id(&self) -> EntityId {
        self.id
    }

    /// Stores a component, dropping any value previously in its slot.
    ///
    /// Returns a reference to the stored value.
    #[inline]
    pub fn add<C>(&mut self, component: C) -> &mut C
    where
        S: Stores<C>,
    {
        self.components.slot_mut().insert(component)
    }

    /// Clears the slot for `C`, returning the value it held.
    ///
    /// Removing an absent component is a no-op.
    #[inline]
    pub fn remove<C>(&mut self) -> Option<C>
    where
        S: Stores<C>,
    {
        self.components.slot_mut().take()
    }

    /// Returns the component of type `C`.
    ///
    /// # Panics
    ///
    /// Panics if the entity has no `C`.
    #[inline]
    #[must_use]
    #[track_caller]
    pub fn get<C>(&self) -> &C
    where
        S: Stores<C>,
    {
        match self.components.slot() {
            Some(component) => component,
            None => missing_component::<C>(self.id),
        }
    }

    /// Returns the component of type `C`, mutably.
    ///
    /// # Panics
    ///
    /// Panics if the entity has no `C`.
    #[inline]
    #[must_use]
    #[track_caller]
    pub fn get_mut<C>(&mut self) -> &mut C
    where
        S: Stores<C>,
    {
        let id = self.id;
        match self.components.slot_mut() {
            Some(component) => component,
            None => missing_component::<C>(id),
        }
    }

    /// Returns the component of type `C`, or `None` if absent.
    #[inline]
    #[must_use]
    pub fn get_if<C>(&self) -> Option<&C>
    where
        S: Stores<C>,
    {
        self.components.slot().as_ref()
    }

    /// Returns the component of type `C` mutably, or `None` if absent.
    #[inline]
    #[must_use]
    pub fn get_if_mut<C>(&mut self) -> Option<&mut C>
    where
        S: Stores<C>,
    {
        self.components.slot_mut().as_mut()
    }

    /// Checks whether a `C` is attached.
    #[inline]
    #[must_use]
    pub fn has<C>(&self) -> bool
    where
        S: Stores<C>,
    {
        self.components.slot().is_some()
    }

    /// Returns the mask of attached components.
    #[inline]
    #[must_use]
    pub fn signature(&self) -> Signature {
        self.components.signature()
    }

    /// Returns `true` if every component in `required` is attached.
    #[inline]
    #[must_use]
    pub fn matches(&self, required: Signature) -> bool {
        self.signature().is_superset(required)
    }

    /// Number of attached components.
    #[inline]
    #[must_use]
    pub fn component_count(&self) -> usize {
        self.signature().len()
    }

    /// Drops every attached component.
    pub fn clear(&mut self) {
        self.components.clear();
    }

    /// Flags this entity for removal by the next registry clean-up.
    ///
    /// Idempotent and irreversible. Takes `&self` so a system walking the
    /// registry by shared reference can flag any entity it can look up.
    #[inline]
    pub fn mark_delete(&self) {
        self.marked_delete.set(true);
    }

    /// Returns whether this entity is flagged for removal.
    #[inline]
    #[must_use]
    pub fn is_marked_delete(&self) -> bool {
        self.marked_delete.get()
    }
}

impl<S: ComponentSet> fmt::Debug for Entity<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Entity")
            .field("id", &self.id)
            .field("signature", &self.signature())
            .field("marked_delete", &self.is_marked_delete())
            .finish()
    }
}

#[cold]
#[inline(never)]
#[track_caller]
fn missing_component<C>(id: EntityId) -> ! {
    panic!("entity {id} has no {} component", type_name::<C>())
}
