//! # Entity Registry
//!
//! The registry owns every entity, issues identifiers, keeps an id lookup
//! index, sweeps marked entities and drives systems.
//!
//! ```text
//! entities: [ E#0 | E#2 | E#5 | E#6 ]      owning, iteration order
//! by_id:    { #0→0, #2→1, #5→2, #6→3 }     id → position in `entities`
//! ```
//!
//! Deletion is two-phase. `Entity::mark_delete` only sets a flag; the entity
//! stays visible until [`Registry::clean_up`] removes it and its index entry
//! in one step. Iteration therefore never observes a collection shrinking
//! under it.

use std::collections::HashMap;

use tracing::{debug, trace};

use super::component::ComponentSet;
use super::entity::{Entity, EntityId};
use crate::config::RegistryConfig;
use crate::error::{EcsError, EcsResult};

/// Owner of all entities for one component set `S`.
///
/// # Lookup tiers
///
/// - Checked: [`get`](Self::get), [`get_mut`](Self::get_mut),
///   [`run_system_for`](Self::run_system_for) and
///   [`run_system_for_mut`](Self::run_system_for_mut) report
///   [`EcsError::NotFound`] for unknown ids.
/// - Unchecked: [`get_if`](Self::get_if), [`get_if_mut`](Self::get_if_mut)
///   and [`contains`](Self::contains) never fail.
///
/// # Example
///
/// ```rust,ignore
/// let mut registry: Registry<GameComponents> = Registry::new();
///
/// let id = registry.new_entity().id();
/// registry.get_mut(id)?.add(Position { x: 1.0, y: 1.0 });
///
/// registry.run_system_mut(|entity| {
///     if let Some(position) = entity.get_if_mut::<Position>() {
///         position.x += 1.0;
///     }
/// });
/// ```
pub struct Registry<S: ComponentSet> {
    /// Owned entities in iteration order.
    entities: Vec<Entity<S>>,
    /// Position of each live entity in `entities`.
    by_id: HashMap<EntityId, usize>,
    /// Next raw id to issue.
    next_id: u64,
}

impl<S: ComponentSet> Registry<S> {
    /// Creates an empty registry whose first entity gets id 0.
    #[must_use]
    pub fn new() -> Self {
        Self::with_start_id(0)
    }

    /// Creates an empty registry whose first entity gets `start_id`.
    #[must_use]
    pub fn with_start_id(start_id: u64) -> Self {
        Self {
            entities: Vec::new(),
            by_id: HashMap::new(),
            next_id: start_id,
        }
    }

    /// Creates an empty registry from a configuration.
    ///
    /// The configuration is validated again, since its fields are public.
    ///
    /// # Errors
    ///
    /// [`EcsError::InvalidConfig`] if the configuration fails
    /// [`RegistryConfig::validate`] or the initial storage cannot be reserved.
    pub fn from_config(config: &RegistryConfig) -> EcsResult<Self> {
        config.validate()?;

        let mut registry = Self::with_start_id(config.start_id);
        let reserve_failed = |e: std::collections::TryReserveError| {
            EcsError::InvalidConfig(format!("initial_capacity: {e}"))
        };
        registry
            .entities
            .try_reserve_exact(config.initial_capacity)
            .map_err(reserve_failed)?;
        registry
            .by_id
            .try_reserve(config.initial_capacity)
            .map_err(reserve_failed)?;
        Ok(registry)
    }

    /// Number of owned entities, including marked ones not yet reaped.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Returns `true` if the registry owns no entities.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// The id the next call to [`new_entity`](Self::new_entity) will issue.
    #[inline]
    #[must_use]
    pub fn next_id(&self) -> EntityId {
        EntityId::new(self.next_id)
    }

    /// Creates an entity with no components and returns it.
    ///
    /// Ids are issued sequentially and never reused.
    ///
    /// # Panics
    ///
    /// Panics if the id space is exhausted (`u64::MAX` is never issued).
    pub fn new_entity(&mut self) -> &mut Entity<S> {
        let id = self.issue_id();
        let position = self.entities.len();

        self.entities.push(Entity::new(id));
        self.by_id.insert(id, position);
        trace!(%id, "entity created");

        &mut self.entities[position]
    }

    fn issue_id(&mut self) -> EntityId {
        let raw = self.next_id;
        assert!(raw != u64::MAX, "entity id space exhausted");
        self.next_id = raw + 1;
        EntityId::new(raw)
    }

    /// Returns the entity for `id`.
    ///
    /// # Errors
    ///
    /// [`EcsError::NotFound`] if no live entity has this id.
    #[inline]
    pub fn get(&self, id: EntityId) -> EcsResult<&Entity<S>> {
        self.get_if(id).ok_or(EcsError::NotFound(id))
    }

    /// Returns the entity for `id`, mutably.
    ///
    /// # Errors
    ///
    /// [`EcsError::NotFound`] if no live entity has this id.
    #[inline]
    pub fn get_mut(&mut self, id: EntityId) -> EcsResult<&mut Entity<S>> {
        self.get_if_mut(id).ok_or(EcsError::NotFound(id))
    }

    /// Returns the entity for `id`, or `None`.
    #[inline]
    #[must_use]
    pub fn get_if(&self, id: EntityId) -> Option<&Entity<S>> {
        let position = *self.by_id.get(&id)?;
        self.entities.get(position)
    }

    /// Returns the entity for `id` mutably, or `None`.
    #[inline]
    #[must_use]
    pub fn get_if_mut(&mut self, id: EntityId) -> Option<&mut Entity<S>> {
        let position = *self.by_id.get(&id)?;
        self.entities.get_mut(position)
    }

    /// Checks whether a live entity has this id.
    #[inline]
    #[must_use]
    pub fn contains(&self, id: EntityId) -> bool {
        self.by_id.contains_key(&id)
    }

    /// Iterates over owned entities in registry order.
    pub fn iter(&self) -> std::slice::Iter<'_, Entity<S>> {
        self.entities.iter()
    }

    /// Iterates mutably over owned entities in registry order.
    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Entity<S>> {
        self.entities.iter_mut()
    }

    /// Iterates over the ids of owned entities in registry order.
    pub fn ids(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.entities.iter().map(Entity::id)
    }

    /// Removes every entity flagged with `mark_delete`.
    ///
    /// Kept entities retain their relative order. Reaped entities are
    /// detached and the lookup index is rebuilt before any component is
    /// dropped, so a panicking `Drop` leaves the registry consistent.
    ///
    /// # Returns
    ///
    /// Number of entities removed.
    pub fn clean_up(&mut self) -> usize {
        let Self {
            entities, by_id, ..
        } = self;

        if !entities.iter().any(Entity::is_marked_delete) {
            debug!(reaped = 0, kept = entities.len(), "registry clean-up");
            return 0;
        }

        let (reaped, kept): (Vec<_>, Vec<_>) = std::mem::take(entities)
            .into_iter()
            .partition(Entity::is_marked_delete);
        *entities = kept;

        for entity in &reaped {
            by_id.remove(&entity.id());
        }
        // Survivors may have shifted down.
        for (position, entity) in entities.iter().enumerate() {
            if let Some(slot) = by_id.get_mut(&entity.id()) {
                *slot = position;
            }
        }
        debug_assert_eq!(by_id.len(), entities.len(), "lookup index out of sync");

        let count = reaped.len();
        debug!(reaped = count, kept = entities.len(), "registry clean-up");

        // Components are released only once the index is settled.
        drop(reaped);
        count
    }

    /// Calls `system` once per owned entity, in registry order.
    ///
    /// Entities flagged but not yet reaped are visited too. The system may
    /// call `mark_delete` on any entity it can reach.
    pub fn run_system<F>(&self, mut system: F)
    where
        F: FnMut(&Entity<S>),
    {
        for entity in &self.entities {
            system(entity);
        }
    }

    /// Calls `system` once per owned entity with mutable access, in registry order.
    ///
    /// The system only reaches the entity it is visiting. To flag other
    /// entities for deletion mid-walk, use [`run_system`](Self::run_system).
    pub fn run_system_mut<F>(&mut self, mut system: F)
    where
        F: FnMut(&mut Entity<S>),
    {
        for entity in &mut self.entities {
            system(entity);
        }
    }

    /// Calls `system` once per id in `order`, in that order.
    ///
    /// `order` may repeat, omit or reorder ids.
    ///
    /// # Errors
    ///
    /// [`EcsError::NotFound`] for the first id in `order` with no live
    /// entity. Ids are checked before the first call, so on error the system
    /// has not run at all.
    pub fn run_system_for<F>(&self, order: &[EntityId], mut system: F) -> EcsResult<()>
    where
        F: FnMut(&Entity<S>),
    {
        self.check_order(order)?;
        for &id in order {
            system(self.get(id)?);
        }
        Ok(())
    }

    /// Calls `system` with mutable access once per id in `order`, in that order.
    ///
    /// The system only reaches the entity it is visiting. To flag other
    /// entities for deletion mid-walk, use [`run_system_for`](Self::run_system_for).
    ///
    /// # Errors
    ///
    /// [`EcsError::NotFound`] for the first id in `order` with no live
    /// entity, before the system runs.
    pub fn run_system_for_mut<F>(&mut self, order: &[EntityId], mut system: F) -> EcsResult<()>
    where
        F: FnMut(&mut Entity<S>),
    {
        self.check_order(order)?;
        for &id in order {
            system(self.get_mut(id)?);
        }
        Ok(())
    }

    fn check_order(&self, order: &[EntityId]) -> EcsResult<()> {
        match order.iter().find(|id| !self.contains(**id)) {
            Some(&missing) => Err(EcsError::NotFound(missing)),
            None => Ok(()),
        }
    }
}

impl<S: ComponentSet> Default for Registry<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: ComponentSet> std::fmt::Debug for Registry<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry")
            .field("len", &self.entities.len())
            .field("next_id", &self.next_id())
            .finish_non_exhaustive()
    }
}

impl<'a, S: ComponentSet> IntoIterator for &'a Registry<S> {
    type Item = &'a Entity<S>;
    type IntoIter = std::slice::Iter<'a, Entity<S>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, S: ComponentSet> IntoIterator for &'a mut Registry<S> {
    type Item = &'a mut Entity<S>;
    type IntoIter = std::slice::IterMut<'a, Entity<S>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}
