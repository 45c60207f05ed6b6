//! # Entity Lifecycle Verification
//!
//! Covers the registry contract end to end:
//!
//! 1. **Ids**: strictly increasing, never reused across clean-ups
//! 2. **Components**: one owned value per slot, overwrite drops the old one
//! 3. **Deletion**: marked entities stay visible until `clean_up`
//!
//! Run with: cargo test --package nanocomp --test lifecycle

use std::cell::Cell;
use std::rc::Rc;

use nanocomp::{component_set, EcsError, EntityId, Registry, RegistryConfig};

#[derive(Clone, Copy, Debug, PartialEq)]
struct Position {
    x: i32,
    y: i32,
}

#[derive(Debug, PartialEq)]
struct Name(String);

/// Counts how many times a value was dropped.
#[derive(Debug)]
struct DropProbe(Rc<Cell<u32>>);

impl Drop for DropProbe {
    fn drop(&mut self) {
        self.0.set(self.0.get() + 1);
    }
}

component_set! {
    struct Components {
        position: Position,
        name: Name,
        probe: DropProbe,
    }
}

fn id(raw: u64) -> EntityId {
    EntityId::new(raw)
}

// ============================================================================
// SCENARIO
// ============================================================================

#[test]
fn verify_mark_sweep_scenario() {
    let mut registry: Registry<Components> = Registry::new();

    let a = registry.new_entity().id();
    let b = registry.new_entity().id();
    let c = registry.new_entity().id();
    assert_eq!((a, b, c), (id(0), id(1), id(2)));

    registry.get_mut(a).unwrap().add(Position { x: 1, y: 1 });
    registry.get_mut(c).unwrap().add(Position { x: 3, y: 3 });
    registry.get(b).unwrap().mark_delete();

    // Still visible until the sweep.
    assert!(registry.contains(b));
    assert_eq!(registry.len(), 3);

    assert_eq!(registry.clean_up(), 1);
    assert!(!registry.contains(b));
    assert!(registry.get_if(b).is_none());

    let mut visited = Vec::new();
    registry.run_system(|entity| visited.push(entity.id()));
    assert_eq!(visited, vec![id(0), id(2)]);

    assert_eq!(registry.get(c).unwrap().get::<Position>(), &Position { x: 3, y: 3 });
}

// ============================================================================
// IDS
// ============================================================================

#[test]
fn verify_ids_strictly_increase_across_clean_ups() {
    let mut registry: Registry<Components> = Registry::with_start_id(10);
    let mut issued = Vec::new();

    for round in 0..5 {
        for _ in 0..4 {
            issued.push(registry.new_entity().id());
        }
        // Reap every other entity each round.
        let marked: Vec<EntityId> = registry.ids().step_by(2).collect();
        for target in marked {
            registry.get(target).unwrap().mark_delete();
        }
        assert!(registry.clean_up() > 0, "round {round} reaped nothing");
    }

    assert_eq!(issued.first(), Some(&id(10)));
    assert!(issued.windows(2).all(|pair| pair[0] < pair[1]));
    assert_eq!(registry.next_id(), id(30));
}

#[test]
fn verify_contains_tracks_issue_and_reap() {
    let mut registry: Registry<Components> = Registry::new();
    assert!(!registry.contains(id(0)));

    let first = registry.new_entity().id();
    assert!(registry.contains(first));

    // Marking alone does not remove.
    registry.get(first).unwrap().mark_delete();
    assert!(registry.contains(first));

    registry.clean_up();
    assert!(!registry.contains(first));
    assert_eq!(registry.get(first).err(), Some(EcsError::NotFound(first)));
}

#[test]
fn verify_registry_from_toml_config() {
    let config = RegistryConfig::from_toml_str("start_id = 500\ninitial_capacity = 8").unwrap();
    let mut registry: Registry<Components> = Registry::from_config(&config).unwrap();

    assert_eq!(registry.new_entity().id(), id(500));
    assert_eq!(registry.new_entity().id(), id(501));
}

// ============================================================================
// COMPONENTS
// ============================================================================

#[test]
fn verify_fresh_entity_has_no_components() {
    let mut registry: Registry<Components> = Registry::new();
    let entity = registry.new_entity();

    assert!(!entity.has::<Position>());
    assert!(!entity.has::<Name>());
    assert!(!entity.has::<DropProbe>());
    assert!(entity.signature().is_empty());
}

#[test]
fn verify_add_replaces_and_drops_previous_value() {
    let drops = Rc::new(Cell::new(0));
    let mut registry: Registry<Components> = Registry::new();
    let entity = registry.new_entity();

    entity.add(DropProbe(Rc::clone(&drops)));
    assert_eq!(drops.get(), 0);

    entity.add(DropProbe(Rc::clone(&drops)));
    assert_eq!(drops.get(), 1, "overwritten value must be dropped");

    entity.add(Name("first".to_owned()));
    entity.add(Name("second".to_owned()));
    assert_eq!(entity.get::<Name>(), &Name("second".to_owned()));

    entity.remove::<DropProbe>();
    assert_eq!(drops.get(), 2);
    assert!(!entity.has::<DropProbe>());
    assert!(entity.get_if::<DropProbe>().is_none());
}

#[test]
fn verify_clean_up_drops_components_of_reaped_entities() {
    let drops = Rc::new(Cell::new(0));
    let mut registry: Registry<Components> = Registry::new();

    for i in 0..4 {
        let entity = registry.new_entity();
        entity.add(DropProbe(Rc::clone(&drops)));
        if i % 2 == 1 {
            entity.mark_delete();
        }
    }

    assert_eq!(registry.clean_up(), 2);
    assert_eq!(drops.get(), 2);

    drop(registry);
    assert_eq!(drops.get(), 4);
}

#[test]
fn verify_mark_delete_is_idempotent() {
    let mut registry: Registry<Components> = Registry::new();
    let entity = registry.new_entity();
    entity.add(Position { x: 0, y: 0 });

    entity.mark_delete();
    entity.mark_delete();
    assert!(entity.is_marked_delete());
    assert!(entity.has::<Position>());

    assert_eq!(registry.clean_up(), 1);
    assert!(registry.is_empty());
}

#[test]
#[should_panic(expected = "has no")]
fn verify_get_absent_component_panics() {
    let mut registry: Registry<Components> = Registry::new();
    let entity = registry.new_entity();
    let _ = entity.get::<Name>();
}
