//! World integration tests
//!
//! Drive actors through whole ticks and check positions, action progress
//! and the recorded effect sequence.

use std::sync::Arc;

use tileworld::core::types::{ActorId, AreaId};
use tileworld::core::SimulationConfig;
use tileworld::data::{ActorType, MovementKind, StructureKind, StructureType, TileType};
use tileworld::effects::Effect;
use tileworld::entity::{update_actor, Behavior, Intent};
use tileworld::simulation::Perception;
use tileworld::spatial::{Area, Direction, Location, Position};
use tileworld::world::World;

/// Ground tiles that quarter movement speed
fn slow_grass() -> Arc<TileType> {
    Arc::new(TileType::new("grass").with_speed(MovementKind::Ground, 0.25))
}

fn runner() -> Arc<ActorType> {
    Arc::new(
        ActorType::new("runner", 10.0)
            .with_attack(4.0, 2.0)
            .with_speed(MovementKind::Ground, 4.0),
    )
}

fn at(area: u32, x: i32, y: i32) -> Location {
    Location::new(AreaId(area), Position::new(x, y))
}

fn names(effects: &[Effect]) -> Vec<&'static str> {
    effects.iter().map(|e| e.name()).collect()
}

#[test]
fn test_move_intent_end_to_end() {
    let mut world = World::new(SimulationConfig::default());
    world.add_area(Area::filled(AreaId(0), 3, 3, slow_grass()));
    let actor = world.spawn_actor(runner(), None, at(0, 0, 0)).unwrap();
    world.take_effects();
    world.set_intent(actor, Some(Intent::move_to(Position::new(2, 0))));

    world.advance(0.5);

    let state = world.actor(actor).unwrap();
    let action = state.action().expect("actor should be mid-step");
    assert_eq!(action.direction, Some(Direction::East));
    assert!((action.progress() - 0.5).abs() < 1e-9);
    assert_eq!(state.location(), Some(at(0, 0, 0)));

    world.take_effects();
    world.advance(0.5);

    assert_eq!(world.actor(actor).unwrap().location(), Some(at(0, 1, 0)));
    let effects = world.take_effects();
    assert_eq!(names(&effects), vec!["Progress", "Complete", "Move"]);

    // Two more seconds finish the walk and drop the satisfied intent
    world.advance(1.0);
    world.advance(0.5);
    let state = world.actor(actor).unwrap();
    assert_eq!(state.location(), Some(at(0, 2, 0)));
    assert!(state.action().is_none());
    assert_eq!(state.intent, None);
}

#[test]
fn test_leftover_time_flows_into_next_action() {
    let mut world = World::new(SimulationConfig::default());
    world.add_area(Area::filled(AreaId(0), 5, 1, slow_grass()));
    let actor = world.spawn_actor(runner(), None, at(0, 0, 0)).unwrap();
    world.take_effects();
    world.set_intent(actor, Some(Intent::move_to(Position::new(4, 0))));

    let spent = update_actor(&mut world, actor, 1.5);

    assert!((spent - 1.5).abs() < 1e-9);
    let state = world.actor(actor).unwrap();
    assert_eq!(state.location(), Some(at(0, 1, 0)));
    assert!((state.action().unwrap().progress() - 0.5).abs() < 1e-9);
    assert_eq!(
        names(world.effects()),
        vec!["Start", "Progress", "Complete", "Move", "Start", "Progress"]
    );
}

#[test]
fn test_idle_actor_spends_no_time() {
    let mut world = World::new(SimulationConfig::default());
    world.add_area(Area::filled(AreaId(0), 2, 2, slow_grass()));
    let actor = world.spawn_actor(runner(), None, at(0, 0, 0)).unwrap();
    world.take_effects();

    assert_eq!(update_actor(&mut world, actor, 0.5), 0.0);
    assert!(world.effects().is_empty());
}

#[test]
fn test_blocked_step_drops_intent() {
    let mut world = World::new(SimulationConfig::default());
    world.add_area(Area::filled(AreaId(0), 2, 1, slow_grass()));
    let mover = world.spawn_actor(runner(), None, at(0, 0, 0)).unwrap();
    world.spawn_actor(runner(), None, at(0, 1, 0)).unwrap();
    world.take_effects();
    world.set_intent(mover, Some(Intent::move_to(Position::new(1, 0))));

    world.advance(0.5);

    let state = world.actor(mover).unwrap();
    assert_eq!(state.intent, None);
    assert!(state.action().is_none());
    assert_eq!(state.location(), Some(at(0, 0, 0)));
}

#[test]
fn test_lethal_attack_cascade() {
    let grass = Arc::new(TileType::new("grass").with_speed(MovementKind::Ground, 1.0));
    let mut world = World::new(SimulationConfig::default());
    world.add_area(Area::filled(AreaId(0), 3, 1, grass));
    let attacker = world.spawn_actor(runner(), None, at(0, 0, 0)).unwrap();
    let victim = world
        .spawn_actor(Arc::new(ActorType::new("rat", 3.0)), None, at(0, 1, 0))
        .unwrap();
    world.take_effects();
    world.set_intent(attacker, Some(Intent::attack(victim)));

    // Attack speed 2: one blow lands after half a second
    world.advance(0.5);

    assert!(world.actor(victim).is_none());
    let tile = world
        .area(AreaId(0))
        .unwrap()
        .tile(&Position::new(1, 0))
        .unwrap();
    assert!(!tile.is_occupied());

    let effects = world.take_effects();
    let order = names(&effects);
    let damage = order.iter().position(|n| *n == "Damage").unwrap();
    assert_eq!(&order[damage..damage + 3], &["Damage", "Kill", "Move"]);
    match &effects[damage + 2] {
        Effect::Move { actor, to, .. } => {
            assert_eq!(*actor, victim);
            assert_eq!(*to, None);
        }
        other => panic!("expected Move, got {:?}", other),
    }
}

#[test]
fn test_portal_gives_full_snapshot_of_new_area() {
    let grass = Arc::new(TileType::new("grass").with_speed(MovementKind::Ground, 1.0));
    let mut world = World::new(SimulationConfig::default());
    world.add_area(Area::filled(AreaId(0), 3, 3, grass.clone()));
    world.add_area(Area::filled(AreaId(1), 2, 2, grass));

    let portal = Arc::new(
        StructureType::new(
            "stairs",
            StructureKind::Portal {
                area: AreaId(1),
                position: Position::new(0, 0),
            },
        )
        .with_interact_duration(0.0),
    );
    let statue = Arc::new(StructureType::new("statue", StructureKind::Decoration));
    let stairs = world.add_structure(portal, at(0, 2, 2)).unwrap();
    world.add_structure(statue, at(1, 1, 1)).unwrap();

    let traveller = world.spawn_actor(runner(), None, at(0, 2, 2)).unwrap();
    let resident = world.spawn_actor(runner(), None, at(1, 1, 0)).unwrap();
    world.take_effects();

    world.set_intent(traveller, Some(Intent::interact(stairs)));
    world.advance(0.05);

    assert_eq!(world.actor(traveller).unwrap().location(), Some(at(1, 0, 0)));
    let effects = world.take_effects();
    let perception = Perception::build(traveller, &effects, &world);

    assert_eq!(perception.area, Some(AreaId(1)));
    assert_eq!(perception.tiles.len(), 4);
    assert!(perception.entities.contains_key(&traveller));
    assert!(perception.entities.contains_key(&resident));
    assert_eq!(perception.structures.len(), 1);
}

#[test]
fn test_power_up_heals_and_disappears() {
    let grass = Arc::new(TileType::new("grass").with_speed(MovementKind::Ground, 1.0));
    let mut world = World::new(SimulationConfig::default());
    world.add_area(Area::filled(AreaId(0), 2, 1, grass));
    let potion = Arc::new(
        StructureType::new("potion", StructureKind::PowerUp { heal: 5.0 })
            .with_interact_duration(0.0),
    );
    let id = world.add_structure(potion, at(0, 0, 0)).unwrap();
    let actor = world.spawn_actor(runner(), None, at(0, 0, 0)).unwrap();
    world.apply(Effect::damage(actor, 6.0));
    world.take_effects();

    world.set_intent(actor, Some(Intent::interact(id)));
    world.advance(0.05);

    assert_eq!(world.actor(actor).unwrap().hit_points(), 9.0);
    assert!(world.structure(id).is_none());
    let effects = world.take_effects();
    assert!(names(&effects).ends_with(&["Complete", "Heal", "RemovePowerUp"]));
}

#[test]
fn test_goal_declares_winner() {
    let grass = Arc::new(TileType::new("grass").with_speed(MovementKind::Ground, 1.0));
    let mut world = World::new(SimulationConfig::default());
    world.add_area(Area::filled(AreaId(0), 1, 1, grass));
    let banner = Arc::new(StructureType::new("banner", StructureKind::Goal).with_interact_duration(1.0));
    let id = world.add_structure(banner, at(0, 0, 0)).unwrap();
    let actor = world.spawn_actor(runner(), None, at(0, 0, 0)).unwrap();
    world.set_intent(actor, Some(Intent::interact(id)));

    world.advance(0.5);
    assert_eq!(world.winner(), None);
    world.advance(0.5);
    assert_eq!(world.winner(), Some(actor));
}

#[test]
fn test_instant_interaction_ends_its_intent() {
    let grass = Arc::new(TileType::new("grass").with_speed(MovementKind::Ground, 1.0));
    let mut world = World::new(SimulationConfig::default());
    world.add_area(Area::filled(AreaId(0), 1, 1, grass));
    let banner = Arc::new(StructureType::new("banner", StructureKind::Goal).with_interact_duration(0.0));
    let id = world.add_structure(banner, at(0, 0, 0)).unwrap();
    let actor = world.spawn_actor(runner(), None, at(0, 0, 0)).unwrap();
    world.take_effects();
    world.set_intent(actor, Some(Intent::interact(id)));

    world.advance(0.05);

    let effects = world.take_effects();
    assert_eq!(names(&effects), vec!["Start", "Progress", "Complete", "Win"]);
    assert_eq!(world.actor(actor).unwrap().intent, None);
    assert_eq!(world.winner(), Some(actor));

    world.advance(0.05);
    assert!(world.effects().is_empty());
}

#[test]
fn test_hunter_chases_and_attacks() {
    let grass = Arc::new(TileType::new("grass").with_speed(MovementKind::Ground, 1.0));
    let mut world = World::new(SimulationConfig::default());
    world.add_area(Area::filled(AreaId(0), 6, 1, grass));
    let hunter = world
        .spawn_actor(runner(), Some("monsters".into()), at(0, 0, 0))
        .unwrap();
    let prey = world
        .spawn_actor(
            Arc::new(ActorType::new("sheep", 100.0)),
            Some("farm".into()),
            at(0, 5, 0),
        )
        .unwrap();
    world.set_behavior(hunter, Some(Behavior::hunter(10.0))).unwrap();

    for _ in 0..40 {
        world.advance(0.1);
    }

    let hunter_state = world.actor(hunter).unwrap();
    assert_eq!(hunter_state.intent, Some(Intent::attack(prey)));
    assert_eq!(hunter_state.location(), Some(at(0, 4, 0)));
    assert!(world.actor(prey).unwrap().hit_points() < 100.0);
}

#[test]
fn test_actors_update_in_ascending_id_order() {
    let grass = Arc::new(TileType::new("grass").with_speed(MovementKind::Ground, 1.0));
    let mut world = World::new(SimulationConfig::default());
    world.add_area(Area::filled(AreaId(0), 3, 1, grass));
    // Both want the middle tile; the lower id gets there first
    let left = world.spawn_actor(runner(), None, at(0, 0, 0)).unwrap();
    let right = world.spawn_actor(runner(), None, at(0, 2, 0)).unwrap();
    assert!(left < right);
    world.set_intent(right, Some(Intent::move_to(Position::new(1, 0))));
    world.set_intent(left, Some(Intent::move_to(Position::new(1, 0))));

    world.advance(1.0);

    assert_eq!(world.actor(left).unwrap().location(), Some(at(0, 1, 0)));
    assert_eq!(world.actor(right).unwrap().location(), Some(at(0, 2, 0)));
}

#[test]
fn test_ids_are_reused_lowest_first() {
    let grass = Arc::new(TileType::new("grass"));
    let mut world = World::new(SimulationConfig::default());
    world.add_area(Area::filled(AreaId(0), 3, 1, grass));
    let first = world.spawn_actor(runner(), None, at(0, 0, 0)).unwrap();
    world.spawn_actor(runner(), None, at(0, 1, 0)).unwrap();
    world.apply(Effect::kill(first));

    let next = world.spawn_actor(runner(), None, at(0, 2, 0)).unwrap();
    assert_eq!(next, ActorId(0));
}
