//! Scenario files: the initial world layout
//!
//! A scenario lists areas as glyph rows, the structures and behaviour-driven
//! actors placed in them, and the spawn points used for connecting players.

use std::path::Path;

use serde::Deserialize;

use crate::core::config::SimulationConfig;
use crate::core::error::{ConfigError, Result};
use crate::core::types::AreaId;
use crate::data::registry::TypeRegistry;
use crate::entity::Behavior;
use crate::spatial::{Area, Location, Position};
use crate::world::World;

#[derive(Debug, Clone, Deserialize)]
pub struct AreaDef {
    pub id: AreaId,
    pub rows: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StructureDef {
    #[serde(rename = "type")]
    pub type_name: String,
    pub area: AreaId,
    pub position: Position,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BehaviorDef {
    Hunter { aggro_range: f64 },
    Wanderer { radius: i32, seed: u64 },
}

impl BehaviorDef {
    pub fn build(&self) -> std::result::Result<Behavior, ConfigError> {
        match *self {
            BehaviorDef::Hunter { aggro_range } => Ok(Behavior::hunter(aggro_range)),
            BehaviorDef::Wanderer { radius, .. } if radius < 0 => Err(ConfigError::Invalid(
                format!("wanderer radius must not be negative, got {}", radius),
            )),
            BehaviorDef::Wanderer { radius, seed } => Ok(Behavior::wanderer(radius, seed)),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ActorDef {
    #[serde(rename = "type")]
    pub type_name: String,
    #[serde(default)]
    pub faction: Option<String>,
    pub area: AreaId,
    pub position: Position,
    #[serde(default)]
    pub behavior: Option<BehaviorDef>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SpawnDef {
    pub area: AreaId,
    pub position: Position,
}

/// Initial world description
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Scenario {
    #[serde(default)]
    pub areas: Vec<AreaDef>,
    #[serde(default)]
    pub structures: Vec<StructureDef>,
    #[serde(default)]
    pub actors: Vec<ActorDef>,
    #[serde(default)]
    pub spawn_points: Vec<SpawnDef>,
}

impl Scenario {
    pub fn from_toml_str(content: &str) -> std::result::Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    pub fn load(path: &Path) -> std::result::Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Build a fresh world; types are resolved through `registry`
    pub fn build(&self, registry: &TypeRegistry, config: SimulationConfig) -> Result<World> {
        let mut world = World::new(config);

        for def in &self.areas {
            world.add_area(Area::from_rows(def.id, &def.rows, registry)?);
        }

        for def in &self.structures {
            let structure_type = registry.structure(&def.type_name)?;
            world.add_structure(structure_type, Location::new(def.area, def.position))?;
        }

        for def in &self.actors {
            let actor_type = registry.actor(&def.type_name)?;
            let id = world.spawn_actor(
                actor_type,
                def.faction.clone(),
                Location::new(def.area, def.position),
            )?;
            if let Some(behavior) = &def.behavior {
                world.set_behavior(id, Some(behavior.build()?))?;
            }
        }

        for def in &self.spawn_points {
            world.add_spawn_point(Location::new(def.area, def.position));
        }

        // Placement effects are setup, not part of any tick
        world.take_effects();

        tracing::info!(
            "Built world: {} areas, {} actors, {} structures",
            self.areas.len(),
            world.actor_count(),
            world.structures().len()
        );
        Ok(world)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::WorldError;

    const TYPES: &str = r#"
        [[tiles]]
        name = "grass"
        glyph = "."
        speed = { ground = 1.0 }

        [[tiles]]
        name = "wall"
        glyph = '#'
        solid = true

        [[actors]]
        name = "goblin"
        hit_points = 4.0
        damage = 1.0
        attack_speed = 1.0
        speed = { ground = 1.0 }

        [[structures]]
        name = "flag"
        interact_duration = 0.0
        kind = "goal"
    "#;

    const SCENARIO: &str = r#"
        [[areas]]
        id = 0
        rows = [
            '#####',
            '#...#',
            '#...#',
            '#####',
        ]

        [[structures]]
        type = "flag"
        area = 0
        position = { x = 3, y = 2 }

        [[actors]]
        type = "goblin"
        faction = "monsters"
        area = 0
        position = { x = 1, y = 1 }
        behavior = { kind = "hunter", aggro_range = 6.0 }

        [[spawn_points]]
        area = 0
        position = { x = 1, y = 1 }

        [[spawn_points]]
        area = 0
        position = { x = 2, y = 2 }
    "#;

    #[test]
    fn test_build_scenario() {
        let registry = TypeRegistry::from_toml_str(TYPES).unwrap();
        let scenario = Scenario::from_toml_str(SCENARIO).unwrap();

        let world = scenario.build(&registry, SimulationConfig::default()).unwrap();

        assert_eq!(world.actor_count(), 1);
        assert_eq!(world.structures().len(), 1);
        assert!(world.effects().is_empty());
        let goblin = world.actors().next().unwrap();
        assert!(matches!(goblin.behavior, Some(Behavior::Hunter { .. })));
    }

    #[test]
    fn test_free_spawn_point_skips_occupied() {
        let registry = TypeRegistry::from_toml_str(TYPES).unwrap();
        let scenario = Scenario::from_toml_str(SCENARIO).unwrap();
        let world = scenario.build(&registry, SimulationConfig::default()).unwrap();

        assert_eq!(
            world.free_spawn_point(),
            Some(Location::new(AreaId(0), Position::new(2, 2)))
        );
    }

    #[test]
    fn test_unknown_actor_type_fails() {
        let registry = TypeRegistry::from_toml_str(TYPES).unwrap();
        let scenario = Scenario::from_toml_str(
            r#"
            [[areas]]
            id = 0
            rows = ["..."]

            [[actors]]
            type = "dragon"
            area = 0
            position = { x = 0, y = 0 }
            "#,
        )
        .unwrap();

        assert!(scenario.build(&registry, SimulationConfig::default()).is_err());
    }

    #[test]
    fn test_negative_wander_radius_fails() {
        let registry = TypeRegistry::from_toml_str(TYPES).unwrap();
        let scenario = Scenario::from_toml_str(
            r#"
            [[areas]]
            id = 0
            rows = ["..."]

            [[actors]]
            type = "goblin"
            area = 0
            position = { x = 0, y = 0 }
            behavior = { kind = "wanderer", radius = -2, seed = 7 }
            "#,
        )
        .unwrap();

        let result = scenario.build(&registry, SimulationConfig::default());
        assert!(matches!(result, Err(WorldError::Config(ConfigError::Invalid(_)))));
    }
}
