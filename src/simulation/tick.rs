//! Tick system - the fixed-step host loop
//!
//! Each tick: accept new observers, apply their submitted intents, drop
//! observers whose channel closed, advance the world, then send every
//! remaining observer the perception of the tick's effects.

use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::core::error::{Result, WorldError};
use crate::core::types::{ActorId, Tick};
use crate::data::{ActorType, TypeRegistry};
use crate::effects::Effect;
use crate::net::channel::{ConnectionSource, ServerChannel};
use crate::net::messages::{ClientMessage, ServerMessage};
use crate::simulation::perception::Perception;
use crate::world::World;

/// A connected observer and the actor it controls
pub struct Observer {
    pub actor: ActorId,
    channel: ServerChannel,
}

/// What one tick did
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickReport {
    pub tick: Tick,
    /// Effects recorded during the tick
    pub effects: usize,
    pub perceptions_sent: usize,
    /// Observers still connected after the tick
    pub observers: usize,
}

pub struct Simulation {
    world: World,
    player_type: Arc<ActorType>,
    observers: Vec<Observer>,
    source: Box<dyn ConnectionSource>,
}

impl Simulation {
    /// Fails if the configured player type is not registered
    pub fn new(
        world: World,
        registry: &TypeRegistry,
        source: Box<dyn ConnectionSource>,
    ) -> Result<Self> {
        let player_type = registry.actor(&world.config().player_type)?;
        Ok(Self {
            world,
            player_type,
            observers: Vec::new(),
            source,
        })
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }

    /// Actors bound to connected observers, in connection order
    pub fn observer_actors(&self) -> Vec<ActorId> {
        self.observers.iter().map(|o| o.actor).collect()
    }

    /// Run one fixed step
    pub fn tick(&mut self) -> TickReport {
        let dt = self.world.config().tick_seconds();

        self.accept_observers();
        self.handle_observers();
        self.world.advance(dt);

        let effects = self.world.take_effects();
        let mut perceptions_sent = 0;
        for observer in &mut self.observers {
            let perception = Perception::build(observer.actor, &effects, &self.world);
            if perception.is_empty() {
                observer.channel.send(None);
            } else {
                observer.channel.send(Some(perception.to_message()));
                perceptions_sent += 1;
            }
        }

        self.detach_dead_observers();

        let report = TickReport {
            tick: self.world.current_tick,
            effects: effects.len(),
            perceptions_sent,
            observers: self.observers.len(),
        };
        tracing::trace!(?report, "tick");
        report
    }

    /// Tick at the configured frequency; `None` runs until the process ends
    ///
    /// Sleeps out whatever is left of each tick's budget and never waits to
    /// catch up after an overrun.
    pub fn run(&mut self, ticks: Option<u64>) -> Tick {
        let budget = Duration::from_secs_f64(self.world.config().tick_seconds());
        let mut ran = 0;

        tracing::info!(
            "Running at {} Hz with {} actors",
            self.world.config().tick_frequency,
            self.world.actor_count()
        );

        while ticks.map_or(true, |limit| ran < limit) {
            let started = Instant::now();
            let report = self.tick();
            ran += 1;

            let elapsed = started.elapsed();
            if elapsed < budget {
                std::thread::sleep(budget - elapsed);
            } else {
                tracing::warn!(
                    "Tick {} overran its budget by {:?}",
                    report.tick,
                    elapsed - budget
                );
            }
        }
        ran
    }

    fn accept_observers(&mut self) {
        while let Some(mut channel) = self.source.accept() {
            let player_type = self.player_type.clone();
            let faction = self.world.config().player_faction.clone();
            let spawned = self
                .world
                .free_spawn_point()
                .ok_or(WorldError::NoSpawnPoint)
                .and_then(|spawn| {
                    self.world
                        .spawn_actor(player_type, faction, spawn)
                        .map(|actor| (actor, spawn))
                });

            match spawned {
                Ok((actor, spawn)) => {
                    tracing::info!("Observer joined as {} at {}", actor, spawn);
                    channel.send(Some(ServerMessage::Identity { id: actor }));
                    self.observers.push(Observer { actor, channel });
                }
                Err(e) => {
                    tracing::warn!("Refusing connection: {}", e);
                    channel.close();
                }
            }
        }
    }

    /// Apply submitted intents and drop closed connections
    fn handle_observers(&mut self) {
        let world = &mut self.world;
        self.observers.retain_mut(|observer| {
            while let Some(message) = observer.channel.receive() {
                match message {
                    ClientMessage::Intent { intent } => match intent.resolve(observer.actor, world) {
                        Some(resolved) => {
                            world.set_intent(observer.actor, Some(resolved));
                        }
                        None => tracing::debug!("Ignoring unresolvable intent from {}", observer.actor),
                    },
                }
            }

            if observer.channel.is_open() {
                return true;
            }
            tracing::info!("Observer for {} disconnected", observer.actor);
            if world.actor(observer.actor).is_some() {
                world.apply(Effect::kill(observer.actor));
            }
            false
        });
    }

    /// Observers whose actor died this tick have been told; let them go
    fn detach_dead_observers(&mut self) {
        let world = &self.world;
        self.observers.retain_mut(|observer| {
            if world.actor(observer.actor).is_some() {
                return true;
            }
            tracing::info!("Detaching observer of dead {}", observer.actor);
            observer.channel.close();
            false
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::AreaId;
    use crate::core::SimulationConfig;
    use crate::net::channel::{memory_listener, MessageChannel};
    use crate::spatial::{Area, Location, Position};

    const TYPES: &str = r#"
        [[tiles]]
        name = "grass"
        glyph = "."
        speed = { ground = 1.0 }

        [[actors]]
        name = "player"
        hit_points = 10.0
        damage = 2.0
        attack_speed = 1.0
        speed = { ground = 2.0 }
    "#;

    fn simulation() -> (Simulation, crate::net::MemoryConnector) {
        let registry = TypeRegistry::from_toml_str(TYPES).unwrap();
        let mut world = World::new(SimulationConfig::default());
        world.add_area(Area::filled(AreaId(0), 3, 3, registry.tile("grass").unwrap()));
        world.add_spawn_point(Location::new(AreaId(0), Position::new(0, 0)));
        let (listener, connector) = memory_listener();
        let sim = Simulation::new(world, &registry, Box::new(listener)).unwrap();
        (sim, connector)
    }

    #[test]
    fn test_missing_player_type_fails() {
        let registry = TypeRegistry::new();
        let (listener, _) = memory_listener();
        let result = Simulation::new(World::default(), &registry, Box::new(listener));
        assert!(result.is_err());
    }

    #[test]
    fn test_connection_gets_identity_and_snapshot() {
        let (mut sim, connector) = simulation();
        let mut client = connector.connect();

        let report = sim.tick();

        assert_eq!(report.observers, 1);
        assert_eq!(report.perceptions_sent, 1);
        let id = match client.receive() {
            Some(ServerMessage::Identity { id }) => id,
            other => panic!("expected identity, got {:?}", other),
        };
        match client.receive() {
            Some(ServerMessage::Perception(p)) => {
                assert_eq!(p.area, Some(AreaId(0)));
                assert_eq!(p.tiles.map(|t| t.len()), Some(9));
            }
            other => panic!("expected perception, got {:?}", other),
        }
        assert_eq!(sim.observer_actors(), vec![id]);
    }

    #[test]
    fn test_no_free_spawn_point_closes_connection() {
        let (mut sim, connector) = simulation();
        let _first = connector.connect();
        let mut second = connector.connect();

        sim.tick();

        assert_eq!(sim.observer_count(), 1);
        assert!(second.receive().is_none());
        assert!(!second.is_open());
    }

    #[test]
    fn test_disconnect_kills_actor() {
        let (mut sim, connector) = simulation();
        let mut client = connector.connect();
        sim.tick();
        let actor = sim.observer_actors()[0];

        client.close();
        sim.tick();

        assert_eq!(sim.observer_count(), 0);
        assert!(sim.world().actor(actor).is_none());
    }

    #[test]
    fn test_quiet_tick_sends_nothing() {
        let (mut sim, connector) = simulation();
        let _client = connector.connect();
        sim.tick();

        let report = sim.tick();
        assert_eq!(report.perceptions_sent, 0);
        assert_eq!(report.effects, 0);
    }

    #[test]
    fn test_run_counts_ticks() {
        let (mut sim, _) = simulation();
        sim.world_mut().current_tick = 0;
        assert_eq!(sim.run(Some(3)), 3);
        assert_eq!(sim.world().current_tick, 3);
    }
}
