//! World server
//!
//! Loads the type registry and a scenario, listens for observers over TCP
//! and runs the fixed-step simulation.

use std::path::PathBuf;

use clap::Parser;
use tileworld::core::SimulationConfig;
use tileworld::data::{Scenario, TypeRegistry};
use tileworld::net::TcpAcceptor;
use tileworld::simulation::Simulation;

/// Authoritative tile world host
#[derive(Parser, Debug)]
#[command(name = "world_server")]
#[command(about = "Host a tile world and replicate it to connected observers")]
struct Args {
    /// Address to accept observer connections on
    #[arg(long, default_value = "127.0.0.1:7070")]
    bind: String,

    /// Tile, actor and structure type definitions
    #[arg(long, default_value = "data/types.toml")]
    types: PathBuf,

    /// Initial world layout
    #[arg(long, default_value = "data/world.toml")]
    scenario: PathBuf,

    /// Simulation settings (defaults used when omitted)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the configured tick frequency, in Hz
    #[arg(long)]
    frequency: Option<f64>,

    /// Stop after this many ticks
    #[arg(long)]
    ticks: Option<u64>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => SimulationConfig::load(path)?,
        None => SimulationConfig::default(),
    };
    if let Some(frequency) = args.frequency {
        config.tick_frequency = frequency;
    }
    config.validate()?;

    let registry = TypeRegistry::load(&args.types)?;
    let scenario = Scenario::load(&args.scenario)?;
    let world = scenario.build(&registry, config.clone())?;

    let acceptor = TcpAcceptor::bind(&args.bind, config.max_frame_bytes)?;
    tracing::info!("Listening on {}", acceptor.local_addr()?);

    let mut simulation = Simulation::new(world, &registry, Box::new(acceptor))?;
    let ran = simulation.run(args.ticks);

    tracing::info!("Stopped after {} ticks", ran);
    if let Some(winner) = simulation.world().winner() {
        tracing::info!("Winner: {}", winner);
    }
    Ok(())
}
