//! Colony Tasks - Entry Point
//!
//! Runs the task orchestrator against a simulated colony for a number of
//! ticks, optionally restarting it from persisted memory along the way.

use std::path::PathBuf;

use clap::Parser;
use colony_tasks::core::config::OrchestratorConfig;
use colony_tasks::core::error::Result;
use colony_tasks::memory::TaskMemory;
use colony_tasks::simulation::{advance, SimWorld};
use colony_tasks::tasks::TaskRegistry;
use colony_tasks::Orchestrator;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing_subscriber::EnvFilter;

/// Colony Tasks - simulated colony driven by the task orchestrator
#[derive(Parser, Debug)]
#[command(name = "colony-tasks")]
#[command(about = "Run the task orchestrator against a simulated colony")]
struct Args {
    /// Ticks to simulate
    #[arg(long, default_value_t = 3000)]
    ticks: u64,

    /// Random seed for deterministic runs
    #[arg(long)]
    seed: Option<u64>,

    /// Orchestrator configuration (TOML)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Persisted task memory; loaded on start and written on exit
    #[arg(long)]
    memory: Option<PathBuf>,

    /// Restart the orchestrator every N ticks (0 = never)
    #[arg(long, default_value_t = 0)]
    restart_every: u64,

    /// Print a ledger summary every N ticks (0 = only at the end)
    #[arg(long, default_value_t = 500)]
    summary_every: u64,

    /// Install only these tasks instead of the built-in set
    #[arg(long, value_delimiter = ',')]
    tasks: Vec<String>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("colony_tasks=info")),
        )
        .init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => OrchestratorConfig::load(path)?,
        None => OrchestratorConfig::default(),
    };
    let memory = match &args.memory {
        Some(path) => TaskMemory::load(path)?,
        None => TaskMemory::new(),
    };

    let seed = args.seed.unwrap_or_else(rand::random);
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut world = SimWorld::demo(&config);

    let mut orchestrator = Orchestrator::from_memory(config, memory);
    install_tasks(orchestrator.registry_mut(), &args.tasks)?;
    orchestrator.register();

    tracing::info!(
        seed,
        ticks = args.ticks,
        tasks = orchestrator.registry().len(),
        "Colony simulation starting"
    );

    let mut deliveries = 0;
    for _ in 0..args.ticks {
        let events = advance(&mut world, &mut rng);
        orchestrator.publish_all(events);
        let report = orchestrator.run_tick(&mut world);
        deliveries += report.deliveries;

        if args.restart_every > 0 && report.tick % args.restart_every == 0 {
            orchestrator = orchestrator.restart()?;
        }
        if args.summary_every > 0 && report.tick % args.summary_every == 0 {
            print_summary(&orchestrator, &world, report.tick);
        }
    }

    println!("\n=== FINAL STATE (seed {}) ===", seed);
    print_summary(&orchestrator, &world, args.ticks);
    println!("Handler calls: {}", deliveries);

    if let Some(path) = &args.memory {
        orchestrator.save_memory(path)?;
        println!("Task memory written to {}", path.display());
    }
    Ok(())
}

fn install_tasks(registry: &mut TaskRegistry, names: &[String]) -> Result<()> {
    if names.is_empty() {
        registry.populate();
        return Ok(());
    }
    let names: Vec<&str> = names.iter().map(String::as_str).collect();
    registry.install_task(&names)
}

fn print_summary(orchestrator: &Orchestrator, world: &SimWorld, tick: u64) {
    println!("\n--- Tick {} ---", tick);
    println!(
        "Creeps alive: {}, invaders: {}",
        world.creep_count(),
        world.invaders().count()
    );
    for room in world.rooms() {
        println!(
            "  {:<6} rcl {} energy {:>5}/{:<5} queued {}",
            room.name,
            room.controller_level,
            room.energy_available,
            room.energy_capacity,
            room.queued_count()
        );
    }

    let memory = orchestrator.memory();
    for task in memory.task_names() {
        for (selector, ledger) in memory.ledgers(task) {
            println!(
                "  {:<16} {:<16} queued {} spawning {} running {}",
                task,
                selector,
                ledger.queued.len(),
                ledger.spawning.len(),
                ledger.running.len()
            );
        }
    }
}
