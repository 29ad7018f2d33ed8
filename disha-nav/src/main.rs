//! DishaNav - arena simulation runner
//!
//! # Usage
//!
//! ```bash
//! # Defaults (reference arena), resolve once with the known map
//! cargo run --release -- --mode known
//!
//! # Custom config, explore an unknown arena
//! cargo run --release -- --config disha.toml --mode unknown
//!
//! # Drive it by hand: "human left", "resolve unknown", "set alpha 0.3", "quit"
//! cargo run --release -- --interactive
//! ```

use std::io::BufRead;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

use clap::Parser;
use crossbeam_channel::{Sender, unbounded};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use disha_nav::{Command, KnowledgeMode, NavConfig, Result, Simulation};

#[derive(Parser)]
#[command(name = "disha-nav")]
#[command(about = "Simulate a UWB-localized robot resolving an occluded human")]
struct Args {
    /// TOML configuration file (default: disha.toml if present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Start an occlusion run in this mode right away
    #[arg(short, long, value_enum)]
    mode: Option<KnowledgeMode>,

    /// Maximum simulation ticks before exiting
    #[arg(long, default_value = "5000")]
    ticks: u64,

    /// Read commands from stdin and run in real time
    #[arg(short, long)]
    interactive: bool,

    /// Log the obstacle edges behind every motion scan
    #[arg(long)]
    debug_scan: bool,
}

fn main() {
    // Initialize logging
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("disha_nav=info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let args = Args::parse();
    if let Err(e) = run(&args) {
        error!("{}", e);
        std::process::exit(1);
    }
}

fn load_config(args: &Args) -> Result<NavConfig> {
    match &args.config {
        Some(path) => {
            info!("Loading configuration from {:?}", path);
            NavConfig::load(path)
        }
        None if Path::new("disha.toml").exists() => {
            info!("Loading configuration from disha.toml");
            NavConfig::load(Path::new("disha.toml"))
        }
        None => {
            info!("Using default configuration");
            Ok(NavConfig::default())
        }
    }
}

fn run(args: &Args) -> Result<()> {
    let mut config = load_config(args)?;
    if args.debug_scan {
        config.simulation.debug_scan = true;
    }
    info!("DishaNav v{}", env!("CARGO_PKG_VERSION"));
    info!(
        "Arena {:.0}x{:.0}, inflation {}, range error up to {:.0}%",
        config.arena.width,
        config.arena.height,
        config.arena.inflation_factor,
        config.localization.error_percentage * 100.0
    );

    let tick = Duration::from_millis(config.simulation.tick_ms.max(1));
    let mut sim = Simulation::new(config)?;

    if args.interactive {
        let (tx, rx) = unbounded();
        sim.attach_commands(rx);
        thread::Builder::new()
            .name("stdin".into())
            .spawn(move || read_commands(tx))?;
        info!("Interactive mode: type commands, 'quit' to exit");
    }

    if let Some(mode) = args.mode {
        sim.submit(Command::ResolveOcclusion { mode: Some(mode) })?;
    }

    for _ in 0..args.ticks {
        sim.tick();
        if !sim.is_running() {
            break;
        }
        if args.interactive {
            thread::sleep(tick);
        } else if args.mode.is_none() || sim.last_outcome().is_some() {
            break;
        }
    }

    let robot = sim.world().true_position(sim.robot());
    let human = sim.world().true_position(sim.human());
    if let (Some(r), Some(h)) = (robot, human) {
        info!(
            "Final: robot ({:.1}, {:.1}), human ({:.1}, {:.1}), {:.1} apart",
            r.x,
            r.y,
            h.x,
            h.y,
            r.distance(&h)
        );
    }
    match sim.last_outcome() {
        Some(outcome) => info!("Outcome: {:?}", outcome),
        None if args.mode.is_some() => warn!("Run did not finish within {} ticks", args.ticks),
        None => {}
    }
    let progress = sim.controller().progress();
    info!(
        "Progress: {} plans, {} frontier iterations, {} moves ({} blocked), {:.1} units travelled",
        progress.plans,
        progress.frontier_iterations,
        progress.moves,
        progress.blocked_moves,
        sim.travel().distance_travelled(sim.robot())
    );
    Ok(())
}

/// Forward parsed stdin lines until EOF or `quit`.
fn read_commands(tx: Sender<Command>) {
    let stdin = std::io::stdin();
    for line in stdin.lock().lines() {
        let Ok(line) = line else { break };
        if line.trim().is_empty() {
            continue;
        }
        match line.parse::<Command>() {
            Ok(command) => {
                let quit = command == Command::Quit;
                if tx.send(command).is_err() || quit {
                    break;
                }
            }
            Err(e) => warn!("{}", e),
        }
    }
}
