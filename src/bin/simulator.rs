//! Cardkeep headless balance simulator.
//!
//! Plays seeded players through bundle openings, upgrades and the battle
//! ladder using the library's real operations, then prints aggregate odds,
//! coin flow and win rates.
//!
//! Usage:
//!   cargo run --bin simulator -- [OPTIONS]
//!
//! Options:
//!   --runs N        Number of simulated players (default: 100)
//!   --seed N        RNG seed (default: random)
//!   --bundle ID     Bundle to open (default: premium)
//!   --bundles N     Bundles opened per player (default: 20)
//!   --battles N     Battles per player (default: 10)
//!   --config FILE   Engine config JSON (default: built-in values)
//!   --json          Print the report as JSON
//!   --verbose       Per-run lines
//!   --quiet         Only the final summary line

use cardkeep::config::EngineConfig;
use cardkeep::engine::Engine;
use cardkeep::items::InMemoryCatalog;
use cardkeep::simulator::{run_simulation, SimConfig};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

struct CliArgs {
    sim: SimConfig,
    config_path: Option<String>,
    json: bool,
}

fn parse_number<T: std::str::FromStr>(flag: &str, value: Option<&String>) -> Result<T, String> {
    value
        .ok_or_else(|| format!("{flag} requires a value"))?
        .parse()
        .map_err(|_| format!("{flag} requires a number"))
}

fn parse_args(args: &[String]) -> Result<Option<CliArgs>, String> {
    let mut cli = CliArgs {
        sim: SimConfig::default(),
        config_path: None,
        json: false,
    };
    let mut iter = args.iter().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--runs" => cli.sim.num_runs = parse_number(arg, iter.next())?,
            "--seed" => cli.sim.seed = Some(parse_number(arg, iter.next())?),
            "--bundle" => {
                let id = iter.next().ok_or("--bundle requires a value")?;
                cli.sim.bundle = id.as_str().into();
            }
            "--bundles" => cli.sim.bundles_per_run = parse_number(arg, iter.next())?,
            "--battles" => cli.sim.battles_per_run = parse_number(arg, iter.next())?,
            "--config" => {
                let path = iter.next().ok_or("--config requires a path")?;
                cli.config_path = Some(path.clone());
            }
            "--json" => cli.json = true,
            "--verbose" => cli.sim.verbosity = 2,
            "--quiet" => cli.sim.verbosity = 0,
            "--help" | "-h" => return Ok(None),
            other => return Err(format!("Unknown argument: {other}")),
        }
    }
    Ok(Some(cli))
}

fn print_usage() {
    eprintln!(
        "Cardkeep Balance Simulator\n\
         \n\
         Usage: simulator [OPTIONS]\n\
         \n\
         Options:\n\
         \x20 --runs N        Number of simulated players (default: 100)\n\
         \x20 --seed N        RNG seed (default: random)\n\
         \x20 --bundle ID     Bundle to open (default: premium)\n\
         \x20 --bundles N     Bundles opened per player (default: 20)\n\
         \x20 --battles N     Battles per player (default: 10)\n\
         \x20 --config FILE   Engine config JSON\n\
         \x20 --json          Print the report as JSON\n\
         \x20 --verbose       Per-run lines\n\
         \x20 --quiet         Only the final summary line\n\
         \x20 --help, -h      Show this help"
    );
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().collect();
    let cli = match parse_args(&args) {
        Ok(Some(cli)) => cli,
        Ok(None) => {
            print_usage();
            return ExitCode::SUCCESS;
        }
        Err(msg) => {
            eprintln!("{msg}");
            print_usage();
            return ExitCode::FAILURE;
        }
    };

    let config = match &cli.config_path {
        Some(path) => match EngineConfig::load(path) {
            Ok(config) => config,
            Err(err) => {
                eprintln!("{err}");
                return ExitCode::FAILURE;
            }
        },
        None => EngineConfig::default(),
    };
    if let Err(err) = config.bundle(&cli.sim.bundle) {
        eprintln!("{err}");
        return ExitCode::FAILURE;
    }

    let engine = Engine::new(config, InMemoryCatalog::sample());
    let sim = &cli.sim;

    if sim.verbosity >= 1 && !cli.json {
        println!("╔═══════════════════════════════════════════════════════════════╗");
        println!("║              CARDKEEP BALANCE SIMULATOR                       ║");
        println!("╚═══════════════════════════════════════════════════════════════╝");
        println!();
        println!("Configuration:");
        println!("  Runs:           {}", sim.num_runs);
        println!("  Bundle:         {}", sim.bundle);
        println!("  Bundles/Run:    {}", sim.bundles_per_run);
        println!("  Battles/Run:    {}", sim.battles_per_run);
        if let Some(seed) = sim.seed {
            println!("  Seed:           {}", seed);
        }
        println!();
    }

    let report = run_simulation(sim, &engine);

    if cli.json {
        println!("{}", report.to_json());
    } else if sim.verbosity == 0 {
        println!("{}", report.summary_line());
    } else {
        println!("{}", report.to_text());
    }
    ExitCode::SUCCESS
}
