//! Monte Carlo balance simulator.
//!
//! Runs many seeded playthroughs against the real engine operations to check:
//! - Tier frequencies from bundle openings
//! - Coin flow across bundles, sales and battle rewards
//! - Upgrade throughput
//! - Battle win rates and how far the opponent ladder gets climbed

mod config;
mod report;
mod runner;

pub use config::SimConfig;
pub use report::{RunStats, SimReport};
pub use runner::{run_simulation, simulate_single_run};
