//! Simulation configuration.

use crate::bundles::BundleId;

/// Configuration for a simulation run.
#[derive(Debug, Clone)]
pub struct SimConfig {
    /// Number of simulated players
    pub num_runs: u32,

    /// Random seed for reproducibility (None = random)
    pub seed: Option<u64>,

    /// Bundle opened by every simulated player
    pub bundle: BundleId,

    /// Bundles opened per player; coins are topped up to afford them
    pub bundles_per_run: u32,

    /// Battles attempted per player after upgrading
    pub battles_per_run: u32,

    /// Whether to sell leftover Common duplicates at the end of a run
    pub sell_duplicates: bool,

    /// Log verbosity (0 = silent, 1 = summary, 2 = per run)
    pub verbosity: u8,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            num_runs: 100,
            seed: None,
            bundle: BundleId::new("premium"),
            bundles_per_run: 20,
            battles_per_run: 10,
            sell_duplicates: true,
            verbosity: 1,
        }
    }
}

impl SimConfig {
    /// Many openings, no battles. For checking tier frequencies.
    pub fn odds_check(bundle: &str, num_runs: u32) -> Self {
        Self {
            num_runs,
            bundle: BundleId::new(bundle),
            bundles_per_run: 50,
            battles_per_run: 0,
            sell_duplicates: false,
            ..Default::default()
        }
    }

    /// Long battle ladder for checking opponent difficulty.
    pub fn ladder_check(num_runs: u32) -> Self {
        Self {
            num_runs,
            bundle: BundleId::new("mega"),
            bundles_per_run: 10,
            battles_per_run: 60,
            ..Default::default()
        }
    }
}
