//! Simulation report generation.

use crate::items::Tier;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Statistics for a single simulated player.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunStats {
    pub bundles_opened: u32,
    /// Items received from bundles, per tier.
    pub drawn_by_tier: [u64; 5],
    pub coins_spent: u64,
    pub coins_earned: u64,
    pub upgrades: u32,
    pub battles_fought: u32,
    pub battles_won: u32,
    pub final_level: u32,
    pub final_opponent_level: u32,
    pub milestones_granted: usize,
    /// Operations rejected by a policy check (cooldowns, funds).
    pub rejected: u32,
}

impl RunStats {
    pub fn total_drawn(&self) -> u64 {
        self.drawn_by_tier.iter().sum()
    }

    pub fn win_rate(&self) -> f64 {
        if self.battles_fought == 0 {
            return 0.0;
        }
        self.battles_won as f64 / self.battles_fought as f64
    }
}

/// Aggregated results from multiple simulation runs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimReport {
    pub num_runs: u32,
    pub bundle: String,

    pub avg_bundles_opened: f64,
    /// Observed share of each tier among drawn items, in percent.
    pub tier_percent: [f64; 5],
    pub avg_coins_spent: f64,
    pub avg_coins_earned: f64,
    pub avg_upgrades: f64,
    pub avg_final_level: f64,
    pub avg_milestones: f64,

    pub win_rate: f64,
    pub avg_opponent_level: f64,
    pub opponent_level_distribution: BTreeMap<u32, u32>,

    pub run_stats: Vec<RunStats>,
}

impl SimReport {
    pub fn from_runs(runs: Vec<RunStats>, bundle: &str) -> Self {
        let num_runs = runs.len() as u32;
        let n = num_runs.max(1) as f64;
        let avg = |f: &dyn Fn(&RunStats) -> f64| runs.iter().map(f).sum::<f64>() / n;

        let mut drawn = [0u64; 5];
        for run in &runs {
            for (total, count) in drawn.iter_mut().zip(run.drawn_by_tier) {
                *total += count;
            }
        }
        let total_drawn = drawn.iter().sum::<u64>().max(1) as f64;
        let tier_percent = drawn.map(|count| count as f64 / total_drawn * 100.0);

        let fought: u64 = runs.iter().map(|r| r.battles_fought as u64).sum();
        let won: u64 = runs.iter().map(|r| r.battles_won as u64).sum();
        let win_rate = if fought == 0 {
            0.0
        } else {
            won as f64 / fought as f64
        };

        let mut opponent_level_distribution = BTreeMap::new();
        for run in &runs {
            *opponent_level_distribution
                .entry(run.final_opponent_level)
                .or_insert(0) += 1;
        }

        Self {
            num_runs,
            bundle: bundle.to_string(),
            avg_bundles_opened: avg(&|r| r.bundles_opened as f64),
            tier_percent,
            avg_coins_spent: avg(&|r| r.coins_spent as f64),
            avg_coins_earned: avg(&|r| r.coins_earned as f64),
            avg_upgrades: avg(&|r| r.upgrades as f64),
            avg_final_level: avg(&|r| r.final_level as f64),
            avg_milestones: avg(&|r| r.milestones_granted as f64),
            win_rate,
            avg_opponent_level: avg(&|r| r.final_opponent_level as f64),
            opponent_level_distribution,
            run_stats: runs,
        }
    }

    /// Generate a text report.
    pub fn to_text(&self) -> String {
        let mut report = String::new();

        report.push_str("═══════════════════════════════════════════════════════════════\n");
        report.push_str("                    SIMULATION REPORT\n");
        report.push_str("═══════════════════════════════════════════════════════════════\n\n");

        report.push_str(&format!(
            "Runs: {}   Bundle: {}\n\n",
            self.num_runs, self.bundle
        ));

        report.push_str("── DRAWS ────────────────────────────────────────────────────────\n");
        report.push_str(&format!(
            "  Avg Bundles Opened:  {:.1}\n",
            self.avg_bundles_opened
        ));
        for tier in Tier::ALL {
            let pct = self.tier_percent[tier.index()];
            let bar: String = "█".repeat((pct / 5.0) as usize);
            report.push_str(&format!(
                "  {} {:<10} {:>6.2}% {}\n",
                tier.emoji(),
                tier.name(),
                pct,
                bar
            ));
        }
        report.push('\n');

        report.push_str("── ECONOMY ──────────────────────────────────────────────────────\n");
        report.push_str(&format!(
            "  Avg Coins Spent:     {:.0}\n",
            self.avg_coins_spent
        ));
        report.push_str(&format!(
            "  Avg Coins Earned:    {:.0}\n",
            self.avg_coins_earned
        ));
        report.push_str(&format!("  Avg Upgrades:        {:.1}\n", self.avg_upgrades));
        report.push_str(&format!(
            "  Avg Final Level:     {:.1}\n",
            self.avg_final_level
        ));
        report.push_str(&format!(
            "  Avg Milestones:      {:.1}\n\n",
            self.avg_milestones
        ));

        report.push_str("── BATTLES ──────────────────────────────────────────────────────\n");
        report.push_str(&format!(
            "  Win Rate:            {:.1}%\n",
            self.win_rate * 100.0
        ));
        report.push_str(&format!(
            "  Avg Opponent Level:  {:.1}\n",
            self.avg_opponent_level
        ));
        for (level, count) in &self.opponent_level_distribution {
            let pct = *count as f64 / self.num_runs.max(1) as f64 * 100.0;
            report.push_str(&format!("  Lv {:2}: {:>5.1}%\n", level, pct));
        }

        report
    }

    /// One-line summary for `--quiet`.
    pub fn summary_line(&self) -> String {
        format!(
            "runs={} bundle={} artifact={:.2}% legendary={:.2}% win_rate={:.1}% avg_opponent={:.1}",
            self.num_runs,
            self.bundle,
            self.tier_percent[Tier::Artifact.index()],
            self.tier_percent[Tier::Legendary.index()],
            self.win_rate * 100.0,
            self.avg_opponent_level
        )
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|_| "{}".to_string())
    }
}
