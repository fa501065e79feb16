//! Simulation runner driving the real engine operations.
//!
//! Each run plays one fresh player through bundle openings, upgrades and a
//! battle ladder, applying every returned mutation exactly as a persistence
//! layer would. Statistics are collected from the outcomes.

use super::config::SimConfig;
use super::report::{RunStats, SimReport};
use crate::achievements::grant_mutations;
use crate::character::PlayerState;
use crate::core::error::{EngineError, EngineResult};
use crate::engine::Engine;
use crate::items::{Catalog, ItemId, Tier};
use chrono::{DateTime, Duration, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// 2024-01-01T00:00:00Z, so runs do not depend on the wall clock.
const SIM_START_DAYS: i64 = 19_723;

/// Run the full simulation and return a report.
pub fn run_simulation<C: Catalog>(config: &SimConfig, engine: &Engine<C>) -> SimReport {
    let mut all_runs = Vec::with_capacity(config.num_runs as usize);

    for run_idx in 0..config.num_runs {
        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(run_idx as u64)),
            None => StdRng::from_entropy(),
        };

        match simulate_single_run(config, engine, run_idx as u64 + 1, &mut rng) {
            Ok(run) => {
                if config.verbosity >= 2 {
                    println!(
                        "Run {}/{} - Level {}, Drawn {}, Upgrades {}, Won {}/{}, Opponent Lv {}",
                        run_idx + 1,
                        config.num_runs,
                        run.final_level,
                        run.total_drawn(),
                        run.upgrades,
                        run.battles_won,
                        run.battles_fought,
                        run.final_opponent_level
                    );
                }
                all_runs.push(run);
            }
            Err(err) => tracing::warn!(run = run_idx + 1, error = %err, "run aborted"),
        }
    }

    SimReport::from_runs(all_runs, config.bundle.as_str())
}

/// Plays one player from a fresh state.
///
/// Policy rejections are counted and skipped; data errors abort the run.
pub fn simulate_single_run<C: Catalog>(
    config: &SimConfig,
    engine: &Engine<C>,
    player_id: u64,
    rng: &mut impl Rng,
) -> EngineResult<RunStats> {
    let bundle = engine.config().bundle(&config.bundle)?;
    let mut now = DateTime::<Utc>::UNIX_EPOCH + Duration::days(SIM_START_DAYS);
    let mut player = PlayerState::new(player_id)
        .with_coins(bundle.cost.saturating_mul(config.bundles_per_run as u64));
    let mut stats = RunStats::default();

    for _ in 0..config.bundles_per_run {
        match engine.open_bundle(&player, &bundle.id, now, rng) {
            Ok(outcome) => {
                player.apply_all(&outcome.mutations)?;
                stats.bundles_opened += 1;
                stats.coins_spent += outcome.coins_spent;
                for item in &outcome.items {
                    stats.drawn_by_tier[item.tier.index()] += 1;
                }
            }
            Err(err) => record_rejection(err, &mut stats)?,
        }
        now += Duration::seconds(bundle.cooldown_secs as i64);
    }

    upgrade_all(engine, &mut player, &mut stats, now, rng)?;

    if config.sell_duplicates {
        sell_common_duplicates(engine, &mut player, &mut stats)?;
    }

    let loadout = strongest_items(engine.catalog(), &player);
    let mutations = engine.set_loadout(&player, &loadout)?;
    player.apply_all(&mutations)?;

    for _ in 0..config.battles_per_run {
        let level = player.battle.current_level;
        match engine.fight(&player, level, now, rng) {
            Ok(report) => {
                player.apply_all(&report.mutations)?;
                stats.coins_earned += report.coins_gained;
            }
            Err(err) => record_rejection(err, &mut stats)?,
        }
        now += Duration::seconds(engine.config().battle_cooldown_secs as i64);
    }

    let grants = engine.evaluate_milestones(&player, now);
    player.apply_all(&grant_mutations(&grants))?;
    stats.coins_earned += grants.iter().map(|g| g.reward.coins).sum::<u64>();

    stats.milestones_granted = player.granted.len();
    stats.battles_fought = player.battle.battles_fought as u32;
    stats.battles_won = player.battle.battles_won as u32;
    stats.final_level = player.level;
    stats.final_opponent_level = player.battle.current_level;
    Ok(stats)
}

fn record_rejection(err: EngineError, stats: &mut RunStats) -> EngineResult<()> {
    if err.is_policy() {
        stats.rejected += 1;
        Ok(())
    } else {
        Err(err)
    }
}

/// Upgrades every stack that can afford it, lowest tier first, until none can.
fn upgrade_all<C: Catalog>(
    engine: &Engine<C>,
    player: &mut PlayerState,
    stats: &mut RunStats,
    now: DateTime<Utc>,
    rng: &mut impl Rng,
) -> EngineResult<()> {
    let cost = engine.config().upgrade_cost;
    for tier in Tier::ALL {
        if tier.is_terminal() {
            break;
        }
        let ids: Vec<ItemId> = engine
            .catalog()
            .items_by_tier(tier)
            .iter()
            .map(|def| def.id)
            .collect();
        for id in ids {
            while player.quantity(id) >= cost {
                match engine.upgrade(player, id, now, rng) {
                    Ok(outcome) => {
                        player.apply_all(&outcome.mutations)?;
                        stats.upgrades += 1;
                    }
                    Err(EngineError::DataIntegrity(err)) => {
                        tracing::warn!(item = %id, error = %err, "upgrade skipped");
                        break;
                    }
                    Err(err) => return Err(err),
                }
            }
        }
    }
    Ok(())
}

/// Sells Common copies beyond the first of each item.
fn sell_common_duplicates<C: Catalog>(
    engine: &Engine<C>,
    player: &mut PlayerState,
    stats: &mut RunStats,
) -> EngineResult<()> {
    let commons: Vec<ItemId> = engine
        .catalog()
        .items_by_tier(Tier::Common)
        .iter()
        .map(|def| def.id)
        .collect();
    for id in commons {
        while player.quantity(id) > 1 {
            let sale = engine.sell(player, id)?;
            player.apply_all(&sale.mutations)?;
            stats.coins_earned += sale.proceeds;
        }
    }
    Ok(())
}

/// Up to five distinct owned items, highest tier first.
fn strongest_items<C: Catalog>(catalog: &C, player: &PlayerState) -> Vec<ItemId> {
    let mut owned: Vec<(Tier, ItemId)> = player
        .inventory
        .keys()
        .filter_map(|&id| catalog.item(id).map(|def| (def.tier, id)))
        .collect();
    owned.sort_by(|a, b| b.0.cmp(&a.0).then(a.1.cmp(&b.1)));
    owned
        .into_iter()
        .take(crate::core::constants::LOADOUT_SIZE)
        .map(|(_, id)| id)
        .collect()
}
