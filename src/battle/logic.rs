use super::types::*;
use crate::character::PlayerState;
use crate::core::constants::*;
use crate::core::cooldown::cooldown_remaining;
use crate::core::error::{DataIntegrityError, EngineResult, PolicyViolation};
use crate::core::mutation::StateMutation;
use crate::items::{Catalog, ItemId, Tier};
use chrono::{DateTime, Utc};
use rand::Rng;
use std::collections::BTreeSet;

/// Unscaled opponent strength before the band multiplier.
fn base_power(level: u32) -> u64 {
    let n = level as u64;
    if level <= OPPONENT_CURVE_THRESHOLD {
        let x = level as f64;
        n * OPPONENT_LOW_LINEAR + (x * x.sqrt() * OPPONENT_LOW_POW_FACTOR) as u64
    } else {
        n * OPPONENT_HIGH_LINEAR + n * n * OPPONENT_HIGH_SQUARE_FACTOR
    }
}

/// Deterministic opponent for `level` in 1..=50.
pub fn opponent_for_level(level: u32) -> Result<OpponentStats, DataIntegrityError> {
    if !(1..=MAX_OPPONENT_LEVEL).contains(&level) {
        return Err(DataIntegrityError::InvalidOpponentLevel { level });
    }
    let band = Band::for_level(level);
    let power = base_power(level) * band.multiplier_percent() / 100;
    let name = OPPONENT_NAMES[(level - 1) as usize];
    Ok(OpponentStats {
        level,
        name: format!("{name} (Lv. {level})"),
        band,
        power,
        health: power * OPPONENT_HEALTH_PER_POWER,
        reward_experience: level as u64 * OPPONENT_XP_PER_LEVEL + OPPONENT_XP_FLAT,
        reward_coins: level as u64 + OPPONENT_COINS_FLAT,
    })
}

/// Sums the per-tier power of each loadout slot.
pub fn loadout_power(tiers: impl IntoIterator<Item = Tier>, power_by_tier: &[u64; 5]) -> u64 {
    tiers.into_iter().map(|t| power_by_tier[t.index()]).sum()
}

/// Loadout power of `player`, resolving each slot through the catalog.
pub fn player_loadout_power<C: Catalog>(
    player: &PlayerState,
    catalog: &C,
    power_by_tier: &[u64; 5],
) -> Result<u64, DataIntegrityError> {
    let tiers = player
        .loadout
        .iter()
        .map(|&id| {
            catalog
                .item(id)
                .map(|def| def.tier)
                .ok_or(DataIntegrityError::UnknownItem { id })
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(loadout_power(tiers, power_by_tier))
}

/// Uniform integer in [80%, 120%] of `power`, inclusive.
pub fn roll_power(power: u64, rng: &mut impl Rng) -> u64 {
    let low = power * BATTLE_ROLL_LOW_PERCENT / 100;
    let high = power * BATTLE_ROLL_HIGH_PERCENT / 100;
    rng.gen_range(low..=high)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Contest {
    pub result: BattleResult,
    pub loadout_roll: u64,
    pub opponent_roll: u64,
}

/// Ties go to the loadout.
pub fn resolve(loadout_power: u64, opponent_power: u64, rng: &mut impl Rng) -> Contest {
    let loadout_roll = roll_power(loadout_power, rng);
    let opponent_roll = roll_power(opponent_power, rng);
    let result = if loadout_roll >= opponent_roll {
        BattleResult::Victory
    } else {
        BattleResult::Defeat
    };
    Contest {
        result,
        loadout_roll,
        opponent_roll,
    }
}

/// Number of loadout slots holding distinct items the player still owns.
pub fn slots_filled(player: &PlayerState) -> usize {
    player
        .loadout
        .iter()
        .filter(|&&id| player.owns(id))
        .collect::<BTreeSet<_>>()
        .len()
}

pub fn readiness(player: &PlayerState, cooldown_secs: u64, now: DateTime<Utc>) -> Readiness {
    let filled = slots_filled(player);
    if filled < LOADOUT_SIZE {
        return Readiness::Ready {
            slots_filled: filled,
        };
    }
    match cooldown_remaining(player.battle.last_battle_at, cooldown_secs, now) {
        Some(remaining_secs) => Readiness::Eligible { remaining_secs },
        None => Readiness::CanFight,
    }
}

pub fn check_availability(
    player: &PlayerState,
    cooldown_secs: u64,
    now: DateTime<Utc>,
) -> Result<(), PolicyViolation> {
    match readiness(player, cooldown_secs, now) {
        Readiness::Ready { slots_filled } => Err(PolicyViolation::DeckIncomplete { slots_filled }),
        Readiness::Eligible { remaining_secs } => {
            Err(PolicyViolation::CooldownActive { remaining_secs })
        }
        Readiness::CanFight => Ok(()),
    }
}

/// Fights the opponent at `level`. Not idempotent: stamps the cooldown.
pub fn fight<C: Catalog>(
    player: &PlayerState,
    level: u32,
    catalog: &C,
    power_by_tier: &[u64; 5],
    cooldown_secs: u64,
    now: DateTime<Utc>,
    rng: &mut impl Rng,
) -> EngineResult<BattleReport> {
    check_availability(player, cooldown_secs, now)?;
    let opponent = opponent_for_level(level)?;
    if level > player.battle.current_level {
        return Err(PolicyViolation::OpponentLocked {
            level,
            unlocked: player.battle.current_level,
        }
        .into());
    }

    let power = player_loadout_power(player, catalog, power_by_tier)?;
    let contest = resolve(power, opponent.power, rng);
    let won = contest.result.is_victory();

    let mut mutations = vec![StateMutation::RecordBattle {
        at: now,
        opponent_level: level,
        won,
    }];
    let (experience_gained, coins_gained) = if won {
        mutations.push(StateMutation::GrantExperience {
            amount: opponent.reward_experience,
        });
        mutations.push(StateMutation::CreditCoins {
            amount: opponent.reward_coins,
        });
        (opponent.reward_experience, opponent.reward_coins)
    } else {
        (0, 0)
    };
    let unlocked_level = (won
        && level == player.battle.current_level
        && level < MAX_OPPONENT_LEVEL)
        .then_some(level + 1);

    tracing::info!(
        player = player.player_id,
        opponent = level,
        loadout_roll = contest.loadout_roll,
        opponent_roll = contest.opponent_roll,
        won,
        "battle resolved"
    );

    Ok(BattleReport {
        opponent,
        result: contest.result,
        loadout_power: power,
        loadout_roll: contest.loadout_roll,
        opponent_roll: contest.opponent_roll,
        experience_gained,
        coins_gained,
        unlocked_level,
        mutations,
    })
}

/// Validates a new loadout: at most five distinct ids, each owned.
pub fn set_loadout(
    player: &PlayerState,
    items: &[ItemId],
) -> Result<Vec<StateMutation>, PolicyViolation> {
    if items.len() > LOADOUT_SIZE {
        return Err(PolicyViolation::InvalidLoadout {
            reason: format!("{} items given, at most {LOADOUT_SIZE} allowed", items.len()),
        });
    }
    let mut seen = BTreeSet::new();
    for &id in items {
        if !seen.insert(id) {
            return Err(PolicyViolation::InvalidLoadout {
                reason: format!("item {id} appears more than once"),
            });
        }
        if !player.owns(id) {
            return Err(PolicyViolation::InvalidLoadout {
                reason: format!("item {id} is not owned"),
            });
        }
    }
    Ok(vec![StateMutation::SetLoadout {
        items: items.to_vec(),
    }])
}

/// Opponents around the player's frontier.
pub fn available_opponents(player: &PlayerState) -> Vec<OpponentStats> {
    let frontier = player.battle.current_level;
    let start = frontier.saturating_sub(OPPONENT_WINDOW).max(1);
    let end = (frontier + OPPONENT_WINDOW).min(MAX_OPPONENT_LEVEL);
    (start..=end)
        .filter_map(|level| opponent_for_level(level).ok())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::items::InMemoryCatalog;
    use chrono::{Duration, TimeZone};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 9, 1, 18, 0, 0).unwrap()
    }

    fn armed_player(ids: &[u32]) -> PlayerState {
        let mut player = PlayerState::new(1);
        for &id in ids {
            player.add_item(ItemId(id), 1);
        }
        player.loadout = ids.iter().map(|&id| ItemId(id)).collect();
        player
    }

    #[test]
    fn test_opponent_curve_values() {
        let first = opponent_for_level(1).unwrap();
        assert_eq!(first.power, 63);
        assert_eq!(first.health, 126);
        assert_eq!(first.reward_experience, 12);
        assert_eq!(first.reward_coins, 4);

        // 31 switches to the steeper polynomial in the hard band.
        let o31 = opponent_for_level(31).unwrap();
        assert_eq!(o31.power, (31 * 120 + 31 * 31 * 15) * 160 / 100);
    }

    #[test]
    fn test_opponent_power_increases_with_level() {
        let powers: Vec<u64> = (1..=50)
            .map(|n| opponent_for_level(n).unwrap().power)
            .collect();
        assert!(powers.windows(2).all(|w| w[1] > w[0]));
    }

    #[test]
    fn test_opponent_level_bounds() {
        assert!(opponent_for_level(0).is_err());
        assert!(opponent_for_level(51).is_err());
    }

    #[test]
    fn test_zero_power_never_wins() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let opponent = opponent_for_level(1).unwrap();
        for _ in 0..1_000 {
            let contest = resolve(0, opponent.power, &mut rng);
            assert_eq!(contest.result, BattleResult::Defeat);
            assert_eq!(contest.loadout_roll, 0);
        }
    }

    #[test]
    fn test_rolls_stay_in_band() {
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        for _ in 0..1_000 {
            let roll = roll_power(1000, &mut rng);
            assert!((800..=1200).contains(&roll));
        }
    }

    #[test]
    fn test_loadout_power_uses_tier_table() {
        let power = loadout_power(
            [Tier::Common, Tier::Rare, Tier::Artifact],
            &LOADOUT_POWER_BY_TIER,
        );
        assert_eq!(power, 200 + 600 + 9000);
    }

    #[test]
    fn test_readiness_state_machine() {
        let mut player = armed_player(&[1, 2, 3, 4]);
        assert_eq!(
            readiness(&player, 3600, now()),
            Readiness::Ready { slots_filled: 4 }
        );

        player.add_item(ItemId(5), 1);
        player.loadout.push(ItemId(5));
        assert_eq!(readiness(&player, 3600, now()), Readiness::CanFight);

        player.battle.last_battle_at = Some(now() - Duration::minutes(10));
        assert_eq!(
            readiness(&player, 3600, now()),
            Readiness::Eligible {
                remaining_secs: 3000
            }
        );
    }

    #[test]
    fn test_duplicate_loadout_slot_counts_once() {
        let mut player = armed_player(&[1, 2, 3, 4]);
        player.loadout.push(ItemId(1));
        assert_eq!(slots_filled(&player), 4);
        assert_eq!(
            check_availability(&player, 3600, now()),
            Err(PolicyViolation::DeckIncomplete { slots_filled: 4 })
        );
    }

    #[test]
    fn test_locked_opponent_is_refused() {
        let player = armed_player(&[1, 2, 3, 4, 5]);
        let catalog = InMemoryCatalog::sample();
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let err = fight(
            &player,
            3,
            &catalog,
            &LOADOUT_POWER_BY_TIER,
            3600,
            now(),
            &mut rng,
        )
        .unwrap_err();
        assert_eq!(
            err.policy(),
            Some(&PolicyViolation::OpponentLocked {
                level: 3,
                unlocked: 1
            })
        );
    }

    #[test]
    fn test_strong_loadout_beats_first_opponent() {
        let mut player = armed_player(&[11, 12, 13, 14, 15]);
        let catalog = InMemoryCatalog::sample();
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let report = fight(
            &player,
            1,
            &catalog,
            &LOADOUT_POWER_BY_TIER,
            3600,
            now(),
            &mut rng,
        )
        .unwrap();
        assert_eq!(report.result, BattleResult::Victory);
        assert_eq!(report.unlocked_level, Some(2));

        player.apply_all(&report.mutations).unwrap();
        assert_eq!(player.battle.current_level, 2);
        assert_eq!(player.coins, 604);
        assert_eq!(player.experience, 12);
    }

    #[test]
    fn test_set_loadout_validation() {
        let player = armed_player(&[1, 2]);
        assert!(set_loadout(&player, &[ItemId(1), ItemId(2)]).is_ok());
        assert!(set_loadout(&player, &[ItemId(1), ItemId(1)]).is_err());
        assert!(set_loadout(&player, &[ItemId(9)]).is_err());
        let six: Vec<ItemId> = (1..=6).map(ItemId).collect();
        assert!(set_loadout(&player, &six).is_err());
    }

    #[test]
    fn test_available_opponents_window() {
        let mut player = PlayerState::new(1);
        let levels = |p: &PlayerState| -> Vec<u32> {
            available_opponents(p).iter().map(|o| o.level).collect()
        };
        assert_eq!(levels(&player), vec![1, 2, 3]);

        player.battle.current_level = 10;
        assert_eq!(levels(&player), vec![8, 9, 10, 11, 12]);

        player.battle.current_level = 50;
        assert_eq!(levels(&player), vec![48, 49, 50]);
    }
}
