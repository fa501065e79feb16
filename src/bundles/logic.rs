use super::types::{BundleDefinition, BundleId, DrawnItem};
use crate::character::PlayerState;
use crate::core::cooldown::cooldown_remaining;
use crate::core::error::{EngineResult, PolicyViolation};
use crate::core::mutation::{CatalogMutation, MutationLog, StateMutation};
use crate::items::{draw_from_table, draw_item_with_fallback, Catalog, ItemDefinition, ItemId, TierTable};
use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Result of opening a bundle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BundleOutcome {
    pub bundle: BundleId,
    /// Guarantees first, then random draws, in draw order.
    pub items: Vec<DrawnItem>,
    pub coins_spent: u64,
    pub experience_gained: u64,
    pub mutations: Vec<StateMutation>,
    pub catalog_mutations: Vec<CatalogMutation>,
}

/// Tracks quantities received earlier in the same operation so holder
/// statistics see the player's running inventory.
pub(crate) struct Receipts<'p> {
    player: &'p PlayerState,
    pending: BTreeMap<ItemId, u32>,
    pub log: MutationLog,
}

impl<'p> Receipts<'p> {
    pub fn new(player: &'p PlayerState) -> Self {
        Self {
            player,
            pending: BTreeMap::new(),
            log: MutationLog::new(),
        }
    }

    pub fn receive(&mut self, item: &ItemDefinition, at: DateTime<Utc>) {
        let pending = self.pending.entry(item.id).or_insert(0);
        let owned_before = self.player.quantity(item.id) + *pending;
        *pending += 1;
        self.log.receive_item(item.id, item.tier, owned_before, at);
    }
}

pub fn check_bundle_cooldown(
    player: &PlayerState,
    def: &BundleDefinition,
    now: DateTime<Utc>,
) -> Result<(), PolicyViolation> {
    let last = player.bundle_cooldowns.get(&def.id).copied();
    match cooldown_remaining(last, def.cooldown_secs, now) {
        Some(remaining_secs) => Err(PolicyViolation::CooldownActive { remaining_secs }),
        None => Ok(()),
    }
}

/// Opens `def` for `player`.
///
/// Not idempotent: every successful call debits coins and draws new items.
/// Callers must not retry a call whose mutations were already applied.
pub fn open_bundle<C: Catalog>(
    player: &PlayerState,
    def: &BundleDefinition,
    base_table: &TierTable,
    catalog: &C,
    now: DateTime<Utc>,
    rng: &mut impl Rng,
) -> EngineResult<BundleOutcome> {
    check_bundle_cooldown(player, def, now)?;
    if player.coins < def.cost {
        return Err(PolicyViolation::InsufficientFunds {
            needed: def.cost,
            available: player.coins,
        }
        .into());
    }

    let mut receipts = Receipts::new(player);
    receipts
        .log
        .push(StateMutation::DebitCoins { amount: def.cost });
    receipts.log.push(StateMutation::StampBundleCooldown {
        bundle: def.id.clone(),
        at: now,
    });

    let mut items = Vec::with_capacity(def.count as usize);
    for tier in def.guarantees() {
        let item = draw_item_with_fallback(catalog, tier, rng)?;
        receipts.receive(item, now);
        items.push(DrawnItem::from_definition(item, true));
    }

    let table = def.odds.table(base_table);
    let remaining = (def.count as usize).saturating_sub(items.len());
    for _ in 0..remaining {
        let item = draw_from_table(catalog, table, rng)?;
        receipts.receive(item, now);
        items.push(DrawnItem::from_definition(item, false));
    }

    let experience_gained = def.bonus_experience();
    if experience_gained > 0 {
        receipts.log.push(StateMutation::GrantExperience {
            amount: experience_gained,
        });
    }
    receipts
        .log
        .push(StateMutation::RecordBundlePurchase { cost: def.cost });

    tracing::info!(
        player = player.player_id,
        bundle = %def.id,
        items = items.len(),
        cost = def.cost,
        "bundle opened"
    );

    let (mutations, catalog_mutations) = receipts.log.into_parts();
    Ok(BundleOutcome {
        bundle: def.id.clone(),
        items,
        coins_spent: def.cost,
        experience_gained,
        mutations,
        catalog_mutations,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bundles::types::default_bundles;
    use crate::core::error::EngineError;
    use crate::items::{InMemoryCatalog, Tier};
    use chrono::{Duration, TimeZone};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 7, 4, 15, 0, 0).unwrap()
    }

    fn bundle(id: &str) -> BundleDefinition {
        default_bundles()
            .into_iter()
            .find(|b| b.id.as_str() == id)
            .unwrap()
    }

    #[test]
    fn test_insufficient_funds() {
        let player = PlayerState::new(1).with_coins(10);
        let catalog = InMemoryCatalog::sample();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let err = open_bundle(
            &player,
            &bundle("premium"),
            &TierTable::base(),
            &catalog,
            now(),
            &mut rng,
        )
        .unwrap_err();
        assert_eq!(
            err,
            EngineError::Policy(PolicyViolation::InsufficientFunds {
                needed: 100,
                available: 10
            })
        );
    }

    #[test]
    fn test_cooldown_checked_before_funds() {
        let mut player = PlayerState::new(1).with_coins(0);
        let def = bundle("elite");
        player.bundle_cooldowns.insert(def.id.clone(), now());
        let catalog = InMemoryCatalog::sample();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let later = now() + Duration::seconds(20);
        let err = open_bundle(&player, &def, &TierTable::base(), &catalog, later, &mut rng)
            .unwrap_err();
        assert_eq!(
            err.policy(),
            Some(&PolicyViolation::CooldownActive {
                remaining_secs: 100
            })
        );
    }

    #[test]
    fn test_guarantees_come_first() {
        let player = PlayerState::new(1).with_coins(5000);
        let def = bundle("artifact");
        let catalog = InMemoryCatalog::sample();
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        let outcome =
            open_bundle(&player, &def, &TierTable::base(), &catalog, now(), &mut rng).unwrap();

        assert_eq!(outcome.items.len(), 20);
        assert_eq!(outcome.items[0].tier, Tier::Artifact);
        assert_eq!(outcome.items[1].tier, Tier::Legendary);
        assert!(outcome.items[0].guaranteed && outcome.items[1].guaranteed);
        assert!(outcome.items[2..].iter().all(|i| !i.guaranteed));
        assert_eq!(outcome.experience_gained, 250);
    }

    #[test]
    fn test_count_satisfied_by_guarantees_draws_nothing_else() {
        let player = PlayerState::new(1);
        let def = BundleDefinition::new("pair", "Pair", 0, 2, 0)
            .guaranteed(Tier::Epic)
            .extra_guaranteed(Tier::Rare);
        let catalog = InMemoryCatalog::sample();
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let outcome =
            open_bundle(&player, &def, &TierTable::base(), &catalog, now(), &mut rng).unwrap();
        let tiers: Vec<Tier> = outcome.items.iter().map(|i| i.tier).collect();
        assert_eq!(tiers, vec![Tier::Epic, Tier::Rare]);
        assert_eq!(outcome.experience_gained, 0);
    }

    #[test]
    fn test_holder_count_only_once_per_new_item() {
        let player = PlayerState::new(1);
        let def = BundleDefinition::new("triple", "Triple", 0, 3, 0)
            .with_odds(TierTable::new([1.0, 0.0, 0.0, 0.0, 0.0]).unwrap());
        let catalog = InMemoryCatalog::new(vec![ItemDefinition::new(1, "Only", Tier::Common)]);
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let outcome =
            open_bundle(&player, &def, &TierTable::base(), &catalog, now(), &mut rng).unwrap();
        let holders = outcome
            .catalog_mutations
            .iter()
            .filter(|m| matches!(m, CatalogMutation::IncrementHolders { .. }))
            .count();
        assert_eq!(holders, 1);
    }

    #[test]
    fn test_mutations_replay_onto_player() {
        let mut player = PlayerState::new(1);
        let def = bundle("premium");
        let catalog = InMemoryCatalog::sample();
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        let outcome =
            open_bundle(&player, &def, &TierTable::base(), &catalog, now(), &mut rng).unwrap();
        player.apply_all(&outcome.mutations).unwrap();

        assert_eq!(player.coins, 500);
        assert_eq!(player.total_items(), 2);
        assert_eq!(player.experience, 10);
        assert_eq!(player.activity.bundle_purchases, 1);
        assert_eq!(player.activity.coins_spent, 100);
        assert_eq!(player.bundle_cooldowns.get(&def.id), Some(&now()));
    }
}
