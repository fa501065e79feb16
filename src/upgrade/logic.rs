use super::types::*;
use crate::bundles::logic::Receipts;
use crate::bundles::DrawnItem;
use crate::character::PlayerState;
use crate::core::error::{DataIntegrityError, EngineResult, PolicyViolation};
use crate::core::mutation::StateMutation;
use crate::items::{draw_item, Catalog, ItemId};
use chrono::{DateTime, Utc};
use rand::Rng;

/// Combines `upgrade_cost` copies of `item` into one random item of the next tier.
///
/// Not idempotent. A next tier with no active items is reported as
/// [`DataIntegrityError::EmptyTier`] and nothing is consumed.
pub fn upgrade<C: Catalog>(
    player: &PlayerState,
    item: ItemId,
    catalog: &C,
    upgrade_cost: u32,
    now: DateTime<Utc>,
    rng: &mut impl Rng,
) -> EngineResult<UpgradeOutcome> {
    let source = catalog
        .item(item)
        .ok_or(DataIntegrityError::UnknownItem { id: item })?;
    let target = source
        .tier
        .next()
        .ok_or(PolicyViolation::TierIsTerminal { tier: source.tier })?;

    // At least one copy is always consumed.
    let needed = upgrade_cost.max(1);
    let owned = player.quantity(item);
    if owned < needed {
        return Err(PolicyViolation::InsufficientQuantity {
            needed,
            available: owned,
        }
        .into());
    }

    let created = draw_item(catalog, target, rng)?;
    let experience_gained = upgrade_bonus_experience(target);

    let mut receipts = Receipts::new(player);
    receipts.log.remove_item(item, needed, owned);
    receipts.receive(created, now);
    receipts.log.push(StateMutation::GrantExperience {
        amount: experience_gained,
    });

    tracing::info!(
        player = player.player_id,
        consumed = %item,
        from = %source.tier,
        created = %created.id,
        "upgrade completed"
    );

    let (mutations, catalog_mutations) = receipts.log.into_parts();
    Ok(UpgradeOutcome {
        consumed: item,
        consumed_quantity: needed,
        from_tier: source.tier,
        created: DrawnItem::from_definition(created, false),
        experience_gained,
        mutations,
        catalog_mutations,
    })
}

/// [`upgrade`] addressed by catalog name.
pub fn upgrade_by_name<C: Catalog>(
    player: &PlayerState,
    name: &str,
    catalog: &C,
    upgrade_cost: u32,
    now: DateTime<Utc>,
    rng: &mut impl Rng,
) -> EngineResult<UpgradeOutcome> {
    let def = catalog
        .item_by_name(name)
        .ok_or_else(|| DataIntegrityError::UnknownItemName {
            name: name.to_string(),
        })?;
    upgrade(player, def.id, catalog, upgrade_cost, now, rng)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::EngineError;
    use crate::items::{InMemoryCatalog, ItemDefinition, Tier};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_artifact_is_terminal_even_with_stock() {
        let mut player = PlayerState::new(1);
        player.add_item(ItemId(14), 10);
        let catalog = InMemoryCatalog::sample();
        let mut rng = StdRng::seed_from_u64(1);
        let err = upgrade(&player, ItemId(14), &catalog, 3, Utc::now(), &mut rng).unwrap_err();
        assert_eq!(
            err.policy(),
            Some(&PolicyViolation::TierIsTerminal {
                tier: Tier::Artifact
            })
        );
    }

    #[test]
    fn test_not_enough_copies() {
        let mut player = PlayerState::new(1);
        player.add_item(ItemId(1), 2);
        let catalog = InMemoryCatalog::sample();
        let mut rng = StdRng::seed_from_u64(1);
        let err = upgrade(&player, ItemId(1), &catalog, 3, Utc::now(), &mut rng).unwrap_err();
        assert_eq!(
            err.policy(),
            Some(&PolicyViolation::InsufficientQuantity {
                needed: 3,
                available: 2
            })
        );
    }

    #[test]
    fn test_zero_cost_still_requires_a_copy() {
        let player = PlayerState::new(1);
        let catalog = InMemoryCatalog::sample();
        let mut rng = StdRng::seed_from_u64(1);
        let err = upgrade(&player, ItemId(1), &catalog, 0, Utc::now(), &mut rng).unwrap_err();
        assert_eq!(
            err.policy(),
            Some(&PolicyViolation::InsufficientQuantity {
                needed: 1,
                available: 0
            })
        );
    }

    #[test]
    fn test_zero_cost_consumes_one_copy() {
        let mut player = PlayerState::new(1);
        player.add_item(ItemId(1), 2);
        let catalog = InMemoryCatalog::sample();
        let mut rng = StdRng::seed_from_u64(1);
        let outcome = upgrade(&player, ItemId(1), &catalog, 0, Utc::now(), &mut rng).unwrap();
        assert_eq!(outcome.consumed_quantity, 1);

        player.apply_all(&outcome.mutations).unwrap();
        assert_eq!(player.quantity(ItemId(1)), 1);
        assert_eq!(player.total_items(), 2);
    }

    #[test]
    fn test_surplus_copies_remain() {
        let mut player = PlayerState::new(1);
        player.add_item(ItemId(5), 5);
        let catalog = InMemoryCatalog::sample();
        let mut rng = StdRng::seed_from_u64(1);
        let outcome = upgrade(&player, ItemId(5), &catalog, 3, Utc::now(), &mut rng).unwrap();
        assert_eq!(outcome.created.tier, Tier::Epic);
        assert_eq!(outcome.experience_gained, 100);

        player.apply_all(&outcome.mutations).unwrap();
        assert_eq!(player.quantity(ItemId(5)), 2);
        assert_eq!(player.quantity(outcome.created.item), 1);
    }

    #[test]
    fn test_empty_target_tier_does_not_fall_back() {
        let mut player = PlayerState::new(1);
        player.add_item(ItemId(1), 3);
        let catalog = InMemoryCatalog::new(vec![ItemDefinition::new(1, "Toad", Tier::Common)]);
        let mut rng = StdRng::seed_from_u64(1);
        let err = upgrade(&player, ItemId(1), &catalog, 3, Utc::now(), &mut rng).unwrap_err();
        assert_eq!(
            err,
            EngineError::DataIntegrity(DataIntegrityError::EmptyTier { tier: Tier::Rare })
        );
    }

    #[test]
    fn test_upgrade_by_name() {
        let mut player = PlayerState::new(1);
        player.add_item(ItemId(2), 3);
        let catalog = InMemoryCatalog::sample();
        let mut rng = StdRng::seed_from_u64(1);
        let outcome =
            upgrade_by_name(&player, "alley cat", &catalog, 3, Utc::now(), &mut rng).unwrap();
        assert_eq!(outcome.consumed, ItemId(2));

        let err =
            upgrade_by_name(&player, "Ghost", &catalog, 3, Utc::now(), &mut rng).unwrap_err();
        assert!(!err.is_policy());
    }
}
