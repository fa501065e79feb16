//! Selling items for coins and buying random items with experience.

use super::logic::Receipts;
use super::types::DrawnItem;
use crate::character::PlayerState;
use crate::config::EngineConfig;
use crate::core::error::{DataIntegrityError, EngineResult, PolicyViolation};
use crate::core::mutation::{CatalogMutation, MutationLog, StateMutation};
use crate::items::{draw_item, Catalog, ItemId, Tier};
use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaleOutcome {
    pub item: ItemId,
    pub tier: Tier,
    pub proceeds: u64,
    pub mutations: Vec<StateMutation>,
    pub catalog_mutations: Vec<CatalogMutation>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PurchaseOutcome {
    pub item: DrawnItem,
    pub experience_spent: u64,
    pub mutations: Vec<StateMutation>,
    pub catalog_mutations: Vec<CatalogMutation>,
}

/// Sells one unit of `item` at its tier price. Not idempotent.
pub fn sell_item<C: Catalog>(
    player: &PlayerState,
    item: ItemId,
    catalog: &C,
    config: &EngineConfig,
) -> EngineResult<SaleOutcome> {
    let owned = player.quantity(item);
    if owned == 0 {
        return Err(PolicyViolation::InsufficientQuantity {
            needed: 1,
            available: 0,
        }
        .into());
    }
    let def = catalog
        .item(item)
        .ok_or(DataIntegrityError::UnknownItem { id: item })?;
    let proceeds = config.economy.sell_price(def.tier);

    let mut log = MutationLog::new();
    log.remove_item(item, 1, owned);
    log.push(StateMutation::CreditCoins { amount: proceeds });
    log.push(StateMutation::RecordSale { proceeds });

    tracing::info!(player = player.player_id, item = %item, proceeds, "item sold");

    let (mutations, catalog_mutations) = log.into_parts();
    Ok(SaleOutcome {
        item,
        tier: def.tier,
        proceeds,
        mutations,
        catalog_mutations,
    })
}

/// Spends experience on one random item of exactly `tier`. Not idempotent.
///
/// An empty tier is surfaced as [`DataIntegrityError::EmptyTier`]; the
/// player asked for that tier specifically.
pub fn buy_tier<C: Catalog>(
    player: &PlayerState,
    tier: Tier,
    catalog: &C,
    config: &EngineConfig,
    now: DateTime<Utc>,
    rng: &mut impl Rng,
) -> EngineResult<PurchaseOutcome> {
    let cost = config.economy.buy_experience_cost(tier);
    if player.experience < cost {
        return Err(PolicyViolation::InsufficientExperience {
            needed: cost,
            available: player.experience,
        }
        .into());
    }
    let def = draw_item(catalog, tier, rng)?;

    let mut receipts = Receipts::new(player);
    receipts
        .log
        .push(StateMutation::SpendExperience { amount: cost });
    receipts.receive(def, now);

    tracing::info!(player = player.player_id, tier = %tier, item = %def.id, "tier purchased");

    let (mutations, catalog_mutations) = receipts.log.into_parts();
    Ok(PurchaseOutcome {
        item: DrawnItem::from_definition(def, false),
        experience_spent: cost,
        mutations,
        catalog_mutations,
    })
}
