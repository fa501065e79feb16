//! Free periodic draw with per-tier rewards.

use super::logic::Receipts;
use super::types::DrawnItem;
use crate::character::PlayerState;
use crate::config::EngineConfig;
use crate::core::cooldown::cooldown_remaining;
use crate::core::error::{EngineResult, PolicyViolation};
use crate::core::mutation::{CatalogMutation, StateMutation};
use crate::items::{draw_from_table, Catalog};
use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyOutcome {
    pub items: Vec<DrawnItem>,
    pub experience_gained: u64,
    pub coins_gained: u64,
    /// The first draw for a brand-new player carries an extra item.
    pub newbie_bonus: bool,
    pub mutations: Vec<StateMutation>,
    pub catalog_mutations: Vec<CatalogMutation>,
}

pub fn daily_cooldown_remaining(
    player: &PlayerState,
    config: &EngineConfig,
    now: DateTime<Utc>,
) -> Option<u64> {
    cooldown_remaining(player.last_daily_draw, config.daily_cooldown_secs, now)
}

/// Draws one item from the base table and pays out its tier rewards.
///
/// Not idempotent. Also advances the daily play streak.
pub fn draw_daily<C: Catalog>(
    player: &PlayerState,
    catalog: &C,
    config: &EngineConfig,
    now: DateTime<Utc>,
    rng: &mut impl Rng,
) -> EngineResult<DailyOutcome> {
    if let Some(remaining_secs) = daily_cooldown_remaining(player, config, now) {
        return Err(PolicyViolation::CooldownActive { remaining_secs }.into());
    }

    let newbie_bonus = config.newbie_bonus
        && player.last_daily_draw.is_none()
        && !player.activity.first_item_received;
    let draws = if newbie_bonus { 2 } else { 1 };

    let mut receipts = Receipts::new(player);
    receipts.log.push(StateMutation::StampDailyDraw { at: now });

    let mut items = Vec::with_capacity(draws);
    let mut experience_gained = 0;
    let mut coins_gained = 0;
    for _ in 0..draws {
        let item = draw_from_table(catalog, &config.base_table, rng)?;
        receipts.receive(item, now);
        experience_gained += config.economy.daily_experience(item.tier);
        coins_gained += config.economy.daily_coins(item.tier);
        items.push(DrawnItem::from_definition(item, false));
    }

    receipts.log.push(StateMutation::GrantExperience {
        amount: experience_gained,
    });
    receipts
        .log
        .push(StateMutation::CreditCoins { amount: coins_gained });

    tracing::info!(
        player = player.player_id,
        items = items.len(),
        experience = experience_gained,
        coins = coins_gained,
        newbie_bonus,
        "daily draw"
    );

    let (mutations, catalog_mutations) = receipts.log.into_parts();
    Ok(DailyOutcome {
        items,
        experience_gained,
        coins_gained,
        newbie_bonus,
        mutations,
        catalog_mutations,
    })
}
