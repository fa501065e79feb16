//! Request-scoped entry points over a fixed config and catalog.
//!
//! `Engine` is built once and shared by reference. It holds no player state;
//! each call takes a snapshot and returns an outcome carrying the mutations
//! to persist. Calls for the same player must be serialized by the caller,
//! with each call's mutations applied before the next one is evaluated.

use crate::achievements::{self, Grant, MilestoneSummary};
use crate::battle::{self, BattleReport, OpponentStats, Readiness};
use crate::bundles::{self, BundleId, BundleOutcome, DailyOutcome, PurchaseOutcome, SaleOutcome};
use crate::campaigns::{self, CampaignId, ClaimOutcome, ProgressUpdate};
use crate::character::PlayerState;
use crate::config::EngineConfig;
use crate::core::error::{EngineResult, PolicyViolation};
use crate::core::mutation::StateMutation;
use crate::items::{Catalog, ItemId, Tier};
use crate::upgrade::{self, UpgradeOutcome};
use chrono::{DateTime, Utc};
use rand::Rng;

#[derive(Debug, Clone)]
pub struct Engine<C: Catalog> {
    config: EngineConfig,
    catalog: C,
}

impl<C: Catalog> Engine<C> {
    pub fn new(config: EngineConfig, catalog: C) -> Self {
        Self { config, catalog }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn catalog(&self) -> &C {
        &self.catalog
    }

    /// Opens the configured bundle `id`. Not idempotent.
    pub fn open_bundle(
        &self,
        player: &PlayerState,
        id: &BundleId,
        now: DateTime<Utc>,
        rng: &mut impl Rng,
    ) -> EngineResult<BundleOutcome> {
        let _span = tracing::debug_span!("open_bundle", player = player.player_id, bundle = %id)
            .entered();
        let def = self.config.bundle(id)?;
        bundles::open_bundle(player, def, &self.config.base_table, &self.catalog, now, rng)
    }

    /// Free periodic draw. Not idempotent.
    pub fn draw_daily(
        &self,
        player: &PlayerState,
        now: DateTime<Utc>,
        rng: &mut impl Rng,
    ) -> EngineResult<DailyOutcome> {
        let _span = tracing::debug_span!("draw_daily", player = player.player_id).entered();
        bundles::draw_daily(player, &self.catalog, &self.config, now, rng)
    }

    pub fn daily_cooldown_remaining(&self, player: &PlayerState, now: DateTime<Utc>) -> Option<u64> {
        bundles::daily_cooldown_remaining(player, &self.config, now)
    }

    /// Sells one unit of `item`. Not idempotent.
    pub fn sell(&self, player: &PlayerState, item: ItemId) -> EngineResult<SaleOutcome> {
        let _span = tracing::debug_span!("sell", player = player.player_id, item = %item).entered();
        bundles::sell_item(player, item, &self.catalog, &self.config)
    }

    /// Buys one random item of `tier` with experience. Not idempotent.
    pub fn buy_tier(
        &self,
        player: &PlayerState,
        tier: Tier,
        now: DateTime<Utc>,
        rng: &mut impl Rng,
    ) -> EngineResult<PurchaseOutcome> {
        let _span = tracing::debug_span!("buy_tier", player = player.player_id, tier = %tier)
            .entered();
        bundles::buy_tier(player, tier, &self.catalog, &self.config, now, rng)
    }

    /// Upgrades `item` using the configured cost. Not idempotent.
    pub fn upgrade(
        &self,
        player: &PlayerState,
        item: ItemId,
        now: DateTime<Utc>,
        rng: &mut impl Rng,
    ) -> EngineResult<UpgradeOutcome> {
        let _span = tracing::debug_span!("upgrade", player = player.player_id, item = %item)
            .entered();
        upgrade::upgrade(player, item, &self.catalog, self.config.upgrade_cost, now, rng)
    }

    pub fn upgrade_by_name(
        &self,
        player: &PlayerState,
        name: &str,
        now: DateTime<Utc>,
        rng: &mut impl Rng,
    ) -> EngineResult<UpgradeOutcome> {
        let _span = tracing::debug_span!("upgrade", player = player.player_id, name).entered();
        upgrade::upgrade_by_name(player, name, &self.catalog, self.config.upgrade_cost, now, rng)
    }

    /// Fights the opponent at `level`. Not idempotent.
    pub fn fight(
        &self,
        player: &PlayerState,
        level: u32,
        now: DateTime<Utc>,
        rng: &mut impl Rng,
    ) -> EngineResult<BattleReport> {
        let _span = tracing::debug_span!("fight", player = player.player_id, level).entered();
        battle::fight(
            player,
            level,
            &self.catalog,
            &self.config.economy.loadout_power,
            self.config.battle_cooldown_secs,
            now,
            rng,
        )
    }

    pub fn battle_readiness(&self, player: &PlayerState, now: DateTime<Utc>) -> Readiness {
        battle::readiness(player, self.config.battle_cooldown_secs, now)
    }

    pub fn loadout_power(&self, player: &PlayerState) -> EngineResult<u64> {
        Ok(battle::player_loadout_power(
            player,
            &self.catalog,
            &self.config.economy.loadout_power,
        )?)
    }

    pub fn set_loadout(
        &self,
        player: &PlayerState,
        items: &[ItemId],
    ) -> Result<Vec<StateMutation>, PolicyViolation> {
        battle::set_loadout(player, items)
    }

    pub fn available_opponents(&self, player: &PlayerState) -> Vec<OpponentStats> {
        battle::available_opponents(player)
    }

    /// Newly earned milestones. Safe to retry.
    pub fn evaluate_milestones(&self, player: &PlayerState, now: DateTime<Utc>) -> Vec<Grant> {
        let _span =
            tracing::debug_span!("evaluate_milestones", player = player.player_id).entered();
        achievements::evaluate(player, &self.config.milestones, &self.catalog, now)
    }

    pub fn milestone_summary(&self, player: &PlayerState) -> MilestoneSummary {
        achievements::summary(player, &self.config.milestones)
    }

    /// Recomputes every campaign active at `now`. Safe to retry.
    pub fn refresh_campaigns(&self, player: &PlayerState, now: DateTime<Utc>) -> Vec<ProgressUpdate> {
        let _span = tracing::debug_span!("refresh_campaigns", player = player.player_id).entered();
        campaigns::refresh_active(player, &self.config.campaigns, &self.catalog, now)
    }

    /// Claims the reward of a completed campaign. Single use.
    ///
    /// Unknown campaign ids are reported as not completed.
    pub fn claim_campaign(
        &self,
        player: &PlayerState,
        id: CampaignId,
        now: DateTime<Utc>,
    ) -> EngineResult<ClaimOutcome> {
        let _span =
            tracing::debug_span!("claim_campaign", player = player.player_id, campaign = %id)
                .entered();
        let campaign = self
            .config
            .campaign(id)
            .ok_or(PolicyViolation::NotCompleted)?;
        campaigns::claim_reward(player, campaign, &self.catalog, now)
    }
}
