//! Mutable per-player snapshot the engine evaluates against.
//!
//! The snapshot is loaded by the caller, handed to an operation, and updated
//! by replaying the returned [`StateMutation`]s through [`PlayerState::apply`].

use super::leveling::level_for_experience;
use crate::achievements::MilestoneId;
use crate::battle::BattleProgress;
use crate::bundles::BundleId;
use crate::campaigns::{CampaignId, CampaignProgress};
use crate::core::constants::{
    HOURS_PER_DAY, MORNING_END_HOUR, NIGHT_END_HOUR, NIGHT_START_HOUR, STARTING_COINS,
};
use crate::core::error::{DataIntegrityError, EngineResult, PolicyViolation};
use crate::core::mutation::StateMutation;
use crate::items::{ItemId, Tier};
use chrono::{DateTime, Datelike, NaiveDate, Timelike, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

pub type PlayerId = u64;

/// Counters feeding milestone conditions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActivityStats {
    pub first_item_received: bool,

    pub daily_streak: u32,
    pub max_daily_streak: u32,
    pub last_play_date: Option<NaiveDate>,
    pub days_played: u32,

    pub bundle_purchases: u64,
    pub coins_spent: u64,
    pub items_sold: u64,
    pub selling_profit: u64,
    pub campaigns_completed: u64,

    pub items_today: u64,
    pub items_today_date: Option<NaiveDate>,
    /// Items received per UTC hour of day.
    pub hourly_receipts: [u64; HOURS_PER_DAY],
    pub night_items: u64,
    pub morning_items: u64,

    pub received_by_tier: [u64; 5],
    pub artifacts_this_month: u64,
    pub artifact_month: Option<(i32, u32)>,
    pub legendary_streak: u32,
    pub max_legendary_streak: u32,
    pub item_streak: u64,
    pub max_item_streak: u64,
}

impl Default for ActivityStats {
    fn default() -> Self {
        Self {
            first_item_received: false,
            daily_streak: 0,
            max_daily_streak: 0,
            last_play_date: None,
            days_played: 0,
            bundle_purchases: 0,
            coins_spent: 0,
            items_sold: 0,
            selling_profit: 0,
            campaigns_completed: 0,
            items_today: 0,
            items_today_date: None,
            hourly_receipts: [0; HOURS_PER_DAY],
            night_items: 0,
            morning_items: 0,
            received_by_tier: [0; 5],
            artifacts_this_month: 0,
            artifact_month: None,
            legendary_streak: 0,
            max_legendary_streak: 0,
            item_streak: 0,
            max_item_streak: 0,
        }
    }
}

impl ActivityStats {
    pub fn artifacts_received(&self) -> u64 {
        self.received_by_tier[Tier::Artifact.index()]
    }

    pub fn distinct_hours(&self) -> usize {
        self.hourly_receipts.iter().filter(|&&n| n > 0).count()
    }

    pub fn received_at_hour(&self, hour: u32) -> u64 {
        self.hourly_receipts
            .get(hour as usize)
            .copied()
            .unwrap_or(0)
    }

    /// Items received today, or 0 if the counter belongs to an earlier day.
    pub fn items_on(&self, date: NaiveDate) -> u64 {
        if self.items_today_date == Some(date) {
            self.items_today
        } else {
            0
        }
    }

    fn record_item_received(&mut self, tier: Tier, at: DateTime<Utc>) {
        let hour = at.hour();
        self.hourly_receipts[hour as usize] += 1;
        if hour >= NIGHT_START_HOUR || hour <= NIGHT_END_HOUR {
            self.night_items += 1;
        }
        if hour <= MORNING_END_HOUR {
            self.morning_items += 1;
        }

        let today = at.date_naive();
        if self.items_today_date != Some(today) {
            self.items_today = 0;
            self.items_today_date = Some(today);
        }
        self.items_today += 1;

        self.received_by_tier[tier.index()] += 1;
        if tier == Tier::Artifact {
            let month = (at.year(), at.month());
            if self.artifact_month != Some(month) {
                self.artifacts_this_month = 0;
                self.artifact_month = Some(month);
            }
            self.artifacts_this_month += 1;
        }

        if tier == Tier::Legendary {
            self.legendary_streak += 1;
            self.max_legendary_streak = self.max_legendary_streak.max(self.legendary_streak);
        } else {
            self.legendary_streak = 0;
        }

        self.item_streak += 1;
        self.max_item_streak = self.max_item_streak.max(self.item_streak);
        self.first_item_received = true;
    }

    /// Same day: unchanged. Next day: streak grows. Gap: streak restarts.
    fn record_play_day(&mut self, date: NaiveDate) {
        match self.last_play_date {
            Some(last) if last == date => return,
            Some(last) if last.succ_opt() == Some(date) => self.daily_streak += 1,
            _ => self.daily_streak = 1,
        }
        self.max_daily_streak = self.max_daily_streak.max(self.daily_streak);
        self.last_play_date = Some(date);
        self.days_played += 1;
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerState {
    pub player_id: PlayerId,
    pub experience: u64,
    /// Cached; always equals `level_for_experience(experience)` after `apply`.
    pub level: u32,
    pub coins: u64,
    /// Owned items. Ids with zero quantity are removed.
    pub inventory: BTreeMap<ItemId, u32>,
    /// Append-only.
    pub granted: BTreeSet<MilestoneId>,
    pub achievement_points: u64,
    /// At most five owned ids.
    pub loadout: Vec<ItemId>,
    #[serde(default)]
    pub campaigns: BTreeMap<CampaignId, CampaignProgress>,
    #[serde(default)]
    pub bundle_cooldowns: BTreeMap<BundleId, DateTime<Utc>>,
    #[serde(default)]
    pub last_daily_draw: Option<DateTime<Utc>>,
    #[serde(default)]
    pub battle: BattleProgress,
    #[serde(default)]
    pub activity: ActivityStats,
}

impl PlayerState {
    pub fn new(player_id: PlayerId) -> Self {
        Self {
            player_id,
            experience: 0,
            level: 1,
            coins: STARTING_COINS,
            inventory: BTreeMap::new(),
            granted: BTreeSet::new(),
            achievement_points: 0,
            loadout: Vec::new(),
            campaigns: BTreeMap::new(),
            bundle_cooldowns: BTreeMap::new(),
            last_daily_draw: None,
            battle: BattleProgress::default(),
            activity: ActivityStats::default(),
        }
    }

    pub fn with_coins(mut self, coins: u64) -> Self {
        self.coins = coins;
        self
    }

    pub fn quantity(&self, item: ItemId) -> u32 {
        self.inventory.get(&item).copied().unwrap_or(0)
    }

    pub fn owns(&self, item: ItemId) -> bool {
        self.quantity(item) > 0
    }

    pub fn total_items(&self) -> u64 {
        self.inventory.values().map(|&q| q as u64).sum()
    }

    pub fn distinct_items(&self) -> usize {
        self.inventory.len()
    }

    pub fn max_duplicates(&self) -> u32 {
        self.inventory.values().copied().max().unwrap_or(0)
    }

    pub fn is_granted(&self, id: MilestoneId) -> bool {
        self.granted.contains(&id)
    }

    pub fn campaign(&self, id: CampaignId) -> Option<&CampaignProgress> {
        self.campaigns.get(&id)
    }

    pub fn add_item(&mut self, item: ItemId, quantity: u32) {
        if quantity == 0 {
            return;
        }
        *self.inventory.entry(item).or_insert(0) += quantity;
    }

    /// Removes units; at zero the id leaves the inventory and the loadout.
    pub fn remove_item(&mut self, item: ItemId, quantity: u32) -> Result<(), DataIntegrityError> {
        let available = self.quantity(item);
        if available < quantity {
            return Err(DataIntegrityError::QuantityUnderflow {
                item,
                needed: quantity,
                available,
            });
        }
        let remaining = available - quantity;
        if remaining == 0 {
            self.inventory.remove(&item);
            self.loadout.retain(|&id| id != item);
        } else {
            self.inventory.insert(item, remaining);
        }
        Ok(())
    }

    /// Adds experience and returns the number of levels gained.
    pub fn add_experience(&mut self, amount: u64) -> u32 {
        let old_level = self.level;
        self.experience = self.experience.saturating_add(amount);
        self.level = level_for_experience(self.experience);
        self.level.saturating_sub(old_level)
    }

    /// Applies one mutation. Mutations must be applied in the order returned.
    pub fn apply(&mut self, mutation: &StateMutation) -> EngineResult<()> {
        match mutation {
            StateMutation::DebitCoins { amount } => {
                if self.coins < *amount {
                    return Err(PolicyViolation::InsufficientFunds {
                        needed: *amount,
                        available: self.coins,
                    }
                    .into());
                }
                self.coins -= amount;
            }
            StateMutation::CreditCoins { amount } => {
                self.coins = self.coins.saturating_add(*amount);
            }
            StateMutation::GrantExperience { amount } => {
                self.add_experience(*amount);
            }
            StateMutation::SpendExperience { amount } => {
                if self.experience < *amount {
                    return Err(PolicyViolation::InsufficientExperience {
                        needed: *amount,
                        available: self.experience,
                    }
                    .into());
                }
                self.experience -= amount;
                self.level = level_for_experience(self.experience);
            }
            StateMutation::AddItem { item, quantity } => self.add_item(*item, *quantity),
            StateMutation::RemoveItem { item, quantity } => self.remove_item(*item, *quantity)?,
            StateMutation::StampBundleCooldown { bundle, at } => {
                self.bundle_cooldowns.insert(bundle.clone(), *at);
            }
            StateMutation::RecordBundlePurchase { cost } => {
                self.activity.bundle_purchases += 1;
                self.activity.coins_spent += cost;
            }
            StateMutation::RecordItemReceived { tier, at } => {
                self.activity.record_item_received(*tier, *at);
            }
            StateMutation::StampDailyDraw { at } => {
                self.last_daily_draw = Some(*at);
                self.activity.record_play_day(at.date_naive());
            }
            StateMutation::GrantMilestone { id, points } => {
                if !self.granted.insert(*id) {
                    return Err(PolicyViolation::MilestoneAlreadyGranted { id: *id }.into());
                }
                self.achievement_points += points;
            }
            StateMutation::RecordBattle {
                at,
                opponent_level,
                won,
            } => self.battle.record(*at, *opponent_level, *won),
            StateMutation::SetLoadout { items } => self.loadout = items.clone(),
            StateMutation::SetCampaignProgress { campaign, progress } => {
                match self.campaigns.get_mut(campaign) {
                    Some(existing) => existing.merge(progress),
                    None => {
                        self.campaigns.insert(*campaign, progress.clone());
                    }
                }
            }
            StateMutation::RecordCampaignCompleted => self.activity.campaigns_completed += 1,
            StateMutation::RecordSale { proceeds } => {
                self.activity.items_sold += 1;
                self.activity.selling_profit += proceeds;
            }
        }
        Ok(())
    }

    /// Applies mutations in order as one unit. On the first failure the
    /// error is returned and `self` is left untouched.
    pub fn apply_all(&mut self, mutations: &[StateMutation]) -> EngineResult<()> {
        let mut next = self.clone();
        for m in mutations {
            next.apply(m)?;
        }
        *self = next;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(day: u32, hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, day, hour, 0, 0).unwrap()
    }

    #[test]
    fn test_new_player_defaults() {
        let player = PlayerState::new(1);
        assert_eq!(player.coins, 600);
        assert_eq!(player.level, 1);
        assert_eq!(player.total_items(), 0);
        assert_eq!(player.max_duplicates(), 0);
    }

    #[test]
    fn test_remove_to_zero_drops_from_inventory_and_loadout() {
        let mut player = PlayerState::new(1);
        player.add_item(ItemId(3), 2);
        player.loadout = vec![ItemId(3)];
        player.remove_item(ItemId(3), 2).unwrap();
        assert!(!player.inventory.contains_key(&ItemId(3)));
        assert!(player.loadout.is_empty());
    }

    #[test]
    fn test_remove_more_than_owned_fails_without_change() {
        let mut player = PlayerState::new(1);
        player.add_item(ItemId(3), 1);
        let err = player.remove_item(ItemId(3), 2).unwrap_err();
        assert_eq!(
            err,
            DataIntegrityError::QuantityUnderflow {
                item: ItemId(3),
                needed: 2,
                available: 1
            }
        );
        assert_eq!(player.quantity(ItemId(3)), 1);
    }

    #[test]
    fn test_add_zero_quantity_is_noop() {
        let mut player = PlayerState::new(1);
        player.add_item(ItemId(3), 0);
        assert!(player.inventory.is_empty());
    }

    #[test]
    fn test_experience_updates_cached_level() {
        let mut player = PlayerState::new(1);
        let gained = player.add_experience(200);
        assert_eq!(gained, 2);
        assert_eq!(player.level, 3);

        player
            .apply(&StateMutation::SpendExperience { amount: 150 })
            .unwrap();
        assert_eq!(player.experience, 50);
        assert_eq!(player.level, 2);
    }

    #[test]
    fn test_debit_more_than_balance_is_refused() {
        let mut player = PlayerState::new(1).with_coins(10);
        let err = player
            .apply(&StateMutation::DebitCoins { amount: 11 })
            .unwrap_err();
        assert!(err.is_policy());
        assert_eq!(player.coins, 10);
    }

    #[test]
    fn test_grant_milestone_twice_is_refused() {
        let mut player = PlayerState::new(1);
        let grant = StateMutation::GrantMilestone {
            id: MilestoneId(1),
            points: 5,
        };
        player.apply(&grant).unwrap();
        assert!(player.apply(&grant).is_err());
        assert_eq!(player.achievement_points, 5);
    }

    #[test]
    fn test_failed_batch_leaves_state_unchanged() {
        let mut player = PlayerState::new(1);
        player.add_item(ItemId(3), 1);
        let before = player.clone();

        let result = player.apply_all(&[
            StateMutation::CreditCoins { amount: 100 },
            StateMutation::AddItem {
                item: ItemId(4),
                quantity: 2,
            },
            StateMutation::RemoveItem {
                item: ItemId(999),
                quantity: 1,
            },
        ]);

        assert!(result.is_err());
        assert_eq!(player, before);
        assert_eq!(player.coins, 600);
    }

    #[test]
    fn test_stale_campaign_record_does_not_revert_claim() {
        let mut player = PlayerState::new(1);
        let mut claimed = CampaignProgress::new(5);
        claimed.current_value = 5;
        claimed.completed = true;
        claimed.completed_at = Some(at(1, 10));
        claimed.reward_claimed = true;
        claimed.claimed_at = Some(at(2, 10));
        player
            .apply(&StateMutation::SetCampaignProgress {
                campaign: CampaignId(1),
                progress: claimed.clone(),
            })
            .unwrap();

        player
            .apply(&StateMutation::SetCampaignProgress {
                campaign: CampaignId(1),
                progress: CampaignProgress::new(5),
            })
            .unwrap();

        assert_eq!(player.campaigns[&CampaignId(1)], claimed);
    }

    #[test]
    fn test_time_of_day_buckets() {
        let mut stats = ActivityStats::default();
        stats.record_item_received(Tier::Common, at(1, 23));
        stats.record_item_received(Tier::Common, at(1, 3));
        stats.record_item_received(Tier::Common, at(1, 12));

        assert_eq!(stats.night_items, 2);
        assert_eq!(stats.morning_items, 1);
        assert_eq!(stats.distinct_hours(), 3);
        assert_eq!(stats.received_at_hour(12), 1);
        assert_eq!(stats.received_at_hour(99), 0);
    }

    #[test]
    fn test_items_today_resets_on_new_day() {
        let mut stats = ActivityStats::default();
        stats.record_item_received(Tier::Common, at(1, 10));
        stats.record_item_received(Tier::Common, at(1, 11));
        assert_eq!(stats.items_on(at(1, 0).date_naive()), 2);

        stats.record_item_received(Tier::Common, at(2, 9));
        assert_eq!(stats.items_today, 1);
        assert_eq!(stats.items_on(at(1, 0).date_naive()), 0);
    }

    #[test]
    fn test_legendary_streak_breaks_on_other_tier() {
        let mut stats = ActivityStats::default();
        stats.record_item_received(Tier::Legendary, at(1, 10));
        stats.record_item_received(Tier::Legendary, at(1, 10));
        stats.record_item_received(Tier::Rare, at(1, 10));
        assert_eq!(stats.legendary_streak, 0);
        assert_eq!(stats.max_legendary_streak, 2);
        assert_eq!(stats.item_streak, 3);
    }

    #[test]
    fn test_artifacts_this_month_resets() {
        let mut stats = ActivityStats::default();
        stats.record_item_received(Tier::Artifact, at(1, 10));
        stats.record_item_received(Tier::Artifact, at(2, 10));
        assert_eq!(stats.artifacts_this_month, 2);

        let june = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
        stats.record_item_received(Tier::Artifact, june);
        assert_eq!(stats.artifacts_this_month, 1);
        assert_eq!(stats.artifacts_received(), 3);
    }

    #[test]
    fn test_daily_streak_rules() {
        let mut stats = ActivityStats::default();
        stats.record_play_day(at(1, 8).date_naive());
        assert_eq!(stats.daily_streak, 1);

        // Same day does not count twice.
        stats.record_play_day(at(1, 20).date_naive());
        assert_eq!(stats.daily_streak, 1);
        assert_eq!(stats.days_played, 1);

        stats.record_play_day(at(2, 8).date_naive());
        stats.record_play_day(at(3, 8).date_naive());
        assert_eq!(stats.daily_streak, 3);

        // Skipping a day restarts the streak.
        stats.record_play_day(at(5, 8).date_naive());
        assert_eq!(stats.daily_streak, 1);
        assert_eq!(stats.max_daily_streak, 3);
        assert_eq!(stats.days_played, 4);
    }

    #[test]
    fn test_player_state_json_roundtrip_keeps_inventory() {
        let mut player = PlayerState::new(42);
        player.add_item(ItemId(1), 3);
        player.granted.insert(MilestoneId(9));
        let json = serde_json::to_string(&player).unwrap();
        let loaded: PlayerState = serde_json::from_str(&json).unwrap();
        assert_eq!(loaded, player);
    }
}
