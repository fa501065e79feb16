//! Static engine configuration.
//!
//! Every field falls back to the production value, so a JSON file only needs
//! to name what it overrides.

use crate::achievements::{default_milestones, MilestoneDefinition, MilestoneId};
use crate::bundles::{default_bundles, BundleDefinition, BundleId, BundleOdds};
use crate::campaigns::{CampaignDefinition, CampaignId};
use crate::core::constants::{
    BATTLE_COOLDOWN_SECS, BUY_XP_COST_BY_TIER, DAILY_COINS_BY_TIER, DAILY_DRAW_COOLDOWN_SECS,
    DAILY_XP_BY_TIER, DEFAULT_UPGRADE_COST, LOADOUT_POWER_BY_TIER, SELL_PRICE_BY_TIER,
};
use crate::core::error::PolicyViolation;
use crate::items::{Tier, TierTable, TierTableError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid tier table: {0}")]
    InvalidTable(#[from] TierTableError),
    #[error("duplicate bundle id {0}")]
    DuplicateBundle(BundleId),
    #[error("duplicate milestone id {0}")]
    DuplicateMilestone(MilestoneId),
    #[error("duplicate {0}")]
    DuplicateCampaign(CampaignId),
    #[error("upgrade cost must be at least 1")]
    ZeroUpgradeCost,
    #[error("bundle {id} guarantees more items than it contains")]
    GuaranteesExceedCount { id: BundleId },
}

/// Per-tier numbers for the daily draw, the exchange and battles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EconomyTable {
    pub daily_experience: [u64; 5],
    pub daily_coins: [u64; 5],
    pub sell_price: [u64; 5],
    pub buy_experience_cost: [u64; 5],
    pub loadout_power: [u64; 5],
}

impl Default for EconomyTable {
    fn default() -> Self {
        Self {
            daily_experience: DAILY_XP_BY_TIER,
            daily_coins: DAILY_COINS_BY_TIER,
            sell_price: SELL_PRICE_BY_TIER,
            buy_experience_cost: BUY_XP_COST_BY_TIER,
            loadout_power: LOADOUT_POWER_BY_TIER,
        }
    }
}

impl EconomyTable {
    pub fn daily_experience(&self, tier: Tier) -> u64 {
        self.daily_experience[tier.index()]
    }

    pub fn daily_coins(&self, tier: Tier) -> u64 {
        self.daily_coins[tier.index()]
    }

    pub fn sell_price(&self, tier: Tier) -> u64 {
        self.sell_price[tier.index()]
    }

    pub fn buy_experience_cost(&self, tier: Tier) -> u64 {
        self.buy_experience_cost[tier.index()]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub base_table: TierTable,
    pub bundles: Vec<BundleDefinition>,
    /// Copies consumed by one upgrade.
    pub upgrade_cost: u32,
    pub daily_cooldown_secs: u64,
    pub battle_cooldown_secs: u64,
    /// Extra base draw on a brand-new player's first daily draw.
    pub newbie_bonus: bool,
    pub economy: EconomyTable,
    pub milestones: Vec<MilestoneDefinition>,
    pub campaigns: Vec<CampaignDefinition>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            base_table: TierTable::base(),
            bundles: default_bundles(),
            upgrade_cost: DEFAULT_UPGRADE_COST,
            daily_cooldown_secs: DAILY_DRAW_COOLDOWN_SECS,
            battle_cooldown_secs: BATTLE_COOLDOWN_SECS,
            newbie_bonus: true,
            economy: EconomyTable::default(),
            milestones: default_milestones(),
            campaigns: Vec::new(),
        }
    }
}

impl EngineConfig {
    /// Parses and validates a JSON config.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json_str(&json)?;
        tracing::info!(
            path = %path.display(),
            bundles = config.bundles.len(),
            milestones = config.milestones.len(),
            campaigns = config.campaigns.len(),
            "config loaded"
        );
        Ok(config)
    }

    /// Rejects configs the engine cannot run with.
    ///
    /// Tables that do not sum to 100 are accepted and renormalised at draw
    /// time; they only produce a warning here.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.upgrade_cost == 0 {
            return Err(ConfigError::ZeroUpgradeCost);
        }
        check_table("base", &self.base_table)?;

        let mut bundle_ids = BTreeSet::new();
        for bundle in &self.bundles {
            if !bundle_ids.insert(&bundle.id) {
                return Err(ConfigError::DuplicateBundle(bundle.id.clone()));
            }
            if bundle.guarantees().count() as u32 > bundle.count {
                return Err(ConfigError::GuaranteesExceedCount {
                    id: bundle.id.clone(),
                });
            }
            if let BundleOdds::Boosted(table) = &bundle.odds {
                check_table(bundle.id.as_str(), table)?;
            }
        }

        let mut milestone_ids = BTreeSet::new();
        for m in &self.milestones {
            if !milestone_ids.insert(m.id) {
                return Err(ConfigError::DuplicateMilestone(m.id));
            }
        }

        let mut campaign_ids = BTreeSet::new();
        for c in &self.campaigns {
            if !campaign_ids.insert(c.id) {
                return Err(ConfigError::DuplicateCampaign(c.id));
            }
        }
        Ok(())
    }

    pub fn bundle(&self, id: &BundleId) -> Result<&BundleDefinition, PolicyViolation> {
        self.bundles
            .iter()
            .find(|b| &b.id == id)
            .ok_or_else(|| PolicyViolation::UnknownBundle { id: id.clone() })
    }

    pub fn campaign(&self, id: CampaignId) -> Option<&CampaignDefinition> {
        self.campaigns.iter().find(|c| c.id == id)
    }
}

fn check_table(label: &str, table: &TierTable) -> Result<(), ConfigError> {
    TierTable::new(table.weights())?;
    if !table.sums_to_hundred() {
        tracing::warn!(table = label, total = table.total(), "tier table does not sum to 100");
    }
    Ok(())
}
