use crate::bundles::DrawnItem;
use crate::core::mutation::{CatalogMutation, StateMutation};
use crate::items::{ItemId, Tier};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CampaignId(pub u32);

impl fmt::Display for CampaignId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "campaign {}", self.0)
    }
}

/// What a campaign measures. Always recomputed from the player snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum TargetMetric {
    /// Units owned across the whole inventory.
    TotalItems,
    /// Units owned of items in `tier`.
    ItemsOfTier { tier: Tier },
    /// Units owned of the listed items.
    SpecificItems { items: Vec<ItemId> },
    Level,
    CoinBalance,
}

impl TargetMetric {
    pub fn describe(&self) -> String {
        match self {
            TargetMetric::TotalItems => "items owned".to_string(),
            TargetMetric::ItemsOfTier { tier } => format!("{tier} items owned"),
            TargetMetric::SpecificItems { items } => {
                format!("copies of {} featured items", items.len())
            }
            TargetMetric::Level => "level".to_string(),
            TargetMetric::CoinBalance => "coins held".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CampaignReward {
    pub coins: u64,
    pub experience: u64,
    pub items: Vec<ItemId>,
    /// Display-only badge handed to the front end.
    pub title: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CampaignDefinition {
    pub id: CampaignId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub metric: TargetMetric,
    pub target: u64,
    #[serde(default)]
    pub reward: CampaignReward,
}

impl CampaignDefinition {
    /// Active on the half-open window `[start, end)`.
    pub fn is_active(&self, now: DateTime<Utc>) -> bool {
        self.start <= now && now < self.end
    }
}

/// Per-player record. `completed` and `reward_claimed` only ever go false to true.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CampaignProgress {
    pub current_value: u64,
    pub target: u64,
    pub completed: bool,
    pub completed_at: Option<DateTime<Utc>>,
    pub reward_claimed: bool,
    pub claimed_at: Option<DateTime<Utc>>,
}

impl CampaignProgress {
    pub fn new(target: u64) -> Self {
        Self {
            current_value: 0,
            target,
            completed: false,
            completed_at: None,
            reward_claimed: false,
            claimed_at: None,
        }
    }

    /// Completion percentage, capped at 100.
    pub fn percent(&self) -> f64 {
        if self.target == 0 {
            return 100.0;
        }
        (self.current_value as f64 / self.target as f64 * 100.0).min(100.0)
    }

    pub fn is_claimable(&self) -> bool {
        self.completed && !self.reward_claimed
    }

    /// Folds a newer record into this one. Flags never revert and the first
    /// recorded timestamps win; values stop moving once completed.
    pub fn merge(&mut self, incoming: &CampaignProgress) {
        if !self.completed {
            self.current_value = incoming.current_value;
            self.target = incoming.target;
        }
        if incoming.completed && !self.completed {
            self.completed = true;
            self.completed_at = incoming.completed_at;
        }
        if incoming.reward_claimed && !self.reward_claimed {
            self.reward_claimed = true;
            self.claimed_at = incoming.claimed_at;
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressUpdate {
    pub campaign: CampaignId,
    /// Freshly recomputed, even when the stored record is frozen.
    pub value: u64,
    pub target: u64,
    pub completed_now: bool,
    pub mutations: Vec<StateMutation>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClaimOutcome {
    pub campaign: CampaignId,
    pub coins: u64,
    pub experience: u64,
    pub items: Vec<DrawnItem>,
    pub title: Option<String>,
    pub mutations: Vec<StateMutation>,
    pub catalog_mutations: Vec<CatalogMutation>,
}
