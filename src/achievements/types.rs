//! Milestone definitions, grants, and bookkeeping types.

use crate::character::PlayerId;
use crate::core::mutation::StateMutation;
use crate::items::Tier;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MilestoneId(pub u32);

impl fmt::Display for MilestoneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "M{}", self.0)
    }
}

/// Milestone categories for organization in listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Collection,
    Economy,
    General,
    Battle,
    Special,
}

impl Category {
    /// All categories in display order.
    pub const ALL: [Category; 5] = [
        Category::Collection,
        Category::Economy,
        Category::General,
        Category::Battle,
        Category::Special,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Category::Collection => "Collection",
            Category::Economy => "Economy",
            Category::General => "General",
            Category::Battle => "Battle",
            Category::Special => "Special",
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            Category::Collection => "🎴",
            Category::Economy => "💰",
            Category::General => "🏆",
            Category::Battle => "⚔️",
            Category::Special => "⭐",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    Easy,
    Normal,
    Hard,
    Legendary,
    Special,
}

impl Difficulty {
    pub fn emoji(&self) -> &'static str {
        match self {
            Difficulty::Easy => "🟢",
            Difficulty::Normal => "🟡",
            Difficulty::Hard => "🟠",
            Difficulty::Legendary => "🔴",
            Difficulty::Special => "🟣",
        }
    }
}

/// What a milestone measures. The numeric threshold lives on the definition.
///
/// Counter conditions are satisfied when the measured value reaches the
/// threshold. `CompleteCatalog`, `AllMilestones` and `PerfectCategory` ignore it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum Condition {
    /// Units owned across the inventory.
    TotalItems,
    /// Units owned of items in `tier`.
    ItemsOfTier { tier: Tier },
    Level,
    CoinBalance,
    DailyStreak,
    BundlePurchases,
    CampaignsCompleted,
    /// Highest quantity held of any single item.
    MaxDuplicates,
    /// Every tier held with at least `threshold` units.
    AllTiersOwned,
    /// Every active catalog item owned.
    CompleteCatalog,
    MilestonesGranted,
    /// Every other milestone granted.
    AllMilestones,
    /// Every other milestone of a category granted; `None` means any category.
    PerfectCategory { category: Option<Category> },
    /// Items received during the given UTC hour of day.
    ItemsAtHour { hour: u32 },
    /// Distinct hours of day with at least one receipt.
    DistinctHours,
    NightItems,
    MorningItems,
    ItemsToday,
    /// Longest run of consecutive Legendary receipts.
    LegendaryStreak,
    ItemStreak,
    ArtifactsReceived,
    ArtifactsThisMonth,
    CoinsSpent,
    ItemsSold,
    SellingProfit,
    DaysPlayed,
    BattlesWon,
}

impl Condition {
    /// Conditions that depend on other milestones.
    pub fn is_meta(&self) -> bool {
        matches!(
            self,
            Condition::MilestonesGranted
                | Condition::AllMilestones
                | Condition::PerfectCategory { .. }
        )
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Reward {
    pub coins: u64,
    pub experience: u64,
}

/// Static definition of a milestone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MilestoneDefinition {
    pub id: MilestoneId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_icon")]
    pub icon: String,
    pub category: Category,
    pub condition: Condition,
    #[serde(default = "default_threshold")]
    pub threshold: u64,
    #[serde(default)]
    pub reward: Reward,
    #[serde(default)]
    pub points: u64,
    /// Evaluated normally, but left out of default listings until granted.
    #[serde(default)]
    pub hidden: bool,
    #[serde(default = "default_difficulty")]
    pub difficulty: Difficulty,
}

fn default_icon() -> String {
    "🏆".to_string()
}

fn default_threshold() -> u64 {
    1
}

fn default_difficulty() -> Difficulty {
    Difficulty::Normal
}

/// Progress on a single milestone.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MilestoneProgress {
    pub current: u64,
    pub target: u64,
}

impl MilestoneProgress {
    pub fn is_met(&self) -> bool {
        self.current >= self.target
    }
}

/// A milestone newly awarded by an evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Grant {
    pub id: MilestoneId,
    pub name: String,
    pub category: Category,
    pub points: u64,
    pub reward: Reward,
    pub hidden: bool,
}

impl Grant {
    pub fn from_definition(def: &MilestoneDefinition) -> Self {
        Self {
            id: def.id,
            name: def.name.clone(),
            category: def.category,
            points: def.points,
            reward: def.reward,
            hidden: def.hidden,
        }
    }

    /// Mutations that record this grant and pay out its reward.
    pub fn mutations(&self) -> Vec<StateMutation> {
        let mut out = vec![StateMutation::GrantMilestone {
            id: self.id,
            points: self.points,
        }];
        if self.reward.coins > 0 {
            out.push(StateMutation::CreditCoins {
                amount: self.reward.coins,
            });
        }
        if self.reward.experience > 0 {
            out.push(StateMutation::GrantExperience {
                amount: self.reward.experience,
            });
        }
        out
    }
}

/// Advisory per-milestone statistics kept by the catalog owner.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MilestoneStats {
    pub times_granted: u64,
    pub first_grantee: Option<PlayerId>,
    pub first_granted_at: Option<DateTime<Utc>>,
}

impl MilestoneStats {
    pub fn record(&mut self, player: PlayerId, at: DateTime<Utc>) {
        self.times_granted += 1;
        if self.first_grantee.is_none() {
            self.first_grantee = Some(player);
            self.first_granted_at = Some(at);
        }
    }
}

/// Overview of a player's milestone completion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MilestoneSummary {
    pub total: usize,
    pub completed: usize,
    /// 0.0 - 100.0, rounded to one decimal.
    pub percentage: f64,
    pub points: u64,
    /// (granted, total) per category.
    pub by_category: BTreeMap<Category, (usize, usize)>,
}
