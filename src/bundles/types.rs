use crate::items::{ItemDefinition, ItemId, Tier, TierTable};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BundleId(pub String);

impl BundleId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BundleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for BundleId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Odds for the non-guaranteed draws of a bundle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BundleOdds {
    /// The configured base table.
    Base,
    /// A table that replaces the base table wholesale.
    Boosted(TierTable),
}

impl BundleOdds {
    pub fn is_boosted(&self) -> bool {
        matches!(self, BundleOdds::Boosted(_))
    }

    /// Resolves to a concrete table given the configured base table.
    pub fn table<'a>(&'a self, base: &'a TierTable) -> &'a TierTable {
        match self {
            BundleOdds::Base => base,
            BundleOdds::Boosted(table) => table,
        }
    }
}

/// Static configuration for a purchasable bundle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BundleDefinition {
    pub id: BundleId,
    pub name: String,
    pub cost: u64,
    /// Total number of items, guarantees included.
    pub count: u32,
    #[serde(default)]
    pub guaranteed_tier: Option<Tier>,
    #[serde(default)]
    pub extra_guaranteed_tier: Option<Tier>,
    #[serde(default = "default_odds")]
    pub odds: BundleOdds,
    /// Whole seconds between openings of this bundle.
    #[serde(default)]
    pub cooldown_secs: u64,
}

fn default_odds() -> BundleOdds {
    BundleOdds::Base
}

impl BundleDefinition {
    pub fn new(id: &str, name: &str, cost: u64, count: u32, cooldown_secs: u64) -> Self {
        Self {
            id: BundleId::new(id),
            name: name.to_string(),
            cost,
            count,
            guaranteed_tier: None,
            extra_guaranteed_tier: None,
            odds: BundleOdds::Base,
            cooldown_secs,
        }
    }

    pub fn guaranteed(mut self, tier: Tier) -> Self {
        self.guaranteed_tier = Some(tier);
        self
    }

    pub fn extra_guaranteed(mut self, tier: Tier) -> Self {
        self.extra_guaranteed_tier = Some(tier);
        self
    }

    pub fn with_odds(mut self, table: TierTable) -> Self {
        self.odds = BundleOdds::Boosted(table);
        self
    }

    /// Guaranteed tiers in draw order.
    pub fn guarantees(&self) -> impl Iterator<Item = Tier> {
        self.guaranteed_tier
            .into_iter()
            .chain(self.extra_guaranteed_tier)
    }

    /// Experience credited on opening.
    pub fn bonus_experience(&self) -> u64 {
        self.cost / crate::core::constants::BUNDLE_XP_DIVISOR
    }
}

/// Production bundle lineup, cheapest first.
pub fn default_bundles() -> Vec<BundleDefinition> {
    let boosted = TierTable::boosted();
    vec![
        BundleDefinition::new("starter", "Starter Pack", 25, 1, 12).guaranteed(Tier::Common),
        BundleDefinition::new("basic", "Basic Pack", 50, 1, 30).with_odds(TierTable::basic()),
        BundleDefinition::new("premium", "Premium Pack", 100, 2, 60).with_odds(boosted),
        BundleDefinition::new("elite", "Elite Pack", 200, 3, 120)
            .guaranteed(Tier::Rare)
            .with_odds(boosted),
        BundleDefinition::new("super", "Super Pack", 350, 5, 180)
            .guaranteed(Tier::Epic)
            .with_odds(boosted),
        BundleDefinition::new("mega", "Mega Pack", 600, 8, 300)
            .guaranteed(Tier::Legendary)
            .with_odds(boosted),
        BundleDefinition::new("ultra", "Ultra Pack", 1000, 12, 600)
            .guaranteed(Tier::Legendary)
            .extra_guaranteed(Tier::Legendary)
            .with_odds(TierTable::ultra()),
        BundleDefinition::new("legendary", "Legendary Pack", 1500, 15, 900)
            .guaranteed(Tier::Legendary)
            .extra_guaranteed(Tier::Legendary)
            .with_odds(boosted),
        BundleDefinition::new("artifact", "Artifact Pack", 2500, 20, 1800)
            .guaranteed(Tier::Artifact)
            .extra_guaranteed(Tier::Legendary)
            .with_odds(boosted),
        BundleDefinition::new("divine", "Divine Pack", 5000, 30, 3600)
            .guaranteed(Tier::Artifact)
            .extra_guaranteed(Tier::Legendary)
            .with_odds(boosted),
    ]
}

/// One item handed to the player by a draw.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrawnItem {
    pub item: ItemId,
    pub name: String,
    pub tier: Tier,
    /// Came from a tier guarantee rather than the odds table.
    pub guaranteed: bool,
}

impl DrawnItem {
    pub fn from_definition(def: &ItemDefinition, guaranteed: bool) -> Self {
        Self {
            item: def.id,
            name: def.name.clone(),
            tier: def.tier,
            guaranteed,
        }
    }
}
