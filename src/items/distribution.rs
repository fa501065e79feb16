//! Weighted tier selection and uniform item selection within a tier.

use super::catalog::Catalog;
use super::types::{ItemDefinition, Tier};
use crate::core::constants::{
    BASE_TIER_WEIGHTS, BASIC_TIER_WEIGHTS, BOOSTED_TIER_WEIGHTS, TIER_TABLE_TOTAL,
    ULTRA_TIER_WEIGHTS,
};
use crate::core::error::DataIntegrityError;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum TierTableError {
    #[error("weight for {tier} must be finite and non-negative, got {value}")]
    InvalidWeight { tier: Tier, value: f64 },
    #[error("tier weights must not all be zero")]
    ZeroTotal,
}

/// Probability table over the five tiers, in tier order.
///
/// Weights are percentages. Tables that do not sum to exactly 100 are
/// renormalised at draw time, so `[70, 20, 8, 2, 0.1]` behaves as its
/// proportional equivalent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "[f64; 5]", into = "[f64; 5]")]
pub struct TierTable {
    weights: [f64; 5],
}

impl TierTable {
    pub fn new(weights: [f64; 5]) -> Result<Self, TierTableError> {
        for (i, &value) in weights.iter().enumerate() {
            if !value.is_finite() || value < 0.0 {
                return Err(TierTableError::InvalidWeight {
                    tier: Tier::ALL[i],
                    value,
                });
            }
        }
        if weights.iter().sum::<f64>() <= 0.0 {
            return Err(TierTableError::ZeroTotal);
        }
        Ok(Self { weights })
    }

    /// Production odds for unboosted draws.
    pub fn base() -> Self {
        Self {
            weights: BASE_TIER_WEIGHTS,
        }
    }

    /// Odds used by premium bundles.
    pub fn boosted() -> Self {
        Self {
            weights: BOOSTED_TIER_WEIGHTS,
        }
    }

    /// Odds used by the ultra bundle.
    pub fn ultra() -> Self {
        Self {
            weights: ULTRA_TIER_WEIGHTS,
        }
    }

    /// Common/Rare only, used by the basic bundle.
    pub fn basic() -> Self {
        Self {
            weights: BASIC_TIER_WEIGHTS,
        }
    }

    pub fn weights(&self) -> [f64; 5] {
        self.weights
    }

    pub fn total(&self) -> f64 {
        self.weights.iter().sum()
    }

    pub fn weight(&self, tier: Tier) -> f64 {
        self.weights[tier.index()]
    }

    /// Effective probability of `tier` in percent after renormalisation.
    pub fn percent(&self, tier: Tier) -> f64 {
        self.weight(tier) / self.total() * TIER_TABLE_TOTAL
    }

    /// Same odds rescaled so the weights sum to exactly 100.
    pub fn normalized(&self) -> Self {
        let total = self.total();
        let mut weights = self.weights;
        for w in weights.iter_mut() {
            *w = *w / total * TIER_TABLE_TOTAL;
        }
        Self { weights }
    }

    pub fn sums_to_hundred(&self) -> bool {
        (self.total() - TIER_TABLE_TOTAL).abs() < 1e-9
    }

    /// Highest tier with a non-zero weight.
    fn last_live_tier(&self) -> Tier {
        Tier::ALL
            .iter()
            .rev()
            .copied()
            .find(|t| self.weight(*t) > 0.0)
            .unwrap_or(Tier::Common)
    }
}

impl Default for TierTable {
    fn default() -> Self {
        Self::base()
    }
}

impl TryFrom<[f64; 5]> for TierTable {
    type Error = TierTableError;

    fn try_from(weights: [f64; 5]) -> Result<Self, Self::Error> {
        TierTable::new(weights)
    }
}

impl From<TierTable> for [f64; 5] {
    fn from(table: TierTable) -> Self {
        table.weights
    }
}

/// Samples a tier with one uniform roll against cumulative boundaries.
pub fn draw_tier(table: &TierTable, rng: &mut impl Rng) -> Tier {
    let normalized = table.normalized();
    let roll = rng.gen::<f64>() * TIER_TABLE_TOTAL;

    let mut cumulative = 0.0;
    for tier in Tier::ALL {
        let weight = normalized.weight(tier);
        if weight <= 0.0 {
            continue;
        }
        cumulative += weight;
        if roll < cumulative {
            return tier;
        }
    }
    // Float rounding can leave the roll just past the last boundary.
    table.last_live_tier()
}

/// Uniformly picks an active catalog item of exactly `tier`.
pub fn draw_item<'c, C: Catalog>(
    catalog: &'c C,
    tier: Tier,
    rng: &mut impl Rng,
) -> Result<&'c ItemDefinition, DataIntegrityError> {
    catalog
        .items_by_tier(tier)
        .choose(rng)
        .copied()
        .ok_or(DataIntegrityError::EmptyTier { tier })
}

/// Like [`draw_item`], but an empty tier falls back to the lowest non-empty tier.
pub fn draw_item_with_fallback<'c, C: Catalog>(
    catalog: &'c C,
    tier: Tier,
    rng: &mut impl Rng,
) -> Result<&'c ItemDefinition, DataIntegrityError> {
    match draw_item(catalog, tier, rng) {
        Ok(item) => Ok(item),
        Err(DataIntegrityError::EmptyTier { .. }) => {
            let fallback = Tier::ALL
                .iter()
                .copied()
                .find(|t| !catalog.items_by_tier(*t).is_empty())
                .ok_or(DataIntegrityError::EmptyCatalog)?;
            tracing::warn!(requested = %tier, fallback = %fallback, "empty tier, falling back");
            draw_item(catalog, fallback, rng)
        }
        Err(e) => Err(e),
    }
}

/// Draws a tier from `table`, then an item of that tier (with fallback).
pub fn draw_from_table<'c, C: Catalog>(
    catalog: &'c C,
    table: &TierTable,
    rng: &mut impl Rng,
) -> Result<&'c ItemDefinition, DataIntegrityError> {
    let tier = draw_tier(table, rng);
    tracing::debug!(tier = %tier, "tier drawn");
    draw_item_with_fallback(catalog, tier, rng)
}
