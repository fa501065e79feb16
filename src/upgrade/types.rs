use crate::bundles::DrawnItem;
use crate::core::constants::{UPGRADE_BASE_XP, UPGRADE_XP_PER_TIER_STEP};
use crate::core::mutation::{CatalogMutation, StateMutation};
use crate::items::{ItemId, Tier};
use serde::{Deserialize, Serialize};

/// Bonus experience for an upgrade that produces an item of `target`.
/// Grows with the target tier.
pub fn upgrade_bonus_experience(target: Tier) -> u64 {
    UPGRADE_BASE_XP + target.index() as u64 * UPGRADE_XP_PER_TIER_STEP
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpgradeOutcome {
    pub consumed: ItemId,
    pub consumed_quantity: u32,
    pub from_tier: Tier,
    pub created: DrawnItem,
    pub experience_gained: u64,
    pub mutations: Vec<StateMutation>,
    pub catalog_mutations: Vec<CatalogMutation>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bonus_experience_increases_with_tier() {
        assert_eq!(upgrade_bonus_experience(Tier::Rare), 75);
        assert_eq!(upgrade_bonus_experience(Tier::Artifact), 150);
        for pair in Tier::ALL.windows(2) {
            assert!(upgrade_bonus_experience(pair[1]) > upgrade_bonus_experience(pair[0]));
        }
    }
}
