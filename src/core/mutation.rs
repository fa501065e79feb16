//! State changes returned by engine operations.
//!
//! Operations never persist anything. They hand back the list of
//! [`StateMutation`]s the caller must apply (in order, before the next
//! operation for the same player) and optional advisory
//! [`CatalogMutation`]s for the catalog collaborator.

use crate::achievements::MilestoneId;
use crate::bundles::BundleId;
use crate::campaigns::{CampaignId, CampaignProgress};
use crate::items::{ItemId, Tier};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum StateMutation {
    DebitCoins {
        amount: u64,
    },
    CreditCoins {
        amount: u64,
    },
    GrantExperience {
        amount: u64,
    },
    SpendExperience {
        amount: u64,
    },
    AddItem {
        item: ItemId,
        quantity: u32,
    },
    RemoveItem {
        item: ItemId,
        quantity: u32,
    },
    StampBundleCooldown {
        bundle: BundleId,
        at: DateTime<Utc>,
    },
    RecordBundlePurchase {
        cost: u64,
    },
    /// Feeds the time-of-day, streak and per-tier activity counters.
    RecordItemReceived {
        tier: Tier,
        at: DateTime<Utc>,
    },
    StampDailyDraw {
        at: DateTime<Utc>,
    },
    GrantMilestone {
        id: MilestoneId,
        points: u64,
    },
    RecordBattle {
        at: DateTime<Utc>,
        opponent_level: u32,
        won: bool,
    },
    SetLoadout {
        items: Vec<ItemId>,
    },
    SetCampaignProgress {
        campaign: CampaignId,
        progress: CampaignProgress,
    },
    RecordCampaignCompleted,
    RecordSale {
        proceeds: u64,
    },
}

/// Advisory statistics for the catalog. Not correctness-critical.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CatalogMutation {
    IncrementIssued { item: ItemId, delta: i64 },
    IncrementHolders { item: ItemId, delta: i64 },
}

/// Accumulates mutations while an operation walks its steps.
///
/// Tracks per-item quantity deltas so advisory holder counts stay correct
/// when one operation touches the same item more than once.
#[derive(Debug, Default)]
pub(crate) struct MutationLog {
    pub state: Vec<StateMutation>,
    pub catalog: Vec<CatalogMutation>,
}

impl MutationLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, mutation: StateMutation) {
        self.state.push(mutation);
    }

    /// Records a received unit. `owned_before` is the quantity held before
    /// this unit, counting anything already added in the same operation.
    pub fn receive_item(
        &mut self,
        item: ItemId,
        tier: Tier,
        owned_before: u32,
        at: DateTime<Utc>,
    ) {
        self.state.push(StateMutation::AddItem { item, quantity: 1 });
        self.state.push(StateMutation::RecordItemReceived { tier, at });
        self.catalog
            .push(CatalogMutation::IncrementIssued { item, delta: 1 });
        if owned_before == 0 {
            self.catalog
                .push(CatalogMutation::IncrementHolders { item, delta: 1 });
        }
    }

    pub fn remove_item(&mut self, item: ItemId, quantity: u32, owned_before: u32) {
        self.state.push(StateMutation::RemoveItem { item, quantity });
        self.catalog.push(CatalogMutation::IncrementIssued {
            item,
            delta: -(quantity as i64),
        });
        if owned_before == quantity {
            self.catalog
                .push(CatalogMutation::IncrementHolders { item, delta: -1 });
        }
    }

    pub fn into_parts(self) -> (Vec<StateMutation>, Vec<CatalogMutation>) {
        (self.state, self.catalog)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_receive_new_item_counts_holder() {
        let mut log = MutationLog::new();
        log.receive_item(ItemId(4), Tier::Rare, 0, Utc::now());
        let (state, catalog) = log.into_parts();
        assert_eq!(state.len(), 2);
        assert_eq!(
            catalog,
            vec![
                CatalogMutation::IncrementIssued {
                    item: ItemId(4),
                    delta: 1
                },
                CatalogMutation::IncrementHolders {
                    item: ItemId(4),
                    delta: 1
                },
            ]
        );
    }

    #[test]
    fn test_receive_duplicate_does_not_count_holder() {
        let mut log = MutationLog::new();
        log.receive_item(ItemId(4), Tier::Rare, 2, Utc::now());
        let (_, catalog) = log.into_parts();
        assert_eq!(catalog.len(), 1);
    }

    #[test]
    fn test_remove_last_units_drops_holder() {
        let mut log = MutationLog::new();
        log.remove_item(ItemId(9), 3, 3);
        let (state, catalog) = log.into_parts();
        assert_eq!(
            state,
            vec![StateMutation::RemoveItem {
                item: ItemId(9),
                quantity: 3
            }]
        );
        assert!(catalog.contains(&CatalogMutation::IncrementHolders {
            item: ItemId(9),
            delta: -1
        }));
    }
}
