//! Catalog lookups consumed by the engine.
//!
//! The engine only reads the catalog. Advisory statistics flow back as
//! [`CatalogMutation`]s that the collaborator applies on its own schedule.

use super::types::{ItemDefinition, ItemId, Tier};
use crate::core::mutation::CatalogMutation;
use serde::{Deserialize, Serialize};

/// Read-only item lookup. Inactive items are never returned by tier queries.
pub trait Catalog {
    fn items_by_tier(&self, tier: Tier) -> Vec<&ItemDefinition>;
    fn item(&self, id: ItemId) -> Option<&ItemDefinition>;
    fn item_by_name(&self, name: &str) -> Option<&ItemDefinition>;
    fn active_items(&self) -> Vec<&ItemDefinition>;

    fn active_count(&self) -> usize {
        self.active_items().len()
    }
}

impl<C: Catalog + ?Sized> Catalog for &C {
    fn items_by_tier(&self, tier: Tier) -> Vec<&ItemDefinition> {
        (**self).items_by_tier(tier)
    }

    fn item(&self, id: ItemId) -> Option<&ItemDefinition> {
        (**self).item(id)
    }

    fn item_by_name(&self, name: &str) -> Option<&ItemDefinition> {
        (**self).item_by_name(name)
    }

    fn active_items(&self) -> Vec<&ItemDefinition> {
        (**self).active_items()
    }
}

/// Vec-backed catalog used by tests, the simulator, and small deployments.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InMemoryCatalog {
    items: Vec<ItemDefinition>,
}

impl InMemoryCatalog {
    pub fn new(items: Vec<ItemDefinition>) -> Self {
        Self { items }
    }

    pub fn from_json_str(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// Inserts or replaces the definition with the same id.
    pub fn insert(&mut self, item: ItemDefinition) {
        match self.items.iter_mut().find(|i| i.id == item.id) {
            Some(existing) => *existing = item,
            None => self.items.push(item),
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Applies an advisory statistics update. Unknown ids are ignored.
    pub fn apply(&mut self, mutation: &CatalogMutation) {
        match *mutation {
            CatalogMutation::IncrementIssued { item, delta } => {
                if let Some(def) = self.items.iter_mut().find(|i| i.id == item) {
                    def.total_issued = (def.total_issued + delta).max(0);
                }
            }
            CatalogMutation::IncrementHolders { item, delta } => {
                if let Some(def) = self.items.iter_mut().find(|i| i.id == item) {
                    def.unique_holders = (def.unique_holders + delta).max(0);
                }
            }
        }
    }

    pub fn apply_all(&mut self, mutations: &[CatalogMutation]) {
        for m in mutations {
            self.apply(m);
        }
    }

    /// A small catalog with a few items in every tier.
    pub fn sample() -> Self {
        let names: [(&str, Tier); 15] = [
            ("Mossback Toad", Tier::Common),
            ("Alley Cat", Tier::Common),
            ("Rusty Golem", Tier::Common),
            ("Lantern Moth", Tier::Common),
            ("Glass Heron", Tier::Rare),
            ("Copper Wyrm", Tier::Rare),
            ("Tide Caller", Tier::Rare),
            ("Ember Fox", Tier::Epic),
            ("Storm Drake", Tier::Epic),
            ("Night Regent", Tier::Epic),
            ("Sunforged Lion", Tier::Legendary),
            ("Frost Empress", Tier::Legendary),
            ("Void Leviathan", Tier::Legendary),
            ("Crown of Ages", Tier::Artifact),
            ("First Star", Tier::Artifact),
        ];
        let items = names
            .iter()
            .enumerate()
            .map(|(i, (name, tier))| ItemDefinition::new(i as u32 + 1, *name, *tier))
            .collect();
        Self::new(items)
    }
}

impl Catalog for InMemoryCatalog {
    fn items_by_tier(&self, tier: Tier) -> Vec<&ItemDefinition> {
        self.items
            .iter()
            .filter(|i| i.active && i.tier == tier)
            .collect()
    }

    fn item(&self, id: ItemId) -> Option<&ItemDefinition> {
        self.items.iter().find(|i| i.id == id)
    }

    fn item_by_name(&self, name: &str) -> Option<&ItemDefinition> {
        let wanted = name.trim().to_lowercase();
        self.items.iter().find(|i| i.name.to_lowercase() == wanted)
    }

    fn active_items(&self) -> Vec<&ItemDefinition> {
        self.items.iter().filter(|i| i.active).collect()
    }
}
