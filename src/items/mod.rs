//! Item system: tiers, catalog lookups, and weighted draws.

pub mod catalog;
pub mod distribution;
pub mod types;

pub use catalog::{Catalog, InMemoryCatalog};
pub use distribution::{
    draw_from_table, draw_item, draw_item_with_fallback, draw_tier, TierTable, TierTableError,
};
pub use types::{ItemDefinition, ItemId, Tier};
