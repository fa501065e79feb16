//! Cardkeep - collectible card progression engine.
//!
//! Decides what a player receives from random draws, how copies upgrade into
//! better items, how experience maps to level, which milestones are earned,
//! how loadout battles resolve and how campaign progress is tracked.
//!
//! Every operation is a function of a [`PlayerState`] snapshot, a catalog, a
//! caller-supplied `now` and an injected RNG. Results carry the
//! [`StateMutation`]s to persist; nothing here performs I/O apart from
//! [`EngineConfig::load`].

pub mod achievements;
pub mod battle;
pub mod bundles;
pub mod campaigns;
pub mod character;
pub mod config;
pub mod core;
pub mod engine;
pub mod items;
pub mod simulator;
pub mod upgrade;

pub use character::PlayerState;
pub use config::{ConfigError, EngineConfig};
pub use crate::core::{CatalogMutation, EngineError, EngineResult, StateMutation};
pub use engine::Engine;
pub use items::{Catalog, InMemoryCatalog, ItemDefinition, ItemId, Tier};
