//! Upgrade chain: copies of one item become one item of the next tier.

pub mod logic;
pub mod types;

pub use logic::{upgrade, upgrade_by_name};
pub use types::{upgrade_bonus_experience, UpgradeOutcome};
