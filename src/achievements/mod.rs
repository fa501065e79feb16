//! Milestone system.
//!
//! Milestones are declarative rules over the player snapshot. Evaluation is
//! pure: it returns the grants, and the caller persists them by applying
//! [`grant_mutations`].

pub mod data;
pub mod logic;
pub mod types;

pub use data::{default_milestones, get_milestone, milestones_by_category};
pub use logic::{evaluate, grant_mutations, progress, record_grants, summary, visible_milestones};
pub use types::{
    Category, Condition, Difficulty, Grant, MilestoneDefinition, MilestoneId, MilestoneProgress,
    MilestoneStats, MilestoneSummary, Reward,
};
