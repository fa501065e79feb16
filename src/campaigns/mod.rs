//! Time-boxed campaigns with recomputed progress and single-use rewards.

pub mod logic;
pub mod types;

pub use logic::{claim_reward, leaderboard, metric_value, refresh_active, update_progress};
pub use types::{
    CampaignDefinition, CampaignId, CampaignProgress, CampaignReward, ClaimOutcome,
    ProgressUpdate, TargetMetric,
};
