//! Player snapshot and the experience curve.

pub mod leveling;
pub mod player;

pub use leveling::{experience_for_level, experience_to_next_level, level_for_experience, level_progress};
pub use player::{ActivityStats, PlayerId, PlayerState};
