//! Loadout battles against a fixed ladder of fifty opponents.

pub mod logic;
pub mod types;

pub use logic::{
    available_opponents, check_availability, fight, loadout_power, opponent_for_level,
    player_loadout_power, readiness, resolve, roll_power, set_loadout, slots_filled, Contest,
};
pub use types::{
    Band, BattleProgress, BattleReport, BattleResult, OpponentStats, Readiness, OPPONENT_NAMES,
};
