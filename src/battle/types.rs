use crate::core::constants::MAX_OPPONENT_LEVEL;
use crate::core::mutation::StateMutation;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Opponent names by level, 1-indexed.
pub const OPPONENT_NAMES: [&str; MAX_OPPONENT_LEVEL as usize] = [
    "Goblin", "Orc", "Troll", "Drake", "Imp", "Vampire", "Werewolf", "Zombie", "Skeleton",
    "Wraith", "Elemental", "Giant", "Cyclops", "Minotaur", "Chimera", "Harpy", "Centaur",
    "Pegasus", "Unicorn", "Phoenix", "Griffin", "Basilisk", "Kraken", "Leviathan", "Behemoth",
    "Hydra", "Medusa", "Siren", "Mermaid", "Triton", "Nereid", "Oceanid", "Naiad", "Dryad",
    "Nymph", "Fae", "Elf", "Dwarf", "Halfling", "Gnome", "Kobold", "Gnoll", "Bugbear", "Ogre",
    "Ettin", "Fomor", "Titan", "Demigod", "Archdemon", "Ancient One",
];

/// Difficulty band of an opponent level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Band {
    Easy,
    Normal,
    Hard,
    Boss,
}

impl Band {
    pub fn for_level(level: u32) -> Band {
        match level {
            0..=10 => Band::Easy,
            11..=25 => Band::Normal,
            26..=40 => Band::Hard,
            _ => Band::Boss,
        }
    }

    /// Power multiplier in percent.
    pub fn multiplier_percent(&self) -> u64 {
        match self {
            Band::Easy => 70,
            Band::Normal => 100,
            Band::Hard => 160,
            Band::Boss => 250,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Band::Easy => "Easy",
            Band::Normal => "Normal",
            Band::Hard => "Hard",
            Band::Boss => "Boss",
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            Band::Easy => "🟢",
            Band::Normal => "🟡",
            Band::Hard => "🔴",
            Band::Boss => "💀",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpponentStats {
    pub level: u32,
    pub name: String,
    pub band: Band,
    pub power: u64,
    pub health: u64,
    pub reward_experience: u64,
    pub reward_coins: u64,
}

/// Per-player battle bookkeeping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BattleProgress {
    /// Highest opponent level the player may fight.
    pub current_level: u32,
    pub battles_fought: u64,
    pub battles_won: u64,
    pub last_battle_at: Option<DateTime<Utc>>,
}

impl Default for BattleProgress {
    fn default() -> Self {
        Self {
            current_level: 1,
            battles_fought: 0,
            battles_won: 0,
            last_battle_at: None,
        }
    }
}

impl BattleProgress {
    /// A win at the frontier unlocks the next level.
    pub fn record(&mut self, at: DateTime<Utc>, opponent_level: u32, won: bool) {
        self.battles_fought += 1;
        self.last_battle_at = Some(at);
        if won {
            self.battles_won += 1;
            if opponent_level == self.current_level {
                self.current_level = (opponent_level + 1).min(MAX_OPPONENT_LEVEL);
            }
        }
    }

    pub fn win_rate(&self) -> f64 {
        if self.battles_fought == 0 {
            return 0.0;
        }
        self.battles_won as f64 / self.battles_fought as f64
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BattleResult {
    Victory,
    Defeat,
}

impl BattleResult {
    pub fn is_victory(&self) -> bool {
        matches!(self, BattleResult::Victory)
    }
}

/// Where a player stands in the fight cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Readiness {
    /// Fewer than five distinct owned items in the loadout.
    Ready { slots_filled: usize },
    /// Loadout complete, waiting out the cooldown.
    Eligible { remaining_secs: u64 },
    CanFight,
}

/// Everything a front end needs to render a fight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BattleReport {
    pub opponent: OpponentStats,
    pub result: BattleResult,
    pub loadout_power: u64,
    pub loadout_roll: u64,
    pub opponent_roll: u64,
    pub experience_gained: u64,
    pub coins_gained: u64,
    /// Set when the win opened a new opponent level.
    pub unlocked_level: Option<u32>,
    pub mutations: Vec<StateMutation>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_band_boundaries() {
        assert_eq!(Band::for_level(10), Band::Easy);
        assert_eq!(Band::for_level(11), Band::Normal);
        assert_eq!(Band::for_level(25), Band::Normal);
        assert_eq!(Band::for_level(26), Band::Hard);
        assert_eq!(Band::for_level(40), Band::Hard);
        assert_eq!(Band::for_level(41), Band::Boss);
    }

    #[test]
    fn test_names_are_unique() {
        let mut names = OPPONENT_NAMES.to_vec();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), OPPONENT_NAMES.len());
    }

    #[test]
    fn test_record_unlocks_only_at_frontier() {
        let at = Utc.with_ymd_and_hms(2024, 2, 2, 2, 0, 0).unwrap();
        let mut progress = BattleProgress::default();
        progress.record(at, 1, true);
        assert_eq!(progress.current_level, 2);

        // Replaying an older level does not advance.
        progress.record(at, 1, true);
        assert_eq!(progress.current_level, 2);

        progress.record(at, 2, false);
        assert_eq!(progress.current_level, 2);
        assert_eq!(progress.battles_fought, 3);
        assert_eq!(progress.battles_won, 2);
    }

    #[test]
    fn test_frontier_caps_at_max_level() {
        let mut progress = BattleProgress {
            current_level: MAX_OPPONENT_LEVEL,
            ..BattleProgress::default()
        };
        progress.record(Utc::now(), MAX_OPPONENT_LEVEL, true);
        assert_eq!(progress.current_level, MAX_OPPONENT_LEVEL);
    }
}
