// Tier distribution (percent, Common..Artifact)
pub const BASE_TIER_WEIGHTS: [f64; 5] = [69.89, 20.0, 8.0, 2.0, 0.1];
pub const BOOSTED_TIER_WEIGHTS: [f64; 5] = [40.0, 25.0, 20.0, 13.0, 2.0];
pub const ULTRA_TIER_WEIGHTS: [f64; 5] = [20.0, 25.0, 30.0, 23.0, 2.0];
pub const BASIC_TIER_WEIGHTS: [f64; 5] = [80.0, 20.0, 0.0, 0.0, 0.0];
pub const TIER_TABLE_TOTAL: f64 = 100.0;

// Upgrades
pub const DEFAULT_UPGRADE_COST: u32 = 3;
pub const UPGRADE_BASE_XP: u64 = 50;
pub const UPGRADE_XP_PER_TIER_STEP: u64 = 25;

// Bundles
pub const BUNDLE_XP_DIVISOR: u64 = 10;

// Daily draw
pub const DAILY_DRAW_COOLDOWN_SECS: u64 = 2 * 60 * 60;
pub const DAILY_XP_BY_TIER: [u64; 5] = [10, 25, 50, 100, 250];
pub const DAILY_COINS_BY_TIER: [u64; 5] = [5, 10, 20, 50, 100];

// Exchange
pub const SELL_PRICE_BY_TIER: [u64; 5] = [15, 45, 120, 350, 1000];
pub const BUY_XP_COST_BY_TIER: [u64; 5] = [25, 75, 200, 500, 1000];

// Leveling: experience_for_level(n) = LEVEL_XP_FACTOR * (n - 1)^2
pub const LEVEL_XP_FACTOR: u64 = 50;

// Player defaults
pub const STARTING_COINS: u64 = 600;

// Battle
pub const LOADOUT_SIZE: usize = 5;
pub const BATTLE_COOLDOWN_SECS: u64 = 60 * 60;
pub const MAX_OPPONENT_LEVEL: u32 = 50;
pub const LOADOUT_POWER_BY_TIER: [u64; 5] = [200, 600, 1500, 3750, 9000];
pub const BATTLE_ROLL_LOW_PERCENT: u64 = 80;
pub const BATTLE_ROLL_HIGH_PERCENT: u64 = 120;
pub const OPPONENT_WINDOW: u32 = 2;

// Opponent curve: up to the threshold 80n + 10n^1.5, above it 120n + 15n^2.
pub const OPPONENT_CURVE_THRESHOLD: u32 = 30;
pub const OPPONENT_LOW_LINEAR: u64 = 80;
pub const OPPONENT_LOW_POW_FACTOR: f64 = 10.0;
pub const OPPONENT_HIGH_LINEAR: u64 = 120;
pub const OPPONENT_HIGH_SQUARE_FACTOR: u64 = 15;
pub const OPPONENT_HEALTH_PER_POWER: u64 = 2;
pub const OPPONENT_XP_PER_LEVEL: u64 = 2;
pub const OPPONENT_XP_FLAT: u64 = 10;
pub const OPPONENT_COINS_FLAT: u64 = 3;

// Activity windows (UTC hours, inclusive)
pub const NIGHT_START_HOUR: u32 = 22;
pub const NIGHT_END_HOUR: u32 = 6;
pub const MORNING_END_HOUR: u32 = 6;
pub const HOURS_PER_DAY: usize = 24;
