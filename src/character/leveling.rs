//! Experience ↔ level mapping.
//!
//! `level = 1 + floor(sqrt(experience / 50))`, with inverse
//! `experience_for_level(n) = 50 * (n - 1)^2`. Integer arithmetic only, so the
//! round trip is exact for every level from 1 to [`MAX_LEVEL`].

use crate::core::constants::LEVEL_XP_FACTOR;

/// Floor of the square root, exact for all u64.
fn isqrt(n: u64) -> u64 {
    if n < 2 {
        return n;
    }
    let mut x = (n as f64).sqrt() as u64;
    // Correct the float estimate in either direction.
    while x.checked_mul(x).map_or(true, |sq| sq > n) {
        x -= 1;
    }
    while (x + 1).checked_mul(x + 1).is_some_and(|sq| sq <= n) {
        x += 1;
    }
    x
}

/// Highest level representable with u64 experience: `1 + isqrt(u64::MAX / 50)`.
pub const MAX_LEVEL: u32 = 607_400_100;

pub fn level_for_experience(experience: u64) -> u32 {
    let steps = isqrt(experience / LEVEL_XP_FACTOR);
    1 + steps.min(MAX_LEVEL as u64 - 1) as u32
}

/// Minimum experience at which `level` is reached. Levels 0 and 1 need none;
/// levels above [`MAX_LEVEL`] are treated as `MAX_LEVEL`.
pub fn experience_for_level(level: u32) -> u64 {
    if level <= 1 {
        return 0;
    }
    let steps = (level.min(MAX_LEVEL) - 1) as u64;
    LEVEL_XP_FACTOR * steps * steps
}

pub fn experience_to_next_level(experience: u64) -> u64 {
    let level = level_for_experience(experience);
    experience_for_level(level + 1).saturating_sub(experience)
}

/// Fraction (0.0..1.0) of the way from the current level to the next.
pub fn level_progress(experience: u64) -> f64 {
    let level = level_for_experience(experience);
    let floor = experience_for_level(level);
    let ceiling = experience_for_level(level + 1);
    if ceiling <= floor {
        return 0.0;
    }
    (experience - floor) as f64 / (ceiling - floor) as f64
}
