//! Typed failures returned by every engine operation.
//!
//! Business-rule refusals are [`PolicyViolation`]s and must never be retried
//! automatically. Broken references between player state and the catalog are
//! [`DataIntegrityError`]s; the caller decides whether to substitute or abort.

use crate::achievements::MilestoneId;
use crate::bundles::BundleId;
use crate::items::{ItemId, Tier};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PolicyViolation {
    #[error("cooldown active, {remaining_secs}s remaining")]
    CooldownActive { remaining_secs: u64 },

    #[error("insufficient coins: need {needed}, have {available}")]
    InsufficientFunds { needed: u64, available: u64 },

    #[error("insufficient experience: need {needed}, have {available}")]
    InsufficientExperience { needed: u64, available: u64 },

    #[error("insufficient quantity: need {needed}, have {available}")]
    InsufficientQuantity { needed: u32, available: u32 },

    #[error("{tier:?} is the terminal tier and cannot be upgraded")]
    TierIsTerminal { tier: Tier },

    #[error("loadout incomplete: {slots_filled} of 5 slots hold distinct owned items")]
    DeckIncomplete { slots_filled: usize },

    #[error("opponent level {level} is locked (unlocked up to {unlocked})")]
    OpponentLocked { level: u32, unlocked: u32 },

    #[error("reward already claimed")]
    AlreadyClaimed,

    #[error("campaign not completed")]
    NotCompleted,

    #[error("invalid loadout: {reason}")]
    InvalidLoadout { reason: String },

    #[error("unknown bundle '{id}'")]
    UnknownBundle { id: BundleId },

    #[error("milestone {id} already granted")]
    MilestoneAlreadyGranted { id: MilestoneId },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DataIntegrityError {
    #[error("item {id} not found in catalog")]
    UnknownItem { id: ItemId },

    #[error("item named '{name}' not found in catalog")]
    UnknownItemName { name: String },

    #[error("no active items of tier {tier:?}")]
    EmptyTier { tier: Tier },

    #[error("catalog has no active items")]
    EmptyCatalog,

    #[error("opponent level {level} is outside 1..=50")]
    InvalidOpponentLevel { level: u32 },

    #[error("cannot remove {needed} of item {item}: only {available} owned")]
    QuantityUnderflow {
        item: ItemId,
        needed: u32,
        available: u32,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error(transparent)]
    Policy(#[from] PolicyViolation),

    #[error(transparent)]
    DataIntegrity(#[from] DataIntegrityError),
}

impl EngineError {
    /// Returns the policy violation, if this is one.
    pub fn policy(&self) -> Option<&PolicyViolation> {
        match self {
            EngineError::Policy(p) => Some(p),
            EngineError::DataIntegrity(_) => None,
        }
    }

    pub fn is_policy(&self) -> bool {
        matches!(self, EngineError::Policy(_))
    }
}

pub type EngineResult<T> = Result<T, EngineError>;
