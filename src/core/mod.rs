//! Shared constants, errors, cooldown math, and the mutation vocabulary.

pub mod constants;
pub mod cooldown;
pub mod error;
pub mod mutation;

pub use cooldown::{cooldown_remaining, format_remaining};
pub use error::{DataIntegrityError, EngineError, EngineResult, PolicyViolation};
pub use mutation::{CatalogMutation, StateMutation};
