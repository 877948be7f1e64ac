//! Fatal, programmer-facing errors.
//!
//! These indicate a bug in calling or configuration code, never a
//! reachable player action. Expected-flow rejections (bad command, wrong
//! turn) are plain values, see `combat::session::CommandRejection`.

use crate::mode::GameMode;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// A monster kind was requested that is not in the bestiary. This is
    /// a configuration error and should surface at construction time.
    #[error("Unknown monster type: {0}")]
    UnknownMonsterType(String),

    /// A mode transition outside the whitelist was attempted.
    #[error("Invalid transition from {from} to {to}")]
    InvalidTransition { from: GameMode, to: GameMode },
}
