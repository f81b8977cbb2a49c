//! Error taxonomy (§7). Every variant is a deterministic function of its
//! inputs; none of these are ever raised mid-mutation — a resolution either
//! succeeds fully or leaves the prior snapshot untouched.

use crate::enums::{GamePhase, Side};

/// Movement notation is malformed. Raised by the parser; no state change.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("invalid character {ch:?} at position {position} in movement notation")]
    InvalidCharacter { ch: char, position: usize },

    #[error("'0' may only appear as the entire movement notation, found at position {position}")]
    ZeroNotExclusive { position: usize },

    #[error("empty movement notation")]
    Empty,

    #[error("total forward hexes {total} exceeds battle sail speed {allowance} for ship {ship_id}")]
    ExceedsAllowance {
        ship_id: String,
        total: u32,
        allowance: u32,
    },
}

/// Orders, firing requests, or targets were rejected against the current
/// game state. Raised by validation; no state change. Unknown ship/game
/// ids also surface through this enum's `NotFound` variant.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("wrong phase: expected {expected:?}, got {actual:?}")]
    WrongPhase { expected: GamePhase, actual: GamePhase },

    #[error("turn mismatch: game is on turn {game_turn}, request was for turn {requested_turn}")]
    TurnMismatch { game_turn: u32, requested_turn: u32 },

    #[error("orders for side {expected:?} do not match submitting side {actual:?}")]
    WrongSide { expected: Side, actual: Side },

    #[error("orders must cover exactly {expected:?}'s ships; missing {missing:?}, extra {extra:?}")]
    ShipSetMismatch {
        expected: Side,
        missing: Vec<String>,
        extra: Vec<String>,
    },

    #[error("both sides must submit orders before movement can resolve")]
    OrdersNotSubmitted,

    #[error("ship {ship_id} cannot fire broadside {broadside:?}: {reason}")]
    CannotFireBroadside { ship_id: String, broadside: String, reason: String },

    #[error("ship {target_id} is not a legal target for ship {firing_id}'s {broadside:?} broadside")]
    IllegalTarget {
        firing_id: String,
        target_id: String,
        broadside: String,
    },

    #[error("game {game_id} has already ended")]
    GameEnded { game_id: String },

    #[error("ship {ship_id} not found")]
    ShipNotFound { ship_id: String },

    #[error("game {game_id} not found")]
    GameNotFound { game_id: String },
}

/// An internal invariant was violated, or a movement/drift would take a
/// ship out of bounds. Movement going out of bounds is a hard failure per
/// §4.4 — no truncation, the whole resolution is atomic.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExecutionError {
    #[error("ship {ship_id} would move out of bounds at step {step}")]
    OutOfBounds { ship_id: String, step: usize },

    #[error("resolve_collision called with fewer than 2 ships at hex ({col}, {row})")]
    InsufficientCollisionParticipants { col: u32, row: u32 },

    #[error("unknown victory condition type")]
    UnknownVictoryCondition,
}
