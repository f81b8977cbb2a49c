//! Enumeration types used throughout the engine.

use serde::{Deserialize, Serialize};

/// Compass facing. An ordered 8-element cycle used both for rotation
/// (`rotate_left`/`rotate_right` in [`crate::hex`]) and for broadside arc
/// construction. The grid has only 6 natural hex neighbours; the cycle has
/// 8 entries regardless — see design notes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Facing {
    N,
    NE,
    E,
    SE,
    S,
    SW,
    W,
    NW,
}

/// Direction the wind is blowing *from*. Same eight values as [`Facing`].
pub type WindDirection = Facing;

/// Broadside load state. MVP has no ammunition type beyond roundshot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum LoadState {
    #[default]
    Empty,
    Roundshot,
}

/// Which broadside (port/starboard) an action applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Broadside {
    L,
    R,
}

impl Broadside {
    pub fn other(self) -> Broadside {
        match self {
            Broadside::L => Broadside::R,
            Broadside::R => Broadside::L,
        }
    }
}

/// Where a broadside is aimed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AimPoint {
    Hull,
    Rigging,
}

/// Range classification that indexes the hit table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RangeBracket {
    Short,
    Medium,
    Long,
}

/// One of the two players.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    P1,
    P2,
}

impl Side {
    pub fn other(self) -> Side {
        match self {
            Side::P1 => Side::P2,
            Side::P2 => Side::P1,
        }
    }
}

/// Game-level phase. `Movement` is transient: no snapshot returned to a
/// caller is ever observed in this phase — it exists only as an
/// event-tagging value during `resolve_movement`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    #[default]
    Planning,
    Movement,
    Combat,
    Reload,
}

/// The three named victory-condition predicates over a `Game` snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VictoryCondition {
    FirstStruck,
    ScoreAfterTurns,
    FirstSideStruckTwoShips,
}

/// Outcome of a finished game. `Draw` only arises from `ScoreAfterTurns`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Winner {
    Side(Side),
    Draw,
}
