//! Core types and definitions for the WS&IM turn-resolution engine.
//!
//! This crate defines the vocabulary shared across the engine: the hex
//! geometry primitives, the ship/game data model, the event log, and the
//! error taxonomy. It has no dependency on any transport, persistence, or
//! RNG implementation — those live in `wsim-engine`.

pub mod enums;
pub mod error;
pub mod events;
pub mod game;
pub mod hex;
pub mod orders;
pub mod ship;

pub use enums::*;
pub use error::{ExecutionError, ParseError, ValidationError};
pub use events::{DiceRoll, EventLogEntry};
pub use game::Game;
pub use hex::HexCoord;
pub use orders::{ShipOrders, TurnOrders};
pub use ship::Ship;
