//! Turn-resolution algorithms for a deterministic, snapshot-in/snapshot-out
//! naval combat engine. `wsim-core` owns the data model; this crate owns
//! every stateful rule: movement parsing and execution, collisions, drift,
//! firing arcs, table-driven combat, damage, reload, victory, and the
//! phase-driver operations that tie them together.

pub mod arc;
pub mod collision;
pub mod combat;
pub mod damage;
pub mod drift;
pub mod executor;
pub mod parser;
pub mod phase;
pub mod reload;
pub mod rng;
pub mod victory;

pub use wsim_core as core;

pub use combat::{HitResult, HitTables};
pub use phase::{
    advance_turn, fire_broadside, get_broadside_arc, mark_ready, resolve_movement, resolve_reload, submit_orders,
    EngineError,
};
pub use rng::{Rng, SeededRng, UnseededRng};
