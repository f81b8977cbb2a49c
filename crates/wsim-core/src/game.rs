//! The `Game` snapshot — the complete turn-resolution state.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::enums::{GamePhase, Side, VictoryCondition, WindDirection, Winner};
use crate::events::EventLogEntry;
use crate::orders::TurnOrders;
use crate::ship::Ship;

/// A complete, serializable snapshot of one game in progress. The engine
/// owns this exclusively during a resolution call; between calls it is
/// immutable from the engine's perspective.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Game {
    pub turn_number: u32,
    pub phase: GamePhase,
    pub map_width: u32,
    pub map_height: u32,
    pub wind_direction: WindDirection,

    /// Ships keyed by id. Backed by `IndexMap` so iteration order is
    /// insertion order — load-bearing for the iteration-order-dependent
    /// victory checks and movement-execution stepping order (see §9).
    pub ships: IndexMap<String, Ship>,

    #[serde(default)]
    pub p1_orders: Option<TurnOrders>,
    #[serde(default)]
    pub p2_orders: Option<TurnOrders>,

    #[serde(default)]
    pub event_log: Vec<EventLogEntry>,

    #[serde(default)]
    pub turn_limit: Option<u32>,
    pub victory_condition: VictoryCondition,

    #[serde(default)]
    pub game_ended: bool,
    #[serde(default)]
    pub winner: Option<Winner>,
}

impl Game {
    pub fn get_ship(&self, ship_id: &str) -> Option<&Ship> {
        self.ships.get(ship_id)
    }

    pub fn get_ship_mut(&mut self, ship_id: &str) -> Option<&mut Ship> {
        self.ships.get_mut(ship_id)
    }

    pub fn ships_by_side(&self, side: Side) -> impl Iterator<Item = &Ship> {
        self.ships.values().filter(move |s| s.side == side)
    }

    pub fn add_event(&mut self, event: EventLogEntry) {
        self.event_log.push(event);
    }

    pub fn orders_for(&self, side: Side) -> Option<&TurnOrders> {
        match side {
            Side::P1 => self.p1_orders.as_ref(),
            Side::P2 => self.p2_orders.as_ref(),
        }
    }
}
