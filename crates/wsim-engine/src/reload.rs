//! Reload phase: every fired broadside goes from EMPTY to ROUNDSHOT (§4.10).

use indexmap::IndexMap;
use wsim_core::enums::{Broadside, GamePhase, LoadState};
use wsim_core::events::EventLogEntry;
use wsim_core::ship::Ship;

/// Mark a broadside as fired (EMPTY) after it has discharged.
pub fn mark_broadside_fired(ship: &mut Ship, broadside: Broadside) {
    match broadside {
        Broadside::L => ship.load_l = LoadState::Empty,
        Broadside::R => ship.load_r = LoadState::Empty,
    }
}

/// Reload a single broadside if it is empty. Returns whether it changed.
pub fn reload_broadside(ship: &mut Ship, broadside: Broadside) -> bool {
    let slot = match broadside {
        Broadside::L => &mut ship.load_l,
        Broadside::R => &mut ship.load_r,
    };
    if *slot == LoadState::Empty {
        *slot = LoadState::Roundshot;
        true
    } else {
        false
    }
}

/// Per-ship reload outcome.
pub struct ReloadResult {
    pub ship_id: String,
    pub reloaded_l: bool,
    pub reloaded_r: bool,
}

impl ReloadResult {
    pub fn summary(&self) -> String {
        match (self.reloaded_l, self.reloaded_r) {
            (true, true) => "L, R reloaded".to_string(),
            (true, false) => "L reloaded".to_string(),
            (false, true) => "R reloaded".to_string(),
            (false, false) => "No reloading needed".to_string(),
        }
    }
}

/// Reload both broadsides of `ship`.
pub fn reload_ship(ship: &mut Ship) -> ReloadResult {
    let reloaded_l = reload_broadside(ship, Broadside::L);
    let reloaded_r = reload_broadside(ship, Broadside::R);
    ReloadResult {
        ship_id: ship.id.clone(),
        reloaded_l,
        reloaded_r,
    }
}

/// Reload every non-struck ship and return one event per ship.
pub fn reload_all_ships(ships: &mut IndexMap<String, Ship>, turn_number: u32) -> Vec<EventLogEntry> {
    let mut events = Vec::new();
    for ship in ships.values_mut() {
        if ship.struck {
            continue;
        }
        let result = reload_ship(ship);
        events.push(create_reload_event(turn_number, &result));
    }
    events
}

pub fn create_reload_event(turn_number: u32, result: &ReloadResult) -> EventLogEntry {
    EventLogEntry::new(turn_number, GamePhase::Reload, "reload", format!("{}: {}", result.ship_id, result.summary()))
        .with_metadata("ship_id", result.ship_id.clone())
        .with_metadata("reloaded_l", result.reloaded_l)
        .with_metadata("reloaded_r", result.reloaded_r)
}
