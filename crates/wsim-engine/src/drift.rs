//! Drift: mandatory downwind displacement for ships that have not advanced
//! their bow for two consecutive turns (§4.6).

use std::collections::HashMap;

use indexmap::IndexMap;
use wsim_core::enums::{GamePhase, WindDirection};
use wsim_core::events::EventLogEntry;
use wsim_core::hex::stern_from_bow;
use wsim_core::ship::Ship;

/// Update each ship's `turns_without_bow_advance` counter based on whether
/// its bow moved this turn.
pub fn update_drift_tracking(ships: &mut IndexMap<String, Ship>, ships_moved: &HashMap<String, bool>) {
    for (id, ship) in ships.iter_mut() {
        let bow_advanced = ships_moved.get(id).copied().unwrap_or(false);
        if bow_advanced {
            ship.turns_without_bow_advance = 0;
        } else {
            ship.turns_without_bow_advance += 1;
        }
    }
}

/// Apply drift to every ship whose counter has reached 2: displace one hex
/// downwind (opposite the wind direction), or leave in place and emit
/// `drift_blocked` if the displacement would go out of bounds.
pub fn apply_drift(
    ships: &mut IndexMap<String, Ship>,
    wind_direction: WindDirection,
    map_width: u32,
    map_height: u32,
    turn_number: u32,
) -> Vec<EventLogEntry> {
    let downwind = wind_direction.opposite();
    let mut events = Vec::new();

    // Stable order for determinism across runs given the same snapshot.
    let ids: Vec<String> = ships.keys().cloned().collect();
    for id in ids {
        let ship = &ships[&id];
        if ship.turns_without_bow_advance < 2 {
            continue;
        }

        let old_bow = ship.bow_hex;
        let old_stern = ship.stern_hex;
        let candidate_bow = old_bow.adjacent(downwind);
        let candidate_stern = old_stern.adjacent(downwind);

        let in_bounds = candidate_bow
            .map(|h| h.in_bounds(map_width, map_height))
            .unwrap_or(false)
            && candidate_stern
                .map(|h| h.in_bounds(map_width, map_height))
                .unwrap_or(false);

        if !in_bounds {
            events.push(
                EventLogEntry::new(
                    turn_number,
                    GamePhase::Movement,
                    "drift_blocked",
                    format!("Ship {id} would drift out of bounds; held in place"),
                )
                .with_metadata("ship_id", id.clone()),
            );
            continue;
        }

        let new_bow = candidate_bow.expect("checked in_bounds");
        let new_stern = candidate_stern.expect("checked in_bounds");

        let ship = ships.get_mut(&id).expect("ship exists");
        ship.bow_hex = new_bow;
        ship.stern_hex = stern_from_bow(new_bow, ship.facing).unwrap_or(new_stern);
        ship.turns_without_bow_advance = 0;

        events.push(
            EventLogEntry::new(
                turn_number,
                GamePhase::Movement,
                "drift",
                format!("Ship {id} drifted downwind"),
            )
            .with_metadata("ship_id", id)
            .with_metadata(
                "old_bow",
                serde_json::json!({"col": old_bow.col, "row": old_bow.row}),
            )
            .with_metadata(
                "new_bow",
                serde_json::json!({"col": new_bow.col, "row": new_bow.row}),
            ),
        );
    }

    events
}

/// Convenience wrapper combining tracking update and drift application.
pub fn check_and_apply_drift(
    ships: &mut IndexMap<String, Ship>,
    ships_moved: &HashMap<String, bool>,
    wind_direction: WindDirection,
    map_width: u32,
    map_height: u32,
    turn_number: u32,
) -> Vec<EventLogEntry> {
    update_drift_tracking(ships, ships_moved);
    apply_drift(ships, wind_direction, map_width, map_height, turn_number)
}
