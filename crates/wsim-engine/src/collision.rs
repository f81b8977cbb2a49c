//! Collision detection, resolution, and the secondary fouling check (§4.5).

use std::collections::HashMap;

use indexmap::IndexMap;
use wsim_core::enums::GamePhase;
use wsim_core::error::ExecutionError;
use wsim_core::events::EventLogEntry;
use wsim_core::hex::HexCoord;
use wsim_core::ship::Ship;

use crate::rng::Rng;

/// How a collision at a hex was resolved. The `resolution_method` string is
/// the exact tag a collaborator matches against (Scenario C expects it to
/// start with `stationary_priority`).
pub struct CollisionResolution {
    pub hex: HexCoord,
    pub occupant: String,
    pub displaced: Vec<String>,
    pub resolution_method: String,
}

fn ship_hexes(ship: &Ship) -> [HexCoord; 2] {
    [ship.bow_hex, ship.stern_hex]
}

/// Map each occupied hex to the ship ids occupying it (bow and stern each
/// contribute an entry).
pub fn detect_hex_occupancy(ships: &IndexMap<String, Ship>) -> HashMap<HexCoord, Vec<String>> {
    let mut occupancy: HashMap<HexCoord, Vec<String>> = HashMap::new();
    for (id, ship) in ships {
        for hex in ship_hexes(ship) {
            occupancy.entry(hex).or_default().push(id.clone());
        }
    }
    occupancy
}

/// Hexes occupied by 2 or more distinct ships after movement.
pub fn detect_collisions(ships_after: &IndexMap<String, Ship>) -> HashMap<HexCoord, Vec<String>> {
    detect_hex_occupancy(ships_after)
        .into_iter()
        .filter(|(_, ids)| {
            let mut unique = ids.clone();
            unique.sort();
            unique.dedup();
            unique.len() >= 2
        })
        .collect()
}

/// Resolve a single collision hex per §4.5's branch logic.
pub fn resolve_collision(
    hex: HexCoord,
    ship_ids_at_hex: &[String],
    ships_before: &IndexMap<String, Ship>,
    rng: &mut dyn Rng,
) -> Result<CollisionResolution, ExecutionError> {
    let mut unique_ids = ship_ids_at_hex.to_vec();
    unique_ids.sort();
    unique_ids.dedup();

    if unique_ids.len() < 2 {
        return Err(ExecutionError::InsufficientCollisionParticipants {
            col: hex.col,
            row: hex.row,
        });
    }

    let (stationary, movers): (Vec<String>, Vec<String>) = unique_ids.into_iter().partition(|id| {
        let before = &ships_before[id];
        before.bow_hex == hex || before.stern_hex == hex
    });

    if stationary.len() == 1 && !movers.is_empty() {
        let occupant = stationary[0].clone();
        Ok(CollisionResolution {
            hex,
            occupant,
            displaced: movers,
            resolution_method: "stationary_priority".to_string(),
        })
    } else if stationary.is_empty() && movers.len() >= 2 {
        let roll = rng.roll_d6();
        let selected_index = roll as usize % movers.len();
        let occupant = movers[selected_index].clone();
        let displaced = movers
            .into_iter()
            .enumerate()
            .filter(|(i, _)| *i != selected_index)
            .map(|(_, id)| id)
            .collect();
        Ok(CollisionResolution {
            hex,
            occupant,
            displaced,
            resolution_method: format!("random_selection_d6={roll}"),
        })
    } else if stationary.len() >= 2 {
        let mut all = stationary;
        let occupant = all.remove(0);
        let mut displaced = all;
        displaced.extend(movers);
        Ok(CollisionResolution {
            hex,
            occupant,
            displaced,
            resolution_method: "multiple_stationary_fallback".to_string(),
        })
    } else {
        // Pathological: neither branch matched (e.g. zero stationary, one
        // mover). Should not occur given >=2 distinct ships at the hex, but
        // fall back rather than panic.
        let mut all = stationary;
        all.extend(movers);
        let occupant = all.remove(0);
        Ok(CollisionResolution {
            hex,
            occupant,
            displaced: all,
            resolution_method: "fallback".to_string(),
        })
    }
}

/// Restore displaced ships' pose (bow, stern, facing, drift counter) from
/// the pre-movement snapshot. `fouled` and other post-step state is left
/// as-is for the displaced ship — only pose is rolled back.
pub fn apply_collision_resolution(
    ships: &mut IndexMap<String, Ship>,
    resolution: &CollisionResolution,
    ships_before: &IndexMap<String, Ship>,
) {
    for ship_id in &resolution.displaced {
        let before = ships_before[ship_id].clone();
        if let Some(ship) = ships.get_mut(ship_id) {
            ship.bow_hex = before.bow_hex;
            ship.stern_hex = before.stern_hex;
            ship.facing = before.facing;
            ship.turns_without_bow_advance = before.turns_without_bow_advance;
        }
    }
}

/// Roll the fouling check for a collision. On 1-3, every involved ship is
/// fouled. Logged regardless of outcome.
pub fn check_and_apply_fouling(
    ships: &mut IndexMap<String, Ship>,
    involved: &[String],
    turn_number: u32,
    rng: &mut dyn Rng,
) -> EventLogEntry {
    let roll = rng.roll_d6();
    let fouled = roll <= 3;
    if fouled {
        for ship_id in involved {
            if let Some(ship) = ships.get_mut(ship_id) {
                ship.fouled = true;
            }
        }
    }
    EventLogEntry::new(
        turn_number,
        GamePhase::Movement,
        "fouling_check",
        if fouled {
            format!("Fouling check (d6={roll}): ships tangled")
        } else {
            format!("Fouling check (d6={roll}): no fouling")
        },
    )
    .with_metadata("involved_ship_ids", serde_json::to_value(involved).unwrap())
    .with_metadata("fouled", fouled)
    .with_modifier("roll", roll as i64)
}

/// Detect every collision in `ships_after`, resolve and apply each, run the
/// fouling check, and return the accumulated events.
pub fn detect_and_resolve_collisions(
    ships: &mut IndexMap<String, Ship>,
    ships_before: &IndexMap<String, Ship>,
    turn_number: u32,
    rng: &mut dyn Rng,
) -> Result<Vec<EventLogEntry>, ExecutionError> {
    let collisions = detect_collisions(ships);
    let mut events = Vec::new();

    // Sort by hex for deterministic event ordering regardless of HashMap
    // iteration order.
    let mut hexes: Vec<HexCoord> = collisions.keys().copied().collect();
    hexes.sort_by_key(|h| (h.col, h.row));

    for hex in hexes {
        let ship_ids = &collisions[&hex];
        let resolution = resolve_collision(hex, ship_ids, ships_before, rng)?;

        events.push(
            EventLogEntry::new(
                turn_number,
                GamePhase::Movement,
                "collision",
                format!(
                    "Collision at ({}, {}): {} occupies, {} displaced",
                    hex.col,
                    hex.row,
                    resolution.occupant,
                    resolution.displaced.len()
                ),
            )
            .with_metadata("resolution_method", resolution.resolution_method.clone())
            .with_metadata("occupant", resolution.occupant.clone())
            .with_metadata(
                "displaced",
                serde_json::to_value(&resolution.displaced).unwrap(),
            ),
        );

        apply_collision_resolution(ships, &resolution, ships_before);

        let mut involved = resolution.displaced.clone();
        involved.push(resolution.occupant.clone());
        events.push(check_and_apply_fouling(ships, &involved, turn_number, rng));
    }

    Ok(events)
}
