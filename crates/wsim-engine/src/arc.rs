//! Broadside arc construction and the closest-target rule (§4.7).

use std::collections::HashSet;

use indexmap::IndexMap;
use wsim_core::enums::{Broadside, Facing, Side};
use wsim_core::hex::HexCoord;
use wsim_core::ship::Ship;

const DEFAULT_MAX_RANGE: u32 = 10;

/// The two primary directions perpendicular to `facing` on the given
/// broadside (port = L, starboard = R), and their neighbours in the
/// 8-cycle — three "primary" directions total, per §4.7 step 1.
fn broadside_directions(facing: Facing, broadside: Broadside) -> [Facing; 3] {
    let perpendicular = match broadside {
        Broadside::L => facing.rotate_left().rotate_left(),
        Broadside::R => facing.rotate_right().rotate_right(),
    };
    let (ccw, cw) = perpendicular.cycle_neighbours();
    [ccw, perpendicular, cw]
}

/// Trace a cone outward from `start` along `direction` up to `max_range`
/// hexes, widening beyond distance 1 by also including one hex stepped
/// further in each of the direction's two cycle-neighbours.
fn trace_arc_cone(start: HexCoord, direction: Facing, max_range: u32, arc_hexes: &mut HashSet<HexCoord>) {
    let mut current = start;
    for step in 1..=max_range {
        let Some(next) = current.adjacent(direction) else {
            break;
        };
        arc_hexes.insert(next);

        if step > 1 {
            let (ccw, cw) = direction.cycle_neighbours();
            if let Some(h) = next.adjacent(ccw) {
                arc_hexes.insert(h);
            }
            if let Some(h) = next.adjacent(cw) {
                arc_hexes.insert(h);
            }
        }

        current = next;
    }
}

/// Build the set of hexes covered by a ship's broadside arc.
pub fn broadside_arc_hexes(ship: &Ship, broadside: Broadside, max_range: u32) -> HashSet<HexCoord> {
    let mut arc_hexes = HashSet::new();
    for direction in broadside_directions(ship.facing, broadside) {
        trace_arc_cone(ship.bow_hex, direction, max_range, &mut arc_hexes);
    }
    arc_hexes.remove(&ship.bow_hex);
    arc_hexes
}

/// Whether `hex` falls in the ship's broadside arc.
pub fn is_hex_in_broadside_arc(ship: &Ship, broadside: Broadside, hex: HexCoord, max_range: u32) -> bool {
    broadside_arc_hexes(ship, broadside, max_range).contains(&hex)
}

/// The result of a broadside arc/targeting query.
pub struct ArcQuery {
    pub arc_hexes: HashSet<HexCoord>,
    pub ships_in_arc: Vec<String>,
    pub legal_targets: Vec<String>,
    pub closest_enemy_distance: Option<u32>,
}

/// Run a full arc/targeting query for `ship_id`'s `broadside`.
pub fn get_broadside_arc(
    ships: &IndexMap<String, Ship>,
    ship_id: &str,
    broadside: Broadside,
    max_range: u32,
) -> Option<ArcQuery> {
    let firing_ship = ships.get(ship_id)?;
    let arc_hexes = broadside_arc_hexes(firing_ship, broadside, max_range);

    let mut ships_in_arc = Vec::new();
    let mut candidates: Vec<(String, u32)> = Vec::new();

    for (id, ship) in ships {
        if id == ship_id {
            continue;
        }
        let in_arc = arc_hexes.contains(&ship.bow_hex) || arc_hexes.contains(&ship.stern_hex);
        if !in_arc {
            continue;
        }
        ships_in_arc.push(id.clone());

        if ship.side != firing_ship.side && !ship.struck {
            let distance = firing_ship.bow_hex.distance(ship.bow_hex);
            candidates.push((id.clone(), distance));
        }
    }

    let closest_enemy_distance = candidates.iter().map(|(_, d)| *d).min();
    let legal_targets = match closest_enemy_distance {
        Some(min_distance) => candidates
            .into_iter()
            .filter(|(_, d)| *d == min_distance)
            .map(|(id, _)| id)
            .collect(),
        None => Vec::new(),
    };

    Some(ArcQuery {
        arc_hexes,
        ships_in_arc,
        legal_targets,
        closest_enemy_distance,
    })
}

/// Whether `target_id` is a legal target for `firing_id`'s broadside.
pub fn is_legal_target(
    ships: &IndexMap<String, Ship>,
    firing_id: &str,
    broadside: Broadside,
    target_id: &str,
    max_range: u32,
) -> bool {
    get_broadside_arc(ships, firing_id, broadside, max_range)
        .map(|q| q.legal_targets.iter().any(|id| id == target_id))
        .unwrap_or(false)
}

pub fn default_max_range() -> u32 {
    DEFAULT_MAX_RANGE
}
