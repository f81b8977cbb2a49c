//! Simultaneous, step-interleaved movement execution (§4.4).

use std::collections::HashMap;

use indexmap::IndexMap;
use wsim_core::error::ExecutionError;
use wsim_core::hex::stern_from_bow;
use wsim_core::ship::Ship;

use crate::parser::{MovementAction, ParsedMovement};

/// Per-ship bookkeeping during simultaneous execution.
struct ShipMovementState {
    parsed: ParsedMovement,
    current_action_index: usize,
    hexes_moved_forward: u32,
    bow_advanced: bool,
}

impl ShipMovementState {
    fn new(parsed: ParsedMovement) -> Self {
        Self {
            parsed,
            current_action_index: 0,
            hexes_moved_forward: 0,
            bow_advanced: false,
        }
    }

    fn completed(&self) -> bool {
        self.current_action_index >= self.parsed.actions.len()
    }

    fn next_action(&self) -> Option<MovementAction> {
        self.parsed.actions.get(self.current_action_index).copied()
    }
}

/// Outcome of a simultaneous movement resolution.
pub struct MovementExecutionResult {
    /// Whether each ship's bow advanced at any point this turn.
    pub ships_moved: HashMap<String, bool>,
    pub total_actions_executed: usize,
}

/// Execute `movements` against `ships` simultaneously:
///
/// ```text
/// while any ship has actions remaining:
///   for each ship in iteration order of the input map:
///     pop the next action and apply it immediately
/// ```
///
/// Mutates `ships` in place. Bounds are validated per forward-movement
/// step; a step that would leave `[0, map_width) x [0, map_height)` is a
/// hard failure — the caller is responsible for restoring the
/// pre-movement snapshot on error, since this function does not roll back
/// partial progress itself.
pub fn execute_simultaneous_movement(
    ships: &mut IndexMap<String, Ship>,
    movements: &IndexMap<String, ParsedMovement>,
    map_width: u32,
    map_height: u32,
) -> Result<MovementExecutionResult, ExecutionError> {
    let mut states: IndexMap<String, ShipMovementState> = movements
        .iter()
        .map(|(id, parsed)| (id.clone(), ShipMovementState::new(parsed.clone())))
        .collect();

    let mut total_actions_executed = 0;

    loop {
        if states.values().all(ShipMovementState::completed) {
            break;
        }

        for (ship_id, state) in states.iter_mut() {
            let Some(action) = state.next_action() else {
                continue;
            };
            state.current_action_index += 1;
            total_actions_executed += 1;

            let ship = ships
                .get_mut(ship_id)
                .expect("movement supplied for unknown ship id");

            match action {
                MovementAction::TurnLeft => {
                    ship.facing = ship.facing.rotate_left();
                    ship.stern_hex =
                        stern_from_bow(ship.bow_hex, ship.facing).expect("bow in bounds");
                }
                MovementAction::TurnRight => {
                    ship.facing = ship.facing.rotate_right();
                    ship.stern_hex =
                        stern_from_bow(ship.bow_hex, ship.facing).expect("bow in bounds");
                }
                MovementAction::MoveForward(n) => {
                    state.hexes_moved_forward += n;
                    if state.hexes_moved_forward > state.parsed.total_forward_hexes {
                        // Redundant safeguard: parse-time validation already
                        // enforces the allowance, but malformed orders that
                        // bypass it must still be caught here.
                        return Err(ExecutionError::OutOfBounds {
                            ship_id: ship_id.clone(),
                            step: state.current_action_index,
                        });
                    }
                    for _ in 0..n {
                        let new_bow = ship.bow_hex.adjacent(ship.facing).ok_or_else(|| {
                            ExecutionError::OutOfBounds {
                                ship_id: ship_id.clone(),
                                step: state.current_action_index,
                            }
                        })?;
                        if !new_bow.in_bounds(map_width, map_height) {
                            return Err(ExecutionError::OutOfBounds {
                                ship_id: ship_id.clone(),
                                step: state.current_action_index,
                            });
                        }
                        ship.bow_hex = new_bow;
                        ship.stern_hex =
                            stern_from_bow(ship.bow_hex, ship.facing).expect("bow in bounds");
                        state.bow_advanced = true;
                    }
                }
                MovementAction::NoMovement => {}
            }
        }
    }

    let ships_moved = states
        .iter()
        .map(|(id, state)| (id.clone(), state.bow_advanced))
        .collect();

    Ok(MovementExecutionResult {
        ships_moved,
        total_actions_executed,
    })
}
