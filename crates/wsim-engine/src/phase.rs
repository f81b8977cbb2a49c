//! Phase-driver operations: the public surface a caller drives a `Game`
//! through (§4.12, §6). Each operation validates the current phase and
//! turn before mutating anything; a rejected call leaves the snapshot
//! untouched.

use indexmap::IndexMap;
use tracing::{debug, debug_span};

use wsim_core::enums::{AimPoint, Broadside, GamePhase, Side, VictoryCondition};
use wsim_core::error::{ExecutionError, ParseError, ValidationError};
use wsim_core::game::Game;
use wsim_core::orders::TurnOrders;

use crate::arc::{self, ArcQuery};
use crate::collision;
use crate::combat::{self, HitResult, HitTables};
use crate::damage;
use crate::drift;
use crate::executor;
use crate::parser::{self, ParsedMovement};
use crate::reload;
use crate::rng::Rng;
use crate::victory;

/// Any failure a phase-driver operation can raise.
#[derive(Debug, Clone, thiserror::Error)]
pub enum EngineError {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Execution(#[from] ExecutionError),
}

fn require_phase(game: &Game, expected: GamePhase) -> Result<(), ValidationError> {
    if game.phase != expected {
        return Err(ValidationError::WrongPhase {
            expected,
            actual: game.phase,
        });
    }
    Ok(())
}

fn require_not_ended(game: &Game, game_id: &str) -> Result<(), ValidationError> {
    if game.game_ended {
        return Err(ValidationError::GameEnded {
            game_id: game_id.to_string(),
        });
    }
    Ok(())
}

/// Submit one side's orders for the current turn. Requires `Planning` and
/// an order set that covers exactly that side's ships.
pub fn submit_orders(game: &mut Game, game_id: &str, mut orders: TurnOrders) -> Result<(), ValidationError> {
    let _span = debug_span!("submit_orders", side = ?orders.side, turn = orders.turn_number).entered();
    require_not_ended(game, game_id)?;
    require_phase(game, GamePhase::Planning)?;

    if orders.turn_number != game.turn_number {
        return Err(ValidationError::TurnMismatch {
            game_turn: game.turn_number,
            requested_turn: orders.turn_number,
        });
    }

    let expected: Vec<String> = game.ships_by_side(orders.side).map(|s| s.id.clone()).collect();
    let submitted: Vec<String> = orders.orders.iter().map(|o| o.ship_id.clone()).collect();

    let missing: Vec<String> = expected.iter().filter(|id| !submitted.contains(id)).cloned().collect();
    let extra: Vec<String> = submitted.iter().filter(|id| !expected.contains(id)).cloned().collect();
    if !missing.is_empty() || !extra.is_empty() {
        return Err(ValidationError::ShipSetMismatch {
            expected: orders.side,
            missing,
            extra,
        });
    }

    orders.submitted = true;
    match orders.side {
        Side::P1 => game.p1_orders = Some(orders),
        Side::P2 => game.p2_orders = Some(orders),
    }
    debug!("orders accepted");
    Ok(())
}

/// Mark a side's already-submitted orders as ready to resolve. Idempotent.
pub fn mark_ready(game: &mut Game, side: Side) -> Result<(), ValidationError> {
    let _span = debug_span!("mark_ready", ?side).entered();
    let orders = match side {
        Side::P1 => game.p1_orders.as_mut(),
        Side::P2 => game.p2_orders.as_mut(),
    };
    match orders {
        Some(o) => {
            o.submitted = true;
            Ok(())
        }
        None => Err(ValidationError::OrdersNotSubmitted),
    }
}

/// Resolve the movement phase: parse both sides' orders, execute them
/// simultaneously, apply drift, and resolve collisions. Transitions
/// `Planning -> Combat` (passing through the transient `Movement` phase).
pub fn resolve_movement(game: &mut Game, game_id: &str, rng: &mut dyn Rng) -> Result<(), EngineError> {
    let _span = debug_span!("resolve_movement", turn = game.turn_number).entered();
    require_not_ended(game, game_id)?;
    require_phase(game, GamePhase::Planning)?;

    let p1 = game.p1_orders.clone().ok_or(ValidationError::OrdersNotSubmitted)?;
    let p2 = game.p2_orders.clone().ok_or(ValidationError::OrdersNotSubmitted)?;
    if !p1.submitted || !p2.submitted {
        return Err(ValidationError::OrdersNotSubmitted.into());
    }

    let mut movements: IndexMap<String, ParsedMovement> = IndexMap::new();
    for orders in [&p1, &p2] {
        for ship_orders in &orders.orders {
            let parsed = parser::parse_movement(&ship_orders.movement)?;
            let ship = game
                .get_ship(&ship_orders.ship_id)
                .ok_or_else(|| ValidationError::ShipNotFound {
                    ship_id: ship_orders.ship_id.clone(),
                })?;
            parser::validate_movement_within_allowance(&ship_orders.ship_id, &parsed, ship.battle_sail_speed)?;
            movements.insert(ship_orders.ship_id.clone(), parsed);
        }
    }

    // `Movement` is transient and never observed in a returned snapshot
    // (see the phase's doc comment in `enums.rs`), so resolution runs
    // against a scratch copy of the ship arena and only commits into
    // `game` once every step has succeeded. On an `ExecutionError` from
    // either call below, `game.ships` and `game.phase` are left
    // completely untouched — the prior snapshot, not a partial one.
    let ships_before = game.ships.clone();
    let mut ships = ships_before.clone();

    let result = executor::execute_simultaneous_movement(&mut ships, &movements, game.map_width, game.map_height)?;
    debug!(actions = result.total_actions_executed, "movement executed");

    let drift_events = drift::check_and_apply_drift(
        &mut ships,
        &result.ships_moved,
        game.wind_direction,
        game.map_width,
        game.map_height,
        game.turn_number,
    );

    let collision_events = collision::detect_and_resolve_collisions(&mut ships, &ships_before, game.turn_number, rng)?;

    game.ships = ships;
    for event in drift_events.into_iter().chain(collision_events) {
        game.add_event(event);
    }

    game.p1_orders = None;
    game.p2_orders = None;
    game.phase = GamePhase::Combat;

    Ok(())
}

/// Query a ship's broadside arc and its legal targets.
pub fn get_broadside_arc(game: &Game, ship_id: &str, broadside: Broadside) -> Option<ArcQuery> {
    arc::get_broadside_arc(&game.ships, ship_id, broadside, arc::default_max_range())
}

/// Fire a broadside at a target. Requires `Combat`, a loaded and gunned
/// broadside, and a closest-rule-legal target. Applies damage, marks the
/// broadside fired, and checks victory.
pub fn fire_broadside(
    game: &mut Game,
    game_id: &str,
    firing_id: &str,
    broadside: Broadside,
    aim: AimPoint,
    target_id: &str,
    tables: &HitTables,
    rng: &mut dyn Rng,
) -> Result<HitResult, EngineError> {
    let _span = debug_span!("fire_broadside", %firing_id, %target_id, ?broadside, ?aim).entered();
    require_not_ended(game, game_id)?;
    require_phase(game, GamePhase::Combat)?;

    let firing = game
        .get_ship(firing_id)
        .ok_or_else(|| ValidationError::ShipNotFound {
            ship_id: firing_id.to_string(),
        })?
        .clone();

    combat::can_fire_broadside(&firing, broadside).map_err(|reason| ValidationError::CannotFireBroadside {
        ship_id: firing_id.to_string(),
        broadside: format!("{broadside:?}"),
        reason,
    })?;

    if !arc::is_legal_target(&game.ships, firing_id, broadside, target_id, arc::default_max_range()) {
        return Err(ValidationError::IllegalTarget {
            firing_id: firing_id.to_string(),
            target_id: target_id.to_string(),
            broadside: format!("{broadside:?}"),
        }
        .into());
    }

    let target = game
        .get_ship(target_id)
        .ok_or_else(|| ValidationError::ShipNotFound {
            ship_id: target_id.to_string(),
        })?
        .clone();

    let hit_result = combat::resolve_broadside_fire(&firing, &target, broadside, aim, tables, rng);
    debug!(hits = hit_result.hits, "broadside resolved");

    let target_mut = game.get_ship_mut(target_id).expect("checked above");
    let application = damage::apply_hit_result_to_ship(target_mut, &hit_result, aim, None);
    let target_after = target_mut.clone();

    let firing_mut = game.get_ship_mut(firing_id).expect("checked above");
    reload::mark_broadside_fired(firing_mut, broadside);

    game.add_event(damage::create_damage_event(
        game.turn_number,
        firing_id,
        target_id,
        broadside,
        aim,
        &hit_result,
        &application,
        &target_after,
    ));

    if let Some(victory_result) = victory::check_victory_condition(game) {
        game.game_ended = true;
        game.winner = victory_result.winner;
        let event = victory::create_victory_event(game.turn_number, game.phase, &victory_result);
        game.add_event(event);
    }

    Ok(hit_result)
}

/// Resolve the reload phase: every struck-free ship's fired broadsides
/// reload. Transitions `Reload -> Planning`.
pub fn resolve_reload(game: &mut Game, game_id: &str) -> Result<(), ValidationError> {
    let _span = debug_span!("resolve_reload", turn = game.turn_number).entered();
    require_not_ended(game, game_id)?;
    require_phase(game, GamePhase::Reload)?;

    let events = reload::reload_all_ships(&mut game.ships, game.turn_number);
    for event in events {
        game.add_event(event);
    }
    game.phase = GamePhase::Planning;
    Ok(())
}

/// Advance to the next turn. Requires `Combat` (after all desired
/// broadsides have fired) and transitions `Combat -> Reload`, incrementing
/// `turn_number` and checking the turn-limit victory condition.
pub fn advance_turn(game: &mut Game, game_id: &str) -> Result<(), ValidationError> {
    let _span = debug_span!("advance_turn", turn = game.turn_number).entered();
    require_not_ended(game, game_id)?;
    require_phase(game, GamePhase::Combat)?;

    game.turn_number += 1;
    game.phase = GamePhase::Reload;

    if game.victory_condition == VictoryCondition::ScoreAfterTurns {
        if let Some(result) = victory::check_score_after_turns(game) {
            game.game_ended = true;
            game.winner = result.winner;
            let event = victory::create_victory_event(game.turn_number, game.phase, &result);
            game.add_event(event);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use wsim_core::enums::{Facing, LoadState};
    use wsim_core::hex::HexCoord;
    use wsim_core::orders::ShipOrders;
    use wsim_core::ship::Ship;

    fn sample_ship(id: &str, side: Side, bow: HexCoord, facing: Facing) -> Ship {
        Ship {
            id: id.to_string(),
            name: id.to_string(),
            side,
            bow_hex: bow,
            stern_hex: wsim_core::hex::stern_from_bow(bow, facing).unwrap(),
            facing,
            battle_sail_speed: 4,
            guns_l: 8,
            guns_r: 8,
            carronades_l: 0,
            carronades_r: 0,
            hull: 10,
            rigging: 10,
            crew: 100,
            marines: 20,
            initial_crew: 100,
            load_l: LoadState::Roundshot,
            load_r: LoadState::Roundshot,
            fouled: false,
            struck: false,
            turns_without_bow_advance: 0,
        }
    }

    fn sample_game() -> Game {
        let mut ships = IndexMap::new();
        ships.insert(
            "p1-a".to_string(),
            sample_ship("p1-a", Side::P1, HexCoord::new(10, 10), Facing::N),
        );
        ships.insert(
            "p2-a".to_string(),
            sample_ship("p2-a", Side::P2, HexCoord::new(10, 11), Facing::S),
        );
        Game {
            turn_number: 1,
            phase: GamePhase::Planning,
            map_width: 30,
            map_height: 30,
            wind_direction: Facing::N,
            ships,
            p1_orders: None,
            p2_orders: None,
            event_log: Vec::new(),
            turn_limit: None,
            victory_condition: VictoryCondition::FirstStruck,
            game_ended: false,
            winner: None,
        }
    }

    #[test]
    fn submit_orders_rejects_mismatched_ship_set() {
        let mut game = sample_game();
        let orders = TurnOrders {
            turn_number: 1,
            side: Side::P1,
            orders: vec![ShipOrders {
                ship_id: "not-a-real-ship".to_string(),
                movement: "1".to_string(),
            }],
            submitted: false,
        };
        let err = submit_orders(&mut game, "g1", orders).unwrap_err();
        assert!(matches!(err, ValidationError::ShipSetMismatch { .. }));
    }

    #[test]
    fn submit_orders_rejects_wrong_phase() {
        let mut game = sample_game();
        game.phase = GamePhase::Combat;
        let orders = TurnOrders {
            turn_number: 1,
            side: Side::P1,
            orders: vec![ShipOrders {
                ship_id: "p1-a".to_string(),
                movement: "1".to_string(),
            }],
            submitted: false,
        };
        let err = submit_orders(&mut game, "g1", orders).unwrap_err();
        assert!(matches!(err, ValidationError::WrongPhase { .. }));
    }

    #[test]
    fn resolve_movement_requires_both_sides_submitted() {
        let mut game = sample_game();
        let mut rng = crate::rng::SeededRng::new(1);
        let err = resolve_movement(&mut game, "g1", &mut rng).unwrap_err();
        assert!(matches!(err, EngineError::Validation(ValidationError::OrdersNotSubmitted)));
    }

    #[test]
    fn full_turn_cycle_moves_phase_through_all_states() {
        let mut game = sample_game();
        submit_orders(
            &mut game,
            "g1",
            TurnOrders {
                turn_number: 1,
                side: Side::P1,
                orders: vec![ShipOrders {
                    ship_id: "p1-a".to_string(),
                    movement: "1".to_string(),
                }],
                submitted: true,
            },
        )
        .unwrap();
        submit_orders(
            &mut game,
            "g1",
            TurnOrders {
                turn_number: 1,
                side: Side::P2,
                orders: vec![ShipOrders {
                    ship_id: "p2-a".to_string(),
                    movement: "0".to_string(),
                }],
                submitted: true,
            },
        )
        .unwrap();

        let mut rng = crate::rng::SeededRng::new(1);
        resolve_movement(&mut game, "g1", &mut rng).unwrap();
        assert_eq!(game.phase, GamePhase::Combat);

        advance_turn(&mut game, "g1").unwrap();
        assert_eq!(game.phase, GamePhase::Reload);
        assert_eq!(game.turn_number, 2);

        resolve_reload(&mut game, "g1").unwrap();
        assert_eq!(game.phase, GamePhase::Planning);
    }
}
