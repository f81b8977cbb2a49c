//! Victory predicates (§4.11). Each checker inspects a `Game` snapshot and
//! returns `Some` once its condition is met; `check_victory_condition`
//! dispatches to whichever one the game was configured with.

use std::collections::HashMap;

use wsim_core::enums::{Side, VictoryCondition, Winner};
use wsim_core::events::EventLogEntry;
use wsim_core::game::Game;

/// The outcome of a victory check, carrying enough detail for the event log
/// and for callers that want to explain *why* the game ended.
pub struct VictoryResult {
    pub winner: Option<Winner>,
    pub condition: VictoryCondition,
    pub reason: String,
    pub details: HashMap<String, i64>,
}

/// The game ends the instant any ship strikes; the opposing side wins.
/// Ties are broken by insertion order — the first struck ship in
/// `game.ships` decides the outcome, matching the engine's general
/// iteration-order convention (§9).
pub fn check_first_struck(game: &Game) -> Option<VictoryResult> {
    let (struck_id, struck_side) = game
        .ships
        .iter()
        .find(|(_, ship)| ship.struck)
        .map(|(id, ship)| (id.clone(), ship.side))?;

    let mut details = HashMap::new();
    details.insert("struck_side_is_p1".to_string(), (struck_side == Side::P1) as i64);

    Some(VictoryResult {
        winner: Some(Winner::Side(struck_side.other())),
        condition: VictoryCondition::FirstStruck,
        reason: format!("{struck_id} struck"),
        details,
    })
}

/// Score is the sum of remaining hull across a side's ships. Once
/// `turn_limit` is reached the higher score wins; equal scores draw.
pub fn check_score_after_turns(game: &Game) -> Option<VictoryResult> {
    let limit = game.turn_limit?;
    if game.turn_number < limit {
        return None;
    }

    let p1_score: i64 = game.ships_by_side(Side::P1).map(|s| s.hull as i64).sum();
    let p2_score: i64 = game.ships_by_side(Side::P2).map(|s| s.hull as i64).sum();

    let winner = match p1_score.cmp(&p2_score) {
        std::cmp::Ordering::Greater => Some(Winner::Side(Side::P1)),
        std::cmp::Ordering::Less => Some(Winner::Side(Side::P2)),
        std::cmp::Ordering::Equal => Some(Winner::Draw),
    };

    let mut details = HashMap::new();
    details.insert("p1_score".to_string(), p1_score);
    details.insert("p2_score".to_string(), p2_score);

    Some(VictoryResult {
        winner,
        condition: VictoryCondition::ScoreAfterTurns,
        reason: format!("turn limit {limit} reached: p1={p1_score} p2={p2_score}"),
        details,
    })
}

/// The first side to have two of its own ships struck loses.
pub fn check_first_side_struck_two_ships(game: &Game) -> Option<VictoryResult> {
    let p1_struck = game.ships_by_side(Side::P1).filter(|s| s.struck).count();
    let p2_struck = game.ships_by_side(Side::P2).filter(|s| s.struck).count();

    let mut details = HashMap::new();
    details.insert("p1_struck".to_string(), p1_struck as i64);
    details.insert("p2_struck".to_string(), p2_struck as i64);

    let loser = if p1_struck >= 2 {
        Some(Side::P1)
    } else if p2_struck >= 2 {
        Some(Side::P2)
    } else {
        None
    };

    loser.map(|side| VictoryResult {
        winner: Some(Winner::Side(side.other())),
        condition: VictoryCondition::FirstSideStruckTwoShips,
        reason: format!("{side:?} had two ships struck"),
        details,
    })
}

/// Dispatch to the checker matching `game.victory_condition`.
pub fn check_victory_condition(game: &Game) -> Option<VictoryResult> {
    match game.victory_condition {
        VictoryCondition::FirstStruck => check_first_struck(game),
        VictoryCondition::ScoreAfterTurns => check_score_after_turns(game),
        VictoryCondition::FirstSideStruckTwoShips => check_first_side_struck_two_ships(game),
    }
}

pub fn create_victory_event(turn_number: u32, phase: wsim_core::enums::GamePhase, result: &VictoryResult) -> EventLogEntry {
    let mut event = EventLogEntry::new(turn_number, phase, "victory", result.reason.clone())
        .with_metadata("condition", format!("{:?}", result.condition));
    if let Some(winner) = result.winner {
        event = event.with_metadata("winner", format!("{winner:?}"));
    }
    for (key, value) in &result.details {
        event = event.with_modifier(key.clone(), *value);
    }
    event
}

#[cfg(test)]
mod tests {
    use super::*;
    use wsim_core::enums::{Facing, GamePhase, LoadState};
    use wsim_core::hex::HexCoord;
    use wsim_core::ship::Ship;
    use indexmap::IndexMap;

    fn sample_ship(id: &str, side: Side, struck: bool) -> Ship {
        Ship {
            id: id.to_string(),
            name: id.to_string(),
            side,
            bow_hex: HexCoord::new(0, 0),
            stern_hex: wsim_core::hex::stern_from_bow(HexCoord::new(0, 0), Facing::N).unwrap(),
            facing: Facing::N,
            battle_sail_speed: 4,
            guns_l: 8,
            guns_r: 8,
            carronades_l: 0,
            carronades_r: 0,
            hull: if struck { 0 } else { 10 },
            rigging: 10,
            crew: 100,
            marines: 20,
            initial_crew: 100,
            load_l: LoadState::Roundshot,
            load_r: LoadState::Roundshot,
            fouled: false,
            struck,
            turns_without_bow_advance: 0,
        }
    }

    fn sample_game(victory_condition: VictoryCondition) -> Game {
        Game {
            turn_number: 1,
            phase: GamePhase::Combat,
            map_width: 20,
            map_height: 20,
            wind_direction: Facing::N,
            ships: IndexMap::new(),
            p1_orders: None,
            p2_orders: None,
            event_log: Vec::new(),
            turn_limit: None,
            victory_condition,
            game_ended: false,
            winner: None,
        }
    }

    /// Scenario F.
    #[test]
    fn first_struck_ship_ends_the_game_for_the_opposing_side() {
        let mut game = sample_game(VictoryCondition::FirstStruck);
        game.ships.insert("a".to_string(), sample_ship("a", Side::P1, false));
        game.ships.insert("b".to_string(), sample_ship("b", Side::P2, true));

        let result = check_first_struck(&game).expect("a struck ship should end the game");
        assert_eq!(result.winner, Some(Winner::Side(Side::P1)));
    }

    #[test]
    fn first_struck_returns_none_when_nothing_has_struck() {
        let mut game = sample_game(VictoryCondition::FirstStruck);
        game.ships.insert("a".to_string(), sample_ship("a", Side::P1, false));
        assert!(check_first_struck(&game).is_none());
    }

    #[test]
    fn score_after_turns_is_none_before_the_limit() {
        let mut game = sample_game(VictoryCondition::ScoreAfterTurns);
        game.turn_limit = Some(10);
        game.turn_number = 3;
        assert!(check_score_after_turns(&game).is_none());
    }

    #[test]
    fn score_after_turns_declares_higher_hull_total_the_winner() {
        let mut game = sample_game(VictoryCondition::ScoreAfterTurns);
        game.turn_limit = Some(10);
        game.turn_number = 10;
        game.ships.insert("a".to_string(), sample_ship("a", Side::P1, false));
        let mut weak = sample_ship("b", Side::P2, false);
        weak.hull = 2;
        game.ships.insert("b".to_string(), weak);

        let result = check_score_after_turns(&game).unwrap();
        assert_eq!(result.winner, Some(Winner::Side(Side::P1)));
    }

    #[test]
    fn first_side_struck_two_ships_ends_the_game() {
        let mut game = sample_game(VictoryCondition::FirstSideStruckTwoShips);
        game.ships.insert("a".to_string(), sample_ship("a", Side::P1, true));
        game.ships.insert("b".to_string(), sample_ship("b", Side::P1, true));
        game.ships.insert("c".to_string(), sample_ship("c", Side::P2, false));

        let result = check_first_side_struck_two_ships(&game).unwrap();
        assert_eq!(result.winner, Some(Winner::Side(Side::P2)));
    }
}
