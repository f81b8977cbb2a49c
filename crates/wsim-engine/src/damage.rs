//! Damage application: track clamping, marines-first casualties, gun-loss
//! distribution, and the struck predicate (§4.9).

use wsim_core::enums::{AimPoint, Broadside, GamePhase};
use wsim_core::events::EventLogEntry;
use wsim_core::ship::Ship;

use crate::combat::HitResult;

/// Debit gun damage from one or both broadsides. If `target_broadside` is
/// given, all damage lands on that side (clamped to guns remaining).
/// Otherwise alternate between L and R starting with L until the damage is
/// exhausted or both broadsides are empty — equivalent to "left gets the
/// extra on odd counts". This is the authoritative algorithm; a divergent
/// proportional split exists elsewhere in the source material but is not
/// implemented here (see design notes).
fn apply_gun_damage(ship: &mut Ship, gun_damage: i64, target_broadside: Option<Broadside>) -> (u32, u32) {
    let mut remaining = gun_damage.max(0) as u32;
    let mut guns_lost_l = 0;
    let mut guns_lost_r = 0;

    if let Some(broadside) = target_broadside {
        let debit = remaining.min(match broadside {
            Broadside::L => ship.guns_l,
            Broadside::R => ship.guns_r,
        });
        match broadside {
            Broadside::L => {
                ship.guns_l -= debit;
                guns_lost_l = debit;
            }
            Broadside::R => {
                ship.guns_r -= debit;
                guns_lost_r = debit;
            }
        }
        return (guns_lost_l, guns_lost_r);
    }

    while remaining > 0 && (ship.guns_l > 0 || ship.guns_r > 0) {
        if ship.guns_l > 0 {
            ship.guns_l -= 1;
            guns_lost_l += 1;
            remaining -= 1;
        }
        if remaining > 0 && ship.guns_r > 0 {
            ship.guns_r -= 1;
            guns_lost_r += 1;
            remaining -= 1;
        }
    }

    (guns_lost_l, guns_lost_r)
}

/// The post-application summary, used to build the `damage` event.
pub struct DamageApplication {
    pub hull_damage: u32,
    pub rigging_damage: u32,
    pub crew_lost: u32,
    pub marines_lost: u32,
    pub guns_lost_l: u32,
    pub guns_lost_r: u32,
    pub previous_hull: u32,
    pub previous_crew: u32,
    pub previous_marines: u32,
    pub struck: bool,
}

/// Apply a `HitResult` to `ship` per the aim point, and evaluate the
/// struck predicate. `target_broadside` overrides the default
/// alternating gun-damage distribution when a specific broadside was hit.
pub fn apply_hit_result_to_ship(
    ship: &mut Ship,
    hit_result: &HitResult,
    aim: AimPoint,
    target_broadside: Option<Broadside>,
) -> DamageApplication {
    let previous_hull = ship.hull;
    let previous_crew = ship.crew;
    let previous_marines = ship.marines;

    let mut hull_damage = 0;
    let mut rigging_damage = 0;
    let mut crew_lost = 0;
    let mut marines_lost = 0;
    let mut guns_lost_l = 0;
    let mut guns_lost_r = 0;

    match aim {
        AimPoint::Hull => {
            let hits = hit_result.hits.max(0) as u32;
            hull_damage = hits.min(ship.hull);
            ship.hull = ship.hull.saturating_sub(hits);

            let casualties = hit_result.crew_casualties.max(0) as u32;
            marines_lost = casualties.min(ship.marines);
            ship.marines -= marines_lost;
            let remaining = casualties - marines_lost;
            crew_lost = remaining.min(ship.crew);
            ship.crew -= crew_lost;

            let (l, r) = apply_gun_damage(ship, hit_result.gun_damage, target_broadside);
            guns_lost_l = l;
            guns_lost_r = r;
        }
        AimPoint::Rigging => {
            let hits = hit_result.hits.max(0) as u32;
            rigging_damage = hits.min(ship.rigging);
            ship.rigging = ship.rigging.saturating_sub(hits);
        }
    }

    let struck = (ship.hull == 0 && previous_hull > 0) || (ship.crew + ship.marines == 0);
    if struck {
        ship.struck = true;
    }

    DamageApplication {
        hull_damage,
        rigging_damage,
        crew_lost,
        marines_lost,
        guns_lost_l,
        guns_lost_r,
        previous_hull,
        previous_crew,
        previous_marines,
        struck: ship.struck,
    }
}

/// Build the `damage` event log entry for a completed application.
pub fn create_damage_event(
    turn_number: u32,
    firing_id: &str,
    target_id: &str,
    broadside: Broadside,
    aim: AimPoint,
    hit_result: &HitResult,
    application: &DamageApplication,
    ship_after: &Ship,
) -> EventLogEntry {
    let summary = if application.struck {
        format!("{target_id} struck after taking {} hits", hit_result.hits)
    } else {
        format!("{target_id} took {} hits from {firing_id}", hit_result.hits)
    };

    EventLogEntry::new(turn_number, GamePhase::Combat, "damage", summary)
        .with_metadata("firing_ship_id", firing_id)
        .with_metadata("target_ship_id", target_id)
        .with_metadata("broadside", format!("{broadside:?}"))
        .with_metadata("aim", format!("{aim:?}"))
        .with_metadata("range", hit_result.range)
        .with_metadata("range_bracket", hit_result.bracket_name.clone())
        .with_metadata("total_hits", hit_result.hits)
        .with_metadata("die_rolls", serde_json::to_value(&hit_result.die_rolls).unwrap())
        .with_state_diff("hull", application.previous_hull, ship_after.hull)
        .with_state_diff("crew", application.previous_crew, ship_after.crew)
        .with_state_diff("marines", application.previous_marines, ship_after.marines)
        .with_metadata("struck", application.struck)
}

#[cfg(test)]
mod tests {
    use super::*;
    use wsim_core::enums::{Facing, LoadState, Side};
    use wsim_core::hex::HexCoord;

    fn sample_ship() -> Ship {
        Ship {
            id: "a".to_string(),
            name: "a".to_string(),
            side: Side::P1,
            bow_hex: HexCoord::new(10, 10),
            stern_hex: HexCoord::new(10, 11),
            facing: Facing::N,
            battle_sail_speed: 4,
            guns_l: 8,
            guns_r: 8,
            carronades_l: 0,
            carronades_r: 0,
            hull: 10,
            rigging: 10,
            crew: 20,
            marines: 5,
            initial_crew: 20,
            load_l: LoadState::Roundshot,
            load_r: LoadState::Roundshot,
            fouled: false,
            struck: false,
            turns_without_bow_advance: 0,
        }
    }

    fn hit(hits: i64, crew_casualties: i64, gun_damage: i64) -> HitResult {
        HitResult {
            hits,
            crew_casualties,
            gun_damage,
            range: 1,
            bracket_name: "short".to_string(),
            die_rolls: vec![],
            crew_modifier: 0,
        }
    }

    #[test]
    fn hull_damage_clamps_at_zero_and_tracks_applied_amount() {
        let mut ship = sample_ship();
        let result = hit(25, 0, 0);
        let application = apply_hit_result_to_ship(&mut ship, &result, AimPoint::Hull, None);
        assert_eq!(ship.hull, 0);
        assert_eq!(application.hull_damage, 10);
        assert!(application.struck);
    }

    #[test]
    fn marines_absorb_casualties_before_crew() {
        let mut ship = sample_ship();
        let result = hit(1, 3, 0);
        let application = apply_hit_result_to_ship(&mut ship, &result, AimPoint::Hull, None);
        assert_eq!(application.marines_lost, 3);
        assert_eq!(application.crew_lost, 0);
        assert_eq!(ship.marines, 2);
        assert_eq!(ship.crew, 20);
    }

    #[test]
    fn casualties_overflow_to_crew_once_marines_exhausted() {
        let mut ship = sample_ship();
        let result = hit(1, 8, 0);
        let application = apply_hit_result_to_ship(&mut ship, &result, AimPoint::Hull, None);
        assert_eq!(application.marines_lost, 5);
        assert_eq!(application.crew_lost, 3);
    }

    #[test]
    fn gun_damage_alternates_starting_with_left() {
        let mut ship = sample_ship();
        let result = hit(1, 0, 3);
        apply_hit_result_to_ship(&mut ship, &result, AimPoint::Hull, None);
        // 3 damage: L-1, R-1, L-1 -> L loses 2, R loses 1.
        assert_eq!(ship.guns_l, 6);
        assert_eq!(ship.guns_r, 7);
    }

    #[test]
    fn gun_damage_to_specific_broadside_is_clamped() {
        let mut ship = sample_ship();
        ship.guns_l = 2;
        let result = hit(1, 0, 5);
        apply_hit_result_to_ship(&mut ship, &result, AimPoint::Hull, Some(Broadside::L));
        assert_eq!(ship.guns_l, 0);
        assert_eq!(ship.guns_r, 8);
    }

    #[test]
    fn rigging_aim_ignores_casualties_and_gun_damage() {
        let mut ship = sample_ship();
        let result = hit(5, 10, 10);
        let application = apply_hit_result_to_ship(&mut ship, &result, AimPoint::Rigging, None);
        assert_eq!(application.rigging_damage, 5);
        assert_eq!(ship.crew, 20);
        assert_eq!(ship.marines, 5);
        assert_eq!(ship.guns_l, 8);
    }

    #[test]
    fn struck_is_set_when_crew_and_marines_both_reach_zero() {
        let mut ship = sample_ship();
        let result = hit(0, 25, 0);
        let application = apply_hit_result_to_ship(&mut ship, &result, AimPoint::Hull, None);
        assert!(application.struck);
        assert_eq!(ship.crew + ship.marines, 0);
    }
}
