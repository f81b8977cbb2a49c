//! Table-driven broadside fire resolution (§4.8).

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use wsim_core::enums::{AimPoint, Broadside, RangeBracket};
use wsim_core::ship::Ship;

use crate::rng::Rng;

/// The default hit table data embedded in the crate so it is self-contained
/// for tests and default play. A collaborator may supply an alternate table
/// through [`HitTables::from_json`].
const DEFAULT_HIT_TABLES_JSON: &str = include_str!("../data/hit_tables.json");

#[derive(Debug, Deserialize)]
struct RangeBracketBounds {
    min: u32,
    max: u32,
}

#[derive(Debug, Deserialize)]
struct RawHitTables {
    hit_table: HashMap<String, HashMap<String, HashMap<String, i64>>>,
    range_brackets: HashMap<String, RangeBracketBounds>,
    crew_casualties: HashMap<String, i64>,
    gun_damage: HashMap<String, HashMap<String, i64>>,
}

/// Parsed, queryable hit tables.
#[derive(Debug, Clone)]
pub struct HitTables {
    hit_table: HashMap<(AimPoint, RangeBracket), HashMap<u32, i64>>,
    range_brackets: HashMap<RangeBracket, (u32, u32)>,
    crew_casualties: HashMap<u32, i64>,
    gun_damage_short_range: HashMap<u32, i64>,
}

fn aim_key(aim: AimPoint) -> &'static str {
    match aim {
        AimPoint::Hull => "hull",
        AimPoint::Rigging => "rigging",
    }
}

fn bracket_key(bracket: RangeBracket) -> &'static str {
    match bracket {
        RangeBracket::Short => "short",
        RangeBracket::Medium => "medium",
        RangeBracket::Long => "long",
    }
}

impl HitTables {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let raw: RawHitTables = serde_json::from_str(json)?;

        let mut hit_table = HashMap::new();
        for (aim_name, brackets) in raw.hit_table {
            let aim = match aim_name.as_str() {
                "hull" => AimPoint::Hull,
                "rigging" => AimPoint::Rigging,
                _ => continue,
            };
            for (bracket_name, by_die) in brackets {
                let bracket = match bracket_name.as_str() {
                    "short" => RangeBracket::Short,
                    "medium" => RangeBracket::Medium,
                    "long" => RangeBracket::Long,
                    _ => continue,
                };
                let parsed: HashMap<u32, i64> = by_die
                    .into_iter()
                    .filter_map(|(face, hits)| face.parse::<u32>().ok().map(|f| (f, hits)))
                    .collect();
                hit_table.insert((aim, bracket), parsed);
            }
        }

        let mut range_brackets = HashMap::new();
        for (name, bounds) in raw.range_brackets {
            let bracket = match name.as_str() {
                "short" => RangeBracket::Short,
                "medium" => RangeBracket::Medium,
                "long" => RangeBracket::Long,
                _ => continue,
            };
            range_brackets.insert(bracket, (bounds.min, bounds.max));
        }

        let crew_casualties = raw
            .crew_casualties
            .into_iter()
            .filter_map(|(face, n)| face.parse::<u32>().ok().map(|f| (f, n)))
            .collect();

        let gun_damage_short_range = raw
            .gun_damage
            .get("short_range")
            .cloned()
            .unwrap_or_default()
            .into_iter()
            .filter_map(|(face, n)| face.parse::<u32>().ok().map(|f| (f, n)))
            .collect();

        Ok(Self {
            hit_table,
            range_brackets,
            crew_casualties,
            gun_damage_short_range,
        })
    }

    /// The default, crate-embedded hit table.
    pub fn default_tables() -> Self {
        Self::from_json(DEFAULT_HIT_TABLES_JSON).expect("embedded hit table JSON is well-formed")
    }

    pub fn range_bracket(&self, distance: u32) -> RangeBracket {
        for bracket in [RangeBracket::Short, RangeBracket::Medium, RangeBracket::Long] {
            if let Some((min, max)) = self.range_brackets.get(&bracket) {
                if distance >= *min && distance <= *max {
                    return bracket;
                }
            }
        }
        RangeBracket::Long
    }

    fn hits_for_roll(&self, aim: AimPoint, bracket: RangeBracket, roll: u32) -> i64 {
        self.hit_table
            .get(&(aim, bracket))
            .and_then(|t| t.get(&roll))
            .copied()
            .unwrap_or(0)
    }

    fn crew_casualties_for_roll(&self, roll: u32) -> i64 {
        self.crew_casualties.get(&roll).copied().unwrap_or(0)
    }

    fn gun_damage_for_roll(&self, roll: u32) -> i64 {
        self.gun_damage_short_range.get(&roll).copied().unwrap_or(0)
    }
}

/// Result of resolving a broadside's fire.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HitResult {
    pub hits: i64,
    pub crew_casualties: i64,
    pub gun_damage: i64,
    pub range: u32,
    pub bracket_name: String,
    pub die_rolls: Vec<u32>,
    pub crew_modifier: i32,
}

/// Crew-quality modifier from `firing.crew / firing.initial_crew`.
fn crew_quality_modifier(ship: &Ship) -> i32 {
    let ratio = ship.crew_ratio();
    if ratio >= 0.75 {
        0
    } else if ratio >= 0.50 {
        -1
    } else {
        -2
    }
}

/// Preconditions for firing: not struck, broadside loaded, at least one gun.
pub fn can_fire_broadside(ship: &Ship, broadside: Broadside) -> Result<(), String> {
    if ship.struck {
        return Err("ship has struck".to_string());
    }
    if ship.load_state(broadside) == wsim_core::enums::LoadState::Empty {
        return Err("broadside is not loaded".to_string());
    }
    if ship.gun_count(broadside) == 0 {
        return Err("broadside has no guns".to_string());
    }
    Ok(())
}

/// Resolve a broadside's fire against a target per §4.8's per-gun loop.
pub fn resolve_broadside_fire(
    firing: &Ship,
    target: &Ship,
    broadside: Broadside,
    aim: AimPoint,
    tables: &HitTables,
    rng: &mut dyn Rng,
) -> HitResult {
    let distance = firing.bow_hex.distance(target.bow_hex);
    let bracket = tables.range_bracket(distance);
    let n_guns = firing.gun_count(broadside);
    let crew_modifier = crew_quality_modifier(firing);

    let mut die_rolls = Vec::new();
    let mut hits = 0i64;

    for _ in 0..n_guns {
        let raw = rng.roll_d6();
        die_rolls.push(raw);
        let modified = (raw as i32 + crew_modifier).clamp(1, 6) as u32;
        hits += tables.hits_for_roll(aim, bracket, modified);
    }

    let mut crew_casualties = 0i64;
    let mut gun_damage = 0i64;

    if aim == AimPoint::Hull && hits > 0 {
        for _ in 0..hits {
            let roll = rng.roll_d6();
            die_rolls.push(roll);
            crew_casualties += tables.crew_casualties_for_roll(roll);
        }
        if bracket == RangeBracket::Short {
            for _ in 0..hits {
                let roll = rng.roll_d6();
                die_rolls.push(roll);
                gun_damage += tables.gun_damage_for_roll(roll);
            }
        }
    }

    HitResult {
        hits,
        crew_casualties,
        gun_damage,
        range: distance,
        bracket_name: bracket_key(bracket).to_string(),
        die_rolls,
        crew_modifier,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::SeededRng;
    use wsim_core::enums::{Facing, LoadState, Side};
    use wsim_core::hex::HexCoord;

    fn sample_ship(id: &str, bow: HexCoord, crew: u32, initial_crew: u32) -> Ship {
        Ship {
            id: id.to_string(),
            name: id.to_string(),
            side: Side::P1,
            bow_hex: bow,
            stern_hex: wsim_core::hex::stern_from_bow(bow, Facing::N).unwrap(),
            facing: Facing::N,
            battle_sail_speed: 4,
            guns_l: 8,
            guns_r: 8,
            carronades_l: 0,
            carronades_r: 0,
            hull: 20,
            rigging: 20,
            crew,
            marines: 20,
            initial_crew,
            load_l: LoadState::Roundshot,
            load_r: LoadState::Roundshot,
            fouled: false,
            struck: false,
            turns_without_bow_advance: 0,
        }
    }

    #[test]
    fn default_tables_load_from_embedded_json() {
        let tables = HitTables::default_tables();
        assert_eq!(tables.range_bracket(0), RangeBracket::Short);
        assert_eq!(tables.range_bracket(4), RangeBracket::Medium);
        assert_eq!(tables.range_bracket(100), RangeBracket::Long);
    }

    #[test]
    fn full_crew_has_no_modifier() {
        let ship = sample_ship("a", HexCoord::new(0, 0), 100, 100);
        assert_eq!(crew_quality_modifier(&ship), 0);
    }

    #[test]
    fn depleted_crew_has_worst_modifier() {
        let ship = sample_ship("a", HexCoord::new(0, 0), 10, 100);
        assert_eq!(crew_quality_modifier(&ship), -2);
    }

    #[test]
    fn can_fire_broadside_rejects_struck_ships() {
        let mut ship = sample_ship("a", HexCoord::new(0, 0), 100, 100);
        ship.struck = true;
        assert!(can_fire_broadside(&ship, Broadside::L).is_err());
    }

    #[test]
    fn can_fire_broadside_rejects_empty_load() {
        let mut ship = sample_ship("a", HexCoord::new(0, 0), 100, 100);
        ship.load_l = LoadState::Empty;
        assert!(can_fire_broadside(&ship, Broadside::L).is_err());
    }

    #[test]
    fn hull_fire_at_short_range_rolls_gun_damage() {
        let firing = sample_ship("a", HexCoord::new(10, 10), 100, 100);
        let target = sample_ship("b", HexCoord::new(10, 11), 100, 100);
        let tables = HitTables::default_tables();
        let mut rng = SeededRng::new(99);
        let result = resolve_broadside_fire(&firing, &target, Broadside::L, AimPoint::Hull, &tables, &mut rng);
        assert_eq!(result.bracket_name, "short");
        // die_rolls records every roll in the order produced: per-gun rolls
        // first, then crew-casualty rolls, then (short range) gun-damage rolls.
        assert!(result.die_rolls.len() >= firing.guns_l as usize);
    }

    #[test]
    fn rigging_fire_ignores_casualties_and_gun_damage() {
        let firing = sample_ship("a", HexCoord::new(10, 10), 100, 100);
        let target = sample_ship("b", HexCoord::new(10, 11), 100, 100);
        let tables = HitTables::default_tables();
        let mut rng = SeededRng::new(42);
        let result = resolve_broadside_fire(&firing, &target, Broadside::L, AimPoint::Rigging, &tables, &mut rng);
        assert_eq!(result.crew_casualties, 0);
        assert_eq!(result.gun_damage, 0);
    }
}
