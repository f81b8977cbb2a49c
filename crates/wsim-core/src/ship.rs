//! The `Ship` entity and its invariants.

use serde::{Deserialize, Serialize};

use crate::enums::{Facing, LoadState, Side};
use crate::hex::HexCoord;

/// A single ship. Mutable within a turn step; treated as immutable data
/// between engine calls.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ship {
    pub id: String,
    pub name: String,
    pub side: Side,

    pub bow_hex: HexCoord,
    pub stern_hex: HexCoord,
    pub facing: Facing,

    pub battle_sail_speed: u32,

    pub guns_l: u32,
    pub guns_r: u32,
    #[serde(default)]
    pub carronades_l: u32,
    #[serde(default)]
    pub carronades_r: u32,

    pub hull: u32,
    pub rigging: u32,
    pub crew: u32,
    pub marines: u32,

    /// Crew count at scenario creation time, captured once and never
    /// mutated. Drives the crew-quality modifier in combat resolution.
    pub initial_crew: u32,

    pub load_l: LoadState,
    pub load_r: LoadState,

    #[serde(default)]
    pub fouled: bool,
    #[serde(default)]
    pub struck: bool,

    #[serde(default)]
    pub turns_without_bow_advance: u32,
}

impl Ship {
    /// Whether `stern_hex` is consistent with `bow_hex` and `facing`.
    pub fn stern_is_consistent(&self) -> bool {
        crate::hex::stern_from_bow(self.bow_hex, self.facing) == Some(self.stern_hex)
    }

    pub fn gun_count(&self, broadside: crate::enums::Broadside) -> u32 {
        match broadside {
            crate::enums::Broadside::L => self.guns_l,
            crate::enums::Broadside::R => self.guns_r,
        }
    }

    pub fn load_state(&self, broadside: crate::enums::Broadside) -> LoadState {
        match broadside {
            crate::enums::Broadside::L => self.load_l,
            crate::enums::Broadside::R => self.load_r,
        }
    }

    /// Ratio of current to initial crew, used for the combat crew-quality
    /// modifier. Ships with no initial crew recorded are treated as 0.0.
    pub fn crew_ratio(&self) -> f64 {
        if self.initial_crew == 0 {
            0.0
        } else {
            self.crew as f64 / self.initial_crew as f64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enums::Broadside;

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
            guns_r: 6,
            carronades_l: 0,
            carronades_r: 0,
            hull: 10,
            rigging: 10,
            crew: 50,
            marines: 10,
            initial_crew: 100,
            load_l: LoadState::Roundshot,
            load_r: LoadState::Empty,
            fouled: false,
            struck: false,
            turns_without_bow_advance: 0,
        }
    }

    #[test]
    fn stern_is_consistent_detects_mismatched_pose() {
        let mut ship = sample_ship();
        assert!(ship.stern_is_consistent());
        ship.stern_hex = HexCoord::new(0, 0);
        assert!(!ship.stern_is_consistent());
    }

    #[test]
    fn gun_count_and_load_state_read_the_right_broadside() {
        let ship = sample_ship();
        assert_eq!(ship.gun_count(Broadside::L), 8);
        assert_eq!(ship.gun_count(Broadside::R), 6);
        assert_eq!(ship.load_state(Broadside::L), LoadState::Roundshot);
        assert_eq!(ship.load_state(Broadside::R), LoadState::Empty);
    }

    #[test]
    fn crew_ratio_is_zero_with_no_initial_crew_recorded() {
        let mut ship = sample_ship();
        ship.initial_crew = 0;
        assert_eq!(ship.crew_ratio(), 0.0);
    }

    #[test]
    fn crew_ratio_divides_current_by_initial() {
        let ship = sample_ship();
        assert_eq!(ship.crew_ratio(), 0.5);
    }
}
