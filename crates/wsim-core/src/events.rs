//! The append-only event log emitted by every component of the engine.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::enums::GamePhase;

/// A recorded set of die rolls, kept for audit alongside the totals they
/// produced. Supplements the bare "optional dice record" in the
/// distillation with the original source's shape so the event log stays a
/// faithful replay/audit trail.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiceRoll {
    pub num_dice: u32,
    pub die_type: u32,
    pub rolls: Vec<u32>,
    pub total: i64,
}

/// A single entry in the append-only event log. Entries are never
/// reordered or removed once appended.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventLogEntry {
    pub turn_number: u32,
    pub phase: GamePhase,
    pub event_type: String,
    pub summary: String,
    #[serde(default)]
    pub dice_roll: Option<DiceRoll>,
    #[serde(default)]
    pub modifiers: HashMap<String, i64>,
    #[serde(default)]
    pub state_diff: HashMap<String, Value>,
    #[serde(default)]
    pub metadata: HashMap<String, Value>,
}

impl EventLogEntry {
    pub fn new(turn_number: u32, phase: GamePhase, event_type: impl Into<String>, summary: impl Into<String>) -> Self {
        Self {
            turn_number,
            phase,
            event_type: event_type.into(),
            summary: summary.into(),
            dice_roll: None,
            modifiers: HashMap::new(),
            state_diff: HashMap::new(),
            metadata: HashMap::new(),
        }
    }

    pub fn with_dice_roll(mut self, dice_roll: DiceRoll) -> Self {
        self.dice_roll = Some(dice_roll);
        self
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    pub fn with_state_diff(mut self, key: impl Into<String>, before: impl Into<Value>, after: impl Into<Value>) -> Self {
        self.state_diff.insert(
            key.into(),
            serde_json::json!({ "before": before.into(), "after": after.into() }),
        );
        self
    }

    pub fn with_modifier(mut self, key: impl Into<String>, value: i64) -> Self {
        self.modifiers.insert(key.into(), value);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_methods_chain_and_accumulate() {
        let event = EventLogEntry::new(3, GamePhase::Combat, "damage", "took 2 hits")
            .with_dice_roll(DiceRoll {
                num_dice: 2,
                die_type: 6,
                rolls: vec![4, 5],
                total: 9,
            })
            .with_metadata("target_id", "ship-2")
            .with_state_diff("hull", 10, 8)
            .with_modifier("crew_quality", -1);

        assert_eq!(event.turn_number, 3);
        assert_eq!(event.dice_roll.unwrap().total, 9);
        assert_eq!(event.metadata["target_id"], serde_json::json!("ship-2"));
        assert_eq!(event.state_diff["hull"], serde_json::json!({"before": 10, "after": 8}));
        assert_eq!(event.modifiers["crew_quality"], -1);
    }

    #[test]
    fn event_log_entry_round_trips_through_json() {
        let event = EventLogEntry::new(1, GamePhase::Planning, "orders_submitted", "p1 submitted orders");
        let json = serde_json::to_string(&event).unwrap();
        let back: EventLogEntry = serde_json::from_str(&json).unwrap();
        assert_eq!(back.event_type, "orders_submitted");
        assert!(back.dice_roll.is_none());
    }
}
