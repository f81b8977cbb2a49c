//! Player-submitted orders for a turn.

use serde::{Deserialize, Serialize};

use crate::enums::Side;

/// One ship's movement notation for the current turn (see §4.3 grammar,
/// parsed by `wsim-engine`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShipOrders {
    pub ship_id: String,
    pub movement: String,
}

/// One side's full set of orders for a turn.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TurnOrders {
    pub turn_number: u32,
    pub side: Side,
    pub orders: Vec<ShipOrders>,
    #[serde(default)]
    pub submitted: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn submitted_defaults_to_false_when_absent_from_json() {
        let json = r#"{"turn_number":1,"side":"P1","orders":[]}"#;
        let orders: TurnOrders = serde_json::from_str(json).unwrap();
        assert!(!orders.submitted);
    }
}
