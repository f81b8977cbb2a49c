//! Movement notation parser (§4.3).

use wsim_core::error::ParseError;

/// One parsed movement action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MovementAction {
    TurnLeft,
    TurnRight,
    MoveForward(u32),
    NoMovement,
}

/// The result of parsing a movement notation string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedMovement {
    pub original_notation: String,
    pub actions: Vec<MovementAction>,
    pub total_forward_hexes: u32,
}

/// Parse a movement notation string per the §4.3 grammar:
///
/// ```text
/// move    := '0' | atom+
/// atom    := 'L' | 'R' | digit
/// digit   := '1'..'9'
/// ```
///
/// Case-insensitive; leading/trailing whitespace is stripped. `'0'` is only
/// legal as the entire notation — elsewhere it is a hard parse error.
pub fn parse_movement(notation: &str) -> Result<ParsedMovement, ParseError> {
    let trimmed = notation.trim();
    if trimmed.is_empty() {
        return Err(ParseError::Empty);
    }

    let upper = trimmed.to_uppercase();

    if upper == "0" {
        return Ok(ParsedMovement {
            original_notation: notation.to_string(),
            actions: vec![MovementAction::NoMovement],
            total_forward_hexes: 0,
        });
    }

    let mut actions = Vec::new();
    let mut total_forward_hexes = 0u32;

    for (position, ch) in upper.chars().enumerate() {
        match ch {
            'L' => actions.push(MovementAction::TurnLeft),
            'R' => actions.push(MovementAction::TurnRight),
            '0' => return Err(ParseError::ZeroNotExclusive { position }),
            '1'..='9' => {
                let n = ch.to_digit(10).expect("matched '1'..='9'");
                actions.push(MovementAction::MoveForward(n));
                total_forward_hexes += n;
            }
            other => {
                return Err(ParseError::InvalidCharacter {
                    ch: other,
                    position,
                })
            }
        }
    }

    Ok(ParsedMovement {
        original_notation: notation.to_string(),
        actions,
        total_forward_hexes,
    })
}

/// Validate that the parsed movement's total forward hexes do not exceed a
/// ship's battle sail speed.
pub fn validate_movement_within_allowance(
    ship_id: &str,
    parsed: &ParsedMovement,
    battle_sail_speed: u32,
) -> Result<(), ParseError> {
    if parsed.total_forward_hexes > battle_sail_speed {
        return Err(ParseError::ExceedsAllowance {
            ship_id: ship_id.to_string(),
            total: parsed.total_forward_hexes,
            allowance: battle_sail_speed,
        });
    }
    Ok(())
}
