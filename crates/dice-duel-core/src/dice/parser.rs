//! Raw dice configuration parsing.

use crate::dice::{Die, DiceSet};
use crate::error::ValidationError;

/// Parse raw comma-separated face lists into a [`DiceSet`].
///
/// Each entry must split into exactly six integer tokens. Dice are named by
/// their 1-based position (`Dice 1`, `Dice 2`, ...) and input order is
/// preserved. Pure function, no side effects.
pub fn parse_dice_set<S: AsRef<str>>(raw_entries: &[S]) -> Result<DiceSet, ValidationError> {
    if raw_entries.len() < DiceSet::MIN_DICE {
        return Err(ValidationError::TooFewDice {
            given: raw_entries.len(),
        });
    }

    let mut dice = Vec::with_capacity(raw_entries.len());
    for (i, entry) in raw_entries.iter().enumerate() {
        let position = i + 1;
        let tokens: Vec<&str> = entry.as_ref().split(',').collect();
        if tokens.len() != Die::FACE_COUNT {
            return Err(ValidationError::WrongFaceCount {
                die: position,
                got: tokens.len(),
            });
        }

        let mut faces = [0i32; 6];
        for (slot, token) in faces.iter_mut().zip(&tokens) {
            *slot = token
                .trim()
                .parse()
                .map_err(|_| ValidationError::InvalidFace {
                    die: position,
                    token: token.trim().to_string(),
                })?;
        }

        dice.push(Die::new(format!("Dice {}", position), faces));
    }

    DiceSet::new(dice)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_classic_set() {
        let set = parse_dice_set(&["2,2,4,4,9,9", "6,8,1,1,8,6", "7,5,3,7,5,3"]).unwrap();
        assert_eq!(set.len(), 3);
        assert_eq!(set.get(0).unwrap().name(), "Dice 1");
        assert_eq!(set.get(0).unwrap().faces(), &[2, 2, 4, 4, 9, 9]);
        assert_eq!(set.get(1).unwrap().faces(), &[6, 8, 1, 1, 8, 6]);
        assert_eq!(set.get(2).unwrap().name(), "Dice 3");
    }

    #[test]
    fn test_parse_tolerates_whitespace_and_negatives() {
        let set = parse_dice_set(&[" 1, -2 ,3,4,5,6", "0,0,0,0,0,0", "9,9,9,9,9,9"]).unwrap();
        assert_eq!(set.get(0).unwrap().faces(), &[1, -2, 3, 4, 5, 6]);
    }

    #[test]
    fn test_parse_requires_three_entries() {
        let err = parse_dice_set(&["1,2,3,4,5,6", "1,2,3,4,5,6"]).unwrap_err();
        assert_eq!(err, ValidationError::TooFewDice { given: 2 });
    }

    #[test]
    fn test_parse_rejects_wrong_face_count() {
        let err = parse_dice_set(&["1,2,3,4,5,6", "1,2,3,4,5", "1,2,3,4,5,6"]).unwrap_err();
        assert_eq!(err, ValidationError::WrongFaceCount { die: 2, got: 5 });
    }

    #[test]
    fn test_parse_rejects_non_integer_token_with_position() {
        let err = parse_dice_set(&["1,2,3,4,5,6", "1,2,3,4,5,6", "1,2,x,4,5,6"]).unwrap_err();
        assert_eq!(
            err,
            ValidationError::InvalidFace {
                die: 3,
                token: "x".to_string()
            }
        );
    }

    #[test]
    fn test_parse_rejects_empty_token() {
        let err = parse_dice_set(&["1,2,,4,5,6", "1,2,3,4,5,6", "1,2,3,4,5,6"]).unwrap_err();
        assert!(matches!(err, ValidationError::InvalidFace { die: 1, .. }));
    }

    #[test]
    fn test_parse_round_trips_faces() {
        let raw = ["2,2,4,4,9,9", "6,8,1,1,8,6", "7,5,3,7,5,3"];
        let set = parse_dice_set(&raw).unwrap();

        let reserialized: Vec<String> = set
            .iter()
            .map(|d| {
                d.faces()
                    .iter()
                    .map(|f| f.to_string())
                    .collect::<Vec<_>>()
                    .join(",")
            })
            .collect();
        let reparsed = parse_dice_set(&reserialized).unwrap();

        assert_eq!(set, reparsed);
    }
}
