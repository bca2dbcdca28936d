//! Dice definitions.

mod parser;

pub use parser::parse_dice_set;

use crate::error::ValidationError;
use serde::{Deserialize, Serialize};

/// A named die with six ordered faces. Duplicates are allowed and order is
/// significant: faces are addressed by roll index.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Die {
    name: String,
    faces: [i32; 6],
}

impl Die {
    pub const FACE_COUNT: usize = 6;

    pub fn new(name: impl Into<String>, faces: [i32; 6]) -> Self {
        Self {
            name: name.into(),
            faces,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn faces(&self) -> &[i32; 6] {
        &self.faces
    }

    /// Face addressed by roll index; indices wrap modulo the face count.
    pub fn face(&self, index: u64) -> i32 {
        self.faces[(index % Self::FACE_COUNT as u64) as usize]
    }
}

/// An ordered set of at least three dice, built once per game. Two dice may
/// carry identical faces; identity is positional, not by value.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DiceSet(Vec<Die>);

impl DiceSet {
    pub const MIN_DICE: usize = 3;

    pub fn new(dice: Vec<Die>) -> Result<Self, ValidationError> {
        if dice.len() < Self::MIN_DICE {
            return Err(ValidationError::TooFewDice { given: dice.len() });
        }
        Ok(Self(dice))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, index: usize) -> Result<&Die, ValidationError> {
        self.0
            .get(index)
            .ok_or(ValidationError::DieIndexOutOfRange {
                index,
                len: self.0.len(),
            })
    }

    pub fn dice(&self) -> &[Die] {
        &self.0
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Die> {
        self.0.iter()
    }
}
