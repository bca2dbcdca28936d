//! Pairwise win-probability analysis over a dice set.
//!
//! These are published fairness odds, so the enumeration is exact: every
//! ordered pair of distinct dice is scored over the full face cross product.
//! O(d^2 * f^2), fine for the bounded inputs of this domain.

use crate::dice::DiceSet;
use serde::{Deserialize, Serialize};

/// Win statistics for one ordered pair of dice. `total` is always the full
/// cross product; ties count toward `total` but toward neither side's wins,
/// so `probability(A,B)` and `probability(B,A)` need not sum to 100.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Matchup {
    pub wins: u32,
    pub total: u32,
    /// Win percentage, rounded to 2 decimal places.
    pub probability: f64,
}

/// Win probabilities for every ordered pair of distinct dice in a set.
/// Derived purely from the set; recompute only when the set changes.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ProbabilityMatrix {
    names: Vec<String>,
    /// `entries[a][b]` for die `a` against die `b`; `None` on the diagonal.
    entries: Vec<Vec<Option<Matchup>>>,
}

/// Rendered comparison table for display: one row per die, self-pairs shown
/// as 50.00% by convention since a die cannot play itself.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ProbabilityTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl ProbabilityMatrix {
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Matchup of die `a` against die `b` by position. `None` for self-pairs
    /// and out-of-range indices.
    pub fn get(&self, a: usize, b: usize) -> Option<&Matchup> {
        self.entries.get(a)?.get(b)?.as_ref()
    }

    /// Matchup looked up by die names.
    pub fn by_name(&self, a: &str, b: &str) -> Option<&Matchup> {
        let a = self.names.iter().position(|n| n == a)?;
        let b = self.names.iter().position(|n| n == b)?;
        self.get(a, b)
    }

    /// Render the comparison table the way it is published to players.
    pub fn table(&self) -> ProbabilityTable {
        let mut headers = Vec::with_capacity(self.names.len() + 1);
        headers.push("Dice vs Dice".to_string());
        headers.extend(self.names.iter().cloned());

        let rows = self
            .names
            .iter()
            .enumerate()
            .map(|(a, name)| {
                let mut row = Vec::with_capacity(self.names.len() + 1);
                row.push(name.clone());
                for b in 0..self.names.len() {
                    match self.get(a, b) {
                        Some(m) => row.push(format!("{:.2}%", m.probability)),
                        None => row.push("50.00%".to_string()),
                    }
                }
                row
            })
            .collect();

        ProbabilityTable { headers, rows }
    }
}

/// Compute the full pairwise win-probability matrix for a dice set.
pub fn compute_matrix(dice_set: &DiceSet) -> ProbabilityMatrix {
    let dice = dice_set.dice();
    let names = dice.iter().map(|d| d.name().to_string()).collect();

    let entries = dice
        .iter()
        .enumerate()
        .map(|(a, die_a)| {
            dice.iter()
                .enumerate()
                .map(|(b, die_b)| {
                    if a == b {
                        return None;
                    }

                    let mut wins = 0u32;
                    let mut total = 0u32;
                    for &face_a in die_a.faces() {
                        for &face_b in die_b.faces() {
                            total += 1;
                            if face_a > face_b {
                                wins += 1;
                            }
                        }
                    }

                    let probability =
                        (wins as f64 / total as f64 * 100.0 * 100.0).round() / 100.0;
                    Some(Matchup {
                        wins,
                        total,
                        probability,
                    })
                })
                .collect()
        })
        .collect();

    ProbabilityMatrix { names, entries }
}
