//! Data models for the game service.

use chrono::{DateTime, Utc};
use dice_duel_core::{DiceSet, FirstPlayerCommit, ProbabilityTable, RoundOutcome};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Game ID
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GameId(pub Uuid);

impl GameId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for GameId {
    fn default() -> Self {
        Self::new()
    }
}

/// One stored game: the dice set, its published odds, running counters, and
/// the round history. The core returns deltas only; the counters live here.
pub struct Game {
    pub id: GameId,
    pub dice: DiceSet,
    pub probabilities: ProbabilityTable,
    pub player_wins: u32,
    pub computer_wins: u32,
    pub total_rounds: u32,
    /// First-player commitment whose digest is out but whose secret is not.
    pub pending_first_player: Option<FirstPlayerCommit>,
    pub rounds: Vec<RoundRecord>,
    pub created_at: DateTime<Utc>,
}

impl Game {
    pub fn new(id: GameId, dice: DiceSet, probabilities: ProbabilityTable) -> Self {
        Self {
            id,
            dice,
            probabilities,
            player_wins: 0,
            computer_wins: 0,
            total_rounds: 0,
            pending_first_player: None,
            rounds: Vec::new(),
            created_at: Utc::now(),
        }
    }
}

/// A resolved round with its position in the game.
#[derive(Clone, Debug, Serialize)]
pub struct RoundRecord {
    pub round_number: u32,
    pub outcome: RoundOutcome,
    pub created_at: DateTime<Utc>,
}

/// Running counters snapshot returned alongside each round.
#[derive(Clone, Copy, Debug, Serialize)]
pub struct GameStats {
    pub player_wins: u32,
    pub computer_wins: u32,
    pub total_rounds: u32,
}
