//! Application state management.
//!
//! The core engine is stateless; everything mutable for a game (counters,
//! history, the pending first-player commitment) lives behind this lock so
//! racing requests for one game stay isolated.

use crate::models::*;
use dice_duel_core::{DiceSet, FirstPlayerCommit, ProbabilityTable, RoundOutcome, Winner};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Shared application state
#[derive(Clone, Default)]
pub struct AppState {
    inner: Arc<Mutex<HashMap<GameId, Game>>>,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create_game(&self, dice: DiceSet, probabilities: ProbabilityTable) -> GameId {
        let id = GameId::new();
        let game = Game::new(id, dice, probabilities);
        self.inner.lock().unwrap().insert(id, game);
        id
    }

    pub fn game_exists(&self, id: GameId) -> bool {
        self.inner.lock().unwrap().contains_key(&id)
    }

    pub fn game_dice(&self, id: GameId) -> Option<DiceSet> {
        self.inner.lock().unwrap().get(&id).map(|g| g.dice.clone())
    }

    /// Park a first-player commitment whose digest has been disclosed.
    /// Replaces any stale pending commitment for the game.
    pub fn set_pending_first_player(&self, id: GameId, commit: FirstPlayerCommit) -> bool {
        match self.inner.lock().unwrap().get_mut(&id) {
            Some(game) => {
                game.pending_first_player = Some(commit);
                true
            }
            None => false,
        }
    }

    /// Claim the pending commitment for settlement. Outer `None` means the
    /// game is unknown, inner `None` that nothing was pending.
    pub fn take_pending_first_player(&self, id: GameId) -> Option<Option<FirstPlayerCommit>> {
        self.inner
            .lock()
            .unwrap()
            .get_mut(&id)
            .map(|game| game.pending_first_player.take())
    }

    /// Append an outcome to the game's history and bump the counters under
    /// one lock acquisition.
    pub fn record_round(&self, id: GameId, outcome: RoundOutcome) -> Option<(u32, GameStats)> {
        let mut games = self.inner.lock().unwrap();
        let game = games.get_mut(&id)?;

        match outcome.winner {
            Winner::Player => game.player_wins += 1,
            Winner::Computer => game.computer_wins += 1,
            Winner::Tie => {}
        }
        game.total_rounds += 1;

        let round_number = game.total_rounds;
        game.rounds.push(RoundRecord {
            round_number,
            outcome,
            created_at: chrono::Utc::now(),
        });

        Some((
            round_number,
            GameStats {
                player_wins: game.player_wins,
                computer_wins: game.computer_wins,
                total_rounds: game.total_rounds,
            },
        ))
    }

    /// Counters plus the `limit` most recent rounds, newest first.
    pub fn game_summary(&self, id: GameId, limit: usize) -> Option<(GameStats, Vec<RoundRecord>)> {
        let games = self.inner.lock().unwrap();
        let game = games.get(&id)?;

        let recent: Vec<RoundRecord> = game.rounds.iter().rev().take(limit).cloned().collect();
        Some((
            GameStats {
                player_wins: game.player_wins,
                computer_wins: game.computer_wins,
                total_rounds: game.total_rounds,
            },
            recent,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dice_duel_core::{compute_matrix, parse_dice_set, resolve_round, OsEntropy};

    fn seeded_state() -> (AppState, GameId) {
        let dice = parse_dice_set(&["2,2,4,4,9,9", "6,8,1,1,8,6", "7,5,3,7,5,3"]).unwrap();
        let table = compute_matrix(&dice).table();
        let state = AppState::new();
        let id = state.create_game(dice, table);
        (state, id)
    }

    #[test]
    fn test_record_round_updates_counters() {
        let (state, id) = seeded_state();
        let dice = state.game_dice(id).unwrap();
        let mut entropy = OsEntropy;

        for expected_round in 1..=5 {
            let outcome = resolve_round(&dice, 0, 1, 3, &mut entropy).unwrap();
            let (round_number, stats) = state.record_round(id, outcome).unwrap();
            assert_eq!(round_number, expected_round);
            assert_eq!(stats.total_rounds, expected_round);
            assert!(stats.player_wins + stats.computer_wins <= stats.total_rounds);
        }

        let (stats, recent) = state.game_summary(id, 3).unwrap();
        assert_eq!(stats.total_rounds, 5);
        assert_eq!(recent.len(), 3);
        assert_eq!(recent[0].round_number, 5);
        assert_eq!(recent[2].round_number, 3);
    }

    #[test]
    fn test_unknown_game_is_distinguished_from_missing_commitment() {
        let (state, id) = seeded_state();
        assert!(state.take_pending_first_player(GameId::new()).is_none());
        assert!(state.take_pending_first_player(id).unwrap().is_none());
    }
}
