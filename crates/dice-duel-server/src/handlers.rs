//! HTTP API handlers.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use dice_duel_core::{
    choose_computer_die, compute_matrix, parse_dice_set, resolve_round, CommitKey, Digest,
    DiceSet, Error, FirstPlayer, FirstPlayerCommit, OsEntropy, ProbabilityTable, RoundOutcome,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{GameId, GameStats, RoundRecord};
use crate::state::AppState;

// ============ Request/Response types ============

#[derive(Deserialize)]
pub struct InitGameRequest {
    pub dice_config: Vec<String>,
}

#[derive(Serialize)]
pub struct InitGameResponse {
    pub game_id: Uuid,
    pub dice: DiceSet,
    pub probabilities: ProbabilityTable,
}

#[derive(Serialize)]
pub struct FirstPlayerCommitResponse {
    /// Disclosed strictly before the secret and key.
    pub digest: Digest,
}

#[derive(Deserialize)]
pub struct CompleteFirstPlayerRequest {
    pub player_number: u64,
}

#[derive(Serialize)]
pub struct CompleteFirstPlayerResponse {
    pub first_player: FirstPlayer,
    pub player_number: u64,
    pub computer_number: u64,
    pub key: CommitKey,
    pub digest: Digest,
    pub verified: bool,
}

#[derive(Deserialize)]
pub struct ComputerMoveRequest {
    pub player_die_index: usize,
}

#[derive(Serialize)]
pub struct ComputerMoveResponse {
    pub computer_die_index: usize,
    pub computer_die_name: String,
}

#[derive(Deserialize)]
pub struct PlayRoundRequest {
    pub player_die_index: usize,
    pub computer_die_index: usize,
    pub player_number: u64,
}

#[derive(Serialize)]
pub struct PlayRoundResponse {
    pub round_number: u32,
    #[serde(flatten)]
    pub outcome: RoundOutcome,
    pub game_stats: GameStats,
}

#[derive(Serialize)]
pub struct StatsResponse {
    pub game_id: Uuid,
    pub stats: GameStats,
    pub recent_rounds: Vec<RoundRecord>,
}

#[derive(Serialize)]
pub struct PresetsResponse {
    pub classic: Vec<&'static str>,
    pub simple: Vec<&'static str>,
    pub extreme: Vec<&'static str>,
}

// ============ Error mapping ============

/// `VerificationFailed` gets its own status: it is a fairness violation,
/// not a bad request.
fn core_error_response(err: Error) -> (StatusCode, Json<serde_json::Value>) {
    let status = match &err {
        Error::Validation(_) => StatusCode::BAD_REQUEST,
        Error::VerificationFailed => StatusCode::CONFLICT,
        Error::EntropyUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
    };
    (status, Json(serde_json::json!({ "error": err.to_string() })))
}

fn game_not_found() -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::NOT_FOUND,
        Json(serde_json::json!({ "error": "Game not found" })),
    )
}

// ============ Handlers ============

pub async fn init_game(
    State(state): State<AppState>,
    Json(req): Json<InitGameRequest>,
) -> impl IntoResponse {
    let dice = match parse_dice_set(&req.dice_config) {
        Ok(dice) => dice,
        Err(err) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(serde_json::json!({
                    "error": err.to_string(),
                    "example": ["2,2,4,4,9,9", "6,8,1,1,8,6", "7,5,3,7,5,3"],
                })),
            );
        }
    };

    let probabilities = compute_matrix(&dice).table();
    let game_id = state.create_game(dice.clone(), probabilities.clone());

    tracing::info!("Created game {:?} with {} dice", game_id, dice.len());

    (
        StatusCode::OK,
        Json(serde_json::json!(InitGameResponse {
            game_id: game_id.0,
            dice,
            probabilities,
        })),
    )
}

pub async fn begin_first_player(
    State(state): State<AppState>,
    Path(game_id): Path<Uuid>,
) -> impl IntoResponse {
    let game_id = GameId(game_id);
    if !state.game_exists(game_id) {
        return game_not_found();
    }

    let commit = match FirstPlayerCommit::begin(&mut OsEntropy) {
        Ok(commit) => commit,
        Err(err) => return core_error_response(err),
    };
    let digest = commit.digest();
    state.set_pending_first_player(game_id, commit);

    (
        StatusCode::OK,
        Json(serde_json::json!(FirstPlayerCommitResponse { digest })),
    )
}

pub async fn complete_first_player(
    State(state): State<AppState>,
    Path(game_id): Path<Uuid>,
    Json(req): Json<CompleteFirstPlayerRequest>,
) -> impl IntoResponse {
    if req.player_number > 1 {
        return (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({ "error": "player_number must be 0 or 1" })),
        );
    }

    let commit = match state.take_pending_first_player(GameId(game_id)) {
        None => return game_not_found(),
        Some(None) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(serde_json::json!({
                    "error": "No pending first-player commitment for this game"
                })),
            );
        }
        Some(Some(commit)) => commit,
    };

    let outcome = commit.settle(req.player_number);
    tracing::info!(
        "Game {} first player settled: {:?}",
        game_id,
        outcome.first
    );

    (
        StatusCode::OK,
        Json(serde_json::json!(CompleteFirstPlayerResponse {
            first_player: outcome.first,
            player_number: outcome.player_number,
            computer_number: outcome.computer_number,
            verified: outcome.verify(),
            key: outcome.key,
            digest: outcome.digest,
        })),
    )
}

pub async fn computer_move(
    State(state): State<AppState>,
    Path(game_id): Path<Uuid>,
    Json(req): Json<ComputerMoveRequest>,
) -> impl IntoResponse {
    let dice = match state.game_dice(GameId(game_id)) {
        Some(dice) => dice,
        None => return game_not_found(),
    };

    let computer_die_index =
        match choose_computer_die(&dice, req.player_die_index, &mut OsEntropy) {
            Ok(index) => index,
            Err(err) => return core_error_response(err),
        };
    let computer_die_name = match dice.get(computer_die_index) {
        Ok(die) => die.name().to_string(),
        Err(err) => return core_error_response(err.into()),
    };

    (
        StatusCode::OK,
        Json(serde_json::json!(ComputerMoveResponse {
            computer_die_index,
            computer_die_name,
        })),
    )
}

pub async fn play_round(
    State(state): State<AppState>,
    Path(game_id): Path<Uuid>,
    Json(req): Json<PlayRoundRequest>,
) -> impl IntoResponse {
    if req.player_number > 5 {
        return (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({ "error": "player_number must be in 0..=5" })),
        );
    }

    let game_id = GameId(game_id);
    let dice = match state.game_dice(game_id) {
        Some(dice) => dice,
        None => return game_not_found(),
    };

    let outcome = match resolve_round(
        &dice,
        req.player_die_index,
        req.computer_die_index,
        req.player_number,
        &mut OsEntropy,
    ) {
        Ok(outcome) => outcome,
        Err(err) => return core_error_response(err),
    };

    let (round_number, game_stats) = match state.record_round(game_id, outcome.clone()) {
        Some(recorded) => recorded,
        None => return game_not_found(),
    };

    tracing::info!(
        "Game {:?} round {}: {:?} ({} vs {})",
        game_id,
        round_number,
        outcome.winner,
        outcome.player_roll,
        outcome.computer_roll
    );

    (
        StatusCode::OK,
        Json(serde_json::json!(PlayRoundResponse {
            round_number,
            outcome,
            game_stats,
        })),
    )
}

pub async fn get_stats(
    State(state): State<AppState>,
    Path(game_id): Path<Uuid>,
) -> impl IntoResponse {
    match state.game_summary(GameId(game_id), 10) {
        Some((stats, recent_rounds)) => (
            StatusCode::OK,
            Json(serde_json::json!(StatsResponse {
                game_id,
                stats,
                recent_rounds,
            })),
        ),
        None => game_not_found(),
    }
}

/// Quick-start dice sets for the UI.
pub async fn get_presets() -> impl IntoResponse {
    Json(PresetsResponse {
        classic: vec!["2,2,4,4,9,9", "6,8,1,1,8,6", "7,5,3,7,5,3"],
        simple: vec!["1,1,6,6,8,8", "2,2,5,5,9,9", "3,3,4,4,7,7"],
        extreme: vec!["1,1,1,6,6,6", "2,2,2,5,5,5", "3,3,3,4,4,4"],
    })
}

pub async fn health() -> &'static str {
    "ok"
}
