//! Dice Duel Service
//!
//! Thin orchestration over the core fairness engine: an in-memory game
//! store and a JSON API for setup, first-player determination, and rounds.

mod handlers;
mod models;
mod state;

use axum::{
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use tower_http::cors::{Any, CorsLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use handlers::*;
use state::AppState;

fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/game/init", post(init_game))
        .route("/api/game/:game_id/first-player", post(begin_first_player))
        .route(
            "/api/game/:game_id/first-player/complete",
            post(complete_first_player),
        )
        .route("/api/game/:game_id/computer-move", post(computer_move))
        .route("/api/game/:game_id/play", post(play_round))
        .route("/api/game/:game_id/stats", get(get_stats))
        .route("/api/presets", get(get_presets))
        .route("/api/health", get(health))
        .layer(cors)
        .with_state(state)
}

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .init();

    let state = AppState::new();
    let app = create_router(state);

    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(3001);
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Dice Duel service listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}
