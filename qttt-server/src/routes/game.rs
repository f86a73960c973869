//! Game API routes
//!
//! The UI drives pacing: it posts the human move, then asks for the
//! mind's move separately so it can animate the proposals in between.

use axum::{extract::State, Json};
use qttt_core::{Decision, Game, GameState, MindConfig, Position, QuantumMind, Symbol};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::error::ApiError;
use crate::routes::rules::RulesChoice;
use crate::state::{GameSession, ServerState};

#[derive(Debug, Default, Deserialize)]
pub struct StartGameRequest {
    #[serde(flatten)]
    pub rules: RulesChoice,
    /// Side played by the human (default X)
    pub human: Option<Symbol>,
    pub seed: Option<u64>,
}

#[derive(Debug, Deserialize)]
pub struct MoveRequest {
    pub row: usize,
    pub col: usize,
}

/// Session snapshot sent after every call
#[derive(Serialize)]
pub struct GameView {
    pub state: GameState,
    pub human: Symbol,
    pub human_to_move: bool,
    pub board_text: String,
    pub available: Vec<Position>,
    pub winning_line: Option<Vec<Position>>,
    pub decision: Option<Decision>,
}

impl GameView {
    fn of(session: &GameSession) -> Self {
        let state = &session.state;
        Self {
            state: state.clone(),
            human: session.game.human(),
            human_to_move: session.game.is_human_turn(state),
            board_text: state.board.render(&state.rules),
            available: state.available_moves(),
            winning_line: state.winning_line(),
            decision: session.last_decision.clone(),
        }
    }
}

/// Start a new game, replacing any current session
pub async fn start_game(
    State(server): State<Arc<ServerState>>,
    Json(req): Json<StartGameRequest>,
) -> Result<Json<GameView>, ApiError> {
    let rules = req.rules.resolve()?;
    let human = req.human.unwrap_or(Symbol::X);
    let config = MindConfig {
        seed: req.seed,
        ..MindConfig::default()
    };

    let game = Game::new(rules, human, QuantumMind::new(config));
    let mut state = game.new_game();
    let mut last_decision = None;

    // Mind opens when the human plays second
    if !game.is_human_turn(&state) {
        let (next, decision) = game.opponent_move(&state)?;
        state = next;
        last_decision = Some(decision);
    }

    tracing::info!("Started game: rules={}, human={}", state.rules.name, human);

    let session = GameSession {
        game,
        state,
        last_decision,
    };
    let view = GameView::of(&session);
    *server.session() = Some(session);
    Ok(Json(view))
}

pub async fn get_game_state(
    State(server): State<Arc<ServerState>>,
) -> Result<Json<GameView>, ApiError> {
    let slot = server.session();
    let session = slot.as_ref().ok_or_else(ApiError::no_session)?;
    Ok(Json(GameView::of(session)))
}

/// Apply the human's move
pub async fn make_player_move(
    State(server): State<Arc<ServerState>>,
    Json(req): Json<MoveRequest>,
) -> Result<Json<GameView>, ApiError> {
    let mut slot = server.session();
    let session = slot.as_mut().ok_or_else(ApiError::no_session)?;

    let next = session
        .game
        .player_move(&session.state, Position::new(req.row, req.col))?;
    session.state = next;
    session.last_decision = None;

    Ok(Json(GameView::of(session)))
}

/// Let the mind move and return its full decision
pub async fn get_ai_move(
    State(server): State<Arc<ServerState>>,
) -> Result<Json<GameView>, ApiError> {
    let mut slot = server.session();
    let session = slot.as_mut().ok_or_else(ApiError::no_session)?;

    let (next, decision) = session.game.opponent_move(&session.state)?;
    if decision.fallback {
        tracing::warn!("mind fell back to the first available cell at {}", decision.position);
    }
    session.state = next;
    session.last_decision = Some(decision);

    Ok(Json(GameView::of(session)))
}
