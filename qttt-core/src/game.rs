//! Game controller - turn alternation between the human and the mind

use serde::{Deserialize, Serialize};

use crate::board::{Board, Position, Status, Symbol};
use crate::error::GameError;
use crate::mind::{Decision, QuantumMind};
use crate::rules::Rules;

/// First player to move
pub const FIRST_PLAYER: Symbol = Symbol::X;

// ============================================================================
// GAME STATE
// ============================================================================

/// Snapshot of a game (replaced wholesale on every move)
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    pub board: Board,
    pub current: Symbol,
    pub status: Status,
    pub rules: Rules,
    pub last_move: Option<Position>,
    pub moves_played: usize,
}

impl GameState {
    pub fn new(rules: Rules) -> Self {
        Self {
            board: Board::empty(&rules),
            current: FIRST_PLAYER,
            status: Status::Playing,
            rules,
            last_move: None,
            moves_played: 0,
        }
    }

    pub fn is_over(&self) -> bool {
        self.status.is_terminal()
    }

    pub fn available_moves(&self) -> Vec<Position> {
        self.board.available_moves(&self.rules)
    }

    /// Place the current player's symbol, re-evaluate, and pass the turn
    pub fn play(&self, pos: Position) -> Result<GameState, GameError> {
        if self.is_over() {
            return Err(GameError::GameOver(self.status));
        }
        let board = self.board.apply_move(&self.rules, self.current, pos)?;
        let status = board.status(&self.rules);
        let current = if status.is_terminal() {
            self.current
        } else {
            self.current.opponent()
        };

        Ok(GameState {
            board,
            current,
            status,
            rules: self.rules.clone(),
            last_move: Some(pos),
            moves_played: self.moves_played + 1,
        })
    }

    /// Cells of the winning run, if the game was won
    pub fn winning_line(&self) -> Option<Vec<Position>> {
        self.board.winning_line(&self.rules).map(|(_, line)| line)
    }
}

// ============================================================================
// CONTROLLER
// ============================================================================

/// Human vs QuantumMind controller
pub struct Game {
    rules: Rules,
    human: Symbol,
    mind: QuantumMind,
}

impl Game {
    pub fn new(rules: Rules, human: Symbol, mind: QuantumMind) -> Self {
        Self { rules, human, mind }
    }

    pub fn rules(&self) -> &Rules {
        &self.rules
    }

    pub fn human(&self) -> Symbol {
        self.human
    }

    /// Side played by the mind
    pub fn opponent(&self) -> Symbol {
        self.human.opponent()
    }

    pub fn mind(&self) -> &QuantumMind {
        &self.mind
    }

    pub fn new_game(&self) -> GameState {
        GameState::new(self.rules.clone())
    }

    /// Same as `new_game` with the configured rules
    pub fn reset(&self) -> GameState {
        tracing::debug!("resetting game with rules '{}'", self.rules.name);
        self.new_game()
    }

    pub fn is_human_turn(&self, state: &GameState) -> bool {
        !state.is_over() && state.current == self.human
    }

    /// Apply the human's move; the input state is left untouched on error
    pub fn player_move(&self, state: &GameState, pos: Position) -> Result<GameState, GameError> {
        if state.is_over() {
            return Err(GameError::GameOver(state.status));
        }
        if state.current != self.human {
            return Err(GameError::NotYourTurn {
                expected: state.current,
                actual: self.human,
            });
        }
        state.play(pos)
    }

    /// Let the mind choose and apply its move
    pub fn opponent_move(&self, state: &GameState) -> Result<(GameState, Decision), GameError> {
        if state.is_over() {
            return Err(GameError::GameOver(state.status));
        }
        let side = self.opponent();
        if state.current != side {
            return Err(GameError::NotYourTurn {
                expected: state.current,
                actual: side,
            });
        }

        let decision = self.mind.think(&state.board, &state.rules, side)?;
        let next = state.play(decision.position)?;
        tracing::debug!("mind played {} -> {}", decision.position, next.status);
        Ok((next, decision))
    }
}

// ============================================================================
// TESTS
// ============================================================================
