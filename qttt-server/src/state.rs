//! Server state management
//!
//! One interactive session at a time, like a single local board.

use qttt_core::{Decision, Game, GameState};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Interactive game session
pub struct GameSession {
    pub game: Game,
    pub state: GameState,
    pub last_decision: Option<Decision>,
}

/// Server-wide shared state
pub struct ServerState {
    session: Mutex<Option<GameSession>>,
}

impl ServerState {
    pub fn new() -> Self {
        Self {
            session: Mutex::new(None),
        }
    }

    /// Lock the session slot; a poisoned lock still holds a usable session
    pub fn session(&self) -> MutexGuard<'_, Option<GameSession>> {
        self.session.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for ServerState {
    fn default() -> Self {
        Self::new()
    }
}
