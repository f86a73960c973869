//! QTTT Core - Game model and the strategy-interference opponent
//!
//! This crate provides the core logic for quantum-flavoured tic-tac-toe:
//! - Board geometry and rule configuration (3x3, optional extra column)
//! - Win/draw detection with sliding windows
//! - Eight heuristic strategies, each proposing one move with an amplitude
//! - QuantumMind aggregation engine that interferes the proposals
//! - Game controller alternating human and mind turns

pub mod amplitude;
pub mod board;
pub mod error;
pub mod game;
pub mod mind;
pub mod patterns;
pub mod rules;
pub mod strategy;

// Re-exports for convenient access
pub use amplitude::Amplitude;
pub use board::{Board, Cell, Position, Status, Symbol, BASE_COLS, ROWS};
pub use error::{GameError, IllegalReason, ParseError, RulesError};
pub use game::{Game, GameState};
pub use mind::{Aggregation, Decision, MindConfig, ProposalSet, QuantumMind, Tally};
pub use rules::Rules;
pub use strategy::{Proposal, Strategy, ALL_STRATEGIES};
