//! The eight strategies ("basis states")
//!
//! Each strategy walks a fixed priority table of targets and proposes the
//! first one that is available, with the confidence attached to that tier.
//! Phases are spaced pi/4 apart; apart from `Random`, each proposal's phase
//! gets a bounded random offset that never affects the chosen cell or the
//! confidence.

use std::f64::consts::FRAC_PI_4;
use std::f64::consts::FRAC_PI_8;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::amplitude::Amplitude;
use crate::board::{Board, Position, Symbol};
use crate::patterns::{
    first_free_corner, first_free_edge, first_opportunity, fork_moves, free_center, mirror_reply,
    winning_moves,
};
use crate::rules::Rules;

/// Maximum phase offset applied by `Strategy::suggest` (one eighth of a turn)
pub const PHASE_NOISE: f64 = FRAC_PI_4;

// ============================================================================
// STRATEGY SET
// ============================================================================

/// Closed set of heuristic personalities
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Strategy {
    CenterFirst,
    Defensive,
    Mirror,
    Fork,
    Aggressive,
    Random,
    Conservative,
    LongTerm,
}

/// Invocation order of the mind
pub const ALL_STRATEGIES: [Strategy; 8] = [
    Strategy::CenterFirst,
    Strategy::Defensive,
    Strategy::Mirror,
    Strategy::Fork,
    Strategy::Aggressive,
    Strategy::Random,
    Strategy::Conservative,
    Strategy::LongTerm,
];

/// What a policy tier aims at
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Target {
    /// Complete own window
    Win,
    /// Take the opponent's winning cell
    Block,
    /// Create two threats at once
    Fork,
    /// Take the opponent's fork cell
    BlockFork,
    /// Set up one threat
    Opportunity,
    /// Mirror the opponent's latest piece
    Mirror,
    /// Center, only on a blank board
    OpeningCenter,
    Center,
    Corner,
    Edge,
    /// First available cell
    Any,
}

type Policy = &'static [(Target, f64)];

const CENTER_FIRST: Policy = &[
    (Target::Center, 1.0),
    (Target::Corner, 0.8),
    (Target::Edge, 0.6),
    (Target::Any, 0.3),
];
const DEFENSIVE: Policy = &[
    (Target::Block, 0.9),
    (Target::Center, 0.7),
    (Target::Corner, 0.6),
    (Target::Any, 0.3),
];
const MIRROR: Policy = &[
    (Target::OpeningCenter, 0.8),
    (Target::Mirror, 0.7),
    (Target::Win, 0.6),
    (Target::Center, 0.5),
    (Target::Any, 0.3),
];
const FORK: Policy = &[
    (Target::Fork, 0.9),
    (Target::BlockFork, 0.8),
    (Target::Center, 0.7),
    (Target::Corner, 0.6),
    (Target::Any, 0.3),
];
const AGGRESSIVE: Policy = &[
    (Target::Win, 1.0),
    (Target::Block, 0.9),
    (Target::Opportunity, 0.8),
    (Target::Center, 0.7),
    (Target::Corner, 0.6),
    (Target::Any, 0.4),
];
const CONSERVATIVE: Policy = &[
    (Target::Block, 0.9),
    (Target::Center, 0.8),
    (Target::Edge, 0.7),
    (Target::Corner, 0.5),
    (Target::Any, 0.3),
];
const LONG_TERM: Policy = &[
    (Target::Win, 1.0),
    (Target::Block, 0.9),
    (Target::Fork, 0.8),
    (Target::BlockFork, 0.7),
    (Target::Center, 0.6),
    (Target::Corner, 0.5),
    (Target::Any, 0.3),
];

/// Random strategy confidence per cell class, before clamping
const RANDOM_CENTER: f64 = 0.6;
const RANDOM_CORNER: f64 = 0.5;
const RANDOM_EDGE: f64 = 0.4;
const RANDOM_MIN: f64 = 0.1;
const RANDOM_MAX: f64 = 0.9;

/// Deterministic part of a proposal
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Intent {
    pub position: Position,
    /// Base magnitude of the chosen tier
    pub confidence: f64,
    /// Base phase plus any deterministic offset
    pub phase: f64,
}

impl Strategy {
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn label(self) -> &'static str {
        match self {
            Strategy::CenterFirst => "center-first",
            Strategy::Defensive => "defensive",
            Strategy::Mirror => "mirror",
            Strategy::Fork => "fork",
            Strategy::Aggressive => "aggressive",
            Strategy::Random => "random",
            Strategy::Conservative => "conservative",
            Strategy::LongTerm => "long-term",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        ALL_STRATEGIES
            .into_iter()
            .find(|s| s.label().eq_ignore_ascii_case(label.trim()))
    }

    /// Evenly spaced at pi/4 starting from 0
    pub fn base_phase(self) -> f64 {
        self.index() as f64 * FRAC_PI_4
    }

    fn policy(self) -> Policy {
        match self {
            Strategy::CenterFirst => CENTER_FIRST,
            Strategy::Defensive => DEFENSIVE,
            Strategy::Mirror => MIRROR,
            Strategy::Fork => FORK,
            Strategy::Aggressive => AGGRESSIVE,
            Strategy::Conservative => CONSERVATIVE,
            Strategy::LongTerm => LONG_TERM,
            // Random does not walk a table
            Strategy::Random => &[],
        }
    }

    /// Whether `suggest` adds random phase noise
    pub fn is_jittered(self) -> bool {
        self != Strategy::Random
    }

    /// Pick a cell and confidence; None only when no legal cell exists
    pub fn intent(self, board: &Board, rules: &Rules, player: Symbol) -> Option<Intent> {
        let available = board.available_moves(rules);
        if available.is_empty() {
            return None;
        }

        if self == Strategy::Random {
            return Some(random_intent(board, rules, &available, self.base_phase()));
        }

        self.policy()
            .iter()
            .find_map(|&(target, confidence)| {
                resolve(target, board, rules, player, &available).map(|position| Intent {
                    position,
                    confidence,
                    phase: self.base_phase(),
                })
            })
    }

    /// Produce this strategy's proposal for the position
    ///
    /// Returns the zero-magnitude placeholder at the first cell when the
    /// board has no legal move; it must never be applied.
    pub fn suggest<R: Rng>(
        self,
        board: &Board,
        rules: &Rules,
        player: Symbol,
        rng: &mut R,
    ) -> Proposal {
        match self.intent(board, rules, player) {
            Some(intent) => {
                let noise = if self.is_jittered() {
                    rng.gen_range(-PHASE_NOISE..=PHASE_NOISE)
                } else {
                    0.0
                };
                Proposal::from_intent(self, intent, player, noise)
            }
            None => Proposal::placeholder(self, player),
        }
    }

    /// Like `suggest` with no phase noise
    pub fn suggest_exact(self, board: &Board, rules: &Rules, player: Symbol) -> Proposal {
        match self.intent(board, rules, player) {
            Some(intent) => Proposal::from_intent(self, intent, player, 0.0),
            None => Proposal::placeholder(self, player),
        }
    }
}

/// Map a policy tier to a concrete cell
fn resolve(
    target: Target,
    board: &Board,
    rules: &Rules,
    player: Symbol,
    available: &[Position],
) -> Option<Position> {
    let opponent = player.opponent();
    match target {
        Target::Win => winning_moves(board, rules, player).first().copied(),
        Target::Block => winning_moves(board, rules, opponent).first().copied(),
        Target::Fork => fork_moves(board, rules, player).first().copied(),
        Target::BlockFork => fork_moves(board, rules, opponent).first().copied(),
        Target::Opportunity => first_opportunity(board, rules, player),
        Target::Mirror => mirror_reply(board, rules, player),
        Target::OpeningCenter if board.is_blank() => free_center(board, rules),
        Target::OpeningCenter => None,
        Target::Center => free_center(board, rules),
        Target::Corner => first_free_corner(board, rules),
        Target::Edge => first_free_edge(board, rules),
        Target::Any => available.first().copied(),
    }
}

// ============================================================================
// RANDOM STRATEGY
// ============================================================================

/// Index hash: sum of (cell index + 1) * symbol code
pub fn board_hash(board: &Board) -> u64 {
    board
        .cells()
        .iter()
        .enumerate()
        .map(|(i, cell)| (i as u64 + 1) * cell.map_or(0, Symbol::code))
        .fold(0u64, u64::wrapping_add)
}

/// Phase hash: squared index weights scaled by 31, plus the index hash
pub fn board_phase_hash(board: &Board) -> u64 {
    let squares = board
        .cells()
        .iter()
        .enumerate()
        .map(|(i, cell)| {
            let weight = (i as u64 + 1) * (i as u64 + 1);
            weight.wrapping_mul(cell.map_or(0, Symbol::code))
        })
        .fold(0u64, u64::wrapping_add);
    squares.wrapping_mul(31).wrapping_add(board_hash(board))
}

/// Phase offset in [-pi/8, pi/8] derived from the board
fn hashed_phase_offset(board: &Board) -> f64 {
    let step = (board_phase_hash(board) % 17) as f64 - 8.0;
    step / 8.0 * FRAC_PI_8
}

fn random_intent(board: &Board, rules: &Rules, available: &[Position], base_phase: f64) -> Intent {
    let index = (board_hash(board) % available.len() as u64) as usize;
    let position = available[index];
    let confidence = if position == rules.center() {
        RANDOM_CENTER
    } else if rules.is_corner(position) {
        RANDOM_CORNER
    } else {
        RANDOM_EDGE
    };
    Intent {
        position,
        confidence: confidence.clamp(RANDOM_MIN, RANDOM_MAX),
        phase: base_phase + hashed_phase_offset(board),
    }
}

// ============================================================================
// PROPOSAL
// ============================================================================

/// One strategy's candidate move
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Proposal {
    pub strategy: Strategy,
    pub position: Position,
    /// Base magnitude, free of phase noise
    pub confidence: f64,
    pub amplitude: Amplitude,
    pub player: Symbol,
}

impl Proposal {
    fn from_intent(strategy: Strategy, intent: Intent, player: Symbol, noise: f64) -> Self {
        Self {
            strategy,
            position: intent.position,
            confidence: intent.confidence,
            amplitude: Amplitude::new(intent.confidence, intent.phase + noise),
            player,
        }
    }

    /// "No legal move" marker at the first cell
    pub fn placeholder(strategy: Strategy, player: Symbol) -> Self {
        Self {
            strategy,
            position: Position::new(0, 0),
            confidence: 0.0,
            amplitude: Amplitude::ZERO,
            player,
        }
    }

    pub fn is_placeholder(&self) -> bool {
        self.confidence == 0.0 && self.amplitude.magnitude == 0.0
    }

    pub fn label(&self) -> &'static str {
        self.strategy.label()
    }
}

// ============================================================================
// TESTS
// ============================================================================
