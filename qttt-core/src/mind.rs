//! QuantumMind - strategy interference engine
//!
//! One opponent turn runs through typed stages so none can be skipped:
//! `collect_proposals` -> `ProposalSet::aggregate` -> `Aggregation::select`.
//! The controller applies the resulting `Decision`.
//!
//! Selection rule: the cell with the highest summed base confidence wins;
//! ties go to the cell with more supporting strategies, then to the first
//! cell in row-major order. Interference (the vector sum of the noisy
//! amplitudes) is reported per cell but never decides.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::amplitude::Amplitude;
use crate::board::{Board, Position, Symbol};
use crate::error::GameError;
use crate::rules::Rules;
use crate::strategy::{board_hash, Proposal, Strategy, ALL_STRATEGIES};

// ============================================================================
// CONSTANTS
// ============================================================================

/// Seed used when none is configured
pub const DEFAULT_SEED: u64 = 42;

/// Confidence sums are compared on a 1e-6 grid so float noise cannot break ties
const CONFIDENCE_SCALE: f64 = 1e6;

/// Spreads board hashes across the seed space (golden-ratio multiplier)
const POSITION_MIX: u64 = 0x9E37_79B9_7F4A_7C15;

// ============================================================================
// CONFIGURATION
// ============================================================================

/// Engine configuration
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MindConfig {
    /// Seed for the phase noise generator (None = DEFAULT_SEED)
    pub seed: Option<u64>,
    /// Jitter proposal phases for visual variety
    pub phase_noise: bool,
}

impl Default for MindConfig {
    fn default() -> Self {
        Self {
            seed: None,
            phase_noise: true,
        }
    }
}

impl MindConfig {
    /// Noise-free configuration; every amplitude sits on its base phase
    pub fn exact() -> Self {
        Self {
            phase_noise: false,
            ..Default::default()
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

// ============================================================================
// QUANTUM MIND
// ============================================================================

/// Aggregation engine over the eight strategies
///
/// Holds configuration only. Each call derives its own noise generator
/// from the seed and the position, so a shared `&QuantumMind` can think
/// on many threads at once and a position always gets the same phases.
#[derive(Clone, Debug, Default)]
pub struct QuantumMind {
    config: MindConfig,
}

impl QuantumMind {
    pub fn new(config: MindConfig) -> Self {
        Self { config }
    }

    pub fn with_seed(seed: u64) -> Self {
        Self::new(MindConfig::default().with_seed(seed))
    }

    pub fn config(&self) -> &MindConfig {
        &self.config
    }

    /// Strategies in invocation order
    pub fn strategies(&self) -> &'static [Strategy] {
        &ALL_STRATEGIES
    }

    /// Noise generator for one call, keyed by seed, position and side
    fn rng_for(&self, board: &Board, player: Symbol) -> ChaCha8Rng {
        let seed = self.config.seed.unwrap_or(DEFAULT_SEED);
        let position_key = board_hash(board).wrapping_mul(POSITION_MIX) ^ player.code();
        ChaCha8Rng::seed_from_u64(seed ^ position_key)
    }

    /// Run every strategy once against the same snapshot
    pub fn collect_proposals(&self, board: &Board, rules: &Rules, player: Symbol) -> ProposalSet {
        let mut rng = self.rng_for(board, player);
        let proposals = ALL_STRATEGIES
            .iter()
            .map(|&strategy| {
                if self.config.phase_noise {
                    strategy.suggest(board, rules, player, &mut rng)
                } else {
                    strategy.suggest_exact(board, rules, player)
                }
            })
            .collect();
        ProposalSet { player, proposals }
    }

    /// Full turn computation: proposals, interference, selection
    pub fn think(
        &self,
        board: &Board,
        rules: &Rules,
        player: Symbol,
    ) -> Result<Decision, GameError> {
        board.check_shape(rules)?;

        let proposals = self.collect_proposals(board, rules, player);
        tracing::debug!(
            "{} proposals collected for {} ({} placeholders)",
            proposals.len(),
            player,
            proposals.placeholder_count()
        );

        let aggregation = proposals.aggregate();
        tracing::debug!("aggregated into {} candidate cells", aggregation.tallies().len());

        let decision = aggregation.select(board, rules)?;
        tracing::debug!("selected {} for {}", decision.position, player);

        Ok(decision)
    }

    /// Chosen cell only
    pub fn select_winning_position(
        &self,
        board: &Board,
        rules: &Rules,
        player: Symbol,
    ) -> Result<Position, GameError> {
        Ok(self.think(board, rules, player)?.position)
    }
}

// ============================================================================
// STAGE 1 - PROPOSALS
// ============================================================================

/// Every strategy's proposal for one turn
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProposalSet {
    player: Symbol,
    proposals: Vec<Proposal>,
}

impl ProposalSet {
    pub fn new(player: Symbol, proposals: Vec<Proposal>) -> Self {
        Self { player, proposals }
    }

    pub fn player(&self) -> Symbol {
        self.player
    }

    pub fn proposals(&self) -> &[Proposal] {
        &self.proposals
    }

    pub fn len(&self) -> usize {
        self.proposals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.proposals.is_empty()
    }

    pub fn placeholder_count(&self) -> usize {
        self.proposals.iter().filter(|p| p.is_placeholder()).count()
    }

    /// Group by cell and sum each group
    pub fn aggregate(self) -> Aggregation {
        let mut tallies: Vec<Tally> = group_by_position(&self.proposals)
            .into_iter()
            .map(|(position, group)| Tally {
                position,
                supporters: group.iter().map(|p| p.strategy).collect(),
                confidence: group.iter().map(|p| p.confidence).sum(),
                interference: aggregate_amplitude(group.iter().copied()),
            })
            .collect();
        tallies.sort_by_key(|t| t.position);

        Aggregation {
            player: self.player,
            proposals: self.proposals,
            tallies,
        }
    }
}

/// Proposals keyed by target cell, placeholders dropped
///
/// Within a group proposals keep their invocation order.
pub fn group_by_position(proposals: &[Proposal]) -> FxHashMap<Position, Vec<&Proposal>> {
    let mut groups: FxHashMap<Position, Vec<&Proposal>> = FxHashMap::default();
    for proposal in proposals.iter().filter(|p| !p.is_placeholder()) {
        groups.entry(proposal.position).or_default().push(proposal);
    }
    groups
}

/// Interference: vector sum of the amplitudes
pub fn aggregate_amplitude<'a>(proposals: impl IntoIterator<Item = &'a Proposal>) -> Amplitude {
    proposals.into_iter().map(|p| p.amplitude).sum()
}

// ============================================================================
// STAGE 2 - AGGREGATION
// ============================================================================

/// Combined support for one cell
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Tally {
    pub position: Position,
    pub supporters: Vec<Strategy>,
    /// Sum of base confidences
    pub confidence: f64,
    /// Vector sum of the noisy amplitudes, for display only
    ///
    /// Phase noise can cancel or reinforce supporters, so this need not
    /// follow `confidence`; a busy cell may show less than a quiet one.
    pub interference: Amplitude,
}

impl Tally {
    /// Ordering key: confidence first, then supporter count
    fn rank_key(&self) -> (i64, usize) {
        ((self.confidence * CONFIDENCE_SCALE).round() as i64, self.supporters.len())
    }

    /// Strictly better under the selection rule
    fn outranks(&self, other: &Tally) -> bool {
        self.rank_key() > other.rank_key()
    }
}

/// Per-cell tallies in row-major order
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Aggregation {
    player: Symbol,
    proposals: Vec<Proposal>,
    tallies: Vec<Tally>,
}

impl Aggregation {
    pub fn tallies(&self) -> &[Tally] {
        &self.tallies
    }

    pub fn proposals(&self) -> &[Proposal] {
        &self.proposals
    }

    pub fn tally_at(&self, position: Position) -> Option<&Tally> {
        self.tallies.iter().find(|t| t.position == position)
    }

    /// Best tally under the selection rule
    pub fn leader(&self) -> Option<&Tally> {
        self.tallies.iter().fold(None, |best, tally| match best {
            Some(current) if !tally.outranks(current) => Some(current),
            _ => Some(tally),
        })
    }

    /// Pick the move, falling back to the first available cell if the
    /// leader is not legal
    pub fn select(self, board: &Board, rules: &Rules) -> Result<Decision, GameError> {
        let available = board.available_moves(rules);
        let first_available = *available.first().ok_or(GameError::NoLegalMove)?;

        let (position, fallback) = match self.leader().map(|t| t.position) {
            Some(position) if board.is_legal_move(rules, position) => (position, false),
            chosen => {
                tracing::error!(
                    "leader {:?} is not a legal cell, falling back to {}",
                    chosen,
                    first_available
                );
                (first_available, true)
            }
        };

        Ok(Decision {
            position,
            player: self.player,
            proposals: self.proposals,
            tallies: self.tallies,
            fallback,
        })
    }
}

// ============================================================================
// STAGE 3 - DECISION
// ============================================================================

/// Chosen move plus everything a display layer needs
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Decision {
    pub position: Position,
    pub player: Symbol,
    pub proposals: Vec<Proposal>,
    pub tallies: Vec<Tally>,
    /// Set when selection had to fall back to the first available cell
    pub fallback: bool,
}

impl Decision {
    pub fn tally_at(&self, position: Position) -> Option<&Tally> {
        self.tallies.iter().find(|t| t.position == position)
    }

    /// Tallies ordered best first under the selection rule
    pub fn ranking(&self) -> Vec<&Tally> {
        let mut ranked: Vec<&Tally> = self.tallies.iter().collect();
        // Stable sort keeps row-major order among full ties
        ranked.sort_by_key(|t| std::cmp::Reverse(t.rank_key()));
        ranked
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn board(s: &str) -> Board {
        s.parse().unwrap()
    }

    fn proposal(strategy: Strategy, row: usize, col: usize, confidence: f64) -> Proposal {
        Proposal {
            strategy,
            position: Position::new(row, col),
            confidence,
            amplitude: Amplitude::new(confidence, strategy.base_phase()),
            player: Symbol::O,
        }
    }

    #[test]
    fn test_collect_runs_every_strategy_in_order() {
        let rules = Rules::classic();
        let mind = QuantumMind::default();
        let set = mind.collect_proposals(&Board::empty(&rules), &rules, Symbol::X);
        let order: Vec<Strategy> = set.proposals().iter().map(|p| p.strategy).collect();
        assert_eq!(order, ALL_STRATEGIES.to_vec());
    }

    #[test]
    fn test_empty_board_center_dominates() {
        let rules = Rules::classic();
        let mind = QuantumMind::new(MindConfig::exact());
        let decision = mind.think(&Board::empty(&rules), &rules, Symbol::X).unwrap();

        let center = decision.tally_at(Position::new(1, 1)).unwrap();
        assert_eq!(decision.position, Position::new(1, 1));
        assert_eq!(center.supporters.len(), 7);
        assert!(center.interference.magnitude > 0.5);
        for corner in rules.corners() {
            if let Some(t) = decision.tally_at(corner) {
                assert!(center.confidence > t.confidence);
                assert!(center.interference.magnitude > t.interference.magnitude);
            }
        }
    }

    #[test]
    fn test_empty_board_center_dominates_with_noise() {
        let rules = Rules::classic();
        let empty = Board::empty(&rules);
        for seed in 0..200 {
            let decision = QuantumMind::with_seed(seed)
                .think(&empty, &rules, Symbol::X)
                .unwrap();
            let center = decision.tally_at(Position::new(1, 1)).unwrap();
            assert_eq!(decision.position, Position::new(1, 1));
            assert!((center.confidence - 5.3).abs() < 1e-9);
            for corner in rules.corners() {
                if let Some(t) = decision.tally_at(corner) {
                    assert!(center.confidence > t.confidence, "seed {}", seed);
                }
            }
        }
    }

    #[test]
    fn test_repeat_calls_are_identical() {
        let rules = Rules::classic();
        let b = board("X../.O./..X");
        let mind = QuantumMind::with_seed(3);
        let first = mind.think(&b, &rules, Symbol::O).unwrap();
        let second = mind.think(&b, &rules, Symbol::O).unwrap();
        assert_eq!(first, second);

        // Another seed jitters phases differently but ranks the same
        let other = QuantumMind::with_seed(4).think(&b, &rules, Symbol::O).unwrap();
        assert_eq!(first.position, other.position);
        let rank = |d: &Decision| {
            d.ranking()
                .iter()
                .map(|t| (t.position, t.confidence))
                .collect::<Vec<_>>()
        };
        assert_eq!(rank(&first), rank(&other));
        assert_ne!(first.proposals, other.proposals);
    }

    #[test]
    fn test_shared_mind_across_threads() {
        let rules = Rules::classic();
        let boards = [
            Board::empty(&rules),
            board("X../.../..."),
            board("XX./.O./..O"),
            board("X../.O./..X"),
        ];
        let mind = QuantumMind::with_seed(5);
        let serial: Vec<Decision> = boards
            .iter()
            .map(|b| mind.think(b, &rules, Symbol::O).unwrap())
            .collect();

        let (shared, rules) = (&mind, &rules);
        let parallel: Vec<Decision> = std::thread::scope(|scope| {
            let handles: Vec<_> = boards
                .iter()
                .map(|b| scope.spawn(move || shared.think(b, rules, Symbol::O).unwrap()))
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });
        assert_eq!(serial, parallel);
    }

    #[test]
    fn test_group_by_position_skips_placeholders() {
        let proposals = vec![
            proposal(Strategy::CenterFirst, 1, 1, 1.0),
            proposal(Strategy::Defensive, 0, 2, 0.9),
            proposal(Strategy::Mirror, 1, 1, 0.8),
            Proposal::placeholder(Strategy::Fork, Symbol::O),
        ];
        let groups = group_by_position(&proposals);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[&Position::new(1, 1)].len(), 2);
        assert!(!groups.contains_key(&Position::new(0, 0)));
    }

    #[test]
    fn test_aggregate_amplitude_interferes() {
        // Strategies 0 and 4 sit half a turn apart and cancel
        let a = proposal(Strategy::CenterFirst, 0, 0, 0.7);
        let b = proposal(Strategy::Aggressive, 0, 0, 0.7);
        assert!(aggregate_amplitude([&a, &b]).magnitude < 1e-9);

        let c = proposal(Strategy::CenterFirst, 0, 0, 0.4);
        assert!((aggregate_amplitude([&a, &c]).magnitude - 1.1).abs() < 1e-9);
    }

    #[test]
    fn test_tie_break_row_major() {
        let set = ProposalSet::new(
            Symbol::O,
            vec![
                proposal(Strategy::CenterFirst, 2, 2, 0.5),
                proposal(Strategy::Defensive, 0, 1, 0.5),
            ],
        );
        let rules = Rules::classic();
        let decision = set.aggregate().select(&Board::empty(&rules), &rules).unwrap();
        assert_eq!(decision.position, Position::new(0, 1));
    }

    #[test]
    fn test_tie_break_prefers_more_supporters() {
        let set = ProposalSet::new(
            Symbol::O,
            vec![
                proposal(Strategy::CenterFirst, 0, 0, 0.9),
                proposal(Strategy::Defensive, 2, 2, 0.5),
                proposal(Strategy::Mirror, 2, 2, 0.4),
            ],
        );
        let rules = Rules::classic();
        let decision = set.aggregate().select(&Board::empty(&rules), &rules).unwrap();
        assert_eq!(decision.position, Position::new(2, 2));
        assert!(!decision.fallback);
    }

    #[test]
    fn test_illegal_leader_falls_back() {
        let rules = Rules::classic();
        let b = board("X../.../...");
        let set = ProposalSet::new(Symbol::O, vec![proposal(Strategy::CenterFirst, 0, 0, 1.0)]);
        let decision = set.aggregate().select(&b, &rules).unwrap();
        assert!(decision.fallback);
        assert_eq!(decision.position, Position::new(0, 1));
    }

    #[test]
    fn test_no_legal_move() {
        let rules = Rules::classic();
        let mind = QuantumMind::default();
        let full = board("XOX/XOO/OXX");
        assert_eq!(mind.think(&full, &rules, Symbol::X), Err(GameError::NoLegalMove));
    }

    #[test]
    fn test_shape_mismatch_rejected() {
        let mind = QuantumMind::default();
        let result = mind.think(&Board::empty(&Rules::classic()), &Rules::wide(), Symbol::X);
        assert_eq!(result, Err(GameError::BoardShape { expected: 4, found: 3 }));
    }

    #[test]
    fn test_block_wins_the_vote() {
        let rules = Rules::classic();
        let mind = QuantumMind::with_seed(11);
        let decision = mind.think(&board("XX./.O./..O"), &rules, Symbol::O).unwrap();
        assert_eq!(decision.position, Position::new(0, 2));
    }

    #[test]
    fn test_exact_mode_is_fully_deterministic() {
        let rules = Rules::wide();
        let b = board("X.../.O../....");
        let a = QuantumMind::new(MindConfig::exact().with_seed(1))
            .think(&b, &rules, Symbol::X)
            .unwrap();
        let c = QuantumMind::new(MindConfig::exact().with_seed(2))
            .think(&b, &rules, Symbol::X)
            .unwrap();
        assert_eq!(a, c);
    }
}
