//! Integration tests for QTTT
//!
//! Tests the full stack: rules, board, strategies, the mind and the game
//! controller playing complete games.

use qttt_core::{
    Board, Decision, Game, GameError, GameState, MindConfig, Position, QuantumMind, Rules, Status,
    Strategy, Symbol, ALL_STRATEGIES,
};
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

// ============================================================================
// TEST FIXTURES
// ============================================================================

fn board(s: &str) -> Board {
    s.parse().unwrap()
}

/// Play out a game with a random human against the mind
fn random_game(rules: Rules, human: Symbol, seed: u64) -> (GameState, Vec<Decision>) {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let game = Game::new(rules, human, QuantumMind::with_seed(seed));
    let mut state = game.new_game();
    let mut decisions = Vec::new();

    while !state.is_over() {
        if game.is_human_turn(&state) {
            let pos = *state.available_moves().choose(&mut rng).unwrap();
            state = game.player_move(&state, pos).unwrap();
        } else {
            let (next, decision) = game.opponent_move(&state).unwrap();
            decisions.push(decision);
            state = next;
        }
    }
    (state, decisions)
}

// ============================================================================
// FULL GAME TESTS
// ============================================================================

#[test]
fn test_random_games_terminate_on_every_preset() {
    for rules in Rules::presets() {
        for seed in 0..20 {
            let human = if seed % 2 == 0 { Symbol::X } else { Symbol::O };
            let (state, decisions) = random_game(rules.clone(), human, seed);

            assert!(state.is_over());
            assert!(state.moves_played <= rules.rows() * rules.cols());
            assert!(decisions.iter().all(|d| !d.fallback), "selection fell back");
            assert!(decisions.iter().all(|d| d.proposals.len() == ALL_STRATEGIES.len()));
        }
    }
}

#[test]
fn test_hollow_center_never_played() {
    for seed in 0..10 {
        let (state, _) = random_game(Rules::hollow(), Symbol::X, seed);
        assert_eq!(state.board.get(Position::new(1, 1)), None);
    }
}

#[test]
fn test_winner_has_a_line() {
    for seed in 0..20 {
        let (state, _) = random_game(Rules::wide(), Symbol::X, seed);
        match state.status {
            Status::Won(winner) => {
                let line = state.winning_line().expect("won game has a line");
                assert_eq!(line.len(), 3);
                assert!(line.iter().all(|&p| state.board.get(p) == Some(winner)));
            }
            Status::Draw => assert!(state.available_moves().is_empty()),
            Status::Playing => unreachable!(),
        }
    }
}

// ============================================================================
// MIND TESTS
// ============================================================================

#[test]
fn test_seeded_minds_agree() {
    let rules = Rules::classic();
    let b = board("X../.O./..X");
    let a = QuantumMind::with_seed(99).think(&b, &rules, Symbol::O).unwrap();
    let c = QuantumMind::with_seed(99).think(&b, &rules, Symbol::O).unwrap();
    assert_eq!(a, c);
}

#[test]
fn test_noise_never_changes_the_choice() {
    let rules = Rules::classic();
    let b = board("X../.O./..X");
    let exact = QuantumMind::new(MindConfig::exact())
        .think(&b, &rules, Symbol::O)
        .unwrap();
    for seed in 0..25 {
        let noisy = QuantumMind::with_seed(seed).think(&b, &rules, Symbol::O).unwrap();
        assert_eq!(noisy.position, exact.position);
    }
}

#[test]
fn test_full_board_has_no_move() {
    let rules = Rules::classic();
    let full = board("XOX/XOO/OXX");
    assert_eq!(full.status(&rules), Status::Draw);
    assert_eq!(
        QuantumMind::default().think(&full, &rules, Symbol::X),
        Err(GameError::NoLegalMove)
    );

    let proposals = QuantumMind::default().collect_proposals(&full, &rules, Symbol::X);
    assert_eq!(proposals.placeholder_count(), 8);
}

#[test]
fn test_every_strategy_proposes_a_legal_cell() {
    let rules = Rules::wide();
    let b = board("X..O/.O../X...");
    for strategy in ALL_STRATEGIES {
        let p = strategy.suggest_exact(&b, &rules, Symbol::X);
        assert!(
            b.is_legal_move(&rules, p.position),
            "{} proposed {}",
            strategy.label(),
            p.position
        );
        assert!(p.confidence > 0.0);
    }
    assert_eq!(Strategy::from_label("Mirror"), Some(Strategy::Mirror));
}

// ============================================================================
// CONFIG TESTS
// ============================================================================

#[test]
fn test_rules_file_drives_a_game() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("custom.json");

    let custom = Rules {
        name: "custom".to_string(),
        ..Rules::wide()
    };
    custom.save(&path).unwrap();

    let loaded = Rules::load(&path).unwrap();
    assert_eq!(loaded, custom);

    let (state, _) = random_game(loaded, Symbol::O, 3);
    assert_eq!(state.board.cols(), 4);
    assert!(state.is_over());
}
