//! Arena command - QuantumMind against each single strategy
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: build_schedule(), play_arena(), report_results()
//! - Level 3: play_single_game(), compute_records()
//! - Level 4: formatting utilities

use anyhow::Result;
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use serde::Serialize;

use qttt_core::{GameState, QuantumMind, Rules, Status, Strategy, Symbol, ALL_STRATEGIES};

use crate::common::RulesArgs;

/// Base seed when none is given, matching the mind's default
const DEFAULT_ARENA_SEED: u64 = 42;

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Args)]
pub struct ArenaArgs {
    /// Games per baseline (sides alternate)
    #[arg(long, default_value = "20")]
    pub games: usize,

    /// Random plies played before the engines take over
    #[arg(long, default_value = "2")]
    pub opening_plies: usize,

    /// Only play against this strategy (e.g. "fork")
    #[arg(long)]
    pub baseline: Option<String>,

    #[command(flatten)]
    pub rules: RulesArgs,

    /// Hide the progress bar
    #[arg(long)]
    pub quiet: bool,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

/// One scheduled game
#[derive(Clone, Copy, Debug)]
struct Fixture {
    baseline: Strategy,
    mind_side: Symbol,
    seed: u64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
enum Outcome {
    MindWin,
    MindLoss,
    Draw,
}

#[derive(Clone, Debug)]
struct GameRecord {
    baseline: Strategy,
    outcome: Outcome,
    plies: usize,
}

/// Results against one baseline, from the mind's side
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
struct BaselineRecord {
    baseline: String,
    wins: usize,
    losses: usize,
    draws: usize,
    avg_plies: f32,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run arena command
///
/// 1. Schedule games for every baseline, alternating sides
/// 2. Play them in parallel
/// 3. Report W/L/D per baseline
pub fn run(args: ArenaArgs, seed: Option<u64>) -> Result<()> {
    let rules = args.rules.load()?;
    let baselines = select_baselines(args.baseline.as_deref())?;
    let fixtures = build_schedule(&baselines, args.games, seed.unwrap_or(DEFAULT_ARENA_SEED));

    tracing::info!(
        "Starting arena: {} baselines x {} games, rules={}, opening plies={}",
        baselines.len(),
        args.games,
        rules.name,
        args.opening_plies
    );

    let progress = create_progress(fixtures.len() as u64, args.quiet);
    let games = play_arena(&fixtures, &rules, args.opening_plies, &progress)?;
    progress.finish_and_clear();

    let records = compute_records(&baselines, &games);
    report_results(&records, &rules, args.json)
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

fn select_baselines(filter: Option<&str>) -> Result<Vec<Strategy>> {
    match filter {
        None => Ok(ALL_STRATEGIES.to_vec()),
        Some(label) => Strategy::from_label(label)
            .map(|s| vec![s])
            .ok_or_else(|| anyhow::anyhow!("Unknown strategy: {}", label)),
    }
}

/// Every baseline gets `games` fixtures; the mind takes X on even games
fn build_schedule(baselines: &[Strategy], games: usize, base_seed: u64) -> Vec<Fixture> {
    baselines
        .iter()
        .flat_map(|&baseline| (0..games).map(move |game| (baseline, game)))
        .enumerate()
        .map(|(index, (baseline, game))| Fixture {
            baseline,
            mind_side: if game % 2 == 0 { Symbol::X } else { Symbol::O },
            seed: base_seed.wrapping_add(index as u64),
        })
        .collect()
}

/// Execute games in parallel using rayon
fn play_arena(
    fixtures: &[Fixture],
    rules: &Rules,
    opening_plies: usize,
    progress: &ProgressBar,
) -> Result<Vec<GameRecord>> {
    fixtures
        .par_iter()
        .map(|fixture| {
            let record = play_single_game(fixture, rules, opening_plies);
            progress.inc(1);
            record
        })
        .collect()
}

fn report_results(records: &[BaselineRecord], rules: &Rules, json: bool) -> Result<()> {
    if json {
        print_json_results(records, rules)
    } else {
        print_text_results(records);
        Ok(())
    }
}

// ============================================================================
// LEVEL 3 - STEPS
// ============================================================================

/// Random opening, then mind and baseline alternate until the game ends
fn play_single_game(fixture: &Fixture, rules: &Rules, opening_plies: usize) -> Result<GameRecord> {
    let mut rng = ChaCha8Rng::seed_from_u64(fixture.seed);
    let mind = QuantumMind::with_seed(fixture.seed);
    let mut state = GameState::new(rules.clone());

    for _ in 0..opening_plies {
        if state.is_over() {
            break;
        }
        let moves = state.available_moves();
        let Some(&pos) = moves.choose(&mut rng) else {
            break;
        };
        state = state.play(pos)?;
    }

    while !state.is_over() {
        let pos = if state.current == fixture.mind_side {
            mind.select_winning_position(&state.board, &state.rules, state.current)?
        } else {
            fixture
                .baseline
                .suggest_exact(&state.board, &state.rules, state.current)
                .position
        };
        state = state.play(pos)?;
    }

    Ok(GameRecord {
        baseline: fixture.baseline,
        outcome: outcome_for(state.status, fixture.mind_side),
        plies: state.moves_played,
    })
}

fn compute_records(baselines: &[Strategy], games: &[GameRecord]) -> Vec<BaselineRecord> {
    baselines
        .iter()
        .map(|&baseline| {
            let played: Vec<&GameRecord> =
                games.iter().filter(|g| g.baseline == baseline).collect();
            let count =
                |outcome: Outcome| played.iter().filter(|g| g.outcome == outcome).count();
            let total_plies: usize = played.iter().map(|g| g.plies).sum();

            BaselineRecord {
                baseline: baseline.label().to_string(),
                wins: count(Outcome::MindWin),
                losses: count(Outcome::MindLoss),
                draws: count(Outcome::Draw),
                avg_plies: if played.is_empty() {
                    0.0
                } else {
                    total_plies as f32 / played.len() as f32
                },
            }
        })
        .collect()
}

// ============================================================================
// LEVEL 4 - UTILITIES
// ============================================================================

fn outcome_for(status: Status, mind_side: Symbol) -> Outcome {
    match status {
        Status::Won(winner) if winner == mind_side => Outcome::MindWin,
        Status::Won(_) => Outcome::MindLoss,
        _ => Outcome::Draw,
    }
}

fn create_progress(len: u64, quiet: bool) -> ProgressBar {
    if quiet {
        return ProgressBar::hidden();
    }
    let bar = ProgressBar::new(len);
    if let Ok(style) = ProgressStyle::with_template("{bar:40} {pos}/{len} games ({elapsed})") {
        bar.set_style(style);
    }
    bar
}

fn print_json_results(records: &[BaselineRecord], rules: &Rules) -> Result<()> {
    #[derive(Serialize)]
    struct JsonOutput<'a> {
        generated_at: String,
        rules: &'a str,
        baselines: &'a [BaselineRecord],
    }

    let output = JsonOutput {
        generated_at: chrono::Utc::now().to_rfc3339(),
        rules: &rules.name,
        baselines: records,
    };
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn print_text_results(records: &[BaselineRecord]) {
    println!("\n=== Arena Results (mind's view) ===");
    println!("{:<14} {:>5} {:>5} {:>5} {:>10}", "baseline", "W", "L", "D", "avg plies");
    for r in records {
        println!(
            "{:<14} {:>5} {:>5} {:>5} {:>10.1}",
            r.baseline, r.wins, r.losses, r.draws, r.avg_plies
        );
    }

    let wins: usize = records.iter().map(|r| r.wins).sum();
    let losses: usize = records.iter().map(|r| r.losses).sum();
    let draws: usize = records.iter().map(|r| r.draws).sum();
    println!("{:<14} {:>5} {:>5} {:>5}", "total", wins, losses, draws);
}

// ============================================================================
// TESTS
// ============================================================================
