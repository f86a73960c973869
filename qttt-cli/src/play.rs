//! Play command - a terminal game against the mind
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: setup_game(), play_session()
//! - Level 3: human_turn(), mind_turn()
//! - Level 4: output formatting

use std::io::{self, BufRead, Write};

use anyhow::Result;
use clap::Args;

use qttt_core::{Decision, Game, GameError, GameState, MindConfig, QuantumMind, Status, Symbol};

use crate::common::{parse_position, render_grid, side_name, RulesArgs};

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Args)]
pub struct PlayArgs {
    /// Side you play (X moves first)
    #[arg(long, default_value = "x")]
    pub human: Symbol,

    #[command(flatten)]
    pub rules: RulesArgs,

    /// Print every proposal and tally after each mind move
    #[arg(long)]
    pub show_proposals: bool,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run play command
///
/// 1. Build the game from the rules and seed
/// 2. Alternate turns on stdin/stdout until the game ends
pub fn run(args: PlayArgs, seed: Option<u64>) -> Result<()> {
    let game = setup_game(&args, seed)?;

    tracing::info!(
        "Starting game: rules={}, you play {}",
        game.rules().name,
        game.human()
    );

    let stdin = io::stdin();
    let stdout = io::stdout();
    let final_state = play_session(
        &game,
        &mut stdin.lock(),
        &mut stdout.lock(),
        args.show_proposals,
    )?;

    tracing::info!("Game finished: {}", final_state.status);
    Ok(())
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

fn setup_game(args: &PlayArgs, seed: Option<u64>) -> Result<Game> {
    let rules = args.rules.load()?;
    let mind = QuantumMind::new(MindConfig {
        seed,
        ..MindConfig::default()
    });
    Ok(Game::new(rules, args.human, mind))
}

/// Drive one game; returns early with the current state if input runs out
fn play_session<R: BufRead, W: Write>(
    game: &Game,
    input: &mut R,
    out: &mut W,
    show_proposals: bool,
) -> Result<GameState> {
    let mut state = game.new_game();
    writeln!(out, "{}\n", render_grid(&state.board, &state.rules))?;

    while !state.is_over() {
        if game.is_human_turn(&state) {
            match human_turn(game, &state, input, out)? {
                Some(next) => state = next,
                None => return Ok(state),
            }
        } else {
            let (next, decision) = mind_turn(game, &state)?;
            report_mind_move(out, &decision, show_proposals)?;
            state = next;
        }
        writeln!(out, "{}\n", render_grid(&state.board, &state.rules))?;
    }

    report_outcome(out, &state, game.human())?;
    Ok(state)
}

// ============================================================================
// LEVEL 3 - STEPS
// ============================================================================

/// Prompt until a legal move is entered; None on end of input or "q"
fn human_turn<R: BufRead, W: Write>(
    game: &Game,
    state: &GameState,
    input: &mut R,
    out: &mut W,
) -> Result<Option<GameState>> {
    loop {
        write!(out, "Your move ({}), row col: ", game.human())?;
        out.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 || line.trim().eq_ignore_ascii_case("q") {
            writeln!(out)?;
            return Ok(None);
        }

        let Some(pos) = parse_position(&line) else {
            writeln!(out, "Enter two numbers, e.g. \"1 1\"")?;
            continue;
        };

        match game.player_move(state, pos) {
            Ok(next) => return Ok(Some(next)),
            Err(err @ GameError::IllegalMove { .. }) => writeln!(out, "{}", err)?,
            Err(err) => return Err(err.into()),
        }
    }
}

fn mind_turn(game: &Game, state: &GameState) -> Result<(GameState, Decision)> {
    let (next, decision) = game.opponent_move(state)?;
    if decision.fallback {
        tracing::warn!("mind fell back to the first available cell");
    }
    Ok((next, decision))
}

// ============================================================================
// LEVEL 4 - UTILITIES
// ============================================================================

fn report_mind_move<W: Write>(
    out: &mut W,
    decision: &Decision,
    show_proposals: bool,
) -> Result<()> {
    writeln!(out, "Mind ({}) plays {}", decision.player, decision.position)?;
    if !show_proposals {
        return Ok(());
    }

    for p in &decision.proposals {
        writeln!(
            out,
            "  {:<13} -> {}  conf {:.2}  phase {:.2}",
            p.label(),
            p.position,
            p.confidence,
            p.amplitude.phase
        )?;
    }
    for tally in decision.ranking() {
        writeln!(
            out,
            "  {}  total {:.2}  |amp| {:.3}  supporters {}",
            tally.position,
            tally.confidence,
            tally.interference.magnitude,
            tally.supporters.len()
        )?;
    }
    Ok(())
}

fn report_outcome<W: Write>(out: &mut W, state: &GameState, human: Symbol) -> Result<()> {
    match state.status {
        Status::Won(winner) => {
            writeln!(out, "{} wins ({})", winner, side_name(winner, human))?;
            if let Some(line) = state.winning_line() {
                let cells: Vec<String> = line.iter().map(ToString::to_string).collect();
                writeln!(out, "Line: {}", cells.join(" "))?;
            }
        }
        Status::Draw => writeln!(out, "Draw")?,
        Status::Playing => {}
    }
    Ok(())
}

// ============================================================================
// TESTS
// ============================================================================
