//! Analyze command - show the mind's reasoning for one position
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: load_position(), analyze_position(), report_analysis()
//! - Level 3: (delegated to QuantumMind)
//! - Level 4: formatting utilities

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;

use qttt_core::{Board, Decision, MindConfig, QuantumMind, Rules, Status, Symbol};

use crate::common::{render_grid, RulesArgs};

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Args)]
pub struct AnalyzeArgs {
    /// Rows separated by '/', e.g. "XX./.O./..O"
    #[arg(long)]
    pub board: String,

    /// Side to move
    #[arg(long)]
    pub player: Symbol,

    #[command(flatten)]
    pub rules: RulesArgs,

    /// Disable phase noise
    #[arg(long)]
    pub exact: bool,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Serialize)]
struct Analysis {
    board: String,
    status: Status,
    decision: Decision,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run analyze command
///
/// 1. Parse the board against the rules
/// 2. Let a fresh mind think once
/// 3. Report proposals, tallies and the chosen cell
pub fn run(args: AnalyzeArgs, seed: Option<u64>) -> Result<()> {
    let (rules, board) = load_position(&args)?;
    let analysis = analyze_position(&board, &rules, args.player, seed, args.exact)?;
    report_analysis(&analysis, &board, &rules, args.json)
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

fn load_position(args: &AnalyzeArgs) -> Result<(Rules, Board)> {
    let rules = args.rules.load()?;
    let board: Board = args
        .board
        .parse()
        .with_context(|| format!("Failed to parse board: {}", args.board))?;
    board.check_shape(&rules)?;
    Ok((rules, board))
}

fn analyze_position(
    board: &Board,
    rules: &Rules,
    player: Symbol,
    seed: Option<u64>,
    exact: bool,
) -> Result<Analysis> {
    let mind = QuantumMind::new(MindConfig {
        seed,
        phase_noise: !exact,
    });
    let decision = mind.think(board, rules, player)?;

    Ok(Analysis {
        board: board.render(rules),
        status: board.status(rules),
        decision,
    })
}

fn report_analysis(analysis: &Analysis, board: &Board, rules: &Rules, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(analysis)?);
    } else {
        print!("{}", format_text(analysis, board, rules));
    }
    Ok(())
}

// ============================================================================
// LEVEL 4 - UTILITIES
// ============================================================================

fn format_text(analysis: &Analysis, board: &Board, rules: &Rules) -> String {
    let decision = &analysis.decision;
    let mut out = format!("{}\n\nStatus: {}\n", render_grid(board, rules), analysis.status);

    out.push_str(&format!("\nProposals for {}:\n", decision.player));
    for p in &decision.proposals {
        let marker = if p.is_placeholder() { "  (none)" } else { "" };
        out.push_str(&format!(
            "  {:<13} {}  conf {:.2}  amp {:.2}@{:.2}{}\n",
            p.label(),
            p.position,
            p.confidence,
            p.amplitude.magnitude,
            p.amplitude.phase,
            marker
        ));
    }

    out.push_str("\nTallies (best first):\n");
    for tally in decision.ranking() {
        let names: Vec<&str> = tally.supporters.iter().map(|s| s.label()).collect();
        out.push_str(&format!(
            "  {}  total {:.2}  |amp| {:.3}  [{}]\n",
            tally.position,
            tally.confidence,
            tally.interference.magnitude,
            names.join(", ")
        ));
    }

    out.push_str(&format!("\nChosen: {}", decision.position));
    if decision.fallback {
        out.push_str(" (fallback)");
    }
    out.push('\n');
    out
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use qttt_core::Position;

    fn args(board: &str, preset: &str) -> AnalyzeArgs {
        AnalyzeArgs {
            board: board.to_string(),
            player: Symbol::O,
            rules: RulesArgs {
                preset: preset.to_string(),
                rules: None,
            },
            exact: true,
            json: false,
        }
    }

    #[test]
    fn test_load_position_checks_shape() {
        assert!(load_position(&args("XX./.O./..O", "classic")).is_ok());
        assert!(load_position(&args("XX./.O./..O", "wide")).is_err());
        assert!(load_position(&args("XZ./.../...", "classic")).is_err());
    }

    #[test]
    fn test_analysis_takes_the_win() {
        let (rules, board) = load_position(&args("XX./.O./..O", "classic")).unwrap();
        let analysis = analyze_position(&board, &rules, Symbol::O, None, true).unwrap();
        assert_eq!(analysis.decision.position, Position::new(0, 2));
        assert_eq!(analysis.status, Status::Playing);

        let text = format_text(&analysis, &board, &rules);
        assert!(text.contains("Chosen: (0, 2)"));
        assert!(text.contains("defensive"));
    }

    #[test]
    fn test_analysis_serializes() {
        let (rules, board) = load_position(&args(".../.../...", "classic")).unwrap();
        let analysis = analyze_position(&board, &rules, Symbol::X, Some(1), false).unwrap();
        let json = serde_json::to_value(&analysis).unwrap();
        assert_eq!(json["decision"]["proposals"].as_array().unwrap().len(), 8);
        assert_eq!(json["board"], "...\n...\n...");
    }
}
