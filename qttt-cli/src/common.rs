//! Helpers shared by the commands

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use qttt_core::{Board, Position, Rules, Symbol};

/// Rule selection shared by `play`, `analyze` and `arena`
#[derive(Args, Clone, Debug)]
pub struct RulesArgs {
    /// Named preset: classic, wide or hollow
    #[arg(long, default_value = "classic")]
    pub preset: String,

    /// Rules JSON file (overrides --preset)
    #[arg(long, value_name = "FILE")]
    pub rules: Option<PathBuf>,
}

impl RulesArgs {
    pub fn load(&self) -> Result<Rules> {
        let rules = match &self.rules {
            Some(path) => Rules::load(path)?,
            None => Rules::by_name(&self.preset)?,
        };
        rules
            .validate()
            .with_context(|| format!("Invalid rules '{}'", rules.name))?;
        Ok(rules)
    }
}

/// Create RNG from seed or random
pub fn create_rng(seed: Option<u64>) -> ChaCha8Rng {
    match seed {
        Some(s) => ChaCha8Rng::seed_from_u64(s),
        None => ChaCha8Rng::from_entropy(),
    }
}

/// Board with row and column indices, `#` for a disabled center
pub fn render_grid(board: &Board, rules: &Rules) -> String {
    let mut out = String::from("   ");
    for col in 0..board.cols() {
        out.push_str(&format!(" {} ", col));
    }
    for (row, line) in board.render(rules).lines().enumerate() {
        out.push_str(&format!("\n {} ", row));
        for ch in line.chars() {
            out.push_str(&format!(" {} ", ch));
        }
    }
    out
}

/// Parse "row col" (also "row,col")
pub fn parse_position(input: &str) -> Option<Position> {
    let mut parts = input
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|s| !s.is_empty())
        .map(str::parse::<usize>);
    match (parts.next(), parts.next(), parts.next()) {
        (Some(Ok(row)), Some(Ok(col)), None) => Some(Position::new(row, col)),
        _ => None,
    }
}

pub fn side_name(symbol: Symbol, human: Symbol) -> &'static str {
    if symbol == human {
        "you"
    } else {
        "mind"
    }
}
