//! QTTT CLI - Command-line interface
//!
//! Commands:
//! - play: Play against the mind in the terminal
//! - analyze: Show every proposal and tally for a position
//! - arena: Pit the mind against each single strategy
//! - serve: Start the HTTP server for the board UI

mod analyze;
mod arena;
mod common;
mod play;
mod server;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "qttt")]
#[command(about = "Tic-tac-toe against eight interfering strategies")]
#[command(version)]
struct Cli {
    /// Seed for the mind's phase noise and arena openings
    #[arg(long, global = true)]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play a game in the terminal
    Play(play::PlayArgs),
    /// Analyze a single position
    Analyze(analyze::AnalyzeArgs),
    /// Mind vs single-strategy baselines
    Arena(arena::ArenaArgs),
    /// Start the HTTP server
    Serve(server::ServerArgs),
}

fn main() -> anyhow::Result<()> {
    // Logs go to stderr so they never interleave with the board
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Play(args) => play::run(args, cli.seed),
        Commands::Analyze(args) => analyze::run(args, cli.seed),
        Commands::Arena(args) => arena::run(args, cli.seed),
        Commands::Serve(args) => server::run(args),
    }
}
