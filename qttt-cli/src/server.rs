//! Serve command - start the HTTP server for the board UI
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: configure_server(), start_server()
//! - Level 3: (delegated to qttt-server crate)
//! - Level 4: configuration validation

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::Args;

use qttt_server::{run_server, ServerConfig};

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Args)]
pub struct ServerArgs {
    /// Port number to listen on
    #[arg(long, default_value = "8003")]
    pub port: u16,

    /// Directory containing the board UI
    #[arg(long, default_value = "qttt/ui")]
    pub static_dir: PathBuf,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run server command
pub fn run(args: ServerArgs) -> Result<()> {
    let config = configure_server(&args)?;
    tracing::info!("Starting QTTT server on port {}", config.port);
    start_server(config)
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

fn configure_server(args: &ServerArgs) -> Result<ServerConfig> {
    validate_static_dir(&args.static_dir)?;

    Ok(ServerConfig {
        port: args.port,
        static_dir: args.static_dir.to_string_lossy().to_string(),
    })
}

/// Blocks until the server exits
fn start_server(config: ServerConfig) -> Result<()> {
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(run_server(config))
}

// ============================================================================
// LEVEL 4 - UTILITIES
// ============================================================================

/// A missing directory only warns; the API still works without the UI
fn validate_static_dir(path: &Path) -> Result<()> {
    if !path.exists() {
        tracing::warn!(
            "Static directory does not exist: {}. Only the API will be served.",
            path.display()
        );
    } else if !path.is_dir() {
        anyhow::bail!("Static path exists but is not a directory: {}", path.display());
    }
    Ok(())
}
