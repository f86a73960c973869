//! Example to run the QTTT server standalone
//!
//! Run with: cargo run -p qttt-server --example run_server

use qttt_server::{run_server, ServerConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = ServerConfig::default();

    println!("Starting QTTT server on port {}", config.port);
    println!("Static files from: {}", config.static_dir);

    run_server(config).await
}
