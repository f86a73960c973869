//! QTTT Server - HTTP boundary for the presentation layer
//!
//! This crate exposes the core over JSON:
//! - Game sessions (start, human move, mind move)
//! - One-off position analysis with the full proposal set
//! - Rule presets and status
//! - Static file serving for the board UI

mod error;
mod routes;
mod state;

use axum::{
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, services::ServeDir};

pub use error::ApiError;
pub use state::{GameSession, ServerState};

/// Server configuration
#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub port: u16,
    pub static_dir: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 8003,
            static_dir: "qttt/ui".to_string(),
        }
    }
}

/// Create the router with all routes
pub fn create_router(config: &ServerConfig, state: Arc<ServerState>) -> Router {
    let static_service = ServeDir::new(&config.static_dir);

    Router::new()
        // Status endpoint
        .route("/api/status", get(routes::status::status_handler))
        // Rule presets
        .route("/api/rules", get(routes::rules::get_presets))
        // Position analysis (stateless)
        .route("/api/analyze", post(routes::analyze::analyze_position))
        // Game API
        .route("/api/game/start", post(routes::game::start_game))
        .route("/api/game/state", get(routes::game::get_game_state))
        .route("/api/game/move", post(routes::game::make_player_move))
        .route("/api/game/ai-move", post(routes::game::get_ai_move))
        // Shared state
        .with_state(state)
        .layer(CorsLayer::permissive())
        // Static file serving (must be last)
        .fallback_service(static_service)
}

/// Start the HTTP server
pub async fn run_server(config: ServerConfig) -> anyhow::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let state = Arc::new(ServerState::new());
    let router = create_router(&config, state);

    tracing::info!("QTTT Server starting on http://0.0.0.0:{}", config.port);
    tracing::info!("Static files served from: {}", config.static_dir);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}
