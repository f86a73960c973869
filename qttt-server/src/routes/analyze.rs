//! Stateless position analysis

use axum::Json;
use qttt_core::{Board, Decision, MindConfig, QuantumMind, Status, Symbol};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::routes::rules::RulesChoice;

#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    /// Rows separated by `/`, e.g. "XX./.O./..O"
    pub board: String,
    pub player: Symbol,
    #[serde(flatten)]
    pub rules: RulesChoice,
    pub seed: Option<u64>,
    /// Disable phase noise
    #[serde(default)]
    pub exact: bool,
}

#[derive(Serialize)]
pub struct AnalyzeResponse {
    pub status: Status,
    pub decision: Decision,
}

pub async fn analyze_position(
    Json(req): Json<AnalyzeRequest>,
) -> Result<Json<AnalyzeResponse>, ApiError> {
    let rules = req.rules.resolve()?;
    let board: Board = req.board.parse()?;
    board.check_shape(&rules)?;

    let config = MindConfig {
        seed: req.seed,
        phase_noise: !req.exact,
    };
    let decision = QuantumMind::new(config).think(&board, &rules, req.player)?;

    Ok(Json(AnalyzeResponse {
        status: board.status(&rules),
        decision,
    }))
}
