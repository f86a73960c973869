//! Rule presets endpoint

use axum::Json;
use qttt_core::Rules;
use serde::{Deserialize, Serialize};

use crate::error::ApiError;

pub async fn get_presets() -> Json<Vec<Rules>> {
    Json(Rules::presets())
}

/// Rules chosen by a request: explicit rules win over a preset name
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct RulesChoice {
    pub preset: Option<String>,
    pub rules: Option<Rules>,
}

impl RulesChoice {
    pub fn resolve(&self) -> Result<Rules, ApiError> {
        let rules = match (&self.rules, &self.preset) {
            (Some(rules), _) => rules.clone(),
            (None, Some(name)) => Rules::by_name(name)?,
            (None, None) => Rules::classic(),
        };
        rules.validate()?;
        Ok(rules)
    }
}
