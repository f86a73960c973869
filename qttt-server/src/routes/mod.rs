//! HTTP route handlers

pub mod analyze;
pub mod game;
pub mod rules;
pub mod status;
