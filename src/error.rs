//! Errors at the outer surface: configuration, arguments, reporting.
//!
//! The solver core itself is total and never returns these.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PromoError {
    #[error("horizon {horizon} exceeds the game length of {max} rounds")]
    InvalidHorizon { horizon: usize, max: usize },
    #[error("invalid output format {0:?} (expected \"text\" or \"json\")")]
    InvalidOutputFormat(String),
    #[error("unknown argument: {0}")]
    UnknownArgument(String),
    #[error("no recorded decision for round {round}, score {score}, active {active}")]
    MissingDecision {
        round: u8,
        score: u16,
        active: String,
    },
    #[error("serialize error: {0}")]
    Serialize(String),
}

impl From<serde_json::Error> for PromoError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serialize(value.to_string())
    }
}
