//! Environment configuration shared by the solver binary.
//!
//! Reads `PROMO_LOG` (log filter, falls back to `RUST_LOG`, default `info`)
//! and `PROMO_OUTPUT` (`text` or `json`, default `text`). Command-line flags
//! override the environment.

use crate::error::PromoError;

/// Report rendering on stdout.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn parse(s: &str) -> Result<Self, PromoError> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            _ => Err(PromoError::InvalidOutputFormat(s.to_string())),
        }
    }
}

/// Initialize `env_logger` from `PROMO_LOG` (fallback `RUST_LOG`, default `info`).
/// Tolerates an already-initialized logger.
pub fn init_logging() {
    let env = env_logger::Env::default()
        .filter_or("PROMO_LOG", std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()));
    let _ = env_logger::Builder::from_env(env)
        .format_timestamp_millis()
        .try_init();
}

/// Read `PROMO_OUTPUT` (default text).
pub fn output_format() -> Result<OutputFormat, PromoError> {
    match std::env::var("PROMO_OUTPUT") {
        Ok(s) => OutputFormat::parse(&s),
        Err(_) => Ok(OutputFormat::Text),
    }
}
