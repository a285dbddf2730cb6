//! CLI output: error mapping from domain errors to stable CLI surface.

use crate::error::ApiError;

/// Map domain/service errors to a string for CLI output.
pub fn map_error(e: &ApiError) -> String {
    match e {
        ApiError::ConfigError(msg) => format!("Configuration error: {}", msg),
        ApiError::RunFailed {
            attempts,
            last_error,
        } => format!(
            "Site generation failed after {} attempts.\nLast error: {}",
            attempts, last_error
        ),
        other => other.to_string(),
    }
}
