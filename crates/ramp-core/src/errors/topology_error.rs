//! Airfield topology loading errors.

use super::error_code::{self, RampErrorCode};

/// Errors raised while reading or building the airfield graph.
#[derive(Debug, thiserror::Error)]
pub enum TopologyError {
    #[error("Topology graph not found: {path}")]
    GraphNotFound { path: String },

    #[error("Topology graph invalid ({path}): {message}")]
    GraphInvalid { path: String, message: String },
}

impl RampErrorCode for TopologyError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::GraphNotFound { .. } => error_code::GRAPH_NOT_FOUND,
            Self::GraphInvalid { .. } => error_code::GRAPH_INVALID,
        }
    }
}
