//! Error types.

use thiserror::Error;

/// Problems that stop content or configuration from loading.
///
/// Recoverable oddities in definitions (an unknown trigger word, a patrol
/// with a single system) are logged and skipped instead.
#[derive(Debug, Error)]
pub enum ContentError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unknown {kind} \"{name}\"")]
    Unknown { kind: &'static str, name: String },
    #[error("duplicate {kind} \"{name}\"")]
    Duplicate { kind: &'static str, name: String },
    #[error("fleet \"{0}\" has no variants")]
    EmptyFleet(String),
    #[error("no mission named \"{0}\"")]
    NoMission(String),
}

impl ContentError {
    pub fn unknown(kind: &'static str, name: impl Into<String>) -> Self {
        ContentError::Unknown {
            kind,
            name: name.into(),
        }
    }
}
