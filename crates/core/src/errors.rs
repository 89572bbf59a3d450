use thiserror::Error;

/// Failure inside a single suggestion detector. Isolated at the pipeline
/// boundary: the detector contributes nothing this turn and the engine
/// carries on. Never user-visible.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum DetectorError {
    #[error("detector input unavailable: {0}")]
    InputUnavailable(String),
    #[error("detector failed: {0}")]
    Failed(String),
}
