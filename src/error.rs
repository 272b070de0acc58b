use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClearSkyError {
    /// Calibration inputs must be parallel sequences.
    #[error(
        "invalid_sequence_lengths: observed={observed}, modeled={modeled}, elevations={elevations}"
    )]
    InvalidSequenceLengths {
        observed: usize,
        modeled: usize,
        elevations: usize,
    },
    #[error("invalid configuration: {0}")]
    Config(String),
    #[error("unknown timezone: {0}")]
    UnknownTimezone(String),
    #[error("failed to read configuration: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse configuration: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ClearSkyError>;
