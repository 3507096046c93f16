use thiserror::Error;

/// Contract violations by the quantum collaborators.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    #[error("amplitude source returned {actual} amplitudes, expected {expected}")]
    AmplitudeCount { expected: usize, actual: usize },

    #[error("measurement outcome {outcome} is outside 0..{slots}")]
    OutcomeOutOfRange { outcome: usize, slots: usize },

    #[error("preset {preset} cannot be measured: {reason}")]
    UnsampleablePreset { preset: &'static str, reason: String },
}
