//! Error type shared by every stage of the reconstruction.

use crate::displacement::Side;
use crate::reconstruction::Stage;
use thiserror::Error;

/// Errors that abort the computation for a track.
#[derive(Error, Debug)]
pub enum MagellanError {
    #[error("{stage}: timeline has {found} entries, at least 2 are required")]
    TimelineTooShort { stage: Stage, found: usize },

    #[error("{stage}: the {side} half-profile is empty")]
    EmptyHalfProfile { stage: Stage, side: Side },

    #[error(
        "{stage}: jump of {jump} km at t={time} exceeds the {available} km available in the {side} half"
    )]
    JumpOutOfRange {
        stage: Stage,
        time: f64,
        jump: f64,
        available: f64,
        side: Side,
    },

    #[error("invalid bathymetry: {0}")]
    InvalidBathymetry(String),

    #[error("obliquity of {0} degrees leaves no cross-ridge component")]
    DegenerateObliquity(f64),

    #[error("configuration key '{key}' has non-numeric value '{value}'")]
    NonNumericParameter { key: String, value: String },

    #[error("unknown polarity '{0}'")]
    UnknownPolarity(String),

    #[error("failed to parse configuration JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl MagellanError {
    /// The pipeline stage a structural error was raised in, if any.
    pub fn stage(&self) -> Option<Stage> {
        match self {
            MagellanError::TimelineTooShort { stage, .. }
            | MagellanError::EmptyHalfProfile { stage, .. }
            | MagellanError::JumpOutOfRange { stage, .. } => Some(*stage),
            MagellanError::InvalidBathymetry(_) => Some(Stage::ForwardModel),
            MagellanError::DegenerateObliquity(_) => Some(Stage::ObliqueProjection),
            _ => None,
        }
    }
}
